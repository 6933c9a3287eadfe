//! Script Module
//!
//! 変換関数を実行するスクリプトランタイムの抽象化を提供するモジュール。
//!
//! コアは[`Evaluator`]トレイトにのみ依存します。ランタイムは呼び出し側が所有し、
//! 1回の実行の間は`&mut`で排他的に借用されます。複数回の実行で再利用でき、
//! 変換関数が行う副作用（呼び出しをまたいだ状態の蓄積など）は制限しません。

#[cfg(feature = "rhai")]
mod rhai_evaluator;

#[cfg(feature = "rhai")]
pub use rhai_evaluator::RhaiEvaluator;

use thiserror::Error;

/// スクリプトランタイムが返すエラー
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{0}")]
pub struct ScriptError(pub String);

impl ScriptError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

/// スクリプトランタイムの能力インターフェース
///
/// 1行分の変換は次の順序で呼び出されます。
///
/// 1. [`invocation`](Evaluator::invocation)で、変換関数を1回だけ呼び出す自己完結した式を組み立てる
/// 2. [`evaluate`](Evaluator::evaluate)でその式を評価する
/// 3. [`export`](Evaluator::export)で評価結果をJSON値に変換する
pub trait Evaluator {
    /// ランタイム固有の評価結果
    type Value;

    /// 変換関数の呼び出し式を組み立てる
    ///
    /// `argument`はレコードのJSONオブジェクト表現です。既定の実装は、呼び出し側の
    /// スコープに状態を漏らさない即時実行の無名関数
    /// `(function(){ return <function>(<argument>);}())`を返します。
    fn invocation(&self, function: &str, argument: &str) -> String {
        format!("(function(){{ return {}({});}}())", function, argument)
    }

    /// ソーステキストを評価する
    fn evaluate(&mut self, source: &str) -> Result<Self::Value, ScriptError>;

    /// 評価結果をホスト側のJSON値に変換する
    fn export(&self, value: Self::Value) -> Result<serde_json::Value, ScriptError>;
}

/// スクリプトランタイムを持たない評価器
///
/// 変換関数を使わない呼び出し側向けです。評価しようとすると常にエラーになります。
#[derive(Debug, Clone, Copy, Default)]
pub struct NoScript;

impl Evaluator for NoScript {
    type Value = serde_json::Value;

    fn evaluate(&mut self, _source: &str) -> Result<Self::Value, ScriptError> {
        Err(ScriptError::new("no scripting runtime is configured"))
    }

    fn export(&self, value: Self::Value) -> Result<serde_json::Value, ScriptError> {
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_invocation_is_self_contained() {
        let source = NoScript.invocation("transform", r#"{"Name":"Ada"}"#);
        assert_eq!(
            source,
            r#"(function(){ return transform({"Name":"Ada"});}())"#
        );
    }

    #[test]
    fn test_no_script_rejects_evaluation() {
        let mut evaluator = NoScript;
        let err = evaluator.evaluate("1 + 1").unwrap_err();
        assert!(err.to_string().contains("no scripting runtime"));
    }
}
