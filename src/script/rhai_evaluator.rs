//! Rhai Evaluator
//!
//! 埋め込みスクリプト言語Rhaiによる[`Evaluator`]の実装。

use rhai::serde::{from_dynamic, to_dynamic};
use rhai::{Dynamic, Engine, EvalAltResult, Map, Scope, AST};

use super::{Evaluator, ScriptError};

/// 変換関数の`this`に束縛されるスコープ変数
const STATE_VARIABLE: &str = "state";

/// Rhaiスクリプトで変換関数を実行する評価器
///
/// 生成時に与えたスクリプトの関数定義を保持し、評価のたびに呼び出し式と結合して実行します。
/// スクリプトのトップレベルの文は生成時に1回だけ実行されます。
///
/// Rhaiの関数は外側の変数を参照できないため、呼び出しをまたいで状態を持ち越す手段として
/// オブジェクトマップ`state`を評価器が保持します。変換関数は`state`に対するメソッドとして
/// 呼び出されるので、関数内では`this`として読み書きでき、変更は次の呼び出しに引き継がれます。
/// トップレベルの文から`state`を初期化することもできます。
///
/// # 使用例
///
/// ```rust
/// use xlsx2json::{Evaluator, RhaiEvaluator};
///
/// # fn main() -> Result<(), xlsx2json::ScriptError> {
/// let mut evaluator = RhaiEvaluator::new(
///     r#"fn tag(row) { row.tagged = "yes"; #{ source: row } }"#,
/// )?;
/// let source = evaluator.invocation("tag", r#"{"Name":"Ada"}"#);
/// let value = evaluator.evaluate(&source)?;
/// let exported = evaluator.export(value)?;
/// assert_eq!(exported["source"]["tagged"], "yes");
///
/// // 呼び出しをまたいだ連番
/// let mut evaluator = RhaiEvaluator::new(
///     r#"
///     state.seq = 0;
///     fn numbered(row) { this.seq += 1; row.seq = this.seq; #{ source: row } }
///     "#,
/// )?;
/// for expected in 1..=3 {
///     let source = evaluator.invocation("numbered", "{}");
///     let value = evaluator.evaluate(&source)?;
///     assert_eq!(evaluator.export(value)?["source"]["seq"], expected);
/// }
/// # Ok(())
/// # }
/// ```
pub struct RhaiEvaluator {
    engine: Engine,
    scope: Scope<'static>,
    /// スクリプトの関数定義のみ
    library: AST,
}

impl RhaiEvaluator {
    /// スクリプトを読み込んで評価器を生成する
    ///
    /// # 戻り値
    ///
    /// * `Ok(RhaiEvaluator)` - スクリプトのコンパイルとトップレベルの実行に成功した場合
    /// * `Err(ScriptError)` - 構文エラー、または実行時エラーが発生した場合
    pub fn new(script: &str) -> Result<Self, ScriptError> {
        let mut engine = Engine::new();
        engine.register_fn("from_json", from_json);

        let ast = engine
            .compile(script)
            .map_err(|e| ScriptError::new(e.to_string()))?;

        let mut scope = Self::initial_scope();
        engine
            .run_ast_with_scope(&mut scope, &ast)
            .map_err(|e| ScriptError::new(e.to_string()))?;

        Ok(Self {
            library: ast.clone_functions_only(),
            engine,
            scope,
        })
    }

    /// 関数定義を持たない評価器を生成する
    pub fn empty() -> Self {
        let mut engine = Engine::new();
        engine.register_fn("from_json", from_json);
        Self {
            engine,
            scope: Self::initial_scope(),
            library: AST::empty(),
        }
    }

    fn initial_scope() -> Scope<'static> {
        let mut scope = Scope::new();
        scope.push(STATE_VARIABLE, Map::new());
        scope
    }

    /// 変換関数間で共有される状態（`this`）の現在値
    pub fn state(&self) -> Option<Map> {
        self.scope.get_value::<Map>(STATE_VARIABLE)
    }

    /// 1回の評価で実行できる演算数の上限を設定する
    ///
    /// 上限を超えた評価はエラーになります。既定では上限はありません。
    pub fn with_max_operations(mut self, operations: u64) -> Self {
        self.engine.set_max_operations(operations);
        self
    }
}

impl Evaluator for RhaiEvaluator {
    type Value = Dynamic;

    /// Rhaiにはオブジェクトリテラルとしての JSON 構文がないため、レコードは文字列リテラルとして
    /// 埋め込み、`from_json`でオブジェクトマップに戻してから関数に渡します。
    /// ブロック式で囲むため、呼び出しは評価器のスコープに変数を残しません。
    /// 関数は`state`のメソッドとして呼び出され、`this`が`state`に束縛されます。
    fn invocation(&self, function: &str, argument: &str) -> String {
        format!(
            "{{ {}.{}(from_json(\"{}\")) }}",
            STATE_VARIABLE,
            function,
            escape_string_literal(argument)
        )
    }

    fn evaluate(&mut self, source: &str) -> Result<Self::Value, ScriptError> {
        let call = self
            .engine
            .compile(source)
            .map_err(|e| ScriptError::new(e.to_string()))?;
        let ast = self.library.merge(&call);

        self.engine
            .eval_ast_with_scope::<Dynamic>(&mut self.scope, &ast)
            .map_err(|e| ScriptError::new(e.to_string()))
    }

    fn export(&self, value: Self::Value) -> Result<serde_json::Value, ScriptError> {
        from_dynamic::<serde_json::Value>(&value).map_err(|e| ScriptError::new(e.to_string()))
    }
}

/// スクリプトから呼び出すJSONデコード関数
fn from_json(json: &str) -> Result<Dynamic, Box<EvalAltResult>> {
    let value: serde_json::Value = serde_json::from_str(json).map_err(|e| e.to_string())?;
    to_dynamic(value)
}

/// Rhaiの二重引用符文字列リテラル用のエスケープ
///
/// `\`と`"`に加えて、改行・復帰・タブをエスケープします。
fn escape_string_literal(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len() + 8);
    for c in text.chars() {
        match c {
            '\\' => escaped.push_str("\\\\"),
            '"' => escaped.push_str("\\\""),
            '\n' => escaped.push_str("\\n"),
            '\r' => escaped.push_str("\\r"),
            '\t' => escaped.push_str("\\t"),
            c => escaped.push(c),
        }
    }
    escaped
}
