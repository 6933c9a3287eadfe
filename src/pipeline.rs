//! Transform Pipeline Module
//!
//! レコードをJSONにシリアライズし、変換関数が指定されていればスクリプトランタイムで
//! 実行して、その戻り値を検証・再シリアライズするモジュール。

use serde::Deserialize;
use tracing::trace;

use crate::error::Xlsx2JsonError;
use crate::script::Evaluator;
use crate::types::{Record, TransformResponse};

/// 1レコード分の変換処理
///
/// # 引数
///
/// * `evaluator` - スクリプトランタイム（`function`が空の場合は使用しない）
/// * `function` - 変換関数名（空文字列の場合は変換しない）
/// * `row` - シート上の行番号（エラーメッセージ用）
/// * `record` - 変換するレコード
///
/// # 戻り値
///
/// * `Ok(String)` - 出力するJSONオブジェクト
/// * `Err(Xlsx2JsonError)` - いずれかの段階で失敗した場合（`Encoding` / `Eval` / `Export` /
///   `ResponseShape` / `RowRejected`）
///
/// # 処理フロー
///
/// 1. レコードをJSONにシリアライズ
/// 2. 変換関数がなければ、そのJSONが結果
/// 3. 呼び出し式を組み立てて評価
/// 4. 評価結果をJSON値に変換
/// 5. `TransformResponse`としてデコード
/// 6. `error`が空でなければ行を拒否
/// 7. `source`を再シリアライズしたものが結果
pub fn apply_transform<E: Evaluator>(
    evaluator: &mut E,
    function: &str,
    row: usize,
    record: &Record,
) -> Result<String, Xlsx2JsonError> {
    let src =
        serde_json::to_string(record).map_err(|source| Xlsx2JsonError::Encoding { row, source })?;

    if function.is_empty() {
        return Ok(src);
    }

    let invocation = evaluator.invocation(function, &src);
    trace!(row, function, "evaluating transform");

    let value = evaluator
        .evaluate(&invocation)
        .map_err(|e| Xlsx2JsonError::Eval {
            row,
            function: function.to_string(),
            message: e.to_string(),
        })?;

    let exported = evaluator.export(value).map_err(|e| Xlsx2JsonError::Export {
        row,
        function: function.to_string(),
        message: e.to_string(),
    })?;

    let response =
        TransformResponse::deserialize(&exported).map_err(|e| Xlsx2JsonError::ResponseShape {
            row,
            response: exported.to_string(),
            reason: e.to_string(),
        })?;

    if let Some(message) = response.rejection() {
        return Err(Xlsx2JsonError::RowRejected {
            row,
            message: message.to_string(),
        });
    }

    let source = response
        .source
        .ok_or_else(|| Xlsx2JsonError::ResponseShape {
            row,
            response: exported.to_string(),
            reason: "missing field `source`".to_string(),
        })?;

    serde_json::to_string(&source).map_err(|source| Xlsx2JsonError::Encoding { row, source })
}
