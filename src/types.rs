//! Types Module
//!
//! クレート全体で使用する共通データ型を定義するモジュール。

use std::collections::BTreeMap;

use calamine::Data;
use chrono::NaiveDateTime;
use serde::Deserialize;

/// 1データ行分のレコード（列名 → セルテキスト）
///
/// キー順序はJSON出力上の意味を持ちませんが、`BTreeMap`により出力は決定的になります。
pub type Record = BTreeMap<String, String>;

/// セルの値を表す列挙型
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum CellValue {
    /// 数値（f64）
    Number(f64),

    /// 文字列
    String(String),

    /// 論理値
    Bool(bool),

    /// 日付・日時
    DateTime(NaiveDateTime),

    /// 期間（シリアル値のまま保持）
    Duration(f64),

    /// エラー値（例: #DIV/0!）
    Error(String),

    /// 空セル
    Empty,
}

impl CellValue {
    /// 値が空かどうかを判定
    pub fn is_empty(&self) -> bool {
        match self {
            CellValue::Empty => true,
            CellValue::String(s) => s.is_empty(),
            _ => false,
        }
    }
}

impl From<&Data> for CellValue {
    fn from(cell: &Data) -> Self {
        match cell {
            Data::Int(i) => CellValue::Number(*i as f64),
            Data::Float(f) => CellValue::Number(*f),
            Data::String(s) => CellValue::String(s.clone()),
            Data::Bool(b) => CellValue::Bool(*b),
            Data::DateTime(dt) => {
                if dt.is_duration() {
                    CellValue::Duration(dt.as_f64())
                } else {
                    match dt.as_datetime() {
                        Some(value) => CellValue::DateTime(value),
                        None => CellValue::Number(dt.as_f64()),
                    }
                }
            }
            // ISO形式の日付・期間文字列（ODS由来）はそのまま文字列として扱う
            Data::DateTimeIso(s) | Data::DurationIso(s) => CellValue::String(s.clone()),
            Data::Error(e) => CellValue::Error(e.to_string()),
            Data::Empty => CellValue::Empty,
        }
    }
}

/// 変換関数の戻り値
///
/// 変換関数は`{ path?: string, source: object, error?: string }`の形の値を返す必要があります。
/// 余分なフィールドは無視されます。`error`が空でない場合、その行は拒否されます。
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct TransformResponse {
    /// パス（コアでは使用しないが、ワイヤ契約の一部）
    #[serde(default)]
    pub path: Option<String>,

    /// 変換後のレコード
    #[serde(default)]
    pub source: Option<serde_json::Map<String, serde_json::Value>>,

    /// エラーメッセージ（空または未指定の場合は成功）
    #[serde(default)]
    pub error: Option<String>,
}

impl TransformResponse {
    /// 行の拒否メッセージを取得（空文字列は成功として扱う）
    pub fn rejection(&self) -> Option<&str> {
        self.error.as_deref().filter(|message| !message.is_empty())
    }
}
