//! Formatter Module
//!
//! セル値をレコード用のテキストに変換するモジュール。

use chrono::{NaiveDateTime, Timelike};

use crate::api::DateFormat;
use crate::types::CellValue;

/// セルフォーマッター
///
/// セル値のテキスト化のファサードとして機能します。
#[derive(Debug, Clone, Default)]
pub(crate) struct CellFormatter {
    /// 日付フォーマッター
    date_formatter: DateFormatter,
}

impl CellFormatter {
    /// 新しいCellFormatterインスタンスを生成
    pub fn new(date_format: DateFormat) -> Self {
        Self {
            date_formatter: DateFormatter { date_format },
        }
    }

    /// セル値をテキストに変換
    ///
    /// 空セルは空文字列になります。数値は`f64`の表示形式（`30.0` → `30`）、
    /// 論理値は`TRUE`/`FALSE`、エラー値はExcelのエラーコードになります。
    pub fn format_cell(&self, value: &CellValue) -> String {
        match value {
            CellValue::Number(n) | CellValue::Duration(n) => n.to_string(),
            CellValue::String(s) => s.clone(),
            CellValue::Bool(true) => "TRUE".to_string(),
            CellValue::Bool(false) => "FALSE".to_string(),
            CellValue::DateTime(dt) => self.date_formatter.format(dt),
            CellValue::Error(e) => e.clone(),
            CellValue::Empty => String::new(),
        }
    }
}

/// 日付フォーマッター
#[derive(Debug, Clone, Default)]
pub(crate) struct DateFormatter {
    date_format: DateFormat,
}

impl DateFormatter {
    /// 日時値をフォーマット
    ///
    /// `Iso8601`の場合、時刻成分が0時ちょうどなら日付のみを出力します。
    /// カスタム形式はビルダーで検証済みであることを前提とします。
    pub fn format(&self, value: &NaiveDateTime) -> String {
        match &self.date_format {
            DateFormat::Iso8601 => {
                if value.num_seconds_from_midnight() == 0 && value.nanosecond() == 0 {
                    value.format("%Y-%m-%d").to_string()
                } else {
                    value.format("%Y-%m-%d %H:%M:%S").to_string()
                }
            }
            DateFormat::Custom(format_str) => value.format(format_str).to_string(),
        }
    }
}
