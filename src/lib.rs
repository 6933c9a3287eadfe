//! xlsx2json - Export spreadsheet rows as JSON objects, with an optional script transform
//!
//! This crate reads one sheet of a workbook (XLSX / XLSM / XLSB / XLS / ODS), treats its
//! first row as a header, and turns every following row into a JSON object keyed by the
//! header names. Each object can be passed through a user-supplied transform function
//! running in an embedded scripting runtime, which may rewrite the object or reject the row.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use xlsx2json::NoScript;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Export the first sheet without a transform
//!     for object in xlsx2json::run(&mut NoScript, "people.xlsx", 0, "")? {
//!         println!("{}", object);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! A sheet like
//!
//! | Name  | Age |
//! |-------|-----|
//! | Ada   | 30  |
//! | Grace | 85  |
//!
//! produces `{"Age":"30","Name":"Ada"}` and `{"Age":"85","Name":"Grace"}`.
//!
//! # Transforms
//!
//! The transform receives the row object and must return `#{ source: <object> }`,
//! optionally with `path` and `error`. A non-empty `error` rejects the row and aborts
//! the export.
//!
//! ```rust,no_run
//! # #[cfg(feature = "rhai")]
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use xlsx2json::RhaiEvaluator;
//!
//! let mut evaluator = RhaiEvaluator::new(
//!     r#"
//!     fn adults(row) {
//!         if parse_int(row.Age) < 18 {
//!             return #{ source: row, error: "too young" };
//!         }
//!         row.Name = row.Name.to_upper();
//!         #{ source: row }
//!     }
//!     "#,
//! )?;
//! let objects = xlsx2json::run(&mut evaluator, "people.xlsx", 0, "adults")?;
//! # Ok(())
//! # }
//! # #[cfg(not(feature = "rhai"))]
//! # fn main() {}
//! ```
//!
//! # Custom Configuration
//!
//! ```rust,no_run
//! use xlsx2json::{DateFormat, ExporterBuilder, NoScript};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let exporter = ExporterBuilder::new()
//!         .with_sheet_index(1)  // Second sheet
//!         .with_date_format(DateFormat::Custom("%Y年%m月%d日".to_string()))  // Japanese format
//!         .with_max_input_size(64 * 1024 * 1024)
//!         .build()?;
//!
//!     let objects = exporter.export(&mut NoScript, "example.xlsx")?;
//!     println!("{} rows", objects.len());
//!     Ok(())
//! }
//! ```

mod api;
mod builder;
mod error;
mod formatter;
mod mapper;
mod parser;
mod pipeline;
mod script;
mod types;

use std::path::Path;

// 公開API
pub use api::DateFormat;
pub use builder::{Exporter, ExporterBuilder};
pub use error::Xlsx2JsonError;
pub use mapper::{map_rows, ColumnNames, RowMapper};
pub use pipeline::apply_transform;
pub use script::{Evaluator, NoScript, ScriptError};
pub use types::{Record, TransformResponse};

#[cfg(feature = "rhai")]
pub use script::RhaiEvaluator;

/// ワークブックの1シートをJSONオブジェクトの並びとしてエクスポートする
///
/// # 引数
///
/// * `evaluator` - 変換関数を実行するスクリプトランタイム（実行中は排他的に借用）
/// * `path` - ワークブックのファイルパス
/// * `sheet_index` - シートのインデックス（0始まり）
/// * `transform` - 変換関数名（空文字列の場合は変換しない）
///
/// # 戻り値
///
/// * `Ok(Vec<String>)` - データ行ごとのJSONオブジェクト（行の順序どおり）
/// * `Err(Xlsx2JsonError)` - いずれかの段階で失敗した場合（部分的な結果は返しません）
///
/// 既定の設定でのエクスポートです。日付形式などを変更する場合は[`ExporterBuilder`]を使用してください。
pub fn run<E: Evaluator>(
    evaluator: &mut E,
    path: impl AsRef<Path>,
    sheet_index: usize,
    transform: &str,
) -> Result<Vec<String>, Xlsx2JsonError> {
    ExporterBuilder::new()
        .with_sheet_index(sheet_index)
        .with_transform(transform)
        .build()?
        .export(evaluator, path)
}

/// ワークブックのシート名をワークブック内の順序で取得する
pub fn list_sheets(path: impl AsRef<Path>) -> Result<Vec<String>, Xlsx2JsonError> {
    ExporterBuilder::new().build()?.sheet_names(path)
}
