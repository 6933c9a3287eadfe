//! Builder Module
//!
//! Fluent Builder APIを提供し、`Exporter`インスタンスを段階的に構築する。

use chrono::format::{Item, StrftimeItems};
use std::io::Read;
use std::path::Path;
use tracing::debug;

use crate::api::DateFormat;
use crate::error::Xlsx2JsonError;
use crate::formatter::CellFormatter;
use crate::mapper::map_rows;
use crate::parser::WorkbookParser;
use crate::pipeline::apply_transform;
use crate::script::Evaluator;

/// 入力ファイルサイズの既定の上限（2GB）
pub(crate) const DEFAULT_MAX_INPUT_SIZE: u64 = 2 * 1024 * 1024 * 1024;

/// エクスポート処理の設定を保持する内部構造体
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ExportConfig {
    /// シートのインデックス（0始まり）
    pub sheet_index: usize,

    /// 変換関数名（Noneの場合は変換しない）
    pub transform: Option<String>,

    /// 日付形式
    pub date_format: DateFormat,

    /// 入力ファイルの最大サイズ（バイト）
    pub max_input_size: u64,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            sheet_index: 0,
            transform: None,
            date_format: DateFormat::Iso8601,
            max_input_size: DEFAULT_MAX_INPUT_SIZE,
        }
    }
}

/// Fluent Builder APIを提供する構造体
///
/// `Exporter`インスタンスを段階的に構築するためのビルダーです。
/// すべての設定項目にデフォルト値が設定されており、必要な設定のみをオーバーライドできます。
///
/// # 使用例
///
/// ```rust
/// use xlsx2json::ExporterBuilder;
///
/// # fn main() -> Result<(), xlsx2json::Xlsx2JsonError> {
/// let exporter = ExporterBuilder::new()
///     .with_sheet_index(1)
///     .with_transform("normalize")
///     .build()?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct ExporterBuilder {
    /// 内部設定（構築中）
    config: ExportConfig,
}

impl Default for ExporterBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ExporterBuilder {
    /// デフォルト設定を持つビルダーインスタンスを生成する
    ///
    /// # デフォルト設定
    ///
    /// - シート: 先頭のシート（インデックス0）
    /// - 変換関数: なし
    /// - 日付形式: ISO 8601 (YYYY-MM-DD)
    /// - 入力サイズ上限: 2GB
    pub fn new() -> Self {
        Self {
            config: ExportConfig::default(),
        }
    }

    /// エクスポート対象のシートをインデックス（0始まり）で指定する
    pub fn with_sheet_index(mut self, index: usize) -> Self {
        self.config.sheet_index = index;
        self
    }

    /// 各レコードに適用する変換関数名を指定する
    ///
    /// 関数名は`[A-Za-z_][A-Za-z0-9_]*`の識別子でなければなりません。関数名は評価する
    /// ソースにそのまま埋め込まれるため、`build()`の時点で検証し、識別子でない名前は
    /// `Xlsx2JsonError::Config`になります。識別子として正しいが定義されていない関数名は、
    /// 最初の行の評価時に`Xlsx2JsonError::Eval`になります。
    /// 空文字列は「変換しない」と同じ意味になります。
    ///
    /// # 使用例
    ///
    /// ```rust
    /// use xlsx2json::ExporterBuilder;
    ///
    /// let builder = ExporterBuilder::new().with_transform("normalize");
    /// ```
    pub fn with_transform(mut self, function: impl Into<String>) -> Self {
        let function = function.into();
        self.config.transform = if function.is_empty() {
            None
        } else {
            Some(function)
        };
        self
    }

    /// 日付の出力形式を指定する
    ///
    /// # 使用例
    ///
    /// ```rust
    /// use xlsx2json::{DateFormat, ExporterBuilder};
    ///
    /// // ISO 8601形式（デフォルト）
    /// let builder = ExporterBuilder::new()
    ///     .with_date_format(DateFormat::Iso8601);
    ///
    /// // カスタム形式
    /// let builder = ExporterBuilder::new()
    ///     .with_date_format(DateFormat::Custom("%Y年%m月%d日".to_string()));
    /// ```
    pub fn with_date_format(mut self, format: DateFormat) -> Self {
        self.config.date_format = format;
        self
    }

    /// 入力ファイルの最大サイズ（バイト）を指定する
    ///
    /// 上限を超える入力は`Xlsx2JsonError::SecurityViolation`になります。
    pub fn with_max_input_size(mut self, bytes: u64) -> Self {
        self.config.max_input_size = bytes;
        self
    }

    /// 設定を検証し、`Exporter`インスタンスを生成する
    ///
    /// # 戻り値
    ///
    /// * `Ok(Exporter)`: 設定が有効な場合、Exporterインスタンス
    /// * `Err(Xlsx2JsonError::Config)`: 設定が無効な場合
    ///
    /// # 発生し得るエラー
    ///
    /// * `Xlsx2JsonError::Config(String)`: 設定の検証に失敗した場合
    ///   * 変換関数名が識別子ではない
    ///   * カスタム日付形式が空、または不正な書式文字列
    ///   * 入力サイズ上限が0
    pub fn build(self) -> Result<Exporter, Xlsx2JsonError> {
        // 1. 変換関数名の検証
        if let Some(ref function) = self.config.transform {
            if !is_function_name(function) {
                return Err(Xlsx2JsonError::Config(format!(
                    "Invalid transform function name: '{}'",
                    function
                )));
            }
        }

        // 2. カスタム日付形式の検証
        if let DateFormat::Custom(ref format_str) = self.config.date_format {
            let malformed = StrftimeItems::new(format_str).any(|item| matches!(item, Item::Error));
            if format_str.is_empty() || malformed {
                return Err(Xlsx2JsonError::Config(format!(
                    "Invalid date format string: '{}'",
                    format_str
                )));
            }
        }

        // 3. サイズ上限の検証
        if self.config.max_input_size == 0 {
            return Err(Xlsx2JsonError::Config(
                "Maximum input size must be greater than zero".to_string(),
            ));
        }

        Ok(Exporter::new(self.config))
    }
}

/// `[A-Za-z_][A-Za-z0-9_]*`に一致するかどうか
fn is_function_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        _ => false,
    }
}

/// エクスポート処理のファサード
///
/// ワークブックの1シートを、1データ行につき1つのJSONオブジェクト文字列に変換します。
/// 結果は行の順序を保ち、いずれかの行で失敗した場合はエラーのみを返します。
///
/// # 使用例
///
/// ```rust,no_run
/// use xlsx2json::{ExporterBuilder, NoScript};
///
/// # fn main() -> Result<(), xlsx2json::Xlsx2JsonError> {
/// let exporter = ExporterBuilder::new().build()?;
/// for object in exporter.export(&mut NoScript, "people.xlsx")? {
///     println!("{}", object);
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct Exporter {
    /// エクスポート設定
    config: ExportConfig,

    /// セルフォーマッター
    formatter: CellFormatter,
}

impl Exporter {
    pub(crate) fn new(config: ExportConfig) -> Self {
        Self {
            formatter: CellFormatter::new(config.date_format.clone()),
            config,
        }
    }

    /// ファイルパスのワークブックをエクスポートする
    ///
    /// # 引数
    ///
    /// * `evaluator` - 変換関数を実行するスクリプトランタイム（実行中は排他的に借用）
    /// * `path` - ワークブックのファイルパス
    ///
    /// # 戻り値
    ///
    /// * `Ok(Vec<String>)` - データ行ごとのJSONオブジェクト（行の順序どおり）
    /// * `Err(Xlsx2JsonError)` - エラーが発生した場合
    ///
    /// # 処理フロー
    ///
    /// 1. ワークブックを開く
    /// 2. シート選択
    /// 3. 行をレコードに変換
    /// 4. 各レコードに変換関数を適用（最初の失敗で中断）
    pub fn export<E: Evaluator>(
        &self,
        evaluator: &mut E,
        path: impl AsRef<Path>,
    ) -> Result<Vec<String>, Xlsx2JsonError> {
        let path = path.as_ref();
        let parser = WorkbookParser::open_path(path, self.config.max_input_size)?;
        debug!(path = %path.display(), "workbook opened");
        self.export_workbook(evaluator, parser)
    }

    /// リーダーから読み込んだワークブックをエクスポートする
    ///
    /// メモリ上のバッファなど、ファイル以外の入力に使用します。
    ///
    /// # 使用例
    ///
    /// ```rust,no_run
    /// use std::io::Cursor;
    /// use xlsx2json::{ExporterBuilder, NoScript};
    ///
    /// # fn main() -> Result<(), xlsx2json::Xlsx2JsonError> {
    /// let exporter = ExporterBuilder::new().build()?;
    /// let excel_data: Vec<u8> = vec![]; // Excelファイルのバイト列
    /// let objects = exporter.export_reader(&mut NoScript, Cursor::new(excel_data))?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn export_reader<E: Evaluator, R: Read>(
        &self,
        evaluator: &mut E,
        reader: R,
    ) -> Result<Vec<String>, Xlsx2JsonError> {
        let parser = WorkbookParser::open_reader(reader, self.config.max_input_size)?;
        debug!("workbook opened from reader");
        self.export_workbook(evaluator, parser)
    }

    /// ワークブックのシート名をワークブック内の順序で取得する
    pub fn sheet_names(&self, path: impl AsRef<Path>) -> Result<Vec<String>, Xlsx2JsonError> {
        let parser = WorkbookParser::open_path(path.as_ref(), self.config.max_input_size)?;
        Ok(parser.sheet_names())
    }

    fn export_workbook<E: Evaluator>(
        &self,
        evaluator: &mut E,
        mut parser: WorkbookParser,
    ) -> Result<Vec<String>, Xlsx2JsonError> {
        let sheet_name = parser.select_sheet(self.config.sheet_index)?;
        debug!(index = self.config.sheet_index, sheet = %sheet_name, "sheet selected");

        let rows = parser.read_rows(&sheet_name, &self.formatter)?;
        let records = map_rows(&rows);
        debug!(rows = rows.len(), records = records.len(), "rows mapped");

        let function = self.config.transform.as_deref().unwrap_or("");

        // データ行はシートの1行目から始まる
        let objects = records
            .iter()
            .enumerate()
            .map(|(index, record)| apply_transform(&mut *evaluator, function, index + 1, record))
            .collect::<Result<Vec<_>, _>>()?;

        debug!(objects = objects.len(), "export finished");
        Ok(objects)
    }
}
