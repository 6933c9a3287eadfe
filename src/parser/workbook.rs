//! Workbook Parser
//!
//! calamineのラッパーとして、ワークブックレベルの操作を提供します。

use calamine::{open_workbook_auto_from_rs, Reader, Sheets};
use std::io::{Cursor, Read};
use std::path::Path;

use crate::error::Xlsx2JsonError;
use crate::formatter::CellFormatter;
use crate::types::CellValue;

/// ワークブックパーサー
///
/// 入力全体をメモリに読み込み、calamineで形式を自動判別して開きます
/// （XLSX / XLSM / XLSB / XLS / ODS）。
pub(crate) struct WorkbookParser {
    /// calamineのワークブック
    workbook: Sheets<Cursor<Vec<u8>>>,
}

impl WorkbookParser {
    /// ファイルパスからワークブックを開く
    ///
    /// # 引数
    ///
    /// * `path` - ワークブックのファイルパス
    /// * `max_input_size` - 入力ファイルの最大サイズ（バイト）
    ///
    /// # 戻り値
    ///
    /// * `Ok(WorkbookParser)` - ワークブックの読み込みに成功した場合
    /// * `Err(Xlsx2JsonError::Open)` - ファイルを読み込めない場合
    /// * `Err(Xlsx2JsonError::Parse)` - ワークブックとして解析できない場合
    /// * `Err(Xlsx2JsonError::SecurityViolation)` - サイズ制限を超えた場合
    pub fn open_path(path: &Path, max_input_size: u64) -> Result<Self, Xlsx2JsonError> {
        let open_error = |source: std::io::Error| Xlsx2JsonError::Open {
            path: path.display().to_string(),
            source,
        };

        let size = std::fs::metadata(path).map_err(&open_error)?.len();
        check_input_size(size, max_input_size)?;

        let buffer = std::fs::read(path).map_err(&open_error)?;
        Self::open_buffer(buffer)
    }

    /// リーダーからワークブックを開く
    ///
    /// 上限を1バイト超えるまでしか読み込まないため、巨大な入力でもメモリを使い切りません。
    pub fn open_reader<R: Read>(reader: R, max_input_size: u64) -> Result<Self, Xlsx2JsonError> {
        let mut buffer = Vec::new();
        let bytes_read = reader
            .take(max_input_size.saturating_add(1))
            .read_to_end(&mut buffer)?;
        check_input_size(bytes_read as u64, max_input_size)?;

        Self::open_buffer(buffer)
    }

    fn open_buffer(buffer: Vec<u8>) -> Result<Self, Xlsx2JsonError> {
        let workbook = open_workbook_auto_from_rs(Cursor::new(buffer))?;
        Ok(Self { workbook })
    }

    /// すべてのシート名をワークブック内の順序で取得
    pub fn sheet_names(&self) -> Vec<String> {
        self.workbook.sheet_names()
    }

    /// インデックス（0始まり）でシートを選択し、シート名を返す
    ///
    /// # 戻り値
    ///
    /// * `Ok(String)` - 選択されたシート名
    /// * `Err(Xlsx2JsonError::SheetNotFound)` - インデックスが範囲外の場合
    pub fn select_sheet(&self, index: usize) -> Result<String, Xlsx2JsonError> {
        let names = self.sheet_names();
        let total = names.len();
        names
            .into_iter()
            .nth(index)
            .ok_or(Xlsx2JsonError::SheetNotFound { index, total })
    }

    /// シートの各行をセルテキストの並びとして取り出す
    ///
    /// 戻り値の添字はシート上の位置（A1が行0・列0）と一致します。calamineの範囲は
    /// 最初の非空セルから始まるため、その手前の空行と各行の先頭の空セルを補います。
    ///
    /// 範囲は矩形（使用範囲の幅で空セル埋め）なので、各行の末尾の空セルを取り除きます。
    /// 行の長さは「最後の非空セルの列 + 1」になり、途中の空セルは空文字列として残ります。
    /// 空セルだけの行は空の`Vec`になります。
    pub fn read_rows(
        &mut self,
        sheet_name: &str,
        formatter: &CellFormatter,
    ) -> Result<Vec<Vec<String>>, Xlsx2JsonError> {
        let range = self.workbook.worksheet_range(sheet_name)?;
        let Some((first_row, first_col)) = range.start() else {
            return Ok(Vec::new());
        };

        let mut rows: Vec<Vec<String>> = vec![Vec::new(); first_row as usize];
        rows.extend(range.rows().map(|row| {
            let values: Vec<CellValue> = row.iter().map(CellValue::from).collect();
            let len = values
                .iter()
                .rposition(|value| !value.is_empty())
                .map_or(0, |last| last + 1);
            if len == 0 {
                return Vec::new();
            }
            std::iter::repeat(String::new())
                .take(first_col as usize)
                .chain(values[..len].iter().map(|value| formatter.format_cell(value)))
                .collect()
        }));

        Ok(rows)
    }
}

/// 入力サイズの上限チェック
fn check_input_size(size: u64, max_input_size: u64) -> Result<(), Xlsx2JsonError> {
    if size > max_input_size {
        return Err(Xlsx2JsonError::SecurityViolation(format!(
            "Input file size exceeds maximum: {} bytes (max: {} bytes)",
            size, max_input_size
        )));
    }
    Ok(())
}


// シートの読み込みは実際のワークブックが必要なため、統合テスト（tests/）で検証します。
