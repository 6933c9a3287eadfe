//! Row Mapper Module
//!
//! シートの行を、ヘッダー行の列名をキーとするレコードに変換するモジュール。
//!
//! - 0行目はヘッダーとして列名の並び（[`ColumnNames`]）になり、レコードは生成しません。
//! - 1行目以降は、列位置`c`のセルを`ColumnNames[c]`をキーとしてレコードに格納します。
//! - ヘッダーより多いセルを持つ行では、列名`column_<c+1>`を初出時に生成して末尾に追加します。
//!   追加された列名は以降のすべての行で有効です。
//! - ヘッダーより少ないセルの行では、足りないキーはレコードに含まれません。

use crate::types::Record;

/// 列名の並び
///
/// 長さは増えるのみで、減ることはありません。各列名は初めて現れた位置に対応します。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnNames {
    names: Vec<String>,
}

impl ColumnNames {
    /// ヘッダー行のセルテキストから列名を構築
    pub fn from_header<I, S>(cells: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            names: cells.into_iter().map(Into::into).collect(),
        }
    }

    /// 列位置に対応する列名を取得する
    ///
    /// 既知の列数を超える位置の場合は`column_<位置+1>`を生成して追加します。
    pub fn name_for(&mut self, col: usize) -> &str {
        while self.names.len() <= col {
            let synthesized = format!("column_{}", self.names.len() + 1);
            self.names.push(synthesized);
        }
        &self.names[col]
    }

    /// 列数
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// 列名が一つもないかどうか
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// 列名のスライス
    pub fn as_slice(&self) -> &[String] {
        &self.names
    }
}

/// 行をレコードに変換するマッパー
///
/// 行は先頭から順に与える必要があります。最初に与えられた行がヘッダーになります。
#[derive(Debug, Default)]
pub struct RowMapper {
    columns: Option<ColumnNames>,
}

impl RowMapper {
    pub fn new() -> Self {
        Self::default()
    }

    /// 1行を処理する
    ///
    /// ヘッダー行の場合は列名を記録して`None`を返し、データ行の場合はレコードを返します。
    /// 同じ列名が複数ある場合は、後の列の値が前の列の値を上書きします。
    pub fn map_row<S: AsRef<str>>(&mut self, cells: &[S]) -> Option<Record> {
        if self.columns.is_none() {
            self.columns = Some(ColumnNames::from_header(
                cells.iter().map(|cell| cell.as_ref().to_string()),
            ));
            return None;
        }
        let columns = self.columns.as_mut()?;

        let mut record = Record::new();
        for (col, cell) in cells.iter().enumerate() {
            let name = columns.name_for(col).to_string();
            record.insert(name, cell.as_ref().to_string());
        }
        Some(record)
    }

    /// これまでに確定した列名（ヘッダー行の処理前は空）
    pub fn columns(&self) -> &[String] {
        self.columns
            .as_ref()
            .map(ColumnNames::as_slice)
            .unwrap_or_default()
    }
}

/// シート全体の行をレコードの並びに変換する
///
/// データ行ごとに1つのレコードを、入力と同じ順序で返します。ヘッダー行は含まれません。
pub fn map_rows<S: AsRef<str>>(rows: &[Vec<S>]) -> Vec<Record> {
    let mut mapper = RowMapper::new();
    rows.iter().filter_map(|row| mapper.map_row(row)).collect()
}
