//! Parser Module
//!
//! calamineを使用したワークブック解析の基礎実装。
//! シートの行をセルテキストの並びとして取り出します。

mod workbook;

pub(crate) use workbook::WorkbookParser;
