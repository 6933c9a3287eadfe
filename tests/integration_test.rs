//! Integration Tests for xlsx2json
//!
//! ワークブックをrust_xlsxwriterでメモリ上に生成し、一時ファイル経由でエクスポートする。

use rust_xlsxwriter::*;
use std::io::{Cursor, Write};
use tempfile::NamedTempFile;
use xlsx2json::{DateFormat, ExporterBuilder, NoScript, Xlsx2JsonError};

// Helper module for generating test fixtures
mod fixtures {
    use super::*;

    /// Name/Age の2列、2データ行
    pub fn generate_people() -> Result<Vec<u8>, XlsxError> {
        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();

        worksheet.write_string(0, 0, "Name")?;
        worksheet.write_string(0, 1, "Age")?;

        worksheet.write_string(1, 0, "Ada")?;
        worksheet.write_number(1, 1, 30.0)?;

        worksheet.write_string(2, 0, "Grace")?;
        worksheet.write_number(2, 1, 85.0)?;

        Ok(workbook.save_to_buffer()?)
    }

    /// 3シートのワークブック（各シートは見出し1列と1データ行）
    pub fn generate_multi_sheets() -> Result<Vec<u8>, XlsxError> {
        let mut workbook = Workbook::new();

        for name in ["First", "Second", "Third"] {
            let sheet = workbook.add_worksheet();
            sheet.set_name(name)?;
            sheet.write_string(0, 0, "Sheet")?;
            sheet.write_string(1, 0, name)?;
        }

        Ok(workbook.save_to_buffer()?)
    }

    /// 数値・真偽値・日付のセル
    pub fn generate_typed_cells() -> Result<Vec<u8>, XlsxError> {
        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();
        let date_format = Format::new().set_num_format("yyyy-mm-dd");

        worksheet.write_string(0, 0, "Int")?;
        worksheet.write_string(0, 1, "Float")?;
        worksheet.write_string(0, 2, "Flag")?;
        worksheet.write_string(0, 3, "Date")?;

        worksheet.write_number(1, 0, 42.0)?;
        worksheet.write_number(1, 1, 3.5)?;
        worksheet.write_boolean(1, 2, true)?;
        // シリアル値45366 = 2024-03-15
        worksheet.write_number_with_format(1, 3, 45366.0, &date_format)?;

        Ok(workbook.save_to_buffer()?)
    }

    /// バッファを一時ファイルに書き出す
    pub fn to_temp_file(data: &[u8]) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(data).unwrap();
        file.flush().unwrap();
        file
    }
}

#[test]
fn test_name_age_example() {
    let file = fixtures::to_temp_file(&fixtures::generate_people().unwrap());

    let objects = xlsx2json::run(&mut NoScript, file.path(), 0, "").unwrap();

    assert_eq!(
        objects,
        vec![
            r#"{"Age":"30","Name":"Ada"}"#.to_string(),
            r#"{"Age":"85","Name":"Grace"}"#.to_string(),
        ]
    );
}

#[test]
fn test_header_is_never_emitted() {
    let file = fixtures::to_temp_file(&fixtures::generate_people().unwrap());

    let objects = xlsx2json::run(&mut NoScript, file.path(), 0, "").unwrap();

    assert!(objects.iter().all(|o| !o.contains(r#""Name":"Name""#)));
    assert_eq!(objects.len(), 2);
}

#[test]
fn test_export_reader_matches_export() {
    let data = fixtures::generate_people().unwrap();
    let file = fixtures::to_temp_file(&data);
    let exporter = ExporterBuilder::new().build().unwrap();

    let from_path = exporter.export(&mut NoScript, file.path()).unwrap();
    let from_reader = exporter
        .export_reader(&mut NoScript, Cursor::new(data))
        .unwrap();

    assert_eq!(from_path, from_reader);
}

#[test]
fn test_select_sheet_by_index() {
    let file = fixtures::to_temp_file(&fixtures::generate_multi_sheets().unwrap());

    let objects = xlsx2json::run(&mut NoScript, file.path(), 2, "").unwrap();

    assert_eq!(objects, vec![r#"{"Sheet":"Third"}"#.to_string()]);
}

#[test]
fn test_sheet_not_found_then_valid_call_succeeds() {
    let file = fixtures::to_temp_file(&fixtures::generate_multi_sheets().unwrap());

    let result = xlsx2json::run(&mut NoScript, file.path(), 3, "");
    match result {
        Err(Xlsx2JsonError::SheetNotFound { index, total }) => {
            assert_eq!(index, 3);
            assert_eq!(total, 3);
        }
        other => panic!("Expected SheetNotFound error, got {:?}", other),
    }

    let objects = xlsx2json::run(&mut NoScript, file.path(), 0, "").unwrap();
    assert_eq!(objects, vec![r#"{"Sheet":"First"}"#.to_string()]);
}

#[test]
fn test_list_sheets() {
    let file = fixtures::to_temp_file(&fixtures::generate_multi_sheets().unwrap());

    let names = xlsx2json::list_sheets(file.path()).unwrap();

    assert_eq!(names, vec!["First", "Second", "Third"]);
}

#[test]
fn test_missing_file_is_open_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing.xlsx");

    let err = xlsx2json::run(&mut NoScript, &path, 0, "").unwrap_err();

    assert!(err.is_open_error());
    assert!(matches!(err, Xlsx2JsonError::Open { .. }));
    assert!(err.to_string().contains("missing.xlsx"));
}

#[test]
fn test_unparsable_file_is_open_error() {
    let file = fixtures::to_temp_file(b"this is not a spreadsheet");

    let err = xlsx2json::run(&mut NoScript, file.path(), 0, "").unwrap_err();

    assert!(err.is_open_error());
}

#[test]
fn test_typed_cells_rendering() {
    let file = fixtures::to_temp_file(&fixtures::generate_typed_cells().unwrap());

    let objects = xlsx2json::run(&mut NoScript, file.path(), 0, "").unwrap();

    assert_eq!(
        objects,
        vec![r#"{"Date":"2024-03-15","Flag":"TRUE","Float":"3.5","Int":"42"}"#.to_string()]
    );
}

#[test]
fn test_custom_date_format() {
    let file = fixtures::to_temp_file(&fixtures::generate_typed_cells().unwrap());
    let exporter = ExporterBuilder::new()
        .with_date_format(DateFormat::Custom("%d/%m/%Y".to_string()))
        .build()
        .unwrap();

    let objects = exporter.export(&mut NoScript, file.path()).unwrap();

    assert_eq!(objects.len(), 1);
    assert!(
        objects[0].contains(r#""Date":"15/03/2024""#),
        "Got: {}",
        objects[0]
    );
}

#[test]
fn test_transform_with_no_script_is_eval_error() {
    let file = fixtures::to_temp_file(&fixtures::generate_people().unwrap());

    let err = xlsx2json::run(&mut NoScript, file.path(), 0, "clean").unwrap_err();

    match err {
        Xlsx2JsonError::Eval { row, function, .. } => {
            assert_eq!(row, 1);
            assert_eq!(function, "clean");
        }
        other => panic!("Expected Eval error, got {:?}", other),
    }
}

#[test]
fn test_invalid_transform_name_is_config_error() {
    let file = fixtures::to_temp_file(&fixtures::generate_people().unwrap());

    let err = xlsx2json::run(&mut NoScript, file.path(), 0, "clean()").unwrap_err();

    assert!(matches!(err, Xlsx2JsonError::Config(_)));
}
