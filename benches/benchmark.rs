//! パフォーマンスベンチマーク
//!
//! 行数の異なるワークブックをメモリ上に生成し、エクスポート処理の速度を測定します。
//!
//! - `export_plain`: 変換関数なし
//! - `export_rhai`: Rhaiの変換関数を各行に適用
//! - `map_rows`: 行からレコードへの変換のみ

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rust_xlsxwriter::{Workbook, XlsxError};
use std::io::Cursor;
use xlsx2json::{map_rows, ExporterBuilder, NoScript};

const ROW_COUNTS: [u32; 3] = [100, 1_000, 10_000];

/// 5列（文字列・数値混在）のワークブックを生成
fn generate_workbook(rows: u32) -> Result<Vec<u8>, XlsxError> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();

    for (col, name) in ["Id", "Name", "Email", "Score", "Note"].iter().enumerate() {
        worksheet.write_string(0, col as u16, *name)?;
    }
    for row in 1..=rows {
        worksheet.write_number(row, 0, row as f64)?;
        worksheet.write_string(row, 1, format!("user{}", row))?;
        worksheet.write_string(row, 2, format!("user{}@example.com", row))?;
        worksheet.write_number(row, 3, (row % 100) as f64 + 0.5)?;
        worksheet.write_string(row, 4, "lorem ipsum dolor sit amet")?;
    }

    workbook.save_to_buffer()
}

fn benchmark_export_plain(c: &mut Criterion) {
    let exporter = ExporterBuilder::new().build().unwrap();

    let mut group = c.benchmark_group("export_plain");
    for rows in ROW_COUNTS {
        let data = generate_workbook(rows).unwrap();
        group.throughput(Throughput::Elements(rows as u64));
        group.bench_with_input(BenchmarkId::from_parameter(rows), &data, |b, data| {
            b.iter(|| {
                let objects = exporter
                    .export_reader(&mut NoScript, Cursor::new(black_box(data)))
                    .unwrap();
                black_box(objects)
            });
        });
    }
    group.finish();
}

#[cfg(feature = "rhai")]
fn benchmark_export_rhai(c: &mut Criterion) {
    use xlsx2json::RhaiEvaluator;

    let exporter = ExporterBuilder::new()
        .with_transform("enrich")
        .build()
        .unwrap();
    let mut evaluator = RhaiEvaluator::new(
        r#"
        fn enrich(row) {
            row.Name = row.Name.to_upper();
            row.domain = row.Email.split("@")[1];
            #{ source: row }
        }
        "#,
    )
    .unwrap();

    let mut group = c.benchmark_group("export_rhai");
    group.sample_size(10);
    for rows in ROW_COUNTS {
        let data = generate_workbook(rows).unwrap();
        group.throughput(Throughput::Elements(rows as u64));
        group.bench_with_input(BenchmarkId::from_parameter(rows), &data, |b, data| {
            b.iter(|| {
                let objects = exporter
                    .export_reader(&mut evaluator, Cursor::new(black_box(data)))
                    .unwrap();
                black_box(objects)
            });
        });
    }
    group.finish();
}

#[cfg(not(feature = "rhai"))]
fn benchmark_export_rhai(_c: &mut Criterion) {}

fn benchmark_map_rows(c: &mut Criterion) {
    let rows: Vec<Vec<String>> = std::iter::once(vec!["a".to_string(), "b".to_string()])
        .chain((0..10_000).map(|i| vec![i.to_string(), format!("v{}", i), "extra".to_string()]))
        .collect();

    c.bench_function("map_rows_10000", |b| {
        b.iter(|| black_box(map_rows(black_box(&rows))));
    });
}

criterion_group!(
    benches,
    benchmark_export_plain,
    benchmark_export_rhai,
    benchmark_map_rows
);
criterion_main!(benches);
