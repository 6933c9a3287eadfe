//! Error Types Module
//!
//! クレート全体で使用する構造化エラー型を定義するモジュール。
//! `thiserror`を使用して、エラーの自動変換とメッセージフォーマットを実現する。

use thiserror::Error;

/// xlsx2jsonクレート全体で使用するエラー型
///
/// ワークブックの読み込み、シート選択、行ごとの変換処理中に発生する
/// すべてのエラーを統一的に扱います。いずれのエラーも呼び出し全体を失敗させ、
/// 部分的な出力は返されません。
///
/// # エラーの種類
///
/// - `Open` / `Parse` / `Io`: ワークブックを開けない（読み込み失敗・解析失敗）
/// - `SheetNotFound`: 指定されたインデックスのシートが存在しない
/// - `Encoding` / `Eval` / `Export` / `ResponseShape` / `RowRejected`: 行単位の失敗
/// - `Config`: ビルダー設定の検証に失敗
/// - `SecurityViolation`: 入力サイズ制限の超過
///
/// 行単位のエラーは`row`フィールドにシート上の行番号（0始まり、ヘッダー行が0）を持ちます。
#[derive(Error, Debug)]
pub enum Xlsx2JsonError {
    /// 入力ファイルを読み込めなかったエラー
    #[error("Can't open {path}: {source}")]
    Open {
        /// 入力ファイルのパス
        path: String,
        /// 元のI/Oエラー
        #[source]
        source: std::io::Error,
    },

    /// リーダーからの読み込み中に発生したI/Oエラー
    ///
    /// `#[from]`属性により、`std::io::Error`から自動的に変換されます。
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// ワークブックの解析中に発生したエラー
    ///
    /// calamineがワークブックを解析する際に発生したエラーです。
    /// ファイル形式が不正、破損したファイルなどが原因となります。
    #[error("Failed to parse workbook: {0}")]
    Parse(#[from] calamine::Error),

    /// 指定されたインデックスのシートが存在しないエラー
    #[error("Could not find sheet no {index} (total: {total})")]
    SheetNotFound {
        /// 要求されたシートインデックス（0始まり）
        index: usize,
        /// ワークブック内のシート数
        total: usize,
    },

    /// レコードをJSONにシリアライズできなかったエラー
    #[error("row: {row}, Can't render JSON blob: {source}")]
    Encoding {
        row: usize,
        #[source]
        source: serde_json::Error,
    },

    /// 変換関数の評価に失敗したエラー（例外、未定義関数など）
    #[error("row: {row}, Can't run {function}: {message}")]
    Eval {
        row: usize,
        function: String,
        message: String,
    },

    /// スクリプトの戻り値をネイティブ値に変換できなかったエラー
    #[error("row: {row}, Can't convert value returned by {function}: {message}")]
    Export {
        row: usize,
        function: String,
        message: String,
    },

    /// 変換関数の戻り値が`{ path, source, error }`の形に合わないエラー
    #[error("row: {row}, do not understand response {response}: {reason}")]
    ResponseShape {
        row: usize,
        /// 受け取ったレスポンス（JSON）
        response: String,
        reason: String,
    },

    /// 変換関数が`error`フィールドで行を拒否したエラー
    #[error("row: {row}, {message}")]
    RowRejected { row: usize, message: String },

    /// 設定の検証に失敗したエラー
    ///
    /// `ExporterBuilder::build()`時に設定を検証し、無効な設定が検出された
    /// 場合に発生します。例えば、変換関数名が識別子でない場合や、
    /// カスタム日付形式が不正な場合などです。
    ///
    /// # 例
    ///
    /// ```rust
    /// use xlsx2json::{ExporterBuilder, Xlsx2JsonError};
    ///
    /// let result = ExporterBuilder::new()
    ///     .with_transform("not a function")
    ///     .build();
    ///
    /// assert!(matches!(result, Err(Xlsx2JsonError::Config(_))));
    /// ```
    #[error("Configuration error: {0}")]
    Config(String),

    /// セキュリティ制限に違反したエラー
    ///
    /// 入力ファイルのサイズが上限を超えた場合に発生します。
    #[error("Security violation: {0}")]
    SecurityViolation(String),
}

impl Xlsx2JsonError {
    /// エラーが発生した行番号（行単位のエラーの場合のみ）
    pub fn row(&self) -> Option<usize> {
        match self {
            Xlsx2JsonError::Encoding { row, .. }
            | Xlsx2JsonError::Eval { row, .. }
            | Xlsx2JsonError::Export { row, .. }
            | Xlsx2JsonError::ResponseShape { row, .. }
            | Xlsx2JsonError::RowRejected { row, .. } => Some(*row),
            _ => None,
        }
    }

    /// ワークブックを開く段階のエラーかどうか
    pub fn is_open_error(&self) -> bool {
        matches!(
            self,
            Xlsx2JsonError::Open { .. } | Xlsx2JsonError::Io(_) | Xlsx2JsonError::Parse(_)
        )
    }
}
