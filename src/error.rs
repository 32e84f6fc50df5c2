use thiserror::Error;

#[derive(Error, Debug)]
pub enum TenderCompareError {
    #[error("設定エラー: {0}")]
    Config(String),

    #[error("埋め込みコマンドが設定されていません。`tender-compare config --set-embed-command CMD` または環境変数 TENDER_COMPARE_EMBED_COMMAND で設定してください")]
    MissingEmbedCommand,

    #[error("ファイルが見つかりません: {0}")]
    FileNotFound(String),

    #[error("Excel読み込みエラー: {0}")]
    Workbook(String),

    #[error("シートが見つかりません: {0}")]
    SheetNotFound(String),

    #[error("列が見つかりません: {0}")]
    ColumnNotFound(String),

    #[error("埋め込み生成に失敗: {0}")]
    EmbeddingFailed(String),

    #[error("埋め込み生成がタイムアウトしました ({0}秒)")]
    EmbeddingTimeout(u64),

    #[error("埋め込み出力のパースに失敗: {0}")]
    EmbeddingParse(String),

    #[error("Excel生成エラー: {0}")]
    ExcelGeneration(String),

    #[error("JSON解析エラー: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("IOエラー: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Common(#[from] tender_compare_common::Error),
}

impl From<calamine::Error> for TenderCompareError {
    fn from(e: calamine::Error) -> Self {
        TenderCompareError::Workbook(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, TenderCompareError>;
