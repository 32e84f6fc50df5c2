//! エラー型定義

use thiserror::Error;

/// 共通エラー型
#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Embedding error: {0}")]
    Embedding(String),

    #[error("Embedding count mismatch: expected {expected}, got {actual}")]
    EmbeddingCount { expected: usize, actual: usize },

    #[error("Vector dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("Embedding contains non-finite value at index {0}")]
    NonFiniteEmbedding(usize),
}

/// Result型エイリアス
pub type Result<T> = std::result::Result<T, Error>;
