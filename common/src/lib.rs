//! Tender Compare Common Library
//!
//! 標準条項と入札項目のセマンティック照合コア。
//! 埋め込みの取得方法には依存せず、`Embedder` 越しにベクトルを受け取る。

pub mod types;
pub mod error;
pub mod similarity;
pub mod matcher;
pub mod residual;
pub mod embedding;
pub mod compare;
pub mod export;

pub use types::{
    Classification, ColorTag, ComparisonReport, ComparisonSummary, MatchField, MatchResult,
    ResidualTenderItem, StandardClause, TenderItem,
    CLARIFICATION_THRESHOLD, MATCH_THRESHOLD, NO_MATCH_SCORE, RESIDUAL_ANNOTATION,
};
pub use error::{Error, Result};
pub use similarity::{cosine_similarity, SimilarityMatrix};
pub use matcher::{best_match, match_clauses};
pub use residual::find_residuals;
pub use embedding::{validate_embeddings, Embedder};
pub use compare::{compare, compare_embeddings};
