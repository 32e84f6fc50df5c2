//! 埋め込みプロバイダのインターフェース
//!
//! 照合コアはこのトレイト越しにベクトルを受け取るだけで、
//! モデルの種類や呼び出し方法には依存しない。

use crate::error::{Error, Result};

/// テキスト列をベクトル列に変換する
pub trait Embedder {
    /// 1回の呼び出しでまとめて埋め込む（入力1件につき1ベクトル）
    fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>>;

    /// ログ・レポート表示用の名前
    fn name(&self) -> &str;
}

impl<E: Embedder + ?Sized> Embedder for Box<E> {
    fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        (**self).embed(texts)
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

/// 件数・次元・有限値をチェック
///
/// `dimension` がNoneの場合は先頭ベクトルの次元に揃っているかだけを見る。
pub fn validate_embeddings(
    vectors: &[Vec<f32>],
    expected_count: usize,
    dimension: Option<usize>,
) -> Result<()> {
    if vectors.len() != expected_count {
        return Err(Error::EmbeddingCount {
            expected: expected_count,
            actual: vectors.len(),
        });
    }

    let Some(expected) = dimension.or_else(|| vectors.first().map(|v| v.len())) else {
        return Ok(());
    };

    for (i, v) in vectors.iter().enumerate() {
        if v.len() != expected {
            return Err(Error::DimensionMismatch {
                expected,
                actual: v.len(),
            });
        }
        if v.iter().any(|x| !x.is_finite()) {
            return Err(Error::NonFiniteEmbedding(i));
        }
    }

    Ok(())
}
