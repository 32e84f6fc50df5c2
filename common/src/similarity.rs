//! コサイン類似度と類似度行列
//!
//! 標準条項ベクトル(N)×入札項目ベクトル(M)の全組み合わせを計算する。
//! 各セルは独立なので行単位でrayonに並列化する。

use crate::error::{Error, Result};
use rayon::prelude::*;

/// コサイン類似度
///
/// どちらかのノルムが0の場合は0を返す。
/// 有限なf32成分の積和がオーバーフロー/アンダーフローしないようf64で累積する。
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    debug_assert_eq!(a.len(), b.len());
    let mut dot = 0.0f64;
    let mut norm_a = 0.0f64;
    let mut norm_b = 0.0f64;
    for (&x, &y) in a.iter().zip(b.iter()) {
        let (x, y) = (x as f64, y as f64);
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }
    let denom = norm_a.sqrt() * norm_b.sqrt();
    if denom == 0.0 {
        0.0
    } else {
        (dot / denom).clamp(-1.0, 1.0) as f32
    }
}

/// N×M 類似度行列（行優先）
#[derive(Debug, Clone, PartialEq)]
pub struct SimilarityMatrix {
    rows: usize,
    cols: usize,
    data: Vec<f32>,
}

impl SimilarityMatrix {
    /// ベクトル集合から行列を計算（並列）
    pub fn compute(standard: &[Vec<f32>], tender: &[Vec<f32>]) -> Result<Self> {
        Self::validate_dimensions(standard, tender)?;

        let cols = tender.len();
        let mut data = vec![0.0f32; standard.len() * cols];
        if cols > 0 {
            data.par_chunks_mut(cols)
                .zip(standard.par_iter())
                .for_each(|(row, u)| {
                    for (cell, v) in row.iter_mut().zip(tender.iter()) {
                        *cell = cosine_similarity(u, v);
                    }
                });
        }

        Ok(Self {
            rows: standard.len(),
            cols,
            data,
        })
    }

    /// 逐次計算版（並列版との一致確認用）
    pub fn compute_serial(standard: &[Vec<f32>], tender: &[Vec<f32>]) -> Result<Self> {
        Self::validate_dimensions(standard, tender)?;

        let data = standard
            .iter()
            .flat_map(|u| tender.iter().map(move |v| cosine_similarity(u, v)))
            .collect();

        Ok(Self {
            rows: standard.len(),
            cols: tender.len(),
            data,
        })
    }

    /// 既知のスコアから直接構築
    pub fn from_rows(rows: Vec<Vec<f32>>) -> Result<Self> {
        let cols = rows.first().map(|r| r.len()).unwrap_or(0);
        if let Some(bad) = rows.iter().find(|r| r.len() != cols) {
            return Err(Error::DimensionMismatch {
                expected: cols,
                actual: bad.len(),
            });
        }
        Ok(Self {
            rows: rows.len(),
            cols,
            data: rows.into_iter().flatten().collect(),
        })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// i行目（標準条項iに対する全入札項目のスコア）
    pub fn row(&self, i: usize) -> &[f32] {
        &self.data[i * self.cols..(i + 1) * self.cols]
    }

    pub fn get(&self, i: usize, j: usize) -> f32 {
        self.data[i * self.cols + j]
    }

    fn validate_dimensions(standard: &[Vec<f32>], tender: &[Vec<f32>]) -> Result<()> {
        let Some(expected) = standard.first().or(tender.first()).map(|v| v.len()) else {
            return Ok(());
        };
        for v in standard.iter().chain(tender.iter()) {
            if v.len() != expected {
                return Err(Error::DimensionMismatch {
                    expected,
                    actual: v.len(),
                });
            }
        }
        Ok(())
    }
}
