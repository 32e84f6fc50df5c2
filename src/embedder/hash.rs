//! ハッシュ埋め込み
//!
//! 単語・単語バイグラム・文字トライグラムを FNV-1a で次元に割り当てる。
//! 外部モデル不要で、同じ入力には常に同じベクトルを返す。

use regex::Regex;
use tender_compare_common::{Embedder, Result};

const FNV_OFFSET: u64 = 0xcbf29ce484222325;
const FNV_PRIME: u64 = 0x100000001b3;

/// 特徴量ごとの重み
const WORD_WEIGHT: f32 = 1.0;
const BIGRAM_WEIGHT: f32 = 0.5;
const TRIGRAM_WEIGHT: f32 = 0.25;

#[derive(Debug, Clone)]
pub struct HashEmbedder {
    dimensions: usize,
}

impl HashEmbedder {
    pub fn new(dimensions: usize) -> Self {
        Self {
            dimensions: dimensions.max(8),
        }
    }

    pub fn dimensions(&self) -> usize {
        self.dimensions
    }

    /// 1件分のベクトル（L2正規化済み、空文字はゼロベクトル）
    pub fn embed_one(&self, text: &str) -> Vec<f32> {
        let mut v = vec![0.0f32; self.dimensions];
        let tokens = tokenize(text);

        for token in &tokens {
            self.add_feature(&mut v, "w", token, WORD_WEIGHT);

            let padded: Vec<char> = format!("#{}#", token).chars().collect();
            for gram in padded.windows(3) {
                let gram: String = gram.iter().collect();
                self.add_feature(&mut v, "c", &gram, TRIGRAM_WEIGHT);
            }
        }

        for pair in tokens.windows(2) {
            let bigram = format!("{} {}", pair[0], pair[1]);
            self.add_feature(&mut v, "b", &bigram, BIGRAM_WEIGHT);
        }

        let norm = v.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 {
            for x in &mut v {
                *x /= norm;
            }
        }
        v
    }

    fn add_feature(&self, v: &mut [f32], kind: &str, feature: &str, weight: f32) {
        let h = fnv1a(kind.as_bytes().iter().chain(b":").chain(feature.as_bytes()));
        let idx = (h % self.dimensions as u64) as usize;
        // 上位ビットで符号を決め、衝突による偏りを打ち消す
        let sign = if (h >> 63) == 0 { 1.0 } else { -1.0 };
        v[idx] += sign * weight;
    }
}

impl Default for HashEmbedder {
    fn default() -> Self {
        Self::new(384)
    }
}

impl Embedder for HashEmbedder {
    fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        Ok(texts.iter().map(|t| self.embed_one(t)).collect())
    }

    fn name(&self) -> &str {
        "hash"
    }
}

/// 小文字化して英数字（多言語文字を含む）の連なりに分割
pub fn tokenize(text: &str) -> Vec<String> {
    lazy_static::lazy_static! {
        static ref TOKEN_RE: Regex = Regex::new(r"[\p{L}\p{N}]+").unwrap();
    }
    let lower = text.to_lowercase();
    TOKEN_RE
        .find_iter(&lower)
        .map(|m| m.as_str().to_string())
        .collect()
}

fn fnv1a<'a>(bytes: impl Iterator<Item = &'a u8>) -> u64 {
    let mut h = FNV_OFFSET;
    for b in bytes {
        h ^= *b as u64;
        h = h.wrapping_mul(FNV_PRIME);
    }
    h
}
