//! 埋め込みキャッシュモジュール
//!
//! モデル名とテキストのSHA-256をキーにしてベクトルを保存し、
//! 同じ条項・項目の再計算をスキップする。

use crate::error::Result;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::{HashMap, HashSet};
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};

const CACHE_FILE_NAME: &str = "embedding-cache.json";

/// キャッシュファイルの構造
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingCache {
    /// バージョン（互換性チェック用）
    version: u32,
    /// ハッシュ → ベクトル
    entries: HashMap<String, Vec<f32>>,
}

impl EmbeddingCache {
    const CURRENT_VERSION: u32 = 1;

    /// 既定のキャッシュディレクトリ
    pub fn default_dir() -> PathBuf {
        dirs::cache_dir()
            .unwrap_or_else(std::env::temp_dir)
            .join("tender-compare")
    }

    pub fn cache_path(dir: &Path) -> PathBuf {
        dir.join(CACHE_FILE_NAME)
    }

    /// キャッシュファイルを読み込み（存在しない・壊れている場合は空）
    pub fn load(dir: &Path) -> Self {
        let cache_path = Self::cache_path(dir);
        if !cache_path.exists() {
            return Self::default();
        }

        let file = match File::open(&cache_path) {
            Ok(f) => f,
            Err(_) => return Self::default(),
        };

        let reader = BufReader::new(file);
        match serde_json::from_reader::<_, EmbeddingCache>(reader) {
            Ok(cache) => {
                if cache.version != Self::CURRENT_VERSION {
                    eprintln!("キャッシュバージョン不一致、再生成します");
                    return Self::default();
                }
                cache
            }
            Err(_) => Self::default(),
        }
    }

    /// キャッシュファイルを保存
    pub fn save(&self, dir: &Path) -> Result<()> {
        std::fs::create_dir_all(dir)?;
        let file = File::create(Self::cache_path(dir))?;
        let writer = BufWriter::new(file);
        serde_json::to_writer(writer, self)?;
        Ok(())
    }

    /// キャッシュファイルを削除（削除した場合true）
    pub fn clear(dir: &Path) -> Result<bool> {
        let cache_path = Self::cache_path(dir);
        if cache_path.exists() {
            std::fs::remove_file(cache_path)?;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    /// モデルとテキストからキーを計算
    pub fn key(model: &str, text: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(model.as_bytes());
        hasher.update([0u8]);
        hasher.update(text.as_bytes());
        hex::encode(hasher.finalize())
    }

    pub fn get(&self, model: &str, text: &str) -> Option<&Vec<f32>> {
        self.entries.get(&Self::key(model, text))
    }

    pub fn insert(&mut self, model: &str, text: &str, vector: Vec<f32>) {
        self.entries.insert(Self::key(model, text), vector);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for EmbeddingCache {
    fn default() -> Self {
        Self {
            version: Self::CURRENT_VERSION,
            entries: HashMap::new(),
        }
    }
}

/// キャッシュ済みベクトルと未キャッシュのテキストに分ける
///
/// 戻り値の1つ目は入力と同じ長さで、未キャッシュの位置はNone。
/// 2つ目は未キャッシュのテキスト（重複除去済み、出現順）。
pub fn split_cached(
    cache: &EmbeddingCache,
    model: &str,
    texts: &[String],
) -> (Vec<Option<Vec<f32>>>, Vec<String>) {
    let mut found = Vec::with_capacity(texts.len());
    let mut missing: Vec<String> = Vec::new();
    let mut seen: HashSet<&str> = HashSet::new();

    for text in texts {
        match cache.get(model, text) {
            Some(v) => found.push(Some(v.clone())),
            None => {
                if seen.insert(text.as_str()) {
                    missing.push(text.clone());
                }
                found.push(None);
            }
        }
    }

    (found, missing)
}
