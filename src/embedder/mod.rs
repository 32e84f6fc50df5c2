pub mod cache;
pub mod command;
pub mod hash;

pub use cache::EmbeddingCache;
pub use command::CommandEmbedder;
pub use hash::HashEmbedder;

use crate::config::Config;
use crate::embed_provider::EmbedderKind;
use crate::error::{Result, TenderCompareError};
use std::collections::HashMap;
use std::time::Duration;
use tender_compare_common::Embedder;

/// 実行時に選択された埋め込みバックエンド
#[derive(Debug, Clone)]
pub enum EmbeddingService {
    Hash(HashEmbedder),
    Command(CommandEmbedder),
}

impl EmbeddingService {
    pub fn from_config(config: &Config, kind: EmbedderKind) -> Result<Self> {
        match kind {
            EmbedderKind::Hash => Ok(Self::Hash(HashEmbedder::new(config.hash_dimensions))),
            EmbedderKind::Command => {
                let program = config.get_embed_command()?;
                Ok(Self::Command(CommandEmbedder::new(
                    program,
                    config.embed_args.clone(),
                    config.model.clone(),
                    Duration::from_secs(config.timeout_seconds),
                )))
            }
        }
    }

    /// 表示用の名前（キャッシュキーにも使う）
    ///
    /// コマンドはモデル名に加えてコマンドラインも含め、スクリプトを差し替えたときに
    /// 古いベクトルを再利用しないようにする。
    pub fn name(&self) -> String {
        match self {
            Self::Hash(h) => format!("hash-{}", h.dimensions()),
            Self::Command(c) => format!("command:{} [{}]", c.model(), c.command_line()),
        }
    }

    /// まとめて埋め込む（1回の呼び出し）
    pub async fn embed(&self, texts: &[String], verbose: bool) -> Result<Vec<Vec<f32>>> {
        match self {
            Self::Hash(h) => Ok(h.embed(texts)?),
            Self::Command(c) => c.embed(texts, verbose).await,
        }
    }

    /// キャッシュを使って埋め込む
    ///
    /// 未キャッシュのテキストだけを1回の呼び出しでまとめて埋め込み、キャッシュに追加する。
    pub async fn embed_with_cache(
        &self,
        texts: &[String],
        cache: Option<&mut EmbeddingCache>,
        verbose: bool,
    ) -> Result<Vec<Vec<f32>>> {
        let Some(cache) = cache else {
            return self.embed(texts, verbose).await;
        };

        let model = self.name();
        let (found, missing) = cache::split_cached(cache, &model, texts);

        if verbose {
            println!(
                "  キャッシュ: {}件ヒット / {}件計算",
                texts.len() - found.iter().filter(|v| v.is_none()).count(),
                missing.len()
            );
        }

        let mut computed: HashMap<String, Vec<f32>> = HashMap::new();
        if !missing.is_empty() {
            let vectors = self.embed(&missing, verbose).await?;
            if vectors.len() != missing.len() {
                return Err(TenderCompareError::EmbeddingParse(format!(
                    "{}件の入力に対して{}件のベクトル",
                    missing.len(),
                    vectors.len()
                )));
            }
            for (text, vector) in missing.into_iter().zip(vectors) {
                cache.insert(&model, &text, vector.clone());
                computed.insert(text, vector);
            }
        }

        Ok(found
            .into_iter()
            .zip(texts)
            .map(|(hit, text)| {
                hit.or_else(|| computed.get(text).cloned())
                    .unwrap_or_default()
            })
            .collect())
    }
}
