use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// 埋め込みバックエンド
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmbedderKind {
    /// 内蔵のハッシュ埋め込み（オフライン・決定的）
    #[default]
    Hash,
    /// 外部コマンド（例: scripts/sbert_embed.py）
    Command,
}

impl EmbedderKind {
    pub fn name(&self) -> &'static str {
        match self {
            EmbedderKind::Hash => "hash",
            EmbedderKind::Command => "command",
        }
    }
}

impl std::fmt::Display for EmbedderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}
