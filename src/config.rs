use crate::embed_provider::EmbedderKind;
use crate::error::{Result, TenderCompareError};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tender_compare_common::MatchField;

/// 埋め込みコマンドを上書きする環境変数
pub const EMBED_COMMAND_ENV: &str = "TENDER_COMPARE_EMBED_COMMAND";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub embedder: EmbedderKind,
    pub embed_command: Option<String>,
    pub embed_args: Vec<String>,
    pub model: String,
    pub timeout_seconds: u64,
    pub hash_dimensions: usize,
    pub match_on: MatchField,
    pub standard_label_header: String,
    pub standard_text_header: String,
}

impl Default for Config {
    fn default() -> Self {
        Self::default_config()
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let config: Config = serde_json::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Self::default_config())
        }
    }

    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path()?;

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(&config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| TenderCompareError::Config("ホームディレクトリが見つかりません".into()))?;
        Ok(home.join(".config").join("tender-compare").join("config.json"))
    }

    fn default_config() -> Self {
        Self {
            embedder: EmbedderKind::Hash,
            embed_command: None,
            embed_args: Vec::new(),
            model: "all-MiniLM-L6-v2".into(),
            timeout_seconds: 120,
            hash_dimensions: 384, // MiniLMと同じ次元
            match_on: MatchField::Text,
            standard_label_header: "Clauses".into(),
            standard_text_header: "SKV Standard".into(),
        }
    }

    /// 埋め込みコマンドを取得（環境変数を優先）
    pub fn get_embed_command(&self) -> Result<String> {
        if let Ok(cmd) = std::env::var(EMBED_COMMAND_ENV) {
            if !cmd.trim().is_empty() {
                return Ok(cmd);
            }
        }

        self.embed_command
            .clone()
            .filter(|c| !c.trim().is_empty())
            .ok_or(TenderCompareError::MissingEmbedCommand)
    }

    pub fn set_embed_command(&mut self, command: String, args: Vec<String>) -> Result<()> {
        self.embed_command = Some(command);
        self.embed_args = args;
        self.embedder = EmbedderKind::Command;
        self.save()
    }

    pub fn set_model(&mut self, model: String) -> Result<()> {
        self.model = model;
        self.save()
    }

    pub fn set_timeout(&mut self, seconds: u64) -> Result<()> {
        if seconds == 0 {
            return Err(TenderCompareError::Config("タイムアウトは1秒以上を指定してください".into()));
        }
        self.timeout_seconds = seconds;
        self.save()
    }
}
