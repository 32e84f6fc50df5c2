use clap::{Parser, Subcommand};
use crate::embed_provider::EmbedderKind;
use std::path::PathBuf;
use tender_compare_common::MatchField;

#[derive(Parser)]
#[command(name = "tender-compare")]
#[command(about = "標準条項と入札項目のセマンティック照合ツール", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 詳細ログを出力
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// 標準条項Excelと入札Excelを照合してレポートを出力
    Compare {
        /// 標準条項Excelファイル
        #[arg(short, long)]
        standard: Option<PathBuf>,

        /// 入札Excelファイル
        #[arg(short, long)]
        tender: Option<PathBuf>,

        /// 出力ファイル/ディレクトリ（デフォルト: カレント）
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// 出力形式 (excel/json/both)
        #[arg(short, long, default_value = "excel")]
        format: ExportFormat,

        /// 埋め込みバックエンド（省略時は設定ファイルの値）
        #[arg(short, long)]
        embedder: Option<EmbedderKind>,

        /// 埋め込み対象 (text/label/combined、省略時は設定ファイルの値)
        #[arg(short, long)]
        match_on: Option<MatchField>,

        /// 標準条項のシート名（省略時は先頭シート）
        #[arg(long)]
        standard_sheet: Option<String>,

        /// 入札のシート名（省略時は先頭シート）
        #[arg(long)]
        tender_sheet: Option<String>,

        /// 埋め込みキャッシュを使用
        #[arg(long)]
        use_cache: bool,

        /// コンソールへの表出力を省略
        #[arg(short, long)]
        quiet: bool,
    },

    /// 設定を表示/編集
    Config {
        /// 埋め込みコマンドを設定（以降の引数はコマンド引数）
        #[arg(long, num_args = 1.., value_name = "CMD")]
        set_embed_command: Option<Vec<String>>,

        /// 埋め込みモデル名を設定
        #[arg(long)]
        set_model: Option<String>,

        /// 埋め込みタイムアウト（秒）を設定
        #[arg(long)]
        set_timeout: Option<u64>,

        /// 設定を表示
        #[arg(long)]
        show: bool,
    },

    /// 埋め込みキャッシュ管理
    Cache {
        /// キャッシュを削除
        #[arg(long)]
        clear: bool,

        /// キャッシュディレクトリ（省略時は既定の場所）
        #[arg(short, long)]
        dir: Option<PathBuf>,

        /// キャッシュ情報を表示
        #[arg(long)]
        info: bool,
    },
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum ExportFormat {
    #[default]
    Excel,
    Json,
    Both,
}

impl std::str::FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "excel" | "xlsx" => Ok(ExportFormat::Excel),
            "json" => Ok(ExportFormat::Json),
            "both" => Ok(ExportFormat::Both),
            _ => Err(format!("Unknown format: {}. Use excel, json, or both", s)),
        }
    }
}
