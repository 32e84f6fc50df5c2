use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use tender_compare::{cli, config, display, embedder, error, export, loader, pipeline};
use cli::{Cli, Commands};
use config::Config;
use embedder::{EmbeddingCache, EmbeddingService};
use pipeline::{ComparisonInputs, RunOptions};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = Config::load()?;

    match cli.command {
        Commands::Compare {
            standard,
            tender,
            output,
            format,
            embedder,
            match_on,
            standard_sheet,
            tender_sheet,
            use_cache,
            quiet,
        } => {
            println!("📄 tender-compare - 標準条項・入札照合\n");

            let inputs = ComparisonInputs { standard, tender };
            let Some((standard_path, tender_path)) = inputs.ready() else {
                println!("⏳ 入力待ち: {}", inputs.missing().join(", "));
                println!("  両方のExcelファイルを指定すると照合を開始します");
                return Ok(());
            };

            let kind = embedder.unwrap_or(config.embedder);
            let match_on = match_on.unwrap_or(config.match_on);

            // 1. 読み込み
            println!("[1/4] Excelを読み込み中...");
            let clauses = loader::load_standard_clauses(
                standard_path,
                standard_sheet.as_deref(),
                &config.standard_label_header,
                &config.standard_text_header,
            )
            .with_context(|| format!("標準条項の読み込みに失敗: {}", standard_path.display()))?;
            let items = loader::load_tender_items(tender_path, tender_sheet.as_deref())
                .with_context(|| format!("入札ファイルの読み込みに失敗: {}", tender_path.display()))?;
            println!("✔ 標準条項 {}件 / 入札項目 {}件\n", clauses.rows.len(), items.rows.len());
            if cli.verbose && (clauses.dropped > 0 || items.dropped > 0) {
                println!("  空欄行を除外: 標準 {}行 / 入札 {}行", clauses.dropped, items.dropped);
            }

            // 2. 埋め込み・照合
            let service = EmbeddingService::from_config(&config, kind)?;
            println!("[2/4] セマンティック照合中... ({}, 対象: {})", service.name(), match_on);
            let cache_dir = EmbeddingCache::default_dir();
            let mut cache = use_cache.then(|| EmbeddingCache::load(&cache_dir));

            let report = pipeline::run_comparison(
                &clauses.rows,
                &items.rows,
                &service,
                cache.as_mut(),
                RunOptions {
                    match_on,
                    verbose: cli.verbose,
                    show_progress: !quiet,
                },
            )
            .await
            .context("照合を中断しました（レポートは出力されていません）")?;

            if let Some(cache) = &cache {
                if let Err(e) = cache.save(&cache_dir) {
                    eprintln!("⚠ キャッシュ保存に失敗: {}", e);
                }
            }
            println!("✔ 照合完了\n");

            // 3. 表示
            println!("[3/4] 結果");
            if !quiet {
                display::print_report(&report);
            }
            println!();

            // 4. 出力
            println!("[4/4] レポートを出力中...");
            let meta = export::ReportMeta {
                generated_at: chrono::Utc::now().to_rfc3339(),
                embedder: service.name(),
                match_on: match_on.to_string(),
                standard_file: standard_path.display().to_string(),
                tender_file: tender_path.display().to_string(),
            };
            let output_dir = output.unwrap_or_else(|| PathBuf::from("."));
            export::export_report(&report, &format, &output_dir, meta)?;

            println!("\n✅ 完了");
        }

        Commands::Config { set_embed_command, set_model, set_timeout, show } => {
            let mut config = config;

            if let Some(mut parts) = set_embed_command {
                if parts.is_empty() {
                    return Err(error::TenderCompareError::Config("コマンドが空です".into()).into());
                }
                let program = parts.remove(0);
                config.set_embed_command(program, parts)?;
                println!("✔ 埋め込みコマンドを設定しました");
            }

            if let Some(model) = set_model {
                config.set_model(model)?;
                println!("✔ モデルを設定しました");
            }

            if let Some(seconds) = set_timeout {
                config.set_timeout(seconds)?;
                println!("✔ タイムアウトを設定しました");
            }

            if show {
                println!("設定:");
                println!("  埋め込み: {}", config.embedder);
                println!(
                    "  コマンド: {}",
                    match &config.embed_command {
                        Some(cmd) => format!("{} {}", cmd, config.embed_args.join(" ")),
                        None => "未設定".to_string(),
                    }
                );
                println!("  モデル: {}", config.model);
                println!("  タイムアウト: {}秒", config.timeout_seconds);
                println!("  ハッシュ次元: {}", config.hash_dimensions);
                println!("  照合対象: {}", config.match_on);
                println!(
                    "  標準ヘッダー: {} / {}",
                    config.standard_label_header, config.standard_text_header
                );
            }
        }

        Commands::Cache { clear, dir, info } => {
            let target = dir.unwrap_or_else(EmbeddingCache::default_dir);
            let cache_path = EmbeddingCache::cache_path(&target);

            if info || !clear {
                if cache_path.exists() {
                    let cache = EmbeddingCache::load(&target);
                    println!("キャッシュ情報:");
                    println!("  パス: {}", cache_path.display());
                    println!("  件数: {}", cache.len());
                    if let Ok(meta) = std::fs::metadata(&cache_path) {
                        println!("  サイズ: {} bytes", meta.len());
                    }
                } else {
                    println!("キャッシュファイルが存在しません: {}", cache_path.display());
                }
            }

            if clear {
                match EmbeddingCache::clear(&target) {
                    Ok(true) => println!("✔ キャッシュを削除しました: {}", cache_path.display()),
                    Ok(false) => println!("キャッシュファイルが存在しません"),
                    Err(e) => println!("キャッシュ削除エラー: {}", e),
                }
            }
        }
    }

    Ok(())
}
