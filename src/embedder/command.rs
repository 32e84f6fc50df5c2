//! 外部コマンド埋め込み
//!
//! 標準入力に `{"model": .., "texts": [..]}` を渡し、標準出力から
//! `[[..], ..]` または `{"embeddings": [[..], ..]}` を受け取る。
//! 呼び出しは1リストにつき1回、タイムアウト時はプロセスを終了させる。

use crate::error::{Result, TenderCompareError};
use serde::{Deserialize, Serialize};
use std::process::Stdio;
use std::time::Duration;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

#[derive(Debug, Clone)]
pub struct CommandEmbedder {
    program: String,
    args: Vec<String>,
    model: String,
    timeout: Duration,
}

#[derive(Serialize)]
struct EmbedRequest<'a> {
    model: &'a str,
    texts: &'a [String],
}

#[derive(Deserialize)]
#[serde(untagged)]
enum EmbedResponse {
    Bare(Vec<Vec<f32>>),
    Wrapped { embeddings: Vec<Vec<f32>> },
}

impl CommandEmbedder {
    pub fn new(program: impl Into<String>, args: Vec<String>, model: impl Into<String>, timeout: Duration) -> Self {
        Self {
            program: program.into(),
            args,
            model: model.into(),
            timeout,
        }
    }

    /// プログラムと引数（キャッシュキー・ログ用）
    pub fn command_line(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// まとめて埋め込む
    pub async fn embed(&self, texts: &[String], verbose: bool) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let payload = serde_json::to_vec(&EmbedRequest {
            model: &self.model,
            texts,
        })?;

        if verbose {
            println!(
                "  [embed] {} ({}件, {} bytes)",
                self.command_line(),
                texts.len(),
                payload.len()
            );
        }

        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| {
                TenderCompareError::EmbeddingFailed(format!("{} の起動に失敗: {}", self.program, e))
            })?;

        let seconds = self.timeout.as_secs();
        // 書き込みと出力の読み取りを並行させる（パイプ詰まりで双方が止まらないように）
        let stdin = child.stdin.take();
        let write = async move {
            if let Some(mut stdin) = stdin {
                // 入力を読まずに終了するコマンドもあるため BrokenPipe は無視
                match stdin.write_all(&payload).await {
                    Ok(()) => {}
                    Err(e) if e.kind() == std::io::ErrorKind::BrokenPipe => {}
                    Err(e) => return Err(TenderCompareError::Io(e)),
                }
            }
            Ok(())
        };
        let run = async {
            let (written, output) = tokio::join!(write, child.wait_with_output());
            written?;
            output.map_err(TenderCompareError::Io)
        };

        let output = tokio::time::timeout(self.timeout, run)
            .await
            .map_err(|_| TenderCompareError::EmbeddingTimeout(seconds))??;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(TenderCompareError::EmbeddingFailed(format!(
                "{} failed (code {:?}): {}",
                self.program,
                output.status.code(),
                stderr.trim()
            )));
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        let vectors = parse_embed_response(&stdout)?;

        if vectors.len() != texts.len() {
            return Err(TenderCompareError::EmbeddingParse(format!(
                "{}件の入力に対して{}件のベクトル",
                texts.len(),
                vectors.len()
            )));
        }

        Ok(vectors)
    }
}

/// コマンド出力をパース
pub fn parse_embed_response(stdout: &str) -> Result<Vec<Vec<f32>>> {
    let trimmed = stdout.trim();
    if trimmed.is_empty() {
        return Err(TenderCompareError::EmbeddingParse("出力が空です".into()));
    }

    let response: EmbedResponse = serde_json::from_str(trimmed).map_err(|e| {
        let preview: String = trimmed.chars().take(200).collect();
        TenderCompareError::EmbeddingParse(format!("{} ({})", e, preview))
    })?;

    Ok(match response {
        EmbedResponse::Bare(v) => v,
        EmbedResponse::Wrapped { embeddings } => embeddings,
    })
}
