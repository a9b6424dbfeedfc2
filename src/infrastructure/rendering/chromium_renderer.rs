use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::process::Command;

use crate::application::ports::{DocumentRenderer, RenderError};
use crate::domain::Article;

use super::template;

/// Renders the fixed print template through a headless Chromium invocation.
/// One subprocess per job; `kill_on_drop` ties its lifetime to the stage
/// timeout.
pub struct ChromiumRenderer {
    binary: PathBuf,
    max_content_chars: usize,
}

impl ChromiumRenderer {
    pub fn new(binary: PathBuf, max_content_chars: usize) -> Self {
        Self {
            binary,
            max_content_chars,
        }
    }

    async fn print_to_pdf(&self, html_path: &Path, output_path: &Path) -> Result<(), RenderError> {
        let output = Command::new(&self.binary)
            .arg("--headless")
            .arg("--disable-gpu")
            .arg("--no-sandbox")
            .arg("--disable-dev-shm-usage")
            .arg("--no-pdf-header-footer")
            .arg(format!("--print-to-pdf={}", output_path.display()))
            .arg(format!("file://{}", html_path.display()))
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| match e.kind() {
                ErrorKind::NotFound => {
                    RenderError::Unavailable(format!("{} not found", self.binary.display()))
                }
                _ => RenderError::Unavailable(e.to_string()),
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(RenderError::RenderFailed(format!(
                "{} exited with {}: {}",
                self.binary.display(),
                output.status,
                stderr.trim()
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl DocumentRenderer for ChromiumRenderer {
    async fn render(&self, article: &Article, output_path: &Path) -> Result<(), RenderError> {
        let mut article = article.clone();
        let chars = article.content.chars().count();
        if chars > self.max_content_chars {
            tracing::warn!(
                chars,
                limit = self.max_content_chars,
                "Article content truncated for rendering"
            );
            article.content = article.content.chars().take(self.max_content_chars).collect();
        }

        let html = template::render_article_html(&article);
        let html_path = output_path.with_extension("html");
        tokio::fs::write(&html_path, &html).await?;
        // file:// needs an absolute path regardless of where we were started.
        let html_abs = tokio::fs::canonicalize(&html_path).await?;

        let printed = self.print_to_pdf(&html_abs, output_path).await;
        if let Err(e) = tokio::fs::remove_file(&html_path).await {
            tracing::debug!(error = %e, "Temp HTML cleanup failed");
        }
        printed?;

        match tokio::fs::metadata(output_path).await {
            Ok(meta) if meta.len() > 0 => Ok(()),
            _ => Err(RenderError::RenderFailed(
                "renderer produced no output file".to_string(),
            )),
        }
    }
}
