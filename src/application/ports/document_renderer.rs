use std::io;
use std::path::Path;

use async_trait::async_trait;

use crate::domain::Article;

/// Renders an article into a print-formatted document at `output_path`.
/// The parent directory is created by the caller.
#[async_trait]
pub trait DocumentRenderer: Send + Sync {
    async fn render(&self, article: &Article, output_path: &Path) -> Result<(), RenderError>;
}

#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("render failed: {0}")]
    RenderFailed(String),
    #[error("renderer unavailable: {0}")]
    Unavailable(String),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}
