use async_trait::async_trait;

use crate::domain::Article;

#[async_trait]
pub trait ArticleExtractor: Send + Sync {
    async fn extract(&self, url: &str) -> Result<Article, ExtractorError>;
}

impl std::fmt::Debug for dyn ArticleExtractor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("dyn ArticleExtractor")
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ExtractorError {
    #[error("no extractable content at {0}")]
    NoContent(String),
    #[error("fetch failed: {0}")]
    FetchFailed(String),
    #[error("parser api error: {0}")]
    ApiError(String),
}
