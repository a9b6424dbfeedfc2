use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use crate::application::ports::{ArticleExtractor, ExtractorError};
use crate::domain::Article;

/// Adapter for a hosted readability-style parser API (Mercury wire shape):
/// one GET per article, the service does the heavy content extraction.
pub struct ReadabilityApiExtractor {
    client: Client,
    api_url: String,
    api_key: Option<String>,
}

#[derive(Deserialize)]
struct ParserResponse {
    title: Option<String>,
    author: Option<String>,
    date_published: Option<String>,
    excerpt: Option<String>,
    content: Option<String>,
}

impl ReadabilityApiExtractor {
    pub fn new(api_url: String, api_key: Option<String>) -> Self {
        Self {
            client: Client::builder()
                .timeout(Duration::from_secs(30))
                .build()
                .expect("reqwest client build never fails with valid TLS config"),
            api_url,
            api_key,
        }
    }
}

#[async_trait]
impl ArticleExtractor for ReadabilityApiExtractor {
    async fn extract(&self, url: &str) -> Result<Article, ExtractorError> {
        let mut request = self.client.get(&self.api_url).query(&[("url", url)]);
        if let Some(key) = &self.api_key {
            request = request.header("x-api-key", key);
        }

        let response = request
            .send()
            .await
            .map_err(|e| ExtractorError::ApiError(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(ExtractorError::ApiError(format!(
                "HTTP {}: {}",
                status, body
            )));
        }

        let parsed: ParserResponse = response
            .json()
            .await
            .map_err(|e| ExtractorError::ApiError(format!("invalid response: {}", e)))?;

        let content = parsed.content.unwrap_or_default();
        if content.trim().is_empty() {
            return Err(ExtractorError::NoContent(url.to_string()));
        }

        Ok(Article {
            title: parsed
                .title
                .filter(|t| !t.trim().is_empty())
                .unwrap_or_else(|| "Untitled".to_string()),
            author: parsed.author,
            published: parsed.date_published,
            excerpt: parsed.excerpt,
            content,
            source_url: url.to_string(),
        })
    }
}
