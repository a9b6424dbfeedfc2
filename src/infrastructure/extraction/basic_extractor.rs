use std::sync::LazyLock;
use std::time::Duration;

use async_trait::async_trait;
use regex::Regex;
use reqwest::Client;

use crate::application::ports::{ArticleExtractor, ExtractorError};
use crate::domain::Article;

const USER_AGENT: &str =
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0 Safari/537.36";

/// Articles with less readable text than this are treated as unextractable.
const MIN_TEXT_LEN: usize = 100;

static TITLE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<title[^>]*>(.*?)</title>").unwrap());
static SCRIPTS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<script[^>]*>.*?</script>").unwrap());
static STYLES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<style[^>]*>.*?</style>").unwrap());
static ARTICLE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<article[^>]*>(.*?)</article>").unwrap());
static MAIN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?is)<main[^>]*>(.*?)</main>").unwrap());
static BODY: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?is)<body[^>]*>(.*?)</body>").unwrap());
static WIKI_NOISE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[(?:edit|citation needed)\]").unwrap());
static EXTERNAL_LINK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?is)<a\s[^>]*href="(?:https?:)?//[^"]*"[^>]*>(.*?)</a>"#).unwrap()
});
static EMPTY_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<(?:p|div)[^>]*>\s*</(?:p|div)>").unwrap());
static MULTI_NEWLINE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\n{3,}").unwrap());
static ANY_TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?s)<[^>]*>").unwrap());

/// Fallback extractor with no external parser dependency: fetches the page
/// and pulls the main content out with markup heuristics. Good enough for
/// plain article pages; the readability API adapter handles the rest.
pub struct BasicExtractor {
    client: Client,
}

impl BasicExtractor {
    pub fn new() -> Self {
        Self {
            client: Client::builder()
                .user_agent(USER_AGENT)
                .timeout(Duration::from_secs(30))
                .build()
                .expect("reqwest client build never fails with valid TLS config"),
        }
    }
}

impl Default for BasicExtractor {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ArticleExtractor for BasicExtractor {
    async fn extract(&self, url: &str) -> Result<Article, ExtractorError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| ExtractorError::FetchFailed(e.to_string()))?;

        if !response.status().is_success() {
            return Err(ExtractorError::FetchFailed(format!(
                "HTTP {}",
                response.status()
            )));
        }

        let html = response
            .text()
            .await
            .map_err(|e| ExtractorError::FetchFailed(e.to_string()))?;

        let title = extract_title(&html);
        let content = extract_content(&html);

        let text_len = ANY_TAG.replace_all(&content, "").trim().len();
        if text_len < MIN_TEXT_LEN {
            return Err(ExtractorError::NoContent(url.to_string()));
        }

        tracing::debug!(url, text_len, "Basic extraction finished");
        Ok(Article {
            title,
            author: None,
            published: None,
            excerpt: None,
            content,
            source_url: url.to_string(),
        })
    }
}

fn extract_title(html: &str) -> String {
    let title = TITLE
        .captures(html)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().trim().to_string())
        .unwrap_or_default();
    if title.is_empty() {
        "Untitled".to_string()
    } else {
        title
    }
}

fn extract_content(html: &str) -> String {
    let stripped = SCRIPTS.replace_all(html, "");
    let stripped = STYLES.replace_all(&stripped, "");

    // Prefer the semantically narrow container when the page offers one.
    let body = [&*ARTICLE, &*MAIN, &*BODY]
        .iter()
        .find_map(|re| re.captures(&stripped).and_then(|c| c.get(1)))
        .map(|m| m.as_str().to_string())
        .unwrap_or_else(|| stripped.to_string());

    let cleaned = WIKI_NOISE.replace_all(&body, "");
    let cleaned = EXTERNAL_LINK.replace_all(&cleaned, "$1");
    let cleaned = EMPTY_TAG.replace_all(&cleaned, "");
    let cleaned = MULTI_NEWLINE.replace_all(&cleaned, "\n\n");
    cleaned.trim().to_string()
}
