/// Structured article content produced by an extraction collaborator.
///
/// `content` holds the cleaned HTML body; the remaining fields are
/// metadata used by the rendering template when present.
#[derive(Debug, Clone)]
pub struct Article {
    pub title: String,
    pub author: Option<String>,
    pub published: Option<String>,
    pub excerpt: Option<String>,
    pub content: String,
    pub source_url: String,
}
