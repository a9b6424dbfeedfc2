use std::sync::Arc;

use crate::application::ports::ArticleExtractor;
use crate::presentation::config::{ExtractionSettings, ExtractorProvider};

use super::basic_extractor::BasicExtractor;
use super::readability_api_extractor::ReadabilityApiExtractor;

#[derive(Debug, thiserror::Error)]
pub enum ExtractorFactoryError {
    #[error("readability_api_url is required for the readability provider")]
    MissingApiUrl,
}

pub struct ExtractorFactory;

impl ExtractorFactory {
    pub fn create(
        settings: &ExtractionSettings,
    ) -> Result<Arc<dyn ArticleExtractor>, ExtractorFactoryError> {
        match settings.provider {
            ExtractorProvider::Basic => {
                tracing::info!("Using basic article extractor");
                Ok(Arc::new(BasicExtractor::new()))
            }
            ExtractorProvider::Readability => {
                let api_url = settings
                    .readability_api_url
                    .as_deref()
                    .ok_or(ExtractorFactoryError::MissingApiUrl)?;
                tracing::info!(api_url, "Using readability parser API extractor");
                Ok(Arc::new(ReadabilityApiExtractor::new(
                    api_url.to_string(),
                    settings.readability_api_key.clone(),
                )))
            }
        }
    }
}
