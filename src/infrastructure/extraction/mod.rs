mod basic_extractor;
mod extractor_factory;
mod readability_api_extractor;

pub use basic_extractor::BasicExtractor;
pub use extractor_factory::{ExtractorFactory, ExtractorFactoryError};
pub use readability_api_extractor::ReadabilityApiExtractor;
