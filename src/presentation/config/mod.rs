mod environment;
mod settings;

pub use environment::Environment;
pub use settings::{
    DropboxSettings, ExtractionSettings, ExtractorProvider, PipelineSettings, QueueSettings,
    RateLimitSettings, RenderingSettings, RetentionSettings, ServerSettings, Settings,
};
