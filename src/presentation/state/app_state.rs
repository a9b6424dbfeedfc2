use std::sync::Arc;

use crate::application::services::{ConversionService, RateLimiter};

/// Shared state handed to every request handler.
#[derive(Clone)]
pub struct AppState {
    pub conversion_service: Arc<ConversionService>,
    pub rate_limiter: Arc<RateLimiter>,
}
