mod chromium_renderer;
pub mod template;

pub use chromium_renderer::ChromiumRenderer;
