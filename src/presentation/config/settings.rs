use std::path::PathBuf;

/// Process configuration, read once at startup from the environment.
/// Every value has a default; only the Dropbox credentials are genuinely
/// optional.
#[derive(Debug, Clone)]
pub struct Settings {
    pub server: ServerSettings,
    pub rate_limit: RateLimitSettings,
    pub queue: QueueSettings,
    pub pipeline: PipelineSettings,
    pub extraction: ExtractionSettings,
    pub rendering: RenderingSettings,
    pub dropbox: DropboxSettings,
    pub retention: RetentionSettings,
}

impl Settings {
    pub fn from_env() -> Self {
        Self {
            server: ServerSettings::from_env(),
            rate_limit: RateLimitSettings::from_env(),
            queue: QueueSettings::from_env(),
            pipeline: PipelineSettings::from_env(),
            extraction: ExtractionSettings::from_env(),
            rendering: RenderingSettings::from_env(),
            dropbox: DropboxSettings::from_env(),
            retention: RetentionSettings::from_env(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ServerSettings {
    pub port: u16,
}

impl ServerSettings {
    fn from_env() -> Self {
        Self {
            port: parse_var("PORT", 8000),
        }
    }
}

#[derive(Debug, Clone)]
pub struct RateLimitSettings {
    pub quota: u32,
    pub window_secs: u64,
}

impl RateLimitSettings {
    fn from_env() -> Self {
        Self {
            quota: parse_var("RATE_LIMIT_QUOTA", 100),
            window_secs: parse_var("RATE_LIMIT_WINDOW_SECS", 60),
        }
    }
}

#[derive(Debug, Clone)]
pub struct QueueSettings {
    pub worker_count: usize,
    pub capacity: usize,
}

impl QueueSettings {
    fn from_env() -> Self {
        Self {
            worker_count: parse_var("WORKER_COUNT", 4),
            capacity: parse_var("QUEUE_CAPACITY", 64),
        }
    }
}

#[derive(Debug, Clone)]
pub struct PipelineSettings {
    pub extract_timeout_secs: u64,
    pub render_timeout_secs: u64,
    pub upload_timeout_secs: u64,
    pub temp_dir: PathBuf,
}

impl PipelineSettings {
    fn from_env() -> Self {
        Self {
            extract_timeout_secs: parse_var("EXTRACT_TIMEOUT_SECS", 30),
            render_timeout_secs: parse_var("RENDER_TIMEOUT_SECS", 60),
            upload_timeout_secs: parse_var("UPLOAD_TIMEOUT_SECS", 30),
            temp_dir: PathBuf::from(string_var("TEMP_DIR", "/tmp/paperpress")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractorProvider {
    Basic,
    Readability,
}

#[derive(Debug, Clone)]
pub struct ExtractionSettings {
    pub provider: ExtractorProvider,
    pub readability_api_url: Option<String>,
    pub readability_api_key: Option<String>,
}

impl ExtractionSettings {
    fn from_env() -> Self {
        let provider = match std::env::var("EXTRACTOR_PROVIDER")
            .unwrap_or_default()
            .to_lowercase()
            .as_str()
        {
            "readability" => ExtractorProvider::Readability,
            _ => ExtractorProvider::Basic,
        };
        Self {
            provider,
            readability_api_url: optional_var("READABILITY_API_URL"),
            readability_api_key: optional_var("READABILITY_API_KEY"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct RenderingSettings {
    pub chromium_bin: PathBuf,
    pub max_article_chars: usize,
}

impl RenderingSettings {
    fn from_env() -> Self {
        Self {
            chromium_bin: PathBuf::from(string_var("CHROMIUM_BIN", "chromium")),
            max_article_chars: parse_var("MAX_ARTICLE_CHARS", 500_000),
        }
    }
}

#[derive(Debug, Clone)]
pub struct DropboxSettings {
    pub access_token: Option<String>,
    pub app_key: Option<String>,
    pub app_secret: Option<String>,
    pub refresh_token: Option<String>,
    pub folder_path: String,
    pub create_shared_link: bool,
    pub refresh_margin_secs: u64,
}

impl DropboxSettings {
    fn from_env() -> Self {
        Self {
            access_token: optional_var("DROPBOX_ACCESS_TOKEN"),
            app_key: optional_var("DROPBOX_APP_KEY"),
            app_secret: optional_var("DROPBOX_APP_SECRET"),
            refresh_token: optional_var("DROPBOX_REFRESH_TOKEN"),
            folder_path: string_var("DROPBOX_FOLDER_PATH", "/articles"),
            create_shared_link: bool_var("DROPBOX_SHARED_LINK"),
            refresh_margin_secs: parse_var("TOKEN_REFRESH_MARGIN_SECS", 60),
        }
    }

    /// The app key/secret/refresh-token triple, when fully configured.
    /// Takes precedence over a static access token.
    pub fn refresh_triple(&self) -> Option<(&str, &str, &str)> {
        match (&self.app_key, &self.app_secret, &self.refresh_token) {
            (Some(key), Some(secret), Some(token)) => {
                Some((key.as_str(), secret.as_str(), token.as_str()))
            }
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct RetentionSettings {
    pub retention_hours: i64,
    pub cleanup_interval_secs: u64,
}

impl RetentionSettings {
    fn from_env() -> Self {
        Self {
            retention_hours: parse_var("JOB_RETENTION_HOURS", 24),
            cleanup_interval_secs: parse_var("JOB_CLEANUP_INTERVAL_SECS", 3600),
        }
    }
}

fn parse_var<T: std::str::FromStr>(name: &str, default: T) -> T {
    std::env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

fn string_var(name: &str, default: &str) -> String {
    std::env::var(name).unwrap_or_else(|_| default.to_string())
}

fn optional_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

fn bool_var(name: &str) -> bool {
    std::env::var(name)
        .map(|v| v.to_lowercase() == "true" || v == "1")
        .unwrap_or(false)
}
