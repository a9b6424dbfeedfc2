use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tokio::net::TcpListener;
use tokio::sync::{mpsc, Mutex};

use paperpress::application::ports::{DocumentRenderer, JobStore, RemoteStore, TokenRefresher};
use paperpress::application::services::{
    run_retention_janitor, ConversionService, ConversionWorker, CredentialManager, PipelineConfig,
    RateLimiter, StageTimeouts,
};
use paperpress::infrastructure::dropbox::{DropboxOAuthClient, DropboxStore};
use paperpress::infrastructure::extraction::ExtractorFactory;
use paperpress::infrastructure::observability::{init_tracing, TracingConfig};
use paperpress::infrastructure::persistence::InMemoryJobStore;
use paperpress::infrastructure::rendering::ChromiumRenderer;
use paperpress::presentation::{create_router, AppState, Settings};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let settings = Settings::from_env();
    init_tracing(TracingConfig::default(), settings.server.port);

    let job_store: Arc<dyn JobStore> = Arc::new(InMemoryJobStore::new());
    let extractor = ExtractorFactory::create(&settings.extraction)?;
    let renderer: Arc<dyn DocumentRenderer> = Arc::new(ChromiumRenderer::new(
        settings.rendering.chromium_bin.clone(),
        settings.rendering.max_article_chars,
    ));
    let remote_store: Arc<dyn RemoteStore> = Arc::new(DropboxStore::new());
    let credentials = Arc::new(build_credential_manager(&settings));

    let pipeline_config = PipelineConfig {
        timeouts: StageTimeouts {
            extraction: Duration::from_secs(settings.pipeline.extract_timeout_secs),
            rendering: Duration::from_secs(settings.pipeline.render_timeout_secs),
            upload: Duration::from_secs(settings.pipeline.upload_timeout_secs),
        },
        temp_dir: settings.pipeline.temp_dir.clone(),
        remote_folder: settings.dropbox.folder_path.clone(),
        create_shared_link: settings.dropbox.create_shared_link,
    };

    let (sender, receiver) = mpsc::channel(settings.queue.capacity);
    let receiver = Arc::new(Mutex::new(receiver));

    for worker_id in 0..settings.queue.worker_count {
        let worker = ConversionWorker::new(
            worker_id,
            Arc::clone(&receiver),
            Arc::clone(&job_store),
            Arc::clone(&extractor),
            Arc::clone(&renderer),
            Arc::clone(&remote_store),
            Arc::clone(&credentials),
            pipeline_config.clone(),
        );
        tokio::spawn(worker.run());
    }

    tokio::spawn(run_retention_janitor(
        Arc::clone(&job_store),
        chrono::Duration::hours(settings.retention.retention_hours),
        Duration::from_secs(settings.retention.cleanup_interval_secs),
    ));

    let conversion_service = Arc::new(ConversionService::new(Arc::clone(&job_store), sender));
    let rate_limiter = Arc::new(RateLimiter::new(
        settings.rate_limit.quota,
        Duration::from_secs(settings.rate_limit.window_secs),
    ));

    let state = AppState {
        conversion_service,
        rate_limiter,
    };

    let router = create_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], settings.server.port));
    tracing::info!("Listening on {}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(
        listener,
        router.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}

fn build_credential_manager(settings: &Settings) -> CredentialManager {
    let dropbox = &settings.dropbox;
    if let Some((app_key, app_secret, refresh_token)) = dropbox.refresh_triple() {
        tracing::info!("Dropbox auth: refresh token flow");
        let refresher: Arc<dyn TokenRefresher> = Arc::new(DropboxOAuthClient::new(
            app_key.to_string(),
            app_secret.to_string(),
            refresh_token.to_string(),
        ));
        CredentialManager::with_refresher(refresher, dropbox.refresh_margin_secs)
    } else if let Some(token) = &dropbox.access_token {
        tracing::info!("Dropbox auth: static access token");
        CredentialManager::with_static_token(token.clone())
    } else {
        tracing::info!("Dropbox auth not configured; uploads will fail if requested");
        CredentialManager::unconfigured()
    }
}
