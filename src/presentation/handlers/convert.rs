use std::net::SocketAddr;

use axum::extract::{ConnectInfo, FromRequest, Request, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::application::services::SubmitError;
use crate::presentation::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ConvertRequest {
    pub url: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub upload_to_dropbox: bool,
}

#[derive(Debug, Serialize)]
pub struct ConvertResponse {
    pub job_id: String,
    pub status: String,
    pub created_at: String,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Accepts an article conversion request and hands it to the worker pool.
///
/// Admission is checked before anything else: a rate-limited caller never
/// gets a job record.
#[tracing::instrument(skip(state, request))]
pub async fn convert_handler(State(state): State<AppState>, request: Request) -> impl IntoResponse {
    let client = client_key(&request);

    if !state.rate_limiter.admit(&client).await {
        tracing::warn!(client = %client, "Submission rejected by rate limiter");
        return (
            StatusCode::TOO_MANY_REQUESTS,
            Json(ErrorResponse {
                error: "Rate limit exceeded, retry later".to_string(),
            }),
        )
            .into_response();
    }

    let Json(payload) = match Json::<ConvertRequest>::from_request(request, &()).await {
        Ok(json) => json,
        Err(rejection) => return rejection.into_response(),
    };

    if !is_fetchable_url(&payload.url) {
        tracing::warn!(url = %payload.url, "Submission rejected: not a fetchable URL");
        return (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: format!("Invalid article URL: {}", payload.url),
            }),
        )
            .into_response();
    }

    let title = payload.title.filter(|t| !t.trim().is_empty());

    match state
        .conversion_service
        .submit(payload.url, title, payload.upload_to_dropbox)
        .await
    {
        Ok(job) => (
            StatusCode::ACCEPTED,
            Json(ConvertResponse {
                job_id: job.id.to_string(),
                status: job.status.as_str().to_string(),
                created_at: job.created_at.to_rfc3339(),
                message: "Conversion started".to_string(),
            }),
        )
            .into_response(),
        Err(SubmitError::QueueFull) => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(ErrorResponse {
                error: "Conversion queue full or workers unavailable".to_string(),
            }),
        )
            .into_response(),
        Err(SubmitError::Store(e)) => {
            tracing::error!(error = %e, "Failed to create job record");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: format!("Failed to create job: {}", e),
                }),
            )
                .into_response()
        }
    }
}

fn is_fetchable_url(raw: &str) -> bool {
    match Url::parse(raw) {
        Ok(parsed) => matches!(parsed.scheme(), "http" | "https") && parsed.host().is_some(),
        Err(_) => false,
    }
}

/// Rate-limit key for the caller: the first `x-forwarded-for` hop when the
/// service sits behind a proxy, otherwise the peer address.
fn client_key(request: &Request) -> String {
    if let Some(forwarded) = request
        .headers()
        .get("x-forwarded-for")
        .and_then(|value| value.to_str().ok())
    {
        if let Some(first) = forwarded.split(',').next() {
            let first = first.trim();
            if !first.is_empty() {
                return first.to_string();
            }
        }
    }

    request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip().to_string())
        .unwrap_or_else(|| "unknown".to_string())
}
