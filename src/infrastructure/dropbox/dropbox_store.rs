use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};

use crate::application::ports::{RemoteStore, RemoteStoreError};

const API_BASE: &str = "https://api.dropboxapi.com/2";
const CONTENT_BASE: &str = "https://content.dropboxapi.com/2";

/// Dropbox HTTP API adapter. Tokens are passed per call; caching and
/// refresh belong to the credential manager.
pub struct DropboxStore {
    client: Client,
}

#[derive(Serialize)]
struct PathArg<'a> {
    path: &'a str,
}

#[derive(Serialize)]
struct UploadArg<'a> {
    path: &'a str,
    mode: &'a str,
    mute: bool,
}

#[derive(Serialize)]
struct ListLinksArg<'a> {
    path: &'a str,
    direct_only: bool,
}

#[derive(Deserialize)]
struct SharedLink {
    url: String,
}

#[derive(Deserialize)]
struct ListLinksResponse {
    links: Vec<SharedLink>,
}

#[derive(Deserialize)]
struct ApiErrorBody {
    error_summary: Option<String>,
}

impl DropboxStore {
    pub fn new() -> Self {
        Self {
            client: Client::builder()
                .timeout(Duration::from_secs(30))
                .build()
                .expect("reqwest client build never fails with valid TLS config"),
        }
    }
}

impl Default for DropboxStore {
    fn default() -> Self {
        Self::new()
    }
}

/// Dropbox requires `Dropbox-API-Arg` to be ASCII-only JSON. serde_json
/// leaves non-ASCII characters as raw UTF-8, so every character above 0x7F
/// is rewritten as a `\uXXXX` escape, with a surrogate pair for characters
/// beyond the basic multilingual plane.
pub fn header_safe_json(json: &str) -> String {
    let mut out = String::with_capacity(json.len());
    let mut units = [0u16; 2];
    for ch in json.chars() {
        if ch.is_ascii() {
            out.push(ch);
        } else {
            for unit in ch.encode_utf16(&mut units).iter() {
                out.push_str(&format!("\\u{:04x}", unit));
            }
        }
    }
    out
}

/// 401 means the token itself was rejected; everything else is a plain API
/// failure. The error summary is pulled out of the body when present.
fn classify(status: StatusCode, body: String) -> RemoteStoreError {
    let summary = serde_json::from_str::<ApiErrorBody>(&body)
        .ok()
        .and_then(|b| b.error_summary)
        .unwrap_or(body);
    if status == StatusCode::UNAUTHORIZED {
        RemoteStoreError::Auth(summary)
    } else {
        RemoteStoreError::Api(format!("HTTP {}: {}", status, summary))
    }
}

#[async_trait]
impl RemoteStore for DropboxStore {
    async fn ensure_folder(&self, access_token: &str, path: &str) -> Result<(), RemoteStoreError> {
        let response = self
            .client
            .post(format!("{}/files/create_folder_v2", API_BASE))
            .bearer_auth(access_token)
            .json(&PathArg { path })
            .send()
            .await
            .map_err(|e| RemoteStoreError::Api(format!("request failed: {}", e)))?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }
        let body = response.text().await.unwrap_or_default();
        // A conflicting folder is fine, including one a concurrent job
        // created between our calls.
        if status == StatusCode::CONFLICT && body.contains("conflict") {
            tracing::debug!(path, "Folder already exists");
            return Ok(());
        }
        Err(classify(status, body))
    }

    async fn upload(
        &self,
        access_token: &str,
        local_path: &Path,
        remote_path: &str,
    ) -> Result<(), RemoteStoreError> {
        let data = tokio::fs::read(local_path).await?;
        let arg = serde_json::to_string(&UploadArg {
            path: remote_path,
            mode: "overwrite",
            mute: true,
        })
        .map_err(|e| RemoteStoreError::Api(format!("api arg encoding: {}", e)))?;
        let arg = header_safe_json(&arg);

        let response = self
            .client
            .post(format!("{}/files/upload", CONTENT_BASE))
            .bearer_auth(access_token)
            .header("Dropbox-API-Arg", arg)
            .header(reqwest::header::CONTENT_TYPE, "application/octet-stream")
            .body(data)
            .send()
            .await
            .map_err(|e| RemoteStoreError::Api(format!("request failed: {}", e)))?;

        let status = response.status();
        if status.is_success() {
            tracing::debug!(remote_path, "Artifact uploaded");
            return Ok(());
        }
        let body = response.text().await.unwrap_or_default();
        Err(classify(status, body))
    }

    async fn shared_link(
        &self,
        access_token: &str,
        remote_path: &str,
    ) -> Result<String, RemoteStoreError> {
        let response = self
            .client
            .post(format!(
                "{}/sharing/create_shared_link_with_settings",
                API_BASE
            ))
            .bearer_auth(access_token)
            .json(&PathArg { path: remote_path })
            .send()
            .await
            .map_err(|e| RemoteStoreError::Api(format!("request failed: {}", e)))?;

        let status = response.status();
        if status.is_success() {
            let link: SharedLink = response
                .json()
                .await
                .map_err(|e| RemoteStoreError::Api(format!("invalid response: {}", e)))?;
            return Ok(link.url);
        }

        let body = response.text().await.unwrap_or_default();
        if status == StatusCode::CONFLICT && body.contains("shared_link_already_exists") {
            return self.existing_link(access_token, remote_path).await;
        }
        Err(classify(status, body))
    }
}

impl DropboxStore {
    async fn existing_link(
        &self,
        access_token: &str,
        remote_path: &str,
    ) -> Result<String, RemoteStoreError> {
        let response = self
            .client
            .post(format!("{}/sharing/list_shared_links", API_BASE))
            .bearer_auth(access_token)
            .json(&ListLinksArg {
                path: remote_path,
                direct_only: true,
            })
            .send()
            .await
            .map_err(|e| RemoteStoreError::Api(format!("request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(classify(status, body));
        }

        let listed: ListLinksResponse = response
            .json()
            .await
            .map_err(|e| RemoteStoreError::Api(format!("invalid response: {}", e)))?;
        listed
            .links
            .into_iter()
            .next()
            .map(|link| link.url)
            .ok_or_else(|| RemoteStoreError::Api("no existing shared link returned".to_string()))
    }
}
