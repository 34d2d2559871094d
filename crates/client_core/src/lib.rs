//! Client side of the lyrics video render flow: HTTP transport, UI state,
//! submission controller and local delivery of the rendered file.

use async_trait::async_trait;
use reqwest::Client;
use shared::{
    error::SubmissionError,
    protocol::{CreateVideoRequest, ServiceErrorBody, CREATE_VIDEO_PATH, GENERIC_SERVER_ERROR},
};
use thiserror::Error;
use tracing::{debug, warn};
use url::Url;

pub mod controller;
pub mod download;
pub mod state;

pub use controller::SubmissionController;
pub use download::{DownloadSink, FileDownloadTrigger, SavedVideo};
pub use state::UiStateStore;

#[derive(Debug, Error)]
pub enum ClientConfigError {
    #[error("invalid render service url '{url}': {source}")]
    InvalidUrl {
        url: String,
        source: url::ParseError,
    },
    #[error("unsupported scheme '{scheme}' in render service url; expected http or https")]
    UnsupportedScheme { scheme: String },
}

/// The remote render service, reduced to the one call the client makes.
#[async_trait]
pub trait RenderService: Send + Sync {
    /// Sends one render request and returns the raw video bytes.
    ///
    /// Non-2xx answers and transport problems are both reported as
    /// [`SubmissionError`]; implementations never retry.
    async fn create_video(&self, request: &CreateVideoRequest) -> Result<Vec<u8>, SubmissionError>;
}

/// reqwest-backed [`RenderService`] talking to `{base}/create_video`.
#[derive(Debug, Clone)]
pub struct RenderClient {
    http: Client,
    endpoint: Url,
}

impl RenderClient {
    pub fn new(server_url: &str) -> Result<Self, ClientConfigError> {
        Self::with_http_client(Client::new(), server_url)
    }

    pub fn with_http_client(http: Client, server_url: &str) -> Result<Self, ClientConfigError> {
        Ok(Self {
            http,
            endpoint: create_video_endpoint(server_url)?,
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

/// Joins [`CREATE_VIDEO_PATH`] onto `server_url`, keeping any path prefix.
pub fn create_video_endpoint(server_url: &str) -> Result<Url, ClientConfigError> {
    let base = server_url.trim().trim_end_matches('/');
    let raw = format!("{base}{CREATE_VIDEO_PATH}");
    let endpoint = Url::parse(&raw).map_err(|source| ClientConfigError::InvalidUrl {
        url: server_url.to_string(),
        source,
    })?;
    match endpoint.scheme() {
        "http" | "https" => Ok(endpoint),
        other => Err(ClientConfigError::UnsupportedScheme {
            scheme: other.to_string(),
        }),
    }
}

#[async_trait]
impl RenderService for RenderClient {
    async fn create_video(&self, request: &CreateVideoRequest) -> Result<Vec<u8>, SubmissionError> {
        let response = self
            .http
            .post(self.endpoint.clone())
            .json(request)
            .send()
            .await
            .map_err(SubmissionError::transport)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.bytes().await.map_err(SubmissionError::transport)?;
            let message = match ServiceErrorBody::message_from_bytes(&body) {
                Ok(message) => message,
                Err(error) => {
                    warn!(
                        status = status.as_u16(),
                        %error,
                        "render service failure body is not JSON"
                    );
                    GENERIC_SERVER_ERROR.to_string()
                }
            };
            return Err(SubmissionError::service(status.as_u16(), message));
        }

        let payload = response.bytes().await.map_err(SubmissionError::transport)?;
        debug!(bytes = payload.len(), "render service returned video payload");
        Ok(payload.to_vec())
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;

#[cfg(test)]
#[path = "tests/mock_render_service.rs"]
pub(crate) mod mock_render_service;
