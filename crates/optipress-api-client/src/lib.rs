//! HTTP transport for the Optipress optimization API.
//!
//! Implements the session's transport boundary against the reference
//! deployment: a multipart POST to `/api/upload/optimize` with `image`,
//! `format`, and `quality` fields, answered with JSON
//! `{url, size, width, height, format, filename}`. The result bytes are
//! fetched from the returned URL.

use async_trait::async_trait;
use bytes::Bytes;
use optipress_core::{
    FormatTag, OptimizationRequest, OptimizationResult, OptimizeResponse, OutputFormat,
    TransportError,
};
use optipress_session::OptimizeTransport;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

const OPTIMIZE_PATH: &str = "/api/upload/optimize";

/// Error body shape of the reference server.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: Option<String>,
    message: Option<String>,
}

/// HTTP client for the optimization endpoint.
///
/// The request timeout lives here: bounding latency is the transport
/// layer's job, the session enforces none of its own.
#[derive(Clone, Debug)]
pub struct OptimizeApiClient {
    client: Client,
    base_url: String,
}

impl OptimizeApiClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self, TransportError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(60))
            .build()
            .map_err(|e| TransportError::Network(e.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// Create client from environment: OPTIPRESS_API_URL, defaulting to a
    /// local dev server.
    pub fn from_env() -> Result<Self, TransportError> {
        let base_url = std::env::var("OPTIPRESS_API_URL")
            .unwrap_or_else(|_| "http://localhost:3000".to_string());
        Self::new(base_url)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn build_url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Resolve a result URL from the response body, which may be relative
    /// to the API host.
    fn resolve_url(&self, url: &str) -> String {
        if url.starts_with("http://") || url.starts_with("https://") {
            url.to_string()
        } else {
            self.build_url(url)
        }
    }

    async fn fetch_result_bytes(&self, url: &str) -> Result<Bytes, TransportError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| TransportError::Network(e.to_string()))?;

        if !response.status().is_success() {
            return Err(TransportError::Server(format!(
                "Failed to fetch optimized image: HTTP {}",
                response.status()
            )));
        }

        response
            .bytes()
            .await
            .map_err(|e| TransportError::Network(e.to_string()))
    }
}

#[async_trait]
impl OptimizeTransport for OptimizeApiClient {
    async fn submit_optimization(
        &self,
        request: &OptimizationRequest,
    ) -> Result<OptimizationResult, TransportError> {
        let form = reqwest::multipart::Form::new()
            .part(
                "image",
                reqwest::multipart::Part::bytes(request.source.to_vec())
                    .file_name("image".to_string()),
            )
            .text("format", request.target_format.as_str())
            .text("quality", request.quality.to_string());

        let response = self
            .client
            .post(self.build_url(OPTIMIZE_PATH))
            .multipart(form)
            .send()
            .await
            .map_err(|e| TransportError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .json::<ErrorBody>()
                .await
                .ok()
                .and_then(|body| body.message.or(body.error))
                .unwrap_or_else(|| format!("HTTP {}", status));
            return Err(TransportError::Server(message));
        }

        let body: OptimizeResponse = response
            .json()
            .await
            .map_err(|e| TransportError::Server(e.to_string()))?;

        tracing::debug!(
            size = body.size,
            width = body.width,
            height = body.height,
            format = %body.format,
            "Optimization response received"
        );

        let bytes = self.fetch_result_bytes(&self.resolve_url(&body.url)).await?;

        let format = OutputFormat::parse(&body.format)
            .map(OutputFormat::as_tag)
            .unwrap_or(FormatTag::Unknown);

        Ok(OptimizationResult {
            bytes,
            width_px: body.width,
            height_px: body.height,
            size_bytes: body.size,
            format,
        })
    }
}
