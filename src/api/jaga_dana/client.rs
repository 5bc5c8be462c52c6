use futures::stream::{BoxStream, StreamExt};
use reqwest::header::{HeaderValue, ACCEPT};
use reqwest::Client as HttpClient;
use std::collections::VecDeque;
use tracing::{debug, warn};

use super::models::{ApiError, ErrorResponse, SarRequest, SarResponse, StatusResponse};
use super::sse::SseDecoder;
use crate::models::Transaction;

/// HTTP client for the Jaga Dana monitoring backend
#[derive(Clone)]
pub struct BackendClient {
    http_client: HttpClient,
    base_url: String,
}

impl BackendClient {
    /// Create a new client against the given base URL
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            http_client: HttpClient::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Turn a non-success response into an error carrying the backend's `detail`
    async fn handle_error_response(
        status: reqwest::StatusCode,
        response: reqwest::Response,
    ) -> ApiError {
        let status_code = status.as_u16();
        let body_text = response.text().await.unwrap_or_default();

        let detail = serde_json::from_str::<ErrorResponse>(&body_text)
            .ok()
            .and_then(|body| body.detail_text())
            .unwrap_or_else(|| ApiError::fallback_detail(status_code));

        if status.is_server_error() {
            warn!("Server error {}: {}", status_code, body_text);
        }

        ApiError::Status {
            status: status_code,
            detail,
        }
    }

    /// GET /
    ///
    /// Liveness check; returns the backend's status line.
    pub async fn status(&self) -> Result<StatusResponse, ApiError> {
        let response = self
            .http_client
            .get(self.url("/"))
            .send()
            .await
            .map_err(|e| ApiError::RequestError(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            return Err(Self::handle_error_response(status, response).await);
        }

        response
            .json::<StatusResponse>()
            .await
            .map_err(|e| ApiError::DeserializationError(e.to_string()))
    }

    /// POST /generate-sar
    ///
    /// Asks the backend to write a Suspicious Activity Report narrative for
    /// one flagged transaction.
    ///
    /// # Returns
    /// * `Ok(String)` - The generated draft
    /// * `Err(ApiError)` - Non-success status (with `detail`), transport or parse failure
    pub async fn generate_sar(&self, transaction: &Transaction) -> Result<String, ApiError> {
        let body = SarRequest { transaction };

        let response = self
            .http_client
            .post(self.url("/generate-sar"))
            .json(&body)
            .send()
            .await
            .map_err(|e| ApiError::RequestError(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            return Err(Self::handle_error_response(status, response).await);
        }

        response
            .json::<SarResponse>()
            .await
            .map(|body| body.sar_draft)
            .map_err(|e| ApiError::DeserializationError(e.to_string()))
    }

    /// GET /stream
    ///
    /// Opens the server-push transaction feed. The connection lives as long as
    /// the returned stream; dropping it closes the socket.
    pub async fn open_stream(&self) -> Result<TransactionStream, ApiError> {
        let response = self
            .http_client
            .get(self.url("/stream"))
            .header(ACCEPT, HeaderValue::from_static("text/event-stream"))
            .send()
            .await
            .map_err(|e| ApiError::RequestError(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            return Err(Self::handle_error_response(status, response).await);
        }

        let body = response
            .bytes_stream()
            .map(|chunk| chunk.map(|bytes| bytes.to_vec()))
            .boxed();

        Ok(TransactionStream {
            body,
            decoder: SseDecoder::new(),
            pending: VecDeque::new(),
        })
    }
}

/// An open transaction feed
pub struct TransactionStream {
    body: BoxStream<'static, Result<Vec<u8>, reqwest::Error>>,
    decoder: SseDecoder,
    pending: VecDeque<String>,
}

impl TransactionStream {
    /// Wait for the next transaction.
    ///
    /// Returns `Ok(None)` when the server closes the stream. Frames that do not
    /// decode as a transaction are logged and skipped.
    pub async fn next_transaction(&mut self) -> Result<Option<Transaction>, ApiError> {
        loop {
            while let Some(data) = self.pending.pop_front() {
                match serde_json::from_str::<Transaction>(&data) {
                    Ok(transaction) => return Ok(Some(transaction)),
                    Err(e) => warn!("Skipping malformed stream message: {} ({})", e, data),
                }
            }

            match self.body.next().await {
                Some(Ok(chunk)) => {
                    debug!("Received {} bytes from stream", chunk.len());
                    let events = self
                        .decoder
                        .push(&chunk)
                        .map_err(|e| ApiError::StreamError(e.to_string()))?;
                    self.pending.extend(events);
                }
                Some(Err(e)) => return Err(ApiError::StreamError(e.to_string())),
                None => return Ok(None),
            }
        }
    }
}
