//! HTTP transport abstraction.
//!
//! A transport performs exactly one network exchange per call and reports only
//! connection-level failures. Status codes are classified by the fetcher.

use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use crate::{error::FetchError, request::RequestDescriptor};

/// Raw response of a single exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// Execute one request. Errors are limited to `Timeout` and `Transport`.
    async fn execute(&self, descriptor: &RequestDescriptor) -> Result<HttpResponse, FetchError>;
}

/// Production transport over a shared reqwest client.
#[derive(Debug, Clone, Default)]
pub struct ReqwestTransport {
    http: Client,
}

impl ReqwestTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_client(http: Client) -> Self {
        Self { http }
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn execute(&self, descriptor: &RequestDescriptor) -> Result<HttpResponse, FetchError> {
        let response = self
            .http
            .request(descriptor.method().into(), descriptor.url().clone())
            .timeout(descriptor.timeout())
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status().as_u16();
        let body = response.bytes().await.map_err(map_reqwest_error)?.to_vec();

        debug!(
            method = %descriptor.method(),
            url = %descriptor.url(),
            status,
            response_len = body.len(),
            "transport: exchange completed"
        );

        Ok(HttpResponse { status, body })
    }
}

fn map_reqwest_error(err: reqwest::Error) -> FetchError {
    if err.is_timeout() {
        FetchError::Timeout
    } else {
        FetchError::Transport(err.to_string())
    }
}

#[cfg(test)]
#[path = "tests/transport_tests.rs"]
mod tests;
