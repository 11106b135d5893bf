//! Fetch-with-retry-and-decode.
//!
//! One logical fetch makes up to `max_attempts` exchanges. Timeouts, transport
//! errors and non-2xx statuses are retried with exponential backoff; a body
//! that fails to decode ends the fetch immediately.

use serde::de::DeserializeOwned;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::{
    error::FetchError,
    request::RequestDescriptor,
    retry::RetryPolicy,
    transport::{HttpResponse, HttpTransport, ReqwestTransport},
};

/// Result of one logical fetch.
pub type FetchOutcome<T> = Result<T, FetchError>;

pub struct ResilientFetcher<H = ReqwestTransport> {
    transport: H,
    policy: RetryPolicy,
}

impl ResilientFetcher<ReqwestTransport> {
    pub fn with_defaults() -> Self {
        Self::new(ReqwestTransport::new(), RetryPolicy::default())
    }
}

impl<H: HttpTransport> ResilientFetcher<H> {
    pub fn new(transport: H, policy: RetryPolicy) -> Self {
        Self { transport, policy }
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    pub fn transport(&self) -> &H {
        &self.transport
    }

    pub async fn fetch<T: DeserializeOwned>(&self, descriptor: &RequestDescriptor) -> FetchOutcome<T> {
        self.fetch_with_cancel(descriptor, &CancellationToken::new())
            .await
    }

    /// Like [`fetch`](Self::fetch), but aborts with `Cancelled` as soon as `cancel`
    /// fires, whether the exchange is outstanding or the fetch is backing off.
    pub async fn fetch_with_cancel<T: DeserializeOwned>(
        &self,
        descriptor: &RequestDescriptor,
        cancel: &CancellationToken,
    ) -> FetchOutcome<T> {
        let mut ctx = self.policy.context();
        loop {
            let attempt = ctx.begin_attempt();
            let delay = self.policy.delay_before(attempt);
            if !delay.is_zero() {
                tokio::select! {
                    biased;
                    _ = cancel.cancelled() => {
                        info!(attempt, url = %descriptor.url(), "fetch: cancelled during backoff");
                        return Err(FetchError::Cancelled);
                    }
                    _ = tokio::time::sleep(delay) => {}
                }
            }

            debug!(
                attempt,
                max_attempts = self.policy.max_attempts(),
                method = %descriptor.method(),
                url = %descriptor.url(),
                "fetch: attempt"
            );

            let exchange = tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    info!(attempt, url = %descriptor.url(), "fetch: cancelled while request outstanding");
                    return Err(FetchError::Cancelled);
                }
                result = self.transport.execute(descriptor) => result,
            };

            let err = match exchange.and_then(check_status) {
                Ok(response) => return decode(&response.body),
                Err(err) => err,
            };

            if !err.is_retryable() {
                return Err(err);
            }

            if ctx.is_exhausted() {
                warn!(
                    attempts = ctx.attempts_made(),
                    url = %descriptor.url(),
                    error = %err,
                    "fetch: retries exhausted"
                );
                return Err(FetchError::RetriesExhausted {
                    attempts: ctx.attempts_made(),
                    last: Box::new(err),
                });
            }

            warn!(
                attempt,
                max_attempts = self.policy.max_attempts(),
                backoff_ms = self.policy.delay_before(attempt + 1).as_millis() as u64,
                error = %err,
                "fetch: retrying after transient failure"
            );
        }
    }
}

fn check_status(response: HttpResponse) -> Result<HttpResponse, FetchError> {
    if response.is_success() {
        Ok(response)
    } else {
        Err(FetchError::BadStatus(response.status))
    }
}

fn decode<T: DeserializeOwned>(body: &[u8]) -> FetchOutcome<T> {
    serde_json::from_slice(body).map_err(|err| {
        warn!(error = %err, body_len = body.len(), "fetch: response failed to decode");
        FetchError::DecodeError(err.to_string())
    })
}

#[cfg(test)]
#[path = "tests/fetcher_tests.rs"]
mod tests;
