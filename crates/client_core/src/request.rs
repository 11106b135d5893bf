//! Immutable descriptors for outbound requests.

use std::{fmt, time::Duration};

use shared::domain::PlayerId;
use url::Url;

use crate::error::ConfigError;

/// Per-request timeout used by the endpoint builders.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    Get,
}

impl HttpMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<HttpMethod> for reqwest::Method {
    fn from(value: HttpMethod) -> Self {
        match value {
            HttpMethod::Get => reqwest::Method::GET,
        }
    }
}

/// Root URL of the remote API, validated once; endpoint paths are appended to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiBase(Url);

impl ApiBase {
    pub fn parse(raw: &str) -> Result<Self, ConfigError> {
        let raw = raw.trim();
        let url = Url::parse(raw).map_err(|err| ConfigError::InvalidUrl {
            url: raw.to_string(),
            reason: err.to_string(),
        })?;
        if url.cannot_be_a_base() {
            return Err(ConfigError::InvalidUrl {
                url: raw.to_string(),
                reason: "url cannot carry a path".to_string(),
            });
        }
        Ok(Self(url))
    }

    pub fn as_url(&self) -> &Url {
        &self.0
    }

    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.0.clone();
        // Always `Ok`: `parse` rejects cannot-be-a-base URLs.
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }
}

/// What to call, how, and how long to wait for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestDescriptor {
    url: Url,
    method: HttpMethod,
    timeout: Duration,
}

impl RequestDescriptor {
    pub fn new(url: Url, method: HttpMethod, timeout: Duration) -> Result<Self, ConfigError> {
        if timeout.is_zero() {
            return Err(ConfigError::NonPositiveTimeout(timeout));
        }
        Ok(Self {
            url,
            method,
            timeout,
        })
    }

    /// `GET {base}/players/{id}`.
    pub fn player(base: &ApiBase, id: PlayerId) -> Self {
        Self::get(base.endpoint(&["players", &id.to_string()]))
    }

    /// `GET {base}/movies/trending`.
    pub fn trending_movies(base: &ApiBase) -> Self {
        Self::get(base.endpoint(&["movies", "trending"]))
    }

    fn get(url: Url) -> Self {
        Self {
            url,
            method: HttpMethod::Get,
            timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }

    pub fn with_timeout(self, timeout: Duration) -> Result<Self, ConfigError> {
        Self::new(self.url, self.method, timeout)
    }

    /// `timeout` must already be known to be positive.
    pub(crate) fn retimed(mut self, timeout: Duration) -> Self {
        debug_assert!(!timeout.is_zero());
        self.timeout = timeout;
        self
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn method(&self) -> HttpMethod {
        self.method
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}
