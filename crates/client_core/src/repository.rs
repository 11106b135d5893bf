//! Data sources the load coordinator can be wired to.

use std::{
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    },
    time::Duration,
};

use async_trait::async_trait;
use chrono::NaiveDate;
use shared::{
    domain::{Movie, MovieId, Player, PlayerId},
    protocol::TrendingMoviesResponse,
};
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::{
    error::{ConfigError, FetchError},
    fetcher::{FetchOutcome, ResilientFetcher},
    request::{ApiBase, RequestDescriptor, DEFAULT_REQUEST_TIMEOUT},
    transport::{HttpTransport, ReqwestTransport},
};

/// Capability to produce the collection a screen displays.
#[async_trait]
pub trait DataSource: Send + Sync + 'static {
    type Item: Clone + Send + Sync + 'static;

    async fn fetch_data(&self, cancel: &CancellationToken) -> Result<Vec<Self::Item>, FetchError>;
}

/// Trending movies served by the remote API.
pub struct RemoteMovieSource<H = ReqwestTransport> {
    fetcher: ResilientFetcher<H>,
    descriptor: RequestDescriptor,
}

impl<H: HttpTransport> RemoteMovieSource<H> {
    pub fn new(fetcher: ResilientFetcher<H>, base_url: &str) -> Result<Self, ConfigError> {
        let base = ApiBase::parse(base_url)?;
        Ok(Self::with_descriptor(
            fetcher,
            RequestDescriptor::trending_movies(&base),
        ))
    }

    pub fn with_descriptor(fetcher: ResilientFetcher<H>, descriptor: RequestDescriptor) -> Self {
        Self {
            fetcher,
            descriptor,
        }
    }

    pub fn descriptor(&self) -> &RequestDescriptor {
        &self.descriptor
    }
}

#[async_trait]
impl<H: HttpTransport + 'static> DataSource for RemoteMovieSource<H> {
    type Item = Movie;

    async fn fetch_data(&self, cancel: &CancellationToken) -> Result<Vec<Movie>, FetchError> {
        let body: TrendingMoviesResponse = self
            .fetcher
            .fetch_with_cancel(&self.descriptor, cancel)
            .await?;
        info!(count = body.results.len(), "movies: trending list fetched");
        Ok(body.results)
    }
}

/// Fixed-data source for previews and tests.
pub struct FixedDataSource<T> {
    outcome: Result<Vec<T>, FetchError>,
    delay: Option<Duration>,
    calls: Arc<AtomicUsize>,
}

impl<T> FixedDataSource<T> {
    pub fn items(items: Vec<T>) -> Self {
        Self {
            outcome: Ok(items),
            delay: None,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn failing(err: FetchError) -> Self {
        Self {
            outcome: Err(err),
            delay: None,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Waits `delay` before answering; the wait observes cancellation.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Shared counter of `fetch_data` invocations.
    pub fn call_counter(&self) -> Arc<AtomicUsize> {
        self.calls.clone()
    }
}

impl FixedDataSource<Movie> {
    pub fn sample_movies() -> Self {
        Self::items(vec![sample_movie()])
    }
}

#[async_trait]
impl<T: Clone + Send + Sync + 'static> DataSource for FixedDataSource<T> {
    type Item = T;

    async fn fetch_data(&self, cancel: &CancellationToken) -> Result<Vec<T>, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => return Err(FetchError::Cancelled),
                _ = tokio::time::sleep(delay) => {}
            }
        }
        self.outcome.clone()
    }
}

fn sample_movie() -> Movie {
    Movie {
        id: MovieId(1),
        title: "Sample Movie".to_string(),
        overview: "This is a sample movie for preview".to_string(),
        poster_url: None,
        backdrop_url: None,
        release_date: NaiveDate::from_ymd_opt(2023, 1, 1).unwrap_or_default(),
        vote_average: 7.5,
    }
}

/// Player lookups by id.
pub struct PlayerService<H = ReqwestTransport> {
    fetcher: ResilientFetcher<H>,
    base: ApiBase,
    timeout: Duration,
}

impl<H: HttpTransport> PlayerService<H> {
    pub fn new(fetcher: ResilientFetcher<H>, base_url: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            fetcher,
            base: ApiBase::parse(base_url)?,
            timeout: DEFAULT_REQUEST_TIMEOUT,
        })
    }

    /// Per-attempt timeout for every lookup made through this service.
    pub fn with_timeout(mut self, timeout: Duration) -> Result<Self, ConfigError> {
        if timeout.is_zero() {
            return Err(ConfigError::NonPositiveTimeout(timeout));
        }
        self.timeout = timeout;
        Ok(self)
    }

    pub fn descriptor_for(&self, id: PlayerId) -> RequestDescriptor {
        RequestDescriptor::player(&self.base, id).retimed(self.timeout)
    }

    pub async fn fetch_player(&self, id: PlayerId) -> FetchOutcome<Player> {
        info!(player_id = id.0, "players: fetching");
        self.fetcher.fetch(&self.descriptor_for(id)).await
    }
}

#[cfg(test)]
#[path = "tests/repository_tests.rs"]
mod tests;
