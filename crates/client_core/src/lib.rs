//! Client-side data loading: a retrying HTTP fetcher, data sources built on it,
//! and a coordinator that turns UI actions into observable load state.

pub mod controller;
pub mod error;
pub mod fetcher;
pub mod repository;
pub mod request;
pub mod retry;
pub mod transport;

pub use controller::{failure_message, Action, LoadCoordinator, LoadState, ViewState};
pub use error::{ConfigError, FetchError};
pub use fetcher::{FetchOutcome, ResilientFetcher};
pub use repository::{DataSource, FixedDataSource, PlayerService, RemoteMovieSource};
pub use request::{ApiBase, HttpMethod, RequestDescriptor, DEFAULT_REQUEST_TIMEOUT};
pub use retry::RetryPolicy;
pub use tokio_util::sync::CancellationToken;
pub use transport::{HttpResponse, HttpTransport, ReqwestTransport};

#[cfg(test)]
#[path = "tests/support.rs"]
mod test_support;
