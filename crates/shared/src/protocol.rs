use serde::{Deserialize, Serialize};

use crate::domain::Movie;

/// Body of `GET /movies/trending`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendingMoviesResponse {
    pub results: Vec<Movie>,
}
