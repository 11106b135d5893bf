//! Text rendering of the observable load state.

use client_core::{LoadState, ViewState};
use shared::domain::{Movie, Player};

pub const LOADING_LINE: &str = "Loading...";
pub const EMPTY_LINE: &str = "No movies found";
pub const RETRY_HINT: &str = "Run the command again to retry.";

pub fn render_movies(state: &ViewState<Movie>) -> Vec<String> {
    match state.load() {
        LoadState::Idle => Vec::new(),
        LoadState::Loading => vec![LOADING_LINE.to_string()],
        LoadState::Failed(message) => vec![message.clone(), RETRY_HINT.to_string()],
        LoadState::Loaded(movies) if movies.is_empty() => vec![EMPTY_LINE.to_string()],
        LoadState::Loaded(movies) => movies.iter().map(movie_row).collect(),
    }
}

fn movie_row(movie: &Movie) -> String {
    format!(
        "{:<40} {}  ★ {}",
        movie.title,
        movie.release_date.format("%Y-%m-%d"),
        movie.rating_label()
    )
}

pub fn render_player(player: &Player) -> Vec<String> {
    let mut lines = vec![format!("{} ({})", player.name, player.team)];
    lines.extend(
        player
            .stats
            .iter()
            .map(|(stat, value)| format!("  {stat:<12} {value:.1}")),
    );
    lines
}

#[cfg(test)]
#[path = "tests/view_tests.rs"]
mod tests;
