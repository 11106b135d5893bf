use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use client_core::{
    Action, ApiBase, DataSource, FixedDataSource, LoadCoordinator, PlayerService, RemoteMovieSource,
    RequestDescriptor, ReqwestTransport, ResilientFetcher,
};
use shared::domain::{Movie, PlayerId};
use tracing::info;
use tracing_subscriber::EnvFilter;

mod config;
mod view;

use config::{load_settings, Settings};

#[derive(Parser, Debug)]
#[command(name = "viewer", about = "Browse trending movies and player stats")]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Load and list trending movies.
    Movies {
        /// Use the built-in sample data instead of the network.
        #[arg(long)]
        fake: bool,
        #[arg(long)]
        base_url: Option<String>,
    },
    /// Look up one player by id.
    Player {
        id: i64,
        #[arg(long)]
        base_url: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();
    let args = Args::parse();
    let mut settings = load_settings();

    match args.command {
        Command::Movies { fake, base_url } => {
            if let Some(url) = base_url {
                settings.api_base_url = url;
            }
            if fake {
                show_movies(FixedDataSource::sample_movies()).await
            } else {
                show_movies(movie_source(&settings)?).await
            }
        }
        Command::Player { id, base_url } => {
            if let Some(url) = base_url {
                settings.api_base_url = url;
            }
            show_player(&settings, PlayerId(id)).await
        }
    }
}

fn fetcher(settings: &Settings) -> Result<ResilientFetcher> {
    let policy = settings.retry_policy().context("invalid retry settings")?;
    Ok(ResilientFetcher::new(ReqwestTransport::new(), policy))
}

fn movie_source(settings: &Settings) -> Result<RemoteMovieSource> {
    let timeout = settings.request_timeout().context("invalid request timeout")?;
    let base = ApiBase::parse(&settings.api_base_url)
        .with_context(|| format!("invalid api base url '{}'", settings.api_base_url))?;
    let descriptor = RequestDescriptor::trending_movies(&base)
        .with_timeout(timeout)
        .context("invalid request timeout")?;
    Ok(RemoteMovieSource::with_descriptor(fetcher(settings)?, descriptor))
}

/// Drives one screen's worth of loading and prints every state it passes through.
async fn show_movies<S: DataSource<Item = Movie>>(source: S) -> Result<()> {
    let coordinator = LoadCoordinator::new(source, "movies");
    let mut updates = coordinator.subscribe();

    let Some(task) = coordinator.send(Action::OnAppear) else {
        return Ok(());
    };
    print_lines(&view::render_movies(&updates.borrow_and_update()));

    tokio::select! {
        joined = task => joined.context("movie load task failed")?,
        _ = tokio::signal::ctrl_c() => {
            info!("viewer: interrupted, cancelling load");
            coordinator.cancel();
        }
    }

    // A cancelled load publishes its failure asynchronously.
    while coordinator.state().is_loading() {
        updates.changed().await.context("load state channel closed")?;
    }

    let state = coordinator.state();
    print_lines(&view::render_movies(&state));
    if state.error_message().is_some() {
        bail!("movies could not be loaded");
    }
    Ok(())
}

async fn show_player(settings: &Settings, id: PlayerId) -> Result<()> {
    let timeout = settings.request_timeout().context("invalid request timeout")?;
    let service = PlayerService::new(fetcher(settings)?, &settings.api_base_url)
        .and_then(|service| service.with_timeout(timeout))
        .with_context(|| format!("invalid api base url '{}'", settings.api_base_url))?;

    match service.fetch_player(id).await {
        Ok(player) => {
            print_lines(&view::render_player(&player));
            Ok(())
        }
        Err(err) => {
            println!("{}", client_core::failure_message("player", &err));
            bail!("player {id} could not be loaded");
        }
    }
}

fn print_lines(lines: &[String]) {
    for line in lines {
        println!("{line}");
    }
}
