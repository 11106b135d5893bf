use std::{
    sync::{
        atomic::{AtomicU32, Ordering},
        Arc,
    },
    time::Duration,
};

use axum::{extract::State, http::StatusCode, response::IntoResponse, routing::get, Json, Router};
use client_core::{
    Action, LoadCoordinator, LoadState, PlayerService, RemoteMovieSource, ReqwestTransport,
    ResilientFetcher, RetryPolicy,
};
use serde_json::json;
use shared::domain::PlayerId;
use tokio::net::TcpListener;

#[derive(Clone)]
struct Upstream {
    healthy: bool,
    requests: Arc<AtomicU32>,
}

async fn trending(State(upstream): State<Upstream>) -> impl IntoResponse {
    upstream.requests.fetch_add(1, Ordering::SeqCst);
    if !upstream.healthy {
        return (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({})));
    }
    (
        StatusCode::OK,
        Json(json!({
            "page": 1,
            "results": [
                {
                    "id": 1,
                    "title": "Sample Movie",
                    "overview": "This is a sample movie for preview",
                    "poster_url": null,
                    "backdrop_url": null,
                    "release_date": "2023-01-01",
                    "vote_average": 7.5
                },
                {
                    "id": 2,
                    "title": "Second Feature",
                    "overview": "",
                    "poster_url": "https://img.example.com/2.jpg",
                    "backdrop_url": null,
                    "release_date": "2024-05-17",
                    "vote_average": 6.4
                }
            ]
        })),
    )
}

async fn player() -> impl IntoResponse {
    Json(json!({
        "id": 7,
        "name": "A",
        "team": "Blue",
        "stats": {"ppg": 27.1}
    }))
}

async fn spawn_upstream(healthy: bool) -> (String, Arc<AtomicU32>) {
    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
    let requests = Arc::new(AtomicU32::new(0));
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    let app = Router::new()
        .route("/movies/trending", get(trending))
        .route("/players/7", get(player))
        .with_state(Upstream {
            healthy,
            requests: requests.clone(),
        });
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    (format!("http://{addr}"), requests)
}

fn fetcher() -> ResilientFetcher {
    let policy = RetryPolicy::new(3, 2.0, Duration::from_millis(10)).expect("policy");
    ResilientFetcher::new(ReqwestTransport::new(), policy)
}

#[tokio::test]
async fn appearing_screen_loads_trending_movies() {
    let (base, requests) = spawn_upstream(true).await;
    let source = RemoteMovieSource::new(fetcher(), &base).expect("source");
    let coordinator = LoadCoordinator::new(source, "movies");

    let task = coordinator.send(Action::OnAppear).expect("load started");
    assert!(coordinator.state().is_loading());
    task.await.expect("join");

    let state = coordinator.state();
    let titles: Vec<&str> = state.items().iter().map(|m| m.title.as_str()).collect();
    assert_eq!(titles, vec!["Sample Movie", "Second Feature"]);
    assert_eq!(state.items()[1].rating_label(), "6.4");
    assert_eq!(state.error_message(), None);
    assert_eq!(requests.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn failing_server_ends_in_readable_failure_and_load_data_retries() {
    let (base, requests) = spawn_upstream(false).await;
    let source = RemoteMovieSource::new(fetcher(), &base).expect("source");
    let coordinator = LoadCoordinator::new(source, "movies");

    coordinator
        .send(Action::OnAppear)
        .expect("load started")
        .await
        .expect("join");

    assert_eq!(
        coordinator.state().load(),
        &LoadState::Failed("Failed to load movies: server responded with status 500".into())
    );
    assert_eq!(requests.load(Ordering::SeqCst), 3);

    let retry = coordinator.send(Action::LoadData).expect("retry started");
    let during = coordinator.state();
    assert!(during.is_loading());
    assert_eq!(during.error_message(), None);
    retry.await.expect("join");

    assert!(coordinator.state().error_message().is_some());
    assert_eq!(requests.load(Ordering::SeqCst), 6);
}

#[tokio::test]
async fn independent_screens_load_concurrently() {
    let (base, _) = spawn_upstream(true).await;
    let movies = LoadCoordinator::new(
        RemoteMovieSource::new(fetcher(), &base).expect("source"),
        "movies",
    );
    let again = LoadCoordinator::new(
        RemoteMovieSource::new(fetcher(), &base).expect("source"),
        "movies",
    );

    let tasks = [movies.send(Action::OnAppear), again.send(Action::OnAppear)]
        .into_iter()
        .map(|task| task.expect("load started"));
    for joined in futures::future::join_all(tasks).await {
        joined.expect("join");
    }

    assert_eq!(movies.state().items().len(), 2);
    assert_eq!(again.state().items(), movies.state().items());
}

#[tokio::test]
async fn player_lookup_goes_through_the_same_fetcher() {
    let (base, _) = spawn_upstream(true).await;
    let service = PlayerService::new(fetcher(), &base).expect("service");

    let player = service.fetch_player(PlayerId(7)).await.expect("player");

    assert_eq!(player.name, "A");
    assert_eq!(player.stats.get("ppg"), Some(&27.1));
}
