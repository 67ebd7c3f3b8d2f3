//! HTTP server implementation using axum.

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Json, Response};
use axum::routing::{get, post};
use axum::Router;
use serde_json::json;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{debug, error, info, warn};
use yume_telemetry::Metrics;

use crate::config::IngestConfig;
use crate::error::{IngestError, IngestResult};
use crate::payload::parse_game_state;
use crate::state::GameStateStore;

/// Shared state for axum handlers.
#[derive(Clone)]
struct AppState {
    store: GameStateStore,
}

/// Create the axum router.
pub fn create_router(store: GameStateStore) -> Router {
    Router::new()
        .route("/receive_from_2kki", post(receive_game_state))
        .route("/status", get(status))
        .route("/metrics", get(metrics))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(AppState { store })
}

/// Replace the game state with the posted snapshot.
async fn receive_game_state(State(state): State<AppState>, body: Bytes) -> Response {
    match parse_game_state(&body) {
        Ok(game_state) => {
            debug!(
                game = ?game_state.game_identifier,
                location = ?game_state.location,
                players_online = game_state.players_online,
                "Game state received"
            );
            state.store.write(game_state);
            Metrics::ingest("accepted");
            Json(json!({ "status": "success" })).into_response()
        }
        Err(e) => {
            warn!(error = %e, "Rejected game state");
            Metrics::ingest("rejected");
            (
                StatusCode::BAD_REQUEST,
                Json(json!({ "status": "error", "message": e.to_string() })),
            )
                .into_response()
        }
    }
}

async fn status() -> &'static str {
    "Server is running"
}

async fn metrics() -> Response {
    match Metrics::render() {
        Ok(text) => (
            [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
            text,
        )
            .into_response(),
        Err(e) => {
            error!(error = %e, "Failed to render metrics");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

/// Serve the router on an already bound listener until `shutdown` fires.
pub async fn serve(
    listener: TcpListener,
    store: GameStateStore,
    shutdown: CancellationToken,
) -> IngestResult<()> {
    let app = create_router(store);
    axum::serve(listener, app)
        .with_graceful_shutdown(async move { shutdown.cancelled().await })
        .await?;
    info!("Ingestion server stopped");
    Ok(())
}

/// Bind the configured address and run the ingestion server.
pub async fn run_server(
    store: GameStateStore,
    config: IngestConfig,
    shutdown: CancellationToken,
) -> IngestResult<()> {
    let addr = config.bind_addr();
    let listener = TcpListener::bind(&addr)
        .await
        .map_err(|source| IngestError::Bind {
            addr: addr.clone(),
            source,
        })?;
    info!(addr = %addr, "Starting ingestion server");
    serve(listener, store, shutdown).await
}
