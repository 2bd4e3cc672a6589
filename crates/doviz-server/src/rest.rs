//! HTTP surface: a single `GET /` serving the current quote snapshot.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use doviz::{Fetcher, Snapshot};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use crate::config::UpstreamPolicy;

/// State shared by every request. Immutable after startup.
pub struct AppState {
    pub fetcher: Fetcher,
    pub policy: UpstreamPolicy,
}

/// Build the axum Router.
pub fn router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(handle_quotes))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Bind `addr` and serve until ctrl-c.
pub async fn start(addr: SocketAddr, state: Arc<AppState>) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("listening on http://{}", listener.local_addr()?);

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
    info!("received shutdown signal");
}

/// One fetch-parse-render cycle per request.
async fn handle_quotes(State(state): State<Arc<AppState>>) -> Response {
    let fetched = state.fetcher.fetch().await;
    let assembled = Snapshot::assemble(fetched);

    let status = match (&assembled.upstream_error, state.policy) {
        (Some(_), UpstreamPolicy::Surface) => StatusCode::BAD_GATEWAY,
        _ => StatusCode::OK,
    };

    render(status, &assembled.snapshot)
}

fn render(status: StatusCode, snapshot: &Snapshot) -> Response {
    match snapshot.to_json() {
        Ok(body) => (status, [(header::CONTENT_TYPE, "application/json")], body).into_response(),
        // Unreachable with the current Snapshot: string keys and derived
        // serializers only.
        Err(e) => {
            error!("failed to encode snapshot: {e}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to encode response",
            )
                .into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    #[tokio::test]
    async fn test_render_sets_json_content_type() {
        let response = render(StatusCode::OK, &Snapshot::empty());
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "application/json"
        );

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(value["Status"], "");
        assert!(value["Others"].as_object().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_render_keeps_requested_status() {
        let response = render(StatusCode::BAD_GATEWAY, &Snapshot::empty());
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    }
}
