// src/api/mod.rs — HTTP surface for the generation proxy

pub mod handlers;
pub mod types;

use axum::routing::{get, post};
use axum::Router;
use std::sync::Arc;
use tower_http::cors::CorsLayer;

use crate::core::dispatch::Dispatcher;
use crate::core::ledger::SessionLedger;

/// Shared state for API handlers.
#[derive(Clone)]
pub struct ApiState {
    pub ledger: Arc<SessionLedger>,
    pub dispatcher: Arc<Dispatcher>,
}

/// Build the axum router with all API routes.
pub fn build_router(state: ApiState) -> Router {
    // The caller is a browser app served from its own dev origin.
    let cors = CorsLayer::new()
        .allow_origin([
            "http://localhost:3000".parse().unwrap(),
            "http://127.0.0.1:3000".parse().unwrap(),
        ])
        .allow_methods(tower_http::cors::Any)
        .allow_headers(tower_http::cors::Any);

    Router::new()
        .route("/api/v1/generate", post(handlers::generate))
        .route("/api/v1/health", get(handlers::health))
        .layer(cors)
        .with_state(state)
}

/// Start the API server on the given port (blocking).
pub async fn start_server(port: u16, state: ApiState) -> anyhow::Result<()> {
    let addr = format!("127.0.0.1:{port}");

    let router = build_router(state);

    tracing::info!("listing-relay listening on http://{addr}");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, router).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::dispatch::{WebhookPayload, WebhookTransport};
    use crate::infra::errors::RelayError;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use std::time::Duration;
    use tower::ServiceExt;

    struct UnreachableTransport;

    #[async_trait::async_trait]
    impl WebhookTransport for UnreachableTransport {
        async fn post(
            &self,
            _payload: &WebhookPayload,
        ) -> Result<crate::api::types::GenerationResponse, RelayError> {
            Err(RelayError::DownstreamTransport("test transport".into()))
        }
    }

    fn test_state() -> ApiState {
        ApiState {
            ledger: Arc::new(SessionLedger::new(
                Duration::from_secs(600),
                Duration::from_secs(30),
            )),
            dispatcher: Arc::new(Dispatcher::new(Arc::new(UnreachableTransport), 3)),
        }
    }

    #[tokio::test]
    async fn test_health_endpoint() {
        let app = build_router(test_state());
        let req = Request::builder()
            .uri("/api/v1/health")
            .body(Body::empty())
            .unwrap();
        let resp = app.oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_unknown_route_404() {
        let app = build_router(test_state());
        let req = Request::builder()
            .uri("/api/v1/unknown")
            .body(Body::empty())
            .unwrap();
        let resp = app.oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }
}
