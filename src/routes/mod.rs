use axum::{
    http::StatusCode,
    middleware,
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{
    middleware::request_id::{make_span_with_request_id, request_id_middleware},
    services::RecommendationService,
};

pub mod recommendations;
pub mod similar;

/// Shared state for request handlers
pub struct AppState {
    pub service: RecommendationService,
    /// Used when a request omits `n`
    pub default_n: usize,
    /// Used when a request omits `k`
    pub default_k: usize,
}

impl AppState {
    pub fn new(service: RecommendationService) -> Self {
        Self {
            service,
            default_n: 5,
            default_k: 10,
        }
    }

    pub fn with_defaults(mut self, n: usize, k: usize) -> Self {
        self.default_n = n;
        self.default_k = k;
        self
    }
}

/// Creates the application router with all routes
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .nest("/api/v1", api_routes())
        .with_state(state)
        .layer(TraceLayer::new_for_http().make_span_with(make_span_with_request_id))
        .layer(middleware::from_fn(request_id_middleware))
        .layer(CorsLayer::permissive())
}

/// API routes under /api/v1
fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/recommendations", get(recommendations::recommend))
        .route("/movies/:movie_id/similar", get(similar::similar_movies))
        .route("/similarity/rebuild", post(similar::rebuild))
}

/// Health check endpoint
async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{FileSimilarityStore, InMemoryDataSource};
    use crate::services::SimilarityCache;
    use axum::{body::Body, http::Request};
    use tower::ServiceExt;

    fn app(dir: &tempfile::TempDir) -> Router {
        let source = Arc::new(InMemoryDataSource::default());
        let store = Arc::new(FileSimilarityStore::new(dir.path().join("items.bin")));
        let service =
            RecommendationService::new(source.clone(), source, SimilarityCache::new(store));
        create_router(Arc::new(AppState::new(service).with_defaults(3, 4)))
    }

    #[tokio::test]
    async fn test_health_route() {
        let dir = tempfile::tempdir().unwrap();

        let response = app(&dir)
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_incoming_request_id_is_kept() {
        let dir = tempfile::tempdir().unwrap();
        let id = uuid::Uuid::new_v4().to_string();

        let response = app(&dir)
            .oneshot(
                Request::builder()
                    .uri("/health")
                    .header("x-request-id", &id)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.headers()["x-request-id"], id.as_str());
    }

    #[tokio::test]
    async fn test_empty_dataset_user_not_found() {
        let dir = tempfile::tempdir().unwrap();

        let response = app(&dir)
            .oneshot(
                Request::builder()
                    .uri("/api/v1/recommendations?user_id=1")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_state_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let source = Arc::new(InMemoryDataSource::default());
        let store = Arc::new(FileSimilarityStore::new(dir.path().join("items.bin")));
        let service =
            RecommendationService::new(source.clone(), source, SimilarityCache::new(store));

        let state = AppState::new(service);
        assert_eq!((state.default_n, state.default_k), (5, 10));

        let state = state.with_defaults(3, 4);
        assert_eq!((state.default_n, state.default_k), (3, 4));
    }
}
