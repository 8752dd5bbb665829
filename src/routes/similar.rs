use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::{
    error::AppResult,
    middleware::request_id::RequestId,
    models::{ItemRecommendation, MovieId},
    routes::AppState,
};

#[derive(Debug, Deserialize)]
pub struct SimilarQuery {
    pub n: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct RebuildResponse {
    pub item_count: usize,
    pub rebuilt_at: DateTime<Utc>,
}

/// Handler for movies similar to a given movie
pub async fn similar_movies(
    State(state): State<Arc<AppState>>,
    Extension(request_id): Extension<RequestId>,
    Path(movie_id): Path<MovieId>,
    Query(query): Query<SimilarQuery>,
) -> AppResult<Json<Vec<ItemRecommendation>>> {
    let n = query.n.unwrap_or(state.default_n);

    tracing::info!(
        request_id = %request_id,
        movie_id,
        n,
        "Processing similar movies request"
    );

    let recommendations = state.service.recommend_for_item(movie_id, n).await?;
    Ok(Json(recommendations))
}

/// Handler that recomputes the stored item similarity
pub async fn rebuild(
    State(state): State<Arc<AppState>>,
    Extension(request_id): Extension<RequestId>,
) -> AppResult<Json<RebuildResponse>> {
    let item_count = state.service.rebuild_item_similarity().await?;

    tracing::info!(
        request_id = %request_id,
        item_count,
        "Item similarity rebuilt"
    );

    Ok(Json(RebuildResponse {
        item_count,
        rebuilt_at: Utc::now(),
    }))
}
