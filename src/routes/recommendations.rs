use axum::{
    extract::{Query, State},
    Extension, Json,
};
use serde::Deserialize;
use std::sync::Arc;

use crate::{
    error::AppResult,
    middleware::request_id::RequestId,
    models::{UserId, UserRecommendation},
    routes::AppState,
};

#[derive(Debug, Deserialize)]
pub struct RecommendationQuery {
    /// The user ID
    #[serde(default = "default_user_id")]
    pub user_id: UserId,
    /// Number of recommendations
    pub n: Option<usize>,
    /// Number of similar users
    pub k: Option<usize>,
}

fn default_user_id() -> UserId {
    1
}

/// Handler for user-based recommendations
pub async fn recommend(
    State(state): State<Arc<AppState>>,
    Extension(request_id): Extension<RequestId>,
    Query(query): Query<RecommendationQuery>,
) -> AppResult<Json<Vec<UserRecommendation>>> {
    let n = query.n.unwrap_or(state.default_n);
    let k = query.k.unwrap_or(state.default_k);

    tracing::info!(
        request_id = %request_id,
        user_id = query.user_id,
        n,
        k,
        "Processing recommendation request"
    );

    let recommendations = state.service.recommend_for_user(query.user_id, n, k).await?;
    Ok(Json(recommendations))
}
