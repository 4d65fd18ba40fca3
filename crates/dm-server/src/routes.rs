use axum::{
    extract::{rejection::JsonRejection, State},
    routing::{get, post},
    Json, Router,
};
use dm_core::catalog::catalog_records;
use dm_core::{BusinessProfile, Metadata, Record};
use dm_retrieval::{PromptPayload, RecommendMode, Recommendation};
use dm_vectordb::IndexInfo;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::error::ApiError;
use crate::state::AppState;

type ApiResult<T> = Result<Json<T>, ApiError>;

pub fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(health))
}

pub fn index_routes() -> Router<AppState> {
    Router::new()
        .route("/api/v1/index", get(index_info))
        .route("/api/v1/index/rebuild", post(rebuild_index))
}

pub fn retrieval_routes() -> Router<AppState> {
    Router::new()
        .route("/api/v1/search", post(search))
        .route("/api/v1/compose", post(compose))
        .route("/api/v1/recommend", post(recommend))
}

async fn health(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "started_at": state.started_at.to_rfc3339(),
        "uptime_secs": state.uptime().as_secs(),
        "index_loaded": state.index().is_loaded(),
    }))
}

async fn index_info(State(state): State<AppState>) -> ApiResult<IndexInfo> {
    state
        .index()
        .info()
        .map(Json)
        .ok_or_else(|| ApiError::not_found("no index loaded"))
}

#[derive(Debug, Default, Deserialize)]
pub struct RebuildRequest {
    /// Records to index; the built-in catalog when absent.
    #[serde(default)]
    pub records: Option<Vec<Record>>,
}

async fn rebuild_index(
    State(state): State<AppState>,
    payload: Result<Json<RebuildRequest>, JsonRejection>,
) -> ApiResult<IndexInfo> {
    let Json(req) = payload?;
    let records = req.records.unwrap_or_else(catalog_records);
    let info = state.rebuild(records).await?;
    tracing::info!(dimension = info.dimension, count = info.count, "index rebuilt via API");
    Ok(Json(info))
}

#[derive(Debug, Deserialize)]
pub struct SearchRequest {
    pub query: String,
    #[serde(default)]
    pub k: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct SearchHit {
    pub id: String,
    pub score: f32,
    pub text: String,
    pub metadata: Metadata,
}

async fn search(
    State(state): State<AppState>,
    payload: Result<Json<SearchRequest>, JsonRejection>,
) -> ApiResult<Value> {
    let Json(req) = payload?;
    let k = req.k.unwrap_or(state.config.retrieval.top_k);
    let result = state.assembler.retrieve(&req.query, k).await?;
    let hits: Vec<SearchHit> = result
        .into_iter()
        .map(|hit| SearchHit {
            id: hit.record.id,
            score: hit.score,
            text: hit.record.text,
            metadata: hit.record.metadata,
        })
        .collect();
    Ok(Json(json!({ "results": hits })))
}

#[derive(Debug, Deserialize)]
pub struct ComposeRequest {
    pub instructions: String,
    pub query: String,
    #[serde(default)]
    pub k: Option<usize>,
}

async fn compose(
    State(state): State<AppState>,
    payload: Result<Json<ComposeRequest>, JsonRejection>,
) -> ApiResult<PromptPayload> {
    let Json(req) = payload?;
    let k = req.k.unwrap_or(state.config.retrieval.top_k);
    let payload = state.assembler.compose(&req.instructions, &req.query, k).await?;
    Ok(Json(payload))
}

#[derive(Debug, Deserialize)]
pub struct RecommendRequest {
    pub profile: BusinessProfile,
    #[serde(default)]
    pub mode: RecommendMode,
}

async fn recommend(
    State(state): State<AppState>,
    payload: Result<Json<RecommendRequest>, JsonRejection>,
) -> ApiResult<Recommendation> {
    let Json(req) = payload?;
    let advisor = state
        .advisor()
        .ok_or_else(|| ApiError::service_unavailable("no text generator configured"))?;
    let rec = advisor.recommend(&req.profile, req.mode).await?;
    Ok(Json(rec))
}
