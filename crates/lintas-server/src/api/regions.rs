//! Region endpoints. Creation and updates go through the workflow so the
//! stage progression guard cannot be bypassed from the API.

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use lintas_core::models::region::{CreateRegion, Region, UpdateRegion};
use lintas_core::repository::RegionRepository;
use uuid::Uuid;

use super::AppState;
use super::error::ApiResult;
use super::types::{PageQuery, Paged};

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(list_regions).post(create_region))
        .route(
            "/{id}",
            get(get_region).put(update_region).delete(delete_region),
        )
}

async fn list_regions(
    State(state): State<Arc<AppState>>,
    Query(query): Query<PageQuery>,
) -> ApiResult<Json<Paged<Region>>> {
    let result = state.regions.list(query.pagination()).await?;
    Ok(Json(Paged::from_result(result, query)))
}

async fn create_region(
    State(state): State<Arc<AppState>>,
    Json(input): Json<CreateRegion>,
) -> ApiResult<(StatusCode, Json<Region>)> {
    let region = state.workflow.create_region(input).await?;
    Ok((StatusCode::CREATED, Json(region)))
}

async fn get_region(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Region>> {
    Ok(Json(state.regions.get_by_id(id).await?))
}

/// Applies a partial update; requested stage changes are checked against
/// the progression guard first.
async fn update_region(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(update): Json<UpdateRegion>,
) -> ApiResult<Json<Region>> {
    Ok(Json(state.workflow.advance_stage(id, update).await?))
}

async fn delete_region(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    state.regions.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
