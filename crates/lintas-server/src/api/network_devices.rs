//! Network device CRUD endpoints.

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use lintas_core::models::network_device::{
    CreateNetworkDevice, NetworkDevice, UpdateNetworkDevice,
};
use lintas_core::repository::NetworkDeviceRepository;
use uuid::Uuid;

use super::AppState;
use super::error::ApiResult;
use super::types::{PageQuery, Paged};

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(list_devices).post(create_device))
        .route(
            "/{id}",
            get(get_device).put(update_device).delete(delete_device),
        )
}

async fn list_devices(
    State(state): State<Arc<AppState>>,
    Query(query): Query<PageQuery>,
) -> ApiResult<Json<Paged<NetworkDevice>>> {
    let result = state.devices.list(query.pagination()).await?;
    Ok(Json(Paged::from_result(result, query)))
}

async fn create_device(
    State(state): State<Arc<AppState>>,
    Json(input): Json<CreateNetworkDevice>,
) -> ApiResult<(StatusCode, Json<NetworkDevice>)> {
    input.validate()?;
    let device = state.devices.create(input).await?;
    Ok((StatusCode::CREATED, Json(device)))
}

async fn get_device(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<NetworkDevice>> {
    Ok(Json(state.devices.get_by_id(id).await?))
}

async fn update_device(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(update): Json<UpdateNetworkDevice>,
) -> ApiResult<Json<NetworkDevice>> {
    update.validate()?;
    Ok(Json(state.devices.update(id, update).await?))
}

async fn delete_device(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    state.devices.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
