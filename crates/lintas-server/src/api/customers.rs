//! Customer endpoints, including usage sync and RouterOS account control.

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use lintas_core::models::billing_record::BillingRecord;
use lintas_core::models::customer::{CreateCustomer, Customer, UpdateCustomer};
use lintas_core::repository::{BillingRecordRepository, CustomerRepository};
use lintas_mikrotik::SyncSummary;
use uuid::Uuid;

use super::AppState;
use super::error::ApiResult;
use super::types::{AccountRequest, AccountResponse, PageQuery, Paged, SyncResponse};

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(list_customers).post(create_customer))
        .route("/sync", post(sync_all_customers))
        .route(
            "/{id}",
            get(get_customer).put(update_customer).delete(delete_customer),
        )
        .route("/{id}/billing", get(list_billing_records))
        .route("/{id}/sync", post(sync_customer))
        .route("/{id}/account", post(manage_account))
}

async fn list_customers(
    State(state): State<Arc<AppState>>,
    Query(query): Query<PageQuery>,
) -> ApiResult<Json<Paged<Customer>>> {
    let result = state.customers.list(query.pagination()).await?;
    Ok(Json(Paged::from_result(result, query)))
}

async fn create_customer(
    State(state): State<Arc<AppState>>,
    Json(input): Json<CreateCustomer>,
) -> ApiResult<(StatusCode, Json<Customer>)> {
    input.validate()?;
    let customer = state.customers.create(input).await?;
    Ok((StatusCode::CREATED, Json(customer)))
}

async fn get_customer(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Customer>> {
    Ok(Json(state.customers.get_by_id(id).await?))
}

async fn update_customer(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(update): Json<UpdateCustomer>,
) -> ApiResult<Json<Customer>> {
    update.validate()?;
    Ok(Json(state.customers.update(id, update).await?))
}

/// Deletes a customer along with their billing records.
async fn delete_customer(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    state.customers.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Lists the customer's billing history, newest period first. Unknown
/// customers get a 404 rather than an empty list.
async fn list_billing_records(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Vec<BillingRecord>>> {
    state.customers.get_by_id(id).await?;
    Ok(Json(state.billing.list_by_customer(id).await?))
}

/// Runs a usage sync for one customer and refreshes their billing record
/// when a report comes back.
async fn sync_customer(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<SyncResponse>> {
    let customer = state.customers.get_by_id(id).await?;

    let response = match state.mikrotik.sync_and_bill(&customer).await {
        Some((report, record)) => SyncResponse {
            synced: true,
            report: Some(report),
            billing_record: Some(record),
        },
        None => SyncResponse {
            synced: false,
            report: None,
            billing_record: None,
        },
    };

    Ok(Json(response))
}

async fn sync_all_customers(
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<SyncSummary>> {
    Ok(Json(state.mikrotik.sync_all_customers().await?))
}

async fn manage_account(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(request): Json<AccountRequest>,
) -> ApiResult<Json<AccountResponse>> {
    let customer = state.customers.get_by_id(id).await?;
    let success = state
        .mikrotik
        .manage_customer_account(&customer, request.action)
        .await;

    Ok(Json(AccountResponse { success }))
}
