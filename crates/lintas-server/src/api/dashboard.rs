//! Admin dashboard endpoint.

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use lintas_core::models::billing_record::BillingStatus;
use lintas_core::models::customer::CustomerStatus;
use lintas_core::models::network_device::DeviceStatus;
use lintas_core::models::region::Stage;
use lintas_core::repository::{
    BillingRecordRepository, CustomerRepository, NetworkDeviceRepository, Pagination,
    RegionRepository,
};

use super::AppState;
use super::error::ApiResult;
use super::types::{DashboardResponse, DashboardStats};

/// How many recent rows of each table the dashboard shows.
const RECENT_LIMIT: u64 = 5;

/// Aggregate counts plus the most recent customers, devices and regions.
pub async fn dashboard_handler(
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<DashboardResponse>> {
    let stats = DashboardStats {
        customers: state.customers.count().await?,
        active_customers: state
            .customers
            .count_by_status(CustomerStatus::Active)
            .await?,
        network_devices: state.devices.count().await?,
        active_devices: state.devices.count_by_status(DeviceStatus::Active).await?,
        regions: state.regions.count().await?,
        completed_regions: state.regions.count_by_stage(Stage::Completed).await?,
        pending_bills: state.billing.count_by_status(BillingStatus::Pending).await?,
        overdue_bills: state.billing.count_by_status(BillingStatus::Overdue).await?,
    };

    let recent = Pagination {
        offset: 0,
        limit: RECENT_LIMIT,
    };
    let recent_customers = state.customers.list(recent.clone()).await?.items;
    let recent_devices = state.devices.list(recent.clone()).await?.items;
    let recent_regions = state.regions.list(recent).await?.items;

    Ok(Json(DashboardResponse {
        stats,
        recent_customers,
        recent_devices,
        recent_regions,
    }))
}
