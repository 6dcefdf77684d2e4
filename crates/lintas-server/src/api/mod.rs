//! HTTP admin API.
//!
//! A thin axum layer over the repositories, the region workflow and the
//! usage sync service. Handlers validate input through the core
//! `Create*`/`Update*` structs, map domain errors onto status codes via
//! [`ApiError`] and otherwise contain no business logic.

mod customers;
mod dashboard;
mod error;
mod health;
mod network_devices;
mod regions;
mod types;

pub use error::{ApiError, ApiResult};
pub use types::{
    AccountRequest, AccountResponse, DashboardResponse, DashboardStats, HealthResponse, PageQuery,
    Paged, SyncResponse,
};

use std::sync::Arc;

use axum::Router;
use axum::routing::get;
use lintas_core::LintasError;
use lintas_core::workflow::RegionWorkflow;
use lintas_db::DbManager;
use lintas_db::repository::{
    SurrealBillingRecordRepository, SurrealCustomerRepository, SurrealNetworkDeviceRepository,
    SurrealRegionRepository,
};
use lintas_mikrotik::{MikroTikService, MockRouterOs};
use surrealdb::engine::any::Any;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

/// Repository types bound to the server's `any`-engine connection.
pub type CustomerRepo = SurrealCustomerRepository<Any>;
pub type RegionRepo = SurrealRegionRepository<Any>;
pub type BillingRepo = SurrealBillingRecordRepository<Any>;
pub type DeviceRepo = SurrealNetworkDeviceRepository<Any>;
/// The usage sync service as wired in this process.
pub type SyncService = MikroTikService<MockRouterOs, CustomerRepo, BillingRepo>;

/// Shared state handed to every request handler.
pub struct AppState {
    pub customers: CustomerRepo,
    pub regions: RegionRepo,
    pub billing: BillingRepo,
    pub devices: DeviceRepo,
    pub workflow: RegionWorkflow<RegionRepo>,
    pub mikrotik: SyncService,
}

impl AppState {
    /// Wires all repositories and services over one database connection.
    pub fn new(db: &DbManager, router: MockRouterOs) -> Self {
        let client = db.client().clone();

        let customers = SurrealCustomerRepository::new(client.clone());
        let regions = SurrealRegionRepository::new(client.clone());
        let billing = SurrealBillingRecordRepository::new(client.clone());
        let devices = SurrealNetworkDeviceRepository::new(client);

        let workflow = RegionWorkflow::new(regions.clone());
        let mikrotik = MikroTikService::new(router, customers.clone(), billing.clone());

        Self {
            customers,
            regions,
            billing,
            devices,
            workflow,
            mikrotik,
        }
    }
}

/// Builds the admin API router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/dashboard", get(dashboard::dashboard_handler))
        .nest("/api/customers", customers::router())
        .nest("/api/regions", regions::router())
        .nest("/api/network-devices", network_devices::router())
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(Arc::new(state))
}

/// Binds `addr` and serves the API until the process is stopped.
pub async fn run_server(addr: &str, state: AppState) -> Result<(), LintasError> {
    let router = create_router(state);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| LintasError::Internal(format!("Bind failed: {}", e)))?;

    info!(addr = %addr, "LINTAS HTTP server listening");

    axum::serve(listener, router)
        .await
        .map_err(|e| LintasError::Internal(format!("Server error: {}", e)))
}
