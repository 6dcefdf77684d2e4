//! Repository trait definitions for data access abstraction.
//!
//! All repository operations are async. List operations page newest
//! first so recently touched records surface at the top of admin views.

use uuid::Uuid;

use crate::error::LintasResult;
use crate::models::{
    billing_record::{BillingRecord, BillingStatus, UpsertBillingRecord},
    customer::{CreateCustomer, Customer, CustomerStatus, UpdateCustomer},
    network_device::{CreateNetworkDevice, DeviceStatus, NetworkDevice, UpdateNetworkDevice},
    region::{CreateRegion, Region, Stage, UpdateRegion},
};

/// Pagination parameters for list queries.
#[derive(Debug, Clone)]
pub struct Pagination {
    pub offset: u64,
    pub limit: u64,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            offset: 0,
            limit: 15,
        }
    }
}

/// A paginated result set.
#[derive(Debug, Clone)]
pub struct PaginatedResult<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub offset: u64,
    pub limit: u64,
}

// ---------------------------------------------------------------------------
// Customers
// ---------------------------------------------------------------------------

pub trait CustomerRepository: Send + Sync {
    fn create(&self, input: CreateCustomer) -> impl Future<Output = LintasResult<Customer>> + Send;

    fn get_by_id(&self, id: Uuid) -> impl Future<Output = LintasResult<Customer>> + Send;

    fn get_by_email(&self, email: &str) -> impl Future<Output = LintasResult<Customer>> + Send;

    fn update(
        &self,
        id: Uuid,
        input: UpdateCustomer,
    ) -> impl Future<Output = LintasResult<Customer>> + Send;

    /// Removes the customer together with all of their billing records.
    fn delete(&self, id: Uuid) -> impl Future<Output = LintasResult<()>> + Send;

    fn list(
        &self,
        pagination: Pagination,
    ) -> impl Future<Output = LintasResult<PaginatedResult<Customer>>> + Send;

    /// All customers that carry a RouterOS account, unpaged; this is the
    /// working set of the usage sync.
    fn list_with_mikrotik(&self) -> impl Future<Output = LintasResult<Vec<Customer>>> + Send;

    fn count(&self) -> impl Future<Output = LintasResult<u64>> + Send;

    fn count_by_status(
        &self,
        status: CustomerStatus,
    ) -> impl Future<Output = LintasResult<u64>> + Send;
}

// ---------------------------------------------------------------------------
// Regions
// ---------------------------------------------------------------------------

pub trait RegionRepository: Send + Sync {
    /// Persists a new region; completion flags are derived from the
    /// stage, never taken from the caller.
    fn create(&self, input: CreateRegion) -> impl Future<Output = LintasResult<Region>> + Send;

    fn get_by_id(&self, id: Uuid) -> impl Future<Output = LintasResult<Region>> + Send;

    fn get_by_code(&self, code: &str) -> impl Future<Output = LintasResult<Region>> + Send;

    /// Applies a partial update. When the stage changes, the completion
    /// flags are recomputed in the same write.
    fn update(
        &self,
        id: Uuid,
        input: UpdateRegion,
    ) -> impl Future<Output = LintasResult<Region>> + Send;

    fn delete(&self, id: Uuid) -> impl Future<Output = LintasResult<()>> + Send;

    fn list(
        &self,
        pagination: Pagination,
    ) -> impl Future<Output = LintasResult<PaginatedResult<Region>>> + Send;

    fn count(&self) -> impl Future<Output = LintasResult<u64>> + Send;

    fn count_by_stage(&self, stage: Stage) -> impl Future<Output = LintasResult<u64>> + Send;
}

// ---------------------------------------------------------------------------
// Billing records
// ---------------------------------------------------------------------------

pub trait BillingRecordRepository: Send + Sync {
    /// Creates this month's record or refreshes it in place, keyed on
    /// `(customer_id, period_month)`.
    fn upsert(
        &self,
        input: UpsertBillingRecord,
    ) -> impl Future<Output = LintasResult<BillingRecord>> + Send;

    fn get_by_id(&self, id: Uuid) -> impl Future<Output = LintasResult<BillingRecord>> + Send;

    /// A customer's billing history, newest period first.
    fn list_by_customer(
        &self,
        customer_id: Uuid,
    ) -> impl Future<Output = LintasResult<Vec<BillingRecord>>> + Send;

    /// Removes all of a customer's billing records, returning how many
    /// were deleted.
    fn delete_by_customer(&self, customer_id: Uuid)
    -> impl Future<Output = LintasResult<u64>> + Send;

    fn count_by_status(
        &self,
        status: BillingStatus,
    ) -> impl Future<Output = LintasResult<u64>> + Send;
}

// ---------------------------------------------------------------------------
// Network devices
// ---------------------------------------------------------------------------

pub trait NetworkDeviceRepository: Send + Sync {
    fn create(
        &self,
        input: CreateNetworkDevice,
    ) -> impl Future<Output = LintasResult<NetworkDevice>> + Send;

    fn get_by_id(&self, id: Uuid) -> impl Future<Output = LintasResult<NetworkDevice>> + Send;

    fn update(
        &self,
        id: Uuid,
        input: UpdateNetworkDevice,
    ) -> impl Future<Output = LintasResult<NetworkDevice>> + Send;

    fn delete(&self, id: Uuid) -> impl Future<Output = LintasResult<()>> + Send;

    fn list(
        &self,
        pagination: Pagination,
    ) -> impl Future<Output = LintasResult<PaginatedResult<NetworkDevice>>> + Send;

    fn count(&self) -> impl Future<Output = LintasResult<u64>> + Send;

    fn count_by_status(
        &self,
        status: DeviceStatus,
    ) -> impl Future<Output = LintasResult<u64>> + Send;
}
