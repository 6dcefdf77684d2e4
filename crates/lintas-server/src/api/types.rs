//! Request and response types for the admin API.

use chrono::{DateTime, Utc};
use lintas_core::models::billing_record::BillingRecord;
use lintas_core::models::customer::Customer;
use lintas_core::models::network_device::NetworkDevice;
use lintas_core::models::region::Region;
use lintas_core::repository::{PaginatedResult, Pagination};
use lintas_mikrotik::{AccountAction, UsageReport};
use serde::{Deserialize, Serialize};

/// Default page size for list endpoints.
const DEFAULT_PER_PAGE: u64 = 15;
/// Upper bound on client-requested page sizes.
const MAX_PER_PAGE: u64 = 100;

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
}

/// `?page=N&per_page=M` query parameters for list endpoints.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct PageQuery {
    pub page: Option<u64>,
    pub per_page: Option<u64>,
}

impl PageQuery {
    /// Resolves the raw parameters into a one-based page and a clamped
    /// page size.
    pub fn resolve(self) -> (u64, u64) {
        let page = self.page.unwrap_or(1).max(1);
        let per_page = self
            .per_page
            .unwrap_or(DEFAULT_PER_PAGE)
            .clamp(1, MAX_PER_PAGE);
        (page, per_page)
    }

    /// Maps the page window onto the store's offset/limit form.
    pub fn pagination(self) -> Pagination {
        let (page, per_page) = self.resolve();
        Pagination {
            offset: (page - 1) * per_page,
            limit: per_page,
        }
    }
}

/// One page of a listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Paged<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub page: u64,
    pub per_page: u64,
}

impl<T> Paged<T> {
    /// Re-attaches the page coordinates the client asked for to a store
    /// result.
    pub fn from_result(result: PaginatedResult<T>, query: PageQuery) -> Self {
        let (page, per_page) = query.resolve();
        Self {
            items: result.items,
            total: result.total,
            page,
            per_page,
        }
    }
}

/// Body for `POST /api/customers/{id}/account`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct AccountRequest {
    pub action: AccountAction,
}

/// Outcome of an account state change.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct AccountResponse {
    pub success: bool,
}

/// Outcome of a single-customer usage sync.
///
/// `synced: false` covers both customers without a RouterOS account and
/// swallowed integration failures; the two are distinguished in the logs,
/// not on the wire.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncResponse {
    pub synced: bool,
    pub report: Option<UsageReport>,
    pub billing_record: Option<BillingRecord>,
}

/// Aggregate counts for the admin dashboard.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct DashboardStats {
    pub customers: u64,
    pub active_customers: u64,
    pub network_devices: u64,
    pub active_devices: u64,
    pub regions: u64,
    pub completed_regions: u64,
    pub pending_bills: u64,
    pub overdue_bills: u64,
}

/// Dashboard payload: counts plus the five most recent rows of each
/// major table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardResponse {
    pub stats: DashboardStats,
    pub recent_customers: Vec<Customer>,
    pub recent_devices: Vec<NetworkDevice>,
    pub recent_regions: Vec<Region>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_query_defaults_to_first_page() {
        let query = PageQuery {
            page: None,
            per_page: None,
        };

        let pagination = query.pagination();
        assert_eq!(pagination.offset, 0);
        assert_eq!(pagination.limit, 15);
    }

    #[test]
    fn page_query_maps_pages_to_offsets() {
        let query = PageQuery {
            page: Some(3),
            per_page: Some(20),
        };

        let pagination = query.pagination();
        assert_eq!(pagination.offset, 40);
        assert_eq!(pagination.limit, 20);
    }

    #[test]
    fn page_query_clamps_out_of_range_values() {
        let oversized = PageQuery {
            page: Some(0),
            per_page: Some(5_000),
        };

        let (page, per_page) = oversized.resolve();
        assert_eq!(page, 1);
        assert_eq!(per_page, 100);
    }
}
