//! Usage sync and account management orchestration.
//!
//! Router and store failures inside a sync never reach the caller as
//! errors: they are logged with the affected customer's identity and
//! collapse into `None`, `false` or the batch failure tally. Each
//! customer commits independently, so a batch run is safe to repeat.

use chrono::{Duration, Utc};
use lintas_core::error::{LintasError, LintasResult};
use lintas_core::models::billing_record::{BillingRecord, UpsertBillingRecord};
use lintas_core::models::customer::{Customer, CustomerStatus, UpdateCustomer};
use lintas_core::repository::{BillingRecordRepository, CustomerRepository};
use serde::{Deserialize, Serialize};
use tracing::{error, info};

use crate::billing::{bytes_to_mb, compute_billing_amount};
use crate::client::{AccountAction, RouterOsClient, UsageReport};

/// Outcome tally of a batch sync run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncSummary {
    pub success: u64,
    pub failed: u64,
    pub total: u64,
}

/// Usage-sync and billing service.
///
/// Generic over the router client and the repositories so the
/// orchestration carries no transport or database dependency of its
/// own.
pub struct MikroTikService<R, C, B>
where
    R: RouterOsClient,
    C: CustomerRepository,
    B: BillingRecordRepository,
{
    router: R,
    customer_repo: C,
    billing_repo: B,
}

impl<R, C, B> MikroTikService<R, C, B>
where
    R: RouterOsClient,
    C: CustomerRepository,
    B: BillingRecordRepository,
{
    pub fn new(router: R, customer_repo: C, billing_repo: B) -> Self {
        Self {
            router,
            customer_repo,
            billing_repo,
        }
    }

    /// Pulls one customer's usage counters from the router and stamps
    /// `last_usage_sync`.
    ///
    /// Customers without a RouterOS account are skipped with `None` and
    /// no store mutation. Router or store failures are logged and also
    /// surface as `None`.
    pub async fn sync_customer_usage(&self, customer: &Customer) -> Option<UsageReport> {
        let username = customer.mikrotik_username.as_deref()?;

        let report = match self.router.fetch_usage_report(username).await {
            Ok(report) => report,
            Err(e) => {
                error!(
                    customer_id = %customer.id,
                    mikrotik_username = %username,
                    error = %e,
                    "Usage sync failed"
                );
                return None;
            }
        };

        let stamp = UpdateCustomer {
            last_usage_sync: Some(Utc::now()),
            ..Default::default()
        };
        if let Err(e) = self.customer_repo.update(customer.id, stamp).await {
            error!(
                customer_id = %customer.id,
                mikrotik_username = %username,
                error = %e,
                "Failed to record sync timestamp"
            );
            return None;
        }

        Some(report)
    }

    /// Writes this month's billing record from a usage report.
    ///
    /// Keyed on (customer, `YYYY-MM`): a second sync within the month
    /// refreshes amount, usage and snapshot in place while payment
    /// status is left alone.
    pub async fn upsert_billing_record(
        &self,
        customer: &Customer,
        report: &UsageReport,
    ) -> LintasResult<BillingRecord> {
        let now = Utc::now();
        let mikrotik_data = serde_json::to_value(report)
            .map_err(|e| LintasError::Internal(format!("usage report serialization: {e}")))?;

        self.billing_repo
            .upsert(UpsertBillingRecord {
                customer_id: customer.id,
                period_month: now.format("%Y-%m").to_string(),
                amount: compute_billing_amount(customer.package.as_deref(), report.total_bytes),
                usage_mb: bytes_to_mb(report.total_bytes),
                due_date: now + Duration::days(30),
                mikrotik_data,
            })
            .await
    }

    /// Syncs one customer and refreshes their billing record.
    ///
    /// `None` means nothing was billed: no RouterOS account, or a
    /// failure that has already been logged.
    pub async fn sync_and_bill(&self, customer: &Customer) -> Option<(UsageReport, BillingRecord)> {
        let report = self.sync_customer_usage(customer).await?;

        match self.upsert_billing_record(customer, &report).await {
            Ok(record) => {
                info!(
                    customer_id = %customer.id,
                    period_month = %record.period_month,
                    amount = record.amount,
                    "Billing record refreshed"
                );
                Some((report, record))
            }
            Err(e) => {
                error!(
                    customer_id = %customer.id,
                    error = %e,
                    "Billing upsert failed"
                );
                None
            }
        }
    }

    /// Syncs every customer that carries a RouterOS account, one at a
    /// time.
    ///
    /// Per-customer failures are tallied and the sweep continues; only
    /// the initial customer listing can fail the whole run.
    pub async fn sync_all_customers(&self) -> LintasResult<SyncSummary> {
        let customers = self.customer_repo.list_with_mikrotik().await?;

        let mut summary = SyncSummary {
            success: 0,
            failed: 0,
            total: customers.len() as u64,
        };

        for customer in &customers {
            match self.sync_and_bill(customer).await {
                Some(_) => summary.success += 1,
                None => summary.failed += 1,
            }
        }

        info!(
            total = summary.total,
            success = summary.success,
            failed = summary.failed,
            "Usage sync sweep finished"
        );

        Ok(summary)
    }

    /// Pushes an account state change to the router and mirrors it on
    /// the customer's status.
    ///
    /// Returns `false` without side effects when the customer has no
    /// RouterOS account; router or store failures are logged and
    /// likewise reported as `false`.
    pub async fn manage_customer_account(
        &self,
        customer: &Customer,
        action: AccountAction,
    ) -> bool {
        let Some(username) = customer.mikrotik_username.as_deref() else {
            return false;
        };

        if let Err(e) = self.router.set_account_state(username, action).await {
            error!(
                customer_id = %customer.id,
                mikrotik_username = %username,
                action = ?action,
                error = %e,
                "Account state change failed"
            );
            return false;
        }

        info!(
            customer_id = %customer.id,
            mikrotik_username = %username,
            action = ?action,
            "Account state changed"
        );

        let status = match action {
            AccountAction::Enable => CustomerStatus::Active,
            AccountAction::Disable => CustomerStatus::Inactive,
            AccountAction::Suspend => CustomerStatus::Suspended,
        };
        let update = UpdateCustomer {
            status: Some(status),
            ..Default::default()
        };
        if let Err(e) = self.customer_repo.update(customer.id, update).await {
            error!(
                customer_id = %customer.id,
                error = %e,
                "Failed to store account status"
            );
            return false;
        }

        true
    }
}
