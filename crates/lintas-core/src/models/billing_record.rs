//! Billing record domain model.
//!
//! One record per customer per calendar month, written by the usage sync.
//! The `(customer_id, period_month)` pair is the natural key; re-syncing
//! within the same month refreshes the existing record in place.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum BillingStatus {
    Pending,
    Paid,
    Overdue,
}

/// A monthly invoice line for one customer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BillingRecord {
    pub id: Uuid,
    pub customer_id: Uuid,
    /// Amount due in IDR, rounded to two decimals at persistence time.
    pub amount: f64,
    /// Billing period key in `YYYY-MM` form (e.g., `2026-08`).
    pub period_month: String,
    /// Metered volume for the period, in megabytes.
    pub usage_mb: Option<f64>,
    pub status: BillingStatus,
    pub due_date: DateTime<Utc>,
    pub paid_at: Option<DateTime<Utc>>,
    /// Raw usage report snapshot from the router at sync time.
    pub mikrotik_data: Option<serde_json::Value>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Values written by the monthly usage upsert. New records start out
/// [`BillingStatus::Pending`]; refreshed ones keep their status and
/// payment timestamps.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpsertBillingRecord {
    pub customer_id: Uuid,
    pub period_month: String,
    pub amount: f64,
    pub usage_mb: f64,
    pub due_date: DateTime<Utc>,
    pub mikrotik_data: serde_json::Value,
}
