//! SurrealDB implementation of [`BillingRecordRepository`].
//!
//! The upsert is a select-then-write keyed on `(customer_id,
//! period_month)`; the unique composite index backs it up, so a racing
//! double-create surfaces as a validation error instead of a duplicate
//! invoice.

use chrono::{DateTime, Utc};
use lintas_core::error::LintasResult;
use lintas_core::models::billing_record::{BillingRecord, BillingStatus, UpsertBillingRecord};
use lintas_core::repository::BillingRecordRepository;
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use uuid::Uuid;

use crate::error::DbError;

/// DB-side row struct for queries where the UUID is already known.
#[derive(Debug, SurrealValue)]
struct BillingRow {
    customer_id: String,
    amount: f64,
    period_month: String,
    usage_mb: Option<f64>,
    status: String,
    due_date: DateTime<Utc>,
    paid_at: Option<DateTime<Utc>>,
    mikrotik_data: Option<serde_json::Value>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl BillingRow {
    fn into_record(self, id: Uuid) -> Result<BillingRecord, DbError> {
        let customer_id = Uuid::parse_str(&self.customer_id)
            .map_err(|e| DbError::Decode(format!("invalid UUID: {e}")))?;
        Ok(BillingRecord {
            id,
            customer_id,
            amount: self.amount,
            period_month: self.period_month,
            usage_mb: self.usage_mb,
            status: parse_status(&self.status)?,
            due_date: self.due_date,
            paid_at: self.paid_at,
            mikrotik_data: self.mikrotik_data,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

/// DB-side row struct that includes the record ID via `meta::id(id)`.
#[derive(Debug, SurrealValue)]
struct BillingRowWithId {
    record_id: String,
    customer_id: String,
    amount: f64,
    period_month: String,
    usage_mb: Option<f64>,
    status: String,
    due_date: DateTime<Utc>,
    paid_at: Option<DateTime<Utc>>,
    mikrotik_data: Option<serde_json::Value>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl BillingRowWithId {
    fn try_into_record(self) -> Result<BillingRecord, DbError> {
        let id = Uuid::parse_str(&self.record_id)
            .map_err(|e| DbError::Decode(format!("invalid UUID: {e}")))?;
        let customer_id = Uuid::parse_str(&self.customer_id)
            .map_err(|e| DbError::Decode(format!("invalid UUID: {e}")))?;
        Ok(BillingRecord {
            id,
            customer_id,
            amount: self.amount,
            period_month: self.period_month,
            usage_mb: self.usage_mb,
            status: parse_status(&self.status)?,
            due_date: self.due_date,
            paid_at: self.paid_at,
            mikrotik_data: self.mikrotik_data,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

/// Row struct for count queries.
#[derive(Debug, SurrealValue)]
struct CountRow {
    total: u64,
}

/// Row struct for the upsert's key lookup.
#[derive(Debug, SurrealValue)]
struct IdRow {
    record_id: String,
}

fn parse_status(s: &str) -> Result<BillingStatus, DbError> {
    match s {
        "pending" => Ok(BillingStatus::Pending),
        "paid" => Ok(BillingStatus::Paid),
        "overdue" => Ok(BillingStatus::Overdue),
        other => Err(DbError::Decode(format!("unknown billing status: {other}"))),
    }
}

fn status_to_string(s: &BillingStatus) -> &'static str {
    match s {
        BillingStatus::Pending => "pending",
        BillingStatus::Paid => "paid",
        BillingStatus::Overdue => "overdue",
    }
}

/// Two-decimal rounding applied to monetary and volume figures before
/// they are stored.
fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// SurrealDB implementation of the BillingRecord repository.
#[derive(Clone)]
pub struct SurrealBillingRecordRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealBillingRecordRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }
}

impl<C: Connection> BillingRecordRepository for SurrealBillingRecordRepository<C> {
    async fn upsert(&self, input: UpsertBillingRecord) -> LintasResult<BillingRecord> {
        let customer_id = input.customer_id.to_string();
        let amount = round2(input.amount);
        let usage_mb = round2(input.usage_mb);

        // Look for this period's record first; refresh it in place when
        // it exists, preserving status and payment timestamps.
        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id \
                 FROM billing_record \
                 WHERE customer_id = $customer_id \
                 AND period_month = $period_month",
            )
            .bind(("customer_id", customer_id.clone()))
            .bind(("period_month", input.period_month.clone()))
            .await
            .map_err(DbError::from)?;
        let existing: Vec<IdRow> = result.take(0).map_err(DbError::from)?;

        let (query, id_str) = match existing.into_iter().next() {
            Some(row) => (
                "UPDATE type::record('billing_record', $id) SET \
                 amount = $amount, usage_mb = $usage_mb, \
                 due_date = $due_date, mikrotik_data = $mikrotik_data, \
                 updated_at = time::now()",
                row.record_id,
            ),
            None => (
                "CREATE type::record('billing_record', $id) SET \
                 customer_id = $customer_id, \
                 period_month = $period_month, \
                 amount = $amount, usage_mb = $usage_mb, \
                 status = 'pending', due_date = $due_date, \
                 mikrotik_data = $mikrotik_data",
                Uuid::new_v4().to_string(),
            ),
        };

        let id = Uuid::parse_str(&id_str)
            .map_err(|e| DbError::Decode(format!("invalid UUID: {e}")))?;

        let result = self
            .db
            .query(query)
            .bind(("id", id_str.clone()))
            .bind(("customer_id", customer_id))
            .bind(("period_month", input.period_month))
            .bind(("amount", amount))
            .bind(("usage_mb", usage_mb))
            .bind(("due_date", input.due_date))
            .bind(("mikrotik_data", input.mikrotik_data))
            .await
            .map_err(DbError::from)?;

        let mut result = result.check().map_err(DbError::classify)?;

        let rows: Vec<BillingRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "billing_record".into(),
            id: id_str,
        })?;

        Ok(row.into_record(id)?)
    }

    async fn get_by_id(&self, id: Uuid) -> LintasResult<BillingRecord> {
        let id_str = id.to_string();

        let mut result = self
            .db
            .query("SELECT * FROM type::record('billing_record', $id)")
            .bind(("id", id_str.clone()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<BillingRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "billing_record".into(),
            id: id_str,
        })?;

        Ok(row.into_record(id)?)
    }

    async fn list_by_customer(&self, customer_id: Uuid) -> LintasResult<Vec<BillingRecord>> {
        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * \
                 FROM billing_record \
                 WHERE customer_id = $customer_id \
                 ORDER BY period_month DESC",
            )
            .bind(("customer_id", customer_id.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<BillingRowWithId> = result.take(0).map_err(DbError::from)?;

        Ok(rows
            .into_iter()
            .map(|row| row.try_into_record())
            .collect::<Result<Vec<_>, DbError>>()?)
    }

    async fn delete_by_customer(&self, customer_id: Uuid) -> LintasResult<u64> {
        let customer_id = customer_id.to_string();

        let mut result = self
            .db
            .query(
                "SELECT count() AS total FROM billing_record \
                 WHERE customer_id = $customer_id GROUP ALL",
            )
            .bind(("customer_id", customer_id.clone()))
            .await
            .map_err(DbError::from)?;
        let rows: Vec<CountRow> = result.take(0).map_err(DbError::from)?;
        let total = rows.first().map(|r| r.total).unwrap_or(0);

        self.db
            .query("DELETE billing_record WHERE customer_id = $customer_id")
            .bind(("customer_id", customer_id))
            .await
            .map_err(DbError::from)?
            .check()
            .map_err(DbError::classify)?;

        Ok(total)
    }

    async fn count_by_status(&self, status: BillingStatus) -> LintasResult<u64> {
        let mut result = self
            .db
            .query(
                "SELECT count() AS total FROM billing_record \
                 WHERE status = $status GROUP ALL",
            )
            .bind(("status", status_to_string(&status).to_string()))
            .await
            .map_err(DbError::from)?;
        let rows: Vec<CountRow> = result.take(0).map_err(DbError::from)?;
        Ok(rows.first().map(|r| r.total).unwrap_or(0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rounding_is_to_two_decimals() {
        assert_eq!(round2(250_000.0), 250_000.0);
        assert_eq!(round2(307_199.999), 307_200.0);
        assert_eq!(round2(30_720.004), 30_720.0);
    }
}
