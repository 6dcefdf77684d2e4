//! Schema definitions and migration runner for SurrealDB.
//!
//! All table definitions use SCHEMAFULL mode for data integrity.
//! UUIDs are stored as strings. Enums are stored as strings with
//! ASSERT constraints for validation. Free-form JSON payloads
//! (region planning artifacts, router usage snapshots) are FLEXIBLE
//! objects.

use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use tracing::info;

use crate::error::DbError;

// -----------------------------------------------------------------------
// Migration tracking
// -----------------------------------------------------------------------

const MIGRATION_TABLE_DDL: &str = "\
DEFINE TABLE IF NOT EXISTS _migration SCHEMAFULL;
DEFINE FIELD IF NOT EXISTS version ON TABLE _migration TYPE int;
DEFINE FIELD IF NOT EXISTS name ON TABLE _migration TYPE string;
DEFINE FIELD IF NOT EXISTS applied_at ON TABLE _migration TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX IF NOT EXISTS idx_migration_version ON TABLE _migration \
    COLUMNS version UNIQUE;
";

#[derive(Debug, SurrealValue)]
struct MigrationRecord {
    version: u32,
    #[allow(dead_code)]
    name: String,
}

struct Migration {
    version: u32,
    name: &'static str,
    sql: &'static str,
}

static MIGRATIONS: &[Migration] = &[Migration {
    version: 1,
    name: "initial_schema",
    sql: SCHEMA_V1,
}];

// -----------------------------------------------------------------------
// Schema v1 — initial table definitions
// -----------------------------------------------------------------------

const SCHEMA_V1: &str = "\
-- =======================================================================
-- Customers (subscribers)
-- =======================================================================
DEFINE TABLE customer SCHEMAFULL;
DEFINE FIELD name ON TABLE customer TYPE string;
DEFINE FIELD email ON TABLE customer TYPE string;
DEFINE FIELD phone ON TABLE customer TYPE option<string>;
DEFINE FIELD address ON TABLE customer TYPE option<string>;
DEFINE FIELD status ON TABLE customer TYPE string \
    ASSERT $value IN ['active', 'inactive', 'suspended'];
DEFINE FIELD mikrotik_username ON TABLE customer TYPE option<string>;
DEFINE FIELD package ON TABLE customer TYPE option<string>;
DEFINE FIELD last_usage_sync ON TABLE customer TYPE option<datetime>;
DEFINE FIELD created_at ON TABLE customer TYPE datetime \
    DEFAULT time::now();
DEFINE FIELD updated_at ON TABLE customer TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_customer_email ON TABLE customer \
    COLUMNS email UNIQUE;
DEFINE INDEX idx_customer_status ON TABLE customer COLUMNS status;

-- =======================================================================
-- Regions (fiber build-out areas)
-- =======================================================================
DEFINE TABLE region SCHEMAFULL;
DEFINE FIELD name ON TABLE region TYPE string;
DEFINE FIELD code ON TABLE region TYPE string;
DEFINE FIELD description ON TABLE region TYPE option<string>;
DEFINE FIELD stage ON TABLE region TYPE string \
    ASSERT $value IN ['data', 'design', 'rab', 'permits', 'completed'];
DEFINE FIELD data_completed ON TABLE region TYPE bool DEFAULT false;
DEFINE FIELD design_completed ON TABLE region TYPE bool DEFAULT false;
DEFINE FIELD rab_completed ON TABLE region TYPE bool DEFAULT false;
DEFINE FIELD permits_completed ON TABLE region TYPE bool DEFAULT false;
DEFINE FIELD boundaries ON TABLE region TYPE option<object> FLEXIBLE;
DEFINE FIELD design_data ON TABLE region TYPE option<object> FLEXIBLE;
DEFINE FIELD rab_data ON TABLE region TYPE option<object> FLEXIBLE;
DEFINE FIELD permits_data ON TABLE region TYPE option<object> FLEXIBLE;
DEFINE FIELD created_at ON TABLE region TYPE datetime \
    DEFAULT time::now();
DEFINE FIELD updated_at ON TABLE region TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_region_code ON TABLE region COLUMNS code UNIQUE;
DEFINE INDEX idx_region_stage ON TABLE region COLUMNS stage;

-- =======================================================================
-- Billing records (one per customer per period month)
-- =======================================================================
DEFINE TABLE billing_record SCHEMAFULL;
DEFINE FIELD customer_id ON TABLE billing_record TYPE string;
DEFINE FIELD amount ON TABLE billing_record TYPE float;
DEFINE FIELD period_month ON TABLE billing_record TYPE string;
DEFINE FIELD usage_mb ON TABLE billing_record TYPE option<float>;
DEFINE FIELD status ON TABLE billing_record TYPE string \
    ASSERT $value IN ['pending', 'paid', 'overdue'];
DEFINE FIELD due_date ON TABLE billing_record TYPE datetime;
DEFINE FIELD paid_at ON TABLE billing_record TYPE option<datetime>;
DEFINE FIELD mikrotik_data ON TABLE billing_record \
    TYPE option<object> FLEXIBLE;
DEFINE FIELD created_at ON TABLE billing_record TYPE datetime \
    DEFAULT time::now();
DEFINE FIELD updated_at ON TABLE billing_record TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_billing_customer_period ON TABLE billing_record \
    COLUMNS customer_id, period_month UNIQUE;
DEFINE INDEX idx_billing_status ON TABLE billing_record COLUMNS status;

-- =======================================================================
-- Network devices (deployed field equipment)
-- =======================================================================
DEFINE TABLE network_device SCHEMAFULL;
DEFINE FIELD name ON TABLE network_device TYPE string;
DEFINE FIELD device_type ON TABLE network_device TYPE string \
    ASSERT $value IN ['ODC', 'ODP', 'closure', 'router', 'switch'];
DEFINE FIELD latitude ON TABLE network_device TYPE float;
DEFINE FIELD longitude ON TABLE network_device TYPE float;
DEFINE FIELD address ON TABLE network_device TYPE option<string>;
DEFINE FIELD status ON TABLE network_device TYPE string \
    ASSERT $value IN ['active', 'inactive', 'maintenance'];
DEFINE FIELD port_count ON TABLE network_device TYPE option<int>;
DEFINE FIELD ports_used ON TABLE network_device TYPE int DEFAULT 0;
DEFINE FIELD notes ON TABLE network_device TYPE option<string>;
DEFINE FIELD created_at ON TABLE network_device TYPE datetime \
    DEFAULT time::now();
DEFINE FIELD updated_at ON TABLE network_device TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_device_status ON TABLE network_device COLUMNS status;
";

// -----------------------------------------------------------------------
// Migration runner
// -----------------------------------------------------------------------

/// Applies any schema migrations the database has not seen yet.
///
/// Safe to run on every startup: applied versions are tracked in the
/// `_migration` table and skipped on subsequent runs.
pub async fn run_migrations<C: Connection>(db: &Surreal<C>) -> Result<(), DbError> {
    // Ensure migration tracking table exists (idempotent).
    db.query(MIGRATION_TABLE_DDL)
        .await?
        .check()
        .map_err(|e| DbError::Migration(e.to_string()))?;

    // Determine current schema version.
    let mut result = db
        .query("SELECT * FROM _migration ORDER BY version DESC LIMIT 1")
        .await?;
    let records: Vec<MigrationRecord> = result.take(0)?;
    let current_version = records.first().map(|m| m.version).unwrap_or(0);

    for migration in MIGRATIONS {
        if migration.version > current_version {
            info!(
                version = migration.version,
                name = migration.name,
                "Applying migration"
            );
            db.query(migration.sql).await?.check().map_err(|e| {
                DbError::Migration(format!(
                    "Migration v{} '{}' failed: {}",
                    migration.version, migration.name, e,
                ))
            })?;

            // Record the applied migration.
            db.query(
                "CREATE _migration SET version = $version, \
                 name = $name",
            )
            .bind(("version", migration.version))
            .bind(("name", migration.name))
            .await?
            .check()
            .map_err(|e| {
                DbError::Migration(format!(
                    "Failed to record migration v{}: {}",
                    migration.version, e,
                ))
            })?;

            info!(
                version = migration.version,
                "Migration applied successfully"
            );
        }
    }

    Ok(())
}

/// Returns the raw schema DDL for version 1.
///
/// Exposed for testing with in-memory SurrealDB instances that
/// bypass the migration runner.
pub fn schema_v1() -> &'static str {
    SCHEMA_V1
}
