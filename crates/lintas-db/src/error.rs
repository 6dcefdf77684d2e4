//! Database-specific error types and conversions.

use lintas_core::error::LintasError;

/// Unique indexes whose violations surface as field-scoped validation
/// errors instead of opaque database failures.
const UNIQUE_INDEXES: &[(&str, &str, &str)] = &[
    ("idx_customer_email", "customer", "email"),
    ("idx_region_code", "region", "code"),
    ("idx_billing_customer_period", "billing_record", "period_month"),
];

/// Database-layer error type.
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("SurrealDB error: {0}")]
    Surreal(#[from] surrealdb::Error),

    #[error("Statement failed: {0}")]
    Query(String),

    #[error("Migration failed: {0}")]
    Migration(String),

    #[error("Failed to decode row: {0}")]
    Decode(String),

    #[error("Record not found: {entity} with id {id}")]
    NotFound { entity: String, id: String },

    #[error("Duplicate {entity}: {field} already in use")]
    UniqueViolation { entity: String, field: String },
}

impl DbError {
    /// Classifies a failed statement, recognizing unique-index violations
    /// by the index name SurrealDB embeds in the message.
    pub(crate) fn classify(err: surrealdb::Error) -> Self {
        let message = err.to_string();
        if message.contains("already contains") {
            for (index, entity, field) in UNIQUE_INDEXES {
                if message.contains(index) {
                    return DbError::UniqueViolation {
                        entity: (*entity).into(),
                        field: (*field).into(),
                    };
                }
            }
        }
        DbError::Query(message)
    }
}

impl From<DbError> for LintasError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { entity, id } => LintasError::NotFound { entity, id },
            DbError::UniqueViolation { field, .. } => {
                let message = format!("this {field} is already in use");
                LintasError::Validation { field, message }
            }
            other => LintasError::Database(other.to_string()),
        }
    }
}
