//! SurrealDB implementation of [`CustomerRepository`].

use chrono::{DateTime, Utc};
use lintas_core::error::LintasResult;
use lintas_core::models::customer::{CreateCustomer, Customer, CustomerStatus, UpdateCustomer};
use lintas_core::repository::{CustomerRepository, PaginatedResult, Pagination};
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use uuid::Uuid;

use crate::error::DbError;

/// DB-side row struct for queries where the UUID is already known.
#[derive(Debug, SurrealValue)]
struct CustomerRow {
    name: String,
    email: String,
    phone: Option<String>,
    address: Option<String>,
    status: String,
    mikrotik_username: Option<String>,
    package: Option<String>,
    last_usage_sync: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl CustomerRow {
    fn into_customer(self, id: Uuid) -> Result<Customer, DbError> {
        Ok(Customer {
            id,
            name: self.name,
            email: self.email,
            phone: self.phone,
            address: self.address,
            status: parse_status(&self.status)?,
            mikrotik_username: self.mikrotik_username,
            package: self.package,
            last_usage_sync: self.last_usage_sync,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

/// DB-side row struct that includes the record ID via `meta::id(id)`.
#[derive(Debug, SurrealValue)]
struct CustomerRowWithId {
    record_id: String,
    name: String,
    email: String,
    phone: Option<String>,
    address: Option<String>,
    status: String,
    mikrotik_username: Option<String>,
    package: Option<String>,
    last_usage_sync: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl CustomerRowWithId {
    fn try_into_customer(self) -> Result<Customer, DbError> {
        let id = Uuid::parse_str(&self.record_id)
            .map_err(|e| DbError::Decode(format!("invalid UUID: {e}")))?;
        Ok(Customer {
            id,
            name: self.name,
            email: self.email,
            phone: self.phone,
            address: self.address,
            status: parse_status(&self.status)?,
            mikrotik_username: self.mikrotik_username,
            package: self.package,
            last_usage_sync: self.last_usage_sync,
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

/// Row struct for existence checks.
#[derive(Debug, SurrealValue)]
struct IdRow {
    #[allow(dead_code)]
    record_id: String,
}

fn parse_status(s: &str) -> Result<CustomerStatus, DbError> {
    match s {
        "active" => Ok(CustomerStatus::Active),
        "inactive" => Ok(CustomerStatus::Inactive),
        "suspended" => Ok(CustomerStatus::Suspended),
        other => Err(DbError::Decode(format!("unknown customer status: {other}"))),
    }
}

fn status_to_string(s: &CustomerStatus) -> &'static str {
    match s {
        CustomerStatus::Active => "active",
        CustomerStatus::Inactive => "inactive",
        CustomerStatus::Suspended => "suspended",
    }
}

/// SurrealDB implementation of the Customer repository.
#[derive(Clone)]
pub struct SurrealCustomerRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealCustomerRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }
}

impl<C: Connection> CustomerRepository for SurrealCustomerRepository<C> {
    async fn create(&self, input: CreateCustomer) -> LintasResult<Customer> {
        let id = Uuid::new_v4();
        let id_str = id.to_string();
        let status = input.status.unwrap_or(CustomerStatus::Active);

        let result = self
            .db
            .query(
                "CREATE type::record('customer', $id) SET \
                 name = $name, email = $email, phone = $phone, \
                 address = $address, status = $status, \
                 mikrotik_username = $mikrotik_username, \
                 package = $package",
            )
            .bind(("id", id_str.clone()))
            .bind(("name", input.name))
            .bind(("email", input.email))
            .bind(("phone", input.phone))
            .bind(("address", input.address))
            .bind(("status", status_to_string(&status).to_string()))
            .bind(("mikrotik_username", input.mikrotik_username))
            .bind(("package", input.package))
            .await
            .map_err(DbError::from)?;

        let mut result = result.check().map_err(DbError::classify)?;

        let rows: Vec<CustomerRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "customer".into(),
            id: id_str,
        })?;

        Ok(row.into_customer(id)?)
    }

    async fn get_by_id(&self, id: Uuid) -> LintasResult<Customer> {
        let id_str = id.to_string();

        let mut result = self
            .db
            .query("SELECT * FROM type::record('customer', $id)")
            .bind(("id", id_str.clone()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<CustomerRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "customer".into(),
            id: id_str,
        })?;

        Ok(row.into_customer(id)?)
    }

    async fn get_by_email(&self, email: &str) -> LintasResult<Customer> {
        let email_owned = email.to_string();

        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * \
                 FROM customer WHERE email = $email",
            )
            .bind(("email", email_owned))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<CustomerRowWithId> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "customer".into(),
            id: format!("email={email}"),
        })?;

        Ok(row.try_into_customer()?)
    }

    async fn update(&self, id: Uuid, input: UpdateCustomer) -> LintasResult<Customer> {
        let id_str = id.to_string();

        let mut sets = Vec::new();
        if input.name.is_some() {
            sets.push("name = $name");
        }
        if input.email.is_some() {
            sets.push("email = $email");
        }
        if input.phone.is_some() {
            sets.push("phone = $phone");
        }
        if input.address.is_some() {
            sets.push("address = $address");
        }
        if input.status.is_some() {
            sets.push("status = $status");
        }
        if input.mikrotik_username.is_some() {
            sets.push("mikrotik_username = $mikrotik_username");
        }
        if input.package.is_some() {
            sets.push("package = $package");
        }
        if input.last_usage_sync.is_some() {
            sets.push("last_usage_sync = $last_usage_sync");
        }
        sets.push("updated_at = time::now()");

        let query = format!(
            "UPDATE type::record('customer', $id) SET {}",
            sets.join(", ")
        );

        let mut builder = self.db.query(&query).bind(("id", id_str.clone()));

        if let Some(name) = input.name {
            builder = builder.bind(("name", name));
        }
        if let Some(email) = input.email {
            builder = builder.bind(("email", email));
        }
        if let Some(phone) = input.phone {
            builder = builder.bind(("phone", phone));
        }
        if let Some(address) = input.address {
            builder = builder.bind(("address", address));
        }
        if let Some(status) = &input.status {
            builder = builder.bind(("status", status_to_string(status).to_string()));
        }
        if let Some(mikrotik_username) = input.mikrotik_username {
            builder = builder.bind(("mikrotik_username", mikrotik_username));
        }
        if let Some(package) = input.package {
            builder = builder.bind(("package", package));
        }
        if let Some(last_usage_sync) = input.last_usage_sync {
            builder = builder.bind(("last_usage_sync", last_usage_sync));
        }

        let result = builder.await.map_err(DbError::from)?;
        let mut result = result.check().map_err(DbError::classify)?;

        let rows: Vec<CustomerRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "customer".into(),
            id: id_str,
        })?;

        Ok(row.into_customer(id)?)
    }

    async fn delete(&self, id: Uuid) -> LintasResult<()> {
        let id_str = id.to_string();

        let mut result = self
            .db
            .query("SELECT meta::id(id) AS record_id FROM type::record('customer', $id)")
            .bind(("id", id_str.clone()))
            .await
            .map_err(DbError::from)?;
        let rows: Vec<IdRow> = result.take(0).map_err(DbError::from)?;
        if rows.is_empty() {
            return Err(DbError::NotFound {
                entity: "customer".into(),
                id: id_str,
            }
            .into());
        }

        // Billing records go with their customer, atomically.
        self.db
            .query(
                "BEGIN TRANSACTION; \
                 DELETE billing_record WHERE customer_id = $id; \
                 DELETE type::record('customer', $id); \
                 COMMIT TRANSACTION;",
            )
            .bind(("id", id_str))
            .await
            .map_err(DbError::from)?
            .check()
            .map_err(DbError::classify)?;

        Ok(())
    }

    async fn list(&self, pagination: Pagination) -> LintasResult<PaginatedResult<Customer>> {
        let mut count_result = self
            .db
            .query("SELECT count() AS total FROM customer GROUP ALL")
            .await
            .map_err(DbError::from)?;
        let count_rows: Vec<CountRow> = count_result.take(0).map_err(DbError::from)?;
        let total = count_rows.first().map(|r| r.total).unwrap_or(0);

        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * \
                 FROM customer \
                 ORDER BY created_at DESC \
                 LIMIT $limit START $offset",
            )
            .bind(("limit", pagination.limit))
            .bind(("offset", pagination.offset))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<CustomerRowWithId> = result.take(0).map_err(DbError::from)?;

        let items = rows
            .into_iter()
            .map(|row| row.try_into_customer())
            .collect::<Result<Vec<_>, DbError>>()?;

        Ok(PaginatedResult {
            items,
            total,
            offset: pagination.offset,
            limit: pagination.limit,
        })
    }

    async fn list_with_mikrotik(&self) -> LintasResult<Vec<Customer>> {
        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * \
                 FROM customer \
                 WHERE mikrotik_username != NONE \
                 ORDER BY name ASC",
            )
            .await
            .map_err(DbError::from)?;

        let rows: Vec<CustomerRowWithId> = result.take(0).map_err(DbError::from)?;

        Ok(rows
            .into_iter()
            .map(|row| row.try_into_customer())
            .collect::<Result<Vec<_>, DbError>>()?)
    }

    async fn count(&self) -> LintasResult<u64> {
        let mut result = self
            .db
            .query("SELECT count() AS total FROM customer GROUP ALL")
            .await
            .map_err(DbError::from)?;
        let rows: Vec<CountRow> = result.take(0).map_err(DbError::from)?;
        Ok(rows.first().map(|r| r.total).unwrap_or(0))
    }

    async fn count_by_status(&self, status: CustomerStatus) -> LintasResult<u64> {
        let mut result = self
            .db
            .query(
                "SELECT count() AS total FROM customer \
                 WHERE status = $status GROUP ALL",
            )
            .bind(("status", status_to_string(&status).to_string()))
            .await
            .map_err(DbError::from)?;
        let rows: Vec<CountRow> = result.take(0).map_err(DbError::from)?;
        Ok(rows.first().map(|r| r.total).unwrap_or(0))
    }
}
