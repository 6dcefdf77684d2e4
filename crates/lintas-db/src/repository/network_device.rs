//! SurrealDB implementation of [`NetworkDeviceRepository`].

use chrono::{DateTime, Utc};
use lintas_core::error::LintasResult;
use lintas_core::models::network_device::{
    CreateNetworkDevice, DeviceStatus, DeviceType, NetworkDevice, UpdateNetworkDevice,
};
use lintas_core::repository::{NetworkDeviceRepository, PaginatedResult, Pagination};
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use uuid::Uuid;

use crate::error::DbError;

/// DB-side row struct for queries where the UUID is already known.
#[derive(Debug, SurrealValue)]
struct DeviceRow {
    name: String,
    device_type: String,
    latitude: f64,
    longitude: f64,
    address: Option<String>,
    status: String,
    port_count: Option<u32>,
    ports_used: u32,
    notes: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl DeviceRow {
    fn into_device(self, id: Uuid) -> Result<NetworkDevice, DbError> {
        Ok(NetworkDevice {
            id,
            name: self.name,
            device_type: parse_device_type(&self.device_type)?,
            latitude: self.latitude,
            longitude: self.longitude,
            address: self.address,
            status: parse_status(&self.status)?,
            port_count: self.port_count,
            ports_used: self.ports_used,
            notes: self.notes,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

/// DB-side row struct that includes the record ID via `meta::id(id)`.
#[derive(Debug, SurrealValue)]
struct DeviceRowWithId {
    record_id: String,
    name: String,
    device_type: String,
    latitude: f64,
    longitude: f64,
    address: Option<String>,
    status: String,
    port_count: Option<u32>,
    ports_used: u32,
    notes: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl DeviceRowWithId {
    fn try_into_device(self) -> Result<NetworkDevice, DbError> {
        let id = Uuid::parse_str(&self.record_id)
            .map_err(|e| DbError::Decode(format!("invalid UUID: {e}")))?;
        Ok(NetworkDevice {
            id,
            name: self.name,
            device_type: parse_device_type(&self.device_type)?,
            latitude: self.latitude,
            longitude: self.longitude,
            address: self.address,
            status: parse_status(&self.status)?,
            port_count: self.port_count,
            ports_used: self.ports_used,
            notes: self.notes,
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

fn parse_device_type(s: &str) -> Result<DeviceType, DbError> {
    match s {
        "ODC" => Ok(DeviceType::Odc),
        "ODP" => Ok(DeviceType::Odp),
        "closure" => Ok(DeviceType::Closure),
        "router" => Ok(DeviceType::Router),
        "switch" => Ok(DeviceType::Switch),
        other => Err(DbError::Decode(format!("unknown device type: {other}"))),
    }
}

fn device_type_to_string(t: &DeviceType) -> &'static str {
    match t {
        DeviceType::Odc => "ODC",
        DeviceType::Odp => "ODP",
        DeviceType::Closure => "closure",
        DeviceType::Router => "router",
        DeviceType::Switch => "switch",
    }
}

fn parse_status(s: &str) -> Result<DeviceStatus, DbError> {
    match s {
        "active" => Ok(DeviceStatus::Active),
        "inactive" => Ok(DeviceStatus::Inactive),
        "maintenance" => Ok(DeviceStatus::Maintenance),
        other => Err(DbError::Decode(format!("unknown device status: {other}"))),
    }
}

fn status_to_string(s: &DeviceStatus) -> &'static str {
    match s {
        DeviceStatus::Active => "active",
        DeviceStatus::Inactive => "inactive",
        DeviceStatus::Maintenance => "maintenance",
    }
}

/// SurrealDB implementation of the NetworkDevice repository.
#[derive(Clone)]
pub struct SurrealNetworkDeviceRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealNetworkDeviceRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }
}

impl<C: Connection> NetworkDeviceRepository for SurrealNetworkDeviceRepository<C> {
    async fn create(&self, input: CreateNetworkDevice) -> LintasResult<NetworkDevice> {
        let id = Uuid::new_v4();
        let id_str = id.to_string();
        let status = input.status.unwrap_or(DeviceStatus::Active);
        let ports_used = input.ports_used.unwrap_or(0);

        let result = self
            .db
            .query(
                "CREATE type::record('network_device', $id) SET \
                 name = $name, device_type = $device_type, \
                 latitude = $latitude, longitude = $longitude, \
                 address = $address, status = $status, \
                 port_count = $port_count, ports_used = $ports_used, \
                 notes = $notes",
            )
            .bind(("id", id_str.clone()))
            .bind(("name", input.name))
            .bind((
                "device_type",
                device_type_to_string(&input.device_type).to_string(),
            ))
            .bind(("latitude", input.latitude))
            .bind(("longitude", input.longitude))
            .bind(("address", input.address))
            .bind(("status", status_to_string(&status).to_string()))
            .bind(("port_count", input.port_count))
            .bind(("ports_used", ports_used))
            .bind(("notes", input.notes))
            .await
            .map_err(DbError::from)?;

        let mut result = result.check().map_err(DbError::classify)?;

        let rows: Vec<DeviceRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "network_device".into(),
            id: id_str,
        })?;

        Ok(row.into_device(id)?)
    }

    async fn get_by_id(&self, id: Uuid) -> LintasResult<NetworkDevice> {
        let id_str = id.to_string();

        let mut result = self
            .db
            .query("SELECT * FROM type::record('network_device', $id)")
            .bind(("id", id_str.clone()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<DeviceRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "network_device".into(),
            id: id_str,
        })?;

        Ok(row.into_device(id)?)
    }

    async fn update(&self, id: Uuid, input: UpdateNetworkDevice) -> LintasResult<NetworkDevice> {
        let id_str = id.to_string();

        let mut sets = Vec::new();
        if input.name.is_some() {
            sets.push("name = $name");
        }
        if input.device_type.is_some() {
            sets.push("device_type = $device_type");
        }
        if input.latitude.is_some() {
            sets.push("latitude = $latitude");
        }
        if input.longitude.is_some() {
            sets.push("longitude = $longitude");
        }
        if input.address.is_some() {
            sets.push("address = $address");
        }
        if input.status.is_some() {
            sets.push("status = $status");
        }
        if input.port_count.is_some() {
            sets.push("port_count = $port_count");
        }
        if input.ports_used.is_some() {
            sets.push("ports_used = $ports_used");
        }
        if input.notes.is_some() {
            sets.push("notes = $notes");
        }
        sets.push("updated_at = time::now()");

        let query = format!(
            "UPDATE type::record('network_device', $id) SET {}",
            sets.join(", ")
        );

        let mut builder = self.db.query(&query).bind(("id", id_str.clone()));

        if let Some(name) = input.name {
            builder = builder.bind(("name", name));
        }
        if let Some(device_type) = &input.device_type {
            builder = builder.bind(("device_type", device_type_to_string(device_type).to_string()));
        }
        if let Some(latitude) = input.latitude {
            builder = builder.bind(("latitude", latitude));
        }
        if let Some(longitude) = input.longitude {
            builder = builder.bind(("longitude", longitude));
        }
        if let Some(address) = input.address {
            builder = builder.bind(("address", address));
        }
        if let Some(status) = &input.status {
            builder = builder.bind(("status", status_to_string(status).to_string()));
        }
        if let Some(port_count) = input.port_count {
            builder = builder.bind(("port_count", port_count));
        }
        if let Some(ports_used) = input.ports_used {
            builder = builder.bind(("ports_used", ports_used));
        }
        if let Some(notes) = input.notes {
            builder = builder.bind(("notes", notes));
        }

        let result = builder.await.map_err(DbError::from)?;
        let mut result = result.check().map_err(DbError::classify)?;

        let rows: Vec<DeviceRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "network_device".into(),
            id: id_str,
        })?;

        Ok(row.into_device(id)?)
    }

    async fn delete(&self, id: Uuid) -> LintasResult<()> {
        let id_str = id.to_string();

        let mut result = self
            .db
            .query("SELECT meta::id(id) AS record_id FROM type::record('network_device', $id)")
            .bind(("id", id_str.clone()))
            .await
            .map_err(DbError::from)?;
        let rows: Vec<IdRow> = result.take(0).map_err(DbError::from)?;
        if rows.is_empty() {
            return Err(DbError::NotFound {
                entity: "network_device".into(),
                id: id_str,
            }
            .into());
        }

        self.db
            .query("DELETE type::record('network_device', $id)")
            .bind(("id", id_str))
            .await
            .map_err(DbError::from)?;

        Ok(())
    }

    async fn list(&self, pagination: Pagination) -> LintasResult<PaginatedResult<NetworkDevice>> {
        let mut count_result = self
            .db
            .query("SELECT count() AS total FROM network_device GROUP ALL")
            .await
            .map_err(DbError::from)?;
        let count_rows: Vec<CountRow> = count_result.take(0).map_err(DbError::from)?;
        let total = count_rows.first().map(|r| r.total).unwrap_or(0);

        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * \
                 FROM network_device \
                 ORDER BY created_at DESC \
                 LIMIT $limit START $offset",
            )
            .bind(("limit", pagination.limit))
            .bind(("offset", pagination.offset))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<DeviceRowWithId> = result.take(0).map_err(DbError::from)?;

        let items = rows
            .into_iter()
            .map(|row| row.try_into_device())
            .collect::<Result<Vec<_>, DbError>>()?;

        Ok(PaginatedResult {
            items,
            total,
            offset: pagination.offset,
            limit: pagination.limit,
        })
    }

    async fn count(&self) -> LintasResult<u64> {
        let mut result = self
            .db
            .query("SELECT count() AS total FROM network_device GROUP ALL")
            .await
            .map_err(DbError::from)?;
        let rows: Vec<CountRow> = result.take(0).map_err(DbError::from)?;
        Ok(rows.first().map(|r| r.total).unwrap_or(0))
    }

    async fn count_by_status(&self, status: DeviceStatus) -> LintasResult<u64> {
        let mut result = self
            .db
            .query(
                "SELECT count() AS total FROM network_device \
                 WHERE status = $status GROUP ALL",
            )
            .bind(("status", status_to_string(&status).to_string()))
            .await
            .map_err(DbError::from)?;
        let rows: Vec<CountRow> = result.take(0).map_err(DbError::from)?;
        Ok(rows.first().map(|r| r.total).unwrap_or(0))
    }
}
