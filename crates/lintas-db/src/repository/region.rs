//! SurrealDB implementation of [`RegionRepository`].
//!
//! Completion flags are recomputed from the stage on every write that
//! touches it, so stored flags can never drift from the stage column.

use chrono::{DateTime, Utc};
use lintas_core::error::LintasResult;
use lintas_core::models::region::{CreateRegion, Region, Stage, StageFlags, UpdateRegion};
use lintas_core::repository::{PaginatedResult, Pagination, RegionRepository};
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use uuid::Uuid;

use crate::error::DbError;

/// DB-side row struct for queries where the UUID is already known.
#[derive(Debug, SurrealValue)]
struct RegionRow {
    name: String,
    code: String,
    description: Option<String>,
    stage: String,
    data_completed: bool,
    design_completed: bool,
    rab_completed: bool,
    permits_completed: bool,
    boundaries: Option<serde_json::Value>,
    design_data: Option<serde_json::Value>,
    rab_data: Option<serde_json::Value>,
    permits_data: Option<serde_json::Value>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl RegionRow {
    fn into_region(self, id: Uuid) -> Result<Region, DbError> {
        Ok(Region {
            id,
            name: self.name,
            code: self.code,
            description: self.description,
            stage: parse_stage(&self.stage)?,
            flags: StageFlags {
                data_completed: self.data_completed,
                design_completed: self.design_completed,
                rab_completed: self.rab_completed,
                permits_completed: self.permits_completed,
            },
            boundaries: self.boundaries,
            design_data: self.design_data,
            rab_data: self.rab_data,
            permits_data: self.permits_data,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

/// DB-side row struct that includes the record ID via `meta::id(id)`.
#[derive(Debug, SurrealValue)]
struct RegionRowWithId {
    record_id: String,
    name: String,
    code: String,
    description: Option<String>,
    stage: String,
    data_completed: bool,
    design_completed: bool,
    rab_completed: bool,
    permits_completed: bool,
    boundaries: Option<serde_json::Value>,
    design_data: Option<serde_json::Value>,
    rab_data: Option<serde_json::Value>,
    permits_data: Option<serde_json::Value>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl RegionRowWithId {
    fn try_into_region(self) -> Result<Region, DbError> {
        let id = Uuid::parse_str(&self.record_id)
            .map_err(|e| DbError::Decode(format!("invalid UUID: {e}")))?;
        Ok(Region {
            id,
            name: self.name,
            code: self.code,
            description: self.description,
            stage: parse_stage(&self.stage)?,
            flags: StageFlags {
                data_completed: self.data_completed,
                design_completed: self.design_completed,
                rab_completed: self.rab_completed,
                permits_completed: self.permits_completed,
            },
            boundaries: self.boundaries,
            design_data: self.design_data,
            rab_data: self.rab_data,
            permits_data: self.permits_data,
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

fn parse_stage(s: &str) -> Result<Stage, DbError> {
    match s {
        "data" => Ok(Stage::Data),
        "design" => Ok(Stage::Design),
        "rab" => Ok(Stage::Rab),
        "permits" => Ok(Stage::Permits),
        "completed" => Ok(Stage::Completed),
        other => Err(DbError::Decode(format!("unknown region stage: {other}"))),
    }
}

fn stage_to_string(s: &Stage) -> &'static str {
    match s {
        Stage::Data => "data",
        Stage::Design => "design",
        Stage::Rab => "rab",
        Stage::Permits => "permits",
        Stage::Completed => "completed",
    }
}

/// SurrealDB implementation of the Region repository.
#[derive(Clone)]
pub struct SurrealRegionRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealRegionRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }
}

impl<C: Connection> RegionRepository for SurrealRegionRepository<C> {
    async fn create(&self, input: CreateRegion) -> LintasResult<Region> {
        let id = Uuid::new_v4();
        let id_str = id.to_string();
        let stage = input.stage.unwrap_or(Stage::Data);
        let flags = stage.flags();

        let result = self
            .db
            .query(
                "CREATE type::record('region', $id) SET \
                 name = $name, code = $code, description = $description, \
                 stage = $stage, \
                 data_completed = $data_completed, \
                 design_completed = $design_completed, \
                 rab_completed = $rab_completed, \
                 permits_completed = $permits_completed, \
                 boundaries = $boundaries, design_data = $design_data, \
                 rab_data = $rab_data, permits_data = $permits_data",
            )
            .bind(("id", id_str.clone()))
            .bind(("name", input.name))
            .bind(("code", input.code))
            .bind(("description", input.description))
            .bind(("stage", stage_to_string(&stage).to_string()))
            .bind(("data_completed", flags.data_completed))
            .bind(("design_completed", flags.design_completed))
            .bind(("rab_completed", flags.rab_completed))
            .bind(("permits_completed", flags.permits_completed))
            .bind(("boundaries", input.boundaries))
            .bind(("design_data", input.design_data))
            .bind(("rab_data", input.rab_data))
            .bind(("permits_data", input.permits_data))
            .await
            .map_err(DbError::from)?;

        let mut result = result.check().map_err(DbError::classify)?;

        let rows: Vec<RegionRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "region".into(),
            id: id_str,
        })?;

        Ok(row.into_region(id)?)
    }

    async fn get_by_id(&self, id: Uuid) -> LintasResult<Region> {
        let id_str = id.to_string();

        let mut result = self
            .db
            .query("SELECT * FROM type::record('region', $id)")
            .bind(("id", id_str.clone()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<RegionRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "region".into(),
            id: id_str,
        })?;

        Ok(row.into_region(id)?)
    }

    async fn get_by_code(&self, code: &str) -> LintasResult<Region> {
        let code_owned = code.to_string();

        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * \
                 FROM region WHERE code = $code",
            )
            .bind(("code", code_owned))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<RegionRowWithId> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "region".into(),
            id: format!("code={code}"),
        })?;

        Ok(row.try_into_region()?)
    }

    async fn update(&self, id: Uuid, input: UpdateRegion) -> LintasResult<Region> {
        let id_str = id.to_string();
        let flags = input.stage.map(Stage::flags);

        let mut sets = Vec::new();
        if input.name.is_some() {
            sets.push("name = $name");
        }
        if input.description.is_some() {
            sets.push("description = $description");
        }
        if input.stage.is_some() {
            sets.push("stage = $stage");
            sets.push("data_completed = $data_completed");
            sets.push("design_completed = $design_completed");
            sets.push("rab_completed = $rab_completed");
            sets.push("permits_completed = $permits_completed");
        }
        if input.boundaries.is_some() {
            sets.push("boundaries = $boundaries");
        }
        if input.design_data.is_some() {
            sets.push("design_data = $design_data");
        }
        if input.rab_data.is_some() {
            sets.push("rab_data = $rab_data");
        }
        if input.permits_data.is_some() {
            sets.push("permits_data = $permits_data");
        }
        sets.push("updated_at = time::now()");

        let query = format!("UPDATE type::record('region', $id) SET {}", sets.join(", "));

        let mut builder = self.db.query(&query).bind(("id", id_str.clone()));

        if let Some(name) = input.name {
            builder = builder.bind(("name", name));
        }
        if let Some(description) = input.description {
            builder = builder.bind(("description", description));
        }
        if let Some(stage) = &input.stage {
            builder = builder.bind(("stage", stage_to_string(stage).to_string()));
        }
        if let Some(flags) = flags {
            builder = builder
                .bind(("data_completed", flags.data_completed))
                .bind(("design_completed", flags.design_completed))
                .bind(("rab_completed", flags.rab_completed))
                .bind(("permits_completed", flags.permits_completed));
        }
        if let Some(boundaries) = input.boundaries {
            builder = builder.bind(("boundaries", boundaries));
        }
        if let Some(design_data) = input.design_data {
            builder = builder.bind(("design_data", design_data));
        }
        if let Some(rab_data) = input.rab_data {
            builder = builder.bind(("rab_data", rab_data));
        }
        if let Some(permits_data) = input.permits_data {
            builder = builder.bind(("permits_data", permits_data));
        }

        let result = builder.await.map_err(DbError::from)?;
        let mut result = result.check().map_err(DbError::classify)?;

        let rows: Vec<RegionRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "region".into(),
            id: id_str,
        })?;

        Ok(row.into_region(id)?)
    }

    async fn delete(&self, id: Uuid) -> LintasResult<()> {
        let id_str = id.to_string();

        let mut result = self
            .db
            .query("SELECT meta::id(id) AS record_id FROM type::record('region', $id)")
            .bind(("id", id_str.clone()))
            .await
            .map_err(DbError::from)?;
        let rows: Vec<IdRow> = result.take(0).map_err(DbError::from)?;
        if rows.is_empty() {
            return Err(DbError::NotFound {
                entity: "region".into(),
                id: id_str,
            }
            .into());
        }

        self.db
            .query("DELETE type::record('region', $id)")
            .bind(("id", id_str))
            .await
            .map_err(DbError::from)?;

        Ok(())
    }

    async fn list(&self, pagination: Pagination) -> LintasResult<PaginatedResult<Region>> {
        let mut count_result = self
            .db
            .query("SELECT count() AS total FROM region GROUP ALL")
            .await
            .map_err(DbError::from)?;
        let count_rows: Vec<CountRow> = count_result.take(0).map_err(DbError::from)?;
        let total = count_rows.first().map(|r| r.total).unwrap_or(0);

        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * \
                 FROM region \
                 ORDER BY created_at DESC \
                 LIMIT $limit START $offset",
            )
            .bind(("limit", pagination.limit))
            .bind(("offset", pagination.offset))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<RegionRowWithId> = result.take(0).map_err(DbError::from)?;

        let items = rows
            .into_iter()
            .map(|row| row.try_into_region())
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
            .query("SELECT count() AS total FROM region GROUP ALL")
            .await
            .map_err(DbError::from)?;
        let rows: Vec<CountRow> = result.take(0).map_err(DbError::from)?;
        Ok(rows.first().map(|r| r.total).unwrap_or(0))
    }

    async fn count_by_stage(&self, stage: Stage) -> LintasResult<u64> {
        let mut result = self
            .db
            .query(
                "SELECT count() AS total FROM region \
                 WHERE stage = $stage GROUP ALL",
            )
            .bind(("stage", stage_to_string(&stage).to_string()))
            .await
            .map_err(DbError::from)?;
        let rows: Vec<CountRow> = result.take(0).map_err(DbError::from)?;
        Ok(rows.first().map(|r| r.total).unwrap_or(0))
    }
}
