//! Region build-out workflow — creation and guarded stage advancement.

use uuid::Uuid;

use crate::error::LintasResult;
use crate::models::region::{CreateRegion, Region, UpdateRegion, validate_stage_transition};
use crate::repository::RegionRepository;

/// Orchestrates region mutations so the stage progression guard cannot
/// be bypassed.
///
/// Generic over the repository implementation so the workflow layer has
/// no dependency on the database crate.
#[derive(Clone)]
pub struct RegionWorkflow<R: RegionRepository> {
    regions: R,
}

impl<R: RegionRepository> RegionWorkflow<R> {
    pub fn new(regions: R) -> Self {
        Self { regions }
    }

    /// Validates and persists a new region. Creation accepts any initial
    /// stage so existing build-outs can be imported mid-pipeline.
    pub async fn create_region(&self, input: CreateRegion) -> LintasResult<Region> {
        input.validate()?;
        self.regions.create(input).await
    }

    /// Applies a partial update. When a stage change is requested it is
    /// checked against the current stage first; a rejected transition
    /// leaves the stored region untouched.
    pub async fn advance_stage(&self, id: Uuid, update: UpdateRegion) -> LintasResult<Region> {
        update.validate()?;

        let region = self.regions.get_by_id(id).await?;
        if let Some(requested) = update.stage {
            validate_stage_transition(region.stage, requested)?;
        }

        self.regions.update(id, update).await
    }
}
