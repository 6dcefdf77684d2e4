//! Region (fiber build-out area) domain model and stage machine.
//!
//! A region moves through a fixed build-out pipeline: survey data entry,
//! network design, budget plan (RAB), permits, and finally completion.
//! The completion flags are never stored independently; they are derived
//! from the current stage so the two can never disagree.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{LintasError, LintasResult};

/// Build-out pipeline stage. Discriminants encode pipeline position.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    Data = 0,
    Design = 1,
    Rab = 2,
    Permits = 3,
    Completed = 4,
}

impl Stage {
    /// The full pipeline in progression order.
    pub const ORDER: [Stage; 5] = [
        Stage::Data,
        Stage::Design,
        Stage::Rab,
        Stage::Permits,
        Stage::Completed,
    ];

    /// Zero-based position of this stage in the pipeline.
    pub fn index(self) -> usize {
        self as usize
    }

    /// Completion flags implied by this stage: a milestone is completed
    /// exactly when the pipeline has reached it.
    pub fn flags(self) -> StageFlags {
        StageFlags {
            data_completed: Stage::Data.index() <= self.index(),
            design_completed: Stage::Design.index() <= self.index(),
            rab_completed: Stage::Rab.index() <= self.index(),
            permits_completed: Stage::Permits.index() <= self.index(),
        }
    }
}

/// Derived milestone flags, stored denormalized for cheap dashboards.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct StageFlags {
    pub data_completed: bool,
    pub design_completed: bool,
    pub rab_completed: bool,
    pub permits_completed: bool,
}

/// Guard for stage updates: moving backward or staying put is always
/// allowed, moving forward is allowed one step at a time.
pub fn validate_stage_transition(current: Stage, requested: Stage) -> LintasResult<()> {
    if requested.index() > current.index() + 1 {
        return Err(LintasError::validation(
            "stage",
            "must complete stages sequentially",
        ));
    }
    Ok(())
}

/// A geographic build-out area.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Region {
    pub id: Uuid,
    pub name: String,
    /// Unique short code (e.g., `BDG-03`).
    pub code: String,
    pub description: Option<String>,
    pub stage: Stage,
    #[serde(flatten)]
    pub flags: StageFlags,
    /// Free-form GeoJSON-style boundary geometry.
    pub boundaries: Option<serde_json::Value>,
    /// Network design artifacts (cable routes, splitter plans).
    pub design_data: Option<serde_json::Value>,
    /// Budget plan (Rencana Anggaran Biaya) line items.
    pub rab_data: Option<serde_json::Value>,
    /// Permit references and approval records.
    pub permits_data: Option<serde_json::Value>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields required to create a new region.
///
/// The initial stage may be anything in the pipeline; the sequential
/// guard applies to updates only, so regions already mid-build can be
/// imported as-is.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateRegion {
    pub name: String,
    pub code: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Defaults to [`Stage::Data`] when omitted.
    #[serde(default)]
    pub stage: Option<Stage>,
    #[serde(default)]
    pub boundaries: Option<serde_json::Value>,
    #[serde(default)]
    pub design_data: Option<serde_json::Value>,
    #[serde(default)]
    pub rab_data: Option<serde_json::Value>,
    #[serde(default)]
    pub permits_data: Option<serde_json::Value>,
}

/// Fields that can be updated on an existing region.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UpdateRegion {
    pub name: Option<String>,
    pub description: Option<String>,
    pub stage: Option<Stage>,
    pub boundaries: Option<serde_json::Value>,
    pub design_data: Option<serde_json::Value>,
    pub rab_data: Option<serde_json::Value>,
    pub permits_data: Option<serde_json::Value>,
}

impl CreateRegion {
    pub fn validate(&self) -> LintasResult<()> {
        validate_name(&self.name)?;
        validate_code(&self.code)?;
        validate_blobs(&[
            ("boundaries", &self.boundaries),
            ("design_data", &self.design_data),
            ("rab_data", &self.rab_data),
            ("permits_data", &self.permits_data),
        ])
    }
}

impl UpdateRegion {
    pub fn validate(&self) -> LintasResult<()> {
        if let Some(name) = &self.name {
            validate_name(name)?;
        }
        validate_blobs(&[
            ("boundaries", &self.boundaries),
            ("design_data", &self.design_data),
            ("rab_data", &self.rab_data),
            ("permits_data", &self.permits_data),
        ])
    }
}

fn validate_name(name: &str) -> LintasResult<()> {
    if name.trim().is_empty() {
        return Err(LintasError::validation("name", "name is required"));
    }
    if name.len() > 255 {
        return Err(LintasError::validation(
            "name",
            "name must not exceed 255 characters",
        ));
    }
    Ok(())
}

fn validate_code(code: &str) -> LintasResult<()> {
    if code.trim().is_empty() {
        return Err(LintasError::validation("code", "code is required"));
    }
    if code.len() > 50 {
        return Err(LintasError::validation(
            "code",
            "code must not exceed 50 characters",
        ));
    }
    Ok(())
}

/// Planning artifacts are stored as objects; scalar or array payloads
/// are caught here so the store never sees them.
fn validate_blobs(blobs: &[(&str, &Option<serde_json::Value>)]) -> LintasResult<()> {
    for (field, value) in blobs {
        if value.as_ref().is_some_and(|v| !v.is_object()) {
            return Err(LintasError::validation(
                *field,
                "must be a JSON object",
            ));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn order_matches_discriminants() {
        for (i, stage) in Stage::ORDER.iter().enumerate() {
            assert_eq!(stage.index(), i);
        }
    }

    #[test]
    fn flags_accumulate_along_the_pipeline() {
        assert_eq!(
            Stage::Data.flags(),
            StageFlags {
                data_completed: true,
                design_completed: false,
                rab_completed: false,
                permits_completed: false,
            }
        );
        assert_eq!(
            Stage::Design.flags(),
            StageFlags {
                data_completed: true,
                design_completed: true,
                rab_completed: false,
                permits_completed: false,
            }
        );
        assert_eq!(
            Stage::Rab.flags(),
            StageFlags {
                data_completed: true,
                design_completed: true,
                rab_completed: true,
                permits_completed: false,
            }
        );
        assert_eq!(
            Stage::Permits.flags(),
            StageFlags {
                data_completed: true,
                design_completed: true,
                rab_completed: true,
                permits_completed: true,
            }
        );
        assert_eq!(
            Stage::Completed.flags(),
            StageFlags {
                data_completed: true,
                design_completed: true,
                rab_completed: true,
                permits_completed: true,
            }
        );
    }

    #[test]
    fn forward_by_one_is_allowed() {
        assert!(validate_stage_transition(Stage::Data, Stage::Design).is_ok());
        assert!(validate_stage_transition(Stage::Permits, Stage::Completed).is_ok());
    }

    #[test]
    fn skipping_ahead_is_rejected() {
        let err = validate_stage_transition(Stage::Data, Stage::Rab).unwrap_err();
        match err {
            LintasError::Validation { field, message } => {
                assert_eq!(field, "stage");
                assert_eq!(message, "must complete stages sequentially");
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(validate_stage_transition(Stage::Data, Stage::Completed).is_err());
        assert!(validate_stage_transition(Stage::Design, Stage::Permits).is_err());
    }

    #[test]
    fn backward_and_same_stage_are_allowed() {
        assert!(validate_stage_transition(Stage::Completed, Stage::Data).is_ok());
        assert!(validate_stage_transition(Stage::Rab, Stage::Design).is_ok());
        assert!(validate_stage_transition(Stage::Design, Stage::Design).is_ok());
    }

    #[test]
    fn stage_uses_lowercase_wire_form() {
        let json = serde_json::to_string(&Stage::Rab).unwrap();
        assert_eq!(json, "\"rab\"");
        let back: Stage = serde_json::from_str("\"permits\"").unwrap();
        assert_eq!(back, Stage::Permits);
    }

    #[test]
    fn planning_blobs_must_be_objects() {
        let update = UpdateRegion {
            rab_data: Some(serde_json::json!([1, 2, 3])),
            ..Default::default()
        };
        let err = update.validate().unwrap_err();
        assert!(matches!(err, LintasError::Validation { field, .. } if field == "rab_data"));

        let update = UpdateRegion {
            boundaries: Some(serde_json::json!({"type": "Polygon", "coordinates": []})),
            ..Default::default()
        };
        assert!(update.validate().is_ok());
    }

    #[test]
    fn code_length_is_bounded() {
        let region = CreateRegion {
            name: "Bandung Selatan".into(),
            code: "x".repeat(51),
            description: None,
            stage: None,
            boundaries: None,
            design_data: None,
            rab_data: None,
            permits_data: None,
        };
        let err = region.validate().unwrap_err();
        assert!(matches!(err, LintasError::Validation { field, .. } if field == "code"));
    }
}
