//! Integration tests for the Region repository using in-memory
//! SurrealDB.

use lintas_core::error::LintasError;
use lintas_core::models::region::{CreateRegion, Stage, UpdateRegion};
use lintas_core::repository::{Pagination, RegionRepository};
use lintas_db::repository::SurrealRegionRepository;
use surrealdb::Surreal;
use surrealdb::engine::local::Mem;
use uuid::Uuid;

/// Helper: spin up in-memory DB and run migrations.
async fn setup() -> Surreal<surrealdb::engine::local::Db> {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();
    lintas_db::run_migrations(&db).await.unwrap();
    db
}

fn region(name: &str, code: &str, stage: Option<Stage>) -> CreateRegion {
    CreateRegion {
        name: name.into(),
        code: code.into(),
        description: None,
        stage,
        boundaries: None,
        design_data: None,
        rab_data: None,
        permits_data: None,
    }
}

#[tokio::test]
async fn create_defaults_to_data_stage() {
    let db = setup().await;
    let repo = SurrealRegionRepository::new(db);

    let created = repo
        .create(region("Bandung Utara", "BDG-01", None))
        .await
        .unwrap();

    assert_eq!(created.stage, Stage::Data);
    assert!(created.flags.data_completed);
    assert!(!created.flags.design_completed);
    assert!(!created.flags.rab_completed);
    assert!(!created.flags.permits_completed);
}

#[tokio::test]
async fn create_derives_flags_from_initial_stage() {
    let db = setup().await;
    let repo = SurrealRegionRepository::new(db);

    let created = repo
        .create(region("Bandung Selatan", "BDG-02", Some(Stage::Rab)))
        .await
        .unwrap();

    assert_eq!(created.stage, Stage::Rab);
    assert!(created.flags.data_completed);
    assert!(created.flags.design_completed);
    assert!(created.flags.rab_completed);
    assert!(!created.flags.permits_completed);

    let fetched = repo.get_by_id(created.id).await.unwrap();
    assert_eq!(fetched.flags, created.flags);
}

#[tokio::test]
async fn duplicate_code_is_a_validation_error() {
    let db = setup().await;
    let repo = SurrealRegionRepository::new(db);

    repo.create(region("Bandung Utara", "BDG-01", None))
        .await
        .unwrap();

    let err = repo
        .create(region("Bandung Utara II", "BDG-01", None))
        .await
        .unwrap_err();

    match err {
        LintasError::Validation { field, .. } => assert_eq!(field, "code"),
        other => panic!("expected validation error, got {other:?}"),
    }
}

#[tokio::test]
async fn get_by_code_finds_region() {
    let db = setup().await;
    let repo = SurrealRegionRepository::new(db);

    let created = repo
        .create(region("Cimahi", "CMH-01", Some(Stage::Design)))
        .await
        .unwrap();

    let fetched = repo.get_by_code("CMH-01").await.unwrap();
    assert_eq!(fetched.id, created.id);
    assert_eq!(fetched.stage, Stage::Design);

    let err = repo.get_by_code("NOPE-99").await.unwrap_err();
    assert!(matches!(err, LintasError::NotFound { .. }));
}

#[tokio::test]
async fn stage_update_recomputes_flags() {
    let db = setup().await;
    let repo = SurrealRegionRepository::new(db);

    let created = repo
        .create(region("Bandung Utara", "BDG-01", None))
        .await
        .unwrap();

    let updated = repo
        .update(
            created.id,
            UpdateRegion {
                stage: Some(Stage::Design),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.stage, Stage::Design);
    assert!(updated.flags.design_completed);
    assert!(!updated.flags.rab_completed);

    // Moving backward lowers the flags again.
    let reverted = repo
        .update(
            created.id,
            UpdateRegion {
                stage: Some(Stage::Data),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(reverted.stage, Stage::Data);
    assert!(!reverted.flags.design_completed);
}

#[tokio::test]
async fn update_without_stage_leaves_stage_and_flags_alone() {
    let db = setup().await;
    let repo = SurrealRegionRepository::new(db);

    let created = repo
        .create(region("Bandung Utara", "BDG-01", Some(Stage::Permits)))
        .await
        .unwrap();

    let updated = repo
        .update(
            created.id,
            UpdateRegion {
                name: Some("Bandung Utara (rev)".into()),
                rab_data: Some(serde_json::json!({"total_idr": 125_000_000})),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.name, "Bandung Utara (rev)");
    assert_eq!(updated.stage, Stage::Permits);
    assert_eq!(updated.flags, created.flags);
    assert!(updated.rab_data.is_some());
    // Boundaries were never provided and stay unset.
    assert!(updated.boundaries.is_none());
}

#[tokio::test]
async fn planning_blobs_round_trip() {
    let db = setup().await;
    let repo = SurrealRegionRepository::new(db);

    let boundaries = serde_json::json!({
        "type": "Polygon",
        "coordinates": [[[107.57, -6.87], [107.64, -6.87], [107.64, -6.94], [107.57, -6.87]]],
    });
    let created = repo
        .create(CreateRegion {
            boundaries: Some(boundaries.clone()),
            ..region("Bandung Utara", "BDG-01", None)
        })
        .await
        .unwrap();

    let fetched = repo.get_by_id(created.id).await.unwrap();
    assert_eq!(fetched.boundaries, Some(boundaries));
}

#[tokio::test]
async fn delete_region() {
    let db = setup().await;
    let repo = SurrealRegionRepository::new(db);

    let created = repo
        .create(region("Bandung Utara", "BDG-01", None))
        .await
        .unwrap();

    repo.delete(created.id).await.unwrap();

    let err = repo.get_by_id(created.id).await.unwrap_err();
    assert!(matches!(err, LintasError::NotFound { .. }));

    let err = repo.delete(Uuid::new_v4()).await.unwrap_err();
    assert!(matches!(err, LintasError::NotFound { .. }));
}

#[tokio::test]
async fn list_and_count_by_stage() {
    let db = setup().await;
    let repo = SurrealRegionRepository::new(db);

    repo.create(region("A", "A-01", Some(Stage::Completed)))
        .await
        .unwrap();
    repo.create(region("B", "B-01", Some(Stage::Completed)))
        .await
        .unwrap();
    repo.create(region("C", "C-01", Some(Stage::Design)))
        .await
        .unwrap();

    assert_eq!(repo.count().await.unwrap(), 3);
    assert_eq!(repo.count_by_stage(Stage::Completed).await.unwrap(), 2);
    assert_eq!(repo.count_by_stage(Stage::Rab).await.unwrap(), 0);

    let page = repo.list(Pagination::default()).await.unwrap();
    assert_eq!(page.total, 3);
    assert_eq!(page.items.len(), 3);
}
