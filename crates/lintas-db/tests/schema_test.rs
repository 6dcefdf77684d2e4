//! Integration tests for schema initialization using in-memory SurrealDB.

use surrealdb::Surreal;
use surrealdb::engine::local::Mem;

#[tokio::test]
async fn schema_migration_applies_successfully() {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();

    lintas_db::run_migrations(&db).await.unwrap();

    // Verify that key tables exist by querying INFO FOR DB.
    let mut result = db.query("INFO FOR DB").await.unwrap();
    let info: Option<surrealdb_types::Value> = result.take(0).unwrap();
    let info = info.expect("INFO FOR DB should return a value");
    let info_str = format!("{:?}", info);

    assert!(info_str.contains("customer"), "missing customer table");
    assert!(info_str.contains("region"), "missing region table");
    assert!(
        info_str.contains("billing_record"),
        "missing billing_record table"
    );
    assert!(
        info_str.contains("network_device"),
        "missing network_device table"
    );

    // Verify migration was recorded.
    assert!(info_str.contains("_migration"), "missing _migration table");
}

#[tokio::test]
async fn migration_is_idempotent() {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();

    // Run twice — should not fail.
    lintas_db::run_migrations(&db).await.unwrap();
    lintas_db::run_migrations(&db).await.unwrap();

    // Verify only one migration record exists.
    let mut result = db.query("SELECT * FROM _migration").await.unwrap();
    let records: Vec<surrealdb_types::Value> = result.take(0).unwrap();
    assert_eq!(records.len(), 1, "expected exactly one migration record");
}

#[tokio::test]
async fn can_create_record_after_migration() {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();

    lintas_db::run_migrations(&db).await.unwrap();

    db.query(
        "CREATE customer SET \
         name = 'Budi Santoso', \
         email = 'budi@example.com', \
         status = 'active'",
    )
    .await
    .unwrap()
    .check()
    .unwrap();

    let mut result = db
        .query("SELECT * FROM customer WHERE email = 'budi@example.com'")
        .await
        .unwrap();
    let records: Vec<surrealdb_types::Value> = result.take(0).unwrap();
    assert_eq!(records.len(), 1);
}

#[tokio::test]
async fn unique_index_prevents_duplicate_emails() {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();

    lintas_db::run_migrations(&db).await.unwrap();

    db.query(
        "CREATE customer SET \
         name = 'Budi Santoso', \
         email = 'budi@example.com', \
         status = 'active'",
    )
    .await
    .unwrap()
    .check()
    .unwrap();

    // Attempt duplicate email — should fail.
    let result = db
        .query(
            "CREATE customer SET \
             name = 'Impostor', \
             email = 'budi@example.com', \
             status = 'active'",
        )
        .await
        .unwrap()
        .check();

    assert!(result.is_err(), "duplicate email should be rejected");
}

#[tokio::test]
async fn stage_assert_rejects_unknown_values() {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();

    lintas_db::run_migrations(&db).await.unwrap();

    let result = db
        .query(
            "CREATE region SET \
             name = 'Bandung Utara', \
             code = 'BDG-01', \
             stage = 'groundbreaking'",
        )
        .await
        .unwrap()
        .check();

    assert!(result.is_err(), "unknown stage should be rejected");
}
