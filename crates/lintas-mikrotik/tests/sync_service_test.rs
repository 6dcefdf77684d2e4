//! Integration tests for the usage-sync service, wired to real
//! in-memory repositories and a scripted router double.

use std::collections::HashSet;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};

use chrono::Utc;
use lintas_core::models::billing_record::BillingStatus;
use lintas_core::models::customer::{CreateCustomer, Customer, CustomerStatus};
use lintas_core::repository::{BillingRecordRepository, CustomerRepository};
use lintas_db::repository::{SurrealBillingRecordRepository, SurrealCustomerRepository};
use lintas_mikrotik::client::{AccountAction, RouterOsClient, UsageReport};
use lintas_mikrotik::error::RouterError;
use lintas_mikrotik::service::MikroTikService;
use surrealdb::Surreal;
use surrealdb::engine::local::Mem;

const GB: u64 = 1024 * 1024 * 1024;

type Db = surrealdb::engine::local::Db;

/// Scripted router double: fixed usage figures, optional failures,
/// shared call counters.
struct ScriptedRouter {
    /// Total bytes handed out per fetch, consumed front to back; the
    /// last figure repeats once the script runs dry.
    totals: Mutex<Vec<u64>>,
    /// Usernames the router pretends not to know.
    dead_usernames: HashSet<String>,
    /// Refuse all account state changes.
    fail_state_changes: bool,
    fetch_calls: Arc<AtomicU32>,
    state_calls: Arc<AtomicU32>,
}

impl ScriptedRouter {
    fn with_totals(totals: &[u64]) -> Self {
        Self {
            totals: Mutex::new(totals.to_vec()),
            dead_usernames: HashSet::new(),
            fail_state_changes: false,
            fetch_calls: Arc::new(AtomicU32::new(0)),
            state_calls: Arc::new(AtomicU32::new(0)),
        }
    }

    fn refusing(usernames: &[&str]) -> Self {
        let mut router = Self::with_totals(&[20 * GB]);
        router.dead_usernames = usernames.iter().map(|u| u.to_string()).collect();
        router
    }
}

impl RouterOsClient for ScriptedRouter {
    async fn fetch_usage_report(&self, username: &str) -> Result<UsageReport, RouterError> {
        self.fetch_calls.fetch_add(1, Ordering::SeqCst);

        if self.dead_usernames.contains(username) {
            return Err(RouterError::UnknownAccount {
                username: username.into(),
            });
        }

        let total_bytes = {
            let mut totals = self.totals.lock().unwrap();
            if totals.len() > 1 {
                totals.remove(0)
            } else {
                totals[0]
            }
        };
        let download_bytes = total_bytes * 4 / 5;

        Ok(UsageReport {
            username: username.to_string(),
            total_bytes,
            download_bytes,
            upload_bytes: total_bytes - download_bytes,
            session_time_secs: 172_800,
            last_seen: Utc::now(),
            ip_address: "192.168.1.77".into(),
            mac_address: "aa:bb:cc:dd:ee:ff".into(),
            connection_time_secs: 7_200,
            status: "active".into(),
        })
    }

    async fn set_account_state(
        &self,
        username: &str,
        _action: AccountAction,
    ) -> Result<(), RouterError> {
        self.state_calls.fetch_add(1, Ordering::SeqCst);

        if self.fail_state_changes {
            return Err(RouterError::Unreachable("10.0.0.1: no route to host".into()));
        }
        if self.dead_usernames.contains(username) {
            return Err(RouterError::UnknownAccount {
                username: username.into(),
            });
        }
        Ok(())
    }
}

/// Spin up an in-memory DB with the schema applied.
async fn setup() -> (
    SurrealCustomerRepository<Db>,
    SurrealBillingRecordRepository<Db>,
) {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();
    lintas_db::run_migrations(&db).await.unwrap();

    (
        SurrealCustomerRepository::new(db.clone()),
        SurrealBillingRecordRepository::new(db),
    )
}

async fn create_customer(
    repo: &SurrealCustomerRepository<Db>,
    email: &str,
    mikrotik_username: Option<&str>,
    package: Option<&str>,
) -> Customer {
    repo.create(CreateCustomer {
        name: "Test Subscriber".into(),
        email: email.into(),
        phone: None,
        address: None,
        status: None,
        mikrotik_username: mikrotik_username.map(Into::into),
        package: package.map(Into::into),
    })
    .await
    .unwrap()
}

#[tokio::test]
async fn sync_without_mikrotik_username_is_a_noop() {
    let (customers, billing) = setup().await;
    let customer = create_customer(&customers, "walkin@example.com", None, None).await;

    let router = ScriptedRouter::with_totals(&[20 * GB]);
    let fetch_calls = router.fetch_calls.clone();
    let svc = MikroTikService::new(router, customers.clone(), billing);

    assert!(svc.sync_customer_usage(&customer).await.is_none());
    assert_eq!(fetch_calls.load(Ordering::SeqCst), 0);

    let stored = customers.get_by_id(customer.id).await.unwrap();
    assert!(stored.last_usage_sync.is_none());
}

#[tokio::test]
async fn sync_stamps_last_usage_sync() {
    let (customers, billing) = setup().await;
    let customer = create_customer(
        &customers,
        "budi@example.com",
        Some("budi-ppp"),
        Some("Basic 10Mbps"),
    )
    .await;
    assert!(customer.last_usage_sync.is_none());

    let router = ScriptedRouter::with_totals(&[20 * GB]);
    let svc = MikroTikService::new(router, customers.clone(), billing);

    let report = svc.sync_customer_usage(&customer).await.unwrap();
    assert_eq!(report.username, "budi-ppp");
    assert_eq!(report.total_bytes, 20 * GB);

    let stored = customers.get_by_id(customer.id).await.unwrap();
    assert!(stored.last_usage_sync.is_some());
}

#[tokio::test]
async fn router_failure_is_swallowed() {
    let (customers, billing) = setup().await;
    let customer =
        create_customer(&customers, "ghost@example.com", Some("ghost-ppp"), None).await;

    let router = ScriptedRouter::refusing(&["ghost-ppp"]);
    let svc = MikroTikService::new(router, customers.clone(), billing);

    assert!(svc.sync_customer_usage(&customer).await.is_none());

    let stored = customers.get_by_id(customer.id).await.unwrap();
    assert!(stored.last_usage_sync.is_none());
}

#[tokio::test]
async fn sync_and_bill_creates_current_month_record() {
    let (customers, billing) = setup().await;
    let customer = create_customer(
        &customers,
        "siti@example.com",
        Some("siti-ppp"),
        Some("Standard 25Mbps"),
    )
    .await;

    let router = ScriptedRouter::with_totals(&[300 * GB]);
    let svc = MikroTikService::new(router, customers.clone(), billing.clone());

    let (report, record) = svc.sync_and_bill(&customer).await.unwrap();

    assert_eq!(report.total_bytes, 300 * GB);
    assert_eq!(record.customer_id, customer.id);
    assert_eq!(record.period_month, Utc::now().format("%Y-%m").to_string());
    // 250k base + 50 GB over the 250 GB quota at 2k/GB.
    assert_eq!(record.amount, 350_000.0);
    assert_eq!(record.usage_mb, Some(300.0 * 1024.0));
    assert_eq!(record.status, BillingStatus::Pending);
    assert!(record.paid_at.is_none());
    assert!(record.mikrotik_data.is_some());
    assert!(record.due_date > Utc::now());

    let history = billing.list_by_customer(customer.id).await.unwrap();
    assert_eq!(history.len(), 1);
}

#[tokio::test]
async fn resync_refreshes_the_same_record() {
    let (customers, billing) = setup().await;
    let customer = create_customer(
        &customers,
        "agus@example.com",
        Some("agus-ppp"),
        Some("Standard 25Mbps"),
    )
    .await;

    let router = ScriptedRouter::with_totals(&[300 * GB, 400 * GB]);
    let svc = MikroTikService::new(router, customers.clone(), billing.clone());

    let (_, first) = svc.sync_and_bill(&customer).await.unwrap();
    let (_, second) = svc.sync_and_bill(&customer).await.unwrap();

    assert_eq!(second.id, first.id);
    // 250k base + 150 GB overage at 2k/GB.
    assert_eq!(second.amount, 550_000.0);
    assert_eq!(second.usage_mb, Some(400.0 * 1024.0));
    assert_eq!(second.status, BillingStatus::Pending);

    let history = billing.list_by_customer(customer.id).await.unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].amount, 550_000.0);
}

#[tokio::test]
async fn batch_sync_tallies_mixed_outcomes() {
    let (customers, billing) = setup().await;
    let billed = create_customer(
        &customers,
        "online@example.com",
        Some("online-ppp"),
        Some("Basic 10Mbps"),
    )
    .await;
    // No RouterOS account: not part of the sweep at all.
    create_customer(&customers, "walkin@example.com", None, None).await;
    let dead = create_customer(&customers, "dead@example.com", Some("dead-ppp"), None).await;

    let router = ScriptedRouter::refusing(&["dead-ppp"]);
    let svc = MikroTikService::new(router, customers.clone(), billing.clone());

    let summary = svc.sync_all_customers().await.unwrap();
    assert_eq!(summary.total, 2);
    assert_eq!(summary.success, 1);
    assert_eq!(summary.failed, 1);

    assert_eq!(billing.list_by_customer(billed.id).await.unwrap().len(), 1);
    assert!(billing.list_by_customer(dead.id).await.unwrap().is_empty());
}

#[tokio::test]
async fn account_actions_mirror_customer_status() {
    let (customers, billing) = setup().await;
    let customer = create_customer(&customers, "dewi@example.com", Some("dewi-ppp"), None).await;

    let router = ScriptedRouter::with_totals(&[20 * GB]);
    let svc = MikroTikService::new(router, customers.clone(), billing);

    assert!(
        svc.manage_customer_account(&customer, AccountAction::Suspend)
            .await
    );
    let stored = customers.get_by_id(customer.id).await.unwrap();
    assert_eq!(stored.status, CustomerStatus::Suspended);

    assert!(
        svc.manage_customer_account(&customer, AccountAction::Disable)
            .await
    );
    let stored = customers.get_by_id(customer.id).await.unwrap();
    assert_eq!(stored.status, CustomerStatus::Inactive);

    assert!(
        svc.manage_customer_account(&customer, AccountAction::Enable)
            .await
    );
    let stored = customers.get_by_id(customer.id).await.unwrap();
    assert_eq!(stored.status, CustomerStatus::Active);
}

#[tokio::test]
async fn account_action_without_username_returns_false() {
    let (customers, billing) = setup().await;
    let customer = create_customer(&customers, "walkin@example.com", None, None).await;

    let router = ScriptedRouter::with_totals(&[20 * GB]);
    let state_calls = router.state_calls.clone();
    let svc = MikroTikService::new(router, customers.clone(), billing);

    assert!(
        !svc.manage_customer_account(&customer, AccountAction::Suspend)
            .await
    );
    assert_eq!(state_calls.load(Ordering::SeqCst), 0);

    let stored = customers.get_by_id(customer.id).await.unwrap();
    assert_eq!(stored.status, CustomerStatus::Active);
}

#[tokio::test]
async fn account_action_router_failure_leaves_status_alone() {
    let (customers, billing) = setup().await;
    let customer = create_customer(&customers, "rina@example.com", Some("rina-ppp"), None).await;

    let mut router = ScriptedRouter::with_totals(&[20 * GB]);
    router.fail_state_changes = true;
    let svc = MikroTikService::new(router, customers.clone(), billing);

    assert!(
        !svc.manage_customer_account(&customer, AccountAction::Suspend)
            .await
    );

    let stored = customers.get_by_id(customer.id).await.unwrap();
    assert_eq!(stored.status, CustomerStatus::Active);
}
