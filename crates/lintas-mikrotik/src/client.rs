//! RouterOS client seam and the mock implementation that ships with it.

use std::sync::Mutex;

use chrono::{DateTime, Duration, Utc};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::RouterError;

const GIB: u64 = 1024 * 1024 * 1024;

/// One account's usage counters as reported by the router.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UsageReport {
    pub username: String,
    pub total_bytes: u64,
    pub download_bytes: u64,
    pub upload_bytes: u64,
    pub session_time_secs: u64,
    pub last_seen: DateTime<Utc>,
    pub ip_address: String,
    pub mac_address: String,
    pub connection_time_secs: u64,
    pub status: String,
}

/// Account state changes that can be pushed to the router.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountAction {
    Enable,
    Disable,
    Suspend,
}

/// The RouterOS boundary.
///
/// A real API client slots in here without touching the sync or
/// billing logic.
pub trait RouterOsClient: Send + Sync {
    /// Current usage counters for one PPPoE/hotspot account.
    fn fetch_usage_report(
        &self,
        username: &str,
    ) -> impl Future<Output = Result<UsageReport, RouterError>> + Send;

    /// Enables, disables or suspends the account on the router.
    fn set_account_state(
        &self,
        username: &str,
        action: AccountAction,
    ) -> impl Future<Output = Result<(), RouterError>> + Send;
}

/// Development stand-in for the RouterOS API.
///
/// Reports plausible figures: 10 to 50 GiB of monthly traffic, mostly
/// download, with session metadata to match. Seed it for reproducible
/// reports in tests.
pub struct MockRouterOs {
    rng: Mutex<SmallRng>,
}

impl MockRouterOs {
    pub fn new() -> Self {
        Self {
            rng: Mutex::new(SmallRng::from_os_rng()),
        }
    }

    /// A mock with a fixed RNG seed; identical call sequences yield
    /// identical reports.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: Mutex::new(SmallRng::seed_from_u64(seed)),
        }
    }
}

impl Default for MockRouterOs {
    fn default() -> Self {
        Self::new()
    }
}

impl RouterOsClient for MockRouterOs {
    async fn fetch_usage_report(&self, username: &str) -> Result<UsageReport, RouterError> {
        let mut rng = self.rng.lock().unwrap_or_else(|poisoned| poisoned.into_inner());

        let total_bytes = rng.random_range(10 * GIB..=50 * GIB);
        // Residential traffic is download-heavy; upload is the rest.
        let download_bytes = rng.random_range(total_bytes * 3 / 4..=total_bytes);
        let upload_bytes = total_bytes - download_bytes;

        Ok(UsageReport {
            username: username.to_string(),
            total_bytes,
            download_bytes,
            upload_bytes,
            session_time_secs: rng.random_range(86_400..=2_592_000),
            last_seen: Utc::now() - Duration::hours(rng.random_range(1..=48)),
            ip_address: format!("192.168.1.{}", rng.random_range(10..=254)),
            mac_address: random_mac(&mut rng),
            connection_time_secs: rng.random_range(3_600..=86_400),
            status: "active".to_string(),
        })
    }

    async fn set_account_state(
        &self,
        username: &str,
        action: AccountAction,
    ) -> Result<(), RouterError> {
        debug!(username, ?action, "Mock account state change accepted");
        Ok(())
    }
}

fn random_mac(rng: &mut SmallRng) -> String {
    let octets: [u8; 6] = rng.random();
    octets
        .iter()
        .map(|octet| format!("{octet:02x}"))
        .collect::<Vec<_>>()
        .join(":")
}
