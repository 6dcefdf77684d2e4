//! LINTAS MikroTik — RouterOS usage sync, account control and
//! usage-based billing amounts.
//!
//! The router sits behind the narrow [`RouterOsClient`] trait; only the
//! mock implementation ships. [`MikroTikService`] drives per-customer
//! and batch syncs and writes the monthly billing records.

pub mod billing;
pub mod client;
pub mod error;
pub mod service;

pub use client::{AccountAction, MockRouterOs, RouterOsClient, UsageReport};
pub use error::RouterError;
pub use service::{MikroTikService, SyncSummary};
