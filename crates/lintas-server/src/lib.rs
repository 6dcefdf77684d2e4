//! LINTAS Server — HTTP admin API for the ISP back-office.
//!
//! This crate provides:
//! - The axum router and request handlers ([`api`])
//! - Environment-driven server configuration ([`config`])
//!
//! The binary entry point lives in `main.rs`; everything else is exported
//! as a library so integration tests can drive the router in-process.

pub mod api;
pub mod config;

pub use api::{AppState, create_router, run_server};
pub use config::ServerConfig;
