//! LINTAS Core — domain models and data-access contracts for the ISP
//! back-office.
//!
//! This crate provides:
//! - Domain models for customers, regions, billing records and network
//!   devices ([`models`])
//! - Repository trait definitions ([`repository`])
//! - The region build-out workflow with its stage progression guard
//!   ([`workflow`])
//! - The shared error type ([`error::LintasError`])
//!
//! Everything here is storage-agnostic; SurrealDB implementations of the
//! repository traits live in `lintas-db`.

pub mod error;
pub mod models;
pub mod repository;
pub mod workflow;

pub use error::{LintasError, LintasResult};
