//! Domain models for LINTAS.
//!
//! These are the core types shared across all crates. Each model comes
//! with `Create*`/`Update*` input structs carrying the field-level
//! validation the HTTP layer relies on.

pub mod billing_record;
pub mod customer;
pub mod network_device;
pub mod region;
