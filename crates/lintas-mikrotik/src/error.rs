//! RouterOS integration error types.

use thiserror::Error;

/// Failures talking to the router.
///
/// These never leave the sync service: each one is logged with the
/// affected customer's identity and collapses into `None`, `false` or
/// a failure count at the call site.
#[derive(Debug, Error)]
pub enum RouterError {
    #[error("router unreachable: {0}")]
    Unreachable(String),

    #[error("account not provisioned on router: {username}")]
    UnknownAccount { username: String },

    #[error("RouterOS API error: {0}")]
    Api(String),
}
