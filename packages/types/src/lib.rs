//! Shared types and re-exports for the fauna crates.

pub use ::anyhow::{self, Error, Result, anyhow, bail};
pub use serde_json as json;
pub use serde_json::Value;

/// Opaque identifier used to correlate reported errors with log lines.
pub fn create_id() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}
