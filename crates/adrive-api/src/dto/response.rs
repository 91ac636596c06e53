//! Response DTOs that are not service types.

use serde::Serialize;

/// Liveness answer.
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Always `ok` when the process can answer.
    pub status: &'static str,
    /// Crate version.
    pub version: &'static str,
}

impl HealthResponse {
    /// The answer for this build.
    pub fn current() -> Self {
        Self {
            status: "ok",
            version: env!("CARGO_PKG_VERSION"),
        }
    }
}

/// Readiness answer: whether the database and the storage root are usable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReadinessResponse {
    /// `ok` or `degraded`.
    pub status: &'static str,
    /// `connected` or `unavailable`.
    pub database: &'static str,
    /// `available` or `unavailable`.
    pub storage: &'static str,
}

impl ReadinessResponse {
    /// Summarize the two dependency checks.
    pub fn from_checks(database_ok: bool, storage_ok: bool) -> Self {
        Self {
            status: if database_ok && storage_ok { "ok" } else { "degraded" },
            database: if database_ok { "connected" } else { "unavailable" },
            storage: if storage_ok { "available" } else { "unavailable" },
        }
    }

    /// Whether every dependency is usable.
    pub fn is_ready(&self) -> bool {
        self.status == "ok"
    }
}
