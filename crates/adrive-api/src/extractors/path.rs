//! Typed path parameter helpers.

use std::str::FromStr;

use adrive_core::error::AppError;

/// Parses a numeric identifier from a path segment or query value.
pub fn parse_id<T: FromStr>(raw: &str, what: &str) -> Result<T, AppError> {
    raw.parse::<T>()
        .map_err(|_| AppError::validation(format!("Invalid {what}: {raw}")))
}
