//! Endpoint identifiers: UUIDv7 values, rendered as hyphenated hex on the wire.

use uuid::{Uuid, Version};

use crate::error::AppError;

/// Allocate a fresh time-ordered identifier.
pub fn generate() -> Uuid {
    Uuid::now_v7()
}

/// Render an identifier for display. Only UUIDv7 values are accepted.
pub fn encode(id: Uuid) -> Result<String, AppError> {
    match id.get_version() {
        Some(Version::SortRand) => Ok(id.hyphenated().to_string()),
        _ => Err(AppError::InvalidIdentifier(format!(
            "{id} is not a time-ordered (v7) identifier"
        ))),
    }
}

/// Parse the hex form produced by [`encode`]. The simple (unhyphenated) form is accepted too;
/// braced, urn and padded forms are not.
pub fn decode(value: &str) -> Result<Uuid, AppError> {
    if !matches!(value.len(), 32 | 36) {
        return Err(AppError::InvalidIdentifier(format!(
            "'{value}' is not a valid identifier: expected 32 or 36 hex characters"
        )));
    }
    Uuid::try_parse(value)
        .map_err(|e| AppError::InvalidIdentifier(format!("'{value}' is not a valid identifier: {e}")))
}
