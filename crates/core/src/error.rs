use chrono::NaiveDate;

use crate::types::DbId;

/// Domain-level errors shared across the workspace.
///
/// All variants are recoverable by the caller; none should take the
/// process down. The schedule resolver itself only ever produces
/// [`CoreError::InvalidRange`].
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Invalid date range: {0}")]
    InvalidRange(String),

    #[error("Occurrence of master {master_id} on {date} is already materialized")]
    AlreadyMaterialized { master_id: DbId, date: NaiveDate },

    #[error("Internal error: {0}")]
    Internal(String),
}
