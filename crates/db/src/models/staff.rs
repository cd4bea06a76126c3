//! Division and worker rows and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use radiodesk_core::error::CoreError;
use radiodesk_core::staff::Department;
use radiodesk_core::types::{DbId, Timestamp};

/// A row from the `divisions` table.
///
/// `department` always holds a canonical name; input is classified before
/// it is written.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Division {
    pub id: DbId,
    pub name: String,
    pub department: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Division {
    /// The typed department this division belongs to.
    pub fn department(&self) -> Result<Department, CoreError> {
        Department::classify(&self.department)
    }
}

/// A row from the `workers` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Worker {
    pub id: DbId,
    pub full_name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub division_id: Option<DbId>,
    pub is_active: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a division. `department` accepts legacy free-text
/// spellings; it is classified once here, never at query time.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateDivision {
    #[validate(length(min = 1, max = 120))]
    pub name: String,
    pub department: String,
}

/// Partial update for a division.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateDivision {
    #[validate(length(min = 1, max = 120))]
    pub name: Option<String>,
    pub department: Option<String>,
}

/// DTO for creating a worker.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateWorker {
    #[validate(length(min = 1, max = 120))]
    pub full_name: String,
    #[validate(email)]
    pub email: Option<String>,
    #[validate(length(max = 32))]
    pub phone: Option<String>,
    pub division_id: Option<DbId>,
}

/// Partial update for a worker.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateWorker {
    #[validate(length(min = 1, max = 120))]
    pub full_name: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
    #[validate(length(max = 32))]
    pub phone: Option<String>,
    pub division_id: Option<DbId>,
}
