//! Station settings row and DTO.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use radiodesk_core::types::Timestamp;

/// The single row of the `station_settings` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct StationSettings {
    pub id: i16,
    pub email_enabled: bool,
    pub email_sender: Option<String>,
    pub notify_hours_before: i32,
    pub whatsapp_enabled: bool,
    pub whatsapp_number: Option<String>,
    pub rds_enabled: bool,
    pub rds_program_service: Option<String>,
    pub rds_radiotext_template: Option<String>,
    pub updated_at: Timestamp,
}

/// Partial update for station settings.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateStationSettings {
    pub email_enabled: Option<bool>,
    #[validate(email)]
    pub email_sender: Option<String>,
    #[validate(range(min = 1, max = 168))]
    pub notify_hours_before: Option<i32>,
    pub whatsapp_enabled: Option<bool>,
    #[validate(length(min = 5, max = 20))]
    pub whatsapp_number: Option<String>,
    pub rds_enabled: Option<bool>,
    /// RDS Program Service names carry at most 8 characters.
    #[validate(length(max = 8))]
    pub rds_program_service: Option<String>,
    #[validate(length(max = 500))]
    pub rds_radiotext_template: Option<String>,
}
