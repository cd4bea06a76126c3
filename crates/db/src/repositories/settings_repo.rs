//! Repository for the single-row `station_settings` table.

use sqlx::PgPool;

use crate::models::settings::{StationSettings, UpdateStationSettings};

const SETTINGS_COLUMNS: &str = "\
    id, email_enabled, email_sender, notify_hours_before, \
    whatsapp_enabled, whatsapp_number, rds_enabled, rds_program_service, \
    rds_radiotext_template, updated_at";

/// Read and update the station settings row (seeded by migration).
pub struct SettingsRepo;

impl SettingsRepo {
    /// Fetch the settings row.
    pub async fn get(pool: &PgPool) -> Result<StationSettings, sqlx::Error> {
        let query = format!("SELECT {SETTINGS_COLUMNS} FROM station_settings WHERE id = 1");
        sqlx::query_as::<_, StationSettings>(&query)
            .fetch_one(pool)
            .await
    }

    /// Partial update of the settings row.
    pub async fn update(
        pool: &PgPool,
        input: &UpdateStationSettings,
    ) -> Result<StationSettings, sqlx::Error> {
        let query = format!(
            "UPDATE station_settings SET \
                 email_enabled = COALESCE($1, email_enabled), \
                 email_sender = COALESCE($2, email_sender), \
                 notify_hours_before = COALESCE($3, notify_hours_before), \
                 whatsapp_enabled = COALESCE($4, whatsapp_enabled), \
                 whatsapp_number = COALESCE($5, whatsapp_number), \
                 rds_enabled = COALESCE($6, rds_enabled), \
                 rds_program_service = COALESCE($7, rds_program_service), \
                 rds_radiotext_template = COALESCE($8, rds_radiotext_template), \
                 updated_at = now() \
             WHERE id = 1 \
             RETURNING {SETTINGS_COLUMNS}"
        );
        sqlx::query_as::<_, StationSettings>(&query)
            .bind(input.email_enabled)
            .bind(&input.email_sender)
            .bind(input.notify_hours_before)
            .bind(input.whatsapp_enabled)
            .bind(&input.whatsapp_number)
            .bind(input.rds_enabled)
            .bind(&input.rds_program_service)
            .bind(&input.rds_radiotext_template)
            .fetch_one(pool)
            .await
    }
}
