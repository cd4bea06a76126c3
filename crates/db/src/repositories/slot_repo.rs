//! Repository for the `schedule_slots` table.
//!
//! Besides plain CRUD this owns the two write paths with scheduling
//! semantics: idempotent materialization of a master occurrence and
//! suppression via deletion overrides. The partial unique index
//! `uq_schedule_slots_parent_date` backs both.

use chrono::NaiveDate;
use sqlx::PgPool;

use radiodesk_core::types::DbId;

use crate::models::slot::{
    CreateInstanceSlot, CreateMasterSlot, Materialized, ScheduleSlotRow, UpdateSlot,
};

const SLOT_COLUMNS: &str = "\
    id, is_master, day_of_week, slot_date, start_time, end_time, \
    parent_slot_id, is_deleted, show_name, host_name, color, \
    is_prerecorded, is_collection, created_at, updated_at";

/// CRUD and occurrence bookkeeping for the `schedule_slots` table.
pub struct SlotRepo;

impl SlotRepo {
    /// List all master templates.
    pub async fn list_masters(pool: &PgPool) -> Result<Vec<ScheduleSlotRow>, sqlx::Error> {
        let query = format!(
            "SELECT {SLOT_COLUMNS} FROM schedule_slots \
             WHERE is_master AND NOT is_deleted \
             ORDER BY day_of_week, start_time, id"
        );
        sqlx::query_as::<_, ScheduleSlotRow>(&query)
            .fetch_all(pool)
            .await
    }

    /// List every instance row in the inclusive date range.
    ///
    /// Deletion overrides are included; the resolver needs the tombstones
    /// to suppress master occurrences.
    pub async fn list_instances_in_range(
        pool: &PgPool,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<ScheduleSlotRow>, sqlx::Error> {
        let query = format!(
            "SELECT {SLOT_COLUMNS} FROM schedule_slots \
             WHERE NOT is_master AND slot_date BETWEEN $1 AND $2 \
             ORDER BY slot_date, start_time, id"
        );
        sqlx::query_as::<_, ScheduleSlotRow>(&query)
            .bind(start)
            .bind(end)
            .fetch_all(pool)
            .await
    }

    /// Find a slot by ID.
    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<ScheduleSlotRow>, sqlx::Error> {
        let query = format!("SELECT {SLOT_COLUMNS} FROM schedule_slots WHERE id = $1");
        sqlx::query_as::<_, ScheduleSlotRow>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// The active (non-deleted) override for a master occurrence, if any.
    pub async fn find_active_override(
        pool: &PgPool,
        master_id: DbId,
        date: NaiveDate,
    ) -> Result<Option<ScheduleSlotRow>, sqlx::Error> {
        let query = format!(
            "SELECT {SLOT_COLUMNS} FROM schedule_slots \
             WHERE parent_slot_id = $1 AND slot_date = $2 AND NOT is_deleted"
        );
        sqlx::query_as::<_, ScheduleSlotRow>(&query)
            .bind(master_id)
            .bind(date)
            .fetch_optional(pool)
            .await
    }

    /// Create a new master template.
    pub async fn create_master(
        pool: &PgPool,
        input: &CreateMasterSlot,
    ) -> Result<ScheduleSlotRow, sqlx::Error> {
        let query = format!(
            "INSERT INTO schedule_slots \
                 (is_master, day_of_week, start_time, end_time, \
                  show_name, host_name, color, is_prerecorded, is_collection) \
             VALUES (TRUE, $1, $2, $3, $4, $5, $6, $7, $8) \
             RETURNING {SLOT_COLUMNS}"
        );
        sqlx::query_as::<_, ScheduleSlotRow>(&query)
            .bind(input.day_of_week)
            .bind(input.start_time)
            .bind(input.end_time)
            .bind(&input.show_name)
            .bind(&input.host_name)
            .bind(&input.color)
            .bind(input.is_prerecorded)
            .bind(input.is_collection)
            .fetch_one(pool)
            .await
    }

    /// Create an instance: a custom slot, or an override when
    /// `parent_slot_id` is set.
    pub async fn create_instance(
        pool: &PgPool,
        input: &CreateInstanceSlot,
    ) -> Result<ScheduleSlotRow, sqlx::Error> {
        let query = format!(
            "INSERT INTO schedule_slots \
                 (is_master, slot_date, parent_slot_id, start_time, end_time, \
                  show_name, host_name, color, is_prerecorded, is_collection) \
             VALUES (FALSE, $1, $2, $3, $4, $5, $6, $7, $8, $9) \
             RETURNING {SLOT_COLUMNS}"
        );
        sqlx::query_as::<_, ScheduleSlotRow>(&query)
            .bind(input.slot_date)
            .bind(input.parent_slot_id)
            .bind(input.start_time)
            .bind(input.end_time)
            .bind(&input.show_name)
            .bind(&input.host_name)
            .bind(&input.color)
            .bind(input.is_prerecorded)
            .bind(input.is_collection)
            .fetch_one(pool)
            .await
    }

    /// Materialize a master occurrence as a real override row.
    ///
    /// Idempotent: when an active override already exists for
    /// `(master_id, date)` it is returned unchanged with `created = false`.
    /// An unknown master id surfaces as `RowNotFound`.
    pub async fn materialize(
        pool: &PgPool,
        master_id: DbId,
        date: NaiveDate,
    ) -> Result<Materialized, sqlx::Error> {
        let query = format!(
            "INSERT INTO schedule_slots \
                 (is_master, slot_date, parent_slot_id, start_time, end_time, \
                  show_name, host_name, color, is_prerecorded, is_collection) \
             SELECT FALSE, $2, id, start_time, end_time, \
                    show_name, host_name, color, is_prerecorded, is_collection \
             FROM schedule_slots WHERE id = $1 AND is_master AND NOT is_deleted \
             ON CONFLICT (parent_slot_id, slot_date) \
                 WHERE parent_slot_id IS NOT NULL AND NOT is_deleted DO NOTHING \
             RETURNING {SLOT_COLUMNS}"
        );
        let inserted = sqlx::query_as::<_, ScheduleSlotRow>(&query)
            .bind(master_id)
            .bind(date)
            .fetch_optional(pool)
            .await?;

        match inserted {
            Some(slot) => {
                tracing::debug!(master_id, %date, slot_id = slot.id, "Materialized occurrence");
                Ok(Materialized {
                    slot,
                    created: true,
                })
            }
            None => {
                // Lost the race or already materialized: hand back the row
                // that won. RowNotFound here means the master id is unknown.
                let slot = Self::find_active_override(pool, master_id, date)
                    .await?
                    .ok_or(sqlx::Error::RowNotFound)?;
                Ok(Materialized {
                    slot,
                    created: false,
                })
            }
        }
    }

    /// Suppress `(master_id, date)` with a deletion override.
    ///
    /// An existing active override becomes the tombstone; otherwise a fresh
    /// tombstone row is written. Check-then-act runs in a transaction so a
    /// concurrent materialization cannot slip between the two statements.
    pub async fn suppress_occurrence(
        pool: &PgPool,
        master_id: DbId,
        date: NaiveDate,
    ) -> Result<ScheduleSlotRow, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let select = format!(
            "SELECT {SLOT_COLUMNS} FROM schedule_slots \
             WHERE parent_slot_id = $1 AND slot_date = $2 AND NOT is_deleted \
             FOR UPDATE"
        );
        let existing = sqlx::query_as::<_, ScheduleSlotRow>(&select)
            .bind(master_id)
            .bind(date)
            .fetch_optional(&mut *tx)
            .await?;

        let row = if let Some(existing) = existing {
            let update = format!(
                "UPDATE schedule_slots SET is_deleted = TRUE, updated_at = now() \
                 WHERE id = $1 RETURNING {SLOT_COLUMNS}"
            );
            sqlx::query_as::<_, ScheduleSlotRow>(&update)
                .bind(existing.id)
                .fetch_one(&mut *tx)
                .await?
        } else {
            let insert = format!(
                "INSERT INTO schedule_slots \
                     (is_master, slot_date, parent_slot_id, start_time, end_time, \
                      show_name, host_name, color, is_prerecorded, is_collection, is_deleted) \
                 SELECT FALSE, $2, id, start_time, end_time, \
                        show_name, host_name, color, is_prerecorded, is_collection, TRUE \
                 FROM schedule_slots WHERE id = $1 AND is_master AND NOT is_deleted \
                 RETURNING {SLOT_COLUMNS}"
            );
            sqlx::query_as::<_, ScheduleSlotRow>(&insert)
                .bind(master_id)
                .bind(date)
                .fetch_one(&mut *tx)
                .await?
        };

        tx.commit().await?;
        tracing::debug!(master_id, %date, "Suppressed occurrence");
        Ok(row)
    }

    /// Partial update of a slot's schedule and payload fields.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateSlot,
    ) -> Result<ScheduleSlotRow, sqlx::Error> {
        let query = format!(
            "UPDATE schedule_slots SET \
                 day_of_week = COALESCE($2, day_of_week), \
                 start_time = COALESCE($3, start_time), \
                 end_time = COALESCE($4, end_time), \
                 show_name = COALESCE($5, show_name), \
                 host_name = COALESCE($6, host_name), \
                 color = COALESCE($7, color), \
                 is_prerecorded = COALESCE($8, is_prerecorded), \
                 is_collection = COALESCE($9, is_collection), \
                 updated_at = now() \
             WHERE id = $1 AND NOT is_deleted \
             RETURNING {SLOT_COLUMNS}"
        );
        sqlx::query_as::<_, ScheduleSlotRow>(&query)
            .bind(id)
            .bind(input.day_of_week)
            .bind(input.start_time)
            .bind(input.end_time)
            .bind(&input.show_name)
            .bind(&input.host_name)
            .bind(&input.color)
            .bind(input.is_prerecorded)
            .bind(input.is_collection)
            .fetch_one(pool)
            .await
    }

    /// Soft-delete an instance row. Returns `false` when nothing matched.
    pub async fn soft_delete_instance(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE schedule_slots SET is_deleted = TRUE, updated_at = now() \
             WHERE id = $1 AND NOT is_master AND NOT is_deleted",
        )
        .bind(id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Hard-delete a master; its overrides cascade.
    pub async fn delete_master(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM schedule_slots WHERE id = $1 AND is_master")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
