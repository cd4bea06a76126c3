//! Repository for the `lineups` and `lineup_items` tables.

use chrono::NaiveDate;
use sqlx::PgPool;

use radiodesk_core::types::DbId;

use crate::models::lineup::{CreateLineupItem, Lineup, LineupItem, UpdateLineup, UpdateLineupItem};

const LINEUP_COLUMNS: &str = "\
    id, slot_id, lineup_date, title, notes, created_at, updated_at";

const ITEM_COLUMNS: &str = "\
    id, lineup_id, position, kind, title, artist, duration_secs, notes, \
    created_at, updated_at";

/// CRUD for lineups and their ordered items.
pub struct LineupRepo;

impl LineupRepo {
    /// Find or create the lineup attached to a slot occurrence.
    ///
    /// Idempotent under the `uq_lineups_slot_date` constraint: concurrent
    /// calls converge on the same row.
    pub async fn find_or_create(
        pool: &PgPool,
        slot_id: DbId,
        date: NaiveDate,
    ) -> Result<Lineup, sqlx::Error> {
        let insert = format!(
            "INSERT INTO lineups (slot_id, lineup_date) VALUES ($1, $2) \
             ON CONFLICT ON CONSTRAINT uq_lineups_slot_date DO NOTHING \
             RETURNING {LINEUP_COLUMNS}"
        );
        let inserted = sqlx::query_as::<_, Lineup>(&insert)
            .bind(slot_id)
            .bind(date)
            .fetch_optional(pool)
            .await?;

        if let Some(lineup) = inserted {
            return Ok(lineup);
        }

        let select = format!(
            "SELECT {LINEUP_COLUMNS} FROM lineups WHERE slot_id = $1 AND lineup_date = $2"
        );
        sqlx::query_as::<_, Lineup>(&select)
            .bind(slot_id)
            .bind(date)
            .fetch_one(pool)
            .await
    }

    /// Find a lineup by ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Lineup>, sqlx::Error> {
        let query = format!("SELECT {LINEUP_COLUMNS} FROM lineups WHERE id = $1");
        sqlx::query_as::<_, Lineup>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Partial update of a lineup's own fields.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateLineup,
    ) -> Result<Lineup, sqlx::Error> {
        let query = format!(
            "UPDATE lineups SET \
                 title = COALESCE($2, title), \
                 notes = COALESCE($3, notes), \
                 updated_at = now() \
             WHERE id = $1 \
             RETURNING {LINEUP_COLUMNS}"
        );
        sqlx::query_as::<_, Lineup>(&query)
            .bind(id)
            .bind(&input.title)
            .bind(&input.notes)
            .fetch_one(pool)
            .await
    }

    /// List a lineup's items in running order.
    pub async fn list_items(
        pool: &PgPool,
        lineup_id: DbId,
    ) -> Result<Vec<LineupItem>, sqlx::Error> {
        let query = format!(
            "SELECT {ITEM_COLUMNS} FROM lineup_items \
             WHERE lineup_id = $1 ORDER BY position, id"
        );
        sqlx::query_as::<_, LineupItem>(&query)
            .bind(lineup_id)
            .fetch_all(pool)
            .await
    }

    /// Append an item at the end of the lineup.
    pub async fn add_item(
        pool: &PgPool,
        lineup_id: DbId,
        input: &CreateLineupItem,
    ) -> Result<LineupItem, sqlx::Error> {
        let query = format!(
            "INSERT INTO lineup_items \
                 (lineup_id, position, kind, title, artist, duration_secs, notes) \
             SELECT $1, COALESCE(MAX(position), 0) + 1, $2, $3, $4, $5, $6 \
             FROM lineup_items WHERE lineup_id = $1 \
             RETURNING {ITEM_COLUMNS}"
        );
        sqlx::query_as::<_, LineupItem>(&query)
            .bind(lineup_id)
            .bind(&input.kind)
            .bind(&input.title)
            .bind(&input.artist)
            .bind(input.duration_secs)
            .bind(&input.notes)
            .fetch_one(pool)
            .await
    }

    /// Partial update of a single item.
    pub async fn update_item(
        pool: &PgPool,
        lineup_id: DbId,
        item_id: DbId,
        input: &UpdateLineupItem,
    ) -> Result<LineupItem, sqlx::Error> {
        let query = format!(
            "UPDATE lineup_items SET \
                 kind = COALESCE($3, kind), \
                 title = COALESCE($4, title), \
                 artist = COALESCE($5, artist), \
                 duration_secs = COALESCE($6, duration_secs), \
                 notes = COALESCE($7, notes), \
                 updated_at = now() \
             WHERE id = $1 AND lineup_id = $2 \
             RETURNING {ITEM_COLUMNS}"
        );
        sqlx::query_as::<_, LineupItem>(&query)
            .bind(item_id)
            .bind(lineup_id)
            .bind(&input.kind)
            .bind(&input.title)
            .bind(&input.artist)
            .bind(input.duration_secs)
            .bind(&input.notes)
            .fetch_one(pool)
            .await
    }

    /// Remove an item. Returns `false` when nothing matched.
    pub async fn remove_item(
        pool: &PgPool,
        lineup_id: DbId,
        item_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM lineup_items WHERE id = $1 AND lineup_id = $2")
            .bind(item_id)
            .bind(lineup_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Rewrite positions to match the given id order.
    ///
    /// Ids that do not belong to the lineup are ignored. Returns the items
    /// in their new order.
    pub async fn reorder_items(
        pool: &PgPool,
        lineup_id: DbId,
        item_ids: &[DbId],
    ) -> Result<Vec<LineupItem>, sqlx::Error> {
        let mut tx = pool.begin().await?;
        for (index, item_id) in item_ids.iter().enumerate() {
            sqlx::query(
                "UPDATE lineup_items SET position = $3, updated_at = now() \
                 WHERE id = $1 AND lineup_id = $2",
            )
            .bind(item_id)
            .bind(lineup_id)
            .bind((index + 1) as i32)
            .execute(&mut *tx)
            .await?;
        }
        tx.commit().await?;

        Self::list_items(pool, lineup_id).await
    }
}
