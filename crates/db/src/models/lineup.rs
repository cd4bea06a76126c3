//! Lineup rows and DTOs.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use radiodesk_core::schedule::SlotId;
use radiodesk_core::types::{DbId, Timestamp};

/// A row from the `lineups` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Lineup {
    pub id: DbId,
    pub slot_id: DbId,
    pub lineup_date: NaiveDate,
    pub title: Option<String>,
    pub notes: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A row from the `lineup_items` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct LineupItem {
    pub id: DbId,
    pub lineup_id: DbId,
    pub position: i32,
    pub kind: String,
    pub title: String,
    pub artist: Option<String>,
    pub duration_secs: Option<i32>,
    pub notes: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A lineup together with its ordered items.
#[derive(Debug, Serialize)]
pub struct LineupWithItems {
    #[serde(flatten)]
    pub lineup: Lineup,
    pub items: Vec<LineupItem>,
}

/// Request to find or create the lineup for a resolved slot occurrence.
///
/// `slot_id` accepts virtual ids; the handler materializes the occurrence
/// before linking.
#[derive(Debug, Deserialize)]
pub struct LineupForSlot {
    pub slot_id: SlotId,
    pub date: NaiveDate,
}

/// Partial update for a lineup's own fields.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateLineup {
    #[validate(length(max = 200))]
    pub title: Option<String>,
    #[validate(length(max = 2000))]
    pub notes: Option<String>,
}

/// DTO for appending an item to a lineup.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateLineupItem {
    pub kind: String,
    #[validate(length(min = 1, max = 300))]
    pub title: String,
    #[validate(length(max = 300))]
    pub artist: Option<String>,
    #[validate(range(min = 1))]
    pub duration_secs: Option<i32>,
    #[validate(length(max = 2000))]
    pub notes: Option<String>,
}

/// Partial update for a lineup item.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateLineupItem {
    pub kind: Option<String>,
    #[validate(length(min = 1, max = 300))]
    pub title: Option<String>,
    #[validate(length(max = 300))]
    pub artist: Option<String>,
    #[validate(range(min = 1))]
    pub duration_secs: Option<i32>,
    #[validate(length(max = 2000))]
    pub notes: Option<String>,
}

/// Full-lineup reorder: item ids in their new order.
#[derive(Debug, Deserialize)]
pub struct ReorderLineupItems {
    pub item_ids: Vec<DbId>,
}
