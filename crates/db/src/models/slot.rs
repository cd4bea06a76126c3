//! Schedule slot rows and DTOs.
//!
//! One table holds both recurring masters and date-bound instances; the
//! conversion helpers hand rows to the resolver as the core types it
//! consumes.

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use radiodesk_core::error::CoreError;
use radiodesk_core::schedule::{InstanceSlot, MasterSlot, SlotPayload};
use radiodesk_core::types::{DbId, Timestamp};

/// A row from the `schedule_slots` table (master or instance).
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ScheduleSlotRow {
    pub id: DbId,
    pub is_master: bool,
    pub day_of_week: Option<i16>,
    pub slot_date: Option<NaiveDate>,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub parent_slot_id: Option<DbId>,
    pub is_deleted: bool,
    pub show_name: String,
    pub host_name: Option<String>,
    pub color: Option<String>,
    pub is_prerecorded: bool,
    pub is_collection: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl ScheduleSlotRow {
    fn payload(&self) -> SlotPayload {
        SlotPayload {
            show_name: self.show_name.clone(),
            host_name: self.host_name.clone(),
            color: self.color.clone(),
            is_prerecorded: self.is_prerecorded,
            is_collection: self.is_collection,
        }
    }

    /// Interpret this row as a recurring master template.
    pub fn to_master(&self) -> Result<MasterSlot, CoreError> {
        let day_of_week = self.day_of_week.ok_or_else(|| {
            CoreError::Internal(format!("master slot {} has no day_of_week", self.id))
        })?;
        Ok(MasterSlot {
            id: self.id,
            day_of_week,
            start_time: self.start_time,
            end_time: self.end_time,
            payload: self.payload(),
        })
    }

    /// Interpret this row as a date-bound instance.
    pub fn to_instance(&self) -> Result<InstanceSlot, CoreError> {
        let date = self.slot_date.ok_or_else(|| {
            CoreError::Internal(format!("instance slot {} has no slot_date", self.id))
        })?;
        Ok(InstanceSlot {
            id: self.id,
            parent_id: self.parent_slot_id,
            date,
            start_time: self.start_time,
            end_time: self.end_time,
            is_deleted: self.is_deleted,
            payload: self.payload(),
        })
    }
}

/// DTO for creating a master slot.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateMasterSlot {
    pub day_of_week: i16,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    #[validate(length(min = 1, max = 200))]
    pub show_name: String,
    #[validate(length(max = 200))]
    pub host_name: Option<String>,
    #[validate(length(max = 32))]
    pub color: Option<String>,
    #[serde(default)]
    pub is_prerecorded: bool,
    #[serde(default)]
    pub is_collection: bool,
}

/// DTO for creating an instance: a standalone custom slot, or an override
/// of a master occurrence when `parent_slot_id` is set.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateInstanceSlot {
    pub slot_date: NaiveDate,
    pub parent_slot_id: Option<DbId>,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    #[validate(length(min = 1, max = 200))]
    pub show_name: String,
    #[validate(length(max = 200))]
    pub host_name: Option<String>,
    #[validate(length(max = 32))]
    pub color: Option<String>,
    #[serde(default)]
    pub is_prerecorded: bool,
    #[serde(default)]
    pub is_collection: bool,
}

/// Partial update for either kind of slot.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateSlot {
    pub day_of_week: Option<i16>,
    pub start_time: Option<NaiveTime>,
    pub end_time: Option<NaiveTime>,
    #[validate(length(min = 1, max = 200))]
    pub show_name: Option<String>,
    #[validate(length(max = 200))]
    pub host_name: Option<String>,
    #[validate(length(max = 32))]
    pub color: Option<String>,
    pub is_prerecorded: Option<bool>,
    pub is_collection: Option<bool>,
}

/// Request to materialize one master occurrence.
#[derive(Debug, Deserialize)]
pub struct MaterializeOccurrence {
    pub master_id: DbId,
    pub date: NaiveDate,
}

/// Request to suppress one master occurrence.
#[derive(Debug, Deserialize)]
pub struct SuppressOccurrence {
    pub master_id: DbId,
    pub date: NaiveDate,
}

/// Result of a materialization attempt.
#[derive(Debug, Serialize)]
pub struct Materialized {
    pub slot: ScheduleSlotRow,
    /// False when the occurrence had already been materialized.
    pub created: bool,
}
