//! Slot identity and schedule entity types.
//!
//! Two kinds of slot exist: recurring weekly masters keyed by day-of-week,
//! and date-bound instances. An instance either overrides a specific master
//! occurrence (`parent_id` set) or stands alone as a custom slot.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, Duration, NaiveDate, NaiveTime};
use serde::de;
use serde::{Deserialize, Serialize, Serializer};

use crate::error::CoreError;
use crate::types::DbId;

/// Prefix marking a synthetic id of an unmaterialized projection.
const VIRTUAL_ID_PREFIX: &str = "virtual-";

// ---------------------------------------------------------------------------
// Day-of-week helpers
// ---------------------------------------------------------------------------

/// Day-of-week numbering used throughout: 0 = Sunday .. 6 = Saturday.
pub fn day_of_week(date: NaiveDate) -> i16 {
    date.weekday().num_days_from_sunday() as i16
}

/// Sunday and Saturday of the week containing `date`.
pub fn week_bounds(date: NaiveDate) -> (NaiveDate, NaiveDate) {
    let start = date - Duration::days(i64::from(day_of_week(date)));
    (start, start + Duration::days(6))
}

/// Reject day-of-week values outside 0..=6.
pub fn validate_day_of_week(dow: i16) -> Result<(), CoreError> {
    if !(0..=6).contains(&dow) {
        return Err(CoreError::Validation(format!(
            "day_of_week must be 0 (Sunday) to 6 (Saturday), got {dow}"
        )));
    }
    Ok(())
}

/// Reject empty or negative wall-clock windows.
pub fn validate_time_window(start: NaiveTime, end: NaiveTime) -> Result<(), CoreError> {
    if end <= start {
        return Err(CoreError::Validation(format!(
            "end time {end} must be after start time {start}"
        )));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Slot identity
// ---------------------------------------------------------------------------

/// Identity of an effective slot.
///
/// Persisted slots carry their store-issued id. A master projected onto a
/// date that has not been materialized yet gets a deterministic synthetic
/// id, so the admin UI can address the occurrence without it ever colliding
/// with a real row id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SlotId {
    /// A persisted `schedule_slots` row.
    Real(DbId),
    /// An unmaterialized projection of `master_id` onto `date`.
    Virtual { master_id: DbId, date: NaiveDate },
}

impl SlotId {
    pub fn is_virtual(&self) -> bool {
        matches!(self, SlotId::Virtual { .. })
    }
}

impl fmt::Display for SlotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SlotId::Real(id) => write!(f, "{id}"),
            SlotId::Virtual { master_id, date } => {
                write!(f, "{VIRTUAL_ID_PREFIX}{master_id}-{}", date.format("%Y-%m-%d"))
            }
        }
    }
}

impl FromStr for SlotId {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Some(rest) = s.strip_prefix(VIRTUAL_ID_PREFIX) {
            let (master, date) = rest
                .split_once('-')
                .ok_or_else(|| CoreError::Validation(format!("malformed virtual slot id: {s}")))?;
            let master_id = master
                .parse::<DbId>()
                .map_err(|_| CoreError::Validation(format!("malformed virtual slot id: {s}")))?;
            let date = NaiveDate::parse_from_str(date, "%Y-%m-%d")
                .map_err(|_| CoreError::Validation(format!("malformed virtual slot id: {s}")))?;
            Ok(SlotId::Virtual { master_id, date })
        } else {
            s.parse::<DbId>()
                .map(SlotId::Real)
                .map_err(|_| CoreError::Validation(format!("invalid slot id: {s}")))
        }
    }
}

impl Serialize for SlotId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            SlotId::Real(id) => serializer.serialize_i64(*id),
            SlotId::Virtual { .. } => serializer.serialize_str(&self.to_string()),
        }
    }
}

impl<'de> Deserialize<'de> for SlotId {
    fn deserialize<D: de::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct IdVisitor;

        impl de::Visitor<'_> for IdVisitor {
            type Value = SlotId;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a numeric slot id or a virtual slot id string")
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<SlotId, E> {
                Ok(SlotId::Real(v))
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<SlotId, E> {
                i64::try_from(v)
                    .map(SlotId::Real)
                    .map_err(|_| E::custom("slot id out of range"))
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<SlotId, E> {
                v.parse().map_err(E::custom)
            }
        }

        deserializer.deserialize_any(IdVisitor)
    }
}

// ---------------------------------------------------------------------------
// Slot entities
// ---------------------------------------------------------------------------

/// Display/business fields carried by every slot.
///
/// Opaque to the resolver: copied verbatim into resolved output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotPayload {
    pub show_name: String,
    #[serde(default)]
    pub host_name: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub is_prerecorded: bool,
    #[serde(default)]
    pub is_collection: bool,
}

/// A recurring weekly template slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MasterSlot {
    pub id: DbId,
    /// 0 = Sunday .. 6 = Saturday.
    pub day_of_week: i16,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub payload: SlotPayload,
}

impl MasterSlot {
    /// Project this master onto a concrete date as a virtual occurrence.
    pub fn project(&self, date: NaiveDate) -> ResolvedSlot {
        ResolvedSlot {
            id: SlotId::Virtual {
                master_id: self.id,
                date,
            },
            parent_id: Some(self.id),
            date,
            day_of_week: day_of_week(date),
            start_time: self.start_time,
            end_time: self.end_time,
            is_virtual: true,
            payload: self.payload.clone(),
        }
    }
}

/// A concrete occurrence tied to one calendar date.
///
/// `parent_id` links an override back to the master occurrence it replaces;
/// standalone custom slots carry no parent. `is_deleted` rows are deletion
/// overrides: they suppress the occurrence without touching the master.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstanceSlot {
    pub id: DbId,
    pub parent_id: Option<DbId>,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub is_deleted: bool,
    pub payload: SlotPayload,
}

impl InstanceSlot {
    /// View this persisted instance as a resolved occurrence.
    pub fn to_resolved(&self) -> ResolvedSlot {
        ResolvedSlot {
            id: SlotId::Real(self.id),
            parent_id: self.parent_id,
            date: self.date,
            day_of_week: day_of_week(self.date),
            start_time: self.start_time,
            end_time: self.end_time,
            is_virtual: false,
            payload: self.payload.clone(),
        }
    }
}

/// One effective broadcast occurrence produced by resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedSlot {
    pub id: SlotId,
    pub parent_id: Option<DbId>,
    pub date: NaiveDate,
    pub day_of_week: i16,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub is_virtual: bool,
    #[serde(flatten)]
    pub payload: SlotPayload,
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn payload(show: &str) -> SlotPayload {
        SlotPayload {
            show_name: show.to_string(),
            host_name: None,
            color: None,
            is_prerecorded: false,
            is_collection: false,
        }
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn time(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    // -----------------------------------------------------------------------
    // Day-of-week math
    // -----------------------------------------------------------------------

    #[test]
    fn sunday_is_zero() {
        // 2026-08-02 is a Sunday.
        assert_eq!(day_of_week(date(2026, 8, 2)), 0);
    }

    #[test]
    fn saturday_is_six() {
        assert_eq!(day_of_week(date(2026, 8, 8)), 6);
    }

    #[test]
    fn week_bounds_spans_sunday_to_saturday() {
        // 2026-08-05 is a Wednesday.
        let (start, end) = week_bounds(date(2026, 8, 5));
        assert_eq!(start, date(2026, 8, 2));
        assert_eq!(end, date(2026, 8, 8));
    }

    #[test]
    fn week_bounds_of_sunday_starts_on_itself() {
        let (start, end) = week_bounds(date(2026, 8, 2));
        assert_eq!(start, date(2026, 8, 2));
        assert_eq!(end, date(2026, 8, 8));
    }

    #[test]
    fn day_of_week_out_of_range_rejected() {
        assert_matches!(validate_day_of_week(7), Err(CoreError::Validation(_)));
        assert_matches!(validate_day_of_week(-1), Err(CoreError::Validation(_)));
        assert!(validate_day_of_week(0).is_ok());
        assert!(validate_day_of_week(6).is_ok());
    }

    #[test]
    fn empty_time_window_rejected() {
        assert_matches!(
            validate_time_window(time(10, 0), time(10, 0)),
            Err(CoreError::Validation(_))
        );
        assert_matches!(
            validate_time_window(time(11, 0), time(10, 0)),
            Err(CoreError::Validation(_))
        );
        assert!(validate_time_window(time(10, 0), time(11, 0)).is_ok());
    }

    // -----------------------------------------------------------------------
    // Slot identity
    // -----------------------------------------------------------------------

    #[test]
    fn real_id_round_trips_through_string() {
        let id = SlotId::Real(42);
        assert_eq!(id.to_string(), "42");
        assert_eq!("42".parse::<SlotId>().unwrap(), id);
    }

    #[test]
    fn virtual_id_round_trips_through_string() {
        let id = SlotId::Virtual {
            master_id: 7,
            date: date(2026, 8, 3),
        };
        assert_eq!(id.to_string(), "virtual-7-2026-08-03");
        assert_eq!("virtual-7-2026-08-03".parse::<SlotId>().unwrap(), id);
        assert!(id.is_virtual());
    }

    #[test]
    fn malformed_virtual_id_rejected() {
        assert_matches!(
            "virtual-x-2026-08-03".parse::<SlotId>(),
            Err(CoreError::Validation(_))
        );
        assert_matches!("virtual-7".parse::<SlotId>(), Err(CoreError::Validation(_)));
        assert_matches!(
            "virtual-7-yesterday".parse::<SlotId>(),
            Err(CoreError::Validation(_))
        );
    }

    #[test]
    fn real_serializes_as_number_virtual_as_string() {
        let real = serde_json::to_value(SlotId::Real(42)).unwrap();
        assert_eq!(real, serde_json::json!(42));

        let virt = serde_json::to_value(SlotId::Virtual {
            master_id: 7,
            date: date(2026, 8, 3),
        })
        .unwrap();
        assert_eq!(virt, serde_json::json!("virtual-7-2026-08-03"));
    }

    #[test]
    fn slot_id_deserializes_from_number_or_string() {
        let real: SlotId = serde_json::from_value(serde_json::json!(42)).unwrap();
        assert_eq!(real, SlotId::Real(42));

        let virt: SlotId = serde_json::from_value(serde_json::json!("virtual-7-2026-08-03")).unwrap();
        assert_matches!(virt, SlotId::Virtual { master_id: 7, .. });
    }

    // -----------------------------------------------------------------------
    // Projection
    // -----------------------------------------------------------------------

    #[test]
    fn projection_copies_master_fields() {
        let master = MasterSlot {
            id: 3,
            day_of_week: 1,
            start_time: time(10, 0),
            end_time: time(11, 0),
            payload: payload("Morning Show"),
        };
        // 2026-08-03 is a Monday.
        let slot = master.project(date(2026, 8, 3));
        assert!(slot.is_virtual);
        assert_eq!(slot.parent_id, Some(3));
        assert_eq!(slot.date, date(2026, 8, 3));
        assert_eq!(slot.day_of_week, 1);
        assert_eq!(slot.start_time, time(10, 0));
        assert_eq!(slot.payload.show_name, "Morning Show");
    }
}
