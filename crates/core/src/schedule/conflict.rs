//! Time-window conflict detection for schedule writes.
//!
//! Used before any instance create/update to keep the per-day invariant:
//! no two effective slots on the same date may overlap.

use chrono::NaiveTime;

use crate::error::CoreError;

use super::slot::{ResolvedSlot, SlotId};

/// A candidate time window being validated against a resolved day.
#[derive(Debug, Clone, Copy)]
pub struct CandidateWindow {
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
}

/// Half-open interval overlap: `[a_start, a_end)` vs `[b_start, b_end)`.
///
/// Touching windows (one ends exactly where the other starts) do not
/// overlap.
pub fn windows_overlap(
    a_start: NaiveTime,
    a_end: NaiveTime,
    b_start: NaiveTime,
    b_end: NaiveTime,
) -> bool {
    a_start < b_end && b_start < a_end
}

/// First effective slot whose window overlaps the candidate.
///
/// `exclude` names the identity being edited; a slot never conflicts with
/// itself. Editing the projection of a master occurrence passes the virtual
/// id so the projection does not block its own replacement.
pub fn find_conflict<'a>(
    resolved_for_date: &'a [ResolvedSlot],
    candidate: CandidateWindow,
    exclude: Option<&SlotId>,
) -> Option<&'a ResolvedSlot> {
    resolved_for_date.iter().find(|slot| {
        if exclude.is_some_and(|ex| *ex == slot.id) {
            return false;
        }
        windows_overlap(
            candidate.start_time,
            candidate.end_time,
            slot.start_time,
            slot.end_time,
        )
    })
}

/// Validate a candidate window against the resolved day.
pub fn check_conflict(
    resolved_for_date: &[ResolvedSlot],
    candidate: CandidateWindow,
    exclude: Option<&SlotId>,
) -> Result<(), CoreError> {
    match find_conflict(resolved_for_date, candidate, exclude) {
        Some(existing) => Err(CoreError::Conflict(format!(
            "time window {}-{} overlaps '{}' ({}-{}) on {}",
            candidate.start_time,
            candidate.end_time,
            existing.payload.show_name,
            existing.start_time,
            existing.end_time,
            existing.date,
        ))),
        None => Ok(()),
    }
}
