//! Master/override resolution.
//!
//! Projects recurring master slots onto every date of a requested range and
//! merges in the persisted per-date instances: an active override replaces
//! its master occurrence, a deletion override suppresses it, and standalone
//! custom slots are appended as-is. Pure and synchronous; the caller loads
//! the rows and persists any materializations.

use std::collections::{HashMap, HashSet};

use chrono::NaiveDate;

use crate::error::CoreError;
use crate::types::DbId;

use super::slot::{day_of_week, InstanceSlot, MasterSlot, ResolvedSlot};

/// Resolve the effective broadcast slots for every date in
/// `[range_start, range_end]` (inclusive).
///
/// `masters` is the full template set; `overrides` is every instance row
/// whose date falls in the range, *including* deletion overrides.
///
/// Guarantees:
/// - one occurrence per (master, matching date) unless a deletion override
///   suppresses it;
/// - an active override and its master occurrence never both appear;
/// - per date, output is sorted by start time, stable (masters ahead of
///   customs on equal start times);
/// - identical inputs produce identical output.
pub fn resolve(
    masters: &[MasterSlot],
    overrides: &[InstanceSlot],
    range_start: NaiveDate,
    range_end: NaiveDate,
) -> Result<Vec<ResolvedSlot>, CoreError> {
    if range_end < range_start {
        return Err(CoreError::InvalidRange(format!(
            "range end {range_end} is before range start {range_start}"
        )));
    }

    // Partition the overrides once up front.
    let mut active_by_parent: HashMap<(DbId, NaiveDate), &InstanceSlot> = HashMap::new();
    let mut actives_by_date: HashMap<NaiveDate, Vec<&InstanceSlot>> = HashMap::new();
    let mut suppressed: HashSet<(DbId, NaiveDate)> = HashSet::new();

    for ov in overrides {
        match (ov.is_deleted, ov.parent_id) {
            // Deletion override: suppresses the master occurrence for its date.
            (true, Some(parent)) => {
                suppressed.insert((parent, ov.date));
            }
            // A deleted custom slot only suppresses itself.
            (true, None) => {}
            (false, parent) => {
                if let Some(parent) = parent {
                    // The store enforces uniqueness on (parent, date) among
                    // active overrides; should a stale duplicate slip through,
                    // the first row wins.
                    active_by_parent.entry((parent, ov.date)).or_insert(ov);
                }
                actives_by_date.entry(ov.date).or_default().push(ov);
            }
        }
    }

    let mut resolved = Vec::new();
    for date in range_start.iter_days().take_while(|d| *d <= range_end) {
        let dow = day_of_week(date);
        let mut day: Vec<ResolvedSlot> = Vec::new();
        let mut consumed: HashSet<DbId> = HashSet::new();

        // Masters first: override wins, otherwise project a virtual occurrence.
        for master in masters.iter().filter(|m| m.day_of_week == dow) {
            if suppressed.contains(&(master.id, date)) {
                continue;
            }
            match active_by_parent.get(&(master.id, date)) {
                Some(ov) => {
                    consumed.insert(ov.id);
                    day.push(ov.to_resolved());
                }
                None => day.push(master.project(date)),
            }
        }

        // Remaining actives for the date: standalone customs, plus overrides
        // whose master no longer matches this weekday (a master's day may have
        // been edited after the override was written). An active row always
        // manifests; dropping it here would make slots silently disappear.
        for ov in actives_by_date.get(&date).into_iter().flatten() {
            if consumed.contains(&ov.id) {
                continue;
            }
            if let Some(parent) = ov.parent_id {
                if active_by_parent.get(&(parent, date)).map(|o| o.id) != Some(ov.id) {
                    continue;
                }
            }
            day.push(ov.to_resolved());
        }

        // Stable: preserves master-before-custom order on equal start times.
        day.sort_by_key(|slot| slot.start_time);
        resolved.extend(day);
    }

    Ok(resolved)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schedule::slot::{SlotId, SlotPayload};
    use assert_matches::assert_matches;
    use chrono::NaiveTime;

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

    fn master(id: DbId, dow: i16, start: NaiveTime, end: NaiveTime, show: &str) -> MasterSlot {
        MasterSlot {
            id,
            day_of_week: dow,
            start_time: start,
            end_time: end,
            payload: payload(show),
        }
    }

    fn instance(
        id: DbId,
        parent: Option<DbId>,
        on: NaiveDate,
        start: NaiveTime,
        end: NaiveTime,
        show: &str,
    ) -> InstanceSlot {
        InstanceSlot {
            id,
            parent_id: parent,
            date: on,
            start_time: start,
            end_time: end,
            is_deleted: false,
            payload: payload(show),
        }
    }

    fn deletion(id: DbId, parent: DbId, on: NaiveDate) -> InstanceSlot {
        InstanceSlot {
            id,
            parent_id: Some(parent),
            date: on,
            start_time: time(0, 0),
            end_time: time(0, 1),
            is_deleted: true,
            payload: payload("deleted"),
        }
    }

    // 2026-08-02 is a Sunday; 2026-08-03 a Monday; 2026-08-08 a Saturday.
    fn week_start() -> NaiveDate {
        date(2026, 8, 2)
    }

    fn week_end() -> NaiveDate {
        date(2026, 8, 8)
    }

    // -----------------------------------------------------------------------
    // Range handling
    // -----------------------------------------------------------------------

    #[test]
    fn inverted_range_is_rejected() {
        let result = resolve(&[], &[], week_end(), week_start());
        assert_matches!(result, Err(CoreError::InvalidRange(_)));
    }

    #[test]
    fn single_date_range_is_valid() {
        let monday = date(2026, 8, 3);
        let m = master(1, 1, time(10, 0), time(11, 0), "Morning Show");
        let slots = resolve(&[m], &[], monday, monday).unwrap();
        assert_eq!(slots.len(), 1);
    }

    #[test]
    fn empty_inputs_resolve_to_empty() {
        assert!(resolve(&[], &[], week_start(), week_end()).unwrap().is_empty());
    }

    // -----------------------------------------------------------------------
    // Virtual projection
    // -----------------------------------------------------------------------

    #[test]
    fn master_projects_one_virtual_per_matching_date() {
        let m = master(1, 1, time(10, 0), time(11, 0), "Morning Show");
        let slots = resolve(&[m], &[], week_start(), week_end()).unwrap();

        assert_eq!(slots.len(), 1);
        let slot = &slots[0];
        assert!(slot.is_virtual);
        assert_eq!(slot.date, date(2026, 8, 3));
        assert_eq!(slot.start_time, time(10, 0));
        assert_eq!(slot.end_time, time(11, 0));
        assert_eq!(slot.payload.show_name, "Morning Show");
        assert_eq!(
            slot.id,
            SlotId::Virtual {
                master_id: 1,
                date: date(2026, 8, 3)
            }
        );
    }

    #[test]
    fn multi_week_range_projects_every_occurrence() {
        let m = master(1, 1, time(10, 0), time(11, 0), "Morning Show");
        // Four Mondays: Aug 3, 10, 17, 24.
        let slots = resolve(&[m], &[], date(2026, 8, 2), date(2026, 8, 29)).unwrap();
        assert_eq!(slots.len(), 4);
        assert!(slots.iter().all(|s| s.day_of_week == 1 && s.is_virtual));
    }

    #[test]
    fn masters_on_other_weekdays_do_not_leak() {
        let mon = master(1, 1, time(10, 0), time(11, 0), "Monday Show");
        let fri = master(2, 5, time(10, 0), time(11, 0), "Friday Show");
        let monday = date(2026, 8, 3);
        let slots = resolve(&[mon, fri], &[], monday, monday).unwrap();
        assert_eq!(slots.len(), 1);
        assert_eq!(slots[0].payload.show_name, "Monday Show");
    }

    // -----------------------------------------------------------------------
    // Overrides
    // -----------------------------------------------------------------------

    #[test]
    fn active_override_replaces_master_occurrence() {
        let m = master(1, 1, time(10, 0), time(11, 0), "Morning Show");
        let ov = instance(
            10,
            Some(1),
            date(2026, 8, 3),
            time(10, 0),
            time(11, 0),
            "Special Edition",
        );
        let slots = resolve(&[m], &[ov], week_start(), week_end()).unwrap();

        assert_eq!(slots.len(), 1);
        assert_eq!(slots[0].payload.show_name, "Special Edition");
        assert!(!slots[0].is_virtual);
        assert_eq!(slots[0].id, SlotId::Real(10));
        assert_eq!(slots[0].parent_id, Some(1));
    }

    #[test]
    fn override_only_affects_its_own_date() {
        let m = master(1, 1, time(10, 0), time(11, 0), "Morning Show");
        let ov = instance(
            10,
            Some(1),
            date(2026, 8, 3),
            time(10, 0),
            time(11, 0),
            "Special Edition",
        );
        // Two Mondays: only the first is overridden.
        let slots = resolve(&[m], &[ov], date(2026, 8, 2), date(2026, 8, 15)).unwrap();
        assert_eq!(slots.len(), 2);
        assert_eq!(slots[0].payload.show_name, "Special Edition");
        assert_eq!(slots[1].payload.show_name, "Morning Show");
        assert!(slots[1].is_virtual);
    }

    #[test]
    fn time_shifted_override_still_replaces_by_identity() {
        let m = master(1, 1, time(10, 0), time(11, 0), "Morning Show");
        let ov = instance(
            10,
            Some(1),
            date(2026, 8, 3),
            time(14, 0),
            time(15, 30),
            "Afternoon Special",
        );
        let slots = resolve(&[m], &[ov], week_start(), week_end()).unwrap();

        // The master occurrence must not reappear just because the times moved.
        assert_eq!(slots.len(), 1);
        assert_eq!(slots[0].start_time, time(14, 0));
        assert_eq!(slots[0].payload.show_name, "Afternoon Special");
    }

    #[test]
    fn override_survives_master_weekday_edit() {
        // Master was moved to Friday after the Monday override was written.
        let m = master(1, 5, time(10, 0), time(11, 0), "Morning Show");
        let ov = instance(
            10,
            Some(1),
            date(2026, 8, 3),
            time(10, 0),
            time(11, 0),
            "Special Edition",
        );
        let slots = resolve(&[m], &[ov], week_start(), week_end()).unwrap();

        let shows: Vec<_> = slots.iter().map(|s| s.payload.show_name.as_str()).collect();
        assert!(shows.contains(&"Special Edition"));
        // Friday projection still happens.
        assert!(shows.contains(&"Morning Show"));
        assert_eq!(slots.len(), 2);
    }

    // -----------------------------------------------------------------------
    // Deletion overrides
    // -----------------------------------------------------------------------

    #[test]
    fn deletion_override_suppresses_exactly_its_date() {
        let m = master(1, 1, time(10, 0), time(11, 0), "Morning Show");
        let del = deletion(10, 1, date(2026, 8, 3));
        // Two Mondays in range; only the first is suppressed.
        let slots = resolve(&[m], &[del], date(2026, 8, 2), date(2026, 8, 15)).unwrap();

        assert_eq!(slots.len(), 1);
        assert_eq!(slots[0].date, date(2026, 8, 10));
        assert_eq!(slots[0].payload.show_name, "Morning Show");
    }

    #[test]
    fn deletion_override_emits_nothing_for_its_master_and_date() {
        let m = master(1, 1, time(10, 0), time(11, 0), "Morning Show");
        let del = deletion(10, 1, date(2026, 8, 3));
        let slots = resolve(&[m], &[del], week_start(), week_end()).unwrap();
        assert!(slots.is_empty());
    }

    #[test]
    fn deleted_custom_slot_is_not_emitted() {
        let mut custom = instance(
            20,
            None,
            date(2026, 8, 4),
            time(20, 0),
            time(21, 0),
            "One-off",
        );
        custom.is_deleted = true;
        let slots = resolve(&[], &[custom], week_start(), week_end()).unwrap();
        assert!(slots.is_empty());
    }

    #[test]
    fn recreated_override_after_suppression_is_emitted() {
        // The occurrence was deleted, then a fresh override was written for
        // the same (master, date). The active row must win over the tombstone.
        let m = master(1, 1, time(10, 0), time(11, 0), "Morning Show");
        let del = deletion(10, 1, date(2026, 8, 3));
        let recreated = instance(
            11,
            Some(1),
            date(2026, 8, 3),
            time(12, 0),
            time(13, 0),
            "Relaunched",
        );
        let slots = resolve(&[m], &[del, recreated], week_start(), week_end()).unwrap();

        assert_eq!(slots.len(), 1);
        assert_eq!(slots[0].payload.show_name, "Relaunched");
        assert_eq!(slots[0].id, SlotId::Real(11));
    }

    // -----------------------------------------------------------------------
    // Custom slots and ordering
    // -----------------------------------------------------------------------

    #[test]
    fn standalone_custom_slot_is_emitted_as_is() {
        let custom = instance(
            20,
            None,
            date(2026, 8, 4),
            time(20, 0),
            time(21, 0),
            "One-off",
        );
        let slots = resolve(&[], &[custom], week_start(), week_end()).unwrap();

        assert_eq!(slots.len(), 1);
        assert_eq!(slots[0].id, SlotId::Real(20));
        assert_eq!(slots[0].parent_id, None);
        assert!(!slots[0].is_virtual);
    }

    #[test]
    fn day_is_sorted_by_start_time() {
        let late = master(1, 1, time(18, 0), time(19, 0), "Evening");
        let early = master(2, 1, time(7, 0), time(9, 0), "Breakfast");
        let custom = instance(
            20,
            None,
            date(2026, 8, 3),
            time(12, 0),
            time(13, 0),
            "Lunch Special",
        );
        let slots = resolve(&[late, early], &[custom], week_start(), week_end()).unwrap();

        let shows: Vec<_> = slots.iter().map(|s| s.payload.show_name.as_str()).collect();
        assert_eq!(shows, vec!["Breakfast", "Lunch Special", "Evening"]);
    }

    #[test]
    fn master_precedes_custom_on_equal_start_times() {
        let m = master(1, 1, time(10, 0), time(11, 0), "Master Show");
        let custom = instance(
            20,
            None,
            date(2026, 8, 3),
            time(10, 0),
            time(10, 30),
            "Custom Show",
        );
        let slots = resolve(&[m], &[custom], week_start(), week_end()).unwrap();

        assert_eq!(slots[0].payload.show_name, "Master Show");
        assert_eq!(slots[1].payload.show_name, "Custom Show");
    }

    #[test]
    fn dates_are_emitted_in_range_order() {
        let sun = master(1, 0, time(9, 0), time(10, 0), "Sunday Service");
        let sat = master(2, 6, time(9, 0), time(10, 0), "Saturday Sport");
        let slots = resolve(&[sun, sat], &[], week_start(), week_end()).unwrap();

        assert_eq!(slots.len(), 2);
        assert_eq!(slots[0].date, date(2026, 8, 2));
        assert_eq!(slots[1].date, date(2026, 8, 8));
    }

    // -----------------------------------------------------------------------
    // Determinism
    // -----------------------------------------------------------------------

    #[test]
    fn resolution_is_idempotent() {
        let masters = vec![
            master(1, 1, time(10, 0), time(11, 0), "Morning Show"),
            master(2, 1, time(10, 0), time(12, 0), "Shadow Show"),
            master(3, 3, time(8, 0), time(9, 0), "Midweek"),
        ];
        let overrides = vec![
            instance(
                10,
                Some(1),
                date(2026, 8, 3),
                time(10, 0),
                time(11, 0),
                "Special",
            ),
            deletion(11, 3, date(2026, 8, 5)),
            instance(
                12,
                None,
                date(2026, 8, 6),
                time(22, 0),
                time(23, 0),
                "Night Owl",
            ),
        ];

        let first = resolve(&masters, &overrides, week_start(), week_end()).unwrap();
        let second = resolve(&masters, &overrides, week_start(), week_end()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn materialized_occurrence_matches_its_virtual_counterpart() {
        let m = master(1, 1, time(10, 0), time(11, 0), "Morning Show");
        let before = resolve(&[m.clone()], &[], week_start(), week_end()).unwrap();

        // Materialization copies the master fields onto a real row.
        let materialized = instance(
            50,
            Some(1),
            date(2026, 8, 3),
            time(10, 0),
            time(11, 0),
            "Morning Show",
        );
        let after = resolve(&[m], &[materialized], week_start(), week_end()).unwrap();

        assert_eq!(before.len(), 1);
        assert_eq!(after.len(), 1);
        assert_eq!(before[0].date, after[0].date);
        assert_eq!(before[0].start_time, after[0].start_time);
        assert_eq!(before[0].end_time, after[0].end_time);
        assert_eq!(before[0].payload, after[0].payload);
        assert!(before[0].is_virtual);
        assert!(!after[0].is_virtual);
        assert_eq!(after[0].id, SlotId::Real(50));
    }

    #[test]
    fn duplicate_active_overrides_emit_once() {
        // The store's unique index should prevent this; if stale data gets
        // through anyway, only the first row may surface.
        let m = master(1, 1, time(10, 0), time(11, 0), "Morning Show");
        let first = instance(
            10,
            Some(1),
            date(2026, 8, 3),
            time(10, 0),
            time(11, 0),
            "First",
        );
        let second = instance(
            11,
            Some(1),
            date(2026, 8, 3),
            time(10, 0),
            time(11, 0),
            "Second",
        );
        let slots = resolve(&[m], &[first, second], week_start(), week_end()).unwrap();

        assert_eq!(slots.len(), 1);
        assert_eq!(slots[0].payload.show_name, "First");
    }
}
