//! Schedule domain: slot entities, master/override resolution, and
//! time-window conflict detection.

pub mod conflict;
pub mod resolver;
pub mod slot;

pub use conflict::{check_conflict, find_conflict, windows_overlap, CandidateWindow};
pub use resolver::resolve;
pub use slot::{
    day_of_week, validate_day_of_week, validate_time_window, week_bounds, InstanceSlot,
    MasterSlot, ResolvedSlot, SlotId, SlotPayload,
};
