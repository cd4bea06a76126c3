//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument.

pub mod lineup_repo;
pub mod settings_repo;
pub mod slot_repo;
pub mod staff_repo;

pub use lineup_repo::LineupRepo;
pub use settings_repo::SettingsRepo;
pub use slot_repo::SlotRepo;
pub use staff_repo::{DivisionRepo, WorkerRepo};
