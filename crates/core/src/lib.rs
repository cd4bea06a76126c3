//! Pure domain logic for the station schedule backend.
//!
//! This crate has zero internal deps and performs no I/O so it can be used
//! by the repository layer, the API, and any future CLI tooling. The heart
//! of it is the schedule resolver: projecting recurring master slots onto
//! concrete calendar dates and merging in per-date overrides.

pub mod cache;
pub mod error;
pub mod schedule;
pub mod staff;
pub mod types;
