//! Route definitions for the schedule.

use axum::routing::{delete, get, post, put};
use axum::Router;

use crate::handlers::schedule;
use crate::state::AppState;

/// Routes mounted at `/schedule`.
///
/// ```text
/// GET    /                            get_range (?start, ?end)
/// GET    /week                        get_week (?date)
/// POST   /conflict-check              conflict_check
/// GET    /masters                     list_masters
/// POST   /masters                     create_master
/// PUT    /masters/{id}                update_master
/// DELETE /masters/{id}                delete_master
/// POST   /instances                   create_instance
/// PUT    /instances/{id}              update_instance
/// DELETE /instances/{id}              delete_instance
/// POST   /occurrences/materialize     materialize_occurrence
/// DELETE /occurrences                 suppress_occurrence (?master_id, ?date)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(schedule::get_range))
        .route("/week", get(schedule::get_week))
        .route("/conflict-check", post(schedule::conflict_check))
        .route(
            "/masters",
            get(schedule::list_masters).post(schedule::create_master),
        )
        .route(
            "/masters/{id}",
            put(schedule::update_master).delete(schedule::delete_master),
        )
        .route("/instances", post(schedule::create_instance))
        .route(
            "/instances/{id}",
            put(schedule::update_instance).delete(schedule::delete_instance),
        )
        .route(
            "/occurrences/materialize",
            post(schedule::materialize_occurrence),
        )
        .route("/occurrences", delete(schedule::suppress_occurrence))
}
