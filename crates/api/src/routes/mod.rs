//! Route definitions.

pub mod health;
pub mod lineups;
pub mod schedule;
pub mod settings;
pub mod staff;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// ```text
/// /schedule                                resolved range (?start, ?end)
/// /schedule/week                           resolved week (?date)
/// /schedule/conflict-check                 dry-run conflict validation (POST)
/// /schedule/masters                        list, create
/// /schedule/masters/{id}                   update, delete
/// /schedule/instances                      create
/// /schedule/instances/{id}                 update, delete
/// /schedule/occurrences/materialize        materialize virtual occurrence (POST)
/// /schedule/occurrences                    suppress occurrence (DELETE, ?master_id, ?date)
///
/// /lineups/for-slot                        find-or-create for occurrence (POST)
/// /lineups/{id}                            get, update
/// /lineups/{id}/items                      append item (POST)
/// /lineups/{id}/items/reorder              reorder items (PUT)
/// /lineups/{id}/items/{item_id}            update, remove
///
/// /divisions                               list (cached), create
/// /divisions/{id}                          update, delete
/// /workers                                 list (?division_id, ?department, ?active), create
/// /workers/{id}                            get, update
/// /workers/{id}/deactivate                 deactivate (POST)
///
/// /settings                                get, update station settings
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/schedule", schedule::router())
        .nest("/lineups", lineups::router())
        .merge(staff::router())
        .nest("/settings", settings::router())
}
