//! Route definitions for divisions and workers.

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::staff;
use crate::state::AppState;

/// Routes for `/divisions` and `/workers`, merged into the API root.
///
/// ```text
/// GET    /divisions                   list_divisions (TTL-cached)
/// POST   /divisions                   create_division
/// PUT    /divisions/{id}              update_division
/// DELETE /divisions/{id}              delete_division
///
/// GET    /workers                     list_workers (?division_id, ?department, ?active)
/// POST   /workers                     create_worker
/// GET    /workers/{id}                get_worker
/// PUT    /workers/{id}                update_worker
/// POST   /workers/{id}/deactivate     deactivate_worker
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/divisions",
            get(staff::list_divisions).post(staff::create_division),
        )
        .route(
            "/divisions/{id}",
            put(staff::update_division).delete(staff::delete_division),
        )
        .route(
            "/workers",
            get(staff::list_workers).post(staff::create_worker),
        )
        .route(
            "/workers/{id}",
            get(staff::get_worker).put(staff::update_worker),
        )
        .route("/workers/{id}/deactivate", post(staff::deactivate_worker))
}
