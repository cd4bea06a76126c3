//! Route definitions for lineups.

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::lineups;
use crate::state::AppState;

/// Routes mounted at `/lineups`.
///
/// ```text
/// POST   /for-slot                    for_slot (materializes virtual ids)
/// GET    /{id}                        get_by_id
/// PUT    /{id}                        update
/// POST   /{id}/items                  add_item
/// PUT    /{id}/items/reorder          reorder_items
/// PUT    /{id}/items/{item_id}        update_item
/// DELETE /{id}/items/{item_id}        remove_item
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/for-slot", post(lineups::for_slot))
        .route("/{id}", get(lineups::get_by_id).put(lineups::update))
        .route("/{id}/items", post(lineups::add_item))
        .route("/{id}/items/reorder", put(lineups::reorder_items))
        .route(
            "/{id}/items/{item_id}",
            put(lineups::update_item).delete(lineups::remove_item),
        )
}
