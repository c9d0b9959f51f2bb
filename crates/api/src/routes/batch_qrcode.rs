//! Route definitions for batch QR code definitions and generation.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::batch_qrcode;
use crate::state::AppState;

/// Batch routes mounted at `/batch-qrcodes`.
///
/// ```text
/// GET    /                -> list_batches
/// POST   /                -> create_batch
/// GET    /{id}            -> get_batch
/// PUT    /{id}            -> update_batch
/// DELETE /{id}            -> delete_batch
/// POST   /{id}/generate   -> generate_batch
/// GET    /{id}/items      -> list_batch_items
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(batch_qrcode::list_batches).post(batch_qrcode::create_batch),
        )
        .route(
            "/{id}",
            get(batch_qrcode::get_batch)
                .put(batch_qrcode::update_batch)
                .delete(batch_qrcode::delete_batch),
        )
        .route("/{id}/generate", post(batch_qrcode::generate_batch))
        .route("/{id}/items", get(batch_qrcode::list_batch_items))
}
