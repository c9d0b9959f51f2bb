pub mod batch_qrcode;
pub mod health;
pub mod qrcode;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// ```text
/// /batch-qrcodes                  list, create
/// /batch-qrcodes/{id}             get, update, delete
/// /batch-qrcodes/{id}/generate    generate items (POST)
/// /batch-qrcodes/{id}/items       generated items in index order
///
/// /qrcodes                        list, create
/// /qrcodes/{id}                   get, update, delete
/// /qrcodes/{id}/generate          re-render image (POST)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/batch-qrcodes", batch_qrcode::router())
        .nest("/qrcodes", qrcode::router())
}
