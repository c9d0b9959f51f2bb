use axum::routing::{get, post};
use axum::Router;

use crate::handlers::qrcode;
use crate::state::AppState;

/// Standalone QR code routes mounted at `/qrcodes`.
///
/// ```text
/// GET    /                -> list_qr_codes
/// POST   /                -> create_qr_code
/// GET    /{id}            -> get_qr_code
/// PUT    /{id}            -> update_qr_code
/// DELETE /{id}            -> delete_qr_code
/// POST   /{id}/generate   -> generate_qr_code_image
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(qrcode::list_qr_codes).post(qrcode::create_qr_code))
        .route(
            "/{id}",
            get(qrcode::get_qr_code)
                .put(qrcode::update_qr_code)
                .delete(qrcode::delete_qr_code),
        )
        .route("/{id}/generate", post(qrcode::generate_qr_code_image))
}
