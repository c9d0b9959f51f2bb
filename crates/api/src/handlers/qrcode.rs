//! Handlers for standalone QR codes.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use office_pipeline::qr_code_service::{CreateQrCodeRequest, UpdateQrCodeRequest};

use crate::error::AppResult;
use crate::query::ListParams;
use crate::response::{DataResponse, ImagePathResponse};
use crate::state::AppState;

/// POST /api/v1/qrcodes
///
/// The image is rendered best-effort; a render failure still returns 201
/// with an empty `image_path`.
pub async fn create_qr_code(
    State(state): State<AppState>,
    Json(input): Json<CreateQrCodeRequest>,
) -> AppResult<impl IntoResponse> {
    let qr_code = state.qr_codes.create(input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: qr_code })))
}

/// GET /api/v1/qrcodes?app_id=&page=&size=
pub async fn list_qr_codes(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> AppResult<impl IntoResponse> {
    let app_id = params.require_app_id()?;
    let page = state.qr_codes.list(app_id, params.page, params.size).await?;
    Ok(Json(DataResponse { data: page }))
}

/// GET /api/v1/qrcodes/{id}
pub async fn get_qr_code(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<impl IntoResponse> {
    let qr_code = state.qr_codes.get(&id).await?;
    Ok(Json(DataResponse { data: qr_code }))
}

/// PUT /api/v1/qrcodes/{id}
pub async fn update_qr_code(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<UpdateQrCodeRequest>,
) -> AppResult<impl IntoResponse> {
    let qr_code = state.qr_codes.update(&id, input).await?;

    tracing::info!(qr_code_id = %id, "QR code updated");

    Ok(Json(DataResponse { data: qr_code }))
}

/// DELETE /api/v1/qrcodes/{id}
pub async fn delete_qr_code(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<impl IntoResponse> {
    state.qr_codes.delete(&id).await?;

    tracing::info!(qr_code_id = %id, "QR code deleted");

    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/qrcodes/{id}/generate
///
/// Re-render the image, e.g. for a batch item whose render failed.
pub async fn generate_qr_code_image(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<impl IntoResponse> {
    let image_path = state.qr_codes.generate_image(&id).await?;
    Ok(Json(DataResponse {
        data: ImagePathResponse { image_path },
    }))
}
