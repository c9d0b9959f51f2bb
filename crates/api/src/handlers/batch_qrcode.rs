//! Handlers for batch QR code definitions and generation.

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use office_pipeline::batch_service::{CreateBatchQrCodeRequest, UpdateBatchQrCodeRequest};

use crate::error::{AppError, AppResult};
use crate::query::ListParams;
use crate::response::DataResponse;
use crate::state::AppState;

/// POST /api/v1/batch-qrcodes
///
/// Create a batch definition in `pending` status.
pub async fn create_batch(
    State(state): State<AppState>,
    Json(input): Json<CreateBatchQrCodeRequest>,
) -> AppResult<impl IntoResponse> {
    let batch = state.batch_qr_codes.create(input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: batch })))
}

/// GET /api/v1/batch-qrcodes?app_id=&page=&size=
pub async fn list_batches(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> AppResult<impl IntoResponse> {
    let app_id = params.require_app_id()?;
    let page = state
        .batch_qr_codes
        .list(app_id, params.page, params.size)
        .await?;

    Ok(Json(DataResponse { data: page }))
}

/// GET /api/v1/batch-qrcodes/{id}
pub async fn get_batch(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<impl IntoResponse> {
    let batch = state.batch_qr_codes.get(&id).await?;
    Ok(Json(DataResponse { data: batch }))
}

/// PUT /api/v1/batch-qrcodes/{id}
///
/// Only descriptive fields are updatable; `count`, `type`, and `status`
/// in the body are ignored.
pub async fn update_batch(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<UpdateBatchQrCodeRequest>,
) -> AppResult<impl IntoResponse> {
    let batch = state.batch_qr_codes.update(&id, input).await?;

    tracing::info!(batch_id = %id, "Batch QR code updated");

    Ok(Json(DataResponse { data: batch }))
}

/// DELETE /api/v1/batch-qrcodes/{id}
///
/// Items already generated for the batch are kept.
pub async fn delete_batch(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<impl IntoResponse> {
    state.batch_qr_codes.delete(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/batch-qrcodes/{id}/generate
///
/// Returns the generated items in index order. Items whose image could not
/// be rendered are included with an empty `image_path`.
///
/// The run happens on its own task: once claimed, a batch is carried to a
/// terminal status even if the request times out or the client goes away.
pub async fn generate_batch(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<impl IntoResponse> {
    let generator = Arc::clone(&state.generator);
    let batch_id = id.clone();
    let report = tokio::spawn(async move { generator.generate(&batch_id).await })
        .await
        .map_err(|e| AppError::InternalError(format!("batch generation task failed: {e}")))??;

    if !report.status_write_failures.is_empty() {
        tracing::warn!(
            batch_id = %id,
            failures = report.status_write_failures.len(),
            "Batch generated but final status was not recorded"
        );
    }

    Ok(Json(DataResponse { data: report.items }))
}

/// GET /api/v1/batch-qrcodes/{id}/items
pub async fn list_batch_items(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<impl IntoResponse> {
    let items = state.batch_qr_codes.items(&id).await?;
    Ok(Json(DataResponse { data: items }))
}
