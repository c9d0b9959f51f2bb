//! Batch QR code generation pipeline.
//!
//! - [`batch_service`]: batch definition create/update/delete/get/list.
//! - [`generator`]: the generation state machine that materialises a batch
//!   into persisted, rendered QR codes.
//! - [`renderer`]: QR encoding and image storage.
//! - [`qr_code_service`]: standalone QR code management.

use office_core::error::CoreError;
use office_db::StoreError;

pub mod batch_service;
pub mod generator;
pub mod qr_code_service;
pub mod renderer;

pub use batch_service::BatchQrCodeService;
pub use generator::{BatchGenerator, GenerationReport, GeneratorConfig};
pub use qr_code_service::QrCodeService;
pub use renderer::{ImageRenderer, ImageSink, LocalImageSink, QrEncoder, QrImageRenderer, RenderError};

/// Log a store failure and replace it with a sanitized internal error.
pub(crate) fn store_failure(action: &'static str) -> impl FnOnce(StoreError) -> CoreError {
    move |err| {
        tracing::error!(error = %err, action, "Record store operation failed");
        CoreError::Internal(format!("failed to {action}"))
    }
}

/// Treat an empty string from a partial update as "leave unchanged".
pub(crate) fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}
