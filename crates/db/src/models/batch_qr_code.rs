//! Batch QR code definition models.

use office_core::error::CoreError;
use office_core::qr_batch::{BatchKind, BatchStatus};
use office_core::types::{RecordId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `batch_qr_codes` table.
#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct BatchQrCode {
    pub id: RecordId,
    pub app_id: String,
    pub name: String,
    pub description: String,
    pub prefix: String,
    pub count: i32,
    #[serde(rename = "type")]
    pub kind: String,
    pub url_template: String,
    pub config: serde_json::Value,
    pub status: String,
    pub created_by: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl BatchQrCode {
    /// Parsed lifecycle status.
    pub fn status(&self) -> Result<BatchStatus, CoreError> {
        BatchStatus::from_str_value(&self.status)
    }

    /// Parsed QR kind.
    pub fn kind(&self) -> Result<BatchKind, CoreError> {
        BatchKind::from_str_value(&self.kind)
    }
}

/// DTO for inserting a new batch definition.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateBatchQrCode {
    pub id: RecordId,
    pub app_id: String,
    pub name: String,
    pub description: String,
    pub prefix: String,
    pub count: i32,
    pub kind: String,
    pub url_template: String,
    pub config: serde_json::Value,
    pub status: String,
    pub created_by: String,
}

/// DTO for updating the descriptive fields of a batch definition.
///
/// `count`, `kind`, and `status` are deliberately absent.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateBatchQrCode {
    pub name: Option<String>,
    pub description: Option<String>,
    pub prefix: Option<String>,
    pub url_template: Option<String>,
    pub config: Option<serde_json::Value>,
}
