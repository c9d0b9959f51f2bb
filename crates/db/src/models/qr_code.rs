//! QR code item models.

use office_core::types::{RecordId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `qr_codes` table.
///
/// `batch_id` / `batch_index` are set for items produced by batch
/// generation and `None` for standalone QR codes. They are informational
/// only; no foreign key ties an item to its batch.
#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct QrCode {
    pub id: RecordId,
    pub app_id: String,
    pub name: String,
    pub content: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub url: String,
    pub image_path: String,
    pub batch_id: Option<RecordId>,
    pub batch_index: Option<i32>,
    pub created_by: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl QrCode {
    /// Whether an image has been rendered and recorded for this item.
    pub fn has_image(&self) -> bool {
        !self.image_path.is_empty()
    }
}

/// DTO for inserting a new QR code.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateQrCode {
    pub id: RecordId,
    pub app_id: String,
    pub name: String,
    pub content: String,
    pub kind: String,
    pub url: String,
    pub batch_id: Option<RecordId>,
    pub batch_index: Option<i32>,
    pub created_by: String,
}

/// DTO for updating a QR code.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateQrCode {
    pub name: Option<String>,
    pub content: Option<String>,
    pub url: Option<String>,
}
