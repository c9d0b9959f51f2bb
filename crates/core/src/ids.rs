//! Record identifier generation.
//!
//! IDs look like `batch_20250301120000123004571234`: a type prefix, the UTC
//! creation time down to milliseconds, a process-local sequence number and a
//! random tail. The sequence keeps IDs minted within the same millisecond
//! distinct (a 10 000 item batch is persisted in a tight loop); the random
//! tail keeps separate processes apart.

use std::sync::atomic::{AtomicU32, Ordering};

use rand::Rng;

/// Prefix for batch definition IDs.
pub const BATCH_ID_PREFIX: &str = "batch";

/// Prefix for QR code item IDs.
pub const QR_CODE_ID_PREFIX: &str = "qrcode";

static SEQUENCE: AtomicU32 = AtomicU32::new(0);

/// Generate a new batch definition ID.
pub fn generate_batch_id() -> String {
    generate_id(BATCH_ID_PREFIX)
}

/// Generate a new QR code item ID.
pub fn generate_qr_code_id() -> String {
    generate_id(QR_CODE_ID_PREFIX)
}

fn generate_id(prefix: &str) -> String {
    let timestamp = chrono::Utc::now().format("%Y%m%d%H%M%S%3f");
    let sequence = SEQUENCE.fetch_add(1, Ordering::Relaxed) % 10_000;
    let tail: u32 = rand::rng().random_range(0..10_000);
    format!("{prefix}_{timestamp}{sequence:04}{tail:04}")
}
