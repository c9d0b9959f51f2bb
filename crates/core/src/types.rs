/// Record keys are opaque prefixed strings (`batch_...`, `qrcode_...`).
pub type RecordId = String;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;
