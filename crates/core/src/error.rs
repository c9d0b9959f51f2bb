#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: String },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    /// Item persistence aborted a generation run. The underlying cause is
    /// logged where it happened.
    #[error("Failed to generate batch QR codes for batch {batch_id}")]
    GenerationFailed { batch_id: String },

    #[error("Internal error: {0}")]
    Internal(String),
}
