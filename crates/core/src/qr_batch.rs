//! Batch QR code constants, kinds, statuses, and validation.
//!
//! A batch moves through `pending -> generating -> completed | failed`.
//! [`BatchStatus::transition`] is the only sanctioned way to move between
//! states; it rejects any step that would go backwards or leave a terminal
//! state.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Smallest number of QR codes a batch may request.
pub const MIN_BATCH_COUNT: i32 = 1;

/// Largest number of QR codes a batch may request.
pub const MAX_BATCH_COUNT: i32 = 10_000;

/// QR kind: content is fixed once encoded.
pub const KIND_STATIC: &str = "static";

/// QR kind: content points at a redirect that can change later.
pub const KIND_DYNAMIC: &str = "dynamic";

const VALID_KINDS: &[&str] = &[KIND_STATIC, KIND_DYNAMIC];

pub const STATUS_PENDING: &str = "pending";
pub const STATUS_GENERATING: &str = "generating";
pub const STATUS_COMPLETED: &str = "completed";
pub const STATUS_FAILED: &str = "failed";

// ---------------------------------------------------------------------------
// Kind
// ---------------------------------------------------------------------------

/// Whether generated QR codes are static or dynamic. Fixed at creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BatchKind {
    Static,
    Dynamic,
}

impl BatchKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Static => KIND_STATIC,
            Self::Dynamic => KIND_DYNAMIC,
        }
    }

    /// Parse the wire/database representation.
    pub fn from_str_value(value: &str) -> Result<Self, CoreError> {
        match value {
            KIND_STATIC => Ok(Self::Static),
            KIND_DYNAMIC => Ok(Self::Dynamic),
            other => Err(CoreError::Validation(format!(
                "Invalid QR code type '{other}'. Must be one of: {}",
                VALID_KINDS.join(", ")
            ))),
        }
    }
}

// ---------------------------------------------------------------------------
// Status state machine
// ---------------------------------------------------------------------------

/// Lifecycle status of a batch definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BatchStatus {
    Pending,
    Generating,
    Completed,
    Failed,
}

impl BatchStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => STATUS_PENDING,
            Self::Generating => STATUS_GENERATING,
            Self::Completed => STATUS_COMPLETED,
            Self::Failed => STATUS_FAILED,
        }
    }

    pub fn from_str_value(value: &str) -> Result<Self, CoreError> {
        match value {
            STATUS_PENDING => Ok(Self::Pending),
            STATUS_GENERATING => Ok(Self::Generating),
            STATUS_COMPLETED => Ok(Self::Completed),
            STATUS_FAILED => Ok(Self::Failed),
            other => Err(CoreError::Validation(format!(
                "Unknown batch status: '{other}'"
            ))),
        }
    }

    /// `completed` and `failed` admit no further transitions.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }

    /// Whether `self -> next` is a legal lifecycle step.
    pub fn can_transition_to(self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Pending, Self::Generating)
                | (Self::Generating, Self::Completed)
                | (Self::Generating, Self::Failed)
        )
    }

    /// Return `next` if the step is legal, otherwise a `Conflict`.
    pub fn transition(self, next: Self) -> Result<Self, CoreError> {
        if self.can_transition_to(next) {
            Ok(next)
        } else {
            Err(CoreError::Conflict(format!(
                "Batch cannot move from '{}' to '{}'",
                self.as_str(),
                next.as_str()
            )))
        }
    }
}

impl std::fmt::Display for BatchStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Validate the requested item count.
pub fn validate_count(count: i64) -> Result<i32, CoreError> {
    if count < i64::from(MIN_BATCH_COUNT) || count > i64::from(MAX_BATCH_COUNT) {
        return Err(CoreError::Validation(format!(
            "Invalid count, must be between {MIN_BATCH_COUNT} and {MAX_BATCH_COUNT}"
        )));
    }
    Ok(count as i32)
}

/// Reject empty or whitespace-only values for required text fields.
pub fn validate_required(field: &str, value: &str) -> Result<(), CoreError> {
    if value.trim().is_empty() {
        return Err(CoreError::Validation(format!("{field} is required")));
    }
    Ok(())
}
