//! Shared query parameter types for API handlers.

use serde::Deserialize;

use crate::error::AppError;

/// Paging parameters for application-scoped list endpoints
/// (`?app_id=&page=&size=`).
///
/// `page` and `size` are normalized in the service layer; out-of-range
/// values fall back to defaults rather than failing the request.
#[derive(Debug, Deserialize)]
pub struct ListParams {
    pub app_id: Option<String>,
    pub page: Option<i64>,
    pub size: Option<i64>,
}

impl ListParams {
    /// The `app_id` filter, rejecting a missing or blank value.
    pub fn require_app_id(&self) -> Result<&str, AppError> {
        match self.app_id.as_deref().map(str::trim) {
            Some(app_id) if !app_id.is_empty() => Ok(app_id),
            _ => Err(AppError::BadRequest("app_id is required".to_string())),
        }
    }
}
