//! Shared query parameter types for API handlers.
//!
//! Identities arrive as `?username=` query parameters. Query structs spell
//! out every field instead of using `#[serde(flatten)]`, which does not
//! combine with numeric fields in urlencoded input.

use serde::Deserialize;
use tender_core::pagination::{clamp_limit, clamp_offset, DEFAULT_LIMIT, MAX_LIMIT};

use crate::error::{AppError, AppResult};

/// `?username=`
#[derive(Debug, Deserialize)]
pub struct UserParams {
    pub username: Option<String>,
}

/// `?username=&limit=&offset=`
#[derive(Debug, Deserialize)]
pub struct UserPageParams {
    pub username: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// `?username=&status=`
#[derive(Debug, Deserialize)]
pub struct StatusParams {
    pub username: Option<String>,
    pub status: Option<String>,
}

/// Clamp raw pagination input to `(limit, offset)`.
pub fn page(limit: Option<i64>, offset: Option<i64>) -> (i64, i64) {
    (
        clamp_limit(limit, DEFAULT_LIMIT, MAX_LIMIT),
        clamp_offset(offset),
    )
}

/// Extract a required, non-blank query parameter.
pub fn required<'a>(value: &'a Option<String>, name: &str) -> AppResult<&'a str> {
    match value.as_deref().map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(AppError::BadRequest(format!("Query parameter '{name}' is required"))),
    }
}
