//! Version counter and sparse-patch rules shared by tenders and bids.
//!
//! History is an append-only log replayed forward. A rollback never rewinds
//! the counter: it re-applies the content of an old snapshot as a fresh
//! edit, so rolling back twice to the same version yields two new versions.

use crate::error::CoreError;
use crate::types::Version;

/// Version assigned to a freshly created entity.
pub const INITIAL_VERSION: Version = 1;

/// Why a new version is being written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VersionChange {
    /// A caller-supplied patch.
    Edit,
    /// Content copied from the snapshot taken at `target_version`.
    RollbackReplay { target_version: Version },
}

impl VersionChange {
    pub fn label(self) -> &'static str {
        match self {
            VersionChange::Edit => "edit",
            VersionChange::RollbackReplay { .. } => "rollback_replay",
        }
    }

    /// Resolve one content field for the version being written.
    ///
    /// An edit follows the sparse-patch rule of [`patched`]. A rollback
    /// replays the snapshot value verbatim, blank strings included, so the
    /// new version carries exactly the target version's content.
    pub fn resolve(self, current: &str, incoming: Option<&str>) -> String {
        match self {
            VersionChange::Edit => patched(current, incoming),
            VersionChange::RollbackReplay { .. } => incoming.unwrap_or(current).to_string(),
        }
    }
}

/// The version that follows `current`.
pub fn next_version(current: Version) -> Result<Version, CoreError> {
    current
        .checked_add(1)
        .ok_or_else(|| CoreError::Internal(format!("version counter overflow at {current}")))
}

/// Resolve one field of a sparse patch.
///
/// A present, non-blank value replaces the current one. `None` or a blank
/// string keeps the current value, so a patch can never clear a field.
pub fn patched(current: &str, patch: Option<&str>) -> String {
    match patch {
        Some(value) if !value.trim().is_empty() => value.to_string(),
        _ => current.to_string(),
    }
}

/// Validate a version number taken from a request path.
pub fn validate_target_version(version: Version) -> Result<Version, CoreError> {
    if version < INITIAL_VERSION {
        return Err(CoreError::Validation(format!(
            "Version must be at least {INITIAL_VERSION}, got {version}"
        )));
    }
    Ok(version)
}
