//! Error type returned by repository operations.

use tender_core::error::CoreError;

/// Either a domain outcome (not found, forbidden, conflict, ...) or a
/// storage failure annotated with the operation that hit it.
#[derive(Debug, thiserror::Error)]
pub enum RepoError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("{op}: {source}")]
    Storage {
        op: &'static str,
        #[source]
        source: sqlx::Error,
    },
}

pub type RepoResult<T> = Result<T, RepoError>;

/// Attach an operation name to a raw sqlx result.
pub(crate) trait StorageContext<T> {
    fn op(self, op: &'static str) -> RepoResult<T>;
}

impl<T> StorageContext<T> for Result<T, sqlx::Error> {
    fn op(self, op: &'static str) -> RepoResult<T> {
        self.map_err(|source| RepoError::Storage { op, source })
    }
}

/// Whether `err` is a PostgreSQL unique violation (23505) on `constraint`.
pub(crate) fn is_unique_violation(err: &sqlx::Error, constraint: &str) -> bool {
    match err {
        sqlx::Error::Database(db_err) => {
            db_err.code().as_deref() == Some("23505") && db_err.constraint() == Some(constraint)
        }
        _ => false,
    }
}
