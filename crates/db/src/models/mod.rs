//! Row types and request DTOs, one module per table group.

pub mod bid;
pub mod decision;
pub mod employee;
pub mod organization;
pub mod review;
pub mod tender;

use std::str::FromStr;

use sqlx::postgres::PgRow;
use sqlx::Row;
use tender_core::error::CoreError;

/// Read a TEXT column and parse it into one of the core enums.
///
/// A value outside the enum surfaces as `ColumnDecode`, which only happens
/// if a CHECK constraint and its enum drift apart.
pub(crate) fn decode_text<T>(row: &PgRow, column: &str) -> Result<T, sqlx::Error>
where
    T: FromStr<Err = CoreError>,
{
    let raw: String = row.try_get(column)?;
    raw.parse().map_err(|err: CoreError| sqlx::Error::ColumnDecode {
        index: column.to_string(),
        source: Box::new(err),
    })
}
