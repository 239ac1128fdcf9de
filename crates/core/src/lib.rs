//! Domain rules for the tender service.
//!
//! Everything in this crate is pure: no database, no HTTP. The `db` crate
//! applies these rules inside transactions and the `api` crate maps
//! [`error::CoreError`] onto HTTP responses.

#[macro_use]
mod text_enum;

pub mod access;
pub mod author;
pub mod error;
pub mod pagination;
pub mod quorum;
pub mod status;
pub mod types;
pub mod versioning;
