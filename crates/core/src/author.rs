//! Bid authorship: an individual employee or an organization.

use serde::{Deserialize, Serialize};

use crate::types::DbId;

define_text_enum! {
    /// Discriminant stored in the `author_type` column.
    AuthorType as "author type" {
        User,
        Organization,
    }
}

/// Who submitted a bid.
///
/// Stored as an `(author_type, author_id)` column pair and serialized the
/// same way, so `#[serde(flatten)]` on a containing struct yields
/// `"author_type": "User", "author_id": "..."`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "author_type", content = "author_id")]
pub enum BidAuthor {
    /// An employee acting on their own behalf.
    User(DbId),
    /// An organization, represented by any of its responsible employees.
    Organization(DbId),
}

impl BidAuthor {
    pub fn from_parts(author_type: AuthorType, author_id: DbId) -> Self {
        match author_type {
            AuthorType::User => BidAuthor::User(author_id),
            AuthorType::Organization => BidAuthor::Organization(author_id),
        }
    }

    pub fn author_type(&self) -> AuthorType {
        match self {
            BidAuthor::User(_) => AuthorType::User,
            BidAuthor::Organization(_) => AuthorType::Organization,
        }
    }

    pub fn author_id(&self) -> DbId {
        match self {
            BidAuthor::User(id) | BidAuthor::Organization(id) => *id,
        }
    }
}
