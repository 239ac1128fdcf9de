//! Employee (user) model.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use tender_core::types::{DbId, Timestamp};

/// A row from the `employee` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Employee {
    pub id: DbId,
    pub username: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new employee.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateEmployee {
    pub username: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}
