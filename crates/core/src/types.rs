/// All primary keys are PostgreSQL UUIDs generated by `gen_random_uuid()`.
pub type DbId = uuid::Uuid;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Version counter stored in the `version` column of tenders and bids.
pub type Version = i32;
