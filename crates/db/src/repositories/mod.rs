//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods that
//! accept `&PgPool` (or any `PgExecutor`) as the first argument.

pub mod access_repo;
pub mod bid_repo;
pub mod decision_repo;
pub mod employee_repo;
pub mod identity_repo;
pub mod organization_repo;
pub mod review_repo;
pub mod tender_repo;

pub use access_repo::AccessRepo;
pub use bid_repo::BidRepo;
pub use decision_repo::DecisionRepo;
pub use employee_repo::EmployeeRepo;
pub use identity_repo::IdentityRepo;
pub use organization_repo::OrganizationRepo;
pub use review_repo::ReviewRepo;
pub use tender_repo::TenderRepo;
