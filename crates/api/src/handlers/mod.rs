//! Request handlers, one module per resource.
//!
//! Handlers resolve the caller's identity, ask `AccessRepo` for a decision,
//! then call into the version store or decision engine.

pub mod bid;
pub mod tender;
