//! Core services - balance queries, chain status, application context

pub mod context;
mod error;
pub mod query;
pub mod status;

#[cfg(test)]
pub(crate) mod testing;

pub use context::AppContext;
pub use error::QueryError;
pub use query::{BalanceLookup, QueryService};
pub use status::{StatusPoller, StatusProbe};
