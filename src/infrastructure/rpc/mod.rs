//! JSON-RPC transport - envelopes, typed errors, HTTP client

mod client;
mod error;
pub(crate) mod types;

pub use client::{HttpRpcClient, RpcClient};
pub use error::RpcError;
