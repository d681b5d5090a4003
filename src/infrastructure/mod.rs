//! Infrastructure layer - JSON-RPC transport and the async runtime bridge

pub mod rpc;
pub mod runtime;
