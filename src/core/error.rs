use thiserror::Error;

use crate::infrastructure::rpc::RpcError;

/// Why a balance query produced no result
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    /// Rejected before any network call
    #[error("invalid address {input:?}: expected 0x followed by 40 hex digits")]
    Validation { input: String },

    #[error("network error{}: {message}", http_status_suffix(.status))]
    Network { status: Option<u16>, message: String },

    #[error("rpc error: {message}")]
    Protocol { code: Option<i64>, message: String },
}

impl QueryError {
    pub fn is_validation(&self) -> bool {
        matches!(self, QueryError::Validation { .. })
    }
}

impl From<RpcError> for QueryError {
    fn from(err: RpcError) -> Self {
        match err {
            RpcError::Network { status, message } => QueryError::Network { status, message },
            RpcError::Protocol { code, message } => QueryError::Protocol { code, message },
        }
    }
}

fn http_status_suffix(status: &Option<u16>) -> String {
    status.map(|s| format!(" (HTTP {})", s)).unwrap_or_default()
}
