use thiserror::Error;

use crate::domain::QuantityError;

/// Failure of a single JSON-RPC exchange
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RpcError {
    /// Transport failure: connect/timeout, or a non-2xx HTTP status
    #[error("network error{}: {message}", http_status_suffix(.status))]
    Network { status: Option<u16>, message: String },

    /// The node answered, but with an `error` member or an unusable payload
    #[error("rpc error: {message}")]
    Protocol { code: Option<i64>, message: String },
}

impl RpcError {
    pub fn protocol(message: impl Into<String>) -> Self {
        RpcError::Protocol {
            code: None,
            message: message.into(),
        }
    }

    pub(crate) fn from_transport(err: reqwest::Error) -> Self {
        let message = if err.is_timeout() {
            "request timed out".to_string()
        } else if err.is_connect() {
            format!("connection failed: {}", err)
        } else {
            err.to_string()
        };
        RpcError::Network {
            status: err.status().map(|s| s.as_u16()),
            message,
        }
    }

    pub fn is_network(&self) -> bool {
        matches!(self, RpcError::Network { .. })
    }

    /// Message without the category prefix, for notifications
    pub fn message(&self) -> &str {
        match self {
            RpcError::Network { message, .. } | RpcError::Protocol { message, .. } => message,
        }
    }
}

impl From<QuantityError> for RpcError {
    fn from(err: QuantityError) -> Self {
        RpcError::protocol(format!("unparseable result: {}", err))
    }
}

fn http_status_suffix(status: &Option<u16>) -> String {
    status.map(|s| format!(" (HTTP {})", s)).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let err = RpcError::Network {
            status: Some(500),
            message: "HTTP 500 Internal Server Error".into(),
        };
        assert_eq!(
            err.to_string(),
            "network error (HTTP 500): HTTP 500 Internal Server Error"
        );

        let err = RpcError::protocol("rate limited");
        assert_eq!(err.to_string(), "rpc error: rate limited");
        assert_eq!(err.message(), "rate limited");
    }

    #[test]
    fn test_quantity_error_is_protocol() {
        let err: RpcError = QuantityError::Empty.into();
        assert!(!err.is_network());
        assert!(err.message().contains("empty hex quantity"));
    }
}
