//! JSON-RPC 2.0 envelopes

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::RpcError;

/// Every request goes out with this id; one call per HTTP exchange.
pub const REQUEST_ID: u64 = 1;

#[derive(Debug, Clone, Serialize)]
pub struct RpcRequest<'a> {
    pub jsonrpc: &'static str,
    pub method: &'a str,
    pub params: Vec<Value>,
    pub id: u64,
}

impl<'a> RpcRequest<'a> {
    pub fn new(method: &'a str, params: Vec<Value>) -> Self {
        Self {
            jsonrpc: "2.0",
            method,
            params,
            id: REQUEST_ID,
        }
    }
}

/// Server-supplied `error` member
#[derive(Debug, Clone, Deserialize)]
struct RpcErrorObject {
    #[serde(default)]
    code: Option<i64>,
    #[serde(default)]
    message: Option<String>,
}

/// Split a decoded response body into its `result` or a typed error.
///
/// Responses are read as a loose JSON object and checked member by member,
/// so nodes that add fields or send `"error": null` next to a result still work.
pub fn into_result(body: Value) -> Result<Value, RpcError> {
    let mut object: Map<String, Value> = match body {
        Value::Object(object) => object,
        other => {
            return Err(RpcError::protocol(format!(
                "expected a JSON-RPC response object, got {}",
                type_name(&other)
            )))
        }
    };

    match object.remove("error") {
        None | Some(Value::Null) => {}
        Some(error) => return Err(error_from_value(error)),
    }

    object
        .remove("result")
        .ok_or_else(|| RpcError::protocol("response has neither result nor error"))
}

fn error_from_value(value: Value) -> RpcError {
    match serde_json::from_value::<RpcErrorObject>(value.clone()) {
        Ok(RpcErrorObject { code, message }) => RpcError::Protocol {
            code,
            message: message.unwrap_or_else(|| "unknown error".to_string()),
        },
        // e.g. `"error": "rate limited"`
        Err(_) => RpcError::Protocol {
            code: None,
            message: value
                .as_str()
                .map(str::to_string)
                .unwrap_or_else(|| value.to_string()),
        },
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_envelope() {
        let request = RpcRequest::new("eth_getBalance", vec![json!("0xabc"), json!("latest")]);
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({
                "jsonrpc": "2.0",
                "method": "eth_getBalance",
                "params": ["0xabc", "latest"],
                "id": 1
            })
        );
    }

    #[test]
    fn test_result_returned_verbatim() {
        let body = json!({"jsonrpc": "2.0", "id": 1, "result": {"nested": [1, 2]}});
        assert_eq!(into_result(body).unwrap(), json!({"nested": [1, 2]}));

        let body = json!({"jsonrpc": "2.0", "id": 1, "result": null});
        assert_eq!(into_result(body).unwrap(), Value::Null);
    }

    #[test]
    fn test_error_member() {
        let body = json!({"error": {"message": "rate limited"}});
        assert_eq!(
            into_result(body).unwrap_err(),
            RpcError::Protocol {
                code: None,
                message: "rate limited".into()
            }
        );

        let body = json!({"error": {"code": -32000, "message": "header not found"}});
        assert_eq!(
            into_result(body).unwrap_err(),
            RpcError::Protocol {
                code: Some(-32000),
                message: "header not found".into()
            }
        );

        let body = json!({"error": "boom"});
        assert_eq!(into_result(body).unwrap_err().message(), "boom");
    }

    #[test]
    fn test_null_error_is_ignored() {
        let body = json!({"result": "0x1", "error": null});
        assert_eq!(into_result(body).unwrap(), json!("0x1"));
    }

    #[test]
    fn test_malformed_shapes() {
        assert!(into_result(json!([1, 2])).is_err());
        assert!(into_result(json!({"jsonrpc": "2.0", "id": 1})).is_err());
    }
}
