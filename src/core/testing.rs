//! Scripted RPC client for unit tests

use std::collections::VecDeque;
use std::sync::Mutex;

use serde_json::Value;

use crate::infrastructure::rpc::{RpcClient, RpcError};

/// Replays queued responses in order and records every call
#[derive(Default)]
pub struct StubRpc {
    responses: Mutex<VecDeque<Result<Value, RpcError>>>,
    calls: Mutex<Vec<(String, Vec<Value>)>>,
}

impl StubRpc {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, response: Result<Value, RpcError>) {
        self.responses.lock().unwrap().push_back(response);
    }

    pub fn calls(&self) -> Vec<(String, Vec<Value>)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl RpcClient for StubRpc {
    async fn call(&self, method: &str, params: Vec<Value>) -> Result<Value, RpcError> {
        self.calls
            .lock()
            .unwrap()
            .push((method.to_string(), params));
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| {
                Err(RpcError::Network {
                    status: None,
                    message: "no scripted response".into(),
                })
            })
    }

    fn endpoint(&self) -> &str {
        "stub://rpc"
    }
}
