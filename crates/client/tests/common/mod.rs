//! Shared helpers for client integration tests.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::Notify;
use twin_client::config::ClientConfig;
use twin_client::orchestrator::Orchestrator;
use twin_client::transport::{ReconstructionTransport, TransportError};
use twin_core::intake::PhotoFile;
use twin_core::preset::Preset;
use twin_core::roles::Role;

pub const ENDPOINT: &str = "https://api.runpod.ai/v2/test-endpoint/runsync";
pub const TOKEN: &str = "secret-token";

/// One call as seen by the transport.
#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub endpoint: String,
    pub bearer: Option<String>,
    pub body: Value,
}

/// Transport that records calls and answers from a queue of replies.
///
/// With a gate set, each call waits for the gate to be notified before
/// answering, which keeps the workflow in `Busy`.
#[derive(Default)]
pub struct ScriptedTransport {
    replies: Mutex<VecDeque<Result<Value, TransportError>>>,
    calls: Mutex<Vec<RecordedCall>>,
    gate: Option<Arc<Notify>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reply(self, value: Value) -> Self {
        self.replies.lock().unwrap().push_back(Ok(value));
        self
    }

    pub fn fail(self, error: TransportError) -> Self {
        self.replies.lock().unwrap().push_back(Err(error));
        self
    }

    pub fn gated(mut self, gate: Arc<Notify>) -> Self {
        self.gate = Some(gate);
        self
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ReconstructionTransport for ScriptedTransport {
    async fn post(
        &self,
        endpoint: &str,
        bearer: Option<&str>,
        body: &Value,
    ) -> Result<Value, TransportError> {
        self.calls.lock().unwrap().push(RecordedCall {
            endpoint: endpoint.to_string(),
            bearer: bearer.map(str::to_string),
            body: body.clone(),
        });

        if let Some(gate) = &self.gate {
            gate.notified().await;
        }

        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(serde_json::json!({})))
    }
}

pub fn config() -> ClientConfig {
    ClientConfig {
        endpoint: Some(ENDPOINT.to_string()),
        api_token: Some(TOKEN.to_string()),
        ..Default::default()
    }
}

pub fn orchestrator(
    config: ClientConfig,
    transport: &Arc<ScriptedTransport>,
    preset: Preset,
) -> Orchestrator {
    Orchestrator::new(config, transport.clone(), preset)
}

pub fn jpeg(name: &str, bytes: &[u8]) -> PhotoFile {
    PhotoFile::from_bytes(name, "image/jpeg", bytes.to_vec())
}

/// Upload front, side and back photos whose content is the role name.
pub async fn fill_required(orchestrator: &Orchestrator) {
    for role in [Role::Front, Role::Side, Role::Back] {
        orchestrator
            .submit_photo(role, jpeg(&format!("{role}.jpg"), role.as_str().as_bytes()))
            .await
            .unwrap();
    }
}

pub fn ok_report() -> Value {
    serde_json::json!({
        "ok": true,
        "role_report": {
            "front": {"status": "ok"},
            "side": {"status": "ok"},
            "back": {"status": "ok"}
        },
        "retake_tips": []
    })
}
