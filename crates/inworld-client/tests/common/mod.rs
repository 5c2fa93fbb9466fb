//! Shared helpers for integration tests.

#![allow(dead_code)]

use inworld_client::InworldClient;
use serde_json::{Value, json};
use wiremock::MockServer;

pub const STUDIO_KEY: &str = "c3R1ZGlvLWtleQ==";
pub const SIMPLE_KEY: &str = "c2ltcGxlLWtleQ==";

/// Client with both credentials pointed at `server`.
pub fn client(server: &MockServer) -> InworldClient {
    InworldClient::builder()
        .base_url(server.uri())
        .studio_api_key(STUDIO_KEY)
        .simple_api_key(SIMPLE_KEY)
        .build()
        .expect("client builds")
}

/// Operation body as returned by deploy and status checks.
pub fn operation(name: &str, done: bool) -> Value {
    let mut body = json!({
        "name": name,
        "metadata": {"@type": "type.googleapis.com/ai.inworld.studio.v1alpha.DeployMetadata"},
        "done": done,
    });
    if done {
        body["response"] = json!({"@type": "type.googleapis.com/google.protobuf.Empty"});
    }
    body
}

/// Error envelope body.
pub fn envelope(code: i32, message: &str) -> Value {
    json!({"code": code, "message": message, "details": []})
}
