//! Deployment handles and the polling contract.
//!
//! Deploying a scene, character or common knowledge entry starts a
//! long-running operation on the service. The deploy call returns an
//! [`Operation`] with `done == false`; the caller re-checks it by name until a
//! returned handle reports `done == true`. Only `done` decides completion: the
//! `metadata` and `response` payloads are carried through uninterpreted.
//!
//! ```text
//! deploy ──► PENDING ──check_status──► PENDING ──check_status──► DONE (terminal)
//! ```

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Separator between a resource and its operations in an operation name.
const OPERATIONS_SEGMENT: &str = "/operations/";

/// Opaque payload tagged with its `@type`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TypedAny {
    /// Type URL of the payload.
    #[serde(rename = "@type", default)]
    pub type_url: String,
    /// Remaining fields, preserved as sent.
    #[serde(flatten)]
    pub fields: serde_json::Map<String, serde_json::Value>,
}

/// Handle of a deployment.
///
/// Handles are values: checking status returns a new handle, the original is
/// never updated in place.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Operation {
    /// Operation path, e.g.
    /// `workspaces/{workspace}/scenes/{scene}/operations/{operation}`.
    pub name: String,
    /// Service-defined progress metadata.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<TypedAny>,
    /// Terminal flag. Once true, the operation never changes again.
    pub done: bool,
    /// Service-defined result; usually absent until `done`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response: Option<TypedAny>,
}

/// Where a deployment is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeploymentState {
    /// Started or still running.
    Pending,
    /// Finished; no further transitions.
    Done,
}

impl Operation {
    /// Lifecycle state derived from `done`.
    pub fn state(&self) -> DeploymentState {
        if self.done {
            DeploymentState::Done
        } else {
            DeploymentState::Pending
        }
    }

    /// Whether the operation has reached its terminal state.
    pub fn is_done(&self) -> bool {
        self.done
    }

    /// Resource that triggered the operation, taken from the name.
    pub fn resource_name(&self) -> Option<&str> {
        self.name
            .rfind(OPERATIONS_SEGMENT)
            .map(|index| &self.name[..index])
    }

    /// Last segment of the operation name.
    pub fn operation_id(&self) -> Option<&str> {
        self.name
            .rfind(OPERATIONS_SEGMENT)
            .map(|index| &self.name[index + OPERATIONS_SEGMENT.len()..])
            .filter(|id| !id.is_empty())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Polling
// ─────────────────────────────────────────────────────────────────────────────

/// How [`DeploymentsApi::wait`](crate::api::DeploymentsApi::wait) polls.
///
/// The service does not publish a polling interval, so there is no default:
/// callers always pick one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollOptions {
    /// Delay between status checks.
    pub interval: Duration,
    /// Give up once this much time has passed.
    pub timeout: Option<Duration>,
    /// Give up after this many status checks.
    pub max_attempts: Option<u32>,
    /// Consecutive retryable failures to absorb before surfacing one.
    pub tolerated_errors: u32,
}

impl PollOptions {
    /// Poll every `interval` with no limits and no error tolerance.
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            timeout: None,
            max_attempts: None,
            tolerated_errors: 0,
        }
    }

    /// Stop waiting after `timeout`.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Stop waiting after `attempts` status checks.
    pub fn with_max_attempts(mut self, attempts: u32) -> Self {
        self.max_attempts = Some(attempts);
        self
    }

    /// Absorb up to `count` consecutive retryable failures.
    pub fn tolerate_errors(mut self, count: u32) -> Self {
        self.tolerated_errors = count;
        self
    }
}

/// Progress events emitted while waiting for a deployment.
#[derive(Debug, Clone)]
pub enum ProgressEvent {
    /// Polling has started.
    Started { operation: String },
    /// A status check returned.
    Polling {
        operation: String,
        attempt: u32,
        elapsed: Duration,
        state: DeploymentState,
    },
    /// A status check failed and will be repeated.
    Retrying {
        operation: String,
        attempt: u32,
        error: String,
    },
    /// The operation reached `done`.
    Completed { operation: String, attempts: u32 },
}

/// Callback type for progress updates.
pub type ProgressCallback = Box<dyn Fn(ProgressEvent) + Send + Sync>;

/// Helper to emit progress events.
pub(crate) fn emit(callback: &Option<ProgressCallback>, event: ProgressEvent) {
    if let Some(cb) = callback {
        cb(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_deploy_response_decodes_pending() {
        let op: Operation = serde_json::from_value(json!({
            "name": "workspaces/w/scenes/s1/operations/op1",
            "metadata": {"@type": "type.googleapis.com/ai.inworld.studio.v1alpha.DeploySceneMetadata"},
            "done": false
        }))
        .unwrap();

        assert_eq!(op.state(), DeploymentState::Pending);
        assert!(op.response.is_none());
        assert_eq!(
            op.metadata.as_ref().map(|m| m.type_url.as_str()),
            Some("type.googleapis.com/ai.inworld.studio.v1alpha.DeploySceneMetadata")
        );
    }

    #[test]
    fn test_opaque_payload_fields_survive() {
        let value = json!({
            "name": "workspaces/w/characters/c/operations/op2",
            "done": true,
            "response": {"@type": "type.googleapis.com/google.protobuf.Empty", "extra": {"a": 1}}
        });
        let op: Operation = serde_json::from_value(value.clone()).unwrap();

        assert!(op.is_done());
        let response = op.response.as_ref().unwrap();
        assert_eq!(response.fields["extra"], json!({"a": 1}));
        assert_eq!(serde_json::to_value(&op).unwrap(), value);
    }

    #[test]
    fn test_name_parts() {
        let op = Operation {
            name: "workspaces/w/common-knowledge/k1/operations/op3".to_string(),
            ..Default::default()
        };
        assert_eq!(op.resource_name(), Some("workspaces/w/common-knowledge/k1"));
        assert_eq!(op.operation_id(), Some("op3"));

        let bare = Operation {
            name: "something-else".to_string(),
            ..Default::default()
        };
        assert_eq!(bare.resource_name(), None);
        assert_eq!(bare.operation_id(), None);
    }

    #[test]
    fn test_poll_options_builder() {
        let options = PollOptions::new(Duration::from_secs(2))
            .with_timeout(Duration::from_secs(60))
            .with_max_attempts(10)
            .tolerate_errors(3);

        assert_eq!(options.interval, Duration::from_secs(2));
        assert_eq!(options.timeout, Some(Duration::from_secs(60)));
        assert_eq!(options.max_attempts, Some(10));
        assert_eq!(options.tolerated_errors, 3);
    }
}
