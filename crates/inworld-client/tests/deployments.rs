//! Integration tests for deployments and the polling loop.

mod common;

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use inworld_client::transport::{HttpRequest, HttpResponse, HttpTransport, ResponseBody};
use inworld_client::{
    CallContext, DeploymentState, Error, InworldClient, PollOptions, ProgressCallback,
    ProgressEvent,
};
use reqwest::StatusCode;
use tokio_util::sync::CancellationToken;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use common::{STUDIO_KEY, client, envelope, operation};

const SCENE: &str = "workspaces/w/scenes/s1";
const OPERATION: &str = "workspaces/w/scenes/s1/operations/op1";
const OPERATION_PATH: &str = "/studio/v1/workspaces/w/scenes/s1/operations/op1";

/// Mount a status endpoint answering `pending` times with `done=false`, then `done=true`.
async fn mount_status(server: &MockServer, pending: u64) {
    if pending > 0 {
        Mock::given(method("GET"))
            .and(path(OPERATION_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(operation(OPERATION, false)))
            .up_to_n_times(pending)
            .with_priority(1)
            .mount(server)
            .await;
    }
    Mock::given(method("GET"))
        .and(path(OPERATION_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(operation(OPERATION, true)))
        .mount(server)
        .await;
}

fn recorder() -> (ProgressCallback, Arc<Mutex<Vec<ProgressEvent>>>) {
    let events = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&events);
    let callback: ProgressCallback = Box::new(move |event| sink.lock().unwrap().push(event));
    (callback, events)
}

fn fast() -> PollOptions {
    PollOptions::new(Duration::from_millis(10))
}

/// Answers every request in memory with a deployment that never finishes.
struct PendingTransport {
    polls: Arc<AtomicUsize>,
}

struct StaticBody(Bytes);

#[async_trait]
impl HttpTransport for PendingTransport {
    async fn send(&self, _request: HttpRequest) -> inworld_client::Result<HttpResponse> {
        self.polls.fetch_add(1, Ordering::SeqCst);
        let body = serde_json::to_vec(&operation(OPERATION, false)).unwrap();
        Ok(HttpResponse {
            status: StatusCode::OK,
            body: Box::new(StaticBody(Bytes::from(body))),
        })
    }
}

#[async_trait]
impl ResponseBody for StaticBody {
    async fn read_to_end(&mut self) -> inworld_client::Result<Bytes> {
        Ok(self.0.clone())
    }

    async fn release(self: Box<Self>) -> inworld_client::Result<()> {
        Ok(())
    }
}

fn pending_client() -> (InworldClient, Arc<AtomicUsize>) {
    let polls = Arc::new(AtomicUsize::new(0));
    let client = InworldClient::builder()
        .studio_api_key(STUDIO_KEY)
        .transport(Arc::new(PendingTransport {
            polls: Arc::clone(&polls),
        }))
        .build()
        .unwrap();
    (client, polls)
}

// ============================================================================
// Raw deploy / check_status
// ============================================================================

#[tokio::test]
async fn test_deploy_then_poll_until_done() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/studio/v1/workspaces/w/scenes/s1:deploy"))
        .respond_with(ResponseTemplate::new(200).set_body_json(operation(OPERATION, false)))
        .expect(1)
        .mount(&server)
        .await;
    mount_status(&server, 2).await;

    let client = client(&server);
    let handle = client.scenes().deploy(SCENE).await.unwrap();
    assert!(!handle.done);
    assert_eq!(handle.name, OPERATION);
    assert_eq!(handle.resource_name(), Some(SCENE));

    let deployments = client.deployments();
    let first = deployments.check_status(&handle.name).await.unwrap();
    assert_eq!(first.state(), DeploymentState::Pending);
    assert!(first.response.is_none());

    let second = deployments.check_status(&handle.name).await.unwrap();
    assert_eq!(second.state(), DeploymentState::Pending);

    let third = deployments.check_status(&handle.name).await.unwrap();
    assert!(third.done);
    assert!(third.response.is_some());

    // Terminal stability
    let again = deployments.check_status(&handle.name).await.unwrap();
    assert!(again.done);

    // Handles are values: the original is untouched.
    assert!(!handle.done);
}

#[tokio::test]
async fn test_deploy_sends_no_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/studio/v1/workspaces/w/characters/c:deploy"))
        .respond_with(ResponseTemplate::new(200).set_body_json(operation(
            "workspaces/w/characters/c/operations/op9",
            false,
        )))
        .expect(1)
        .mount(&server)
        .await;

    let handle = client(&server)
        .characters()
        .deploy("workspaces/w/characters/c")
        .await
        .unwrap();
    assert_eq!(handle.operation_id(), Some("op9"));

    let requests = server.received_requests().await.unwrap();
    assert!(requests[0].body.is_empty());
    assert!(requests[0].headers.get("content-type").is_none());
}

#[tokio::test]
async fn test_deploy_keeps_reserved_characters_in_path() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/studio/v1/workspaces/w/scenes/s1%23v2:deploy"))
        .respond_with(ResponseTemplate::new(200).set_body_json(operation(OPERATION, false)))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/studio/v1/workspaces/w/scenes/s1%3Fv2:deploy"))
        .respond_with(ResponseTemplate::new(200).set_body_json(operation(OPERATION, false)))
        .expect(1)
        .mount(&server)
        .await;

    let scenes = client(&server).scenes();
    scenes.deploy("workspaces/w/scenes/s1#v2").await.unwrap();
    scenes.deploy("workspaces/w/scenes/s1?v2").await.unwrap();

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 2);
    assert!(requests.iter().all(|request| request.url.query().is_none()));
}

#[tokio::test]
async fn test_empty_identifiers_send_nothing() {
    let server = MockServer::start().await;
    Mock::given(wiremock::matchers::any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let client = client(&server);
    let deployments = client.deployments();

    assert!(matches!(
        deployments.deploy("").await.unwrap_err(),
        Error::MissingField { .. }
    ));
    assert!(matches!(
        deployments.check_status("").await.unwrap_err(),
        Error::MissingField { .. }
    ));
    assert!(matches!(
        deployments.wait("", &fast(), None).await.unwrap_err(),
        Error::MissingField { .. }
    ));
    assert!(client.scenes().deploy("").await.is_err());
    assert!(client.characters().deploy("").await.is_err());
    assert!(client.common_knowledge().deploy("").await.is_err());
}

// ============================================================================
// wait / deploy_and_wait
// ============================================================================

#[tokio::test]
async fn test_wait_emits_progress_until_done() {
    let server = MockServer::start().await;
    mount_status(&server, 2).await;

    let (callback, events) = recorder();
    let done = client(&server)
        .deployments()
        .wait(OPERATION, &fast(), Some(callback))
        .await
        .unwrap();
    assert!(done.is_done());

    let events = events.lock().unwrap();
    assert!(matches!(events.first(), Some(ProgressEvent::Started { .. })));
    let polls: Vec<_> = events
        .iter()
        .filter_map(|event| match event {
            ProgressEvent::Polling { attempt, state, .. } => Some((*attempt, *state)),
            _ => None,
        })
        .collect();
    assert_eq!(
        polls,
        vec![
            (1, DeploymentState::Pending),
            (2, DeploymentState::Pending),
            (3, DeploymentState::Done),
        ]
    );
    assert!(matches!(
        events.last(),
        Some(ProgressEvent::Completed { attempts: 3, .. })
    ));
}

#[tokio::test]
async fn test_wait_gives_up_after_max_attempts() {
    let server = MockServer::start().await;
    mount_status(&server, 100).await;

    let err = client(&server)
        .deployments()
        .wait(OPERATION, &fast().with_max_attempts(3), None)
        .await
        .unwrap_err();

    match err {
        Error::PollAttemptsExhausted { operation, attempts } => {
            assert_eq!(operation, OPERATION);
            assert_eq!(attempts, 3);
        }
        other => panic!("expected PollAttemptsExhausted, got {other:?}"),
    }
    assert_eq!(server.received_requests().await.unwrap().len(), 3);
}

#[tokio::test]
async fn test_wait_times_out() {
    let server = MockServer::start().await;
    mount_status(&server, 1000).await;

    let options = PollOptions::new(Duration::from_millis(20)).with_timeout(Duration::from_millis(100));
    let err = client(&server)
        .deployments()
        .wait(OPERATION, &options, None)
        .await
        .unwrap_err();

    match err {
        Error::PollTimeout { waited, .. } => assert!(waited >= Duration::from_millis(100)),
        other => panic!("expected PollTimeout, got {other:?}"),
    }
}

#[tokio::test(start_paused = true)]
async fn test_wait_timeout_cuts_long_interval_short() {
    let (client, polls) = pending_client();
    let options = PollOptions::new(Duration::from_secs(3)).with_timeout(Duration::from_millis(200));

    let started = tokio::time::Instant::now();
    let err = client
        .deployments()
        .wait(OPERATION, &options, None)
        .await
        .unwrap_err();
    let elapsed = started.elapsed();

    match err {
        Error::PollTimeout { waited, .. } => {
            assert!(waited >= Duration::from_millis(200));
            assert!(waited < Duration::from_millis(250));
        }
        other => panic!("expected PollTimeout, got {other:?}"),
    }
    assert!(elapsed < Duration::from_millis(250));
    assert_eq!(polls.load(Ordering::SeqCst), 1);
}

#[tokio::test(start_paused = true)]
async fn test_wait_polls_until_timeout_budget_is_spent() {
    let (client, polls) = pending_client();
    let options = PollOptions::new(Duration::from_secs(1)).with_timeout(Duration::from_millis(2500));

    let err = client
        .deployments()
        .wait(OPERATION, &options, None)
        .await
        .unwrap_err();

    match err {
        Error::PollTimeout { waited, .. } => {
            assert!(waited >= Duration::from_millis(2500));
            assert!(waited < Duration::from_secs(3));
        }
        other => panic!("expected PollTimeout, got {other:?}"),
    }
    // Polls at 0s, 1s and 2s; the last sleep is cut to 500ms.
    assert_eq!(polls.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn test_wait_surfaces_first_failure_by_default() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(OPERATION_PATH))
        .respond_with(ResponseTemplate::new(503).set_body_json(envelope(14, "unavailable")))
        .expect(1)
        .mount(&server)
        .await;

    let err = client(&server)
        .deployments()
        .wait(OPERATION, &fast(), None)
        .await
        .unwrap_err();
    assert!(err.is_retryable());
}

#[tokio::test]
async fn test_wait_tolerates_transient_failures() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(OPERATION_PATH))
        .respond_with(ResponseTemplate::new(503).set_body_json(envelope(14, "unavailable")))
        .up_to_n_times(2)
        .with_priority(1)
        .mount(&server)
        .await;
    mount_status(&server, 0).await;

    let (callback, events) = recorder();
    let done = client(&server)
        .deployments()
        .wait(OPERATION, &fast().tolerate_errors(2), Some(callback))
        .await
        .unwrap();
    assert!(done.done);

    let retries = events
        .lock()
        .unwrap()
        .iter()
        .filter(|event| matches!(event, ProgressEvent::Retrying { .. }))
        .count();
    assert_eq!(retries, 2);
}

#[tokio::test]
async fn test_wait_does_not_absorb_permanent_failures() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(OPERATION_PATH))
        .respond_with(ResponseTemplate::new(404).set_body_json(envelope(5, "no such operation")))
        .expect(1)
        .mount(&server)
        .await;

    let err = client(&server)
        .deployments()
        .wait(OPERATION, &fast().tolerate_errors(5), None)
        .await
        .unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn test_wait_cancelled_between_polls() {
    let server = MockServer::start().await;
    mount_status(&server, 1000).await;

    let token = CancellationToken::new();
    let client = client(&server).with_context(CallContext::new().with_cancellation(token.clone()));

    let canceller = tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(100)).await;
        token.cancel();
    });

    let err = client
        .deployments()
        .wait(OPERATION, &PollOptions::new(Duration::from_secs(30)), None)
        .await
        .unwrap_err();
    canceller.await.unwrap();

    assert!(err.is_cancelled());
}

#[tokio::test]
async fn test_deploy_and_wait() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/studio/v1/workspaces/w/scenes/s1:deploy"))
        .respond_with(ResponseTemplate::new(200).set_body_json(operation(OPERATION, false)))
        .expect(1)
        .mount(&server)
        .await;
    mount_status(&server, 1).await;

    let done = client(&server)
        .deployments()
        .deploy_and_wait(SCENE, &fast(), None)
        .await
        .unwrap();
    assert!(done.done);
    assert_eq!(done.name, OPERATION);
}
