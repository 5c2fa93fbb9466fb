//! Deployments API.
//!
//! [`deploy`](DeploymentsApi::deploy) and [`check_status`](DeploymentsApi::check_status)
//! each send exactly one request. [`wait`](DeploymentsApi::wait) drives the
//! polling loop inside the calling task.

use std::time::Duration;

use reqwest::Method;
use tokio::time::Instant;

use super::require;
use crate::client::{ApiRequest, InworldClient};
use crate::error::{Error, Result, TransportError};
use crate::operation::{DeploymentState, Operation, PollOptions, ProgressCallback, ProgressEvent, emit};

/// Deployments API client.
pub struct DeploymentsApi {
    client: InworldClient,
}

impl DeploymentsApi {
    pub(crate) fn new(client: InworldClient) -> Self {
        Self { client }
    }

    /// Start deploying a scene, character or common knowledge entry.
    ///
    /// The returned operation is normally still pending. No retries: calling
    /// this again starts another deployment.
    pub async fn deploy(&self, resource: &str) -> Result<Operation> {
        require("resource name", resource)?;
        let url = self.client.studio_url(&format!("{resource}:deploy"))?;
        let operation: Operation = self
            .client
            .dispatch(ApiRequest::studio(Method::POST, url))
            .await?;

        tracing::debug!(resource, operation = %operation.name, done = operation.done, "Deployment started");
        Ok(operation)
    }

    /// Fetch the current state of an operation by name.
    ///
    /// Returns a new handle; once `done` is true it stays true.
    pub async fn check_status(&self, operation: &str) -> Result<Operation> {
        require("operation id", operation)?;
        let url = self.client.studio_url(operation)?;
        self.client
            .dispatch(ApiRequest::studio(Method::GET, url))
            .await
    }

    /// Poll `operation` until it reports `done`.
    ///
    /// Sleeps `options.interval` between checks, cut short so the last sleep
    /// ends when `options.timeout` runs out. Gives up with
    /// [`Error::PollTimeout`] or [`Error::PollAttemptsExhausted`] when the
    /// configured limits are reached. Retryable failures are absorbed up to
    /// `options.tolerated_errors` times in a row; anything else is returned
    /// immediately. The client's cancellation token also interrupts the sleep.
    pub async fn wait(
        &self,
        operation: &str,
        options: &PollOptions,
        on_progress: Option<ProgressCallback>,
    ) -> Result<Operation> {
        require("operation id", operation)?;

        let start = Instant::now();
        let mut attempts: u32 = 0;
        let mut failures: u32 = 0;

        emit(
            &on_progress,
            ProgressEvent::Started {
                operation: operation.to_string(),
            },
        );

        loop {
            if let Some(timeout) = options.timeout
                && start.elapsed() >= timeout
            {
                return Err(poll_timeout(operation, start));
            }

            attempts += 1;
            match self.check_status(operation).await {
                Ok(current) => {
                    failures = 0;
                    let state = current.state();
                    tracing::debug!(operation, attempt = attempts, ?state, "Polled deployment");

                    emit(
                        &on_progress,
                        ProgressEvent::Polling {
                            operation: operation.to_string(),
                            attempt: attempts,
                            elapsed: start.elapsed(),
                            state,
                        },
                    );

                    if state == DeploymentState::Done {
                        tracing::info!(operation, attempts, "Deployment finished");
                        emit(
                            &on_progress,
                            ProgressEvent::Completed {
                                operation: operation.to_string(),
                                attempts,
                            },
                        );
                        return Ok(current);
                    }
                }
                Err(e) if e.is_retryable() && failures < options.tolerated_errors => {
                    failures += 1;
                    tracing::debug!(operation, attempt = attempts, error = %e, "Status check failed, retrying");
                    emit(
                        &on_progress,
                        ProgressEvent::Retrying {
                            operation: operation.to_string(),
                            attempt: attempts,
                            error: e.to_string(),
                        },
                    );
                }
                Err(e) => return Err(e),
            }

            if let Some(max) = options.max_attempts
                && attempts >= max
            {
                return Err(Error::PollAttemptsExhausted {
                    operation: operation.to_string(),
                    attempts,
                });
            }

            let mut interval = options.interval;
            if let Some(timeout) = options.timeout {
                let remaining = timeout.saturating_sub(start.elapsed());
                if remaining.is_zero() {
                    return Err(poll_timeout(operation, start));
                }
                interval = interval.min(remaining);
            }
            self.pause(interval).await?;
        }
    }

    /// Deploy `resource` and wait for the operation to finish.
    pub async fn deploy_and_wait(
        &self,
        resource: &str,
        options: &PollOptions,
        on_progress: Option<ProgressCallback>,
    ) -> Result<Operation> {
        let operation = self.deploy(resource).await?;
        if operation.is_done() {
            return Ok(operation);
        }
        require("operation id", &operation.name)?;
        self.wait(&operation.name, options, on_progress).await
    }

    async fn pause(&self, interval: Duration) -> Result<()> {
        match self.client.context().cancellation() {
            Some(token) => tokio::select! {
                biased;
                _ = token.cancelled() => Err(TransportError::cancelled().into()),
                _ = tokio::time::sleep(interval) => Ok(()),
            },
            None => {
                tokio::time::sleep(interval).await;
                Ok(())
            }
        }
    }
}

fn poll_timeout(operation: &str, start: Instant) -> Error {
    let waited = start.elapsed();
    tracing::debug!(operation, ?waited, "Gave up waiting for deployment");
    Error::PollTimeout {
        operation: operation.to_string(),
        waited,
    }
}
