//! Per-call cancellation and deadline.

use std::time::Duration;

use tokio_util::sync::CancellationToken;

/// Cancellation and deadline applied to every call made through a client.
///
/// Attach one with [`InworldClient::with_context`](crate::InworldClient::with_context).
/// When the token fires, the in-flight exchange is abandoned and the call
/// fails with a [`Cancelled`](crate::TransportErrorKind::Cancelled) transport
/// error. When the deadline elapses, it fails with
/// [`Timeout`](crate::TransportErrorKind::Timeout).
#[derive(Debug, Clone, Default)]
pub struct CallContext {
    cancellation: Option<CancellationToken>,
    deadline: Option<Duration>,
}

impl CallContext {
    /// Context with neither cancellation nor a deadline override.
    pub fn new() -> Self {
        Self::default()
    }

    /// Abort calls when `token` is cancelled.
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = Some(token);
        self
    }

    /// Bound each call by `deadline` instead of the client timeout.
    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Cancellation token, if any.
    pub fn cancellation(&self) -> Option<&CancellationToken> {
        self.cancellation.as_ref()
    }

    /// Deadline override, if any.
    pub fn deadline(&self) -> Option<Duration> {
        self.deadline
    }

    /// Whether the token has already fired.
    pub fn is_cancelled(&self) -> bool {
        self.cancellation
            .as_ref()
            .is_some_and(CancellationToken::is_cancelled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_context_is_inert() {
        let ctx = CallContext::new();
        assert!(ctx.cancellation().is_none());
        assert!(ctx.deadline().is_none());
        assert!(!ctx.is_cancelled());
    }

    #[test]
    fn test_context_observes_token() {
        let token = CancellationToken::new();
        let ctx = CallContext::new()
            .with_cancellation(token.clone())
            .with_deadline(Duration::from_secs(5));

        assert!(!ctx.is_cancelled());
        token.cancel();
        assert!(ctx.is_cancelled());
        assert_eq!(ctx.deadline(), Some(Duration::from_secs(5)));
    }
}
