//! Client error types.
//!
//! Every failure is returned to the immediate caller. The variants follow the
//! order in which a call can fail: caller input, network, the service's own
//! error envelope, and finally decoding of a success body.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// Maximum number of body bytes carried in diagnostic snippets.
pub const SNIPPET_LIMIT: usize = 200;

/// Boxed error used as the opaque cause of a transport failure.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Client error type.
#[derive(Debug, Error)]
pub enum Error {
    /// A required identifier or field was empty. Raised before any network call.
    #[error("{field} is required")]
    MissingField {
        /// Human-readable name of the field.
        field: &'static str,
    },

    /// A field was present but cannot be sent.
    #[error("invalid {field}: {reason}")]
    InvalidField {
        /// Human-readable name of the field.
        field: &'static str,
        /// Why the value was rejected.
        reason: String,
    },

    /// The request body could not be serialized.
    #[error("failed to encode request body: {0}")]
    Encode(#[source] serde_json::Error),

    /// URL parsing failed.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Connection, timeout, cancellation or body-read failure.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The service answered with a structured error envelope.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// A success response could not be decoded into the expected type.
    #[error("failed to decode response as {type_name}: {source} (body: {snippet})")]
    Decode {
        /// Name of the type the body was decoded into.
        type_name: &'static str,
        /// At most [`SNIPPET_LIMIT`] bytes of the raw body.
        snippet: String,
        /// Underlying parse failure.
        #[source]
        source: serde_json::Error,
    },

    /// A failure status whose body was not a usable error envelope.
    #[error("request failed with status {status}: {snippet}")]
    Http {
        /// Raw HTTP status code.
        status: u16,
        /// At most [`SNIPPET_LIMIT`] bytes of the raw body.
        snippet: String,
    },

    /// The exchange failed and releasing the response failed as well.
    #[error("{primary} (releasing the response also failed: {release})")]
    Combined {
        /// The failure of the exchange itself.
        #[source]
        primary: Box<Error>,
        /// The failure to release the response body.
        release: Box<Error>,
    },

    /// Invalid configuration.
    #[error("Configuration error: {0}")]
    Config(String),

    /// A deployment did not reach `done` within the caller's time budget.
    #[error("operation {operation} did not complete within {waited:?}")]
    PollTimeout {
        /// Operation name being polled.
        operation: String,
        /// Time spent polling.
        waited: Duration,
    },

    /// A deployment did not reach `done` within the caller's attempt budget.
    #[error("operation {operation} did not complete after {attempts} status checks")]
    PollAttemptsExhausted {
        /// Operation name being polled.
        operation: String,
        /// Number of status checks issued.
        attempts: u32,
    },
}

impl From<reqwest::Error> for Error {
    fn from(error: reqwest::Error) -> Self {
        Error::Transport(TransportError::from(error))
    }
}

impl Error {
    /// Structured error code reported by the service, if any.
    pub fn api_code(&self) -> Option<Code> {
        match self {
            Error::Api(e) => Some(e.code),
            Error::Combined { primary, .. } => primary.api_code(),
            _ => None,
        }
    }

    /// Check if this is a not-found error.
    pub fn is_not_found(&self) -> bool {
        self.api_code() == Some(Code::NotFound) || matches!(self, Error::Http { status: 404, .. })
    }

    /// Check if this is an authentication or authorization error.
    pub fn is_auth_error(&self) -> bool {
        matches!(
            self.api_code(),
            Some(Code::Unauthenticated | Code::PermissionDenied)
        ) || matches!(self, Error::Http { status: 401 | 403, .. })
    }

    /// Check if this is a rate limit error.
    pub fn is_rate_limited(&self) -> bool {
        self.api_code() == Some(Code::ResourceExhausted)
            || matches!(self, Error::Http { status: 429, .. })
    }

    /// Check if this is a server error.
    pub fn is_server_error(&self) -> bool {
        matches!(
            self.api_code(),
            Some(Code::Internal | Code::Unavailable | Code::DataLoss | Code::Unknown)
        ) || matches!(self, Error::Http { status, .. } if *status >= 500)
    }

    /// Check if the call was cancelled by the caller.
    pub fn is_cancelled(&self) -> bool {
        match self {
            Error::Transport(e) => e.kind() == TransportErrorKind::Cancelled,
            Error::Combined { primary, .. } => primary.is_cancelled(),
            _ => false,
        }
    }

    /// Check if repeating the same call may succeed.
    ///
    /// Caller-input, decode and configuration errors are never retryable.
    pub fn is_retryable(&self) -> bool {
        match self {
            Error::Transport(e) => e.kind() != TransportErrorKind::Cancelled,
            Error::Api(e) => matches!(
                e.code,
                Code::Unavailable | Code::ResourceExhausted | Code::DeadlineExceeded | Code::Aborted
            ),
            Error::Http { status, .. } => *status == 429 || *status >= 500,
            Error::Combined { primary, .. } => primary.is_retryable(),
            _ => false,
        }
    }
}

/// Result type for client operations.
pub type Result<T> = std::result::Result<T, Error>;

// ─────────────────────────────────────────────────────────────────────────────
// Transport errors
// ─────────────────────────────────────────────────────────────────────────────

/// What went wrong below the HTTP layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportErrorKind {
    /// DNS or connection establishment failed.
    Connect,
    /// The call deadline elapsed.
    Timeout,
    /// The caller cancelled the call.
    Cancelled,
    /// Reading the response body failed.
    Body,
    /// The request could not be built or sent.
    Request,
    /// Releasing the response body failed.
    Release,
    /// Anything else reported by the HTTP stack.
    Other,
}

impl fmt::Display for TransportErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TransportErrorKind::Connect => "connect",
            TransportErrorKind::Timeout => "timeout",
            TransportErrorKind::Cancelled => "cancelled",
            TransportErrorKind::Body => "body",
            TransportErrorKind::Request => "request",
            TransportErrorKind::Release => "release",
            TransportErrorKind::Other => "other",
        };
        f.write_str(name)
    }
}

/// Network-level failure wrapping its underlying cause.
#[derive(Debug, Error)]
#[error("transport error ({kind}): {message}")]
pub struct TransportError {
    kind: TransportErrorKind,
    message: String,
    #[source]
    source: Option<BoxError>,
}

impl TransportError {
    /// Create a transport error without an underlying cause.
    pub fn new(kind: TransportErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            source: None,
        }
    }

    /// Create a transport error wrapping an underlying cause.
    pub fn with_source(
        kind: TransportErrorKind,
        message: impl Into<String>,
        source: impl Into<BoxError>,
    ) -> Self {
        Self {
            kind,
            message: message.into(),
            source: Some(source.into()),
        }
    }

    /// The call was cancelled through its [`CallContext`](crate::CallContext).
    pub fn cancelled() -> Self {
        Self::new(TransportErrorKind::Cancelled, "call cancelled")
    }

    /// The call did not finish within `deadline`.
    pub fn timeout(deadline: Duration) -> Self {
        Self::new(
            TransportErrorKind::Timeout,
            format!("call did not finish within {deadline:?}"),
        )
    }

    /// Reading the body of a response failed.
    pub fn body(error: reqwest::Error) -> Self {
        let kind = if error.is_timeout() {
            TransportErrorKind::Timeout
        } else {
            TransportErrorKind::Body
        };
        Self::with_source(kind, "reading response body", error)
    }

    /// Failure category.
    pub fn kind(&self) -> TransportErrorKind {
        self.kind
    }

    /// Short description of the failure.
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<reqwest::Error> for TransportError {
    fn from(error: reqwest::Error) -> Self {
        let kind = if error.is_timeout() {
            TransportErrorKind::Timeout
        } else if error.is_connect() {
            TransportErrorKind::Connect
        } else if error.is_body() || error.is_decode() {
            TransportErrorKind::Body
        } else if error.is_builder() || error.is_request() {
            TransportErrorKind::Request
        } else {
            TransportErrorKind::Other
        };
        Self::with_source(kind, error.to_string(), error)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Structured error envelope
// ─────────────────────────────────────────────────────────────────────────────

/// Status codes used in the service's error envelope.
///
/// The set is closed: integers outside `0..=16` or unknown names are rejected
/// during decoding, which routes the response to the generic failure path.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Code {
    /// Not an error; never a valid failure envelope.
    #[default]
    Ok,
    Cancelled,
    Unknown,
    InvalidArgument,
    DeadlineExceeded,
    NotFound,
    AlreadyExists,
    PermissionDenied,
    ResourceExhausted,
    FailedPrecondition,
    Aborted,
    OutOfRange,
    Unimplemented,
    Internal,
    Unavailable,
    DataLoss,
    Unauthenticated,
}

const CODES: [(Code, &str); 17] = [
    (Code::Ok, "OK"),
    (Code::Cancelled, "CANCELLED"),
    (Code::Unknown, "UNKNOWN"),
    (Code::InvalidArgument, "INVALID_ARGUMENT"),
    (Code::DeadlineExceeded, "DEADLINE_EXCEEDED"),
    (Code::NotFound, "NOT_FOUND"),
    (Code::AlreadyExists, "ALREADY_EXISTS"),
    (Code::PermissionDenied, "PERMISSION_DENIED"),
    (Code::ResourceExhausted, "RESOURCE_EXHAUSTED"),
    (Code::FailedPrecondition, "FAILED_PRECONDITION"),
    (Code::Aborted, "ABORTED"),
    (Code::OutOfRange, "OUT_OF_RANGE"),
    (Code::Unimplemented, "UNIMPLEMENTED"),
    (Code::Internal, "INTERNAL"),
    (Code::Unavailable, "UNAVAILABLE"),
    (Code::DataLoss, "DATA_LOSS"),
    (Code::Unauthenticated, "UNAUTHENTICATED"),
];

impl Code {
    /// Integer wire value.
    pub fn as_i32(self) -> i32 {
        CODES
            .iter()
            .position(|(code, _)| *code == self)
            .map_or(2, |index| index as i32)
    }

    /// Upper-snake name, e.g. `INVALID_ARGUMENT`.
    pub fn as_str(self) -> &'static str {
        CODES[self.as_i32() as usize].1
    }

    /// Look up a code by its integer wire value.
    pub fn from_i64(value: i64) -> Option<Self> {
        usize::try_from(value)
            .ok()
            .and_then(|index| CODES.get(index))
            .map(|(code, _)| *code)
    }

    /// Look up a code by its upper-snake name.
    pub fn from_name(name: &str) -> Option<Self> {
        CODES
            .iter()
            .find(|(_, known)| *known == name)
            .map(|(code, _)| *code)
    }
}

impl fmt::Display for Code {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Code {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_i32(self.as_i32())
    }
}

impl<'de> Deserialize<'de> for Code {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        use serde::de::Error as _;

        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Number(i64),
            Name(String),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Number(value) => Code::from_i64(value)
                .ok_or_else(|| D::Error::custom(format!("invalid status code {value}"))),
            Raw::Name(name) => Code::from_name(&name)
                .ok_or_else(|| D::Error::custom(format!("invalid status code {name:?}"))),
        }
    }
}

/// Failure reported by the service in its response body.
///
/// Wire shape: `{"code": 3, "message": "...", "details": [...]}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Error)]
#[error("{message} ({code})")]
pub struct ApiError {
    /// Status code from the closed taxonomy.
    #[serde(default)]
    pub code: Code,
    /// Human-readable message.
    #[serde(default)]
    pub message: String,
    /// Opaque detail payloads, in the order the service sent them.
    #[serde(default, deserialize_with = "nullable_details")]
    pub details: Vec<serde_json::Value>,
}

fn nullable_details<'de, D>(deserializer: D) -> std::result::Result<Vec<serde_json::Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<serde_json::Value>>::deserialize(deserializer)?.unwrap_or_default())
}

// ─────────────────────────────────────────────────────────────────────────────
// Helpers
// ─────────────────────────────────────────────────────────────────────────────

/// Render at most [`SNIPPET_LIMIT`] bytes of `body`, cut on a character boundary.
pub(crate) fn snippet(body: &[u8]) -> String {
    let head = &body[..body.len().min(SNIPPET_LIMIT)];
    let mut text = String::from_utf8_lossy(head).into_owned();
    if text.len() > SNIPPET_LIMIT {
        let mut end = SNIPPET_LIMIT;
        while !text.is_char_boundary(end) {
            end -= 1;
        }
        text.truncate(end);
    }
    text
}

/// Merge the outcome of an exchange with the outcome of releasing its response.
pub(crate) fn combine<T>(primary: Result<T>, release: Result<()>) -> Result<T> {
    match (primary, release) {
        (outcome, Ok(())) => outcome,
        (Ok(_), Err(release)) => Err(release),
        (Err(primary), Err(release)) => Err(Error::Combined {
            primary: Box::new(primary),
            release: Box::new(release),
        }),
    }
}
