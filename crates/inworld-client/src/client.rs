//! Main client implementation and transport core.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};
use reqwest::{Method, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use url::Url;

use crate::api::{CharactersApi, CommonKnowledgeApi, DeploymentsApi, ScenesApi, SessionsApi};
use crate::config::ResolvedConfig;
use crate::context::CallContext;
use crate::error::{ApiError, Code, Error, Result, TransportError, combine, snippet};
use crate::transport::{HttpRequest, HttpTransport, ReqwestTransport};

/// Host serving both API families.
pub const DEFAULT_BASE_URL: &str = "https://api.inworld.ai";

/// Path prefix of the simple session API.
pub const SIMPLE_API_PATH: &str = "v1/";

/// Path prefix of the studio management API.
pub const STUDIO_API_PATH: &str = "studio/v1/";

/// Scheme prefixed to both credentials in the `Authorization` header.
pub const AUTH_SCHEME: &str = "Basic ";

/// Header declaring the authorization type of studio requests.
pub const BEARER_TYPE_HEADER: &str = "grpc-metadata-x-authorization-bearer-type";

/// Value of [`BEARER_TYPE_HEADER`] on studio requests.
pub const STUDIO_API_MARKER: &str = "studio_api";

/// Header carrying the session id on simple requests.
pub const SESSION_ID_HEADER: &str = "grpc-metadata-session-id";

/// Default timeout for requests.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// The two authentication/base-path contexts exposed by the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ApiFamily {
    /// Session API for talking to deployed characters.
    Simple,
    /// Management API for workspace resources.
    Studio,
}

impl fmt::Display for ApiFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiFamily::Simple => f.write_str("simple"),
            ApiFamily::Studio => f.write_str("studio"),
        }
    }
}

/// One outgoing call: method, absolute URL, optional JSON body and API family.
///
/// Built fresh per call and consumed by [`InworldClient::dispatch`].
#[derive(Debug, Clone)]
pub struct ApiRequest {
    method: Method,
    url: Url,
    body: Option<Bytes>,
    family: ApiFamily,
    session_id: Option<String>,
}

impl ApiRequest {
    /// Request against the studio family.
    pub fn studio(method: Method, url: Url) -> Self {
        Self {
            method,
            url,
            body: None,
            family: ApiFamily::Studio,
            session_id: None,
        }
    }

    /// Request against the simple family.
    pub fn simple(method: Method, url: Url) -> Self {
        Self {
            method,
            url,
            body: None,
            family: ApiFamily::Simple,
            session_id: None,
        }
    }

    /// Attach `body` serialized as JSON.
    pub fn json<B: Serialize + ?Sized>(mut self, body: &B) -> Result<Self> {
        let encoded = serde_json::to_vec(body).map_err(Error::Encode)?;
        self.body = Some(Bytes::from(encoded));
        Ok(self)
    }

    /// Session id sent with simple requests. Empty ids are ignored.
    pub fn session_id(mut self, session_id: Option<&str>) -> Self {
        self.session_id = session_id
            .filter(|id| !id.is_empty())
            .map(str::to_string);
        self
    }

    /// HTTP method.
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// Target URL.
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// API family the request is authenticated for.
    pub fn family(&self) -> ApiFamily {
        self.family
    }
}

/// Authorization header values for both families, fixed at build time.
#[derive(Clone, Default)]
struct Credentials {
    simple: Option<HeaderValue>,
    studio: Option<HeaderValue>,
}

impl Credentials {
    fn for_family(&self, family: ApiFamily) -> Result<&HeaderValue> {
        let value = match family {
            ApiFamily::Simple => self.simple.as_ref(),
            ApiFamily::Studio => self.studio.as_ref(),
        };
        value.ok_or_else(|| Error::Config(format!("{family} API key is not configured")))
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("simple", &self.simple.as_ref().map(|_| "<redacted>"))
            .field("studio", &self.studio.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// Inworld API client.
///
/// Cheap to clone; clones share the underlying connection pool. Safe for
/// concurrent use: every call builds its own request and reads its own
/// response.
///
/// # Example
///
/// ```no_run
/// use inworld_client::InworldClient;
///
/// # async fn example() -> inworld_client::Result<()> {
/// let client = InworldClient::builder()
///     .studio_api_key("c3R1ZGlvOmtleQ==")
///     .build()?;
///
/// let operation = client.scenes().deploy("workspaces/w/scenes/s1").await?;
/// println!("deploying: {}", operation.name);
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct InworldClient {
    /// Inner shared state.
    inner: Arc<ClientInner>,
    /// Cancellation and deadline for calls made through this handle.
    context: CallContext,
}

/// Inner client state (shared across clones).
struct ClientInner {
    transport: Arc<dyn HttpTransport>,
    base_url: Url,
    credentials: Credentials,
    timeout: Duration,
}

impl fmt::Debug for InworldClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InworldClient")
            .field("base_url", &self.inner.base_url.as_str())
            .field("credentials", &self.inner.credentials)
            .field("timeout", &self.inner.timeout)
            .field("context", &self.context)
            .finish_non_exhaustive()
    }
}

impl InworldClient {
    /// Create a new client builder.
    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }

    /// Get the base URL.
    pub fn base_url(&self) -> &Url {
        &self.inner.base_url
    }

    /// Context applied to calls made through this handle.
    pub fn context(&self) -> &CallContext {
        &self.context
    }

    /// A handle sharing this client whose calls observe `context`.
    pub fn with_context(&self, context: CallContext) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            context,
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // API accessors
    // ─────────────────────────────────────────────────────────────────────────

    /// Access the scenes API.
    pub fn scenes(&self) -> ScenesApi {
        ScenesApi::new(self.clone())
    }

    /// Access the characters API.
    pub fn characters(&self) -> CharactersApi {
        CharactersApi::new(self.clone())
    }

    /// Access the common knowledge API.
    pub fn common_knowledge(&self) -> CommonKnowledgeApi {
        CommonKnowledgeApi::new(self.clone())
    }

    /// Access deployments (long-running operations).
    pub fn deployments(&self) -> DeploymentsApi {
        DeploymentsApi::new(self.clone())
    }

    /// Access the simple session API.
    pub fn sessions(&self) -> SessionsApi {
        SessionsApi::new(self.clone())
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Transport core
    // ─────────────────────────────────────────────────────────────────────────

    /// Build a studio-family URL for a resource path.
    pub fn studio_url(&self, path: &str) -> Result<Url> {
        self.url(STUDIO_API_PATH, path)
    }

    /// Build a simple-family URL for a resource path.
    pub fn simple_url(&self, path: &str) -> Result<Url> {
        self.url(SIMPLE_API_PATH, path)
    }

    /// Each `/`-separated part of `path` becomes one escaped segment, so `?`,
    /// `#` and `%` inside an identifier stay part of the path.
    fn url(&self, prefix: &str, path: &str) -> Result<Url> {
        let mut url = self.inner.base_url.join(prefix)?;
        url.path_segments_mut()
            .map_err(|_| Error::InvalidUrl(url::ParseError::RelativeUrlWithCannotBeABaseBase))?
            .pop_if_empty()
            .extend(path.split('/').filter(|segment| !segment.is_empty()));
        Ok(url)
    }

    /// Send `request` and decode the response into `T`.
    ///
    /// Codes in `[200, 400)` are decoded as `T`. Anything else is decoded as
    /// the service's error envelope, falling back to [`Error::Http`] when the
    /// body is not an envelope. The response is always released; a release
    /// failure is combined with any earlier failure. No retries.
    pub async fn dispatch<T: DeserializeOwned>(&self, request: ApiRequest) -> Result<T> {
        if self.context.is_cancelled() {
            return Err(TransportError::cancelled().into());
        }

        let deadline = self.context.deadline().unwrap_or(self.inner.timeout);
        let exchange = tokio::time::timeout(deadline, self.exchange::<T>(request, deadline));

        let outcome = match self.context.cancellation() {
            Some(token) => tokio::select! {
                biased;
                _ = token.cancelled() => return Err(TransportError::cancelled().into()),
                outcome = exchange => outcome,
            },
            None => exchange.await,
        };

        outcome.unwrap_or_else(|_| Err(TransportError::timeout(deadline).into()))
    }

    async fn exchange<T: DeserializeOwned>(
        &self,
        request: ApiRequest,
        deadline: Duration,
    ) -> Result<T> {
        let family = request.family;
        let http_request = self.authorize(request, deadline)?;

        tracing::debug!(
            method = %http_request.method,
            url = %http_request.url,
            family = %family,
            "Dispatching request"
        );

        let response = self.inner.transport.send(http_request).await?;
        let status = response.status;
        let mut body = response.body;

        let outcome = match body.read_to_end().await {
            Ok(bytes) => {
                tracing::debug!(status = status.as_u16(), bytes = bytes.len(), "Received response");
                decode_response::<T>(status, &bytes)
            }
            Err(e) => Err(e),
        };

        combine(outcome, body.release().await)
    }

    /// Attach credentials and family headers.
    fn authorize(&self, request: ApiRequest, deadline: Duration) -> Result<HttpRequest> {
        let mut headers = HeaderMap::new();
        headers.insert(
            AUTHORIZATION,
            self.inner.credentials.for_family(request.family)?.clone(),
        );

        match request.family {
            ApiFamily::Studio => {
                headers.insert(
                    HeaderName::from_static(BEARER_TYPE_HEADER),
                    HeaderValue::from_static(STUDIO_API_MARKER),
                );
            }
            ApiFamily::Simple => {
                if let Some(session_id) = &request.session_id {
                    let value =
                        HeaderValue::from_str(session_id).map_err(|e| Error::InvalidField {
                            field: "session id",
                            reason: e.to_string(),
                        })?;
                    headers.insert(HeaderName::from_static(SESSION_ID_HEADER), value);
                }
            }
        }

        if request.body.is_some() {
            headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        }

        Ok(HttpRequest {
            method: request.method,
            url: request.url,
            headers,
            body: request.body,
            timeout: deadline,
        })
    }
}

/// Classify a fully read response and decode it.
pub(crate) fn decode_response<T: DeserializeOwned>(status: StatusCode, body: &[u8]) -> Result<T> {
    let code = status.as_u16();

    if !(200..400).contains(&code) {
        return Err(match serde_json::from_slice::<ApiError>(body) {
            Ok(envelope) if envelope.code != Code::Ok => Error::Api(envelope),
            _ => {
                tracing::debug!(status = code, bytes = body.len(), "Failure body is not an error envelope");
                Error::Http {
                    status: code,
                    snippet: snippet(body),
                }
            }
        });
    }

    serde_json::from_slice(body).map_err(|source| {
        tracing::debug!(status = code, bytes = body.len(), "Success body did not decode");
        Error::Decode {
            type_name: std::any::type_name::<T>(),
            snippet: snippet(body),
            source,
        }
    })
}

/// Builder for creating an [`InworldClient`].
pub struct ClientBuilder {
    base_url: Option<String>,
    simple_api_key: Option<String>,
    studio_api_key: Option<String>,
    timeout: Duration,
    user_agent: Option<String>,
    transport: Option<Arc<dyn HttpTransport>>,
}

impl fmt::Debug for ClientBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientBuilder")
            .field("base_url", &self.base_url)
            .field("simple_api_key", &self.simple_api_key.as_ref().map(|_| "<redacted>"))
            .field("studio_api_key", &self.studio_api_key.as_ref().map(|_| "<redacted>"))
            .field("timeout", &self.timeout)
            .field("user_agent", &self.user_agent)
            .field("custom_transport", &self.transport.is_some())
            .finish()
    }
}

impl ClientBuilder {
    /// Create a new builder with defaults.
    pub fn new() -> Self {
        Self {
            base_url: None,
            simple_api_key: None,
            studio_api_key: None,
            timeout: DEFAULT_TIMEOUT,
            user_agent: None,
            transport: None,
        }
    }

    /// Start from a resolved configuration.
    pub fn from_config(config: &ResolvedConfig) -> Self {
        let mut builder = Self::new();
        if let Some(url) = &config.base_url {
            builder = builder.base_url(url.clone());
        }
        if let Some(secret) = &config.simple_api_key {
            builder = builder.simple_api_key(secret.value.clone());
        }
        if let Some(secret) = &config.studio_api_key {
            builder = builder.studio_api_key(secret.value.clone());
        }
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        builder
    }

    /// Override the service host (defaults to [`DEFAULT_BASE_URL`]).
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Pre-encoded credential for the simple session API.
    pub fn simple_api_key(mut self, key: impl Into<String>) -> Self {
        self.simple_api_key = Some(key.into());
        self
    }

    /// Pre-encoded credential for the studio management API.
    pub fn studio_api_key(mut self, key: impl Into<String>) -> Self {
        self.studio_api_key = Some(key.into());
        self
    }

    /// Set the request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set a custom user agent.
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = Some(agent.into());
        self
    }

    /// Send requests through a custom transport instead of `reqwest`.
    pub fn transport(mut self, transport: Arc<dyn HttpTransport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Build the client.
    pub fn build(self) -> Result<InworldClient> {
        let base_url = self
            .base_url
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        if self.timeout.is_zero() {
            return Err(Error::Config(
                "request timeout must be greater than zero".to_string(),
            ));
        }

        // Parse and normalize base URL
        let mut base_url = Url::parse(&base_url)?;
        if !base_url.path().ends_with('/') {
            base_url.set_path(&format!("{}/", base_url.path()));
        }

        let credentials = Credentials {
            simple: self
                .simple_api_key
                .as_deref()
                .map(|key| auth_header("simple API key", key))
                .transpose()?,
            studio: self
                .studio_api_key
                .as_deref()
                .map(|key| auth_header("studio API key", key))
                .transpose()?,
        };

        let transport = match self.transport {
            Some(transport) => transport,
            None => {
                let user_agent = self
                    .user_agent
                    .unwrap_or_else(|| format!("inworld-client/{}", env!("CARGO_PKG_VERSION")));
                let http = reqwest::Client::builder()
                    .user_agent(user_agent)
                    .build()?;
                Arc::new(ReqwestTransport::new(http))
            }
        };

        Ok(InworldClient {
            inner: Arc::new(ClientInner {
                transport,
                base_url,
                credentials,
                timeout: self.timeout,
            }),
            context: CallContext::default(),
        })
    }
}

impl Default for ClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

fn auth_header(field: &'static str, key: &str) -> Result<HeaderValue> {
    if key.is_empty() {
        return Err(Error::MissingField { field });
    }
    let mut value =
        HeaderValue::from_str(&format!("{AUTH_SCHEME}{key}")).map_err(|e| Error::InvalidField {
            field,
            reason: e.to_string(),
        })?;
    value.set_sensitive(true);
    Ok(value)
}
