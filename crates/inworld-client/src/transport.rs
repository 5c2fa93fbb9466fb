//! HTTP seam beneath the transport core.
//!
//! [`InworldClient::dispatch`](crate::InworldClient::dispatch) prepares an
//! authenticated [`HttpRequest`] and hands it to an [`HttpTransport`]. The
//! default transport is backed by `reqwest`; tests and embedding applications
//! can supply their own through
//! [`ClientBuilder::transport`](crate::ClientBuilder::transport).

use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::header::HeaderMap;
use reqwest::{Method, StatusCode};
use url::Url;

use crate::error::{Result, TransportError, TransportErrorKind};

/// A fully prepared outgoing request.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    /// HTTP method.
    pub method: Method,
    /// Absolute target URL.
    pub url: Url,
    /// Headers, including authentication.
    pub headers: HeaderMap,
    /// Serialized JSON body, if any.
    pub body: Option<Bytes>,
    /// Upper bound for the whole exchange.
    pub timeout: Duration,
}

/// Status line plus a body that has not been read yet.
pub struct HttpResponse {
    /// HTTP status code.
    pub status: StatusCode,
    /// Unread response body.
    pub body: Box<dyn ResponseBody>,
}

impl std::fmt::Debug for HttpResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpResponse")
            .field("status", &self.status)
            .finish_non_exhaustive()
    }
}

/// The body of a response together with the connection resources behind it.
#[async_trait]
pub trait ResponseBody: Send {
    /// Read the entire body into memory.
    async fn read_to_end(&mut self) -> Result<Bytes>;

    /// Release the body and its connection. Called exactly once per response,
    /// whether or not reading succeeded.
    async fn release(self: Box<Self>) -> Result<()>;
}

/// Sends prepared requests over the network.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// Send `request` and return the response head. No retries.
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse>;
}

/// [`HttpTransport`] backed by a shared `reqwest::Client`.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    http: reqwest::Client,
}

impl ReqwestTransport {
    /// Wrap an existing `reqwest::Client`.
    pub fn new(http: reqwest::Client) -> Self {
        Self { http }
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse> {
        let mut builder = self
            .http
            .request(request.method, request.url)
            .headers(request.headers)
            .timeout(request.timeout);
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder.send().await.map_err(TransportError::from)?;

        Ok(HttpResponse {
            status: response.status(),
            body: Box::new(ReqwestBody {
                response: Some(response),
            }),
        })
    }
}

struct ReqwestBody {
    response: Option<reqwest::Response>,
}

#[async_trait]
impl ResponseBody for ReqwestBody {
    async fn read_to_end(&mut self) -> Result<Bytes> {
        let response = self.response.take().ok_or_else(|| {
            TransportError::new(TransportErrorKind::Body, "response body already consumed")
        })?;
        Ok(response.bytes().await.map_err(TransportError::body)?)
    }

    async fn release(self: Box<Self>) -> Result<()> {
        // Dropping an unread response returns or closes its connection.
        drop(self.response);
        Ok(())
    }
}
