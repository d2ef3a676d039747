//! Confluence REST API client.
//!
//! Provides a sync HTTP [`Transport`] for the Confluence REST API with
//! Basic (user + API token) or Bearer (personal access token) authentication.

#[cfg(any(test, feature = "mock"))]
mod mock;
mod request;

use std::fmt;
use std::time::Duration;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde_json::Value;
use tracing::debug;
use ureq::{Agent, RequestBuilder};

#[cfg(any(test, feature = "mock"))]
pub use mock::MockTransport;
pub(crate) use request::path_segment;
pub use request::{ApiRequest, Method, Transport};

use crate::error::ConfluenceError;

/// Default HTTP timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Credentials for the Confluence REST API.
#[derive(Clone)]
pub enum Credentials {
    /// Username and API token sent as HTTP Basic auth.
    Basic { username: String, api_token: String },
    /// Personal access token sent as a Bearer token.
    Bearer { token: String },
}

impl Credentials {
    /// Basic credentials when a username is known, Bearer otherwise.
    pub fn from_parts(username: Option<&str>, token: &str) -> Self {
        match username.filter(|u| !u.is_empty()) {
            Some(username) => Self::Basic {
                username: username.to_owned(),
                api_token: token.to_owned(),
            },
            None => Self::Bearer {
                token: token.to_owned(),
            },
        }
    }

    fn authorization(&self) -> String {
        match self {
            Self::Basic {
                username,
                api_token,
            } => format!("Basic {}", STANDARD.encode(format!("{username}:{api_token}"))),
            Self::Bearer { token } => format!("Bearer {token}"),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Basic { username, .. } => f
                .debug_struct("Basic")
                .field("username", username)
                .field("api_token", &"<redacted>")
                .finish(),
            Self::Bearer { .. } => f
                .debug_struct("Bearer")
                .field("token", &"<redacted>")
                .finish(),
        }
    }
}

/// Confluence REST API client.
pub struct ConfluenceClient {
    agent: Agent,
    base_url: String,
    auth_header: String,
}

impl ConfluenceClient {
    /// Create a client for the server at `base_url`.
    ///
    /// `timeout` bounds each HTTP request as a whole.
    pub fn new(base_url: &str, credentials: &Credentials, timeout: Duration) -> Self {
        let agent = Agent::config_builder()
            .timeout_global(Some(timeout))
            .http_status_as_error(false)
            .build()
            .into();

        Self {
            agent,
            base_url: base_url.trim_end_matches('/').to_owned(),
            auth_header: credentials.authorization(),
        }
    }

    /// Server base URL without trailing slash.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Get the API base URL.
    fn api_url(&self) -> String {
        format!("{}/rest/api", self.base_url)
    }

    fn prepare<B>(&self, builder: RequestBuilder<B>, request: &ApiRequest) -> RequestBuilder<B> {
        let mut builder = builder
            .header("Authorization", self.auth_header.as_str())
            .header("Accept", "application/json");
        if request.method.is_write() {
            builder = builder.header("X-Atlassian-Token", "no-check");
        }
        request
            .query
            .iter()
            .fold(builder, |builder, (key, value)| builder.query(key, value))
    }

    fn dispatch(
        &self,
        request: &ApiRequest,
    ) -> Result<ureq::http::Response<ureq::Body>, ConfluenceError> {
        let url = format!("{}/{}", self.api_url(), request.path);
        let payload = request.body.as_ref().map(serde_json::to_vec).transpose()?;

        let response = match (request.method, payload) {
            (Method::Get, _) => self.prepare(self.agent.get(&url), request).call(),
            (Method::Delete, _) => self.prepare(self.agent.delete(&url), request).call(),
            (Method::Post, payload) => self
                .prepare(self.agent.post(&url), request)
                .header("Content-Type", "application/json")
                .send(&payload.unwrap_or_default()[..]),
            (Method::Put, payload) => self
                .prepare(self.agent.put(&url), request)
                .header("Content-Type", "application/json")
                .send(&payload.unwrap_or_default()[..]),
        };

        response.map_err(|err| match err {
            ureq::Error::Io(io) => ConfluenceError::Connection(io),
            other => ConfluenceError::HttpRequest(other),
        })
    }
}

impl fmt::Debug for ConfluenceClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConfluenceClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl Transport for ConfluenceClient {
    fn send(&self, request: &ApiRequest) -> Result<Option<Value>, ConfluenceError> {
        debug!(
            method = request.method.as_str(),
            path = %request.path,
            "Sending Confluence request"
        );

        let response = self.dispatch(request)?;
        let status = response.status().as_u16();
        let mut body_reader = response.into_body();

        if status >= 400 {
            let error_body = body_reader
                .read_to_string()
                .unwrap_or_else(|_| "(unable to read error body)".to_owned());
            return Err(ConfluenceError::HttpResponse {
                status,
                body: error_body,
            });
        }

        let text = body_reader.read_to_string()?;
        debug!(status, bytes = text.len(), "Confluence response received");
        decode_document(&text)
    }
}

/// Decode a response body; empty bodies and `null` carry no document.
fn decode_document(text: &str) -> Result<Option<Value>, ConfluenceError> {
    if text.trim().is_empty() {
        return Ok(None);
    }
    match serde_json::from_str(text)? {
        Value::Null => Ok(None),
        document => Ok(Some(document)),
    }
}
