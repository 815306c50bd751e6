//! Chat client struct, endpoint table, and response handling.

use tracing::debug;

use crate::{ChatError, Envelope};

use super::config::ClientConfig;

/// The four server endpoints, with the message used when a failed
/// response carries no usable `detail`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Endpoint {
    Start,
    Check,
    Message,
    End,
}

impl Endpoint {
    pub(crate) fn path(self) -> &'static str {
        match self {
            Endpoint::Start => "/chat/start",
            Endpoint::Check => "/chat/check",
            Endpoint::Message => "/chat",
            Endpoint::End => "/chat/end",
        }
    }

    pub(crate) fn fallback_message(self) -> &'static str {
        match self {
            Endpoint::Start => "Failed to start session.",
            Endpoint::Check => "Failed to check session status.",
            Endpoint::Message => "Failed to send message.",
            Endpoint::End => "Failed to end session.",
        }
    }

    pub(crate) fn name(self) -> &'static str {
        match self {
            Endpoint::Start => "start",
            Endpoint::Check => "check",
            Endpoint::Message => "send",
            Endpoint::End => "end",
        }
    }
}

/// Eirene chat server client.
///
/// Cheap to share: every call opens its own request over the inner
/// `reqwest::Client`.
pub struct ChatClient {
    pub(crate) config: ClientConfig,
    pub(crate) http: reqwest::Client,
}

impl ChatClient {
    pub fn new(config: ClientConfig) -> Result<Self, ChatError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.connect_timeout {
            builder = builder.connect_timeout(timeout);
        }
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder
            .build()
            .map_err(|e| ChatError::NetworkError(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { config, http })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub(crate) fn url(&self, endpoint: Endpoint) -> String {
        format!(
            "{}{}",
            self.config.base_url.trim_end_matches('/'),
            endpoint.path()
        )
    }

    /// POST a JSON body and return the response if its status is a success.
    pub(crate) async fn post(
        &self,
        endpoint: Endpoint,
        body: &serde_json::Value,
    ) -> Result<reqwest::Response, ChatError> {
        let url = self.url(endpoint);
        debug!(%url, "chat request");

        let response = self
            .http
            .post(&url)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .json(body)
            .send()
            .await
            .map_err(|e| {
                debug!(error = %e, "chat request could not be sent");
                ChatError::NetworkError(e.to_string())
            })?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let message = error_detail(&text)
                .unwrap_or_else(|| endpoint.fallback_message().to_string());
            debug!(status = status.as_u16(), %message, "chat request rejected");
            return Err(ChatError::RequestFailed {
                status: status.as_u16(),
                message,
            });
        }

        Ok(response)
    }

    /// Read a success body as a JSON object.
    pub(crate) async fn read_envelope(
        &self,
        endpoint: Endpoint,
        response: reqwest::Response,
    ) -> Result<Envelope, ChatError> {
        let bytes = response.bytes().await.map_err(|e| {
            debug!(error = %e, "failed to read response body");
            ChatError::NetworkError(e.to_string())
        })?;
        parse_envelope(endpoint, &bytes)
    }
}

/// Extract the server's error message from a failed response body.
///
/// FastAPI-style bodies look like `{"detail": "Session not found."}`.
/// Validation errors carry a structured `detail`; that is surfaced as
/// its JSON text. A falsy `detail` (`null`, `""`, `false`, `0`) yields
/// `None` so the caller uses its fallback message.
pub(crate) fn error_detail(body: &str) -> Option<String> {
    let json: serde_json::Value = serde_json::from_str(body).ok()?;
    match json.get("detail")? {
        serde_json::Value::Null | serde_json::Value::Bool(false) => None,
        serde_json::Value::Number(n) if n.as_f64() == Some(0.0) => None,
        serde_json::Value::String(s) if s.is_empty() => None,
        serde_json::Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

pub(crate) fn parse_envelope(endpoint: Endpoint, bytes: &[u8]) -> Result<Envelope, ChatError> {
    let json: serde_json::Value = serde_json::from_slice(bytes).map_err(|e| {
        debug!(path = endpoint.path(), error = %e, "malformed JSON in response");
        ChatError::NetworkError(format!("invalid JSON from {}: {e}", endpoint.path()))
    })?;

    match json {
        serde_json::Value::Object(map) => Ok(map),
        other => {
            debug!(path = endpoint.path(), "response is not a JSON object");
            Err(ChatError::NetworkError(format!(
                "expected a JSON object from {}, got {other}",
                endpoint.path()
            )))
        }
    }
}
