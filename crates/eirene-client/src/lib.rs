//! HTTP client for the Eirene counseling chat server.
//!
//! Wraps the four chat endpoints:
//! - `POST /chat/start` opens a session for a user
//! - `POST /chat/check` asks whether a session is ready
//! - `POST /chat` sends a message and streams the reply back as text
//! - `POST /chat/end` closes a session
//!
//! The client keeps no session state. Callers own the session id and
//! drive the start, send, end lifecycle themselves.

pub mod chat;
pub mod streaming;

use async_trait::async_trait;
use eirene_common::{EireneError, SessionId, UserId};

pub use chat::{ChatClient, ClientConfig};
pub use streaming::{text_chunks, ChunkStream, Utf8ChunkDecoder};

/// JSON object returned by the non-streaming endpoints, passed through as-is.
pub type Envelope = serde_json::Map<String, serde_json::Value>;

#[async_trait]
pub trait ChatApi: Send + Sync {
    async fn start_chat_session(&self, user_id: &UserId) -> Result<Envelope, ChatError>;

    async fn check_chat_session(&self, session_id: &SessionId) -> Result<Envelope, ChatError>;

    /// Send one user turn and hand every decoded fragment of the reply to
    /// `on_chunk` in arrival order. Returns once the reply stream ends.
    async fn send_chat_message(
        &self,
        session_id: &SessionId,
        user_id: &UserId,
        message: &str,
        on_chunk: &mut (dyn FnMut(String) + Send),
    ) -> Result<(), ChatError>;

    async fn end_chat_session(&self, session_id: &SessionId) -> Result<Envelope, ChatError>;
}

#[derive(Debug, thiserror::Error)]
pub enum ChatError {
    /// The server answered with a non-success status. `message` is the
    /// server's `detail` text, or a fixed per-endpoint fallback.
    #[error("{message}")]
    RequestFailed { status: u16, message: String },
    /// Transport failure, a malformed success body, or a broken reply stream.
    #[error("Network error: {0}")]
    NetworkError(String),
}

impl ChatError {
    pub fn message(&self) -> &str {
        match self {
            ChatError::RequestFailed { message, .. } => message,
            ChatError::NetworkError(message) => message,
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            ChatError::RequestFailed { status, .. } => Some(*status),
            ChatError::NetworkError(_) => None,
        }
    }
}

impl From<ChatError> for EireneError {
    fn from(err: ChatError) -> Self {
        match err {
            ChatError::RequestFailed { message, .. } => EireneError::Request(message),
            ChatError::NetworkError(message) => EireneError::Network(message),
        }
    }
}
