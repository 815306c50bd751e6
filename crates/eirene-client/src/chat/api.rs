//! ChatApi trait implementation for ChatClient.

use async_trait::async_trait;
use eirene_common::{new_correlation_id, SessionId, UserId};
use futures_util::StreamExt;
use tracing::{debug, debug_span, Instrument, Span};

use crate::streaming::{chunk_stream, ChunkStream};
use crate::{ChatApi, ChatError, Envelope};

use super::client::{ChatClient, Endpoint};

fn request_span(endpoint: Endpoint) -> Span {
    debug_span!("chat", op = endpoint.name(), cid = %new_correlation_id())
}

impl ChatClient {
    async fn call(
        &self,
        endpoint: Endpoint,
        body: serde_json::Value,
    ) -> Result<Envelope, ChatError> {
        async {
            let response = self.post(endpoint, &body).await?;
            self.read_envelope(endpoint, response).await
        }
        .instrument(request_span(endpoint))
        .await
    }

    /// Send a message and return the reply as a stream of decoded text
    /// fragments instead of pushing them into a callback.
    ///
    /// A non-success status fails here, before any fragment is produced.
    pub async fn message_stream(
        &self,
        session_id: &SessionId,
        user_id: &UserId,
        message: &str,
    ) -> Result<ChunkStream, ChatError> {
        self.open_reply(request_span(Endpoint::Message), session_id, user_id, message)
            .await
    }

    /// POST the message, then hand back the reply body read inside `span`.
    async fn open_reply(
        &self,
        span: Span,
        session_id: &SessionId,
        user_id: &UserId,
        message: &str,
    ) -> Result<ChunkStream, ChatError> {
        let body = serde_json::json!({
            "session_id": session_id,
            "user_id": user_id,
            "message": message,
        });

        let response = self
            .post(Endpoint::Message, &body)
            .instrument(span.clone())
            .await?;

        Ok(chunk_stream(response, span))
    }
}

#[async_trait]
impl ChatApi for ChatClient {
    async fn start_chat_session(&self, user_id: &UserId) -> Result<Envelope, ChatError> {
        self.call(Endpoint::Start, serde_json::json!({ "user_id": user_id }))
            .await
    }

    async fn check_chat_session(&self, session_id: &SessionId) -> Result<Envelope, ChatError> {
        self.call(Endpoint::Check, serde_json::json!({ "session_id": session_id }))
            .await
    }

    async fn send_chat_message(
        &self,
        session_id: &SessionId,
        user_id: &UserId,
        message: &str,
        on_chunk: &mut (dyn FnMut(String) + Send),
    ) -> Result<(), ChatError> {
        let span = request_span(Endpoint::Message);
        let mut chunks = self
            .open_reply(span.clone(), session_id, user_id, message)
            .await?;

        let mut delivered = 0usize;
        while let Some(chunk) = chunks.next().await {
            on_chunk(chunk?);
            delivered += 1;
        }

        span.in_scope(|| {
            debug!(session = %session_id, chunks = delivered, "reply stream finished");
        });
        Ok(())
    }

    async fn end_chat_session(&self, session_id: &SessionId) -> Result<Envelope, ChatError> {
        self.call(Endpoint::End, serde_json::json!({ "session_id": session_id }))
            .await
    }
}
