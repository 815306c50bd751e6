//! Incremental text decoding for streamed chat replies.
//!
//! The `/chat` endpoint streams the assistant's reply as raw bytes with no
//! framing. Each segment pulled off the wire is decoded as UTF-8 and
//! surfaced as one text chunk. Segment boundaries are arbitrary, so a
//! character may arrive split across two segments; the decoder holds the
//! leading bytes back until the rest of the character shows up.

use std::fmt::Display;

use futures_util::stream::{self, BoxStream, Stream, StreamExt};
use tracing::{debug, Instrument, Span};

use crate::ChatError;

/// Lazy sequence of decoded reply fragments. Finite, and not restartable
/// without sending the message again.
pub type ChunkStream = BoxStream<'static, Result<String, ChatError>>;

/// UTF-8 decoder that carries partial characters across calls.
///
/// Invalid sequences decode to U+FFFD, one per maximal invalid subpart.
#[derive(Debug, Default)]
pub struct Utf8ChunkDecoder {
    pending: Vec<u8>,
}

impl Utf8ChunkDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode the next segment. Returns every complete character available
    /// so far, which may be the empty string.
    pub fn decode(&mut self, bytes: &[u8]) -> String {
        self.pending.extend_from_slice(bytes);

        let mut out = String::with_capacity(self.pending.len());
        let mut rest: &[u8] = &self.pending;
        loop {
            match std::str::from_utf8(rest) {
                Ok(text) => {
                    out.push_str(text);
                    rest = &[];
                    break;
                }
                Err(e) => {
                    let (valid, after) = rest.split_at(e.valid_up_to());
                    if let Ok(text) = std::str::from_utf8(valid) {
                        out.push_str(text);
                    }
                    match e.error_len() {
                        Some(len) => {
                            out.push(char::REPLACEMENT_CHARACTER);
                            rest = &after[len..];
                        }
                        // Incomplete character at the end: wait for more bytes.
                        None => {
                            rest = after;
                            break;
                        }
                    }
                }
            }
        }

        let consumed = self.pending.len() - rest.len();
        self.pending.drain(..consumed);
        out
    }

    /// Flush at end of stream. A character left incomplete becomes U+FFFD.
    pub fn finish(self) -> String {
        if self.pending.is_empty() {
            String::new()
        } else {
            String::from_utf8_lossy(&self.pending).into_owned()
        }
    }

    /// Number of bytes held back waiting for the rest of a character.
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }
}

/// Turn a stream of byte segments into a stream of non-empty text chunks.
///
/// One chunk is produced per segment that completes at least one
/// character; nothing is coalesced across segments. A source error ends the
/// stream with a `ChatError::NetworkError`.
pub fn text_chunks<S, B, E>(source: S) -> impl Stream<Item = Result<String, ChatError>>
where
    S: Stream<Item = Result<B, E>>,
    B: AsRef<[u8]>,
    E: Display,
{
    let state = Some((Box::pin(source), Utf8ChunkDecoder::new()));

    stream::unfold(state, |state| async move {
        let (mut source, mut decoder) = state?;
        loop {
            match source.next().await {
                Some(Ok(segment)) => {
                    let text = decoder.decode(segment.as_ref());
                    if !text.is_empty() {
                        return Some((Ok(text), Some((source, decoder))));
                    }
                }
                Some(Err(e)) => {
                    debug!(error = %e, "reply stream failed");
                    return Some((Err(ChatError::NetworkError(e.to_string())), None));
                }
                None => {
                    let tail = decoder.finish();
                    if tail.is_empty() {
                        return None;
                    }
                    return Some((Ok(tail), None));
                }
            }
        }
    })
}

/// Poll `chunks` inside `span`, so anything logged while the reply is read
/// carries the request's span fields.
pub(crate) fn in_span<S>(chunks: S, span: Span) -> ChunkStream
where
    S: Stream<Item = Result<String, ChatError>> + Send + 'static,
{
    stream::unfold((Box::pin(chunks), span), |(mut chunks, span)| async move {
        let item = chunks.next().instrument(span.clone()).await?;
        Some((item, (chunks, span)))
    })
    .boxed()
}

/// Box a reply body into a `ChunkStream` read inside `span`.
pub(crate) fn chunk_stream(response: reqwest::Response, span: Span) -> ChunkStream {
    in_span(text_chunks(response.bytes_stream()), span)
}
