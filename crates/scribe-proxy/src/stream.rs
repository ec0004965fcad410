//! NDJSON → SSE stream reassembly.
//!
//! Ollama streams newline-delimited JSON, one object per fragment, ending
//! with a `"done": true` line. OpenAI clients expect Server-Sent Events:
//!
//! ```text
//! data: {"object":"chat.completion.chunk",...,"delta":{"content":"hi"},"finish_reason":null}
//!
//! data: {"object":"chat.completion.chunk",...,"delta":{},"finish_reason":"stop"}
//!
//! data: [DONE]
//! ```
//!
//! The upstream stream is dropped as soon as the done line is seen, so the
//! connection is released and nothing after it is read.

use std::collections::VecDeque;
use std::io;

use axum::{
    body::Body,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use bytes::{Bytes, BytesMut};
use futures_util::{Stream, StreamExt, stream::BoxStream};
use tracing::{debug, warn};

use crate::models::{ChatChunkChoice, ChatCompletionChunk, ChatDelta};
use crate::ollama_models::OllamaStreamLine;

const DONE_FRAME: &[u8] = b"data: [DONE]\n\n";

/// Identity shared by every chunk of one completion.
#[derive(Debug, Clone)]
pub struct ChunkIdentity {
    pub id: String,
    pub created: i64,
    pub model: String,
}

/// State threaded through the `unfold` stream.
struct SseState<E> {
    /// `None` once the upstream has been released.
    upstream: Option<BoxStream<'static, Result<Bytes, E>>>,
    buf: BytesMut,
    pending: VecDeque<Bytes>,
    identity: ChunkIdentity,
    finished: bool,
}

impl<E> SseState<E> {
    fn frame(&self, delta: ChatDelta, finish_reason: Option<&'static str>) -> Bytes {
        let chunk = ChatCompletionChunk {
            id: self.identity.id.clone(),
            object: "chat.completion.chunk",
            created: self.identity.created,
            model: self.identity.model.clone(),
            choices: vec![ChatChunkChoice {
                index: 0,
                delta,
                finish_reason,
            }],
        };
        let json = serde_json::to_string(&chunk).unwrap_or_default();
        Bytes::from(format!("data: {json}\n\n"))
    }

    /// Stop reading: drop the upstream and anything still buffered.
    fn finish(&mut self) {
        self.finished = true;
        self.upstream = None;
        self.buf.clear();
    }

    fn handle_line(&mut self, line: &[u8]) {
        let text = String::from_utf8_lossy(line);
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return;
        }

        let Ok(parsed) = serde_json::from_str::<OllamaStreamLine>(trimmed) else {
            debug!("Skipping malformed upstream line");
            return;
        };

        if let Some(content) = parsed.message.map(|m| m.content)
            && !content.is_empty()
        {
            let frame = self.frame(
                ChatDelta {
                    content: Some(content),
                },
                None,
            );
            self.pending.push_back(frame);
        }

        if parsed.done {
            let frame = self.frame(ChatDelta::default(), Some("stop"));
            self.pending.push_back(frame);
            self.pending.push_back(Bytes::from_static(DONE_FRAME));
            self.finish();
        }
    }
}

/// Convert an Ollama NDJSON byte stream into OpenAI SSE frames.
///
/// Malformed lines are skipped. A transport error yields one error item and
/// ends the stream. If the upstream closes without a done line, a trailing
/// unterminated line is still processed and the stream ends without the
/// terminal frames.
pub fn ndjson_to_sse<S, E>(
    upstream: S,
    identity: ChunkIdentity,
) -> impl Stream<Item = Result<Bytes, io::Error>> + Send + 'static
where
    S: Stream<Item = Result<Bytes, E>> + Send + 'static,
    E: std::error::Error + Send + Sync + 'static,
{
    let state = SseState {
        upstream: Some(upstream.boxed()),
        buf: BytesMut::new(),
        pending: VecDeque::new(),
        identity,
        finished: false,
    };

    futures_util::stream::unfold(state, |mut st| async move {
        loop {
            if let Some(frame) = st.pending.pop_front() {
                return Some((Ok(frame), st));
            }
            if st.finished {
                return None;
            }

            // Try to extract a complete line from the buffer.
            if let Some(line_end) = find_newline(&st.buf) {
                let line = st.buf.split_to(line_end);
                st.handle_line(&line);
                continue;
            }

            // Need more data from upstream.
            let next = match st.upstream.as_mut() {
                Some(upstream) => upstream.next().await,
                None => None,
            };
            match next {
                Some(Ok(chunk)) => {
                    st.buf.extend_from_slice(&chunk);
                }
                Some(Err(e)) => {
                    warn!("Upstream stream error: {e}");
                    st.finish();
                    return Some((Err(io::Error::other(e)), st));
                }
                None => {
                    if !st.buf.is_empty() {
                        let rest = st.buf.split();
                        st.handle_line(&rest);
                    }
                    if !st.finished {
                        warn!("Upstream closed the stream without a done line");
                        st.finish();
                    }
                }
            }
        }
    })
}

/// Wrap an SSE frame stream in a `text/event-stream` response.
pub fn sse_response<S>(frames: S) -> Response
where
    S: Stream<Item = Result<Bytes, io::Error>> + Send + 'static,
{
    Response::builder()
        .status(StatusCode::OK)
        .header("content-type", "text/event-stream")
        .header("cache-control", "no-cache")
        .header("x-accel-buffering", "no") // Disable nginx buffering
        .body(Body::from_stream(frames))
        .unwrap_or_else(|_| StatusCode::INTERNAL_SERVER_ERROR.into_response())
}

/// Find the next newline in the buffer, returning the position after it.
fn find_newline(buf: &BytesMut) -> Option<usize> {
    buf.iter().position(|&b| b == b'\n').map(|pos| pos + 1)
}
