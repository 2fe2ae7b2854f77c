//! Streaming session: the pull loop that turns a byte stream into text.
//!
//! One [`StreamSession`] is created per streaming call and never reused. It
//! owns the full pipeline state (decode carry-over, line carry-over,
//! accumulated text) and drives an explicit loop: await the next chunk,
//! decode it, frame it into lines, classify each line, dispatch content
//! deltas to the caller's sink. The session consumes its [`ByteSource`], so
//! every exit path (sentinel, natural end-of-stream, read error,
//! cancellation) drops the source exactly once.

use async_trait::async_trait;
use bytes::Bytes;
use futures::{Stream, StreamExt};
use tokio_util::sync::CancellationToken;

use crate::client::ClientError;
use crate::decode::ChunkDecoder;
use crate::sse::{parse_line, Frame, LineFramer};

/// Abstract pull-based byte stream.
///
/// The session's sole suspension point is `next_chunk`: resolve with
/// `Some(bytes)` for the next chunk, `None` once the transport is exhausted,
/// or an error for a mid-read failure.
#[async_trait]
pub trait ByteSource: Send {
    async fn next_chunk(&mut self) -> Result<Option<Bytes>, ClientError>;
}

#[async_trait]
impl ByteSource for reqwest::Response {
    async fn next_chunk(&mut self) -> Result<Option<Bytes>, ClientError> {
        self.chunk().await.map_err(ClientError::from)
    }
}

/// Adapter exposing any chunk stream as a [`ByteSource`].
///
/// Used in tests to script exact chunk boundaries:
/// ```
/// use chatpipe::stream::StreamSource;
/// use bytes::Bytes;
/// use futures::stream;
///
/// let chunks = vec![Ok(Bytes::from_static(b"data: [DONE]\n"))];
/// let source = StreamSource::new(stream::iter(chunks));
/// # let _ = source;
/// ```
pub struct StreamSource<S>(S);

impl<S> StreamSource<S>
where
    S: Stream<Item = Result<Bytes, reqwest::Error>> + Unpin + Send,
{
    pub fn new(stream: S) -> Self {
        Self(stream)
    }
}

#[async_trait]
impl<S> ByteSource for StreamSource<S>
where
    S: Stream<Item = Result<Bytes, reqwest::Error>> + Unpin + Send,
{
    async fn next_chunk(&mut self) -> Result<Option<Bytes>, ClientError> {
        match self.0.next().await {
            Some(Ok(bytes)) => Ok(Some(bytes)),
            Some(Err(e)) => Err(ClientError::from(e)),
            None => Ok(None),
        }
    }
}

/// Per-call pipeline state for one streaming response.
#[derive(Debug, Default)]
pub struct StreamSession {
    decoder: ChunkDecoder,
    framer: LineFramer,
    accumulated: String,
}

impl StreamSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Consume the source until the `[DONE]` sentinel or end-of-stream,
    /// dispatching each content delta to `on_token` in arrival order.
    ///
    /// Returns the full accumulated text. When `cancel` fires, reading stops
    /// before the next chunk and the call fails with
    /// [`ClientError::StreamCancelled`].
    pub async fn run<S, F>(
        mut self,
        mut source: S,
        mut on_token: F,
        cancel: Option<CancellationToken>,
    ) -> Result<String, ClientError>
    where
        S: ByteSource,
        F: FnMut(&str) + Send,
    {
        loop {
            let chunk = match &cancel {
                Some(token) => tokio::select! {
                    biased;
                    _ = token.cancelled() => return Err(ClientError::StreamCancelled),
                    chunk = source.next_chunk() => chunk?,
                },
                None => source.next_chunk().await?,
            };

            let Some(bytes) = chunk else {
                break;
            };

            let text = self.decoder.decode(&bytes);
            for line in self.framer.push(&text) {
                if self.process_line(&line, &mut on_token) {
                    // Sentinel observed: stop before reading anything further.
                    return Ok(self.accumulated);
                }
            }
        }

        // Transport exhausted without a sentinel. Carried bytes still flush
        // through the framer, but a dangling unterminated line is dropped.
        let tail = self.decoder.finish();
        for line in self.framer.push(&tail) {
            if self.process_line(&line, &mut on_token) {
                break;
            }
        }

        Ok(self.accumulated)
    }

    /// Handle one complete line; returns true once the sentinel is seen.
    fn process_line<F>(&mut self, line: &str, on_token: &mut F) -> bool
    where
        F: FnMut(&str) + Send,
    {
        match parse_line(line) {
            Frame::Delta(delta) => {
                self.accumulated.push_str(&delta);
                on_token(&delta);
                false
            }
            Frame::Done => true,
            Frame::Ignored => false,
        }
    }
}
