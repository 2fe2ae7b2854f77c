//! Server-Sent Events line framing and event parsing.
//!
//! The chat-completions endpoint streams newline-delimited text where only
//! `data: `-prefixed lines carry events:
//!
//! ```text
//! data: {"choices":[{"delta":{"content":"Hel"}}]}
//!
//! data: {"choices":[{"delta":{"content":"lo"}}]}
//!
//! data: [DONE]
//! ```
//!
//! [`LineFramer`] reassembles complete lines out of decoded text fragments;
//! [`parse_line`] classifies each complete line as a content delta, the
//! `[DONE]` sentinel, or ignorable noise.

use serde::Deserialize;
use tracing::warn;

/// End-of-stream marker sent as a data payload before the body closes.
pub const DONE_SENTINEL: &str = "[DONE]";

/// Splits decoded text into complete lines across chunk boundaries.
///
/// A line is only yielded once its `\n` terminator has been observed; the
/// trailing unterminated fragment stays buffered for the next push. The
/// framer never force-flushes that fragment: a stream that ends mid-line
/// drops the dangling tail, which is the endpoint's defined behavior for
/// truncated bodies.
#[derive(Debug, Default)]
pub struct LineFramer {
    pending: String,
}

impl LineFramer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append decoded text and return every line completed by it.
    pub fn push(&mut self, text: &str) -> Vec<String> {
        self.pending.push_str(text);

        let mut lines = Vec::new();
        while let Some(pos) = self.pending.find('\n') {
            lines.push(self.pending[..pos].to_string());
            self.pending.drain(..=pos);
        }
        lines
    }

    /// Whether an unterminated fragment is still buffered.
    pub fn has_partial(&self) -> bool {
        !self.pending.is_empty()
    }
}

/// Classification of one complete stream line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Frame {
    /// A non-empty content fragment extracted from a data event.
    Delta(String),
    /// The `[DONE]` sentinel: the stream is logically over.
    Done,
    /// Anything that carries no content: non-data lines, keep-alives,
    /// malformed payloads, and empty deltas.
    Ignored,
}

/// One parsed chunk of the chat-completions stream body.
#[derive(Debug, Deserialize)]
struct CompletionChunk {
    #[serde(default)]
    choices: Vec<ChunkChoice>,
}

#[derive(Debug, Deserialize)]
struct ChunkChoice {
    delta: Option<ChunkDelta>,
}

#[derive(Debug, Deserialize)]
struct ChunkDelta {
    content: Option<String>,
}

/// Extract the payload of a `data: ` line.
///
/// Returns the trimmed content after the prefix, or `None` for any other
/// line.
///
/// # Example
/// ```
/// use chatpipe::sse::parse_data_line;
///
/// assert_eq!(parse_data_line("data: {\"k\":1}"), Some("{\"k\":1}"));
/// assert_eq!(parse_data_line(": comment"), None);
/// assert_eq!(parse_data_line(""), None);
/// ```
pub fn parse_data_line(line: &str) -> Option<&str> {
    line.strip_prefix("data: ").map(|s| s.trim())
}

/// Classify one complete line of the stream.
///
/// Malformed JSON and unexpected payload shapes are logged and reported as
/// [`Frame::Ignored`]; a single corrupt event must never abort an otherwise
/// healthy stream.
pub fn parse_line(line: &str) -> Frame {
    let Some(data) = parse_data_line(line) else {
        return Frame::Ignored;
    };

    // Empty payload after trimming is a keep-alive.
    if data.is_empty() {
        return Frame::Ignored;
    }

    if data == DONE_SENTINEL {
        return Frame::Done;
    }

    match serde_json::from_str::<CompletionChunk>(data) {
        Ok(chunk) => {
            let content = chunk
                .choices
                .into_iter()
                .next()
                .and_then(|c| c.delta)
                .and_then(|d| d.content);
            match content {
                Some(text) if !text.is_empty() => Frame::Delta(text),
                _ => Frame::Ignored,
            }
        }
        Err(e) => {
            warn!(error = %e, data, "skipping malformed stream event");
            Frame::Ignored
        }
    }
}
