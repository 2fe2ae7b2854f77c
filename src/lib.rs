//! # chatpipe - Streaming chat-completions client
//!
//! A small client library for an orchestration API's assistant chat
//! endpoint, built around an incremental streaming-response consumer.
//!
//! ## Features
//! - Async-first, tokio compatible
//! - Incremental token delivery through a caller-supplied sink
//! - UTF-8 decoding and line re-assembly across arbitrary chunk boundaries
//! - Tolerant event parsing: a malformed frame never aborts a healthy stream
//! - `[DONE]` sentinel termination and guaranteed source release
//! - Non-streaming fallback returning one whole JSON response
//! - Optional cancellation via `tokio_util::sync::CancellationToken`
//!
//! ## Architecture
//!
//! A streaming call runs a straight-line pipeline over one response body:
//! bytes are pulled chunk by chunk, decoded ([`decode::ChunkDecoder`]),
//! framed into complete lines ([`sse::LineFramer`]), classified
//! ([`sse::parse_line`]), and non-empty deltas are accumulated and dispatched
//! in arrival order ([`stream::StreamSession`]). Each call owns its session;
//! concurrent calls share nothing mutable.
//!
//! ## Example
//! ```no_run
//! use chatpipe::{ChatClient, ChatMessage, ChatRequest, TransportOptions};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = ChatClient::new(
//!         TransportOptions::new().with_base_url("http://localhost:3080".to_string()),
//!     );
//!
//!     let request = ChatRequest::new(vec![ChatMessage::user("Hello!")]);
//!     let text = client
//!         .stream_chat(&request, |token| print!("{token}"))
//!         .await?;
//!     println!("\nfull text: {text}");
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod decode;
pub mod http;
pub mod model;
pub mod options;
pub mod sse;
pub mod stream;

// Re-exports for convenience
pub use client::{ChatClient, ClientError};
pub use model::{ChatMessage, ChatRequest, ChatResponse, Role};
pub use options::{SecretString, TransportOptions};
pub use stream::{ByteSource, StreamSession};
