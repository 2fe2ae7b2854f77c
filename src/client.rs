//! Chat client entry points and error types.

use serde_json::Value;
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::http::{apply_headers, build_http_client, error_from_response};
use crate::model::{ChatRequest, ChatResponse};
use crate::options::TransportOptions;
use crate::stream::StreamSession;

/// Errors that can occur during client operations.
#[derive(Error, Debug)]
pub enum ClientError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("API error: {0}")]
    Api(String),

    #[error("Stream cancelled")]
    StreamCancelled,

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Client for the orchestration API's chat-completions endpoint.
///
/// One call maps to one request; streaming calls consume the response body
/// incrementally and dispatch each content delta to the caller's sink,
/// non-streaming calls await one whole JSON body. Calls are independent:
/// concurrent calls on the same client share nothing mutable.
///
/// # Example
/// ```no_run
/// use chatpipe::client::ChatClient;
/// use chatpipe::model::{ChatMessage, ChatRequest};
/// use chatpipe::options::TransportOptions;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let client = ChatClient::new(TransportOptions::new());
///     let request = ChatRequest::new(vec![ChatMessage::user("Hello!")])
///         .with_model("llama-3-70b");
///
///     // Streaming: tokens arrive through the sink, the full text comes back.
///     let text = client
///         .stream_chat(&request, |token| print!("{token}"))
///         .await?;
///     println!();
///
///     // Non-streaming: one complete response.
///     let response = client.chat(&request).await?;
///     assert_eq!(response.text, text);
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone)]
pub struct ChatClient {
    transport_options: TransportOptions,
}

const CHAT_COMPLETIONS_PATH: &str = "/api/ai/chat/completions";

impl ChatClient {
    pub fn new(transport_options: TransportOptions) -> Self {
        Self { transport_options }
    }

    /// Get reference to the transport options.
    pub fn transport_options(&self) -> &TransportOptions {
        &self.transport_options
    }

    /// Single entry point mirroring the API's two modes: with a sink the
    /// response streams, without one it returns whole.
    ///
    /// Passing `None` needs a concrete sink type, e.g. `None::<fn(&str)>`.
    pub async fn send<F>(
        &self,
        request: &ChatRequest,
        on_token: Option<F>,
    ) -> Result<ChatResponse, ClientError>
    where
        F: FnMut(&str) + Send,
    {
        match on_token {
            Some(sink) => {
                let text = self.stream_chat(request, sink).await?;
                Ok(ChatResponse { text })
            }
            None => self.chat(request).await,
        }
    }

    /// Non-streaming call: awaits one complete JSON response body.
    ///
    /// This path never touches the streaming pipeline.
    pub async fn chat(&self, request: &ChatRequest) -> Result<ChatResponse, ClientError> {
        let response = self.post_chat(request, false).await?;
        Ok(response.json::<ChatResponse>().await?)
    }

    /// Streaming call: dispatches each content delta to `on_token` as it
    /// arrives and returns the full accumulated text.
    pub async fn stream_chat<F>(
        &self,
        request: &ChatRequest,
        on_token: F,
    ) -> Result<String, ClientError>
    where
        F: FnMut(&str) + Send,
    {
        let response = self.post_chat(request, true).await?;
        StreamSession::new().run(response, on_token, None).await
    }

    /// Streaming call that stops reading when `cancel` fires, failing with
    /// [`ClientError::StreamCancelled`].
    pub async fn stream_chat_with_cancellation<F>(
        &self,
        request: &ChatRequest,
        on_token: F,
        cancel: CancellationToken,
    ) -> Result<String, ClientError>
    where
        F: FnMut(&str) + Send,
    {
        let response = self.post_chat(request, true).await?;
        StreamSession::new().run(response, on_token, Some(cancel)).await
    }

    /// Issue the POST and fail fast on a non-ok status, before any of the
    /// body is consumed as a stream.
    async fn post_chat(
        &self,
        request: &ChatRequest,
        stream: bool,
    ) -> Result<reqwest::Response, ClientError> {
        let url = format!("{}{}", self.transport_options.base_url(), CHAT_COMPLETIONS_PATH);

        let mut body = serde_json::to_value(request)?;
        if let Value::Object(map) = &mut body {
            map.insert("stream".to_string(), Value::Bool(stream));
        }

        let http_client = build_http_client(&self.transport_options)?;
        let mut req = http_client.post(&url).json(&body);
        req = apply_headers(req, &self.transport_options);

        debug!(%url, stream, "sending chat request");
        let response = req.send().await?;

        if !response.status().is_success() {
            return Err(error_from_response(response).await);
        }

        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ChatMessage;

    #[test]
    fn test_request_carries_no_stream_flag() {
        // The stream flag is injected at send time, not carried by ChatRequest.
        let request = ChatRequest::new(vec![ChatMessage::user("hi")]);
        let body = serde_json::to_value(&request).unwrap();
        assert!(body.get("stream").is_none());
    }

    #[test]
    fn test_client_is_cheap_to_clone() {
        let client = ChatClient::new(TransportOptions::new());
        let cloned = client.clone();
        assert_eq!(
            cloned.transport_options().base_url(),
            client.transport_options().base_url()
        );
    }
}
