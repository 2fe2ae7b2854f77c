//! End-to-end tests against a mock HTTP server.
//!
//! Chunk-boundary behavior is covered by unit tests with scripted sources;
//! these tests exercise the full client surface over real HTTP.

use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use chatpipe::http::UNKNOWN_ERROR;
use chatpipe::{ChatClient, ChatMessage, ChatRequest, ClientError, TransportOptions};

const CHAT_PATH: &str = "/api/ai/chat/completions";

fn client_for(server: &MockServer) -> ChatClient {
    ChatClient::new(TransportOptions::new().with_base_url(server.uri()))
}

fn request() -> ChatRequest {
    ChatRequest::new(vec![ChatMessage::user("hi")]).with_model("llama-3-70b")
}

fn sse_body(lines: &[&str]) -> String {
    lines
        .iter()
        .map(|l| format!("data: {l}\n\n"))
        .collect::<String>()
}

#[tokio::test]
async fn streaming_call_accumulates_and_dispatches_tokens() {
    let server = MockServer::start().await;
    let body = sse_body(&[
        r#"{"choices":[{"delta":{"content":"Hel"}}]}"#,
        r#"{"choices":[{"delta":{"content":"lo"}}]}"#,
        "[DONE]",
    ]);
    Mock::given(method("POST"))
        .and(path(CHAT_PATH))
        .and(body_partial_json(json!({"stream": true})))
        .respond_with(ResponseTemplate::new(200).set_body_raw(body, "text/event-stream"))
        .mount(&server)
        .await;

    let mut tokens = Vec::new();
    let text = client_for(&server)
        .stream_chat(&request(), |t| tokens.push(t.to_string()))
        .await
        .unwrap();

    assert_eq!(text, "Hello");
    assert_eq!(tokens, vec!["Hel", "lo"]);
}

#[tokio::test]
async fn streaming_call_skips_malformed_frames() {
    let server = MockServer::start().await;
    let body = sse_body(&[
        r#"{"choices":[{"delta":{"content":"ok"}}]}"#,
        "{not json",
        r#"{"choices":[{"delta":{"content":"!"}}]}"#,
        "[DONE]",
    ]);
    Mock::given(method("POST"))
        .and(path(CHAT_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_raw(body, "text/event-stream"))
        .mount(&server)
        .await;

    let text = client_for(&server)
        .stream_chat(&request(), |_| {})
        .await
        .unwrap();
    assert_eq!(text, "ok!");
}

#[tokio::test]
async fn fallback_call_returns_whole_response() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(CHAT_PATH))
        .and(body_partial_json(json!({"stream": false})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"text": "whole answer"})))
        .mount(&server)
        .await;

    let response = client_for(&server).chat(&request()).await.unwrap();
    assert_eq!(response.text, "whole answer");

    // Same path through the single entry point with no sink.
    let response = client_for(&server)
        .send(&request(), None::<fn(&str)>)
        .await
        .unwrap();
    assert_eq!(response.text, "whole answer");
}

#[tokio::test]
async fn entry_point_with_sink_streams() {
    let server = MockServer::start().await;
    let body = sse_body(&[r#"{"choices":[{"delta":{"content":"streamed"}}]}"#, "[DONE]"]);
    Mock::given(method("POST"))
        .and(path(CHAT_PATH))
        .and(body_partial_json(json!({"stream": true})))
        .respond_with(ResponseTemplate::new(200).set_body_raw(body, "text/event-stream"))
        .mount(&server)
        .await;

    let mut tokens = Vec::new();
    let response = client_for(&server)
        .send(&request(), Some(|t: &str| tokens.push(t.to_string())))
        .await
        .unwrap();
    assert_eq!(response.text, "streamed");
    assert_eq!(tokens, vec!["streamed"]);
}

#[tokio::test]
async fn non_ok_status_surfaces_api_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(CHAT_PATH))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({"message": "model overloaded"})))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .stream_chat(&request(), |_| {})
        .await
        .unwrap_err();
    match err {
        ClientError::Api(message) => assert_eq!(message, "model overloaded"),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn non_ok_status_without_body_uses_generic_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(CHAT_PATH))
        .respond_with(ResponseTemplate::new(502))
        .mount(&server)
        .await;

    let err = client_for(&server).chat(&request()).await.unwrap_err();
    match err {
        ClientError::Api(message) => assert_eq!(message, UNKNOWN_ERROR),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn bearer_credential_is_attached() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(CHAT_PATH))
        .and(header("authorization", "Bearer sk-test"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"text": "authed"})))
        .mount(&server)
        .await;

    let client = ChatClient::new(
        TransportOptions::new()
            .with_base_url(server.uri())
            .with_api_key("sk-test"),
    );
    let response = client.chat(&request()).await.unwrap();
    assert_eq!(response.text, "authed");
}

#[tokio::test]
async fn stream_without_sentinel_ends_at_transport_close() {
    let server = MockServer::start().await;
    let body = sse_body(&[r#"{"choices":[{"delta":{"content":"no sentinel"}}]}"#]);
    Mock::given(method("POST"))
        .and(path(CHAT_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_raw(body, "text/event-stream"))
        .mount(&server)
        .await;

    let text = client_for(&server)
        .stream_chat(&request(), |_| {})
        .await
        .unwrap();
    assert_eq!(text, "no sentinel");
}
