//! Streaming chat example against a local orchestration API.
//!
//! Run with:
//! ```bash
//! export CHAT_API_KEY="your-api-key"   # optional
//! cargo run --example stream
//! ```

use std::io::Write;

use chatpipe::{ChatClient, ChatMessage, ChatRequest, TransportOptions};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing subscriber for logging
    tracing_subscriber::fmt::init();

    // Create transport options; base URL defaults to http://localhost:3080
    let mut transport_options = TransportOptions::new();
    if let Ok(api_key) = std::env::var("CHAT_API_KEY") {
        transport_options = transport_options.with_api_key(api_key);
    }

    // Create the client
    let client = ChatClient::new(transport_options);

    // Create the request
    let request = ChatRequest::new(vec![ChatMessage::user(
        "Tell me a short story about a robot.",
    )])
    .with_temperature(0.9);

    println!("Sending streaming request...\n");

    // Tokens arrive through the sink as the model generates them
    let text = client
        .stream_chat(&request, |token| {
            print!("{token}");
            let _ = std::io::stdout().flush();
        })
        .await?;

    println!("\n\n=== Full text ({} chars) ===", text.len());
    println!("{text}");

    Ok(())
}
