//! HTTP client construction and request plumbing.

use reqwest::{Client, RequestBuilder};

use crate::client::ClientError;
use crate::model::ApiErrorBody;
use crate::options::TransportOptions;

/// Fallback error message when a failed response carries no usable body.
pub const UNKNOWN_ERROR: &str = "An unknown error occurred";

/// Build a configured HTTP client from transport options.
///
/// Applies common configuration like timeouts and proxies.
pub fn build_http_client(options: &TransportOptions) -> Result<Client, reqwest::Error> {
    let mut builder = Client::builder();

    if let Some(timeout) = options.timeout {
        builder = builder.timeout(timeout);
    }

    if let Some(proxy_url) = &options.proxy {
        if let Ok(proxy) = reqwest::Proxy::all(proxy_url) {
            builder = builder.proxy(proxy);
        }
    }

    builder.build()
}

/// Attach the bearer credential and any extra headers from the options.
pub fn apply_headers(mut request: RequestBuilder, options: &TransportOptions) -> RequestBuilder {
    if let Some(api_key) = &options.api_key {
        request = request.bearer_auth(api_key.expose_secret());
    }

    if let Some(headers) = &options.extra_headers {
        for (key, value) in headers {
            request = request.header(key, value);
        }
    }

    request
}

/// Turn a non-ok response into the error surfaced to the caller.
///
/// The API attaches `{ "message": ... }` to failures; anything else falls
/// back to a generic message. The body is consumed here, so this runs before
/// any streaming starts.
pub async fn error_from_response(response: reqwest::Response) -> ClientError {
    let message = match response.json::<ApiErrorBody>().await {
        Ok(body) => body.message,
        Err(_) => UNKNOWN_ERROR.to_string(),
    };
    ClientError::Api(message)
}
