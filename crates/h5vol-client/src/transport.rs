// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! The transport seam: the black-box HTTP client the dispatcher and
//! locator drive.
//!
//! Grounded on `ah-rest-client::client::RestClient`'s `request`/
//! `handle_response` pair, reworked synchronous (`reqwest::blocking`) and
//! reduced to the primitive the dispatcher actually needs — one verb, one
//! URL, headers, an optional body, in exchange for a status code and a
//! body. Status-code interpretation belongs to the dispatcher, not this
//! layer: `Transport::execute` returns `Err` only for a transport-level
//! failure (DNS, connection, TLS), never for a non-2xx response.

use std::collections::HashMap;
use std::time::Duration;

use h5vol_types::error::{Error, Result};
use tracing::instrument;

/// HTTP verb. Only the verbs the external-interfaces table actually uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl Method {
    fn as_str(self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
        }
    }
}

/// One outgoing request, fully composed by the dispatcher/locator.
#[derive(Debug, Clone)]
pub struct WireRequest {
    pub method: Method,
    pub url: String,
    pub headers: HashMap<String, String>,
    pub body: Vec<u8>,
}

impl WireRequest {
    #[must_use]
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        WireRequest {
            method,
            url: url.into(),
            headers: HashMap::new(),
            body: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    #[must_use]
    pub fn with_body(mut self, body: Vec<u8>) -> Self {
        self.body = body;
        self
    }
}

/// One response, exactly as the server sent it: a raw status code and
/// body. The dispatcher is responsible for classifying `status` against
/// the error-kind table; this type carries no opinion about success or
/// failure.
#[derive(Debug, Clone)]
pub struct WireResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl WireResponse {
    #[must_use]
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// The seam the dispatcher and locator execute requests through.
pub trait Transport {
    /// Performs one request and returns its raw response.
    ///
    /// # Errors
    /// Returns [`Error::Transport`] for any failure below the HTTP layer
    /// (DNS, connection, TLS, a short write/read). A non-2xx HTTP response
    /// that was fully received is `Ok`, not `Err`.
    fn execute(&self, request: WireRequest) -> Result<WireResponse>;
}

/// The production transport: a thin synchronous wrapper around
/// `reqwest::blocking::Client`, matching `ah-rest-client`'s pattern of one
/// shared client plus a typed error mapping.
pub struct BlockingHttpTransport {
    client: reqwest::blocking::Client,
}

impl BlockingHttpTransport {
    /// Builds a transport with a fixed per-request timeout. `Expect:
    /// 100-continue` is suppressed by never setting it — `reqwest` does
    /// not add it unless asked.
    ///
    /// # Errors
    /// Returns [`Error::Transport`] if the underlying `reqwest` client
    /// cannot be constructed (e.g. TLS backend initialization failure).
    pub fn new(request_timeout: Duration) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(request_timeout)
            .build()
            .map_err(|e| Error::Transport(e.to_string()))?;
        Ok(BlockingHttpTransport { client })
    }
}

impl Transport for BlockingHttpTransport {
    #[instrument(skip(self, request), fields(component = "h5vol_client", operation = "transport_execute", method = ?request.method, url = %request.url))]
    fn execute(&self, request: WireRequest) -> Result<WireResponse> {
        let method = match request.method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Put => reqwest::Method::PUT,
            Method::Delete => reqwest::Method::DELETE,
        };
        let mut builder = self.client.request(method, &request.url);
        for (key, value) in &request.headers {
            builder = builder.header(key.as_str(), value.as_str());
        }
        if !request.body.is_empty() {
            builder = builder.body(request.body);
        }
        let response = builder.send().map_err(|e| {
            tracing::error!(error = %e, "transport request failed");
            Error::Transport(e.to_string())
        })?;
        let status = response.status().as_u16();
        let body = response.bytes().map_err(|e| Error::Transport(e.to_string()))?.to_vec();
        tracing::debug!(status, body_len = body.len(), "transport request completed");
        Ok(WireResponse { status, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests_support::MockTransport;

    #[test]
    fn mock_transport_records_requests_and_replays_response() {
        let transport = MockTransport::always(200, b"{}".to_vec());
        let resp = transport.execute(WireRequest::new(Method::Get, "http://example/x")).unwrap();
        assert!(resp.is_success());
        assert_eq!(transport.requests.lock().unwrap().len(), 1);
    }

    #[test]
    fn wire_response_classifies_status() {
        assert!(WireResponse { status: 200, body: vec![] }.is_success());
        assert!(!WireResponse { status: 404, body: vec![] }.is_success());
        assert!(!WireResponse { status: 500, body: vec![] }.is_success());
    }
}
