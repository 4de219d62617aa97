// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! The process-wide state: the HTTP client, the response buffer, and the
//! base URL/credentials, bundled behind one explicit, owned value rather
//! than a hidden singleton.
//!
//! A hidden-global process state is a known footgun for exactly the reason
//! it tends to get introduced: a library call needs some state to persist
//! across calls, and a `static` is the path of least resistance. Nothing
//! about that requirement actually needs a process-global `static` though,
//! so `Context` is threaded explicitly through every locator/dispatcher
//! call instead. `Context::init`/`close` are kept as named operations
//! (rather than just `new`/`Drop`) purely to preserve a
//! double-init/double-teardown-is-a-no-op contract: `init` has nothing to
//! double because it owns its state outright, and `close` is guarded by an
//! internal flag.

use std::cell::{Cell, RefCell};

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;

use h5vol_types::error::Result;

use crate::buffer::ResponseBuffer;
use crate::config::Endpoint;
use crate::transport::{Transport, WireRequest, WireResponse};

/// Process-wide state: one HTTP client (`T: Transport`), one response
/// buffer, and the endpoint configuration every request is built against.
pub struct Context<T: Transport> {
    transport: T,
    endpoint: Endpoint,
    buffer: RefCell<ResponseBuffer>,
    closed: Cell<bool>,
}

impl<T: Transport> Context<T> {
    /// Establishes process-wide state. Always idempotent: there is no
    /// prior global state to double-init against, since each `Context`
    /// owns its transport and buffer outright.
    #[must_use]
    pub fn init(transport: T, endpoint: Endpoint) -> Self {
        Context {
            transport,
            endpoint,
            buffer: RefCell::new(ResponseBuffer::new()),
            closed: Cell::new(false),
        }
    }

    #[must_use]
    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    /// Tears down process-wide state. A second call (or a call after
    /// `Drop`) is a no-op.
    pub fn close(&self) {
        self.closed.set(true);
    }

    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.closed.get()
    }

    /// Joins `path` onto the configured base URL.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.endpoint.base_url.trim_end_matches('/'), path)
    }

    /// Executes one request: attaches the `Host` header (identifying the
    /// logical file by its filepath) and, if credentials are configured,
    /// a `Basic` `Authorization` header; resets the shared
    /// response buffer; runs the request through the transport; and
    /// appends the response body into the buffer before returning it.
    ///
    /// `Expect: 100-continue` is suppressed simply by never setting it —
    /// `BlockingHttpTransport` (like `reqwest` generally) does not add it
    /// unless asked.
    ///
    /// # Errors
    /// Propagates [`h5vol_types::error::Error::Transport`] from the
    /// underlying transport, and [`h5vol_types::error::Error::ResourceExhausted`]
    /// if the response buffer cannot grow to hold the response body.
    #[tracing::instrument(skip(self, request), fields(component = "h5vol_client", operation = "context_execute", method = ?request.method, url = %request.url))]
    pub fn execute(&self, request: WireRequest) -> Result<WireResponse> {
        let mut request = request.with_header("Host", self.endpoint.filepath.clone());
        if let (Some(user), Some(pass)) = (&self.endpoint.username, &self.endpoint.password) {
            let token = BASE64.encode(format!("{user}:{pass}"));
            request = request.with_header("Authorization", format!("Basic {token}"));
        }
        self.buffer.borrow_mut().reset();
        let response = self.transport.execute(request)?;
        tracing::debug!(status = response.status, "request completed");
        self.buffer.borrow_mut().append(&response.body)?;
        Ok(response)
    }
}

impl<T: Transport> Drop for Context<T> {
    fn drop(&mut self) {
        self.close();
    }
}
