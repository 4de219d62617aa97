// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! An in-memory [`Transport`] for unit and end-to-end tests, grounded on
//! `ah-rest-mock-client`'s pattern of a canned, deterministic in-process
//! responder rather than a real socket.

use std::sync::Mutex;

use h5vol_types::error::Result;

use crate::transport::{Transport, WireRequest, WireResponse};

pub struct MockTransport {
    responder: Box<dyn Fn(&WireRequest) -> Result<WireResponse> + Send + Sync>,
    pub requests: Mutex<Vec<WireRequest>>,
}

impl MockTransport {
    pub fn new(responder: impl Fn(&WireRequest) -> Result<WireResponse> + Send + Sync + 'static) -> Self {
        MockTransport {
            responder: Box::new(responder),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// A transport that returns the same status/body for every request.
    pub fn always(status: u16, body: Vec<u8>) -> Self {
        MockTransport::new(move |_| Ok(WireResponse { status, body: body.clone() }))
    }

    /// The most recently executed request, if any.
    pub fn last_request(&self) -> Option<WireRequest> {
        self.requests.lock().unwrap().last().cloned()
    }
}

impl Transport for MockTransport {
    fn execute(&self, request: WireRequest) -> Result<WireResponse> {
        let response = (self.responder)(&request);
        self.requests.lock().unwrap().push(request);
        response
    }
}
