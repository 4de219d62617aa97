// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Synchronous client for the HDF5 REST storage adapter: the transport
//! seam, the I/O dispatcher, the object locator, response-parse callbacks,
//! and the process-wide [`Context`] that threads them together.
//!
//! This crate is the only one of the three that knows about the network —
//! `h5vol-types` is the in-memory data model and `h5vol-wire` is the pure
//! bidirectional wire codec; neither has any notion of an HTTP request.

pub mod buffer;
pub mod callbacks;
pub mod config;
pub mod context;
pub mod dispatch;
pub mod locator;
pub mod transport;

#[cfg(test)]
pub(crate) mod tests_support;

pub use buffer::ResponseBuffer;
pub use callbacks::ObjectKind;
pub use config::Endpoint;
pub use context::Context;
pub use locator::Located;
pub use transport::{BlockingHttpTransport, Method, Transport, WireRequest, WireResponse};
