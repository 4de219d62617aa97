// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Test-only support code shared across this crate's unit and end-to-end
//! tests. Compiled only under `#[cfg(test)]` (see `lib.rs`) — never part of
//! the production artifact.

mod mock_transport;

pub use mock_transport::MockTransport;

/// Initializes a `tracing` subscriber for the current test process, so
/// `#[instrument]` spans and `debug!`/`error!` events surface under
/// `RUST_LOG` when a test fails. `try_init` tolerates being called from
/// more than one test in the same binary.
pub fn init_test_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init()
        .ok();
}
