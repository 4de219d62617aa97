// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Wire codecs translating the storage adapter's in-memory model
//! (`h5vol-types`) to and from the REST protocol's JSON and URL
//! encodings.
//!
//! Every codec here is a pure function over `h5vol-types` values and
//! `serde_json::Value` — no transport, no dispatch, no object resolution.
//! Those live in `h5vol-client`.

pub mod dcpl;
pub mod json_bridge;
pub mod path;
pub mod refs;
pub mod request_builder;
pub mod space_codec;
pub mod type_codec;
