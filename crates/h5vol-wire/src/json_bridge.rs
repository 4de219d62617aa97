// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! The JSON Parser Bridge: path-keyed typed lookups over a parsed
//! `serde_json::Value` tree.
//!
//! Rather than scanning raw JSON text with a brace-depth counter to locate
//! nested sub-objects, the whole document is parsed up front with
//! `serde_json` and `Value` subtrees are walked from there. This module is
//! the thin, named seam the rest of the wire crate calls through, so that
//! codec modules never match on `serde_json::Value` directly.

use h5vol_types::error::{Error, Result};
use serde_json::Value;

/// A borrowed view over one JSON document, offering typed leaf lookups
/// keyed by field name.
pub struct JsonBridge<'a> {
    root: &'a Value,
}

impl<'a> JsonBridge<'a> {
    #[must_use]
    pub fn new(root: &'a Value) -> Self {
        JsonBridge { root }
    }

    /// Parses `text` and wraps the result. The returned bridge borrows the
    /// freshly parsed value, so callers that need the bridge to outlive
    /// this call should parse into an owned `Value` themselves and call
    /// [`JsonBridge::new`].
    ///
    /// # Errors
    /// Returns [`Error::Malformed`] if `text` is not valid JSON.
    pub fn parse(text: &'a str, scratch: &'a mut Option<Value>) -> Result<Self> {
        *scratch = Some(serde_json::from_str(text)?);
        Ok(JsonBridge {
            root: scratch.as_ref().unwrap(),
        })
    }

    /// The object field named `key` as a sub-bridge, or `None` if absent
    /// or the root is not an object.
    #[must_use]
    pub fn field(&self, key: &str) -> Option<JsonBridge<'a>> {
        self.root.get(key).map(JsonBridge::new)
    }

    /// The object field named `key`, required.
    ///
    /// # Errors
    /// Returns [`Error::Malformed`] if the field is absent.
    pub fn require_field(&self, key: &str) -> Result<JsonBridge<'a>> {
        self.field(key)
            .ok_or_else(|| Error::Malformed(format!("missing required field \"{key}\"")))
    }

    /// This value as a string leaf.
    ///
    /// # Errors
    /// Returns [`Error::Malformed`] if the value is not a JSON string.
    pub fn as_str(&self) -> Result<&'a str> {
        self.root
            .as_str()
            .ok_or_else(|| Error::Malformed(format!("expected a string, found {}", kind_name(self.root))))
    }

    /// This value as an unsigned integer leaf.
    ///
    /// # Errors
    /// Returns [`Error::Malformed`] if the value is not a non-negative
    /// JSON integer.
    pub fn as_u64(&self) -> Result<u64> {
        self.root
            .as_u64()
            .ok_or_else(|| Error::Malformed(format!("expected an unsigned integer, found {}", kind_name(self.root))))
    }

    /// This value as a signed integer leaf.
    ///
    /// # Errors
    /// Returns [`Error::Malformed`] if the value is not a JSON integer.
    pub fn as_i64(&self) -> Result<i64> {
        self.root
            .as_i64()
            .ok_or_else(|| Error::Malformed(format!("expected an integer, found {}", kind_name(self.root))))
    }

    /// This value as an array of sub-bridges.
    ///
    /// # Errors
    /// Returns [`Error::Malformed`] if the value is not a JSON array.
    pub fn as_array(&self) -> Result<Vec<JsonBridge<'a>>> {
        self.root
            .as_array()
            .ok_or_else(|| Error::Malformed(format!("expected an array, found {}", kind_name(self.root))))
            .map(|items| items.iter().map(JsonBridge::new).collect())
    }

    /// This value's object entries as `(key, sub-bridge)` pairs, in
    /// insertion order. The workspace enables `serde_json`'s
    /// `preserve_order` feature so that this holds; the enum-mapping and
    /// compound-field emit/parse paths both depend on it to round-trip
    /// member order.
    ///
    /// # Errors
    /// Returns [`Error::Malformed`] if the value is not a JSON object.
    pub fn as_object(&self) -> Result<Vec<(&'a str, JsonBridge<'a>)>> {
        self.root
            .as_object()
            .ok_or_else(|| Error::Malformed(format!("expected an object, found {}", kind_name(self.root))))
            .map(|map| map.iter().map(|(k, v)| (k.as_str(), JsonBridge::new(v))).collect())
    }

    /// The raw underlying value, for callers (such as the type codec) that
    /// need to match on its shape directly rather than through a typed
    /// accessor.
    #[must_use]
    pub fn raw(&self) -> &'a Value {
        self.root
    }
}

fn kind_name(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
