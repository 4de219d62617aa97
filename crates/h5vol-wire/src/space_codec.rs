// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Bidirectional translation between [`Dataspace`]/[`Selection`] and their
//! wire forms: a `shape`/`maxdims` JSON pair for dataspaces, and two
//! distinct selection encodings — a URL-parameter form for binary
//! transfers and a JSON-body form for JSON transfers.

use h5vol_types::dataspace::{Dataspace, MaxExtent};
use h5vol_types::error::{Error, Result};
use h5vol_types::selection::{Hyperslab, Points, Selection};
use serde_json::{json, Value};

use crate::json_bridge::JsonBridge;

/// Emits a dataspace's `shape` (and, when needed, `maxdims`) wire fields as
/// `(key, value)` pairs ready to splice into a request body. `Scalar`
/// yields no pairs at all, matching the "absence of a shape implies
/// scalar" rule.
#[must_use]
pub fn emit_shape(space: &Dataspace) -> Vec<(&'static str, Value)> {
    match space {
        Dataspace::Null => vec![("shape", Value::String("H5S_NULL".into()))],
        Dataspace::Scalar => vec![],
        Dataspace::Simple { dims, maxdims } => {
            let mut out = vec![("shape", json!(dims))];
            let differs = dims
                .iter()
                .zip(maxdims.iter())
                .any(|(&d, &m)| !matches!(m, MaxExtent::Bounded(b) if b == d));
            if differs {
                let encoded: Vec<u64> = maxdims
                    .iter()
                    .map(|m| match m {
                        MaxExtent::Bounded(b) => *b,
                        MaxExtent::Unlimited => 0,
                    })
                    .collect();
                out.push(("maxdims", json!(encoded)));
            }
            out
        }
    }
}

/// Parses a dataspace from a response body's `shape` (and optional
/// `maxdims`) fields. Absence of `shape` is read as `Scalar`.
///
/// # Errors
/// Returns [`Error::Malformed`] if `shape` is present but neither the
/// `"H5S_NULL"` literal nor an array, or if `maxdims`'s rank does not match
/// `shape`'s.
pub fn parse_shape(body: &JsonBridge<'_>) -> Result<Dataspace> {
    let Some(shape) = body.field("shape") else {
        return Ok(Dataspace::Scalar);
    };
    if let Ok(s) = shape.as_str() {
        if s == "H5S_NULL" {
            return Ok(Dataspace::Null);
        }
        return Err(Error::Malformed(format!("unrecognized shape class \"{s}\"")));
    }
    let dims = shape.as_array()?.iter().map(JsonBridge::as_u64).collect::<Result<Vec<_>>>()?;
    let maxdims = match body.field("maxdims") {
        Some(m) => {
            let raw = m.as_array()?.iter().map(JsonBridge::as_u64).collect::<Result<Vec<_>>>()?;
            if raw.len() != dims.len() {
                return Err(Error::Malformed(format!(
                    "maxdims has rank {} but shape has rank {}",
                    raw.len(),
                    dims.len()
                )));
            }
            raw.into_iter()
                .map(|v| if v == 0 { MaxExtent::Unlimited } else { MaxExtent::Bounded(v) })
                .collect()
        }
        None => dims.iter().map(|&d| MaxExtent::Bounded(d)).collect(),
    };
    Ok(Dataspace::Simple { dims, maxdims })
}

/// Emits a selection's URL-parameter form: `[a:b:s, ...]` for a regular
/// hyperslab, or the empty string for `All`/`None`.
///
/// # Errors
/// Returns [`Error::UnsupportedSelection`] for a point selection, which
/// this wire form cannot express.
pub fn emit_selection_url_param(sel: &Selection) -> Result<String> {
    match sel {
        Selection::All | Selection::None => Ok(String::new()),
        Selection::Hyperslab(h) => {
            let stop = h.stop();
            let parts: Vec<String> = h
                .start
                .iter()
                .zip(stop.iter())
                .zip(h.stride.iter())
                .map(|((a, b), s)| format!("{a}:{b}:{s}"))
                .collect();
            Ok(format!("[{}]", parts.join(",")))
        }
        Selection::Points(_) => Err(Error::UnsupportedSelection(
            "point selections cannot be expressed in the URL-parameter form".into(),
        )),
    }
}

/// Emits a selection's JSON-body form.
///
/// Hyperslab emits `"start"`/`"stop"`/`"step"`; points emits `"points"`
/// (a flat array for rank 1, an array of coordinate arrays otherwise).
/// `All`/`None` have no JSON-body representation — callers select the
/// whole dataspace by omitting a selection body entirely.
#[must_use]
pub fn emit_selection_json_body(sel: &Selection) -> Option<Value> {
    match sel {
        Selection::All | Selection::None => None,
        Selection::Hyperslab(h) => Some(json!({
            "start": h.start,
            "stop": h.stop(),
            "step": h.stride,
        })),
        Selection::Points(p) => {
            if p.coords.first().map(Vec::len) == Some(1) {
                let flat: Vec<u64> = p.coords.iter().map(|c| c[0]).collect();
                Some(json!({ "points": flat }))
            } else {
                Some(json!({ "points": p.coords }))
            }
        }
    }
}

/// Parses a selection from a request's JSON body (the POST point-selection
/// path, or a hyperslab re-expressed as JSON).
///
/// # Errors
/// Returns [`Error::Malformed`] if neither `points` nor a complete
/// `start`/`stop`/`step` triple is present, or their shapes disagree.
pub fn parse_selection_json_body(body: &JsonBridge<'_>) -> Result<Selection> {
    if let Some(points) = body.field("points") {
        let raw = points.as_array()?;
        let is_flat = raw.first().map(|v| v.as_u64().is_ok()).unwrap_or(false);
        let coords = if is_flat {
            raw.iter().map(|v| Ok(vec![v.as_u64()?])).collect::<Result<Vec<_>>>()?
        } else {
            raw.iter()
                .map(|p| p.as_array()?.iter().map(JsonBridge::as_u64).collect::<Result<Vec<_>>>())
                .collect::<Result<Vec<_>>>()?
        };
        return Ok(Selection::Points(Points::new(coords)?));
    }
    let start = body.require_field("start")?.as_array()?.iter().map(JsonBridge::as_u64).collect::<Result<Vec<_>>>()?;
    let stop = body.require_field("stop")?.as_array()?.iter().map(JsonBridge::as_u64).collect::<Result<Vec<_>>>()?;
    let step = body.require_field("step")?.as_array()?.iter().map(JsonBridge::as_u64).collect::<Result<Vec<_>>>()?;
    if start.len() != stop.len() || start.len() != step.len() {
        return Err(Error::Malformed("start/stop/step must share one rank".into()));
    }
    let count = start
        .iter()
        .zip(stop.iter())
        .zip(step.iter())
        .map(|((&a, &b), &s)| (b - a) / s)
        .collect();
    let block = vec![1; start.len()];
    Ok(Selection::Hyperslab(Hyperslab::new(start, step, count, block)?))
}
