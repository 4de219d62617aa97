// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! The in-memory selection model: which elements of a dataspace a read or
//! write touches.
//!
//! Only regular hyperslabs are supported; the wire encodings
//! (URL-parameter form for binary transfers, JSON-body form for JSON
//! transfers) live in `h5vol-wire::space_codec`.

use crate::error::{Error, Result};

/// A regular hyperslab: four per-dimension parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hyperslab {
    pub start: Vec<u64>,
    pub stride: Vec<u64>,
    pub count: Vec<u64>,
    pub block: Vec<u64>,
}

impl Hyperslab {
    /// Builds a hyperslab, checking that all four vectors share one rank
    /// and that no stride is zero (a zero stride has no well-defined
    /// "stop" and cannot be emitted on either wire form).
    ///
    /// # Errors
    /// Returns [`Error::InvalidArgument`] on a rank mismatch or a zero
    /// stride.
    pub fn new(start: Vec<u64>, stride: Vec<u64>, count: Vec<u64>, block: Vec<u64>) -> Result<Self> {
        let rank = start.len();
        if stride.len() != rank || count.len() != rank || block.len() != rank {
            return Err(Error::InvalidArgument(
                "hyperslab start/stride/count/block must all share one rank".into(),
            ));
        }
        if stride.iter().any(|&s| s == 0) {
            return Err(Error::InvalidArgument(
                "hyperslab stride must be non-zero in every dimension".into(),
            ));
        }
        Ok(Hyperslab {
            start,
            stride,
            count,
            block,
        })
    }

    /// The exclusive per-dimension stop coordinate: `start + stride * count`,
    /// the quantity both wire forms derive their bound from.
    #[must_use]
    pub fn stop(&self) -> Vec<u64> {
        self.start
            .iter()
            .zip(self.stride.iter())
            .zip(self.count.iter())
            .map(|((&a, &s), &c)| a + s * c)
            .collect()
    }

    /// Total number of selected elements (ignoring block size, which this
    /// model does not vary independently of count).
    #[must_use]
    pub fn selected_count(&self) -> u64 {
        self.count.iter().product()
    }
}

/// A point selection: an explicit list of coordinates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Points {
    pub coords: Vec<Vec<u64>>,
}

impl Points {
    /// Builds a point selection, checking that every coordinate shares one
    /// rank.
    ///
    /// # Errors
    /// Returns [`Error::InvalidArgument`] if `coords` is empty or its
    /// entries have inconsistent rank.
    pub fn new(coords: Vec<Vec<u64>>) -> Result<Self> {
        let Some(rank) = coords.first().map(Vec::len) else {
            return Err(Error::InvalidArgument(
                "a point selection must have at least one point".into(),
            ));
        };
        if coords.iter().any(|c| c.len() != rank) {
            return Err(Error::InvalidArgument(
                "all points in a point selection must share one rank".into(),
            ));
        }
        Ok(Points { coords })
    }
}

/// A selection against a dataspace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    /// The entire dataspace.
    All,
    /// No elements.
    None,
    Hyperslab(Hyperslab),
    Points(Points),
}

impl Selection {
    /// Whether this selection can be expressed in the URL-parameter wire
    /// form. Only regular hyperslabs (and the trivial `All`/`None`, which
    /// emit an empty parameter) can be; point selections require the
    /// JSON-body form and a POST.
    #[must_use]
    pub fn supports_url_param_form(&self) -> bool {
        !matches!(self, Selection::Points(_))
    }
}
