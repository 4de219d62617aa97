// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! The in-memory creation-properties model (the DCPL equivalent): the set
//! of options attached to a dataset or attribute at creation time.
//!
//! The wire encoding (the always-present `allocTime`, the conditional
//! sections, the filter/layout JSON shapes) lives in
//! `h5vol-wire::dcpl`; this module owns the option bundle itself and its
//! defaults.

use crate::error::{Error, Result};

/// When storage is allocated for a dataset's raw data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AllocTime {
    /// Emitted verbatim on the wire; servers may or may not resolve it to a
    /// layout-specific default.
    #[default]
    Default,
    Early,
    Incr,
    Late,
}

/// Whether attribute creation order is tracked on a group or dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttributeCreationOrder {
    Tracked,
    Indexed,
}

/// The compact/dense attribute storage phase-change thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttributePhaseChange {
    pub max_compact: u32,
    pub min_dense: u32,
}

impl Default for AttributePhaseChange {
    fn default() -> Self {
        AttributePhaseChange {
            max_compact: 8,
            min_dense: 6,
        }
    }
}

/// When the fill value is written to allocated storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FillTime {
    #[default]
    IfSet,
    Alloc,
    Never,
}

/// The fill value for unwritten elements.
///
/// Only the "defined but left as null" case is implemented; a concrete
/// byte-pattern fill value is representable (`Bytes`) so that a server
/// response carrying one round-trips, but this crate does not yet
/// construct one client-side — see the design notes this behavior was
/// decided against expanding for this pass.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum FillValue {
    #[default]
    Undefined,
    Bytes(Vec<u8>),
}

/// SZIP's coding mask. Per the design notes, only the two masks the
/// library actually documents are constructible; any other value observed
/// on the wire is rejected rather than silently coerced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SzipMask {
    EntropyCoding,
    NearestNeighbor,
}

/// One compression/transform filter in a filter pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Filter {
    Deflate { level: u8 },
    Shuffle,
    Fletcher32,
    Szip { pixels_per_block: u32, mask: SzipMask },
    NBit,
    ScaleOffset { scale_type: i32, scale_factor: i32 },
    Lzf,
    /// An opaque user-registered filter, identified by its filter id and
    /// carrying raw client-data parameters.
    User { filter_id: u32, client_data: Vec<u32> },
}

/// Storage layout. Virtual layout is rejected at construction time (an
/// `UnsupportedLayout` error); only these three classes are supported.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Layout {
    Compact,
    Contiguous,
    Chunked { dims: Vec<u64> },
}

/// The full creation-properties bundle. Every field has a default matching
/// the library's own defaults, so a bundle built with `Default::default()`
/// emits only the mandatory `allocTime` section on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CreationProperties {
    pub alloc_time: AllocTime,
    pub attribute_creation_order: Option<AttributeCreationOrder>,
    pub attribute_phase_change: Option<AttributePhaseChange>,
    pub fill_time: FillTime,
    pub fill_value: FillValue,
    pub filters: Vec<Filter>,
    pub layout: Option<Layout>,
    pub track_times: bool,
}

impl CreationProperties {
    /// Sets the storage layout, rejecting anything other than
    /// compact/contiguous/chunked (virtual layout has no representation in
    /// this model to begin with, so this only guards against a chunked
    /// layout with a malformed chunk shape).
    ///
    /// # Errors
    /// Returns [`Error::UnsupportedLayout`] if `layout` is `Chunked` with
    /// empty or zero-extent chunk dimensions.
    pub fn with_layout(mut self, layout: Layout) -> Result<Self> {
        if let Layout::Chunked { dims } = &layout {
            if dims.is_empty() || dims.iter().any(|&d| d == 0) {
                return Err(Error::UnsupportedLayout(
                    "chunked layout requires non-empty, positive chunk dimensions".into(),
                ));
            }
        }
        self.layout = Some(layout);
        Ok(self)
    }

    /// Appends a filter to the pipeline, in application order.
    #[must_use]
    pub fn with_filter(mut self, filter: Filter) -> Self {
        self.filters.push(filter);
        self
    }
}
