// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! The in-memory dataspace model: the shape (and optional maximum extent)
//! of a dataset or attribute.
//!
//! The wire encoding of this model (the `"H5S_NULL"` literal, the `shape`/
//! `maxdims` JSON keys, the 0-as-unlimited sentinel) lives in
//! `h5vol-wire::space_codec`; this module only owns the in-memory shape and
//! its invariants.

use crate::error::{Error, Result};

/// A per-dimension maximum extent: either a concrete bound or unlimited.
/// The wire form of "unlimited" is the sentinel value 0, which this type
/// exists to keep out of the in-memory model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MaxExtent {
    Bounded(u64),
    Unlimited,
}

/// A dataspace: the shape class, plus current and maximum extents for the
/// `Simple` class.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dataspace {
    /// No elements and no rank.
    Null,
    /// A single element, rank 0.
    Scalar,
    /// An N-dimensional extent. `maxdims` is always the same length as
    /// `dims`; a per-dimension maximum equal to its current extent is the
    /// common case and is simply `MaxExtent::Bounded(dims[i])`.
    Simple {
        dims: Vec<u64>,
        maxdims: Vec<MaxExtent>,
    },
}

impl Dataspace {
    /// A `Simple` dataspace whose maximum extent equals its current extent
    /// in every dimension — the common fixed-size case.
    ///
    /// # Errors
    /// Returns [`Error::InvalidArgument`] if `dims` is empty.
    pub fn simple(dims: Vec<u64>) -> Result<Self> {
        if dims.is_empty() {
            return Err(Error::InvalidArgument(
                "a simple dataspace must have rank at least 1".into(),
            ));
        }
        let maxdims = dims.iter().map(|&d| MaxExtent::Bounded(d)).collect();
        Ok(Dataspace::Simple { dims, maxdims })
    }

    /// A `Simple` dataspace with an explicit, possibly-unlimited maximum
    /// extent per dimension.
    ///
    /// # Errors
    /// Returns [`Error::InvalidArgument`] if `dims` is empty, the two
    /// vectors differ in length, or any bounded maximum is smaller than the
    /// current extent in that dimension.
    pub fn simple_with_max(dims: Vec<u64>, maxdims: Vec<MaxExtent>) -> Result<Self> {
        if dims.is_empty() {
            return Err(Error::InvalidArgument(
                "a simple dataspace must have rank at least 1".into(),
            ));
        }
        if dims.len() != maxdims.len() {
            return Err(Error::InvalidArgument(format!(
                "dims has rank {} but maxdims has rank {}",
                dims.len(),
                maxdims.len()
            )));
        }
        for (i, (&d, &m)) in dims.iter().zip(maxdims.iter()).enumerate() {
            if let MaxExtent::Bounded(bound) = m {
                if bound < d {
                    return Err(Error::InvalidArgument(format!(
                        "dimension {i} has extent {d} exceeding its maximum {bound}"
                    )));
                }
            }
        }
        Ok(Dataspace::Simple { dims, maxdims })
    }

    /// The rank (number of dimensions), 0 for `Null` and `Scalar`.
    #[must_use]
    pub fn rank(&self) -> usize {
        match self {
            Dataspace::Null | Dataspace::Scalar => 0,
            Dataspace::Simple { dims, .. } => dims.len(),
        }
    }

    /// Total element count: 0 for `Null`, 1 for `Scalar`, product of
    /// current extents for `Simple`.
    #[must_use]
    pub fn element_count(&self) -> u64 {
        match self {
            Dataspace::Null => 0,
            Dataspace::Scalar => 1,
            Dataspace::Simple { dims, .. } => dims.iter().product(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn simple_defaults_max_to_current_extent() {
        let s = Dataspace::simple(vec![3, 4]).unwrap();
        let Dataspace::Simple { dims, maxdims } = &s else {
            panic!("expected simple");
        };
        assert_eq!(dims, &vec![3, 4]);
        assert_eq!(maxdims, &vec![MaxExtent::Bounded(3), MaxExtent::Bounded(4)]);
    }

    #[test]
    fn simple_with_max_allows_unlimited() {
        let s = Dataspace::simple_with_max(vec![3, 4], vec![MaxExtent::Unlimited, MaxExtent::Bounded(4)]).unwrap();
        assert_eq!(s.rank(), 2);
    }

    #[test]
    fn simple_with_max_rejects_extent_exceeding_bound() {
        assert!(Dataspace::simple_with_max(vec![10], vec![MaxExtent::Bounded(5)]).is_err());
    }

    #[test]
    fn element_counts() {
        assert_eq!(Dataspace::Null.element_count(), 0);
        assert_eq!(Dataspace::Scalar.element_count(), 1);
        assert_eq!(Dataspace::simple(vec![2, 3]).unwrap().element_count(), 6);
    }
}
