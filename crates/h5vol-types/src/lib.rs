// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! In-memory data model for the HDF5 REST storage adapter core.
//!
//! This crate has no network or JSON awareness of its own — it owns the
//! object handle, datatype, dataspace, selection, object-reference, and
//! creation-properties types, plus the invariants the construction
//! functions enforce. Wire translation lives in `h5vol-wire`; dispatch and
//! transport live in `h5vol-client`.

pub mod datatype;
pub mod dataspace;
pub mod error;
pub mod handle;
pub mod object_ref;
pub mod properties;
pub mod selection;

pub use datatype::Datatype;
pub use dataspace::Dataspace;
pub use error::{Error, Result};
pub use handle::{FileIntent, Handle, HandleKind};
pub use object_ref::ObjectReference;
pub use properties::CreationProperties;
pub use selection::Selection;
