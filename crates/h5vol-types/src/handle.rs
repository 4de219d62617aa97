// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! The in-memory object handle: the tagged record every façade operation
//! takes and returns.
//!
//! Handles never talk to the server themselves; they are pure local state,
//! mutated only by their owning operation and closed only by an explicit,
//! network-silent `close`. `h5vol-client` is the crate that actually drives
//! handles through the dispatcher/locator; this module owns only the
//! record shape and its variant-specific fields.

use std::rc::{Rc, Weak};

use crate::dataspace::Dataspace;
use crate::datatype::Datatype;
use crate::properties::CreationProperties;

/// Whether a file was opened for reading only or for reading and writing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileIntent {
    ReadOnly,
    ReadWrite,
}

/// Variant-specific state for a [`Handle`], one arm per object kind.
#[derive(Debug, Clone)]
pub enum HandleKind {
    File {
        filepath: String,
        intent: FileIntent,
        creation_properties: CreationProperties,
    },
    Group {
        creation_properties: CreationProperties,
    },
    Dataset {
        datatype: Datatype,
        dataspace: Dataspace,
        creation_properties: CreationProperties,
    },
    Datatype {
        datatype: Datatype,
        creation_properties: CreationProperties,
    },
    Attribute {
        name: String,
        datatype: Datatype,
        dataspace: Dataspace,
        creation_properties: CreationProperties,
    },
}

impl HandleKind {
    /// A short label for this handle's kind, used in error messages and
    /// logging.
    #[must_use]
    pub fn kind_name(&self) -> &'static str {
        match self {
            HandleKind::File { .. } => "File",
            HandleKind::Group { .. } => "Group",
            HandleKind::Dataset { .. } => "Dataset",
            HandleKind::Datatype { .. } => "Datatype",
            HandleKind::Attribute { .. } => "Attribute",
        }
    }
}

/// A live handle to a server-side object.
///
/// Non-file handles hold a non-owning (`Weak`) back-reference to their
/// enclosing file handle: the file's lifetime must strictly cover the
/// handle's without the handle owning it; a file handle's own `file` field
/// points to itself. `h5vol-client` owns the `Rc` that keeps the file alive
/// for as long as any handle borrows it.
#[derive(Debug, Clone)]
pub struct Handle {
    pub uri: String,
    file: Weak<Handle>,
    pub kind: HandleKind,
}

impl Handle {
    /// Constructs a file handle. `Rc::new_cyclic` lets the file's own
    /// `file` back-reference point at the `Rc` being constructed, since a
    /// file handle's enclosing file is itself.
    #[must_use]
    pub fn new_file(uri: impl Into<String>, filepath: impl Into<String>, intent: FileIntent, creation_properties: CreationProperties) -> Rc<Handle> {
        Rc::new_cyclic(|weak_self| Handle {
            uri: uri.into(),
            file: weak_self.clone(),
            kind: HandleKind::File {
                filepath: filepath.into(),
                intent,
                creation_properties,
            },
        })
    }

    /// Constructs a non-file handle under the given file.
    #[must_use]
    pub fn new_child(uri: impl Into<String>, file: &Rc<Handle>, kind: HandleKind) -> Handle {
        Handle {
            uri: uri.into(),
            file: Rc::downgrade(file),
            kind,
        }
    }

    /// Borrows the enclosing file handle, if it is still alive.
    ///
    /// Returns `None` only if the owning `Rc<Handle>` for the file has
    /// already been dropped while a non-file handle derived from it still
    /// exists — a caller bug this crate does not attempt to prevent at
    /// compile time; the file's lifetime strictly covering the handle's is
    /// a caller obligation, not an enforced one.
    #[must_use]
    pub fn file(&self) -> Option<Rc<Handle>> {
        self.file.upgrade()
    }

    /// True if this handle is itself the file variant.
    #[must_use]
    pub fn is_file(&self) -> bool {
        matches!(self.kind, HandleKind::File { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_handle_is_its_own_file() {
        let f = Handle::new_file("f-1", "/tmp/x.h5", FileIntent::ReadWrite, CreationProperties::default());
        assert!(f.is_file());
        let back = f.file().unwrap();
        assert_eq!(back.uri, "f-1");
    }

    #[test]
    fn child_handle_borrows_file() {
        let f = Handle::new_file("f-1", "/tmp/x.h5", FileIntent::ReadOnly, CreationProperties::default());
        let g = Handle::new_child(
            "g-1",
            &f,
            HandleKind::Group {
                creation_properties: CreationProperties::default(),
            },
        );
        assert!(!g.is_file());
        assert_eq!(g.file().unwrap().uri, "f-1");
    }

    #[test]
    fn child_handle_loses_file_once_dropped() {
        let g = {
            let f = Handle::new_file("f-1", "/tmp/x.h5", FileIntent::ReadOnly, CreationProperties::default());
            Handle::new_child(
                "g-1",
                &f,
                HandleKind::Group {
                    creation_properties: CreationProperties::default(),
                },
            )
        };
        assert!(g.file().is_none());
    }
}
