// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! The in-memory datatype model.
//!
//! This is the sum type the type codec (in `h5vol-wire`) translates to and
//! from the wire JSON representation. Constructors here enforce the
//! invariants of the model itself (packed compound offsets, array base
//! restrictions, recursion depth); the wire format is entirely the wire
//! crate's concern.

use crate::error::{Error, Result};

/// Maximum nesting depth a datatype may reach, counting the outermost type
/// as depth 0. Shared by the generator used in tests and by the type codec's
/// parser, which refuses to recurse past this depth.
pub const RECURSION_MAX_DEPTH: usize = 3;

/// A single member of a [`Datatype::Compound`].
#[derive(Debug, Clone, PartialEq)]
pub struct CompoundMember {
    pub name: String,
    /// Byte offset within the compound, computed as the prefix sum of the
    /// packed sizes of the preceding members.
    pub offset: usize,
    pub ty: Box<Datatype>,
}

/// One name/value pair of an [`Datatype::Enum`] mapping.
#[derive(Debug, Clone, PartialEq)]
pub struct EnumMember {
    pub name: String,
    pub value: i64,
}

/// Fixed vs. variable-length string sizing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StringLength {
    Fixed(u32),
    Variable,
}

/// String null padding/termination. Fixed strings always use `NullPad`;
/// variable-length strings always use `NullTerm` — the type codec enforces
/// this pairing rather than accepting both combinations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrPad {
    NullPad,
    NullTerm,
}

/// Object vs. region reference. Region references are representable here
/// (so a server response naming one round-trips structurally) but cannot be
/// constructed client-side; see [`Datatype::reference`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefKind {
    ObjectRef,
    RegionRef,
}

/// The in-memory datatype sum type (spec data model §3).
#[derive(Debug, Clone, PartialEq)]
pub enum Datatype {
    Integer {
        size_in_bytes: u8,
        signed: bool,
        little_endian: bool,
    },
    Float {
        size_in_bytes: u8,
        little_endian: bool,
    },
    String {
        length: StringLength,
        pad: StrPad,
    },
    Compound {
        members: Vec<CompoundMember>,
    },
    Enum {
        base: Box<Datatype>,
        mapping: Vec<EnumMember>,
    },
    Array {
        base: Box<Datatype>,
        dims: Vec<u64>,
    },
    Reference {
        kind: RefKind,
    },
    /// A leaf referencing a named (committed) server-side type by URI.
    /// Resolution of what it actually names is lazy and happens only when
    /// the type codec emits/parses it against a live object locator.
    Committed {
        uri: String,
    },
}

impl Datatype {
    /// A native signed 32-bit little-endian integer — the type used by
    /// every "native int" scenario in the test suite.
    #[must_use]
    pub fn i32() -> Self {
        Datatype::Integer {
            size_in_bytes: 4,
            signed: true,
            little_endian: cfg!(target_endian = "little"),
        }
    }

    /// A native IEEE-754 double.
    #[must_use]
    pub fn f64() -> Self {
        Datatype::Float {
            size_in_bytes: 8,
            little_endian: cfg!(target_endian = "little"),
        }
    }

    /// A fixed-length ASCII string of `len` bytes, null-padded.
    #[must_use]
    pub fn fixed_string(len: u32) -> Self {
        Datatype::String {
            length: StringLength::Fixed(len),
            pad: StrPad::NullPad,
        }
    }

    /// A variable-length ASCII string, null-terminated.
    #[must_use]
    pub fn variable_string() -> Self {
        Datatype::String {
            length: StringLength::Variable,
            pad: StrPad::NullTerm,
        }
    }

    /// Builds a compound type from ordered `(name, type)` pairs, computing
    /// each member's packed offset as the prefix sum of the preceding
    /// members' sizes.
    ///
    /// # Errors
    /// Returns [`Error::InvalidArgument`] if `fields` is empty or any member
    /// type's size cannot be determined (e.g. it contains a variable-length
    /// string, which has no fixed packed size).
    pub fn compound(fields: Vec<(String, Datatype)>) -> Result<Self> {
        if fields.is_empty() {
            return Err(Error::InvalidArgument(
                "compound datatype must have at least one member".into(),
            ));
        }
        let mut members = Vec::with_capacity(fields.len());
        let mut offset = 0usize;
        for (name, ty) in fields {
            let size = ty.packed_size()?;
            members.push(CompoundMember {
                name,
                offset,
                ty: Box::new(ty),
            });
            offset += size;
        }
        Ok(Datatype::Compound { members })
    }

    /// Builds an enum type over an integer base.
    ///
    /// # Errors
    /// Returns [`Error::InvalidArgument`] if `base` is not an `Integer`.
    pub fn enum_type(base: Datatype, mapping: Vec<EnumMember>) -> Result<Self> {
        if !matches!(base, Datatype::Integer { .. }) {
            return Err(Error::InvalidArgument(
                "enum base type must be an integer".into(),
            ));
        }
        Ok(Datatype::Enum {
            base: Box::new(base),
            mapping,
        })
    }

    /// Builds an array type, rejecting base classes that cannot be array
    /// elements (spec data model invariant: base ∉ {Array, Compound,
    /// Reference, Enum}; the C source's additional restrictions on
    /// Vlen/Time/Bitfield/Opaque are moot here since this model has no such
    /// variants).
    ///
    /// # Errors
    /// Returns [`Error::InvalidArgument`] if `dims` is empty, any extent is
    /// zero, or `base` is a disallowed class.
    pub fn array(base: Datatype, dims: Vec<u64>) -> Result<Self> {
        if dims.is_empty() || dims.iter().any(|&d| d == 0) {
            return Err(Error::InvalidArgument(
                "array dimensions must be non-empty and positive".into(),
            ));
        }
        match &base {
            Datatype::Array { .. } | Datatype::Compound { .. } | Datatype::Reference { .. }
            | Datatype::Enum { .. } => {
                return Err(Error::InvalidArgument(format!(
                    "array base class {:?} is not permitted",
                    base.class_name()
                )));
            }
            _ => {}
        }
        Ok(Datatype::Array {
            base: Box::new(base),
            dims,
        })
    }

    /// Builds a reference type. Region references can only arise from
    /// parsing a server response (see the type codec); client code
    /// constructing one from scratch gets object references only, matching
    /// the "cannot currently be created from the client" restriction.
    #[must_use]
    pub fn object_reference() -> Self {
        Datatype::Reference { kind: RefKind::ObjectRef }
    }

    /// A leaf referencing a committed (named) type by URI.
    #[must_use]
    pub fn committed(uri: impl Into<String>) -> Self {
        Datatype::Committed { uri: uri.into() }
    }

    /// A short label for this type's class, used in error messages.
    #[must_use]
    pub fn class_name(&self) -> &'static str {
        match self {
            Datatype::Integer { .. } => "Integer",
            Datatype::Float { .. } => "Float",
            Datatype::String { .. } => "String",
            Datatype::Compound { .. } => "Compound",
            Datatype::Enum { .. } => "Enum",
            Datatype::Array { .. } => "Array",
            Datatype::Reference { .. } => "Reference",
            Datatype::Committed { .. } => "Committed",
        }
    }

    /// The packed, in-memory size in bytes of one instance of this type,
    /// when that size is fixed. Variable-length strings and committed types
    /// (whose target is not locally known) have no fixed size.
    ///
    /// # Errors
    /// Returns [`Error::InvalidArgument`] for variable-length strings and
    /// committed-type leaves.
    pub fn packed_size(&self) -> Result<usize> {
        match self {
            Datatype::Integer { size_in_bytes, .. } | Datatype::Float { size_in_bytes, .. } => {
                Ok(*size_in_bytes as usize)
            }
            Datatype::String {
                length: StringLength::Fixed(n),
                ..
            } => Ok(*n as usize),
            Datatype::String {
                length: StringLength::Variable,
                ..
            } => Err(Error::InvalidArgument(
                "variable-length strings have no fixed packed size".into(),
            )),
            Datatype::Compound { members } => members
                .last()
                .map(|m| Ok(m.offset + m.ty.packed_size()?))
                .unwrap_or(Ok(0)),
            Datatype::Enum { base, .. } => base.packed_size(),
            Datatype::Array { base, dims } => {
                let elems: u64 = dims.iter().product();
                Ok(base.packed_size()? * elems as usize)
            }
            Datatype::Reference { .. } => Ok(crate::object_ref::WIRE_STRIDE),
            Datatype::Committed { .. } => Err(Error::InvalidArgument(
                "packed size of a committed type is not known locally".into(),
            )),
        }
    }

    /// True for any type whose wire transfer is fixed-length binary —
    /// i.e. everything except variable-length strings. The I/O dispatcher
    /// uses this to choose between the binary and JSON wire formats.
    #[must_use]
    pub fn is_fixed_length(&self) -> bool {
        !matches!(
            self,
            Datatype::String {
                length: StringLength::Variable,
                ..
            }
        )
    }

    /// Recursion depth of this type, counting the type itself as depth 0.
    /// Used by tests and by any caller that wants to validate a
    /// caller-constructed type against [`RECURSION_MAX_DEPTH`] before
    /// handing it to the wire codec.
    #[must_use]
    pub fn depth(&self) -> usize {
        match self {
            Datatype::Enum { base, .. } => 1 + base.depth(),
            Datatype::Array { base, .. } => 1 + base.depth(),
            Datatype::Compound { members } => {
                1 + members.iter().map(|m| m.ty.depth()).max().unwrap_or(0)
            }
            _ => 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compound_offsets_are_prefix_sums() {
        let c = Datatype::compound(vec![
            ("a".into(), Datatype::i32()),
            ("b".into(), Datatype::f64()),
            ("c".into(), Datatype::fixed_string(16)),
        ])
        .unwrap();
        let Datatype::Compound { members } = c else {
            panic!("expected compound");
        };
        assert_eq!(members[0].offset, 0);
        assert_eq!(members[1].offset, 4);
        assert_eq!(members[2].offset, 12);
    }

    #[test]
    fn compound_size_is_sum_of_members() {
        let c = Datatype::compound(vec![
            ("a".into(), Datatype::i32()),
            ("b".into(), Datatype::f64()),
        ])
        .unwrap();
        assert_eq!(c.packed_size().unwrap(), 12);
    }

    #[test]
    fn array_rejects_disallowed_base_classes() {
        let nested = Datatype::array(Datatype::i32(), vec![2]).unwrap();
        assert!(Datatype::array(nested, vec![3]).is_err());

        let compound = Datatype::compound(vec![("a".into(), Datatype::i32())]).unwrap();
        assert!(Datatype::array(compound, vec![3]).is_err());
    }

    #[test]
    fn array_of_rank_with_singleton_dims() {
        let a = Datatype::array(Datatype::i32(), vec![1, 1, 1]).unwrap();
        let Datatype::Array { dims, .. } = a else {
            panic!("expected array");
        };
        assert_eq!(dims, vec![1, 1, 1]);
    }

    #[test]
    fn enum_requires_integer_base() {
        assert!(Datatype::enum_type(Datatype::f64(), vec![]).is_err());
        assert!(Datatype::enum_type(
            Datatype::i32(),
            vec![EnumMember {
                name: "RED".into(),
                value: 0
            }]
        )
        .is_ok());
    }

    #[test]
    fn depth_counts_nesting() {
        let scalar = Datatype::i32();
        assert_eq!(scalar.depth(), 0);

        let arr = Datatype::array(scalar, vec![4]).unwrap();
        assert_eq!(arr.depth(), 1);

        let wrapped = Datatype::compound(vec![("field".into(), arr)]).unwrap();
        assert_eq!(wrapped.depth(), 2);
    }

    #[test]
    fn fixed_length_excludes_only_variable_strings() {
        assert!(Datatype::i32().is_fixed_length());
        assert!(Datatype::fixed_string(8).is_fixed_length());
        assert!(!Datatype::variable_string().is_fixed_length());
    }
}
