// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! The in-memory object reference and its fixed-stride wire encoding.
//!
//! The wire form itself (`"<prefix>/<uri>"` packed into a 48-byte,
//! NUL-padded slot) is owned by this crate because `Datatype::packed_size`
//! needs to know the stride of a `Reference` column without depending on
//! the wire crate. `h5vol-wire::refs` drives these functions over whole
//! arrays; this module only knows about one reference at a time.

use crate::error::{Error, Result};

/// The fixed on-wire width of one encoded object reference, in bytes.
pub const WIRE_STRIDE: usize = 48;

/// What kind of object a reference targets.
///
/// `Invalid` is never produced by [`ObjectReference::object`] — it only
/// arises from decoding an all-zero wire slot, which the source documents
/// as the empty/unset reference rather than a decode error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetType {
    Group,
    Dataset,
    Datatype,
    Invalid,
}

impl TargetType {
    fn prefix(self) -> &'static str {
        match self {
            TargetType::Group => "groups",
            TargetType::Dataset => "datasets",
            TargetType::Datatype => "datatypes",
            TargetType::Invalid => "",
        }
    }

    /// Infers a target type from the leading character of a URI, per the
    /// `g`/`t`/`d` convention used when decoding references read off the
    /// wire.
    fn from_uri_leading_char(c: char) -> Option<Self> {
        match c {
            'g' => Some(TargetType::Group),
            't' => Some(TargetType::Datatype),
            'd' => Some(TargetType::Dataset),
            _ => None,
        }
    }

    /// The leading character a URI of this target type must carry, so
    /// `decode` can infer it back. `Invalid` has none.
    fn leading_char(self) -> Option<char> {
        match self {
            TargetType::Group => Some('g'),
            TargetType::Dataset => Some('d'),
            TargetType::Datatype => Some('t'),
            TargetType::Invalid => None,
        }
    }
}

/// An object (or, for round-tripping server responses, region) reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectReference {
    pub kind: crate::datatype::RefKind,
    pub target_type: TargetType,
    pub uri: String,
}

impl ObjectReference {
    /// Builds a client-constructible object reference (never a region
    /// reference — see the datatype model's notes on why those cannot
    /// currently be constructed here).
    #[must_use]
    pub fn object(target_type: TargetType, uri: impl Into<String>) -> Self {
        ObjectReference {
            kind: crate::datatype::RefKind::ObjectRef,
            target_type,
            uri: uri.into(),
        }
    }

    /// False for a reference decoded from an all-zero wire slot.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.target_type != TargetType::Invalid
    }

    /// Encodes this reference into its 48-byte wire slot: `"<prefix>/<uri>"`
    /// NUL-padded to [`WIRE_STRIDE`]. Residual bytes beyond the terminator
    /// are left zeroed (the server is documented to tolerate indeterminate
    /// residue, but a fresh zero-filled buffer is simpler and no less
    /// correct to produce).
    ///
    /// # Errors
    /// Returns [`Error::InvalidArgument`] if `"<prefix>/<uri>"` plus its NUL
    /// terminator would not fit in [`WIRE_STRIDE`] bytes, or if the URI's
    /// leading character does not match `target_type` (it would not decode
    /// back to the same target type it was built with).
    pub fn encode(&self) -> Result<[u8; WIRE_STRIDE]> {
        if self.target_type == TargetType::Invalid {
            return Err(Error::InvalidArgument(
                "an invalid/empty object reference cannot be encoded".into(),
            ));
        }
        let expected = self.target_type.leading_char();
        if self.uri.chars().next() != expected {
            return Err(Error::InvalidArgument(format!(
                "object reference URI \"{}\" must start with '{}' to match its target type",
                self.uri,
                expected.unwrap_or('?')
            )));
        }
        let text = format!("{}/{}", self.target_type.prefix(), self.uri);
        if text.len() + 1 > WIRE_STRIDE {
            return Err(Error::InvalidArgument(format!(
                "object reference \"{text}\" does not fit in a {WIRE_STRIDE}-byte slot"
            )));
        }
        let mut slot = [0u8; WIRE_STRIDE];
        slot[..text.len()].copy_from_slice(text.as_bytes());
        Ok(slot)
    }

    /// Decodes one 48-byte wire slot back into a reference. `kind` is
    /// always set to `ObjectRef`, matching the read-side rule that decoded
    /// references are always reported as object references regardless of
    /// what a server might have written.
    ///
    /// # Errors
    /// Returns [`Error::Malformed`] if the slot has no `/` separator, and
    /// [`Error::UnsupportedDatatype`] if the URI's leading character does
    /// not identify a known target type.
    pub fn decode(slot: &[u8; WIRE_STRIDE]) -> Result<Self> {
        let text_len = slot.iter().position(|&b| b == 0).unwrap_or(WIRE_STRIDE);
        if text_len == 0 {
            return Ok(ObjectReference {
                kind: crate::datatype::RefKind::ObjectRef,
                target_type: TargetType::Invalid,
                uri: String::new(),
            });
        }
        let text = std::str::from_utf8(&slot[..text_len])
            .map_err(|e| Error::Malformed(format!("object reference slot is not UTF-8: {e}")))?;
        let slash = text
            .find('/')
            .ok_or_else(|| Error::Malformed(format!("object reference \"{text}\" has no prefix separator")))?;
        let uri = &text[slash + 1..];
        let leading = uri.chars().next().ok_or_else(|| {
            Error::Malformed(format!("object reference \"{text}\" has an empty URI"))
        })?;
        let target_type = TargetType::from_uri_leading_char(leading).ok_or_else(|| {
            Error::UnsupportedDatatype(format!(
                "object reference URI \"{uri}\" does not identify a known target type"
            ))
        })?;
        Ok(ObjectReference {
            kind: crate::datatype::RefKind::ObjectRef,
            target_type,
            uri: uri.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn round_trips_through_wire_slot() {
        let r = ObjectReference::object(TargetType::Dataset, "d-abc123");
        let slot = r.encode().unwrap();
        let decoded = ObjectReference::decode(&slot).unwrap();
        assert_eq!(decoded, r);
    }

    #[test]
    fn prefix_matches_target_type() {
        let r = ObjectReference::object(TargetType::Group, "g-1");
        let slot = r.encode().unwrap();
        let text_len = slot.iter().position(|&b| b == 0).unwrap();
        assert_eq!(std::str::from_utf8(&slot[..text_len]).unwrap(), "groups/g-1");
    }

    #[test]
    fn decode_infers_target_type_from_leading_char() {
        let mut slot = [0u8; WIRE_STRIDE];
        slot[..10].copy_from_slice(b"datasets/d");
        let r = ObjectReference::decode(&slot).unwrap();
        assert_eq!(r.target_type, TargetType::Dataset);
    }

    #[test]
    fn encode_rejects_oversized_uri() {
        let r = ObjectReference::object(TargetType::Datatype, format!("t{}", "x".repeat(60)));
        assert!(r.encode().is_err());
    }

    #[test]
    fn encode_rejects_uri_mismatched_with_target_type() {
        let r = ObjectReference::object(TargetType::Dataset, "g-not-a-dataset");
        assert!(matches!(r.encode(), Err(Error::InvalidArgument(_))));
    }

    #[test]
    fn decode_rejects_missing_separator() {
        let mut slot = [0u8; WIRE_STRIDE];
        slot[..7].copy_from_slice(b"no-sep!");
        assert!(ObjectReference::decode(&slot).is_err());
    }

    #[test]
    fn all_zero_slot_decodes_to_invalid_not_an_error() {
        let slot = [0u8; WIRE_STRIDE];
        let r = ObjectReference::decode(&slot).unwrap();
        assert!(!r.is_valid());
        assert_eq!(r.target_type, TargetType::Invalid);
        assert!(r.encode().is_err());
    }

    fn leading_char(target_type: TargetType) -> char {
        match target_type {
            TargetType::Group => 'g',
            TargetType::Dataset => 'd',
            TargetType::Datatype => 't',
            TargetType::Invalid => unreachable!(),
        }
    }

    proptest! {
        #[test]
        fn encode_decode_round_trips_for_any_fitting_uri(
            target_type in prop_oneof![Just(TargetType::Group), Just(TargetType::Dataset), Just(TargetType::Datatype)],
            suffix in "[a-z0-9]{1,30}",
        ) {
            let uri = format!("{}{suffix}", leading_char(target_type));
            let r = ObjectReference::object(target_type, uri);
            let slot = r.encode().unwrap();
            prop_assert_eq!(ObjectReference::decode(&slot).unwrap(), r);
        }
    }
}
