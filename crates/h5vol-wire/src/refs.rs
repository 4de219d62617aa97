// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! The Object Reference Codec: translates whole arrays of
//! [`ObjectReference`] to and from the flat 48-byte-stride binary buffer
//! the wire transfers as `Reference`-typed data.
//!
//! The single-reference encode/decode logic lives on
//! `h5vol_types::object_ref::ObjectReference` itself; this module only
//! drives it over a buffer.

use h5vol_types::error::{Error, Result};
use h5vol_types::object_ref::{ObjectReference, WIRE_STRIDE};

/// Encodes `refs` into a freshly allocated `n * 48`-byte buffer.
///
/// # Errors
/// Returns [`Error::InvalidArgument`] if any reference's encoded form does
/// not fit in its 48-byte slot.
pub fn to_wire(refs: &[ObjectReference]) -> Result<Vec<u8>> {
    let mut buf = Vec::with_capacity(refs.len() * WIRE_STRIDE);
    for r in refs {
        buf.extend_from_slice(&r.encode()?);
    }
    Ok(buf)
}

/// Decodes a flat buffer of 48-byte slots back into references.
///
/// # Errors
/// Returns [`Error::Malformed`] if `buf`'s length is not a multiple of 48,
/// or if any individual slot fails to decode (see
/// [`ObjectReference::decode`]).
pub fn from_wire(buf: &[u8]) -> Result<Vec<ObjectReference>> {
    if buf.len() % WIRE_STRIDE != 0 {
        return Err(Error::Malformed(format!(
            "reference buffer length {} is not a multiple of the {WIRE_STRIDE}-byte stride",
            buf.len()
        )));
    }
    buf.chunks_exact(WIRE_STRIDE)
        .map(|chunk| {
            let slot: &[u8; WIRE_STRIDE] = chunk.try_into().expect("chunks_exact guarantees exact length");
            ObjectReference::decode(slot)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use h5vol_types::object_ref::TargetType;

    #[test]
    fn array_round_trips() {
        let refs = vec![
            ObjectReference::object(TargetType::Group, "g-root"),
            ObjectReference::object(TargetType::Dataset, "d-1"),
            ObjectReference::object(TargetType::Datatype, "t-1"),
        ];
        let wire = to_wire(&refs).unwrap();
        assert_eq!(wire.len(), refs.len() * WIRE_STRIDE);
        let decoded = from_wire(&wire).unwrap();
        assert_eq!(decoded, refs);
    }

    #[test]
    fn misaligned_buffer_is_malformed() {
        let buf = vec![0u8; WIRE_STRIDE + 1];
        assert!(from_wire(&buf).is_err());
    }

    #[test]
    fn empty_buffer_is_empty_array() {
        assert!(from_wire(&[]).unwrap().is_empty());
    }
}
