// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Bidirectional translation between [`Datatype`] and its wire JSON form.
//!
//! The parse direction works over a fully-parsed `serde_json::Value` tree
//! via [`JsonBridge`] rather than re-scanning raw text with a brace-depth
//! counter — see the crate-level design notes on why that is the chosen
//! direction for this component. Both directions enforce
//! `RECURSION_MAX_DEPTH`.

use h5vol_types::datatype::{Datatype, EnumMember, RefKind, StrPad, StringLength, RECURSION_MAX_DEPTH};
use h5vol_types::error::{Error, Result};
use serde_json::{json, Value};

use crate::json_bridge::JsonBridge;

/// Emits a datatype to its wire JSON form.
///
/// `committed_uri` supplies the URI to emit in place of the type when the
/// caller is encoding a committed-type leaf whose resolution requires a
/// framework-level handle lookup the codec itself has no access to; pass
/// `None` when emitting a type that is not `Datatype::Committed`, or when
/// the committed URI is already embedded in the `Datatype::Committed`
/// variant (the common case — see the first match arm).
///
/// # Errors
/// Returns [`Error::UnsupportedDatatype`] for a non-predefined integer/float
/// size ("implementation TODO" in the emit direction per the design this
/// was carried over from) and [`Error::Internal`] if `depth` exceeds
/// [`RECURSION_MAX_DEPTH`].
pub fn emit(ty: &Datatype, depth: usize) -> Result<Value> {
    if depth > RECURSION_MAX_DEPTH {
        return Err(Error::Internal(format!(
            "datatype recursion depth {depth} exceeds the configured maximum {RECURSION_MAX_DEPTH}"
        )));
    }
    match ty {
        Datatype::Committed { uri } => Ok(Value::String(uri.clone())),
        Datatype::Integer {
            size_in_bytes,
            signed,
            little_endian,
        } => {
            let base = predefined_integer_name(*size_in_bytes, *signed, *little_endian)?;
            Ok(json!({ "class": "H5T_INTEGER", "base": base }))
        }
        Datatype::Float {
            size_in_bytes,
            little_endian,
        } => {
            let base = predefined_float_name(*size_in_bytes, *little_endian)?;
            Ok(json!({ "class": "H5T_FLOAT", "base": base }))
        }
        Datatype::String { length, pad } => {
            let pad_name = match pad {
                StrPad::NullPad => "H5T_STR_NULLPAD",
                StrPad::NullTerm => "H5T_STR_NULLTERM",
            };
            let length_value = match length {
                StringLength::Fixed(n) => Value::from(*n),
                StringLength::Variable => Value::String("H5T_VARIABLE".into()),
            };
            Ok(json!({
                "class": "H5T_STRING",
                "charSet": "H5T_CSET_ASCII",
                "strPad": pad_name,
                "length": length_value,
            }))
        }
        Datatype::Compound { members } => {
            let fields: Result<Vec<Value>> = members
                .iter()
                .map(|m| {
                    Ok(json!({
                        "name": m.name,
                        "type": emit(&m.ty, depth + 1)?,
                    }))
                })
                .collect();
            Ok(json!({ "class": "H5T_COMPOUND", "fields": fields? }))
        }
        Datatype::Enum { base, mapping } => {
            let mapping_obj: serde_json::Map<String, Value> = mapping
                .iter()
                .map(|m| (m.name.clone(), Value::from(m.value)))
                .collect();
            Ok(json!({
                "class": "H5T_ENUM",
                "base": emit(base, depth + 1)?,
                "mapping": Value::Object(mapping_obj),
            }))
        }
        Datatype::Array { base, dims } => Ok(json!({
            "class": "H5T_ARRAY",
            "base": emit(base, depth + 1)?,
            "dims": dims,
        })),
        Datatype::Reference { kind } => {
            let base = match kind {
                RefKind::ObjectRef => "H5T_STD_REF_OBJ",
                RefKind::RegionRef => "H5T_STD_REF_DSETREG",
            };
            Ok(json!({ "class": "H5T_REFERENCE", "base": base }))
        }
    }
}

/// Parses a datatype from its wire JSON form.
///
/// # Errors
/// Returns [`Error::UnsupportedDatatype`] for Bitfield/Opaque/Vlen/Time or
/// any class string this model does not implement, [`Error::Malformed`]
/// for a missing `class` key or required subfield, and [`Error::Internal`]
/// if `depth` exceeds [`RECURSION_MAX_DEPTH`].
pub fn parse(value: &Value, depth: usize) -> Result<Datatype> {
    if depth > RECURSION_MAX_DEPTH {
        return Err(Error::Internal(format!(
            "datatype recursion depth {depth} exceeds the configured maximum {RECURSION_MAX_DEPTH}"
        )));
    }
    if let Some(uri) = value.as_str() {
        return Ok(Datatype::Committed { uri: uri.to_string() });
    }
    let b = JsonBridge::new(value);
    let class = b.require_field("class")?.as_str()?;
    match class {
        "H5T_INTEGER" => {
            let base = b.require_field("base")?.as_str()?;
            let (size_in_bytes, signed, little_endian) = parse_predefined_integer_name(base)?;
            Ok(Datatype::Integer {
                size_in_bytes,
                signed,
                little_endian,
            })
        }
        "H5T_FLOAT" => {
            let base = b.require_field("base")?.as_str()?;
            let (size_in_bytes, little_endian) = parse_predefined_float_name(base)?;
            Ok(Datatype::Float {
                size_in_bytes,
                little_endian,
            })
        }
        "H5T_STRING" => {
            let str_pad = b.require_field("strPad")?.as_str()?;
            let length_bridge = b.require_field("length")?;
            let length = match length_bridge.raw() {
                Value::String(s) if s == "H5T_VARIABLE" => StringLength::Variable,
                _ => StringLength::Fixed(u32::try_from(length_bridge.as_u64()?).map_err(|_| {
                    Error::Malformed("string length exceeds u32 range".into())
                })?),
            };
            let pad = match str_pad {
                "H5T_STR_NULLPAD" => StrPad::NullPad,
                "H5T_STR_NULLTERM" => StrPad::NullTerm,
                other => return Err(Error::Malformed(format!("unrecognized strPad \"{other}\""))),
            };
            Ok(Datatype::String { length, pad })
        }
        "H5T_COMPOUND" => {
            let fields = b.require_field("fields")?.as_array()?;
            let mut named = Vec::with_capacity(fields.len());
            for field in &fields {
                let name = field.require_field("name")?.as_str()?.to_string();
                let ty = parse(field.require_field("type")?.raw(), depth + 1)?;
                named.push((name, ty));
            }
            Datatype::compound(named)
        }
        "H5T_ENUM" => {
            let base = parse(b.require_field("base")?.raw(), depth + 1)?;
            let mapping_entries = b.require_field("mapping")?.as_object()?;
            let mapping = mapping_entries
                .into_iter()
                .map(|(name, v)| Ok(EnumMember { name: name.to_string(), value: v.as_i64()? }))
                .collect::<Result<Vec<_>>>()?;
            Ok(Datatype::Enum {
                base: Box::new(base),
                mapping,
            })
        }
        "H5T_ARRAY" => {
            let base = parse(b.require_field("base")?.raw(), depth + 1)?;
            let dims_bridge = b.require_field("dims")?.as_array()?;
            let dims = dims_bridge
                .iter()
                .map(JsonBridge::as_u64)
                .collect::<Result<Vec<_>>>()?;
            Ok(Datatype::Array {
                base: Box::new(base),
                dims,
            })
        }
        "H5T_REFERENCE" => {
            let base = b.require_field("base")?.as_str()?;
            let kind = match base {
                "H5T_STD_REF_OBJ" => RefKind::ObjectRef,
                "H5T_STD_REF_DSETREG" => RefKind::RegionRef,
                other => {
                    return Err(Error::UnsupportedDatatype(format!(
                        "unrecognized reference base \"{other}\""
                    )))
                }
            };
            Ok(Datatype::Reference { kind })
        }
        "H5T_BITFIELD" | "H5T_OPAQUE" | "H5T_VLEN" | "H5T_TIME" => Err(Error::UnsupportedDatatype(format!(
            "datatype class \"{class}\" is not implemented"
        ))),
        other => Err(Error::UnsupportedDatatype(format!("unrecognized datatype class \"{other}\""))),
    }
}

fn predefined_integer_name(size_in_bytes: u8, signed: bool, little_endian: bool) -> Result<&'static str> {
    let sign = if signed { "I" } else { "U" };
    let endian = if little_endian { "LE" } else { "BE" };
    Ok(match (size_in_bytes, sign, endian) {
        (1, "I", "LE") => "H5T_STD_I8LE",
        (1, "I", "BE") => "H5T_STD_I8BE",
        (1, "U", "LE") => "H5T_STD_U8LE",
        (1, "U", "BE") => "H5T_STD_U8BE",
        (2, "I", "LE") => "H5T_STD_I16LE",
        (2, "I", "BE") => "H5T_STD_I16BE",
        (2, "U", "LE") => "H5T_STD_U16LE",
        (2, "U", "BE") => "H5T_STD_U16BE",
        (4, "I", "LE") => "H5T_STD_I32LE",
        (4, "I", "BE") => "H5T_STD_I32BE",
        (4, "U", "LE") => "H5T_STD_U32LE",
        (4, "U", "BE") => "H5T_STD_U32BE",
        (8, "I", "LE") => "H5T_STD_I64LE",
        (8, "I", "BE") => "H5T_STD_I64BE",
        (8, "U", "LE") => "H5T_STD_U64LE",
        (8, "U", "BE") => "H5T_STD_U64BE",
        _ => {
            return Err(Error::UnsupportedDatatype(format!(
                "non-predefined {size_in_bytes}-byte integer type is not yet implemented for emit"
            )))
        }
    })
}

fn parse_predefined_integer_name(name: &str) -> Result<(u8, bool, bool)> {
    let rest = name.strip_prefix("H5T_STD_").ok_or_else(|| parse_name_error(name))?;
    let (endian, size_sign) = if let Some(r) = rest.strip_suffix("LE") {
        (true, r)
    } else if let Some(r) = rest.strip_suffix("BE") {
        (false, r)
    } else {
        return Err(parse_name_error(name));
    };
    let (size_in_bytes, signed) = match size_sign {
        "I8" => (1, true),
        "U8" => (1, false),
        "I16" => (2, true),
        "U16" => (2, false),
        "I32" => (4, true),
        "U32" => (4, false),
        "I64" => (8, true),
        "U64" => (8, false),
        _ => return Err(parse_name_error(name)),
    };
    Ok((size_in_bytes, signed, endian))
}

fn predefined_float_name(size_in_bytes: u8, little_endian: bool) -> Result<&'static str> {
    let endian = if little_endian { "LE" } else { "BE" };
    Ok(match (size_in_bytes, endian) {
        (4, "LE") => "H5T_IEEE_F32LE",
        (4, "BE") => "H5T_IEEE_F32BE",
        (8, "LE") => "H5T_IEEE_F64LE",
        (8, "BE") => "H5T_IEEE_F64BE",
        _ => {
            return Err(Error::UnsupportedDatatype(format!(
                "non-predefined {size_in_bytes}-byte float type is not yet implemented for emit"
            )))
        }
    })
}

fn parse_predefined_float_name(name: &str) -> Result<(u8, bool)> {
    let rest = name.strip_prefix("H5T_IEEE_F").ok_or_else(|| parse_name_error(name))?;
    let (endian, size) = if let Some(r) = rest.strip_suffix("LE") {
        (true, r)
    } else if let Some(r) = rest.strip_suffix("BE") {
        (false, r)
    } else {
        return Err(parse_name_error(name));
    };
    let size_in_bytes = match size {
        "32" => 4,
        "64" => 8,
        _ => return Err(parse_name_error(name)),
    };
    Ok((size_in_bytes, endian))
}

fn parse_name_error(name: &str) -> Error {
    Error::Malformed(format!("unrecognized predefined type name \"{name}\""))
}

#[cfg(test)]
mod tests {
    use super::*;
    use h5vol_types::datatype::Datatype;
    use proptest::prelude::*;

    #[test]
    fn integer_round_trips() {
        let ty = Datatype::i32();
        let json = emit(&ty, 0).unwrap();
        assert_eq!(json, json!({ "class": "H5T_INTEGER", "base": "H5T_STD_I32LE" }));
        assert_eq!(parse(&json, 0).unwrap(), ty);
    }

    #[test]
    fn float_round_trips() {
        let ty = Datatype::f64();
        let json = emit(&ty, 0).unwrap();
        assert_eq!(parse(&json, 0).unwrap(), ty);
    }

    #[test]
    fn fixed_string_round_trips() {
        let ty = Datatype::fixed_string(16);
        let json = emit(&ty, 0).unwrap();
        assert_eq!(
            json,
            json!({ "class": "H5T_STRING", "charSet": "H5T_CSET_ASCII", "strPad": "H5T_STR_NULLPAD", "length": 16 })
        );
        assert_eq!(parse(&json, 0).unwrap(), ty);
    }

    #[test]
    fn variable_string_round_trips() {
        let ty = Datatype::variable_string();
        let json = emit(&ty, 0).unwrap();
        assert_eq!(json["length"], json!("H5T_VARIABLE"));
        assert_eq!(parse(&json, 0).unwrap(), ty);
    }

    #[test]
    fn compound_round_trips_with_packed_offsets() {
        let ty = Datatype::compound(vec![
            ("a".into(), Datatype::i32()),
            ("b".into(), Datatype::f64()),
        ])
        .unwrap();
        let json = emit(&ty, 0).unwrap();
        let parsed = parse(&json, 0).unwrap();
        assert_eq!(parsed, ty);
    }

    #[test]
    fn enum_round_trips() {
        let ty = Datatype::enum_type(
            Datatype::i32(),
            vec![
                EnumMember { name: "RED".into(), value: 0 },
                EnumMember { name: "GREEN".into(), value: 1 },
            ],
        )
        .unwrap();
        let json = emit(&ty, 0).unwrap();
        assert_eq!(parse(&json, 0).unwrap(), ty);
    }

    #[test]
    fn array_round_trips() {
        let ty = Datatype::array(Datatype::i32(), vec![2, 3]).unwrap();
        let json = emit(&ty, 0).unwrap();
        assert_eq!(parse(&json, 0).unwrap(), ty);
    }

    #[test]
    fn committed_emits_bare_uri_string() {
        let ty = Datatype::committed("datatypes/abc");
        let json = emit(&ty, 0).unwrap();
        assert_eq!(json, json!("datatypes/abc"));
        assert_eq!(parse(&json, 0).unwrap(), ty);
    }

    #[test]
    fn reference_round_trips() {
        let ty = Datatype::object_reference();
        let json = emit(&ty, 0).unwrap();
        assert_eq!(json, json!({ "class": "H5T_REFERENCE", "base": "H5T_STD_REF_OBJ" }));
        assert_eq!(parse(&json, 0).unwrap(), ty);
    }

    #[test]
    fn unsupported_classes_are_rejected() {
        let v = json!({ "class": "H5T_VLEN" });
        assert!(matches!(parse(&v, 0), Err(Error::UnsupportedDatatype(_))));
    }

    #[test]
    fn missing_class_is_malformed() {
        let v = json!({});
        assert!(matches!(parse(&v, 0), Err(Error::Malformed(_))));
    }

    #[test]
    fn depth_guard_rejects_excessive_nesting() {
        let mut ty = Datatype::i32();
        for _ in 0..RECURSION_MAX_DEPTH + 2 {
            ty = Datatype::compound(vec![("inner".into(), ty)]).unwrap();
        }
        assert!(matches!(emit(&ty, 0), Err(Error::Internal(_))));
    }

    proptest! {
        #[test]
        fn predefined_integer_emit_parse_round_trips(
            size_in_bytes in prop_oneof![Just(1u8), Just(2), Just(4), Just(8)],
            signed in any::<bool>(),
            little_endian in any::<bool>(),
        ) {
            let ty = Datatype::Integer { size_in_bytes, signed, little_endian };
            let json = emit(&ty, 0).unwrap();
            prop_assert_eq!(parse(&json, 0).unwrap(), ty);
        }

        #[test]
        fn predefined_float_emit_parse_round_trips(
            size_in_bytes in prop_oneof![Just(4u8), Just(8)],
            little_endian in any::<bool>(),
        ) {
            let ty = Datatype::Float { size_in_bytes, little_endian };
            let json = emit(&ty, 0).unwrap();
            prop_assert_eq!(parse(&json, 0).unwrap(), ty);
        }

        #[test]
        fn fixed_string_emit_parse_round_trips(len in 1u32..4096) {
            let ty = Datatype::fixed_string(len);
            let json = emit(&ty, 0).unwrap();
            prop_assert_eq!(parse(&json, 0).unwrap(), ty);
        }

        #[test]
        fn array_of_arbitrary_dims_round_trips(dims in prop::collection::vec(1u64..16, 1..4)) {
            let ty = Datatype::array(Datatype::i32(), dims).unwrap();
            let json = emit(&ty, 0).unwrap();
            prop_assert_eq!(parse(&json, 0).unwrap(), ty);
        }
    }
}
