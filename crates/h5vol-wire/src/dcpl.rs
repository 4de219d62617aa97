// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! The Creation-Properties Codec: translates [`CreationProperties`] to and
//! from the `"creationProperties"` wire object.
//!
//! `allocTime` is always emitted (so that the surrounding object is never
//! empty); every other section is conditional on its value differing from
//! the library default.

use h5vol_types::error::{Error, Result};
use h5vol_types::properties::{
    AllocTime, AttributeCreationOrder, AttributePhaseChange, CreationProperties, FillTime, FillValue, Filter, Layout, SzipMask,
};
use serde_json::{json, Map, Value};

use crate::json_bridge::JsonBridge;

/// Emits the `"creationProperties"` object for `props`.
///
/// # Errors
/// Returns [`Error::UnsupportedDatatype`] for a concrete byte-pattern fill
/// value, which this codec does not yet implement on the emit side (see
/// the crate-level design notes); the `Undefined` fill value is always
/// emittable.
pub fn emit(props: &CreationProperties) -> Result<Value> {
    let mut obj = Map::new();
    obj.insert("allocTime".into(), Value::String(alloc_time_name(props.alloc_time).into()));

    if let Some(order) = props.attribute_creation_order {
        let name = match order {
            AttributeCreationOrder::Tracked => "H5P_CRT_ORDER_TRACKED",
            AttributeCreationOrder::Indexed => "H5P_CRT_ORDER_INDEXED",
        };
        obj.insert("attributeCreationOrder".into(), Value::String(name.into()));
    }

    if let Some(phase) = props.attribute_phase_change {
        if phase != AttributePhaseChange::default() {
            obj.insert(
                "attributePhaseChange".into(),
                json!({ "maxCompact": phase.max_compact, "minDense": phase.min_dense }),
            );
        }
    }

    if props.fill_time != FillTime::default() {
        let name = match props.fill_time {
            FillTime::IfSet => "H5D_FILL_TIME_IFSET",
            FillTime::Alloc => "H5D_FILL_TIME_ALLOC",
            FillTime::Never => "H5D_FILL_TIME_NEVER",
        };
        obj.insert("fillTime".into(), Value::String(name.into()));
    }

    match &props.fill_value {
        FillValue::Undefined => {}
        FillValue::Bytes(_) => {
            return Err(Error::UnsupportedDatatype(
                "emitting a concrete fill value is not yet implemented".into(),
            ));
        }
    }

    if !props.filters.is_empty() {
        let filters: Result<Vec<Value>> = props.filters.iter().map(emit_filter).collect();
        obj.insert("filters".into(), Value::Array(filters?));
    }

    if let Some(layout) = &props.layout {
        obj.insert("layout".into(), emit_layout(layout)?);
    }

    if props.track_times {
        obj.insert("trackTimes".into(), Value::String("true".into()));
    }

    Ok(Value::Object(obj))
}

fn alloc_time_name(t: AllocTime) -> &'static str {
    match t {
        AllocTime::Default => "H5D_ALLOC_TIME_DEFAULT",
        AllocTime::Early => "H5D_ALLOC_TIME_EARLY",
        AllocTime::Incr => "H5D_ALLOC_TIME_INCR",
        AllocTime::Late => "H5D_ALLOC_TIME_LATE",
    }
}

fn emit_filter(filter: &Filter) -> Result<Value> {
    Ok(match filter {
        Filter::Deflate { level } => json!({ "class": "H5Z_FILTER_DEFLATE", "level": level }),
        Filter::Shuffle => json!({ "class": "SHUFFLE" }),
        Filter::Fletcher32 => json!({ "class": "FLETCHER32" }),
        Filter::Szip { pixels_per_block, mask } => {
            let coding = match mask {
                SzipMask::EntropyCoding => "EC",
                SzipMask::NearestNeighbor => "NN",
            };
            json!({ "class": "SZIP", "coding": coding, "pixelsPerBlock": pixels_per_block })
        }
        Filter::NBit => json!({ "class": "NBIT" }),
        Filter::ScaleOffset { scale_type, scale_factor } => {
            json!({ "class": "SCALEOFFSET", "scaleType": scale_type, "scaleFactor": scale_factor })
        }
        Filter::Lzf => json!({ "class": "LZF" }),
        Filter::User { filter_id, client_data } => {
            json!({ "class": "USER", "id": filter_id, "clientData": client_data })
        }
    })
}

fn emit_layout(layout: &Layout) -> Result<Value> {
    Ok(match layout {
        Layout::Compact => json!({ "class": "H5D_COMPACT" }),
        Layout::Contiguous => json!({ "class": "H5D_CONTIGUOUS" }),
        Layout::Chunked { dims } => json!({ "class": "H5D_CHUNKED", "dims": dims }),
    })
}

/// Parses a `"creationProperties"` object back into a [`CreationProperties`]
/// bundle, for populating a handle's DCPL when opening an existing object.
///
/// # Errors
/// Returns [`Error::Malformed`] for an unrecognized enum-like string value,
/// and [`Error::UnsupportedLayout`] for a layout class this codec does not
/// implement (e.g. virtual layout).
pub fn parse(body: &JsonBridge<'_>) -> Result<CreationProperties> {
    let mut props = CreationProperties::default();

    if let Some(v) = body.field("allocTime") {
        props.alloc_time = match v.as_str()? {
            "H5D_ALLOC_TIME_DEFAULT" => AllocTime::Default,
            "H5D_ALLOC_TIME_EARLY" => AllocTime::Early,
            "H5D_ALLOC_TIME_INCR" => AllocTime::Incr,
            "H5D_ALLOC_TIME_LATE" => AllocTime::Late,
            other => return Err(Error::Malformed(format!("unrecognized allocTime \"{other}\""))),
        };
    }

    if let Some(v) = body.field("attributeCreationOrder") {
        props.attribute_creation_order = Some(match v.as_str()? {
            "H5P_CRT_ORDER_TRACKED" => AttributeCreationOrder::Tracked,
            "H5P_CRT_ORDER_INDEXED" => AttributeCreationOrder::Indexed,
            other => return Err(Error::Malformed(format!("unrecognized attributeCreationOrder \"{other}\""))),
        });
    }

    if let Some(v) = body.field("attributePhaseChange") {
        let max_compact = u32::try_from(v.require_field("maxCompact")?.as_u64()?)
            .map_err(|_| Error::Malformed("maxCompact exceeds u32 range".into()))?;
        let min_dense = u32::try_from(v.require_field("minDense")?.as_u64()?)
            .map_err(|_| Error::Malformed("minDense exceeds u32 range".into()))?;
        props.attribute_phase_change = Some(AttributePhaseChange { max_compact, min_dense });
    }

    if let Some(v) = body.field("fillTime") {
        props.fill_time = match v.as_str()? {
            "H5D_FILL_TIME_IFSET" => FillTime::IfSet,
            "H5D_FILL_TIME_ALLOC" => FillTime::Alloc,
            "H5D_FILL_TIME_NEVER" => FillTime::Never,
            other => return Err(Error::Malformed(format!("unrecognized fillTime \"{other}\""))),
        };
    }

    // A concrete fill value round-trips as `Undefined` here too — see the
    // emit-side note on why this codec does not yet construct `Bytes`.
    let _ = body.field("fillValue");

    if let Some(v) = body.field("filters") {
        props.filters = v.as_array()?.iter().map(parse_filter).collect::<Result<Vec<_>>>()?;
    }

    if let Some(v) = body.field("layout") {
        props.layout = Some(parse_layout(&v)?);
    }

    if let Some(v) = body.field("trackTimes") {
        props.track_times = v.as_str()? == "true";
    }

    Ok(props)
}

fn parse_filter(v: &JsonBridge<'_>) -> Result<Filter> {
    let class = v.require_field("class")?.as_str()?;
    Ok(match class {
        "H5Z_FILTER_DEFLATE" => Filter::Deflate {
            level: u8::try_from(v.require_field("level")?.as_u64()?).map_err(|_| Error::Malformed("deflate level exceeds u8 range".into()))?,
        },
        "SHUFFLE" => Filter::Shuffle,
        "FLETCHER32" => Filter::Fletcher32,
        "SZIP" => {
            let coding = v.require_field("coding")?.as_str()?;
            let mask = match coding {
                "EC" => SzipMask::EntropyCoding,
                "NN" => SzipMask::NearestNeighbor,
                other => {
                    return Err(Error::Malformed(format!(
                        "unrecognized SZIP coding mask \"{other}\" (only EC/NN are accepted)"
                    )))
                }
            };
            let pixels_per_block = u32::try_from(v.require_field("pixelsPerBlock")?.as_u64()?)
                .map_err(|_| Error::Malformed("pixelsPerBlock exceeds u32 range".into()))?;
            Filter::Szip { pixels_per_block, mask }
        }
        "NBIT" => Filter::NBit,
        "SCALEOFFSET" => Filter::ScaleOffset {
            scale_type: i32::try_from(v.require_field("scaleType")?.as_i64()?).map_err(|_| Error::Malformed("scaleType exceeds i32 range".into()))?,
            scale_factor: i32::try_from(v.require_field("scaleFactor")?.as_i64()?).map_err(|_| Error::Malformed("scaleFactor exceeds i32 range".into()))?,
        },
        "LZF" => Filter::Lzf,
        "USER" => {
            let filter_id = u32::try_from(v.require_field("id")?.as_u64()?).map_err(|_| Error::Malformed("filter id exceeds u32 range".into()))?;
            let client_data = v
                .require_field("clientData")?
                .as_array()?
                .iter()
                .map(|e| u32::try_from(e.as_u64()?).map_err(|_| Error::Malformed("clientData entry exceeds u32 range".into())))
                .collect::<Result<Vec<_>>>()?;
            Filter::User { filter_id, client_data }
        }
        other => return Err(Error::Malformed(format!("unrecognized filter class \"{other}\""))),
    })
}

fn parse_layout(v: &JsonBridge<'_>) -> Result<Layout> {
    let class = v.require_field("class")?.as_str()?;
    Ok(match class {
        "H5D_COMPACT" => Layout::Compact,
        "H5D_CONTIGUOUS" => Layout::Contiguous,
        "H5D_CHUNKED" => {
            let dims = v.require_field("dims")?.as_array()?.iter().map(JsonBridge::as_u64).collect::<Result<Vec<_>>>()?;
            Layout::Chunked { dims }
        }
        "H5D_VIRTUAL" => return Err(Error::UnsupportedLayout("virtual layout is not implemented".into())),
        other => return Err(Error::UnsupportedLayout(format!("unrecognized layout class \"{other}\""))),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_properties_emit_only_alloc_time() {
        let props = CreationProperties::default();
        let v = emit(&props).unwrap();
        assert_eq!(v, json!({ "allocTime": "H5D_ALLOC_TIME_DEFAULT" }));
    }

    #[test]
    fn alloc_time_is_emitted_verbatim() {
        let mut props = CreationProperties::default();
        props.alloc_time = AllocTime::Late;
        let v = emit(&props).unwrap();
        assert_eq!(v["allocTime"], json!("H5D_ALLOC_TIME_LATE"));
    }

    #[test]
    fn phase_change_omitted_when_default() {
        let mut props = CreationProperties::default();
        props.attribute_phase_change = Some(AttributePhaseChange::default());
        let v = emit(&props).unwrap();
        assert!(v.get("attributePhaseChange").is_none());
    }

    #[test]
    fn phase_change_emitted_when_non_default() {
        let mut props = CreationProperties::default();
        props.attribute_phase_change = Some(AttributePhaseChange { max_compact: 16, min_dense: 4 });
        let v = emit(&props).unwrap();
        assert_eq!(v["attributePhaseChange"], json!({ "maxCompact": 16, "minDense": 4 }));
    }

    #[test]
    fn chunked_layout_round_trips() {
        let props = CreationProperties::default()
            .with_layout(Layout::Chunked { dims: vec![4, 4] })
            .unwrap();
        let v = emit(&props).unwrap();
        let bridge = JsonBridge::new(&v);
        let parsed = parse(&bridge).unwrap();
        assert_eq!(parsed.layout, Some(Layout::Chunked { dims: vec![4, 4] }));
    }

    #[test]
    fn szip_rejects_unknown_mask_on_parse() {
        let v = json!({ "class": "SZIP", "coding": "XX", "pixelsPerBlock": 4 });
        let bridge = JsonBridge::new(&v);
        assert!(parse_filter(&bridge).is_err());
    }

    #[test]
    fn filters_round_trip() {
        let props = CreationProperties::default()
            .with_filter(Filter::Shuffle)
            .with_filter(Filter::Deflate { level: 6 });
        let v = emit(&props).unwrap();
        let bridge = JsonBridge::new(&v);
        let parsed = parse(&bridge).unwrap();
        assert_eq!(parsed.filters, props.filters);
    }

    #[test]
    fn virtual_layout_is_unsupported() {
        let v = json!({ "class": "H5D_VIRTUAL" });
        let bridge = JsonBridge::new(&v);
        assert!(matches!(parse_layout(&bridge), Err(Error::UnsupportedLayout(_))));
    }

    #[test]
    fn track_times_round_trips_as_string() {
        let mut props = CreationProperties::default();
        props.track_times = true;
        let v = emit(&props).unwrap();
        assert_eq!(v["trackTimes"], json!("true"));
        let bridge = JsonBridge::new(&v);
        assert!(parse(&bridge).unwrap().track_times);
    }
}
