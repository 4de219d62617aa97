// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Response-Parse Callbacks: small, pure `(response_bytes, input) -> output`
//! extractors the locator and the outer façade call after a successful
//! request. Each one is independent of the others — no shared state, no
//! network access, just typed reads over a parsed JSON body via
//! `h5vol_wire::json_bridge::JsonBridge`.

use h5vol_wire::json_bridge::JsonBridge;
use h5vol_wire::{dcpl, space_codec};
use serde_json::Value;

use h5vol_types::error::{Error, Result};
use h5vol_types::properties::CreationProperties;

/// The kind of server object a link or a resolved path names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectKind {
    Group,
    Dataset,
    Datatype,
}

impl ObjectKind {
    fn from_collection(collection: &str) -> Option<Self> {
        match collection {
            "groups" => Some(ObjectKind::Group),
            "datasets" => Some(ObjectKind::Dataset),
            "datatypes" => Some(ObjectKind::Datatype),
            _ => None,
        }
    }
}

/// The outcome of reading a link-shaped field off a response: either a
/// concrete object (kind known, for `get_link_type`; URI known, for
/// `copy_object_uri`), or a short-circuit for link classes this core does
/// not resolve further.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkResolution<T> {
    Resolved(T),
    /// A soft link (resolves by path, not URI), an external link (resolves
    /// in another file), or a user-defined link — none of which this core
    /// can turn into a local URI/kind without further server interaction
    /// the locator does not perform.
    ShortCircuited,
}

fn link_class(body: &JsonBridge<'_>) -> Option<String> {
    body.field("link")
        .and_then(|l| l.field("class"))
        .and_then(|c| c.as_str().ok())
        .map(str::to_string)
}

fn is_short_circuit_class(class: &str) -> bool {
    matches!(class, "H5L_TYPE_SOFT" | "H5L_TYPE_EXTERNAL" | "H5L_TYPE_USER_DEFINED")
}

/// Extracts the URI of the object a response describes.
///
/// Tries, in order, `link.id`, then `id`, then `root` — the three shapes a
/// create/open response is documented to use. Short-circuits (returns
/// [`LinkResolution::ShortCircuited`]) without reading further if the
/// response carries a soft/external/user-defined `link.class`.
///
/// # Errors
/// Returns [`Error::Malformed`] if none of the three keys is present as a
/// string.
pub fn copy_object_uri(body: &Value) -> Result<LinkResolution<String>> {
    let bridge = JsonBridge::new(body);
    if let Some(class) = link_class(&bridge) {
        if is_short_circuit_class(&class) {
            return Ok(LinkResolution::ShortCircuited);
        }
    }
    let candidate = bridge
        .field("link")
        .and_then(|l| l.field("id"))
        .or_else(|| bridge.field("id"))
        .or_else(|| bridge.field("root"));
    match candidate.and_then(|v| v.as_str().ok().map(str::to_string)) {
        Some(uri) => Ok(LinkResolution::Resolved(uri)),
        None => Err(Error::Malformed(
            "response contains none of link.id, id, or root".into(),
        )),
    }
}

/// Maps a link response's `link.collection` field to an [`ObjectKind`].
/// Short-circuits on soft/external/user-defined links, per the same rule
/// as [`copy_object_uri`].
///
/// # Errors
/// Returns [`Error::Malformed`] if `link.collection` is absent or names an
/// unrecognized collection.
pub fn get_link_type(body: &Value) -> Result<LinkResolution<ObjectKind>> {
    let bridge = JsonBridge::new(body);
    if let Some(class) = link_class(&bridge) {
        if is_short_circuit_class(&class) {
            return Ok(LinkResolution::ShortCircuited);
        }
    }
    let collection = bridge
        .require_field("link")?
        .require_field("collection")?
        .as_str()?;
    ObjectKind::from_collection(collection)
        .map(LinkResolution::Resolved)
        .ok_or_else(|| Error::Malformed(format!("unrecognized link collection \"{collection}\"")))
}

/// Reads a group/dataset/datatype's `attributeCount`.
///
/// # Errors
/// Returns [`Error::Malformed`] if `attributeCount` is absent or not a
/// non-negative integer.
pub fn retrieve_attribute_count(body: &Value) -> Result<u64> {
    JsonBridge::new(body).require_field("attributeCount")?.as_u64()
}

/// Summary information about a group, mirroring what an `H5Gget_info`-style
/// call reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GroupInfo {
    pub link_count: u64,
    /// A fixed sentinel: this core does not distinguish storage types, so
    /// every group reports the same value rather than guessing one.
    pub storage_type: u32,
    pub max_corder: i64,
    pub mounted: bool,
}

/// Reads a group's `linkCount` and fills in the remaining [`GroupInfo`]
/// fields with their fixed sentinel values (`max_corder = 0`,
/// `mounted = false`), matching the component's documented behavior.
///
/// # Errors
/// Returns [`Error::Malformed`] if `linkCount` is absent or not a
/// non-negative integer.
pub fn get_group_info(body: &Value) -> Result<GroupInfo> {
    let link_count = JsonBridge::new(body).require_field("linkCount")?.as_u64()?;
    Ok(GroupInfo {
        link_count,
        storage_type: 0,
        max_corder: 0,
        mounted: false,
    })
}

/// Ingests a dataset-open response's full `creationProperties` subtree and
/// returns the populated [`CreationProperties`] bundle, for applying to a
/// freshly opened handle's DCPL.
///
/// # Errors
/// Propagates [`h5vol_wire::dcpl::parse`]'s errors: [`Error::Malformed`]
/// for an unrecognized enum-like string, [`Error::UnsupportedLayout`] for
/// an unimplemented layout class.
pub fn parse_dataset_creation_properties(body: &Value) -> Result<CreationProperties> {
    let bridge = JsonBridge::new(body);
    let props_bridge = bridge.require_field("creationProperties")?;
    dcpl::parse(&props_bridge)
}

/// Parses a dataset/attribute-open response's datatype and dataspace,
/// alongside the creation properties above — the three pieces of state a
/// handle needs filled in at open time.
///
/// # Errors
/// Propagates the type codec's and space codec's errors.
pub fn parse_dataset_open_response(
    body: &Value,
) -> Result<(h5vol_types::Datatype, h5vol_types::Dataspace, CreationProperties)> {
    let bridge = JsonBridge::new(body);
    let ty = h5vol_wire::type_codec::parse(bridge.require_field("type")?.raw(), 0)?;
    let space = space_codec::parse_shape(&bridge)?;
    let props = parse_dataset_creation_properties(body)?;
    Ok((ty, space, props))
}
