// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! The Request Builder: composes a single creation-request JSON body out of
//! the type/space/creation-properties/link sections.
//!
//! Resolving the parent URI for a multi-component path is the Object
//! Locator's job (`h5vol-client::locator`); this module only assembles the
//! body once the parent URI (if any) is already known.

use h5vol_types::dataspace::Dataspace;
use h5vol_types::datatype::Datatype;
use h5vol_types::error::Result;
use h5vol_types::properties::CreationProperties;
use serde_json::{Map, Value};

use crate::{dcpl, space_codec, type_codec};

/// The `"link"` section of a creation request: present iff the object
/// being created is named rather than anonymous.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkStanza {
    pub parent_uri: String,
    pub name: String,
}

/// Builds the JSON body for a Dataset or Datatype creation request.
///
/// `datatype` and `space` are always present; `link` is `None` for an
/// anonymous create.
///
/// # Errors
/// Propagates any error from the type, space, or creation-properties
/// codecs.
pub fn build_create_body(
    datatype: &Datatype,
    space: &Dataspace,
    props: &CreationProperties,
    link: Option<&LinkStanza>,
) -> Result<Value> {
    let mut obj = Map::new();
    obj.insert("type".into(), type_codec::emit(datatype, 0)?);

    for (key, value) in space_codec::emit_shape(space) {
        obj.insert(key.into(), value);
    }

    obj.insert("creationProperties".into(), dcpl::emit(props)?);

    if let Some(link) = link {
        obj.insert(
            "link".into(),
            serde_json::json!({ "id": link.parent_uri, "name": link.name }),
        );
    }

    Ok(Value::Object(obj))
}
