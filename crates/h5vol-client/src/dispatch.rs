// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! The I/O Dispatcher: selection normalization, wire-format choice,
//! verb/URL/header construction, and scatter (read) / gather (write)
//! between a flat network buffer and a memory-dataspace-described region.
//!
//! Variable-length payload transfer is out of scope: only fixed-length
//! datatypes are actually transferred — the binary wire format is the only
//! one this dispatcher drives data through; a variable-length string
//! datatype is rejected with [`Error::UnsupportedDatatype`] before any
//! request is built.

use h5vol_types::dataspace::Dataspace;
use h5vol_types::datatype::{Datatype, RefKind};
use h5vol_types::error::{Error, Result};
use h5vol_types::object_ref::{ObjectReference, WIRE_STRIDE};
use h5vol_types::selection::Selection;
use h5vol_wire::path::encode_path_segment;
use h5vol_wire::space_codec;

use crate::callbacks::ObjectKind;
use crate::context::Context;
use crate::transport::{Method, Transport, WireRequest};

impl ObjectKind {
    /// The URL collection segment (`groups`/`datasets`/`datatypes`) this
    /// kind of object lives under.
    #[must_use]
    pub fn collection(self) -> &'static str {
        match self {
            ObjectKind::Group => "groups",
            ObjectKind::Dataset => "datasets",
            ObjectKind::Datatype => "datatypes",
        }
    }
}

/// Total element count a selection touches against a space of the given
/// shape. `All` resolves against the space's own extent; this is the only
/// place a selection's count depends on anything outside itself.
#[must_use]
pub fn selected_element_count(sel: &Selection, space: &Dataspace) -> u64 {
    match sel {
        Selection::All => space.element_count(),
        Selection::None => 0,
        Selection::Hyperslab(h) => h.selected_count(),
        Selection::Points(p) => p.coords.len() as u64,
    }
}

/// Resolves the All-semantics normalization for read/write selections: when
/// memory is `All`, its buffer is filled contiguously in the file
/// selection's enumeration order, which is exactly what `flat_offsets`
/// already computes for `All` against a memory space sized to the
/// selected element count — no rewriting of either selection is needed.
/// The two sides are only ever compared by element count, never by shape,
/// so a 3-D file hyperslab and a 1-D memory buffer of the same size are
/// perfectly compatible.
fn normalize_selections<'a>(mem_selection: &'a Selection, file_selection: &'a Selection) -> (&'a Selection, &'a Selection) {
    (mem_selection, file_selection)
}

fn row_major_strides(dims: &[u64]) -> Vec<u64> {
    let mut strides = vec![1u64; dims.len()];
    for i in (0..dims.len().saturating_sub(1)).rev() {
        strides[i] = strides[i + 1] * dims[i + 1];
    }
    strides
}

/// Enumerates the flat, row-major element offsets a selection touches
/// within a space of shape `dims`, in the selection's own iteration order
/// (outermost dimension varies slowest for a hyperslab).
fn hyperslab_offsets(start: &[u64], stride: &[u64], count: &[u64], strides: &[u64]) -> Vec<u64> {
    let total: u64 = count.iter().product();
    let mut offsets = Vec::with_capacity(total as usize);
    let mut indices = vec![0u64; start.len()];
    loop {
        let offset = indices.iter().zip(strides.iter()).map(|(&i, &s)| i * s).sum();
        offsets.push(offset);

        let mut dim = start.len();
        loop {
            if dim == 0 {
                return offsets;
            }
            dim -= 1;
            indices[dim] += 1;
            if indices[dim] < count[dim] {
                break;
            }
            indices[dim] = 0;
            if dim == 0 {
                return offsets;
            }
        }
    }
}

/// Resolves a selection against a concrete dataspace into the flat element
/// offsets it touches, used to drive scatter (read) / gather (write).
///
/// # Errors
/// Returns [`Error::InvalidArgument`] if a hyperslab's or a point's rank
/// does not match the space's rank.
fn flat_offsets(sel: &Selection, space: &Dataspace) -> Result<Vec<u64>> {
    match space {
        Dataspace::Null => Ok(vec![]),
        Dataspace::Scalar => match sel {
            Selection::None => Ok(vec![]),
            _ => Ok(vec![0]),
        },
        Dataspace::Simple { dims, .. } => {
            let strides = row_major_strides(dims);
            match sel {
                Selection::All => Ok((0..dims.iter().product()).collect()),
                Selection::None => Ok(vec![]),
                Selection::Hyperslab(h) => {
                    if h.start.len() != dims.len() {
                        return Err(Error::InvalidArgument(format!(
                            "hyperslab rank {} does not match dataspace rank {}",
                            h.start.len(),
                            dims.len()
                        )));
                    }
                    Ok(hyperslab_offsets(&h.start, &h.stride, &h.count, &strides))
                }
                Selection::Points(p) => p
                    .coords
                    .iter()
                    .map(|c| {
                        if c.len() != dims.len() {
                            return Err(Error::InvalidArgument(format!(
                                "point rank {} does not match dataspace rank {}",
                                c.len(),
                                dims.len()
                            )));
                        }
                        Ok(c.iter().zip(strides.iter()).map(|(&i, &s)| i * s).sum())
                    })
                    .collect(),
            }
        }
    }
}

fn scatter(out: &mut [u8], payload: &[u8], offsets: &[u64], elem_size: usize) -> Result<()> {
    if payload.len() != offsets.len() * elem_size {
        return Err(Error::Malformed(format!(
            "response payload is {} bytes, expected {} for {} selected elements of size {elem_size}",
            payload.len(),
            offsets.len() * elem_size,
            offsets.len()
        )));
    }
    for (i, &offset) in offsets.iter().enumerate() {
        let src = &payload[i * elem_size..(i + 1) * elem_size];
        let dst_start = offset as usize * elem_size;
        let dst = out
            .get_mut(dst_start..dst_start + elem_size)
            .ok_or_else(|| Error::InvalidArgument("scatter destination offset exceeds the output buffer".into()))?;
        dst.copy_from_slice(src);
    }
    Ok(())
}

fn gather(input: &[u8], offsets: &[u64], elem_size: usize) -> Result<Vec<u8>> {
    let mut out = Vec::with_capacity(offsets.len() * elem_size);
    for &offset in offsets {
        let start = offset as usize * elem_size;
        let src = input
            .get(start..start + elem_size)
            .ok_or_else(|| Error::InvalidArgument("gather source offset exceeds the input buffer".into()))?;
        out.extend_from_slice(src);
    }
    Ok(out)
}

/// Builds the verb/URL/body a selection requires against `value_url` (the
/// `.../value` endpoint, with no query string).
///
/// Point selections always go out as a `POST` carrying the JSON selection
/// body; a regular hyperslab attaches the URL-parameter form to a `GET`;
/// `All`/`None` need no selection at all.
fn build_read_request(value_url: &str, file_selection: &Selection) -> Result<(Method, String, Option<Vec<u8>>)> {
    match file_selection {
        Selection::Points(_) => {
            let body = space_codec::emit_selection_json_body(file_selection)
                .expect("a point selection always has a JSON-body form");
            Ok((Method::Post, value_url.to_string(), Some(serde_json::to_vec(&body)?)))
        }
        Selection::Hyperslab(_) => {
            let param = space_codec::emit_selection_url_param(file_selection)?;
            Ok((Method::Get, format!("{value_url}?select={param}"), None))
        }
        Selection::All | Selection::None => Ok((Method::Get, value_url.to_string(), None)),
    }
}

/// A hyperslab write attaches the same URL-parameter `select=` as a read;
/// point-selection writes have no documented wire form in this protocol
/// (the external-interfaces table lists only a plain `PUT .../value[?select=...]`)
/// and are rejected rather than guessed at.
fn build_write_request(value_url: &str, file_selection: &Selection) -> Result<String> {
    match file_selection {
        Selection::Hyperslab(_) => {
            let param = space_codec::emit_selection_url_param(file_selection)?;
            Ok(format!("{value_url}?select={param}"))
        }
        Selection::All | Selection::None => Ok(value_url.to_string()),
        Selection::Points(_) => Err(Error::UnsupportedSelection(
            "point-selection dataset writes have no wire form in this protocol".into(),
        )),
    }
}

fn value_url<T: Transport>(ctx: &Context<T>, dataset_uri: &str) -> String {
    ctx.url(&format!("/datasets/{}/value", encode_path_segment(dataset_uri)))
}

/// Reads a fixed-length-typed dataset's selected elements into `out`,
/// which must be sized for the *entire* memory dataspace (`mem_space`),
/// not just the selected elements — scatter fills only the selected
/// offsets, leaving the rest of `out` untouched.
///
/// # Errors
/// Returns [`Error::UnsupportedDatatype`] for a variable-length `datatype`,
/// [`Error::InvalidArgument`] if the memory and file selections do not
/// select the same number of elements or `out` is the wrong length, and
/// propagates transport/protocol/malformed-response errors.
#[tracing::instrument(skip(ctx, dataset_space, mem_space, datatype, mem_selection, file_selection, out), fields(component = "h5vol_client", operation = "read_dataset_bytes", dataset_uri))]
pub fn read_dataset_bytes<T: Transport>(
    ctx: &Context<T>,
    dataset_uri: &str,
    dataset_space: &Dataspace,
    mem_space: &Dataspace,
    datatype: &Datatype,
    mem_selection: &Selection,
    file_selection: &Selection,
    out: &mut [u8],
) -> Result<()> {
    if !datatype.is_fixed_length() {
        return Err(Error::UnsupportedDatatype(
            "variable-length payload transfer is not supported".into(),
        ));
    }
    let elem_size = datatype.packed_size()?;
    if out.len() as u64 != mem_space.element_count() * elem_size as u64 {
        return Err(Error::InvalidArgument(
            "output buffer size does not match the memory dataspace".into(),
        ));
    }

    let (eff_mem_sel, eff_file_sel) = normalize_selections(mem_selection, file_selection);
    let mem_count = selected_element_count(eff_mem_sel, mem_space);
    let file_count = selected_element_count(eff_file_sel, dataset_space);
    if mem_count != file_count {
        return Err(Error::InvalidArgument(format!(
            "memory selection selects {mem_count} elements but file selection selects {file_count}"
        )));
    }
    if file_count == 0 {
        tracing::debug!("zero-element selection, skipping the request");
        return Ok(());
    }

    let url = value_url(ctx, dataset_uri);
    let (method, url, body) = build_read_request(&url, eff_file_sel)?;
    let mut request = WireRequest::new(method, url).with_header("Accept", "application/octet-stream");
    if let Some(body) = body {
        request = request.with_header("Content-Type", "application/json").with_body(body);
    }
    let response = ctx.execute(request)?;
    if !response.is_success() {
        return Err(Error::protocol(response.status));
    }

    let mem_offsets = flat_offsets(eff_mem_sel, mem_space)?;
    scatter(out, &response.body, &mem_offsets, elem_size)
}

/// Writes `input` (sized for the entire memory dataspace `mem_space`) to a
/// fixed-length-typed dataset's selected elements.
///
/// # Errors
/// As [`read_dataset_bytes`], plus [`Error::UnsupportedSelection`] for a
/// point-selection file write.
#[tracing::instrument(skip(ctx, dataset_space, mem_space, datatype, mem_selection, file_selection, input), fields(component = "h5vol_client", operation = "write_dataset_bytes", dataset_uri))]
pub fn write_dataset_bytes<T: Transport>(
    ctx: &Context<T>,
    dataset_uri: &str,
    dataset_space: &Dataspace,
    mem_space: &Dataspace,
    datatype: &Datatype,
    mem_selection: &Selection,
    file_selection: &Selection,
    input: &[u8],
) -> Result<()> {
    if !datatype.is_fixed_length() {
        return Err(Error::UnsupportedDatatype(
            "variable-length payload transfer is not supported".into(),
        ));
    }
    let elem_size = datatype.packed_size()?;
    if input.len() as u64 != mem_space.element_count() * elem_size as u64 {
        return Err(Error::InvalidArgument(
            "input buffer size does not match the memory dataspace".into(),
        ));
    }

    let (eff_mem_sel, eff_file_sel) = normalize_selections(mem_selection, file_selection);
    let mem_count = selected_element_count(eff_mem_sel, mem_space);
    let file_count = selected_element_count(eff_file_sel, dataset_space);
    if mem_count != file_count {
        return Err(Error::InvalidArgument(format!(
            "memory selection selects {mem_count} elements but file selection selects {file_count}"
        )));
    }
    if file_count == 0 {
        tracing::debug!("zero-element selection, skipping the request");
        return Ok(());
    }

    let mem_offsets = flat_offsets(eff_mem_sel, mem_space)?;
    let payload = gather(input, &mem_offsets, elem_size)?;

    let url = value_url(ctx, dataset_uri);
    let url = build_write_request(&url, eff_file_sel)?;
    let request = WireRequest::new(Method::Put, url)
        .with_header("Content-Type", "application/octet-stream")
        .with_body(payload);
    let response = ctx.execute(request)?;
    if !response.is_success() {
        return Err(Error::protocol(response.status));
    }
    Ok(())
}

/// Reads a `Reference`-typed dataset's selected elements, decoding each
/// 48-byte wire slot via the Object Reference Codec.
///
/// # Errors
/// As [`read_dataset_bytes`], plus [`Error::Malformed`] from the reference
/// codec for a misaligned or unrecognized slot.
pub fn read_dataset_references<T: Transport>(
    ctx: &Context<T>,
    dataset_uri: &str,
    dataset_space: &Dataspace,
    mem_space: &Dataspace,
    mem_selection: &Selection,
    file_selection: &Selection,
) -> Result<Vec<ObjectReference>> {
    let mut buf = vec![0u8; mem_space.element_count() as usize * WIRE_STRIDE];
    read_dataset_bytes(
        ctx,
        dataset_uri,
        dataset_space,
        mem_space,
        &Datatype::Reference { kind: RefKind::ObjectRef },
        mem_selection,
        file_selection,
        &mut buf,
    )?;
    h5vol_wire::refs::from_wire(&buf)
}

/// Writes a `Reference`-typed dataset's selected elements, encoding each
/// reference via the Object Reference Codec first.
///
/// # Errors
/// As [`write_dataset_bytes`], plus [`Error::InvalidArgument`] from the
/// reference codec if a reference does not fit its 48-byte slot.
pub fn write_dataset_references<T: Transport>(
    ctx: &Context<T>,
    dataset_uri: &str,
    dataset_space: &Dataspace,
    mem_space: &Dataspace,
    mem_selection: &Selection,
    file_selection: &Selection,
    refs: &[ObjectReference],
) -> Result<()> {
    let payload = h5vol_wire::refs::to_wire(refs)?;
    write_dataset_bytes(
        ctx,
        dataset_uri,
        dataset_space,
        mem_space,
        &Datatype::Reference { kind: RefKind::ObjectRef },
        mem_selection,
        file_selection,
        &payload,
    )
}

fn attribute_value_url<T: Transport>(ctx: &Context<T>, parent_kind: ObjectKind, parent_uri: &str, name: &str) -> String {
    ctx.url(&format!(
        "/{}/{}/attributes/{}/value",
        parent_kind.collection(),
        encode_path_segment(parent_uri),
        encode_path_segment(name)
    ))
}

/// Reads an entire attribute's value in one call (no sub-selection).
///
/// # Errors
/// Returns [`Error::UnsupportedDatatype`] for a variable-length `datatype`,
/// [`Error::Malformed`] if the response length does not match `out`, and
/// propagates transport/protocol errors.
pub fn read_attribute_bytes<T: Transport>(
    ctx: &Context<T>,
    parent_kind: ObjectKind,
    parent_uri: &str,
    name: &str,
    datatype: &Datatype,
    out: &mut [u8],
) -> Result<()> {
    if !datatype.is_fixed_length() {
        return Err(Error::UnsupportedDatatype(
            "variable-length payload transfer is not supported".into(),
        ));
    }
    let url = attribute_value_url(ctx, parent_kind, parent_uri, name);
    let request = WireRequest::new(Method::Get, url).with_header("Accept", "application/octet-stream");
    let response = ctx.execute(request)?;
    if !response.is_success() {
        return Err(Error::protocol(response.status));
    }
    if response.body.len() != out.len() {
        return Err(Error::Malformed(format!(
            "attribute value is {} bytes, expected {}",
            response.body.len(),
            out.len()
        )));
    }
    out.copy_from_slice(&response.body);
    Ok(())
}

/// Writes an entire attribute's value in one call (no sub-selection).
///
/// # Errors
/// As [`read_attribute_bytes`].
pub fn write_attribute_bytes<T: Transport>(
    ctx: &Context<T>,
    parent_kind: ObjectKind,
    parent_uri: &str,
    name: &str,
    datatype: &Datatype,
    input: &[u8],
) -> Result<()> {
    if !datatype.is_fixed_length() {
        return Err(Error::UnsupportedDatatype(
            "variable-length payload transfer is not supported".into(),
        ));
    }
    let url = attribute_value_url(ctx, parent_kind, parent_uri, name);
    let request = WireRequest::new(Method::Put, url)
        .with_header("Content-Type", "application/octet-stream")
        .with_body(input.to_vec());
    let response = ctx.execute(request)?;
    if !response.is_success() {
        return Err(Error::protocol(response.status));
    }
    Ok(())
}

/// Deletes an attribute.
///
/// # Errors
/// Propagates transport/protocol errors for a non-2xx response.
pub fn delete_attribute<T: Transport>(ctx: &Context<T>, parent_kind: ObjectKind, parent_uri: &str, name: &str) -> Result<()> {
    let url = ctx.url(&format!(
        "/{}/{}/attributes/{}",
        parent_kind.collection(),
        encode_path_segment(parent_uri),
        encode_path_segment(name)
    ));
    let response = ctx.execute(WireRequest::new(Method::Delete, url))?;
    if !response.is_success() {
        return Err(Error::protocol(response.status));
    }
    Ok(())
}

/// A generic existence check: a 2xx response means `true`; a 4xx response
/// means `false` (not an error); anything else propagates as a
/// [`Error::Protocol`].
///
/// # Errors
/// Returns [`Error::Protocol`] for a 5xx (or otherwise unclassified)
/// response, and propagates transport errors.
pub fn exists<T: Transport>(ctx: &Context<T>, url: String) -> Result<bool> {
    let response = ctx.execute(WireRequest::new(Method::Get, url))?;
    if response.is_success() {
        Ok(true)
    } else if (400..500).contains(&response.status) {
        Ok(false)
    } else {
        Err(Error::protocol(response.status))
    }
}

/// Convenience existence-check URL for an attribute, used by the façade's
/// `exists`-style calls.
#[must_use]
pub fn attribute_url<T: Transport>(ctx: &Context<T>, parent_kind: ObjectKind, parent_uri: &str, name: &str) -> String {
    ctx.url(&format!(
        "/{}/{}/attributes/{}",
        parent_kind.collection(),
        encode_path_segment(parent_uri),
        encode_path_segment(name)
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Endpoint;
    use crate::tests_support::MockTransport;
    use crate::transport::WireResponse;
    use h5vol_types::object_ref::TargetType;
    use h5vol_types::selection::{Hyperslab, Points};

    fn ctx_with(responder: impl Fn(&WireRequest) -> Result<WireResponse> + Send + Sync + 'static) -> Context<MockTransport> {
        Context::init(MockTransport::new(responder), Endpoint::new("http://localhost:5000", "/tmp/x.h5"))
    }

    #[test]
    fn scenario_1_full_cube_round_trip_all_selection() {
        crate::tests_support::init_test_tracing();
        let space = Dataspace::simple(vec![5, 5, 5]).unwrap();
        let values: Vec<i32> = (0..125).collect();
        let bytes: Vec<u8> = values.iter().flat_map(|v| v.to_le_bytes()).collect();
        let returned = bytes.clone();
        let ctx = ctx_with(move |req| {
            assert!(req.url.ends_with("/value"));
            Ok(WireResponse { status: 200, body: returned.clone() })
        });
        let mut out = vec![0u8; bytes.len()];
        read_dataset_bytes(&ctx, "d-1", &space, &space, &Datatype::i32(), &Selection::All, &Selection::All, &mut out).unwrap();
        assert_eq!(out, bytes);
    }

    #[test]
    fn scenario_2_hyperslab_write_builds_correct_select_param() {
        let file_space = Dataspace::simple(vec![10, 10, 10]).unwrap();
        let mem_space = Dataspace::simple(vec![10, 10]).unwrap();
        let h = Hyperslab::new(vec![0, 0, 0], vec![1, 1, 1], vec![10, 10, 1], vec![1, 1, 1]).unwrap();
        let file_sel = Selection::Hyperslab(h);
        let values: Vec<i32> = (0..100).collect();
        let bytes: Vec<u8> = values.iter().flat_map(|v| v.to_le_bytes()).collect();

        let ctx = ctx_with(|req| {
            assert_eq!(req.method, Method::Put);
            assert!(req.url.contains("select=[0:10:1,0:10:1,0:1:1]"));
            Ok(WireResponse { status: 200, body: vec![] })
        });
        write_dataset_bytes(&ctx, "d-1", &file_space, &mem_space, &Datatype::i32(), &Selection::All, &file_sel, &bytes).unwrap();
    }

    #[test]
    fn scenario_3_point_selection_issues_post_with_json_body() {
        let space = Dataspace::simple(vec![10, 10, 10]).unwrap();
        let coords: Vec<Vec<u64>> = (0..10).map(|i| vec![i, i, i]).collect();
        let points = Selection::Points(Points::new(coords).unwrap());
        let reply: Vec<u8> = (0..10i32).flat_map(|v| v.to_le_bytes()).collect();
        let reply_clone = reply.clone();
        let mem_space = Dataspace::simple(vec![10]).unwrap();

        let ctx = ctx_with(move |req| {
            assert_eq!(req.method, Method::Post);
            let body: serde_json::Value = serde_json::from_slice(&req.body).unwrap();
            assert_eq!(body["points"].as_array().unwrap().len(), 10);
            Ok(WireResponse { status: 200, body: reply_clone.clone() })
        });
        let mut out = vec![0u8; reply.len()];
        read_dataset_bytes(&ctx, "d-1", &space, &mem_space, &Datatype::i32(), &Selection::All, &points, &mut out).unwrap();
        assert_eq!(out.len(), 10 * 4);
    }

    #[test]
    fn scenario_4_reference_array_round_trips() {
        let space = Dataspace::simple(vec![8]).unwrap();
        let refs = vec![
            ObjectReference::object(TargetType::Group, "g-root"),
            ObjectReference::object(TargetType::Datatype, "t-1"),
            ObjectReference::object(TargetType::Dataset, "d-2"),
        ];
        let wire = h5vol_wire::refs::to_wire(&refs).unwrap();
        let mut padded = wire.clone();
        padded.extend(std::iter::repeat(0u8).take((8 - refs.len()) * WIRE_STRIDE));
        let padded_clone = padded.clone();

        let ctx = ctx_with(move |_| Ok(WireResponse { status: 200, body: padded_clone.clone() }));
        let decoded = read_dataset_references(&ctx, "d-refs", &space, &space, &Selection::All, &Selection::All).unwrap();
        assert_eq!(&decoded[..3], &refs[..]);
        assert!(!decoded[3].is_valid());
    }

    #[test]
    fn zero_element_selection_skips_the_request() {
        let space = Dataspace::simple(vec![4]).unwrap();
        let ctx = ctx_with(|_| panic!("a zero-element selection must not issue a request"));
        let mut out = vec![0u8; 16];
        read_dataset_bytes(&ctx, "d-1", &space, &space, &Datatype::i32(), &Selection::None, &Selection::None, &mut out).unwrap();
    }

    #[test]
    fn mismatched_selection_counts_are_rejected() {
        let space = Dataspace::simple(vec![4]).unwrap();
        let h = Hyperslab::new(vec![0], vec![1], vec![2], vec![1]).unwrap();
        let ctx = ctx_with(|_| panic!("mismatched counts must fail before a request is issued"));
        let mut out = vec![0u8; 16];
        let result = read_dataset_bytes(
            &ctx,
            "d-1",
            &space,
            &space,
            &Datatype::i32(),
            &Selection::All,
            &Selection::Hyperslab(h),
            &mut out,
        );
        assert!(matches!(result, Err(Error::InvalidArgument(_))));
    }

    #[test]
    fn variable_length_payload_is_rejected() {
        let space = Dataspace::simple(vec![1]).unwrap();
        let ctx = ctx_with(|_| panic!("variable-length payload transfer must not issue a request"));
        let mut out = vec![0u8; 0];
        let result = read_dataset_bytes(
            &ctx,
            "d-1",
            &space,
            &space,
            &Datatype::variable_string(),
            &Selection::All,
            &Selection::All,
            &mut out,
        );
        assert!(matches!(result, Err(Error::UnsupportedDatatype(_))));
    }

    #[test]
    fn existence_check_maps_404_to_false_not_error() {
        let ctx = ctx_with(|_| Ok(WireResponse { status: 404, body: vec![] }));
        let url = ctx.url("/groups/g-1/links/missing");
        assert!(!exists(&ctx, url).unwrap());
    }

    #[test]
    fn existence_check_propagates_server_errors() {
        let ctx = ctx_with(|_| Ok(WireResponse { status: 500, body: vec![] }));
        let url = ctx.url("/groups/g-1/links/whatever");
        assert!(exists(&ctx, url).is_err());
    }

    #[test]
    fn point_selection_write_is_unsupported() {
        let space = Dataspace::simple(vec![4]).unwrap();
        let points = Selection::Points(Points::new(vec![vec![0], vec![1]]).unwrap());
        let ctx = ctx_with(|_| panic!("an unsupported selection must fail before a request is issued"));
        let data = vec![0u8; 16];
        let result = write_dataset_bytes(&ctx, "d-1", &space, &space, &Datatype::i32(), &Selection::All, &points, &data);
        assert!(matches!(result, Err(Error::UnsupportedSelection(_))));
    }
}
