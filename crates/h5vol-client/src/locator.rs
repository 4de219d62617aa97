// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! The Object Locator: resolves a path to a `(kind, uri)` pair, with a
//! two-phase type probe when the caller does not already know what kind
//! of object the path names.

use h5vol_types::error::{Error, Result};
use h5vol_wire::path::{basename, dirname, encode_path_segment};

use crate::callbacks::{copy_object_uri, get_link_type, LinkResolution, ObjectKind};
use crate::context::Context;
use crate::transport::{Method, Transport, WireRequest};

/// The outcome of a locate operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Located {
    Found { kind: ObjectKind, uri: String },
    /// The server reported the path does not exist (HTTP 4xx).
    NotFound,
    /// The path resolves through a soft, external, or user-defined link.
    /// This core has no URI to report without further resolution it does
    /// not perform.
    Unresolvable,
}

/// Strips the leading whitespace and `".."` segment pairs a relative path
/// may carry. In this model `".."` is not a parent-group reference; it is
/// treated as naming a sibling of the current group, so leading `".."`
/// segments are simply dropped rather than walked.
fn normalize_relative(path: &str) -> &str {
    let mut p = path.trim_start();
    loop {
        if let Some(rest) = p.strip_prefix("../") {
            p = rest;
        } else if p == ".." {
            p = "";
            break;
        } else {
            break;
        }
    }
    p
}

/// Resolves `path` (relative to `parent_uri`, unless it is absolute)
/// against the server, using `kind_hint` if the caller already knows the
/// target kind. `file_root_uri` is the URI of the enclosing file's root
/// group, used only for the `path == "/"` fast path.
///
/// # Errors
/// Returns [`Error::Protocol`] for a 5xx response or any non-4xx/5xx
/// protocol failure, and propagates transport-level and parse errors.
/// A 4xx response is reported as `Ok(Located::NotFound)`, generalizing
/// the "404 on an existence check is `false`, not an error" rule to the
/// locator's own return discipline.
#[tracing::instrument(skip(ctx), fields(component = "h5vol_client", operation = "locate", parent_uri, path, kind_hint = ?kind_hint))]
pub fn locate<T: Transport>(
    ctx: &Context<T>,
    parent_uri: &str,
    file_root_uri: &str,
    path: &str,
    kind_hint: Option<ObjectKind>,
) -> Result<Located> {
    if path == "/" {
        return Ok(Located::Found {
            kind: ObjectKind::Group,
            uri: file_root_uri.to_string(),
        });
    }

    let path = normalize_relative(path);
    if path.is_empty() {
        return Ok(Located::Found {
            kind: ObjectKind::Group,
            uri: parent_uri.to_string(),
        });
    }

    let kind = match kind_hint {
        Some(k) => k,
        None => match probe_kind(ctx, parent_uri, file_root_uri, path)? {
            Located::Found { kind, .. } => kind,
            other => return Ok(other),
        },
    };

    resolve_with_kind(ctx, parent_uri, path, kind)
}

/// Phase one of the two-phase probe: discovers the link's collection by
/// asking the parent group about the link named by `path`'s basename,
/// resolving `path`'s directory component first if it has one.
fn probe_kind<T: Transport>(ctx: &Context<T>, parent_uri: &str, file_root_uri: &str, path: &str) -> Result<Located> {
    let dir = dirname(path);
    let effective_parent = if dir.is_empty() {
        parent_uri.to_string()
    } else {
        match locate(ctx, parent_uri, file_root_uri, dir, Some(ObjectKind::Group))? {
            Located::Found { uri, .. } => uri,
            other => return Ok(other),
        }
    };

    let name = encode_path_segment(basename(path));
    let url = ctx.url(&format!("/groups/{}/links/{name}", encode_path_segment(&effective_parent)));
    let response = ctx.execute(WireRequest::new(Method::Get, url))?;
    if !response.is_success() {
        return handle_non_success(response.status);
    }
    let body: serde_json::Value = serde_json::from_slice(&response.body)?;
    match get_link_type(&body)? {
        LinkResolution::ShortCircuited => Ok(Located::Unresolvable),
        LinkResolution::Resolved(kind) => {
            let uri = match copy_object_uri(&body)? {
                LinkResolution::Resolved(uri) => uri,
                LinkResolution::ShortCircuited => return Ok(Located::Unresolvable),
            };
            Ok(Located::Found { kind, uri })
        }
    }
}

/// Phase two: a single resolution request once the target kind is known.
fn resolve_with_kind<T: Transport>(ctx: &Context<T>, parent_uri: &str, path: &str, kind: ObjectKind) -> Result<Located> {
    let is_absolute = path.starts_with('/');
    let h5path = encode_path_segment(path);
    let url = match kind {
        ObjectKind::Group => {
            if is_absolute {
                ctx.url(&format!("/groups/?h5path={h5path}"))
            } else {
                ctx.url(&format!("/groups/?h5path={h5path}&grpid={}", encode_path_segment(parent_uri)))
            }
        }
        ObjectKind::Dataset => ctx.url(&format!("/datasets/?grpid={}&h5path={h5path}", encode_path_segment(parent_uri))),
        ObjectKind::Datatype => ctx.url(&format!("/datatypes/?grpid={}&h5path={h5path}", encode_path_segment(parent_uri))),
    };

    let response = ctx.execute(WireRequest::new(Method::Get, url))?;
    if !response.is_success() {
        return handle_non_success(response.status);
    }
    let body: serde_json::Value = serde_json::from_slice(&response.body)?;
    match copy_object_uri(&body)? {
        LinkResolution::Resolved(uri) => Ok(Located::Found { kind, uri }),
        LinkResolution::ShortCircuited => Ok(Located::Unresolvable),
    }
}

/// A 4xx response resolves to `Ok(Located::NotFound)`, with no URI and no
/// error. A 5xx (or otherwise unclassified) response is a genuine protocol
/// error and propagates as `Err`, matching the `Found`/`NotFound`/`Error`
/// return discipline this locator uses throughout.
fn handle_non_success(status: u16) -> Result<Located> {
    if (400..500).contains(&status) {
        tracing::debug!(status, "locate request reported not-found");
        Ok(Located::NotFound)
    } else {
        tracing::error!(status, "locate request failed with a server error");
        Err(Error::protocol(status))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Endpoint;
    use crate::tests_support::MockTransport;
    use serde_json::json;

    fn ctx_with(responder: impl Fn(&WireRequest) -> Result<crate::transport::WireResponse> + Send + Sync + 'static) -> Context<MockTransport> {
        Context::init(MockTransport::new(responder), Endpoint::new("http://localhost:5000", "/tmp/x.h5"))
    }

    #[test]
    fn root_path_resolves_without_a_request() {
        let ctx = ctx_with(|_| panic!("should not issue a request for \"/\""));
        let result = locate(&ctx, "f-1", "f-1", "/", None).unwrap();
        assert_eq!(result, Located::Found { kind: ObjectKind::Group, uri: "f-1".into() });
    }

    #[test]
    fn known_kind_issues_single_request() {
        let ctx = ctx_with(|req| {
            assert!(req.url.contains("/datasets/"));
            Ok(crate::transport::WireResponse { status: 200, body: json!({ "id": "d-1" }).to_string().into_bytes() })
        });
        let result = locate(&ctx, "g-1", "f-1", "my_dataset", Some(ObjectKind::Dataset)).unwrap();
        assert_eq!(result, Located::Found { kind: ObjectKind::Dataset, uri: "d-1".into() });
    }

    #[test]
    fn unknown_kind_probes_then_resolves() {
        crate::tests_support::init_test_tracing();
        let calls = std::sync::atomic::AtomicUsize::new(0);
        let ctx = ctx_with(move |req| {
            let n = calls.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
            if n == 0 {
                assert!(req.url.contains("/links/"));
                Ok(crate::transport::WireResponse {
                    status: 200,
                    body: json!({ "link": { "collection": "groups", "id": "g-2" } }).to_string().into_bytes(),
                })
            } else {
                assert!(req.url.contains("/groups/"));
                Ok(crate::transport::WireResponse { status: 200, body: json!({ "id": "g-2" }).to_string().into_bytes() })
            }
        });
        let result = locate(&ctx, "g-1", "f-1", "child_group", None).unwrap();
        assert_eq!(result, Located::Found { kind: ObjectKind::Group, uri: "g-2".into() });
    }

    #[test]
    fn not_found_status_reported_without_error() {
        let ctx = ctx_with(|_| Ok(crate::transport::WireResponse { status: 404, body: vec![] }));
        let result = locate(&ctx, "g-1", "f-1", "missing", Some(ObjectKind::Dataset)).unwrap();
        assert_eq!(result, Located::NotFound);
    }

    #[test]
    fn server_error_status_propagates_as_error() {
        let ctx = ctx_with(|_| Ok(crate::transport::WireResponse { status: 503, body: vec![] }));
        let result = locate(&ctx, "g-1", "f-1", "missing", Some(ObjectKind::Dataset));
        assert!(matches!(result, Err(Error::Protocol { code: 503, .. })));
    }

    #[test]
    fn soft_link_short_circuits() {
        let ctx = ctx_with(|_| {
            Ok(crate::transport::WireResponse {
                status: 200,
                body: json!({ "link": { "class": "H5L_TYPE_SOFT", "collection": "datasets" } }).to_string().into_bytes(),
            })
        });
        let result = locate(&ctx, "g-1", "f-1", "soft_target", None).unwrap();
        assert_eq!(result, Located::Unresolvable);
    }
}
