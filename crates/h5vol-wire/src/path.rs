// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! POSIX-like path utilities over `/`-delimited object paths, plus the
//! URL-encoding used whenever a name appears in a URL path segment.

use percent_encoding::{percent_encode, AsciiSet, NON_ALPHANUMERIC};

/// Everything outside RFC 3986's unreserved set (`A-Za-z0-9-_.~`).
/// `NON_ALPHANUMERIC` already excludes every ASCII letter and digit; the
/// three additional unreserved punctuation characters are carved back out.
const PATH_SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Returns the substring after the last `/`, or the whole string if there
/// is none.
#[must_use]
pub fn basename(p: &str) -> &str {
    match p.rfind('/') {
        Some(i) => &p[i + 1..],
        None => p,
    }
}

/// Returns the substring up to and including the last `/`, or the empty
/// string if there is none.
#[must_use]
pub fn dirname(p: &str) -> &str {
    match p.rfind('/') {
        Some(i) => &p[..=i],
        None => "",
    }
}

/// URL-encodes `s` for use as one path segment, escaping every character
/// outside the unreserved set (`A-Za-z0-9-_.~`).
#[must_use]
pub fn encode_path_segment(s: &str) -> String {
    percent_encode(s.as_bytes(), PATH_SEGMENT).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn basename_returns_tail() {
        assert_eq!(basename("/a/b/c"), "c");
        assert_eq!(basename("c"), "c");
        assert_eq!(basename("/"), "");
    }

    #[test]
    fn dirname_includes_trailing_slash() {
        assert_eq!(dirname("/a/b/c"), "/a/b/");
        assert_eq!(dirname("c"), "");
        assert_eq!(dirname("/"), "/");
    }

    #[test]
    fn encode_path_segment_escapes_reserved_characters() {
        assert_eq!(encode_path_segment("a b"), "a%20b");
        assert_eq!(encode_path_segment("a/b"), "a%2Fb");
        assert_eq!(encode_path_segment("abc-1.2_3~"), "abc-1.2_3~");
    }
}
