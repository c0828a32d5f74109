// Dweve Rowstream - Incremental CSV Record Decoding
//
// Copyright (c) 2025 Dweve IP B.V. and individual contributors.
//
// SPDX-License-Identifier: Apache-2.0
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License in the LICENSE file at the
// root of this repository or at: http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! ETag generation and `If-None-Match` evaluation.

use md5::{Digest, Md5};
use tracing::trace;

/// Status code of a full response.
pub const STATUS_OK: u16 = 200;

/// Status code of a revalidated response without a body.
pub const STATUS_NOT_MODIFIED: u16 = 304;

/// Generate a strong ETag for `body`.
///
/// The value is quoted and made of a `0` version marker followed by the
/// lowercase hex MD5 digest of the whole body.
///
/// # Examples
///
/// ```
/// use rowstream_etag::generate_etag;
///
/// let etag = generate_etag(b"Hello World");
/// assert!(etag.starts_with("\"0"));
/// assert!(etag.ends_with('"'));
/// assert_eq!(etag.len(), 2 + 1 + 32);
/// assert_eq!(etag, generate_etag(b"Hello World"));
/// ```
pub fn generate_etag(body: &[u8]) -> String {
    let digest = Md5::digest(body);
    let hex = digest
        .iter()
        .map(|byte| format!("{byte:02x}"))
        .collect::<String>();
    format!("\"0{hex}\"")
}

/// Whether an `If-None-Match` header value matches `etag`.
///
/// Matches `*`, the exact tag, or any member of a comma separated list.
/// A weak `W/` prefix on a listed tag is ignored.
pub fn if_none_match_matches(etag: &str, if_none_match: &str) -> bool {
    let header = if_none_match.trim();
    if header == "*" || header == etag {
        return true;
    }
    header
        .split(',')
        .map(str::trim)
        .map(|tag| tag.strip_prefix("W/").unwrap_or(tag))
        .any(|tag| tag == etag)
}

/// Outcome of revalidating a buffered body against a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Revalidation {
    /// The client copy is current; respond `304` without a body.
    NotModified {
        /// ETag of the body.
        etag: String,
    },
    /// Respond `200` with the full body.
    Modified {
        /// ETag of the body.
        etag: String,
        /// The response body.
        body: Vec<u8>,
    },
}

impl Revalidation {
    /// The ETag header value to send.
    pub fn etag(&self) -> &str {
        match self {
            Self::NotModified { etag } | Self::Modified { etag, .. } => etag,
        }
    }

    /// The response status code.
    pub fn status(&self) -> u16 {
        match self {
            Self::NotModified { .. } => STATUS_NOT_MODIFIED,
            Self::Modified { .. } => STATUS_OK,
        }
    }

    /// Whether the response is a `304 Not Modified`.
    pub fn is_not_modified(&self) -> bool {
        matches!(self, Self::NotModified { .. })
    }

    /// The body to send, `None` for a `304`.
    pub fn body(&self) -> Option<&[u8]> {
        match self {
            Self::NotModified { .. } => None,
            Self::Modified { body, .. } => Some(body),
        }
    }

    /// The content length header value, `None` for a `304`.
    pub fn content_length(&self) -> Option<usize> {
        self.body().map(<[u8]>::len)
    }

    /// Consume the outcome and return the body, if any.
    pub fn into_body(self) -> Option<Vec<u8>> {
        match self {
            Self::NotModified { .. } => None,
            Self::Modified { body, .. } => Some(body),
        }
    }
}

/// Revalidate a complete response body against the request's
/// `If-None-Match` header value.
///
/// # Examples
///
/// ```
/// use rowstream_etag::{generate_etag, revalidate};
///
/// let body = b"id,name\n1,alpha\n".to_vec();
/// let etag = generate_etag(&body);
///
/// let fresh = revalidate(body.clone(), None);
/// assert_eq!(fresh.status(), 200);
/// assert_eq!(fresh.content_length(), Some(body.len()));
///
/// let cached = revalidate(body, Some(&etag));
/// assert_eq!(cached.status(), 304);
/// assert!(cached.body().is_none());
/// ```
pub fn revalidate(body: impl Into<Vec<u8>>, if_none_match: Option<&str>) -> Revalidation {
    let body = body.into();
    let etag = generate_etag(&body);

    match if_none_match {
        Some(header) if if_none_match_matches(&etag, header) => {
            trace!(etag = %etag, "etag equal to If-None-Match, sending 304");
            Revalidation::NotModified { etag }
        }
        _ => {
            trace!(
                etag = %etag,
                if_none_match = if_none_match.unwrap_or(""),
                "etag not equal to If-None-Match, sending full response"
            );
            Revalidation::Modified { etag, body }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ==================== ETag generation ====================

    #[test]
    fn test_known_digest() {
        assert_eq!(
            generate_etag(b""),
            "\"0d41d8cd98f00b204e9800998ecf8427e\""
        );
        assert_eq!(
            generate_etag(b"Hello World"),
            "\"0b10a8db164e0754105b7a99be72e3fe5\""
        );
    }

    #[test]
    fn test_different_bodies_differ() {
        assert_ne!(generate_etag(b"a"), generate_etag(b"b"));
    }

    // ==================== Matching ====================

    #[test]
    fn test_exact_match() {
        let etag = generate_etag(b"x");
        assert!(if_none_match_matches(&etag, &etag));
        assert!(if_none_match_matches(&etag, &format!("  {}  ", etag)));
    }

    #[test]
    fn test_wildcard() {
        assert!(if_none_match_matches("\"0abc\"", "*"));
    }

    #[test]
    fn test_list_member() {
        assert!(if_none_match_matches("\"0abc\"", "\"0zzz\", \"0abc\""));
        assert!(if_none_match_matches("\"0abc\"", "W/\"0abc\""));
        assert!(!if_none_match_matches("\"0abc\"", "\"0zzz\", \"0yyy\""));
    }

    #[test]
    fn test_unquoted_or_empty_does_not_match() {
        assert!(!if_none_match_matches("\"0abc\"", "0abc"));
        assert!(!if_none_match_matches("\"0abc\"", ""));
    }

    // ==================== Revalidation ====================

    #[test]
    fn test_no_header_is_modified() {
        let outcome = revalidate(b"body".to_vec(), None);
        assert!(!outcome.is_not_modified());
        assert_eq!(outcome.status(), STATUS_OK);
        assert_eq!(outcome.content_length(), Some(4));
        assert_eq!(outcome.etag(), generate_etag(b"body"));
        assert_eq!(outcome.into_body(), Some(b"body".to_vec()));
    }

    #[test]
    fn test_matching_header_is_not_modified() {
        let etag = generate_etag(b"body");
        let outcome = revalidate(&b"body"[..], Some(&etag));
        assert_eq!(outcome, Revalidation::NotModified { etag });
        assert_eq!(outcome.status(), STATUS_NOT_MODIFIED);
        assert_eq!(outcome.content_length(), None);
    }

    #[test]
    fn test_stale_header_is_modified() {
        let outcome = revalidate(b"new".to_vec(), Some(&generate_etag(b"old")));
        assert_eq!(outcome.status(), STATUS_OK);
        assert_eq!(outcome.body(), Some(&b"new"[..]));
    }
}
