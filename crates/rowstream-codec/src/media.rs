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

//! Media types.

use crate::error::{DecodeError, DecodeResult};
use encoding_rs::{Encoding, UTF_8};
use std::fmt;
use std::str::FromStr;

/// A parsed media type such as `text/csv; charset=UTF-8`.
///
/// Type, subtype and parameter names are case-insensitive and stored in
/// lowercase. Parameter values keep their case, with surrounding quotes
/// removed.
///
/// # Examples
///
/// ```
/// use rowstream_codec::MediaType;
///
/// let media: MediaType = "Text/CSV; charset=\"ISO-8859-1\"".parse().unwrap();
/// assert_eq!(media.essence(), "text/csv");
/// assert_eq!(media.param("Charset"), Some("ISO-8859-1"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaType {
    kind: String,
    subtype: String,
    params: Vec<(String, String)>,
}

impl MediaType {
    /// Create a media type without parameters.
    pub fn new(kind: impl Into<String>, subtype: impl Into<String>) -> Self {
        Self {
            kind: kind.into().to_ascii_lowercase(),
            subtype: subtype.into().to_ascii_lowercase(),
            params: Vec::new(),
        }
    }

    /// `text/csv`.
    pub fn text_csv() -> Self {
        Self::new("text", "csv")
    }

    /// Add or replace a parameter.
    pub fn with_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        let name = name.into().to_ascii_lowercase();
        let value = value.into();
        match self.params.iter_mut().find(|(n, _)| *n == name) {
            Some(slot) => slot.1 = value,
            None => self.params.push((name, value)),
        }
        self
    }

    /// The top-level type, e.g. `text`.
    pub fn kind(&self) -> &str {
        &self.kind
    }

    /// The subtype, e.g. `csv`.
    pub fn subtype(&self) -> &str {
        &self.subtype
    }

    /// `type/subtype` without parameters.
    pub fn essence(&self) -> String {
        format!("{}/{}", self.kind, self.subtype)
    }

    /// Look up a parameter value by case-insensitive name.
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// The `charset` parameter, if present.
    pub fn charset(&self) -> Option<&str> {
        self.param("charset")
    }

    /// Resolve the character encoding, defaulting to UTF-8.
    ///
    /// # Errors
    ///
    /// Returns [`DecodeError::UnsupportedCharset`] for an unknown label.
    pub fn encoding(&self) -> DecodeResult<&'static Encoding> {
        match self.charset() {
            None => Ok(UTF_8),
            Some(label) => Encoding::for_label(label.trim().as_bytes())
                .ok_or_else(|| DecodeError::UnsupportedCharset(label.to_string())),
        }
    }

    /// Whether `self` and `other` share type and subtype, with `*` matching anything.
    pub fn is_compatible_with(&self, other: &MediaType) -> bool {
        let kind = self.kind == "*" || other.kind == "*" || self.kind == other.kind;
        let subtype = self.subtype == "*" || other.subtype == "*" || self.subtype == other.subtype;
        kind && subtype
    }
}

impl FromStr for MediaType {
    type Err = DecodeError;

    fn from_str(value: &str) -> DecodeResult<Self> {
        let invalid = |reason: &str| DecodeError::InvalidMediaType {
            value: value.to_string(),
            reason: reason.to_string(),
        };

        let mut parts = value.split(';');
        let essence = parts.next().unwrap_or_default().trim();
        let (kind, subtype) = essence
            .split_once('/')
            .ok_or_else(|| invalid("missing '/'"))?;
        let (kind, subtype) = (kind.trim(), subtype.trim());
        if kind.is_empty() || subtype.is_empty() {
            return Err(invalid("empty type or subtype"));
        }

        let mut media = MediaType::new(kind, subtype);
        for param in parts {
            let param = param.trim();
            if param.is_empty() {
                continue;
            }
            let (name, val) = param
                .split_once('=')
                .ok_or_else(|| invalid("parameter without '='"))?;
            let name = name.trim();
            if name.is_empty() {
                return Err(invalid("empty parameter name"));
            }
            let val = val.trim();
            let val = val
                .strip_prefix('"')
                .and_then(|v| v.strip_suffix('"'))
                .unwrap_or(val);
            media = media.with_param(name, val);
        }
        Ok(media)
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.kind, self.subtype)?;
        for (name, value) in &self.params {
            write!(f, "; {}={}", name, value)?;
        }
        Ok(())
    }
}
