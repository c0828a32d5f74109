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

//! In-memory response body buffer.

use crate::etag::{generate_etag, revalidate, Revalidation};
use std::fmt;
use std::io;

/// Accumulates a response body so its ETag can be computed once complete.
///
/// Both byte writes ([`io::Write`]) and text writes ([`fmt::Write`], UTF-8)
/// land in the same buffer, in call order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResponseBuffer {
    content: Vec<u8>,
}

impl ResponseBuffer {
    /// An empty buffer.
    pub fn new() -> Self {
        Self::default()
    }

    /// An empty buffer with room for `capacity` bytes.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            content: Vec::with_capacity(capacity),
        }
    }

    /// Bytes written so far.
    pub fn len(&self) -> usize {
        self.content.len()
    }

    /// Whether nothing has been written.
    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    /// The buffered body.
    pub fn as_bytes(&self) -> &[u8] {
        &self.content
    }

    /// Discard everything written so far.
    pub fn reset(&mut self) {
        self.content.clear();
    }

    /// ETag of the body written so far.
    pub fn etag(&self) -> String {
        generate_etag(&self.content)
    }

    /// Consume the buffer and return the body.
    pub fn into_bytes(self) -> Vec<u8> {
        self.content
    }

    /// Complete the body and revalidate it against an `If-None-Match` value.
    pub fn finish(self, if_none_match: Option<&str>) -> Revalidation {
        revalidate(self.content, if_none_match)
    }
}

impl io::Write for ResponseBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.content.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn write_all(&mut self, buf: &[u8]) -> io::Result<()> {
        self.content.extend_from_slice(buf);
        Ok(())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl fmt::Write for ResponseBuffer {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.content.extend_from_slice(s.as_bytes());
        Ok(())
    }
}

impl From<Vec<u8>> for ResponseBuffer {
    fn from(content: Vec<u8>) -> Self {
        Self { content }
    }
}
