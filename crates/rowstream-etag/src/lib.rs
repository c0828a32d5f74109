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

//! Shallow ETag revalidation.
//!
//! The full response body is buffered, hashed, and compared against the
//! request's `If-None-Match` header. This saves bandwidth, not server work:
//! the body is always produced in full.
//!
//! ```text
//! handler ──write──▶ ResponseBuffer ──finish(If-None-Match)──▶ Revalidation
//!                                                       ├─ NotModified { etag }        → 304
//!                                                       └─ Modified { etag, body }     → 200
//! ```
//!
//! # Examples
//!
//! ```
//! use std::io::Write;
//! use rowstream_etag::{ResponseBuffer, Revalidation};
//!
//! let mut buffer = ResponseBuffer::new();
//! buffer.write_all(b"header1;header2\nvalue1;value2\n").unwrap();
//! let etag = buffer.etag();
//!
//! match buffer.finish(Some(&etag)) {
//!     Revalidation::NotModified { etag: sent } => assert_eq!(sent, etag),
//!     Revalidation::Modified { .. } => unreachable!(),
//! }
//! ```

mod buffer;
mod etag;

pub use buffer::ResponseBuffer;
pub use etag::{
    generate_etag, if_none_match_matches, revalidate, Revalidation, STATUS_NOT_MODIFIED,
    STATUS_OK,
};
