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

//! Reactive CSV decoding.
//!
//! Turns a backpressure-aware stream of byte chunks into a demand-driven
//! stream of CSV records:
//!
//! ```text
//! Stream<Result<Bytes, E>>
//!     │  charset decoding (encoding_rs), line splitting with a size limit
//!     ▼
//! lines ──▶ IncrementalRowParser::parse ──▶ 0..1 Record per line
//!     │
//! end of input ──▶ IncrementalRowParser::parse_remaining ──▶ remaining Records
//! ```
//!
//! Records are forwarded as soon as the row parser yields them. Upstream is
//! only polled once every decoded line has been handed to the parser, so the
//! consumer's pull rate governs how fast input is read.
//!
//! # Failure Semantics
//!
//! A record stream yields a prefix of correct records followed by at most one
//! error. A line exceeding the maximum in-memory size yields
//! [`DecodeError::PayloadTooLarge`]; an upstream failure is forwarded as
//! [`DecodeError::Upstream`] without draining buffered rows.
//!
//! # Examples
//!
//! ```
//! use futures::{executor::block_on, StreamExt};
//! use rowstream_codec::{CsvDecoder, DecodeError, DecodeHints, MediaType};
//! use rowstream_csv::CsvSchema;
//!
//! let decoder = CsvDecoder::new(CsvSchema::with_columns(["id", "name"])).unwrap();
//! let media: MediaType = "text/csv; charset=UTF-8".parse().unwrap();
//! let chunks = futures::stream::iter(vec![Ok::<_, std::io::Error>(
//!     bytes::Bytes::from("1,alpha\n2,beta"),
//! )]);
//!
//! let mut records = decoder.decode(chunks, Some(&media), &DecodeHints::none());
//! block_on(async {
//!     while let Some(record) = records.next().await {
//!         let record = record?;
//!         assert!(record.contains("name"));
//!     }
//!     Ok::<_, DecodeError>(())
//! })
//! .unwrap();
//! ```

mod config;
mod decoder;
mod error;
mod lines;
mod media;
mod stream;

pub use config::{DecodeHints, DecoderConfig, DecoderConfigBuilder, DEFAULT_MAX_IN_MEMORY_SIZE};
pub use decoder::CsvDecoder;
pub use error::{DecodeError, DecodeResult};
pub use lines::LineDecoder;
pub use media::MediaType;
pub use stream::CsvRecordStream;
