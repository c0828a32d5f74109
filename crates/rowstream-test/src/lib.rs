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

//! Shared test fixtures and utilities for incremental row decoding.
//!
//! This crate provides canonical CSV inputs with their expected records,
//! builders, malformed-input fixtures and byte stream helpers so the core,
//! CSV, codec and CLI crates test against the same data.
//!
//! # Features
//!
//! - **Pre-built Fixtures**: schema, input rows and expected records per scenario
//! - **Builder Pattern**: fluent construction of records and CSV text
//! - **Error Fixtures**: inputs every reader must reject
//! - **Streams**: chunked, failing and channel-backed byte streams
//!
//! # Quick Start
//!
//! ```rust
//! use rowstream_core::IncrementalRowParser;
//! use rowstream_csv::CsvRecordReader;
//! use rowstream_test::fixtures;
//!
//! for (name, fixture_fn) in fixtures::all() {
//!     let fixture = fixture_fn();
//!     let reader = CsvRecordReader::new(fixture.schema.clone()).unwrap();
//!     let mut parser = IncrementalRowParser::new(reader, 1).unwrap();
//!
//!     let mut records = Vec::new();
//!     for row in &fixture.rows {
//!         records.extend(parser.parse(row.as_str()).unwrap());
//!     }
//!     records.extend(parser.parse_remaining().unwrap());
//!     assert_eq!(records, fixture.expected, "fixture {}", name);
//! }
//! ```

/// Canonical test fixtures.
pub mod fixtures;

/// Byte stream helpers for decoder tests.
pub mod streams;

pub use fixtures::builders::{record, split_rows, write_csv, RecordBuilder};
pub use fixtures::{CsvFixture, FixtureList};
pub use streams::{byte_at_a_time, chunked, failing_after, from_chunks, ByteStream, CountingStream};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixture_names_unique() {
        let names: Vec<_> = fixtures::all().into_iter().map(|(name, _)| name).collect();
        for (i, name) in names.iter().enumerate() {
            assert!(!names[..i].contains(name), "duplicate fixture {}", name);
        }
    }

    #[test]
    fn test_fixture_schemas_valid() {
        for (name, fixture_fn) in fixtures::all() {
            assert!(
                fixture_fn().schema.validate().is_ok(),
                "fixture {} has an invalid schema",
                name
            );
        }
    }

    #[test]
    fn test_text_ends_with_newline() {
        let fixture = fixtures::semicolon_pairs();
        assert_eq!(fixture.text(), "a;b\nc;d\ne;f\n");
        assert_eq!(fixtures::empty().text(), "");
    }
}
