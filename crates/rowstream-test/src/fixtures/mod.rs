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

//! Canonical CSV fixtures.
//!
//! Each fixture pairs a schema with the input rows (as a line decoder would
//! produce them, without terminators) and the records a correct reader emits.
//!
//! - **builders**: Record and CSV text builders
//! - **errors**: Inputs that must be rejected

pub mod builders;
pub mod errors;

use builders::record;
use rowstream_core::Record;
use rowstream_csv::{CsvSchema, HeaderMode};

/// Type alias for a list of fixture functions (name, generator).
pub type FixtureList = Vec<(&'static str, fn() -> CsvFixture)>;

/// A schema, its input rows and the expected records.
#[derive(Debug, Clone)]
pub struct CsvFixture {
    /// Schema used to read the rows.
    pub schema: CsvSchema,
    /// Input rows without terminators.
    pub rows: Vec<String>,
    /// Records a correct reader produces, in order.
    pub expected: Vec<Record>,
}

impl CsvFixture {
    fn new(schema: CsvSchema, rows: &[&str], expected: Vec<Record>) -> Self {
        Self {
            schema,
            rows: rows.iter().map(|r| r.to_string()).collect(),
            expected,
        }
    }

    /// The rows as one newline-terminated text.
    pub fn text(&self) -> String {
        self.rows.iter().map(|row| format!("{}\n", row)).collect()
    }
}

/// Returns all fixture functions for iteration.
///
/// Useful for running the same test across all fixtures.
pub fn all() -> FixtureList {
    vec![
        ("semicolon_pairs", semicolon_pairs),
        ("multi_line_quoted", multi_line_quoted),
        ("embedded_quotes", embedded_quotes),
        ("short_rows", short_rows),
        ("unicode", unicode),
        ("header_from_input", header_from_input),
        ("empty_values", empty_values),
        ("empty", empty),
    ]
}

/// `a;b`, `c;d`, `e;f` over columns `h1;h2`.
pub fn semicolon_pairs() -> CsvFixture {
    CsvFixture::new(
        semicolon_schema(&["h1", "h2"]),
        &["a;b", "c;d", "e;f"],
        vec![
            record(&[("h1", "a"), ("h2", "b")]),
            record(&[("h1", "c"), ("h2", "d")]),
            record(&[("h1", "e"), ("h2", "f")]),
        ],
    )
}

/// A quoted field containing a line break, so two rows form one record.
pub fn multi_line_quoted() -> CsvFixture {
    CsvFixture::new(
        CsvSchema::with_columns(["id", "note"]),
        &["1,\"first", "second\"", "2,plain"],
        vec![
            record(&[("id", "1"), ("note", "first\nsecond")]),
            record(&[("id", "2"), ("note", "plain")]),
        ],
    )
}

/// Doubled quotes and separators inside quoted fields.
pub fn embedded_quotes() -> CsvFixture {
    CsvFixture::new(
        CsvSchema::with_columns(["id", "note"]),
        &["1,\"say \"\"hi\"\"\"", "2,\"a,b\""],
        vec![
            record(&[("id", "1"), ("note", "say \"hi\"")]),
            record(&[("id", "2"), ("note", "a,b")]),
        ],
    )
}

/// Rows with fewer fields than columns.
pub fn short_rows() -> CsvFixture {
    CsvFixture::new(
        CsvSchema::with_columns(["a", "b", "c"]),
        &["1,2,3", "4,5", "6"],
        vec![
            record(&[("a", "1"), ("b", "2"), ("c", "3")]),
            record(&[("a", "4"), ("b", "5")]),
            record(&[("a", "6")]),
        ],
    )
}

/// Non-ASCII text.
pub fn unicode() -> CsvFixture {
    CsvFixture::new(
        CsvSchema::with_columns(["x", "y"]),
        &["ünï,çødé", "日本,語", "emoji,🦀"],
        vec![
            record(&[("x", "ünï"), ("y", "çødé")]),
            record(&[("x", "日本"), ("y", "語")]),
            record(&[("x", "emoji"), ("y", "🦀")]),
        ],
    )
}

/// Column names read from the first row.
pub fn header_from_input() -> CsvFixture {
    CsvFixture::new(
        CsvSchema::builder().header(HeaderMode::FromInput).build(),
        &["name,age", "ada,36", "alan,41"],
        vec![
            record(&[("name", "ada"), ("age", "36")]),
            record(&[("name", "alan"), ("age", "41")]),
        ],
    )
}

/// Empty fields are kept as empty strings.
pub fn empty_values() -> CsvFixture {
    CsvFixture::new(
        CsvSchema::with_columns(["a", "b", "c"]),
        &[",,", "x,,z"],
        vec![
            record(&[("a", ""), ("b", ""), ("c", "")]),
            record(&[("a", "x"), ("b", ""), ("c", "z")]),
        ],
    )
}

/// No input at all.
pub fn empty() -> CsvFixture {
    CsvFixture::new(CsvSchema::with_columns(["a"]), &[], Vec::new())
}

/// Semicolon-separated schema with the given columns.
pub fn semicolon_schema(columns: &[&str]) -> CsvSchema {
    CsvSchema::builder()
        .column_separator(b';')
        .columns(columns.iter().copied())
        .build()
}
