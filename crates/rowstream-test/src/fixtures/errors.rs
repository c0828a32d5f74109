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

//! Error test fixtures.
//!
//! Inputs every CSV reader must reject, and schemas that must fail
//! validation.

use super::semicolon_schema;
use rowstream_csv::{CsvSchema, HeaderMode};

/// A schema and rows whose decoding must fail.
#[derive(Debug, Clone)]
pub struct MalformedInput {
    /// Schema used to read the rows.
    pub schema: CsvSchema,
    /// Input rows without terminators.
    pub rows: Vec<&'static str>,
    /// Number of records that decode successfully before the failure.
    pub valid_prefix: usize,
}

/// Malformed inputs as `(name, input)` pairs.
pub fn malformed_inputs() -> Vec<(&'static str, MalformedInput)> {
    vec![
        (
            "too_many_fields",
            MalformedInput {
                schema: semicolon_schema(&["h1", "h2"]),
                rows: vec!["a;b", "c;d;e", "f;g"],
                valid_prefix: 1,
            },
        ),
        (
            "too_many_fields_first_row",
            MalformedInput {
                schema: CsvSchema::with_columns(["only"]),
                rows: vec!["1,2"],
                valid_prefix: 0,
            },
        ),
        (
            "unterminated_quote",
            MalformedInput {
                schema: semicolon_schema(&["h1", "h2"]),
                rows: vec!["a;b", "\"open;x", "still open"],
                valid_prefix: 1,
            },
        ),
        (
            "duplicate_header",
            MalformedInput {
                schema: CsvSchema::builder().header(HeaderMode::FromInput).build(),
                rows: vec!["a,a", "1,2"],
                valid_prefix: 0,
            },
        ),
        (
            "empty_header_name",
            MalformedInput {
                schema: CsvSchema::builder().header(HeaderMode::FromInput).build(),
                rows: vec!["a,,c", "1,2,3"],
                valid_prefix: 0,
            },
        ),
    ]
}

/// Schemas that must fail validation, as `(name, schema)` pairs.
pub fn invalid_schemas() -> Vec<(&'static str, CsvSchema)> {
    vec![
        ("no_columns", CsvSchema::default()),
        (
            "separator_is_quote",
            CsvSchema::builder()
                .column_separator(b'"')
                .column("a")
                .build(),
        ),
        (
            "separator_is_newline",
            CsvSchema::builder()
                .column_separator(b'\n')
                .column("a")
                .build(),
        ),
        (
            "pipe_line_separator",
            CsvSchema::builder().line_separator("|").column("a").build(),
        ),
        (
            "multi_byte_line_separator",
            CsvSchema::builder().line_separator("||").column("a").build(),
        ),
        ("duplicate_columns", CsvSchema::with_columns(["a", "a"])),
    ]
}
