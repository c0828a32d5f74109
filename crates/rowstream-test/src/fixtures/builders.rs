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

//! Builder pattern for creating records and CSV text.

use rowstream_core::Record;
use std::io;

/// Build a record from `(column, value)` pairs.
///
/// # Examples
///
/// ```
/// use rowstream_test::record;
///
/// let r = record(&[("h1", "a"), ("h2", "b")]);
/// assert_eq!(r.get("h2"), Some("b"));
/// ```
pub fn record(pairs: &[(&str, &str)]) -> Record {
    pairs.iter().copied().collect()
}

/// Builder for creating customizable Record fixtures.
///
/// # Examples
///
/// ```
/// use rowstream_test::RecordBuilder;
///
/// let r = RecordBuilder::new()
///     .field("name", "Alice")
///     .field("age", "30")
///     .build();
///
/// assert_eq!(r.columns().collect::<Vec<_>>(), ["name", "age"]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct RecordBuilder {
    record: Record,
}

impl RecordBuilder {
    /// Creates an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a field.
    pub fn field(mut self, column: impl Into<String>, value: impl Into<String>) -> Self {
        self.record.insert(column, value);
        self
    }

    /// Adds fields named `c0`, `c1`, ... for each value.
    pub fn positional<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let start = self.record.len();
        for (i, value) in values.into_iter().enumerate() {
            self.record.insert(format!("c{}", start + i), value);
        }
        self
    }

    /// Builds the record.
    pub fn build(self) -> Record {
        self.record
    }
}

/// Write rows of fields as CSV text using `delimiter` and `\n` terminators.
///
/// Fields are quoted only when necessary, the way a well-behaved producer
/// would write them.
///
/// # Examples
///
/// ```
/// use rowstream_test::write_csv;
///
/// let text = write_csv(b';', &[vec!["a", "b;c"], vec!["line\nbreak", ""]]).unwrap();
/// assert_eq!(text, "a;\"b;c\"\n\"line\nbreak\";\n");
/// ```
pub fn write_csv<S: AsRef<str>>(delimiter: u8, rows: &[Vec<S>]) -> csv::Result<String> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(delimiter)
        .terminator(csv::Terminator::Any(b'\n'))
        .flexible(true)
        .from_writer(Vec::new());

    for row in rows {
        writer.write_record(row.iter().map(|field| field.as_ref()))?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|err| csv::Error::from(io::Error::new(err.error().kind(), err.to_string())))?;
    String::from_utf8(bytes)
        .map_err(|err| csv::Error::from(io::Error::new(io::ErrorKind::InvalidData, err)))
}

/// Split CSV text into rows the way a line decoder would.
///
/// A trailing terminator does not produce an empty final row.
pub fn split_rows(text: &str) -> Vec<String> {
    if text.is_empty() {
        return Vec::new();
    }
    let body = text.strip_suffix('\n').unwrap_or(text);
    body.split('\n').map(str::to_string).collect()
}
