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

//! # Rowstream - Incremental CSV Record Decoding
//!
//! Rowstream reads CSV records from input that arrives one row at a time,
//! never reading past the rows already supplied plus a configurable lookahead.
//! Records spanning several rows (quoted line breaks) are assembled
//! transparently, and a reactive decoder turns byte chunk streams into
//! demand-driven record streams.
//!
//! ## Quick Start
//!
//! ```rust
//! use rowstream::csv::CsvSchema;
//! use rowstream::parse_rows;
//!
//! let schema = CsvSchema::builder()
//!     .column_separator(b';')
//!     .columns(["a", "b"])
//!     .build();
//!
//! let records = parse_rows(schema, ["1;2", "3;4", "5;6"], 1).unwrap();
//! assert_eq!(records.len(), 3);
//! assert_eq!(records[2].get("b"), Some("6"));
//! ```
//!
//! ## Modules
//!
//! - Crate root: row queue, record reader traits and the incremental parser
//! - [`csv`]: CSV schemas and the csv-core backed record reader (feature `csv`)
//! - [`codec`]: byte stream to record stream decoding (feature `codec`)
//! - [`etag`]: shallow ETag revalidation (feature `etag`)
//!
//! ## Feature Flags
//!
//! - `csv` (default): CSV record reader
//! - `codec` (default): reactive decoder
//! - `etag`: ETag revalidation
//! - `serde`: `Serialize`/`Deserialize` for [`Record`]
//! - `full`: everything

pub use rowstream_core::{
    IncrementalRowParser,
    RecordCursor,
    RecordReader,
    Record,
    // Errors
    RowError,
    RowResult,
    // Row input
    RowQueue,
    RowSource,
    SourceRead,
    DEFAULT_LOOKAHEAD,
    DEFAULT_ROW_TERMINATOR,
};

/// CSV schemas and record reading (requires `csv` feature).
#[cfg(feature = "csv")]
pub mod csv {
    pub use rowstream_csv::{
        CsvCursor, CsvError, CsvRecordReader, CsvSchema, CsvSchemaBuilder, HeaderMode,
        Result as CsvResult,
    };
}

/// Reactive decoding of byte chunk streams (requires `codec` feature).
#[cfg(feature = "codec")]
pub mod codec {
    pub use rowstream_codec::{
        CsvDecoder, CsvRecordStream, DecodeError, DecodeHints, DecodeResult, DecoderConfig,
        DecoderConfigBuilder, LineDecoder, MediaType, DEFAULT_MAX_IN_MEMORY_SIZE,
    };
}

/// Shallow ETag revalidation (requires `etag` feature).
#[cfg(feature = "etag")]
pub mod etag {
    pub use rowstream_etag::{
        generate_etag, if_none_match_matches, revalidate, ResponseBuffer, Revalidation,
        STATUS_NOT_MODIFIED, STATUS_OK,
    };
}

/// Parse complete rows with a CSV schema.
///
/// Every row is offered to an [`IncrementalRowParser`] in order, then the
/// parser is drained.
///
/// # Errors
///
/// Schema validation failures, malformed rows, and a zero `lookahead`.
///
/// # Examples
///
/// ```rust
/// use rowstream::csv::CsvSchema;
/// use rowstream::parse_rows;
///
/// let schema = CsvSchema::with_columns(["id", "note"]);
/// let rows = ["1,\"multi", "line\"", "2,single"];
/// let records = parse_rows(schema, rows, 2).unwrap();
///
/// assert_eq!(records.len(), 2);
/// assert_eq!(records[0].get("note"), Some("multi\nline"));
/// ```
#[cfg(feature = "csv")]
pub fn parse_rows<I, S>(schema: csv::CsvSchema, rows: I, lookahead: usize) -> RowResult<Vec<Record>>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let reader = csv::CsvRecordReader::new(schema)?;
    let mut parser = IncrementalRowParser::new(reader, lookahead)?;
    let mut records = Vec::new();
    for row in rows {
        records.extend(parser.parse(row)?);
    }
    records.extend(parser.parse_remaining()?);
    Ok(records)
}

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(all(test, feature = "csv"))]
mod tests {
    use super::*;
    use crate::csv::CsvSchema;

    #[test]
    fn test_parse_rows_semicolons() {
        let schema = CsvSchema::builder()
            .column_separator(b';')
            .columns(["a", "b"])
            .build();
        let records = parse_rows(schema, ["a;b", "c;d", "e;f"], 1).unwrap();
        let firsts: Vec<_> = records.iter().map(|r| r.get("a").unwrap()).collect();
        assert_eq!(firsts, vec!["a", "c", "e"]);
    }

    #[test]
    fn test_parse_rows_empty() {
        let records = parse_rows(CsvSchema::with_columns(["a"]), Vec::<String>::new(), 1).unwrap();
        assert!(records.is_empty());
    }

    #[test]
    fn test_parse_rows_zero_lookahead() {
        let err = parse_rows(CsvSchema::with_columns(["a"]), ["x"], 0).unwrap_err();
        assert!(matches!(err, RowError::InvalidLookahead(0)));
    }

    #[test]
    fn test_parse_rows_invalid_schema() {
        assert!(parse_rows(CsvSchema::default(), ["x"], 1).is_err());
    }

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
