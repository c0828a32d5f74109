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

//! Incremental CSV record reading.
//!
//! This crate provides the CSV [`RecordReader`](rowstream_core::RecordReader)
//! used by the incremental row parser. Rows may arrive one at a time; the
//! reader resumes exactly where it stopped, so quoted fields spanning several
//! rows are assembled correctly without blocking for input.
//!
//! # Features
//!
//! - **Schema-bound**: explicit column names, separator, quote and escape characters
//! - **Header handling**: columns from the schema, from the first record, or skip it
//! - **Resumable**: built on the push tokenizer from `csv-core`
//! - **Strict width**: records with too many fields are malformed unless trailing
//!   columns are ignored; short records carry only the columns present
//!
//! # Examples
//!
//! ```
//! use rowstream_core::IncrementalRowParser;
//! use rowstream_csv::{CsvRecordReader, CsvSchema};
//!
//! let schema = CsvSchema::builder()
//!     .column_separator(b';')
//!     .columns(["h1", "h2"])
//!     .build();
//! let mut parser = IncrementalRowParser::new(CsvRecordReader::new(schema).unwrap(), 1).unwrap();
//!
//! assert!(parser.parse("a;b").unwrap().is_none());
//! assert_eq!(parser.parse("c;d").unwrap().unwrap().get("h1"), Some("a"));
//! assert_eq!(parser.parse("e;f").unwrap().unwrap().get("h1"), Some("c"));
//!
//! let rest = parser.parse_remaining().unwrap();
//! assert_eq!(rest[0].get("h2"), Some("f"));
//! ```
//!
//! ## Header From Input
//!
//! ```
//! use rowstream_core::IncrementalRowParser;
//! use rowstream_csv::{CsvRecordReader, CsvSchema, HeaderMode};
//!
//! let schema = CsvSchema::builder().header(HeaderMode::FromInput).build();
//! let mut parser = IncrementalRowParser::new(CsvRecordReader::new(schema).unwrap(), 1).unwrap();
//!
//! assert!(parser.parse("name,age").unwrap().is_none());
//! let record = parser.parse("ada,36").unwrap().unwrap();
//! assert_eq!(record.get("name"), Some("ada"));
//! assert_eq!(record.get("age"), Some("36"));
//! ```

mod error;
mod reader;
mod schema;

pub use error::{CsvError, Result};
pub use reader::{CsvCursor, CsvRecordReader};
pub use schema::{CsvSchema, CsvSchemaBuilder, HeaderMode};
