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

//! Incremental Row Parsing Core
//!
//! This crate provides the engine that turns rows arriving over time into
//! records pulled one at a time. It sits between a push-style source (lines
//! decoded from network chunks, in arbitrary batches) and a pull-style record
//! reader that expects a character source and may need to look ahead across
//! rows to resolve quoting.
//!
//! # Components
//!
//! - [`RowQueue`]: append-only queue of pending rows with a non-blocking read
//!   side that distinguishes "no data yet" from "end of input"
//! - [`IncrementalRowParser`]: lookahead-gated bridge that yields at most one
//!   record per row and drains the rest at end of input
//! - [`RecordReader`] / [`RecordCursor`]: the schema-bound reader capability
//! - [`Record`]: ordered column-name to value mapping
//!
//! # Data Flow
//!
//! ```text
//! rows ──▶ IncrementalRowParser::parse ──▶ RowQueue ──▶ RecordCursor ──▶ 0..1 Record
//!                                                                        │
//! end of input ──▶ IncrementalRowParser::parse_remaining ──▶ Vec<Record> ◀┘
//! ```
//!
//! # Concurrency
//!
//! Everything here is single-owner and synchronous. A parser is driven by one
//! logical consumer; no operation blocks on I/O and no locking is used.
//!
//! # Feature Flags
//!
//! - `serde`: `Serialize`/`Deserialize` for [`Record`]

mod error;
mod parser;
mod queue;
mod reader;
mod record;
mod source;

pub use error::{RowError, RowResult};
pub use parser::{IncrementalRowParser, DEFAULT_LOOKAHEAD};
pub use queue::{RowQueue, DEFAULT_ROW_TERMINATOR};
pub use reader::{RecordCursor, RecordReader};
pub use record::Record;
pub use source::{RowSource, SourceRead};
