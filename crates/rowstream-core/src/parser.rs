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

//! Incremental row parser.
//!
//! Bridges a push-style supply of rows to a pull-style record reader. Rows are
//! queued until more than `lookahead` of them are buffered; only then is the
//! reader's cursor created and asked for a record. Each [`parse`] call yields
//! at most one record, so the consumer's pull cadence is preserved exactly.
//!
//! [`parse`]: IncrementalRowParser::parse

use crate::error::{RowError, RowResult};
use crate::queue::RowQueue;
use crate::reader::{RecordCursor, RecordReader};
use crate::record::Record;
use std::fmt;
use tracing::{debug, trace};

/// Default number of rows buffered before the first record is pulled.
pub const DEFAULT_LOOKAHEAD: usize = 1;

/// Incremental, lookahead-gated row parser.
///
/// # Ownership
///
/// The parser is a single-owner object: [`parse`](Self::parse) takes
/// `&mut self` and [`parse_remaining`](Self::parse_remaining) consumes the
/// parser, so calls are sequential by construction and no further rows can be
/// supplied after the final drain. There is no internal locking; sharing a
/// parser between tasks requires an external synchronization wrapper.
///
/// # Lookahead
///
/// The reader's cursor is never created before `lookahead + 1` rows are
/// buffered. A reader that scans past a row boundary to confirm quote closure
/// therefore always has at least `lookahead` further rows available. Larger
/// values delay the first record; smaller values emit sooner.
///
/// # Failure
///
/// Any error is terminal. The parser is poisoned and every later call returns
/// [`RowError::Poisoned`].
///
/// # Examples
///
/// ```rust
/// use rowstream_core::{IncrementalRowParser, Record, RecordCursor, RecordReader, RowResult,
///     RowSource, SourceRead};
///
/// // A toy reader: one record per line, whole line in column "line".
/// struct Lines;
/// struct LinesCursor(String);
///
/// impl RecordReader for Lines {
///     type Cursor = LinesCursor;
///     fn read_values(&self) -> RowResult<LinesCursor> {
///         Ok(LinesCursor(String::new()))
///     }
/// }
///
/// impl RecordCursor for LinesCursor {
///     fn next_record(&mut self, source: &mut dyn RowSource) -> RowResult<Option<Record>> {
///         loop {
///             match source.read_char() {
///                 SourceRead::Data('\n') => {
///                     let line = std::mem::take(&mut self.0);
///                     return Ok(Some([("line", line)].into_iter().collect()));
///                 }
///                 SourceRead::Data(ch) => self.0.push(ch),
///                 SourceRead::Pending | SourceRead::Eof => return Ok(None),
///             }
///         }
///     }
/// }
///
/// let mut parser = IncrementalRowParser::new(Lines, 1).unwrap();
/// assert!(parser.parse("a").unwrap().is_none());
/// assert_eq!(parser.parse("b").unwrap().unwrap().get("line"), Some("a"));
///
/// let rest = parser.parse_remaining().unwrap();
/// assert_eq!(rest.len(), 1);
/// assert_eq!(rest[0].get("line"), Some("b"));
/// ```
pub struct IncrementalRowParser<R: RecordReader> {
    reader: R,
    lookahead: usize,
    rows: RowQueue,
    cursor: Option<R::Cursor>,
    poisoned: bool,
    records_emitted: usize,
}

impl<R: RecordReader> IncrementalRowParser<R> {
    /// Create a parser over `reader` with the given lookahead.
    ///
    /// # Errors
    ///
    /// Returns [`RowError::InvalidLookahead`] if `lookahead` is zero.
    pub fn new(reader: R, lookahead: usize) -> RowResult<Self> {
        if lookahead == 0 {
            return Err(RowError::InvalidLookahead(lookahead));
        }

        let rows = RowQueue::with_terminator(reader.row_terminator());
        Ok(Self {
            reader,
            lookahead,
            rows,
            cursor: None,
            poisoned: false,
            records_emitted: 0,
        })
    }

    /// Create a parser with [`DEFAULT_LOOKAHEAD`].
    pub fn with_default_lookahead(reader: R) -> Self {
        let rows = RowQueue::with_terminator(reader.row_terminator());
        Self {
            reader,
            lookahead: DEFAULT_LOOKAHEAD,
            rows,
            cursor: None,
            poisoned: false,
            records_emitted: 0,
        }
    }

    /// The configured lookahead.
    #[inline]
    pub fn lookahead(&self) -> usize {
        self.lookahead
    }

    /// Rows buffered but not yet consumed by the reader.
    #[inline]
    pub fn buffered_rows(&self) -> usize {
        self.rows.size()
    }

    /// Total rows supplied so far.
    #[inline]
    pub fn rows_added(&self) -> usize {
        self.rows.rows_added()
    }

    /// Total records returned by [`parse`](Self::parse) so far.
    #[inline]
    pub fn records_emitted(&self) -> usize {
        self.records_emitted
    }

    /// Whether an earlier failure poisoned the parser.
    #[inline]
    pub fn is_poisoned(&self) -> bool {
        self.poisoned
    }

    /// Whether the reader's cursor has been created.
    #[inline]
    pub fn is_started(&self) -> bool {
        self.cursor.is_some()
    }

    /// Add one row and return at most one record.
    ///
    /// Returns `Ok(None)` while no more than `lookahead` rows are buffered, and
    /// also when the reader consumed input without completing a record.
    ///
    /// # Errors
    ///
    /// Any failure from the record reader, or [`RowError::Poisoned`] if an
    /// earlier call failed.
    pub fn parse(&mut self, row: impl Into<String>) -> RowResult<Option<Record>> {
        if self.poisoned {
            return Err(RowError::Poisoned);
        }

        let result = self.parse_row(row.into());
        if result.is_err() {
            self.poisoned = true;
        }
        result
    }

    fn parse_row(&mut self, row: String) -> RowResult<Option<Record>> {
        self.rows.add_row(row)?;
        if self.rows.size() <= self.lookahead {
            return Ok(None);
        }

        let cursor = Self::cursor(&mut self.cursor, &self.reader)?;
        let record = cursor.next_record(&mut self.rows)?;
        if record.is_some() {
            self.records_emitted += 1;
        }
        Ok(record)
    }

    /// Close the row queue and drain every remaining record, in order.
    ///
    /// Consumes the parser: no rows can be added afterwards.
    ///
    /// # Errors
    ///
    /// Any failure from the record reader; no partial result is returned. A
    /// reader that stops while rows remain unconsumed is reported as
    /// [`RowError::IllegalState`].
    pub fn parse_remaining(mut self) -> RowResult<Vec<Record>> {
        if self.poisoned {
            return Err(RowError::Poisoned);
        }

        self.rows.close();
        let mut records = Vec::with_capacity(self.rows.size());

        let cursor = Self::cursor(&mut self.cursor, &self.reader)?;
        while let Some(record) = cursor.next_record(&mut self.rows)? {
            records.push(record);
        }

        if !self.rows.is_empty() {
            return Err(RowError::illegal_state(format!(
                "record reader finished with {} unconsumed rows",
                self.rows.size()
            )));
        }

        debug!(
            rows = self.rows.rows_added(),
            records = self.records_emitted + records.len(),
            drained = records.len(),
            "row parser drained"
        );
        Ok(records)
    }

    fn cursor<'a>(slot: &'a mut Option<R::Cursor>, reader: &R) -> RowResult<&'a mut R::Cursor> {
        let cursor = match slot.take() {
            Some(cursor) => cursor,
            None => {
                trace!("creating record cursor");
                reader.read_values()?
            }
        };
        Ok(slot.insert(cursor))
    }
}

impl<R: RecordReader> fmt::Debug for IncrementalRowParser<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IncrementalRowParser")
            .field("lookahead", &self.lookahead)
            .field("buffered_rows", &self.rows.size())
            .field("rows_added", &self.rows.rows_added())
            .field("records_emitted", &self.records_emitted)
            .field("started", &self.cursor.is_some())
            .field("poisoned", &self.poisoned)
            .finish()
    }
}
