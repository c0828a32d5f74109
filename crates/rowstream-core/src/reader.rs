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

//! Record reader capability.
//!
//! A [`RecordReader`] is the schema-bound half of the pipeline: given a row
//! source it produces records, in order, one pull at a time. The incremental
//! parser owns both the row queue and the reader's cursor, so the cursor is
//! handed the source on every call instead of holding on to it.

use crate::error::RowResult;
use crate::queue::DEFAULT_ROW_TERMINATOR;
use crate::record::Record;
use crate::source::RowSource;

/// A configured, schema-bound record reader.
///
/// Implementations are usually cheap configuration objects; all per-stream
/// state (tokenizer state, partially read fields, resolved headers) lives in
/// the [`Cursor`](Self::Cursor) returned by [`read_values`](Self::read_values).
pub trait RecordReader {
    /// Per-stream reading state.
    type Cursor: RecordCursor;

    /// Start reading a new stream of records.
    fn read_values(&self) -> RowResult<Self::Cursor>;

    /// The line terminator re-attached to each queued row.
    ///
    /// Must be a terminator the reader itself recognizes.
    fn row_terminator(&self) -> &str {
        DEFAULT_ROW_TERMINATOR
    }
}

/// Pull-based, order-preserving record iteration over a [`RowSource`].
pub trait RecordCursor {
    /// Read the next record from `source`.
    ///
    /// Returns `Ok(None)` when no complete record can be produced from the
    /// input consumed so far. If the source reported [`SourceRead::Pending`]
    /// more rows may still complete one, so the call is simply repeated later;
    /// once the source has reported [`SourceRead::Eof`], `Ok(None)` means the
    /// stream is exhausted.
    ///
    /// Implementations must never block waiting for input and must never
    /// return a partial record.
    ///
    /// [`SourceRead::Pending`]: crate::SourceRead::Pending
    /// [`SourceRead::Eof`]: crate::SourceRead::Eof
    fn next_record(&mut self, source: &mut dyn RowSource) -> RowResult<Option<Record>>;
}

impl<R: RecordReader + ?Sized> RecordReader for &R {
    type Cursor = R::Cursor;

    fn read_values(&self) -> RowResult<Self::Cursor> {
        (**self).read_values()
    }

    fn row_terminator(&self) -> &str {
        (**self).row_terminator()
    }
}

impl<R: RecordReader + ?Sized> RecordReader for std::sync::Arc<R> {
    type Cursor = R::Cursor;

    fn read_values(&self) -> RowResult<Self::Cursor> {
        (**self).read_values()
    }

    fn row_terminator(&self) -> &str {
        (**self).row_terminator()
    }
}
