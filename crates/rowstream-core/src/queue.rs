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

//! Row queue feeding the record reader.
//!
//! Rows arrive one at a time from the line decoder and are read back as a
//! single continuous run of text. The queue never blocks: when every buffered
//! row has been consumed it reports [`SourceRead::Pending`] until more rows
//! are added, and [`SourceRead::Eof`] only once it has been closed.
//!
//! This module is primarily an internal implementation detail of the
//! incremental parser, but is exposed for record reader implementations and
//! their tests.

use crate::error::{RowError, RowResult};
use crate::source::{RowSource, SourceRead};
use std::collections::VecDeque;
use std::io::{self, Read};

/// Terminator appended to every row unless configured otherwise.
pub const DEFAULT_ROW_TERMINATOR: &str = "\n";

/// Append-only, sequentially-read queue of text rows.
///
/// Each row is stored with its line terminator re-attached, so readers see
/// the same text the line decoder split. A row leaves the queue as soon as
/// the read cursor has passed its last byte.
///
/// # Examples
///
/// ## Pending vs End of Input
///
/// ```rust
/// use rowstream_core::{RowQueue, RowSource, SourceRead};
///
/// let mut queue = RowQueue::new();
/// queue.add_row("ab").unwrap();
///
/// assert_eq!(queue.read_char(), SourceRead::Data('a'));
/// assert_eq!(queue.read_char(), SourceRead::Data('b'));
/// assert_eq!(queue.read_char(), SourceRead::Data('\n'));
///
/// // Exhausted but still open: more rows may arrive
/// assert_eq!(queue.read_char(), SourceRead::Pending);
///
/// queue.close();
/// assert_eq!(queue.read_char(), SourceRead::Eof);
/// ```
///
/// ## No Rows After Close
///
/// ```rust
/// use rowstream_core::RowQueue;
///
/// let mut queue = RowQueue::new();
/// queue.close();
/// assert!(queue.add_row("late").is_err());
/// ```
#[derive(Debug)]
pub struct RowQueue {
    rows: VecDeque<String>,
    /// Byte offset of the read cursor within the front row.
    offset: usize,
    terminator: String,
    closed: bool,
    rows_added: usize,
    rows_consumed: usize,
}

impl RowQueue {
    /// Create an empty queue using `\n` as the row terminator.
    pub fn new() -> Self {
        Self::with_terminator(DEFAULT_ROW_TERMINATOR)
    }

    /// Create an empty queue with a custom row terminator.
    pub fn with_terminator(terminator: impl Into<String>) -> Self {
        Self {
            rows: VecDeque::new(),
            offset: 0,
            terminator: terminator.into(),
            closed: false,
            rows_added: 0,
            rows_consumed: 0,
        }
    }

    /// Append a row.
    ///
    /// # Errors
    ///
    /// Returns [`RowError::IllegalState`] if the queue has been closed.
    pub fn add_row(&mut self, row: impl Into<String>) -> RowResult<()> {
        if self.closed {
            return Err(RowError::illegal_state(
                "cannot add a row after the row queue was closed",
            ));
        }

        let mut row = row.into();
        row.push_str(&self.terminator);
        if row.is_empty() {
            // Empty terminator and empty row: nothing for a reader to see.
            return Ok(());
        }

        self.rows.push_back(row);
        self.rows_added += 1;
        Ok(())
    }

    /// Signal that no more rows will be added.
    ///
    /// Closing is idempotent.
    #[inline]
    pub fn close(&mut self) {
        self.closed = true;
    }

    /// Whether [`close`](Self::close) has been called.
    #[inline]
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Number of rows added but not yet fully consumed.
    #[inline]
    pub fn size(&self) -> usize {
        self.rows.len()
    }

    /// Whether no unconsumed rows are buffered.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Total number of rows ever added.
    #[inline]
    pub fn rows_added(&self) -> usize {
        self.rows_added
    }

    /// Total number of rows fully consumed by the read cursor.
    #[inline]
    pub fn rows_consumed(&self) -> usize {
        self.rows_consumed
    }

    /// The terminator appended to each row.
    #[inline]
    pub fn terminator(&self) -> &str {
        &self.terminator
    }

    fn advance(&mut self, mut amt: usize) {
        while amt > 0 {
            let Some(front) = self.rows.front() else {
                break;
            };

            let remaining = front.len() - self.offset;
            if amt < remaining {
                self.offset += amt;
                return;
            }

            amt -= remaining;
            self.rows.pop_front();
            self.offset = 0;
            self.rows_consumed += 1;
        }
    }
}

impl Default for RowQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl RowSource for RowQueue {
    fn fill_buf(&mut self) -> SourceRead<&[u8]> {
        match self.rows.front() {
            Some(front) => SourceRead::Data(&front.as_bytes()[self.offset..]),
            None if self.closed => SourceRead::Eof,
            None => SourceRead::Pending,
        }
    }

    #[inline]
    fn consume(&mut self, amt: usize) {
        self.advance(amt);
    }

    fn read_char(&mut self) -> SourceRead<char> {
        let Some(front) = self.rows.front() else {
            return if self.closed {
                SourceRead::Eof
            } else {
                SourceRead::Pending
            };
        };

        // A byte-level consumer may have stopped inside a character.
        let (ch, width) = match front.get(self.offset..).and_then(|rest| rest.chars().next()) {
            Some(ch) => (ch, ch.len_utf8()),
            None => {
                let skip = (self.offset..front.len())
                    .find(|&i| front.is_char_boundary(i))
                    .unwrap_or(front.len())
                    - self.offset;
                (char::REPLACEMENT_CHARACTER, skip)
            }
        };

        self.advance(width);
        SourceRead::Data(ch)
    }
}

/// Blocking-style access for readers built on [`std::io::Read`].
///
/// [`SourceRead::Pending`] maps to [`io::ErrorKind::WouldBlock`] and
/// [`SourceRead::Eof`] maps to `Ok(0)`.
impl Read for RowQueue {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = match self.fill_buf() {
            SourceRead::Data(data) => {
                let n = data.len().min(buf.len());
                buf[..n].copy_from_slice(&data[..n]);
                n
            }
            SourceRead::Pending => {
                return Err(io::Error::new(
                    io::ErrorKind::WouldBlock,
                    "row queue has no buffered rows",
                ))
            }
            SourceRead::Eof => 0,
        };

        self.advance(n);
        Ok(n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drain_chars(queue: &mut RowQueue) -> String {
        let mut out = String::new();
        while let SourceRead::Data(ch) = queue.read_char() {
            out.push(ch);
        }
        out
    }

    // ==================== add_row tests ====================

    #[test]
    fn test_add_row_appends_terminator() {
        let mut queue = RowQueue::new();
        queue.add_row("a;b").unwrap();
        assert_eq!(drain_chars(&mut queue), "a;b\n");
    }

    #[test]
    fn test_custom_terminator() {
        let mut queue = RowQueue::with_terminator("\r\n");
        queue.add_row("x").unwrap();
        assert_eq!(queue.terminator(), "\r\n");
        assert_eq!(drain_chars(&mut queue), "x\r\n");
    }

    #[test]
    fn test_add_after_close_fails() {
        let mut queue = RowQueue::new();
        queue.add_row("first").unwrap();
        queue.close();

        let err = queue.add_row("second").unwrap_err();
        assert!(matches!(err, RowError::IllegalState(_)));
        assert_eq!(queue.size(), 1);
        assert_eq!(queue.rows_added(), 1);
    }

    #[test]
    fn test_empty_row_is_kept() {
        let mut queue = RowQueue::new();
        queue.add_row("").unwrap();
        assert_eq!(queue.size(), 1);
        assert_eq!(drain_chars(&mut queue), "\n");
    }

    // ==================== size tests ====================

    #[test]
    fn test_size_counts_unconsumed_rows() {
        let mut queue = RowQueue::new();
        assert_eq!(queue.size(), 0);
        assert!(queue.is_empty());

        queue.add_row("ab").unwrap();
        queue.add_row("cd").unwrap();
        assert_eq!(queue.size(), 2);

        // Partially read first row is still counted
        queue.read_char();
        assert_eq!(queue.size(), 2);

        // Reading the terminator completes the first row
        queue.read_char();
        queue.read_char();
        assert_eq!(queue.size(), 1);
        assert_eq!(queue.rows_consumed(), 1);
        assert_eq!(queue.rows_added(), 2);
    }

    #[test]
    fn test_size_is_added_minus_consumed() {
        let mut queue = RowQueue::new();
        for i in 0..10 {
            queue.add_row(format!("row{}", i)).unwrap();
        }
        for _ in 0..3 {
            let len = queue.fill_buf().data().map(<[u8]>::len).unwrap();
            queue.consume(len);
        }
        assert_eq!(queue.size(), queue.rows_added() - queue.rows_consumed());
        assert_eq!(queue.size(), 7);
    }

    // ==================== read_char tests ====================

    #[test]
    fn test_read_across_rows() {
        let mut queue = RowQueue::new();
        queue.add_row("a").unwrap();
        queue.add_row("b").unwrap();
        assert_eq!(drain_chars(&mut queue), "a\nb\n");
    }

    #[test]
    fn test_pending_then_data_then_eof() {
        let mut queue = RowQueue::new();
        assert_eq!(queue.read_char(), SourceRead::Pending);

        queue.add_row("z").unwrap();
        assert_eq!(queue.read_char(), SourceRead::Data('z'));
        assert_eq!(queue.read_char(), SourceRead::Data('\n'));
        assert_eq!(queue.read_char(), SourceRead::Pending);

        queue.close();
        assert_eq!(queue.read_char(), SourceRead::Eof);
        // Eof is permanent
        assert_eq!(queue.read_char(), SourceRead::Eof);
    }

    #[test]
    fn test_close_with_buffered_rows_still_reads_them() {
        let mut queue = RowQueue::new();
        queue.add_row("q").unwrap();
        queue.close();
        assert_eq!(queue.read_char(), SourceRead::Data('q'));
        assert_eq!(queue.read_char(), SourceRead::Data('\n'));
        assert_eq!(queue.read_char(), SourceRead::Eof);
    }

    #[test]
    fn test_unicode_chars() {
        let mut queue = RowQueue::new();
        queue.add_row("你好;🎉").unwrap();
        assert_eq!(drain_chars(&mut queue), "你好;🎉\n");
    }

    #[test]
    fn test_read_char_after_partial_byte_consume() {
        let mut queue = RowQueue::new();
        queue.add_row("é").unwrap();
        // Stop in the middle of the two-byte character
        queue.consume(1);
        assert_eq!(queue.read_char(), SourceRead::Data(char::REPLACEMENT_CHARACTER));
        assert_eq!(queue.read_char(), SourceRead::Data('\n'));
    }

    // ==================== fill_buf / consume tests ====================

    #[test]
    fn test_fill_buf_returns_front_row_only() {
        let mut queue = RowQueue::new();
        queue.add_row("abc").unwrap();
        queue.add_row("def").unwrap();

        assert_eq!(queue.fill_buf(), SourceRead::Data(&b"abc\n"[..]));
        queue.consume(2);
        assert_eq!(queue.fill_buf(), SourceRead::Data(&b"c\n"[..]));
        queue.consume(2);
        assert_eq!(queue.fill_buf(), SourceRead::Data(&b"def\n"[..]));
    }

    #[test]
    fn test_fill_buf_pending_and_eof() {
        let mut queue = RowQueue::new();
        assert!(queue.fill_buf().is_pending());
        queue.close();
        assert!(queue.fill_buf().is_eof());
    }

    #[test]
    fn test_consume_spanning_rows() {
        let mut queue = RowQueue::new();
        queue.add_row("ab").unwrap();
        queue.add_row("cd").unwrap();
        queue.consume(4);
        assert_eq!(queue.size(), 1);
        assert_eq!(queue.fill_buf(), SourceRead::Data(&b"d\n"[..]));
    }

    #[test]
    fn test_consume_past_end_is_harmless() {
        let mut queue = RowQueue::new();
        queue.add_row("ab").unwrap();
        queue.consume(100);
        assert!(queue.is_empty());
        assert!(queue.fill_buf().is_pending());
    }

    // ==================== io::Read tests ====================

    #[test]
    fn test_io_read_would_block_while_open() {
        let mut queue = RowQueue::new();
        let mut buf = [0u8; 8];
        let err = Read::read(&mut queue, &mut buf).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::WouldBlock);
    }

    #[test]
    fn test_io_read_to_string_after_close() {
        let mut queue = RowQueue::new();
        queue.add_row("h1;h2").unwrap();
        queue.add_row("v1;v2").unwrap();
        queue.close();

        let mut out = String::new();
        queue.read_to_string(&mut out).unwrap();
        assert_eq!(out, "h1;h2\nv1;v2\n");
        assert!(queue.is_empty());
    }

    #[test]
    fn test_io_read_small_buffer() {
        let mut queue = RowQueue::new();
        queue.add_row("abcdef").unwrap();
        let mut buf = [0u8; 4];
        assert_eq!(Read::read(&mut queue, &mut buf).unwrap(), 4);
        assert_eq!(&buf, b"abcd");
        assert_eq!(Read::read(&mut queue, &mut buf).unwrap(), 3);
        assert_eq!(&buf[..3], b"ef\n");
    }
}
