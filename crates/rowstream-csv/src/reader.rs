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

//! Incremental CSV record reading on top of `csv-core`.
//!
//! `csv-core` is a push tokenizer: it is handed whatever input is available
//! and keeps its position inside a record between calls. That matches a
//! [`RowSource`] exactly. When the source reports [`SourceRead::Pending`] the
//! cursor stops with its partial field buffer intact and resumes on the next
//! pull, so a quoted field spanning several rows is assembled across calls
//! without ever blocking.
//!
//! Alongside the tokenizer a [`RecordScanner`] follows the consumed bytes to
//! know where the current record started, which fields were quoted, and
//! whether input ended inside an open quote. `csv-core` silently closes such a
//! field at end of input; here it is a malformed record.

use crate::error::{CsvError, Result};
use crate::schema::{CsvSchema, HeaderMode};
use csv_core::{ReadRecordResult, Reader, ReaderBuilder, Terminator};
use rowstream_core::{Record, RecordCursor, RecordReader, RowResult, RowSource, SourceRead};
use std::sync::Arc;
use tracing::trace;

const INITIAL_OUTPUT_CAPACITY: usize = 1024;
const INITIAL_FIELD_CAPACITY: usize = 16;

/// A validated, schema-bound CSV record reader.
///
/// Cheap to clone; every [`read_values`](RecordReader::read_values) call
/// starts an independent [`CsvCursor`].
///
/// # Examples
///
/// ```
/// use rowstream_core::IncrementalRowParser;
/// use rowstream_csv::{CsvRecordReader, CsvSchema};
///
/// let schema = CsvSchema::builder()
///     .column_separator(b';')
///     .columns(["h1", "h2"])
///     .build();
/// let reader = CsvRecordReader::new(schema).unwrap();
/// let mut parser = IncrementalRowParser::new(reader, 1).unwrap();
///
/// assert!(parser.parse("a;b").unwrap().is_none());
/// let record = parser.parse("c;d").unwrap().unwrap();
/// assert_eq!(record.get("h1"), Some("a"));
/// assert_eq!(record.get("h2"), Some("b"));
/// ```
#[derive(Debug, Clone)]
pub struct CsvRecordReader {
    schema: Arc<CsvSchema>,
}

impl CsvRecordReader {
    /// Create a reader for `schema`.
    ///
    /// # Errors
    ///
    /// Returns [`CsvError::InvalidSchema`] if the schema fails validation.
    pub fn new(schema: CsvSchema) -> Result<Self> {
        schema.validate()?;
        Ok(Self {
            schema: Arc::new(schema),
        })
    }

    /// The schema this reader was built with.
    pub fn schema(&self) -> &CsvSchema {
        &self.schema
    }

    /// Start a cursor directly, without going through the trait.
    pub fn cursor(&self) -> CsvCursor {
        CsvCursor::new(Arc::clone(&self.schema))
    }
}

impl RecordReader for CsvRecordReader {
    type Cursor = CsvCursor;

    fn read_values(&self) -> RowResult<CsvCursor> {
        Ok(self.cursor())
    }

    fn row_terminator(&self) -> &str {
        &self.schema.line_separator
    }
}

/// Position of the scanner inside the record being tokenized.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScanState {
    RecordStart,
    FieldStart,
    Unquoted,
    Quoted,
    QuoteInQuoted,
    EscapeInQuoted,
    Comment,
}

/// Follows the bytes handed to the tokenizer with the same quoting rules.
#[derive(Debug, Clone)]
struct RecordScanner {
    delimiter: u8,
    quote: u8,
    escape: Option<u8>,
    double_quote: bool,
    comment: Option<u8>,
    state: ScanState,
    lines: usize,
    record_line: usize,
    quoted_fields: Vec<bool>,
}

impl RecordScanner {
    fn new(schema: &CsvSchema) -> Self {
        Self {
            delimiter: schema.column_separator,
            quote: schema.quote,
            escape: schema.escape,
            double_quote: schema.double_quote,
            comment: schema.comment,
            state: ScanState::RecordStart,
            lines: 0,
            record_line: 1,
            quoted_fields: Vec::new(),
        }
    }

    fn feed(&mut self, input: &[u8]) {
        for &byte in input {
            self.step(byte);
        }
    }

    fn step(&mut self, byte: u8) {
        use ScanState::*;

        let line_break = byte == b'\n' || byte == b'\r';
        if byte == b'\n' {
            self.lines += 1;
        }

        let state = self.state;
        self.state = match state {
            RecordStart if line_break => RecordStart,
            RecordStart if self.comment == Some(byte) => Comment,
            RecordStart => {
                self.record_line = self.lines + 1;
                self.quoted_fields.clear();
                self.field_start(byte)
            }
            FieldStart => self.field_start(byte),
            Unquoted => self.unquoted(byte),
            Quoted if byte == self.quote => QuoteInQuoted,
            Quoted if self.escape == Some(byte) => EscapeInQuoted,
            Quoted => Quoted,
            EscapeInQuoted => Quoted,
            QuoteInQuoted if byte == self.quote && self.double_quote => Quoted,
            QuoteInQuoted => self.unquoted(byte),
            Comment if byte == b'\n' => RecordStart,
            Comment => Comment,
        };
    }

    fn field_start(&mut self, byte: u8) -> ScanState {
        let quoted = byte == self.quote;
        self.quoted_fields.push(quoted);
        if quoted {
            ScanState::Quoted
        } else {
            self.unquoted(byte)
        }
    }

    fn unquoted(&self, byte: u8) -> ScanState {
        if byte == self.delimiter {
            ScanState::FieldStart
        } else if byte == b'\n' || byte == b'\r' {
            ScanState::RecordStart
        } else {
            ScanState::Unquoted
        }
    }

    /// Input so far ends inside a quoted field.
    fn in_open_quote(&self) -> bool {
        matches!(self.state, ScanState::Quoted | ScanState::EscapeInQuoted)
    }

    fn is_quoted(&self, field: usize) -> bool {
        self.quoted_fields.get(field).copied().unwrap_or(false)
    }
}

/// Per-stream CSV reading state.
///
/// Holds the tokenizer, the bytes and field boundaries of the record being
/// assembled, and the resolved column names.
pub struct CsvCursor {
    schema: Arc<CsvSchema>,
    core: Reader,
    output: Vec<u8>,
    ends: Vec<usize>,
    out_len: usize,
    end_len: usize,
    columns: Vec<String>,
    scanner: RecordScanner,
    header_pending: bool,
    records_read: usize,
    done: bool,
}

impl CsvCursor {
    fn new(schema: Arc<CsvSchema>) -> Self {
        let core = ReaderBuilder::new()
            .delimiter(schema.column_separator)
            .terminator(Terminator::CRLF)
            .quote(schema.quote)
            .escape(schema.escape)
            .double_quote(schema.double_quote)
            .comment(schema.comment)
            .build();
        let scanner = RecordScanner::new(&schema);
        let header_pending = schema.header != HeaderMode::Schema;
        let columns = match schema.header {
            HeaderMode::FromInput => Vec::new(),
            HeaderMode::Schema | HeaderMode::Skip => schema.columns.clone(),
        };

        Self {
            schema,
            core,
            output: vec![0; INITIAL_OUTPUT_CAPACITY],
            ends: vec![0; INITIAL_FIELD_CAPACITY],
            out_len: 0,
            end_len: 0,
            columns,
            scanner,
            header_pending,
            records_read: 0,
            done: false,
        }
    }

    /// Column names in effect.
    ///
    /// Empty until the header has been read when the header comes from input.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Number of complete input records tokenized so far, header included.
    pub fn records_read(&self) -> usize {
        self.records_read
    }

    /// Physical line, 1-based, on which the current or last record started.
    pub fn record_line(&self) -> usize {
        self.scanner.record_line
    }

    /// Feed the tokenizer until a record completes, input runs dry, or input ends.
    fn read_fields(&mut self, source: &mut dyn RowSource) -> Result<Option<Vec<String>>> {
        if self.done {
            return Ok(None);
        }

        loop {
            let (input, eof) = match source.fill_buf() {
                SourceRead::Data(buf) => (buf, false),
                SourceRead::Pending => return Ok(None),
                SourceRead::Eof => (&[][..], true),
            };

            let (result, nin, nout, nend) = self.core.read_record(
                input,
                &mut self.output[self.out_len..],
                &mut self.ends[self.end_len..],
            );
            self.scanner.feed(&input[..nin]);
            source.consume(nin);
            self.out_len += nout;
            self.end_len += nend;

            match result {
                ReadRecordResult::InputEmpty if eof => {
                    self.done = true;
                    return Ok(None);
                }
                ReadRecordResult::InputEmpty => {}
                ReadRecordResult::OutputFull => {
                    let len = self.output.len().max(1) * 2;
                    self.output.resize(len, 0);
                }
                ReadRecordResult::OutputEndsFull => {
                    let len = self.ends.len().max(1) * 2;
                    self.ends.resize(len, 0);
                }
                ReadRecordResult::Record if eof && self.scanner.in_open_quote() => {
                    self.done = true;
                    return Err(CsvError::UnterminatedQuote {
                        line: self.scanner.record_line,
                    });
                }
                ReadRecordResult::Record => return self.take_fields().map(Some),
                ReadRecordResult::End => {
                    self.done = true;
                    return Ok(None);
                }
            }
        }
    }

    fn take_fields(&mut self) -> Result<Vec<String>> {
        self.records_read += 1;
        let line = self.scanner.record_line;

        let mut fields = Vec::with_capacity(self.end_len);
        let mut start = 0;
        for (i, &end) in self.ends[..self.end_len].iter().enumerate() {
            let field = std::str::from_utf8(&self.output[start..end])
                .map_err(|_| CsvError::InvalidUtf8 { line })?;
            let field = if self.schema.trim && !self.scanner.is_quoted(i) {
                field.trim()
            } else {
                field
            };
            fields.push(field.to_string());
            start = end;
        }

        self.out_len = 0;
        self.end_len = 0;
        Ok(fields)
    }

    fn accept_header(&mut self, fields: Vec<String>) -> Result<()> {
        self.header_pending = false;
        if self.schema.header == HeaderMode::Skip {
            trace!(fields = fields.len(), "skipped header record");
            return Ok(());
        }

        for (position, name) in fields.iter().enumerate() {
            if name.is_empty() {
                return Err(CsvError::InvalidHeader {
                    position,
                    reason: "empty column name".to_string(),
                });
            }
            if fields[..position].contains(name) {
                return Err(CsvError::InvalidHeader {
                    position,
                    reason: format!("duplicate column '{}'", name),
                });
            }
        }

        trace!(columns = ?fields, "read header record");
        self.columns = fields;
        Ok(())
    }

    fn build_record(&self, fields: Vec<String>) -> Result<Record> {
        if fields.len() > self.columns.len() && !self.schema.ignore_trailing_columns {
            return Err(CsvError::TooManyFields {
                line: self.scanner.record_line,
                expected: self.columns.len(),
                actual: fields.len(),
            });
        }

        Ok(self.columns.iter().cloned().zip(fields).collect())
    }
}

impl RecordCursor for CsvCursor {
    fn next_record(&mut self, source: &mut dyn RowSource) -> RowResult<Option<Record>> {
        while let Some(fields) = self.read_fields(source)? {
            if self.header_pending {
                self.accept_header(fields)?;
                continue;
            }
            return Ok(Some(self.build_record(fields)?));
        }
        Ok(None)
    }
}

impl std::fmt::Debug for CsvCursor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CsvCursor")
            .field("columns", &self.columns)
            .field("records_read", &self.records_read)
            .field("record_line", &self.scanner.record_line)
            .field("partial_bytes", &self.out_len)
            .field("partial_fields", &self.end_len)
            .field("done", &self.done)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rowstream_core::{IncrementalRowParser, RowError, RowQueue};

    fn semicolon_reader(columns: &[&str]) -> CsvRecordReader {
        CsvRecordReader::new(
            CsvSchema::builder()
                .column_separator(b';')
                .columns(columns.iter().copied())
                .build(),
        )
        .unwrap()
    }

    fn record(pairs: &[(&str, &str)]) -> Record {
        pairs.iter().copied().collect()
    }

    // ==================== Construction tests ====================

    #[test]
    fn test_invalid_schema_rejected() {
        let err = CsvRecordReader::new(CsvSchema::default()).unwrap_err();
        assert!(matches!(err, CsvError::InvalidSchema(_)));
    }

    #[test]
    fn test_row_terminator_follows_schema() {
        let reader = CsvRecordReader::new(
            CsvSchema::builder()
                .line_separator("\r\n")
                .column("a")
                .build(),
        )
        .unwrap();
        assert_eq!(reader.row_terminator(), "\r\n");
    }

    // ==================== Cursor tests ====================

    #[test]
    fn test_pending_then_resume() {
        let reader = semicolon_reader(&["h1", "h2"]);
        let mut cursor = reader.cursor();
        let mut queue = RowQueue::new();

        assert_eq!(cursor.next_record(&mut queue).unwrap(), None);

        queue.add_row("a;b").unwrap();
        assert_eq!(
            cursor.next_record(&mut queue).unwrap(),
            Some(record(&[("h1", "a"), ("h2", "b")]))
        );
        assert_eq!(cursor.next_record(&mut queue).unwrap(), None);

        queue.close();
        assert_eq!(cursor.next_record(&mut queue).unwrap(), None);
        assert!(queue.is_empty());
    }

    #[test]
    fn test_quoted_field_spanning_rows() {
        let reader = semicolon_reader(&["h1", "h2"]);
        let mut cursor = reader.cursor();
        let mut queue = RowQueue::new();

        queue.add_row("\"multi").unwrap();
        assert_eq!(cursor.next_record(&mut queue).unwrap(), None);
        assert_eq!(queue.size(), 0);
        assert_eq!(cursor.records_read(), 0);

        queue.add_row("line\";tail").unwrap();
        assert_eq!(
            cursor.next_record(&mut queue).unwrap(),
            Some(record(&[("h1", "multi\nline"), ("h2", "tail")]))
        );
    }

    #[test]
    fn test_last_record_without_terminator() {
        let reader = semicolon_reader(&["h1"]);
        let mut cursor = reader.cursor();
        let mut queue = RowQueue::with_terminator("");
        queue.add_row("only").unwrap();
        assert_eq!(cursor.next_record(&mut queue).unwrap(), None);

        queue.close();
        assert_eq!(
            cursor.next_record(&mut queue).unwrap(),
            Some(record(&[("h1", "only")]))
        );
        assert_eq!(cursor.next_record(&mut queue).unwrap(), None);
    }

    #[test]
    fn test_large_record_grows_buffers() {
        let reader = CsvRecordReader::new(CsvSchema::with_columns(
            (0..40).map(|i| format!("c{}", i)),
        ))
        .unwrap();
        let mut cursor = reader.cursor();
        let mut queue = RowQueue::new();

        let value = "x".repeat(3000);
        let row = vec![value.as_str(); 40].join(",");
        queue.add_row(row).unwrap();

        let rec = cursor.next_record(&mut queue).unwrap().unwrap();
        assert_eq!(rec.len(), 40);
        assert_eq!(rec.get("c39"), Some(value.as_str()));
    }

    #[test]
    fn test_fewer_fields_than_columns() {
        let reader = semicolon_reader(&["a", "b", "c"]);
        let mut cursor = reader.cursor();
        let mut queue = RowQueue::new();
        queue.add_row("1;2").unwrap();

        let rec = cursor.next_record(&mut queue).unwrap().unwrap();
        assert_eq!(rec, record(&[("a", "1"), ("b", "2")]));
        assert!(!rec.contains("c"));
    }

    #[test]
    fn test_malformed_line_counts_physical_lines() {
        let reader = semicolon_reader(&["h1", "h2"]);
        let mut cursor = reader.cursor();
        let mut queue = RowQueue::new();
        queue.add_row("\"multi").unwrap();
        queue.add_row("line\";x").unwrap();
        queue.add_row("").unwrap();
        queue.add_row("1;2;3").unwrap();

        assert!(cursor.next_record(&mut queue).unwrap().is_some());
        let err = cursor.next_record(&mut queue).unwrap_err();
        assert!(matches!(err, RowError::Malformed { line: 4, .. }));
        assert_eq!(cursor.records_read(), 2);
    }

    #[test]
    fn test_record_line_after_comments_and_crlf() {
        let reader = CsvRecordReader::new(
            CsvSchema::builder()
                .line_separator("\r\n")
                .columns(["a"])
                .comment(b'#')
                .build(),
        )
        .unwrap();
        let mut cursor = reader.cursor();
        let mut queue = RowQueue::with_terminator(reader.row_terminator());
        queue.add_row("# one").unwrap();
        queue.add_row("# \"two").unwrap();
        queue.add_row("v").unwrap();
        queue.add_row("w").unwrap();

        assert!(cursor.next_record(&mut queue).unwrap().is_some());
        assert_eq!(cursor.record_line(), 3);
        assert!(cursor.next_record(&mut queue).unwrap().is_some());
        assert_eq!(cursor.record_line(), 4);
    }

    #[test]
    fn test_pipe_is_data_not_terminator() {
        let reader = CsvRecordReader::new(CsvSchema::with_columns(["x"])).unwrap();
        let mut parser = IncrementalRowParser::new(reader, 1).unwrap();
        assert_eq!(parser.parse("a|b").unwrap(), None);
        assert_eq!(
            parser.parse_remaining().unwrap(),
            vec![record(&[("x", "a|b")])]
        );
    }

    #[test]
    fn test_too_many_fields_is_malformed() {
        let reader = semicolon_reader(&["a"]);
        let mut cursor = reader.cursor();
        let mut queue = RowQueue::new();
        queue.add_row("ok").unwrap();
        queue.add_row("1;2").unwrap();

        assert!(cursor.next_record(&mut queue).unwrap().is_some());
        let err = cursor.next_record(&mut queue).unwrap_err();
        assert!(matches!(err, RowError::Malformed { line: 2, .. }));
    }

    #[test]
    fn test_ignore_trailing_columns() {
        let reader = CsvRecordReader::new(
            CsvSchema::builder()
                .columns(["a"])
                .ignore_trailing_columns(true)
                .build(),
        )
        .unwrap();
        let mut cursor = reader.cursor();
        let mut queue = RowQueue::new();
        queue.add_row("1,2,3").unwrap();

        assert_eq!(
            cursor.next_record(&mut queue).unwrap(),
            Some(record(&[("a", "1")]))
        );
    }

    #[test]
    fn test_blank_row_consumed_without_record() {
        let reader = semicolon_reader(&["a"]);
        let mut cursor = reader.cursor();
        let mut queue = RowQueue::new();
        queue.add_row("").unwrap();

        assert_eq!(cursor.next_record(&mut queue).unwrap(), None);
        assert_eq!(queue.size(), 0);
    }

    #[test]
    fn test_trim() {
        let reader = CsvRecordReader::new(
            CsvSchema::builder().columns(["a", "b"]).trim(true).build(),
        )
        .unwrap();
        let mut cursor = reader.cursor();
        let mut queue = RowQueue::new();
        queue.add_row("  x ,\ty").unwrap();

        assert_eq!(
            cursor.next_record(&mut queue).unwrap(),
            Some(record(&[("a", "x"), ("b", "y")]))
        );
    }

    #[test]
    fn test_trim_keeps_quoted_whitespace() {
        let reader = CsvRecordReader::new(
            CsvSchema::builder().columns(["a", "b"]).trim(true).build(),
        )
        .unwrap();
        let mut cursor = reader.cursor();
        let mut queue = RowQueue::new();
        queue.add_row(" x ,\"  y  \"").unwrap();

        assert_eq!(
            cursor.next_record(&mut queue).unwrap(),
            Some(record(&[("a", "x"), ("b", "  y  ")]))
        );
    }

    #[test]
    fn test_comment_lines_skipped() {
        let reader = CsvRecordReader::new(
            CsvSchema::builder().columns(["a"]).comment(b'#').build(),
        )
        .unwrap();
        let mut cursor = reader.cursor();
        let mut queue = RowQueue::new();
        queue.add_row("# note").unwrap();
        queue.add_row("v").unwrap();

        assert_eq!(
            cursor.next_record(&mut queue).unwrap(),
            Some(record(&[("a", "v")]))
        );
    }

    #[test]
    fn test_crlf_rows() {
        let reader = CsvRecordReader::new(
            CsvSchema::builder()
                .line_separator("\r\n")
                .columns(["a", "b"])
                .build(),
        )
        .unwrap();
        let mut cursor = reader.cursor();
        let mut queue = RowQueue::with_terminator(reader.row_terminator());
        queue.add_row("1,2").unwrap();
        queue.add_row("3,4").unwrap();

        assert_eq!(
            cursor.next_record(&mut queue).unwrap(),
            Some(record(&[("a", "1"), ("b", "2")]))
        );
        assert_eq!(
            cursor.next_record(&mut queue).unwrap(),
            Some(record(&[("a", "3"), ("b", "4")]))
        );
    }

    // ==================== Header tests ====================

    #[test]
    fn test_header_from_input() {
        let reader = CsvRecordReader::new(
            CsvSchema::builder().header(HeaderMode::FromInput).build(),
        )
        .unwrap();
        let mut cursor = reader.cursor();
        let mut queue = RowQueue::new();

        queue.add_row("name,age").unwrap();
        assert_eq!(cursor.next_record(&mut queue).unwrap(), None);
        assert_eq!(cursor.columns(), ["name", "age"]);

        queue.add_row("ada,36").unwrap();
        assert_eq!(
            cursor.next_record(&mut queue).unwrap(),
            Some(record(&[("name", "ada"), ("age", "36")]))
        );
    }

    #[test]
    fn test_header_skipped() {
        let reader = CsvRecordReader::new(
            CsvSchema::builder()
                .columns(["x"])
                .header(HeaderMode::Skip)
                .build(),
        )
        .unwrap();
        let mut cursor = reader.cursor();
        let mut queue = RowQueue::new();
        queue.add_row("ignored").unwrap();
        queue.add_row("kept").unwrap();

        assert_eq!(
            cursor.next_record(&mut queue).unwrap(),
            Some(record(&[("x", "kept")]))
        );
        assert_eq!(cursor.records_read(), 2);
    }

    #[test]
    fn test_duplicate_header_rejected() {
        let reader = CsvRecordReader::new(
            CsvSchema::builder().header(HeaderMode::FromInput).build(),
        )
        .unwrap();
        let mut cursor = reader.cursor();
        let mut queue = RowQueue::new();
        queue.add_row("a,b,a").unwrap();

        let err = cursor.next_record(&mut queue).unwrap_err();
        assert!(err.to_string().contains("duplicate column 'a'"));
    }

    // ==================== Parser integration tests ====================

    #[test]
    fn test_parser_example_sequence() {
        let mut parser = IncrementalRowParser::new(semicolon_reader(&["h1", "h2"]), 1).unwrap();

        assert_eq!(parser.parse("a;b").unwrap(), None);
        assert_eq!(
            parser.parse("c;d").unwrap(),
            Some(record(&[("h1", "a"), ("h2", "b")]))
        );
        assert_eq!(
            parser.parse("e;f").unwrap(),
            Some(record(&[("h1", "c"), ("h2", "d")]))
        );
        assert_eq!(
            parser.parse_remaining().unwrap(),
            vec![record(&[("h1", "e"), ("h2", "f")])]
        );
    }

    #[test]
    fn test_parser_multi_line_field() {
        let mut parser = IncrementalRowParser::new(semicolon_reader(&["h1", "h2"]), 1).unwrap();

        assert_eq!(parser.parse("\"first").unwrap(), None);
        assert_eq!(
            parser.parse("second\";x").unwrap(),
            Some(record(&[("h1", "first\nsecond"), ("h2", "x")]))
        );
        assert_eq!(parser.parse("y;z").unwrap(), None);
        assert_eq!(
            parser.parse_remaining().unwrap(),
            vec![record(&[("h1", "y"), ("h2", "z")])]
        );
    }

    #[test]
    fn test_parser_unterminated_quote_at_end() {
        let mut parser = IncrementalRowParser::new(semicolon_reader(&["h1"]), 1).unwrap();
        assert_eq!(parser.parse("a;b").unwrap(), None);
        assert_eq!(parser.parse("\"open;x").unwrap(), Some(record(&[("h1", "a")])));

        let err = parser.parse_remaining().unwrap_err();
        assert!(matches!(err, RowError::Malformed { line: 2, .. }));
        assert!(err.to_string().contains("closing quote"));
    }

    #[test]
    fn test_unterminated_quote_spanning_rows() {
        let reader = semicolon_reader(&["h1", "h2"]);
        let mut cursor = reader.cursor();
        let mut queue = RowQueue::new();
        queue.add_row("\"never").unwrap();
        queue.add_row("closed;x").unwrap();
        assert_eq!(cursor.next_record(&mut queue).unwrap(), None);

        queue.close();
        let err = cursor.next_record(&mut queue).unwrap_err();
        assert!(matches!(err, RowError::Malformed { line: 1, .. }));
        assert_eq!(cursor.next_record(&mut queue).unwrap(), None);
    }

    #[test]
    fn test_closed_quote_at_end_is_accepted() {
        let mut parser = IncrementalRowParser::new(semicolon_reader(&["h1", "h2"]), 1).unwrap();
        parser.parse("\"say \"\"hi\"\"\";x").unwrap();
        assert_eq!(
            parser.parse_remaining().unwrap(),
            vec![record(&[("h1", "say \"hi\""), ("h2", "x")])]
        );
    }

    #[test]
    fn test_escaped_quote_does_not_close_field() {
        let reader = CsvRecordReader::new(
            CsvSchema::builder()
                .columns(["a"])
                .escape(b'\\')
                .double_quote(false)
                .build(),
        )
        .unwrap();
        let mut parser = IncrementalRowParser::new(reader, 1).unwrap();
        parser.parse("\"open \\\"").unwrap();
        assert!(matches!(
            parser.parse_remaining(),
            Err(RowError::Malformed { line: 1, .. })
        ));
    }
}
