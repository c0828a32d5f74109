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

//! CSV schema configuration.

use crate::error::{CsvError, Result};

/// Where column names come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HeaderMode {
    /// Column names are taken from [`CsvSchema::columns`]; every input row is data.
    #[default]
    Schema,
    /// The first input record supplies the column names.
    FromInput,
    /// The first input record is discarded; names come from the schema.
    Skip,
}

/// Schema describing how rows are tokenized and which columns they carry.
///
/// # Examples
///
/// ## Default Configuration
///
/// ```
/// # use rowstream_csv::{CsvSchema, HeaderMode};
/// let schema = CsvSchema::default();
/// assert_eq!(schema.column_separator, b',');
/// assert_eq!(schema.line_separator, "\n");
/// assert_eq!(schema.header, HeaderMode::Schema);
/// assert!(schema.columns.is_empty());
/// ```
///
/// ## Semicolon-Separated with Explicit Columns
///
/// ```
/// # use rowstream_csv::CsvSchema;
/// let schema = CsvSchema::builder()
///     .column_separator(b';')
///     .columns(["header1", "header2"])
///     .build();
/// assert!(schema.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvSchema {
    /// Field separator (default: `,`).
    pub column_separator: u8,

    /// Terminator appended to each queued row (default: `"\n"`).
    ///
    /// Only `"\n"` and `"\r\n"` are accepted. Either way the tokenizer
    /// treats any line ending as the end of a record, so one row never
    /// yields more than one record.
    pub line_separator: String,

    /// Quote character (default: `"`).
    pub quote: u8,

    /// Escape character inside quoted fields (default: none).
    pub escape: Option<u8>,

    /// Whether `""` inside a quoted field means a literal quote (default: `true`).
    pub double_quote: bool,

    /// Lines starting with this byte are skipped (default: none).
    pub comment: Option<u8>,

    /// Ordered column names.
    ///
    /// Required unless [`header`](Self::header) is [`HeaderMode::FromInput`].
    pub columns: Vec<String>,

    /// Header handling (default: [`HeaderMode::Schema`]).
    pub header: HeaderMode,

    /// Whether to trim leading/trailing whitespace from unquoted values (default: `false`).
    pub trim: bool,

    /// Whether fields beyond the last column are silently dropped (default: `false`).
    ///
    /// When `false`, a record with more fields than columns is malformed.
    pub ignore_trailing_columns: bool,
}

impl Default for CsvSchema {
    fn default() -> Self {
        Self {
            column_separator: b',',
            line_separator: "\n".to_string(),
            quote: b'"',
            escape: None,
            double_quote: true,
            comment: None,
            columns: Vec::new(),
            header: HeaderMode::Schema,
            trim: false,
            ignore_trailing_columns: false,
        }
    }
}

impl CsvSchema {
    /// Create a builder starting from the defaults.
    pub fn builder() -> CsvSchemaBuilder {
        CsvSchemaBuilder::default()
    }

    /// Create a default schema with the given columns.
    pub fn with_columns<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            columns: columns.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    /// Check that the schema can be used to read records.
    ///
    /// # Errors
    ///
    /// Returns [`CsvError::InvalidSchema`] when a control byte is not ASCII,
    /// is a line break, collides with another control byte, when the line
    /// separator is unsupported, when columns are missing, or when a column
    /// name is repeated.
    pub fn validate(&self) -> Result<()> {
        check_control("column separator", self.column_separator)?;
        check_control("quote", self.quote)?;
        if let Some(escape) = self.escape {
            check_control("escape", escape)?;
        }
        if let Some(comment) = self.comment {
            check_control("comment", comment)?;
        }
        if self.column_separator == self.quote {
            return Err(invalid("column separator and quote must differ"));
        }

        if !matches!(self.line_separator.as_str(), "\n" | "\r\n") {
            return Err(invalid(format!(
                "unsupported line separator {:?}",
                self.line_separator
            )));
        }

        if self.header != HeaderMode::FromInput && self.columns.is_empty() {
            return Err(invalid("at least one column is required"));
        }

        for (i, column) in self.columns.iter().enumerate() {
            if self.columns[..i].contains(column) {
                return Err(invalid(format!("duplicate column '{}'", column)));
            }
        }

        Ok(())
    }
}

fn check_control(name: &str, byte: u8) -> Result<()> {
    if !byte.is_ascii() {
        return Err(invalid(format!("{} must be an ASCII character", name)));
    }
    if byte == b'\n' || byte == b'\r' {
        return Err(invalid(format!("{} must not be a line break", name)));
    }
    Ok(())
}

fn invalid(message: impl Into<String>) -> CsvError {
    CsvError::InvalidSchema(message.into())
}

/// Builder for [`CsvSchema`].
#[derive(Debug, Clone, Default)]
pub struct CsvSchemaBuilder {
    schema: CsvSchema,
}

impl CsvSchemaBuilder {
    /// Set the field separator.
    pub fn column_separator(mut self, separator: u8) -> Self {
        self.schema.column_separator = separator;
        self
    }

    /// Set the row terminator.
    pub fn line_separator(mut self, separator: impl Into<String>) -> Self {
        self.schema.line_separator = separator.into();
        self
    }

    /// Set the quote character.
    pub fn quote(mut self, quote: u8) -> Self {
        self.schema.quote = quote;
        self
    }

    /// Set the escape character.
    pub fn escape(mut self, escape: u8) -> Self {
        self.schema.escape = Some(escape);
        self
    }

    /// Enable or disable doubled-quote escaping.
    pub fn double_quote(mut self, yes: bool) -> Self {
        self.schema.double_quote = yes;
        self
    }

    /// Set the comment character.
    pub fn comment(mut self, comment: u8) -> Self {
        self.schema.comment = Some(comment);
        self
    }

    /// Set the ordered column names.
    pub fn columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.schema.columns = columns.into_iter().map(Into::into).collect();
        self
    }

    /// Append one column name.
    pub fn column(mut self, column: impl Into<String>) -> Self {
        self.schema.columns.push(column.into());
        self
    }

    /// Set the header mode.
    pub fn header(mut self, header: HeaderMode) -> Self {
        self.schema.header = header;
        self
    }

    /// Enable or disable whitespace trimming.
    pub fn trim(mut self, yes: bool) -> Self {
        self.schema.trim = yes;
        self
    }

    /// Drop fields beyond the last column instead of failing.
    pub fn ignore_trailing_columns(mut self, yes: bool) -> Self {
        self.schema.ignore_trailing_columns = yes;
        self
    }

    /// Build the schema.
    pub fn build(self) -> CsvSchema {
        self.schema
    }
}
