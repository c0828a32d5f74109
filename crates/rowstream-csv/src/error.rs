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

//! Error types for CSV schema validation and record reading.

use rowstream_core::RowError;
use thiserror::Error;

/// CSV error types.
///
/// Schema problems are reported when a [`CsvRecordReader`](crate::CsvRecordReader)
/// is constructed; everything else is reported by the cursor at the record
/// where it occurs, identified by the physical line the record starts on.
///
/// # Examples
///
/// ```
/// use rowstream_csv::CsvError;
///
/// let err = CsvError::TooManyFields {
///     line: 4,
///     expected: 2,
///     actual: 3,
/// };
///
/// assert_eq!(
///     err.to_string(),
///     "Too many entries in record on line 4: expected at most 2, got 3"
/// );
/// ```
#[derive(Debug, Error)]
pub enum CsvError {
    /// The schema cannot be used to read records.
    ///
    /// # Examples
    ///
    /// ```
    /// use rowstream_csv::CsvError;
    ///
    /// let err = CsvError::InvalidSchema("no columns".to_string());
    /// assert!(err.to_string().contains("no columns"));
    /// ```
    #[error("Invalid CSV schema: {0}")]
    InvalidSchema(String),

    /// A record has more fields than the schema has columns.
    #[error("Too many entries in record on line {line}: expected at most {expected}, got {actual}")]
    TooManyFields {
        /// Line the record starts on, 1-based.
        line: usize,
        /// Number of schema columns.
        expected: usize,
        /// Number of fields found.
        actual: usize,
    },

    /// The header row could not be used as column names.
    ///
    /// # Examples
    ///
    /// ```
    /// use rowstream_csv::CsvError;
    ///
    /// let err = CsvError::InvalidHeader {
    ///     position: 1,
    ///     reason: "empty column name".to_string(),
    /// };
    /// assert!(err.to_string().contains("position 1"));
    /// ```
    #[error("Invalid header at position {position}: {reason}")]
    InvalidHeader {
        /// Position of the invalid column name (0-based).
        position: usize,
        /// Reason the header is invalid.
        reason: String,
    },

    /// A field is not valid UTF-8 after tokenizing.
    #[error("Invalid UTF-8 in record on line {line}")]
    InvalidUtf8 {
        /// Line the record starts on, 1-based.
        line: usize,
    },

    /// Input ended inside a quoted field.
    ///
    /// # Examples
    ///
    /// ```
    /// use rowstream_csv::CsvError;
    ///
    /// let err = CsvError::UnterminatedQuote { line: 7 };
    /// assert_eq!(
    ///     err.to_string(),
    ///     "Missing closing quote in record on line 7"
    /// );
    /// ```
    #[error("Missing closing quote in record on line {line}")]
    UnterminatedQuote {
        /// Line the record starts on, 1-based.
        line: usize,
    },
}

/// Convenience type alias for `Result` with `CsvError`.
pub type Result<T> = std::result::Result<T, CsvError>;

impl CsvError {
    /// Line of the record the error refers to, if any.
    pub fn line(&self) -> Option<usize> {
        match self {
            Self::TooManyFields { line, .. }
            | Self::InvalidUtf8 { line }
            | Self::UnterminatedQuote { line } => Some(*line),
            Self::InvalidSchema(_) | Self::InvalidHeader { .. } => None,
        }
    }
}

impl From<CsvError> for RowError {
    fn from(err: CsvError) -> Self {
        match err.line() {
            Some(line) => RowError::malformed(line, err.to_string()),
            None => RowError::reader(err),
        }
    }
}
