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

//! Error types for incremental row parsing.
//!
//! This module defines every error the row queue and the incremental row
//! parser can report. Errors carry enough context (line numbers, offending
//! configuration values) to diagnose a failed decode without re-running it.
//!
//! # Error Categories
//!
//! - **Configuration Errors**: Invalid lookahead or schema, reported at construction
//! - **State Errors**: Rows added after the queue was closed
//! - **Malformed Rows**: The record reader rejected the buffered input
//! - **Reader Errors**: Any other failure surfaced by a record reader
//! - **Poisoned Parser**: Calls made after a previous terminal failure
//!
//! # Error Handling Examples
//!
//! ```rust
//! use rowstream_core::RowError;
//!
//! let err = RowError::malformed(3, "unterminated quote");
//! assert_eq!(err.line(), Some(3));
//! assert!(err.to_string().contains("line 3"));
//! ```

use thiserror::Error;

/// Errors that can occur while queueing rows or parsing records from them.
///
/// Every variant is terminal for the decode that produced it: once a parser
/// reports an error its buffered state is no longer trusted, and any later
/// call returns [`RowError::Poisoned`].
///
/// # Examples
///
/// ```rust
/// use rowstream_core::RowError;
///
/// let err = RowError::InvalidLookahead(0);
/// assert!(err.to_string().contains("lookahead"));
/// assert_eq!(err.line(), None);
/// ```
#[derive(Error, Debug)]
pub enum RowError {
    /// Lookahead must be strictly positive.
    #[error("Invalid lookahead {0}: lookahead must be greater than zero")]
    InvalidLookahead(usize),

    /// Operation not permitted in the current state.
    #[error("Illegal state: {0}")]
    IllegalState(String),

    /// The record reader rejected a row.
    #[error("Malformed row at line {line}: {message}")]
    Malformed { line: usize, message: String },

    /// Failure reported by the record reader implementation.
    #[error("Record reader error: {0}")]
    Reader(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A previous call failed; the parser no longer accepts input.
    #[error("Parser is poisoned by an earlier failure")]
    Poisoned,
}

impl RowError {
    /// Create an illegal state error.
    #[inline]
    pub fn illegal_state(message: impl Into<String>) -> Self {
        Self::IllegalState(message.into())
    }

    /// Create a malformed row error.
    #[inline]
    pub fn malformed(line: usize, message: impl Into<String>) -> Self {
        Self::Malformed {
            line,
            message: message.into(),
        }
    }

    /// Wrap an arbitrary record reader failure.
    #[inline]
    pub fn reader<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Reader(Box::new(err))
    }

    /// Get the line number if available.
    #[inline]
    pub fn line(&self) -> Option<usize> {
        match self {
            Self::Malformed { line, .. } => Some(*line),
            _ => None,
        }
    }
}

/// Result type for row operations.
pub type RowResult<T> = Result<T, RowError>;
