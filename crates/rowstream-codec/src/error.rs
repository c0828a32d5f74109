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

//! Error types for stream decoding.
//!
//! # Error Categories
//!
//! - **Configuration Errors**: Unsupported media type or charset, invalid schema
//! - **Oversized Input**: A line exceeded the maximum in-memory size
//! - **Encoding Errors**: Bytes not valid in the declared charset
//! - **Row Errors**: Failures from the incremental row parser
//! - **Upstream Errors**: Failures of the byte stream itself, passed through opaquely

use rowstream_core::RowError;
use rowstream_csv::CsvError;
use thiserror::Error;

/// Errors produced while decoding a byte stream into records.
///
/// Every error is terminal: a record stream yields at most one error and
/// then ends.
#[derive(Error, Debug)]
pub enum DecodeError {
    /// A line grew beyond the maximum in-memory size before its terminator arrived.
    #[error("Payload too large: line exceeds the maximum in-memory size of {limit} bytes")]
    PayloadTooLarge { limit: usize },

    /// The media type is not one this decoder handles.
    #[error("Unsupported media type: {0}")]
    UnsupportedMediaType(String),

    /// The media type string could not be parsed.
    #[error("Invalid media type '{value}': {reason}")]
    InvalidMediaType { value: String, reason: String },

    /// The charset label is unknown.
    #[error("Unsupported charset: {0}")]
    UnsupportedCharset(String),

    /// Input bytes are malformed for the declared charset.
    #[error("Malformed input for charset {charset}")]
    Encoding { charset: &'static str },

    /// Row parsing failed.
    #[error("Row parsing failed: {0}")]
    Row(#[from] RowError),

    /// The CSV schema is invalid.
    #[error("CSV error: {0}")]
    Csv(#[from] CsvError),

    /// The upstream byte stream failed.
    #[error("Upstream error: {0}")]
    Upstream(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl DecodeError {
    /// Wrap an upstream failure.
    pub fn upstream<E>(err: E) -> Self
    where
        E: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        Self::Upstream(err.into())
    }

    /// Whether the error was raised by configuration rather than by the data.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            Self::UnsupportedMediaType(_)
                | Self::InvalidMediaType { .. }
                | Self::UnsupportedCharset(_)
                | Self::Csv(_)
                | Self::Row(RowError::InvalidLookahead(_))
        )
    }
}

/// Result type for decoding operations.
pub type DecodeResult<T> = Result<T, DecodeError>;
