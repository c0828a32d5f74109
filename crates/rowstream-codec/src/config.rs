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

//! Decoder configuration.

use rowstream_core::DEFAULT_LOOKAHEAD;

/// Default maximum number of bytes buffered for a single line (256 KiB).
pub const DEFAULT_MAX_IN_MEMORY_SIZE: usize = 256 * 1024;

/// Configuration for [`CsvDecoder`](crate::CsvDecoder).
///
/// # Examples
///
/// ```
/// use rowstream_codec::DecoderConfig;
///
/// let config = DecoderConfig::builder()
///     .max_in_memory_size(16)
///     .lookahead(2)
///     .build();
/// assert_eq!(config.max_in_memory_size, 16);
/// assert_eq!(config.lookahead, 2);
///
/// let config = DecoderConfig::default();
/// assert_eq!(config.max_in_memory_size, 256 * 1024);
/// assert_eq!(config.lookahead, 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecoderConfig {
    /// Maximum bytes of one line held in memory (default: 256 KiB)
    ///
    /// A line longer than this fails the stream with
    /// [`DecodeError::PayloadTooLarge`](crate::DecodeError::PayloadTooLarge).
    pub max_in_memory_size: usize,

    /// Rows buffered before the first record is pulled (default: 1)
    pub lookahead: usize,
}

impl Default for DecoderConfig {
    fn default() -> Self {
        Self {
            max_in_memory_size: DEFAULT_MAX_IN_MEMORY_SIZE,
            lookahead: DEFAULT_LOOKAHEAD,
        }
    }
}

impl DecoderConfig {
    /// Create a new builder for configuring decoding
    pub fn builder() -> DecoderConfigBuilder {
        DecoderConfigBuilder::default()
    }
}

/// Builder for `DecoderConfig`
#[derive(Debug, Clone, Default)]
pub struct DecoderConfigBuilder {
    config: DecoderConfig,
}

impl DecoderConfigBuilder {
    /// Set the maximum in-memory line size in bytes
    pub fn max_in_memory_size(mut self, limit: usize) -> Self {
        self.config.max_in_memory_size = limit;
        self
    }

    /// Set the lookahead
    pub fn lookahead(mut self, lookahead: usize) -> Self {
        self.config.lookahead = lookahead;
        self
    }

    /// Build the configuration
    pub fn build(self) -> DecoderConfig {
        self.config
    }
}

/// Per-call decoding hints.
///
/// Values present here override the decoder's configuration for one decode.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DecodeHints {
    /// Overrides [`DecoderConfig::max_in_memory_size`].
    pub max_in_memory_size: Option<usize>,
}

impl DecodeHints {
    /// Hints with no overrides.
    pub fn none() -> Self {
        Self::default()
    }

    /// Override the maximum in-memory line size.
    pub fn with_max_in_memory_size(mut self, limit: usize) -> Self {
        self.max_in_memory_size = Some(limit);
        self
    }
}
