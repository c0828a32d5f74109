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

//! Non-blocking character sources.
//!
//! Record readers pull their input from a [`RowSource`]. Unlike
//! [`std::io::Read`], a row source distinguishes between "nothing buffered
//! yet" and "nothing will ever arrive again", so a reader can stop and resume
//! later instead of blocking or mistaking a temporary gap for end of input.

/// Outcome of a read from a [`RowSource`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceRead<T> {
    /// Data is available.
    Data(T),
    /// Everything buffered has been consumed, but more input may still arrive.
    Pending,
    /// The source is closed and fully consumed.
    Eof,
}

impl<T> SourceRead<T> {
    /// Returns `true` for [`SourceRead::Pending`].
    #[inline]
    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Pending)
    }

    /// Returns `true` for [`SourceRead::Eof`].
    #[inline]
    pub fn is_eof(&self) -> bool {
        matches!(self, Self::Eof)
    }

    /// Returns the data, if any.
    #[inline]
    pub fn data(self) -> Option<T> {
        match self {
            Self::Data(value) => Some(value),
            _ => None,
        }
    }
}

/// A sequential, non-blocking source of row text.
///
/// The buffered interface mirrors [`std::io::BufRead`]: [`fill_buf`](Self::fill_buf)
/// exposes the next contiguous run of bytes without consuming it and
/// [`consume`](Self::consume) advances past the bytes actually used. The
/// buffered bytes are UTF-8 text; a byte-level consumer may stop in the middle
/// of a character, in which case the next run starts mid-character.
pub trait RowSource {
    /// Returns the next buffered bytes without consuming them.
    fn fill_buf(&mut self) -> SourceRead<&[u8]>;

    /// Marks `amt` bytes returned by [`fill_buf`](Self::fill_buf) as consumed.
    fn consume(&mut self, amt: usize);

    /// Reads and consumes the next character.
    fn read_char(&mut self) -> SourceRead<char>;
}
