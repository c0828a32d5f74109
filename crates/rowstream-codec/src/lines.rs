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

//! Charset-aware line splitting over byte chunks.
//!
//! Chunks are first decoded to UTF-8 with a streaming `encoding_rs` decoder,
//! which carries partial multi-byte sequences across chunk boundaries, then
//! split into lines by a length-limited [`LinesCodec`]. Both `\n` and `\r\n`
//! terminators are stripped.

use crate::error::{DecodeError, DecodeResult};
use bytes::BytesMut;
use encoding_rs::{DecoderResult, Encoding};
use tokio_util::codec::{Decoder, LinesCodec, LinesCodecError};

/// Incremental line decoder.
///
/// # Examples
///
/// ```
/// use rowstream_codec::LineDecoder;
///
/// let mut lines = LineDecoder::new(encoding_rs::UTF_8, 64);
/// assert_eq!(lines.decode(b"a;b\nc;").unwrap(), vec!["a;b"]);
/// assert_eq!(lines.decode(b"d\r\n").unwrap(), vec!["c;d"]);
/// assert!(lines.finish().unwrap().is_empty());
/// ```
pub struct LineDecoder {
    encoding: &'static Encoding,
    chars: encoding_rs::Decoder,
    codec: LinesCodec,
    buffer: BytesMut,
    max_line_length: usize,
    finished: bool,
}

impl LineDecoder {
    /// Create a decoder for `encoding` rejecting lines longer than `max_line_length` bytes.
    pub fn new(encoding: &'static Encoding, max_line_length: usize) -> Self {
        Self {
            encoding,
            chars: encoding.new_decoder_with_bom_removal(),
            codec: LinesCodec::new_with_max_length(max_line_length),
            buffer: BytesMut::new(),
            max_line_length,
            finished: false,
        }
    }

    /// The source encoding.
    pub fn encoding(&self) -> &'static Encoding {
        self.encoding
    }

    /// The line length limit in bytes.
    pub fn max_line_length(&self) -> usize {
        self.max_line_length
    }

    /// Bytes of the current partial line held in memory.
    pub fn buffered(&self) -> usize {
        self.buffer.len()
    }

    /// Decode a chunk and return every line it completes.
    ///
    /// # Errors
    ///
    /// [`DecodeError::Encoding`] for malformed input and
    /// [`DecodeError::PayloadTooLarge`] when a line exceeds the limit.
    pub fn decode(&mut self, chunk: &[u8]) -> DecodeResult<Vec<String>> {
        if self.finished {
            return Err(DecodeError::Io(std::io::Error::new(
                std::io::ErrorKind::Other,
                "line decoder already finished",
            )));
        }
        self.decode_chars(chunk, false)?;
        self.split_lines()
    }

    /// Flush the decoder at end of input, returning the remaining lines.
    ///
    /// Trailing text without a final terminator is returned as the last line.
    pub fn finish(&mut self) -> DecodeResult<Vec<String>> {
        if self.finished {
            return Ok(Vec::new());
        }
        self.finished = true;

        self.decode_chars(&[], true)?;
        let mut lines = self.split_lines()?;
        let limit = self.max_line_length;
        if let Some(line) = self
            .codec
            .decode_eof(&mut self.buffer)
            .map_err(|e| codec_error(limit, e))?
        {
            lines.push(line);
        }
        Ok(lines)
    }

    fn decode_chars(&mut self, mut src: &[u8], last: bool) -> DecodeResult<()> {
        let mut text = String::new();
        loop {
            let needed = self
                .chars
                .max_utf8_buffer_length_without_replacement(src.len())
                .unwrap_or(src.len().saturating_mul(3).saturating_add(16));
            text.reserve(needed);

            let (result, read) = self
                .chars
                .decode_to_string_without_replacement(src, &mut text, last);
            match result {
                DecoderResult::InputEmpty => break,
                DecoderResult::OutputFull => src = &src[read..],
                DecoderResult::Malformed(_, _) => {
                    return Err(DecodeError::Encoding {
                        charset: self.encoding.name(),
                    })
                }
            }
        }

        self.buffer.extend_from_slice(text.as_bytes());
        Ok(())
    }

    fn split_lines(&mut self) -> DecodeResult<Vec<String>> {
        let limit = self.max_line_length;
        let mut lines = Vec::new();
        while let Some(line) = self
            .codec
            .decode(&mut self.buffer)
            .map_err(|e| codec_error(limit, e))?
        {
            lines.push(line);
        }
        Ok(lines)
    }
}

fn codec_error(limit: usize, err: LinesCodecError) -> DecodeError {
    match err {
        LinesCodecError::MaxLineLengthExceeded => DecodeError::PayloadTooLarge { limit },
        LinesCodecError::Io(err) => DecodeError::Io(err),
    }
}

impl std::fmt::Debug for LineDecoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LineDecoder")
            .field("encoding", &self.encoding.name())
            .field("max_line_length", &self.max_line_length)
            .field("buffered", &self.buffer.len())
            .field("finished", &self.finished)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use encoding_rs::{UTF_16LE, UTF_8, WINDOWS_1252};

    fn decode_all(decoder: &mut LineDecoder, chunks: &[&[u8]]) -> DecodeResult<Vec<String>> {
        let mut lines = Vec::new();
        for chunk in chunks {
            lines.extend(decoder.decode(chunk)?);
        }
        lines.extend(decoder.finish()?);
        Ok(lines)
    }

    // ==================== Splitting tests ====================

    #[test]
    fn test_lines_across_chunks() {
        let mut decoder = LineDecoder::new(UTF_8, 64);
        let lines = decode_all(&mut decoder, &[b"ab", b"c\nd", b"ef\n", b"gh"]).unwrap();
        assert_eq!(lines, vec!["abc", "def", "gh"]);
    }

    #[test]
    fn test_crlf_stripped() {
        let mut decoder = LineDecoder::new(UTF_8, 64);
        let lines = decode_all(&mut decoder, &[b"a\r\nb\r", b"\n"]).unwrap();
        assert_eq!(lines, vec!["a", "b"]);
    }

    #[test]
    fn test_empty_lines_kept() {
        let mut decoder = LineDecoder::new(UTF_8, 64);
        let lines = decode_all(&mut decoder, &[b"a\n\nb\n"]).unwrap();
        assert_eq!(lines, vec!["a", "", "b"]);
    }

    #[test]
    fn test_finish_is_idempotent() {
        let mut decoder = LineDecoder::new(UTF_8, 64);
        decoder.decode(b"x").unwrap();
        assert_eq!(decoder.finish().unwrap(), vec!["x"]);
        assert!(decoder.finish().unwrap().is_empty());
        assert!(decoder.decode(b"y").is_err());
    }

    // ==================== Limit tests ====================

    #[test]
    fn test_line_at_limit_accepted() {
        let mut decoder = LineDecoder::new(UTF_8, 4);
        assert_eq!(decoder.decode(b"abcd\n").unwrap(), vec!["abcd"]);
    }

    #[test]
    fn test_line_over_limit_rejected() {
        let mut decoder = LineDecoder::new(UTF_8, 4);
        let err = decoder.decode(b"abcdef\n").unwrap_err();
        assert!(matches!(err, DecodeError::PayloadTooLarge { limit: 4 }));
    }

    #[test]
    fn test_partial_line_over_limit_rejected_before_terminator() {
        let mut decoder = LineDecoder::new(UTF_8, 4);
        assert!(decoder.decode(b"abc").unwrap().is_empty());
        let err = decoder.decode(b"defgh").unwrap_err();
        assert!(matches!(err, DecodeError::PayloadTooLarge { .. }));
    }

    #[test]
    fn test_unterminated_tail_over_limit_rejected() {
        let mut decoder = LineDecoder::new(UTF_8, 4);
        decoder.decode(b"ok\nabcd").unwrap();
        assert!(decoder.decode(b"e").is_err());
    }

    // ==================== Charset tests ====================

    #[test]
    fn test_multi_byte_split_across_chunks() {
        let text = "ü;日本\n".as_bytes();
        let mut decoder = LineDecoder::new(UTF_8, 64);
        let chunks: Vec<&[u8]> = text.chunks(1).collect();
        let lines = decode_all(&mut decoder, &chunks).unwrap();
        assert_eq!(lines, vec!["ü;日本"]);
    }

    #[test]
    fn test_windows_1252() {
        let mut decoder = LineDecoder::new(WINDOWS_1252, 64);
        let lines = decode_all(&mut decoder, &[b"caf\xe9;na\xefve\n"]).unwrap();
        assert_eq!(lines, vec!["café;naïve"]);
    }

    #[test]
    fn test_utf16le() {
        let utf16: Vec<u8> = "a;b\nc;d\n"
            .encode_utf16()
            .flat_map(|unit| unit.to_le_bytes())
            .collect();
        let mut decoder = LineDecoder::new(UTF_16LE, 64);
        let chunks: Vec<&[u8]> = utf16.chunks(3).collect();
        let lines = decode_all(&mut decoder, &chunks).unwrap();
        assert_eq!(lines, vec!["a;b", "c;d"]);
    }

    #[test]
    fn test_malformed_utf8_rejected() {
        let mut decoder = LineDecoder::new(UTF_8, 64);
        let err = decoder.decode(b"ok\n\xff\xfe\n").unwrap_err();
        assert!(matches!(err, DecodeError::Encoding { charset: "UTF-8" }));
    }

    #[test]
    fn test_truncated_sequence_at_end_rejected() {
        let mut decoder = LineDecoder::new(UTF_8, 64);
        decoder.decode(&"é".as_bytes()[..1]).unwrap();
        assert!(matches!(
            decoder.finish().unwrap_err(),
            DecodeError::Encoding { .. }
        ));
    }

    #[test]
    fn test_bom_removed() {
        let mut decoder = LineDecoder::new(UTF_8, 64);
        let lines = decode_all(&mut decoder, &[b"\xef\xbb\xbfa,b\n"]).unwrap();
        assert_eq!(lines, vec!["a,b"]);
    }
}
