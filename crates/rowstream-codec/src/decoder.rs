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

//! CSV decoder entry point.

use crate::config::{DecodeHints, DecoderConfig};
use crate::error::{DecodeError, DecodeResult};
use crate::lines::LineDecoder;
use crate::media::MediaType;
use crate::stream::CsvRecordStream;
use bytes::Bytes;
use futures::{Stream, TryStreamExt};
use rowstream_core::{IncrementalRowParser, Record, RowError};
use rowstream_csv::{CsvRecordReader, CsvSchema};
use tracing::debug;

/// Decodes streams of byte chunks into streams of CSV records.
///
/// A decoder is an immutable, reusable configuration: every
/// [`decode`](Self::decode) call builds its own line decoder and row parser,
/// so concurrent decodes never share state.
///
/// # Examples
///
/// ```
/// use futures::executor::block_on;
/// use futures::stream;
/// use bytes::Bytes;
/// use rowstream_codec::{CsvDecoder, DecodeHints};
/// use rowstream_csv::CsvSchema;
///
/// let schema = CsvSchema::builder()
///     .column_separator(b';')
///     .columns(["header1", "header2"])
///     .build();
/// let decoder = CsvDecoder::new(schema).unwrap();
///
/// let chunks = stream::iter(vec![
///     Ok::<_, std::io::Error>(Bytes::from("value1;val")),
///     Ok(Bytes::from("ue2\nvalue3;value4\n")),
/// ]);
/// let records = block_on(decoder.decode_all(chunks, None, &DecodeHints::none())).unwrap();
///
/// assert_eq!(records.len(), 2);
/// assert_eq!(records[0].get("header2"), Some("value2"));
/// assert_eq!(records[1].get("header1"), Some("value3"));
/// ```
#[derive(Debug, Clone)]
pub struct CsvDecoder {
    reader: CsvRecordReader,
    config: DecoderConfig,
}

impl CsvDecoder {
    /// Create a decoder for `schema` with the default configuration.
    ///
    /// # Errors
    ///
    /// Returns [`DecodeError::Csv`] if the schema is invalid.
    pub fn new(schema: CsvSchema) -> DecodeResult<Self> {
        Self::with_config(schema, DecoderConfig::default())
    }

    /// Create a decoder for `schema` with `config`.
    ///
    /// # Errors
    ///
    /// Returns [`DecodeError::Csv`] if the schema is invalid and
    /// [`DecodeError::Row`] if the lookahead is zero.
    pub fn with_config(schema: CsvSchema, config: DecoderConfig) -> DecodeResult<Self> {
        if config.lookahead == 0 {
            return Err(RowError::InvalidLookahead(config.lookahead).into());
        }
        Ok(Self {
            reader: CsvRecordReader::new(schema)?,
            config,
        })
    }

    /// The schema records are read with.
    pub fn schema(&self) -> &CsvSchema {
        self.reader.schema()
    }

    /// The decoder configuration.
    pub fn config(&self) -> &DecoderConfig {
        &self.config
    }

    /// Maximum bytes of one line held in memory.
    pub fn max_in_memory_size(&self) -> usize {
        self.config.max_in_memory_size
    }

    /// Set the maximum bytes of one line held in memory.
    pub fn set_max_in_memory_size(&mut self, limit: usize) {
        self.config.max_in_memory_size = limit;
    }

    /// Whether this decoder handles `media_type`.
    ///
    /// Accepts `text/csv`, `application/csv` and `text/plain` with any
    /// parameters, and an absent media type.
    pub fn can_decode(&self, media_type: Option<&MediaType>) -> bool {
        match media_type {
            None => true,
            Some(media) => matches!(
                (media.kind(), media.subtype()),
                ("text", "csv") | ("application", "csv") | ("text", "plain")
            ),
        }
    }

    /// Decode `upstream` into a stream of records.
    ///
    /// Configuration problems (unsupported media type, unknown charset) are
    /// reported as the first and only item of the returned stream.
    pub fn decode<S, E>(
        &self,
        upstream: S,
        media_type: Option<&MediaType>,
        hints: &DecodeHints,
    ) -> CsvRecordStream<S>
    where
        S: Stream<Item = Result<Bytes, E>> + Unpin,
        E: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        match self.prepare(media_type, hints) {
            Ok((lines, parser)) => CsvRecordStream::new(upstream, lines, parser),
            Err(err) => CsvRecordStream::failed(upstream, err),
        }
    }

    /// Decode `upstream` completely, collecting every record.
    ///
    /// # Errors
    ///
    /// The first error of the stream; records decoded before it are discarded.
    pub async fn decode_all<S, E>(
        &self,
        upstream: S,
        media_type: Option<&MediaType>,
        hints: &DecodeHints,
    ) -> DecodeResult<Vec<Record>>
    where
        S: Stream<Item = Result<Bytes, E>> + Unpin,
        E: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        self.decode(upstream, media_type, hints).try_collect().await
    }

    fn prepare(
        &self,
        media_type: Option<&MediaType>,
        hints: &DecodeHints,
    ) -> DecodeResult<(LineDecoder, IncrementalRowParser<CsvRecordReader>)> {
        if !self.can_decode(media_type) {
            let media = media_type.map(ToString::to_string).unwrap_or_default();
            return Err(DecodeError::UnsupportedMediaType(media));
        }

        let encoding = match media_type {
            Some(media) => media.encoding()?,
            None => encoding_rs::UTF_8,
        };
        let max_in_memory_size = hints
            .max_in_memory_size
            .unwrap_or(self.config.max_in_memory_size);

        debug!(
            charset = encoding.name(),
            max_in_memory_size,
            lookahead = self.config.lookahead,
            "starting csv decode"
        );

        let lines = LineDecoder::new(encoding, max_in_memory_size);
        let parser = IncrementalRowParser::new(self.reader.clone(), self.config.lookahead)?;
        Ok((lines, parser))
    }
}
