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

//! Decode command - stream CSV input to NDJSON.

use crate::error::CliError;
use bytes::Bytes;
use futures::{Stream, StreamExt};
use rowstream_codec::{CsvDecoder, DecodeHints, DecoderConfig, MediaType};
use rowstream_csv::{CsvSchema, HeaderMode};
use std::io::Write;
use std::path::PathBuf;
use tokio_util::io::ReaderStream;
use tracing::{debug, info};

/// Where `decode` reads from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    /// Standard input.
    Stdin,
    /// A file on disk.
    File(PathBuf),
}

/// Resolved options of the `decode` command.
#[derive(Debug, Clone)]
pub struct DecodeOptions {
    /// Input source.
    pub input: Input,
    /// Column names; empty with `header`.
    pub columns: Vec<String>,
    /// Column separator.
    pub separator: u8,
    /// Quote character.
    pub quote: u8,
    /// Take column names from the first row.
    pub header: bool,
    /// Trim unquoted fields.
    pub trim: bool,
    /// Parser lookahead.
    pub lookahead: usize,
    /// Per-line memory limit override.
    pub max_in_memory_size: Option<usize>,
    /// Input charset label.
    pub charset: Option<String>,
}

impl DecodeOptions {
    fn schema(&self) -> CsvSchema {
        let builder = CsvSchema::builder()
            .column_separator(self.separator)
            .quote(self.quote)
            .trim(self.trim);
        if self.header {
            builder.header(HeaderMode::FromInput).build()
        } else {
            builder.columns(self.columns.iter().cloned()).build()
        }
    }

    fn media_type(&self) -> MediaType {
        match &self.charset {
            Some(charset) => MediaType::text_csv().with_param("charset", charset.as_str()),
            None => MediaType::text_csv(),
        }
    }

    fn decoder(&self) -> Result<CsvDecoder, CliError> {
        let config = DecoderConfig::builder().lookahead(self.lookahead).build();
        Ok(CsvDecoder::with_config(self.schema(), config)?)
    }

    fn hints(&self) -> DecodeHints {
        match self.max_in_memory_size {
            Some(limit) => DecodeHints::none().with_max_in_memory_size(limit),
            None => DecodeHints::none(),
        }
    }
}

/// Decode the configured input, writing one JSON object per line to `out`.
///
/// Returns the number of records written.
///
/// # Errors
///
/// Returns `Err` if the input cannot be opened, decoding fails, or `out`
/// cannot be written. Records decoded before a failure have already been
/// written.
pub async fn decode<W: Write>(options: &DecodeOptions, out: &mut W) -> Result<usize, CliError> {
    match &options.input {
        Input::Stdin => {
            debug!("decoding stdin");
            decode_stream(options, ReaderStream::new(tokio::io::stdin()), out).await
        }
        Input::File(path) => {
            let file = tokio::fs::File::open(path)
                .await
                .map_err(|e| CliError::io_error(path, e))?;
            debug!(path = %path.display(), "decoding file");
            decode_stream(options, ReaderStream::new(file), out).await
        }
    }
}

/// Decode an arbitrary byte chunk stream, writing NDJSON to `out`.
///
/// # Errors
///
/// See [`decode`].
pub async fn decode_stream<S, E, W>(
    options: &DecodeOptions,
    upstream: S,
    out: &mut W,
) -> Result<usize, CliError>
where
    S: Stream<Item = Result<Bytes, E>> + Unpin,
    E: Into<Box<dyn std::error::Error + Send + Sync>>,
    W: Write,
{
    let decoder = options.decoder()?;
    let media = options.media_type();
    let mut records = decoder.decode(upstream, Some(&media), &options.hints());

    let mut written = 0;
    while let Some(record) = records.next().await {
        let record = record?;
        serde_json::to_writer(&mut *out, &record)?;
        out.write_all(b"\n")?;
        written += 1;
    }

    info!(records = written, "decode finished");
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::stream;
    use rowstream_codec::DecodeError;

    fn options(columns: &[&str]) -> DecodeOptions {
        DecodeOptions {
            input: Input::Stdin,
            columns: columns.iter().map(|c| c.to_string()).collect(),
            separator: b',',
            quote: b'"',
            header: false,
            trim: false,
            lookahead: 1,
            max_in_memory_size: None,
            charset: None,
        }
    }

    fn chunks(parts: &[&'static str]) -> impl Stream<Item = Result<Bytes, std::io::Error>> + Unpin {
        stream::iter(parts.iter().map(|p| Ok(Bytes::from(*p))).collect::<Vec<_>>())
    }

    #[tokio::test]
    async fn test_decode_stream_writes_ndjson() {
        let mut out = Vec::new();
        let written = decode_stream(&options(&["a", "b"]), chunks(&["1,x\n2,", "y\n"]), &mut out)
            .await
            .unwrap();
        assert_eq!(written, 2);
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "{\"a\":\"1\",\"b\":\"x\"}\n{\"a\":\"2\",\"b\":\"y\"}\n"
        );
    }

    #[tokio::test]
    async fn test_decode_stream_header_and_separator() {
        let mut opts = options(&[]);
        opts.header = true;
        opts.separator = b';';
        let mut out = Vec::new();
        decode_stream(&opts, chunks(&["id;name\n7;seven\n"]), &mut out)
            .await
            .unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "{\"id\":\"7\",\"name\":\"seven\"}\n");
    }

    #[tokio::test]
    async fn test_decode_stream_limit() {
        let mut opts = options(&["a"]);
        opts.max_in_memory_size = Some(4);
        let mut out = Vec::new();
        let err = decode_stream(&opts, chunks(&["ok\ntoo-long\n"]), &mut out)
            .await
            .unwrap_err();
        assert!(matches!(err, CliError::Decode(DecodeError::PayloadTooLarge { limit: 4 })));
    }

    #[tokio::test]
    async fn test_decode_stream_unknown_charset() {
        let mut opts = options(&["a"]);
        opts.charset = Some("no-such-charset".to_string());
        let mut out = Vec::new();
        let err = decode_stream(&opts, chunks(&["x\n"]), &mut out).await.unwrap_err();
        assert!(matches!(err, CliError::Decode(DecodeError::UnsupportedCharset(_))));
        assert!(out.is_empty());
    }

    #[test]
    fn test_media_type_carries_charset() {
        let mut opts = options(&["a"]);
        assert_eq!(opts.media_type().charset(), None);
        opts.charset = Some("ISO-8859-1".to_string());
        assert_eq!(opts.media_type().charset(), Some("ISO-8859-1"));
    }
}
