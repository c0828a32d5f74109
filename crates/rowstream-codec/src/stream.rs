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

//! Demand-driven record stream.

use crate::error::{DecodeError, DecodeResult};
use crate::lines::LineDecoder;
use bytes::Bytes;
use futures::stream::{FusedStream, Stream};
use rowstream_core::{IncrementalRowParser, Record};
use rowstream_csv::CsvRecordReader;
use std::collections::VecDeque;
use std::pin::Pin;
use std::task::{Context, Poll};
use tracing::{debug, warn};

/// Stream of records decoded from an upstream stream of byte chunks.
///
/// Created by [`CsvDecoder::decode`](crate::CsvDecoder::decode). Upstream is
/// polled only when every line already decoded has been handed to the row
/// parser without producing a record, so a slow consumer slows the producer.
///
/// The stream ends after the last record, or after the first error. An
/// upstream error is forwarded as [`DecodeError::Upstream`] without draining
/// the rows still buffered in the parser.
pub struct CsvRecordStream<S> {
    upstream: S,
    lines: Option<LineDecoder>,
    parser: Option<IncrementalRowParser<CsvRecordReader>>,
    pending_lines: VecDeque<String>,
    drained: VecDeque<Record>,
    error: Option<DecodeError>,
    upstream_done: bool,
    done: bool,
    emitted: usize,
}

impl<S> CsvRecordStream<S> {
    pub(crate) fn new(
        upstream: S,
        lines: LineDecoder,
        parser: IncrementalRowParser<CsvRecordReader>,
    ) -> Self {
        Self {
            upstream,
            lines: Some(lines),
            parser: Some(parser),
            pending_lines: VecDeque::new(),
            drained: VecDeque::new(),
            error: None,
            upstream_done: false,
            done: false,
            emitted: 0,
        }
    }

    /// A stream that yields `error` and ends.
    pub(crate) fn failed(upstream: S, error: DecodeError) -> Self {
        Self {
            upstream,
            lines: None,
            parser: None,
            pending_lines: VecDeque::new(),
            drained: VecDeque::new(),
            error: Some(error),
            upstream_done: false,
            done: false,
            emitted: 0,
        }
    }

    /// Records yielded so far.
    pub fn records_emitted(&self) -> usize {
        self.emitted
    }

    fn fail(&mut self, error: DecodeError) -> Poll<Option<DecodeResult<Record>>> {
        warn!(error = %error, records = self.emitted, "csv decoding failed");
        self.done = true;
        self.parser = None;
        self.lines = None;
        self.pending_lines.clear();
        self.drained.clear();
        Poll::Ready(Some(Err(error)))
    }

    fn emit(&mut self, record: Record) -> Poll<Option<DecodeResult<Record>>> {
        self.emitted += 1;
        Poll::Ready(Some(Ok(record)))
    }

    fn parse_line(&mut self, line: String) -> DecodeResult<Option<Record>> {
        match self.parser.as_mut() {
            Some(parser) => Ok(parser.parse(line)?),
            None => Ok(None),
        }
    }

    fn drain(&mut self) -> DecodeResult<()> {
        if let Some(parser) = self.parser.take() {
            let records = parser.parse_remaining()?;
            debug!(
                records = self.emitted + records.len(),
                drained = records.len(),
                "csv decoding complete"
            );
            self.drained.extend(records);
        }
        Ok(())
    }
}

impl<S, E> Stream for CsvRecordStream<S>
where
    S: Stream<Item = Result<Bytes, E>> + Unpin,
    E: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    type Item = DecodeResult<Record>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();

        loop {
            if let Some(record) = this.drained.pop_front() {
                return this.emit(record);
            }
            if let Some(error) = this.error.take() {
                return this.fail(error);
            }
            if this.done {
                return Poll::Ready(None);
            }

            if let Some(line) = this.pending_lines.pop_front() {
                match this.parse_line(line) {
                    Ok(Some(record)) => return this.emit(record),
                    Ok(None) => continue,
                    Err(err) => return this.fail(err),
                }
            }

            if this.upstream_done {
                if let Err(err) = this.drain() {
                    return this.fail(err);
                }
                this.done = true;
                continue;
            }

            match Pin::new(&mut this.upstream).poll_next(cx) {
                Poll::Pending => return Poll::Pending,
                Poll::Ready(Some(Ok(chunk))) => {
                    let decoded = match this.lines.as_mut() {
                        Some(lines) => lines.decode(&chunk),
                        None => Ok(Vec::new()),
                    };
                    match decoded {
                        Ok(lines) => this.pending_lines.extend(lines),
                        Err(err) => return this.fail(err),
                    }
                }
                Poll::Ready(Some(Err(err))) => {
                    return this.fail(DecodeError::upstream(err));
                }
                Poll::Ready(None) => {
                    this.upstream_done = true;
                    let tail = match this.lines.as_mut() {
                        Some(lines) => lines.finish(),
                        None => Ok(Vec::new()),
                    };
                    match tail {
                        Ok(lines) => this.pending_lines.extend(lines),
                        Err(err) => return this.fail(err),
                    }
                }
            }
        }
    }
}

impl<S, E> FusedStream for CsvRecordStream<S>
where
    S: Stream<Item = Result<Bytes, E>> + Unpin,
    E: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    fn is_terminated(&self) -> bool {
        self.done && self.drained.is_empty() && self.error.is_none()
    }
}

impl<S> std::fmt::Debug for CsvRecordStream<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CsvRecordStream")
            .field("pending_lines", &self.pending_lines.len())
            .field("parser", &self.parser)
            .field("upstream_done", &self.upstream_done)
            .field("done", &self.done)
            .field("emitted", &self.emitted)
            .finish()
    }
}
