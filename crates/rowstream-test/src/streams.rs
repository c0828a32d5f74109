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

//! Byte stream helpers.
//!
//! The decoder consumes `Stream<Item = Result<Bytes, E>>`. These helpers
//! build such streams from in-memory data with controlled chunk boundaries,
//! injected failures and pull counting.

use bytes::Bytes;
use futures::stream::{self, Stream};
use std::io;
use std::pin::Pin;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::task::{Context, Poll};

/// An in-memory byte stream.
pub type ByteStream = stream::Iter<std::vec::IntoIter<Result<Bytes, io::Error>>>;

/// Stream the given chunks as-is.
pub fn from_chunks<I, T>(chunks: I) -> ByteStream
where
    I: IntoIterator<Item = T>,
    T: Into<Bytes>,
{
    let items: Vec<_> = chunks.into_iter().map(|c| Ok(c.into())).collect();
    stream::iter(items)
}

/// Split `data` into chunks of at most `chunk_size` bytes.
///
/// Chunk boundaries ignore character and line boundaries on purpose.
pub fn chunked(data: impl AsRef<[u8]>, chunk_size: usize) -> ByteStream {
    let data = data.as_ref();
    let chunk_size = chunk_size.max(1);
    from_chunks(
        data.chunks(chunk_size)
            .map(Bytes::copy_from_slice)
            .collect::<Vec<_>>(),
    )
}

/// Deliver `data` one byte per chunk.
pub fn byte_at_a_time(data: impl AsRef<[u8]>) -> ByteStream {
    chunked(data, 1)
}

/// Stream the given chunks, then fail with `message`.
pub fn failing_after<I, T>(chunks: I, message: &str) -> ByteStream
where
    I: IntoIterator<Item = T>,
    T: Into<Bytes>,
{
    let mut items: Vec<_> = chunks.into_iter().map(|c| Ok(c.into())).collect();
    items.push(Err(io::Error::new(io::ErrorKind::ConnectionReset, message.to_string())));
    stream::iter(items)
}

/// Stream wrapper that counts how many items were pulled from the inner stream.
///
/// # Examples
///
/// ```
/// use futures::StreamExt;
/// use rowstream_test::{from_chunks, CountingStream};
///
/// let (mut stream, pulled) = CountingStream::new(from_chunks(["a", "b"]));
/// futures::executor::block_on(async {
///     stream.next().await;
/// });
/// assert_eq!(pulled.load(std::sync::atomic::Ordering::SeqCst), 1);
/// ```
#[derive(Debug)]
pub struct CountingStream<S> {
    inner: S,
    pulled: Arc<AtomicUsize>,
}

impl<S> CountingStream<S> {
    /// Wrap `inner`, returning the wrapper and a shared pull counter.
    pub fn new(inner: S) -> (Self, Arc<AtomicUsize>) {
        let pulled = Arc::new(AtomicUsize::new(0));
        (
            Self {
                inner,
                pulled: Arc::clone(&pulled),
            },
            pulled,
        )
    }
}

impl<S: Stream + Unpin> Stream for CountingStream<S> {
    type Item = S::Item;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<S::Item>> {
        let poll = Pin::new(&mut self.inner).poll_next(cx);
        if let Poll::Ready(Some(_)) = &poll {
            self.pulled.fetch_add(1, Ordering::SeqCst);
        }
        poll
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::executor::block_on;
    use futures::StreamExt;

    #[test]
    fn test_chunked_boundaries() {
        let chunks: Vec<_> = block_on(chunked("abcde", 2).collect::<Vec<_>>());
        let chunks: Vec<_> = chunks.into_iter().map(|c| c.unwrap()).collect();
        assert_eq!(chunks, vec![Bytes::from("ab"), Bytes::from("cd"), Bytes::from("e")]);
    }

    #[test]
    fn test_chunked_zero_size_is_one() {
        let count = block_on(chunked("abc", 0).count());
        assert_eq!(count, 3);
    }

    #[test]
    fn test_failing_after() {
        let items: Vec<_> = block_on(failing_after(["x"], "reset").collect::<Vec<_>>());
        assert_eq!(items.len(), 2);
        assert!(items[0].is_ok());
        let err = items[1].as_ref().unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::ConnectionReset);
    }

    #[test]
    fn test_counting_stream() {
        let (stream, pulled) = CountingStream::new(from_chunks(["a", "b", "c"]));
        let items = block_on(stream.collect::<Vec<_>>());
        assert_eq!(items.len(), 3);
        assert_eq!(pulled.load(Ordering::SeqCst), 3);
    }
}
