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

//! Decode a chunked CSV payload, then serve it with ETag revalidation.
//!
//! Run with: `cargo run -p rowstream --example quick_start --features etag`

use bytes::Bytes;
use futures::executor::block_on;
use futures::{stream, StreamExt};
use rowstream::codec::{CsvDecoder, DecodeHints, MediaType};
use rowstream::csv::CsvSchema;
use rowstream::etag::{ResponseBuffer, Revalidation};
use std::io::Write;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let schema = CsvSchema::builder()
        .column_separator(b';')
        .columns(["city", "note"])
        .build();
    let decoder = CsvDecoder::new(schema)?;
    let media: MediaType = "text/csv; charset=UTF-8".parse()?;

    // Chunk boundaries fall mid-field and inside a quoted line break.
    let chunks = vec![
        Ok::<_, std::io::Error>(Bytes::from("Amsterdam;\"canals")),
        Ok(Bytes::from("\nand bikes\"\nDelft;pott")),
        Ok(Bytes::from("ery\n")),
    ];

    let mut buffer = ResponseBuffer::new();
    block_on(async {
        let mut records = decoder.decode(stream::iter(chunks), Some(&media), &DecodeHints::none());
        while let Some(record) = records.next().await {
            let record = record?;
            println!("{:?}", record);
            writeln!(buffer, "{}", record.values().collect::<Vec<_>>().join(" | "))?;
        }
        Ok::<_, Box<dyn std::error::Error>>(())
    })?;

    let etag = buffer.etag();
    match buffer.finish(Some(&etag)) {
        Revalidation::NotModified { etag } => println!("304 Not Modified, ETag {}", etag),
        Revalidation::Modified { etag, body } => {
            println!("200 OK, ETag {}, {} bytes", etag, body.len())
        }
    }
    Ok(())
}
