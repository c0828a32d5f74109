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

//! Rowstream CLI library for command-line parsing and execution.
//!
//! # Commands
//!
//! - **decode**: Stream CSV input (file or stdin) through the incremental
//!   decoder and print one JSON object per record
//! - **etag**: Print a file's ETag and the outcome of revalidating it against
//!   an `If-None-Match` value
//!
//! # Examples
//!
//! ```no_run
//! use rowstream_cli::commands::{decode, DecodeOptions, Input};
//!
//! # async fn run() -> Result<(), rowstream_cli::error::CliError> {
//! let options = DecodeOptions {
//!     input: Input::File("data.csv".into()),
//!     columns: vec!["id".into(), "name".into()],
//!     separator: b';',
//!     quote: b'"',
//!     header: false,
//!     trim: false,
//!     lookahead: 1,
//!     max_in_memory_size: Some(64 * 1024),
//!     charset: None,
//! };
//! let written = decode(&options, &mut std::io::stdout()).await?;
//! eprintln!("{} records", written);
//! # Ok(())
//! # }
//! ```
//!
//! # Logging
//!
//! Diagnostics go to stderr through `tracing`; set `RUST_LOG` to adjust
//! (default `rowstream=info`). Stdout carries only command output.

pub mod cli;
pub mod commands;
pub mod error;
