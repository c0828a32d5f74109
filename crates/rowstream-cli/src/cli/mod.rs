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

//! CLI command definitions and argument parsing.

use crate::commands::{self, DecodeOptions, Input};
use crate::error::CliError;
use clap::{Args, Subcommand};
use std::io;
use std::path::PathBuf;

/// Top-level CLI commands.
///
/// ```text
/// Commands
/// ├── decode  CSV input → NDJSON records
/// └── etag    file → ETag and revalidation outcome
/// ```
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Decode CSV input into one JSON object per record
    ///
    /// Input is streamed in chunks through the incremental decoder; records
    /// are printed as soon as they are complete.
    Decode(DecodeArgs),

    /// Compute the ETag of a file and revalidate it
    ///
    /// Prints the ETag header value, and the status a server would send for a
    /// request carrying the given If-None-Match value.
    Etag {
        /// Input file path
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// If-None-Match request header value
        #[arg(long, value_name = "TOKEN")]
        if_none_match: Option<String>,
    },
}

/// Arguments of the `decode` command.
#[derive(Args, Debug, Clone)]
pub struct DecodeArgs {
    /// Input file path, `-` for stdin
    #[arg(value_name = "FILE", default_value = "-")]
    pub input: String,

    /// Comma-separated column names
    #[arg(short, long, value_delimiter = ',', required_unless_present = "header")]
    pub columns: Vec<String>,

    /// Column separator (one ASCII character, `\t` for tab)
    #[arg(short, long, default_value = ",", value_parser = parse_ascii_byte)]
    pub separator: u8,

    /// Quote character
    #[arg(long, default_value = "\"", value_parser = parse_ascii_byte)]
    pub quote: u8,

    /// Read column names from the first row
    #[arg(long, conflicts_with = "columns")]
    pub header: bool,

    /// Trim whitespace around unquoted fields
    #[arg(long)]
    pub trim: bool,

    /// Rows kept buffered beyond the record being read
    #[arg(short, long, default_value_t = rowstream_core::DEFAULT_LOOKAHEAD)]
    pub lookahead: usize,

    /// Maximum bytes of one line held in memory
    #[arg(long, value_name = "BYTES")]
    pub max_in_memory_size: Option<usize>,

    /// Input charset (defaults to UTF-8)
    #[arg(long, value_name = "LABEL")]
    pub charset: Option<String>,
}

impl DecodeArgs {
    fn into_options(self) -> Result<DecodeOptions, CliError> {
        if self.lookahead == 0 {
            return Err(CliError::invalid_input("lookahead must be at least 1"));
        }
        let input = if self.input == "-" {
            Input::Stdin
        } else {
            Input::File(PathBuf::from(self.input))
        };
        Ok(DecodeOptions {
            input,
            columns: self.columns,
            separator: self.separator,
            quote: self.quote,
            header: self.header,
            trim: self.trim,
            lookahead: self.lookahead,
            max_in_memory_size: self.max_in_memory_size,
            charset: self.charset,
        })
    }
}

impl Commands {
    /// Execute the command, writing its output to stdout.
    ///
    /// # Errors
    ///
    /// Returns `Err` if reading, decoding or writing fails.
    pub async fn execute(self) -> Result<(), CliError> {
        let stdout = io::stdout();
        let mut out = io::BufWriter::new(stdout.lock());
        match self {
            Commands::Decode(args) => {
                let options = args.into_options()?;
                commands::decode(&options, &mut out).await?;
            }
            Commands::Etag {
                file,
                if_none_match,
            } => {
                commands::etag(&file, if_none_match.as_deref(), &mut out).await?;
            }
        }
        io::Write::flush(&mut out)?;
        Ok(())
    }
}

/// Parse a single ASCII character argument.
fn parse_ascii_byte(value: &str) -> Result<u8, String> {
    match value {
        "\\t" | "tab" => Ok(b'\t'),
        _ => {
            let mut chars = value.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) if c.is_ascii() => Ok(c as u8),
                _ => Err(format!("expected one ASCII character, got '{}'", value)),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser)]
    struct TestCli {
        #[command(subcommand)]
        command: Commands,
    }

    fn parse(args: &[&str]) -> Result<Commands, clap::Error> {
        TestCli::try_parse_from(std::iter::once("rowstream").chain(args.iter().copied()))
            .map(|cli| cli.command)
    }

    #[test]
    fn test_parse_ascii_byte() {
        assert_eq!(parse_ascii_byte(";"), Ok(b';'));
        assert_eq!(parse_ascii_byte("\\t"), Ok(b'\t'));
        assert_eq!(parse_ascii_byte("tab"), Ok(b'\t'));
        assert!(parse_ascii_byte("").is_err());
        assert!(parse_ascii_byte(";;").is_err());
        assert!(parse_ascii_byte("é").is_err());
    }

    #[test]
    fn test_decode_args() {
        let command = parse(&["decode", "data.csv", "-c", "a,b", "-s", ";", "-l", "3"]).unwrap();
        let Commands::Decode(args) = command else {
            panic!("expected decode");
        };
        assert_eq!(args.input, "data.csv");
        assert_eq!(args.columns, vec!["a", "b"]);
        assert_eq!(args.separator, b';');
        assert_eq!(args.quote, b'"');
        assert_eq!(args.lookahead, 3);
        assert!(!args.header);
    }

    #[test]
    fn test_decode_defaults_to_stdin() {
        let Commands::Decode(args) = parse(&["decode", "--header"]).unwrap() else {
            panic!("expected decode");
        };
        assert_eq!(args.input, "-");
        assert!(matches!(args.into_options().unwrap().input, Input::Stdin));
    }

    #[test]
    fn test_decode_requires_columns_or_header() {
        assert!(parse(&["decode", "data.csv"]).is_err());
        assert!(parse(&["decode", "data.csv", "--header", "-c", "a"]).is_err());
    }

    #[test]
    fn test_zero_lookahead_rejected() {
        let Commands::Decode(args) = parse(&["decode", "-c", "a", "-l", "0"]).unwrap() else {
            panic!("expected decode");
        };
        assert!(matches!(args.into_options(), Err(CliError::InvalidInput(_))));
    }

    #[test]
    fn test_etag_args() {
        let command = parse(&["etag", "body.txt", "--if-none-match", "*"]).unwrap();
        match command {
            Commands::Etag {
                file,
                if_none_match,
            } => {
                assert_eq!(file, PathBuf::from("body.txt"));
                assert_eq!(if_none_match.as_deref(), Some("*"));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }
}
