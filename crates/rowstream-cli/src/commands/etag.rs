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

//! ETag command - compute and revalidate a file's ETag.

use crate::error::CliError;
use rowstream_etag::{revalidate, Revalidation};
use std::io::Write;
use std::path::Path;

/// Compute the ETag of `path` and revalidate it against `if_none_match`.
///
/// Writes the ETag, the response status and, for a full response, the
/// content length to `out`.
///
/// # Errors
///
/// Returns `Err` if the file cannot be read or `out` cannot be written.
pub async fn etag<W: Write>(
    path: &Path,
    if_none_match: Option<&str>,
    out: &mut W,
) -> Result<Revalidation, CliError> {
    let body = tokio::fs::read(path)
        .await
        .map_err(|e| CliError::io_error(path, e))?;

    let outcome = revalidate(body, if_none_match);
    writeln!(out, "ETag: {}", outcome.etag())?;
    match &outcome {
        Revalidation::NotModified { .. } => writeln!(out, "Status: 304 Not Modified")?,
        Revalidation::Modified { body, .. } => {
            writeln!(out, "Status: 200 OK")?;
            writeln!(out, "Content-Length: {}", body.len())?;
        }
    }
    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rowstream_etag::generate_etag;
    use std::io::Write as _;

    fn temp_file(content: &[u8]) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content).unwrap();
        file
    }

    #[tokio::test]
    async fn test_etag_without_header() {
        let file = temp_file(b"a,b\n");
        let mut out = Vec::new();
        let outcome = etag(file.path(), None, &mut out).await.unwrap();
        assert_eq!(outcome.status(), 200);

        let text = String::from_utf8(out).unwrap();
        assert!(text.contains(&format!("ETag: {}", generate_etag(b"a,b\n"))));
        assert!(text.contains("Status: 200 OK"));
        assert!(text.contains("Content-Length: 4"));
    }

    #[tokio::test]
    async fn test_etag_matching_header() {
        let file = temp_file(b"a,b\n");
        let tag = generate_etag(b"a,b\n");
        let mut out = Vec::new();
        let outcome = etag(file.path(), Some(&tag), &mut out).await.unwrap();
        assert!(outcome.is_not_modified());
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("Status: 304 Not Modified"));
        assert!(!text.contains("Content-Length"));
    }

    #[tokio::test]
    async fn test_etag_missing_file() {
        let mut out = Vec::new();
        let err = etag(Path::new("/nonexistent/body.txt"), None, &mut out)
            .await
            .unwrap_err();
        assert!(matches!(err, CliError::Io { .. }));
    }
}
