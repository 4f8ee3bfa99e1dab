//! requirements.txt reader
//!
//! Handles lines of the form `<name><op><version>` where `<op>` is a run of
//! two to four `<`, `>`, `=` or space characters:
//! - Exact: `requests==2.31.0`
//! - Comparison: `flask>=1.0.0`, `urllib3<=2.0`
//! - Spaced: `django == 4.2`
//!
//! The version is kept verbatim; no constraint semantics are applied.

use crate::domain::Dependency;
use crate::error::ManifestError;
use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use tokio::fs::File;
use tokio::io::{AsyncBufReadExt, BufReader};

/// Name of the manifest looked up inside the project directory
pub const REQUIREMENTS_FILE: &str = "requirements.txt";

static REQUIREMENT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([^<>= ]+)[<>= ]{2,4}(.+)").unwrap());

/// Parse a single manifest line.
///
/// Returns `Ok(None)` for blank lines and comments.
pub fn parse_requirement_line(
    line_number: usize,
    line: &str,
) -> Result<Option<Dependency>, ManifestError> {
    let content = strip_inline_comment(line).trim_end();

    if content.trim_start().is_empty() || content.trim_start().starts_with('#') {
        return Ok(None);
    }

    let caps = REQUIREMENT_RE
        .captures(content)
        .ok_or_else(|| ManifestError::parse_error(line_number, line.trim_end()))?;

    let name = &caps[1];
    let version = caps[2].trim();
    if version.is_empty() {
        return Err(ManifestError::parse_error(line_number, line.trim_end()));
    }

    Ok(Some(Dependency::new(name, version)))
}

/// Cut a `#` comment that follows whitespace (a `#` inside a token is kept)
fn strip_inline_comment(line: &str) -> &str {
    line.match_indices('#')
        .map(|(idx, _)| idx)
        .find(|&idx| line[..idx].ends_with(char::is_whitespace))
        .map_or(line, |idx| &line[..idx])
}

/// Lazily reads dependencies from a requirements.txt, one line at a time.
///
/// The reader is consumed as it goes and cannot be rewound.
pub struct RequirementsReader {
    path: PathBuf,
    reader: BufReader<File>,
    buf: Vec<u8>,
    line_number: usize,
    exhausted: bool,
}

impl RequirementsReader {
    /// Open `requirements.txt` inside `project_dir`
    pub async fn open(project_dir: &Path) -> Result<Self, ManifestError> {
        Self::open_file(project_dir.join(REQUIREMENTS_FILE)).await
    }

    /// Open a manifest at an explicit path
    pub async fn open_file(path: impl Into<PathBuf>) -> Result<Self, ManifestError> {
        let path = path.into();
        let file = File::open(&path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ManifestError::not_found(&path)
            } else {
                ManifestError::read_error(&path, e)
            }
        })?;

        Ok(Self {
            path,
            reader: BufReader::new(file),
            buf: Vec::new(),
            line_number: 0,
            exhausted: false,
        })
    }

    /// Path of the manifest being read
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Yield the next dependency, a per-line error, or `None` at end of file.
    ///
    /// A line that is not valid UTF-8 is reported as a parse error and
    /// reading continues. An I/O failure is returned once and ends the sequence.
    pub async fn next_entry(&mut self) -> Option<Result<Dependency, ManifestError>> {
        while !self.exhausted {
            self.buf.clear();
            match self.reader.read_until(b'\n', &mut self.buf).await {
                Ok(0) => self.exhausted = true,
                Ok(_) => {
                    self.line_number += 1;
                    let raw = self.buf.strip_suffix(b"\n").unwrap_or(&self.buf[..]);
                    let line = match std::str::from_utf8(raw) {
                        Ok(line) => line,
                        Err(_) => {
                            let lossy = String::from_utf8_lossy(raw);
                            return Some(Err(ManifestError::parse_error(
                                self.line_number,
                                lossy.trim_end(),
                            )));
                        }
                    };
                    match parse_requirement_line(self.line_number, line) {
                        Ok(Some(dep)) => return Some(Ok(dep)),
                        Ok(None) => continue,
                        Err(e) => return Some(Err(e)),
                    }
                }
                Err(e) => {
                    self.exhausted = true;
                    return Some(Err(ManifestError::read_error(&self.path, e)));
                }
            }
        }
        None
    }

    /// Drain the reader, separating dependencies from per-line errors
    pub async fn read_all(mut self) -> (Vec<Dependency>, Vec<ManifestError>) {
        let mut dependencies = Vec::new();
        let mut errors = Vec::new();

        while let Some(entry) = self.next_entry().await {
            match entry {
                Ok(dep) => dependencies.push(dep),
                Err(e) => errors.push(e),
            }
        }

        (dependencies, errors)
    }
}
