//! Line-oriented record files.
//!
//! Both tiers of the store are plain text files with one record per line. A
//! [`RecordFile`] reopens its file for every scan and streams it through a
//! buffered reader, so a scan never holds more than one line in memory.

use crate::error::{Error, Result};
use crate::record::{KeyMatch, Record};
use std::borrow::Cow;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

/// A read-only record file scanned sequentially.
#[derive(Debug, Clone)]
pub struct RecordFile {
    path: PathBuf,
}

impl RecordFile {
    /// Refers to the record file at `path`. The file is not opened until scanned.
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self { path: path.as_ref().to_path_buf() }
    }

    /// Path of the underlying file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Opens the file for a fresh sequential scan.
    pub fn scan(&self) -> Result<RecordReader> {
        RecordReader::open(&self.path)
    }

    /// Returns the first line whose identity key matches `query`.
    ///
    /// `query` must already be whitespace-normalized.
    pub fn find(&self, query: &str, key_match: KeyMatch) -> Result<Option<String>> {
        let mut reader = self.scan()?;
        while let Some(record) = reader.read_next()? {
            if key_match.matches(record.key(), query) {
                return Ok(Some(record.into_line()));
            }
        }
        Ok(None)
    }

    /// Identity keys of every well-formed record, in file order.
    pub fn keys(&self) -> Result<Vec<String>> {
        let mut keys = Vec::new();
        let mut reader = self.scan()?;
        while let Some(record) = reader.read_next()? {
            keys.push(record.key().to_string());
        }
        Ok(keys)
    }
}

/// Sequential reader over the records of one file.
///
/// Blank lines are skipped silently. Lines with fewer than four key tokens are
/// skipped with a warning and counted in [`RecordReader::skipped`]. Bytes that
/// are not valid UTF-8 decode to U+FFFD instead of ending the scan.
pub struct RecordReader {
    /// Buffered reader for efficient I/O
    reader: BufReader<File>,
    /// Raw bytes of the line being decoded
    buf: Vec<u8>,
    /// Path for diagnostics
    path: PathBuf,
    /// 1-based number of the last line read
    line_number: usize,
    /// Malformed lines skipped so far
    skipped: usize,
}

impl RecordReader {
    /// Open a record file for reading.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file = File::open(&path).map_err(Error::Io)?;

        Ok(Self {
            reader: BufReader::new(file),
            buf: Vec::new(),
            path,
            line_number: 0,
            skipped: 0,
        })
    }

    /// Read the next well-formed record.
    ///
    /// Returns None if EOF is reached.
    pub fn read_next(&mut self) -> Result<Option<Record>> {
        loop {
            self.buf.clear();
            if self.reader.read_until(b'\n', &mut self.buf).map_err(Error::Io)? == 0 {
                return Ok(None);
            }
            self.line_number += 1;

            let line = match String::from_utf8_lossy(trim_line_ending(&self.buf)) {
                Cow::Borrowed(line) => line.to_string(),
                Cow::Owned(line) => {
                    log::warn!(
                        "Invalid UTF-8 at {:?}:{}, decoded lossily",
                        self.path,
                        self.line_number
                    );
                    line
                }
            };

            if line.trim().is_empty() {
                continue;
            }

            match Record::parse(line) {
                Ok(record) => return Ok(Some(record)),
                Err(Error::MalformedRecord { tokens, .. }) => {
                    self.skipped += 1;
                    log::warn!(
                        "Skipping malformed record at {:?}:{}: {}",
                        self.path,
                        self.line_number,
                        Error::malformed(self.line_number, tokens)
                    );
                }
                Err(e) => return Err(e),
            }
        }
    }

    /// Number of the last line read, counting from 1.
    pub fn line_number(&self) -> usize {
        self.line_number
    }

    /// Number of malformed lines skipped so far.
    pub fn skipped(&self) -> usize {
        self.skipped
    }
}

/// Strips a trailing `\n` or `\r\n`.
fn trim_line_ending(line: &[u8]) -> &[u8] {
    let line = line.strip_suffix(b"\n").unwrap_or(line);
    line.strip_suffix(b"\r").unwrap_or(line)
}

impl Iterator for RecordReader {
    type Item = Result<Record>;

    fn next(&mut self) -> Option<Self::Item> {
        self.read_next().transpose()
    }
}
