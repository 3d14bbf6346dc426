//! Append-only text ledger of located probes.

use crate::util::{SubLocateError, SubLocateResult};
use std::fmt;
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// One located probe: its label and winning origin.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MatchResult {
    /// Probe file name.
    pub label: String,
    /// Column of the probe's top-left corner in the reference.
    pub x: usize,
    /// Row of the probe's top-left corner in the reference.
    pub y: usize,
}

impl fmt::Display for MatchResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, {}, {}", self.label, self.x, self.y)
    }
}

/// Ledger file opened in append mode; existing records are never rewritten.
pub struct Ledger {
    path: PathBuf,
    writer: BufWriter<File>,
}

impl Ledger {
    /// Opens `path` for appending, creating it if it does not exist.
    pub fn open<P: AsRef<Path>>(path: P) -> SubLocateResult<Self> {
        let path = path.as_ref().to_path_buf();
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|err| SubLocateError::io(&path, err))?;
        Ok(Self {
            path,
            writer: BufWriter::new(file),
        })
    }

    /// Returns the ledger path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Appends one `label, x, y` line and flushes it.
    pub fn append(&mut self, record: &MatchResult) -> SubLocateResult<()> {
        writeln!(self.writer, "{record}").map_err(|err| SubLocateError::io(&self.path, err))?;
        self.writer
            .flush()
            .map_err(|err| SubLocateError::io(&self.path, err))
    }
}
