//! Batch location of every probe file in a directory.
//!
//! The driver owns the policy the matching core does not: probes that fail to
//! decode or do not fit in the reference are skipped and reported, and the
//! batch carries on. Directory and ledger I/O failures abort the run.

mod ledger;

pub use ledger::{Ledger, MatchResult};

use crate::image::pgm::read_pgm;
use crate::image::GrayImage;
use crate::search::{LocateConfig, Locator};
use crate::trace::{trace_event, trace_span, trace_warn};
use crate::util::{SubLocateError, SubLocateResult};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

/// A probe file that was not located, with the reason.
#[derive(Clone, Debug, PartialEq)]
pub struct SkippedProbe {
    /// File name, with invalid UTF-8 replaced by U+FFFD.
    pub label: String,
    /// Error that stopped the probe from being located.
    pub reason: SubLocateError,
}

/// Outcome of a batch run.
#[derive(Clone, Debug, Default)]
pub struct BatchReport {
    /// Located probes in processing order, as appended to the ledger.
    pub records: Vec<MatchResult>,
    /// Probes that were skipped.
    pub skipped: Vec<SkippedProbe>,
    /// Wall time spent searching, excluding directory listing.
    pub elapsed: Duration,
}

/// Locates probe files against a single reference image.
pub struct BatchLocator {
    reference: GrayImage,
    locator: Locator,
}

impl BatchLocator {
    /// Creates a batch locator over an already decoded reference.
    pub fn new(reference: GrayImage, cfg: LocateConfig) -> Self {
        Self {
            reference,
            locator: Locator::new(cfg),
        }
    }

    /// Loads the reference from a PGM file.
    pub fn open<P: AsRef<Path>>(reference_path: P, cfg: LocateConfig) -> SubLocateResult<Self> {
        let reference = read_pgm(reference_path)?;
        Ok(Self::new(reference, cfg))
    }

    /// Returns the reference image.
    pub fn reference(&self) -> &GrayImage {
        &self.reference
    }

    /// Lists the regular files directly inside `dir`, sorted by file name.
    ///
    /// Subdirectories, symlinks and other special entries are ignored.
    pub fn probe_files<P: AsRef<Path>>(dir: P) -> SubLocateResult<Vec<PathBuf>> {
        let dir = dir.as_ref();
        let entries = fs::read_dir(dir).map_err(|err| SubLocateError::io(dir, err))?;
        let mut files = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|err| SubLocateError::io(dir, err))?;
            let file_type = entry
                .file_type()
                .map_err(|err| SubLocateError::io(&entry.path(), err))?;
            if file_type.is_file() {
                files.push(entry.path());
            }
        }
        files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
        Ok(files)
    }

    /// Decodes one probe file and locates it in the reference.
    ///
    /// The ledger label is the file name, which must be valid UTF-8 so that it
    /// names the file on disk exactly.
    pub fn locate_file<P: AsRef<Path>>(&self, path: P) -> SubLocateResult<MatchResult> {
        let path = path.as_ref();
        let label = path
            .file_name()
            .and_then(|name| name.to_str())
            .ok_or(SubLocateError::InvalidInput(
                "probe file name is not valid UTF-8",
            ))?
            .to_string();
        let probe = read_pgm(path)?;
        let offset = self.locator.locate(self.reference.view(), probe.view())?;
        Ok(MatchResult {
            label,
            x: offset.x,
            y: offset.y,
        })
    }

    /// Locates every regular file in `probe_dir`, appending each result to
    /// `ledger` as it is produced.
    pub fn run<P: AsRef<Path>>(
        &self,
        probe_dir: P,
        ledger: &mut Ledger,
    ) -> SubLocateResult<BatchReport> {
        let probe_dir = probe_dir.as_ref();
        let files = Self::probe_files(probe_dir)?;
        let _span = trace_span!("batch_run", probes = files.len()).entered();

        let start = Instant::now();
        let mut report = BatchReport::default();
        for path in &files {
            match self.locate_file(path) {
                Ok(record) => {
                    ledger.append(&record)?;
                    trace_event!(
                        "probe_located",
                        label = record.label.as_str(),
                        x = record.x,
                        y = record.y
                    );
                    report.records.push(record);
                }
                Err(reason) => {
                    let label = label_of(path);
                    trace_warn!(
                        "probe_skipped",
                        label = label.as_str(),
                        reason = reason.to_string().as_str()
                    );
                    report.skipped.push(SkippedProbe { label, reason });
                }
            }
        }
        report.elapsed = start.elapsed();
        trace_event!(
            "batch_done",
            located = report.records.len(),
            skipped = report.skipped.len(),
            elapsed_s = report.elapsed.as_secs_f64()
        );
        Ok(report)
    }
}

/// Display label for a skipped file; lossy for non-UTF-8 names.
fn label_of(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
