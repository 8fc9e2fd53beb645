// crates/load-gate-adapters/src/sink.rs
// ============================================================================
// Module: Load Gate NDJSON Sink
// Description: Buffered NDJSON file writer implementing the decision sink port.
// Purpose: Produce the output file atomically via temp path and rename.
// Dependencies: load-gate-core, std
// ============================================================================

//! ## Overview
//! The file sink appends one row per record with a trailing newline. In
//! atomic mode (the default), rows go to `<path>.tmp` and the final path
//! appears only when `finish` renames it into place, so an aborted run
//! leaves no partial output file. Non-atomic mode writes the final path
//! directly.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::ffi::OsString;
use std::fs;
use std::fs::File;
use std::io::BufWriter;
use std::io::Write;
use std::path::Path;
use std::path::PathBuf;

use load_gate_core::DecisionSink;
use load_gate_core::FormattedRow;
use load_gate_core::SinkError;

// ============================================================================
// SECTION: NDJSON File Sink
// ============================================================================

/// Decision sink over an NDJSON file with optional atomic replace.
///
/// # Invariants
/// - In atomic mode the final path exists only after a successful `finish`.
/// - Writes after `finish` are rejected.
#[derive(Debug)]
pub struct NdjsonFileSink {
    /// Buffered writer over the working file, dropped on finish.
    writer: Option<BufWriter<File>>,
    /// Path rows are written to before commit.
    write_path: PathBuf,
    /// Final output path.
    final_path: PathBuf,
    /// Whether `finish` renames the temp path into place.
    atomic: bool,
}

impl NdjsonFileSink {
    /// Creates the output file (or its temp sibling in atomic mode).
    ///
    /// # Errors
    ///
    /// Returns [`SinkError::WriteFailed`] when the file cannot be created.
    pub fn create(path: &Path, atomic_replace: bool) -> Result<Self, SinkError> {
        let final_path = path.to_path_buf();
        let write_path = if atomic_replace {
            temp_sibling(path)
        } else {
            final_path.clone()
        };
        let file = File::create(&write_path).map_err(|err| {
            SinkError::WriteFailed(format!("{}: {err}", write_path.display()))
        })?;
        Ok(Self {
            writer: Some(BufWriter::new(file)),
            write_path,
            final_path,
            atomic: atomic_replace,
        })
    }

    /// Returns the final output path.
    #[must_use]
    pub fn final_path(&self) -> &Path {
        &self.final_path
    }
}

impl DecisionSink for NdjsonFileSink {
    fn write_line(&mut self, row: &FormattedRow) -> Result<(), SinkError> {
        let Some(writer) = self.writer.as_mut() else {
            return Err(SinkError::AlreadyFinished);
        };
        writer
            .write_all(row.json.as_bytes())
            .and_then(|()| writer.write_all(b"\n"))
            .map_err(|err| SinkError::WriteFailed(err.to_string()))
    }

    fn finish(&mut self) -> Result<(), SinkError> {
        let Some(mut writer) = self.writer.take() else {
            return Err(SinkError::AlreadyFinished);
        };
        writer
            .flush()
            .map_err(|err| SinkError::CommitFailed(err.to_string()))?;
        drop(writer);
        if self.atomic {
            fs::rename(&self.write_path, &self.final_path).map_err(|err| {
                SinkError::CommitFailed(format!(
                    "rename {} -> {}: {err}",
                    self.write_path.display(),
                    self.final_path.display()
                ))
            })?;
        }
        Ok(())
    }
}

// ============================================================================
// SECTION: Path Helpers
// ============================================================================

/// Returns the temp sibling path used before atomic rename.
fn temp_sibling(path: &Path) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(".tmp");
    PathBuf::from(name)
}
