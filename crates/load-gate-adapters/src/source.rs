// crates/load-gate-adapters/src/source.rs
// ============================================================================
// Module: Load Gate NDJSON Source
// Description: Buffered NDJSON file reader implementing the record source port.
// Purpose: Yield raw lines with strictly increasing, gapless line numbers.
// Dependencies: load-gate-core, std
// ============================================================================

//! ## Overview
//! The file source reads one line per record in physical order, strips the
//! trailing newline, skips whitespace-only lines, and assigns 1-based line
//! numbers to yielded records with no gaps. A trailing newline after the
//! last record is optional.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs::File;
use std::io::BufRead;
use std::io::BufReader;
use std::path::Path;

use load_gate_core::RawLine;
use load_gate_core::RecordSource;
use load_gate_core::SourceError;

// ============================================================================
// SECTION: NDJSON File Source
// ============================================================================

/// Record source over an NDJSON file.
///
/// # Invariants
/// - Yielded line numbers start at 1 and are strictly increasing with no
///   gaps; whitespace-only lines are never yielded.
#[derive(Debug)]
pub struct NdjsonFileSource {
    /// Buffered reader over the input file.
    reader: BufReader<File>,
    /// Reused line buffer.
    buffer: String,
    /// Next line number to assign.
    next_line_no: u64,
}

impl NdjsonFileSource {
    /// Opens an NDJSON input file.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::ReadFailed`] when the file cannot be opened.
    pub fn open(path: &Path) -> Result<Self, SourceError> {
        let file = File::open(path).map_err(|err| {
            SourceError::ReadFailed(format!("{}: {err}", path.display()))
        })?;
        Ok(Self {
            reader: BufReader::new(file),
            buffer: String::new(),
            next_line_no: 1,
        })
    }
}

impl RecordSource for NdjsonFileSource {
    fn next_line(&mut self) -> Result<Option<RawLine>, SourceError> {
        loop {
            self.buffer.clear();
            let read = self
                .reader
                .read_line(&mut self.buffer)
                .map_err(|err| SourceError::ReadFailed(err.to_string()))?;
            if read == 0 {
                return Ok(None);
            }
            let text = self.buffer.trim_end_matches(['\n', '\r']);
            if text.trim().is_empty() {
                continue;
            }
            let line_no = self.next_line_no;
            self.next_line_no += 1;
            return Ok(Some(RawLine {
                line_no,
                text: text.to_string(),
            }));
        }
    }
}
