// crates/load-gate-adapters/src/trace.rs
// ============================================================================
// Module: Load Gate NDJSON Trace Sink
// Description: NDJSON file writer implementing the trace sink port.
// Purpose: Persist one serialized trace record per line in emission order.
// Dependencies: load-gate-core, serde_json, std
// ============================================================================

//! ## Overview
//! The trace sink serializes each trace record to compact JSON and appends
//! it with a trailing newline, flushing per record so an aborted run keeps
//! the trace written so far. Trace failures never reach the runner; the
//! sink-backed observer tallies them.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs::File;
use std::io::BufWriter;
use std::io::Write;
use std::path::Path;

use load_gate_core::TraceRecord;
use load_gate_core::TraceSink;
use load_gate_core::TraceSinkError;

// ============================================================================
// SECTION: NDJSON Trace Sink
// ============================================================================

/// Trace sink over an NDJSON file.
#[derive(Debug)]
pub struct NdjsonTraceSink {
    /// Buffered writer over the trace file.
    writer: BufWriter<File>,
}

impl NdjsonTraceSink {
    /// Creates the trace file.
    ///
    /// # Errors
    ///
    /// Returns [`TraceSinkError::AppendFailed`] when the file cannot be
    /// created.
    pub fn create(path: &Path) -> Result<Self, TraceSinkError> {
        let file = File::create(path).map_err(|err| {
            TraceSinkError::AppendFailed(format!("{}: {err}", path.display()))
        })?;
        Ok(Self {
            writer: BufWriter::new(file),
        })
    }
}

impl TraceSink for NdjsonTraceSink {
    fn append(&mut self, record: &TraceRecord) -> Result<(), TraceSinkError> {
        let json = serde_json::to_string(record)
            .map_err(|err| TraceSinkError::AppendFailed(err.to_string()))?;
        self.writer
            .write_all(json.as_bytes())
            .and_then(|()| self.writer.write_all(b"\n"))
            .and_then(|()| self.writer.flush())
            .map_err(|err| TraceSinkError::AppendFailed(err.to_string()))
    }
}
