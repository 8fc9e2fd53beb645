// crates/load-gate-core/src/interfaces/mod.rs
// ============================================================================
// Module: Load Gate Interfaces
// Description: Adapter-agnostic ports for record input, output, and tracing.
// Purpose: Define the contract surfaces used by the pipeline runner and steps.
// Dependencies: crate::core, crate::runtime::trace, thiserror
// ============================================================================

//! ## Overview
//! Ports define how the engine touches the outside world without embedding
//! adapter details. The source yields raw lines in physical order, the
//! decision sink receives one formatted row per record in input order, and
//! the trace sink receives serialized trace records. Implementations must be
//! deterministic and fail closed on IO errors.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod memory;

// ============================================================================
// SECTION: Imports
// ============================================================================

use thiserror::Error;

use crate::core::message::FormattedRow;
use crate::core::message::RawLine;
use crate::runtime::trace::TraceRecord;

// ============================================================================
// SECTION: Record Source
// ============================================================================

/// Errors raised by record sources.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
#[derive(Debug, Error)]
pub enum SourceError {
    /// The source failed to read input.
    #[error("source read failed: {0}")]
    ReadFailed(String),
}

/// Yields raw input lines in physical order.
pub trait RecordSource {
    /// Returns the next raw line, or `None` at end of input.
    ///
    /// Yielded line numbers start at 1 and are strictly increasing with no
    /// gaps among yielded records.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError`] when reading fails.
    fn next_line(&mut self) -> Result<Option<RawLine>, SourceError>;
}

// ============================================================================
// SECTION: Decision Sink
// ============================================================================

/// Errors raised by decision sinks.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
#[derive(Debug, Error)]
pub enum SinkError {
    /// The sink failed to write a row.
    #[error("sink write failed: {0}")]
    WriteFailed(String),
    /// The sink failed to commit its output.
    #[error("sink commit failed: {0}")]
    CommitFailed(String),
    /// The sink was used after `finish`.
    #[error("sink already finished")]
    AlreadyFinished,
}

/// Receives one formatted output row per record in input order.
pub trait DecisionSink {
    /// Appends a formatted row to the output.
    ///
    /// # Errors
    ///
    /// Returns [`SinkError`] when the write fails or the sink is finished.
    fn write_line(&mut self, row: &FormattedRow) -> Result<(), SinkError>;

    /// Commits the output, making it visible at its final location.
    ///
    /// # Errors
    ///
    /// Returns [`SinkError`] when the commit fails.
    fn finish(&mut self) -> Result<(), SinkError>;
}

// ============================================================================
// SECTION: Trace Sink
// ============================================================================

/// Errors raised by trace sinks.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
#[derive(Debug, Error)]
pub enum TraceSinkError {
    /// The sink failed to append a trace record.
    #[error("trace append failed: {0}")]
    AppendFailed(String),
}

/// Receives serialized trace records in emission order.
pub trait TraceSink {
    /// Appends one trace record.
    ///
    /// # Errors
    ///
    /// Returns [`TraceSinkError`] when the append fails.
    fn append(&mut self, record: &TraceRecord) -> Result<(), TraceSinkError>;
}
