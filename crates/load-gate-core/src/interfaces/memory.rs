// crates/load-gate-core/src/interfaces/memory.rs
// ============================================================================
// Module: Load Gate Memory Adapters
// Description: In-memory reference implementations of the engine ports.
// Purpose: Provide deterministic sources and sinks for tests and embedding.
// Dependencies: crate::core, crate::interfaces, crate::runtime::trace
// ============================================================================

//! ## Overview
//! Memory adapters implement the port contracts over plain vectors. The
//! source applies the same line-numbering rules as the file adapter
//! (1-based, gapless, whitespace-only lines skipped) so pipeline behavior is
//! identical under test.

// ============================================================================
// SECTION: Imports
// ============================================================================

use crate::core::message::FormattedRow;
use crate::core::message::RawLine;
use crate::interfaces::DecisionSink;
use crate::interfaces::RecordSource;
use crate::interfaces::SinkError;
use crate::interfaces::SourceError;
use crate::interfaces::TraceSink;
use crate::interfaces::TraceSinkError;
use crate::runtime::trace::TraceRecord;

// ============================================================================
// SECTION: Memory Source
// ============================================================================

/// Record source over an in-memory list of lines.
///
/// # Invariants
/// - Yields the same numbering as the file source: 1-based, gapless,
///   whitespace-only lines skipped.
#[derive(Debug)]
pub struct MemorySource {
    /// Remaining lines in original order (reversed for pop efficiency).
    lines: Vec<String>,
    /// Next line number to assign.
    next_line_no: u64,
}

impl MemorySource {
    /// Creates a source over the given lines.
    #[must_use]
    pub fn from_lines<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut lines: Vec<String> = lines.into_iter().map(Into::into).collect();
        lines.reverse();
        Self {
            lines,
            next_line_no: 1,
        }
    }

    /// Creates a source by splitting a text blob into lines.
    #[must_use]
    pub fn from_text(text: &str) -> Self {
        Self::from_lines(text.lines().map(ToString::to_string))
    }
}

impl RecordSource for MemorySource {
    fn next_line(&mut self) -> Result<Option<RawLine>, SourceError> {
        while let Some(text) = self.lines.pop() {
            if text.trim().is_empty() {
                continue;
            }
            let line_no = self.next_line_no;
            self.next_line_no += 1;
            return Ok(Some(RawLine {
                line_no,
                text,
            }));
        }
        Ok(None)
    }
}

// ============================================================================
// SECTION: Memory Sink
// ============================================================================

/// Decision sink collecting rows in memory.
///
/// # Invariants
/// - Rows are stored in write order; writes after `finish` are rejected.
#[derive(Debug, Default)]
pub struct MemorySink {
    /// Collected rows in write order.
    rows: Vec<FormattedRow>,
    /// Whether `finish` was called.
    finished: bool,
}

impl MemorySink {
    /// Creates an empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the collected rows in write order.
    #[must_use]
    pub fn rows(&self) -> &[FormattedRow] {
        &self.rows
    }

    /// Returns true once `finish` has been called.
    #[must_use]
    pub const fn is_finished(&self) -> bool {
        self.finished
    }
}

impl DecisionSink for MemorySink {
    fn write_line(&mut self, row: &FormattedRow) -> Result<(), SinkError> {
        if self.finished {
            return Err(SinkError::AlreadyFinished);
        }
        self.rows.push(row.clone());
        Ok(())
    }

    fn finish(&mut self) -> Result<(), SinkError> {
        if self.finished {
            return Err(SinkError::AlreadyFinished);
        }
        self.finished = true;
        Ok(())
    }
}

// ============================================================================
// SECTION: Memory Trace Sink
// ============================================================================

/// Trace sink collecting records in memory.
#[derive(Debug, Default)]
pub struct MemoryTraceSink {
    /// Collected trace records in append order.
    records: Vec<TraceRecord>,
}

impl MemoryTraceSink {
    /// Creates an empty trace sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the collected records in append order.
    #[must_use]
    pub fn records(&self) -> &[TraceRecord] {
        &self.records
    }
}

impl TraceSink for MemoryTraceSink {
    fn append(&mut self, record: &TraceRecord) -> Result<(), TraceSinkError> {
        self.records.push(record.clone());
        Ok(())
    }
}
