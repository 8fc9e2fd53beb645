// crates/load-gate-core/src/runtime/trace.rs
// ============================================================================
// Module: Load Gate Trace Records
// Description: Observer hooks and serializable trace records for the runner.
// Purpose: Record step execution deterministically without altering control flow.
// Dependencies: crate::core, crate::interfaces, crate::runtime::{context, runner, step},
// serde
// ============================================================================

//! ## Overview
//! The runner invokes an observer around every step application with a
//! summary of the input, an enumeration of output summaries, and the
//! whitelisted context diff. Observer calls are infallible so tracing can
//! never alter control flow; the sink-backed observer counts failed writes
//! instead of propagating them. Sequence numbers are monotonic within a run.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::cell::RefCell;
use std::rc::Rc;

use serde::Deserialize;
use serde::Serialize;

use crate::core::message::PipelineMessage;
use crate::interfaces::TraceSink;
use crate::runtime::context::ContextDiff;
use crate::runtime::runner::RunReport;
use crate::runtime::step::StepError;

// ============================================================================
// SECTION: Trace Records
// ============================================================================

/// Serializable trace record emitted by the sink-backed observer.
///
/// # Invariants
/// - `seq` is monotonic within a run across all record variants that carry
///   one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum TraceRecord {
    /// A run began with the given scenario.
    RunStarted {
        /// Ordered step names of the scenario.
        steps: Vec<String>,
    },
    /// A step began consuming a message.
    StepStarted {
        /// Monotonic sequence number.
        seq: u64,
        /// 1-based input line number.
        line_no: u64,
        /// Step name.
        step: String,
        /// Input message summary.
        input: String,
    },
    /// A step completed and emitted outputs.
    StepCompleted {
        /// Monotonic sequence number.
        seq: u64,
        /// 1-based input line number.
        line_no: u64,
        /// Step name.
        step: String,
        /// Output message summaries in emission order.
        outputs: Vec<String>,
        /// Whitelisted context changes made by the step.
        context: ContextDiff,
    },
    /// A step failed.
    StepFailed {
        /// Monotonic sequence number.
        seq: u64,
        /// 1-based input line number.
        line_no: u64,
        /// Step name.
        step: String,
        /// Error description.
        error: String,
    },
    /// The run completed with the given report.
    RunCompleted {
        /// Final run report.
        report: RunReport,
    },
}

// ============================================================================
// SECTION: Observer Contract
// ============================================================================

/// Observer invoked by the runner around every step application.
///
/// Implementations must be infallible; tracing never alters control flow.
pub trait TraceObserver {
    /// Called once before the first record is processed.
    fn on_run_started(&mut self, step_names: &[String]);

    /// Called before a step consumes a message.
    fn on_step_started(&mut self, line_no: u64, step: &str, input: &PipelineMessage);

    /// Called after a step completes.
    fn on_step_completed(
        &mut self,
        line_no: u64,
        step: &str,
        outputs: &[PipelineMessage],
        context: &ContextDiff,
    );

    /// Called when a step fails.
    fn on_step_failed(&mut self, line_no: u64, step: &str, error: &StepError);

    /// Called once after the last record is processed.
    fn on_run_completed(&mut self, report: &RunReport);
}

// ============================================================================
// SECTION: No-op Observer
// ============================================================================

/// Observer that records nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl TraceObserver for NoopObserver {
    fn on_run_started(&mut self, _step_names: &[String]) {}

    fn on_step_started(&mut self, _line_no: u64, _step: &str, _input: &PipelineMessage) {}

    fn on_step_completed(
        &mut self,
        _line_no: u64,
        _step: &str,
        _outputs: &[PipelineMessage],
        _context: &ContextDiff,
    ) {
    }

    fn on_step_failed(&mut self, _line_no: u64, _step: &str, _error: &StepError) {}

    fn on_run_completed(&mut self, _report: &RunReport) {}
}

// ============================================================================
// SECTION: Sink Observer
// ============================================================================

/// Observer forwarding trace records to a trace sink.
///
/// # Invariants
/// - Sink failures never surface; they are tallied in `write_failures`.
pub struct SinkObserver {
    /// Destination for trace records.
    sink: Rc<RefCell<dyn TraceSink>>,
    /// Next sequence number to assign.
    seq: u64,
    /// Number of records the sink rejected.
    write_failures: u64,
}

impl SinkObserver {
    /// Creates an observer writing to the given sink.
    #[must_use]
    pub fn new(sink: Rc<RefCell<dyn TraceSink>>) -> Self {
        Self {
            sink,
            seq: 0,
            write_failures: 0,
        }
    }

    /// Returns the number of trace records the sink rejected.
    #[must_use]
    pub const fn write_failures(&self) -> u64 {
        self.write_failures
    }

    /// Assigns the next monotonic sequence number.
    fn next_seq(&mut self) -> u64 {
        self.seq = self.seq.saturating_add(1);
        self.seq
    }

    /// Appends a record, tallying failures instead of propagating them.
    fn emit(&mut self, record: &TraceRecord) {
        if self.sink.borrow_mut().append(record).is_err() {
            self.write_failures = self.write_failures.saturating_add(1);
        }
    }
}

impl TraceObserver for SinkObserver {
    fn on_run_started(&mut self, step_names: &[String]) {
        let record = TraceRecord::RunStarted {
            steps: step_names.to_vec(),
        };
        self.emit(&record);
    }

    fn on_step_started(&mut self, line_no: u64, step: &str, input: &PipelineMessage) {
        let record = TraceRecord::StepStarted {
            seq: self.next_seq(),
            line_no,
            step: step.to_string(),
            input: input.summary(),
        };
        self.emit(&record);
    }

    fn on_step_completed(
        &mut self,
        line_no: u64,
        step: &str,
        outputs: &[PipelineMessage],
        context: &ContextDiff,
    ) {
        let record = TraceRecord::StepCompleted {
            seq: self.next_seq(),
            line_no,
            step: step.to_string(),
            outputs: outputs.iter().map(PipelineMessage::summary).collect(),
            context: context.clone(),
        };
        self.emit(&record);
    }

    fn on_step_failed(&mut self, line_no: u64, step: &str, error: &StepError) {
        let record = TraceRecord::StepFailed {
            seq: self.next_seq(),
            line_no,
            step: step.to_string(),
            error: error.to_string(),
        };
        self.emit(&record);
    }

    fn on_run_completed(&mut self, report: &RunReport) {
        let record = TraceRecord::RunCompleted {
            report: report.clone(),
        };
        self.emit(&record);
    }
}
