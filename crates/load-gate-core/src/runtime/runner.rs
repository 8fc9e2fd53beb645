// crates/load-gate-core/src/runtime/runner.rs
// ============================================================================
// Module: Load Gate Pipeline Runner
// Description: Depth-first worklist execution of a scenario per record.
// Purpose: Guarantee strict input-order processing and failure handling.
// Dependencies: crate::core, crate::interfaces, crate::runtime::{context, scenario,
// step, trace}, serde, smallvec, thiserror
// ============================================================================

//! ## Overview
//! The runner processes one record end-to-end before reading the next;
//! window mutations and idempotency registration must observe strict input
//! order. Within a record, execution is depth-first over a worklist: each
//! step consumes the previous step's outputs in emission order, and an empty
//! worklist skips the remaining steps.
//!
//! A failed step is recorded in trace and then handled by the failure
//! policy: fail-closed synthesizes a declined decision when the record's
//! identity is known (at most once per record), otherwise the run aborts.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;

use serde::Deserialize;
use serde::Serialize;
use smallvec::smallvec;
use thiserror::Error;

use crate::core::message::Decision;
use crate::core::message::PipelineMessage;
use crate::core::message::RawLine;
use crate::core::reason::ReasonCode;
use crate::interfaces::RecordSource;
use crate::interfaces::SourceError;
use crate::runtime::context::ContextDiff;
use crate::runtime::context::StepContext;
use crate::runtime::scenario::Scenario;
use crate::runtime::step::StepError;
use crate::runtime::step::StepOutput;
use crate::runtime::trace::TraceObserver;

// ============================================================================
// SECTION: Failure Policy
// ============================================================================

/// Policy applied when a step returns an error.
///
/// # Invariants
/// - Fail-closed applies only when the record's identity is known; before
///   the parse step recovers identity, both policies abort.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Abort the run on any step error.
    Abort,
    /// Decline the record when its identity is known, else abort.
    #[default]
    FailClosed,
}

// ============================================================================
// SECTION: Run Report
// ============================================================================

/// Aggregate counters for one pipeline run.
///
/// # Invariants
/// - `records_in == accepted + declined` when the run completes normally.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunReport {
    /// Records yielded by the source.
    pub records_in: u64,
    /// Messages surviving the final step.
    pub records_out: u64,
    /// Accepted decisions.
    pub accepted: u64,
    /// Declined decisions.
    pub declined: u64,
    /// Step applications that returned an error.
    pub failed_steps: u64,
    /// Declined decisions tallied per reason code.
    pub decline_reasons: BTreeMap<ReasonCode, u64>,
}

/// Tallies one decision into the report at the moment it is produced.
fn tally_decision(report: &mut RunReport, decision: &Decision) {
    if decision.accepted {
        report.accepted = report.accepted.saturating_add(1);
    } else {
        report.declined = report.declined.saturating_add(1);
        for reason in &decision.reasons {
            let counter = report.decline_reasons.entry(*reason).or_insert(0);
            *counter = counter.saturating_add(1);
        }
    }
}

// ============================================================================
// SECTION: Pipeline Errors
// ============================================================================

/// Errors that abort a pipeline run.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// The record source failed.
    #[error(transparent)]
    Source(#[from] SourceError),
    /// A step failed and the policy required aborting.
    #[error("step {step} failed on line {line_no}: {source}")]
    Step {
        /// Name of the failed step.
        step: String,
        /// 1-based input line number being processed.
        line_no: u64,
        /// Underlying step error.
        #[source]
        source: StepError,
    },
}

// ============================================================================
// SECTION: Pipeline Runner
// ============================================================================

/// Executes a scenario depth-first per input record.
///
/// # Invariants
/// - Record N+1 is not started until record N has completed all steps.
/// - Output order matches input order.
pub struct PipelineRunner {
    /// Ordered bound steps.
    scenario: Scenario,
    /// Observer invoked around each step application.
    observer: Box<dyn TraceObserver>,
    /// Policy applied when a step fails.
    policy: FailurePolicy,
}

impl PipelineRunner {
    /// Creates a runner over a scenario.
    #[must_use]
    pub fn new(
        scenario: Scenario,
        observer: Box<dyn TraceObserver>,
        policy: FailurePolicy,
    ) -> Self {
        Self {
            scenario,
            observer,
            policy,
        }
    }

    /// Runs the pipeline to exhaustion of the source.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError`] when the source fails or a step failure
    /// cannot be handled fail-closed.
    pub fn run(&mut self, source: &mut dyn RecordSource) -> Result<RunReport, PipelineError> {
        let mut report = RunReport::default();
        let step_names = self.scenario.step_names();
        self.observer.on_run_started(&step_names);
        while let Some(raw) = source.next_line()? {
            report.records_in = report.records_in.saturating_add(1);
            self.process_record(raw, &mut report)?;
        }
        self.observer.on_run_completed(&report);
        Ok(report)
    }

    /// Processes one record through every step of the scenario.
    fn process_record(
        &mut self,
        raw: RawLine,
        report: &mut RunReport,
    ) -> Result<(), PipelineError> {
        let Self {
            scenario,
            observer,
            policy,
        } = self;
        let line_no = raw.line_no;
        let mut ctx = StepContext::new(line_no);
        let mut work: StepOutput = smallvec![PipelineMessage::Raw(raw)];
        let mut synthesized = false;
        let mut index = 0;

        while index < scenario.len() {
            let Some(bound) = scenario.step_at_mut(index) else {
                break;
            };
            let step_name = bound.name().to_string();
            let mut next = StepOutput::new();
            let mut replacement: Option<Decision> = None;

            for msg in work.drain(..) {
                let input_decided = matches!(msg, PipelineMessage::Decided(_));
                observer.on_step_started(line_no, &step_name, &msg);
                let before = ctx.snapshot();
                match bound.step_mut().apply(msg, &mut ctx) {
                    Ok(outputs) => {
                        let diff = ContextDiff::between(&before, &ctx.snapshot());
                        observer.on_step_completed(line_no, &step_name, &outputs, &diff);
                        if !input_decided {
                            for out in &outputs {
                                if let PipelineMessage::Decided(decision) = out {
                                    tally_decision(report, decision);
                                }
                            }
                        }
                        next.extend(outputs);
                    }
                    Err(error) => {
                        report.failed_steps = report.failed_steps.saturating_add(1);
                        observer.on_step_failed(line_no, &step_name, &error);
                        let identity = ctx.identity().cloned();
                        let fail_closed =
                            matches!(*policy, FailurePolicy::FailClosed) && !synthesized;
                        if let (true, Some(identity)) = (fail_closed, identity) {
                            let decision = Decision::step_failure(
                                identity.line_no,
                                identity.load_id,
                                identity.customer_id,
                            );
                            tally_decision(report, &decision);
                            replacement = Some(decision);
                            synthesized = true;
                            break;
                        }
                        return Err(PipelineError::Step {
                            step: step_name,
                            line_no,
                            source: error,
                        });
                    }
                }
            }

            work = match replacement {
                Some(decision) => smallvec![PipelineMessage::Decided(decision)],
                None => next,
            };
            if work.is_empty() {
                break;
            }
            index += 1;
        }

        if !work.is_empty() {
            let survivors = u64::try_from(work.len()).unwrap_or(u64::MAX);
            report.records_out = report.records_out.saturating_add(survivors);
        }
        Ok(())
    }
}
