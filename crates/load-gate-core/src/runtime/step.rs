// crates/load-gate-core/src/runtime/step.rs
// ============================================================================
// Module: Load Gate Step Contract
// Description: The transformation contract executed by the pipeline kernel.
// Purpose: Define step application, output sequences, and step errors.
// Dependencies: crate::core, crate::interfaces, crate::runtime::context,
// crate::state::windows, smallvec, thiserror
// ============================================================================

//! ## Overview
//! A step consumes one message and returns zero, one, or many messages.
//! Steps are deterministic given the input, the readable context, their
//! injected ports, and their bound settings. Input messages are consumed by
//! value; enrichment constructs new values. Only designated IO steps call
//! ports. Step errors are values; the runner decides between fail-closed
//! decisions and aborting the run.

// ============================================================================
// SECTION: Imports
// ============================================================================

use smallvec::SmallVec;
use thiserror::Error;

use crate::core::fingerprint::FingerprintError;
use crate::core::message::PipelineMessage;
use crate::core::time::TimeError;
use crate::interfaces::SinkError;
use crate::runtime::context::StepContext;
use crate::state::windows::WindowError;

// ============================================================================
// SECTION: Step Output
// ============================================================================

/// Ordered sequence of messages emitted by one step application.
///
/// The inline capacity of one matches the dominant single-output case.
pub type StepOutput = SmallVec<[PipelineMessage; 1]>;

// ============================================================================
// SECTION: Step Errors
// ============================================================================

/// Errors raised by step applications.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
/// - Business declines are never step errors; they are decision values.
#[derive(Debug, Error)]
pub enum StepError {
    /// The step received a message stage it cannot consume.
    #[error("step {step} cannot consume {kind} messages")]
    UnexpectedMessage {
        /// Step name.
        step: &'static str,
        /// Stage name of the offending message.
        kind: &'static str,
    },
    /// Payload fingerprinting failed.
    #[error(transparent)]
    Fingerprint(#[from] FingerprintError),
    /// Time-key derivation failed.
    #[error(transparent)]
    Time(#[from] TimeError),
    /// A window mutation violated an invariant.
    #[error(transparent)]
    Window(#[from] WindowError),
    /// The decision sink rejected a write.
    #[error(transparent)]
    Sink(#[from] SinkError),
    /// Output serialization failed.
    #[error("failed to serialize output row: {0}")]
    Serialization(String),
    /// An effective-amount computation overflowed.
    #[error("effective amount overflow on line {line_no}")]
    AmountOverflow {
        /// 1-based input line number.
        line_no: u64,
    },
    /// A structural invariant did not hold.
    #[error("invariant violation: {detail}")]
    Invariant {
        /// Description of the violated invariant.
        detail: String,
    },
}

// ============================================================================
// SECTION: Step Trait
// ============================================================================

/// One transformation in the pipeline scenario.
pub trait Step {
    /// Returns the stable step name used in scenarios and traces.
    fn name(&self) -> &'static str;

    /// Applies the step to one message.
    ///
    /// # Errors
    ///
    /// Returns [`StepError`] on invariant violations or port failures; the
    /// runner applies the configured failure policy.
    fn apply(
        &mut self,
        msg: PipelineMessage,
        ctx: &mut StepContext,
    ) -> Result<StepOutput, StepError>;
}
