// crates/load-gate-core/src/steps/idempotency.rs
// ============================================================================
// Module: Load Gate Idempotency Gate Step
// Description: Canonical/replay/conflict classification of load attempts.
// Purpose: Guarantee only first occurrences affect downstream state.
// Dependencies: crate::core, crate::runtime, crate::state::registry, smallvec
// ============================================================================

//! ## Overview
//! The gate computes the payload fingerprint (customer, canonical UTC
//! instant, amount minor units; the load id is excluded) and classifies the
//! record against the write-once registry it owns exclusively. The gate
//! never rejects or drops; classification flows to the evaluator, which
//! decides what duplicates mean. Decided records pass through untouched.

// ============================================================================
// SECTION: Imports
// ============================================================================

use smallvec::smallvec;

use crate::core::fingerprint::Fingerprint;
use crate::core::message::ClassifiedAttempt;
use crate::core::message::PipelineMessage;
use crate::runtime::context::StepContext;
use crate::runtime::step::Step;
use crate::runtime::step::StepError;
use crate::runtime::step::StepOutput;
use crate::state::registry::IdempotencyRegistry;

// ============================================================================
// SECTION: Step Name
// ============================================================================

/// Stable step name for scenario plans and traces.
pub const NAME: &str = "idempotency_gate";

// ============================================================================
// SECTION: Idempotency Gate Step
// ============================================================================

/// Classifies attempts against the write-once identifier registry.
///
/// # Invariants
/// - This step is the sole owner of the registry; no other step observes or
///   mutates it.
#[derive(Debug, Default)]
pub struct IdempotencyGateStep {
    /// Write-once identifier registry.
    registry: IdempotencyRegistry,
}

impl IdempotencyGateStep {
    /// Creates the gate with an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the registry for inspection.
    #[must_use]
    pub const fn registry(&self) -> &IdempotencyRegistry {
        &self.registry
    }
}

impl Step for IdempotencyGateStep {
    fn name(&self) -> &'static str {
        NAME
    }

    fn apply(
        &mut self,
        msg: PipelineMessage,
        ctx: &mut StepContext,
    ) -> Result<StepOutput, StepError> {
        match msg {
            PipelineMessage::Keyed(keyed) => {
                let attempt = &keyed.attempt;
                let fingerprint =
                    Fingerprint::compute(&attempt.customer_id, &attempt.ts, attempt.amount)?;
                let status = self
                    .registry
                    .classify(&attempt.id, &fingerprint, attempt.line_no);
                if status.is_canonical() {
                    ctx.bump_metric("gate.canonical");
                } else {
                    ctx.bump_metric("gate.duplicates");
                }
                Ok(smallvec![PipelineMessage::Classified(ClassifiedAttempt {
                    keyed,
                    status,
                })])
            }
            PipelineMessage::Decided(decision) => {
                Ok(smallvec![PipelineMessage::Decided(decision)])
            }
            other => Err(StepError::UnexpectedMessage {
                step: NAME,
                kind: other.kind(),
            }),
        }
    }
}
