// crates/load-gate-core/src/steps/update.rs
// ============================================================================
// Module: Load Gate Window Update Step
// Description: Post-decision window mutations for canonical records.
// Purpose: Apply attempt counts and accepted sums strictly after evaluation.
// Dependencies: crate::core, crate::runtime, crate::state::windows, smallvec
// ============================================================================

//! ## Overview
//! The update step is the only writer of the window store. Mutations apply
//! atomically per decision, strictly after the evaluator observed its
//! snapshots: canonical records count one attempt; accepted canonical
//! records add their effective amount to the daily and weekly sums; accepted
//! canonical prime-id records additionally bump the global prime counter.
//! Non-canonical decisions (duplicates, parse failures, fail-closed
//! declines) mutate nothing.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::cell::RefCell;
use std::rc::Rc;

use smallvec::smallvec;

use crate::core::message::Decision;
use crate::core::message::PipelineMessage;
use crate::runtime::context::StepContext;
use crate::runtime::step::Step;
use crate::runtime::step::StepError;
use crate::runtime::step::StepOutput;
use crate::state::windows::WindowStore;

// ============================================================================
// SECTION: Step Name
// ============================================================================

/// Stable step name for scenario plans and traces.
pub const NAME: &str = "update_windows";

// ============================================================================
// SECTION: Window Update Step
// ============================================================================

/// Applies window mutations for canonical decisions.
///
/// # Invariants
/// - The only step holding a mutable borrow of the window store.
pub struct WindowUpdateStep {
    /// Whether the prime gate counter participates.
    prime_enabled: bool,
    /// Window store, written only by this step.
    windows: Rc<RefCell<WindowStore>>,
}

impl WindowUpdateStep {
    /// Creates the step with its window handle.
    #[must_use]
    pub const fn new(prime_enabled: bool, windows: Rc<RefCell<WindowStore>>) -> Self {
        Self {
            prime_enabled,
            windows,
        }
    }

    /// Applies the mutations implied by one decision.
    fn apply_mutations(&self, decision: &Decision) -> Result<(), StepError> {
        if !decision.is_canonical() {
            return Ok(());
        }
        let (Some(customer_id), Some(keys)) = (&decision.customer_id, &decision.keys) else {
            return Err(StepError::Invariant {
                detail: format!(
                    "canonical decision on line {} lacks identity or window keys",
                    decision.line_no
                ),
            });
        };

        let mut windows = self.windows.borrow_mut();
        windows.record_attempt(customer_id, keys.day_key)?;
        if !decision.accepted {
            return Ok(());
        }

        let Some(effective_amount) = decision.effective_amount else {
            return Err(StepError::Invariant {
                detail: format!(
                    "accepted decision on line {} lacks an effective amount",
                    decision.line_no
                ),
            });
        };
        windows.record_acceptance(customer_id, keys, effective_amount)?;
        if self.prime_enabled && decision.is_prime_id {
            windows.record_prime_approval(keys.day_key)?;
        }
        Ok(())
    }
}

impl Step for WindowUpdateStep {
    fn name(&self) -> &'static str {
        NAME
    }

    fn apply(
        &mut self,
        msg: PipelineMessage,
        ctx: &mut StepContext,
    ) -> Result<StepOutput, StepError> {
        match msg {
            PipelineMessage::Decided(decision) => {
                self.apply_mutations(&decision)?;
                if decision.is_canonical() {
                    ctx.bump_metric("windows.mutated");
                }
                Ok(smallvec![PipelineMessage::Decided(decision)])
            }
            other => Err(StepError::UnexpectedMessage {
                step: NAME,
                kind: other.kind(),
            }),
        }
    }
}
