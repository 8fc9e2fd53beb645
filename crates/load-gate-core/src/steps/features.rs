// crates/load-gate-core/src/steps/features.rs
// ============================================================================
// Module: Load Gate Feature Step
// Description: Calendar multiplier and prime-identifier enrichment.
// Purpose: Derive the effective amount and prime flag used by the evaluator.
// Dependencies: crate::core, crate::runtime, crate::state::primes, smallvec
// ============================================================================

//! ## Overview
//! Feature derivation is pure with respect to the windows: the risk factor
//! comes from the calendar multiplier settings and the attempt's UTC
//! weekday, the effective amount is the exact integer product, and the prime
//! flag consults the memoizing oracle only when the feature is enabled.
//! Decided records pass through untouched.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::cell::RefCell;
use std::rc::Rc;

use smallvec::smallvec;

use crate::core::message::Features;
use crate::core::message::PipelineMessage;
use crate::core::message::ScoredAttempt;
use crate::runtime::context::StepContext;
use crate::runtime::settings::CalendarMultiplier;
use crate::runtime::step::Step;
use crate::runtime::step::StepError;
use crate::runtime::step::StepOutput;
use crate::state::primes::PrimeOracle;

// ============================================================================
// SECTION: Step Name
// ============================================================================

/// Stable step name for scenario plans and traces.
pub const NAME: &str = "features";

// ============================================================================
// SECTION: Feature Step
// ============================================================================

/// Enriches classified attempts with derived features.
pub struct FeatureStep {
    /// Calendar multiplier settings.
    multiplier: CalendarMultiplier,
    /// Whether prime classification runs at all.
    prime_enabled: bool,
    /// Shared memoizing prime oracle.
    primes: Rc<RefCell<PrimeOracle>>,
}

impl FeatureStep {
    /// Creates the step with its settings and oracle handle.
    #[must_use]
    pub const fn new(
        multiplier: CalendarMultiplier,
        prime_enabled: bool,
        primes: Rc<RefCell<PrimeOracle>>,
    ) -> Self {
        Self {
            multiplier,
            prime_enabled,
            primes,
        }
    }
}

impl Step for FeatureStep {
    fn name(&self) -> &'static str {
        NAME
    }

    fn apply(
        &mut self,
        msg: PipelineMessage,
        ctx: &mut StepContext,
    ) -> Result<StepOutput, StepError> {
        match msg {
            PipelineMessage::Classified(classified) => {
                let attempt = &classified.keyed.attempt;
                let risk_factor = if self.multiplier.enabled
                    && attempt.ts.weekday() == self.multiplier.weekday
                {
                    self.multiplier.factor
                } else {
                    1
                };
                let effective_amount = attempt.amount.checked_mul(risk_factor).ok_or(
                    StepError::AmountOverflow {
                        line_no: attempt.line_no,
                    },
                )?;
                let is_prime_id =
                    self.prime_enabled && self.primes.borrow_mut().is_prime_id(&attempt.id);
                if risk_factor > 1 {
                    ctx.bump_metric("features.amplified");
                }
                Ok(smallvec![PipelineMessage::Scored(ScoredAttempt {
                    classified,
                    features: Features {
                        risk_factor,
                        effective_amount,
                        is_prime_id,
                    },
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
