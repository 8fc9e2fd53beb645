// crates/load-gate-core/src/steps/evaluate.rs
// ============================================================================
// Module: Load Gate Policy Evaluator Step
// Description: Ordered first-failure rule evaluation over window snapshots.
// Purpose: Produce exactly one decision per record from pre-mutation state.
// Dependencies: crate::core, crate::runtime, crate::state::windows, smallvec
// ============================================================================

//! ## Overview
//! The evaluator reads window snapshots and never mutates them; the update
//! step applies mutations strictly afterwards. Rules run in a fixed order
//! and stop at the first decline: idempotency precedence, daily attempt
//! limit, prime gate (amount cap, then the global daily budget), daily
//! amount limit, weekly amount limit. Limit comparisons are strict; values
//! equal to a limit are accepted. Decided records pass through untouched.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::cell::RefCell;
use std::rc::Rc;

use smallvec::smallvec;

use crate::core::message::Decision;
use crate::core::message::IdempotencyStatus;
use crate::core::message::PipelineMessage;
use crate::core::message::ScoredAttempt;
use crate::core::reason::ReasonCode;
use crate::runtime::context::StepContext;
use crate::runtime::settings::PrimeGateSettings;
use crate::runtime::settings::VelocityLimits;
use crate::runtime::step::Step;
use crate::runtime::step::StepError;
use crate::runtime::step::StepOutput;
use crate::state::windows::WindowSnapshot;
use crate::state::windows::WindowStore;

// ============================================================================
// SECTION: Step Name
// ============================================================================

/// Stable step name for scenario plans and traces.
pub const NAME: &str = "evaluate_policies";

// ============================================================================
// SECTION: Policy Evaluator Step
// ============================================================================

/// Evaluates scored attempts against the configured rule set.
pub struct PolicyEvaluatorStep {
    /// Velocity limits.
    limits: VelocityLimits,
    /// Prime gate settings.
    prime_gate: PrimeGateSettings,
    /// Window store, read-only from this step.
    windows: Rc<RefCell<WindowStore>>,
}

impl PolicyEvaluatorStep {
    /// Creates the evaluator with its settings and window handle.
    #[must_use]
    pub const fn new(
        limits: VelocityLimits,
        prime_gate: PrimeGateSettings,
        windows: Rc<RefCell<WindowStore>>,
    ) -> Self {
        Self {
            limits,
            prime_gate,
            windows,
        }
    }

    /// Runs the ordered rules and returns the first decline, if any.
    fn first_decline(
        &self,
        scored: &ScoredAttempt,
        snapshot: &WindowSnapshot,
    ) -> Option<ReasonCode> {
        match scored.classified.status {
            IdempotencyStatus::DuplicateReplay { .. } => {
                return Some(ReasonCode::IdDuplicateReplay);
            }
            IdempotencyStatus::DuplicateConflict { .. } => {
                return Some(ReasonCode::IdDuplicateConflict);
            }
            IdempotencyStatus::Canonical => {}
        }

        let over_attempts = snapshot
            .day_attempts
            .checked_add(1)
            .is_none_or(|attempt_no| attempt_no > self.limits.daily_attempts);
        if over_attempts {
            return Some(ReasonCode::DailyAttemptLimit);
        }

        let effective = scored.features.effective_amount;
        if self.prime_gate.enabled && scored.features.is_prime_id {
            if effective > self.prime_gate.amount_cap {
                return Some(ReasonCode::PrimeAmountCap);
            }
            if snapshot.prime_approvals >= self.prime_gate.global_per_day {
                return Some(ReasonCode::PrimeDailyGlobalLimit);
            }
        }

        let over_daily = snapshot
            .day_accepted
            .checked_add(effective)
            .is_none_or(|sum| sum > self.limits.daily_amount);
        if over_daily {
            return Some(ReasonCode::DailyAmountLimit);
        }

        let over_weekly = snapshot
            .week_accepted
            .checked_add(effective)
            .is_none_or(|sum| sum > self.limits.weekly_amount);
        if over_weekly {
            return Some(ReasonCode::WeeklyAmountLimit);
        }

        None
    }

    /// Builds the decision for one scored attempt.
    fn evaluate(&self, scored: &ScoredAttempt) -> Decision {
        let attempt = &scored.classified.keyed.attempt;
        let keys = scored.classified.keyed.keys;
        let snapshot = self
            .windows
            .borrow()
            .snapshot(&attempt.customer_id, &keys);
        let decline = self.first_decline(scored, &snapshot);
        Decision {
            line_no: attempt.line_no,
            id: Some(attempt.id.clone()),
            customer_id: Some(attempt.customer_id.clone()),
            accepted: decline.is_none(),
            reasons: decline.into_iter().collect(),
            keys: Some(keys),
            effective_amount: Some(scored.features.effective_amount),
            status: Some(scored.classified.status),
            is_prime_id: scored.features.is_prime_id,
        }
    }
}

impl Step for PolicyEvaluatorStep {
    fn name(&self) -> &'static str {
        NAME
    }

    fn apply(
        &mut self,
        msg: PipelineMessage,
        ctx: &mut StepContext,
    ) -> Result<StepOutput, StepError> {
        match msg {
            PipelineMessage::Scored(scored) => {
                let decision = self.evaluate(&scored);
                if decision.accepted {
                    ctx.bump_metric("evaluate.accepted");
                } else {
                    ctx.bump_metric("evaluate.declined");
                }
                Ok(smallvec![PipelineMessage::Decided(decision)])
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
