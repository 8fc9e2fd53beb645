// crates/load-gate-core/src/steps/time_keys.rs
// ============================================================================
// Module: Load Gate Time-Keys Step
// Description: Civil-date window key derivation for parsed attempts.
// Purpose: Attach daily and weekly bucket keys under the configured week start.
// Dependencies: crate::core, crate::runtime, smallvec, time
// ============================================================================

//! ## Overview
//! Pure enrichment: the day key is the civil UTC date of the attempt and the
//! week key is the most recent week-start date on or before it. Exactly one
//! output per input; decided records pass through untouched.

// ============================================================================
// SECTION: Imports
// ============================================================================

use smallvec::smallvec;
use time::Weekday;

use crate::core::message::KeyedAttempt;
use crate::core::message::PipelineMessage;
use crate::core::time::TimeKeys;
use crate::runtime::context::StepContext;
use crate::runtime::step::Step;
use crate::runtime::step::StepError;
use crate::runtime::step::StepOutput;

// ============================================================================
// SECTION: Step Name
// ============================================================================

/// Stable step name for scenario plans and traces.
pub const NAME: &str = "time_keys";

// ============================================================================
// SECTION: Time-Keys Step
// ============================================================================

/// Derives daily and weekly window keys for attempts.
#[derive(Debug)]
pub struct TimeKeysStep {
    /// Weekday on which weekly windows begin.
    week_start: Weekday,
}

impl TimeKeysStep {
    /// Creates the step with the configured week start.
    #[must_use]
    pub const fn new(week_start: Weekday) -> Self {
        Self {
            week_start,
        }
    }
}

impl Step for TimeKeysStep {
    fn name(&self) -> &'static str {
        NAME
    }

    fn apply(
        &mut self,
        msg: PipelineMessage,
        _ctx: &mut StepContext,
    ) -> Result<StepOutput, StepError> {
        match msg {
            PipelineMessage::Attempt(attempt) => {
                let keys = TimeKeys::for_instant(&attempt.ts, self.week_start)?;
                Ok(smallvec![PipelineMessage::Keyed(KeyedAttempt {
                    attempt,
                    keys,
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
