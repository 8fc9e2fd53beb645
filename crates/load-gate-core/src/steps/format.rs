// crates/load-gate-core/src/steps/format.rs
// ============================================================================
// Module: Load Gate Format Step
// Description: Projection of decisions onto the external output contract.
// Purpose: Serialize compact fixed-key-order output rows.
// Dependencies: crate::core, crate::runtime, serde_json, smallvec
// ============================================================================

//! ## Overview
//! The output contract exposes only `id`, `customer_id`, and `accepted`, in
//! that key order, serialized compactly with no inter-token whitespace.
//! Reason codes never leave the engine. Identity a parse failure could not
//! recover serializes as the empty string.

// ============================================================================
// SECTION: Imports
// ============================================================================

use smallvec::smallvec;

use crate::core::message::FormattedRow;
use crate::core::message::OutputRow;
use crate::core::message::PipelineMessage;
use crate::runtime::context::StepContext;
use crate::runtime::step::Step;
use crate::runtime::step::StepError;
use crate::runtime::step::StepOutput;

// ============================================================================
// SECTION: Step Name
// ============================================================================

/// Stable step name for scenario plans and traces.
pub const NAME: &str = "format_output";

// ============================================================================
// SECTION: Format Step
// ============================================================================

/// Serializes decisions into output rows.
#[derive(Debug, Default)]
pub struct FormatStep;

impl FormatStep {
    /// Creates the format step.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Step for FormatStep {
    fn name(&self) -> &'static str {
        NAME
    }

    fn apply(
        &mut self,
        msg: PipelineMessage,
        _ctx: &mut StepContext,
    ) -> Result<StepOutput, StepError> {
        match msg {
            PipelineMessage::Decided(decision) => {
                let row = OutputRow::from_decision(&decision);
                let json = serde_json::to_string(&row)
                    .map_err(|err| StepError::Serialization(err.to_string()))?;
                Ok(smallvec![PipelineMessage::Formatted(FormattedRow {
                    line_no: decision.line_no,
                    json,
                })])
            }
            other => Err(StepError::UnexpectedMessage {
                step: NAME,
                kind: other.kind(),
            }),
        }
    }
}
