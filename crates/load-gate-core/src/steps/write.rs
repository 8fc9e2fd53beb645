// crates/load-gate-core/src/steps/write.rs
// ============================================================================
// Module: Load Gate Write Step
// Description: Output delivery through the decision sink port.
// Purpose: Append one formatted row per record in input order.
// Dependencies: crate::core, crate::interfaces, crate::runtime, smallvec
// ============================================================================

//! ## Overview
//! The write step is the only filesystem sink in the core path. It taps each
//! formatted row into the injected decision sink and passes the message
//! through, so the runner observes a completed record rather than a drop.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::cell::RefCell;
use std::rc::Rc;

use smallvec::smallvec;

use crate::core::message::PipelineMessage;
use crate::interfaces::DecisionSink;
use crate::runtime::context::StepContext;
use crate::runtime::step::Step;
use crate::runtime::step::StepError;
use crate::runtime::step::StepOutput;

// ============================================================================
// SECTION: Step Name
// ============================================================================

/// Stable step name for scenario plans and traces.
pub const NAME: &str = "write_output";

// ============================================================================
// SECTION: Write Step
// ============================================================================

/// Delivers formatted rows to the decision sink.
pub struct WriteStep {
    /// Injected decision sink.
    sink: Rc<RefCell<dyn DecisionSink>>,
}

impl WriteStep {
    /// Creates the step with its sink handle.
    #[must_use]
    pub const fn new(sink: Rc<RefCell<dyn DecisionSink>>) -> Self {
        Self {
            sink,
        }
    }
}

impl Step for WriteStep {
    fn name(&self) -> &'static str {
        NAME
    }

    fn apply(
        &mut self,
        msg: PipelineMessage,
        ctx: &mut StepContext,
    ) -> Result<StepOutput, StepError> {
        match msg {
            PipelineMessage::Formatted(row) => {
                self.sink.borrow_mut().write_line(&row)?;
                ctx.bump_metric("write.rows");
                Ok(smallvec![PipelineMessage::Formatted(row)])
            }
            other => Err(StepError::UnexpectedMessage {
                step: NAME,
                kind: other.kind(),
            }),
        }
    }
}
