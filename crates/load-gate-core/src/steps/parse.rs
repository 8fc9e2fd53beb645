// crates/load-gate-core/src/steps/parse.rs
// ============================================================================
// Module: Load Gate Parse Step
// Description: Per-line JSON parsing and field normalization.
// Purpose: Turn raw lines into validated attempts or declined decisions.
// Dependencies: crate::core, crate::runtime, serde_json
// ============================================================================

//! ## Overview
//! The parse step is the trust boundary of the pipeline: every field of the
//! input record is untrusted until validated here. A malformed record never
//! aborts the run; it becomes a declined decision carrying exactly one parse
//! reason and whatever identity was recoverable, and still produces an
//! output line. Identifiers are validated before the other fields so later
//! failures keep them.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde_json::Map;
use serde_json::Value;
use smallvec::smallvec;

use crate::core::identifiers::CustomerId;
use crate::core::identifiers::LoadId;
use crate::core::message::Decision;
use crate::core::message::LoadAttempt;
use crate::core::message::PipelineMessage;
use crate::core::message::RawLine;
use crate::core::money::Money;
use crate::core::reason::ReasonCode;
use crate::core::time::UtcTimestamp;
use crate::runtime::context::RecordIdentity;
use crate::runtime::context::StepContext;
use crate::runtime::step::Step;
use crate::runtime::step::StepError;
use crate::runtime::step::StepOutput;

// ============================================================================
// SECTION: Step Name
// ============================================================================

/// Stable step name for scenario plans and traces.
pub const NAME: &str = "parse";

/// Required record fields in schema order.
const REQUIRED_FIELDS: [&str; 4] = ["id", "customer_id", "load_amount", "time"];

// ============================================================================
// SECTION: Parse Failure
// ============================================================================

/// First-failure parse outcome with recovered identity.
struct ParseFailure {
    /// Reason for the failure.
    reason: ReasonCode,
    /// Load identifier, when it validated before the failure.
    id: Option<LoadId>,
    /// Customer identifier, when it validated before the failure.
    customer_id: Option<CustomerId>,
}

impl ParseFailure {
    /// Builds a failure with no recovered identity.
    const fn bare(reason: ReasonCode) -> Self {
        Self {
            reason,
            id: None,
            customer_id: None,
        }
    }
}

// ============================================================================
// SECTION: Parse Step
// ============================================================================

/// Parses raw lines into validated load attempts.
#[derive(Debug, Default)]
pub struct ParseStep;

impl ParseStep {
    /// Creates the parse step.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Step for ParseStep {
    fn name(&self) -> &'static str {
        NAME
    }

    fn apply(
        &mut self,
        msg: PipelineMessage,
        ctx: &mut StepContext,
    ) -> Result<StepOutput, StepError> {
        let PipelineMessage::Raw(raw) = msg else {
            return Err(StepError::UnexpectedMessage {
                step: NAME,
                kind: msg.kind(),
            });
        };
        match parse_attempt(&raw) {
            Ok(attempt) => {
                ctx.set_identity(RecordIdentity {
                    line_no: attempt.line_no,
                    load_id: Some(attempt.id.clone()),
                    customer_id: Some(attempt.customer_id.clone()),
                });
                Ok(smallvec![PipelineMessage::Attempt(attempt)])
            }
            Err(failure) => {
                ctx.set_identity(RecordIdentity {
                    line_no: raw.line_no,
                    load_id: failure.id.clone(),
                    customer_id: failure.customer_id.clone(),
                });
                ctx.bump_metric("parse.failures");
                ctx.set_tag("parse.reason", failure.reason.as_str());
                let decision = Decision::parse_failure(
                    raw.line_no,
                    failure.id,
                    failure.customer_id,
                    failure.reason,
                );
                Ok(smallvec![PipelineMessage::Decided(decision)])
            }
        }
    }
}

// ============================================================================
// SECTION: Record Parsing
// ============================================================================

/// Parses and validates one raw line into a load attempt.
fn parse_attempt(raw: &RawLine) -> Result<LoadAttempt, ParseFailure> {
    let Ok(value) = serde_json::from_str::<Value>(&raw.text) else {
        return Err(ParseFailure::bare(ReasonCode::ParseJson));
    };
    let Value::Object(object) = value else {
        return Err(ParseFailure::bare(ReasonCode::ParseJson));
    };

    for field in REQUIRED_FIELDS {
        if !object.contains_key(field) {
            return Err(ParseFailure {
                reason: ReasonCode::SchemaFieldMissing,
                id: recover_load_id(&object),
                customer_id: recover_customer_id(&object),
            });
        }
    }

    let id = match object.get("id").and_then(scalar_text) {
        Some(text) => match LoadId::parse(&text) {
            Ok(id) => id,
            Err(_) => {
                return Err(ParseFailure {
                    reason: ReasonCode::InvalidId,
                    id: None,
                    customer_id: recover_customer_id(&object),
                });
            }
        },
        None => {
            return Err(ParseFailure {
                reason: ReasonCode::InvalidId,
                id: None,
                customer_id: recover_customer_id(&object),
            });
        }
    };

    let customer_id = match object.get("customer_id").and_then(scalar_text) {
        Some(text) => match CustomerId::parse(&text) {
            Ok(customer_id) => customer_id,
            Err(_) => {
                return Err(ParseFailure {
                    reason: ReasonCode::InvalidCustomerId,
                    id: Some(id),
                    customer_id: None,
                });
            }
        },
        None => {
            return Err(ParseFailure {
                reason: ReasonCode::InvalidCustomerId,
                id: Some(id),
                customer_id: None,
            });
        }
    };

    let ts = match object.get("time").and_then(Value::as_str) {
        Some(text) => match UtcTimestamp::parse_rfc3339(text) {
            Ok(ts) => ts,
            Err(_) => {
                return Err(ParseFailure {
                    reason: ReasonCode::InvalidTime,
                    id: Some(id),
                    customer_id: Some(customer_id),
                });
            }
        },
        None => {
            return Err(ParseFailure {
                reason: ReasonCode::InvalidTime,
                id: Some(id),
                customer_id: Some(customer_id),
            });
        }
    };

    let amount = match object.get("load_amount").and_then(Value::as_str) {
        Some(text) => match Money::parse(text) {
            Ok(amount) => amount,
            Err(_) => {
                return Err(ParseFailure {
                    reason: ReasonCode::InvalidAmountFormat,
                    id: Some(id),
                    customer_id: Some(customer_id),
                });
            }
        },
        None => {
            return Err(ParseFailure {
                reason: ReasonCode::InvalidAmountFormat,
                id: Some(id),
                customer_id: Some(customer_id),
            });
        }
    };

    Ok(LoadAttempt {
        line_no: raw.line_no,
        id,
        customer_id,
        amount,
        ts,
    })
}

// ============================================================================
// SECTION: Field Helpers
// ============================================================================

/// Renders a JSON string or non-negative integer as identifier text.
fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text.clone()),
        Value::Number(number) => number.as_u64().map(|n| n.to_string()),
        _ => None,
    }
}

/// Best-effort load-id recovery for failure decisions.
fn recover_load_id(object: &Map<String, Value>) -> Option<LoadId> {
    object
        .get("id")
        .and_then(scalar_text)
        .and_then(|text| LoadId::parse(&text).ok())
}

/// Best-effort customer-id recovery for failure decisions.
fn recover_customer_id(object: &Map<String, Value>) -> Option<CustomerId> {
    object
        .get("customer_id")
        .and_then(scalar_text)
        .and_then(|text| CustomerId::parse(&text).ok())
}
