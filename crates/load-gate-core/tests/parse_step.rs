// crates/load-gate-core/tests/parse_step.rs
// ============================================================================
// Module: Parse Step Tests
// Description: Per-line validation, reason taxonomy, and identity recovery.
// Purpose: Ensure every malformed record yields one declined decision.
// Dependencies: load-gate-core
// ============================================================================

//! ## Overview
//! Exercises the parse step directly: field normalization, the first-failure
//! reason order, best-effort identity recovery, and context identity
//! propagation for the fail-closed policy.

#![allow(
    clippy::panic,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only output and panic-based assertions are permitted."
)]

use load_gate_core::Decision;
use load_gate_core::LoadAttempt;
use load_gate_core::PipelineMessage;
use load_gate_core::RawLine;
use load_gate_core::ReasonCode;
use load_gate_core::Step;
use load_gate_core::StepContext;
use load_gate_core::steps::ParseStep;

/// Applies the parse step to one line of text.
fn parse(text: &str) -> (PipelineMessage, StepContext) {
    let mut step = ParseStep::new();
    let mut ctx = StepContext::new(7);
    let raw = RawLine {
        line_no: 7,
        text: text.to_string(),
    };
    let mut outputs = step
        .apply(PipelineMessage::Raw(raw), &mut ctx)
        .expect("parse step never errors on raw input");
    assert_eq!(outputs.len(), 1, "parse emits exactly one message");
    (outputs.remove(0), ctx)
}

/// Extracts the attempt from a successful parse.
fn expect_attempt(msg: PipelineMessage) -> LoadAttempt {
    match msg {
        PipelineMessage::Attempt(attempt) => attempt,
        other => panic!("expected attempt, got {other:?}"),
    }
}

/// Extracts the declined decision from a failed parse.
fn expect_decline(msg: PipelineMessage) -> Decision {
    match msg {
        PipelineMessage::Decided(decision) => {
            assert!(!decision.accepted);
            decision
        }
        other => panic!("expected decision, got {other:?}"),
    }
}

#[test]
fn parses_a_fully_valid_record() {
    let (msg, ctx) = parse(
        r#"{"id":"15887","customer_id":"528","load_amount":"$3318.47","time":"2000-01-01T00:00:00Z"}"#,
    );
    let attempt = expect_attempt(msg);
    assert_eq!(attempt.line_no, 7);
    assert_eq!(attempt.id.as_str(), "15887");
    assert_eq!(attempt.customer_id.as_str(), "528");
    assert_eq!(attempt.amount.minor_units(), 331_847);

    let identity = ctx.identity().expect("identity recorded");
    assert_eq!(identity.load_id.as_ref().map(|id| id.as_str()), Some("15887"));
    assert_eq!(identity.customer_id.as_ref().map(|id| id.as_str()), Some("528"));
}

#[test]
fn accepts_numeric_identifier_fields() {
    let (msg, _) = parse(
        r#"{"id":15887,"customer_id":528,"load_amount":"USD1.00","time":"2000-01-01T00:00:00Z"}"#,
    );
    let attempt = expect_attempt(msg);
    assert_eq!(attempt.id.as_str(), "15887");
    assert_eq!(attempt.customer_id.as_str(), "528");
}

#[test]
fn malformed_json_declines_with_parse_reason() {
    let (msg, _) = parse("{not json");
    let decision = expect_decline(msg);
    assert_eq!(decision.reasons, vec![ReasonCode::ParseJson]);
    assert_eq!(decision.id, None);
    assert_eq!(decision.customer_id, None);
    assert_eq!(decision.line_no, 7);
}

#[test]
fn non_object_json_declines_with_parse_reason() {
    let (msg, _) = parse("[1, 2, 3]");
    assert_eq!(expect_decline(msg).reasons, vec![ReasonCode::ParseJson]);
}

#[test]
fn missing_fields_decline_but_keep_recoverable_identity() {
    let (msg, _) = parse(r#"{"id":"15887","customer_id":"528","load_amount":"$1.00"}"#);
    let decision = expect_decline(msg);
    assert_eq!(decision.reasons, vec![ReasonCode::SchemaFieldMissing]);
    assert_eq!(decision.id.as_ref().map(|id| id.as_str()), Some("15887"));
    assert_eq!(decision.customer_id.as_ref().map(|id| id.as_str()), Some("528"));
}

#[test]
fn invalid_id_declines_and_keeps_the_customer() {
    let (msg, _) = parse(
        r#"{"id":"abc","customer_id":"528","load_amount":"$1.00","time":"2000-01-01T00:00:00Z"}"#,
    );
    let decision = expect_decline(msg);
    assert_eq!(decision.reasons, vec![ReasonCode::InvalidId]);
    assert_eq!(decision.id, None);
    assert_eq!(decision.customer_id.as_ref().map(|id| id.as_str()), Some("528"));
}

#[test]
fn invalid_customer_declines_and_keeps_the_id() {
    let (msg, _) = parse(
        r#"{"id":"15887","customer_id":true,"load_amount":"$1.00","time":"2000-01-01T00:00:00Z"}"#,
    );
    let decision = expect_decline(msg);
    assert_eq!(decision.reasons, vec![ReasonCode::InvalidCustomerId]);
    assert_eq!(decision.id.as_ref().map(|id| id.as_str()), Some("15887"));
    assert_eq!(decision.customer_id, None);
}

#[test]
fn timestamp_without_offset_declines_with_invalid_time() {
    let (msg, ctx) = parse(
        r#"{"id":"15887","customer_id":"528","load_amount":"$1.00","time":"2000-01-01T00:00:00"}"#,
    );
    let decision = expect_decline(msg);
    assert_eq!(decision.reasons, vec![ReasonCode::InvalidTime]);
    assert_eq!(decision.id.as_ref().map(|id| id.as_str()), Some("15887"));

    // Identity reaches the context even on failure, for fail-closed use.
    let identity = ctx.identity().expect("identity recorded");
    assert_eq!(identity.load_id.as_ref().map(|id| id.as_str()), Some("15887"));
}

#[test]
fn bad_amount_declines_with_invalid_amount_format() {
    for amount in ["one dollar", "$1.234", "-$5.00", "1,00"] {
        let line = format!(
            r#"{{"id":"15887","customer_id":"528","load_amount":"{amount}","time":"2000-01-01T00:00:00Z"}}"#
        );
        let (msg, _) = parse(&line);
        let decision = expect_decline(msg);
        assert_eq!(
            decision.reasons,
            vec![ReasonCode::InvalidAmountFormat],
            "amount {amount:?}"
        );
    }
}

#[test]
fn numeric_amount_values_are_rejected() {
    let (msg, _) = parse(
        r#"{"id":"15887","customer_id":"528","load_amount":100,"time":"2000-01-01T00:00:00Z"}"#,
    );
    assert_eq!(expect_decline(msg).reasons, vec![ReasonCode::InvalidAmountFormat]);
}

#[test]
fn identifier_fields_are_trimmed() {
    let (msg, _) = parse(
        r#"{"id":" 15887 ","customer_id":" 528","load_amount":"$1.00","time":"2000-01-01T00:00:00Z"}"#,
    );
    let attempt = expect_attempt(msg);
    assert_eq!(attempt.id.as_str(), "15887");
    assert_eq!(attempt.customer_id.as_str(), "528");
}
