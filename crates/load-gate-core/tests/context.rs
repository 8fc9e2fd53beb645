// crates/load-gate-core/tests/context.rs
// ============================================================================
// Module: Step Context Tests
// Description: Per-record context metadata and whitelisted diffing.
// Purpose: Ensure trace diffs expose only metrics and tags.
// Dependencies: load-gate-core
// ============================================================================

//! ## Overview
//! Verifies the per-record context: deterministic trace identifiers, metric
//! accumulation, tag overwrites, identity recording, and the whitelist of
//! diffable fields.

#![allow(
    clippy::panic,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only output and panic-based assertions are permitted."
)]

use load_gate_core::ContextDiff;
use load_gate_core::LoadId;
use load_gate_core::RecordIdentity;
use load_gate_core::StepContext;

#[test]
fn trace_ids_are_deterministic_per_line() {
    assert_eq!(StepContext::new(1).trace_id(), "rec-00000001");
    assert_eq!(StepContext::new(42).trace_id(), "rec-00000042");
    assert_eq!(StepContext::new(1).trace_id(), StepContext::new(1).trace_id());
}

#[test]
fn metrics_accumulate_and_diff_by_change() {
    let mut ctx = StepContext::new(1);
    ctx.bump_metric("gate.duplicates");
    let before = ctx.snapshot();

    ctx.bump_metric("gate.duplicates");
    ctx.bump_metric("parse.failures");
    let diff = ContextDiff::between(&before, &ctx.snapshot());

    assert_eq!(diff.metrics.get("gate.duplicates"), Some(&2));
    assert_eq!(diff.metrics.get("parse.failures"), Some(&1));
}

#[test]
fn unchanged_fields_stay_out_of_the_diff() {
    let mut ctx = StepContext::new(1);
    ctx.bump_metric("stable");
    ctx.set_tag("stage", "parse");
    let before = ctx.snapshot();

    let diff = ContextDiff::between(&before, &ctx.snapshot());
    assert!(diff.is_empty());
}

#[test]
fn tags_overwrite_and_appear_in_the_diff() {
    let mut ctx = StepContext::new(1);
    ctx.set_tag("stage", "parse");
    let before = ctx.snapshot();

    ctx.set_tag("stage", "evaluate");
    let diff = ContextDiff::between(&before, &ctx.snapshot());
    assert_eq!(diff.tags.get("stage").map(String::as_str), Some("evaluate"));
}

#[test]
fn error_notes_never_reach_the_diff() {
    let mut ctx = StepContext::new(1);
    let before = ctx.snapshot();

    ctx.note_error("sink unavailable");
    let diff = ContextDiff::between(&before, &ctx.snapshot());
    assert!(diff.is_empty());
    assert_eq!(ctx.errors(), ["sink unavailable".to_string()]);
}

#[test]
fn identity_is_recorded_for_fail_closed_use() {
    let mut ctx = StepContext::new(9);
    assert!(ctx.identity().is_none());

    ctx.set_identity(RecordIdentity {
        line_no: 9,
        load_id: Some(LoadId::parse("15887").expect("id")),
        customer_id: None,
    });
    let identity = ctx.identity().expect("identity");
    assert_eq!(identity.line_no, 9);
    assert_eq!(identity.load_id.as_ref().map(|id| id.as_str()), Some("15887"));
}
