// crates/load-gate-core/tests/idempotency.rs
// ============================================================================
// Module: Idempotency Tests
// Description: Fingerprint stability and write-once registry classification.
// Purpose: Ensure canonical/replay/conflict semantics are deterministic.
// Dependencies: load-gate-core
// ============================================================================

//! ## Overview
//! Verifies that fingerprints cover (customer, instant, amount) and exclude
//! the load identifier, that lexical timestamp variants hash identically,
//! and that the registry is write-once with stable canonical lines.

#![allow(
    clippy::panic,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only output and panic-based assertions are permitted."
)]

use load_gate_core::CustomerId;
use load_gate_core::Fingerprint;
use load_gate_core::IdempotencyRegistry;
use load_gate_core::IdempotencyStatus;
use load_gate_core::LoadId;
use load_gate_core::Money;
use load_gate_core::UtcTimestamp;

/// Builds a fingerprint for the given payload text fields.
fn fingerprint(customer: &str, ts: &str, minor_units: u64) -> Fingerprint {
    let customer_id = CustomerId::parse(customer).expect("customer id");
    let ts = UtcTimestamp::parse_rfc3339(ts).expect("timestamp");
    Fingerprint::compute(&customer_id, &ts, Money::from_minor_units(minor_units))
        .expect("fingerprint")
}

#[test]
fn identical_payloads_share_a_fingerprint() {
    let first = fingerprint("528", "2000-01-01T12:00:00Z", 10_000);
    let second = fingerprint("528", "2000-01-01T12:00:00Z", 10_000);
    assert_eq!(first, second);
}

#[test]
fn fingerprint_covers_every_payload_field() {
    let base = fingerprint("528", "2000-01-01T12:00:00Z", 10_000);
    assert_ne!(base, fingerprint("529", "2000-01-01T12:00:00Z", 10_000));
    assert_ne!(base, fingerprint("528", "2000-01-01T12:00:01Z", 10_000));
    assert_ne!(base, fingerprint("528", "2000-01-01T12:00:00Z", 10_001));
}

#[test]
fn fingerprint_is_stable_across_timestamp_lexical_variants() {
    let zulu = fingerprint("528", "2000-01-01T12:00:00Z", 10_000);
    let offset = fingerprint("528", "2000-01-01T07:00:00-05:00", 10_000);
    let fraction = fingerprint("528", "2000-01-01T12:00:00.000Z", 10_000);
    assert_eq!(zulu, offset);
    assert_eq!(zulu, fraction);
}

#[test]
fn first_occurrence_classifies_canonical() {
    let mut registry = IdempotencyRegistry::new();
    let id = LoadId::parse("15337").expect("id");
    let payload = fingerprint("528", "2000-01-01T12:00:00Z", 10_000);

    let status = registry.classify(&id, &payload, 1);
    assert_eq!(status, IdempotencyStatus::Canonical);
    assert_eq!(registry.len(), 1);
}

#[test]
fn identical_payload_classifies_replay_with_canonical_line() {
    let mut registry = IdempotencyRegistry::new();
    let id = LoadId::parse("15337").expect("id");
    let payload = fingerprint("528", "2000-01-01T12:00:00Z", 10_000);

    assert_eq!(registry.classify(&id, &payload, 1), IdempotencyStatus::Canonical);
    let status = registry.classify(&id, &payload, 3);
    assert_eq!(
        status,
        IdempotencyStatus::DuplicateReplay {
            canonical_line: 1,
        }
    );
}

#[test]
fn different_payload_classifies_conflict_with_canonical_line() {
    let mut registry = IdempotencyRegistry::new();
    let id = LoadId::parse("15337").expect("id");
    let original = fingerprint("528", "2000-01-01T12:00:00Z", 10_000);
    let changed = fingerprint("528", "2000-01-01T12:00:00Z", 50_000);

    assert_eq!(registry.classify(&id, &original, 1), IdempotencyStatus::Canonical);
    let status = registry.classify(&id, &changed, 5);
    assert_eq!(
        status,
        IdempotencyStatus::DuplicateConflict {
            canonical_line: 1,
        }
    );
}

#[test]
fn registry_entries_are_write_once() {
    let mut registry = IdempotencyRegistry::new();
    let id = LoadId::parse("15337").expect("id");
    let original = fingerprint("528", "2000-01-01T12:00:00Z", 10_000);
    let changed = fingerprint("528", "2000-01-01T12:00:00Z", 50_000);

    assert_eq!(registry.classify(&id, &original, 1), IdempotencyStatus::Canonical);
    let _ = registry.classify(&id, &changed, 5);
    let _ = registry.classify(&id, &changed, 6);

    let entry = registry.get(&id).expect("entry");
    assert_eq!(entry.canonical_line_no, 1);
    assert_eq!(entry.fingerprint, original);
    assert_eq!(registry.len(), 1);
}

#[test]
fn distinct_ids_are_independent() {
    let mut registry = IdempotencyRegistry::new();
    let payload = fingerprint("528", "2000-01-01T12:00:00Z", 10_000);
    let first = LoadId::parse("1").expect("id");
    let second = LoadId::parse("2").expect("id");

    assert_eq!(registry.classify(&first, &payload, 1), IdempotencyStatus::Canonical);
    assert_eq!(registry.classify(&second, &payload, 2), IdempotencyStatus::Canonical);
    assert_eq!(registry.len(), 2);
}
