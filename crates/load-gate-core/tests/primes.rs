// crates/load-gate-core/tests/primes.rs
// ============================================================================
// Module: Prime Oracle Tests
// Description: Deterministic primality classification of load identifiers.
// Purpose: Ensure verdicts are correct, memoized, and stable.
// Dependencies: load-gate-core
// ============================================================================

//! ## Overview
//! Verifies trial-division verdicts across small and large values, the
//! non-prime classification of identifiers wider than 64 bits, and verdict
//! stability across repeated queries.

#![allow(
    clippy::panic,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only output and panic-based assertions are permitted."
)]

use load_gate_core::LoadId;
use load_gate_core::PrimeOracle;

/// Classifies a digit string with a fresh oracle.
fn classify(oracle: &mut PrimeOracle, digits: &str) -> bool {
    let id = LoadId::parse(digits).expect("id");
    oracle.is_prime_id(&id)
}

#[test]
fn classifies_small_primes() {
    let mut oracle = PrimeOracle::new();
    for digits in ["2", "3", "5", "7", "11", "13", "7919"] {
        assert!(classify(&mut oracle, digits), "{digits} is prime");
    }
}

#[test]
fn classifies_small_composites_and_units() {
    let mut oracle = PrimeOracle::new();
    for digits in ["0", "1", "4", "6", "9", "15", "7917", "15337"] {
        assert!(!classify(&mut oracle, digits), "{digits} is not prime");
    }
}

#[test]
fn classifies_large_known_values() {
    let mut oracle = PrimeOracle::new();
    // 2^31 - 1 is a Mersenne prime; its successor is even.
    assert!(classify(&mut oracle, "2147483647"));
    assert!(!classify(&mut oracle, "2147483648"));
}

#[test]
fn identifiers_wider_than_u64_are_not_prime() {
    let mut oracle = PrimeOracle::new();
    // One past u64::MAX; outside the oracle's domain regardless of value.
    assert!(!classify(&mut oracle, "18446744073709551616"));
}

#[test]
fn leading_zeros_classify_by_numeric_value() {
    let mut oracle = PrimeOracle::new();
    assert!(classify(&mut oracle, "007"));
    assert!(!classify(&mut oracle, "008"));
}

#[test]
fn verdicts_are_memoized_and_stable() {
    let mut oracle = PrimeOracle::new();
    assert!(classify(&mut oracle, "7919"));
    assert_eq!(oracle.cached_verdicts(), 1);
    assert!(classify(&mut oracle, "7919"));
    assert_eq!(oracle.cached_verdicts(), 1);
    assert!(classify(&mut oracle, "007"));
    assert_eq!(oracle.cached_verdicts(), 2);
}
