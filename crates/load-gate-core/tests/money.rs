// crates/load-gate-core/tests/money.rs
// ============================================================================
// Module: Money Tests
// Description: Strict parsing and exact arithmetic for monetary amounts.
// Purpose: Ensure currency prefixes, scale rules, and overflow handling hold.
// Dependencies: load-gate-core
// ============================================================================

//! ## Overview
//! Verifies the money parser against every documented prefix combination,
//! fraction rule, and rejection case, plus checked arithmetic behavior.

#![allow(
    clippy::panic,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only output and panic-based assertions are permitted."
)]

use load_gate_core::Money;
use load_gate_core::MoneyError;

#[test]
fn parses_plain_decimal() {
    let amount = Money::parse("1234.00").expect("parse");
    assert_eq!(amount.minor_units(), 123_400);
}

#[test]
fn parses_every_documented_prefix_combination() {
    for text in ["$1234.00", "USD1234.00", "USD$1234.00", "$USD1234.00"] {
        let amount = Money::parse(text).expect("parse");
        assert_eq!(amount.minor_units(), 123_400, "input {text:?}");
    }
}

#[test]
fn parsing_ignores_whitespace() {
    let amount = Money::parse("  USD  1 234.56 ").expect("parse");
    assert_eq!(amount.minor_units(), 123_456);
}

#[test]
fn integral_amount_scales_to_minor_units() {
    let amount = Money::parse("42").expect("parse");
    assert_eq!(amount.minor_units(), 4200);
}

#[test]
fn single_fraction_digit_means_tens_of_cents() {
    let amount = Money::parse("1.5").expect("parse");
    assert_eq!(amount.minor_units(), 150);
}

#[test]
fn rejects_three_fraction_digits() {
    let err = Money::parse("1.234").unwrap_err();
    assert_eq!(err, MoneyError::InvalidFraction);
}

#[test]
fn rejects_empty_fraction() {
    let err = Money::parse("12.").unwrap_err();
    assert_eq!(err, MoneyError::InvalidFraction);
}

#[test]
fn rejects_negative_amounts() {
    assert_eq!(Money::parse("-1.00").unwrap_err(), MoneyError::Negative);
    assert_eq!(Money::parse("$-1.00").unwrap_err(), MoneyError::Negative);
}

#[test]
fn rejects_empty_and_prefix_only_inputs() {
    assert_eq!(Money::parse("").unwrap_err(), MoneyError::Empty);
    assert_eq!(Money::parse("USD$").unwrap_err(), MoneyError::Empty);
}

#[test]
fn rejects_non_digit_characters() {
    let err = Money::parse("12a.00").unwrap_err();
    assert!(matches!(err, MoneyError::InvalidDigit { found: 'a' }));
}

#[test]
fn rejects_second_decimal_point() {
    let err = Money::parse("1.2.3").unwrap_err();
    assert!(matches!(err, MoneyError::InvalidDigit { found: '.' }));
}

#[test]
fn rejects_overflowing_amounts() {
    let err = Money::parse("999999999999999999999").unwrap_err();
    assert_eq!(err, MoneyError::Overflow);
}

#[test]
fn display_renders_two_digit_scale() {
    assert_eq!(Money::from_minor_units(5).to_string(), "0.05");
    assert_eq!(Money::from_minor_units(150).to_string(), "1.50");
    assert_eq!(Money::from_minor_units(123_456).to_string(), "1234.56");
}

#[test]
fn checked_add_detects_overflow() {
    let max = Money::from_minor_units(u64::MAX);
    assert!(max.checked_add(Money::from_minor_units(1)).is_none());
    let sum = Money::from_minor_units(100)
        .checked_add(Money::from_minor_units(23))
        .expect("sum");
    assert_eq!(sum.minor_units(), 123);
}

#[test]
fn checked_mul_detects_overflow() {
    let max = Money::from_minor_units(u64::MAX);
    assert!(max.checked_mul(2).is_none());
    let doubled = Money::from_minor_units(250).checked_mul(2).expect("product");
    assert_eq!(doubled.minor_units(), 500);
}

#[test]
fn ordering_follows_minor_units() {
    assert!(Money::from_minor_units(499_999) < Money::from_minor_units(500_000));
    assert_eq!(Money::from_minor_units(500_000), Money::parse("5000.00").expect("parse"));
}
