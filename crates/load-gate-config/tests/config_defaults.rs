// crates/load-gate-config/tests/config_defaults.rs
// ============================================================================
// Module: Config Default Tests
// Description: Default values of the configuration document.
// Purpose: Ensure an empty document yields the baseline engine settings.
// Dependencies: load-gate-config, load-gate-core, time
// ============================================================================

//! ## Overview
//! An empty TOML document must validate and map onto the baseline settings:
//! Monday week start, features disabled, daily $5000 / weekly $20000 /
//! three attempts, atomic output replace.

#![allow(
    clippy::panic,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only output and panic-based assertions are permitted."
)]

use load_gate_config::EngineConfig;
use load_gate_core::Money;
use time::Weekday;

#[test]
fn empty_document_validates() {
    let config = EngineConfig::from_toml("").expect("empty config");
    assert!(config.validate().is_ok());
}

#[test]
fn defaults_map_to_baseline_settings() {
    let config = EngineConfig::from_toml("").expect("empty config");
    let settings = config.engine_settings().expect("settings");

    assert_eq!(settings.week_start, Weekday::Monday);
    assert!(!settings.multiplier.enabled);
    assert_eq!(settings.multiplier.factor, 2);
    assert!(!settings.prime_gate.enabled);
    assert_eq!(settings.prime_gate.global_per_day, 1);
    assert_eq!(settings.prime_gate.amount_cap, Money::from_minor_units(999_900));
    assert_eq!(settings.limits.daily_amount, Money::from_minor_units(500_000));
    assert_eq!(settings.limits.weekly_amount, Money::from_minor_units(2_000_000));
    assert_eq!(settings.limits.daily_attempts, 3);
}

#[test]
fn default_output_section_uses_atomic_replace() {
    let config = EngineConfig::from_toml("").expect("empty config");
    assert_eq!(config.output.file_path, "output.ndjson");
    assert!(config.output.atomic_replace);
}

#[test]
fn partial_tables_keep_unrelated_defaults() {
    let config = EngineConfig::from_toml(
        r#"
[policies.limits]
daily_amount = "100.00"
"#,
    )
    .expect("config");
    let settings = config.engine_settings().expect("settings");
    assert_eq!(settings.limits.daily_amount, Money::from_minor_units(10_000));
    assert_eq!(settings.limits.weekly_amount, Money::from_minor_units(2_000_000));
    assert_eq!(settings.limits.daily_attempts, 3);
}
