// crates/load-gate-core/src/runtime/settings.rs
// ============================================================================
// Module: Load Gate Engine Settings
// Description: Validated runtime settings consumed by step factories.
// Purpose: Carry the rule parameters from configuration into the pipeline.
// Dependencies: crate::core::money, thiserror, time
// ============================================================================

//! ## Overview
//! Engine settings are the already-validated parameters the composition root
//! hands to step factories: the week start, the calendar multiplier, the
//! prime gate, and the velocity limits. The configuration crate owns parsing
//! and schema validation; this module re-checks only the invariants the
//! steps rely on.

// ============================================================================
// SECTION: Imports
// ============================================================================

use thiserror::Error;
use time::Weekday;

use crate::core::money::Money;

// ============================================================================
// SECTION: Settings Errors
// ============================================================================

/// Errors raised by settings validation.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SettingsError {
    /// The calendar multiplier factor was below one.
    #[error("calendar multiplier factor must be >= 1, got {factor}")]
    MultiplierTooSmall {
        /// Rejected factor.
        factor: u64,
    },
}

// ============================================================================
// SECTION: Calendar Multiplier
// ============================================================================

/// Calendar-based amount amplification settings.
///
/// # Invariants
/// - `factor >= 1`; a factor of one is equivalent to the feature being
///   disabled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CalendarMultiplier {
    /// Whether amplification is applied at all.
    pub enabled: bool,
    /// Weekday on which amounts are amplified.
    pub weekday: Weekday,
    /// Integer amplification factor.
    pub factor: u64,
}

impl Default for CalendarMultiplier {
    fn default() -> Self {
        Self {
            enabled: false,
            weekday: Weekday::Monday,
            factor: 2,
        }
    }
}

// ============================================================================
// SECTION: Prime Gate Settings
// ============================================================================

/// Global prime-identifier gate settings.
///
/// # Invariants
/// - `global_per_day` bounds approvals across all customers per UTC day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PrimeGateSettings {
    /// Whether the prime gate participates in evaluation.
    pub enabled: bool,
    /// Maximum prime-id approvals per UTC day, globally.
    pub global_per_day: u32,
    /// Maximum effective amount for a prime-id record.
    pub amount_cap: Money,
}

impl Default for PrimeGateSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            global_per_day: 1,
            amount_cap: Money::from_minor_units(999_900),
        }
    }
}

// ============================================================================
// SECTION: Velocity Limits
// ============================================================================

/// Per-customer velocity limits.
///
/// # Invariants
/// - Amounts equal to a limit are accepted; comparisons are strict.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VelocityLimits {
    /// Maximum accepted amount per (customer, day).
    pub daily_amount: Money,
    /// Maximum accepted amount per (customer, week).
    pub weekly_amount: Money,
    /// Maximum canonical attempts per (customer, day).
    pub daily_attempts: u32,
}

impl Default for VelocityLimits {
    fn default() -> Self {
        Self {
            daily_amount: Money::from_minor_units(500_000),
            weekly_amount: Money::from_minor_units(2_000_000),
            daily_attempts: 3,
        }
    }
}

// ============================================================================
// SECTION: Engine Settings
// ============================================================================

/// Validated runtime settings for one pipeline composition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineSettings {
    /// Weekday on which weekly windows begin.
    pub week_start: Weekday,
    /// Calendar multiplier settings.
    pub multiplier: CalendarMultiplier,
    /// Prime gate settings.
    pub prime_gate: PrimeGateSettings,
    /// Velocity limits.
    pub limits: VelocityLimits,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            week_start: Weekday::Monday,
            multiplier: CalendarMultiplier::default(),
            prime_gate: PrimeGateSettings::default(),
            limits: VelocityLimits::default(),
        }
    }
}

impl EngineSettings {
    /// Re-checks the invariants the steps rely on.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError`] when an invariant does not hold.
    pub const fn validate(&self) -> Result<(), SettingsError> {
        if self.multiplier.factor < 1 {
            return Err(SettingsError::MultiplierTooSmall {
                factor: self.multiplier.factor,
            });
        }
        Ok(())
    }
}
