// crates/load-gate-core/src/core/reason.rs
// ============================================================================
// Module: Load Gate Reason Codes
// Description: Stable decline reason codes for adjudication decisions.
// Purpose: Identify the first failing check behind every declined record.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! Reason codes are a stable internal contract: they appear in traces and
//! run reports but never in the output rows. Every declined decision carries
//! exactly one code, the first failure in evaluation order.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use serde::Deserialize;
use serde::Serialize;

// ============================================================================
// SECTION: Reason Codes
// ============================================================================

/// Decline reason codes.
///
/// # Invariants
/// - Variants and their wire names are stable for traces and reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReasonCode {
    /// Input line was not a JSON object.
    ParseJson,
    /// A required field was absent from the record.
    SchemaFieldMissing,
    /// The load identifier was not a digit string.
    InvalidId,
    /// The customer identifier was not a digit string.
    InvalidCustomerId,
    /// The timestamp was not RFC 3339 with an explicit offset.
    InvalidTime,
    /// The amount was not a parseable non-negative money string.
    InvalidAmountFormat,
    /// The identifier repeated an earlier record with an identical payload.
    IdDuplicateReplay,
    /// The identifier repeated an earlier record with a different payload.
    IdDuplicateConflict,
    /// The per-customer daily attempt count was exhausted.
    DailyAttemptLimit,
    /// The effective amount exceeded the prime-gate amount cap.
    PrimeAmountCap,
    /// The global daily prime approval budget was exhausted.
    PrimeDailyGlobalLimit,
    /// The per-customer daily accepted amount would exceed its limit.
    DailyAmountLimit,
    /// The per-customer weekly accepted amount would exceed its limit.
    WeeklyAmountLimit,
    /// A step failed and the fail-closed policy declined the record.
    StepFailure,
}

impl ReasonCode {
    /// Returns the stable wire name of the code.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ParseJson => "PARSE_JSON",
            Self::SchemaFieldMissing => "SCHEMA_FIELD_MISSING",
            Self::InvalidId => "INVALID_ID",
            Self::InvalidCustomerId => "INVALID_CUSTOMER_ID",
            Self::InvalidTime => "INVALID_TIME",
            Self::InvalidAmountFormat => "INVALID_AMOUNT_FORMAT",
            Self::IdDuplicateReplay => "ID_DUPLICATE_REPLAY",
            Self::IdDuplicateConflict => "ID_DUPLICATE_CONFLICT",
            Self::DailyAttemptLimit => "DAILY_ATTEMPT_LIMIT",
            Self::PrimeAmountCap => "PRIME_AMOUNT_CAP",
            Self::PrimeDailyGlobalLimit => "PRIME_DAILY_GLOBAL_LIMIT",
            Self::DailyAmountLimit => "DAILY_AMOUNT_LIMIT",
            Self::WeeklyAmountLimit => "WEEKLY_AMOUNT_LIMIT",
            Self::StepFailure => "STEP_FAILURE",
        }
    }
}

impl fmt::Display for ReasonCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
