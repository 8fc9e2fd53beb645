// crates/load-gate-core/src/core/money.rs
// ============================================================================
// Module: Load Gate Money Model
// Description: Fixed-scale monetary amounts in integer minor units.
// Purpose: Provide exact, float-free money arithmetic and strict parsing.
// Dependencies: serde, thiserror
// ============================================================================

//! ## Overview
//! All monetary amounts are represented as unsigned integer minor units
//! (cents) with a fixed scale of two decimal digits. Arithmetic is checked
//! and exact; textual forms appear only at parse and display boundaries.
//! Parsing accepts any combination of `USD` and `$` currency prefixes and
//! rejects negative signs and amounts with more than two fractional digits.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;
use serde::Deserializer;
use serde::Serialize;
use serde::Serializer;
use serde::de::Error as DeError;
use thiserror::Error;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Number of minor units per major currency unit.
const MINOR_UNITS_PER_MAJOR: u64 = 100;

/// Maximum number of fractional digits accepted by the parser.
const MAX_FRACTION_DIGITS: usize = 2;

// ============================================================================
// SECTION: Money Errors
// ============================================================================

/// Errors raised while parsing or combining monetary amounts.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MoneyError {
    /// No numeric value remained after stripping prefixes and whitespace.
    #[error("amount has no numeric value")]
    Empty,
    /// A negative sign was present.
    #[error("negative amounts are not supported")]
    Negative,
    /// An unexpected character appeared in the numeric value.
    #[error("unexpected character {found:?} in amount")]
    InvalidDigit {
        /// Offending character.
        found: char,
    },
    /// The fractional part was empty or longer than two digits.
    #[error("fractional part must have one or two digits")]
    InvalidFraction,
    /// The amount exceeds the representable range of minor units.
    #[error("amount exceeds the representable range")]
    Overflow,
}

// ============================================================================
// SECTION: Money Value
// ============================================================================

/// Monetary amount in integer minor units with a fixed scale of two digits.
///
/// # Invariants
/// - Always non-negative; the representation is unsigned.
/// - Arithmetic never rounds; overflow surfaces as `None` or [`MoneyError`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Money(u64);

impl Money {
    /// Zero amount.
    pub const ZERO: Self = Self(0);

    /// Creates an amount from raw minor units.
    #[must_use]
    pub const fn from_minor_units(minor_units: u64) -> Self {
        Self(minor_units)
    }

    /// Returns the amount as raw minor units.
    #[must_use]
    pub const fn minor_units(self) -> u64 {
        self.0
    }

    /// Adds two amounts, returning `None` on overflow.
    #[must_use]
    pub const fn checked_add(self, other: Self) -> Option<Self> {
        match self.0.checked_add(other.0) {
            Some(sum) => Some(Self(sum)),
            None => None,
        }
    }

    /// Multiplies the amount by an integer factor, returning `None` on overflow.
    #[must_use]
    pub const fn checked_mul(self, factor: u64) -> Option<Self> {
        match self.0.checked_mul(factor) {
            Some(product) => Some(Self(product)),
            None => None,
        }
    }

    /// Parses a monetary amount from its textual form.
    ///
    /// Accepts any prefix combination of `USD` and `$` and ignores
    /// whitespace anywhere in the input. The numeric remainder must be
    /// non-negative decimal digits with at most two fractional digits.
    ///
    /// # Errors
    ///
    /// Returns [`MoneyError`] when the text is empty, negative, contains
    /// unexpected characters, has an invalid fraction, or overflows.
    pub fn parse(text: &str) -> Result<Self, MoneyError> {
        let compact: String = text.chars().filter(|ch| !ch.is_whitespace()).collect();
        let numeric = strip_currency_prefixes(&compact);
        if numeric.is_empty() {
            return Err(MoneyError::Empty);
        }
        if numeric.starts_with('-') {
            return Err(MoneyError::Negative);
        }

        let (integral, fraction) = split_numeric(numeric)?;
        let whole = parse_digits(integral)?;
        let cents = parse_fraction(fraction)?;
        whole
            .checked_mul(MINOR_UNITS_PER_MAJOR)
            .and_then(|scaled| scaled.checked_add(cents))
            .map(Self)
            .ok_or(MoneyError::Overflow)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let whole = self.0 / MINOR_UNITS_PER_MAJOR;
        let cents = self.0 % MINOR_UNITS_PER_MAJOR;
        write!(f, "{whole}.{cents:02}")
    }
}

impl FromStr for Money {
    type Err = MoneyError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        Self::parse(text)
    }
}

impl Serialize for Money {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Money {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        Self::parse(&text).map_err(DeError::custom)
    }
}

// ============================================================================
// SECTION: Parsing Helpers
// ============================================================================

/// Strips any leading combination of `USD` and `$` currency markers.
fn strip_currency_prefixes(text: &str) -> &str {
    let mut rest = text;
    loop {
        if let Some(stripped) = rest.strip_prefix("USD") {
            rest = stripped;
        } else if let Some(stripped) = rest.strip_prefix('$') {
            rest = stripped;
        } else {
            return rest;
        }
    }
}

/// Splits a numeric string into integral and optional fractional parts.
fn split_numeric(numeric: &str) -> Result<(&str, Option<&str>), MoneyError> {
    let Some((integral, fraction)) = numeric.split_once('.') else {
        return Ok((numeric, None));
    };
    if fraction.contains('.') {
        return Err(MoneyError::InvalidDigit {
            found: '.',
        });
    }
    Ok((integral, Some(fraction)))
}

/// Parses a non-empty run of decimal digits into a `u64`.
fn parse_digits(digits: &str) -> Result<u64, MoneyError> {
    if digits.is_empty() {
        return Err(MoneyError::Empty);
    }
    let mut value: u64 = 0;
    for ch in digits.chars() {
        let digit = ch.to_digit(10).ok_or(MoneyError::InvalidDigit {
            found: ch,
        })?;
        value = value
            .checked_mul(10)
            .and_then(|scaled| scaled.checked_add(u64::from(digit)))
            .ok_or(MoneyError::Overflow)?;
    }
    Ok(value)
}

/// Parses an optional fractional part into minor units.
fn parse_fraction(fraction: Option<&str>) -> Result<u64, MoneyError> {
    let Some(fraction) = fraction else {
        return Ok(0);
    };
    if fraction.is_empty() || fraction.len() > MAX_FRACTION_DIGITS {
        return Err(MoneyError::InvalidFraction);
    }
    let cents = parse_digits(fraction)?;
    if fraction.len() == 1 {
        return Ok(cents * 10);
    }
    Ok(cents)
}
