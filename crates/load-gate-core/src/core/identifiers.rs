// crates/load-gate-core/src/core/identifiers.rs
// ============================================================================
// Module: Load Gate Identifiers
// Description: Validated digit-string identifiers for loads and customers.
// Purpose: Provide strongly typed identifiers that preserve input lexical form.
// Dependencies: serde, thiserror
// ============================================================================

//! ## Overview
//! Load and customer identifiers are digit strings validated at construction
//! boundaries. Validation trims surrounding whitespace and requires at least
//! one ASCII digit; the accepted lexical form (including leading zeros) is
//! preserved exactly for output and registry keys.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

// ============================================================================
// SECTION: Identifier Errors
// ============================================================================

/// Errors raised while validating identifiers.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdentifierError {
    /// The identifier was empty after trimming whitespace.
    #[error("identifier is empty")]
    Empty,
    /// The identifier contained a non-digit character.
    #[error("identifier contains non-digit character {found:?}")]
    NonDigit {
        /// Offending character.
        found: char,
    },
}

/// Validates a trimmed identifier as a non-empty ASCII digit string.
fn validate_digits(raw: &str) -> Result<&str, IdentifierError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(IdentifierError::Empty);
    }
    for ch in trimmed.chars() {
        if !ch.is_ascii_digit() {
            return Err(IdentifierError::NonDigit {
                found: ch,
            });
        }
    }
    Ok(trimmed)
}

// ============================================================================
// SECTION: Load Identifier
// ============================================================================

/// Load-attempt identifier as provided by the input record.
///
/// # Invariants
/// - Non-empty ASCII digit string; input lexical form is preserved.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LoadId(String);

impl LoadId {
    /// Validates and creates a load identifier from raw text.
    ///
    /// # Errors
    ///
    /// Returns [`IdentifierError`] when the text is empty or non-numeric.
    pub fn parse(raw: &str) -> Result<Self, IdentifierError> {
        validate_digits(raw).map(|digits| Self(digits.to_string()))
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LoadId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

// ============================================================================
// SECTION: Customer Identifier
// ============================================================================

/// Customer identifier as provided by the input record.
///
/// # Invariants
/// - Non-empty ASCII digit string; input lexical form is preserved.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CustomerId(String);

impl CustomerId {
    /// Validates and creates a customer identifier from raw text.
    ///
    /// # Errors
    ///
    /// Returns [`IdentifierError`] when the text is empty or non-numeric.
    pub fn parse(raw: &str) -> Result<Self, IdentifierError> {
        validate_digits(raw).map(|digits| Self(digits.to_string()))
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CustomerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}
