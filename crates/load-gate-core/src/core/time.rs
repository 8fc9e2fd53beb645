// crates/load-gate-core/src/core/time.rs
// ============================================================================
// Module: Load Gate Time Model
// Description: UTC-normalized instants and civil-date window keys.
// Purpose: Provide deterministic, replayable time values for adjudication.
// Dependencies: thiserror, time
// ============================================================================

//! ## Overview
//! The engine never reads wall-clock time; every instant arrives inside a
//! record with an explicit offset and is normalized to UTC at the parse
//! boundary. Window bucketing uses civil UTC dates: a day key is the civil
//! date of the instant, and a week key is the most recent date on or before
//! the day key whose weekday equals the configured week start.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use thiserror::Error;
use time::Date;
use time::Duration;
use time::OffsetDateTime;
use time::UtcOffset;
use time::Weekday;
use time::format_description::well_known::Rfc3339;

// ============================================================================
// SECTION: Time Errors
// ============================================================================

/// Errors raised while parsing, formatting, or bucketing instants.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TimeError {
    /// The textual timestamp was not valid RFC 3339 with an explicit offset.
    #[error("invalid timestamp: {0}")]
    Parse(String),
    /// The instant could not be rendered in canonical form.
    #[error("failed to format timestamp: {0}")]
    Format(String),
    /// Date arithmetic left the supported calendar range.
    #[error("date out of supported range: {0}")]
    Range(String),
}

// ============================================================================
// SECTION: UTC Timestamp
// ============================================================================

/// Timezone-aware instant normalized to UTC at construction.
///
/// # Invariants
/// - The inner offset is always UTC; accessors observe UTC civil values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct UtcTimestamp(OffsetDateTime);

impl UtcTimestamp {
    /// Parses an RFC 3339 timestamp with an explicit offset and normalizes
    /// it to UTC.
    ///
    /// # Errors
    ///
    /// Returns [`TimeError::Parse`] when the text is not valid RFC 3339.
    pub fn parse_rfc3339(text: &str) -> Result<Self, TimeError> {
        OffsetDateTime::parse(text, &Rfc3339)
            .map(Self::from_offset_date_time)
            .map_err(|err| TimeError::Parse(err.to_string()))
    }

    /// Creates a timestamp from an offset-aware instant, normalizing to UTC.
    #[must_use]
    pub fn from_offset_date_time(instant: OffsetDateTime) -> Self {
        Self(instant.to_offset(UtcOffset::UTC))
    }

    /// Returns the civil UTC date of the instant.
    #[must_use]
    pub const fn civil_date(&self) -> Date {
        self.0.date()
    }

    /// Returns the UTC weekday of the instant.
    #[must_use]
    pub const fn weekday(&self) -> Weekday {
        self.0.date().weekday()
    }

    /// Renders the canonical RFC 3339 UTC form of the instant.
    ///
    /// The canonical form is the fingerprint input for idempotency, so two
    /// lexical variants of the same instant render identically.
    ///
    /// # Errors
    ///
    /// Returns [`TimeError::Format`] when rendering fails.
    pub fn to_rfc3339(&self) -> Result<String, TimeError> {
        self.0
            .format(&Rfc3339)
            .map_err(|err| TimeError::Format(err.to_string()))
    }
}

impl fmt::Display for UtcTimestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.to_rfc3339() {
            Ok(text) => f.write_str(&text),
            Err(_) => f.write_str("<unrepresentable instant>"),
        }
    }
}

// ============================================================================
// SECTION: Window Keys
// ============================================================================

/// Daily and weekly window keys derived from an instant.
///
/// # Invariants
/// - `week_key <= day_key`, and `week_key` falls on the configured week-start
///   weekday.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimeKeys {
    /// Civil UTC date of the instant.
    pub day_key: Date,
    /// Civil UTC date of the week-start day containing the instant.
    pub week_key: Date,
}

impl TimeKeys {
    /// Computes window keys for an instant under the given week start.
    ///
    /// # Errors
    ///
    /// Returns [`TimeError::Range`] when the week key leaves the supported
    /// calendar range.
    pub fn for_instant(ts: &UtcTimestamp, week_start: Weekday) -> Result<Self, TimeError> {
        let day_key = ts.civil_date();
        let week_key = week_key_for(day_key, week_start)?;
        Ok(Self {
            day_key,
            week_key,
        })
    }
}

/// Returns the most recent date on or before `day` whose weekday is
/// `week_start`.
///
/// # Errors
///
/// Returns [`TimeError::Range`] when subtraction leaves the calendar range.
pub fn week_key_for(day: Date, week_start: Weekday) -> Result<Date, TimeError> {
    let day_index = day.weekday().number_days_from_monday();
    let start_index = week_start.number_days_from_monday();
    let offset = (day_index + 7 - start_index) % 7;
    day.checked_sub(Duration::days(i64::from(offset)))
        .ok_or_else(|| TimeError::Range(format!("week key underflow for {day}")))
}

// ============================================================================
// SECTION: Weekday Names
// ============================================================================

/// Resolves a weekday from its full English name, case-insensitively.
#[must_use]
pub fn weekday_from_name(name: &str) -> Option<Weekday> {
    match name.to_ascii_lowercase().as_str() {
        "monday" => Some(Weekday::Monday),
        "tuesday" => Some(Weekday::Tuesday),
        "wednesday" => Some(Weekday::Wednesday),
        "thursday" => Some(Weekday::Thursday),
        "friday" => Some(Weekday::Friday),
        "saturday" => Some(Weekday::Saturday),
        "sunday" => Some(Weekday::Sunday),
        _ => None,
    }
}
