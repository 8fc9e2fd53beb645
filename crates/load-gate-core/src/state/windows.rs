// crates/load-gate-core/src/state/windows.rs
// ============================================================================
// Module: Load Gate Window Store
// Description: Keyed velocity counters and accepted-amount sums.
// Purpose: Provide snapshot reads and monotonic checked increments.
// Dependencies: crate::core::{identifiers, money, time}, thiserror
// ============================================================================

//! ## Overview
//! The window store owns every velocity bucket: per-customer daily attempt
//! counters, per-customer daily and weekly accepted-amount sums, and the
//! global daily prime approval counter. All maps start empty and missing
//! entries read as zero. Increments are monotonic and checked; an overflow
//! is an invariant violation, not a business outcome. Snapshot reads never
//! mutate.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;

use thiserror::Error;
use time::Date;

use crate::core::identifiers::CustomerId;
use crate::core::money::Money;
use crate::core::time::TimeKeys;

// ============================================================================
// SECTION: Window Errors
// ============================================================================

/// Errors raised by window mutations.
///
/// # Invariants
/// - Variants indicate invariant violations, never business declines.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WindowError {
    /// An attempt or approval counter overflowed.
    #[error("window counter overflow for {bucket}")]
    CounterOverflow {
        /// Description of the overflowing bucket.
        bucket: String,
    },
    /// An accepted-amount sum overflowed.
    #[error("window amount overflow for {bucket}")]
    AmountOverflow {
        /// Description of the overflowing bucket.
        bucket: String,
    },
}

// ============================================================================
// SECTION: Window Snapshot
// ============================================================================

/// Pre-mutation view of the windows relevant to one record.
///
/// # Invariants
/// - Values reflect only mutations from earlier records.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowSnapshot {
    /// Canonical attempts already counted for (customer, day).
    pub day_attempts: u32,
    /// Amount already accepted for (customer, day).
    pub day_accepted: Money,
    /// Amount already accepted for (customer, week).
    pub week_accepted: Money,
    /// Prime-id approvals already counted for the day (global).
    pub prime_approvals: u32,
}

// ============================================================================
// SECTION: Window Store
// ============================================================================

/// Keyed counters and sums over daily and weekly buckets.
///
/// # Invariants
/// - Values only ever increase; there is no removal or reset within a run.
/// - Only the window update step takes a mutable borrow.
#[derive(Debug, Default)]
pub struct WindowStore {
    /// Canonical attempt counts per (customer, day).
    daily_attempts: BTreeMap<(CustomerId, Date), u32>,
    /// Accepted amounts per (customer, day).
    daily_accepted: BTreeMap<(CustomerId, Date), Money>,
    /// Accepted amounts per (customer, week).
    weekly_accepted: BTreeMap<(CustomerId, Date), Money>,
    /// Global prime-id approvals per day.
    daily_prime_approvals: BTreeMap<Date, u32>,
}

impl WindowStore {
    /// Creates an empty window store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads the pre-mutation snapshot for one record.
    #[must_use]
    pub fn snapshot(&self, customer_id: &CustomerId, keys: &TimeKeys) -> WindowSnapshot {
        let day = (customer_id.clone(), keys.day_key);
        let week = (customer_id.clone(), keys.week_key);
        WindowSnapshot {
            day_attempts: self.daily_attempts.get(&day).copied().unwrap_or(0),
            day_accepted: self.daily_accepted.get(&day).copied().unwrap_or(Money::ZERO),
            week_accepted: self.weekly_accepted.get(&week).copied().unwrap_or(Money::ZERO),
            prime_approvals: self
                .daily_prime_approvals
                .get(&keys.day_key)
                .copied()
                .unwrap_or(0),
        }
    }

    /// Counts one canonical attempt for (customer, day).
    ///
    /// # Errors
    ///
    /// Returns [`WindowError::CounterOverflow`] when the counter saturates.
    pub fn record_attempt(
        &mut self,
        customer_id: &CustomerId,
        day_key: Date,
    ) -> Result<(), WindowError> {
        let counter = self
            .daily_attempts
            .entry((customer_id.clone(), day_key))
            .or_insert(0);
        *counter = counter
            .checked_add(1)
            .ok_or_else(|| WindowError::CounterOverflow {
                bucket: format!("attempts {customer_id}/{day_key}"),
            })?;
        Ok(())
    }

    /// Adds an accepted effective amount to the daily and weekly sums.
    ///
    /// # Errors
    ///
    /// Returns [`WindowError::AmountOverflow`] when either sum saturates.
    pub fn record_acceptance(
        &mut self,
        customer_id: &CustomerId,
        keys: &TimeKeys,
        effective_amount: Money,
    ) -> Result<(), WindowError> {
        let day_sum = self
            .daily_accepted
            .entry((customer_id.clone(), keys.day_key))
            .or_insert(Money::ZERO);
        *day_sum = day_sum
            .checked_add(effective_amount)
            .ok_or_else(|| WindowError::AmountOverflow {
                bucket: format!("daily {customer_id}/{}", keys.day_key),
            })?;

        let week_sum = self
            .weekly_accepted
            .entry((customer_id.clone(), keys.week_key))
            .or_insert(Money::ZERO);
        *week_sum = week_sum
            .checked_add(effective_amount)
            .ok_or_else(|| WindowError::AmountOverflow {
                bucket: format!("weekly {customer_id}/{}", keys.week_key),
            })?;
        Ok(())
    }

    /// Counts one global prime-id approval for the day.
    ///
    /// # Errors
    ///
    /// Returns [`WindowError::CounterOverflow`] when the counter saturates.
    pub fn record_prime_approval(&mut self, day_key: Date) -> Result<(), WindowError> {
        let counter = self.daily_prime_approvals.entry(day_key).or_insert(0);
        *counter = counter
            .checked_add(1)
            .ok_or_else(|| WindowError::CounterOverflow {
                bucket: format!("prime approvals {day_key}"),
            })?;
        Ok(())
    }

    /// Returns the number of populated daily attempt buckets.
    #[must_use]
    pub fn daily_attempt_buckets(&self) -> usize {
        self.daily_attempts.len()
    }
}
