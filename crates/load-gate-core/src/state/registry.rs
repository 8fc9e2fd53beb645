// crates/load-gate-core/src/state/registry.rs
// ============================================================================
// Module: Load Gate Idempotency Registry
// Description: Write-once map from load identifier to canonical payload.
// Purpose: Classify repeated identifiers as replay or conflict duplicates.
// Dependencies: crate::core::{fingerprint, identifiers, message}
// ============================================================================

//! ## Overview
//! The registry records, for every load identifier, the payload fingerprint
//! and line number of its first (canonical) occurrence. Entries are
//! write-once: once registered, the canonical pair is immutable for the rest
//! of the run. Classification is observe-or-insert and never rejects a
//! record; the policy evaluator decides what duplicates mean.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;

use crate::core::fingerprint::Fingerprint;
use crate::core::identifiers::LoadId;
use crate::core::message::IdempotencyStatus;

// ============================================================================
// SECTION: Registry Entry
// ============================================================================

/// Canonical payload recorded for a load identifier.
///
/// # Invariants
/// - Immutable once inserted; the canonical record never changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistryEntry {
    /// Fingerprint of the canonical payload.
    pub fingerprint: Fingerprint,
    /// Line number of the canonical occurrence.
    pub canonical_line_no: u64,
}

// ============================================================================
// SECTION: Idempotency Registry
// ============================================================================

/// Write-once registry mapping load identifiers to canonical payloads.
///
/// # Invariants
/// - Entries transition `Absent -> Present` exactly once and never mutate.
/// - The idempotency gate step is the sole owner.
#[derive(Debug, Default)]
pub struct IdempotencyRegistry {
    /// Canonical entries keyed by load identifier.
    entries: BTreeMap<LoadId, RegistryEntry>,
}

impl IdempotencyRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Classifies an identifier against the registry, inserting the
    /// canonical entry on first sight.
    #[must_use]
    pub fn classify(
        &mut self,
        id: &LoadId,
        fingerprint: &Fingerprint,
        line_no: u64,
    ) -> IdempotencyStatus {
        if let Some(entry) = self.entries.get(id) {
            if entry.fingerprint == *fingerprint {
                return IdempotencyStatus::DuplicateReplay {
                    canonical_line: entry.canonical_line_no,
                };
            }
            return IdempotencyStatus::DuplicateConflict {
                canonical_line: entry.canonical_line_no,
            };
        }
        self.entries.insert(
            id.clone(),
            RegistryEntry {
                fingerprint: fingerprint.clone(),
                canonical_line_no: line_no,
            },
        );
        IdempotencyStatus::Canonical
    }

    /// Returns the canonical entry for an identifier, if registered.
    #[must_use]
    pub fn get(&self, id: &LoadId) -> Option<&RegistryEntry> {
        self.entries.get(id)
    }

    /// Returns the number of registered identifiers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true when no identifier has been registered yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
