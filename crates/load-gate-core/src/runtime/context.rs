// crates/load-gate-core/src/runtime/context.rs
// ============================================================================
// Module: Load Gate Step Context
// Description: Per-record mutable execution metadata for the kernel.
// Purpose: Carry trace identity, metrics, and tags without business state.
// Dependencies: crate::core::identifiers, serde
// ============================================================================

//! ## Overview
//! The step context lives for exactly one record, end-to-end. It carries the
//! trace identity, the identity recovered by the parse step (used by the
//! fail-closed policy), small step-published metrics, and free-form tags.
//! Metrics and tags are the whitelisted diffable fields surfaced in step
//! trace records; error notes stay out of diffs and appear only in failure
//! records.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;

use serde::Deserialize;
use serde::Serialize;

use crate::core::identifiers::CustomerId;
use crate::core::identifiers::LoadId;

// ============================================================================
// SECTION: Record Identity
// ============================================================================

/// Identity recovered for a record, as far as parsing got.
///
/// # Invariants
/// - `line_no` is always present; identifier fields may be absent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordIdentity {
    /// 1-based input line number.
    pub line_no: u64,
    /// Load identifier when recovered.
    pub load_id: Option<LoadId>,
    /// Customer identifier when recovered.
    pub customer_id: Option<CustomerId>,
}

// ============================================================================
// SECTION: Context Snapshot and Diff
// ============================================================================

/// Immutable view of the whitelisted context fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContextSnapshot {
    /// Metric counters at snapshot time.
    metrics: BTreeMap<String, u64>,
    /// Tags at snapshot time.
    tags: BTreeMap<String, String>,
}

/// Changed whitelisted fields between two context snapshots.
///
/// # Invariants
/// - Contains only entries that were added or changed; removals cannot occur
///   because metrics and tags are append-or-overwrite.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContextDiff {
    /// Metrics that changed, with their new values.
    pub metrics: BTreeMap<String, u64>,
    /// Tags that changed, with their new values.
    pub tags: BTreeMap<String, String>,
}

impl ContextDiff {
    /// Computes the changed entries from `before` to `after`.
    #[must_use]
    pub fn between(before: &ContextSnapshot, after: &ContextSnapshot) -> Self {
        let metrics = after
            .metrics
            .iter()
            .filter(|&(key, value)| before.metrics.get(key) != Some(value))
            .map(|(key, value)| (key.clone(), *value))
            .collect();
        let tags = after
            .tags
            .iter()
            .filter(|&(key, value)| before.tags.get(key) != Some(value))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();
        Self {
            metrics,
            tags,
        }
    }

    /// Returns true when nothing changed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.metrics.is_empty() && self.tags.is_empty()
    }
}

// ============================================================================
// SECTION: Step Context
// ============================================================================

/// Per-record mutable execution metadata.
///
/// # Invariants
/// - Created fresh for every record; never carries business state.
/// - Metrics only increase; tags are overwrite-only.
#[derive(Debug)]
pub struct StepContext {
    /// Deterministic trace identifier for the record.
    trace_id: String,
    /// 1-based input line number.
    line_no: u64,
    /// Identity recovered by the parse step.
    identity: Option<RecordIdentity>,
    /// Step-published metric counters.
    metrics: BTreeMap<String, u64>,
    /// Step-published tags.
    tags: BTreeMap<String, String>,
    /// Error notes recorded by steps.
    errors: Vec<String>,
}

impl StepContext {
    /// Creates a fresh context for one record.
    #[must_use]
    pub fn new(line_no: u64) -> Self {
        Self {
            trace_id: format!("rec-{line_no:08}"),
            line_no,
            identity: None,
            metrics: BTreeMap::new(),
            tags: BTreeMap::new(),
            errors: Vec::new(),
        }
    }

    /// Returns the deterministic trace identifier.
    #[must_use]
    pub fn trace_id(&self) -> &str {
        &self.trace_id
    }

    /// Returns the input line number.
    #[must_use]
    pub const fn line_no(&self) -> u64 {
        self.line_no
    }

    /// Returns the recovered identity, if any.
    #[must_use]
    pub const fn identity(&self) -> Option<&RecordIdentity> {
        self.identity.as_ref()
    }

    /// Records the identity recovered for the record.
    pub fn set_identity(&mut self, identity: RecordIdentity) {
        self.identity = Some(identity);
    }

    /// Increments a metric counter by one, saturating at the maximum.
    pub fn bump_metric(&mut self, key: &str) {
        let counter = self.metrics.entry(key.to_string()).or_insert(0);
        *counter = counter.saturating_add(1);
    }

    /// Sets a tag, overwriting any previous value.
    pub fn set_tag(&mut self, key: &str, value: impl Into<String>) {
        self.tags.insert(key.to_string(), value.into());
    }

    /// Appends an error note.
    pub fn note_error(&mut self, note: impl Into<String>) {
        self.errors.push(note.into());
    }

    /// Returns the recorded error notes in order.
    #[must_use]
    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    /// Captures the whitelisted fields for diffing.
    #[must_use]
    pub fn snapshot(&self) -> ContextSnapshot {
        ContextSnapshot {
            metrics: self.metrics.clone(),
            tags: self.tags.clone(),
        }
    }
}
