// crates/load-gate-core/src/core/message.rs
// ============================================================================
// Module: Load Gate Pipeline Messages
// Description: Per-stage record payloads and the pipeline message union.
// Purpose: Model record enrichment as immutable stage-to-stage values.
// Dependencies: crate::core::{identifiers, money, reason, time}, serde
// ============================================================================

//! ## Overview
//! Every pipeline stage consumes one message shape and constructs the next;
//! values are immutable once built. The [`PipelineMessage`] union carries a
//! record through the kernel, and decided records pass through the remaining
//! enrichment stages untouched so every input line reaches the sink exactly
//! once.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;

use crate::core::identifiers::CustomerId;
use crate::core::identifiers::LoadId;
use crate::core::money::Money;
use crate::core::reason::ReasonCode;
use crate::core::time::TimeKeys;
use crate::core::time::UtcTimestamp;

// ============================================================================
// SECTION: Raw Input
// ============================================================================

/// One physical input line as yielded by the source adapter.
///
/// # Invariants
/// - `line_no` is 1-based, strictly increasing, and gapless among yielded
///   records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawLine {
    /// 1-based input line number.
    pub line_no: u64,
    /// Line text without the trailing newline.
    pub text: String,
}

// ============================================================================
// SECTION: Load Attempt
// ============================================================================

/// Parsed and validated load attempt.
///
/// # Invariants
/// - `amount` is non-negative with two-digit scale; `ts` is UTC-normalized.
/// - Identifiers preserve their input lexical form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadAttempt {
    /// 1-based input line number.
    pub line_no: u64,
    /// Load identifier.
    pub id: LoadId,
    /// Customer identifier.
    pub customer_id: CustomerId,
    /// Requested load amount.
    pub amount: Money,
    /// UTC-normalized instant of the attempt.
    pub ts: UtcTimestamp,
}

/// Load attempt enriched with window keys.
///
/// # Invariants
/// - `keys` derive from `attempt.ts` under the configured week start.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyedAttempt {
    /// Parsed attempt.
    pub attempt: LoadAttempt,
    /// Daily and weekly window keys.
    pub keys: TimeKeys,
}

// ============================================================================
// SECTION: Idempotency Classification
// ============================================================================

/// Idempotency classification of a load attempt.
///
/// # Invariants
/// - Variants are stable for serialization and trace matching.
/// - `canonical_line` always references an earlier input line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum IdempotencyStatus {
    /// First occurrence of the identifier in input order.
    Canonical,
    /// Later occurrence with an identical payload fingerprint.
    DuplicateReplay {
        /// Line number of the canonical occurrence.
        canonical_line: u64,
    },
    /// Later occurrence with a different payload fingerprint.
    DuplicateConflict {
        /// Line number of the canonical occurrence.
        canonical_line: u64,
    },
}

impl IdempotencyStatus {
    /// Returns true for the canonical classification.
    #[must_use]
    pub const fn is_canonical(self) -> bool {
        matches!(self, Self::Canonical)
    }
}

/// Keyed attempt with its idempotency classification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifiedAttempt {
    /// Keyed attempt.
    pub keyed: KeyedAttempt,
    /// Idempotency classification.
    pub status: IdempotencyStatus,
}

// ============================================================================
// SECTION: Features
// ============================================================================

/// Derived adjudication features.
///
/// # Invariants
/// - `effective_amount = amount * risk_factor` with exact integer arithmetic.
/// - `risk_factor >= 1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Features {
    /// Amount multiplier applied by the calendar feature.
    pub risk_factor: u64,
    /// Amount after applying the risk factor.
    pub effective_amount: Money,
    /// Whether the load identifier is a prime integer.
    pub is_prime_id: bool,
}

/// Classified attempt enriched with derived features.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoredAttempt {
    /// Classified attempt.
    pub classified: ClassifiedAttempt,
    /// Derived features.
    pub features: Features,
}

// ============================================================================
// SECTION: Decision
// ============================================================================

/// Adjudication decision for one input record.
///
/// # Invariants
/// - Declined decisions carry exactly one reason; accepted decisions carry
///   none.
/// - Identity and window fields are absent only for parse-failure and
///   fail-closed decisions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decision {
    /// 1-based input line number.
    pub line_no: u64,
    /// Load identifier when recoverable.
    pub id: Option<LoadId>,
    /// Customer identifier when recoverable.
    pub customer_id: Option<CustomerId>,
    /// Whether the load was accepted.
    pub accepted: bool,
    /// Decline reasons (first failure only).
    pub reasons: Vec<ReasonCode>,
    /// Window keys when the record parsed successfully.
    pub keys: Option<TimeKeys>,
    /// Effective amount when features were computed.
    pub effective_amount: Option<Money>,
    /// Idempotency classification when the gate ran.
    pub status: Option<IdempotencyStatus>,
    /// Whether the load identifier is a prime integer.
    pub is_prime_id: bool,
}

impl Decision {
    /// Returns true when the decision belongs to a canonical record.
    #[must_use]
    pub fn is_canonical(&self) -> bool {
        matches!(self.status, Some(IdempotencyStatus::Canonical))
    }

    /// Builds a declined decision for a record that failed to parse.
    #[must_use]
    pub fn parse_failure(
        line_no: u64,
        id: Option<LoadId>,
        customer_id: Option<CustomerId>,
        reason: ReasonCode,
    ) -> Self {
        Self {
            line_no,
            id,
            customer_id,
            accepted: false,
            reasons: vec![reason],
            keys: None,
            effective_amount: None,
            status: None,
            is_prime_id: false,
        }
    }

    /// Builds a synthetic fail-closed decision for a failed step.
    #[must_use]
    pub fn step_failure(
        line_no: u64,
        id: Option<LoadId>,
        customer_id: Option<CustomerId>,
    ) -> Self {
        Self {
            line_no,
            id,
            customer_id,
            accepted: false,
            reasons: vec![ReasonCode::StepFailure],
            keys: None,
            effective_amount: None,
            status: None,
            is_prime_id: false,
        }
    }
}

// ============================================================================
// SECTION: Output Shapes
// ============================================================================

/// Externally visible output row.
///
/// # Invariants
/// - Field order matches the output contract exactly.
/// - Missing identity serializes as the empty string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputRow {
    /// Load identifier lexical form.
    pub id: String,
    /// Customer identifier lexical form.
    pub customer_id: String,
    /// Whether the load was accepted.
    pub accepted: bool,
}

impl OutputRow {
    /// Projects a decision onto the output contract.
    #[must_use]
    pub fn from_decision(decision: &Decision) -> Self {
        Self {
            id: decision.id.as_ref().map(LoadId::as_str).unwrap_or_default().to_string(),
            customer_id: decision
                .customer_id
                .as_ref()
                .map(CustomerId::as_str)
                .unwrap_or_default()
                .to_string(),
            accepted: decision.accepted,
        }
    }
}

/// Serialized output row ready for the sink.
///
/// # Invariants
/// - `json` is the compact fixed-key-order serialization of an [`OutputRow`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormattedRow {
    /// 1-based input line number.
    pub line_no: u64,
    /// Compact JSON text without a trailing newline.
    pub json: String,
}

// ============================================================================
// SECTION: Pipeline Message Union
// ============================================================================

/// Message shapes carried through the pipeline kernel.
///
/// # Invariants
/// - Every variant exposes the input line number of the record it describes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PipelineMessage {
    /// Unparsed input line.
    Raw(RawLine),
    /// Parsed load attempt.
    Attempt(LoadAttempt),
    /// Attempt with window keys.
    Keyed(KeyedAttempt),
    /// Attempt with idempotency classification.
    Classified(ClassifiedAttempt),
    /// Attempt with derived features.
    Scored(ScoredAttempt),
    /// Adjudication decision.
    Decided(Decision),
    /// Serialized output row.
    Formatted(FormattedRow),
}

impl PipelineMessage {
    /// Returns the stable stage name of the message.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Raw(_) => "raw",
            Self::Attempt(_) => "attempt",
            Self::Keyed(_) => "keyed",
            Self::Classified(_) => "classified",
            Self::Scored(_) => "scored",
            Self::Decided(_) => "decided",
            Self::Formatted(_) => "formatted",
        }
    }

    /// Returns the input line number of the record the message describes.
    #[must_use]
    pub const fn line_no(&self) -> u64 {
        match self {
            Self::Raw(raw) => raw.line_no,
            Self::Attempt(attempt) => attempt.line_no,
            Self::Keyed(keyed) => keyed.attempt.line_no,
            Self::Classified(classified) => classified.keyed.attempt.line_no,
            Self::Scored(scored) => scored.classified.keyed.attempt.line_no,
            Self::Decided(decision) => decision.line_no,
            Self::Formatted(row) => row.line_no,
        }
    }

    /// Renders a short human-readable summary for trace records.
    #[must_use]
    pub fn summary(&self) -> String {
        match self {
            Self::Raw(raw) => format!("raw line {}", raw.line_no),
            Self::Attempt(attempt) => {
                format!("attempt id={} customer={}", attempt.id, attempt.customer_id)
            }
            Self::Keyed(keyed) => format!(
                "keyed id={} day={} week={}",
                keyed.attempt.id, keyed.keys.day_key, keyed.keys.week_key
            ),
            Self::Classified(classified) => format!(
                "classified id={} canonical={}",
                classified.keyed.attempt.id,
                classified.status.is_canonical()
            ),
            Self::Scored(scored) => format!(
                "scored id={} effective={} prime={}",
                scored.classified.keyed.attempt.id,
                scored.features.effective_amount,
                scored.features.is_prime_id
            ),
            Self::Decided(decision) => format!(
                "decision line={} accepted={}",
                decision.line_no, decision.accepted
            ),
            Self::Formatted(row) => format!("formatted line={}", row.line_no),
        }
    }
}
