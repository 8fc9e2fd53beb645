// crates/load-gate-core/src/core/mod.rs
// ============================================================================
// Module: Load Gate Core Domain
// Description: Domain values shared by the pipeline kernel and steps.
// Purpose: Re-export money, time, identifier, message, and hashing types.
// Dependencies: crate::core::{fingerprint, identifiers, message, money, reason, time}
// ============================================================================

//! ## Overview
//! The core domain modules define the immutable values flowing through the
//! pipeline: validated identifiers, fixed-scale money, UTC-normalized time,
//! reason codes, stage messages, and payload fingerprints.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod fingerprint;
pub mod identifiers;
pub mod message;
pub mod money;
pub mod reason;
pub mod time;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use fingerprint::DEFAULT_HASH_ALGORITHM;
pub use fingerprint::Fingerprint;
pub use fingerprint::FingerprintError;
pub use fingerprint::HashAlgorithm;
pub use fingerprint::HashDigest;
pub use identifiers::CustomerId;
pub use identifiers::IdentifierError;
pub use identifiers::LoadId;
pub use message::ClassifiedAttempt;
pub use message::Decision;
pub use message::Features;
pub use message::FormattedRow;
pub use message::IdempotencyStatus;
pub use message::KeyedAttempt;
pub use message::LoadAttempt;
pub use message::OutputRow;
pub use message::PipelineMessage;
pub use message::RawLine;
pub use message::ScoredAttempt;
pub use money::Money;
pub use money::MoneyError;
pub use reason::ReasonCode;
pub use self::time::TimeError;
pub use self::time::TimeKeys;
pub use self::time::UtcTimestamp;
pub use self::time::week_key_for;
pub use self::time::weekday_from_name;
