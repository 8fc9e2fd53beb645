// crates/load-gate-core/src/core/fingerprint.rs
// ============================================================================
// Module: Load Gate Payload Fingerprints
// Description: RFC 8785 canonical JSON hashing for idempotency fingerprints.
// Purpose: Provide stable payload digests that exclude the load identifier.
// Dependencies: crate::core::{identifiers, money, time}, serde, serde_jcs, sha2,
// thiserror
// ============================================================================

//! ## Overview
//! A fingerprint is the SHA-256 digest of the RFC 8785 (JCS) canonical JSON
//! of a load attempt's payload fields: customer identifier, canonical UTC
//! timestamp, and amount in minor units. The load identifier is excluded so
//! replayed and conflicting submissions of the same id can be told apart.
//! Canonicalization makes the digest independent of lexical variation in the
//! source record.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;
use sha2::Digest;
use sha2::Sha256;
use thiserror::Error;

use crate::core::identifiers::CustomerId;
use crate::core::money::Money;
use crate::core::time::TimeError;
use crate::core::time::UtcTimestamp;

// ============================================================================
// SECTION: Hash Algorithm
// ============================================================================

/// Supported hash algorithms for fingerprints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HashAlgorithm {
    /// SHA-256 hashing (FIPS-friendly default).
    Sha256,
}

/// Default hash algorithm for fingerprints.
pub const DEFAULT_HASH_ALGORITHM: HashAlgorithm = HashAlgorithm::Sha256;

// ============================================================================
// SECTION: Hash Digest
// ============================================================================

/// Deterministic content hash representation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HashDigest {
    /// Hash algorithm identifier.
    pub algorithm: HashAlgorithm,
    /// Lowercase hex-encoded digest bytes.
    pub value: String,
}

impl HashDigest {
    /// Creates a new digest from raw bytes.
    #[must_use]
    pub fn new(algorithm: HashAlgorithm, bytes: &[u8]) -> Self {
        Self {
            algorithm,
            value: hex_encode(bytes),
        }
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Errors raised when computing fingerprints.
#[derive(Debug, Error)]
pub enum FingerprintError {
    /// JSON canonicalization failed.
    #[error("failed to canonicalize json: {0}")]
    Canonicalization(String),
    /// The timestamp could not be rendered canonically.
    #[error(transparent)]
    Time(#[from] TimeError),
}

// ============================================================================
// SECTION: Fingerprint
// ============================================================================

/// Stable payload fingerprint excluding the load identifier.
///
/// # Invariants
/// - Equal fingerprints imply identical (customer, instant, amount) payloads.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Fingerprint(HashDigest);

/// Canonical payload fields covered by a fingerprint.
#[derive(Serialize)]
struct FingerprintFields<'a> {
    /// Customer identifier lexical form.
    customer_id: &'a str,
    /// Canonical RFC 3339 UTC timestamp.
    ts: String,
    /// Amount in integer minor units.
    amount_minor: u64,
}

impl Fingerprint {
    /// Computes the fingerprint of a load attempt payload.
    ///
    /// # Errors
    ///
    /// Returns [`FingerprintError`] when the timestamp cannot be rendered or
    /// canonicalization fails.
    pub fn compute(
        customer_id: &CustomerId,
        ts: &UtcTimestamp,
        amount: Money,
    ) -> Result<Self, FingerprintError> {
        let fields = FingerprintFields {
            customer_id: customer_id.as_str(),
            ts: ts.to_rfc3339()?,
            amount_minor: amount.minor_units(),
        };
        hash_canonical_json(DEFAULT_HASH_ALGORITHM, &fields).map(Self)
    }

    /// Returns the underlying digest.
    #[must_use]
    pub const fn digest(&self) -> &HashDigest {
        &self.0
    }
}

// ============================================================================
// SECTION: Hashing Helpers
// ============================================================================

/// Returns canonical JSON bytes for a serializable value using RFC 8785.
///
/// # Errors
///
/// Returns [`FingerprintError::Canonicalization`] when serialization fails.
pub fn canonical_json_bytes<T: Serialize + ?Sized>(value: &T) -> Result<Vec<u8>, FingerprintError> {
    serde_jcs::to_vec(value).map_err(|err| FingerprintError::Canonicalization(err.to_string()))
}

/// Hashes canonical JSON using the provided algorithm.
///
/// # Errors
///
/// Returns [`FingerprintError::Canonicalization`] when serialization fails.
pub fn hash_canonical_json<T: Serialize + ?Sized>(
    algorithm: HashAlgorithm,
    value: &T,
) -> Result<HashDigest, FingerprintError> {
    let bytes = canonical_json_bytes(value)?;
    Ok(hash_bytes(algorithm, &bytes))
}

/// Hashes raw bytes using the provided algorithm.
#[must_use]
pub fn hash_bytes(algorithm: HashAlgorithm, bytes: &[u8]) -> HashDigest {
    match algorithm {
        HashAlgorithm::Sha256 => {
            let mut hasher = Sha256::new();
            hasher.update(bytes);
            let digest = hasher.finalize();
            HashDigest::new(HashAlgorithm::Sha256, &digest)
        }
    }
}

// ============================================================================
// SECTION: Hex Encoding
// ============================================================================

/// Encodes bytes as a lowercase hex string.
fn hex_encode(bytes: &[u8]) -> String {
    const HEX: &[u8; 16] = b"0123456789abcdef";
    let mut out = String::with_capacity(bytes.len() * 2);
    for byte in bytes {
        out.push(HEX[(byte >> 4) as usize] as char);
        out.push(HEX[(byte & 0x0f) as usize] as char);
    }
    out
}
