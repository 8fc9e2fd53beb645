// crates/load-gate-adapters/src/lib.rs
// ============================================================================
// Module: Load Gate Adapters Library
// Description: File adapters implementing the engine ports.
// Purpose: Provide the NDJSON source, sink, and trace sink.
// Dependencies: crate::{sink, source, trace}
// ============================================================================

//! ## Overview
//! Load Gate Adapters supply the filesystem implementations of the engine
//! ports: an NDJSON record source with gapless line numbering, an NDJSON
//! decision sink with atomic temp-and-rename commit, and an NDJSON trace
//! sink. All adapters fail closed on IO errors.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod sink;
pub mod source;
pub mod trace;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use sink::NdjsonFileSink;
pub use source::NdjsonFileSource;
pub use trace::NdjsonTraceSink;
