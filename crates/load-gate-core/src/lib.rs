// crates/load-gate-core/src/lib.rs
// ============================================================================
// Module: Load Gate Core Library
// Description: Deterministic fund-load adjudication pipeline and state.
// Purpose: Wire together domain values, state, kernel, and step modules.
// Dependencies: crate::{core, interfaces, runtime, state, steps}
// ============================================================================

//! ## Overview
//! Load Gate Core adjudicates an ordered stream of fund-load attempts: each
//! input line flows through a configuration-composed scenario of steps
//! (parse, time keys, idempotency gate, features, policy evaluation, window
//! update, format, write) and yields exactly one accept/decline output line
//! in input order. Processing is single-threaded and strictly ordered;
//! identical input and configuration produce byte-identical output.
//!
//! Invariants:
//! - Only canonical records (first occurrence of an id) mutate window state.
//! - The evaluator reads pre-mutation snapshots; updates apply strictly
//!   afterwards.
//! - Parse failures become declined decisions, never aborted runs.

// ============================================================================
// SECTION: Core Modules
// ============================================================================

pub mod core;
pub mod interfaces;
pub mod runtime;
pub mod state;
pub mod steps;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use self::core::*;

pub use interfaces::DecisionSink;
pub use interfaces::RecordSource;
pub use interfaces::SinkError;
pub use interfaces::SourceError;
pub use interfaces::TraceSink;
pub use interfaces::TraceSinkError;
pub use interfaces::memory::MemorySink;
pub use interfaces::memory::MemorySource;
pub use interfaces::memory::MemoryTraceSink;
pub use runtime::BuildError;
pub use runtime::CalendarMultiplier;
pub use runtime::ContextDiff;
pub use runtime::EngineSettings;
pub use runtime::FailurePolicy;
pub use runtime::NoopObserver;
pub use runtime::PipelineError;
pub use runtime::PipelineRunner;
pub use runtime::PrimeGateSettings;
pub use runtime::RecordIdentity;
pub use runtime::RunReport;
pub use runtime::Scenario;
pub use runtime::ScenarioBuilder;
pub use runtime::ScenarioError;
pub use runtime::SettingsError;
pub use runtime::SinkObserver;
pub use runtime::Step;
pub use runtime::StepBindings;
pub use runtime::StepContext;
pub use runtime::StepError;
pub use runtime::StepOutput;
pub use runtime::StepRegistry;
pub use runtime::TraceObserver;
pub use runtime::TraceRecord;
pub use runtime::VelocityLimits;
pub use runtime::default_plan;
pub use state::IdempotencyRegistry;
pub use state::PrimeOracle;
pub use state::RegistryEntry;
pub use state::WindowError;
pub use state::WindowSnapshot;
pub use state::WindowStore;
