// crates/load-gate-core/src/runtime/mod.rs
// ============================================================================
// Module: Load Gate Runtime
// Description: Pipeline kernel: contract, context, scenario, runner, tracing.
// Purpose: Re-export the kernel surface used by steps and composition roots.
// Dependencies: crate::runtime::{context, registry, runner, scenario, settings,
// step, trace}
// ============================================================================

//! ## Overview
//! The runtime is the generic half of the engine: it knows how to execute an
//! ordered scenario of steps over a worklist with deterministic ordering,
//! tracing, and failure handling, but nothing about fund loads. The step
//! implementations under [`crate::steps`] supply the domain semantics.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod context;
pub mod registry;
pub mod runner;
pub mod scenario;
pub mod settings;
pub mod step;
pub mod trace;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use context::ContextDiff;
pub use context::ContextSnapshot;
pub use context::RecordIdentity;
pub use context::StepContext;
pub use registry::BuildError;
pub use registry::StepBindings;
pub use registry::StepFactory;
pub use registry::StepRegistry;
pub use registry::default_plan;
pub use runner::FailurePolicy;
pub use runner::PipelineError;
pub use runner::PipelineRunner;
pub use runner::RunReport;
pub use scenario::BoundStep;
pub use scenario::Scenario;
pub use scenario::ScenarioBuilder;
pub use scenario::ScenarioError;
pub use settings::CalendarMultiplier;
pub use settings::EngineSettings;
pub use settings::PrimeGateSettings;
pub use settings::SettingsError;
pub use settings::VelocityLimits;
pub use step::Step;
pub use step::StepError;
pub use step::StepOutput;
pub use trace::NoopObserver;
pub use trace::SinkObserver;
pub use trace::TraceObserver;
pub use trace::TraceRecord;
