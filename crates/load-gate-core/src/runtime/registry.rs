// crates/load-gate-core/src/runtime/registry.rs
// ============================================================================
// Module: Load Gate Step Registry
// Description: Startup-time composition from step names to bound steps.
// Purpose: Build scenarios from a configuration plan with fail-fast checks.
// Dependencies: crate::interfaces, crate::runtime, crate::state, crate::steps,
// thiserror
// ============================================================================

//! ## Overview
//! The registry maps stable step names to factories over the validated
//! engine settings and a shared-state bundle. Composition happens once at
//! startup: unknown names, duplicate registrations, and invalid settings
//! fail before the first record is read. The default plan is the canonical
//! eight-step adjudication sequence.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

use thiserror::Error;

use crate::interfaces::DecisionSink;
use crate::runtime::scenario::Scenario;
use crate::runtime::scenario::ScenarioBuilder;
use crate::runtime::scenario::ScenarioError;
use crate::runtime::settings::EngineSettings;
use crate::runtime::settings::SettingsError;
use crate::runtime::step::Step;
use crate::state::primes::PrimeOracle;
use crate::state::windows::WindowStore;
use crate::steps;

// ============================================================================
// SECTION: Build Errors
// ============================================================================

/// Errors raised while composing a scenario from a plan.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
#[derive(Debug, Error)]
pub enum BuildError {
    /// The plan referenced a step name with no registered factory.
    #[error("unknown step name {name:?}")]
    UnknownStep {
        /// Unresolved step name.
        name: String,
    },
    /// A factory was registered twice under one name.
    #[error("step factory {name:?} registered twice")]
    DuplicateFactory {
        /// Repeated factory name.
        name: String,
    },
    /// The engine settings failed validation.
    #[error(transparent)]
    Settings(#[from] SettingsError),
    /// Scenario composition failed.
    #[error(transparent)]
    Scenario(#[from] ScenarioError),
}

// ============================================================================
// SECTION: Shared-State Bundle
// ============================================================================

/// Shared pipeline state handed to step factories.
///
/// # Invariants
/// - Handles are single-threaded; only designated steps take mutable
///   borrows, and never across a step boundary.
#[derive(Clone)]
pub struct StepBindings {
    /// Window store shared by the evaluator (reads) and updater (writes).
    pub windows: Rc<RefCell<WindowStore>>,
    /// Prime oracle shared with the feature step.
    pub primes: Rc<RefCell<PrimeOracle>>,
    /// Decision sink used by the write step.
    pub sink: Rc<RefCell<dyn DecisionSink>>,
}

impl StepBindings {
    /// Creates a bundle over fresh window and prime state.
    #[must_use]
    pub fn new(sink: Rc<RefCell<dyn DecisionSink>>) -> Self {
        Self {
            windows: Rc::new(RefCell::new(WindowStore::new())),
            primes: Rc::new(RefCell::new(PrimeOracle::new())),
            sink,
        }
    }
}

// ============================================================================
// SECTION: Step Factories
// ============================================================================

/// Factory producing one bound step from settings and shared state.
pub type StepFactory = Box<dyn Fn(&EngineSettings, &StepBindings) -> Box<dyn Step>>;

/// Registry of step factories keyed by stable step name.
pub struct StepRegistry {
    /// Registered factories.
    factories: BTreeMap<String, StepFactory>,
}

impl StepRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            factories: BTreeMap::new(),
        }
    }

    /// Creates a registry with every built-in step registered.
    ///
    /// Built-in registration cannot collide; names are distinct constants.
    #[must_use]
    pub fn with_builtin_steps() -> Self {
        let mut registry = Self::new();
        let builtins: [(&str, StepFactory); 8] = [
            (steps::parse::NAME, Box::new(|_, _| Box::new(steps::parse::ParseStep::new()))),
            (
                steps::time_keys::NAME,
                Box::new(|settings, _| {
                    Box::new(steps::time_keys::TimeKeysStep::new(settings.week_start))
                }),
            ),
            (
                steps::idempotency::NAME,
                Box::new(|_, _| Box::new(steps::idempotency::IdempotencyGateStep::new())),
            ),
            (
                steps::features::NAME,
                Box::new(|settings, bindings| {
                    Box::new(steps::features::FeatureStep::new(
                        settings.multiplier,
                        settings.prime_gate.enabled,
                        Rc::clone(&bindings.primes),
                    ))
                }),
            ),
            (
                steps::evaluate::NAME,
                Box::new(|settings, bindings| {
                    Box::new(steps::evaluate::PolicyEvaluatorStep::new(
                        settings.limits,
                        settings.prime_gate,
                        Rc::clone(&bindings.windows),
                    ))
                }),
            ),
            (
                steps::update::NAME,
                Box::new(|settings, bindings| {
                    Box::new(steps::update::WindowUpdateStep::new(
                        settings.prime_gate.enabled,
                        Rc::clone(&bindings.windows),
                    ))
                }),
            ),
            (
                steps::format::NAME,
                Box::new(|_, _| Box::new(steps::format::FormatStep::new())),
            ),
            (
                steps::write::NAME,
                Box::new(|_, bindings| {
                    Box::new(steps::write::WriteStep::new(Rc::clone(&bindings.sink)))
                }),
            ),
        ];
        for (name, factory) in builtins {
            registry.factories.insert(name.to_string(), factory);
        }
        registry
    }

    /// Registers a factory under a stable name.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::DuplicateFactory`] when the name is taken.
    pub fn register(&mut self, name: &str, factory: StepFactory) -> Result<(), BuildError> {
        if self.factories.contains_key(name) {
            return Err(BuildError::DuplicateFactory {
                name: name.to_string(),
            });
        }
        self.factories.insert(name.to_string(), factory);
        Ok(())
    }

    /// Builds a scenario from an ordered plan of step names.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError`] on unknown names, invalid settings, or
    /// scenario composition failures.
    pub fn build_scenario(
        &self,
        plan: &[String],
        settings: &EngineSettings,
        bindings: &StepBindings,
    ) -> Result<Scenario, BuildError> {
        settings.validate()?;
        let mut builder = ScenarioBuilder::new();
        for name in plan {
            let factory = self
                .factories
                .get(name)
                .ok_or_else(|| BuildError::UnknownStep {
                    name: name.clone(),
                })?;
            builder = builder.push(factory(settings, bindings));
        }
        Ok(builder.build()?)
    }
}

impl Default for StepRegistry {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// SECTION: Default Plan
// ============================================================================

/// Returns the canonical eight-step adjudication plan.
#[must_use]
pub fn default_plan() -> Vec<String> {
    vec![
        steps::parse::NAME.to_string(),
        steps::time_keys::NAME.to_string(),
        steps::idempotency::NAME.to_string(),
        steps::features::NAME.to_string(),
        steps::evaluate::NAME.to_string(),
        steps::update::NAME.to_string(),
        steps::format::NAME.to_string(),
        steps::write::NAME.to_string(),
    ]
}
