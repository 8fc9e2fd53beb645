// crates/load-gate-core/src/runtime/scenario.rs
// ============================================================================
// Module: Load Gate Scenario
// Description: Immutable ordered sequence of bound pipeline steps.
// Purpose: Validate step composition before any record is processed.
// Dependencies: crate::runtime::step, thiserror
// ============================================================================

//! ## Overview
//! A scenario binds steps in execution order under stable, duplicate-free
//! names. Composition problems (no steps, repeated names) surface at build
//! time, before the first record is read.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeSet;

use thiserror::Error;

use crate::runtime::step::Step;

// ============================================================================
// SECTION: Scenario Errors
// ============================================================================

/// Errors raised while composing a scenario.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScenarioError {
    /// The scenario contained no steps.
    #[error("scenario must contain at least one step")]
    Empty,
    /// A step name appeared more than once.
    #[error("duplicate step name {name:?}")]
    DuplicateStep {
        /// Repeated step name.
        name: String,
    },
}

// ============================================================================
// SECTION: Bound Step
// ============================================================================

/// A step bound into a scenario under its stable name.
pub struct BoundStep {
    /// Stable step name.
    name: String,
    /// Step implementation.
    step: Box<dyn Step>,
}

impl BoundStep {
    /// Returns the stable step name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the step implementation mutably.
    pub fn step_mut(&mut self) -> &mut dyn Step {
        self.step.as_mut()
    }
}

// ============================================================================
// SECTION: Scenario
// ============================================================================

/// Immutable ordered list of bound steps.
///
/// # Invariants
/// - Non-empty; step names are unique.
pub struct Scenario {
    /// Bound steps in execution order.
    steps: Vec<BoundStep>,
}

impl std::fmt::Debug for Scenario {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scenario")
            .field("steps", &self.step_names())
            .finish()
    }
}

impl Scenario {
    /// Returns the number of steps.
    #[must_use]
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Returns true when the scenario holds no steps (never after build).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Returns the ordered step names.
    #[must_use]
    pub fn step_names(&self) -> Vec<String> {
        self.steps.iter().map(|bound| bound.name.clone()).collect()
    }

    /// Returns the bound step at `index` mutably.
    #[must_use]
    pub fn step_at_mut(&mut self, index: usize) -> Option<&mut BoundStep> {
        self.steps.get_mut(index)
    }
}

// ============================================================================
// SECTION: Scenario Builder
// ============================================================================

/// Builder collecting steps in execution order.
#[derive(Default)]
pub struct ScenarioBuilder {
    /// Collected steps in push order.
    steps: Vec<BoundStep>,
}

impl ScenarioBuilder {
    /// Creates an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a step under its own stable name.
    #[must_use]
    pub fn push(mut self, step: Box<dyn Step>) -> Self {
        let name = step.name().to_string();
        self.steps.push(BoundStep {
            name,
            step,
        });
        self
    }

    /// Validates and builds the scenario.
    ///
    /// # Errors
    ///
    /// Returns [`ScenarioError`] when the scenario is empty or a step name
    /// repeats.
    pub fn build(self) -> Result<Scenario, ScenarioError> {
        if self.steps.is_empty() {
            return Err(ScenarioError::Empty);
        }
        let mut seen = BTreeSet::new();
        for bound in &self.steps {
            if !seen.insert(bound.name.clone()) {
                return Err(ScenarioError::DuplicateStep {
                    name: bound.name.clone(),
                });
            }
        }
        Ok(Scenario {
            steps: self.steps,
        })
    }
}
