// crates/load-gate-core/examples/minimal.rs
// ============================================================================
// Module: Load Gate Minimal Example
// Description: Minimal end-to-end adjudication run using in-memory adapters.
// Purpose: Demonstrate composing and running the canonical scenario.
// Dependencies: load-gate-core
// ============================================================================

//! ## Overview
//! Runs the canonical eight-step scenario over in-memory adapters with the
//! baseline settings. This example is adapter-agnostic and suitable for
//! quick verification.

use std::cell::RefCell;
use std::rc::Rc;

use load_gate_core::DecisionSink;
use load_gate_core::EngineSettings;
use load_gate_core::FailurePolicy;
use load_gate_core::MemorySink;
use load_gate_core::MemorySource;
use load_gate_core::NoopObserver;
use load_gate_core::PipelineRunner;
use load_gate_core::StepBindings;
use load_gate_core::StepRegistry;
use load_gate_core::default_plan;

/// Error type for example preconditions.
#[derive(Debug)]
struct ExampleError(&'static str);

impl std::fmt::Display for ExampleError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

impl std::error::Error for ExampleError {}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let settings = EngineSettings::default();
    let sink = Rc::new(RefCell::new(MemorySink::new()));
    let sink_clone: Rc<RefCell<MemorySink>> = Rc::clone(&sink);
    let dyn_sink: Rc<RefCell<dyn DecisionSink>> = sink_clone;
    let bindings = StepBindings::new(dyn_sink);

    let registry = StepRegistry::with_builtin_steps();
    let scenario = registry.build_scenario(&default_plan(), &settings, &bindings)?;
    let mut runner =
        PipelineRunner::new(scenario, Box::new(NoopObserver), FailurePolicy::default());

    let mut source = MemorySource::from_lines([
        r#"{"id":"1","customer_id":"528","load_amount":"$3000.00","time":"2000-01-04T01:00:00Z"}"#,
        r#"{"id":"2","customer_id":"528","load_amount":"$3000.00","time":"2000-01-04T02:00:00Z"}"#,
    ]);

    let report = runner.run(&mut source)?;
    sink.borrow_mut().finish()?;

    if report.records_out != 2 {
        return Err(Box::new(ExampleError("expected one output row per input")));
    }
    if report.accepted != 1 || report.declined != 1 {
        return Err(Box::new(ExampleError("expected one accept and one decline")));
    }
    Ok(())
}
