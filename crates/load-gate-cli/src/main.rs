// crates/load-gate-cli/src/main.rs
// ============================================================================
// Module: Load Gate CLI Entry Point
// Description: Command-line surface and composition root for the engine.
// Purpose: Wire configuration, adapters, and the pipeline into one run.
// Dependencies: clap, load-gate-adapters, load-gate-config, load-gate-core,
// thiserror
// ============================================================================

//! ## Overview
//! The CLI loads a validated configuration, composes the canonical scenario
//! over file adapters, runs the pipeline, and commits the output sink. Exit
//! code 0 means every input record produced an output line; any startup or
//! run failure exits non-zero with the cause on stderr. Tracing is opt-in
//! and requires an explicit trace path.

// ============================================================================
// SECTION: Modules
// ============================================================================


// ============================================================================
// SECTION: Imports
// ============================================================================

use std::cell::RefCell;
use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;
use std::rc::Rc;

use clap::ArgAction;
use clap::Parser;
use clap::ValueEnum;
use load_gate_adapters::NdjsonFileSink;
use load_gate_adapters::NdjsonFileSource;
use load_gate_adapters::NdjsonTraceSink;
use load_gate_config::EngineConfig;
use load_gate_core::DecisionSink;
use load_gate_core::FailurePolicy;
use load_gate_core::NoopObserver;
use load_gate_core::PipelineRunner;
use load_gate_core::RunReport;
use load_gate_core::SinkObserver;
use load_gate_core::StepBindings;
use load_gate_core::StepRegistry;
use load_gate_core::TraceObserver;
use load_gate_core::default_plan;
use thiserror::Error;

// ============================================================================
// SECTION: CLI Errors
// ============================================================================

/// Error surfaced to the operator with a non-zero exit code.
#[derive(Debug, Error)]
#[error("{message}")]
struct CliError {
    /// Human-readable failure description.
    message: String,
}

impl CliError {
    /// Creates an error from a message.
    fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Result alias for CLI operations.
type CliResult<T> = Result<T, CliError>;

// ============================================================================
// SECTION: CLI Types
// ============================================================================

/// Tracing switch values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum TracingMode {
    /// Write trace records to the configured trace path.
    Enable,
    /// Record no traces.
    Disable,
}

/// Top-level CLI definition.
#[derive(Parser, Debug)]
#[command(name = "load-gate", disable_version_flag = true)]
struct Cli {
    /// Print version information and exit.
    #[arg(long = "version", action = ArgAction::SetTrue)]
    show_version: bool,
    /// Configuration file path.
    #[arg(long, value_name = "PATH", required_unless_present = "show_version")]
    config: Option<PathBuf>,
    /// Input NDJSON file path.
    #[arg(long, value_name = "PATH", required_unless_present = "show_version")]
    input: Option<PathBuf>,
    /// Output file path, overriding `output.file_path`.
    #[arg(long, value_name = "PATH")]
    output: Option<PathBuf>,
    /// Tracing switch.
    #[arg(long, value_enum, default_value = "disable")]
    tracing: TracingMode,
    /// Trace NDJSON file path; required when tracing is enabled.
    #[arg(long = "trace-path", value_name = "PATH")]
    trace_path: Option<PathBuf>,
}

// ============================================================================
// SECTION: Run Plan
// ============================================================================

/// Resolved inputs for one pipeline run.
#[derive(Debug, Clone)]
struct RunPlan {
    /// Configuration file path.
    config: PathBuf,
    /// Input file path.
    input: PathBuf,
    /// Output override, when given.
    output: Option<PathBuf>,
    /// Tracing switch.
    tracing: TracingMode,
    /// Trace file path, when given.
    trace_path: Option<PathBuf>,
}

/// Outcome of one pipeline run.
#[derive(Debug)]
struct RunOutcome {
    /// Final run report.
    report: RunReport,
    /// Path the output was committed to.
    output_path: PathBuf,
}

// ============================================================================
// SECTION: Entry Point
// ============================================================================

/// CLI entry point returning an exit code.
fn main() -> ExitCode {
    match run() {
        Ok(code) => code,
        Err(err) => {
            let _ = write_stderr_line(&format!("error: {err}"));
            ExitCode::FAILURE
        }
    }
}

/// Executes the CLI dispatcher.
fn run() -> CliResult<ExitCode> {
    let cli = Cli::parse();
    if cli.show_version {
        let version = env!("CARGO_PKG_VERSION");
        write_stdout_line(&format!("load-gate {version}"))
            .map_err(|err| CliError::new(format!("stdout write failed: {err}")))?;
        return Ok(ExitCode::SUCCESS);
    }

    let plan = resolve_plan(cli)?;
    let outcome = execute_run(&plan)?;
    let report = &outcome.report;
    write_stderr_line(&format!(
        "processed {} records: {} accepted, {} declined -> {}",
        report.records_in,
        report.accepted,
        report.declined,
        outcome.output_path.display()
    ))
    .map_err(|err| CliError::new(format!("stderr write failed: {err}")))?;
    Ok(ExitCode::SUCCESS)
}

// ============================================================================
// SECTION: Composition Root
// ============================================================================

/// Resolves parsed arguments into a run plan.
fn resolve_plan(cli: Cli) -> CliResult<RunPlan> {
    let Some(config) = cli.config else {
        return Err(CliError::new("--config is required"));
    };
    let Some(input) = cli.input else {
        return Err(CliError::new("--input is required"));
    };
    if cli.tracing == TracingMode::Enable && cli.trace_path.is_none() {
        return Err(CliError::new("--tracing enable requires --trace-path"));
    }
    Ok(RunPlan {
        config,
        input,
        output: cli.output,
        tracing: cli.tracing,
        trace_path: cli.trace_path,
    })
}

/// Composes the pipeline from a run plan and executes it.
fn execute_run(plan: &RunPlan) -> CliResult<RunOutcome> {
    let config = EngineConfig::load(&plan.config)
        .map_err(|err| CliError::new(format!("configuration error: {err}")))?;
    let settings = config
        .engine_settings()
        .map_err(|err| CliError::new(format!("configuration error: {err}")))?;

    let output_path = plan
        .output
        .clone()
        .unwrap_or_else(|| PathBuf::from(&config.output.file_path));
    let mut source = NdjsonFileSource::open(&plan.input)
        .map_err(|err| CliError::new(format!("input error: {err}")))?;
    let sink = NdjsonFileSink::create(&output_path, config.output.atomic_replace)
        .map_err(|err| CliError::new(format!("output error: {err}")))?;
    let sink = Rc::new(RefCell::new(sink));

    let observer = build_observer(plan)?;
    let sink_clone: Rc<RefCell<NdjsonFileSink>> = Rc::clone(&sink);
    let dyn_sink: Rc<RefCell<dyn DecisionSink>> = sink_clone;
    let bindings = StepBindings::new(dyn_sink);
    let registry = StepRegistry::with_builtin_steps();
    let scenario = registry
        .build_scenario(&default_plan(), &settings, &bindings)
        .map_err(|err| CliError::new(format!("composition error: {err}")))?;

    let mut runner = PipelineRunner::new(scenario, observer, FailurePolicy::default());
    let report = runner
        .run(&mut source)
        .map_err(|err| CliError::new(format!("run failed: {err}")))?;
    sink.borrow_mut()
        .finish()
        .map_err(|err| CliError::new(format!("output commit failed: {err}")))?;

    Ok(RunOutcome {
        report,
        output_path,
    })
}

/// Builds the trace observer selected by the plan.
fn build_observer(plan: &RunPlan) -> CliResult<Box<dyn TraceObserver>> {
    match plan.tracing {
        TracingMode::Disable => Ok(Box::new(NoopObserver)),
        TracingMode::Enable => {
            let Some(trace_path) = &plan.trace_path else {
                return Err(CliError::new("--tracing enable requires --trace-path"));
            };
            let sink = NdjsonTraceSink::create(trace_path)
                .map_err(|err| CliError::new(format!("trace error: {err}")))?;
            Ok(Box::new(SinkObserver::new(Rc::new(RefCell::new(sink)))))
        }
    }
}

// ============================================================================
// SECTION: Output Helpers
// ============================================================================

/// Writes a single line to stdout.
fn write_stdout_line(message: &str) -> std::io::Result<()> {
    let mut stdout = std::io::stdout();
    writeln!(&mut stdout, "{message}")
}

/// Writes a single line to stderr.
fn write_stderr_line(message: &str) -> std::io::Result<()> {
    let mut stderr = std::io::stderr();
    writeln!(&mut stderr, "{message}")
}
