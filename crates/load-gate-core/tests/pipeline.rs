// crates/load-gate-core/tests/pipeline.rs
// ============================================================================
// Module: Pipeline Scenario Tests
// Description: End-to-end adjudication runs over the canonical composition.
// Purpose: Validate the documented scenarios and universal invariants.
// Dependencies: load-gate-core
// ============================================================================

//! ## Overview
//! Runs the full eight-step scenario over in-memory adapters: velocity
//! limits, duplicate handling, the Monday multiplier with the prime gate,
//! week boundaries, parse failures, and determinism across reruns.

#![allow(
    clippy::panic,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only output and panic-based assertions are permitted."
)]

use std::cell::RefCell;
use std::rc::Rc;

use load_gate_core::DecisionSink;
use load_gate_core::EngineSettings;
use load_gate_core::FailurePolicy;
use load_gate_core::MemorySink;
use load_gate_core::MemorySource;
use load_gate_core::Money;
use load_gate_core::NoopObserver;
use load_gate_core::PipelineRunner;
use load_gate_core::PrimeGateSettings;
use load_gate_core::ReasonCode;
use load_gate_core::RunReport;
use load_gate_core::StepBindings;
use load_gate_core::StepRegistry;
use load_gate_core::default_plan;

/// Runs the canonical composition over the given lines.
fn run_pipeline(settings: &EngineSettings, lines: &[String]) -> (RunReport, Vec<String>) {
    let sink = Rc::new(RefCell::new(MemorySink::new()));
    let sink_clone: Rc<RefCell<MemorySink>> = Rc::clone(&sink);
    let dyn_sink: Rc<RefCell<dyn DecisionSink>> = sink_clone;
    let bindings = StepBindings::new(dyn_sink);
    let registry = StepRegistry::with_builtin_steps();
    let scenario = registry
        .build_scenario(&default_plan(), settings, &bindings)
        .expect("scenario");
    let mut runner = PipelineRunner::new(scenario, Box::new(NoopObserver), FailurePolicy::default());
    let mut source = MemorySource::from_lines(lines.iter().cloned());

    let report = runner.run(&mut source).expect("run");
    sink.borrow_mut().finish().expect("finish");
    let rows = sink.borrow().rows().iter().map(|row| row.json.clone()).collect();
    (report, rows)
}

/// Builds one input line in the external record schema.
fn line(id: &str, customer: &str, amount: &str, time: &str) -> String {
    format!(
        r#"{{"id":"{id}","customer_id":"{customer}","load_amount":"{amount}","time":"{time}"}}"#
    )
}

/// Builds one expected output row in the external contract.
fn row(id: &str, customer: &str, accepted: bool) -> String {
    format!(r#"{{"id":"{id}","customer_id":"{customer}","accepted":{accepted}}}"#)
}

/// Experimental settings: Monday multiplier x2 and the prime gate enabled.
fn experimental_settings() -> EngineSettings {
    let mut settings = EngineSettings::default();
    settings.multiplier.enabled = true;
    settings.prime_gate = PrimeGateSettings {
        enabled: true,
        global_per_day: 1,
        amount_cap: Money::from_minor_units(999_900),
    };
    settings
}

#[test]
fn three_approvals_then_attempt_limit_decline() {
    let lines = vec![
        line("1", "1", "$2000.00", "2000-01-04T01:00:00Z"),
        line("2", "1", "$2000.00", "2000-01-04T02:00:00Z"),
        line("3", "1", "$1000.00", "2000-01-04T03:00:00Z"),
        line("4", "1", "$1.00", "2000-01-04T04:00:00Z"),
    ];
    let (report, rows) = run_pipeline(&EngineSettings::default(), &lines);
    assert_eq!(
        rows,
        vec![
            row("1", "1", true),
            row("2", "1", true),
            row("3", "1", true),
            row("4", "1", false),
        ]
    );
    assert_eq!(report.decline_reasons.get(&ReasonCode::DailyAttemptLimit), Some(&1));
}

#[test]
fn daily_amount_boundary_is_exact_to_the_minor_unit() {
    let lines = vec![
        line("1", "2", "$4999.99", "2000-01-04T01:00:00Z"),
        line("2", "2", "$0.02", "2000-01-04T02:00:00Z"),
    ];
    let (report, rows) = run_pipeline(&EngineSettings::default(), &lines);
    assert_eq!(rows, vec![row("1", "2", true), row("2", "2", false)]);
    assert_eq!(report.decline_reasons.get(&ReasonCode::DailyAmountLimit), Some(&1));
}

#[test]
fn duplicate_replay_declines_and_leaves_windows_unchanged() {
    // If the replay counted toward the daily sum, line 4 would decline.
    let lines = vec![
        line("15337", "528", "$4999.99", "2000-01-04T01:00:00Z"),
        line("20", "999", "$1.00", "2000-01-04T02:00:00Z"),
        line("15337", "528", "$4999.99", "2000-01-04T01:00:00Z"),
        line("21", "528", "$0.01", "2000-01-04T03:00:00Z"),
    ];
    let (report, rows) = run_pipeline(&EngineSettings::default(), &lines);
    assert_eq!(
        rows,
        vec![
            row("15337", "528", true),
            row("20", "999", true),
            row("15337", "528", false),
            row("21", "528", true),
        ]
    );
    assert_eq!(report.decline_reasons.get(&ReasonCode::IdDuplicateReplay), Some(&1));
}

#[test]
fn duplicate_conflict_declines_and_canonical_stands() {
    let lines = vec![
        line("15337", "528", "$100.00", "2000-01-04T01:00:00Z"),
        line("15337", "528", "$500.00", "2000-01-04T02:00:00Z"),
    ];
    let (report, rows) = run_pipeline(&EngineSettings::default(), &lines);
    assert_eq!(rows, vec![row("15337", "528", true), row("15337", "528", false)]);
    assert_eq!(report.decline_reasons.get(&ReasonCode::IdDuplicateConflict), Some(&1));
}

#[test]
fn replays_do_not_consume_the_attempt_budget() {
    let lines = vec![
        line("1", "7", "$100.00", "2000-01-04T01:00:00Z"),
        line("1", "7", "$100.00", "2000-01-04T01:00:00Z"),
        line("1", "7", "$100.00", "2000-01-04T01:00:00Z"),
        line("1", "7", "$100.00", "2000-01-04T01:00:00Z"),
        line("2", "7", "$100.00", "2000-01-04T02:00:00Z"),
        line("3", "7", "$100.00", "2000-01-04T03:00:00Z"),
    ];
    let (_, rows) = run_pipeline(&EngineSettings::default(), &lines);
    assert_eq!(
        rows,
        vec![
            row("1", "7", true),
            row("1", "7", false),
            row("1", "7", false),
            row("1", "7", false),
            row("2", "7", true),
            row("3", "7", true),
        ]
    );
}

#[test]
fn monday_multiplier_feeds_the_prime_gate() {
    // 2000-01-03 is a Monday: amounts double before the cap check.
    let lines = vec![
        line("7919", "1", "$5000.00", "2000-01-03T01:00:00Z"),
        line("104729", "2", "$1000.00", "2000-01-03T02:00:00Z"),
        line("1299709", "3", "$1000.00", "2000-01-03T03:00:00Z"),
    ];
    let (report, rows) = run_pipeline(&experimental_settings(), &lines);
    assert_eq!(
        rows,
        vec![
            row("7919", "1", false),
            row("104729", "2", true),
            row("1299709", "3", false),
        ]
    );
    assert_eq!(report.decline_reasons.get(&ReasonCode::PrimeAmountCap), Some(&1));
    assert_eq!(
        report.decline_reasons.get(&ReasonCode::PrimeDailyGlobalLimit),
        Some(&1)
    );
}

#[test]
fn sunday_and_monday_live_in_different_weekly_buckets() {
    // Five Monday-week days fill the weekly limit exactly; the Sunday load
    // before them belongs to the previous week and must not count.
    let lines = vec![
        line("1", "9", "$5000.00", "2000-01-02T12:00:00Z"),
        line("2", "9", "$5000.00", "2000-01-03T12:00:00Z"),
        line("3", "9", "$5000.00", "2000-01-04T12:00:00Z"),
        line("4", "9", "$5000.00", "2000-01-05T12:00:00Z"),
        line("5", "9", "$5000.00", "2000-01-06T12:00:00Z"),
        line("6", "9", "$0.01", "2000-01-07T12:00:00Z"),
    ];
    let (report, rows) = run_pipeline(&EngineSettings::default(), &lines);
    assert_eq!(
        rows,
        vec![
            row("1", "9", true),
            row("2", "9", true),
            row("3", "9", true),
            row("4", "9", true),
            row("5", "9", true),
            row("6", "9", false),
        ]
    );
    assert_eq!(report.decline_reasons.get(&ReasonCode::WeeklyAmountLimit), Some(&1));
}

#[test]
fn parse_failures_produce_declined_rows_in_place() {
    let lines = vec![
        "not json".to_string(),
        r#"{"id":"1","customer_id":"2","load_amount":"$1.00"}"#.to_string(),
        line("x1", "2", "$1.00", "2000-01-04T01:00:00Z"),
        line("3", "2", "$1.00", "not-a-time"),
        line("4", "2", "one dollar", "2000-01-04T02:00:00Z"),
        line("5", "2", "$1.00", "2000-01-04T03:00:00Z"),
    ];
    let (report, rows) = run_pipeline(&EngineSettings::default(), &lines);
    assert_eq!(
        rows,
        vec![
            row("", "", false),
            row("1", "2", false),
            row("", "2", false),
            row("3", "2", false),
            row("4", "2", false),
            row("5", "2", true),
        ]
    );
    assert_eq!(report.decline_reasons.get(&ReasonCode::ParseJson), Some(&1));
    assert_eq!(report.decline_reasons.get(&ReasonCode::SchemaFieldMissing), Some(&1));
    assert_eq!(report.decline_reasons.get(&ReasonCode::InvalidId), Some(&1));
    assert_eq!(report.decline_reasons.get(&ReasonCode::InvalidTime), Some(&1));
    assert_eq!(report.decline_reasons.get(&ReasonCode::InvalidAmountFormat), Some(&1));
}

#[test]
fn output_line_count_always_matches_input_line_count() {
    let lines = vec![
        line("1", "1", "$1.00", "2000-01-04T01:00:00Z"),
        "garbage".to_string(),
        line("1", "1", "$1.00", "2000-01-04T01:00:00Z"),
        line("2", "1", "$9999999.00", "2000-01-04T02:00:00Z"),
    ];
    let (report, rows) = run_pipeline(&EngineSettings::default(), &lines);
    assert_eq!(rows.len(), lines.len());
    assert_eq!(report.records_in, 4);
    assert_eq!(report.records_out, 4);
    assert_eq!(report.accepted + report.declined, report.records_in);
}

#[test]
fn reruns_are_byte_identical() {
    let lines = vec![
        line("1", "1", "$2000.00", "2000-01-04T01:00:00Z"),
        line("15337", "528", "USD100.00", "2000-01-04T02:00:00Z"),
        line("15337", "528", "USD100.00", "2000-01-04T02:00:00Z"),
        "broken".to_string(),
        line("4", "1", "$4000.00", "2000-01-04T03:00:00Z"),
    ];
    let (first_report, first_rows) = run_pipeline(&EngineSettings::default(), &lines);
    let (second_report, second_rows) = run_pipeline(&EngineSettings::default(), &lines);
    assert_eq!(first_rows, second_rows);
    assert_eq!(first_report, second_report);
}

#[test]
fn report_counts_match_the_emitted_rows() {
    let lines = vec![
        line("1", "1", "$2000.00", "2000-01-04T01:00:00Z"),
        line("2", "1", "$9999.00", "2000-01-04T02:00:00Z"),
        line("3", "1", "$1.00", "2000-01-04T03:00:00Z"),
    ];
    let (report, rows) = run_pipeline(&EngineSettings::default(), &lines);
    let accepted_rows = rows.iter().filter(|row| row.contains("true")).count();
    let declined_rows = rows.iter().filter(|row| row.contains("false")).count();
    assert_eq!(report.accepted, u64::try_from(accepted_rows).expect("count"));
    assert_eq!(report.declined, u64::try_from(declined_rows).expect("count"));
}
