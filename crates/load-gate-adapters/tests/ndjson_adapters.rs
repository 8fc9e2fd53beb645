// crates/load-gate-adapters/tests/ndjson_adapters.rs
// ============================================================================
// Module: NDJSON Adapter Tests
// Description: File source numbering, sink atomicity, and trace output.
// Purpose: Ensure the filesystem adapters honor the port contracts.
// Dependencies: load-gate-adapters, load-gate-core, serde_json, tempfile
// ============================================================================

//! ## Overview
//! Verifies gapless line numbering over messy input files, the
//! temp-and-rename commit protocol of the decision sink, and NDJSON trace
//! serialization.

#![allow(
    clippy::panic,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only output and panic-based assertions are permitted."
)]

use std::fs;
use std::path::PathBuf;

use load_gate_adapters::NdjsonFileSink;
use load_gate_adapters::NdjsonFileSource;
use load_gate_adapters::NdjsonTraceSink;
use load_gate_core::DecisionSink;
use load_gate_core::FormattedRow;
use load_gate_core::RecordSource;
use load_gate_core::SinkError;
use load_gate_core::TraceRecord;
use load_gate_core::TraceSink;

/// Writes an input file and returns its path.
fn write_input(dir: &tempfile::TempDir, text: &str) -> PathBuf {
    let path = dir.path().join("input.ndjson");
    fs::write(&path, text).expect("write input");
    path
}

/// Drains a source into (line_no, text) pairs.
fn drain(source: &mut NdjsonFileSource) -> Vec<(u64, String)> {
    let mut lines = Vec::new();
    while let Some(raw) = source.next_line().expect("read") {
        lines.push((raw.line_no, raw.text));
    }
    lines
}

/// Builds a formatted row for sink tests.
fn sample_row(line_no: u64, id: u32) -> FormattedRow {
    FormattedRow {
        line_no,
        json: format!(r#"{{"id":"{id}","customer_id":"1","accepted":true}}"#),
    }
}

#[test]
fn source_assigns_gapless_one_based_line_numbers() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = write_input(&dir, "{\"a\":1}\n{\"b\":2}\n{\"c\":3}\n");
    let mut source = NdjsonFileSource::open(&path).expect("open");

    let lines = drain(&mut source);
    assert_eq!(
        lines,
        vec![
            (1, "{\"a\":1}".to_string()),
            (2, "{\"b\":2}".to_string()),
            (3, "{\"c\":3}".to_string()),
        ]
    );
}

#[test]
fn source_skips_whitespace_only_lines_without_consuming_numbers() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = write_input(&dir, "first\n\n   \nsecond\n");
    let mut source = NdjsonFileSource::open(&path).expect("open");

    let lines = drain(&mut source);
    assert_eq!(lines, vec![(1, "first".to_string()), (2, "second".to_string())]);
}

#[test]
fn source_accepts_a_missing_trailing_newline() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = write_input(&dir, "first\nsecond");
    let mut source = NdjsonFileSource::open(&path).expect("open");

    let lines = drain(&mut source);
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[1], (2, "second".to_string()));
}

#[test]
fn source_strips_carriage_returns() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = write_input(&dir, "first\r\nsecond\r\n");
    let mut source = NdjsonFileSource::open(&path).expect("open");

    let lines = drain(&mut source);
    assert_eq!(lines, vec![(1, "first".to_string()), (2, "second".to_string())]);
}

#[test]
fn source_open_fails_for_missing_files() {
    let dir = tempfile::tempdir().expect("tempdir");
    assert!(NdjsonFileSource::open(&dir.path().join("absent")).is_err());
}

#[test]
fn atomic_sink_exposes_the_final_path_only_after_finish() {
    let dir = tempfile::tempdir().expect("tempdir");
    let output = dir.path().join("output.ndjson");
    let temp = dir.path().join("output.ndjson.tmp");

    let mut sink = NdjsonFileSink::create(&output, true).expect("create");
    sink.write_line(&sample_row(1, 1)).expect("write");
    sink.write_line(&sample_row(2, 2)).expect("write");
    assert!(temp.exists(), "rows go to the temp path before finish");
    assert!(!output.exists(), "final path must not exist before finish");

    sink.finish().expect("finish");
    assert!(output.exists());
    assert!(!temp.exists(), "temp path is renamed away");

    let written = fs::read_to_string(&output).expect("read output");
    let expected = format!("{}\n{}\n", sample_row(1, 1).json, sample_row(2, 2).json);
    assert_eq!(written, expected);
}

#[test]
fn aborted_atomic_sink_leaves_only_the_temp_file() {
    let dir = tempfile::tempdir().expect("tempdir");
    let output = dir.path().join("output.ndjson");

    let mut sink = NdjsonFileSink::create(&output, true).expect("create");
    sink.write_line(&sample_row(1, 1)).expect("write");
    drop(sink);

    assert!(!output.exists());
    assert!(dir.path().join("output.ndjson.tmp").exists());
}

#[test]
fn non_atomic_sink_writes_the_final_path_directly() {
    let dir = tempfile::tempdir().expect("tempdir");
    let output = dir.path().join("output.ndjson");

    let mut sink = NdjsonFileSink::create(&output, false).expect("create");
    sink.write_line(&sample_row(1, 1)).expect("write");
    assert!(output.exists());
    sink.finish().expect("finish");
    assert!(output.exists());
}

#[test]
fn sink_rejects_use_after_finish() {
    let dir = tempfile::tempdir().expect("tempdir");
    let output = dir.path().join("output.ndjson");

    let mut sink = NdjsonFileSink::create(&output, true).expect("create");
    sink.finish().expect("finish");
    assert!(matches!(sink.write_line(&sample_row(1, 1)), Err(SinkError::AlreadyFinished)));
    assert!(matches!(sink.finish(), Err(SinkError::AlreadyFinished)));
}

#[test]
fn trace_sink_writes_one_json_record_per_line() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("trace.ndjson");

    let mut sink = NdjsonTraceSink::create(&path).expect("create");
    sink.append(&TraceRecord::RunStarted {
        steps: vec!["parse".to_string(), "write_output".to_string()],
    })
    .expect("append");
    sink.append(&TraceRecord::StepStarted {
        seq: 1,
        line_no: 1,
        step: "parse".to_string(),
        input: "raw line 1".to_string(),
    })
    .expect("append");

    let written = fs::read_to_string(&path).expect("read trace");
    let lines: Vec<&str> = written.lines().collect();
    assert_eq!(lines.len(), 2);
    for line in lines {
        let value: serde_json::Value = serde_json::from_str(line).expect("trace json");
        assert!(value.get("event").is_some());
    }
}
