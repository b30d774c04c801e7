//! File-level extraction tests.

use mapalign_extract::{
    extract, extract_to_files, ConnectivityMatcher, ExtractError, MarkerMatcher, ReportPaths,
};
use mapalign_test_utils::{assert_err, assert_ok, read_lines, stamped, temp_dir, temp_file, write_log};
use std::fs;

fn paths(dir: &std::path::Path, name: &str) -> ReportPaths {
    ReportPaths::new(
        dir.join(format!("output/{name}_missing.csv")),
        dir.join(format!("output/{name}_rendered.csv")),
    )
}

#[test]
fn test_reference_scenario_reports() {
    let dir = temp_dir();
    let log = write_log(
        dir.path(),
        "log/rat.log",
        &[
            "RESOLVED foo -> node42",
            "MISSING bar",
            "some unrelated diagnostic text",
            "RESOLVED bar -> node7",
        ],
    );
    let paths = paths(dir.path(), "rat");

    extract_to_files(&log, &paths, &MarkerMatcher::new()).unwrap();

    assert_eq!(read_lines(&paths.missing), vec!["term_id,context"]);
    assert_eq!(
        read_lines(&paths.rendered),
        vec![
            "term_id,rendered_id,kind,context",
            "foo,node42,node,",
            "bar,node7,node,",
        ]
    );
}

#[test]
fn test_empty_log_creates_header_only_reports() {
    let dir = temp_dir();
    let log = write_log(dir.path(), "log/female.log", &[]);
    let paths = paths(dir.path(), "female").with_summary(dir.path().join("output/female_summary.csv"));

    let extraction = extract_to_files(&log, &paths, &MarkerMatcher::new()).unwrap();

    assert_eq!(extraction.lines, 0);
    assert_eq!(read_lines(&paths.missing), vec!["term_id,context"]);
    assert_eq!(read_lines(&paths.rendered), vec!["term_id,rendered_id,kind,context"]);
    assert_eq!(
        read_lines(paths.summary.as_ref().unwrap()),
        vec!["context,completeness,missing,rendered,missing_edges,missing_segments"]
    );
}

#[test]
fn test_missing_log_is_unreadable() {
    let dir = temp_dir();
    let paths = paths(dir.path(), "male");

    let err = assert_err!(extract_to_files(
        dir.path().join("log/male.log"),
        &paths,
        &MarkerMatcher::new()
    ));

    assert!(matches!(err, ExtractError::LogUnreadable { .. }));
    assert!(!paths.missing.exists());
    assert!(!paths.rendered.exists());
}

#[test]
fn test_reports_are_replaced_not_appended() {
    let dir = temp_dir();
    let paths = paths(dir.path(), "rat");
    let first = write_log(dir.path(), "first.log", &["MISSING a", "MISSING b"]);
    let second = write_log(dir.path(), "second.log", &["MISSING c"]);

    extract_to_files(&first, &paths, &MarkerMatcher::new()).unwrap();
    extract_to_files(&second, &paths, &MarkerMatcher::new()).unwrap();

    assert_eq!(read_lines(&paths.missing), vec!["term_id,context", "c,"]);
}

#[test]
fn test_rerun_is_byte_identical() {
    let dir = temp_dir();
    let log = write_log(
        dir.path(),
        "rat.log",
        &[
            "MISSING z @ p2",
            "RESOLVED y -> n1 [edge] @ p1",
            "MISSING x,y",
            "RESOLVED w -> n2",
            "MISSING z @ p1",
        ],
    );
    let paths = paths(dir.path(), "rat");

    extract_to_files(&log, &paths, &MarkerMatcher::new()).unwrap();
    let missing = fs::read(&paths.missing).unwrap();
    let rendered = fs::read(&paths.rendered).unwrap();

    extract_to_files(&log, &paths, &MarkerMatcher::new()).unwrap();
    assert_eq!(fs::read(&paths.missing).unwrap(), missing);
    assert_eq!(fs::read(&paths.rendered).unwrap(), rendered);
}

#[test]
fn test_last_line_without_newline() {
    let (_dir, log) = temp_file("MISSING a\nRESOLVED b -> n1");

    let extraction = assert_ok!(extract(&log, &MarkerMatcher::new()));

    assert_eq!(extraction.lines, 2);
    assert_eq!(extraction.rendered[0].term_id, "b");
    assert_eq!(extraction.rendered[0].line, 2);
}

#[test]
fn test_invalid_utf8_is_tolerated() {
    let dir = temp_dir();
    let log = dir.path().join("binary.log");
    fs::write(&log, b"\xff\xfe garbage\nMISSING bar\n").unwrap();

    let extraction = extract(&log, &MarkerMatcher::new()).unwrap();

    assert_eq!(extraction.lines, 2);
    assert_eq!(extraction.missing[0].term_id, "bar");
    assert_eq!(extraction.missing[0].line, 2);
}

#[test]
fn test_connectivity_log_with_summary() {
    let dir = temp_dir();
    let lines: Vec<String> = [
        "Cannot find feature for connectivity node ('UBERON:9', ()) (bladder)",
        "* * ilxtr:neuron-type-1: Partial",
        "- - missing_nodes: [('UBERON:9', ())]",
        "- - missing_edges: [(('UBERON:9', ()), ('UBERON:2', ()))]",
        "- - rendered_edges: [(('UBERON:2', ()), ('UBERON:3', ()))]",
        "* * ilxtr:neuron-type-2: Complete",
        "- - rendered_nodes: [('UBERON:2', ()), ('UBERON:3', ())]",
    ]
    .iter()
    .map(|line| stamped(line))
    .collect();
    let lines: Vec<&str> = lines.iter().map(String::as_str).collect();
    let log = write_log(dir.path(), "log/rat.log", &lines);
    let paths = paths(dir.path(), "rat").with_summary(dir.path().join("output/rat_summary.csv"));

    extract_to_files(&log, &paths, &ConnectivityMatcher::new()).unwrap();

    assert_eq!(
        read_lines(&paths.missing),
        vec![
            "term_id,context",
            "\"('UBERON:9', ())\",",
            "\"('UBERON:9', ())\",ilxtr:neuron-type-1",
        ]
    );
    assert_eq!(
        read_lines(&paths.rendered),
        vec![
            "term_id,rendered_id,kind,context",
            "\"(('UBERON:2', ()), ('UBERON:3', ()))\",\"(('UBERON:2', ()), ('UBERON:3', ()))\",edge,ilxtr:neuron-type-1",
            "\"('UBERON:2', ())\",\"('UBERON:2', ())\",node,ilxtr:neuron-type-2",
            "\"('UBERON:3', ())\",\"('UBERON:3', ())\",node,ilxtr:neuron-type-2",
        ]
    );
    assert_eq!(
        read_lines(paths.summary.as_ref().unwrap()),
        vec![
            "context,completeness,missing,rendered,missing_edges,missing_segments",
            ",,1,0,0,0",
            "ilxtr:neuron-type-1,Partial,1,1,1,0",
            "ilxtr:neuron-type-2,Complete,0,2,0,0",
        ]
    );
}
