//! End-to-end tests for the `mapalign` binary.

mod common;

use common::TestContext;
use mapalign_test_utils::write_log;
use predicates::prelude::*;

#[test]
fn test_extract_reference_scenario() {
    let ctx = TestContext::new();
    write_log(
        ctx.path(),
        "alignment/log/rat.log",
        &[
            "RESOLVED foo -> node42",
            "MISSING bar",
            "some unrelated diagnostic text",
            "RESOLVED bar -> node7",
        ],
    );

    ctx.command()
        .args([
            "extract",
            "--grammar",
            "marker",
            "--log-file",
            "alignment/log/rat.log",
            "--missing-file",
            "alignment/output/rat_missing.csv",
            "--rendered-file",
            "alignment/output/rat_rendered.csv",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("4 lines: 0 missing, 2 rendered"));

    assert_eq!(ctx.lines("alignment/output/rat_missing.csv"), vec!["term_id,context"]);
    assert_eq!(
        ctx.lines("alignment/output/rat_rendered.csv"),
        vec![
            "term_id,rendered_id,kind,context",
            "foo,node42,node,",
            "bar,node7,node,",
        ]
    );
}

#[test]
fn test_extract_empty_log_writes_headers_json() {
    let ctx = TestContext::new();
    write_log(ctx.path(), "female.log", &[]);

    ctx.command()
        .args([
            "--format",
            "json",
            "extract",
            "--log_file",
            "female.log",
            "--missing_file",
            "out/missing.csv",
            "--rendered_file",
            "out/rendered.csv",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"missing\": 0"));

    assert_eq!(ctx.lines("out/missing.csv"), vec!["term_id,context"]);
    assert_eq!(
        ctx.lines("out/rendered.csv"),
        vec!["term_id,rendered_id,kind,context"]
    );
}

#[test]
fn test_extract_missing_log_fails() {
    let ctx = TestContext::new();

    ctx.command()
        .args([
            "extract",
            "--log-file",
            "nope.log",
            "--missing-file",
            "m.csv",
            "--rendered-file",
            "r.csv",
        ])
        .assert()
        .code(3);

    assert!(!ctx.path().join("m.csv").exists());
}

#[test]
fn test_extract_default_grammar_reads_mapmaker_log() {
    let ctx = TestContext::new();
    write_log(
        ctx.path(),
        "male.log",
        &["2024-01-01 00:00:00,000 WARNING:  Cannot find feature for connectivity node ('UBERON:1', ()) (label)"],
    );

    ctx.command()
        .args([
            "extract",
            "--log-file",
            "male.log",
            "--missing-file",
            "m.csv",
            "--rendered-file",
            "r.csv",
        ])
        .assert()
        .success();

    assert_eq!(
        ctx.lines("m.csv"),
        vec!["term_id,context", "\"('UBERON:1', ())\","]
    );
}

#[test]
fn test_config_shows_defaults_as_yaml() {
    TestContext::new()
        .command()
        .arg("config")
        .assert()
        .success()
        .stdout(predicate::str::contains("program: mapmaker"))
        .stdout(predicate::str::contains("name: female"));
}

#[test]
fn test_config_as_json() {
    TestContext::new()
        .command()
        .args(["--format", "json", "config"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"keep_marker\": \".gitkeep\""));
}

#[test]
fn test_invalid_config_exits_with_config_code() {
    TestContext::new()
        .with_config("targets: []\n")
        .command()
        .arg("config")
        .assert()
        .code(2);
}

#[cfg(unix)]
#[test]
fn test_align_writes_reports() {
    let ctx = TestContext::new().with_script_target("echo 'RESOLVED foo -> node42'; echo 'MISSING bar'");

    ctx.command()
        .arg("align")
        .assert()
        .success()
        .stdout(predicate::str::contains("target rat"));

    assert_eq!(
        ctx.lines("alignment/output/rat_missing.csv"),
        vec!["term_id,context", "bar,"]
    );
    assert_eq!(
        ctx.lines("alignment/output/rat_rendered.csv"),
        vec!["term_id,rendered_id,kind,context", "foo,node42,node,"]
    );
}

#[cfg(unix)]
#[test]
fn test_align_failed_render_still_extracts() {
    let ctx = TestContext::new().with_script_target("echo 'MISSING bar'; exit 3");

    ctx.command()
        .arg("align")
        .assert()
        .code(8)
        .stdout(predicate::str::contains("render exit 3"));

    assert_eq!(
        ctx.lines("alignment/output/rat_missing.csv"),
        vec!["term_id,context", "bar,"]
    );
}

#[test]
fn test_align_unknown_target() {
    TestContext::new()
        .command()
        .args(["align", "--target", "dog"])
        .assert()
        .code(5)
        .stderr(predicate::str::contains("unknown target: dog"));
}

#[test]
fn test_publish_requires_api_key() {
    TestContext::new()
        .command()
        .arg("publish")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("SCICRUNCH_API_KEY"));
}
