//! End-to-end tests driving the `csplit` binary.

use assert_fs::prelude::*;
use predicates::prelude::*;

mod util;
use util::{FIVE_LINES, csplit_in, fixture_with_input};

#[test]
fn line_split_reports_size_and_appends_tail()
{
    // Given
    let tmp = fixture_with_input(FIVE_LINES);

    // When / Then
    csplit_in(&tmp)
        .args(["input.txt", "3"])
        .assert()
        .success()
        .stdout("6\n");

    tmp.child("xx00").assert(FIVE_LINES);
    tmp.child("xx01").assert(predicate::path::missing());
}

#[test]
fn dash_reads_standard_input()
{
    let tmp = assert_fs::TempDir::new().unwrap();

    csplit_in(&tmp)
        .args(["-", "2", "{2}"])
        .write_stdin("1\n2\n3\n4\n5\n")
        .assert()
        .success()
        .stdout("4\n4\n");

    tmp.child("xx00").assert("1\n2\n");
    tmp.child("xx01").assert("3\n4\n5\n");
}

#[test]
fn regex_sections()
{
    let tmp = fixture_with_input("intro\n== one\nbody\n== two\nmore\n");

    csplit_in(&tmp)
        .args(["input.txt", "/^==/", "{2}"])
        .assert()
        .success()
        .stdout("6\n12\n");

    tmp.child("xx00").assert("intro\n");
    tmp.child("xx01").assert("== one\nbody\n== two\nmore\n");
}

#[test]
fn skip_directive_discards_preamble()
{
    let tmp = fixture_with_input("noise\nnoise\n---\nkept\n");

    csplit_in(&tmp)
        .args(["input.txt", "%^---$%1"])
        .assert()
        .success()
        .stdout("");

    tmp.child("xx00").assert("kept\n");
}

#[test]
fn prefix_and_digits_flags()
{
    let tmp = fixture_with_input(FIVE_LINES);

    csplit_in(&tmp)
        .args(["-f", "part", "-n", "3", "input.txt", "1", "1"])
        .assert()
        .success()
        .stdout("2\n2\n");

    tmp.child("part000").assert("a\n");
    tmp.child("part001").assert("b\nc\nd\ne\n");
}

#[test]
fn silent_suppresses_sizes()
{
    let tmp = fixture_with_input(FIVE_LINES);

    csplit_in(&tmp)
        .args(["-s", "input.txt", "2"])
        .assert()
        .success()
        .stdout("");

    tmp.child("xx00").assert(FIVE_LINES);
}

#[test]
fn repeat_without_directive_fails_without_output()
{
    let tmp = fixture_with_input(FIVE_LINES);

    csplit_in(&tmp)
        .args(["input.txt", "{2}"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("no previous argument"));

    tmp.child("xx00").assert(predicate::path::missing());
}

#[test]
fn invalid_regex_fails()
{
    let tmp = fixture_with_input(FIVE_LINES);

    csplit_in(&tmp)
        .args(["input.txt", "/a/b/"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("unescaped"));

    tmp.child("xx00").assert(predicate::path::missing());
}

#[test]
fn invalid_argument_names_token()
{
    let tmp = fixture_with_input(FIVE_LINES);

    csplit_in(&tmp)
        .args(["input.txt", "bogus"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("bogus"));
}

#[test]
fn out_of_range_number_fails()
{
    let tmp = fixture_with_input(FIVE_LINES);

    csplit_in(&tmp)
        .args(["input.txt", "99999999999"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("too large"));
}

#[test]
fn zero_digits_is_rejected()
{
    let tmp = fixture_with_input(FIVE_LINES);

    csplit_in(&tmp)
        .args(["-n", "0", "input.txt", "1"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("too small"));
}

#[test]
fn create_failure_cleans_up_earlier_files()
{
    // Given: the second output name is already taken by a directory
    let tmp = fixture_with_input("1\n2\n3\n4\n5\n6\n7\n8\n9\n10\n");
    tmp.child("xx01").create_dir_all().unwrap();

    // When
    csplit_in(&tmp)
        .args(["input.txt", "5", "{2}"])
        .assert()
        .code(1);

    // Then: the first file was created and then removed
    tmp.child("xx00").assert(predicate::path::missing());
    tmp.child("xx01").assert(predicate::path::is_dir());
}

#[test]
fn keep_flag_preserves_partial_output()
{
    let tmp = fixture_with_input("1\n2\n3\n4\n5\n6\n7\n8\n9\n10\n");
    tmp.child("xx01").create_dir_all().unwrap();

    csplit_in(&tmp)
        .args(["-k", "input.txt", "5", "{2}"])
        .assert()
        .code(1);

    tmp.child("xx00").assert("1\n2\n3\n4\n5\n");
}

#[test]
fn missing_input_file_fails()
{
    let tmp = assert_fs::TempDir::new().unwrap();

    csplit_in(&tmp)
        .args(["nope.txt", "1"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("nope.txt"));
}

#[test]
fn missing_directives_is_a_usage_error()
{
    let tmp = fixture_with_input(FIVE_LINES);

    csplit_in(&tmp).args(["input.txt"]).assert().code(1);
    csplit_in(&tmp).assert().code(1);
}

#[test]
fn help_exits_zero()
{
    let tmp = assert_fs::TempDir::new().unwrap();

    csplit_in(&tmp)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Directive arguments"));
}

#[test]
fn config_file_supplies_defaults()
{
    let tmp = fixture_with_input(FIVE_LINES);
    tmp.child("csplit.toml")
        .write_str("prefix = \"cfg\"\nsilent = true\n")
        .unwrap();

    csplit_in(&tmp)
        .args(["input.txt", "4"])
        .assert()
        .success()
        .stdout("");

    tmp.child("cfg00").assert(FIVE_LINES);
}

#[test]
fn environment_overrides_config_file()
{
    let tmp = fixture_with_input(FIVE_LINES);
    tmp.child("csplit.toml").write_str("prefix = \"cfg\"\n").unwrap();

    csplit_in(&tmp)
        .env("CSPLIT_PREFIX", "env")
        .args(["input.txt", "4"])
        .assert()
        .success();

    tmp.child("env00").assert(FIVE_LINES);
}

#[test]
fn completions_print_script()
{
    let tmp = assert_fs::TempDir::new().unwrap();

    csplit_in(&tmp)
        .args(["--completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("csplit"));
}

#[cfg(target_os = "linux")]
#[test]
fn unwritable_stdout_fails_and_cleans_up()
{
    use std::fs::OpenOptions;
    use std::process::{Command, Stdio};

    use assert_cmd::cargo::CommandCargoExt;

    let tmp = fixture_with_input(FIVE_LINES);
    let full = OpenOptions::new().write(true).open("/dev/full").unwrap();

    let status = Command::cargo_bin("csplit")
        .unwrap()
        .current_dir(tmp.path())
        .env_remove("CSPLIT_SILENT")
        .env_remove("RUST_LOG")
        .args(["input.txt", "2"])
        .stdout(full)
        .stderr(Stdio::null())
        .status()
        .unwrap();

    assert_eq!(status.code(), Some(1));
    tmp.child("xx00").assert(predicate::path::missing());
}
