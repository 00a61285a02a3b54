//! Shared test utilities for integration tests
//!
//! Provides fixture creation and a preconfigured command
//! used across multiple test files.

use assert_cmd::Command;
use assert_fs::prelude::*;

/// Five short lines, the canonical example input.
pub const FIVE_LINES: &str = "a\nb\nc\nd\ne\n";

/// Create a temporary directory holding `input.txt` with `body`.
pub fn fixture_with_input(body: &str) -> assert_fs::TempDir
{
    // Initialize the temporary working directory
    let tmp = assert_fs::TempDir::new().expect("tempdir");

    // Write the input file the tests split
    tmp.child("input.txt")
        .write_str(body)
        .expect("write input");

    tmp
}

/// The `csplit` binary, run inside `dir` with a clean environment.
pub fn csplit_in(dir: &assert_fs::TempDir) -> Command
{
    let mut cmd = Command::cargo_bin("csplit").expect("bin");

    // Keep layered config and logging out of the way
    cmd.current_dir(dir.path())
        .env_remove("CSPLIT_PREFIX")
        .env_remove("CSPLIT_DIGITS")
        .env_remove("CSPLIT_KEEP")
        .env_remove("CSPLIT_SILENT")
        .env_remove("RUST_LOG")
        .env("NO_COLOR", "1");

    cmd
}
