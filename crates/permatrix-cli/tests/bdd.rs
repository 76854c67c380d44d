//! BDD test harness using cucumber-rs.
//!
//! Executes Gherkin feature files from `tests/features/` against the permatrix CLI.
//!
//! Run with: `cargo test --test bdd`

use assert_cmd::Command;
use cucumber::{World, gherkin::Step, given, then, when};
use permatrix_test_util::fixtures;
use serde_json::Value;
use std::path::PathBuf;
use tempfile::TempDir;

/// Test world that holds state between steps.
#[derive(Debug, World)]
#[world(init = Self::new)]
pub struct PermatrixWorld {
    /// Scratch directory holding `permatrix.toml` and `permatrix.json`.
    dir: TempDir,

    diagnostics: bool,

    /// Last command's exit code.
    exit_code: Option<i32>,

    /// Last command's stdout.
    stdout: String,

    /// Last command's stderr.
    stderr: String,
}

impl PermatrixWorld {
    fn new() -> Self {
        Self {
            dir: tempfile::tempdir().expect("tempdir"),
            diagnostics: false,
            exit_code: None,
            stdout: String::new(),
            stderr: String::new(),
        }
    }

    fn store_path(&self) -> PathBuf {
        self.dir.path().join("permatrix.json")
    }

    fn write(&self, name: &str, text: &str) {
        std::fs::write(self.dir.path().join(name), text).expect("write scenario file");
    }

    #[allow(deprecated)]
    fn run_cli<I, S>(&mut self, args: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<std::ffi::OsStr>,
    {
        let mut cmd = Command::cargo_bin("permatrix").expect("permatrix binary not found");
        cmd.current_dir(self.dir.path()).env_remove("PERMATRIX_DIAGNOSTICS");
        if self.diagnostics {
            cmd.arg("--diagnostics");
        }
        let output = cmd.args(args).output().expect("run permatrix");
        self.exit_code = output.status.code();
        self.stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        self.stderr = String::from_utf8_lossy(&output.stderr).into_owned();
    }

    fn decision(&self) -> Value {
        serde_json::from_str(&self.stdout)
            .unwrap_or_else(|e| panic!("stdout is not JSON ({e}): {}", self.stdout))
    }
}

fn docstring(step: &Step) -> &str {
    step.docstring.as_deref().expect("step needs a docstring")
}

// =============================================================================
// Given steps - Setup
// =============================================================================

#[given("the stored matrix:")]
fn given_stored_matrix(world: &mut PermatrixWorld, step: &Step) {
    world.write("permatrix.json", docstring(step));
}

#[given("the config:")]
fn given_config(world: &mut PermatrixWorld, step: &Step) {
    world.write("permatrix.toml", docstring(step));
}

#[given("no stored matrix")]
fn given_no_matrix(world: &mut PermatrixWorld) {
    assert!(!world.store_path().exists());
}

#[given("a corrupt stored matrix")]
fn given_corrupt_matrix(world: &mut PermatrixWorld) {
    world.write("permatrix.json", "{ this is not json");
}

#[given("the platform matrix")]
fn given_platform_matrix(world: &mut PermatrixWorld) {
    let text = serde_json::to_string_pretty(&fixtures::platform_matrix()).expect("serialize");
    world.write("permatrix.json", &text);
}

#[given("diagnostic mode is on")]
fn given_diagnostics(world: &mut PermatrixWorld) {
    world.diagnostics = true;
}

// =============================================================================
// When steps - Actions
// =============================================================================

#[when(expr = "I check {string} as {string}")]
fn when_check_as(world: &mut PermatrixWorld, triple: String, role: String) {
    world.run_cli(["check", "--role", role.as_str(), triple.as_str()]);
}

#[when(expr = "I check {string} anonymously")]
fn when_check_anonymously(world: &mut PermatrixWorld, triple: String) {
    world.run_cli(["check", triple.as_str()]);
}

#[when(expr = "I run operation {string} as {string}")]
fn when_operation(world: &mut PermatrixWorld, id: String, role: String) {
    world.run_cli(["operation", "--role", role.as_str(), id.as_str()]);
}

#[when("I apply the matrix:")]
fn when_apply(world: &mut PermatrixWorld, step: &Step) {
    world.write("next.json", docstring(step));
    world.run_cli(["apply", "next.json"]);
}

#[when(
    expr = "I ask whether {string} with subject {string} may {string} on a {string} record owned by {string}"
)]
fn when_ask_capability(
    world: &mut PermatrixWorld,
    role: String,
    subject: String,
    triple: String,
    family: String,
    owner: String,
) {
    world.run_cli([
        "capabilities",
        "--role",
        role.as_str(),
        "--subject",
        subject.as_str(),
        "--action",
        triple.as_str(),
        "--family",
        family.as_str(),
        "--owner",
        owner.as_str(),
    ]);
}

// =============================================================================
// Then steps - Assertions
// =============================================================================

#[then(expr = "the exit code is {int}")]
fn then_exit_code(world: &mut PermatrixWorld, expected: i32) {
    assert_eq!(
        world.exit_code,
        Some(expected),
        "stdout: {}\nstderr: {}",
        world.stdout,
        world.stderr
    );
}

#[then(expr = "the decision is {string}")]
fn then_decision(world: &mut PermatrixWorld, expected: String) {
    let decision = world.decision();
    assert_eq!(decision["outcome"], expected.as_str());
    let code = if expected == "allow" { 0 } else { 2 };
    assert_eq!(world.exit_code, Some(code));
}

#[then(expr = "the decision role is {string}")]
fn then_decision_role(world: &mut PermatrixWorld, role: String) {
    assert_eq!(world.decision()["role"], role.as_str());
}

#[then(expr = "the denial detail names role {string}")]
fn then_detail_role(world: &mut PermatrixWorld, role: String) {
    let decision = world.decision();
    assert_eq!(decision["detail"]["role"], role.as_str());
    assert!(decision["detail"].get("requirement").is_some());
}

#[then("the decision has no detail")]
fn then_no_detail(world: &mut PermatrixWorld) {
    assert!(world.decision().get("detail").is_none());
}

#[then(expr = "stderr contains {string}")]
fn then_stderr_contains(world: &mut PermatrixWorld, needle: String) {
    assert!(
        world.stderr.contains(&needle),
        "stderr did not contain {needle:?}: {}",
        world.stderr
    );
}

#[then("the stored matrix is the platform matrix")]
fn then_store_unchanged(world: &mut PermatrixWorld) {
    let text = std::fs::read_to_string(world.store_path()).expect("read store");
    let stored: Value = serde_json::from_str(&text).expect("store is JSON");
    assert_eq!(stored, fixtures::platform_matrix());
}

#[then(expr = "the capability answer is {word}")]
fn then_capability(world: &mut PermatrixWorld, expected: String) {
    let expected: bool = expected.parse().expect("true or false");
    assert_eq!(world.decision()["allowed"], expected);
    assert_eq!(world.exit_code, Some(if expected { 0 } else { 2 }));
}

// =============================================================================
// Main entry point
// =============================================================================

fn main() {
    let features_dir = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .expect("cli crate should have parent")
        .parent()
        .expect("crates should have parent")
        .join("tests")
        .join("features");

    // Run all feature files in the features directory
    futures::executor::block_on(PermatrixWorld::run(features_dir));
}
