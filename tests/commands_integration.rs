//! Integration tests for the vaultkit CLI.
//!
//! These tests run the built binary against a vault in a temp directory.
//! `HOME` and `XDG_CONFIG_HOME` point into the temp directory so no
//! user configuration leaks in.

use assert_cmd::Command;
use assert_fs::prelude::*;
use assert_fs::TempDir;
use predicates::prelude::*;

// =============================================================================
// Test Fixtures
// =============================================================================

const SCHEMA: &str = r#"
universal_fields: [template-type]
reserved_tags: [course-notes]
fields:
  template-type: { resolver: template_type }
template_types:
  program-index:
    description: Program landing page
    fields:
      program: { required: true }
  course-index:
    extends: program-index
    fields:
      course: { required: true }
  class-index:
    extends: course-index
    fields:
      class: { required: true }
"#;

/// A vault with a schema, a few notes and an editor settings folder.
struct TestVault {
    dir: TempDir,
}

impl TestVault {
    fn new() -> Self {
        let dir = TempDir::new().expect("failed to create temp dir");
        let vault = dir.child("Vault");

        vault.child(".vaultkit/schema.yaml").write_str(SCHEMA).unwrap();
        vault.child(".obsidian/app.json").write_str("{}").unwrap();
        vault
            .child("MBA/Finance/overview.md")
            .write_str("---\ntemplate-type: course-index\n---\n# Finance\n")
            .unwrap();
        vault
            .child("MBA/Finance/Accounting/05_ledgers/lecture.md")
            .write_str("# Ledgers\n")
            .unwrap();

        Self { dir }
    }

    fn vault(&self) -> std::path::PathBuf {
        self.dir.path().join("Vault")
    }

    fn path(&self, relative: &str) -> String {
        self.vault().join(relative).display().to_string()
    }

    /// A vaultkit command isolated from the user's environment.
    fn cmd(&self) -> Command {
        let mut cmd = Command::cargo_bin("vaultkit").unwrap();
        cmd.env("HOME", self.dir.path())
            .env("XDG_CONFIG_HOME", self.dir.path().join("config"))
            .env_remove("VAULTKIT_CONFIG")
            .env_remove("VAULTKIT_VAULT")
            .env_remove("RUST_LOG");
        cmd
    }

    /// Same as [`cmd`](Self::cmd) with `--vault` set.
    fn vaultkit(&self) -> Command {
        let mut cmd = self.cmd();
        cmd.arg("--vault").arg(self.vault());
        cmd
    }
}

// =============================================================================
// Basics
// =============================================================================

#[test]
fn version_flag_works() {
    TestVault::new()
        .cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("vaultkit"));
}

#[test]
fn help_flag_works() {
    TestVault::new()
        .cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("front-matter"));
}

#[test]
fn missing_vault_is_an_error() {
    let vault = TestVault::new();
    vault
        .cmd()
        .args(["hierarchy", "MBA/Finance"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("error:"))
        .stderr(predicate::str::contains("no vault root configured"));
}

#[test]
fn completion_bash() {
    TestVault::new()
        .cmd()
        .args(["completion", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("vaultkit"));
}

// =============================================================================
// Inspection
// =============================================================================

#[test]
fn hierarchy_for_content_file() {
    let vault = TestVault::new();
    vault
        .vaultkit()
        .arg("hierarchy")
        .arg(vault.path("MBA/Finance/Accounting/05_ledgers/video.mp4"))
        .assert()
        .success()
        .stdout(predicate::str::contains("program: MBA"))
        .stdout(predicate::str::contains("class:   Accounting"))
        .stdout(predicate::str::contains("module:  05"));
}

#[test]
fn hierarchy_json() {
    let vault = TestVault::new();
    vault
        .vaultkit()
        .arg("--json")
        .arg("hierarchy")
        .arg(vault.path("MBA/Finance"))
        .assert()
        .success()
        .stdout(predicate::str::contains("\"course\": \"Finance\""));
}

#[test]
fn level_absolute_and_vault_relative() {
    let vault = TestVault::new();
    vault
        .vaultkit()
        .arg("level")
        .arg(vault.path("MBA/Finance"))
        .assert()
        .success()
        .stdout(predicate::str::contains("2 (course)"));

    vault
        .vaultkit()
        .args(["level", "/MBA/Finance/Accounting"])
        .assert()
        .success()
        .stdout(predicate::str::contains("3 (class)"));
}

#[test]
fn level_outside_vault() {
    TestVault::new()
        .vaultkit()
        .args(["level", "/outside/path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("-1 (unknown)"));
}

#[test]
fn level_with_base() {
    let vault = TestVault::new();
    vault
        .vaultkit()
        .arg("level")
        .arg(vault.path("MBA/Finance/Accounting"))
        .arg("--base")
        .arg(vault.path("MBA"))
        .args(["--base-level", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("3 (class)"));
}

#[test]
fn classify_content_and_structural() {
    let vault = TestVault::new();
    vault
        .vaultkit()
        .args(["classify", "MBA/Finance/05_ledgers/lecture.md"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("content"))
        .stdout(predicate::str::contains("module prefix: 05"));

    vault
        .vaultkit()
        .args(["classify", "MBA/Finance/index.md"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("structural"));
}

// =============================================================================
// Merging
// =============================================================================

#[test]
fn merge_prints_without_writing() {
    let vault = TestVault::new();
    let note = vault.path("MBA/Finance/overview.md");
    vault
        .vaultkit()
        .arg("merge")
        .arg(&note)
        .assert()
        .success()
        .stdout(predicate::str::contains("program: MBA"))
        .stdout(predicate::str::contains("course: Finance"))
        .stdout(predicate::str::contains("course-notes"));

    vault
        .dir
        .child("Vault/MBA/Finance/overview.md")
        .assert("---\ntemplate-type: course-index\n---\n# Finance\n");
}

#[test]
fn merge_from_other_note() {
    let vault = TestVault::new();
    vault
        .vaultkit()
        .arg("merge")
        .arg(vault.path("MBA/Finance/Accounting/plan.md"))
        .arg("--from")
        .arg(vault.path("MBA/Finance/overview.md"))
        .assert()
        .success()
        .stdout(predicate::str::contains("template-type: course-index"))
        .stdout(predicate::str::contains("class:").not());
}

#[test]
fn validate_passes_for_complete_note() {
    let vault = TestVault::new();
    vault
        .vaultkit()
        .arg("validate")
        .arg(vault.path("MBA/Finance/overview.md"))
        .assert()
        .success()
        .stdout(predicate::str::contains("satisfies template 'course-index'"));
}

#[test]
fn validate_fails_on_missing_fields() {
    let vault = TestVault::new();
    vault
        .vaultkit()
        .arg("validate")
        .arg(vault.path("orphan.md"))
        .args(["--template-type", "class-index"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("  - course"))
        .stderr(predicate::str::contains("required field(s) missing"));
}

// =============================================================================
// Vault-wide
// =============================================================================

#[test]
fn scan_skips_hidden_entries() {
    TestVault::new()
        .vaultkit()
        .arg("scan")
        .assert()
        .success()
        .stdout(predicate::str::contains("MBA/Finance/overview.md"))
        .stdout(predicate::str::contains("05_ledgers/lecture.md"))
        .stdout(predicate::str::contains(".obsidian").not())
        .stdout(predicate::str::contains("2 files"));
}

#[test]
fn templates_lists_schema() {
    TestVault::new()
        .vaultkit()
        .arg("templates")
        .assert()
        .success()
        .stdout(predicate::str::contains("course-index (extends program-index)"))
        .stdout(predicate::str::contains("required: program, course"))
        .stdout(predicate::str::contains("reserved tags:"));
}

#[test]
fn config_get_vault_root() {
    let vault = TestVault::new();
    vault
        .vaultkit()
        .args(["config", "get", "vault_root"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Vault"));

    vault
        .vaultkit()
        .args(["config", "get", "trunk"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown configuration key"));
}
