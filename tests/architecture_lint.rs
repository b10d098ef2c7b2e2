//! Architecture enforcement tests.
//!
//! The library is layered: `core` -> `hierarchy` / `template` -> `merge` ->
//! `engine`, with `cli` and `ui` on top. These tests keep the layering
//! honest in CI.
//!
//! # Test Categories
//!
//! 1. **Output Discipline** - Library layers log through `tracing`; only
//!    `cli`, `ui` and `main.rs` write to stdout/stderr
//! 2. **Layer Imports** - Library layers never import `cli` or `ui`
//! 3. **No Panicking Shortcuts** - Non-test library code propagates errors
//!    instead of calling `unwrap()` / `expect()` / `panic!`

use std::fs;
use std::path::{Path, PathBuf};

/// Library layers: everything below the CLI.
const LIBRARY_DIRS: &[&str] = &[
    "src/core",
    "src/hierarchy",
    "src/template",
    "src/merge",
    "src/engine",
];

/// Macros that write directly to the terminal.
const PRINT_MACROS: &[&str] = &["println!", "eprintln!", "print!", "eprint!", "dbg!"];

/// Imports library layers must not use.
const UPWARD_IMPORTS: &[&str] = &["crate::cli", "crate::ui"];

/// Calls non-test library code must not make.
const PANICKING_CALLS: &[&str] = &[".unwrap()", ".expect(", "panic!("];

// =============================================================================
// Helpers
// =============================================================================

fn rust_files(dir: &Path, out: &mut Vec<PathBuf>) {
    for entry in fs::read_dir(dir).unwrap_or_else(|_| panic!("Failed to read {}", dir.display())) {
        let path = entry.expect("Failed to read entry").path();
        if path.is_dir() {
            rust_files(&path, out);
        } else if path.extension().map(|e| e == "rs").unwrap_or(false) {
            out.push(path);
        }
    }
}

fn library_files() -> Vec<PathBuf> {
    let mut files = Vec::new();
    for dir in LIBRARY_DIRS {
        rust_files(Path::new(dir), &mut files);
    }
    files.sort();
    assert!(!files.is_empty(), "no library sources found");
    files
}

/// Code lines before the first `#[cfg(test)]`, with comments skipped.
fn production_lines(path: &Path) -> Vec<(usize, String)> {
    let content =
        fs::read_to_string(path).unwrap_or_else(|_| panic!("Failed to read {}", path.display()));
    content
        .lines()
        .take_while(|line| line.trim() != "#[cfg(test)]")
        .enumerate()
        .filter(|(_, line)| !line.trim_start().starts_with("//"))
        .map(|(i, line)| (i + 1, line.to_string()))
        .collect()
}

fn find_violations(needles: &[&str]) -> Vec<String> {
    let mut violations = Vec::new();
    for path in library_files() {
        for (line_no, line) in production_lines(&path) {
            for needle in needles {
                if line.contains(needle) {
                    violations.push(format!(
                        "{}:{}: {}",
                        path.display(),
                        line_no,
                        line.trim()
                    ));
                }
            }
        }
    }
    violations
}

// =============================================================================
// Tests
// =============================================================================

/// Library layers must log through `tracing`, never print.
#[test]
fn library_does_not_print() {
    let violations = find_violations(PRINT_MACROS);
    assert!(
        violations.is_empty(),
        "library code writes to the terminal (use tracing instead):\n{}",
        violations.join("\n")
    );
}

/// Library layers must not depend on the CLI or output layers.
#[test]
fn library_does_not_import_cli() {
    let violations = find_violations(UPWARD_IMPORTS);
    assert!(
        violations.is_empty(),
        "library code imports an upper layer:\n{}",
        violations.join("\n")
    );
}

/// Library layers must propagate errors rather than panic.
#[test]
fn library_does_not_unwrap() {
    let violations = find_violations(PANICKING_CALLS);
    assert!(
        violations.is_empty(),
        "library code calls unwrap()/expect()/panic!:\n{}",
        violations.join("\n")
    );
}

/// The lint must actually see the sources it claims to check.
#[test]
fn lint_covers_every_layer() {
    let files = library_files();
    for dir in LIBRARY_DIRS {
        assert!(
            files.iter().any(|f| f.starts_with(dir)),
            "no sources found under {}",
            dir
        );
    }
}
