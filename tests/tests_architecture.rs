#![allow(clippy::unwrap_used, clippy::expect_used)]
//! Architecture Layer Dependency Tests
//!
//! ```text
//! bin (CLI)
//!    ↓
//! formats
//!    ↓
//! serializer
//!    ↓
//! model
//!    ↓
//! base
//! ```
//!
//! Dependency Rules:
//! - base → no crate modules
//! - model → base
//! - serializer → base, model
//! - formats → everything below
//! - No format plugin imports another format plugin

use std::fs;
use std::path::Path;

use rstest::rstest;
use walkdir::WalkDir;

const LAYERS: &[&str] = &["base", "model", "serializer", "formats"];

/// `use crate::<layer>` lines in `dir` naming a layer not in `allowed`.
fn collect_layer_violations(dir: &Path, allowed: &[&str], own: &str) -> Vec<String> {
    let mut violations = Vec::new();
    for entry in WalkDir::new(dir).sort_by_file_name() {
        let entry = entry.unwrap();
        if entry.path().extension().is_none_or(|ext| ext != "rs") {
            continue;
        }
        let content = fs::read_to_string(entry.path()).unwrap();
        for (line_no, line) in content.lines().enumerate() {
            let line = line.trim();
            for layer in LAYERS {
                if *layer == own || allowed.contains(layer) {
                    continue;
                }
                if line.contains(&format!("crate::{layer}")) {
                    violations.push(format!(
                        "{}:{}: {line}",
                        entry.path().display(),
                        line_no + 1
                    ));
                }
            }
        }
    }
    violations
}

#[rstest]
#[case("base", &[])]
#[case("model", &["base"])]
#[case("serializer", &["base", "model"])]
#[case("formats", &["base", "model", "serializer"])]
fn test_layer_dependencies(#[case] layer: &str, #[case] allowed: &[&str]) {
    let dir = Path::new("src").join(layer);
    let violations = collect_layer_violations(&dir, allowed, layer);
    assert!(
        violations.is_empty(),
        "\n❌ {layer} may only depend on {allowed:?}.\nViolations:\n{}\n",
        violations.join("\n")
    );
}

#[test]
fn test_format_plugins_are_independent() {
    let dir = Path::new("src/formats");
    let plugins: Vec<String> = fs::read_dir(dir)
        .unwrap()
        .flatten()
        .filter_map(|e| {
            let name = e.file_name().to_string_lossy().into_owned();
            name.strip_suffix(".rs")
                .filter(|stem| *stem != "mod")
                .map(str::to_string)
        })
        .collect();
    assert!(!plugins.is_empty());

    let mut violations = Vec::new();
    for plugin in &plugins {
        let content = fs::read_to_string(dir.join(format!("{plugin}.rs"))).unwrap();
        for other in plugins.iter().filter(|p| *p != plugin) {
            if content.contains(&format!("formats::{other}"))
                || content.contains(&format!("super::{other}"))
            {
                violations.push(format!("{plugin} → {other}"));
            }
        }
    }
    assert!(
        violations.is_empty(),
        "\n❌ Format plugins must only share code through the serializer layer:\n{}\n",
        violations.join("\n")
    );
}
