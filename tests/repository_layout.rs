//! ---
//! ems_section: "15-testing-qa-runbook"
//! ems_subsection: "integration-tests"
//! ems_type: "source"
//! ems_scope: "code"
//! ems_description: "Checks on shipped configuration and source headers."
//! ems_version: "v0.1.0"
//! ems_owner: "tbd"
//! ---
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use edash_common::{AppConfig, Period};

fn root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("..")
}

fn read(path: &str) -> String {
    let full = root().join(path);
    fs::read_to_string(&full)
        .unwrap_or_else(|err| panic!("failed to read {}: {}", full.display(), err))
}

fn rust_sources(dir: &Path, out: &mut Vec<PathBuf>) {
    for entry in fs::read_dir(dir).unwrap() {
        let path = entry.unwrap().path();
        if path.is_dir() {
            rust_sources(&path, out);
        } else if path.extension().is_some_and(|ext| ext == "rs") {
            out.push(path);
        }
    }
}

#[test]
fn example_config_parses_with_documented_defaults() {
    let config: AppConfig = read("configs/example.toml").parse().unwrap();
    assert_eq!(config.dashboard.default_period, Period::Daily);
    assert_eq!(config.dashboard.refresh_interval, Duration::from_secs(30));
    assert_eq!(config.latency.readings, Duration::from_millis(800));
    assert_eq!(config.latency.suggestions, Duration::from_millis(500));
}

#[test]
fn sources_carry_frontmatter_header() {
    let mut sources = Vec::new();
    for dir in ["crates", "bin"] {
        rust_sources(&root().join(dir), &mut sources);
    }
    assert!(!sources.is_empty());
    for source in sources {
        let content = fs::read_to_string(&source).unwrap();
        assert!(
            content.starts_with("//! ---"),
            "{} must include frontmatter header",
            source.display()
        );
    }
}
