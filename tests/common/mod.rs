//! Shared rules-directory fixture for integration tests.

#![allow(dead_code)]

use std::path::Path;

use rulekit::config::{GlobalGroupSwitch, StoreConfig};
use rulekit::store::RuleStore;
use tempfile::TempDir;

pub const MANIFEST: &str = r#"version: 1
languages:
  typescript:
    description: TypeScript
  rust: {}
techs:
  react:
    description: React
    dependsOn: [typescript]
  node:
    dependsOn: [typescript]
  nextjs:
    dependsOn: [react, node]
groups:
  global:
    description: Rules for everyone
  backend: {}
projects:
  buerokratt/Service-Module:
    groups: [global]
    techs: [react]
  acme/api:
    groups: [backend]
    techs: [nextjs]
    languages: [rust]
defaults:
  globalGroup: global
"#;

pub const RULES: &[(&str, &str)] = &[
    (
        "global.md",
        "---\nappliesTo:\n  groups: [global]\ndescription: General conventions\n---\n# General\n\nWrite small, focused commits.\n",
    ),
    (
        "group/backend.md",
        "---\nappliesTo:\n  groups: [backend]\ndescription: Backend logging\n---\n# Backend\n\nLog with structured fields.\n",
    ),
    (
        "language/rust.md",
        "---\nappliesTo:\n  languages: [rust]\n---\n# Rust\n\nAvoid unwrap in library code.\n",
    ),
    (
        "language/typescript.md",
        "---\nappliesTo:\n  languages: [typescript]\ntags: [types]\n---\n# TypeScript\n\nEnable strict mode.\n",
    ),
    (
        "project/buerokratt/service-module.md",
        "---\nappliesTo:\n  projects: [buerokratt/Service-Module]\n---\n# Service Module\n\nUse the shared DSL validator.\n",
    ),
    (
        "tech/react.md",
        "---\nappliesTo:\n  techs: [react]\n---\n# React\n\nPrefer function components and hooks.\n",
    ),
];

pub fn write_file(dir: &Path, rel: &str, content: &str) {
    let path = dir.join(rel);
    std::fs::create_dir_all(path.parent().expect("fixture path has a parent"))
        .expect("Failed to create fixture directory");
    std::fs::write(path, content).expect("Failed to write fixture file");
}

/// Write the standard manifest and rule files into `dir`.
pub fn write_fixture(dir: &Path) {
    write_file(dir, "manifest.yml", MANIFEST);
    for (rel, content) in RULES {
        write_file(dir, rel, content);
    }
}

/// A store over the standard fixture with the global group enabled.
pub fn fixture_store() -> (TempDir, RuleStore) {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    write_fixture(dir.path());
    let store = RuleStore::new(
        StoreConfig::new(dir.path()).with_global_group(GlobalGroupSwitch::Fixed(true)),
    );
    (dir, store)
}
