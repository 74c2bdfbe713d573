//! Filesystem-backed loading of the manifest and rule documents.
//!
//! Nothing is cached: every call re-reads the rules directory so edits to
//! `manifest.yml` or any rule file take effect on the next request.

mod frontmatter;

pub use frontmatter::{parse_rule_document, split_frontmatter};

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::config::StoreConfig;
use crate::engine::{self, SearchQuery};
use crate::error::{Error, Result};
use crate::models::*;

/// Rule file at the rules root that holds usage instructions, not rules.
pub const INSTRUCTIONS_FILE: &str = "mcp-instructions.md";

const DEFAULT_INSTRUCTIONS: &str = "Call list_scope_keys to discover projects, groups, techs, \
and languages, then call get_rules with a scope and key to fetch the merged rules that apply. \
Use search_rules to find rules mentioning a keyword.";

#[derive(Clone)]
pub struct RuleStore {
    config: Arc<StoreConfig>,
}

impl RuleStore {
    pub fn new(config: StoreConfig) -> Self {
        Self {
            config: Arc::new(config),
        }
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    // ============================================================
    // Loading
    // ============================================================

    /// Load the manifest. A missing file, or YAML that is not a mapping,
    /// yields an empty manifest.
    pub fn load_manifest(&self) -> Result<Manifest> {
        let path = &self.config.manifest_path;
        let raw = match std::fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!("No manifest at {}, using empty manifest", path.display());
                return Ok(Manifest::default());
            }
            Err(source) => {
                return Err(Error::ManifestRead {
                    path: path.clone(),
                    source,
                })
            }
        };

        let parse_error = |source| Error::ManifestParse {
            path: path.clone(),
            source,
        };
        let value: serde_yaml::Value = serde_yaml::from_str(&raw).map_err(parse_error)?;
        if !value.is_mapping() {
            return Ok(Manifest::default());
        }
        // Plain scalars like `2024` must stay string keys, so decode from text.
        serde_yaml::from_str(&raw).map_err(parse_error)
    }

    /// Load every rule document under the rules directory, sorted by path.
    pub fn load_all_rules(&self) -> Result<Vec<RuleFile>> {
        let root = &self.config.rules_dir;
        if !root.is_dir() {
            tracing::debug!("Rules directory {} not found", root.display());
            return Ok(Vec::new());
        }

        let mut paths = Vec::new();
        collect_markdown_paths(root, &mut paths)?;
        paths.sort();

        let mut rules = Vec::with_capacity(paths.len());
        for path in paths {
            let rel_path = relative_display(root, &path);
            if rel_path == INSTRUCTIONS_FILE {
                continue;
            }

            let raw = std::fs::read_to_string(&path).map_err(|source| Error::RuleRead {
                path: path.clone(),
                source,
            })?;
            let (frontmatter, content) = parse_rule_document(&rel_path, &raw)?;
            let content = content.to_string();

            rules.push(RuleFile {
                path: rel_path,
                frontmatter,
                content,
                raw,
            });
        }

        tracing::debug!("Loaded {} rule files from {}", rules.len(), root.display());
        Ok(rules)
    }

    /// Sorted keys defined in the manifest catalog for `scope`.
    pub fn available_scope_keys(&self, scope: RuleScope) -> Result<Vec<String>> {
        let manifest = self.load_manifest()?;
        Ok(scope_keys(&manifest, scope))
    }

    /// Keys for every scope, in [`RuleScope::ALL`] order.
    pub fn all_scope_keys(&self) -> Result<Vec<(RuleScope, Vec<String>)>> {
        let manifest = self.load_manifest()?;
        Ok(RuleScope::ALL
            .into_iter()
            .map(|scope| (scope, scope_keys(&manifest, scope)))
            .collect())
    }

    // ============================================================
    // Queries
    // ============================================================

    pub fn resolve(&self, request: &RuleRequest) -> Result<ResolvedScopes> {
        let manifest = self.load_manifest()?;
        Ok(engine::resolve_request_scopes(
            request,
            &manifest,
            self.config.global_group.enabled(),
        ))
    }

    /// The merged markdown of every rule that applies to `request`.
    pub fn merged_rules(&self, request: &RuleRequest) -> Result<String> {
        let rules = self.load_all_rules()?;
        let manifest = self.load_manifest()?;
        let matching = engine::get_rules_for_request(
            &rules,
            &manifest,
            request,
            self.config.global_group.enabled(),
        );
        tracing::debug!(
            "{} of {} rules apply to {}:{}",
            matching.len(),
            rules.len(),
            request.scope,
            request.key
        );
        Ok(engine::merge_rules(&matching, request))
    }

    pub fn search(&self, query: &SearchQuery) -> Result<String> {
        let rules = self.load_all_rules()?;
        let manifest = self.load_manifest()?;
        Ok(engine::search_rules_by_keyword(
            &rules,
            &manifest,
            query,
            self.config.global_group.enabled(),
        ))
    }

    /// Usage instructions for MCP clients.
    pub fn instructions(&self) -> Result<String> {
        let path = self.config.rules_dir.join(INSTRUCTIONS_FILE);
        match std::fs::read_to_string(&path) {
            Ok(text) => Ok(text),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Ok(DEFAULT_INSTRUCTIONS.to_string())
            }
            Err(source) => Err(Error::RuleRead { path, source }),
        }
    }
}

fn scope_keys(manifest: &Manifest, scope: RuleScope) -> Vec<String> {
    // Catalogs are ordered maps, so keys come out sorted.
    match scope {
        RuleScope::Project => manifest.projects.keys().cloned().collect(),
        RuleScope::Group => manifest.groups.keys().cloned().collect(),
        RuleScope::Tech => manifest.techs.keys().cloned().collect(),
        RuleScope::Language => manifest.languages.keys().cloned().collect(),
    }
}

fn collect_markdown_paths(dir: &Path, out: &mut Vec<PathBuf>) -> Result<()> {
    let dir_error = |source| Error::RulesDir {
        path: dir.to_path_buf(),
        source,
    };

    for entry in std::fs::read_dir(dir).map_err(dir_error)? {
        let path = entry.map_err(dir_error)?.path();
        if path.is_dir() {
            collect_markdown_paths(&path, out)?;
        } else if path.extension().is_some_and(|ext| ext == "md") {
            out.push(path);
        }
    }
    Ok(())
}

/// Path relative to `root`, forward-slash normalized.
fn relative_display(root: &Path, path: &Path) -> String {
    let rel = path.strip_prefix(root).unwrap_or(path);
    rel.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}
