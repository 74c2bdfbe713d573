//! Runtime configuration for the rule store.

use std::path::PathBuf;

use crate::engine::global_group_enabled;

/// Environment variable naming the rules directory.
pub const RULES_DIR_ENV: &str = "RULEKIT_RULES_DIR";
/// Environment switch that disables the manifest's global group when `false`.
pub const USE_GLOBAL_RULES_ENV: &str = "USE_GLOBAL_RULES";
/// Rules directory used when nothing else is configured.
pub const DEFAULT_RULES_DIR: &str = "rules";
/// Name of the manifest inside the rules directory.
pub const MANIFEST_FILE: &str = "manifest.yml";

/// Where the global group on/off decision comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GlobalGroupSwitch {
    /// Read `USE_GLOBAL_RULES` each time a request is resolved.
    #[default]
    FromEnv,
    Fixed(bool),
}

impl GlobalGroupSwitch {
    pub fn enabled(&self) -> bool {
        match self {
            Self::FromEnv => {
                global_group_enabled(std::env::var(USE_GLOBAL_RULES_ENV).ok().as_deref())
            }
            Self::Fixed(enabled) => *enabled,
        }
    }
}

#[derive(Debug, Clone)]
pub struct StoreConfig {
    pub rules_dir: PathBuf,
    pub manifest_path: PathBuf,
    pub global_group: GlobalGroupSwitch,
}

impl StoreConfig {
    /// Rules under `rules_dir`, manifest at `rules_dir/manifest.yml`.
    pub fn new(rules_dir: impl Into<PathBuf>) -> Self {
        let rules_dir = rules_dir.into();
        let manifest_path = rules_dir.join(MANIFEST_FILE);
        Self {
            rules_dir,
            manifest_path,
            global_group: GlobalGroupSwitch::default(),
        }
    }

    pub fn with_global_group(mut self, switch: GlobalGroupSwitch) -> Self {
        self.global_group = switch;
        self
    }
}
