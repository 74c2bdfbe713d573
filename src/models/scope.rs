use std::collections::BTreeSet;
use std::str::FromStr;

use rmcp::schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::Error;

/// One of the four independent classification axes for rules.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, JsonSchema, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum RuleScope {
    Project,
    Group,
    Tech,
    Language,
}

impl RuleScope {
    /// All scopes, in the order they are listed to callers.
    pub const ALL: [RuleScope; 4] = [Self::Project, Self::Group, Self::Tech, Self::Language];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Project => "project",
            Self::Group => "group",
            Self::Tech => "tech",
            Self::Language => "language",
        }
    }
}

impl FromStr for RuleScope {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "project" => Ok(Self::Project),
            "group" => Ok(Self::Group),
            "tech" => Ok(Self::Tech),
            "language" => Ok(Self::Language),
            other => Err(Error::InvalidScope(other.to_string())),
        }
    }
}

impl std::fmt::Display for RuleScope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A caller's identity: a scope category plus a key within it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleRequest {
    pub scope: RuleScope,
    pub key: String,
}

impl RuleRequest {
    pub fn new(scope: RuleScope, key: impl Into<String>) -> Self {
        Self {
            scope,
            key: key.into(),
        }
    }
}

/// The closed set of keys, per category, that apply to one request.
///
/// Built fresh for every resolution and discarded with the request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedScopes {
    pub projects: BTreeSet<String>,
    pub groups: BTreeSet<String>,
    pub techs: BTreeSet<String>,
    pub languages: BTreeSet<String>,
}
