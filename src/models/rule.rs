use serde::{Deserialize, Serialize};

use super::RuleScope;

/// The scope keys a rule declares it applies to, one list per category.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleAppliesTo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub projects: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub groups: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub techs: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub languages: Option<Vec<String>>,
}

impl RuleAppliesTo {
    /// The declared keys for one category, empty when the list is absent.
    pub fn keys(&self, scope: RuleScope) -> &[String] {
        let list = match scope {
            RuleScope::Project => &self.projects,
            RuleScope::Group => &self.groups,
            RuleScope::Tech => &self.techs,
            RuleScope::Language => &self.languages,
        };
        list.as_deref().unwrap_or_default()
    }
}

/// Metadata block at the top of a rule document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleFrontmatter {
    pub applies_to: RuleAppliesTo,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// A loaded rule document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleFile {
    /// Path relative to the rules directory, with `/` separators.
    pub path: String,
    pub frontmatter: RuleFrontmatter,
    /// Body after the frontmatter block.
    pub content: String,
    /// The file exactly as read.
    pub raw: String,
}
