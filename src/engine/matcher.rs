//! Rule selection, merging, and keyword search.

use std::collections::BTreeSet;

use crate::error::{Error, Result};
use crate::models::{Manifest, ResolvedScopes, RuleFile, RuleRequest, RuleScope};

use super::resolver::resolve_request_scopes;

/// Separator placed between consecutive rule bodies.
pub const RULE_SEPARATOR: &str = "\n\n---\n\n";

/// Placeholder emitted when no rule matches a request.
pub const NO_RULES_PLACEHOLDER: &str = "_No rules found._";

const PREVIEW_CHARS: usize = 200;

/// Whether any of the rule's `appliesTo` lists shares a key with the
/// same-named resolved set.
pub fn rule_applies_to_scopes(rule: &RuleFile, scopes: &ResolvedScopes) -> bool {
    let applies_to = &rule.frontmatter.applies_to;

    let intersects = |scope: RuleScope, resolved: &BTreeSet<String>| {
        applies_to.keys(scope).iter().any(|key| resolved.contains(key))
    };

    intersects(RuleScope::Project, &scopes.projects)
        || intersects(RuleScope::Group, &scopes.groups)
        || intersects(RuleScope::Tech, &scopes.techs)
        || intersects(RuleScope::Language, &scopes.languages)
}

/// Rules that apply to `request`, in their original order.
pub fn get_rules_for_request<'r>(
    all_rules: &'r [RuleFile],
    manifest: &Manifest,
    request: &RuleRequest,
    use_global_group: bool,
) -> Vec<&'r RuleFile> {
    let scopes = resolve_request_scopes(request, manifest, use_global_group);
    all_rules
        .iter()
        .filter(|rule| rule_applies_to_scopes(rule, &scopes))
        .collect()
}

/// Concatenate rule bodies into one markdown document headed by the request.
pub fn merge_rules(rules: &[&RuleFile], request: &RuleRequest) -> String {
    let heading = format!("# Rules ({}:{})\n\n", request.scope, request.key);
    if rules.is_empty() {
        return format!("{}{}", heading, NO_RULES_PLACEHOLDER);
    }

    let bodies: Vec<&str> = rules.iter().map(|rule| rule.content.trim()).collect();
    let merged = format!("{}{}", heading, bodies.join(RULE_SEPARATOR));
    merged.trim().to_string()
}

/// A keyword search, optionally restricted to the rules of one scope key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    pub keyword: String,
    pub filter: Option<RuleRequest>,
}

impl SearchQuery {
    /// Build a query from possibly-missing scope parts.
    ///
    /// Scope and key must be given together or not at all.
    pub fn new(
        keyword: impl Into<String>,
        scope: Option<RuleScope>,
        key: Option<String>,
    ) -> Result<Self> {
        let filter = match (scope, key) {
            (Some(scope), Some(key)) => Some(RuleRequest { scope, key }),
            (None, None) => None,
            _ => return Err(Error::IncompleteSearchScope),
        };
        Ok(Self {
            keyword: keyword.into(),
            filter,
        })
    }

    pub fn unscoped(keyword: impl Into<String>) -> Self {
        Self {
            keyword: keyword.into(),
            filter: None,
        }
    }
}

/// Case-insensitive search of rule content and descriptions.
pub fn search_rules_by_keyword(
    all_rules: &[RuleFile],
    manifest: &Manifest,
    query: &SearchQuery,
    use_global_group: bool,
) -> String {
    let needle = query.keyword.to_lowercase();
    let scopes = query
        .filter
        .as_ref()
        .map(|request| resolve_request_scopes(request, manifest, use_global_group));

    let results: Vec<String> = all_rules
        .iter()
        .filter(|rule| scopes.as_ref().is_none_or(|s| rule_applies_to_scopes(rule, s)))
        .filter(|rule| {
            rule.content.to_lowercase().contains(&needle)
                || rule
                    .frontmatter
                    .description
                    .as_deref()
                    .is_some_and(|d| d.to_lowercase().contains(&needle))
        })
        .map(render_search_hit)
        .collect();

    if results.is_empty() {
        let scope_text = query
            .filter
            .as_ref()
            .map(|request| format!(" in {} \"{}\"", request.scope, request.key))
            .unwrap_or_default();
        return format!(
            "No rules found containing \"{}\"{}.",
            query.keyword, scope_text
        );
    }

    format!(
        "Found {} rule(s) containing \"{}\":\n\n{}",
        results.len(),
        query.keyword,
        results.join(RULE_SEPARATOR)
    )
}

fn render_search_hit(rule: &RuleFile) -> String {
    let applies_to = &rule.frontmatter.applies_to;
    let summary: Vec<String> = [
        ("projects", RuleScope::Project),
        ("groups", RuleScope::Group),
        ("techs", RuleScope::Tech),
        ("languages", RuleScope::Language),
    ]
    .into_iter()
    .filter_map(|(label, scope)| {
        let keys = applies_to.keys(scope);
        (!keys.is_empty()).then(|| format!("{}: {}", label, keys.join(", ")))
    })
    .collect();

    let preview: String = rule.content.chars().take(PREVIEW_CHARS).collect();
    format!("**{}** ({})\n{}...", rule.path, summary.join(" | "), preview)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{RuleAppliesTo, RuleFrontmatter};

    fn rule(path: &str, content: &str, applies_to: RuleAppliesTo) -> RuleFile {
        RuleFile {
            path: path.to_string(),
            frontmatter: RuleFrontmatter {
                applies_to,
                tags: None,
                description: None,
            },
            content: content.to_string(),
            raw: content.to_string(),
        }
    }

    #[test]
    fn merge_trims_each_body() {
        let a = rule("a.md", "\n\n  Alpha  \n", RuleAppliesTo::default());
        let b = rule("b.md", "Beta\n", RuleAppliesTo::default());
        let request = RuleRequest::new(RuleScope::Group, "global");

        let merged = merge_rules(&[&a, &b], &request);

        assert_eq!(merged, "# Rules (group:global)\n\nAlpha\n\n---\n\nBeta");
    }

    #[test]
    fn merge_without_rules_uses_placeholder() {
        let request = RuleRequest::new(RuleScope::Tech, "react");
        assert_eq!(
            merge_rules(&[], &request),
            "# Rules (tech:react)\n\n_No rules found._"
        );
    }

    #[test]
    fn summary_lists_only_non_empty_categories() {
        let r = rule(
            "r.md",
            "body",
            RuleAppliesTo {
                projects: Some(vec![]),
                groups: None,
                techs: Some(vec!["react".into(), "vue".into()]),
                languages: Some(vec!["typescript".into()]),
            },
        );

        assert_eq!(
            render_search_hit(&r),
            "**r.md** (techs: react, vue | languages: typescript)\nbody..."
        );
    }

    #[test]
    fn preview_is_cut_at_200_chars() {
        let long = "é".repeat(250);
        let r = rule("long.md", &long, RuleAppliesTo::default());

        let hit = render_search_hit(&r);
        let preview = hit.lines().nth(1).unwrap();

        assert_eq!(preview.chars().count(), 203);
        assert!(preview.ends_with("..."));
    }

    #[test]
    fn half_scoped_query_is_rejected() {
        assert!(matches!(
            SearchQuery::new("x", Some(RuleScope::Project), None),
            Err(Error::IncompleteSearchScope)
        ));
        assert!(matches!(
            SearchQuery::new("x", None, Some("key".into())),
            Err(Error::IncompleteSearchScope)
        ));
        assert!(SearchQuery::new("x", None, None).unwrap().filter.is_none());
    }
}
