//! Scope resolution: expands a request into every key that applies to it.

use std::collections::HashSet;

use crate::models::{Manifest, ResolvedScopes, RuleRequest, RuleScope};

/// Resolve the complete set of scope keys that apply to `request`.
///
/// Projects expand into their member groups, techs, and languages; techs
/// expand through their `dependsOn` closure. Unknown keys are kept but not
/// expanded. When `use_global_group` is set, the manifest's
/// `defaults.globalGroup` is added to the result.
pub fn resolve_request_scopes(
    request: &RuleRequest,
    manifest: &Manifest,
    use_global_group: bool,
) -> ResolvedScopes {
    let mut scopes = ResolvedScopes::default();
    let key = request.key.as_str();

    match request.scope {
        RuleScope::Project => resolve_project(&mut scopes, manifest, key),
        RuleScope::Group => {
            scopes.groups.insert(key.to_string());
        }
        RuleScope::Tech => resolve_tech(&mut scopes, manifest, key, &mut HashSet::new()),
        RuleScope::Language => {
            scopes.languages.insert(key.to_string());
        }
    }

    if use_global_group {
        if let Some(group) = &manifest.defaults.global_group {
            scopes.groups.insert(group.clone());
        }
    }

    scopes
}

fn resolve_project(scopes: &mut ResolvedScopes, manifest: &Manifest, key: &str) {
    scopes.projects.insert(key.to_string());

    let Some(project) = manifest.project(key) else {
        return;
    };

    scopes.groups.extend(project.groups.iter().cloned());

    for tech in &project.techs {
        resolve_tech(scopes, manifest, tech, &mut HashSet::new());
    }

    scopes.languages.extend(project.languages.iter().cloned());
}

/// Walk the `dependsOn` graph from `key`.
///
/// `visited` is shared across the walk so each tech is processed once, which
/// bounds the traversal even when the graph has cycles. Entries that are not
/// defined techs are languages.
fn resolve_tech<'m>(
    scopes: &mut ResolvedScopes,
    manifest: &'m Manifest,
    key: &'m str,
    visited: &mut HashSet<&'m str>,
) {
    if !visited.insert(key) {
        return;
    }
    scopes.techs.insert(key.to_string());

    let Some(tech) = manifest.tech(key) else {
        return;
    };

    for dependency in &tech.depends_on {
        if manifest.tech(dependency).is_some() {
            resolve_tech(scopes, manifest, dependency, visited);
        } else {
            scopes.languages.insert(dependency.clone());
        }
    }
}

/// Interpret the `USE_GLOBAL_RULES` switch value.
///
/// Only `"false"` (case-insensitive, surrounding whitespace ignored) turns the
/// global group off. Unset or any other value leaves it on.
pub fn global_group_enabled(switch: Option<&str>) -> bool {
    !switch.is_some_and(|value| value.trim().eq_ignore_ascii_case("false"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ManifestTech;

    fn tech(depends_on: &[&str]) -> Option<ManifestTech> {
        Some(ManifestTech {
            description: None,
            depends_on: depends_on.iter().map(|s| s.to_string()).collect(),
        })
    }

    #[test]
    fn tech_cycle_terminates() {
        let mut manifest = Manifest::default();
        manifest.techs.insert("a".into(), tech(&["b"]));
        manifest.techs.insert("b".into(), tech(&["c", "a"]));
        manifest.techs.insert("c".into(), tech(&["a", "rust"]));

        let scopes =
            resolve_request_scopes(&RuleRequest::new(RuleScope::Tech, "a"), &manifest, true);

        assert_eq!(scopes.techs.len(), 3);
        assert_eq!(scopes.languages.iter().collect::<Vec<_>>(), vec!["rust"]);
    }

    #[test]
    fn self_dependency_is_not_a_language() {
        let mut manifest = Manifest::default();
        manifest.techs.insert("a".into(), tech(&["a"]));

        let scopes =
            resolve_request_scopes(&RuleRequest::new(RuleScope::Tech, "a"), &manifest, true);

        assert_eq!(scopes.techs.len(), 1);
        assert!(scopes.languages.is_empty());
    }

    #[test]
    fn undefined_tech_entry_is_treated_as_language() {
        let mut manifest = Manifest::default();
        manifest.techs.insert("react".into(), tech(&["typescript"]));
        manifest.techs.insert("typescript".into(), None);

        let scopes =
            resolve_request_scopes(&RuleRequest::new(RuleScope::Tech, "react"), &manifest, true);

        assert!(scopes.languages.contains("typescript"));
        assert!(!scopes.techs.contains("typescript"));
    }

    #[test]
    fn global_switch_values() {
        assert!(global_group_enabled(None));
        assert!(global_group_enabled(Some("true")));
        assert!(global_group_enabled(Some("")));
        assert!(global_group_enabled(Some("no")));
        assert!(!global_group_enabled(Some("false")));
        assert!(!global_group_enabled(Some("  FALSE \n")));
        assert!(!global_group_enabled(Some("False")));
    }
}
