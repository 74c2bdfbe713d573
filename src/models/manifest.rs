use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};

/// A catalog of entries keyed by free-form identifiers.
///
/// Entry values are optional: a key written with no body (`react:`) is still
/// listed, but is not treated as defined when resolving relationships.
pub type Catalog<T> = BTreeMap<String, Option<T>>;

/// The relationships between projects, groups, techs, and languages.
///
/// Every section is optional. An empty manifest is valid and resolves every
/// request to just the requested key.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Manifest {
    #[serde(default, deserialize_with = "lenient_version")]
    pub version: Option<u64>,
    #[serde(default, deserialize_with = "nullable")]
    pub languages: Catalog<ManifestLanguage>,
    #[serde(default, deserialize_with = "nullable")]
    pub techs: Catalog<ManifestTech>,
    #[serde(default, deserialize_with = "nullable")]
    pub groups: Catalog<ManifestGroup>,
    #[serde(default, deserialize_with = "nullable")]
    pub projects: Catalog<ManifestProject>,
    #[serde(default, deserialize_with = "nullable")]
    pub defaults: ManifestDefaults,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ManifestLanguage {
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManifestTech {
    pub description: Option<String>,
    /// Other tech keys, or language keys when the entry is not a defined tech.
    #[serde(default, deserialize_with = "nullable")]
    pub depends_on: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ManifestGroup {
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ManifestProject {
    pub description: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub groups: Vec<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub techs: Vec<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub languages: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManifestDefaults {
    /// Group implicitly added to every resolution.
    pub global_group: Option<String>,
}

impl Manifest {
    /// Look up a tech that has a body in the manifest.
    pub fn tech(&self, key: &str) -> Option<&ManifestTech> {
        self.techs.get(key).and_then(Option::as_ref)
    }

    /// Look up a project that has a body in the manifest.
    pub fn project(&self, key: &str) -> Option<&ManifestProject> {
        self.projects.get(key).and_then(Option::as_ref)
    }
}

/// Treat an explicit YAML null the same as a missing field.
fn nullable<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Accept only a non-negative integer version; anything else reads as absent.
fn lenient_version<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_yaml::Value::deserialize(deserializer)?;
    Ok(value.as_u64())
}
