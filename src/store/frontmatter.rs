use crate::error::{Error, Result};
use crate::models::RuleFrontmatter;

/// Split a markdown document into its YAML frontmatter and body.
///
/// The first line must be `---` (an optional BOM is allowed). The block ends
/// at the next line that is exactly `---`; the body is everything after it.
/// Returns `None` when the document has no complete frontmatter block.
pub fn split_frontmatter(input: &str) -> Option<(&str, &str)> {
    let input = input.strip_prefix('\u{feff}').unwrap_or(input);
    let (first, rest) = split_line(input)?;
    if first.trim_end() != "---" {
        return None;
    }

    let mut offset = 0;
    let mut remaining = rest;
    while !remaining.is_empty() {
        let (line, after) = match split_line(remaining) {
            Some(parts) => parts,
            None => (remaining, ""),
        };
        if line.trim_end() == "---" {
            return Some((&rest[..offset], after));
        }
        offset += remaining.len() - after.len();
        remaining = after;
    }
    None
}

/// Split off the first line, consuming its terminator.
fn split_line(input: &str) -> Option<(&str, &str)> {
    let end = input.find('\n')?;
    let line = input[..end].strip_suffix('\r').unwrap_or(&input[..end]);
    Some((line, &input[end + 1..]))
}

/// Parse a rule document's frontmatter, returning it with the body.
///
/// `path` is only used to name the file in errors.
pub fn parse_rule_document<'a>(path: &str, raw: &'a str) -> Result<(RuleFrontmatter, &'a str)> {
    let invalid = |reason: String| Error::InvalidFrontmatter {
        path: path.to_string(),
        reason,
    };

    let (yaml, body) = split_frontmatter(raw)
        .ok_or_else(|| invalid("missing or invalid 'appliesTo' field".to_string()))?;

    let value: serde_yaml::Value =
        serde_yaml::from_str(yaml).map_err(|e| invalid(e.to_string()))?;

    let has_applies_to = value
        .get("appliesTo")
        .is_some_and(serde_yaml::Value::is_mapping);
    if !has_applies_to {
        return Err(invalid("missing or invalid 'appliesTo' field".to_string()));
    }

    let frontmatter: RuleFrontmatter =
        serde_yaml::from_str(yaml).map_err(|e| invalid(e.to_string()))?;
    Ok((frontmatter, body))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_block_and_body() {
        let doc = "---\nappliesTo:\n  groups: [global]\n---\n# Title\nBody\n";
        let (yaml, body) = split_frontmatter(doc).unwrap();
        assert_eq!(yaml, "appliesTo:\n  groups: [global]\n");
        assert_eq!(body, "# Title\nBody\n");
    }

    #[test]
    fn accepts_bom_and_crlf() {
        let doc = "\u{feff}---\r\ndescription: x\r\n---\r\nBody";
        let (yaml, body) = split_frontmatter(doc).unwrap();
        assert_eq!(yaml, "description: x\r\n");
        assert_eq!(body, "Body");
    }

    #[test]
    fn closing_delimiter_at_end_of_file() {
        let (yaml, body) = split_frontmatter("---\na: 1\n---").unwrap();
        assert_eq!(yaml, "a: 1\n");
        assert_eq!(body, "");
    }

    #[test]
    fn no_block_without_opening_delimiter() {
        assert!(split_frontmatter("# Title\n---\n").is_none());
        assert!(split_frontmatter("---\nunterminated: true\n").is_none());
    }

    #[test]
    fn parses_applies_to_and_optional_fields() {
        let doc = "---\nappliesTo:\n  techs: [react]\ntags: [ui]\ndescription: React rules\n---\nUse hooks.\n";
        let (fm, body) = parse_rule_document("tech/react.md", doc).unwrap();

        assert_eq!(fm.applies_to.techs, Some(vec!["react".to_string()]));
        assert!(fm.applies_to.groups.is_none());
        assert_eq!(fm.tags, Some(vec!["ui".to_string()]));
        assert_eq!(fm.description.as_deref(), Some("React rules"));
        assert_eq!(body, "Use hooks.\n");
    }

    #[test]
    fn numeric_scalars_are_read_as_strings() {
        let doc = "---\nappliesTo:\n  projects: [2024]\ntags: [2024]\ndescription: 42\n---\nBody";
        let (fm, _) = parse_rule_document("x.md", doc).unwrap();

        assert_eq!(fm.applies_to.projects, Some(vec!["2024".to_string()]));
        assert_eq!(fm.tags, Some(vec!["2024".to_string()]));
        assert_eq!(fm.description.as_deref(), Some("42"));
    }

    #[test]
    fn empty_applies_to_mapping_is_valid() {
        let (fm, _) = parse_rule_document("x.md", "---\nappliesTo: {}\n---\nBody").unwrap();
        assert_eq!(fm.applies_to, Default::default());
    }

    #[test]
    fn rejects_missing_or_scalar_applies_to() {
        for doc in [
            "No frontmatter",
            "---\ntags: [a]\n---\nBody",
            "---\nappliesTo: global\n---\nBody",
            "---\nappliesTo:\n---\nBody",
        ] {
            let err = parse_rule_document("bad.md", doc).unwrap_err();
            assert!(err.to_string().contains("bad.md"), "{}", err);
        }
    }
}
