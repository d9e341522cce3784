//! `manifest.yaml` parsing.
//!
//! Manifests use a small, line-oriented YAML subset: top-level `key: value`
//! pairs, inline `[a, b]` lists, indented `- item` block lists, and `#`
//! comments. `name` is required; `version` defaults to `0.0.0` when
//! absent; `capabilities` and `fragment_categories` are recognized string
//! lists; every other key is passed through into `PluginManifest::extra`
//! as opaque metadata.

use polymath_core::PluginManifest;
use polymath_core::error::RegistryError;
use std::collections::BTreeSet;
use std::path::Path;

/// Version recorded for manifests that do not declare one.
pub const DEFAULT_VERSION: &str = "0.0.0";

/// A parsed manifest value (subset: strings and string lists).
#[derive(Debug, Clone)]
enum YamlValue {
    String(String),
    List(Vec<String>),
}

impl From<YamlValue> for serde_json::Value {
    fn from(value: YamlValue) -> Self {
        match value {
            YamlValue::String(s) => serde_json::Value::String(s),
            YamlValue::List(items) => {
                serde_json::Value::Array(items.into_iter().map(serde_json::Value::String).collect())
            }
        }
    }
}

/// Read and parse a plugin's `manifest.yaml`.
pub fn parse_manifest(path: &Path) -> Result<PluginManifest, RegistryError> {
    let content = std::fs::read_to_string(path).map_err(|e| RegistryError::Manifest {
        path: path.to_path_buf(),
        reason: format!("unreadable: {e}"),
    })?;
    parse_manifest_str(&content, path)
}

/// Parse manifest content. `path` is used for error reporting only.
pub fn parse_manifest_str(content: &str, path: &Path) -> Result<PluginManifest, RegistryError> {
    let fields = parse_yaml_fields(content);

    let string_field = |key: &str| -> Option<String> {
        match fields.iter().find(|(k, _)| k == key) {
            Some((_, YamlValue::String(s))) if !s.is_empty() => Some(s.clone()),
            _ => None,
        }
    };

    let name = string_field("name").ok_or_else(|| RegistryError::Manifest {
        path: path.to_path_buf(),
        reason: "missing required key 'name'".into(),
    })?;
    // A bare manifest carrying only a name is a valid plugin.
    let version = string_field("version").unwrap_or_else(|| DEFAULT_VERSION.to_string());

    let string_set = |key: &str| -> BTreeSet<String> {
        match fields.iter().find(|(k, _)| k == key) {
            Some((_, YamlValue::List(items))) => items.iter().cloned().collect(),
            Some((_, YamlValue::String(s))) if !s.is_empty() => [s.clone()].into_iter().collect(),
            _ => BTreeSet::new(),
        }
    };

    let capabilities = string_set("capabilities");
    let fragment_categories = string_set("fragment_categories");

    let mut extra = serde_json::Map::new();
    for (key, value) in fields {
        if matches!(
            key.as_str(),
            "name" | "version" | "capabilities" | "fragment_categories"
        ) {
            continue;
        }
        extra.insert(key, value.into());
    }

    Ok(PluginManifest {
        name,
        version,
        capabilities,
        fragment_categories,
        extra,
    })
}

/// Parse the YAML subset into ordered (key, value) pairs.
/// Handles: `key: value`, `key: [a, b]`, `key:` followed by `- item` lines.
fn parse_yaml_fields(content: &str) -> Vec<(String, YamlValue)> {
    let mut fields: Vec<(String, YamlValue)> = Vec::new();
    let lines: Vec<&str> = content.lines().collect();
    let mut i = 0;

    while i < lines.len() {
        let line = lines[i];
        let trimmed = line.trim();

        // Skip blanks, comments, and anything indented under a consumed key
        if trimmed.is_empty() || trimmed.starts_with('#') || indent_level(line) > 0 {
            i += 1;
            continue;
        }

        let Some((key, value)) = split_key_value(trimmed) else {
            i += 1;
            continue;
        };

        if value.is_empty() {
            // A list block may follow
            let (items, consumed) = parse_block_list(&lines, i + 1);
            fields.push((key, YamlValue::List(items)));
            i += 1 + consumed;
        } else if value.starts_with('[') && value.ends_with(']') {
            fields.push((key, YamlValue::List(parse_inline_list(&value))));
            i += 1;
        } else {
            fields.push((key, YamlValue::String(unquote(&value))));
            i += 1;
        }
    }

    fields
}

fn split_key_value(line: &str) -> Option<(String, String)> {
    let colon = line.find(':')?;
    let key = line[..colon].trim();
    if key.is_empty() || key.starts_with('-') || key.contains(' ') {
        return None;
    }
    Some((key.to_string(), line[colon + 1..].trim().to_string()))
}

fn indent_level(line: &str) -> usize {
    line.len() - line.trim_start().len()
}

/// Consume consecutive indented `- item` lines. Returns (items, lines consumed).
fn parse_block_list(lines: &[&str], start: usize) -> (Vec<String>, usize) {
    let mut items = Vec::new();
    let mut i = start;
    while i < lines.len() {
        let trimmed = lines[i].trim();
        if trimmed.is_empty() {
            i += 1;
            continue;
        }
        if indent_level(lines[i]) == 0 || !trimmed.starts_with('-') {
            break;
        }
        items.push(unquote(trimmed.trim_start_matches('-').trim()));
        i += 1;
    }
    (items, i - start)
}

fn parse_inline_list(value: &str) -> Vec<String> {
    value[1..value.len() - 1]
        .split(',')
        .map(|item| unquote(item.trim()))
        .filter(|item| !item.is_empty())
        .collect()
}

fn unquote(value: &str) -> String {
    let v = value.trim();
    if v.len() >= 2
        && ((v.starts_with('"') && v.ends_with('"')) || (v.starts_with('\'') && v.ends_with('\'')))
    {
        v[1..v.len() - 1].to_string()
    } else {
        v.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn parse(content: &str) -> Result<PluginManifest, RegistryError> {
        parse_manifest_str(content, &PathBuf::from("test/manifest.yaml"))
    }

    #[test]
    fn parses_minimal_manifest() {
        let m = parse("name: security\nversion: \"1.0.0\"\n").unwrap();
        assert_eq!(m.name, "security");
        assert_eq!(m.version, "1.0.0");
        assert!(m.capabilities.is_empty());
    }

    #[test]
    fn parses_inline_capability_list() {
        let m = parse("name: web-dev\nversion: 0.2.1\ncapabilities: [review, audit]\n").unwrap();
        assert!(m.capabilities.contains("review"));
        assert!(m.capabilities.contains("audit"));
        assert_eq!(m.capabilities.len(), 2);
    }

    #[test]
    fn parses_block_list() {
        let yaml = "name: security\nversion: 1.0.0\nfragment_categories:\n  - cves\n  - advisories\n";
        let m = parse(yaml).unwrap();
        assert!(m.fragment_categories.contains("cves"));
        assert!(m.fragment_categories.contains("advisories"));
    }

    #[test]
    fn missing_name_is_a_manifest_error() {
        let err = parse("version: 1.0.0\n").unwrap_err();
        assert!(err.to_string().contains("missing required key 'name'"));
    }

    #[test]
    fn missing_version_defaults() {
        let m = parse("name: security\n").unwrap();
        assert_eq!(m.version, DEFAULT_VERSION);
    }

    #[test]
    fn unknown_keys_pass_through_as_extra() {
        let yaml = "name: security\nversion: 1.0.0\nauthor: ghost-team\ntags: [a, b]\n";
        let m = parse(yaml).unwrap();
        assert_eq!(m.extra["author"], serde_json::json!("ghost-team"));
        assert_eq!(m.extra["tags"], serde_json::json!(["a", "b"]));
    }

    #[test]
    fn comments_and_blanks_are_skipped() {
        let yaml = "# plugin manifest\n\nname: security\n# a comment\nversion: 1.0.0\n";
        let m = parse(yaml).unwrap();
        assert_eq!(m.name, "security");
    }

    #[test]
    fn quoted_values_are_unquoted() {
        let m = parse("name: 'security'\nversion: \"2.0\"\n").unwrap();
        assert_eq!(m.name, "security");
        assert_eq!(m.version, "2.0");
    }
}
