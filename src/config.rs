//! Configuration file for interpcheck.
//!
//! A config selects which rules run and which files are checked.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Component, Path};

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::detect::{RuleId, RuleSet};

/// File names searched for in the working directory, in order.
pub const DEFAULT_CONFIG_NAMES: &[&str] = &["interpcheck.yaml", ".interpcheck.yaml"];

/// Default config written by `interpcheck init`.
pub const DEFAULT_TEMPLATE: &str = include_str!("templates/default.yaml");

/// Top-level config definition.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct Config {
    #[serde(default)]
    pub version: String,
    /// Rule switches keyed by rule identifier. Missing rules are enabled.
    #[serde(default)]
    pub rules: BTreeMap<String, bool>,
    /// Glob patterns for paths to exclude from analysis (e.g., "**/Migrations/**")
    #[serde(default)]
    pub excluded_paths: Vec<String>,
    /// Whether to check generated sources (default: false)
    #[serde(default)]
    pub include_generated: bool,
}

impl Config {
    /// Parse a config from a YAML file.
    pub fn parse_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        let config: Config = serde_yaml::from_str(&content)
            .with_context(|| format!("failed to parse config {}", path.display()))?;
        Ok(config)
    }

    /// The rules this config enables. Unknown names are ignored here and
    /// rejected by [`validate`].
    pub fn rule_set(&self) -> RuleSet {
        let mut rules = RuleSet::all();
        for (name, enabled) in &self.rules {
            if let Some(rule) = RuleId::parse(name) {
                rules.set(rule, *enabled);
            }
        }
        rules
    }

    /// Check if a path should be excluded based on excluded_paths patterns.
    /// Uses globset for matching, which supports `**` for recursive directory matching.
    pub fn is_path_excluded(&self, path: &Path) -> bool {
        if self.excluded_paths.is_empty() {
            return false;
        }

        let path_str = path.to_string_lossy();

        for pattern in &self.excluded_paths {
            if let Ok(glob) = globset::Glob::new(pattern) {
                let matcher = glob.compile_matcher();
                if matcher.is_match(&*path_str) {
                    return true;
                }
            }
        }
        false
    }

    /// Whether a path (relative to the scan root) should be skipped.
    pub fn should_skip(&self, path: &Path) -> bool {
        self.is_path_excluded(path) || (!self.include_generated && is_generated(path))
    }
}

/// Heuristic for tool-generated C# sources and build output directories.
pub fn is_generated(path: &Path) -> bool {
    let in_build_dir = path.parent().map_or(false, |parent| {
        parent.components().any(|c| match c {
            Component::Normal(name) => {
                name.eq_ignore_ascii_case("obj") || name.eq_ignore_ascii_case("bin")
            }
            _ => false,
        })
    });
    if in_build_dir {
        return true;
    }

    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_lowercase())
        .unwrap_or_default();
    name.ends_with(".g.cs") || name.ends_with(".designer.cs")
}

/// Look for a config file in `dir`.
pub fn discover(dir: &Path) -> Option<std::path::PathBuf> {
    DEFAULT_CONFIG_NAMES
        .iter()
        .map(|name| dir.join(name))
        .find(|candidate| candidate.is_file())
}

/// Validate a config for correctness.
pub fn validate(config: &Config) -> anyhow::Result<()> {
    for name in config.rules.keys() {
        if RuleId::parse(name).is_none() {
            let known: Vec<_> = RuleId::ALL.iter().map(|r| r.as_str()).collect();
            anyhow::bail!(
                "unknown rule {:?} in config, expected one of: {}",
                name,
                known.join(", ")
            );
        }
    }

    // Validate excluded_paths glob patterns compile
    for pattern in &config.excluded_paths {
        globset::Glob::new(pattern)
            .map_err(|e| anyhow::anyhow!("invalid excluded_paths pattern {:?}: {}", pattern, e))?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_parse_config() {
        let yaml = r#"
version: "1"
rules:
  DollarBrace: true
  UnnecessaryInterpolation: false
excluded_paths:
  - "**/Migrations/**"
"#;
        let config: Config = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.version, "1");
        assert!(!config.include_generated);
        validate(&config).unwrap();

        let rules = config.rule_set();
        assert!(rules.is_enabled(RuleId::DollarBrace));
        assert!(!rules.is_enabled(RuleId::UnnecessaryInterpolation));
    }

    #[test]
    fn test_missing_rules_default_to_enabled() {
        let config: Config = serde_yaml::from_str("version: \"1\"\n").unwrap();
        assert_eq!(config.rule_set(), RuleSet::all());
    }

    #[test]
    fn test_validate_rejects_unknown_rule() {
        let config: Config = serde_yaml::from_str("rules:\n  DollarSign: false\n").unwrap();
        let err = validate(&config).unwrap_err();
        assert!(err.to_string().contains("DollarSign"));
    }

    #[test]
    fn test_validate_rejects_bad_glob() {
        let config = Config {
            excluded_paths: vec!["src/[".to_string()],
            ..Default::default()
        };
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_path_exclusion() {
        let config = Config {
            excluded_paths: vec!["**/Migrations/**".to_string()],
            ..Default::default()
        };
        assert!(config.is_path_excluded(Path::new("Data/Migrations/Init.cs")));
        assert!(!config.is_path_excluded(Path::new("Data/Context.cs")));
    }

    #[test]
    fn test_generated_files() {
        assert!(is_generated(Path::new("Forms/Main.Designer.cs")));
        assert!(is_generated(Path::new("Grpc/Service.g.cs")));
        assert!(is_generated(Path::new("obj/Debug/AssemblyInfo.cs")));
        assert!(!is_generated(Path::new("Objects/Thing.cs")));
        assert!(!is_generated(Path::new("Program.cs")));

        let config = Config::default();
        assert!(config.should_skip(Path::new("bin/Release/Gen.cs")));

        let config = Config {
            include_generated: true,
            ..Default::default()
        };
        assert!(!config.should_skip(Path::new("bin/Release/Gen.cs")));
    }

    #[test]
    fn test_default_template_is_valid() {
        let config: Config = serde_yaml::from_str(DEFAULT_TEMPLATE).unwrap();
        validate(&config).unwrap();
        assert_eq!(config.rule_set(), RuleSet::all());
    }

    #[test]
    fn test_discover() {
        let temp = TempDir::new().unwrap();
        assert!(discover(temp.path()).is_none());

        std::fs::write(temp.path().join(".interpcheck.yaml"), "version: \"1\"\n").unwrap();
        let found = discover(temp.path()).unwrap();
        assert!(found.ends_with(".interpcheck.yaml"));
        assert_eq!(Config::parse_file(found).unwrap().version, "1");
    }
}
