// Rule table configuration loaded from TOML

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::{Rule, RuleSet};

/// Rule table configuration
///
/// ```toml
/// [settings]
/// sort_by_specificity = true
///
/// [[rules]]
/// name = "blog.post"
/// pattern = "/blog/:slug"
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct RouterConfig {
    #[serde(default)]
    pub settings: RouterSettings,

    #[serde(default)]
    pub rules: Vec<RuleConfig>,
}

/// Table-wide settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RouterSettings {
    /// Try rules with more static segments first (default: true)
    #[serde(default = "default_true")]
    pub sort_by_specificity: bool,
}

/// One `[[rules]]` entry
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RuleConfig {
    pub name: String,

    /// Missing pattern means the site root
    #[serde(default)]
    pub pattern: String,
}

fn default_true() -> bool {
    true
}

impl Default for RouterSettings {
    fn default() -> Self {
        Self {
            sort_by_specificity: true,
        }
    }
}

impl RouterConfig {
    /// Load configuration from a TOML file
    ///
    /// A missing or blank file yields the default (empty) configuration.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read router config: {:?}", path))?;

        Self::from_toml_str(&content)
            .with_context(|| format!("Failed to parse router config: {:?}", path))
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }

        let config: RouterConfig = toml::from_str(content)?;
        Ok(config)
    }

    /// Builds the rule table described by this configuration
    pub fn into_rule_set(self) -> Result<RuleSet> {
        let mut rules = RuleSet::new();

        for entry in self.rules {
            let rule = Rule::new(entry.name.as_str(), entry.pattern.as_str())
                .with_context(|| format!("Invalid rule {:?}", entry.name))?;
            rules
                .add(rule)
                .with_context(|| format!("Invalid rule {:?}", entry.name))?;
        }

        if self.settings.sort_by_specificity {
            rules.sort_by_specificity();
        }

        Ok(rules)
    }
}
