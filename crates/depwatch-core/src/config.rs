//! Checker configuration.
//!
//! Everything the checker needs to know about one tracked file family:
//! the enablement key, the base name to watch, the comment tag, the PR
//! label, and who to /cc. Contacts are carried here rather than read from
//! ambient process state so the composer is testable without environment
//! setup.

use serde::{Deserialize, Serialize};

use crate::error::{CheckerError, Result};

/// Configuration for one checker family.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CheckerConfig {
    /// Enablement key looked up on the branch record (e.g. "gemfile_checker").
    pub checker_key: String,

    /// Exact base name of the tracked file (e.g. "Gemfile"). Matches the
    /// final path segment only; `sub/Gemfile` counts, `Gemfile.lock` does not.
    pub tracked_basename: String,

    /// Fixed tag prepended to every composed comment. Recognition of prior
    /// comments is solely a starts-with check on this literal.
    pub tag: String,

    /// Label applied to the pull request.
    pub label: String,

    /// Contacts mentioned in the comment, in order. May be empty.
    #[serde(default)]
    pub pr_contacts: Vec<String>,
}

impl CheckerConfig {
    /// The canonical Gemfile checker configuration.
    pub fn gemfile() -> Self {
        CheckerConfig {
            checker_key: "gemfile_checker".to_string(),
            tracked_basename: "Gemfile".to_string(),
            tag: "<gemfile_checker />".to_string(),
            label: "gem changes".to_string(),
            pr_contacts: Vec::new(),
        }
    }

    /// Set the contacts to mention.
    pub fn with_contacts(mut self, contacts: impl IntoIterator<Item = String>) -> Self {
        self.pr_contacts = contacts.into_iter().collect();
        self
    }

    /// Parse a configuration from TOML.
    pub fn from_toml_str(raw: &str) -> Result<Self> {
        let config: CheckerConfig =
            toml::from_str(raw).map_err(|e| CheckerError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject configurations the checker cannot act on.
    pub fn validate(&self) -> Result<()> {
        if self.checker_key.is_empty() {
            return Err(CheckerError::Config("checker_key must not be empty".to_string()));
        }
        if self.tracked_basename.is_empty() {
            return Err(CheckerError::Config(
                "tracked_basename must not be empty".to_string(),
            ));
        }
        if self.tracked_basename.contains('/') {
            return Err(CheckerError::Config(format!(
                "tracked_basename must be a base name, not a path: {}",
                self.tracked_basename
            )));
        }
        if self.tag.is_empty() {
            return Err(CheckerError::Config("tag must not be empty".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gemfile_defaults() {
        let config = CheckerConfig::gemfile();
        assert_eq!(config.checker_key, "gemfile_checker");
        assert_eq!(config.tracked_basename, "Gemfile");
        assert_eq!(config.tag, "<gemfile_checker />");
        assert_eq!(config.label, "gem changes");
        assert!(config.pr_contacts.is_empty());
        config.validate().expect("default config must be valid");
    }

    #[test]
    fn with_contacts_sets_contacts() {
        let config = CheckerConfig::gemfile()
            .with_contacts(["@alice".to_string(), "@bob".to_string()]);
        assert_eq!(config.pr_contacts, vec!["@alice", "@bob"]);
    }

    #[test]
    fn from_toml_parses_full_config() {
        let raw = r#"
            checker_key = "gemfile_checker"
            tracked_basename = "Gemfile"
            tag = "<gemfile_checker />"
            label = "gem changes"
            pr_contacts = ["@alice", "@bob"]
        "#;
        let config = CheckerConfig::from_toml_str(raw).unwrap();
        assert_eq!(config, CheckerConfig::gemfile().with_contacts([
            "@alice".to_string(),
            "@bob".to_string(),
        ]));
    }

    #[test]
    fn from_toml_contacts_default_empty() {
        let raw = r#"
            checker_key = "gemfile_checker"
            tracked_basename = "Gemfile"
            tag = "<gemfile_checker />"
            label = "gem changes"
        "#;
        let config = CheckerConfig::from_toml_str(raw).unwrap();
        assert!(config.pr_contacts.is_empty());
    }

    #[test]
    fn from_toml_rejects_path_basename() {
        let raw = r#"
            checker_key = "gemfile_checker"
            tracked_basename = "config/Gemfile"
            tag = "<gemfile_checker />"
            label = "gem changes"
        "#;
        let err = CheckerConfig::from_toml_str(raw).unwrap_err();
        assert!(err.to_string().contains("base name"));
    }

    #[test]
    fn validate_rejects_empty_tag() {
        let mut config = CheckerConfig::gemfile();
        config.tag = String::new();
        assert!(config.validate().is_err());
    }
}
