use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::ConfigError;

/// Review automation settings loaded from `yamldiff.yaml`.
///
/// ```
/// # use yamldiff_core::review::ReviewConfig;
/// let config = ReviewConfig::from_yaml_str(
///     "repo_owner: acme\nrepo_name: infra\nyamldiff:\n  compare:\n    disable_label: true\n",
/// )?;
/// assert_eq!(config.repo_full_name().as_deref(), Some("acme/infra"));
/// assert!(config.yamldiff.compare.disable_label);
/// # Ok::<(), yamldiff_core::ConfigError>(())
/// ```
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ReviewConfig {
    /// Repository owner (user or organization).
    pub repo_owner: String,
    /// Repository name.
    pub repo_name: String,
    /// Tool-specific settings.
    pub yamldiff: ToolConfig,
}

/// The `yamldiff:` section.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ToolConfig {
    /// Settings for the compare command.
    pub compare: CompareConfig,
}

/// Comment and label policy for a comparison.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct CompareConfig {
    /// Comment body template.
    pub template: String,
    /// Label applied when documents were added.
    pub when_has_additions: LabelConfig,
    /// Label applied when documents were deleted.
    pub when_has_deletions: LabelConfig,
    /// Label applied when documents were modified.
    pub when_has_modifications: LabelConfig,
    /// Label applied when nothing changed.
    pub when_no_changes: LabelConfig,
    /// Never post a comment.
    pub disable_comment: bool,
    /// Never apply labels.
    pub disable_label: bool,
}

/// A single label setting.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct LabelConfig {
    /// Label name; empty means no label.
    pub label: String,
}

impl ReviewConfig {
    /// Reads and parses a configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .map_err(|source| ConfigError::Io { path: path.to_path_buf(), source })?;
        Self::from_yaml_str(&text)
    }

    /// Parses configuration text. An empty document yields the defaults.
    pub fn from_yaml_str(text: &str) -> Result<Self, ConfigError> {
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(text)?)
    }

    /// `owner/name`, when both parts are configured.
    #[must_use]
    pub fn repo_full_name(&self) -> Option<String> {
        if self.repo_owner.is_empty() || self.repo_name.is_empty() {
            None
        } else {
            Some(format!("{}/{}", self.repo_owner, self.repo_name))
        }
    }
}

impl CompareConfig {
    /// Labels for the given counts.
    ///
    /// One label per non-empty category, in the order additions, deletions,
    /// modifications; or only the no-changes label when all are zero.
    /// Unset labels are skipped.
    ///
    /// ```
    /// # use yamldiff_core::review::{CompareConfig, LabelConfig};
    /// let config = CompareConfig {
    ///     when_has_additions: LabelConfig { label: "add".into() },
    ///     when_has_modifications: LabelConfig { label: "mod".into() },
    ///     when_no_changes: LabelConfig { label: "none".into() },
    ///     ..CompareConfig::default()
    /// };
    /// assert_eq!(config.labels(1, 1, 1), ["add", "mod"]);
    /// assert_eq!(config.labels(0, 0, 0), ["none"]);
    /// ```
    #[must_use]
    pub fn labels(&self, added: usize, deleted: usize, modified: usize) -> Vec<String> {
        let candidates: Vec<&LabelConfig> = if added == 0 && deleted == 0 && modified == 0 {
            vec![&self.when_no_changes]
        } else {
            [
                (added > 0, &self.when_has_additions),
                (deleted > 0, &self.when_has_deletions),
                (modified > 0, &self.when_has_modifications),
            ]
            .into_iter()
            .filter_map(|(applies, label)| applies.then_some(label))
            .collect()
        };
        candidates
            .into_iter()
            .filter(|config| !config.label.is_empty())
            .map(|config| config.label.clone())
            .collect()
    }
}
