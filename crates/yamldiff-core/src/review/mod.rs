//! Publishing comparison results to a pull request: comment bodies rendered
//! from a template, plus labels chosen from the change counts.
//!
//! The host itself sits behind [`ReviewHost`], so the policy here can be
//! tested without a network or the `gh` binary.

use std::collections::BTreeMap;

use crate::{ComparisonResult, ReviewError};

mod config;
mod data;
mod template;

pub use config::{CompareConfig, LabelConfig, ReviewConfig, ToolConfig};
pub use data::TemplateData;
pub use template::{render_template, Template};

/// Default label for the legacy flow when differences exist.
pub const DEFAULT_CHANGES_LABEL: &str = "config-sync/changes";
/// Default label for the legacy flow when nothing changed.
pub const DEFAULT_NO_CHANGES_LABEL: &str = "config-sync/no-changes";

/// A code-review host able to comment on and label pull requests.
pub trait ReviewHost {
    /// Posts `body` as a comment on pull request `pr` of `repo` (`owner/name`).
    fn post_comment(&self, repo: &str, pr: u64, body: &str) -> Result<(), ReviewError>;

    /// Adds every label in `labels` to pull request `pr` of `repo`.
    fn add_labels(&self, repo: &str, pr: u64, labels: &[String]) -> Result<(), ReviewError>;
}

/// Command-line side of a review request.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ReviewRequest {
    /// Explicit `owner/name`; overrides the config file.
    pub repo: Option<String>,
    /// Pull request number.
    pub pull_request: Option<u64>,
    /// Access token.
    pub token: Option<String>,
    /// Whether a comment should be posted.
    pub post_comment: bool,
    /// CI build link exposed to the template.
    pub link: String,
    /// Extra template variables.
    pub vars: BTreeMap<String, String>,
}

/// Actions taken by [`publish`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PublishOutcome {
    /// Body of the posted comment, if one was posted.
    pub comment: Option<String>,
    /// Labels added to the pull request.
    pub labels: Vec<String>,
}

/// Labels used by [`apply_legacy_label`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LegacyLabels {
    /// Applied when differences exist.
    pub changes: String,
    /// Applied when nothing changed.
    pub no_changes: String,
}

impl Default for LegacyLabels {
    fn default() -> Self {
        Self {
            changes: DEFAULT_CHANGES_LABEL.to_string(),
            no_changes: DEFAULT_NO_CHANGES_LABEL.to_string(),
        }
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|value| !value.trim().is_empty())
}

fn validate(request: &ReviewRequest, repo: Option<String>) -> Result<(String, u64), ReviewError> {
    let repo = repo.ok_or(ReviewError::MissingRepository)?;
    let pr = request.pull_request.filter(|pr| *pr != 0).ok_or(ReviewError::MissingPullRequest)?;
    non_empty(request.token.as_deref()).ok_or(ReviewError::MissingToken)?;
    Ok((repo, pr))
}

/// Applies the configured comment and label policy to a pull request.
///
/// The repository comes from `request.repo`, falling back to the config's
/// `repo_owner/repo_name`. Repository, pull request number and token are
/// validated in that order before anything is sent to `host`.
pub fn publish(
    result: &ComparisonResult,
    details: &str,
    config: &ReviewConfig,
    request: &ReviewRequest,
    host: &dyn ReviewHost,
) -> Result<PublishOutcome, ReviewError> {
    let repo = non_empty(request.repo.as_deref())
        .map(str::to_string)
        .or_else(|| config.repo_full_name());
    let (repo, pr) = validate(request, repo)?;
    let compare = &config.yamldiff.compare;
    let mut outcome = PublishOutcome::default();

    if request.post_comment && !compare.disable_comment && !compare.template.is_empty() {
        let data = TemplateData::new(result, details, &request.link, request.vars.clone());
        let body = render_template(&compare.template, &data.to_value())?;
        host.post_comment(&repo, pr, &body)?;
        tracing::info!(repo = %repo, pr, "posted review comment");
        outcome.comment = Some(body);
    } else if request.post_comment {
        tracing::debug!("comment skipped: disabled or no template configured");
    }

    if !compare.disable_label {
        let summary = result.summary();
        let labels = compare.labels(summary.added, summary.deleted, summary.modified);
        if !labels.is_empty() {
            host.add_labels(&repo, pr, &labels)?;
            tracing::info!(repo = %repo, pr, ?labels, "applied review labels");
            outcome.labels = labels;
        }
    }
    Ok(outcome)
}

/// Adds a single changes/no-changes label without a config file.
///
/// Returns the label that was applied.
pub fn apply_legacy_label(
    result: &ComparisonResult,
    labels: &LegacyLabels,
    request: &ReviewRequest,
    host: &dyn ReviewHost,
) -> Result<String, ReviewError> {
    let repo = non_empty(request.repo.as_deref()).map(str::to_string);
    let (repo, pr) = validate(request, repo)?;
    let label = if result.has_differences() { &labels.changes } else { &labels.no_changes };
    host.add_labels(&repo, pr, std::slice::from_ref(label))?;
    tracing::info!(repo = %repo, pr, label = %label, "applied review label");
    Ok(label.clone())
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::*;
    use crate::{parse_documents, Engine};

    #[derive(Debug, PartialEq, Eq)]
    enum Call {
        Comment(String, u64, String),
        Labels(String, u64, Vec<String>),
    }

    #[derive(Default)]
    struct RecordingHost {
        calls: RefCell<Vec<Call>>,
        fail: bool,
    }

    impl ReviewHost for RecordingHost {
        fn post_comment(&self, repo: &str, pr: u64, body: &str) -> Result<(), ReviewError> {
            if self.fail {
                return Err(ReviewError::Host { action: "post comment", message: "boom".into() });
            }
            self.calls.borrow_mut().push(Call::Comment(repo.into(), pr, body.into()));
            Ok(())
        }

        fn add_labels(&self, repo: &str, pr: u64, labels: &[String]) -> Result<(), ReviewError> {
            self.calls.borrow_mut().push(Call::Labels(repo.into(), pr, labels.to_vec()));
            Ok(())
        }
    }

    fn changed_result() -> ComparisonResult {
        let old = parse_documents("metadata: {name: a}\nv: 1\n").unwrap();
        let new = parse_documents("metadata: {name: a}\nv: 2\n---\nmetadata: {name: b}\n").unwrap();
        Engine::default().compare(old, new)
    }

    fn config() -> ReviewConfig {
        ReviewConfig::from_yaml_str(
            "repo_owner: acme\nrepo_name: infra\nyamldiff:\n  compare:\n    \
             template: \"{{.Summary}} {{range .AddedList}}[{{.}}]{{end}} {{.Vars.env}}\"\n    \
             when_has_additions: {label: add}\n    \
             when_has_modifications: {label: mod}\n    \
             when_no_changes: {label: none}\n",
        )
        .unwrap()
    }

    fn request() -> ReviewRequest {
        ReviewRequest {
            pull_request: Some(7),
            token: Some("t0ken".into()),
            post_comment: true,
            vars: BTreeMap::from([("env".to_string(), "prod".to_string())]),
            ..ReviewRequest::default()
        }
    }

    #[test]
    fn publish_posts_comment_and_labels() {
        let host = RecordingHost::default();
        let outcome = publish(&changed_result(), "", &config(), &request(), &host).unwrap();
        let body = "Plan: 1 to add, 0 to delete, 1 to modify [b] prod";
        assert_eq!(outcome.comment.as_deref(), Some(body));
        assert_eq!(outcome.labels, ["add", "mod"]);
        assert_eq!(
            *host.calls.borrow(),
            [
                Call::Comment("acme/infra".into(), 7, body.into()),
                Call::Labels("acme/infra".into(), 7, vec!["add".into(), "mod".into()]),
            ]
        );
    }

    #[test]
    fn explicit_repo_overrides_config() {
        let host = RecordingHost::default();
        let request = ReviewRequest { repo: Some("other/repo".into()), ..request() };
        publish(&ComparisonResult::default(), "", &config(), &request, &host).unwrap();
        let body = "Plan: 0 to add, 0 to delete, 0 to modify  prod";
        assert_eq!(
            *host.calls.borrow(),
            [
                Call::Comment("other/repo".into(), 7, body.into()),
                Call::Labels("other/repo".into(), 7, vec!["none".into()]),
            ]
        );
    }

    #[test]
    fn disabled_comment_and_labels_send_nothing() {
        let host = RecordingHost::default();
        let mut config = config();
        config.yamldiff.compare.disable_comment = true;
        config.yamldiff.compare.disable_label = true;
        let outcome = publish(&changed_result(), "", &config, &request(), &host).unwrap();
        assert_eq!(outcome, PublishOutcome::default());
        assert!(host.calls.borrow().is_empty());
    }

    #[test]
    fn comment_requires_flag() {
        let host = RecordingHost::default();
        let request = ReviewRequest { post_comment: false, ..request() };
        let outcome = publish(&changed_result(), "", &config(), &request, &host).unwrap();
        assert_eq!(outcome.comment, None);
        assert_eq!(outcome.labels, ["add", "mod"]);
    }

    #[test]
    fn validation_order_is_repo_then_pr_then_token() {
        let host = RecordingHost::default();
        let bare = ReviewRequest::default();
        let err = publish(&changed_result(), "", &ReviewConfig::default(), &bare, &host);
        assert!(matches!(err, Err(ReviewError::MissingRepository)));

        let no_pr = ReviewRequest { pull_request: Some(0), ..request() };
        let err = publish(&changed_result(), "", &config(), &no_pr, &host);
        assert!(matches!(err, Err(ReviewError::MissingPullRequest)));

        let no_token = ReviewRequest { token: Some(String::new()), ..request() };
        let err = publish(&changed_result(), "", &config(), &no_token, &host);
        assert!(matches!(err, Err(ReviewError::MissingToken)));
        assert!(host.calls.borrow().is_empty());
    }

    #[test]
    fn template_errors_surface() {
        let host = RecordingHost::default();
        let mut config = config();
        config.yamldiff.compare.template = "{{.Nope}}".into();
        let err = publish(&changed_result(), "", &config, &request(), &host).unwrap_err();
        assert!(matches!(err, ReviewError::Template(_)));
    }

    #[test]
    fn host_failures_stop_publishing() {
        let host = RecordingHost { fail: true, ..RecordingHost::default() };
        let err = publish(&changed_result(), "", &config(), &request(), &host).unwrap_err();
        assert_eq!(err.to_string(), "failed to post comment: boom");
        assert!(host.calls.borrow().is_empty());
    }

    #[test]
    fn legacy_label_tracks_differences() {
        let host = RecordingHost::default();
        let request = ReviewRequest { repo: Some("acme/infra".into()), ..request() };
        let labels = LegacyLabels::default();
        let applied = apply_legacy_label(&changed_result(), &labels, &request, &host).unwrap();
        assert_eq!(applied, DEFAULT_CHANGES_LABEL);
        let applied =
            apply_legacy_label(&ComparisonResult::default(), &labels, &request, &host).unwrap();
        assert_eq!(applied, DEFAULT_NO_CHANGES_LABEL);
        assert_eq!(host.calls.borrow().len(), 2);
    }

    #[test]
    fn legacy_label_needs_explicit_repo() {
        let host = RecordingHost::default();
        let err = apply_legacy_label(
            &changed_result(),
            &LegacyLabels::default(),
            &request(),
            &host,
        )
        .unwrap_err();
        assert!(matches!(err, ReviewError::MissingRepository));
    }
}
