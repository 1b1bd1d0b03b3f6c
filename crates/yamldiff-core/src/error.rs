use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while loading YAML documents into [`Value`](crate::Value).
#[derive(Debug, Error)]
pub enum LoadError {
    /// The input file could not be read.
    #[error("failed to read {}: {source}", path.display())]
    Io {
        /// The file that failed to load.
        path: PathBuf,
        /// The underlying I/O failure.
        #[source]
        source: std::io::Error,
    },
    /// The provided YAML input was invalid, or a document failed to re-serialize.
    #[error("invalid YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),
    /// Only mapping documents can be matched by identifier.
    #[error("document {index} is a {found}, expected a mapping")]
    NotAMapping {
        /// Zero-based position of the document within its stream.
        index: usize,
        /// The kind of value found at the document root.
        found: &'static str,
    },
    /// Mapping keys must be scalars so they can be addressed by a dotted path.
    #[error("unsupported mapping key: {found}")]
    UnsupportedKey {
        /// The kind of key that triggered the error.
        found: &'static str,
    },
    /// Two keys of one mapping became the same string, e.g. `1` and `"1"`.
    #[error("mapping key already defined: {key}")]
    DuplicateKey {
        /// The stringified key that occurs twice.
        key: String,
    },
}

/// Errors emitted while loading the review configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read config file {}: {source}", path.display())]
    Io {
        /// The configuration path that failed to load.
        path: PathBuf,
        /// The underlying I/O failure.
        #[source]
        source: std::io::Error,
    },
    /// The configuration file is not valid YAML for the expected shape.
    #[error("failed to parse config file: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Errors produced while parsing or executing a comment template.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TemplateError {
    /// The template source is malformed.
    #[error("template parse error: {message}")]
    Parse {
        /// Description of the malformed construct.
        message: String,
    },
    /// The template referenced a field the comment data does not provide.
    #[error("can't evaluate field {field} in comment data")]
    UnknownField {
        /// The offending field name.
        field: String,
    },
    /// `range` was applied to a value that is neither a list nor a map.
    #[error("range can't iterate over {field}")]
    NotIterable {
        /// The expression that was not iterable.
        field: String,
    },
}

impl TemplateError {
    pub(crate) fn parse(message: impl Into<String>) -> Self {
        Self::Parse { message: message.into() }
    }
}

/// Errors raised while publishing a comparison to a code-review host.
#[derive(Debug, Error)]
pub enum ReviewError {
    /// Neither the config file nor the command line named a repository.
    #[error("repository not specified (set repo_owner/repo_name in the config or use --github-repo)")]
    MissingRepository,
    /// No pull request number was supplied.
    #[error("pull request number not specified (use --github-pr)")]
    MissingPullRequest,
    /// No access token was supplied.
    #[error("GitHub token not provided (use --github-token or GITHUB_TOKEN env var)")]
    MissingToken,
    /// The configured comment template failed to render.
    #[error("error rendering template: {0}")]
    Template(#[from] TemplateError),
    /// The review host rejected or failed an operation.
    #[error("failed to {action}: {message}")]
    Host {
        /// The operation that failed, e.g. `post comment`.
        action: &'static str,
        /// Output captured from the host.
        message: String,
    },
}
