//! Identifier-matched structural diff for multi-document YAML.
//!
//! Two YAML streams are split into documents, each document is keyed by a
//! dotted identifier path (`metadata.name` by default), and the keyed
//! collections are compared: identifiers are classified as added, deleted or
//! modified, and modified documents carry a field-level diff.
//!
//! ```
//! use yamldiff_core::{parse_documents, Engine, RenderConfig};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let old = parse_documents("metadata: {name: web}\nreplicas: 1\n---\nmetadata: {name: db}\n")?;
//!     let new = parse_documents("metadata: {name: web}\nreplicas: 2\n")?;
//!     let result = Engine::default().compare(old, new);
//!     assert_eq!(result.deleted_keys(), ["db"]);
//!     assert_eq!(result.modified_keys(), ["web"]);
//!
//!     let report = result.render(&RenderConfig::default());
//!     assert!(report.contains("~ replicas: 1 → 2"));
//!     Ok(())
//! }
//! ```
#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod compare;
pub mod diff;
mod document;
mod error;
mod key;
mod matcher;
mod number;
mod render;
mod result;
pub mod review;
mod value;

pub use compare::{compare, Engine};
pub use diff::{structural_diff, ChangeKind, DiffEntry};
pub use document::{parse_documents, read_documents, Document};
pub use error::{ConfigError, LoadError, ReviewError, TemplateError};
pub use key::{extract_key, IdentifierPath, DEFAULT_IDENTIFIER_PATH};
pub use matcher::{build_keyed_set, fallback_key, KeyedSet};
pub use number::Number;
pub use render::RenderConfig;
pub use result::{ComparisonResult, Modification, Summary};
pub use value::{Mapping, Value};

/// Returns the semantic version of the `yamldiff-core` crate.
///
/// ```
/// assert!(!yamldiff_core::version().is_empty());
/// ```
#[must_use]
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
