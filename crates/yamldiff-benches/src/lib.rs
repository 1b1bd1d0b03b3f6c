//! Synthetic corpora for the `yamldiff-core` benchmarks.
//!
//! Each corpus is a pair of Kubernetes-style multi-document streams: the new
//! stream drops every seventh document, modifies every fifth, appends a few
//! new ones, and writes the data fields in reverse order so unchanged
//! documents still go through canonicalization.
//!
//! ```
//! let corpus = &yamldiff_benches::available_corpora()[0];
//! let dataset = corpus.load().unwrap();
//! assert_eq!(dataset.before().len(), corpus.documents());
//! ```
#![forbid(unsafe_code)]
#![warn(missing_docs)]

use std::fmt::Write as _;

use yamldiff_core::{parse_documents, ComparisonResult, Document, Engine, LoadError};

static CORPORA: [Corpus; 3] = [
    Corpus { name: "small", documents: 10, fields: 4 },
    Corpus { name: "medium", documents: 250, fields: 12 },
    Corpus { name: "large", documents: 2_000, fields: 24 },
];

/// Registered benchmark corpora, smallest first.
#[must_use]
pub fn available_corpora() -> &'static [Corpus] {
    &CORPORA
}

/// Shape of a generated corpus.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Corpus {
    name: &'static str,
    documents: usize,
    fields: usize,
}

impl Corpus {
    /// Benchmark identifier.
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Number of documents in the old stream.
    #[must_use]
    pub fn documents(&self) -> usize {
        self.documents
    }

    /// The old YAML stream.
    #[must_use]
    pub fn old_text(&self) -> String {
        let mut out = String::new();
        for index in 0..self.documents {
            let name = format!("svc-{index:05}");
            push_document(&mut out, &name, self.fields, index, false, false);
        }
        out
    }

    /// The new YAML stream.
    #[must_use]
    pub fn new_text(&self) -> String {
        let mut out = String::new();
        for index in (0..self.documents).filter(|index| index % 7 != 3) {
            let modified = index % 5 == 0;
            let name = format!("svc-{index:05}");
            push_document(&mut out, &name, self.fields, index, modified, true);
        }
        for extra in 0..=self.documents / 10 {
            let name = format!("added-{extra:03}");
            push_document(&mut out, &name, self.fields, extra, false, false);
        }
        out
    }

    /// Combined size of both streams in bytes.
    #[must_use]
    pub fn fixture_bytes(&self) -> usize {
        self.old_text().len() + self.new_text().len()
    }

    /// Parses both streams.
    pub fn load(&self) -> Result<Dataset, LoadError> {
        Ok(Dataset {
            before: parse_documents(&self.old_text())?,
            after: parse_documents(&self.new_text())?,
        })
    }
}

/// Parsed documents of a corpus.
#[derive(Clone, Debug)]
pub struct Dataset {
    before: Vec<Document>,
    after: Vec<Document>,
}

impl Dataset {
    /// Documents of the old stream.
    #[must_use]
    pub fn before(&self) -> &[Document] {
        &self.before
    }

    /// Documents of the new stream.
    #[must_use]
    pub fn after(&self) -> &[Document] {
        &self.after
    }

    /// Runs a full comparison with the default identifier path.
    #[must_use]
    pub fn compare(&self) -> ComparisonResult {
        Engine::default().compare(self.before.clone(), self.after.clone())
    }
}

fn push_document(
    out: &mut String,
    name: &str,
    fields: usize,
    index: usize,
    modified: bool,
    reversed: bool,
) {
    if !out.is_empty() {
        out.push_str("---\n");
    }
    let _ = write!(
        out,
        "apiVersion: v1\nkind: ConfigMap\nmetadata:\n  name: {name}\n  labels:\n    tier: backend\n"
    );
    if modified {
        out.push_str("    revision: next\n");
    }
    out.push_str("data:\n");
    let order: Vec<usize> =
        if reversed { (0..fields).rev().collect() } else { (0..fields).collect() };
    for field in order {
        let suffix = if modified && field == 0 { "-changed" } else { "" };
        let _ = writeln!(out, "  field_{field}: value-{index}-{field}{suffix}");
    }
}
