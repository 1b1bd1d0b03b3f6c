use std::fmt::Write as _;

use crate::{ComparisonResult, Modification};

const COLOR_RESET: &str = "\u{1b}[0m";
const COLOR_BOLD: &str = "\u{1b}[1m";
const COLOR_RED: &str = "\u{1b}[31m";
const COLOR_GREEN: &str = "\u{1b}[32m";
const COLOR_YELLOW: &str = "\u{1b}[33m";
const COLOR_CYAN: &str = "\u{1b}[36m";

/// Rendering toggles, passed explicitly to every renderer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RenderConfig {
    color: bool,
    verbose: bool,
}

impl RenderConfig {
    /// Plain, non-verbose output.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Enables or disables ANSI color output.
    #[must_use]
    pub fn with_color(mut self, enabled: bool) -> Self {
        self.color = enabled;
        self
    }

    /// Enables or disables full-document output for added and deleted entries.
    #[must_use]
    pub fn with_verbose(mut self, enabled: bool) -> Self {
        self.verbose = enabled;
        self
    }

    /// Indicates whether color output is enabled.
    #[must_use]
    pub fn color_enabled(self) -> bool {
        self.color
    }

    /// Indicates whether verbose output is enabled.
    #[must_use]
    pub fn verbose_enabled(self) -> bool {
        self.verbose
    }

    fn paint(self, text: &str, color: &str) -> String {
        if self.color {
            format!("{color}{text}{COLOR_RESET}")
        } else {
            text.to_string()
        }
    }
}

impl ComparisonResult {
    /// Renders the human-readable report.
    ///
    /// ```
    /// # use yamldiff_core::{parse_documents, Engine, RenderConfig};
    /// let old = parse_documents("metadata: {name: web}\nreplicas: 1\n")?;
    /// let new = parse_documents("metadata: {name: web}\nreplicas: 2\n")?;
    /// let result = Engine::default().compare(old, new);
    /// let text = result.render(&RenderConfig::default());
    /// assert!(text.starts_with("~ Modified: web\n  ~ replicas: 1 → 2\n"));
    /// # Ok::<(), yamldiff_core::LoadError>(())
    /// ```
    #[must_use]
    pub fn render(&self, config: &RenderConfig) -> String {
        let mut out = String::new();
        if config.verbose_enabled() {
            out.push_str(&self.render_summary_compact());
            for doc in self.added.values() {
                push_prefixed_lines(&mut out, doc.raw(), "+ ", COLOR_GREEN, *config);
            }
            for doc in self.deleted.values() {
                push_prefixed_lines(&mut out, doc.raw(), "- ", COLOR_RED, *config);
            }
            self.push_modified(&mut out, *config);
        } else {
            for key in self.added.keys() {
                let _ = writeln!(
                    out,
                    "{} {}",
                    config.paint("+ Added:", COLOR_GREEN),
                    config.paint(key, COLOR_CYAN)
                );
            }
            for key in self.deleted.keys() {
                let _ = writeln!(
                    out,
                    "{} {}",
                    config.paint("- Deleted:", COLOR_RED),
                    config.paint(key, COLOR_CYAN)
                );
            }
            self.push_modified(&mut out, *config);
            out.push_str(&self.render_summary(config));
        }
        out
    }

    /// Renders the summary block with one count per line.
    ///
    /// ```
    /// # use yamldiff_core::{ComparisonResult, RenderConfig};
    /// let text = ComparisonResult::default().render_summary(&RenderConfig::default());
    /// assert_eq!(text, "\nSummary:\n  Added: 0\n  Deleted: 0\n  Modified: 0\n");
    /// ```
    #[must_use]
    pub fn render_summary(&self, config: &RenderConfig) -> String {
        format!(
            "\n{}\n  {}: {}\n  {}: {}\n  {}: {}\n",
            config.paint("Summary:", COLOR_BOLD),
            config.paint("Added", COLOR_GREEN),
            self.added.len(),
            config.paint("Deleted", COLOR_RED),
            self.deleted.len(),
            config.paint("Modified", COLOR_YELLOW),
            self.modified.len(),
        )
    }

    /// Two-line summary used as the header of verbose output.
    #[must_use]
    pub fn render_summary_compact(&self) -> String {
        format!(
            "Summary\n{} added, {} deleted, {} modified\n",
            self.added.len(),
            self.deleted.len(),
            self.modified.len()
        )
    }

    fn push_modified(&self, out: &mut String, config: RenderConfig) {
        for (key, modification) in &self.modified {
            let _ = writeln!(
                out,
                "{} {}",
                config.paint("~ Modified:", COLOR_YELLOW),
                config.paint(key, COLOR_CYAN)
            );
            push_diff_lines(out, modification);
            out.push('\n');
        }
    }
}

fn push_diff_lines(out: &mut String, modification: &Modification) {
    for entry in modification.diffs() {
        let _ = writeln!(out, "  {entry}");
    }
}

fn push_prefixed_lines(
    out: &mut String,
    text: &str,
    prefix: &str,
    color: &str,
    config: RenderConfig,
) {
    for line in text.lines().filter(|line| !line.is_empty()) {
        out.push_str(&config.paint(&format!("{prefix}{line}"), color));
        out.push('\n');
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{parse_documents, Engine};

    fn sample() -> ComparisonResult {
        let old = parse_documents(
            "metadata: {name: gone}\n---\nmetadata: {name: web}\nspec: {replicas: 1, old: x}\n",
        )
        .unwrap();
        let new = parse_documents(
            "metadata: {name: web}\nspec: {replicas: 3, new: y}\n---\nmetadata: {name: fresh}\n",
        )
        .unwrap();
        Engine::default().compare(old, new)
    }

    #[test]
    fn default_report_lists_identifiers_and_diffs() {
        let text = sample().render(&RenderConfig::default());
        let expected = "+ Added: fresh\n\
- Deleted: gone\n\
~ Modified: web\n  + spec.new: y\n  - spec.old: x\n  ~ spec.replicas: 1 → 3\n\n\
\nSummary:\n  Added: 1\n  Deleted: 1\n  Modified: 1\n";
        assert_eq!(text, expected);
    }

    #[test]
    fn verbose_report_prints_documents() {
        let text = sample().render(&RenderConfig::default().with_verbose(true));
        let expected = "Summary\n1 added, 1 deleted, 1 modified\n\
+ metadata:\n+   name: fresh\n\
- metadata:\n-   name: gone\n\
~ Modified: web\n  + spec.new: y\n  - spec.old: x\n  ~ spec.replicas: 1 → 3\n\n";
        assert_eq!(text, expected);
    }

    #[test]
    fn color_wraps_markers() {
        let text = sample().render(&RenderConfig::default().with_color(true));
        assert!(text.contains("\u{1b}[32m+ Added:\u{1b}[0m \u{1b}[36mfresh\u{1b}[0m"));
        assert!(text.contains("\u{1b}[1mSummary:\u{1b}[0m"));
    }

    #[test]
    fn plain_output_has_no_escape_codes() {
        let text = sample().render(&RenderConfig::default().with_verbose(true));
        assert!(!text.contains('\u{1b}'));
    }

    #[test]
    fn empty_result_renders_only_summary() {
        let text = ComparisonResult::default().render(&RenderConfig::default());
        assert_eq!(text, "\nSummary:\n  Added: 0\n  Deleted: 0\n  Modified: 0\n");
    }
}
