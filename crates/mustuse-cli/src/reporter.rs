//! Diagnostic rendering: tsc-style text and JSON.

use colored::Colorize;
use rustc_hash::FxHashMap;
use std::path::Path;

use mustuse_common::{Diagnostic, DiagnosticCategory, DiagnosticRelatedInformation, LineMap};

pub struct Reporter {
    color: bool,
    sources: FxHashMap<String, String>,
    line_maps: FxHashMap<String, LineMap>,
}

impl Reporter {
    pub fn new(color: bool) -> Self {
        Reporter {
            color,
            sources: FxHashMap::default(),
            line_maps: FxHashMap::default(),
        }
    }

    /// Register the text of `file` so it is not read from disk again.
    pub fn add_source(&mut self, file: impl Into<String>, text: impl Into<String>) {
        self.sources.insert(file.into(), text.into());
    }

    pub fn render(&mut self, diagnostics: &[Diagnostic]) -> String {
        let mut out = String::new();
        for diagnostic in diagnostics {
            out.push_str(&self.format_diagnostic(diagnostic));
            out.push_str("\n\n");
        }
        out
    }

    /// `Found 2 errors in 1 file.`, or nothing for a clean run.
    pub fn render_summary(&self, diagnostics: &[Diagnostic]) -> Option<String> {
        let errors = diagnostics
            .iter()
            .filter(|diagnostic| diagnostic.category == DiagnosticCategory::Error)
            .count();
        if errors == 0 {
            return None;
        }
        let mut files: Vec<&str> = diagnostics.iter().map(|diagnostic| diagnostic.file.as_str()).collect();
        files.sort_unstable();
        files.dedup();

        let plural = |count: usize, word: &str| {
            if count == 1 {
                format!("1 {word}")
            } else {
                format!("{count} {word}s")
            }
        };
        let summary = format!(
            "Found {} in {}.",
            plural(errors, "error"),
            plural(files.len(), "file")
        );
        Some(if self.color {
            summary.bold().to_string()
        } else {
            summary
        })
    }

    pub fn format_diagnostic(&mut self, diagnostic: &Diagnostic) -> String {
        let mut output = self
            .format_location(&diagnostic.file, diagnostic.start)
            .unwrap_or_else(|| {
                if diagnostic.file.is_empty() {
                    "<unknown>".to_string()
                } else {
                    diagnostic.file.clone()
                }
            });

        output.push_str(" - ");
        output.push_str(&self.format_category(diagnostic.category));
        if !diagnostic.code.is_empty() {
            output.push(' ');
            output.push_str(&self.format_code(diagnostic.code));
        }
        output.push_str(": ");
        output.push_str(&diagnostic.message_text);

        if let Some(snippet) = self.format_snippet(&diagnostic.file, diagnostic.start, diagnostic.length) {
            output.push_str(&snippet);
        }

        for related in &diagnostic.related_information {
            output.push('\n');
            output.push_str(&self.format_related(related));
            if let Some(snippet) = self.format_snippet(&related.file, related.start, related.length) {
                output.push_str(&snippet);
            }
        }

        output
    }

    /// Source line with the span underlined:
    ///
    /// ```text
    ///     3   getResult()
    ///         ~~~~~~~~~~~
    /// ```
    fn format_snippet(&mut self, file: &str, start: u32, length: u32) -> Option<String> {
        if file.is_empty() || length == 0 {
            return None;
        }

        let (line_num, column) = self.position_for(file, start)?;
        let source = self.sources.get(file)?;
        let line_map = self.line_maps.get(file)?;
        let line_text = line_map.line_text((line_num - 1) as usize, source)?;

        // Underline only up to the end of the first line of the span.
        let first_col = (column - 1) as usize;
        let span_chars = source
            .get(start as usize..(start + length) as usize)
            .map_or(1, |text| text.lines().next().map_or(1, |line| line.chars().count()));

        let mut underline = String::new();
        for (i, ch) in line_text.chars().enumerate() {
            if i < first_col {
                underline.push_str(if ch == '\t' { "    " } else { " " });
            } else if i < first_col + span_chars {
                underline.push_str(if ch == '\t' { "~~~~" } else { "~" });
            } else {
                break;
            }
        }
        if !underline.contains('~') {
            underline.push('~');
        }

        let underline = if self.color {
            underline.red().to_string()
        } else {
            underline
        };
        let gutter = line_num.to_string();
        Some(format!(
            "\n\n{} {}\n{} {}",
            self.dim(&gutter),
            line_text,
            self.dim(&" ".repeat(gutter.len())),
            underline
        ))
    }

    fn format_related(&mut self, related: &DiagnosticRelatedInformation) -> String {
        let location = self
            .format_location(&related.file, related.start)
            .unwrap_or_else(|| related.file.clone());
        format!("  {}: {} - {}", self.dim("Related"), location, related.message_text)
    }

    fn format_location(&mut self, file: &str, offset: u32) -> Option<String> {
        if file.is_empty() {
            return None;
        }
        let (line, column) = self.position_for(file, offset)?;
        if !self.color {
            return Some(format!("{file}:{line}:{column}"));
        }
        Some(format!(
            "{}:{}:{}",
            file.cyan(),
            line.to_string().yellow(),
            column.to_string().yellow()
        ))
    }

    /// 1-based line and column of `offset`.
    fn position_for(&mut self, file: &str, offset: u32) -> Option<(u32, u32)> {
        self.ensure_source(file)?;
        let source = self.sources.get(file)?;
        let line_map = self
            .line_maps
            .entry(file.to_string())
            .or_insert_with(|| LineMap::build(source));
        let position = line_map.offset_to_position(offset, source);
        Some((position.line + 1, position.character + 1))
    }

    fn ensure_source(&mut self, file: &str) -> Option<()> {
        if !self.sources.contains_key(file) {
            let contents = std::fs::read_to_string(Path::new(file)).ok()?;
            self.sources.insert(file.to_string(), contents);
        }
        Some(())
    }

    fn format_category(&self, category: DiagnosticCategory) -> String {
        let label = category.label();
        if !self.color {
            return label.to_string();
        }
        match category {
            DiagnosticCategory::Error => label.red().bold().to_string(),
            DiagnosticCategory::Warning => label.yellow().bold().to_string(),
            DiagnosticCategory::Suggestion => label.blue().bold().to_string(),
            DiagnosticCategory::Message => label.cyan().bold().to_string(),
        }
    }

    fn format_code(&self, code: &str) -> String {
        if self.color {
            code.bright_black().to_string()
        } else {
            code.to_string()
        }
    }

    fn dim(&self, text: &str) -> String {
        if self.color {
            text.dimmed().to_string()
        } else {
            text.to_string()
        }
    }
}

/// The diagnostics array as pretty-printed JSON.
pub fn render_json(diagnostics: &[Diagnostic]) -> serde_json::Result<String> {
    serde_json::to_string_pretty(diagnostics)
}
