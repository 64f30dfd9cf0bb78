//! Output formatters for analysis reports and saved history

use crate::config::OutputFormat;
use crate::error::Result;
use crate::processing::analyzer::AnalysisReport;
use crate::processing::keyword_matcher::MatchResult;
use crate::storage::record::SavedRecord;
use colored::{Color, Colorize};
use std::path::Path;

/// Trait for rendering analysis results
pub trait OutputFormatter {
    fn format_report(&self, report: &AnalysisReport) -> Result<String>;
    fn format_history(&self, records: &[SavedRecord]) -> Result<String>;
    fn supports_format(&self) -> OutputFormat;
}

/// Terminal output with optional colors
pub struct ConsoleFormatter {
    use_colors: bool,
    detailed: bool,
}

pub struct JsonFormatter {
    pretty: bool,
}

pub struct MarkdownFormatter {
    include_metadata: bool,
}

/// Dispatches to the formatter for the requested format
pub struct ReportGenerator {
    console_formatter: ConsoleFormatter,
    json_formatter: JsonFormatter,
    markdown_formatter: MarkdownFormatter,
}

const ROLES_PREVIEW_CHARS: usize = 200;
const NOT_FOUND: &str = "(not found)";

impl ConsoleFormatter {
    pub fn new(use_colors: bool, detailed: bool) -> Self {
        Self { use_colors, detailed }
    }

    fn colorize(&self, text: &str, color: Color) -> String {
        if self.use_colors {
            text.color(color).to_string()
        } else {
            text.to_string()
        }
    }

    fn format_header(&self, title: &str, level: u8) -> String {
        let prefix = match level {
            1 => "█",
            2 => "▓",
            _ => "▒",
        };

        let color = match level {
            1 => Color::Blue,
            2 => Color::Green,
            _ => Color::Yellow,
        };

        if self.use_colors {
            format!("\n{} {}\n", prefix.color(color).bold(), title.color(color).bold())
        } else {
            format!("\n{} {}\n", prefix, title)
        }
    }

    fn format_score_badge(&self, score: u8) -> String {
        let (badge, color) = match score {
            90..=100 => ("EXCELLENT", Color::Green),
            75..=89 => ("STRONG", Color::BrightGreen),
            50..=74 => ("PARTIAL", Color::Yellow),
            25..=49 => ("WEAK", Color::Red),
            _ => ("POOR", Color::BrightRed),
        };

        if self.use_colors {
            format!("[{}]", badge.color(color).bold())
        } else {
            format!("[{}]", badge)
        }
    }

    fn format_field(&self, label: &str, value: Option<&str>) -> String {
        match value {
            Some(value) => format!("  {:<7} {}\n", label, value),
            None => format!("  {:<7} {}\n", label, self.colorize(NOT_FOUND, Color::BrightBlack)),
        }
    }

    fn format_keywords(&self, result: &MatchResult) -> String {
        let mut output = String::new();

        let matched = if self.detailed || result.matched_keywords.len() <= 10 {
            result.matched_keywords.join(", ")
        } else {
            format!(
                "{}, ... (+{} more)",
                result.matched_keywords[..10].join(", "),
                result.matched_keywords.len() - 10
            )
        };
        let unmatched = if self.detailed || result.unmatched_keywords.len() <= 10 {
            result.unmatched_keywords.join(", ")
        } else {
            format!(
                "{}, ... (+{} more)",
                result.unmatched_keywords[..10].join(", "),
                result.unmatched_keywords.len() - 10
            )
        };

        output.push_str(&format!(
            "  ✅ Matched ({}): {}\n",
            result.matched_keywords.len(),
            self.colorize(&matched, Color::Green)
        ));
        output.push_str(&format!(
            "  ❌ Missing ({}): {}\n",
            result.unmatched_keywords.len(),
            self.colorize(&unmatched, Color::Red)
        ));
        output
    }
}

impl OutputFormatter for ConsoleFormatter {
    fn format_report(&self, report: &AnalysisReport) -> Result<String> {
        let mut output = String::new();
        let fields = &report.fields;
        let result = &report.match_result;

        output.push_str(&self.format_header("📄 RESUME ANALYSIS", 1));
        output.push_str(&format!(
            "Source: {} ({}) | Generated: {}\n",
            report.source,
            report.format,
            report.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
        ));

        output.push_str(&self.format_header("Match Score", 2));
        output.push_str(&format!(
            "Score: {}% {} ({} mode)\n",
            result.score,
            self.format_score_badge(result.score),
            result.mode
        ));
        output.push_str(&self.format_keywords(result));

        output.push_str(&self.format_header("Extracted Fields", 2));
        output.push_str(&self.format_field("Name:", fields.name.as_deref()));
        output.push_str(&self.format_field("Email:", fields.email.as_deref()));
        output.push_str(&self.format_field("Phone:", fields.phone.as_deref()));

        if fields.skills.is_empty() {
            output.push_str(&self.format_field("Skills:", None));
        } else {
            let skills: Vec<&str> = fields.skills.iter().map(String::as_str).collect();
            output.push_str(&self.format_field("Skills:", Some(&skills.join(", "))));
        }

        output.push_str(&self.format_header("Roles & Responsibilities", 3));
        match &fields.roles {
            Some(roles) if self.detailed => output.push_str(&format!("{}\n", roles)),
            Some(roles) => output.push_str(&format!("{}\n", truncate_text(roles, ROLES_PREVIEW_CHARS))),
            None => output.push_str(&format!("{}\n", self.colorize(NOT_FOUND, Color::BrightBlack))),
        }

        if self.detailed {
            output.push_str(&self.format_header("Details", 3));
            output.push_str(&format!("Extracted text: {} characters\n", report.text_length));
            output.push_str(&format!("Keywords considered: {}\n", result.total_keywords()));
        }

        Ok(output)
    }

    fn format_history(&self, records: &[SavedRecord]) -> Result<String> {
        let mut output = String::new();
        output.push_str(&self.format_header("🗂  SAVED RESUMES", 1));

        if records.is_empty() {
            output.push_str("No saved records.\n");
            return Ok(output);
        }

        for record in records {
            output.push_str(&format!(
                "#{:<5} {:>3}% {}  {}  {}  [{}]\n",
                record.id,
                record.score,
                self.format_score_badge(record.score),
                record.name.as_deref().unwrap_or(NOT_FOUND),
                record.email.as_deref().unwrap_or(NOT_FOUND),
                self.colorize(&record.owner, Color::Cyan)
            ));
            if self.detailed {
                output.push_str(&format!(
                    "       saved {} | matched: {} | missing: {}\n",
                    record.created_at.format("%Y-%m-%d %H:%M:%S UTC"),
                    record.matched_keywords.join(", "),
                    record.unmatched_keywords.join(", ")
                ));
            }
        }

        Ok(output)
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Console
    }
}

impl JsonFormatter {
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }

    fn to_json<T: serde::Serialize>(&self, value: &T) -> Result<String> {
        if self.pretty {
            Ok(serde_json::to_string_pretty(value)?)
        } else {
            Ok(serde_json::to_string(value)?)
        }
    }
}

impl OutputFormatter for JsonFormatter {
    fn format_report(&self, report: &AnalysisReport) -> Result<String> {
        self.to_json(report)
    }

    fn format_history(&self, records: &[SavedRecord]) -> Result<String> {
        self.to_json(&records)
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Json
    }
}

impl MarkdownFormatter {
    pub fn new(include_metadata: bool) -> Self {
        Self { include_metadata }
    }

    fn markdown_score_badge(score: u8) -> &'static str {
        match score {
            90..=100 => "🟢 Excellent",
            75..=89 => "🟢 Strong",
            50..=74 => "🟡 Partial",
            25..=49 => "🟠 Weak",
            _ => "🔴 Poor",
        }
    }

    fn cell(value: Option<&str>) -> String {
        value
            .map(escape_inline)
            .unwrap_or_else(|| "_not found_".to_string())
    }

    /// A backtick fence longer than any backtick run inside `body`
    fn fence_for(body: &str) -> String {
        let longest_run = body
            .split(|c| c != '`')
            .map(str::len)
            .max()
            .unwrap_or(0);
        "`".repeat(longest_run.max(2) + 1)
    }
}

/// Backslash-escape characters Markdown would treat as inline syntax
fn escape_inline(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(c, '\\' | '`' | '*' | '_' | '[' | ']' | '<' | '>' | '#' | '|') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

impl OutputFormatter for MarkdownFormatter {
    fn format_report(&self, report: &AnalysisReport) -> Result<String> {
        let mut output = String::new();
        let fields = &report.fields;
        let result = &report.match_result;

        output.push_str("# 📄 Resume Analysis\n\n");

        if self.include_metadata {
            let file_name = Path::new(&report.source)
                .file_name()
                .map(|name| name.to_string_lossy().to_string())
                .unwrap_or_else(|| report.source.clone());
            output.push_str(&format!(
                "**Source:** `{}` ({}) | **Generated:** {}\n\n",
                file_name,
                report.format,
                report.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
            ));
        }

        output.push_str("## Match Score\n\n");
        output.push_str(&format!(
            "**Score:** {}% {} (_{} mode_)\n\n",
            result.score,
            Self::markdown_score_badge(result.score),
            result.mode
        ));

        output.push_str("### Matched Keywords\n\n");
        if result.matched_keywords.is_empty() {
            output.push_str("_None_\n");
        }
        for keyword in &result.matched_keywords {
            output.push_str(&format!("- {}\n", escape_inline(keyword)));
        }

        output.push_str("\n### Missing Keywords\n\n");
        if result.unmatched_keywords.is_empty() {
            output.push_str("_None_\n");
        }
        for keyword in &result.unmatched_keywords {
            output.push_str(&format!("- {}\n", escape_inline(keyword)));
        }

        output.push_str("\n## Extracted Fields\n\n");
        output.push_str("| Field | Value |\n");
        output.push_str("|-------|-------|\n");
        output.push_str(&format!("| Name | {} |\n", Self::cell(fields.name.as_deref())));
        output.push_str(&format!("| Email | {} |\n", Self::cell(fields.email.as_deref())));
        output.push_str(&format!("| Phone | {} |\n", Self::cell(fields.phone.as_deref())));
        let skills = if fields.skills.is_empty() {
            None
        } else {
            Some(fields.skills.iter().cloned().collect::<Vec<_>>().join(", "))
        };
        output.push_str(&format!("| Skills | {} |\n", Self::cell(skills.as_deref())));

        output.push_str("\n## Roles & Responsibilities\n\n");
        match &fields.roles {
            Some(roles) => {
                let fence = Self::fence_for(roles);
                output.push_str(&format!("{}\n{}\n{}\n", fence, roles, fence));
            }
            None => output.push_str("_Not found_\n"),
        }

        Ok(output)
    }

    fn format_history(&self, records: &[SavedRecord]) -> Result<String> {
        let mut output = String::from("# 🗂 Saved Resumes\n\n");

        if records.is_empty() {
            output.push_str("_No saved records._\n");
            return Ok(output);
        }

        output.push_str("| ID | Owner | Name | Email | Score | Saved |\n");
        output.push_str("|----|-------|------|-------|-------|-------|\n");
        for record in records {
            output.push_str(&format!(
                "| {} | {} | {} | {} | {}% | {} |\n",
                record.id,
                Self::cell(Some(&record.owner)),
                Self::cell(record.name.as_deref()),
                Self::cell(record.email.as_deref()),
                record.score,
                record.created_at.format("%Y-%m-%d %H:%M")
            ));
        }

        Ok(output)
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Markdown
    }
}

impl ReportGenerator {
    pub fn new() -> Self {
        Self {
            console_formatter: ConsoleFormatter::new(true, false),
            json_formatter: JsonFormatter::new(true),
            markdown_formatter: MarkdownFormatter::new(true),
        }
    }

    pub fn with_options(use_colors: bool, detailed: bool, pretty_json: bool, include_metadata: bool) -> Self {
        Self {
            console_formatter: ConsoleFormatter::new(use_colors, detailed),
            json_formatter: JsonFormatter::new(pretty_json),
            markdown_formatter: MarkdownFormatter::new(include_metadata),
        }
    }

    fn formatter(&self, format: OutputFormat) -> &dyn OutputFormatter {
        match format {
            OutputFormat::Console => &self.console_formatter,
            OutputFormat::Json => &self.json_formatter,
            OutputFormat::Markdown => &self.markdown_formatter,
        }
    }

    pub fn generate_report(&self, report: &AnalysisReport, format: OutputFormat) -> Result<String> {
        self.formatter(format).format_report(report)
    }

    pub fn generate_history(&self, records: &[SavedRecord], format: OutputFormat) -> Result<String> {
        self.formatter(format).format_history(records)
    }
}

impl Default for ReportGenerator {
    fn default() -> Self {
        Self::new()
    }
}

pub fn save_report_to_file(content: &str, file_path: &Path) -> Result<()> {
    use std::fs;
    if let Some(parent) = file_path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(file_path, content)?;
    Ok(())
}

/// Cut at a char boundary, backing up to the last space where there is one
fn truncate_text(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        None => text.to_string(),
        Some((cut, _)) => {
            let truncated = &text[..cut];
            let end = truncated.rfind(' ').unwrap_or(cut);
            format!("{}...", &text[..end])
        }
    }
}
