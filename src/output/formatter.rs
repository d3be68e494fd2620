use colored::Colorize;

use crate::catalog::{CatalogStats, Message, MergeReport, TranslationStatus};
use crate::search::{HintStatus, MatchField, SearchMatch, VerifiedHint};
use crate::validate::{Severity, ValidationReport};

/// Formatter for human-readable, colorized terminal output
pub struct Formatter;

impl Formatter {
    pub fn new(use_color: bool) -> Self {
        if !use_color {
            colored::control::set_override(false);
        }
        Self
    }

    /// Format search results grouped by context
    pub fn format_matches(&self, query: &str, matches: &[SearchMatch]) -> String {
        let mut output = String::new();

        if matches.is_empty() {
            output.push_str(&format!("No entries match '{}'\n", query));
            return output;
        }

        let mut current_context: Option<&str> = None;
        for m in matches {
            if current_context != Some(m.context) {
                if current_context.is_some() {
                    output.push('\n');
                }
                output.push_str(&format!("{}\n", m.context.bold().underline()));
                current_context = Some(m.context);
            }
            // Matches on translated text alone are easy to misread as
            // source matches, so tag them
            let note = match m.matched_in {
                MatchField::Translation => Some("translation match"),
                MatchField::Source | MatchField::Both => None,
            };
            output.push_str(&self.entry_with_note(m.message, note));
        }

        let n = matches.len();
        output.push_str(&format!(
            "\n{} matching entr{}\n",
            n,
            if n == 1 { "y" } else { "ies" }
        ));
        output
    }

    /// Format one catalog entry: source, translation, status, hints
    pub fn format_entry(&self, message: &Message) -> String {
        self.entry_with_note(message, None)
    }

    fn entry_with_note(&self, message: &Message, note: Option<&str>) -> String {
        let mut output = String::new();

        let status = match message.status {
            TranslationStatus::Finished => "finished".green(),
            TranslationStatus::Unfinished => "unfinished".yellow(),
            TranslationStatus::Obsolete => "obsolete".dimmed(),
        };

        output.push_str(&format!("  {} [{}]\n", message.source.cyan(), status));
        if !message.translation.is_empty() {
            match note {
                Some(note) => output.push_str(&format!(
                    "    → {} {}\n",
                    message.translation,
                    format!("({note})").dimmed()
                )),
                None => output.push_str(&format!("    → {}\n", message.translation)),
            }
        }
        for loc in &message.locations {
            output.push_str(&format!(
                "    {}\n",
                format!("{}:{}", loc.filename.display(), loc.line).dimmed()
            ));
        }

        output
    }

    /// Format verified location hints for one entry
    pub fn format_hints(&self, hints: &[VerifiedHint]) -> String {
        let mut output = String::new();
        for hint in hints {
            let place = format!(
                "{}:{}",
                hint.location.filename.display(),
                hint.location.line
            );
            let verdict = match &hint.status {
                HintStatus::Verified => "ok".green().to_string(),
                HintStatus::Drifted { actual_line } => {
                    format!("{} (now at line {})", "drifted".yellow(), actual_line)
                }
                HintStatus::Stale => "stale".yellow().to_string(),
                HintStatus::FileMissing => "file missing".red().to_string(),
            };
            output.push_str(&format!("    {} {}\n", place.dimmed(), verdict));
        }
        output
    }

    /// Format completion statistics as a per-context table
    pub fn format_stats(&self, stats: &CatalogStats, show_untranslated: bool) -> String {
        let mut output = String::new();

        output.push_str(&format!(
            "{} ({} message{}, language: {})\n\n",
            "Catalog statistics".bold(),
            stats.total_messages,
            if stats.total_messages == 1 { "" } else { "s" },
            if stats.language.is_empty() {
                "unset"
            } else {
                &stats.language
            },
        ));

        let name_width = stats
            .contexts
            .iter()
            .map(|c| c.context.len())
            .max()
            .unwrap_or(0)
            .max("Context".len());

        output.push_str(&format!(
            "{:<name_width$}  {:>8}  {:>10}  {:>8}  {:>7}\n",
            "Context", "finished", "unfinished", "obsolete", "done"
        ));
        for ctx in &stats.contexts {
            output.push_str(&format!(
                "{:<name_width$}  {:>8}  {:>10}  {:>8}  {:>6.1}%\n",
                ctx.context, ctx.finished, ctx.unfinished, ctx.obsolete, ctx.completion_percent
            ));
        }

        output.push_str(&format!(
            "\nOverall: {:.1}% translated ({} finished, {} unfinished, {} obsolete)\n",
            stats.completion_percent, stats.finished, stats.unfinished, stats.obsolete
        ));

        if show_untranslated {
            for ctx in &stats.contexts {
                if ctx.untranslated.is_empty() {
                    continue;
                }
                output.push_str(&format!("\n{}\n", ctx.context.bold().underline()));
                for source in &ctx.untranslated {
                    output.push_str(&format!("  {}\n", source.yellow()));
                }
            }
        }

        output
    }

    /// Format validation findings, errors first
    pub fn format_validation(&self, report: &ValidationReport) -> String {
        let mut output = String::new();

        if report.is_clean() {
            output.push_str(&format!("{}\n", "No problems found".green()));
            return output;
        }

        for issue in &report.issues {
            let tag = match issue.severity {
                Severity::Error => "error".red().bold(),
                Severity::Warning => "warning".yellow(),
            };
            let place = if issue.source.is_empty() {
                issue.context.clone()
            } else {
                format!("{}: '{}'", issue.context, issue.source)
            };
            output.push_str(&format!("{}: {}: {}\n", tag, place, issue.message));
        }

        output.push_str(&format!(
            "\n{} error{}, {} warning{}\n",
            report.error_count(),
            if report.error_count() == 1 { "" } else { "s" },
            report.warning_count(),
            if report.warning_count() == 1 { "" } else { "s" },
        ));
        output
    }

    /// Format an update summary
    pub fn format_merge_report(&self, report: &MergeReport) -> String {
        if !report.changed() && report.retained == 0 {
            return "Nothing to update\n".to_string();
        }

        let mut parts = Vec::new();
        if report.added > 0 {
            parts.push(format!("{} added", report.added).green().to_string());
        }
        if report.revived > 0 {
            parts.push(format!("{} revived", report.revived).green().to_string());
        }
        if report.obsoleted > 0 {
            parts.push(format!("{} obsoleted", report.obsoleted).yellow().to_string());
        }
        if report.dropped > 0 {
            parts.push(format!("{} dropped", report.dropped).yellow().to_string());
        }
        if report.collapsed > 0 {
            parts.push(format!("{} duplicates collapsed", report.collapsed));
        }
        parts.push(format!("{} retained", report.retained));

        format!("Updated: {}\n", parts.join(", "))
    }
}
