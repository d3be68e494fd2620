use serde::Serialize;

use crate::catalog::{Catalog, TranslationStatus};

/// How bad a finding is. Errors make `validate` exit non-zero, warnings
/// are advisory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

/// A single validation finding
#[derive(Debug, Clone, Serialize)]
pub struct Issue {
    pub severity: Severity,
    /// Context the finding belongs to; empty for catalog-level findings
    pub context: String,
    /// Source text of the affected entry; empty for context-level findings
    pub source: String,
    pub message: String,
}

impl Issue {
    fn error(context: &str, source: &str, message: String) -> Self {
        Self {
            severity: Severity::Error,
            context: context.to_string(),
            source: source.to_string(),
            message,
        }
    }

    fn warning(context: &str, source: &str, message: String) -> Self {
        Self {
            severity: Severity::Warning,
            context: context.to_string(),
            source: source.to_string(),
            message,
        }
    }
}

/// Everything `validate` found, errors first
#[derive(Debug, Clone, Serialize, Default)]
pub struct ValidationReport {
    pub issues: Vec<Issue>,
}

impl ValidationReport {
    pub fn error_count(&self) -> usize {
        self.issues
            .iter()
            .filter(|i| i.severity == Severity::Error)
            .count()
    }

    pub fn warning_count(&self) -> usize {
        self.issues
            .iter()
            .filter(|i| i.severity == Severity::Warning)
            .count()
    }

    pub fn has_errors(&self) -> bool {
        self.error_count() > 0
    }

    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }
}

/// Check a catalog for internal inconsistencies.
///
/// Errors: two live entries for the same source with different
/// translations (lookup would silently pick one), and entries marked
/// finished with no translation text. Warnings: exact duplicate entries,
/// unnamed or empty contexts, and unfinished entries that already carry
/// draft text.
pub fn validate(catalog: &Catalog) -> ValidationReport {
    let mut report = ValidationReport::default();

    for ctx in &catalog.contexts {
        if ctx.name.is_empty() {
            report.issues.push(Issue::warning(
                "",
                "",
                format!(
                    "unnamed context with {} message{}",
                    ctx.messages.len(),
                    if ctx.messages.len() == 1 { "" } else { "s" }
                ),
            ));
        }

        if ctx.messages.is_empty() {
            report.issues.push(Issue::warning(
                &ctx.name,
                "",
                "context has no messages".to_string(),
            ));
        }

        for (idx, msg) in ctx.messages.iter().enumerate() {
            if msg.status == TranslationStatus::Finished && msg.translation.is_empty() {
                report.issues.push(Issue::error(
                    &ctx.name,
                    &msg.source,
                    "marked finished but has no translation".to_string(),
                ));
            }

            if msg.status == TranslationStatus::Unfinished && !msg.translation.is_empty() {
                report.issues.push(Issue::warning(
                    &ctx.name,
                    &msg.source,
                    "unfinished entry already carries draft translation text".to_string(),
                ));
            }

            // Compare against earlier live entries only, so each duplicate
            // pair is reported once
            if msg.status == TranslationStatus::Obsolete {
                continue;
            }
            for earlier in &ctx.messages[..idx] {
                if earlier.status == TranslationStatus::Obsolete
                    || earlier.source != msg.source
                {
                    continue;
                }
                if earlier.translation == msg.translation {
                    report.issues.push(Issue::warning(
                        &ctx.name,
                        &msg.source,
                        "duplicate entry for this source".to_string(),
                    ));
                } else {
                    report.issues.push(Issue::error(
                        &ctx.name,
                        &msg.source,
                        format!(
                            "conflicting translations for the same source: {:?} vs {:?}",
                            earlier.translation, msg.translation
                        ),
                    ));
                }
                break;
            }
        }
    }

    report
        .issues
        .sort_by_key(|i| if i.severity == Severity::Error { 0 } else { 1 });
    report
}
