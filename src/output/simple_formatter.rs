use crate::catalog::CatalogStats;
use crate::search::SearchMatch;
use crate::validate::ValidationReport;

/// Formatter for plain, machine-readable output (grep-friendly lines and
/// JSON), used by the `--simple` and `--json` flags
pub struct SimpleFormatter;

impl SimpleFormatter {
    pub fn new() -> Self {
        Self
    }

    /// Format matches as one line per location hint:
    /// `file:line:context:source: 'translation'`. Entries without hints
    /// get a `-:0:` placeholder so the line shape stays fixed.
    pub fn format_matches(&self, matches: &[SearchMatch]) -> String {
        let mut output = String::new();

        for m in matches {
            if m.message.locations.is_empty() {
                output.push_str(&format!(
                    "-:0:{}:{}: '{}'\n",
                    m.context, m.message.source, m.message.translation
                ));
                continue;
            }
            for loc in &m.message.locations {
                output.push_str(&format!(
                    "{}:{}:{}:{}: '{}'\n",
                    loc.filename.display(),
                    loc.line,
                    m.context,
                    m.message.source,
                    m.message.translation
                ));
            }
        }

        output
    }

    /// Serialize statistics as pretty-printed JSON
    pub fn format_stats_json(&self, stats: &CatalogStats) -> serde_json::Result<String> {
        serde_json::to_string_pretty(stats)
    }

    /// Serialize validation findings as pretty-printed JSON
    pub fn format_validation_json(
        &self,
        report: &ValidationReport,
    ) -> serde_json::Result<String> {
        serde_json::to_string_pretty(report)
    }
}

impl Default for SimpleFormatter {
    fn default() -> Self {
        Self::new()
    }
}
