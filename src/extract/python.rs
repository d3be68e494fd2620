use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

use super::SourceString;
use crate::catalog::Location;
use crate::config::{default_patterns, TrPattern, DEFAULT_CONTEXT};

/// Scanner for PyQt translation calls in Python sources.
///
/// Finds `tr("...")` / `tr('...')` calls (which land in the `@default`
/// context, like the plugin's module-level helper) and
/// `translate('Context', '...')` calls with a literal second argument.
pub struct PyParser;

impl PyParser {
    /// Scan a Python file. `rel_path` is the path recorded in location hints.
    pub fn parse_file(path: &Path, rel_path: &Path) -> Result<Vec<SourceString>> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read file: {}", path.display()))?;
        Ok(Self::parse_str(&content, rel_path))
    }

    /// Scan Python source text line by line
    pub fn parse_str(content: &str, rel_path: &Path) -> Vec<SourceString> {
        let patterns = default_patterns();
        let mut strings = Vec::new();

        for (idx, line) in content.lines().enumerate() {
            let line_no = (idx + 1) as u32;
            for pattern in &patterns {
                collect_matches(pattern, line, line_no, rel_path, &mut strings);
            }
        }

        strings
    }
}

fn collect_matches(
    pattern: &TrPattern,
    line: &str,
    line_no: u32,
    rel_path: &Path,
    strings: &mut Vec<SourceString>,
) {
    for caps in pattern.regex.captures_iter(line) {
        let Some(text) = caps.get(pattern.text_group) else {
            continue;
        };
        let text = unescape(text.as_str());
        if text.is_empty() {
            continue;
        }

        let context = match pattern.context_group {
            Some(group) => caps
                .get(group)
                .map(|m| m.as_str().to_string())
                .unwrap_or_else(|| DEFAULT_CONTEXT.to_string()),
            None => DEFAULT_CONTEXT.to_string(),
        };

        strings.push(SourceString {
            context,
            text,
            location: Location::new(rel_path, line_no),
        });
    }
}

/// Decode the backslash escapes Python allows inside string literals.
/// Unknown escapes keep the backslash, matching CPython's behavior for
/// sequences like `\d`.
fn unescape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();

    while let Some(ch) = chars.next() {
        if ch != '\\' {
            out.push(ch);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('\\') => out.push('\\'),
            Some('\'') => out.push('\''),
            Some('"') => out.push('"'),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }

    out
}
