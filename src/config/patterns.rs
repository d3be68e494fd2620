use regex::Regex;

/// The catch-all context module-level `tr()` helpers translate into
pub const DEFAULT_CONTEXT: &str = "@default";

/// An extraction pattern: a regex plus the capture groups that hold the
/// context name (if the call names one) and the source text
pub struct TrPattern {
    pub regex: Regex,
    /// Capture group for the context; `None` means `@default`
    pub context_group: Option<usize>,
    /// Capture group for the string literal body
    pub text_group: usize,
}

impl TrPattern {
    fn bare(pattern: &str) -> Self {
        Self {
            regex: Regex::new(pattern).unwrap(),
            context_group: None,
            text_group: 1,
        }
    }

    fn with_context(pattern: &str) -> Self {
        Self {
            regex: Regex::new(pattern).unwrap(),
            context_group: Some(1),
            text_group: 2,
        }
    }
}

/// Default patterns for PyQt translation calls.
///
/// The regex crate has no backreferences, so each quote style gets its own
/// pattern. Literal bodies allow backslash escapes (`tr('Don\'t')`).
pub fn default_patterns() -> Vec<TrPattern> {
    vec![
        // tr('...') / self.tr('...')
        TrPattern::bare(r#"\btr\(\s*'((?:\\.|[^'\\])*)'"#),
        TrPattern::bare(r#"\btr\(\s*"((?:\\.|[^"\\])*)""#),
        // translate('Context', '...') / QCoreApplication.translate(...)
        TrPattern::with_context(r#"\btranslate\(\s*['"]([^'"]*)['"]\s*,\s*'((?:\\.|[^'\\])*)'"#),
        TrPattern::with_context(r#"\btranslate\(\s*['"]([^'"]*)['"]\s*,\s*"((?:\\.|[^"\\])*)""#),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_patterns_compile() {
        let patterns = default_patterns();
        assert_eq!(patterns.len(), 4);
    }

    #[test]
    fn test_tr_single_quote() {
        let patterns = default_patterns();
        let caps = patterns[0].regex.captures("name = tr('Create arc wedge')").unwrap();
        assert_eq!(&caps[1], "Create arc wedge");
    }

    #[test]
    fn test_tr_double_quote() {
        let patterns = default_patterns();
        let caps = patterns[1]
            .regex
            .captures(r#"SHAPE_TYPE = [tr("Polygon"), tr("Line")]"#)
            .unwrap();
        assert_eq!(&caps[1], "Polygon");
    }

    #[test]
    fn test_tr_matches_method_call() {
        let patterns = default_patterns();
        assert!(patterns[0].regex.is_match("self.tr('Geodesic measure tool')"));
    }

    #[test]
    fn test_tr_ignores_other_functions() {
        let patterns = default_patterns();
        assert!(!patterns[0].regex.is_match("substr('hello')"));
        assert!(!patterns[0].regex.is_match("attr('x')"));
    }

    #[test]
    fn test_tr_with_escaped_quote() {
        let patterns = default_patterns();
        let caps = patterns[0].regex.captures(r"tr('Don\'t panic')").unwrap();
        assert_eq!(&caps[1], r"Don\'t panic");
    }

    #[test]
    fn test_translate_with_context() {
        let patterns = default_patterns();
        let caps = patterns[2]
            .regex
            .captures("QCoreApplication.translate('@default', 'Create shapes')")
            .unwrap();
        assert_eq!(&caps[1], "@default");
        assert_eq!(&caps[2], "Create shapes");
    }

    #[test]
    fn test_translate_mixed_quotes() {
        let patterns = default_patterns();
        let caps = patterns[3]
            .regex
            .captures(r#"translate("Processing", "XY to Line")"#)
            .unwrap();
        assert_eq!(&caps[1], "Processing");
        assert_eq!(&caps[2], "XY to Line");
    }
}
