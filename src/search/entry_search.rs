use crate::catalog::{Catalog, Message, TranslationStatus};

/// Which side of an entry the query matched
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchField {
    Source,
    Translation,
    Both,
}

/// One matching catalog entry
#[derive(Debug, Clone)]
pub struct SearchMatch<'a> {
    pub context: &'a str,
    pub message: &'a Message,
    pub matched_in: MatchField,
}

/// Substring search over catalog entries, case-insensitive by default
pub struct EntrySearcher {
    include_obsolete: bool,
    case_sensitive: bool,
    context_filter: Option<String>,
}

impl Default for EntrySearcher {
    fn default() -> Self {
        Self::new()
    }
}

impl EntrySearcher {
    pub fn new() -> Self {
        Self {
            include_obsolete: false,
            case_sensitive: false,
            context_filter: None,
        }
    }

    /// Match case exactly instead of folding
    pub fn set_case_sensitive(&mut self, case_sensitive: bool) {
        self.case_sensitive = case_sensitive;
    }

    /// Include obsolete entries in results (skipped by default)
    pub fn set_include_obsolete(&mut self, include: bool) {
        self.include_obsolete = include;
    }

    /// Restrict results to a single context
    pub fn set_context_filter(&mut self, context: Option<String>) {
        self.context_filter = context;
    }

    /// Find every entry whose source or translation contains `query`.
    /// Results come back in document order.
    pub fn search<'a>(&self, catalog: &'a Catalog, query: &str) -> Vec<SearchMatch<'a>> {
        let query_folded = if self.case_sensitive {
            query.to_string()
        } else {
            query.to_lowercase()
        };
        let contains = |text: &str| {
            if self.case_sensitive {
                text.contains(&query_folded)
            } else {
                text.to_lowercase().contains(&query_folded)
            }
        };
        let mut matches = Vec::new();

        for ctx in &catalog.contexts {
            if let Some(filter) = &self.context_filter {
                if &ctx.name != filter {
                    continue;
                }
            }

            for msg in &ctx.messages {
                if msg.status == TranslationStatus::Obsolete && !self.include_obsolete {
                    continue;
                }

                let in_source = contains(&msg.source);
                let in_translation = contains(&msg.translation);

                let matched_in = match (in_source, in_translation) {
                    (true, true) => MatchField::Both,
                    (true, false) => MatchField::Source,
                    (false, true) => MatchField::Translation,
                    (false, false) => continue,
                };

                matches.push(SearchMatch {
                    context: &ctx.name,
                    message: msg,
                    matched_in,
                });
            }
        }

        matches
    }
}
