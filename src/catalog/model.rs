use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Provenance hint pointing at where a source string appears in the host
/// project (e.g. `../createArc.py:312`). Advisory only: hints drift as the
/// underlying source evolves and are refreshed on merge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    /// File path as written in the catalog, usually relative to the catalog
    pub filename: PathBuf,
    /// Line number (1-indexed)
    pub line: u32,
}

impl Location {
    pub fn new(filename: impl Into<PathBuf>, line: u32) -> Self {
        Self {
            filename: filename.into(),
            line,
        }
    }
}

/// Lifecycle state of a translation entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TranslationStatus {
    /// Translated and current
    Finished,
    /// Awaiting translation (empty or draft translation text)
    Unfinished,
    /// The source string no longer exists in the host project
    Obsolete,
}

impl TranslationStatus {
    /// The `type` attribute value Qt Linguist writes, if any.
    /// Finished entries carry no attribute.
    pub fn type_attr(self) -> Option<&'static str> {
        match self {
            Self::Finished => None,
            Self::Unfinished => Some("unfinished"),
            Self::Obsolete => Some("obsolete"),
        }
    }

    /// Parse a `type` attribute value. `None` (attribute absent) is Finished.
    pub fn from_type_attr(value: Option<&str>) -> Option<Self> {
        match value {
            None => Some(Self::Finished),
            Some("unfinished") => Some(Self::Unfinished),
            Some("obsolete") => Some(Self::Obsolete),
            Some(_) => None,
        }
    }
}

/// A single translation entry: one (source string, translated string) pair
/// within a context, plus provenance and status
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// The original UI string; the lookup key within its context
    pub source: String,
    /// The localized string; may be empty for unfinished/obsolete entries
    pub translation: String,
    /// Entry status
    pub status: TranslationStatus,
    /// Zero or more file/line provenance hints
    pub locations: Vec<Location>,
}

impl Message {
    /// Create an untranslated entry, the state new strings enter the catalog in
    pub fn unfinished(source: impl Into<String>, locations: Vec<Location>) -> Self {
        Self {
            source: source.into(),
            translation: String::new(),
            status: TranslationStatus::Unfinished,
            locations,
        }
    }

    /// Whether this entry resolves to a usable translation
    pub fn is_translated(&self) -> bool {
        self.status == TranslationStatus::Finished && !self.translation.is_empty()
    }
}

/// A named grouping of messages, typically one UI scope (a dialog, or the
/// catch-all `@default` namespace the plugin's module-level `tr()` uses)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TsContext {
    pub name: String,
    pub messages: Vec<Message>,
}

impl TsContext {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            messages: Vec::new(),
        }
    }

    /// Find a message by source text. Non-obsolete entries win over obsolete
    /// ones when the file contains both (a regeneration artifact).
    pub fn find(&self, source: &str) -> Option<&Message> {
        self.messages
            .iter()
            .find(|m| m.source == source && m.status != TranslationStatus::Obsolete)
            .or_else(|| self.messages.iter().find(|m| m.source == source))
    }

    pub fn find_mut(&mut self, source: &str) -> Option<&mut Message> {
        if let Some(idx) = self
            .messages
            .iter()
            .position(|m| m.source == source && m.status != TranslationStatus::Obsolete)
        {
            return self.messages.get_mut(idx);
        }
        let idx = self.messages.iter().position(|m| m.source == source)?;
        self.messages.get_mut(idx)
    }
}

/// An in-memory Qt Linguist catalog: the `<TS>` document
///
/// Context and message order is preserved from the file so a regenerated
/// catalog diffs cleanly against its predecessor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Catalog {
    /// TS format version (e.g. "2.0")
    pub version: String,
    /// Target language tag (e.g. "zh")
    pub language: String,
    /// Source language tag; empty when the attribute is absent
    pub source_language: String,
    pub contexts: Vec<TsContext>,
}

impl Catalog {
    pub fn new(language: impl Into<String>) -> Self {
        Self {
            version: "2.0".to_string(),
            language: language.into(),
            source_language: String::new(),
            contexts: Vec::new(),
        }
    }

    /// Look up a message by (context, source). See `TsContext::find` for
    /// duplicate handling.
    pub fn lookup(&self, context: &str, source: &str) -> Option<&Message> {
        self.context(context)?.find(source)
    }

    /// Resolve a UI string: the translated text when a finished, non-empty
    /// translation exists, otherwise the source string itself. This is the
    /// fallback the host framework applies at runtime.
    pub fn translate<'a>(&'a self, context: &str, source: &'a str) -> &'a str {
        match self.lookup(context, source) {
            Some(m) if m.is_translated() => &m.translation,
            _ => source,
        }
    }

    pub fn context(&self, name: &str) -> Option<&TsContext> {
        self.contexts.iter().find(|c| c.name == name)
    }

    pub fn context_mut(&mut self, name: &str) -> Option<&mut TsContext> {
        self.contexts.iter_mut().find(|c| c.name == name)
    }

    /// Get or create a context, preserving insertion order
    pub fn context_or_insert(&mut self, name: &str) -> &mut TsContext {
        if let Some(idx) = self.contexts.iter().position(|c| c.name == name) {
            return &mut self.contexts[idx];
        }
        self.contexts.push(TsContext::new(name));
        self.contexts.last_mut().unwrap()
    }

    /// Total message count across all contexts
    pub fn len(&self) -> usize {
        self.contexts.iter().map(|c| c.messages.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Iterate over (context name, message) pairs in document order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Message)> {
        self.contexts
            .iter()
            .flat_map(|c| c.messages.iter().map(move |m| (c.name.as_str(), m)))
    }
}
