use hashbrown::{HashMap, HashSet};
use serde::Serialize;

use super::model::{Catalog, Location, Message, TranslationStatus};
use crate::extract::SourceString;

/// Outcome of merging a source scan into a catalog
#[derive(Debug, Clone, Default, Serialize)]
pub struct MergeReport {
    /// New source strings, appended as unfinished entries
    pub added: usize,
    /// Existing entries still present in the source (locations refreshed)
    pub retained: usize,
    /// Obsolete entries whose source string reappeared
    pub revived: usize,
    /// Active entries whose source string vanished
    pub obsoleted: usize,
    /// Entries removed outright (no-obsolete mode)
    pub dropped: usize,
    /// Duplicate messages collapsed into one
    pub collapsed: usize,
}

impl MergeReport {
    /// Whether the merge changed the catalog at all
    pub fn changed(&self) -> bool {
        self.added + self.revived + self.obsoleted + self.dropped + self.collapsed > 0
    }
}

/// Merge freshly scanned source strings into an existing catalog, the way the
/// extraction step regenerates the catalog each time the host source changes:
///
/// - a scanned string already in the catalog keeps its translation and status
///   and gets the scanned location hints (refreshing drifted line numbers);
/// - an obsolete entry whose string reappeared is revived (finished if it
///   carries a translation, unfinished otherwise);
/// - a scanned string not in the catalog is appended as unfinished;
/// - an active entry whose string vanished is marked obsolete and its stale
///   hints are cleared, or deleted entirely when `no_obsolete` is set.
///
/// Duplicate messages for one (context, source) pair are collapsed first,
/// preferring the one with a finished translation.
pub fn merge(catalog: &mut Catalog, scanned: &[SourceString], no_obsolete: bool) -> MergeReport {
    let mut report = MergeReport::default();

    collapse_duplicates(catalog, &mut report);

    // Scanned locations grouped by (context, source), in scan order
    let mut scan_locations: HashMap<(String, String), Vec<Location>> = HashMap::new();
    let mut scan_order: Vec<(String, String)> = Vec::new();
    for s in scanned {
        let key = (s.context.clone(), s.text.clone());
        let locations = scan_locations.entry(key.clone()).or_insert_with(|| {
            scan_order.push(key);
            Vec::new()
        });
        if !locations.contains(&s.location) {
            locations.push(s.location.clone());
        }
    }

    let mut consumed: HashSet<(String, String)> = HashSet::new();

    for ctx in &mut catalog.contexts {
        let ctx_name = ctx.name.clone();
        ctx.messages.retain_mut(|m| {
            let key = (ctx_name.clone(), m.source.clone());
            match scan_locations.get(&key) {
                Some(locations) => {
                    consumed.insert(key);
                    m.locations = locations.clone();
                    if m.status == TranslationStatus::Obsolete {
                        m.status = if m.translation.is_empty() {
                            TranslationStatus::Unfinished
                        } else {
                            TranslationStatus::Finished
                        };
                        report.revived += 1;
                    } else {
                        report.retained += 1;
                    }
                    true
                }
                None => {
                    if no_obsolete {
                        report.dropped += 1;
                        return false;
                    }
                    if m.status != TranslationStatus::Obsolete {
                        m.status = TranslationStatus::Obsolete;
                        m.locations.clear();
                        report.obsoleted += 1;
                    }
                    true
                }
            }
        });
    }

    // Append new strings in scan order
    for key in scan_order {
        if consumed.contains(&key) {
            continue;
        }
        let locations = scan_locations[&key].clone();
        let (context, text) = key;
        catalog
            .context_or_insert(&context)
            .messages
            .push(Message::unfinished(text, locations));
        report.added += 1;
    }

    report
}

fn collapse_duplicates(catalog: &mut Catalog, report: &mut MergeReport) {
    for ctx in &mut catalog.contexts {
        let mut kept: Vec<Message> = Vec::with_capacity(ctx.messages.len());
        for m in ctx.messages.drain(..) {
            match kept.iter_mut().find(|k| k.source == m.source) {
                Some(existing) => {
                    // Prefer the duplicate that actually carries a translation
                    if !existing.is_translated() && m.is_translated() {
                        *existing = m;
                    }
                    report.collapsed += 1;
                }
                None => kept.push(m),
            }
        }
        ctx.messages = kept;
    }
}
