use serde::Serialize;

use super::model::{Catalog, TranslationStatus};

/// Completion statistics for one context
#[derive(Debug, Clone, Serialize)]
pub struct ContextStats {
    pub context: String,
    pub finished: usize,
    pub unfinished: usize,
    pub obsolete: usize,
    /// Finished as a percentage of active (non-obsolete) entries
    pub completion_percent: f32,
    /// Source texts of active entries still awaiting translation
    pub untranslated: Vec<String>,
}

/// Completion statistics for a whole catalog
#[derive(Debug, Clone, Serialize)]
pub struct CatalogStats {
    pub language: String,
    pub total_messages: usize,
    pub finished: usize,
    pub unfinished: usize,
    pub obsolete: usize,
    pub completion_percent: f32,
    pub contexts: Vec<ContextStats>,
}

impl Catalog {
    /// Count entries by status, per context and overall.
    ///
    /// Obsolete entries are excluded from the completion denominator: they no
    /// longer correspond to anything in the host project, so translating them
    /// cannot move the catalog forward.
    pub fn stats(&self) -> CatalogStats {
        let mut contexts = Vec::with_capacity(self.contexts.len());
        let (mut finished, mut unfinished, mut obsolete) = (0, 0, 0);

        for ctx in &self.contexts {
            let (mut ctx_finished, mut ctx_unfinished, mut ctx_obsolete) = (0, 0, 0);
            let mut untranslated = Vec::new();

            for m in &ctx.messages {
                match m.status {
                    TranslationStatus::Finished => ctx_finished += 1,
                    TranslationStatus::Unfinished => {
                        ctx_unfinished += 1;
                        untranslated.push(m.source.clone());
                    }
                    TranslationStatus::Obsolete => ctx_obsolete += 1,
                }
            }

            finished += ctx_finished;
            unfinished += ctx_unfinished;
            obsolete += ctx_obsolete;

            contexts.push(ContextStats {
                context: ctx.name.clone(),
                finished: ctx_finished,
                unfinished: ctx_unfinished,
                obsolete: ctx_obsolete,
                completion_percent: percent(ctx_finished, ctx_finished + ctx_unfinished),
                untranslated,
            });
        }

        CatalogStats {
            language: self.language.clone(),
            total_messages: self.len(),
            finished,
            unfinished,
            obsolete,
            completion_percent: percent(finished, finished + unfinished),
            contexts,
        }
    }
}

fn percent(part: usize, whole: usize) -> f32 {
    if whole == 0 {
        100.0
    } else {
        (part as f32 / whole as f32) * 100.0
    }
}
