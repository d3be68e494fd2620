pub mod entry_search;
pub mod hints;

pub use entry_search::{EntrySearcher, MatchField, SearchMatch};
pub use hints::{HintStatus, HintVerifier, VerifiedHint};
