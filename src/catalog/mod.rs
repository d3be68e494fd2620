pub mod merge;
pub mod model;
pub mod stats;

pub use merge::{merge, MergeReport};
pub use model::{Catalog, Location, Message, TranslationStatus, TsContext};
pub use stats::{CatalogStats, ContextStats};
