pub mod cache;
pub mod catalog;
pub mod config;
pub mod error;
pub mod extract;
pub mod output;
pub mod parse;
pub mod search;
pub mod validate;

use std::path::{Path, PathBuf};

// Re-export commonly used types
pub use cache::ScanCache;
pub use catalog::{merge, Catalog, CatalogStats, Location, Message, MergeReport, TranslationStatus};
pub use config::default_patterns;
pub use error::{CatalogError, Result};
pub use extract::{SourceScanner, SourceString};
pub use output::{Formatter, SimpleFormatter};
pub use parse::{TsReader, TsWriter};
pub use search::{EntrySearcher, HintStatus, HintVerifier, SearchMatch};
pub use validate::{validate, ValidationReport};

/// Query parameters for regenerating a catalog from its source tree
#[derive(Debug, Clone)]
pub struct UpdateQuery {
    pub catalog_path: PathBuf,
    pub source_dir: Option<PathBuf>,
    /// Drop vanished entries instead of marking them obsolete
    pub no_obsolete: bool,
    pub exclude_patterns: Vec<String>,
    pub verbose: bool,
    pub quiet: bool,
    pub no_cache: bool,
}

impl UpdateQuery {
    pub fn new(catalog_path: PathBuf) -> Self {
        Self {
            catalog_path,
            source_dir: None,
            no_obsolete: false,
            exclude_patterns: Vec::new(),
            verbose: false,
            quiet: false,
            no_cache: false,
        }
    }

    pub fn with_source_dir(mut self, source_dir: PathBuf) -> Self {
        self.source_dir = Some(source_dir);
        self
    }

    pub fn with_no_obsolete(mut self, no_obsolete: bool) -> Self {
        self.no_obsolete = no_obsolete;
        self
    }

    pub fn with_exclusions(mut self, exclusions: Vec<String>) -> Self {
        self.exclude_patterns = exclusions;
        self
    }

    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn with_quiet(mut self, quiet: bool) -> Self {
        self.quiet = quiet;
        self
    }

    pub fn with_no_cache(mut self, no_cache: bool) -> Self {
        self.no_cache = no_cache;
        self
    }
}

/// Result of an update run: the merged catalog and what changed
#[derive(Debug)]
pub struct UpdateResult {
    pub catalog: Catalog,
    pub report: MergeReport,
    pub scanned_strings: usize,
}

/// Scan a source tree for translatable strings.
///
/// The base directory's project type decides the default exclusions;
/// `exclude_patterns` adds to them.
pub fn run_scan(
    base_dir: &Path,
    exclude_patterns: &[String],
    verbose: bool,
    quiet: bool,
    no_cache: bool,
) -> Result<Vec<SourceString>> {
    let project_type = config::detect_project_type(base_dir);
    let mut exclusions: Vec<String> = config::get_default_exclusions(project_type)
        .iter()
        .map(|&s| s.to_string())
        .collect();
    exclusions.extend(exclude_patterns.iter().cloned());

    let mut scanner = SourceScanner::new();
    scanner.set_exclusions(exclusions);
    scanner.set_verbose(verbose);
    scanner.set_quiet(quiet);
    if no_cache {
        scanner.disable_cache();
    }

    scanner.scan(base_dir)
}

/// Regenerate a catalog against its source tree: read it, scan the
/// sources, and merge the results in. The updated catalog is returned
/// but not written, so callers can implement `--dry-run`.
///
/// When `source_dir` is unset the catalog's parent directory is scanned,
/// matching the common layout where the .ts file sits next to the code.
#[must_use = "this function returns a Result that should be handled"]
pub fn run_update(query: UpdateQuery) -> Result<UpdateResult> {
    let mut catalog = parse::TsReader::parse_file(&query.catalog_path)?;

    let source_dir = match &query.source_dir {
        Some(dir) => dir.clone(),
        None => query
            .catalog_path
            .parent()
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(".")),
    };

    let mut strings = run_scan(
        &source_dir,
        &query.exclude_patterns,
        query.verbose,
        query.quiet,
        query.no_cache,
    )?;
    extract::rebase_locations(&mut strings, &query.catalog_path, &source_dir);

    let scanned_strings = strings.len();
    let report = catalog::merge(&mut catalog, &strings, query.no_obsolete);

    Ok(UpdateResult {
        catalog,
        report,
        scanned_strings,
    })
}
