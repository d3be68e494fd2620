use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::PathBuf;
use std::process;

use tsq::catalog;
use tsq::extract;
use tsq::output::{Formatter, SimpleFormatter};
use tsq::parse::{TsReader, TsWriter};
use tsq::search::{EntrySearcher, HintVerifier};
use tsq::{Catalog, Result, UpdateQuery};

/// tsq - query and maintain Qt Linguist translation catalogs
#[derive(Parser, Debug)]
#[command(name = "tsq")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Resolve a string the way the application would at runtime
    Lookup {
        /// Path to the .ts catalog
        catalog: PathBuf,
        /// Source string to resolve
        source: String,
        /// Context to look in
        #[arg(short, long, default_value = "@default")]
        context: String,
    },
    /// Find catalog entries whose source or translation contains a text
    Search {
        /// Path to the .ts catalog
        catalog: PathBuf,
        /// Text to search for
        query: String,
        /// Match case exactly (search folds case by default)
        #[arg(long)]
        case_sensitive: bool,
        /// Restrict results to one context
        #[arg(short, long)]
        context: Option<String>,
        /// Include obsolete entries
        #[arg(long)]
        include_obsolete: bool,
        /// Check each location hint against the source tree
        #[arg(long)]
        verify_hints: bool,
        /// Plain file:line:context:source output
        #[arg(long)]
        simple: bool,
    },
    /// Check a catalog for internal inconsistencies
    Validate {
        /// Path to the .ts catalog
        catalog: PathBuf,
        /// Emit findings as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show per-context completion statistics
    Stats {
        /// Path to the .ts catalog
        catalog: PathBuf,
        /// List untranslated source strings per context
        #[arg(short, long)]
        untranslated: bool,
        /// Emit statistics as JSON
        #[arg(long)]
        json: bool,
    },
    /// Scan a source tree and write a fresh catalog of unfinished entries
    Extract {
        /// Directory to scan for .py and .ui files
        source_dir: PathBuf,
        /// Catalog file to write
        #[arg(short, long)]
        output: PathBuf,
        /// Target language tag recorded in the catalog
        #[arg(short, long, default_value = "en")]
        language: String,
        /// Extra directory or file names to skip
        #[arg(long, value_delimiter = ',')]
        exclude: Vec<String>,
        /// Show per-file scan errors
        #[arg(short, long)]
        verbose: bool,
        /// Suppress progress indicators
        #[arg(short, long)]
        quiet: bool,
        /// Bypass the scan cache
        #[arg(long)]
        no_cache: bool,
    },
    /// Re-scan the source tree and merge changes into an existing catalog
    Update {
        /// Path to the .ts catalog
        catalog: PathBuf,
        /// Directory to scan (defaults to the catalog's parent)
        #[arg(short, long)]
        source_dir: Option<PathBuf>,
        /// Drop vanished entries instead of marking them obsolete
        #[arg(long)]
        no_obsolete: bool,
        /// Report changes without writing the catalog
        #[arg(long)]
        dry_run: bool,
        /// Extra directory or file names to skip
        #[arg(long, value_delimiter = ',')]
        exclude: Vec<String>,
        /// Show per-file scan errors
        #[arg(short, long)]
        verbose: bool,
        /// Suppress progress indicators
        #[arg(short, long)]
        quiet: bool,
        /// Bypass the scan cache
        #[arg(long)]
        no_cache: bool,
    },
}

fn main() {
    let cli = Cli::parse();

    match run(cli) {
        Ok(exit_code) => process::exit(exit_code),
        Err(e) => {
            eprintln!("{} {}", "Error:".red().bold(), e);
            process::exit(1);
        }
    }
}

fn run(cli: Cli) -> Result<i32> {
    let formatter = Formatter::new(!cli.no_color);

    match cli.command {
        Command::Lookup {
            catalog,
            source,
            context,
        } => {
            let catalog = TsReader::parse_file(&catalog)?;
            println!("{}", catalog.translate(&context, &source));
            Ok(0)
        }

        Command::Search {
            catalog: catalog_path,
            query,
            case_sensitive,
            context,
            include_obsolete,
            verify_hints,
            simple,
        } => {
            let catalog = TsReader::parse_file(&catalog_path)?;

            let mut searcher = EntrySearcher::new();
            searcher.set_case_sensitive(case_sensitive);
            searcher.set_include_obsolete(include_obsolete);
            searcher.set_context_filter(context);
            let matches = searcher.search(&catalog, &query);

            if simple {
                print!("{}", SimpleFormatter::new().format_matches(&matches));
            } else if verify_hints {
                let verifier = HintVerifier::new(&catalog_path);
                for m in &matches {
                    print!("{}", formatter.format_entry(m.message));
                    print!("{}", formatter.format_hints(&verifier.verify(m.message)));
                }
                println!(
                    "\n{} matching entr{}",
                    matches.len(),
                    if matches.len() == 1 { "y" } else { "ies" }
                );
            } else {
                print!("{}", formatter.format_matches(&query, &matches));
            }
            Ok(0)
        }

        Command::Validate { catalog, json } => {
            let catalog = TsReader::parse_file(&catalog)?;
            let report = tsq::validate(&catalog);

            if json {
                println!(
                    "{}",
                    SimpleFormatter::new()
                        .format_validation_json(&report)
                        .map_err(|e| tsq::CatalogError::Generic(e.to_string()))?
                );
            } else {
                print!("{}", formatter.format_validation(&report));
            }

            Ok(if report.has_errors() { 1 } else { 0 })
        }

        Command::Stats {
            catalog,
            untranslated,
            json,
        } => {
            let catalog = TsReader::parse_file(&catalog)?;
            let stats = catalog.stats();

            if json {
                println!(
                    "{}",
                    SimpleFormatter::new()
                        .format_stats_json(&stats)
                        .map_err(|e| tsq::CatalogError::Generic(e.to_string()))?
                );
            } else {
                print!("{}", formatter.format_stats(&stats, untranslated));
            }
            Ok(0)
        }

        Command::Extract {
            source_dir,
            output,
            language,
            exclude,
            verbose,
            quiet,
            no_cache,
        } => {
            let mut strings = tsq::run_scan(&source_dir, &exclude, verbose, quiet, no_cache)?;
            extract::rebase_locations(&mut strings, &output, &source_dir);

            let mut catalog = Catalog::new(language);
            catalog.source_language = "en".to_string();
            let report = catalog::merge(&mut catalog, &strings, false);

            TsWriter::write_file(&catalog, &output)?;
            println!(
                "Wrote {} with {} entr{}",
                output.display(),
                report.added,
                if report.added == 1 { "y" } else { "ies" }
            );
            Ok(0)
        }

        Command::Update {
            catalog: catalog_path,
            source_dir,
            no_obsolete,
            dry_run,
            exclude,
            verbose,
            quiet,
            no_cache,
        } => {
            let mut query = UpdateQuery::new(catalog_path.clone())
                .with_no_obsolete(no_obsolete)
                .with_exclusions(exclude)
                .with_verbose(verbose)
                .with_quiet(quiet)
                .with_no_cache(no_cache);
            if let Some(dir) = source_dir {
                query = query.with_source_dir(dir);
            }

            let result = tsq::run_update(query)?;

            if dry_run {
                print!("{}", formatter.format_merge_report(&result.report));
                println!("(dry run, catalog not written)");
            } else if result.report.changed() {
                TsWriter::write_file(&result.catalog, &catalog_path)?;
                print!("{}", formatter.format_merge_report(&result.report));
            } else {
                println!("Catalog already up to date ({} entries)", result.catalog.len());
            }
            Ok(0)
        }
    }
}
