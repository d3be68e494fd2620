pub mod python;
pub mod ui_file;

pub use python::PyParser;
pub use ui_file::UiParser;

use serde::{Deserialize, Serialize};
use std::path::{Component, Path, PathBuf};
use walkdir::WalkDir;

use crate::cache::ScanCache;
use crate::catalog::Location;
use crate::error::{CatalogError, Result};

/// A translatable string found in the host project's source
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceString {
    /// Translation context (`@default` for bare `tr()` calls, the root
    /// widget name for .ui strings)
    pub context: String,
    /// The source text, escape sequences decoded
    pub text: String,
    /// Where the string was found, relative to the scanned directory
    pub location: Location,
}

/// `SourceScanner` walks a source tree and collects every translatable
/// string, with the file path and line number each one came from.
pub struct SourceScanner {
    exclusions: Vec<String>,
    verbose: bool,
    quiet: bool,
    cache: Option<ScanCache>,
    progress_count: std::cell::Cell<usize>,
}

impl Default for SourceScanner {
    fn default() -> Self {
        Self::new()
    }
}

impl SourceScanner {
    /// Create a new `SourceScanner`.
    pub fn new() -> Self {
        let cache = ScanCache::new().ok(); // Silently disable cache on error
        Self {
            exclusions: Vec::new(),
            verbose: false,
            quiet: false,
            cache,
            progress_count: std::cell::Cell::new(0),
        }
    }

    /// Set exclusion patterns (directory or file names to ignore)
    pub fn set_exclusions(&mut self, exclusions: Vec<String>) {
        self.exclusions = exclusions;
    }

    /// Set verbose mode for detailed error messages
    pub fn set_verbose(&mut self, verbose: bool) {
        self.verbose = verbose;
    }

    /// Set quiet mode to suppress progress indicators
    pub fn set_quiet(&mut self, quiet: bool) {
        self.quiet = quiet;
    }

    /// Disable the scan cache for this run
    pub fn disable_cache(&mut self) {
        self.cache = None;
    }

    /// Print a progress indicator: C for cache hits, . for parsed files,
    /// S for files skipped on parse errors
    fn print_progress(&self, indicator_type: char) {
        if self.quiet {
            return;
        }

        use colored::Colorize;
        let indicator = match indicator_type {
            'C' => "C".cyan(),
            '.' => ".".green(),
            'S' => "S".yellow(),
            _ => return,
        };
        eprint!("{}", indicator);

        let new_count = self.progress_count.get() + 1;
        if new_count >= 30 {
            eprintln!();
            self.progress_count.set(0);
        } else {
            self.progress_count.set(new_count);
        }
    }

    /// Recursively walk `base_dir` for `*.py` and `*.ui` files and collect
    /// every translatable string. Location hints are relative to `base_dir`.
    pub fn scan(&self, base_dir: &Path) -> Result<Vec<SourceString>> {
        let mut strings = Vec::new();
        let mut skipped_files = 0;

        let walker = WalkDir::new(base_dir).sort_by_file_name().into_iter();
        for entry in walker
            .filter_entry(|e| {
                if is_ignored(e) {
                    return false;
                }
                let name = e.file_name().to_string_lossy();
                for excl in &self.exclusions {
                    if name == excl.as_str() {
                        return false;
                    }
                }
                true
            })
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
        {
            let path = entry.path();
            let Some(ext) = path.extension() else {
                continue;
            };
            let ext_str = ext.to_string_lossy();
            if ext_str != "py" && ext_str != "ui" {
                continue;
            }

            let rel_path = path.strip_prefix(base_dir).unwrap_or(path).to_path_buf();

            // Try cache first
            let metadata = std::fs::metadata(path).ok();
            let cached = if let (Some(cache), Some(meta)) = (&self.cache, &metadata) {
                meta.modified()
                    .ok()
                    .and_then(|mtime| cache.get(path, mtime, meta.len()))
            } else {
                None
            };

            let file_strings = if let Some(cached) = cached {
                self.print_progress('C');
                cached
            } else {
                let parsed = if ext_str == "py" {
                    PyParser::parse_file(path, &rel_path)
                } else {
                    UiParser::parse_file(path, &rel_path)
                };

                match parsed {
                    Ok(parsed) => {
                        self.print_progress('.');
                        if let (Some(cache), Some(meta)) = (&self.cache, &metadata) {
                            if let Ok(mtime) = meta.modified() {
                                let _ = cache.set(path, mtime, meta.len(), &parsed);
                            }
                        }
                        parsed
                    }
                    Err(e) => {
                        skipped_files += 1;
                        self.print_progress('S');
                        if self.verbose {
                            eprintln!(
                                "\nWarning: Failed to scan {}: {}",
                                path.display(),
                                e
                            );
                        }
                        continue;
                    }
                }
            };

            strings.extend(file_strings);
        }

        if !self.quiet {
            if self.progress_count.get() > 0 {
                eprintln!();
            }
            if skipped_files > 0 && self.verbose {
                eprintln!(
                    "(Skipped {} unreadable file{})",
                    skipped_files,
                    if skipped_files == 1 { "" } else { "s" }
                );
            }
        }

        if strings.is_empty() {
            return Err(CatalogError::NoSourceStrings {
                dir: base_dir.to_path_buf(),
            });
        }

        Ok(strings)
    }
}

fn is_ignored(entry: &walkdir::DirEntry) -> bool {
    // Always allow the root directory of the scan
    if entry.depth() == 0 {
        return false;
    }

    entry
        .file_name()
        .to_str()
        .map(|s| {
            s.starts_with('.') // Hidden files/dirs
                || s == "__pycache__"
                || s == "venv"
                || s == "build"
                || s == "dist"
        })
        .unwrap_or(false)
}

/// Rewrite scan-relative location hints so they are relative to the
/// catalog's own directory, the way Qt Linguist records them (a catalog in
/// `i18n/` points at `../createArc.py`).
pub fn rebase_locations(strings: &mut [SourceString], catalog_path: &Path, source_dir: &Path) {
    let Some(catalog_dir) = catalog_path.parent() else {
        return;
    };
    let Some(prefix) = relative_dir(catalog_dir, source_dir) else {
        return;
    };

    for s in strings {
        s.location.filename = prefix.join(&s.location.filename);
    }
}

/// Lexical relative path from `from` to `to`. Returns `None` when the two
/// cannot be related lexically (e.g. different root prefixes).
fn relative_dir(from: &Path, to: &Path) -> Option<PathBuf> {
    let from = lexical_absolute(from)?;
    let to = lexical_absolute(to)?;

    let from_components: Vec<_> = from.components().collect();
    let to_components: Vec<_> = to.components().collect();

    let common = from_components
        .iter()
        .zip(to_components.iter())
        .take_while(|(a, b)| a == b)
        .count();

    if common == 0 {
        return None;
    }

    let mut result = PathBuf::new();
    for _ in common..from_components.len() {
        result.push("..");
    }
    for component in &to_components[common..] {
        result.push(component.as_os_str());
    }
    Some(result)
}

/// Absolute form of a path without touching the filesystem: `.` and `..`
/// components are resolved lexically against the current directory.
fn lexical_absolute(path: &Path) -> Option<PathBuf> {
    let base = if path.is_absolute() {
        PathBuf::new()
    } else {
        std::env::current_dir().ok()?
    };

    let mut result = base;
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                result.pop();
            }
            other => result.push(other.as_os_str()),
        }
    }
    Some(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn quiet_scanner() -> SourceScanner {
        let mut scanner = SourceScanner::new();
        scanner.set_quiet(true);
        scanner.disable_cache();
        scanner
    }

    #[test]
    fn test_scan_python_and_ui() -> Result<()> {
        let dir = tempdir()?;
        fs::write(
            dir.path().join("createStar.py"),
            "name = tr('Create star')\n",
        )?;
        fs::create_dir(dir.path().join("ui"))?;
        fs::write(
            dir.path().join("ui").join("settings.ui"),
            r#"<ui><widget class="QDialog" name="SettingsDialog">
<property name="windowTitle"><string>Shape Tools Settings</string></property>
</widget></ui>"#,
        )?;

        let strings = quiet_scanner().scan(dir.path())?;

        assert_eq!(strings.len(), 2);
        let star = strings.iter().find(|s| s.text == "Create star").unwrap();
        assert_eq!(star.context, "@default");
        assert_eq!(star.location.filename, PathBuf::from("createStar.py"));

        let title = strings
            .iter()
            .find(|s| s.text == "Shape Tools Settings")
            .unwrap();
        assert_eq!(title.context, "SettingsDialog");
        assert_eq!(
            title.location.filename,
            PathBuf::from("ui").join("settings.ui")
        );
        Ok(())
    }

    #[test]
    fn test_scan_ignores_other_extensions() -> Result<()> {
        let dir = tempdir()?;
        fs::write(dir.path().join("app.py"), "x = tr('Keep me')\n")?;
        fs::write(dir.path().join("notes.txt"), "tr('Not source code')\n")?;

        let strings = quiet_scanner().scan(dir.path())?;
        assert_eq!(strings.len(), 1);
        assert_eq!(strings[0].text, "Keep me");
        Ok(())
    }

    #[test]
    fn test_scan_respects_exclusions() -> Result<()> {
        let dir = tempdir()?;
        fs::write(dir.path().join("app.py"), "x = tr('Keep me')\n")?;
        fs::create_dir(dir.path().join("i18n"))?;
        fs::write(dir.path().join("i18n").join("gen.py"), "x = tr('Drop me')\n")?;

        let mut scanner = quiet_scanner();
        scanner.set_exclusions(vec!["i18n".to_string()]);

        let strings = scanner.scan(dir.path())?;
        assert_eq!(strings.len(), 1);
        assert_eq!(strings[0].text, "Keep me");
        Ok(())
    }

    #[test]
    fn test_scan_skips_hidden_and_pycache() -> Result<()> {
        let dir = tempdir()?;
        fs::write(dir.path().join("app.py"), "x = tr('Keep me')\n")?;
        fs::create_dir(dir.path().join("__pycache__"))?;
        fs::write(
            dir.path().join("__pycache__").join("app.py"),
            "x = tr('Compiled')\n",
        )?;
        fs::create_dir(dir.path().join(".hidden"))?;
        fs::write(
            dir.path().join(".hidden").join("x.py"),
            "x = tr('Hidden')\n",
        )?;

        let strings = quiet_scanner().scan(dir.path())?;
        assert_eq!(strings.len(), 1);
        Ok(())
    }

    #[test]
    fn test_scan_empty_tree_is_error() {
        let dir = tempdir().unwrap();
        let err = quiet_scanner().scan(dir.path()).unwrap_err();
        assert!(matches!(err, CatalogError::NoSourceStrings { .. }));
    }

    #[test]
    fn test_scan_survives_malformed_ui() -> Result<()> {
        let dir = tempdir()?;
        fs::write(dir.path().join("app.py"), "x = tr('Keep me')\n")?;
        fs::write(dir.path().join("broken.ui"), "<ui><string>trunc")?;

        let strings = quiet_scanner().scan(dir.path())?;
        assert_eq!(strings.len(), 1);
        Ok(())
    }

    #[test]
    fn test_rebase_locations() {
        let mut strings = vec![SourceString {
            context: "@default".to_string(),
            text: "Create arc wedge".to_string(),
            location: Location::new("createArc.py", 312),
        }];

        rebase_locations(
            &mut strings,
            Path::new("/plugin/i18n/shapeTools_zh.ts"),
            Path::new("/plugin"),
        );

        assert_eq!(
            strings[0].location.filename,
            PathBuf::from("../createArc.py")
        );
    }

    #[test]
    fn test_rebase_locations_same_dir() {
        let mut strings = vec![SourceString {
            context: "@default".to_string(),
            text: "x".to_string(),
            location: Location::new("ui/settings.ui", 14),
        }];

        rebase_locations(
            &mut strings,
            Path::new("/plugin/app_zh.ts"),
            Path::new("/plugin"),
        );

        assert_eq!(
            strings[0].location.filename,
            PathBuf::from("ui/settings.ui")
        );
    }
}
