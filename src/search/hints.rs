use std::fs;
use std::path::{Path, PathBuf};

use crate::catalog::{Location, Message};

/// Outcome of checking one location hint against the project on disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HintStatus {
    /// The hinted line still contains the source string
    Verified,
    /// The source string moved to another line in the same file
    Drifted { actual_line: u32 },
    /// The file exists but no longer contains the source string
    Stale,
    /// The hinted file does not exist
    FileMissing,
}

/// A location hint together with its verification outcome
#[derive(Debug, Clone)]
pub struct VerifiedHint {
    pub location: Location,
    pub status: HintStatus,
}

/// Verifies a catalog's advisory location hints against the source tree.
///
/// Hints are resolved relative to the catalog file's own directory, the
/// same base Qt Linguist wrote them against.
pub struct HintVerifier {
    base_dir: PathBuf,
}

impl HintVerifier {
    /// `catalog_path` is the .ts file the hints came from
    pub fn new(catalog_path: &Path) -> Self {
        let base_dir = catalog_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        Self { base_dir }
    }

    /// Check every hint on `message` against the files it points at
    pub fn verify(&self, message: &Message) -> Vec<VerifiedHint> {
        message
            .locations
            .iter()
            .map(|loc| VerifiedHint {
                location: loc.clone(),
                status: self.verify_one(loc, &message.source),
            })
            .collect()
    }

    fn verify_one(&self, location: &Location, source: &str) -> HintStatus {
        let path = self.base_dir.join(&location.filename);
        let Ok(content) = fs::read_to_string(&path) else {
            return HintStatus::FileMissing;
        };

        let hinted_idx = location.line.saturating_sub(1) as usize;
        let mut actual_line = None;

        for (idx, line) in content.lines().enumerate() {
            if !line_mentions(line, source) {
                continue;
            }
            if idx == hinted_idx {
                return HintStatus::Verified;
            }
            if actual_line.is_none() {
                actual_line = Some((idx + 1) as u32);
            }
        }

        match actual_line {
            Some(actual_line) => HintStatus::Drifted { actual_line },
            None => HintStatus::Stale,
        }
    }
}

/// Whether a source line plausibly contains the string. Checks the raw
/// text, its XML-escaped form (.ui files store `&` as `&amp;`), and its
/// Python string-escaped forms (`Don't` appears as `tr('Don\'t')`).
fn line_mentions(line: &str, source: &str) -> bool {
    if line.contains(source) {
        return true;
    }
    if source.contains(['&', '<', '>']) {
        let escaped = source
            .replace('&', "&amp;")
            .replace('<', "&lt;")
            .replace('>', "&gt;");
        if line.contains(&escaped) {
            return true;
        }
    }
    if source.contains(['\'', '"', '\\']) {
        let backslashed = source.replace('\\', "\\\\");
        if line.contains(&backslashed.replace('\'', "\\'"))
            || line.contains(&backslashed.replace('"', "\\\""))
        {
            return true;
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::TranslationStatus;
    use std::fs;
    use tempfile::tempdir;

    fn message(source: &str, filename: &str, line: u32) -> Message {
        Message {
            source: source.to_string(),
            translation: String::new(),
            status: TranslationStatus::Unfinished,
            locations: vec![Location::new(filename, line)],
        }
    }

    #[test]
    fn test_verified_hint() {
        let dir = tempdir().unwrap();
        fs::create_dir(dir.path().join("i18n")).unwrap();
        fs::write(
            dir.path().join("createStar.py"),
            "import os\nname = tr('Create star')\n",
        )
        .unwrap();

        let verifier = HintVerifier::new(&dir.path().join("i18n").join("app_zh.ts"));
        let msg = message("Create star", "../createStar.py", 2);

        let hints = verifier.verify(&msg);
        assert_eq!(hints.len(), 1);
        assert_eq!(hints[0].status, HintStatus::Verified);
    }

    #[test]
    fn test_drifted_hint_reports_actual_line() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join("createStar.py"),
            "# moved down\n\n\nname = tr('Create star')\n",
        )
        .unwrap();

        let verifier = HintVerifier::new(&dir.path().join("app_zh.ts"));
        let msg = message("Create star", "createStar.py", 1);

        let hints = verifier.verify(&msg);
        assert_eq!(hints[0].status, HintStatus::Drifted { actual_line: 4 });
    }

    #[test]
    fn test_stale_hint() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("createStar.py"), "name = tr('Renamed')\n").unwrap();

        let verifier = HintVerifier::new(&dir.path().join("app_zh.ts"));
        let msg = message("Create star", "createStar.py", 1);

        let hints = verifier.verify(&msg);
        assert_eq!(hints[0].status, HintStatus::Stale);
    }

    #[test]
    fn test_missing_file() {
        let dir = tempdir().unwrap();
        let verifier = HintVerifier::new(&dir.path().join("app_zh.ts"));
        let msg = message("Create star", "gone.py", 1);

        let hints = verifier.verify(&msg);
        assert_eq!(hints[0].status, HintStatus::FileMissing);
    }

    #[test]
    fn test_escaped_ampersand_in_ui_file() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join("settings.ui"),
            "<property><string>Save &amp; close</string></property>\n",
        )
        .unwrap();

        let verifier = HintVerifier::new(&dir.path().join("app_zh.ts"));
        let msg = message("Save & close", "settings.ui", 1);

        let hints = verifier.verify(&msg);
        assert_eq!(hints[0].status, HintStatus::Verified);
    }

    #[test]
    fn test_escaped_apostrophe_in_python_file() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join("warnings.py"),
            "msg = tr('Don\\'t panic')\n",
        )
        .unwrap();

        let verifier = HintVerifier::new(&dir.path().join("app_zh.ts"));
        let msg = message("Don't panic", "warnings.py", 1);

        let hints = verifier.verify(&msg);
        assert_eq!(hints[0].status, HintStatus::Verified);
    }

    #[test]
    fn test_no_hints() {
        let dir = tempdir().unwrap();
        let verifier = HintVerifier::new(&dir.path().join("app_zh.ts"));
        let msg = Message::unfinished("Create star", Vec::new());

        assert!(verifier.verify(&msg).is_empty());
    }
}
