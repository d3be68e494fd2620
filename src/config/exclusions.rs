use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectType {
    /// A QGIS plugin tree (metadata.txt at the root)
    QgisPlugin,
    /// A Qt project (.pro file at the root)
    QtApp,
    /// A plain Python tree
    Python,
    Generic,
}

pub fn detect_project_type(base_dir: &Path) -> ProjectType {
    if base_dir.join("metadata.txt").exists() {
        ProjectType::QgisPlugin
    } else if has_pro_file(base_dir) {
        ProjectType::QtApp
    } else if base_dir.join("requirements.txt").exists()
        || base_dir.join("pyproject.toml").exists()
        || base_dir.join("setup.py").exists()
    {
        ProjectType::Python
    } else {
        ProjectType::Generic
    }
}

fn has_pro_file(base_dir: &Path) -> bool {
    std::fs::read_dir(base_dir)
        .map(|entries| {
            entries
                .flatten()
                .any(|e| e.path().extension().is_some_and(|ext| ext == "pro"))
        })
        .unwrap_or(false)
}

pub fn get_default_exclusions(project_type: ProjectType) -> Vec<&'static str> {
    let mut exclusions = vec![".git", ".svn", ".hg", ".idea", ".vscode", ".DS_Store"];

    match project_type {
        ProjectType::QgisPlugin => {
            // i18n holds the catalogs themselves; doc/help trees hold built output
            exclusions.extend_from_slice(&["__pycache__", "i18n", "doc", "help", "dist"]);
        }
        ProjectType::QtApp => {
            exclusions.extend_from_slice(&["build", "debug", "release", "translations"]);
        }
        ProjectType::Python => {
            exclusions.extend_from_slice(&[
                "venv",
                ".venv",
                "env",
                "__pycache__",
                ".pytest_cache",
                ".mypy_cache",
            ]);
        }
        ProjectType::Generic => {
            exclusions.extend_from_slice(&["__pycache__", "build", "dist", "venv"]);
        }
    }

    exclusions
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_detect_qgis_plugin() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("metadata.txt"), "[general]\nname=Shape Tools").unwrap();
        assert_eq!(detect_project_type(dir.path()), ProjectType::QgisPlugin);
    }

    #[test]
    fn test_detect_qt_app() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("app.pro"), "TRANSLATIONS = app_zh.ts").unwrap();
        assert_eq!(detect_project_type(dir.path()), ProjectType::QtApp);
    }

    #[test]
    fn test_detect_generic() {
        let dir = tempdir().unwrap();
        assert_eq!(detect_project_type(dir.path()), ProjectType::Generic);
    }

    #[test]
    fn test_qgis_exclusions_skip_catalog_dir() {
        let exclusions = get_default_exclusions(ProjectType::QgisPlugin);
        assert!(exclusions.contains(&"i18n"));
        assert!(exclusions.contains(&"__pycache__"));
        assert!(exclusions.contains(&".git"));
    }
}
