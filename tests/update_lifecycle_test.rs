//! End-to-end catalog lifecycle: extract from a plugin-like tree, translate,
//! change the sources, update, and check what survives each regeneration.

use std::fs;
use std::path::Path;

use tempfile::tempdir;
use tsq::parse::{TsReader, TsWriter};
use tsq::{Catalog, TranslationStatus, UpdateQuery};

fn scan_quiet(dir: &Path) -> Vec<tsq::SourceString> {
    tsq::run_scan(dir, &[], false, true, true).unwrap()
}

fn update_quiet(catalog_path: &Path) -> tsq::UpdateResult {
    tsq::run_update(
        UpdateQuery::new(catalog_path.to_path_buf())
            .with_quiet(true)
            .with_no_cache(true),
    )
    .unwrap()
}

#[test]
fn test_extract_then_translate_then_update() {
    let dir = tempdir().unwrap();
    fs::write(
        dir.path().join("createDonut.py"),
        "label = tr('Create donut')\nerror = tr('Invalid radius')\n",
    )
    .unwrap();
    fs::write(
        dir.path().join("settings.ui"),
        r#"<ui><widget class="QDialog" name="SettingsDialog">
<property name="windowTitle"><string>Settings</string></property>
</widget></ui>"#,
    )
    .unwrap();

    // Extract a fresh catalog
    let catalog_path = dir.path().join("app_zh.ts");
    let strings = scan_quiet(dir.path());
    let mut catalog = Catalog::new("zh");
    tsq::merge(&mut catalog, &strings, false);
    TsWriter::write_file(&catalog, &catalog_path).unwrap();

    let catalog = TsReader::parse_file(&catalog_path).unwrap();
    assert_eq!(catalog.len(), 3);
    assert!(catalog
        .iter()
        .all(|(_, m)| m.status == TranslationStatus::Unfinished));

    // Translate one entry by hand
    let mut catalog = catalog;
    let msg = catalog
        .context_mut("@default")
        .unwrap()
        .find_mut("Create donut")
        .unwrap();
    msg.translation = "圆环".to_string();
    msg.status = TranslationStatus::Finished;
    TsWriter::write_file(&catalog, &catalog_path).unwrap();

    // Source changes: one string renamed, one untouched
    fs::write(
        dir.path().join("createDonut.py"),
        "label = tr('Create donut')\nerror = tr('Radius must be positive')\n",
    )
    .unwrap();

    let result = update_quiet(&catalog_path);
    assert_eq!(result.report.added, 1);
    assert_eq!(result.report.obsoleted, 1);
    assert_eq!(result.report.retained, 2);

    // The hand-made translation survives the regeneration
    let donut = result.catalog.lookup("@default", "Create donut").unwrap();
    assert_eq!(donut.translation, "圆环");
    assert_eq!(donut.status, TranslationStatus::Finished);

    let old = result.catalog.lookup("@default", "Invalid radius").unwrap();
    assert_eq!(old.status, TranslationStatus::Obsolete);
}

#[test]
fn test_revived_string_recovers_translation() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("app.py"), "x = tr('Create star')\n").unwrap();

    let catalog_path = dir.path().join("app_zh.ts");
    fs::write(
        &catalog_path,
        r#"<?xml version="1.0" encoding="utf-8"?>
<!DOCTYPE TS>
<TS version="2.0" language="zh">
<context>
    <name>@default</name>
    <message>
        <source>Create star</source>
        <translation type="obsolete">星形</translation>
    </message>
</context>
</TS>
"#,
    )
    .unwrap();

    let result = update_quiet(&catalog_path);
    assert_eq!(result.report.revived, 1);

    // The old translation comes back as finished, not unfinished
    let star = result.catalog.lookup("@default", "Create star").unwrap();
    assert_eq!(star.status, TranslationStatus::Finished);
    assert_eq!(star.translation, "星形");
    assert_eq!(star.locations.len(), 1);
}

#[test]
fn test_update_twice_is_stable() {
    let dir = tempdir().unwrap();
    fs::write(
        dir.path().join("app.py"),
        "a = tr('Create ellipse')\nb = tr('Create gear')\n",
    )
    .unwrap();

    let catalog_path = dir.path().join("app_de.ts");
    let strings = scan_quiet(dir.path());
    let mut catalog = Catalog::new("de");
    tsq::merge(&mut catalog, &strings, false);
    TsWriter::write_file(&catalog, &catalog_path).unwrap();

    let first = update_quiet(&catalog_path);
    assert!(!first.report.changed());

    TsWriter::write_file(&first.catalog, &catalog_path).unwrap();
    let second = update_quiet(&catalog_path);
    assert!(!second.report.changed());
    assert_eq!(first.catalog, second.catalog);
}

#[test]
fn test_catalog_in_i18n_subdir_gets_parent_relative_hints() {
    let dir = tempdir().unwrap();
    fs::create_dir(dir.path().join("i18n")).unwrap();
    fs::write(dir.path().join("createArc.py"), "x = tr('Create arc wedge')\n").unwrap();

    let catalog_path = dir.path().join("i18n").join("app_zh.ts");
    fs::write(
        &catalog_path,
        r#"<?xml version="1.0" encoding="utf-8"?>
<!DOCTYPE TS>
<TS version="2.0" language="zh">
<context>
    <name>@default</name>
</context>
</TS>
"#,
    )
    .unwrap();

    let result = tsq::run_update(
        UpdateQuery::new(catalog_path)
            .with_source_dir(dir.path().to_path_buf())
            .with_quiet(true)
            .with_no_cache(true),
    )
    .unwrap();

    let arc = result.catalog.lookup("@default", "Create arc wedge").unwrap();
    assert_eq!(
        arc.locations[0].filename,
        std::path::PathBuf::from("../createArc.py")
    );
}

#[test]
fn test_written_catalog_round_trips() {
    let dir = tempdir().unwrap();
    fs::write(
        dir.path().join("app.py"),
        "a = tr('Azimuth ')\nb = tr('Save & close')\n",
    )
    .unwrap();

    let strings = scan_quiet(dir.path());
    let mut catalog = Catalog::new("zh");
    catalog.source_language = "en".to_string();
    tsq::merge(&mut catalog, &strings, false);

    let written = TsWriter::to_string(&catalog).unwrap();
    let reparsed = TsReader::parse_str(&written).unwrap();

    assert_eq!(catalog, reparsed);
    // Trailing whitespace and XML metacharacters survive the round trip
    assert!(reparsed.lookup("@default", "Azimuth ").is_some());
    assert!(reparsed.lookup("@default", "Save & close").is_some());
}
