//! Integration tests for export scanning
//!
//! Builds a nested export tree the way the workspace export ships it:
//! pages at several depths, database folders with CSVs, and stray files
//! without page ids.

use std::fs;
use tempfile::TempDir;

use wui::export::{format_page_id, ExportExtractor};

const HEX_ROOT: &str = "aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa";
const HEX_CHILD: &str = "bbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbb";
const HEX_DB: &str = "cccccccccccccccccccccccccccccccc";
const HEX_ROW: &str = "dddddddddddddddddddddddddddddddd";

fn build_export() -> TempDir {
    let dir = TempDir::new().unwrap();
    let root = dir.path();

    fs::write(root.join(format!("Home {}.md", HEX_ROOT)), "# Home").unwrap();

    let section = root.join(format!("Home {}", HEX_ROOT));
    fs::create_dir(&section).unwrap();
    fs::write(
        section.join(format!("Meeting Notes {}.md", HEX_CHILD)),
        "# Notes",
    )
    .unwrap();

    let db = section.join(format!("Projects {}", HEX_DB));
    fs::create_dir(&db).unwrap();
    fs::write(db.join(format!("Projects {}.csv", HEX_DB)), "Name,Status\n").unwrap();
    fs::write(db.join(format!("Apollo {}.md", HEX_ROW)), "# Apollo").unwrap();

    fs::write(root.join("export-log.txt"), "not a page").unwrap();
    fs::write(root.join("README.md"), "no id").unwrap();
    dir
}

#[test]
fn test_scan_recurses_into_nested_folders() {
    let dir = build_export();
    let pages = ExportExtractor::new(dir.path()).extract_page_ids().unwrap();
    assert_eq!(pages.len(), 3);

    let titles: Vec<&str> = pages.iter().map(|p| p.title.as_str()).collect();
    assert!(titles.contains(&"Home"));
    assert!(titles.contains(&"Meeting Notes"));
    assert!(titles.contains(&"Apollo"));
}

#[test]
fn test_scan_results_are_sorted_by_path() {
    let dir = build_export();
    let pages = ExportExtractor::new(dir.path()).extract_page_ids().unwrap();
    let paths: Vec<&str> = pages.iter().map(|p| p.path.as_str()).collect();
    let mut sorted = paths.clone();
    sorted.sort();
    assert_eq!(paths, sorted);
}

#[test]
fn test_page_ids_are_hyphenated() {
    let dir = build_export();
    let pages = ExportExtractor::new(dir.path()).extract_page_ids().unwrap();
    let expected = format_page_id(HEX_CHILD).unwrap();
    assert!(pages.iter().any(|p| p.id == expected));
    assert!(pages.iter().all(|p| p.id.len() == 36));
}

#[test]
fn test_database_detection_strips_id_from_name() {
    let dir = build_export();
    let dbs = ExportExtractor::new(dir.path()).detect_databases().unwrap();
    assert_eq!(dbs.len(), 1);
    assert_eq!(dbs[0].name, "Projects");
    assert_eq!(dbs[0].entries, 1); // only the Apollo row, not nested files
}

#[test]
fn test_summary_spans_the_whole_tree() {
    let dir = build_export();
    let summary = ExportExtractor::new(dir.path()).summary().unwrap();
    assert_eq!(summary.total_pages, 3);
    assert_eq!(summary.total_databases, 1);
    assert!(summary.export_size_mb >= 0.0);
}
