// Copyright (c) 2024-2026 Nervosys LLC
// SPDX-License-Identifier: Apache-2.0
//! Workspace export scanning
//!
//! Walks an exported workspace tree and recovers page ids from `.md`
//! filenames, which carry a 32-hex-character page id suffix. Directories
//! holding a CSV alongside `.md` entries are database exports.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::error::{Result, WuiError};

static UUID_HEX_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"([0-9a-f]{32})").unwrap());

/// Hyphenate a 32-char hex page id into canonical 8-4-4-4-12 form.
///
/// Returns `InvalidPageId` for anything that is not exactly 32 hex chars.
pub fn format_page_id(hex: &str) -> Result<String> {
    if hex.len() != 32 || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(WuiError::InvalidPageId(hex.to_string()));
    }
    Ok(format!(
        "{}-{}-{}-{}-{}",
        &hex[0..8],
        &hex[8..12],
        &hex[12..16],
        &hex[16..20],
        &hex[20..32]
    ))
}

/// One page recovered from the export tree.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExportedPage {
    /// Hyphenated page id
    pub id: String,
    /// Filename with the id stripped
    pub title: String,
    /// Path relative to the export root
    pub path: String,
    pub file_size_kb: f64,
}

/// One database folder detected in the export.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExportedDatabase {
    /// Folder name with the id stripped
    pub name: String,
    /// Folder path relative to the export root
    pub path: String,
    /// Number of `.md` entries directly inside the folder
    pub entries: usize,
    /// The CSV file that marked the folder as a database
    pub csv_path: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExportSummary {
    pub total_pages: usize,
    pub total_databases: usize,
    pub export_size_mb: f64,
    pub export_dir: String,
}

pub struct ExportExtractor {
    export_dir: PathBuf,
}

impl ExportExtractor {
    pub fn new(export_dir: impl Into<PathBuf>) -> Self {
        Self {
            export_dir: export_dir.into(),
        }
    }

    fn check_dir(&self) -> Result<()> {
        if !self.export_dir.is_dir() {
            return Err(WuiError::ExportDirNotFound(
                self.export_dir.display().to_string(),
            ));
        }
        Ok(())
    }

    fn relative(&self, path: &Path) -> String {
        path.strip_prefix(&self.export_dir)
            .unwrap_or(path)
            .display()
            .to_string()
    }

    /// Scan the export tree for `.md` files carrying a page id.
    ///
    /// Files without an id in the name (a top-level `README.md`, say) are
    /// skipped. Results are sorted by relative path so repeated scans of
    /// the same tree are identical.
    pub fn extract_page_ids(&self) -> Result<Vec<ExportedPage>> {
        self.check_dir()?;

        let mut pages = Vec::new();
        for entry in WalkDir::new(&self.export_dir)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
        {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("md") {
                continue;
            }
            let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            let Some(hex) = UUID_HEX_RE
                .captures(&stem.to_ascii_lowercase())
                .map(|c| c[1].to_string())
            else {
                continue;
            };

            let title = stem
                .to_ascii_lowercase()
                .find(&hex)
                .map(|pos| {
                    let mut t = String::new();
                    t.push_str(&stem[..pos]);
                    t.push_str(&stem[pos + hex.len()..]);
                    t.trim().to_string()
                })
                .unwrap_or_default();

            let size = entry.metadata().map(|m| m.len()).unwrap_or(0);
            pages.push(ExportedPage {
                id: format_page_id(&hex)?,
                title,
                path: self.relative(path),
                file_size_kb: (size as f64 / 1024.0 * 100.0).round() / 100.0,
            });
        }

        pages.sort_by(|a, b| a.path.cmp(&b.path));
        log::info!(
            "export scan: {} pages under {}",
            pages.len(),
            self.export_dir.display()
        );
        Ok(pages)
    }

    /// Detect database folders: any directory with a CSV file in it.
    pub fn detect_databases(&self) -> Result<Vec<ExportedDatabase>> {
        self.check_dir()?;

        let mut databases = Vec::new();
        for entry in WalkDir::new(&self.export_dir)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
        {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("csv") {
                continue;
            }
            let Some(folder) = path.parent() else {
                continue;
            };
            let folder_name = folder
                .file_name()
                .and_then(|n| n.to_str())
                .unwrap_or_default();

            let name = match UUID_HEX_RE.captures(&folder_name.to_ascii_lowercase()) {
                Some(caps) => {
                    let hex = &caps[1];
                    folder_name
                        .to_ascii_lowercase()
                        .find(hex)
                        .map(|pos| {
                            let mut t = String::new();
                            t.push_str(&folder_name[..pos]);
                            t.push_str(&folder_name[pos + hex.len()..]);
                            t.trim().to_string()
                        })
                        .unwrap_or_else(|| folder_name.to_string())
                }
                None => folder_name.to_string(),
            };

            let entries = std::fs::read_dir(folder)?
                .filter_map(|e| e.ok())
                .filter(|e| {
                    e.path().extension().and_then(|x| x.to_str()) == Some("md")
                })
                .count();

            databases.push(ExportedDatabase {
                name,
                path: self.relative(folder),
                entries,
                csv_path: self.relative(path),
            });
        }

        databases.sort_by(|a, b| a.csv_path.cmp(&b.csv_path));
        Ok(databases)
    }

    /// Whole-export summary: page count, database count, total size.
    pub fn summary(&self) -> Result<ExportSummary> {
        let pages = self.extract_page_ids()?;
        let databases = self.detect_databases()?;

        let total_bytes: u64 = WalkDir::new(&self.export_dir)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
            .filter_map(|e| e.metadata().ok())
            .map(|m| m.len())
            .sum();

        Ok(ExportSummary {
            total_pages: pages.len(),
            total_databases: databases.len(),
            export_size_mb: (total_bytes as f64 / (1024.0 * 1024.0) * 100.0).round() / 100.0,
            export_dir: self.export_dir.display().to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    const HEX_A: &str = "0123456789abcdef0123456789abcdef";
    const HEX_B: &str = "fedcba9876543210fedcba9876543210";

    fn make_export() -> TempDir {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join(format!("Roadmap {}.md", HEX_A)),
            "# Roadmap",
        )
        .unwrap();
        fs::write(dir.path().join("README.md"), "no id here").unwrap();

        let db = dir.path().join(format!("Tasks {}", HEX_B));
        fs::create_dir(&db).unwrap();
        fs::write(db.join(format!("Task one {}.md", HEX_B)), "task").unwrap();
        fs::write(db.join(format!("Tasks {}.csv", HEX_B)), "Name\n").unwrap();
        dir
    }

    #[test]
    fn test_format_page_id() {
        assert_eq!(
            format_page_id(HEX_A).unwrap(),
            "01234567-89ab-cdef-0123-456789abcdef"
        );
        assert!(format_page_id("too-short").is_err());
        assert!(format_page_id("zz23456789abcdef0123456789abcdef").is_err());
    }

    #[test]
    fn test_extract_skips_files_without_page_id() {
        let dir = make_export();
        let pages = ExportExtractor::new(dir.path()).extract_page_ids().unwrap();
        assert_eq!(pages.len(), 2);
        assert!(pages.iter().all(|p| !p.path.contains("README")));
    }

    #[test]
    fn test_extract_strips_id_from_title() {
        let dir = make_export();
        let pages = ExportExtractor::new(dir.path()).extract_page_ids().unwrap();
        let roadmap = pages.iter().find(|p| p.title == "Roadmap").unwrap();
        assert_eq!(roadmap.id, "01234567-89ab-cdef-0123-456789abcdef");
    }

    #[test]
    fn test_detect_databases_via_csv() {
        let dir = make_export();
        let dbs = ExportExtractor::new(dir.path()).detect_databases().unwrap();
        assert_eq!(dbs.len(), 1);
        assert_eq!(dbs[0].name, "Tasks");
        assert_eq!(dbs[0].entries, 1);
    }

    #[test]
    fn test_missing_export_dir_is_an_error() {
        let extractor = ExportExtractor::new("/does/not/exist");
        assert!(matches!(
            extractor.extract_page_ids(),
            Err(WuiError::ExportDirNotFound(_))
        ));
    }

    #[test]
    fn test_summary_counts() {
        let dir = make_export();
        let summary = ExportExtractor::new(dir.path()).summary().unwrap();
        assert_eq!(summary.total_pages, 2);
        assert_eq!(summary.total_databases, 1);
    }
}
