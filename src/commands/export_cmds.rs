// Copyright (c) 2024-2026 Nervosys LLC
// SPDX-License-Identifier: Apache-2.0
//! Export inspection commands

use anyhow::Result;
use colored::*;
use std::path::PathBuf;
use tabled::{settings::Style as TableStyle, Table, Tabled};

use crate::config::AppConfig;
use crate::export::ExportExtractor;

#[derive(Tabled)]
struct PageRow {
    #[tabled(rename = "Title")]
    title: String,
    #[tabled(rename = "Page Id")]
    id: String,
    #[tabled(rename = "Size (KB)")]
    size_kb: String,
}

#[derive(Tabled)]
struct DatabaseRow {
    #[tabled(rename = "Database")]
    name: String,
    #[tabled(rename = "Entries")]
    entries: usize,
    #[tabled(rename = "Path")]
    path: String,
}

fn extractor_for(dir: Option<PathBuf>) -> Result<ExportExtractor> {
    let dir = match dir {
        Some(d) => d,
        None => AppConfig::from_env()?.export_dir,
    };
    Ok(ExportExtractor::new(dir))
}

/// List pages recovered from the export tree.
pub fn export_scan(dir: Option<PathBuf>, json: bool) -> Result<()> {
    let pages = extractor_for(dir)?.extract_page_ids()?;

    if json {
        println!("{}", serde_json::to_string_pretty(&pages)?);
        return Ok(());
    }

    if pages.is_empty() {
        println!("{} No pages with ids found in export", "[!]".yellow());
        return Ok(());
    }

    let rows: Vec<PageRow> = pages
        .iter()
        .map(|p| PageRow {
            title: if p.title.is_empty() {
                "(untitled)".to_string()
            } else {
                p.title.clone()
            },
            id: p.id.clone(),
            size_kb: format!("{:.2}", p.file_size_kb),
        })
        .collect();
    println!("{}", Table::new(rows).with(TableStyle::rounded()));
    println!("{} {} pages", "[+]".green(), pages.len());
    Ok(())
}

/// List database folders detected in the export tree.
pub fn export_databases(dir: Option<PathBuf>, json: bool) -> Result<()> {
    let databases = extractor_for(dir)?.detect_databases()?;

    if json {
        println!("{}", serde_json::to_string_pretty(&databases)?);
        return Ok(());
    }

    if databases.is_empty() {
        println!("{} No database folders found in export", "[!]".yellow());
        return Ok(());
    }

    let rows: Vec<DatabaseRow> = databases
        .iter()
        .map(|d| DatabaseRow {
            name: if d.name.is_empty() {
                "(unnamed)".to_string()
            } else {
                d.name.clone()
            },
            entries: d.entries,
            path: d.path.clone(),
        })
        .collect();
    println!("{}", Table::new(rows).with(TableStyle::rounded()));
    println!("{} {} databases", "[+]".green(), databases.len());
    Ok(())
}

/// Print export summary statistics.
pub fn export_summary(dir: Option<PathBuf>) -> Result<()> {
    let summary = extractor_for(dir)?.summary()?;

    println!("\n{} Export Summary", "[*]".blue());
    println!("{}", "=".repeat(50));
    println!("  Directory:  {}", summary.export_dir.cyan());
    println!("  Pages:      {}", summary.total_pages.to_string().bold());
    println!("  Databases:  {}", summary.total_databases);
    println!("  Size:       {:.2} MB", summary.export_size_mb);
    Ok(())
}
