// Copyright (c) 2024-2026 Nervosys LLC
// SPDX-License-Identifier: Apache-2.0
//! Cache commands

use anyhow::Result;
use colored::*;
use tabled::{settings::Style as TableStyle, Table, Tabled};

use crate::cache::SnapshotCache;
use crate::config::AppConfig;

#[derive(Tabled)]
struct CacheRow {
    #[tabled(rename = "Entry")]
    name: String,
    #[tabled(rename = "Size")]
    size: String,
    #[tabled(rename = "Modified (UTC)")]
    modified: String,
}

fn human_size(bytes: u64) -> String {
    if bytes >= 1024 * 1024 {
        format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
    } else if bytes >= 1024 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else {
        format!("{} B", bytes)
    }
}

/// List cached snapshots.
pub fn cache_status() -> Result<()> {
    let config = AppConfig::from_env()?;
    let cache = SnapshotCache::new(&config.cache_dir);
    let entries = cache.entries()?;

    println!(
        "\n{} Cache directory: {}",
        "[*]".blue(),
        cache.dir().display().to_string().cyan()
    );

    if entries.is_empty() {
        println!("{} Cache is empty; run {} first", "[!]".yellow(), "wui fetch all".cyan());
        return Ok(());
    }

    let rows: Vec<CacheRow> = entries
        .iter()
        .map(|e| CacheRow {
            name: e.name.clone(),
            size: human_size(e.size_bytes),
            modified: e
                .modified
                .map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string())
                .unwrap_or_else(|| "-".to_string()),
        })
        .collect();
    println!("{}", Table::new(rows).with(TableStyle::rounded()));
    Ok(())
}

/// Delete every cached snapshot.
pub fn cache_clear() -> Result<()> {
    let config = AppConfig::from_env()?;
    let cache = SnapshotCache::new(&config.cache_dir);
    let removed = cache.clear()?;
    println!("{} Removed {} cached entries", "[+]".green(), removed);
    Ok(())
}
