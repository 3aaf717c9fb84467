// Copyright (c) 2024-2026 Nervosys LLC
// SPDX-License-Identifier: AGPL-3.0-only
//! Fetch commands

use anyhow::Result;
use colored::*;

use crate::api::WorkspaceApiClient;
use crate::cache::{SnapshotCache, PAGES_CACHE, PAGES_CHECKPOINT_CACHE, USERS_CACHE};
use crate::config::AppConfig;

/// Fetch the user directory into the cache.
pub fn fetch_users(refresh: bool) -> Result<()> {
    let config = AppConfig::from_env()?;
    let cache = SnapshotCache::new(&config.cache_dir);

    if !refresh && cache.contains(USERS_CACHE) {
        println!(
            "{} User directory already cached; use {} to refetch",
            "[i]".blue(),
            "--refresh".cyan()
        );
        return Ok(());
    }

    let client = WorkspaceApiClient::new(&config)?;
    let users = client.list_users()?;
    cache.store(USERS_CACHE, &users)?;
    println!("{} Cached {} users", "[+]".green(), users.len());
    Ok(())
}

/// Fetch every workspace page into the cache.
///
/// Partial progress is checkpointed so an interrupted fetch leaves a
/// usable snapshot behind.
pub fn fetch_pages(refresh: bool) -> Result<()> {
    let config = AppConfig::from_env()?;
    let cache = SnapshotCache::new(&config.cache_dir);

    if !refresh && cache.contains(PAGES_CACHE) {
        println!(
            "{} Page snapshot already cached; use {} to refetch",
            "[i]".blue(),
            "--refresh".cyan()
        );
        return Ok(());
    }

    let client = WorkspaceApiClient::new(&config)?;
    let pages = client.search_pages(|partial| {
        if let Err(e) = cache.store(PAGES_CHECKPOINT_CACHE, &partial) {
            log::warn!("checkpoint write failed: {}", e);
        } else {
            log::info!("checkpoint: {} pages", partial.len());
        }
    })?;

    cache.store(PAGES_CACHE, &pages)?;
    cache.remove(PAGES_CHECKPOINT_CACHE)?;
    println!("{} Cached {} pages", "[+]".green(), pages.len());
    Ok(())
}

/// Fetch users and pages.
pub fn fetch_all(refresh: bool) -> Result<()> {
    fetch_users(refresh)?;
    fetch_pages(refresh)
}

/// Fetch a single page and print its metadata as JSON.
pub fn fetch_page(id: &str) -> Result<()> {
    let config = AppConfig::from_env()?;
    let client = WorkspaceApiClient::new(&config)?;
    let page = client.get_page(id)?;
    println!("{}", serde_json::to_string_pretty(&page)?);
    Ok(())
}
