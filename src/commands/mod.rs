// Copyright (c) 2024-2026 Nervosys LLC
// SPDX-License-Identifier: Apache-2.0
//! Command implementations

mod analyze;
mod cache_cmds;
mod config_cmds;
mod export_cmds;
mod fetch;

pub use analyze::*;
pub use cache_cmds::*;
pub use config_cmds::*;
pub use export_cmds::*;
pub use fetch::*;

use anyhow::Result;

use crate::api::WorkspaceApiClient;
use crate::cache::{SnapshotCache, PAGES_CACHE, PAGES_CHECKPOINT_CACHE, USERS_CACHE};
use crate::config::AppConfig;
use crate::models::{PageRecord, UserDirectory};

/// Load the workspace snapshot, cache-first.
///
/// With `refresh`, the cache is bypassed and refetched. With `offline`,
/// a cold cache is an error rather than a network call.
pub(crate) fn load_snapshot(
    config: &AppConfig,
    offline: bool,
    refresh: bool,
) -> Result<(Vec<PageRecord>, UserDirectory)> {
    let cache = SnapshotCache::new(&config.cache_dir);

    if !refresh && cache.contains(USERS_CACHE) && cache.contains(PAGES_CACHE) {
        let users: UserDirectory = cache.load(USERS_CACHE)?;
        let pages: Vec<PageRecord> = cache.load(PAGES_CACHE)?;
        log::info!(
            "loaded snapshot from cache: {} pages, {} users",
            pages.len(),
            users.len()
        );
        return Ok((pages, users));
    }

    if offline {
        let missing = if cache.contains(USERS_CACHE) {
            PAGES_CACHE
        } else {
            USERS_CACHE
        };
        return Err(crate::error::WuiError::CacheMiss(missing.to_string()).into());
    }

    let client = WorkspaceApiClient::new(config)?;
    let users = client.list_users()?;
    let pages = client.search_pages(|partial| {
        if let Err(e) = cache.store(PAGES_CHECKPOINT_CACHE, &partial) {
            log::warn!("checkpoint write failed: {}", e);
        }
    })?;

    cache.store(USERS_CACHE, &users)?;
    cache.store(PAGES_CACHE, &pages)?;
    cache.remove(PAGES_CHECKPOINT_CACHE)?;
    Ok((pages, users))
}
