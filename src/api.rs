// Copyright (c) 2024-2026 Nervosys LLC
// SPDX-License-Identifier: AGPL-3.0-only
//! Workspace API client
//!
//! Blocking HTTP client for the workspace metadata API: user directory
//! listing, full-workspace page search, and single-page retrieval. Every
//! request is throttled to the configured rate limit; list endpoints walk
//! cursor pagination to exhaustion.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use std::thread;
use std::time::Duration;

use crate::config::AppConfig;
use crate::error::{Result, WuiError};
use crate::models::{PageRecord, RawPage, RawUser, UserDirectory, UserInfo};

/// API schema version sent with every request.
const API_VERSION: &str = "2022-06-28";

/// Maximum page size the list endpoints accept.
const PAGE_SIZE: usize = 100;

/// Long page fetches invoke the checkpoint callback this often.
pub const CHECKPOINT_INTERVAL: usize = 1000;

static PAGE_ID_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9a-f]{8}-?[0-9a-f]{4}-?[0-9a-f]{4}-?[0-9a-f]{4}-?[0-9a-f]{12}$").unwrap());

/// Cursor-paginated list envelope shared by every list endpoint.
#[derive(Debug, Deserialize)]
struct Paginated<T> {
    results: Vec<T>,
    #[serde(default)]
    has_more: bool,
    #[serde(default)]
    next_cursor: Option<String>,
}

pub struct WorkspaceApiClient {
    client: reqwest::blocking::Client,
    base_url: String,
    token: String,
    throttle_delay: Duration,
}

impl WorkspaceApiClient {
    pub fn new(config: &AppConfig) -> Result<Self> {
        let token = config.require_token()?.to_string();
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;
        let rps = config.requests_per_second.max(0.1);
        Ok(Self {
            client,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            token,
            throttle_delay: Duration::from_secs_f64(1.0 / rps),
        })
    }

    fn throttle(&self) {
        thread::sleep(self.throttle_delay);
    }

    fn check(&self, response: reqwest::blocking::Response) -> Result<reqwest::blocking::Response> {
        if response.status().is_success() {
            return Ok(response);
        }
        let status = response.status();
        let body = response.text().unwrap_or_default();
        Err(WuiError::ApiError(format!(
            "{} {}",
            status,
            body.chars().take(200).collect::<String>()
        )))
    }

    /// Fetch the complete user directory.
    pub fn list_users(&self) -> Result<UserDirectory> {
        let mut users = UserDirectory::new();
        let mut cursor: Option<String> = None;

        loop {
            let mut request = self
                .client
                .get(format!("{}/v1/users", self.base_url))
                .bearer_auth(&self.token)
                .header("Notion-Version", API_VERSION)
                .query(&[("page_size", PAGE_SIZE.to_string())]);
            if let Some(ref c) = cursor {
                request = request.query(&[("start_cursor", c.as_str())]);
            }

            let page: Paginated<RawUser> = self.check(request.send()?)?.json()?;
            for raw in page.results {
                let user = UserInfo::from(raw);
                users.insert(user.id.clone(), user);
            }
            log::debug!("user directory: {} users so far", users.len());

            if !page.has_more {
                break;
            }
            cursor = page.next_cursor;
            self.throttle();
        }

        log::info!("fetched {} users", users.len());
        Ok(users)
    }

    /// Search every page in the workspace.
    ///
    /// `on_checkpoint` fires with the accumulated records every
    /// [`CHECKPOINT_INTERVAL`] pages so long fetches can be resumed from a
    /// partial snapshot after an interruption.
    pub fn search_pages<F>(&self, mut on_checkpoint: F) -> Result<Vec<PageRecord>>
    where
        F: FnMut(&[PageRecord]),
    {
        let mut pages: Vec<PageRecord> = Vec::new();
        let mut cursor: Option<String> = None;
        let mut last_checkpoint = 0usize;

        loop {
            let mut body = serde_json::json!({
                "filter": {"property": "object", "value": "page"},
                "page_size": PAGE_SIZE,
            });
            if let Some(ref c) = cursor {
                body["start_cursor"] = serde_json::Value::String(c.clone());
            }

            let response = self
                .client
                .post(format!("{}/v1/search", self.base_url))
                .bearer_auth(&self.token)
                .header("Notion-Version", API_VERSION)
                .json(&body)
                .send()?;
            let batch: Paginated<RawPage> = self.check(response)?.json()?;

            pages.extend(batch.results.into_iter().map(PageRecord::from));
            log::debug!("page search: {} pages so far", pages.len());

            if pages.len() - last_checkpoint >= CHECKPOINT_INTERVAL {
                last_checkpoint = pages.len();
                on_checkpoint(&pages);
            }

            if !batch.has_more {
                break;
            }
            cursor = batch.next_cursor;
            self.throttle();
        }

        log::info!("found {} pages", pages.len());
        Ok(pages)
    }

    /// Retrieve full metadata for a single page.
    pub fn get_page(&self, page_id: &str) -> Result<PageRecord> {
        let normalized = page_id.to_ascii_lowercase();
        if !PAGE_ID_RE.is_match(&normalized) {
            return Err(WuiError::InvalidPageId(page_id.to_string()));
        }

        let response = self
            .client
            .get(format!("{}/v1/pages/{}", self.base_url, normalized))
            .bearer_auth(&self.token)
            .header("Notion-Version", API_VERSION)
            .send()?;
        let raw: RawPage = self.check(response)?.json()?;
        Ok(PageRecord::from(raw))
    }
}
