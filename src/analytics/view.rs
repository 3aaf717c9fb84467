// Copyright (c) 2024-2027 Nervosys LLC
// SPDX-License-Identifier: AGPL-3.0-only
//! Derived page view
//!
//! Normalizes raw [`PageRecord`]s into the read-only view every metric
//! group consumes: parsed timestamps, resolved names, calendar keys,
//! staleness buckets, and the abandoned/single-owner/template flags.
//! Caller-owned records are never mutated.

use chrono::{DateTime, Datelike, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use crate::config::AnalyticsConfig;
use crate::models::{PageRecord, UserDirectory};

/// Staleness bucket, ordered from most to least recently edited.
///
/// The upper three buckets sit below the configured stale cut; `VeryStale`
/// starts at `stale_threshold_days` and `Dead` at
/// `very_stale_threshold_days`, so the coarse stale aggregate is exactly
/// `VeryStale + Dead`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StalenessBucket {
    Active,
    Fresh,
    Aging,
    Stale,
    VeryStale,
    Dead,
}

impl StalenessBucket {
    pub const ALL: [StalenessBucket; 6] = [
        StalenessBucket::Active,
        StalenessBucket::Fresh,
        StalenessBucket::Aging,
        StalenessBucket::Stale,
        StalenessBucket::VeryStale,
        StalenessBucket::Dead,
    ];

    /// Classify days-since-last-edit into a bucket. Ranges are half-open;
    /// a page exactly at the stale cut lands in `VeryStale`.
    pub fn classify(days: i64, config: &AnalyticsConfig) -> Self {
        if days < config.active_bucket_days {
            StalenessBucket::Active
        } else if days < config.fresh_bucket_days {
            StalenessBucket::Fresh
        } else if days < config.aging_bucket_days {
            StalenessBucket::Aging
        } else if days < config.stale_threshold_days {
            StalenessBucket::Stale
        } else if days < config.very_stale_threshold_days {
            StalenessBucket::VeryStale
        } else {
            StalenessBucket::Dead
        }
    }

    /// Whether this bucket sits at or past the coarse stale cut.
    pub fn counts_as_stale(&self) -> bool {
        matches!(self, StalenessBucket::VeryStale | StalenessBucket::Dead)
    }

    /// Narrative label used in reports. The month phrasing matches the
    /// default thresholds.
    pub fn label(&self) -> &'static str {
        match self {
            StalenessBucket::Active => "Active (< 1 month)",
            StalenessBucket::Fresh => "Fresh (1-3 months)",
            StalenessBucket::Aging => "Aging (3-6 months)",
            StalenessBucket::Stale => "Stale (6-12 months)",
            StalenessBucket::VeryStale => "Very Stale (12-24 months)",
            StalenessBucket::Dead => "Dead (24+ months)",
        }
    }
}

// ============================================================================
// Template Detection
// ============================================================================

static DEFAULT_TEMPLATE_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    vec![
        // "Template" anywhere in the title
        Regex::new(r"(?i)\btemplate\b").unwrap(),
        // Bracketed placeholder tokens like "[Project Name]"
        Regex::new(r"\[[^\]]+\]\s*$").unwrap(),
    ]
});

/// Title-based template detection.
///
/// Heuristic by nature, so the pattern set is injectable: tests supply
/// deterministic fixtures and production can evolve the rules without
/// touching the engine.
#[derive(Debug, Clone)]
pub struct TemplateMatcher {
    patterns: Vec<Regex>,
}

impl TemplateMatcher {
    pub fn new(patterns: Vec<Regex>) -> Self {
        Self { patterns }
    }

    /// Matcher that never matches (for callers without titles).
    pub fn disabled() -> Self {
        Self { patterns: Vec::new() }
    }

    /// A page with no title is never a template.
    pub fn matches(&self, title: Option<&str>) -> bool {
        match title {
            Some(t) => self.patterns.iter().any(|p| p.is_match(t)),
            None => false,
        }
    }
}

impl Default for TemplateMatcher {
    fn default() -> Self {
        Self {
            patterns: DEFAULT_TEMPLATE_PATTERNS.clone(),
        }
    }
}

// ============================================================================
// Page View
// ============================================================================

/// Sentinel display name for a user id absent from the directory.
pub fn deleted_user_label(user_id: &str) -> String {
    let prefix: String = user_id.chars().take(8).collect();
    format!("Deleted User ({})", prefix)
}

/// Resolve a user id against the directory, falling back to the
/// deleted-user sentinel.
pub fn display_name(user_id: &str, users: &UserDirectory) -> String {
    users
        .get(user_id)
        .map(|u| u.name.clone())
        .unwrap_or_else(|| deleted_user_label(user_id))
}

/// Read-only derived view of one page.
#[derive(Debug, Clone)]
pub struct PageView {
    pub id: String,
    pub created_by: String,
    pub last_edited_by: String,
    pub creator_name: String,
    pub editor_name: String,
    /// Creator id does not resolve in the directory
    pub creator_deleted: bool,
    pub created: DateTime<Utc>,
    pub last_edited: DateTime<Utc>,
    pub created_year: i32,
    /// Calendar quarter key, e.g. "2024-Q3"
    pub created_quarter: String,
    /// Calendar month key, e.g. "2024-03"
    pub created_month: String,
    /// Whole days since the last edit, relative to the engine's `now`
    pub days_since_edit: i64,
    pub staleness: StalenessBucket,
    /// Never edited after creation (timestamps exactly equal)
    pub is_abandoned: bool,
    /// Creator and last editor are the same identity
    pub is_single_owner: bool,
    pub is_template: bool,
    pub archived: bool,
    pub title: Option<String>,
}

impl PageView {
    pub fn is_collaborated(&self) -> bool {
        !self.is_single_owner
    }
}

/// Output of normalization: the derived views plus the malformed-record
/// tally. Skipped records stay in `total` but carry no view.
#[derive(Debug, Clone)]
pub struct NormalizedPages {
    pub views: Vec<PageView>,
    pub total: usize,
    pub skipped: usize,
}

fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

fn quarter_key(dt: &DateTime<Utc>) -> String {
    format!("{}-Q{}", dt.year(), (dt.month() - 1) / 3 + 1)
}

fn month_key(dt: &DateTime<Utc>) -> String {
    format!("{}-{:02}", dt.year(), dt.month())
}

/// Build the derived view for every parseable record.
///
/// Records with unparsable timestamps are logged, counted, and excluded
/// from the views; the run never aborts for one bad record.
pub fn normalize(
    pages: &[PageRecord],
    users: &UserDirectory,
    matcher: &TemplateMatcher,
    config: &AnalyticsConfig,
    now: DateTime<Utc>,
) -> NormalizedPages {
    let mut views = Vec::with_capacity(pages.len());
    let mut skipped = 0usize;

    for record in pages {
        let created = parse_timestamp(&record.created_time);
        let last_edited = parse_timestamp(&record.last_edited_time);
        let (created, last_edited) = match (created, last_edited) {
            (Some(c), Some(e)) => (c, e),
            _ => {
                log::warn!(
                    "skipping page {} with unparsable timestamps ({:?} / {:?})",
                    record.id,
                    record.created_time,
                    record.last_edited_time
                );
                skipped += 1;
                continue;
            }
        };

        let days_since_edit = (now - last_edited).num_days().max(0);

        views.push(PageView {
            creator_name: display_name(&record.created_by, users),
            editor_name: display_name(&record.last_edited_by, users),
            creator_deleted: !users.contains_key(&record.created_by),
            created_year: created.year(),
            created_quarter: quarter_key(&created),
            created_month: month_key(&created),
            days_since_edit,
            staleness: StalenessBucket::classify(days_since_edit, config),
            is_abandoned: created == last_edited,
            is_single_owner: record.created_by == record.last_edited_by,
            is_template: matcher.matches(record.title.as_deref()),
            archived: record.archived,
            title: record.title.clone(),
            id: record.id.clone(),
            created_by: record.created_by.clone(),
            last_edited_by: record.last_edited_by.clone(),
            created,
            last_edited,
        });
    }

    NormalizedPages {
        views,
        total: pages.len(),
        skipped,
    }
}
