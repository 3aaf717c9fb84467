// Copyright (c) 2024-2026 Nervosys LLC
// SPDX-License-Identifier: Apache-2.0
//! Configuration value objects
//!
//! All tunables live in explicit structs passed into the engine and the
//! report builder. Nothing reads ambient globals after startup; the env is
//! consulted once in the `from_env` constructors.

use crate::error::{Result, WuiError};
use std::path::PathBuf;

/// Parse an env var into `T`, falling back to `default` when unset or empty.
fn env_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    match std::env::var(key) {
        Ok(v) if !v.trim().is_empty() => v.trim().parse().unwrap_or(default),
        _ => default,
    }
}

// ============================================================================
// Analytics Configuration
// ============================================================================

/// Thresholds consumed by the analytics engine.
///
/// Constructed once, validated fail-fast, then passed by reference into
/// [`crate::analytics::WorkspaceAnalytics`]. Invalid values are a caller
/// programming error and abort before any computation runs.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalyticsConfig {
    /// Pages not edited for this many days count as stale (coarse cut)
    pub stale_threshold_days: i64,
    /// Pages not edited for this many days count as very stale / dead
    pub very_stale_threshold_days: i64,
    /// Upper bound of the "Active" staleness bucket, in days
    pub active_bucket_days: i64,
    /// Upper bound of the "Fresh" staleness bucket, in days
    pub fresh_bucket_days: i64,
    /// Upper bound of the "Aging" staleness bucket, in days
    pub aging_bucket_days: i64,
    /// Pages/year at or above which a user is a power creator
    pub power_user_threshold: f64,
    /// Pages/year at or above which a user is an active creator
    pub active_user_threshold: f64,
    /// Pages/year at or above which a user is an occasional creator
    pub occasional_user_threshold: f64,
    /// Trailing window for the annualized creation rate, anchored at the
    /// newest page in the data set. `None` means lifetime totals.
    pub segmentation_window_days: Option<i64>,
    /// Seat price per user per month, in dollars
    pub monthly_cost_per_user: f64,
    /// Blended hourly value of contributor time, for ROI estimates
    pub blended_hourly_rate: f64,
    /// Assumed authoring time per page, in hours
    pub hours_per_page: f64,
    /// Multiplier on content value accounting for reuse of pages
    pub reuse_factor: f64,
    /// Count minimal creators toward wasted spend as well as non-creators
    pub include_minimal_in_waste: bool,
    /// How many users the top-creator and top-collaborator lists carry
    pub top_creators_limit: usize,
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            stale_threshold_days: 365,
            very_stale_threshold_days: 730,
            active_bucket_days: 30,
            fresh_bucket_days: 90,
            aging_bucket_days: 180,
            power_user_threshold: 100.0,
            active_user_threshold: 20.0,
            occasional_user_threshold: 5.0,
            segmentation_window_days: Some(365),
            monthly_cost_per_user: 12.0,
            blended_hourly_rate: 48.0,
            hours_per_page: 1.0,
            reuse_factor: 1.0,
            include_minimal_in_waste: false,
            top_creators_limit: 10,
        }
    }
}

impl AnalyticsConfig {
    /// Build a config from the environment, using defaults for unset vars.
    ///
    /// Variable names match the original deployment: `STALE_THRESHOLD_DAYS`,
    /// `VERY_STALE_THRESHOLD_DAYS`, `POWER_USER_THRESHOLD`,
    /// `ACTIVE_USER_THRESHOLD`, `OCCASIONAL_USER_THRESHOLD`,
    /// `MONTHLY_COST_PER_USER`, `BLENDED_HOURLY_RATE`.
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();
        let config = Self {
            stale_threshold_days: env_or("STALE_THRESHOLD_DAYS", defaults.stale_threshold_days),
            very_stale_threshold_days: env_or(
                "VERY_STALE_THRESHOLD_DAYS",
                defaults.very_stale_threshold_days,
            ),
            power_user_threshold: env_or("POWER_USER_THRESHOLD", defaults.power_user_threshold),
            active_user_threshold: env_or("ACTIVE_USER_THRESHOLD", defaults.active_user_threshold),
            occasional_user_threshold: env_or(
                "OCCASIONAL_USER_THRESHOLD",
                defaults.occasional_user_threshold,
            ),
            monthly_cost_per_user: env_or("MONTHLY_COST_PER_USER", defaults.monthly_cost_per_user),
            blended_hourly_rate: env_or("BLENDED_HOURLY_RATE", defaults.blended_hourly_rate),
            hours_per_page: env_or("HOURS_PER_PAGE", defaults.hours_per_page),
            ..defaults
        };
        config.validate()?;
        Ok(config)
    }

    /// Check threshold ordering and positivity.
    ///
    /// The fine staleness buckets and the coarse stale/very-stale cuts must
    /// form one strictly increasing ladder so the two views cannot drift.
    pub fn validate(&self) -> Result<()> {
        let mut errors = Vec::new();

        if self.active_bucket_days <= 0 {
            errors.push("active_bucket_days must be > 0".to_string());
        }
        let ladder = [
            ("active_bucket_days", self.active_bucket_days),
            ("fresh_bucket_days", self.fresh_bucket_days),
            ("aging_bucket_days", self.aging_bucket_days),
            ("stale_threshold_days", self.stale_threshold_days),
            ("very_stale_threshold_days", self.very_stale_threshold_days),
        ];
        for pair in ladder.windows(2) {
            let (lo_name, lo) = pair[0];
            let (hi_name, hi) = pair[1];
            if lo >= hi {
                errors.push(format!("{} must be < {} ({} >= {})", lo_name, hi_name, lo, hi));
            }
        }

        if self.occasional_user_threshold <= 0.0 {
            errors.push("OCCASIONAL_USER_THRESHOLD must be > 0".to_string());
        }
        if self.active_user_threshold <= self.occasional_user_threshold {
            errors.push("ACTIVE_USER_THRESHOLD must be > OCCASIONAL_USER_THRESHOLD".to_string());
        }
        if self.power_user_threshold <= self.active_user_threshold {
            errors.push("POWER_USER_THRESHOLD must be > ACTIVE_USER_THRESHOLD".to_string());
        }

        if let Some(window) = self.segmentation_window_days {
            if window <= 0 {
                errors.push("segmentation_window_days must be > 0 when set".to_string());
            }
        }
        if self.monthly_cost_per_user < 0.0 || !self.monthly_cost_per_user.is_finite() {
            errors.push("MONTHLY_COST_PER_USER must be a finite value >= 0".to_string());
        }
        if self.blended_hourly_rate < 0.0 || !self.blended_hourly_rate.is_finite() {
            errors.push("BLENDED_HOURLY_RATE must be a finite value >= 0".to_string());
        }
        if self.hours_per_page <= 0.0 || !self.hours_per_page.is_finite() {
            errors.push("HOURS_PER_PAGE must be a finite value > 0".to_string());
        }
        if self.reuse_factor <= 0.0 || !self.reuse_factor.is_finite() {
            errors.push("reuse_factor must be a finite value > 0".to_string());
        }
        if self.top_creators_limit == 0 {
            errors.push("top_creators_limit must be > 0".to_string());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(WuiError::InvalidConfig(errors.join("\n")))
        }
    }
}

// ============================================================================
// Report Thresholds
// ============================================================================

/// Cut points for the ✅/⚠️/❌ status icons in the Markdown report.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportThresholds {
    /// Stale percentage at or below which staleness is healthy
    pub stale_good: f64,
    /// Stale percentage at or below which staleness is a warning
    pub stale_warning: f64,
    /// Bus factor at or below which concentration is critical
    pub bus_factor_critical: usize,
    /// Bus factor at or below which concentration is a warning
    pub bus_factor_warning: usize,
    /// Gini at or below which distribution is healthy
    pub gini_good: f64,
    /// Gini at or below which distribution is a warning
    pub gini_warning: f64,
    /// Wasted-spend percentage at or below which spend is healthy
    pub waste_good: f64,
    /// Wasted-spend percentage at or below which spend is a warning
    pub waste_warning: f64,
}

impl Default for ReportThresholds {
    fn default() -> Self {
        Self {
            stale_good: 20.0,
            stale_warning: 50.0,
            bus_factor_critical: 2,
            bus_factor_warning: 5,
            gini_good: 0.6,
            gini_warning: 0.8,
            waste_good: 20.0,
            waste_warning: 40.0,
        }
    }
}

// ============================================================================
// Application Configuration
// ============================================================================

/// Process-level settings: credentials, directories, rate limit.
///
/// The engine never sees this struct; it only feeds the API client, the
/// cache, the export extractor, and the report writer.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Workspace API integration token (`WUI_TOKEN`)
    pub token: Option<String>,
    /// Base URL of the workspace API
    pub api_base_url: String,
    /// API requests per second ceiling
    pub requests_per_second: f64,
    /// Directory holding the workspace export (`.md` tree)
    pub export_dir: PathBuf,
    /// Directory reports are written to
    pub output_dir: PathBuf,
    /// Directory for flat-file response caches
    pub cache_dir: PathBuf,
    /// Workspace name used in report titles
    pub workspace_name: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            token: None,
            api_base_url: "https://api.notion.com".to_string(),
            requests_per_second: 3.0,
            export_dir: PathBuf::from("./data/export"),
            output_dir: PathBuf::from("./data/output"),
            cache_dir: PathBuf::from("./data/cache"),
            workspace_name: "Workspace".to_string(),
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        let config = Self {
            token: std::env::var("WUI_TOKEN").ok().filter(|t| !t.is_empty()),
            api_base_url: env_or(
                "WUI_API_BASE_URL",
                "https://api.notion.com".to_string(),
            ),
            requests_per_second: env_or("REQUESTS_PER_SECOND", 3.0),
            export_dir: PathBuf::from(env_or("EXPORT_DIR", "./data/export".to_string())),
            output_dir: PathBuf::from(env_or("OUTPUT_DIR", "./data/output".to_string())),
            cache_dir: PathBuf::from(env_or("CACHE_DIR", "./data/cache".to_string())),
            workspace_name: env_or("WORKSPACE_NAME", "Workspace".to_string()),
        };
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.requests_per_second <= 0.0 || !self.requests_per_second.is_finite() {
            return Err(WuiError::InvalidConfig(
                "REQUESTS_PER_SECOND must be > 0".to_string(),
            ));
        }
        Ok(())
    }

    /// Token required for any network operation.
    pub fn require_token(&self) -> Result<&str> {
        self.token.as_deref().ok_or(WuiError::MissingToken)
    }

    /// Create the output and cache directories if missing.
    pub fn ensure_dirs(&self) -> Result<()> {
        std::fs::create_dir_all(&self.output_dir)?;
        std::fs::create_dir_all(&self.cache_dir)?;
        Ok(())
    }
}
