// Copyright (c) 2024-2026 Nervosys LLC
// SPDX-License-Identifier: Apache-2.0
//! Workspace Usage Insights (WUI) - Library
//!
//! Descriptive analytics over workspace page metadata: who creates, what
//! goes stale, how concentrated content ownership is, and what the seat
//! spend buys. Data comes from the workspace API (cached locally as JSON)
//! or from a filesystem export.
//!
//! ```rust,no_run
//! use chrono::Utc;
//! use wui::analytics::{ReportBuilder, WorkspaceAnalytics};
//! use wui::config::{AnalyticsConfig, ReportThresholds};
//! use wui::models::{PageRecord, UserDirectory};
//!
//! # fn main() -> wui::error::Result<()> {
//! let pages: Vec<PageRecord> = Vec::new();
//! let users = UserDirectory::new();
//! let engine = WorkspaceAnalytics::new(&pages, users, AnalyticsConfig::default(), Utc::now())?;
//! let results = engine.run_all();
//! let report = ReportBuilder::new(&results, "Acme", ReportThresholds::default(), Utc::now());
//! println!("{}", report.build());
//! # Ok(())
//! # }
//! ```

pub mod analytics;
pub mod api;
pub mod cache;
pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod export;
pub mod models;

pub use analytics::{AnalysisResult, ReportBuilder, WorkspaceAnalytics};
pub use config::{AnalyticsConfig, AppConfig, ReportThresholds};
pub use error::{Result, WuiError};
pub use models::{PageRecord, UserDirectory, UserInfo};
