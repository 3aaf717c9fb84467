// Copyright (c) 2024-2026 Nervosys LLC
// SPDX-License-Identifier: Apache-2.0
//! Analytics module
//!
//! Page normalization, metric computation, and Markdown report rendering.

pub mod engine;
pub mod report;
pub mod view;

pub use engine::{AnalysisResult, WorkspaceAnalytics};
pub use report::ReportBuilder;
pub use view::{StalenessBucket, TemplateMatcher};
