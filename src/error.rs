// Copyright (c) 2024-2026 Nervosys LLC
// SPDX-License-Identifier: AGPL-3.0-only
//! Error types for wui

use thiserror::Error;

#[derive(Error, Debug)]
pub enum WuiError {
    #[error("Invalid configuration:\n{0}")]
    InvalidConfig(String),

    #[error("Workspace API token not set. Export WUI_TOKEN and try again")]
    MissingToken,

    #[error("API request failed: {0}")]
    ApiError(String),

    #[error("Cache entry not found: {0}. Run `wui fetch all` first, or drop --offline")]
    CacheMiss(String),

    #[error("Export directory not found: {0}")]
    ExportDirNotFound(String),

    #[error("Invalid page id: {0}")]
    InvalidPageId(String),

    #[error("No pages found in workspace data")]
    NoPagesFound,

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),
}

pub type Result<T> = std::result::Result<T, WuiError>;
