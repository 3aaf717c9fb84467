// Copyright (c) 2024-2026 Nervosys LLC
// SPDX-License-Identifier: AGPL-3.0-only
//! CLI argument definitions using clap derive macros

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Workspace Usage Insights (wui) - Descriptive analytics for workspace page metadata
#[derive(Parser)]
#[command(name = "wui")]
#[command(author = "Nervosys")]
#[command(version)]
#[command(about = "Analyze workspace usage from page metadata", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    // ============================================================================
    // Analyze Commands
    // ============================================================================
    /// Run all analytics and print a terminal summary
    Analyze {
        /// Never touch the network; fail if the cache is cold
        #[arg(long)]
        offline: bool,

        /// Ignore cached snapshots and refetch from the API
        #[arg(long)]
        refresh: bool,

        /// Print the full result set as JSON instead of a summary
        #[arg(long)]
        json: bool,

        /// Merge page titles from a workspace export tree
        #[arg(long)]
        export_dir: Option<PathBuf>,
    },

    // ============================================================================
    // Report Commands
    // ============================================================================
    /// Generate the full Markdown analytics report
    Report {
        /// Write the report here instead of the output directory
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Emit machine-readable JSON instead of Markdown
        #[arg(long)]
        json: bool,

        /// Never touch the network; fail if the cache is cold
        #[arg(long)]
        offline: bool,

        /// Ignore cached snapshots and refetch from the API
        #[arg(long)]
        refresh: bool,

        /// Merge page titles from a workspace export tree
        #[arg(long)]
        export_dir: Option<PathBuf>,
    },

    // ============================================================================
    // Fetch Commands
    // ============================================================================
    /// Fetch workspace data from the API into the local cache
    Fetch {
        #[command(subcommand)]
        command: FetchCommands,
    },

    // ============================================================================
    // Export Commands
    // ============================================================================
    /// Inspect a local workspace export (.md tree)
    Export {
        #[command(subcommand)]
        command: ExportCommands,
    },

    // ============================================================================
    // Cache Commands
    // ============================================================================
    /// Inspect or clear the local snapshot cache
    Cache {
        #[command(subcommand)]
        command: Option<CacheCommands>,
    },

    // ============================================================================
    // Config Commands
    // ============================================================================
    /// Show the effective configuration
    Config {
        #[command(subcommand)]
        command: Option<ConfigCommands>,
    },
}

#[derive(Subcommand)]
pub enum FetchCommands {
    /// Fetch the user directory
    Users {
        /// Refetch even when a cached snapshot exists
        #[arg(long)]
        refresh: bool,
    },
    /// Fetch every page in the workspace
    Pages {
        /// Refetch even when a cached snapshot exists
        #[arg(long)]
        refresh: bool,
    },
    /// Fetch users and pages
    All {
        /// Refetch even when cached snapshots exist
        #[arg(long)]
        refresh: bool,
    },
    /// Fetch one page by id and print it as JSON
    Page {
        /// Page id (hyphenated or bare 32-hex)
        id: String,
    },
}

#[derive(Subcommand)]
pub enum ExportCommands {
    /// List pages found in the export tree
    Scan {
        /// Export directory (defaults to EXPORT_DIR)
        #[arg(short, long)]
        dir: Option<PathBuf>,

        /// Print results as JSON
        #[arg(long)]
        json: bool,
    },
    /// List database folders found in the export tree
    Databases {
        /// Export directory (defaults to EXPORT_DIR)
        #[arg(short, long)]
        dir: Option<PathBuf>,

        /// Print results as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print summary statistics for the export tree
    Summary {
        /// Export directory (defaults to EXPORT_DIR)
        #[arg(short, long)]
        dir: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
pub enum CacheCommands {
    /// List cached snapshots with sizes and timestamps
    Status,
    /// Delete every cached snapshot
    Clear,
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Show the effective configuration
    Show,
}
