// Copyright (c) 2024-2026 Nervosys LLC
// SPDX-License-Identifier: Apache-2.0
//! Workspace Usage Insights (wui) - Main entry point

use anyhow::Result;
use clap::Parser;

use wui::cli::{CacheCommands, Cli, Commands, ConfigCommands, ExportCommands, FetchCommands};
use wui::commands;

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();

    match cli.command {
        // ====================================================================
        // Analyze Commands
        // ====================================================================
        Commands::Analyze {
            offline,
            refresh,
            json,
            export_dir,
        } => commands::analyze(offline, refresh, json, export_dir),

        // ====================================================================
        // Report Commands
        // ====================================================================
        Commands::Report {
            output,
            json,
            offline,
            refresh,
            export_dir,
        } => commands::report(output, json, offline, refresh, export_dir),

        // ====================================================================
        // Fetch Commands
        // ====================================================================
        Commands::Fetch { command } => match command {
            FetchCommands::Users { refresh } => commands::fetch_users(refresh),
            FetchCommands::Pages { refresh } => commands::fetch_pages(refresh),
            FetchCommands::All { refresh } => commands::fetch_all(refresh),
            FetchCommands::Page { id } => commands::fetch_page(&id),
        },

        // ====================================================================
        // Export Commands
        // ====================================================================
        Commands::Export { command } => match command {
            ExportCommands::Scan { dir, json } => commands::export_scan(dir, json),
            ExportCommands::Databases { dir, json } => commands::export_databases(dir, json),
            ExportCommands::Summary { dir } => commands::export_summary(dir),
        },

        // ====================================================================
        // Cache Commands
        // ====================================================================
        Commands::Cache { command } => match command {
            Some(CacheCommands::Clear) => commands::cache_clear(),
            Some(CacheCommands::Status) | None => commands::cache_status(),
        },

        // ====================================================================
        // Config Commands
        // ====================================================================
        Commands::Config { command } => match command {
            Some(ConfigCommands::Show) | None => commands::config_show(),
        },
    }
}
