// Copyright (c) 2024-2026 Nervosys LLC
// SPDX-License-Identifier: Apache-2.0
//! Config commands

use anyhow::Result;
use colored::*;

use crate::config::{AnalyticsConfig, AppConfig};

/// Show the effective configuration. The token is masked.
pub fn config_show() -> Result<()> {
    let app = AppConfig::from_env()?;
    let analytics = AnalyticsConfig::from_env()?;

    println!("\n{} Application", "[*]".blue());
    println!("{}", "=".repeat(50));
    let token = match app.token {
        Some(ref t) if t.len() > 8 => format!("{}...{}", &t[..4], &t[t.len() - 4..]),
        Some(_) => "****".to_string(),
        None => "(not set)".red().to_string(),
    };
    println!("  Token:            {}", token);
    println!("  API base URL:     {}", app.api_base_url);
    println!("  Rate limit:       {} req/s", app.requests_per_second);
    println!("  Export dir:       {}", app.export_dir.display());
    println!("  Output dir:       {}", app.output_dir.display());
    println!("  Cache dir:        {}", app.cache_dir.display());
    println!("  Workspace name:   {}", app.workspace_name.cyan());

    println!("\n{} Analytics", "[*]".blue());
    println!("{}", "=".repeat(50));
    println!(
        "  Staleness ladder: {}/{}/{}/{}/{} days",
        analytics.active_bucket_days,
        analytics.fresh_bucket_days,
        analytics.aging_bucket_days,
        analytics.stale_threshold_days,
        analytics.very_stale_threshold_days
    );
    println!(
        "  Segments:         power >= {}, active >= {}, occasional >= {} pages/year",
        analytics.power_user_threshold,
        analytics.active_user_threshold,
        analytics.occasional_user_threshold
    );
    match analytics.segmentation_window_days {
        Some(days) => println!("  Rate window:      trailing {} days", days),
        None => println!("  Rate window:      lifetime"),
    }
    println!(
        "  Costs:            ${}/user/month, ${}/hour, {} h/page",
        analytics.monthly_cost_per_user, analytics.blended_hourly_rate, analytics.hours_per_page
    );
    println!("  Top creators:     {}", analytics.top_creators_limit);
    Ok(())
}
