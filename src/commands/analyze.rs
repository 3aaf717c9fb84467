// Copyright (c) 2024-2026 Nervosys LLC
// SPDX-License-Identifier: AGPL-3.0-only
//! Analyze and report commands

use anyhow::{Context, Result};
use chrono::Utc;
use colored::*;
use std::path::PathBuf;

use super::load_snapshot;
use crate::analytics::{AnalysisResult, ReportBuilder, WorkspaceAnalytics};
use crate::config::{AnalyticsConfig, AppConfig, ReportThresholds};
use crate::export::ExportExtractor;
use crate::models::PageRecord;

/// Fill in missing titles from an export scan, matching on page id.
///
/// Titles only exist in the filesystem export; the search API returns
/// none. With titles merged, template detection has something to bite on.
fn merge_export_titles(pages: &mut [PageRecord], export_dir: &std::path::Path) -> Result<()> {
    let exported = ExportExtractor::new(export_dir).extract_page_ids()?;
    let titles: std::collections::BTreeMap<&str, &str> = exported
        .iter()
        .filter(|p| !p.title.is_empty())
        .map(|p| (p.id.as_str(), p.title.as_str()))
        .collect();

    let mut merged = 0usize;
    for page in pages.iter_mut() {
        if page.title.is_none() {
            if let Some(title) = titles.get(page.id.to_ascii_lowercase().as_str()) {
                page.title = Some((*title).to_string());
                merged += 1;
            }
        }
    }
    log::info!("merged {} titles from export", merged);
    Ok(())
}

fn run_engine(
    offline: bool,
    refresh: bool,
    export_dir: Option<&std::path::Path>,
) -> Result<(AppConfig, AnalysisResult)> {
    let app = AppConfig::from_env()?;
    let analytics = AnalyticsConfig::from_env()?;
    let (mut pages, users) = load_snapshot(&app, offline, refresh)?;
    if let Some(dir) = export_dir {
        merge_export_titles(&mut pages, dir)?;
    }
    let result = WorkspaceAnalytics::new(&pages, users, analytics, Utc::now())?.run_all();
    Ok((app, result))
}

/// Run all analytics and print a terminal summary.
pub fn analyze(
    offline: bool,
    refresh: bool,
    json: bool,
    export_dir: Option<PathBuf>,
) -> Result<()> {
    let (app, result) = run_engine(offline, refresh, export_dir.as_deref())?;

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    let summary = &result.summary;
    let risk = &result.risk;
    let health = &result.content_health;

    println!(
        "\n{} Workspace Analytics: {}",
        "[*]".blue(),
        app.workspace_name.cyan()
    );
    println!("{}", "=".repeat(70));

    println!(
        "  Pages: {}   Users: {}   Active contributors: {} ({} deleted)",
        summary.total_pages.to_string().bold(),
        summary.total_users.to_string().bold(),
        summary.active_contributors,
        summary.deleted_creators
    );
    if summary.records_skipped > 0 {
        println!(
            "  {} {} records skipped for unparsable timestamps",
            "[!]".yellow(),
            summary.records_skipped
        );
    }

    let stale = format!("{:.1}%", health.stale_percentage);
    let stale_colored = if health.stale_percentage >= 50.0 {
        stale.red()
    } else if health.stale_percentage >= 20.0 {
        stale.yellow()
    } else {
        stale.green()
    };
    println!(
        "  Stale (12mo+): {}   Abandoned: {:.1}%   Archived: {}",
        stale_colored, health.abandoned_percentage, health.archived_pages
    );

    let bus = risk.bus_factor.to_string();
    let bus_colored = if risk.bus_factor <= 2 {
        bus.red()
    } else if risk.bus_factor <= 5 {
        bus.yellow()
    } else {
        bus.green()
    };
    println!(
        "  Bus factor: {}   Gini: {:.3}   Top 10% hold {:.1}% of pages",
        bus_colored,
        risk.gini_coefficient,
        risk.concentration.top_10_percent.percentage
    );

    println!(
        "  Annual cost: ${:.0}   Wasted spend: ${:.0}",
        result.costs.total_annual_cost, result.costs.wasted_spend_annual
    );

    if !result.top_creators.is_empty() {
        println!("\n  Top creators:");
        for (i, creator) in result.top_creators.iter().take(5).enumerate() {
            println!(
                "    {}. {} - {} pages ({:.1}%)",
                i + 1,
                creator.name,
                creator.page_count,
                creator.percentage
            );
        }
    }

    println!(
        "\n{} Run {} for the full report",
        "[i]".blue(),
        "wui report".cyan()
    );
    Ok(())
}

/// Generate the full Markdown (or JSON) report.
pub fn report(
    output: Option<PathBuf>,
    json: bool,
    offline: bool,
    refresh: bool,
    export_dir: Option<PathBuf>,
) -> Result<()> {
    let (app, result) = run_engine(offline, refresh, export_dir.as_deref())?;
    let generated_at = Utc::now();

    let (content, default_name) = if json {
        (
            serde_json::to_string_pretty(&result)?,
            "workspace_analytics.json",
        )
    } else {
        let report = ReportBuilder::new(
            &result,
            &app.workspace_name,
            ReportThresholds::default(),
            generated_at,
        )
        .build();
        (report, "workspace_analytics.md")
    };

    let path = match output {
        Some(p) => p,
        None => {
            app.ensure_dirs()?;
            app.output_dir.join(default_name)
        }
    };
    std::fs::write(&path, content)
        .with_context(|| format!("failed to write report to {}", path.display()))?;

    println!("{} Report written to {}", "[+]".green(), path.display().to_string().cyan());
    Ok(())
}
