// Copyright (c) 2024-2026 Nervosys LLC
// SPDX-License-Identifier: AGPL-3.0-only
//! Markdown report rendering
//!
//! Renders an [`AnalysisResult`] into a self-contained Markdown document.
//! Formatting only; every number is computed by the engine. Undefined
//! metrics (`None`) render as `-` rather than a fabricated zero.

use chrono::{DateTime, Utc};
use std::fmt::Write as _;

use super::engine::{AnalysisResult, CreatorShare};
use crate::config::ReportThresholds;

// ============================================================================
// Formatting Helpers
// ============================================================================

/// Thousands-separated integer.
fn fmt_count(n: usize) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// Currency with no decimals, e.g. `$1,234`.
fn fmt_money(v: f64) -> String {
    let negative = v < 0.0;
    let rounded = v.abs().round() as usize;
    if negative {
        format!("-${}", fmt_count(rounded))
    } else {
        format!("${}", fmt_count(rounded))
    }
}

fn fmt_pct(v: f64) -> String {
    format!("{:.1}%", v)
}

fn opt_money(v: Option<f64>) -> String {
    v.map(fmt_money).unwrap_or_else(|| "-".to_string())
}

fn opt_pct(v: Option<f64>) -> String {
    v.map(fmt_pct).unwrap_or_else(|| "-".to_string())
}

/// YoY growth cell: explicit sign for positive values, `-` when undefined.
fn fmt_growth(v: Option<f64>) -> String {
    match v {
        Some(g) if g > 0.0 => format!("+{:.1}%", g),
        Some(g) => format!("{:.1}%", g),
        None => "-".to_string(),
    }
}

// ============================================================================
// Report Builder
// ============================================================================

/// Builds the Markdown analytics report from engine results.
pub struct ReportBuilder<'a> {
    results: &'a AnalysisResult,
    workspace_name: String,
    thresholds: ReportThresholds,
    generated_at: DateTime<Utc>,
}

impl<'a> ReportBuilder<'a> {
    pub fn new(
        results: &'a AnalysisResult,
        workspace_name: impl Into<String>,
        thresholds: ReportThresholds,
        generated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            results,
            workspace_name: workspace_name.into(),
            thresholds,
            generated_at,
        }
    }

    /// Render the full report.
    pub fn build(&self) -> String {
        let sections = [
            self.write_header(),
            self.write_executive_summary(),
            self.write_growth(),
            self.write_users(),
            self.write_content_health(),
            self.write_collaboration(),
            self.write_costs(),
            self.write_risk(),
            self.write_detailed_tables(),
        ];
        sections.join("\n---\n\n")
    }

    // ------------------------------------------------------------------------
    // Status icons
    // ------------------------------------------------------------------------

    fn stale_icon(&self, pct: f64) -> &'static str {
        if pct <= self.thresholds.stale_good {
            "✅"
        } else if pct <= self.thresholds.stale_warning {
            "⚠️"
        } else {
            "❌"
        }
    }

    fn bus_factor_icon(&self, bus_factor: usize) -> &'static str {
        if bus_factor <= self.thresholds.bus_factor_critical {
            "❌"
        } else if bus_factor <= self.thresholds.bus_factor_warning {
            "⚠️"
        } else {
            "✅"
        }
    }

    fn gini_icon(&self, gini: f64) -> &'static str {
        if gini <= self.thresholds.gini_good {
            "✅"
        } else if gini <= self.thresholds.gini_warning {
            "⚠️"
        } else {
            "❌"
        }
    }

    fn waste_icon(&self, pct: f64) -> &'static str {
        if pct <= self.thresholds.waste_good {
            "✅"
        } else if pct <= self.thresholds.waste_warning {
            "⚠️"
        } else {
            "❌"
        }
    }

    // ------------------------------------------------------------------------
    // Sections
    // ------------------------------------------------------------------------

    fn write_header(&self) -> String {
        format!(
            "# {} Analytics Report\n\n\
             **Generated:** {}\n\n\
             ## Table of Contents\n\n\
             1. [Executive Summary](#executive-summary)\n\
             2. [Growth & Velocity](#growth--velocity)\n\
             3. [User Analytics](#user-analytics)\n\
             4. [Content Health](#content-health)\n\
             5. [Collaboration Patterns](#collaboration-patterns)\n\
             6. [Cost Analysis](#cost-analysis)\n\
             7. [Risk Assessment](#risk-assessment)\n\
             8. [Detailed Tables](#detailed-tables)\n",
            self.workspace_name,
            self.generated_at.format("%B %d, %Y at %H:%M UTC"),
        )
    }

    fn write_executive_summary(&self) -> String {
        let summary = &self.results.summary;
        let health = &self.results.content_health;
        let costs = &self.results.costs;
        let risk = &self.results.risk;

        let current_pct = if summary.total_users > 0 {
            summary.current_creators as f64 / summary.total_users as f64 * 100.0
        } else {
            0.0
        };
        let inactive_pct = if summary.total_users > 0 {
            summary.inactive_users as f64 / summary.total_users as f64 * 100.0
        } else {
            0.0
        };

        let mut out = String::new();
        out.push_str("## Executive Summary\n\n");
        out.push_str("> **About this data:**\n");
        out.push_str("> - **Total Pages:** all pages in the workspace snapshot\n");
        out.push_str("> - **Total Users:** users currently in the directory\n");
        let _ = writeln!(
            out,
            "> - **Active Contributors:** {} total ({} current users + {} deleted users)",
            summary.active_contributors, summary.current_creators, summary.deleted_creators
        );
        out.push_str("> - **Inactive Users:** current users who never created a page\n\n");

        out.push_str("### Quick Stats\n\n");
        out.push_str("| Metric | Value | Status |\n|:---|---:|:---:|\n");
        let _ = writeln!(
            out,
            "| **Total Pages** | {} | - |",
            fmt_count(summary.total_pages)
        );
        if summary.records_skipped > 0 {
            let _ = writeln!(
                out,
                "| **Records Skipped (bad timestamps)** | {} | ⚠️ |",
                fmt_count(summary.records_skipped)
            );
        }
        let _ = writeln!(
            out,
            "| **Total Users (Current)** | {} | - |",
            fmt_count(summary.total_users)
        );
        let _ = writeln!(
            out,
            "| **Current Active Creators** | {} ({:.1}%) | - |",
            fmt_count(summary.current_creators),
            current_pct
        );
        let _ = writeln!(
            out,
            "| **Deleted Creators** | {} | - |",
            fmt_count(summary.deleted_creators)
        );
        let _ = writeln!(
            out,
            "| **Inactive Users** | {} ({:.1}%) | - |",
            fmt_count(summary.inactive_users),
            inactive_pct
        );
        let _ = writeln!(
            out,
            "| **Stale Pages (12mo+)** | {} | {} |",
            fmt_pct(health.stale_percentage),
            self.stale_icon(health.stale_percentage)
        );
        let _ = writeln!(
            out,
            "| **Annual Cost** | {} | - |",
            fmt_money(summary.annual_cost)
        );
        let _ = writeln!(
            out,
            "| **Cost per Active User** | {} | - |",
            opt_money(summary.cost_per_active_user)
        );
        let _ = writeln!(
            out,
            "| **Bus Factor** | {} people | {} |",
            risk.bus_factor,
            self.bus_factor_icon(risk.bus_factor)
        );
        let _ = writeln!(
            out,
            "| **Gini Coefficient** | {:.3} | {} |",
            risk.gini_coefficient,
            self.gini_icon(risk.gini_coefficient)
        );

        out.push_str("\n### Key Insights\n\n");
        let _ = writeln!(
            out,
            "- 📊 **{} total pages** in the workspace",
            fmt_count(summary.total_pages)
        );
        let _ = writeln!(
            out,
            "- 👥 **{} of {} current users** have created pages ({:.1}%)",
            summary.current_creators, summary.total_users, current_pct
        );
        let _ = writeln!(
            out,
            "- 👻 **{} deleted users** created pages that still remain",
            summary.deleted_creators
        );
        let _ = writeln!(
            out,
            "- 🚫 **{} current users ({:.1}%)** have never created a page",
            summary.inactive_users, inactive_pct
        );
        let _ = writeln!(
            out,
            "- 📉 **{} of content** hasn't been updated in over a year",
            fmt_pct(health.stale_percentage)
        );
        let _ = writeln!(
            out,
            "- 💰 **Annual workspace cost:** {} ({} per active creator)",
            fmt_money(costs.total_annual_cost),
            opt_money(costs.cost_per_active_creator)
        );
        let _ = writeln!(
            out,
            "- ⚠️ **Knowledge risk:** bus factor of {} (if {} key people leave, 50% of content knowledge is at risk)",
            risk.bus_factor, risk.bus_factor
        );
        out
    }

    fn write_growth(&self) -> String {
        let growth = &self.results.growth;

        let mut out = String::new();
        out.push_str("## Growth & Velocity\n\n### Annual Growth\n\n");
        if growth.annual_counts.is_empty() {
            out.push_str("_No dated pages_\n");
        } else {
            out.push_str("| Year | Pages Created | YoY Growth |\n|:---|---:|---:|\n");
            for (year, count) in &growth.annual_counts {
                let yoy = growth.yoy_growth.get(year).copied().flatten();
                let _ = writeln!(out, "| {} | {} | {} |", year, fmt_count(*count), fmt_growth(yoy));
            }
        }
        let _ = writeln!(
            out,
            "\n**Average monthly pages (last 12 months):** {:.1}\n",
            growth.avg_monthly_pages
        );

        out.push_str("### Monthly Trend (Last 12 Months)\n\n");
        if growth.monthly_last_12.is_empty() {
            out.push_str("_No recent data_\n");
        } else {
            out.push_str("| Month | Pages Created |\n|:---|---:|\n");
            for (month, count) in &growth.monthly_last_12 {
                let _ = writeln!(out, "| {} | {} |", month, fmt_count(*count));
            }
        }
        out
    }

    fn write_users(&self) -> String {
        let users = &self.results.users;
        let segments = &users.segments;
        let total_users = segments.total();
        let seg_pct = |count: usize| {
            if total_users > 0 {
                fmt_pct(count as f64 / total_users as f64 * 100.0)
            } else {
                "0.0%".to_string()
            }
        };

        let mut out = String::new();
        out.push_str("## User Analytics\n\n### User Segmentation\n\n");
        out.push_str("| Segment | Count | Percentage |\n|:---|---:|---:|\n");
        for (label, count) in [
            ("🔥 Power Creators (100+/year)", segments.power_creators),
            ("✨ Active Creators (20-99/year)", segments.active_creators),
            ("📝 Occasional Creators (5-19/year)", segments.occasional_creators),
            ("🌱 Minimal Creators (1-4/year)", segments.minimal_creators),
            ("👻 Non-Creators (0/year)", segments.non_creators),
        ] {
            let _ = writeln!(out, "| {} | {} | {} |", label, count, seg_pct(count));
        }
        if users.deleted_creators > 0 {
            let _ = writeln!(
                out,
                "| 🪦 Deleted Creators (former users) | {} | - |",
                users.deleted_creators
            );
        }

        let active_count = total_users - segments.non_creators;
        let _ = writeln!(
            out,
            "\n**Active creator rate:** {} ({} of {} users)\n",
            fmt_pct(users.active_creator_percentage),
            active_count,
            total_users
        );

        out.push_str("### Top Creators\n\n");
        if self.results.top_creators.is_empty() {
            out.push_str("_No creators_\n");
        } else {
            out.push_str("| Rank | Name | Pages Created | % of Total |\n|:---:|:---|---:|---:|\n");
            for (i, creator) in self.results.top_creators.iter().enumerate() {
                let _ = writeln!(
                    out,
                    "| #{} | {} | {} | {} |",
                    i + 1,
                    creator.name,
                    fmt_count(creator.page_count),
                    fmt_pct(creator.percentage)
                );
            }
        }
        out
    }

    fn write_content_health(&self) -> String {
        let health = &self.results.content_health;

        let mut out = String::new();
        out.push_str("## Content Health\n\n### Staleness Distribution\n\n");
        out.push_str("| Status | Count | Percentage |\n|:---|---:|---:|\n");
        for row in &health.staleness_distribution {
            let icon = match row.label {
                ref l if l.starts_with("Active") || l.starts_with("Fresh") => "✅",
                ref l if l.starts_with("Aging") || l.starts_with("Stale") => "⚠️",
                _ => "❌",
            };
            let _ = writeln!(
                out,
                "| {} {} | {} | {} |",
                icon,
                row.label,
                fmt_count(row.count),
                fmt_pct(row.percentage)
            );
        }

        out.push_str("\n### Key Health Metrics\n\n");
        out.push_str("| Metric | Value | Status |\n|:---|---:|:---:|\n");
        let _ = writeln!(
            out,
            "| **Stale Pages (12mo+)** | {} ({}) | {} |",
            fmt_count(health.stale_pages),
            fmt_pct(health.stale_percentage),
            self.stale_icon(health.stale_percentage)
        );
        let _ = writeln!(
            out,
            "| **Very Stale Pages (24mo+)** | {} ({}) | - |",
            fmt_count(health.very_stale_pages),
            fmt_pct(health.very_stale_percentage)
        );
        let _ = writeln!(
            out,
            "| **Abandoned Pages** | {} ({}) | - |",
            fmt_count(health.abandoned_pages),
            fmt_pct(health.abandoned_percentage)
        );
        let _ = writeln!(
            out,
            "| **Abandoned by Top Creators** | {} | - |",
            fmt_count(health.abandoned_by_top_creators)
        );
        let _ = writeln!(
            out,
            "| **Archived Pages** | {} | - |",
            fmt_count(health.archived_pages)
        );

        out.push_str("\n### Insights\n\n");
        let _ = writeln!(
            out,
            "- {} of pages haven't been updated in over a year",
            fmt_pct(health.stale_percentage)
        );
        let _ = writeln!(
            out,
            "- {} of pages were never edited after creation",
            fmt_pct(health.abandoned_percentage)
        );
        out.push_str("- Consider archiving or deleting very stale pages to improve searchability\n");
        out
    }

    fn write_collaboration(&self) -> String {
        let collab = &self.results.collaboration;

        let mut out = String::new();
        out.push_str("## Collaboration Patterns\n\n### Top Collaborators\n\n");
        if collab.top_collaborators.is_empty() {
            out.push_str("_No collaboration data_\n");
        } else {
            out.push_str(
                "| Rank | Name | Pages Created | Others' Pages Edited | Collaboration Score |\n\
                 |:---:|:---|---:|---:|---:|\n",
            );
            for (i, user) in collab.top_collaborators.iter().enumerate() {
                let _ = writeln!(
                    out,
                    "| #{} | {} | {} | {} | {} |",
                    i + 1,
                    user.name,
                    fmt_count(user.pages_created),
                    fmt_count(user.others_pages_edited),
                    fmt_pct(user.collaboration_score)
                );
            }
        }

        out.push_str(
            "\n**Collaboration Score** = (others' pages last-edited / pages created) × 100\n\n\
             > Scores are a proxy built from each page's creator and most recent\n\
             > editor only; intermediate edit history is not visible to the API.\n\n",
        );

        out.push_str("### Summary Metrics\n\n| Metric | Value |\n|:---|---:|\n");
        let _ = writeln!(
            out,
            "| **Average Collaboration Score** | {} |",
            opt_pct(collab.average_collaboration_score)
        );
        let _ = writeln!(
            out,
            "| **Collaborated Pages** | {} ({}) |",
            fmt_count(collab.collaborated_pages),
            fmt_pct(collab.collaboration_percentage)
        );
        let _ = writeln!(
            out,
            "| **Single-Owner Pages** | {} |",
            fmt_count(collab.single_owner_pages)
        );

        out.push_str("\n### Insights\n\n");
        let _ = writeln!(
            out,
            "- {} of pages were last edited by someone other than the creator",
            fmt_pct(collab.collaboration_percentage)
        );
        if let Some(avg) = collab.average_collaboration_score {
            let level = if avg > 100.0 {
                "strong cross-functional collaboration"
            } else if avg > 50.0 {
                "moderate collaboration"
            } else {
                "limited collaboration"
            };
            let _ = writeln!(
                out,
                "- Average collaboration score of {} indicates {}",
                fmt_pct(avg),
                level
            );
        }
        out
    }

    fn write_costs(&self) -> String {
        let costs = &self.results.costs;

        let mut out = String::new();
        out.push_str("## Cost Analysis\n\n### Cost by User Segment\n\n");
        out.push_str("| Segment | Users | Monthly Cost | Annual Cost |\n|:---|---:|---:|---:|\n");
        for (key, label) in [
            ("power_creators", "🔥 Power Creators"),
            ("active_creators", "✨ Active Creators"),
            ("occasional_creators", "📝 Occasional Creators"),
            ("minimal_creators", "🌱 Minimal Creators"),
            ("non_creators", "👻 Non-Creators"),
        ] {
            if let Some(segment) = costs.cost_by_segment.get(key) {
                let _ = writeln!(
                    out,
                    "| {} | {} | {} | {} |",
                    label,
                    segment.users,
                    fmt_money(segment.monthly_cost),
                    fmt_money(segment.annual_cost)
                );
            }
        }

        out.push_str("\n### Financial Summary\n\n");
        out.push_str("| Metric | Value | Status |\n|:---|---:|:---:|\n");
        let _ = writeln!(
            out,
            "| **Total Annual Cost** | {} | - |",
            fmt_money(costs.total_annual_cost)
        );
        let _ = writeln!(
            out,
            "| **Cost per Active Creator** | {} | - |",
            opt_money(costs.cost_per_active_creator)
        );
        let waste_icon = costs
            .wasted_spend_percentage
            .map(|p| self.waste_icon(p))
            .unwrap_or("-");
        let _ = writeln!(
            out,
            "| **Wasted Spend (Non-creators)** | {} ({}) | {} |",
            fmt_money(costs.wasted_spend_annual),
            opt_pct(costs.wasted_spend_percentage),
            waste_icon
        );
        let _ = writeln!(
            out,
            "| **Content Creation Value** | {} | - |",
            fmt_money(costs.total_creation_value)
        );
        let _ = writeln!(out, "| **ROI** | {} | - |", opt_pct(costs.roi_percentage));

        out.push_str("\n### Assumptions\n\n");
        let _ = writeln!(
            out,
            "- **Monthly cost per user:** {}",
            fmt_money(costs.monthly_cost_per_user)
        );
        let _ = writeln!(
            out,
            "- **Blended hourly rate:** {}",
            fmt_money(costs.blended_hourly_rate)
        );
        let _ = writeln!(
            out,
            "- **Avg time per page:** {:.1} hour(s)",
            costs.hours_per_page
        );

        out.push_str("\n### Insights\n\n");
        if let Some(waste_pct) = costs.wasted_spend_percentage {
            let _ = writeln!(
                out,
                "- {} of annual spend ({}) goes to seats that create nothing",
                fmt_pct(waste_pct),
                fmt_money(costs.wasted_spend_annual)
            );
        }
        if let Some(roi) = costs.roi_percentage {
            let _ = writeln!(
                out,
                "- ROI of {} based on estimated content creation value",
                fmt_pct(roi)
            );
        }
        out.push_str("- Consider rightsizing licenses for inactive users\n");
        out
    }

    fn write_risk(&self) -> String {
        let risk = &self.results.risk;
        let conc = &risk.concentration;

        let mut out = String::new();
        out.push_str("## Risk Assessment\n\n### Ownership Concentration\n\n");
        out.push_str("| Metric | Users | Pages Created | % of Total |\n|:---|---:|---:|---:|\n");
        for (label, tier) in [
            ("Top 1% of Creators", &conc.top_1_percent),
            ("Top 5% of Creators", &conc.top_5_percent),
            ("Top 10% of Creators", &conc.top_10_percent),
        ] {
            let _ = writeln!(
                out,
                "| {} | {} | {} | {} |",
                label,
                tier.users,
                fmt_count(tier.pages),
                fmt_pct(tier.percentage)
            );
        }

        let _ = writeln!(
            out,
            "\n**Top 1% (Critical concentration):**\n- {}\n",
            share_list_with_pages(&conc.top_1_percent.members)
        );
        let _ = writeln!(
            out,
            "**Top 5% (High concentration):**\n- {}\n",
            name_list(&conc.top_5_percent.members)
        );
        let _ = writeln!(
            out,
            "**Top 10% (Significant concentration):**\n- {}\n",
            name_list(&conc.top_10_percent.members)
        );

        out.push_str("### Risk Metrics\n\n| Metric | Value | Status |\n|:---|---:|:---:|\n");
        let _ = writeln!(
            out,
            "| **Gini Coefficient** | {:.3} | {} |",
            risk.gini_coefficient,
            self.gini_icon(risk.gini_coefficient)
        );
        let _ = writeln!(
            out,
            "| **Bus Factor** | {} people | {} |",
            risk.bus_factor,
            self.bus_factor_icon(risk.bus_factor)
        );

        let _ = writeln!(
            out,
            "\n**Bus Factor Critical Users:**\n- {}\n",
            share_list(&risk.bus_factor_users)
        );

        out.push_str("### Understanding the Metrics\n\n");
        let gini_interp = if risk.gini_coefficient < 0.5 {
            "relatively equal distribution"
        } else if risk.gini_coefficient < 0.7 {
            "moderate concentration"
        } else {
            "high concentration"
        };
        out.push_str("**Gini Coefficient** measures inequality in page ownership:\n");
        out.push_str("- 0.0 = perfect equality (everyone creates equal pages)\n");
        out.push_str("- 1.0 = perfect inequality (one person creates all pages)\n");
        let _ = writeln!(
            out,
            "- **Current: {:.3}** indicates {}\n",
            risk.gini_coefficient, gini_interp
        );
        out.push_str(
            "**Bus Factor** is the minimum number of people who need to leave before 50% of content is at risk:\n",
        );
        let _ = writeln!(
            out,
            "- **Current: {}** people hold critical knowledge\n",
            risk.bus_factor
        );

        out.push_str("### Insights\n\n");
        let _ = writeln!(
            out,
            "- Top 10% of creators are responsible for {} of all content",
            fmt_pct(conc.top_10_percent.percentage)
        );
        let (risk_line, dist) = if risk.bus_factor < 5 {
            (
                "⚠️ HIGH RISK: consider knowledge transfer and documentation",
                "highly concentrated",
            )
        } else if risk.bus_factor < 10 {
            (
                "✅ MODERATE RISK: monitor key contributors",
                "moderately concentrated",
            )
        } else {
            (
                "✅ LOW RISK: knowledge is well distributed",
                "well distributed",
            )
        };
        let _ = writeln!(out, "- Knowledge is {}", dist);
        let _ = writeln!(out, "- {}", risk_line);
        out
    }

    fn write_detailed_tables(&self) -> String {
        let segments = &self.results.users.segments;

        let mut out = String::new();
        out.push_str("## Detailed Tables\n\n### User Segments Breakdown\n\n");
        out.push_str("| Segment | Threshold | Count |\n|:---|:---|---:|\n");
        for (label, threshold, count) in [
            ("Power Creators", "100+/year", segments.power_creators),
            ("Active Creators", "20-99/year", segments.active_creators),
            ("Occasional Creators", "5-19/year", segments.occasional_creators),
            ("Minimal Creators", "1-4/year", segments.minimal_creators),
            ("Non-Creators", "0/year", segments.non_creators),
        ] {
            let _ = writeln!(out, "| {} | {} | {} |", label, threshold, count);
        }

        out.push_str("\n### Staleness Definitions\n\n");
        out.push_str("| Category | Last Edited | Risk Level |\n|:---|:---|:---:|\n");
        out.push_str("| Active | < 1 month | ✅ Low |\n");
        out.push_str("| Fresh | 1-3 months | ✅ Low |\n");
        out.push_str("| Aging | 3-6 months | ⚠️ Medium |\n");
        out.push_str("| Stale | 6-12 months | ⚠️ Medium |\n");
        out.push_str("| Very Stale | 12-24 months | ❌ High |\n");
        out.push_str("| Dead | 24+ months | ❌ High |\n");
        out
    }
}

/// `Name (N pages, P%)`, comma separated.
fn share_list(members: &[CreatorShare]) -> String {
    if members.is_empty() {
        return "_None_".to_string();
    }
    members
        .iter()
        .map(|m| {
            format!(
                "{} ({} pages, {})",
                m.name,
                fmt_count(m.page_count),
                fmt_pct(m.share_percentage)
            )
        })
        .collect::<Vec<_>>()
        .join(", ")
}

/// `Name (N pages)`, comma separated.
fn share_list_with_pages(members: &[CreatorShare]) -> String {
    if members.is_empty() {
        return "_None_".to_string();
    }
    members
        .iter()
        .map(|m| format!("{} ({} pages)", m.name, fmt_count(m.page_count)))
        .collect::<Vec<_>>()
        .join(", ")
}

fn name_list(members: &[CreatorShare]) -> String {
    if members.is_empty() {
        return "_None_".to_string();
    }
    members
        .iter()
        .map(|m| m.name.clone())
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::WorkspaceAnalytics;
    use crate::config::AnalyticsConfig;
    use crate::models::{PageRecord, UserInfo};
    use chrono::TimeZone;

    fn sample_report() -> String {
        let pages = vec![
            PageRecord {
                id: "p1".to_string(),
                created_time: "2024-05-01T00:00:00Z".to_string(),
                created_by: "a".to_string(),
                last_edited_time: "2025-05-20T00:00:00Z".to_string(),
                last_edited_by: "b".to_string(),
                archived: false,
                title: Some("Roadmap".to_string()),
                url: None,
            },
            PageRecord {
                id: "p2".to_string(),
                created_time: "2022-01-01T00:00:00Z".to_string(),
                created_by: "a".to_string(),
                last_edited_time: "2022-01-01T00:00:00Z".to_string(),
                last_edited_by: "a".to_string(),
                archived: false,
                title: None,
                url: None,
            },
        ];
        let users: crate::models::UserDirectory = [
            (
                "a".to_string(),
                UserInfo {
                    id: "a".to_string(),
                    name: "Ada".to_string(),
                    email: None,
                    account_type: None,
                },
            ),
            (
                "b".to_string(),
                UserInfo {
                    id: "b".to_string(),
                    name: "Ben".to_string(),
                    email: None,
                    account_type: None,
                },
            ),
        ]
        .into_iter()
        .collect();
        let now = Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).unwrap();
        let results = WorkspaceAnalytics::new(&pages, users, AnalyticsConfig::default(), now)
            .unwrap()
            .run_all();
        ReportBuilder::new(&results, "Acme Workspace", ReportThresholds::default(), now).build()
    }

    #[test]
    fn test_report_contains_all_sections() {
        let report = sample_report();
        for heading in [
            "# Acme Workspace Analytics Report",
            "## Executive Summary",
            "## Growth & Velocity",
            "## User Analytics",
            "## Content Health",
            "## Collaboration Patterns",
            "## Cost Analysis",
            "## Risk Assessment",
            "## Detailed Tables",
        ] {
            assert!(report.contains(heading), "missing section: {}", heading);
        }
    }

    #[test]
    fn test_staleness_table_lists_every_bucket() {
        let report = sample_report();
        for label in [
            "Active (< 1 month)",
            "Fresh (1-3 months)",
            "Aging (3-6 months)",
            "Stale (6-12 months)",
            "Very Stale (12-24 months)",
            "Dead (24+ months)",
        ] {
            assert!(report.contains(label), "missing bucket: {}", label);
        }
    }

    #[test]
    fn test_collaboration_caveat_present() {
        let report = sample_report();
        assert!(report.contains("most recent"));
        assert!(report.contains("Collaboration Score"));
    }

    #[test]
    fn test_undefined_metrics_render_as_dash() {
        let now = Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).unwrap();
        let results = WorkspaceAnalytics::new(
            &[],
            crate::models::UserDirectory::new(),
            AnalyticsConfig::default(),
            now,
        )
        .unwrap()
        .run_all();
        let report =
            ReportBuilder::new(&results, "Empty", ReportThresholds::default(), now).build();
        assert!(report.contains("| **Cost per Active User** | - | - |"));
        assert!(report.contains("| **Average Collaboration Score** | - |"));
        assert!(report.contains("| **ROI** | - | - |"));
    }

    #[test]
    fn test_currency_formatting() {
        assert_eq!(fmt_money(0.0), "$0");
        assert_eq!(fmt_money(1234.56), "$1,235");
        assert_eq!(fmt_money(1_000_000.0), "$1,000,000");
        assert_eq!(fmt_money(-42.0), "-$42");
    }

    #[test]
    fn test_growth_cell_signs() {
        assert_eq!(fmt_growth(Some(12.5)), "+12.5%");
        assert_eq!(fmt_growth(Some(-3.0)), "-3.0%");
        assert_eq!(fmt_growth(None), "-");
    }
}
