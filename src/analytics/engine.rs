// Copyright (c) 2024-2026 Nervosys LLC
// SPDX-License-Identifier: AGPL-3.0-only
//! Workspace analytics engine
//!
//! Pure computation over an in-memory page table plus a user directory.
//! Nine independent metric groups: summary, growth, users, top creators,
//! content health, collaboration, structure, costs, risk. No I/O; the
//! caller supplies `now` so results are reproducible under test.

use chrono::{DateTime, Datelike, Duration, Utc};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

use super::view::{self, PageView, StalenessBucket, TemplateMatcher};
use crate::config::AnalyticsConfig;
use crate::error::Result;
use crate::models::{PageRecord, UserDirectory};

fn pct(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64 * 100.0
    }
}

fn round1(v: f64) -> f64 {
    (v * 10.0).round() / 10.0
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

fn round3(v: f64) -> f64 {
    (v * 1000.0).round() / 1000.0
}

// ============================================================================
// Result Types
// ============================================================================

/// Headline workspace numbers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryMetrics {
    /// All supplied records, including ones skipped for bad timestamps
    pub total_pages: usize,
    /// Records excluded from time-based metrics (unparsable timestamps)
    pub records_skipped: usize,
    /// Users currently in the directory
    pub total_users: usize,
    /// Distinct creator identities across all pages (current + deleted)
    pub active_contributors: usize,
    /// Creators that resolve in the directory
    pub current_creators: usize,
    /// Creator identities absent from the directory
    pub deleted_creators: usize,
    /// Directory users who never created a page
    pub inactive_users: usize,
    /// Pages at/past the stale cut
    pub stale_pages: usize,
    pub stale_percentage: f64,
    /// Directory seats * monthly cost * 12
    pub annual_cost: f64,
    /// Annual cost split over current creators; `None` with zero creators
    pub cost_per_active_user: Option<f64>,
}

/// Page-creation growth over time.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GrowthMetrics {
    /// Pages created per calendar year
    pub annual_counts: BTreeMap<i32, usize>,
    /// Year-over-year growth per year; `None` for the first observed year
    /// or when the prior year count is zero
    pub yoy_growth: BTreeMap<i32, Option<f64>>,
    /// Quarterly counts for the most recent calendar year in the data
    pub quarterly_latest_year: BTreeMap<String, usize>,
    /// Monthly counts for the 12 calendar months ending at the newest
    /// page's creation month (not wall clock, so output is deterministic)
    pub monthly_last_12: BTreeMap<String, usize>,
    pub avg_monthly_pages: f64,
}

/// Users per creation-rate segment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SegmentBreakdown {
    pub power_creators: usize,
    pub active_creators: usize,
    pub occasional_creators: usize,
    pub minimal_creators: usize,
    pub non_creators: usize,
}

impl SegmentBreakdown {
    pub fn total(&self) -> usize {
        self.power_creators
            + self.active_creators
            + self.occasional_creators
            + self.minimal_creators
            + self.non_creators
    }
}

/// User segmentation. Every directory user lands in exactly one segment;
/// deleted creators are tracked separately and never enter the five.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserMetrics {
    pub segments: SegmentBreakdown,
    /// Lifetime pages created by the users in each segment
    pub pages_by_segment: SegmentBreakdown,
    pub active_creator_percentage: f64,
    /// Deleted-creator pseudo-segment size
    pub deleted_creators: usize,
}

/// One row of the top-creator ranking.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TopCreator {
    pub user_id: String,
    pub name: String,
    pub page_count: usize,
    pub percentage: f64,
}

/// Per-user collaboration score.
///
/// Only defined for users with at least one created page; zero-creators
/// are excluded from the ranking rather than scored 0 or infinity.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CollaboratorScore {
    pub user_id: String,
    pub name: String,
    pub pages_created: usize,
    pub others_pages_edited: usize,
    pub collaboration_score: f64,
}

/// Workspace collaboration patterns.
///
/// The data source exposes only the first and last editor per page, so
/// these are a two-point proxy, not full edit history.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CollaborationMetrics {
    pub top_collaborators: Vec<CollaboratorScore>,
    /// Mean score over users with a defined score; `None` when no user
    /// has created a page
    pub average_collaboration_score: Option<f64>,
    pub collaborated_pages: usize,
    pub single_owner_pages: usize,
    pub collaboration_percentage: f64,
}

/// One staleness bucket with its share of pages.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StalenessRow {
    pub bucket: StalenessBucket,
    pub label: String,
    pub count: usize,
    pub percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContentHealthMetrics {
    /// All six buckets in freshness order, zero counts included
    pub staleness_distribution: Vec<StalenessRow>,
    pub stale_pages: usize,
    pub stale_percentage: f64,
    pub very_stale_pages: usize,
    pub very_stale_percentage: f64,
    pub abandoned_pages: usize,
    pub abandoned_percentage: f64,
    /// Abandoned pages whose creator is in the top-creator cohort
    pub abandoned_by_top_creators: usize,
    pub archived_pages: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StructureMetrics {
    pub template_count: usize,
    pub template_percentage: f64,
    pub non_template_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SegmentCost {
    pub users: usize,
    pub monthly_cost: f64,
    pub annual_cost: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CostMetrics {
    pub cost_by_segment: BTreeMap<String, SegmentCost>,
    pub total_annual_cost: f64,
    /// `None` when nobody has created a page
    pub cost_per_active_creator: Option<f64>,
    pub wasted_spend_annual: f64,
    /// `None` when the annual cost is zero
    pub wasted_spend_percentage: Option<f64>,
    pub total_creation_value: f64,
    /// `None` when the annual cost is zero
    pub roi_percentage: Option<f64>,
    pub monthly_cost_per_user: f64,
    pub blended_hourly_rate: f64,
    pub hours_per_page: f64,
}

/// One creator with their share of all created pages.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CreatorShare {
    pub user_id: String,
    pub name: String,
    pub page_count: usize,
    pub share_percentage: f64,
}

/// Cumulative page share held by a top percentile of users.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConcentrationTier {
    /// ceil(percentile * user population), minimum 1
    pub users: usize,
    pub pages: usize,
    pub percentage: f64,
    pub members: Vec<CreatorShare>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConcentrationMetrics {
    pub top_1_percent: ConcentrationTier,
    pub top_5_percent: ConcentrationTier,
    pub top_10_percent: ConcentrationTier,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RiskMetrics {
    pub concentration: ConcentrationMetrics,
    /// Inequality of per-user page counts over the whole population
    /// (zero-count users included), in [0, 1]
    pub gini_coefficient: f64,
    /// Minimum top creators whose cumulative share reaches 50%
    pub bus_factor: usize,
    pub bus_factor_users: Vec<CreatorShare>,
    /// Single-owner pages held by the top-creator cohort
    pub single_owner_pages_top_creators: usize,
}

/// Full engine output, one field per metric group.
///
/// All maps are ordered and all rankings carry deterministic tie-breaks,
/// so serializing the result twice for the same input is byte-identical.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisResult {
    pub summary: SummaryMetrics,
    pub growth: GrowthMetrics,
    pub users: UserMetrics,
    pub top_creators: Vec<TopCreator>,
    pub content_health: ContentHealthMetrics,
    pub collaboration: CollaborationMetrics,
    pub structure: StructureMetrics,
    pub costs: CostMetrics,
    pub risk: RiskMetrics,
}

// ============================================================================
// Engine
// ============================================================================

/// Analytics engine over one workspace snapshot.
pub struct WorkspaceAnalytics {
    views: Vec<PageView>,
    users: UserDirectory,
    config: AnalyticsConfig,
    total_records: usize,
    skipped_records: usize,
}

impl WorkspaceAnalytics {
    /// Build the engine with the default template matcher.
    ///
    /// Fails fast on an invalid configuration; per-record data problems
    /// never fail construction.
    pub fn new(
        pages: &[PageRecord],
        users: UserDirectory,
        config: AnalyticsConfig,
        now: DateTime<Utc>,
    ) -> Result<Self> {
        Self::with_matcher(pages, users, TemplateMatcher::default(), config, now)
    }

    /// Build the engine with an injected template matcher.
    pub fn with_matcher(
        pages: &[PageRecord],
        users: UserDirectory,
        matcher: TemplateMatcher,
        config: AnalyticsConfig,
        now: DateTime<Utc>,
    ) -> Result<Self> {
        config.validate()?;
        let normalized = view::normalize(pages, &users, &matcher, &config, now);
        if normalized.skipped > 0 {
            log::warn!(
                "{} of {} records skipped for unparsable timestamps",
                normalized.skipped,
                normalized.total
            );
        }
        Ok(Self {
            views: normalized.views,
            users,
            config,
            total_records: normalized.total,
            skipped_records: normalized.skipped,
        })
    }

    /// Run every metric group.
    pub fn run_all(&self) -> AnalysisResult {
        AnalysisResult {
            summary: self.analyze_summary(),
            growth: self.analyze_growth(),
            users: self.analyze_users(),
            top_creators: self.analyze_top_creators(),
            content_health: self.analyze_content_health(),
            collaboration: self.analyze_collaboration(),
            structure: self.analyze_structure(),
            costs: self.analyze_costs(),
            risk: self.analyze_risk(),
        }
    }

    // ------------------------------------------------------------------------
    // Shared helpers
    // ------------------------------------------------------------------------

    /// Lifetime created-page count per creator identity.
    fn pages_per_creator(&self) -> BTreeMap<&str, usize> {
        let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
        for view in &self.views {
            *counts.entry(view.created_by.as_str()).or_insert(0) += 1;
        }
        counts
    }

    /// Creators ranked by page count descending, ties broken by user id
    /// ascending.
    fn ranked_creators(&self) -> Vec<(&str, usize)> {
        let mut ranked: Vec<(&str, usize)> = self.pages_per_creator().into_iter().collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(b.0)));
        ranked
    }

    fn display_name(&self, user_id: &str) -> String {
        view::display_name(user_id, &self.users)
    }

    /// Ids of the top `top_creators_limit` creators.
    fn top_creator_ids(&self) -> BTreeSet<&str> {
        self.ranked_creators()
            .into_iter()
            .take(self.config.top_creators_limit)
            .map(|(id, _)| id)
            .collect()
    }

    /// Distinct creator identities absent from the directory.
    fn deleted_creator_count(&self) -> usize {
        self.pages_per_creator()
            .keys()
            .filter(|id| !self.users.contains_key(**id))
            .count()
    }

    // ------------------------------------------------------------------------
    // Summary
    // ------------------------------------------------------------------------

    fn analyze_summary(&self) -> SummaryMetrics {
        let total_users = self.users.len();
        let creators = self.pages_per_creator();
        let active_contributors = creators.len();
        let current_creators = creators
            .keys()
            .filter(|id| self.users.contains_key(**id))
            .count();
        let deleted_creators = active_contributors - current_creators;
        let inactive_users = total_users - current_creators;

        let stale_pages = self
            .views
            .iter()
            .filter(|v| v.staleness.counts_as_stale())
            .count();

        let annual_cost = total_users as f64 * self.config.monthly_cost_per_user * 12.0;
        let cost_per_active_user = if current_creators > 0 {
            Some(round2(annual_cost / current_creators as f64))
        } else {
            None
        };

        SummaryMetrics {
            total_pages: self.total_records,
            records_skipped: self.skipped_records,
            total_users,
            active_contributors,
            current_creators,
            deleted_creators,
            inactive_users,
            stale_pages,
            stale_percentage: round1(pct(stale_pages, self.views.len())),
            annual_cost,
            cost_per_active_user,
        }
    }

    // ------------------------------------------------------------------------
    // Growth
    // ------------------------------------------------------------------------

    fn analyze_growth(&self) -> GrowthMetrics {
        let mut annual_counts: BTreeMap<i32, usize> = BTreeMap::new();
        for view in &self.views {
            *annual_counts.entry(view.created_year).or_insert(0) += 1;
        }

        let mut yoy_growth: BTreeMap<i32, Option<f64>> = BTreeMap::new();
        let mut prev: Option<usize> = None;
        for (&year, &count) in &annual_counts {
            let growth = match prev {
                Some(p) if p > 0 => Some(round1((count as f64 - p as f64) / p as f64 * 100.0)),
                _ => None,
            };
            yoy_growth.insert(year, growth);
            prev = Some(count);
        }

        let latest_year = annual_counts.keys().next_back().copied();
        let mut quarterly_latest_year: BTreeMap<String, usize> = BTreeMap::new();
        if let Some(year) = latest_year {
            for view in self.views.iter().filter(|v| v.created_year == year) {
                *quarterly_latest_year
                    .entry(view.created_quarter.clone())
                    .or_insert(0) += 1;
            }
        }

        // Trailing 12 calendar months, anchored at the newest page.
        let mut monthly_last_12: BTreeMap<String, usize> = BTreeMap::new();
        if let Some(anchor) = self.views.iter().map(|v| v.created).max() {
            let month_index = |t: &DateTime<Utc>| t.year() as i64 * 12 + t.month0() as i64;
            let anchor_idx = month_index(&anchor);
            for view in &self.views {
                let idx = month_index(&view.created);
                if idx <= anchor_idx && anchor_idx - idx < 12 {
                    *monthly_last_12.entry(view.created_month.clone()).or_insert(0) += 1;
                }
            }
        }

        let avg_monthly_pages = if monthly_last_12.is_empty() {
            0.0
        } else {
            round1(
                monthly_last_12.values().sum::<usize>() as f64 / monthly_last_12.len() as f64,
            )
        };

        GrowthMetrics {
            annual_counts,
            yoy_growth,
            quarterly_latest_year,
            monthly_last_12,
            avg_monthly_pages,
        }
    }

    // ------------------------------------------------------------------------
    // Users
    // ------------------------------------------------------------------------

    /// Annualized creation rate per directory user: pages created inside
    /// the trailing window anchored at the newest page, or lifetime totals
    /// when no window is configured.
    fn annual_rates(&self) -> BTreeMap<&str, f64> {
        let lifetime = self.pages_per_creator();
        let anchor = self.views.iter().map(|v| v.created).max();

        match (self.config.segmentation_window_days, anchor) {
            (Some(days), Some(anchor)) => {
                let cutoff = anchor - Duration::days(days);
                let mut windowed: BTreeMap<&str, f64> = BTreeMap::new();
                for view in &self.views {
                    if view.created > cutoff {
                        *windowed.entry(view.created_by.as_str()).or_insert(0.0) += 1.0;
                    }
                }
                windowed
            }
            _ => lifetime
                .into_iter()
                .map(|(id, count)| (id, count as f64))
                .collect(),
        }
    }

    fn analyze_users(&self) -> UserMetrics {
        let lifetime = self.pages_per_creator();
        let rates = self.annual_rates();

        let mut segments = SegmentBreakdown::default();
        let mut pages_by_segment = SegmentBreakdown::default();

        for user_id in self.users.keys() {
            let rate = rates.get(user_id.as_str()).copied().unwrap_or(0.0);
            let pages = lifetime.get(user_id.as_str()).copied().unwrap_or(0);

            if rate >= self.config.power_user_threshold {
                segments.power_creators += 1;
                pages_by_segment.power_creators += pages;
            } else if rate >= self.config.active_user_threshold {
                segments.active_creators += 1;
                pages_by_segment.active_creators += pages;
            } else if rate >= self.config.occasional_user_threshold {
                segments.occasional_creators += 1;
                pages_by_segment.occasional_creators += pages;
            } else if rate > 0.0 {
                segments.minimal_creators += 1;
                pages_by_segment.minimal_creators += pages;
            } else {
                segments.non_creators += 1;
            }
        }

        let total_users = self.users.len();
        let active_creators = total_users - segments.non_creators;

        UserMetrics {
            segments,
            pages_by_segment,
            active_creator_percentage: round1(pct(active_creators, total_users)),
            deleted_creators: self.deleted_creator_count(),
        }
    }

    // ------------------------------------------------------------------------
    // Top Creators
    // ------------------------------------------------------------------------

    fn analyze_top_creators(&self) -> Vec<TopCreator> {
        let total = self.views.len();
        self.ranked_creators()
            .into_iter()
            .take(self.config.top_creators_limit)
            .map(|(id, count)| TopCreator {
                user_id: id.to_string(),
                name: self.display_name(id),
                page_count: count,
                percentage: round1(pct(count, total)),
            })
            .collect()
    }

    // ------------------------------------------------------------------------
    // Collaboration
    // ------------------------------------------------------------------------

    fn analyze_collaboration(&self) -> CollaborationMetrics {
        let created = self.pages_per_creator();

        // Pages a user last-edited but did not create.
        let mut edited_others: BTreeMap<&str, usize> = BTreeMap::new();
        for view in &self.views {
            if view.is_collaborated() {
                *edited_others.entry(view.last_edited_by.as_str()).or_insert(0) += 1;
            }
        }

        // Score defined only for users with at least one created page.
        let mut scores: Vec<CollaboratorScore> = created
            .iter()
            .map(|(&id, &pages_created)| {
                let others = edited_others.get(id).copied().unwrap_or(0);
                CollaboratorScore {
                    user_id: id.to_string(),
                    name: self.display_name(id),
                    pages_created,
                    others_pages_edited: others,
                    collaboration_score: round1(others as f64 / pages_created as f64 * 100.0),
                }
            })
            .collect();

        let average_collaboration_score = if scores.is_empty() {
            None
        } else {
            let sum: f64 = scores.iter().map(|s| s.collaboration_score).sum();
            Some(round1(sum / scores.len() as f64))
        };

        scores.sort_by(|a, b| {
            b.collaboration_score
                .partial_cmp(&a.collaboration_score)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.user_id.cmp(&b.user_id))
        });
        scores.truncate(self.config.top_creators_limit);

        let collaborated_pages = self.views.iter().filter(|v| v.is_collaborated()).count();
        let single_owner_pages = self.views.len() - collaborated_pages;

        CollaborationMetrics {
            top_collaborators: scores,
            average_collaboration_score,
            collaborated_pages,
            single_owner_pages,
            collaboration_percentage: round1(pct(collaborated_pages, self.views.len())),
        }
    }

    // ------------------------------------------------------------------------
    // Content Health
    // ------------------------------------------------------------------------

    fn analyze_content_health(&self) -> ContentHealthMetrics {
        let total = self.views.len();

        let mut bucket_counts: BTreeMap<StalenessBucket, usize> = BTreeMap::new();
        for view in &self.views {
            *bucket_counts.entry(view.staleness).or_insert(0) += 1;
        }
        let staleness_distribution = StalenessBucket::ALL
            .iter()
            .map(|bucket| {
                let count = bucket_counts.get(bucket).copied().unwrap_or(0);
                StalenessRow {
                    bucket: *bucket,
                    label: bucket.label().to_string(),
                    count,
                    percentage: round1(pct(count, total)),
                }
            })
            .collect();

        let stale_pages = self
            .views
            .iter()
            .filter(|v| v.staleness.counts_as_stale())
            .count();
        let very_stale_pages = self
            .views
            .iter()
            .filter(|v| v.days_since_edit >= self.config.very_stale_threshold_days)
            .count();
        let abandoned_pages = self.views.iter().filter(|v| v.is_abandoned).count();
        let archived_pages = self.views.iter().filter(|v| v.archived).count();

        let top_ids = self.top_creator_ids();
        let abandoned_by_top_creators = self
            .views
            .iter()
            .filter(|v| v.is_abandoned && top_ids.contains(v.created_by.as_str()))
            .count();

        ContentHealthMetrics {
            staleness_distribution,
            stale_pages,
            stale_percentage: round1(pct(stale_pages, total)),
            very_stale_pages,
            very_stale_percentage: round1(pct(very_stale_pages, total)),
            abandoned_pages,
            abandoned_percentage: round1(pct(abandoned_pages, total)),
            abandoned_by_top_creators,
            archived_pages,
        }
    }

    // ------------------------------------------------------------------------
    // Structure
    // ------------------------------------------------------------------------

    fn analyze_structure(&self) -> StructureMetrics {
        let total = self.views.len();
        let template_count = self.views.iter().filter(|v| v.is_template).count();

        StructureMetrics {
            template_count,
            template_percentage: round1(pct(template_count, total)),
            non_template_count: total - template_count,
        }
    }

    // ------------------------------------------------------------------------
    // Costs
    // ------------------------------------------------------------------------

    fn analyze_costs(&self) -> CostMetrics {
        let monthly = self.config.monthly_cost_per_user;
        let user_metrics = self.analyze_users();
        let segments = user_metrics.segments;

        let mut cost_by_segment = BTreeMap::new();
        for (name, count) in [
            ("power_creators", segments.power_creators),
            ("active_creators", segments.active_creators),
            ("occasional_creators", segments.occasional_creators),
            ("minimal_creators", segments.minimal_creators),
            ("non_creators", segments.non_creators),
        ] {
            let monthly_cost = count as f64 * monthly;
            cost_by_segment.insert(
                name.to_string(),
                SegmentCost {
                    users: count,
                    monthly_cost,
                    annual_cost: monthly_cost * 12.0,
                },
            );
        }

        let total_annual_cost = self.users.len() as f64 * monthly * 12.0;

        let active_creator_count = self.pages_per_creator().len();
        let cost_per_active_creator = if active_creator_count > 0 {
            Some(round2(total_annual_cost / active_creator_count as f64))
        } else {
            None
        };

        let mut wasted_seats = segments.non_creators;
        if self.config.include_minimal_in_waste {
            wasted_seats += segments.minimal_creators;
        }
        let wasted_spend_annual = wasted_seats as f64 * monthly * 12.0;
        let wasted_spend_percentage = if total_annual_cost > 0.0 {
            Some(round1(wasted_spend_annual / total_annual_cost * 100.0))
        } else {
            None
        };

        let total_creation_value = self.total_records as f64
            * self.config.hours_per_page
            * self.config.blended_hourly_rate
            * self.config.reuse_factor;
        let roi_percentage = if total_annual_cost > 0.0 {
            Some(round1(
                (total_creation_value - total_annual_cost) / total_annual_cost * 100.0,
            ))
        } else {
            None
        };

        CostMetrics {
            cost_by_segment,
            total_annual_cost,
            cost_per_active_creator,
            wasted_spend_annual,
            wasted_spend_percentage,
            total_creation_value,
            roi_percentage,
            monthly_cost_per_user: monthly,
            blended_hourly_rate: self.config.blended_hourly_rate,
            hours_per_page: self.config.hours_per_page,
        }
    }

    // ------------------------------------------------------------------------
    // Risk
    // ------------------------------------------------------------------------

    fn analyze_risk(&self) -> RiskMetrics {
        let ranked = self.ranked_creators();
        let total_pages = self.views.len();
        // Inequality is measured across every identity that can hold
        // pages: directory users plus deleted creators.
        let population = self.users.len() + self.deleted_creator_count();

        let tier = |fraction: f64| -> ConcentrationTier {
            let cohort = if population == 0 {
                0
            } else {
                ((fraction * population as f64).ceil() as usize).max(1)
            };
            let members: Vec<CreatorShare> = ranked
                .iter()
                .take(cohort)
                .map(|&(id, count)| CreatorShare {
                    user_id: id.to_string(),
                    name: self.display_name(id),
                    page_count: count,
                    share_percentage: round1(pct(count, total_pages)),
                })
                .collect();
            let pages: usize = members.iter().map(|m| m.page_count).sum();
            ConcentrationTier {
                users: cohort,
                percentage: round1(pct(pages, total_pages)),
                pages,
                members,
            }
        };

        let concentration = ConcentrationMetrics {
            top_1_percent: tier(0.01),
            top_5_percent: tier(0.05),
            top_10_percent: tier(0.10),
        };

        let mut counts: Vec<usize> = ranked.iter().map(|&(_, c)| c).collect();
        counts.resize(population.max(counts.len()), 0);
        let gini_coefficient = round3(gini(&mut counts));

        // Bus factor: walk the ranking until half the pages are covered.
        let mut bus_factor_users = Vec::new();
        let mut cumulative = 0usize;
        for &(id, count) in &ranked {
            cumulative += count;
            bus_factor_users.push(CreatorShare {
                user_id: id.to_string(),
                name: self.display_name(id),
                page_count: count,
                share_percentage: round1(pct(count, total_pages)),
            });
            if total_pages > 0 && cumulative * 2 >= total_pages {
                break;
            }
        }
        let bus_factor = if total_pages == 0 {
            0
        } else {
            bus_factor_users.len()
        };
        if total_pages == 0 {
            bus_factor_users.clear();
        }

        let top_ids = self.top_creator_ids();
        let single_owner_pages_top_creators = self
            .views
            .iter()
            .filter(|v| v.is_single_owner && top_ids.contains(v.created_by.as_str()))
            .count();

        RiskMetrics {
            concentration,
            gini_coefficient,
            bus_factor,
            bus_factor_users,
            single_owner_pages_top_creators,
        }
    }
}

/// Discrete Gini coefficient over per-user page counts.
///
/// `G = (2 * Σ i*x_i) / (n * Σ x_i) - (n+1)/n` with `x` sorted ascending
/// and 1-based rank `i`. Zero when the total is zero or n <= 1.
fn gini(values: &mut [usize]) -> f64 {
    let n = values.len();
    if n <= 1 {
        return 0.0;
    }
    let total: usize = values.iter().sum();
    if total == 0 {
        return 0.0;
    }
    values.sort_unstable();
    let weighted: f64 = values
        .iter()
        .enumerate()
        .map(|(i, &x)| (i as f64 + 1.0) * x as f64)
        .sum();
    let n_f = n as f64;
    (2.0 * weighted) / (n_f * total as f64) - (n_f + 1.0) / n_f
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::UserInfo;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).unwrap()
    }

    fn user(id: &str, name: &str) -> (String, UserInfo) {
        (
            id.to_string(),
            UserInfo {
                id: id.to_string(),
                name: name.to_string(),
                email: None,
                account_type: Some("person".to_string()),
            },
        )
    }

    fn page(id: &str, created: &str, creator: &str, edited: &str, editor: &str) -> PageRecord {
        PageRecord {
            id: id.to_string(),
            created_time: created.to_string(),
            created_by: creator.to_string(),
            last_edited_time: edited.to_string(),
            last_edited_by: editor.to_string(),
            archived: false,
            title: None,
            url: None,
        }
    }

    fn engine(pages: Vec<PageRecord>, users: Vec<(String, UserInfo)>) -> WorkspaceAnalytics {
        WorkspaceAnalytics::new(
            &pages,
            users.into_iter().collect(),
            AnalyticsConfig::default(),
            now(),
        )
        .unwrap()
    }

    #[test]
    fn test_invalid_config_aborts_before_any_computation() {
        let config = AnalyticsConfig {
            stale_threshold_days: 800,
            ..AnalyticsConfig::default()
        };
        let result = WorkspaceAnalytics::new(&[], UserDirectory::new(), config, now());
        assert!(result.is_err());
    }

    #[test]
    fn test_empty_input_yields_neutral_values() {
        let result = engine(vec![], vec![]).run_all();
        assert_eq!(result.summary.total_pages, 0);
        assert_eq!(result.summary.cost_per_active_user, None);
        assert!(result.growth.annual_counts.is_empty());
        assert_eq!(result.collaboration.average_collaboration_score, None);
        assert_eq!(result.costs.roi_percentage, None);
        assert_eq!(result.risk.bus_factor, 0);
        assert_eq!(result.risk.gini_coefficient, 0.0);
        assert!(result.risk.bus_factor_users.is_empty());
    }

    #[test]
    fn test_segments_sum_to_total_user_count() {
        let pages = vec![
            page("p1", "2025-05-01T00:00:00Z", "a", "2025-05-02T00:00:00Z", "a"),
            page("p2", "2025-05-01T00:00:00Z", "a", "2025-05-02T00:00:00Z", "b"),
            page("p3", "2025-05-01T00:00:00Z", "b", "2025-05-01T00:00:00Z", "b"),
            page("p4", "2025-05-01T00:00:00Z", "ghost", "2025-05-01T00:00:00Z", "ghost"),
        ];
        let users = vec![user("a", "Ada"), user("b", "Ben"), user("c", "Cal")];
        let result = engine(pages, users).run_all();
        assert_eq!(result.users.segments.total(), 3);
        // "ghost" is a deleted creator, never folded into the five segments.
        assert_eq!(result.users.deleted_creators, 1);
        assert_eq!(result.users.segments.non_creators, 1); // Cal
    }

    #[test]
    fn test_editor_without_creations_is_non_creator() {
        let pages = vec![page(
            "p1",
            "2025-05-01T00:00:00Z",
            "a",
            "2025-05-02T00:00:00Z",
            "b",
        )];
        let users = vec![user("a", "Ada"), user("b", "Ben")];
        let result = engine(pages, users).run_all();
        // Ben edited but never created: still a non-creator.
        assert_eq!(result.users.segments.non_creators, 1);
        assert_eq!(result.users.segments.minimal_creators, 1);
    }

    #[test]
    fn test_gini_zero_for_equal_distribution() {
        let mut all_zero = vec![0, 0, 0, 0];
        assert_eq!(gini(&mut all_zero), 0.0);
        let mut equal = vec![7, 7, 7];
        assert!(gini(&mut equal).abs() < 1e-12);
        let mut single = vec![42];
        assert_eq!(gini(&mut single), 0.0);
    }

    #[test]
    fn test_gini_monotone_under_concentration() {
        // Two users; shifting pages to one of them raises G.
        let mut previous = -1.0;
        for held in [5usize, 6, 7, 8, 9, 10] {
            let mut values = vec![10 - held, held];
            let g = gini(&mut values);
            assert!(g > previous, "gini not monotone at {}", held);
            assert!((0.0..=1.0).contains(&g));
            previous = g;
        }
    }

    #[test]
    fn test_bus_factor_grows_as_distribution_equalizes() {
        let now_ts = "2025-05-01T00:00:00Z";
        let make = |counts: &[usize]| {
            let mut pages = Vec::new();
            for (u, &count) in counts.iter().enumerate() {
                for i in 0..count {
                    pages.push(page(
                        &format!("p-{}-{}", u, i),
                        now_ts,
                        &format!("u{}", u),
                        now_ts,
                        &format!("u{}", u),
                    ));
                }
            }
            let users = (0..counts.len())
                .map(|u| user(&format!("u{}", u), &format!("User {}", u)))
                .collect();
            engine(pages, users).run_all().risk.bus_factor
        };

        let concentrated = make(&[8, 1, 1]);
        let balanced = make(&[4, 3, 3]);
        let equal = make(&[4, 4, 4]);
        assert_eq!(concentrated, 1);
        assert!(balanced >= concentrated);
        assert!(equal >= balanced);
    }

    #[test]
    fn test_collaboration_score_excludes_zero_creators() {
        let pages = vec![
            // Ben created both pages; Ada last-edited one of them.
            page("p1", "2025-05-01T00:00:00Z", "b", "2025-05-02T00:00:00Z", "a"),
            page("p2", "2025-05-01T00:00:00Z", "b", "2025-05-01T00:00:00Z", "b"),
        ];
        let users = vec![user("a", "Ada"), user("b", "Ben")];
        let result = engine(pages, users).run_all();
        // Ada created nothing: no score, despite editing others' pages.
        assert!(result
            .collaboration
            .top_collaborators
            .iter()
            .all(|s| s.user_id != "a"));
        let ben = result
            .collaboration
            .top_collaborators
            .iter()
            .find(|s| s.user_id == "b")
            .unwrap();
        // Every edit Ben made was on his own pages: exactly 0, not undefined.
        assert_eq!(ben.collaboration_score, 0.0);
        assert_eq!(result.collaboration.collaborated_pages, 1);
        assert_eq!(result.collaboration.single_owner_pages, 1);
    }

    #[test]
    fn test_first_year_growth_is_undefined_not_zero() {
        let pages = vec![
            page("p1", "2023-03-01T00:00:00Z", "a", "2023-03-01T00:00:00Z", "a"),
            page("p2", "2024-03-01T00:00:00Z", "a", "2024-03-01T00:00:00Z", "a"),
            page("p3", "2024-04-01T00:00:00Z", "a", "2024-04-01T00:00:00Z", "a"),
        ];
        let result = engine(pages, vec![user("a", "Ada")]).run_all();
        assert_eq!(result.growth.yoy_growth.get(&2023), Some(&None));
        assert_eq!(result.growth.yoy_growth.get(&2024), Some(&Some(100.0)));
    }

    #[test]
    fn test_quarterly_limited_to_latest_year_and_monthly_to_trailing_window() {
        let pages = vec![
            page("p1", "2023-07-01T00:00:00Z", "a", "2023-07-01T00:00:00Z", "a"),
            page("p2", "2024-02-10T00:00:00Z", "a", "2024-02-10T00:00:00Z", "a"),
            page("p3", "2024-08-10T00:00:00Z", "a", "2024-08-10T00:00:00Z", "a"),
        ];
        let result = engine(pages, vec![user("a", "Ada")]).run_all();
        // Quarterly: only 2024 quarters appear.
        assert!(result
            .growth
            .quarterly_latest_year
            .keys()
            .all(|q| q.starts_with("2024")));
        // Monthly window runs Sep 2023 through Aug 2024: 2023-07 is out.
        assert!(!result.growth.monthly_last_12.contains_key("2023-07"));
        assert_eq!(result.growth.monthly_last_12.get("2024-02"), Some(&1));
        assert_eq!(result.growth.monthly_last_12.get("2024-08"), Some(&1));
    }

    #[test]
    fn test_single_creator_scenario() {
        // 10 pages, all by Ada, never touched by anyone else.
        let pages: Vec<PageRecord> = (0..10)
            .map(|i| {
                page(
                    &format!("p{}", i),
                    "2025-05-01T00:00:00Z",
                    "a",
                    "2025-05-01T00:00:00Z",
                    "a",
                )
            })
            .collect();
        let users = vec![user("a", "Ada"), user("b", "Ben"), user("c", "Cal")];
        let result = engine(pages, users).run_all();

        assert_eq!(result.collaboration.single_owner_pages, 10);
        assert_eq!(result.collaboration.collaborated_pages, 0);
        let ada = &result.collaboration.top_collaborators[0];
        assert_eq!(ada.user_id, "a");
        assert_eq!(ada.collaboration_score, 0.0);
        assert_eq!(result.risk.bus_factor, 1);
        assert_eq!(result.risk.bus_factor_users[0].name, "Ada");
        assert_eq!(result.risk.bus_factor_users[0].share_percentage, 100.0);
        // Three users, one holding everything: G = (n-1)/n = 0.667.
        assert_eq!(result.risk.gini_coefficient, 0.667);
    }

    #[test]
    fn test_deleted_creator_tracked_as_pseudo_segment() {
        let pages = vec![
            page("p1", "2025-05-01T00:00:00Z", "gone-user-id", "2025-05-01T00:00:00Z", "gone-user-id"),
            page("p2", "2025-05-01T00:00:00Z", "a", "2025-05-01T00:00:00Z", "a"),
        ];
        let users = vec![user("a", "Ada")];
        let result = engine(pages, users).run_all();

        assert_eq!(result.summary.deleted_creators, 1);
        assert_eq!(result.summary.current_creators, 1);
        assert_eq!(result.summary.active_contributors, 2);
        // The deleted creator's page never lands in Ada's tally.
        let ada = result
            .top_creators
            .iter()
            .find(|c| c.user_id == "a")
            .unwrap();
        assert_eq!(ada.page_count, 1);
        let ghost = result
            .top_creators
            .iter()
            .find(|c| c.user_id == "gone-user-id")
            .unwrap();
        assert_eq!(ghost.name, "Deleted User (gone-use)");
        assert_eq!(ghost.page_count, 1);
    }

    #[test]
    fn test_top_creator_ties_break_by_user_id() {
        let pages = vec![
            page("p1", "2025-05-01T00:00:00Z", "zed", "2025-05-01T00:00:00Z", "zed"),
            page("p2", "2025-05-01T00:00:00Z", "amy", "2025-05-01T00:00:00Z", "amy"),
        ];
        let users = vec![user("amy", "Amy"), user("zed", "Zed")];
        let result = engine(pages, users).run_all();
        assert_eq!(result.top_creators[0].user_id, "amy");
        assert_eq!(result.top_creators[1].user_id, "zed");
    }

    #[test]
    fn test_concentration_cohort_rounds_up_with_minimum_one() {
        let pages = vec![page(
            "p1",
            "2025-05-01T00:00:00Z",
            "a",
            "2025-05-01T00:00:00Z",
            "a",
        )];
        // 31 users: ceil(0.01 * 31) = 1, ceil(0.05 * 31) = 2, ceil(0.10 * 31) = 4.
        let mut users: Vec<_> = (0..30)
            .map(|i| user(&format!("u{:02}", i), &format!("User {}", i)))
            .collect();
        users.push(user("a", "Ada"));
        let result = engine(pages, users).run_all();
        assert_eq!(result.risk.concentration.top_1_percent.users, 1);
        assert_eq!(result.risk.concentration.top_5_percent.users, 2);
        assert_eq!(result.risk.concentration.top_10_percent.users, 4);
        assert_eq!(result.risk.concentration.top_1_percent.percentage, 100.0);
    }

    #[test]
    fn test_stale_page_at_exact_threshold() {
        // NOW is 2025-06-01; 365 days earlier is 2024-06-01.
        let pages = vec![
            page("p1", "2024-01-01T00:00:00Z", "a", "2024-06-01T00:00:00Z", "a"),
            page("p2", "2024-01-01T00:00:00Z", "a", "2024-06-02T00:00:00Z", "a"),
        ];
        let result = engine(pages, vec![user("a", "Ada")]).run_all();
        assert_eq!(result.summary.stale_pages, 1);
        assert_eq!(result.content_health.stale_pages, 1);
    }

    #[test]
    fn test_malformed_record_counted_but_excluded() {
        let pages = vec![
            page("good", "2025-05-01T00:00:00Z", "a", "2025-05-01T00:00:00Z", "a"),
            page("bad", "garbage", "a", "also-garbage", "a"),
        ];
        let result = engine(pages, vec![user("a", "Ada")]).run_all();
        assert_eq!(result.summary.total_pages, 2);
        assert_eq!(result.summary.records_skipped, 1);
        assert_eq!(result.top_creators[0].page_count, 1);
    }

    #[test]
    fn test_run_all_is_deterministic() {
        let pages = vec![
            page("p1", "2024-05-01T00:00:00Z", "a", "2024-06-01T00:00:00Z", "b"),
            page("p2", "2023-01-01T00:00:00Z", "b", "2023-01-01T00:00:00Z", "b"),
            page("p3", "2025-02-01T00:00:00Z", "ghost", "2025-03-01T00:00:00Z", "a"),
        ];
        let users = vec![user("a", "Ada"), user("b", "Ben")];
        let first = engine(pages.clone(), users.clone()).run_all();
        let second = engine(pages, users).run_all();
        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
    }

    #[test]
    fn test_costs_guard_divide_by_zero() {
        let config = AnalyticsConfig {
            monthly_cost_per_user: 0.0,
            ..AnalyticsConfig::default()
        };
        let pages = vec![page(
            "p1",
            "2025-05-01T00:00:00Z",
            "a",
            "2025-05-01T00:00:00Z",
            "a",
        )];
        let users: UserDirectory = vec![user("a", "Ada")].into_iter().collect();
        let result = WorkspaceAnalytics::new(&pages, users, config, now())
            .unwrap()
            .run_all();
        assert_eq!(result.costs.total_annual_cost, 0.0);
        assert_eq!(result.costs.roi_percentage, None);
        assert_eq!(result.costs.wasted_spend_percentage, None);
    }

    #[test]
    fn test_cost_by_segment_and_waste() {
        // Ada creates 6 pages recently (occasional), Ben none.
        let pages: Vec<PageRecord> = (0..6)
            .map(|i| {
                page(
                    &format!("p{}", i),
                    "2025-05-01T00:00:00Z",
                    "a",
                    "2025-05-01T00:00:00Z",
                    "a",
                )
            })
            .collect();
        let users = vec![user("a", "Ada"), user("b", "Ben")];
        let result = engine(pages, users).run_all();

        let occasional = &result.costs.cost_by_segment["occasional_creators"];
        assert_eq!(occasional.users, 1);
        assert_eq!(occasional.annual_cost, 144.0);
        assert_eq!(result.costs.total_annual_cost, 288.0);
        // Ben's seat is the wasted one.
        assert_eq!(result.costs.wasted_spend_annual, 144.0);
        assert_eq!(result.costs.wasted_spend_percentage, Some(50.0));
        // 6 pages * 1h * $48.
        assert_eq!(result.costs.total_creation_value, 288.0);
        assert_eq!(result.costs.roi_percentage, Some(0.0));
    }

    #[test]
    fn test_now_is_parameterized_not_wall_clock() {
        let pages = vec![page(
            "p1",
            "2024-01-01T00:00:00Z",
            "a",
            "2024-01-01T00:00:00Z",
            "a",
        )];
        let users: UserDirectory = vec![user("a", "Ada")].into_iter().collect();
        let later = Utc.with_ymd_and_hms(2027, 1, 1, 0, 0, 0).unwrap();
        let fresh = WorkspaceAnalytics::new(
            &pages,
            users.clone(),
            AnalyticsConfig::default(),
            Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap(),
        )
        .unwrap()
        .run_all();
        let old = WorkspaceAnalytics::new(&pages, users, AnalyticsConfig::default(), later)
            .unwrap()
            .run_all();
        assert_eq!(fresh.summary.stale_pages, 0);
        assert_eq!(old.summary.stale_pages, 1);
    }
}
