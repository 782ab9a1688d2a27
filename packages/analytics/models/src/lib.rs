#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Aggregation result types and dashboard view shapes.
//!
//! Each type here is the exact input of one dashboard view. Views render
//! these values as-is and never filter or aggregate on their own.

use incident_dashboard_incident_models::{FilterCriteria, Incident, YearRange};
use serde::{Deserialize, Serialize};

/// Display text for a metric that is undefined on an empty selection.
pub const NOT_AVAILABLE: &str = "N/A";

/// Count of incidents sharing one category value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryCount {
    /// Category value (state, attack type, perpetrator group, ...).
    pub category: String,
    /// Number of incidents.
    pub count: u64,
}

/// A time-series data point.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeSeriesPoint {
    /// Period label, e.g. `"2025-01"`.
    pub period: String,
    /// Incident count in this period.
    pub count: u64,
}

/// Incident count for one month of the year, across all years.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthCount {
    /// Month number, 1-12.
    pub month: u32,
    /// Short English month name ("Jan" .. "Dec").
    pub month_name: String,
    /// Number of incidents.
    pub count: u64,
}

/// Sum, mean and size of one non-empty group.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupStats {
    /// Sum of the grouped value.
    pub sum: u64,
    /// `sum / count`.
    pub mean: f64,
    /// Number of members. Always at least 1.
    pub count: u64,
}

impl GroupStats {
    /// Builds stats from running totals. Returns `None` for an empty group,
    /// whose mean is undefined.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn from_totals(sum: u64, count: u64) -> Option<Self> {
        (count > 0).then(|| Self {
            sum,
            mean: sum as f64 / count as f64,
            count,
        })
    }
}

/// [`GroupStats`] labelled with its group, for ranked list views.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupSummary {
    /// Group value.
    pub group: String,
    /// Stats for the group.
    #[serde(flatten)]
    pub stats: GroupStats,
}

/// Headline metrics of a filtered selection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyMetrics {
    /// Number of incidents.
    pub total_incidents: u64,
    /// Sum of casualties, absent counts contributing zero.
    pub total_casualties: u64,
    /// `total_casualties / total_incidents`; `None` for an empty selection.
    pub mean_casualties: Option<f64>,
    /// Most frequent attack type; `None` for an empty selection.
    pub most_common_attack_type: Option<String>,
}

impl KeyMetrics {
    /// Mean casualties rounded to two decimals, or [`NOT_AVAILABLE`].
    #[must_use]
    pub fn mean_casualties_display(&self) -> String {
        self.mean_casualties
            .map_or_else(|| NOT_AVAILABLE.to_string(), |mean| format!("{mean:.2}"))
    }

    /// Most common attack type, or [`NOT_AVAILABLE`].
    #[must_use]
    pub fn most_common_attack_type_display(&self) -> &str {
        self.most_common_attack_type
            .as_deref()
            .unwrap_or(NOT_AVAILABLE)
    }
}

/// Choices offered by the filter controls for a dataset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterOptions {
    /// Smallest and largest year present; `None` for an empty dataset.
    pub year_bounds: Option<YearRange>,
    /// Distinct states in first-seen order.
    pub states: Vec<String>,
    /// Distinct attack types in first-seen order.
    pub attack_types: Vec<String>,
}

impl FilterOptions {
    /// The initial selection: the full year range and no restrictions.
    #[must_use]
    pub fn default_criteria(&self) -> FilterCriteria {
        FilterCriteria::new(self.year_bounds.unwrap_or_default())
    }
}

/// Every view of the dashboard, computed from one filtered selection.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardView {
    /// Headline metrics.
    pub metrics: KeyMetrics,
    /// Incidents per month of year.
    pub monthly_distribution: Vec<MonthCount>,
    /// Incidents per state, most first.
    pub incidents_by_state: Vec<CategoryCount>,
    /// Casualty totals per state, most first.
    pub casualties_by_state: Vec<CategoryCount>,
    /// Attack type distribution, most first.
    pub attack_types: Vec<CategoryCount>,
    /// Target type distribution, most first.
    pub target_types: Vec<CategoryCount>,
    /// Most active perpetrator groups.
    pub top_perpetrators: Vec<CategoryCount>,
    /// Weapons distribution, most first.
    pub weapons: Vec<CategoryCount>,
    /// Casualty sum/mean/count per attack type, highest sum first.
    pub casualties_by_attack_type: Vec<GroupSummary>,
    /// Incidents per `"YYYY-MM"` bucket, chronological.
    pub incidents_over_time: Vec<TimeSeriesPoint>,
    /// Incidents with the most casualties.
    pub deadliest: Vec<Incident>,
    /// Cities with the most incidents.
    pub most_active_cities: Vec<CategoryCount>,
    /// Latest incidents.
    pub recent: Vec<Incident>,
}

impl DashboardView {
    /// Returns `true` if the underlying selection held no incidents.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.metrics.total_incidents == 0
    }
}
