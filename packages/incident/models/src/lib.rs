#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Incident record types and filter criteria.
//!
//! This crate defines the canonical [`Incident`] shape shared by every
//! stage of the dashboard pipeline. Both ingestion paths (delimited and
//! JSON) normalize into it, the filter engine selects over it, and the
//! aggregation functions reduce it. The calendar fields derived from an
//! incident's date are computed once in [`Incident::new`] and cannot be
//! set independently.

use std::collections::BTreeSet;

use chrono::{Datelike as _, NaiveDate};
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// A column of the flat incident dataset, identified by its header text.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display, EnumString, AsRefStr,
)]
pub enum Column {
    /// Calendar date of the incident.
    #[strum(serialize = "Date")]
    Date,
    /// Region identifier.
    #[strum(serialize = "State")]
    State,
    /// Locality.
    #[strum(serialize = "City")]
    City,
    /// Attack category.
    #[strum(serialize = "Attack Type")]
    AttackType,
    /// Target category.
    #[strum(serialize = "Target Type")]
    TargetType,
    /// Casualty count.
    #[strum(serialize = "Casualties")]
    Casualties,
    /// Responsible group, or "Unknown".
    #[strum(serialize = "Perpetrators")]
    Perpetrators,
    /// Weapons description.
    #[strum(serialize = "Weapons Used")]
    WeaponsUsed,
    /// Source URL.
    #[strum(serialize = "Sources")]
    Sources,
    /// Free-text summary.
    #[strum(serialize = "Summary")]
    Summary,
}

impl Column {
    /// Every source column, in the order they appear in the dataset.
    pub const ALL: &[Self] = &[
        Self::Date,
        Self::State,
        Self::City,
        Self::AttackType,
        Self::TargetType,
        Self::Casualties,
        Self::Perpetrators,
        Self::WeaponsUsed,
        Self::Sources,
        Self::Summary,
    ];

    /// Columns shown in the browsable detail table.
    pub const DISPLAY: &[Self] = &[
        Self::Date,
        Self::State,
        Self::City,
        Self::AttackType,
        Self::TargetType,
        Self::Casualties,
        Self::Perpetrators,
        Self::WeaponsUsed,
        Self::Sources,
    ];
}

/// The non-derived, descriptive fields of an incident.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IncidentDetails {
    /// Region identifier.
    pub state: String,
    /// Locality.
    pub city: String,
    /// Attack category.
    pub attack_type: String,
    /// Target category.
    pub target_type: String,
    /// Casualty count. `None` when the source left the cell empty.
    pub casualties: Option<u32>,
    /// Responsible group, free text or "Unknown".
    pub perpetrators: String,
    /// Weapons description.
    pub weapons_used: String,
    /// Source URL.
    pub sources: String,
    /// Free-text summary.
    pub summary: String,
}

/// One row of the incident dataset.
///
/// `year`, `month` and `month_bucket` are pure functions of `date` and are
/// only ever produced by [`Incident::new`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Incident {
    date: NaiveDate,
    year: i32,
    month: u32,
    month_bucket: String,
    #[serde(flatten)]
    details: IncidentDetails,
}

impl Incident {
    /// Creates an incident, deriving its calendar fields from `date`.
    #[must_use]
    pub fn new(date: NaiveDate, details: IncidentDetails) -> Self {
        let year = date.year();
        let month = date.month();
        Self {
            date,
            year,
            month,
            month_bucket: month_bucket(year, month),
            details,
        }
    }

    /// Calendar date of the incident.
    #[must_use]
    pub const fn date(&self) -> NaiveDate {
        self.date
    }

    /// Calendar year of [`Self::date`].
    #[must_use]
    pub const fn year(&self) -> i32 {
        self.year
    }

    /// Month of [`Self::date`], 1-12.
    #[must_use]
    pub const fn month(&self) -> u32 {
        self.month
    }

    /// `"YYYY-MM"` bucket of [`Self::date`]. Sorts chronologically.
    #[must_use]
    pub fn month_bucket(&self) -> &str {
        &self.month_bucket
    }

    /// The descriptive fields of this incident.
    #[must_use]
    pub const fn details(&self) -> &IncidentDetails {
        &self.details
    }

    #[must_use]
    pub fn state(&self) -> &str {
        &self.details.state
    }

    #[must_use]
    pub fn city(&self) -> &str {
        &self.details.city
    }

    #[must_use]
    pub fn attack_type(&self) -> &str {
        &self.details.attack_type
    }

    #[must_use]
    pub fn target_type(&self) -> &str {
        &self.details.target_type
    }

    /// Casualty count as recorded; `None` when the source left it empty.
    #[must_use]
    pub const fn casualties(&self) -> Option<u32> {
        self.details.casualties
    }

    /// Casualty count for aggregation. Absent counts contribute zero.
    #[must_use]
    pub fn casualties_or_zero(&self) -> u64 {
        u64::from(self.details.casualties.unwrap_or(0))
    }

    #[must_use]
    pub fn perpetrators(&self) -> &str {
        &self.details.perpetrators
    }

    #[must_use]
    pub fn weapons_used(&self) -> &str {
        &self.details.weapons_used
    }

    #[must_use]
    pub fn sources(&self) -> &str {
        &self.details.sources
    }

    #[must_use]
    pub fn summary(&self) -> &str {
        &self.details.summary
    }
}

/// Formats a year and month as a `"YYYY-MM"` bucket key.
#[must_use]
pub fn month_bucket(year: i32, month: u32) -> String {
    format!("{year:04}-{month:02}")
}

/// Inclusive range of calendar years.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct YearRange {
    /// First year included.
    pub min: i32,
    /// Last year included.
    pub max: i32,
}

impl YearRange {
    #[must_use]
    pub const fn new(min: i32, max: i32) -> Self {
        Self { min, max }
    }

    /// A range that contains every year.
    #[must_use]
    pub const fn unbounded() -> Self {
        Self {
            min: i32::MIN,
            max: i32::MAX,
        }
    }

    /// Returns `true` if `min > max`. Such a range contains no year.
    #[must_use]
    pub const fn is_inverted(&self) -> bool {
        self.min > self.max
    }

    #[must_use]
    pub const fn contains(&self, year: i32) -> bool {
        self.min <= year && year <= self.max
    }
}

impl Default for YearRange {
    fn default() -> Self {
        Self::unbounded()
    }
}

/// The active user selection for one pipeline run.
///
/// An empty `states` or `attack_types` set means "no restriction", not
/// "match nothing".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterCriteria {
    /// Inclusive year range.
    pub year_range: YearRange,
    /// Selected regions. Empty selects all.
    pub states: BTreeSet<String>,
    /// Selected attack categories. Empty selects all.
    pub attack_types: BTreeSet<String>,
}

impl FilterCriteria {
    /// Creates criteria restricted only by `year_range`.
    #[must_use]
    pub fn new(year_range: YearRange) -> Self {
        Self {
            year_range,
            ..Self::default()
        }
    }

    /// Restricts the criteria to the given regions.
    #[must_use]
    pub fn with_states<I, S>(mut self, states: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.states = states.into_iter().map(Into::into).collect();
        self
    }

    /// Restricts the criteria to the given attack categories.
    #[must_use]
    pub fn with_attack_types<I, S>(mut self, attack_types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.attack_types = attack_types.into_iter().map(Into::into).collect();
        self
    }

    /// Evaluates the conjunction of all three predicate clauses.
    #[must_use]
    pub fn matches(&self, incident: &Incident) -> bool {
        self.year_range.contains(incident.year())
            && (self.states.is_empty() || self.states.contains(incident.state()))
            && (self.attack_types.is_empty() || self.attack_types.contains(incident.attack_type()))
    }
}
