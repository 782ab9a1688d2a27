#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! API request and response types for the incident dashboard server.
//!
//! These types are serialized to JSON for the REST API. They are separate
//! from the record and aggregation types so the API contract can evolve
//! independently.

use incident_dashboard_analytics_models::DashboardView;
use incident_dashboard_incident_models::Incident;
use serde::{Deserialize, Serialize};

/// Message shown in place of every view when a selection is empty.
pub const EMPTY_SELECTION_NOTICE: &str = "No data available for the selected filters.";

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiHealth {
    /// Whether the server is healthy.
    pub healthy: bool,
    /// Server version.
    pub version: String,
    /// Number of incidents loaded.
    pub incident_count: u64,
}

/// Filter selection query parameters, shared by every data endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterQueryParams {
    /// First year included. Defaults to the earliest year in the dataset.
    pub year_from: Option<i32>,
    /// Last year included. Defaults to the latest year in the dataset.
    pub year_to: Option<i32>,
    /// Comma-separated list of states. Absent or empty selects all.
    pub states: Option<String>,
    /// Comma-separated list of attack types. Absent or empty selects all.
    pub attack_types: Option<String>,
}

/// Paging query parameters for the detail table.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageQueryParams {
    /// Maximum number of rows.
    pub limit: Option<u32>,
    /// Number of rows to skip.
    pub offset: Option<u32>,
}

/// Dashboard response for one selection.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiDashboard {
    /// Whether the selection matched no incidents.
    pub empty: bool,
    /// Neutral message to show instead of the views when `empty`.
    pub notice: Option<String>,
    /// Every view, computed from the selection.
    pub dashboard: DashboardView,
}

impl From<DashboardView> for ApiDashboard {
    fn from(dashboard: DashboardView) -> Self {
        let empty = dashboard.is_empty();
        Self {
            empty,
            notice: empty.then(|| EMPTY_SELECTION_NOTICE.to_string()),
            dashboard,
        }
    }
}

/// One row of the browsable detail table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiIncidentRow {
    /// Date as `YYYY-MM-DD`.
    pub date: String,
    /// State.
    pub state: String,
    /// City.
    pub city: String,
    /// Attack type.
    pub attack_type: String,
    /// Target type.
    pub target_type: String,
    /// Casualties; `null` when unrecorded.
    pub casualties: Option<u32>,
    /// Perpetrators.
    pub perpetrators: String,
    /// Weapons used.
    pub weapons_used: String,
    /// Source URL.
    pub sources: String,
}

impl From<&Incident> for ApiIncidentRow {
    fn from(incident: &Incident) -> Self {
        Self {
            date: incident.date().format("%Y-%m-%d").to_string(),
            state: incident.state().to_string(),
            city: incident.city().to_string(),
            attack_type: incident.attack_type().to_string(),
            target_type: incident.target_type().to_string(),
            casualties: incident.casualties(),
            perpetrators: incident.perpetrators().to_string(),
            weapons_used: incident.weapons_used().to_string(),
            sources: incident.sources().to_string(),
        }
    }
}

/// A page of the detail table.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiIncidentPage {
    /// Number of incidents in the whole selection.
    pub total: u64,
    /// Offset of the first row.
    pub offset: u32,
    /// Page size requested.
    pub limit: u32,
    /// Rows on this page.
    pub rows: Vec<ApiIncidentRow>,
}

/// Error body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    /// Human-readable error message.
    pub error: String,
}
