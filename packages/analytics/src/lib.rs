#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Filter engine and aggregation functions for the incident dashboard.
//!
//! Data flows one way: the full dataset is narrowed by [`filter::apply`]
//! into a new owned selection, and every view is then computed from that
//! selection by the pure reducers in [`aggregate`], [`metrics`] and
//! [`views`]. Every reducer is total: an empty selection yields empty
//! collections and `None` metrics rather than an error.

pub mod aggregate;
pub mod filter;
pub mod metrics;
pub mod views;

#[cfg(test)]
pub(crate) mod test_support {
    use chrono::NaiveDate;
    use incident_dashboard_incident_models::{Incident, IncidentDetails};

    /// Builds an incident with the fields the aggregations look at.
    pub fn incident(
        date: &str,
        state: &str,
        attack_type: &str,
        casualties: Option<u32>,
    ) -> Incident {
        Incident::new(
            NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
            IncidentDetails {
                state: state.to_string(),
                city: format!("{state}-city"),
                attack_type: attack_type.to_string(),
                target_type: "Civilians".to_string(),
                casualties,
                perpetrators: "Unknown".to_string(),
                weapons_used: "Explosives".to_string(),
                sources: format!("https://example.org/{date}"),
                summary: format!("{attack_type} in {state}"),
            },
        )
    }

    /// The three-record dataset used throughout the scenario tests.
    pub fn scenario() -> Vec<Incident> {
        vec![
            incident("2020-01-01", "A", "Bombing", Some(5)),
            incident("2020-06-15", "B", "Armed Assault", Some(0)),
            incident("2021-03-01", "A", "Bombing", Some(10)),
        ]
    }
}
