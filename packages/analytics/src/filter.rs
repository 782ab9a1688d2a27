//! The filter engine.

use std::collections::BTreeSet;

use incident_dashboard_analytics_models::FilterOptions;
use incident_dashboard_incident_models::{FilterCriteria, Incident, YearRange};

/// Selects the records matching `criteria`, preserving their relative
/// order. The source slice is never modified.
///
/// An empty result is a valid selection, not an error.
#[must_use]
pub fn apply(records: &[Incident], criteria: &FilterCriteria) -> Vec<Incident> {
    let filtered: Vec<Incident> = records
        .iter()
        .filter(|incident| criteria.matches(incident))
        .cloned()
        .collect();

    log::debug!(
        "Filter kept {}/{} incidents (years {}..={}, {} states, {} attack types)",
        filtered.len(),
        records.len(),
        criteria.year_range.min,
        criteria.year_range.max,
        criteria.states.len(),
        criteria.attack_types.len(),
    );

    filtered
}

/// Computes the choices offered by the filter controls.
#[must_use]
pub fn filter_options(records: &[Incident]) -> FilterOptions {
    let year_bounds = records
        .iter()
        .map(Incident::year)
        .fold(None, |bounds: Option<YearRange>, year| {
            Some(bounds.map_or(YearRange::new(year, year), |b| {
                YearRange::new(b.min.min(year), b.max.max(year))
            }))
        });

    FilterOptions {
        year_bounds,
        states: first_seen(records, Incident::state),
        attack_types: first_seen(records, Incident::attack_type),
    }
}

fn first_seen<'a>(records: &'a [Incident], key_fn: fn(&'a Incident) -> &'a str) -> Vec<String> {
    let mut seen = BTreeSet::new();
    records
        .iter()
        .map(key_fn)
        .filter(|key| seen.insert(*key))
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{incident, scenario};

    fn full_range(records: &[Incident]) -> FilterCriteria {
        filter_options(records).default_criteria()
    }

    #[test]
    fn filters_to_year_range() {
        let records = scenario();
        let criteria = FilterCriteria::new(YearRange::new(2020, 2020));
        let filtered = apply(&records, &criteria);

        let states: Vec<&str> = filtered.iter().map(Incident::state).collect();
        assert_eq!(states, ["A", "B"]);
    }

    #[test]
    fn empty_state_selection_returns_every_state() {
        let records = scenario();
        let criteria = full_range(&records).with_states(Vec::<String>::new());
        assert_eq!(apply(&records, &criteria).len(), 3);
    }

    #[test]
    fn identity_with_full_range_and_no_restrictions() {
        let records = scenario();
        assert_eq!(apply(&records, &full_range(&records)), records);
    }

    #[test]
    fn filtering_is_idempotent() {
        let records = scenario();
        let criteria = FilterCriteria::new(YearRange::new(2020, 2021))
            .with_states(["A"])
            .with_attack_types(["Bombing"]);

        let once = apply(&records, &criteria);
        let twice = apply(&once, &criteria);
        assert_eq!(once, twice);
        assert_eq!(once.len(), 2);
    }

    #[test]
    fn preserves_relative_order() {
        let records = vec![
            incident("2020-03-01", "B", "Arson", None),
            incident("2020-01-01", "A", "Bombing", None),
            incident("2020-02-01", "B", "Bombing", None),
        ];
        let criteria = FilterCriteria::new(YearRange::unbounded()).with_states(["B"]);
        let filtered = apply(&records, &criteria);
        assert_eq!(filtered, vec![records[0].clone(), records[2].clone()]);
    }

    #[test]
    fn unmatched_selection_is_empty_not_error() {
        let records = scenario();
        let criteria = FilterCriteria::new(YearRange::unbounded()).with_states(["Nowhere"]);
        assert!(apply(&records, &criteria).is_empty());

        let inverted = FilterCriteria::new(YearRange::new(2021, 2020));
        assert!(apply(&records, &inverted).is_empty());
    }

    #[test]
    fn source_is_untouched() {
        let records = scenario();
        let before = records.clone();
        let _ = apply(&records, &FilterCriteria::new(YearRange::new(2021, 2021)));
        assert_eq!(records, before);
    }

    #[test]
    fn options_list_bounds_and_first_seen_values() {
        let records = scenario();
        let options = filter_options(&records);
        assert_eq!(options.year_bounds, Some(YearRange::new(2020, 2021)));
        assert_eq!(options.states, ["A", "B"]);
        assert_eq!(options.attack_types, ["Bombing", "Armed Assault"]);
    }

    #[test]
    fn options_for_empty_dataset() {
        let options = filter_options(&[]);
        assert_eq!(options.year_bounds, None);
        assert!(options.states.is_empty());
        assert!(options.attack_types.is_empty());
    }
}
