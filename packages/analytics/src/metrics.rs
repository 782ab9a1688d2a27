//! Headline metrics computed directly from a selection.
//!
//! Absent casualty counts are treated as zero in both the total and the
//! mean, so the mean is always `total_casualties / total_incidents`.

use incident_dashboard_analytics_models::{GroupStats, KeyMetrics};
use incident_dashboard_incident_models::Incident;

use crate::aggregate::top_n;

/// Computes the headline metrics. Undefined metrics of an empty selection
/// are `None`.
#[must_use]
pub fn key_metrics(records: &[Incident]) -> KeyMetrics {
    let total_incidents = records.len() as u64;
    let total_casualties: u64 = records.iter().map(Incident::casualties_or_zero).sum();

    KeyMetrics {
        total_incidents,
        total_casualties,
        mean_casualties: GroupStats::from_totals(total_casualties, total_incidents)
            .map(|stats| stats.mean),
        most_common_attack_type: most_common_attack_type(records),
    }
}

/// The most frequent attack type; ties go to the one seen first.
#[must_use]
pub fn most_common_attack_type(records: &[Incident]) -> Option<String> {
    top_n(records, Incident::attack_type, 1)
        .into_iter()
        .next()
        .map(|(attack_type, _)| attack_type.to_string())
}

#[cfg(test)]
mod tests {
    use incident_dashboard_analytics_models::NOT_AVAILABLE;
    use incident_dashboard_incident_models::{FilterCriteria, YearRange};

    use super::*;
    use crate::filter::apply;
    use crate::test_support::{incident, scenario};

    #[test]
    fn scenario_metrics_for_2020() {
        let records = scenario();
        let filtered = apply(&records, &FilterCriteria::new(YearRange::new(2020, 2020)));
        let metrics = key_metrics(&filtered);

        assert_eq!(metrics.total_incidents, 2);
        assert_eq!(metrics.total_casualties, 5);
        assert_eq!(metrics.mean_casualties, Some(2.5));
        assert_eq!(metrics.mean_casualties_display(), "2.50");
        assert_eq!(metrics.most_common_attack_type.as_deref(), Some("Bombing"));
    }

    #[test]
    fn empty_selection_reports_not_available() {
        let metrics = key_metrics(&[]);
        assert_eq!(metrics.total_incidents, 0);
        assert_eq!(metrics.total_casualties, 0);
        assert_eq!(metrics.mean_casualties, None);
        assert_eq!(metrics.most_common_attack_type, None);
        assert_eq!(metrics.mean_casualties_display(), NOT_AVAILABLE);
        assert_eq!(metrics.most_common_attack_type_display(), NOT_AVAILABLE);
    }

    #[test]
    fn absent_casualties_lower_the_mean() {
        let records = vec![
            incident("2020-01-01", "A", "Bombing", Some(9)),
            incident("2020-01-02", "A", "Bombing", None),
            incident("2020-01-03", "A", "Bombing", Some(0)),
        ];
        let metrics = key_metrics(&records);
        assert_eq!(metrics.total_casualties, 9);
        assert_eq!(metrics.mean_casualties, Some(3.0));
    }

    #[test]
    fn most_common_attack_type_tie_goes_to_first_seen() {
        let records = vec![
            incident("2020-01-01", "A", "Kidnapping", None),
            incident("2020-01-02", "A", "Arson", None),
            incident("2020-01-03", "A", "Arson", None),
            incident("2020-01-04", "A", "Kidnapping", None),
        ];
        assert_eq!(
            most_common_attack_type(&records).as_deref(),
            Some("Kidnapping")
        );
    }
}
