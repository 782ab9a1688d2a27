//! Assembly of every dashboard view from one filtered selection.

use incident_dashboard_analytics_models::{CategoryCount, DashboardView};
use incident_dashboard_incident_models::Incident;

use crate::aggregate::{
    category_counts, grouped_summary, monthly_distribution, most_recent, ranked_counts,
    sum_and_mean_by, time_series, top_k_by_casualties, top_n,
};
use crate::metrics::key_metrics;

/// Number of perpetrator groups in the top-perpetrators chart.
pub const TOP_PERPETRATORS: usize = 10;
/// Number of incidents in the deadliest-attacks list.
pub const DEADLIEST: usize = 5;
/// Number of cities in the most-active-cities list.
pub const MOST_ACTIVE_CITIES: usize = 5;
/// Number of incidents in the recent-summaries list.
pub const RECENT: usize = 3;

/// Computes every view for `records`.
#[must_use]
pub fn dashboard(records: &[Incident]) -> DashboardView {
    DashboardView {
        metrics: key_metrics(records),
        monthly_distribution: monthly_distribution(records),
        incidents_by_state: category_counts(ranked_counts(records, Incident::state)),
        casualties_by_state: casualties_by_state(records),
        attack_types: category_counts(ranked_counts(records, Incident::attack_type)),
        target_types: category_counts(ranked_counts(records, Incident::target_type)),
        top_perpetrators: category_counts(top_n(
            records,
            Incident::perpetrators,
            TOP_PERPETRATORS,
        )),
        weapons: category_counts(ranked_counts(records, Incident::weapons_used)),
        casualties_by_attack_type: grouped_summary(
            records,
            Incident::attack_type,
            Incident::casualties_or_zero,
        ),
        incidents_over_time: time_series(records, Incident::month_bucket),
        deadliest: top_k_by_casualties(records, DEADLIEST),
        most_active_cities: category_counts(top_n(records, Incident::city, MOST_ACTIVE_CITIES)),
        recent: most_recent(records, RECENT),
    }
}

/// Casualty totals per state, highest first (ties by state name).
fn casualties_by_state(records: &[Incident]) -> Vec<CategoryCount> {
    let mut totals: Vec<CategoryCount> =
        sum_and_mean_by(records, Incident::state, Incident::casualties_or_zero)
            .into_iter()
            .map(|(state, stats)| CategoryCount {
                category: state.to_string(),
                count: stats.sum,
            })
            .collect();
    totals.sort_by(|a, b| b.count.cmp(&a.count));
    totals
}
