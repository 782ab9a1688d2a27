//! Stateless reducers over a filtered selection.
//!
//! Key functions take the record by reference, so keys may borrow from the
//! records (`Incident::state` works directly as a key function).

use std::collections::BTreeMap;

use chrono::Month;
use incident_dashboard_analytics_models::{
    CategoryCount, GroupStats, GroupSummary, MonthCount, TimeSeriesPoint,
};
use incident_dashboard_incident_models::Incident;

/// Counts keys, returning them in first-seen order.
fn tally<'a, K, F>(records: &'a [Incident], key_fn: F) -> Vec<(K, u64)>
where
    K: Ord + Clone,
    F: Fn(&'a Incident) -> K,
{
    let mut index: BTreeMap<K, usize> = BTreeMap::new();
    let mut counts: Vec<(K, u64)> = Vec::new();

    for record in records {
        let key = key_fn(record);
        if let Some(&i) = index.get(&key) {
            counts[i].1 += 1;
        } else {
            index.insert(key.clone(), counts.len());
            counts.push((key, 1));
        }
    }

    counts
}

/// Counts records per key.
#[must_use]
pub fn count_by<'a, K, F>(records: &'a [Incident], key_fn: F) -> BTreeMap<K, u64>
where
    K: Ord,
    F: Fn(&'a Incident) -> K,
{
    let mut counts = BTreeMap::new();
    for record in records {
        *counts.entry(key_fn(record)).or_insert(0) += 1;
    }
    counts
}

/// Every key with its count, ordered by descending count. Ties keep the
/// order in which the keys first appear in `records`.
#[must_use]
pub fn ranked_counts<'a, K, F>(records: &'a [Incident], key_fn: F) -> Vec<(K, u64)>
where
    K: Ord + Clone,
    F: Fn(&'a Incident) -> K,
{
    let mut counts = tally(records, key_fn);
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts
}

/// The `n` most frequent keys, ranked as in [`ranked_counts`].
#[must_use]
pub fn top_n<'a, K, F>(records: &'a [Incident], key_fn: F, n: usize) -> Vec<(K, u64)>
where
    K: Ord + Clone,
    F: Fn(&'a Incident) -> K,
{
    let mut ranked = ranked_counts(records, key_fn);
    ranked.truncate(n);
    ranked
}

/// Sum, mean and count of `value_fn` per group.
///
/// A group exists only once a record lands in it, so every entry has a
/// count of at least one and a defined mean.
#[must_use]
pub fn sum_and_mean_by<'a, K, G, V>(
    records: &'a [Incident],
    group_fn: G,
    value_fn: V,
) -> BTreeMap<K, GroupStats>
where
    K: Ord,
    G: Fn(&'a Incident) -> K,
    V: Fn(&'a Incident) -> u64,
{
    let mut totals: BTreeMap<K, (u64, u64)> = BTreeMap::new();
    for record in records {
        let entry = totals.entry(group_fn(record)).or_insert((0, 0));
        entry.0 += value_fn(record);
        entry.1 += 1;
    }

    totals
        .into_iter()
        .filter_map(|(key, (sum, count))| GroupStats::from_totals(sum, count).map(|s| (key, s)))
        .collect()
}

/// [`sum_and_mean_by`] as a list ordered by descending sum, ties by group.
#[must_use]
pub fn grouped_summary<'a, K, G, V>(
    records: &'a [Incident],
    group_fn: G,
    value_fn: V,
) -> Vec<GroupSummary>
where
    K: Ord + ToString,
    G: Fn(&'a Incident) -> K,
    V: Fn(&'a Incident) -> u64,
{
    let mut summaries: Vec<GroupSummary> = sum_and_mean_by(records, group_fn, value_fn)
        .into_iter()
        .map(|(group, stats)| GroupSummary {
            group: group.to_string(),
            stats,
        })
        .collect();
    summaries.sort_by(|a, b| b.stats.sum.cmp(&a.stats.sum));
    summaries
}

/// Incident counts per time bucket, in ascending bucket order.
///
/// `"YYYY-MM"` keys sort lexically in chronological order.
#[must_use]
pub fn time_series<'a, F>(records: &'a [Incident], bucket_fn: F) -> Vec<TimeSeriesPoint>
where
    F: Fn(&'a Incident) -> &'a str,
{
    count_by(records, bucket_fn)
        .into_iter()
        .map(|(period, count)| TimeSeriesPoint {
            period: period.to_string(),
            count,
        })
        .collect()
}

/// The `k` incidents with the most casualties, most first. Ties go to the
/// earlier date, then to the earlier position in `records`.
#[must_use]
pub fn top_k_by_casualties(records: &[Incident], k: usize) -> Vec<Incident> {
    let mut sorted: Vec<&Incident> = records.iter().collect();
    sorted.sort_by(|a, b| {
        b.casualties_or_zero()
            .cmp(&a.casualties_or_zero())
            .then_with(|| a.date().cmp(&b.date()))
    });
    sorted.into_iter().take(k).cloned().collect()
}

/// The `k` latest incidents, newest first. Same-day incidents keep their
/// relative order.
#[must_use]
pub fn most_recent(records: &[Incident], k: usize) -> Vec<Incident> {
    let mut sorted: Vec<&Incident> = records.iter().collect();
    sorted.sort_by(|a, b| b.date().cmp(&a.date()));
    sorted.into_iter().take(k).cloned().collect()
}

/// Incident counts per month of year (pooled across years), January
/// first. Months with no incidents are omitted.
#[must_use]
pub fn monthly_distribution(records: &[Incident]) -> Vec<MonthCount> {
    count_by(records, Incident::month)
        .into_iter()
        .map(|(month, count)| MonthCount {
            month,
            month_name: short_month_name(month),
            count,
        })
        .collect()
}

fn short_month_name(month: u32) -> String {
    u8::try_from(month)
        .ok()
        .and_then(|m| Month::try_from(m).ok())
        .map_or_else(|| month.to_string(), |m| m.name()[..3].to_string())
}

/// Converts ranked `(key, count)` pairs into [`CategoryCount`] rows.
#[must_use]
pub fn category_counts<K: ToString>(counts: Vec<(K, u64)>) -> Vec<CategoryCount> {
    counts
        .into_iter()
        .map(|(category, count)| CategoryCount {
            category: category.to_string(),
            count,
        })
        .collect()
}
