//! Plain-text rendering of a dashboard for the terminal.

use std::io::{self, Write};

use incident_dashboard_analytics_models::{CategoryCount, DashboardView};
use incident_dashboard_incident_models::Incident;
use incident_dashboard_server_models::EMPTY_SELECTION_NOTICE;

/// Writes the key metrics and the ranked views of `view` to `out`.
///
/// An empty selection prints only the notice.
///
/// # Errors
///
/// Returns any error from writing to `out`.
pub fn render(view: &DashboardView, out: &mut impl Write) -> io::Result<()> {
    if view.is_empty() {
        return writeln!(out, "{EMPTY_SELECTION_NOTICE}");
    }

    let metrics = &view.metrics;
    writeln!(out, "{:<26} {}", "Total incidents:", metrics.total_incidents)?;
    writeln!(out, "{:<26} {}", "Total casualties:", metrics.total_casualties)?;
    writeln!(
        out,
        "{:<26} {}",
        "Mean casualties:",
        metrics.mean_casualties_display()
    )?;
    writeln!(
        out,
        "{:<26} {}",
        "Most common attack type:",
        metrics.most_common_attack_type_display()
    )?;

    section(out, "Incidents by state", &view.incidents_by_state)?;
    section(out, "Casualties by state", &view.casualties_by_state)?;
    section(out, "Attack types", &view.attack_types)?;
    section(out, "Top perpetrators", &view.top_perpetrators)?;
    section(out, "Most active cities", &view.most_active_cities)?;

    writeln!(out)?;
    writeln!(out, "Deadliest attacks")?;
    writeln!(out, "{}", "-".repeat(50))?;
    for incident in &view.deadliest {
        writeln!(out, "{}", incident_line(incident))?;
    }

    writeln!(out)?;
    writeln!(out, "Recent incidents")?;
    writeln!(out, "{}", "-".repeat(50))?;
    for incident in &view.recent {
        writeln!(out, "{}", incident_line(incident))?;
        if !incident.summary().is_empty() {
            writeln!(out, "    {}", incident.summary())?;
        }
    }

    Ok(())
}

fn section(out: &mut impl Write, title: &str, counts: &[CategoryCount]) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, "{title}")?;
    writeln!(out, "{}", "-".repeat(50))?;
    for entry in counts {
        writeln!(out, "{:<40} {:>9}", entry.category, entry.count)?;
    }
    Ok(())
}

fn incident_line(incident: &Incident) -> String {
    let casualties = incident
        .casualties()
        .map_or_else(|| "?".to_string(), |c| c.to_string());
    format!(
        "{}  {:<20} {:<16} {:<20} {casualties:>5}",
        incident.date().format("%Y-%m-%d"),
        incident.state(),
        incident.city(),
        incident.attack_type(),
    )
}

#[cfg(test)]
mod tests {
    use incident_dashboard_analytics::views::dashboard;
    use incident_dashboard_dataset::csv_source;

    use super::*;

    const DATA: &str = "\
Date,State,City,Attack Type,Target Type,Casualties,Perpetrators,Weapons Used,Sources,Summary
2020-01-01,A,Xpur,Bombing,Civilians,5,Group One,IED,https://example.org/1,First blast
2020-06-15,B,Ygarh,Armed Assault,Police,,Unknown,Rifles,https://example.org/2,Ambush
";

    fn rendered(records: &[Incident]) -> String {
        let mut out = Vec::new();
        render(&dashboard(records), &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn renders_metrics_and_views() {
        let records = csv_source::parse(DATA, b',').unwrap();
        let text = rendered(&records);

        assert!(text.contains("Total incidents:           2"));
        assert!(text.contains("Mean casualties:           2.50"));
        assert!(text.contains("Most common attack type:   Bombing"));
        assert!(text.contains("Deadliest attacks"));
        assert!(text.contains("    Ambush"));
        assert!(!text.contains(EMPTY_SELECTION_NOTICE));
    }

    #[test]
    fn unknown_casualties_shown_as_question_mark() {
        let records = csv_source::parse(DATA, b',').unwrap();
        assert!(incident_line(&records[1]).ends_with("    ?"));
    }

    #[test]
    fn empty_selection_prints_notice_only() {
        assert_eq!(rendered(&[]), format!("{EMPTY_SELECTION_NOTICE}\n"));
    }
}
