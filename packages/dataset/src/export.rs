//! CSV export of a record set in the original tabular layout.
//!
//! Only source columns are written; the derived calendar fields stay
//! internal.

use std::io::Write;

use incident_dashboard_incident_models::{Column, Incident};

use crate::ExportError;

/// File name offered for a filtered-data download.
pub const DEFAULT_FILE_NAME: &str = "india_terrorism_filtered_data.csv";

/// MIME type of the exported data.
pub const CONTENT_TYPE: &str = "text/csv";

/// Renders one column of an incident as it appears in the source file.
///
/// Dates are written as `YYYY-MM-DD`; absent casualties as an empty cell.
#[must_use]
pub fn column_value(incident: &Incident, column: Column) -> String {
    match column {
        Column::Date => incident.date().format("%Y-%m-%d").to_string(),
        Column::State => incident.state().to_string(),
        Column::City => incident.city().to_string(),
        Column::AttackType => incident.attack_type().to_string(),
        Column::TargetType => incident.target_type().to_string(),
        Column::Casualties => incident
            .casualties()
            .map(|n| n.to_string())
            .unwrap_or_default(),
        Column::Perpetrators => incident.perpetrators().to_string(),
        Column::WeaponsUsed => incident.weapons_used().to_string(),
        Column::Sources => incident.sources().to_string(),
        Column::Summary => incident.summary().to_string(),
    }
}

/// Writes `records` as CSV with the original header row.
///
/// # Errors
///
/// Returns [`ExportError`] if writing to `writer` fails.
pub fn write_csv<W: Write>(records: &[Incident], writer: W) -> Result<(), ExportError> {
    let mut csv_writer = csv::Writer::from_writer(writer);

    csv_writer.write_record(Column::ALL.iter().map(ToString::to_string))?;
    for incident in records {
        csv_writer.write_record(
            Column::ALL
                .iter()
                .map(|column| column_value(incident, *column)),
        )?;
    }
    csv_writer.flush()?;

    Ok(())
}

/// Serializes `records` into UTF-8 CSV bytes.
///
/// # Errors
///
/// Returns [`ExportError`] if serialization fails.
pub fn to_csv_bytes(records: &[Incident]) -> Result<Vec<u8>, ExportError> {
    let mut buf = Vec::new();
    write_csv(records, &mut buf)?;
    log::debug!("Exported {} records ({} bytes)", records.len(), buf.len());
    Ok(buf)
}
