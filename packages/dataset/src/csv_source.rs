//! Delimited (CSV/TSV) ingestion path.
//!
//! Columns are matched by their original header text, ignoring surrounding
//! whitespace. Text fields are kept verbatim. Only `Date` is required;
//! any other missing column loads as empty text (or absent casualties),
//! and unknown extra columns are ignored.

use csv::StringRecord;
use incident_dashboard_incident_models::{Column, Incident, IncidentDetails};
use serde::Deserialize;

use crate::LoadError;
use crate::parsing::{parse_casualties, parse_date};

/// One delimited row before type coercion.
#[derive(Debug, Deserialize)]
struct CsvRow {
    #[serde(rename = "Date")]
    date: String,
    #[serde(rename = "State", default)]
    state: String,
    #[serde(rename = "City", default)]
    city: String,
    #[serde(rename = "Attack Type", default)]
    attack_type: String,
    #[serde(rename = "Target Type", default)]
    target_type: String,
    #[serde(rename = "Casualties", default)]
    casualties: Option<String>,
    #[serde(rename = "Perpetrators", default)]
    perpetrators: String,
    #[serde(rename = "Weapons Used", default)]
    weapons_used: String,
    #[serde(rename = "Sources", default)]
    sources: String,
    #[serde(rename = "Summary", default)]
    summary: String,
}

impl CsvRow {
    fn into_incident(self, row: usize) -> Result<Incident, LoadError> {
        let date = parse_date(&self.date).ok_or_else(|| LoadError::InvalidDate {
            row,
            value: self.date.clone(),
        })?;

        let casualties = match self.casualties.as_deref() {
            Some(text) => parse_casualties(text).map_err(|_| LoadError::InvalidCasualties {
                row,
                value: text.to_string(),
            })?,
            None => None,
        };

        Ok(Incident::new(
            date,
            IncidentDetails {
                state: self.state,
                city: self.city,
                attack_type: self.attack_type,
                target_type: self.target_type,
                casualties,
                perpetrators: self.perpetrators,
                weapons_used: self.weapons_used,
                sources: self.sources,
                summary: self.summary,
            },
        ))
    }
}

/// Parses delimited text with a header row into incidents, in file order.
///
/// # Errors
///
/// Returns [`LoadError`] if the header lacks a `Date` column or any row
/// fails to parse. The first bad row aborts the whole parse.
pub fn parse(contents: &str, delimiter: u8) -> Result<Vec<Incident>, LoadError> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .from_reader(contents.as_bytes());

    let headers: StringRecord = reader
        .headers()?
        .iter()
        .map(|h| h.trim_start_matches('\u{feff}').trim())
        .collect();

    let date_header = Column::Date.to_string();
    if !headers.iter().any(|h| h == date_header) {
        return Err(LoadError::MissingColumn {
            column: Column::Date,
        });
    }
    reader.set_headers(headers);

    let mut incidents = Vec::new();
    for (idx, result) in reader.deserialize::<CsvRow>().enumerate() {
        incidents.push(result?.into_incident(idx + 1)?);
    }

    log::debug!("Parsed {} delimited rows", incidents.len());

    Ok(incidents)
}
