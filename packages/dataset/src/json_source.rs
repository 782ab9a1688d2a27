//! Structured (JSON) ingestion path.
//!
//! Accepts either a JSON array of record objects or newline-delimited
//! objects. The `Date` field may be a plain string or an extended-JSON
//! wrapper (`{"$date": "2020-01-01T00:00:00Z"}` or
//! `{"$date": {"$numberLong": "1577836800000"}}`); only the calendar part
//! is kept.

use incident_dashboard_incident_models::{Incident, IncidentDetails};
use serde::Deserialize;
use serde_json::Value;

use crate::LoadError;
use crate::parsing::{count_from_f64, date_from_millis, parse_casualties, parse_date};

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum JsonDate {
    Extended {
        #[serde(rename = "$date")]
        date: ExtendedDate,
    },
    Text(String),
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ExtendedDate {
    Text(String),
    NumberLong {
        #[serde(rename = "$numberLong")]
        millis: String,
    },
    Millis(i64),
}

impl JsonDate {
    fn to_date(&self) -> Option<chrono::NaiveDate> {
        match self {
            Self::Text(text) => parse_date(text),
            Self::Extended {
                date: ExtendedDate::Text(text),
            } => parse_date(text.split('T').next().unwrap_or(text)),
            Self::Extended {
                date: ExtendedDate::NumberLong { millis },
            } => millis.trim().parse().ok().and_then(date_from_millis),
            Self::Extended {
                date: ExtendedDate::Millis(millis),
            } => date_from_millis(*millis),
        }
    }

    fn describe(&self) -> String {
        match self {
            Self::Text(text)
            | Self::Extended {
                date: ExtendedDate::Text(text),
            }
            | Self::Extended {
                date: ExtendedDate::NumberLong { millis: text },
            } => text.clone(),
            Self::Extended {
                date: ExtendedDate::Millis(millis),
            } => millis.to_string(),
        }
    }
}

/// One JSON record before type coercion.
#[derive(Debug, Deserialize)]
struct JsonRow {
    #[serde(rename = "Date")]
    date: JsonDate,
    #[serde(rename = "State", default)]
    state: Option<String>,
    #[serde(rename = "City", default)]
    city: Option<String>,
    #[serde(rename = "Attack Type", default)]
    attack_type: Option<String>,
    #[serde(rename = "Target Type", default)]
    target_type: Option<String>,
    #[serde(rename = "Casualties", default)]
    casualties: Value,
    #[serde(rename = "Perpetrators", default)]
    perpetrators: Option<String>,
    #[serde(rename = "Weapons Used", default)]
    weapons_used: Option<String>,
    #[serde(rename = "Sources", default)]
    sources: Option<String>,
    #[serde(rename = "Summary", default)]
    summary: Option<String>,
}

impl JsonRow {
    fn into_incident(self, row: usize) -> Result<Incident, LoadError> {
        let date = self.date.to_date().ok_or_else(|| LoadError::InvalidDate {
            row,
            value: self.date.describe(),
        })?;

        let casualties = casualties_from_json(&self.casualties).ok_or_else(|| {
            LoadError::InvalidCasualties {
                row,
                value: self.casualties.to_string(),
            }
        })?;

        Ok(Incident::new(
            date,
            IncidentDetails {
                state: self.state.unwrap_or_default(),
                city: self.city.unwrap_or_default(),
                attack_type: self.attack_type.unwrap_or_default(),
                target_type: self.target_type.unwrap_or_default(),
                casualties,
                perpetrators: self.perpetrators.unwrap_or_default(),
                weapons_used: self.weapons_used.unwrap_or_default(),
                sources: self.sources.unwrap_or_default(),
                summary: self.summary.unwrap_or_default(),
            },
        ))
    }
}

/// Coerces a JSON casualty value. The outer `None` means "invalid".
fn casualties_from_json(value: &Value) -> Option<Option<u32>> {
    match value {
        Value::Null => Some(None),
        Value::Number(n) => n.as_u64().map_or_else(
            || n.as_f64().and_then(|f| count_from_f64(f).ok()).map(Some),
            |n| u32::try_from(n).ok().map(Some),
        ),
        Value::String(s) => parse_casualties(s).ok(),
        _ => None,
    }
}

/// Parses a JSON array or newline-delimited JSON records into incidents,
/// in document order.
///
/// # Errors
///
/// Returns [`LoadError`] if the document is malformed or any record fails
/// to parse. The first bad record aborts the whole parse.
pub fn parse(contents: &str) -> Result<Vec<Incident>, LoadError> {
    let trimmed = contents.trim_start_matches('\u{feff}').trim();

    let values: Vec<Value> = if trimmed.starts_with('[') {
        serde_json::from_str(trimmed)?
    } else {
        trimmed
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(serde_json::from_str)
            .collect::<Result<_, _>>()?
    };

    let incidents = values
        .into_iter()
        .enumerate()
        .map(|(idx, value)| {
            let row = idx + 1;
            serde_json::from_value::<JsonRow>(value)
                .map_err(|source| LoadError::InvalidRecord { row, source })?
                .into_incident(row)
        })
        .collect::<Result<Vec<_>, _>>()?;

    log::debug!("Parsed {} JSON records", incidents.len());

    Ok(incidents)
}
