#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Command-line interface for the incident dashboard.
//!
//! Loads a dataset, applies the same filters the dashboard offers, and
//! either prints a text summary or exports the selection as CSV.

mod report;

use std::fs::File;
use std::io::{self, BufWriter};
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use incident_dashboard_analytics::{filter, views};
use incident_dashboard_analytics_models::FilterOptions;
use incident_dashboard_dataset::export::{DEFAULT_FILE_NAME, write_csv};
use incident_dashboard_incident_models::{FilterCriteria, Incident, YearRange};

#[derive(Parser)]
#[command(name = "incident_dashboard", about = "Incident dashboard reports and exports")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the key metrics and ranked views for a selection.
    Summary {
        #[command(flatten)]
        selection: SelectionArgs,
    },
    /// Export a selection as CSV in the original column layout.
    Export {
        #[command(flatten)]
        selection: SelectionArgs,
        /// Output file.
        #[arg(long, short, default_value = DEFAULT_FILE_NAME)]
        output: PathBuf,
    },
}

#[derive(Args, Debug, Default)]
struct SelectionArgs {
    /// Dataset file (`.csv`, `.tsv`, `.json` or `.jsonl`).
    #[arg(long, env = "INCIDENT_DATA_PATH")]
    data: PathBuf,
    /// First year included. Defaults to the earliest year in the dataset.
    #[arg(long)]
    from: Option<i32>,
    /// Last year included. Defaults to the latest year in the dataset.
    #[arg(long)]
    to: Option<i32>,
    /// Restrict to a state (repeatable). Omit for all states.
    #[arg(long = "state")]
    states: Vec<String>,
    /// Restrict to an attack type (repeatable). Omit for all types.
    #[arg(long = "attack-type")]
    attack_types: Vec<String>,
}

impl SelectionArgs {
    /// Builds the criteria, defaulting missing year bounds to the dataset's.
    ///
    /// Only an explicit `--from` after `--to` is an error; a single bound
    /// outside the dataset's years selects nothing.
    fn criteria(&self, options: &FilterOptions) -> Result<FilterCriteria, String> {
        if let (Some(from), Some(to)) = (self.from, self.to)
            && from > to
        {
            return Err(format!("--from ({from}) must not be after --to ({to})"));
        }

        let bounds = options.year_bounds.unwrap_or_default();
        let year_range = YearRange::new(
            self.from.unwrap_or(bounds.min),
            self.to.unwrap_or(bounds.max),
        );

        Ok(FilterCriteria::new(year_range)
            .with_states(&self.states)
            .with_attack_types(&self.attack_types))
    }

    /// Loads the dataset and returns the matching incidents.
    fn select(&self) -> Result<Vec<Incident>, Box<dyn std::error::Error>> {
        let dataset = incident_dashboard_dataset::load(&self.data)?;
        let options = filter::filter_options(dataset.incidents());
        let criteria = self.criteria(&options)?;
        Ok(filter::apply(dataset.incidents(), &criteria))
    }
}

fn export(records: &[Incident], output: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let file = File::create(output)?;
    write_csv(records, BufWriter::new(file))?;
    log::info!("Exported {} incidents to {}", records.len(), output.display());
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Summary { selection } => {
            let records = selection.select()?;
            report::render(&views::dashboard(&records), &mut io::stdout().lock())?;
        }
        Commands::Export { selection, output } => {
            let records = selection.select()?;
            export(&records, &output)?;
        }
    }

    Ok(())
}
