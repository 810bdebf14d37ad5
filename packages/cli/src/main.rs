#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Command-line driver for the wildfire analytics pipeline.
//!
//! Loads the incident CSV, builds the derived tables, and prints or writes
//! them as JSON for whatever renders the charts. Run without a subcommand
//! to pick tables interactively.
//!
//! Uses `indicatif-log-bridge` (via [`wildfire_cli_utils::init_logger`]) so
//! log lines and progress bars share the terminal cleanly.

mod commands;
mod config;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use wildfire_analytics_models::TableName;

use crate::config::{Config, DEFAULT_CONFIG_PATH};

/// Wildfire incident analytics.
#[derive(Parser)]
#[command(name = "wildfire")]
#[command(about = "Build wildfire rollup tables from an incident CSV")]
struct Cli {
    /// Path to the config file.
    #[arg(long, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// Incident CSV (overrides `[data] path`).
    #[arg(long, env = "WILDFIRE_DATA")]
    data: Option<PathBuf>,

    /// Output directory for `catalogue` (overrides `[output] dir`).
    #[arg(long)]
    output: Option<PathBuf>,

    /// Rolling window in years (overrides `[analysis] rolling_window`).
    #[arg(long)]
    rolling_window: Option<usize>,

    /// Subcommand to execute. Prompts for a table when omitted.
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Build every table and write them as JSON files
    Catalogue,
    /// Print one table as JSON
    Table {
        /// Table name, e.g. `fires-by-year`
        name: TableName,
    },
    /// Print the detail tables of one state
    State {
        /// Two-letter state code
        code: String,
    },
    /// Print the state to region lookup
    Regions,
    /// Print the fire size and duration trends
    Trend,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let multi = wildfire_cli_utils::init_logger();
    let cli = Cli::parse();

    let config = Config::load(&cli.config)?.with_overrides(
        cli.data,
        cli.output,
        cli.rolling_window,
    );

    match cli.command {
        Some(Commands::Catalogue) => commands::catalogue(&config, &multi)?,
        Some(Commands::Table { name }) => commands::table(&config, name, &multi)?,
        Some(Commands::State { code }) => commands::state(&config, &code, &multi)?,
        Some(Commands::Regions) => commands::regions()?,
        Some(Commands::Trend) => commands::trends(&config, &multi)?,
        None => {
            println!("Wildfire Analytics");
            println!();
            commands::interactive(&config)?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory as _;

    use super::*;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn table_names_parse_from_arguments() {
        let cli = Cli::try_parse_from(["wildfire", "table", "region-by-cause-percent"]).unwrap();
        assert!(matches!(
            cli.command,
            Some(Commands::Table {
                name: TableName::RegionByCausePercent
            })
        ));
        assert!(Cli::try_parse_from(["wildfire", "table", "no-such-table"]).is_err());
    }

    #[test]
    fn overrides_parse() {
        let cli = Cli::try_parse_from([
            "wildfire",
            "--data",
            "fires.csv",
            "--rolling-window",
            "5",
            "trend",
        ])
        .unwrap();
        assert_eq!(cli.data, Some(PathBuf::from("fires.csv")));
        assert_eq!(cli.rolling_window, Some(5));
    }
}
