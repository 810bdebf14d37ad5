//! Subcommand implementations.

use std::path::Path;

use dialoguer::Select;
use serde::Serialize;
use wildfire_analytics::{build_catalogue, build_table, state_profile, trend};
use wildfire_analytics_models::{CatalogueEntry, TableName, ValueColumn};
use wildfire_cli_utils::{IndicatifProgress, MultiProgress};
use wildfire_fire_models::StateRegions;
use wildfire_source::{LoadedTable, Loader, TableCache};
use wildfire_source_models::IncidentTable;

use crate::config::Config;

type CliResult<T = ()> = Result<T, Box<dyn std::error::Error>>;

fn load(
    config: &Config,
    regions: &StateRegions,
    multi: &MultiProgress,
) -> CliResult<LoadedTable> {
    let path = config.data_path()?;
    let progress = IndicatifProgress::rows_spinner(multi, "Loading incidents");
    let loaded = Loader::new(regions)
        .with_progress(progress)
        .load_path(path)?;
    Ok(loaded)
}

fn print_json<T: Serialize>(value: &T) -> CliResult {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> CliResult {
    let file = std::fs::File::create(path)?;
    serde_json::to_writer_pretty(std::io::BufWriter::new(file), value)?;
    Ok(())
}

/// Builds every table and writes one JSON file per table plus the load
/// report into the output directory.
pub fn catalogue(config: &Config, multi: &MultiProgress) -> CliResult {
    let regions = StateRegions::default();
    let loaded = load(config, &regions, multi)?;

    let progress = IndicatifProgress::tables_bar(multi, "Building tables");
    let catalogue = build_catalogue(&loaded.table, &config.analysis, &progress);

    let dir = &config.output.dir;
    std::fs::create_dir_all(dir)?;

    for (name, entry) in &catalogue.entries {
        if let CatalogueEntry::Available { table } = entry {
            write_json(&dir.join(format!("{name}.json")), table)?;
        }
    }
    write_json(&dir.join("load-report.json"), &loaded.report)?;

    let unavailable = catalogue.unavailable();
    log::info!(
        "Wrote {} tables to {}",
        catalogue.len() - unavailable.len(),
        dir.display()
    );
    for name in unavailable {
        if let Some(CatalogueEntry::Unavailable { reason }) = catalogue.get(name) {
            println!("{name}: unavailable ({reason})");
        }
    }

    Ok(())
}

/// Prints one named table.
pub fn table(config: &Config, name: TableName, multi: &MultiProgress) -> CliResult {
    let regions = StateRegions::default();
    let loaded = load(config, &regions, multi)?;
    print_json(&build_table(&loaded.table, &config.analysis, name)?)
}

/// Prints the detail tables of one state.
pub fn state(config: &Config, code: &str, multi: &MultiProgress) -> CliResult {
    let regions = StateRegions::default();
    if regions.info(code).is_none() {
        return Err(format!("Unknown state code '{code}'").into());
    }
    let loaded = load(config, &regions, multi)?;
    print_json(&state_profile(&loaded.table, code)?)
}

/// Prints the state lookup table.
pub fn regions() -> CliResult {
    let regions = StateRegions::default();
    let rows: Vec<_> = regions.iter().collect();
    print_json(&rows)
}

/// Prints the fire size and duration regressions.
pub fn trends(config: &Config, multi: &MultiProgress) -> CliResult {
    let regions = StateRegions::default();
    let loaded = load(config, &regions, multi)?;

    for column in [ValueColumn::FireSize, ValueColumn::Duration] {
        match trend(&loaded.table, column) {
            Ok(fit) => println!(
                "{column}: slope {:+.4} {}/year, intercept {:.2}, r = {:.3} ({} years)",
                fit.regression.slope,
                column.unit(),
                fit.regression.intercept,
                fit.regression.r_value,
                fit.regression.n,
            ),
            Err(e) => println!("{column}: no trend ({e})"),
        }
    }

    Ok(())
}

/// Prompts for tables to print until the user quits. The incident table is
/// loaded through a [`TableCache`], so only the first selection parses the
/// file unless it changes on disk.
pub fn interactive(config: &Config) -> CliResult {
    let regions = StateRegions::default();
    let cache = TableCache::new();
    let path = config.data_path()?;

    let mut labels: Vec<String> = TableName::all()
        .iter()
        .map(|name| format!("{name}: {}", name.title()))
        .collect();
    labels.push("Quit".to_string());

    loop {
        let idx = Select::new()
            .with_prompt("Which table?")
            .items(&labels)
            .default(0)
            .interact()?;

        let Some(&name) = TableName::all().get(idx) else {
            return Ok(());
        };

        let table = cached_table(&cache, &regions, path)?;
        match build_table(&table, &config.analysis, name) {
            Ok(derived) => print_json(&derived)?,
            Err(e) => println!("{name} is unavailable for this data: {e}"),
        }
    }
}

fn cached_table(
    cache: &TableCache,
    regions: &StateRegions,
    path: &Path,
) -> CliResult<IncidentTable> {
    let (key, table) = cache.get_or_load_path(path, &Loader::new(regions))?;
    log::debug!("{} incidents from {} ({})", table.len(), key.label, key.digest);
    Ok(table)
}
