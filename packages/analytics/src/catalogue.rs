//! The fixed catalogue of named tables.
//!
//! Each [`TableName`] maps to one builder. Builders only read the shared
//! incident table and each writes its own entry, so the whole catalogue is
//! built with `rayon` without any coordination. A builder that fails marks
//! its own entry unavailable and the rest of the catalogue is unaffected.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Instant;

use rayon::prelude::*;
use wildfire_analytics_models::{
    AnalysisConfig, Catalogue, CatalogueEntry, CrossTab, DerivedTable, Dimension, KeyValue,
    StateProfile, Statistic, TableName, ValueColumn,
};
use wildfire_fire_models::Cause;
use wildfire_source::progress::ProgressCallback;
use wildfire_source_models::IncidentTable;

use crate::derived::{rolling_columns, row_percentages, trend};
use crate::rollup::{crosstab, regroup, regroup_with_ci, rollup, rollup_with_ci};
use crate::AnalyticsError;

/// Builds every table in [`TableName::all`] over `table`.
#[must_use]
pub fn build_catalogue(
    table: &IncidentTable,
    config: &AnalysisConfig,
    progress: &Arc<dyn ProgressCallback>,
) -> Catalogue {
    let start = Instant::now();
    let names = TableName::all();

    let years = table.years();
    match (years.first(), years.last()) {
        (Some(first), Some(last)) => log::info!(
            "Building {} tables from {} incidents ({first}-{last})",
            names.len(),
            table.len()
        ),
        _ => log::info!("Building {} tables from an empty incident table", names.len()),
    }
    progress.set_total(names.len() as u64);
    progress.set_message("Building tables".to_string());

    let entries: BTreeMap<TableName, CatalogueEntry> = names
        .par_iter()
        .map(|&name| {
            let entry = match build_table(table, config, name) {
                Ok(derived) => {
                    log::debug!("Built {name}");
                    CatalogueEntry::Available { table: derived }
                }
                Err(e) => {
                    log::warn!("Table {name} unavailable: {e}");
                    CatalogueEntry::Unavailable {
                        reason: e.to_string(),
                    }
                }
            };
            progress.inc(1);
            (name, entry)
        })
        .collect();

    let catalogue = Catalogue { entries };
    let unavailable = catalogue.unavailable().len();

    log::info!(
        "Built {} of {} tables in {:.2}s",
        catalogue.len() - unavailable,
        catalogue.len(),
        start.elapsed().as_secs_f64()
    );
    progress.finish(format!(
        "{} tables ({unavailable} unavailable)",
        catalogue.len()
    ));

    catalogue
}

/// Builds a single named table.
///
/// # Errors
///
/// Returns [`AnalyticsError`] if the table cannot be derived from this
/// input, for example a trend over a single year.
pub fn build_table(
    table: &IncidentTable,
    config: &AnalysisConfig,
    name: TableName,
) -> Result<DerivedTable, AnalyticsError> {
    use Dimension::{
        Cause as ByCause, DayOfWeek, GeneralCause, Month, Region, SizeClass, State, Year,
    };
    use Statistic::{Count, Mean, Sum};
    use ValueColumn::{Duration, FireSize};

    Ok(match name {
        TableName::FiresByYear => DerivedTable::Rollup(rollup(table, &[Year], FireSize, Count)),
        TableName::FiresByYearAndMonth => {
            let tab = crosstab(table, Year, Month);
            DerivedTable::CrossTab(with_display_order(&tab))
        }
        TableName::FiresByDayOfWeekAndYear => {
            let tab = crosstab(table, DayOfWeek, Year);
            DerivedTable::CrossTab(with_display_order(&tab))
        }
        TableName::MeanFireSizeByYear => {
            DerivedTable::Rollup(rollup(table, &[Year], FireSize, Mean))
        }
        TableName::TotalFireSizeByYear => {
            DerivedTable::Rollup(rollup(table, &[Year], FireSize, Sum))
        }
        TableName::MeanFireSizeByYearAndState => {
            DerivedTable::Rollup(rollup(table, &[Year, State], FireSize, Mean))
        }
        TableName::TotalFireSizeByYearAndState => {
            DerivedTable::Rollup(rollup(table, &[Year, State], FireSize, Sum))
        }
        TableName::MeanFireSizeByState => DerivedTable::Rollup(regroup(
            &rollup(table, &[State, Year], FireSize, Mean),
            &[State],
            Mean,
        )?),
        TableName::FireSizeByMonthCi => DerivedTable::Ci(rollup_with_ci(table, &[Month], FireSize)),
        TableName::DurationByMonthCi => DerivedTable::Ci(rollup_with_ci(table, &[Month], Duration)),
        TableName::FireSizeByMonthAndCauseCi => {
            DerivedTable::Ci(rollup_with_ci(table, &[Month, ByCause], FireSize))
        }
        TableName::DurationByMonthAndCauseCi => {
            DerivedTable::Ci(rollup_with_ci(table, &[Month, ByCause], Duration))
        }
        TableName::FiresByMonthAndCauseCi => DerivedTable::Ci(regroup_with_ci(
            &rollup(table, &[Year, Month, ByCause], FireSize, Count),
            &[Month, ByCause],
        )?),
        TableName::FiresByMonthAndHumanCauseCi => {
            let human = human_caused(table)?;
            let ci = regroup_with_ci(
                &rollup(&human, &[Year, Month, GeneralCause], FireSize, Count),
                &[Month, GeneralCause],
            )?;
            // One monthly series per human cause.
            DerivedTable::Ci(ci.ordered_by(1, &human_general_causes()))
        }
        TableName::SizeClassByCausePercent => DerivedTable::Percent(row_percentages(
            &with_display_order(&crosstab(table, SizeClass, ByCause)),
        )?),
        TableName::RegionByCausePercent => DerivedTable::Percent(row_percentages(
            &with_display_order(&crosstab(table, Region, ByCause)),
        )?),
        TableName::FiresByYearAndRegion => {
            DerivedTable::CrossTab(with_display_order(&crosstab(table, Year, Region)))
        }
        TableName::FireSizeTrend => DerivedTable::Trend(trend(table, FireSize)?),
        TableName::DurationTrend => DerivedTable::Trend(trend(table, Duration)?),
        TableName::MeanDurationByYear => {
            DerivedTable::Rollup(rollup(table, &[Year], Duration, Mean))
        }
        TableName::MeanDurationByState => DerivedTable::Rollup(regroup(
            &rollup(table, &[State, Year], Duration, Mean),
            &[State],
            Mean,
        )?),
        TableName::MeanDurationByYearAndState => {
            DerivedTable::Rollup(rollup(table, &[Year, State], Duration, Mean))
        }
        TableName::MeanFireSizeByYearAndCause => {
            DerivedTable::Rollup(rollup(table, &[Year, ByCause], FireSize, Mean))
        }
        TableName::MeanDurationByYearAndCause => {
            DerivedTable::Rollup(rollup(table, &[Year, ByCause], Duration, Mean))
        }
        TableName::FiresByYearAndCause => {
            DerivedTable::CrossTab(with_display_order(&crosstab(table, Year, ByCause)))
        }
        TableName::MeanFiresPerYearByState => DerivedTable::Rollup(regroup(
            &rollup(table, &[State, Year], FireSize, Count),
            &[State],
            Mean,
        )?),
        TableName::MeanFireSizeByDayOfWeekAndCause => {
            DerivedTable::Rollup(rollup(table, &[DayOfWeek, ByCause], FireSize, Mean))
        }
        TableName::FiresByYearAndRegionRolling => {
            let tab = with_contiguous_years(&with_display_order(&crosstab(table, Year, Region)));
            DerivedTable::Rolling(rolling_columns(&tab, config.rolling_window)?)
        }
    })
}

/// Builds the tables of a single state's detail page.
///
/// # Errors
///
/// Returns [`AnalyticsError::EmptyGroup`] if no incident belongs to `state`.
pub fn state_profile(table: &IncidentTable, state: &str) -> Result<StateProfile, AnalyticsError> {
    let code = state.trim();
    let subset = table.filter(|row| row.state.eq_ignore_ascii_case(code));

    let first = subset.iter().next().ok_or_else(|| AnalyticsError::EmptyGroup {
        what: format!("state '{code}'"),
    })?;
    let (state, state_name, region) = (first.state.clone(), first.state_name.clone(), first.region);

    log::debug!("Building profile for {state_name} ({} incidents)", subset.len());

    let fires_by_year_and_cause =
        all_causes(&crosstab(&subset, Dimension::Year, Dimension::Cause));
    let fires_by_year_and_month =
        with_display_order(&crosstab(&subset, Dimension::Year, Dimension::Month));
    let total_fire_size_by_year = rollup(
        &subset,
        &[Dimension::Year],
        ValueColumn::FireSize,
        Statistic::Sum,
    );
    let cause_percent_by_year = row_percentages(&fires_by_year_and_cause)?;

    Ok(StateProfile {
        state,
        state_name,
        region,
        incidents: subset.len(),
        fires_by_year_and_cause,
        fires_by_year_and_month,
        total_fire_size_by_year,
        cause_percent_by_year,
    })
}

/// The incidents whose cause collapses into "Individuals' mistake".
fn human_caused(table: &IncidentTable) -> Result<IncidentTable, AnalyticsError> {
    let human = table.filter(|row| row.cause == Cause::IndividualsMistake);
    if human.is_empty() {
        return Err(AnalyticsError::EmptyGroup {
            what: format!("cause '{}'", Cause::IndividualsMistake),
        });
    }
    Ok(human)
}

fn human_general_causes() -> Vec<KeyValue> {
    wildfire_fire_models::GeneralCause::for_cause(Cause::IndividualsMistake)
        .into_iter()
        .map(KeyValue::GeneralCause)
        .collect()
}

/// Reorders a cross-tab's fixed-vocabulary axes into display order, keeping
/// only the keys that were observed.
fn with_display_order(tab: &CrossTab) -> CrossTab {
    let rows = observed_in_order(&tab.row_keys, tab.row_dimension);
    let columns = observed_in_order(&tab.column_keys, tab.column_dimension);
    tab.reindexed(&rows, &columns)
}

fn observed_in_order(keys: &[KeyValue], dimension: Dimension) -> Vec<KeyValue> {
    dimension.display_order().map_or_else(
        || keys.to_vec(),
        |order| order.into_iter().filter(|k| keys.contains(k)).collect(),
    )
}

/// Spreads the cause axis over every cause, observed or not.
fn all_causes(tab: &CrossTab) -> CrossTab {
    let causes: Vec<KeyValue> = Cause::all().iter().map(|&c| KeyValue::Cause(c)).collect();
    tab.reindexed(&tab.row_keys, &causes)
}

/// Fills gaps in a year-indexed cross-tab with zero rows so a rolling window
/// spans calendar years rather than observed years.
fn with_contiguous_years(tab: &CrossTab) -> CrossTab {
    let years: Vec<i32> = tab.row_keys.iter().filter_map(KeyValue::as_year).collect();
    match (years.iter().min(), years.iter().max()) {
        (Some(&first), Some(&last)) => {
            let rows: Vec<KeyValue> = (first..=last).map(KeyValue::Year).collect();
            tab.reindexed(&rows, &tab.column_keys)
        }
        _ => tab.clone(),
    }
}

#[cfg(test)]
mod tests {
    use wildfire_fire_models::GeneralCause;
    use wildfire_source::progress::null_progress;

    use super::*;
    use crate::fixtures::{incident, table};

    const EPS: f64 = 1e-9;

    fn sample() -> IncidentTable {
        table(vec![
            incident(2000, 6, "CA", GeneralCause::Natural, 10.0, 2.0),
            incident(2000, 7, "CA", GeneralCause::Arson, 5.0, 4.0),
            incident(2001, 6, "CA", GeneralCause::Natural, 20.0, 6.0),
            incident(2001, 8, "TX", GeneralCause::Smoking, 1.0, 1.0),
            incident(2003, 8, "TX", GeneralCause::DebrisBurning, 3.0, 2.0),
            incident(2003, 9, "FL", GeneralCause::PowerGeneration, 7.0, 3.0),
        ])
    }

    #[test]
    fn every_name_gets_an_entry() {
        let catalogue = build_catalogue(&sample(), &AnalysisConfig::default(), &null_progress());
        assert_eq!(catalogue.len(), TableName::all().len());
        assert!(catalogue.unavailable().is_empty());
    }

    #[test]
    fn failing_builders_do_not_affect_others() {
        let single_year = sample().filter(|row| row.year == 2000);
        let catalogue =
            build_catalogue(&single_year, &AnalysisConfig::default(), &null_progress());

        // One year leaves no trend, and 2000 has no human-caused fire.
        assert_eq!(
            catalogue.unavailable(),
            vec![
                TableName::FiresByMonthAndHumanCauseCi,
                TableName::FireSizeTrend,
                TableName::DurationTrend,
            ]
        );
        assert!(catalogue.table(TableName::FiresByYear).is_some());
    }

    #[test]
    fn no_human_causes_marks_only_that_table() {
        let natural_only = sample().filter(|row| row.cause == Cause::Natural);
        let catalogue =
            build_catalogue(&natural_only, &AnalysisConfig::default(), &null_progress());
        assert_eq!(
            catalogue.unavailable(),
            vec![TableName::FiresByMonthAndHumanCauseCi]
        );
    }

    #[test]
    fn mean_fire_size_by_year_matches_rows() {
        let table = sample().filter(|row| row.state == "CA");
        let Ok(DerivedTable::Rollup(means)) =
            build_table(&table, &AnalysisConfig::default(), TableName::MeanFireSizeByYear)
        else {
            panic!("expected a rollup");
        };
        assert!((means.get(&[KeyValue::Year(2000)]).unwrap() - 7.5).abs() < EPS);
        assert!((means.get(&[KeyValue::Year(2001)]).unwrap() - 20.0).abs() < EPS);
    }

    #[test]
    fn region_percentages_use_display_order() {
        let Ok(DerivedTable::Percent(pct)) =
            build_table(&sample(), &AnalysisConfig::default(), TableName::RegionByCausePercent)
        else {
            panic!("expected percentages");
        };
        let causes: Vec<_> = pct.column_keys.clone();
        let mut sorted = causes.clone();
        sorted.sort();
        assert_eq!(causes, sorted);
        for row in &pct.cells {
            assert!((row.iter().sum::<f64>() - 100.0).abs() < 1e-9);
        }
    }

    #[test]
    fn rolling_regions_span_missing_years() {
        let config = AnalysisConfig::default().with_rolling_window(2);
        let Ok(DerivedTable::Rolling(rolled)) =
            build_table(&sample(), &config, TableName::FiresByYearAndRegionRolling)
        else {
            panic!("expected a rolling table");
        };
        assert_eq!(
            rolled.row_keys,
            (2000..=2003).map(KeyValue::Year).collect::<Vec<_>>()
        );
        assert!(rolled.cells[0].iter().all(Option::is_none));
        assert!(rolled.cells[1].iter().all(Option::is_some));
    }

    #[test]
    fn zero_rolling_window_is_unavailable() {
        let config = AnalysisConfig::default().with_rolling_window(0);
        let catalogue = build_catalogue(&sample(), &config, &null_progress());
        assert_eq!(
            catalogue.unavailable(),
            vec![TableName::FiresByYearAndRegionRolling]
        );
    }

    #[test]
    fn human_cause_ci_only_counts_human_causes() {
        let Ok(DerivedTable::Ci(ci)) = build_table(
            &sample(),
            &AnalysisConfig::default(),
            TableName::FiresByMonthAndHumanCauseCi,
        ) else {
            panic!("expected a CI table");
        };
        assert!(ci.rows.iter().all(|row| matches!(
            &row.keys[1],
            KeyValue::GeneralCause(g) if g.cause() == Cause::IndividualsMistake
        )));
        assert_eq!(ci.len(), 2);
    }

    #[test]
    fn human_cause_ci_is_grouped_by_cause() {
        let mut rows: Vec<_> = sample().iter().cloned().collect();
        rows.push(incident(2002, 6, "TX", GeneralCause::Smoking, 2.0, 1.0));
        rows.push(incident(2002, 9, "TX", GeneralCause::DebrisBurning, 2.0, 1.0));
        let Ok(DerivedTable::Ci(ci)) = build_table(
            &table(rows),
            &AnalysisConfig::default(),
            TableName::FiresByMonthAndHumanCauseCi,
        ) else {
            panic!("expected a CI table");
        };

        let keys: Vec<_> = ci.rows.iter().map(|row| row.keys.clone()).collect();
        let key = |month, cause| vec![KeyValue::Month(month), KeyValue::GeneralCause(cause)];
        assert_eq!(
            keys,
            vec![
                key(8, GeneralCause::DebrisBurning),
                key(9, GeneralCause::DebrisBurning),
                key(6, GeneralCause::Smoking),
                key(8, GeneralCause::Smoking),
            ]
        );
    }

    #[test]
    fn state_profile_for_known_state() {
        let profile = state_profile(&sample(), "ca").unwrap();
        assert_eq!(profile.state, "CA");
        assert_eq!(profile.state_name, "California");
        assert_eq!(profile.incidents, 3);
        assert_eq!(profile.fires_by_year_and_cause.column_keys.len(), Cause::all().len());
        let total_2000 = profile
            .total_fire_size_by_year
            .get(&[KeyValue::Year(2000)])
            .unwrap();
        assert!((total_2000 - 15.0).abs() < EPS);

        let natural = profile
            .cause_percent_by_year
            .get(&KeyValue::Year(2000), &KeyValue::Cause(Cause::Natural))
            .unwrap();
        assert!((natural - 50.0).abs() < EPS);
    }

    #[test]
    fn state_profile_for_absent_state() {
        assert!(matches!(
            state_profile(&sample(), "NV"),
            Err(AnalyticsError::EmptyGroup { .. })
        ));
    }

    #[test]
    fn catalogue_serializes_to_json() {
        let catalogue = build_catalogue(&sample(), &AnalysisConfig::default(), &null_progress());
        let json = serde_json::to_value(&catalogue).unwrap();
        assert_eq!(json["entries"]["fires-by-year"]["status"], "available");
        assert_eq!(json["entries"]["fires-by-year"]["table"]["kind"], "rollup");
    }
}
