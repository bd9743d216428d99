//! Fetch-and-assemble steps for each report, one unit of work at a time.
//!
//! All fetches are sequential. Any mandatory fetch failure aborts the unit of
//! work it belongs to and is returned to the caller unchanged.

use crate::api::{Client, Transport};
use crate::config::{CompareConfig, SummaryConfig, TrendConfig};
use crate::extract::{KpiValueMap, extract};
use crate::metadata::MetadataSource;
use crate::models::Municipality;
use crate::report::{self, DeltaRow, SummaryRow, Table};
use crate::storage;
use anyhow::{Context, Result, bail};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Fetch and extract one municipality/year.
pub fn fetch_values<T: Transport>(
    client: &Client<T>,
    municipality_id: &str,
    year: i32,
) -> Result<KpiValueMap> {
    let records = client
        .fetch_year_data(municipality_id, year)
        .with_context(|| {
            format!("fetch data for municipality {} year {}", municipality_id, year)
        })?;
    Ok(extract(&records))
}

/// Keep the whole list, or only the municipality with id `only`.
///
/// ### Errors
/// `only` names an id that is not in the list.
pub fn select_municipalities(
    mut list: Vec<Municipality>,
    only: Option<&str>,
) -> Result<Vec<Municipality>> {
    if let Some(id) = only {
        list.retain(|m| m.id == id);
        if list.is_empty() {
            bail!("unknown municipality id: {}", id);
        }
    }
    Ok(list)
}

/// Trend table for one municipality over `years`.
pub fn municipality_trend<T: Transport>(
    client: &Client<T>,
    meta: &mut impl MetadataSource,
    municipality_id: &str,
    years: &[i32],
) -> Result<Table> {
    let mut by_year = BTreeMap::new();
    for &year in years {
        by_year.insert(year, fetch_values(client, municipality_id, year)?);
    }
    Ok(report::trend_table(years, &by_year, meta))
}

/// Write one trend file per selected municipality into `out_dir`.
///
/// Stops at the first failing municipality; files written before it stay.
pub fn write_trends<T: Transport>(
    client: &Client<T>,
    meta: &mut impl MetadataSource,
    config: &TrendConfig,
    out_dir: &Path,
) -> Result<Vec<PathBuf>> {
    let municipalities = client
        .fetch_municipalities()
        .context("fetch municipality list")?;
    log::info!("Found {} municipalities.", municipalities.len());
    let municipalities = select_municipalities(municipalities, config.municipality.as_deref())?;

    let mut written = Vec::with_capacity(municipalities.len());
    for m in &municipalities {
        let table = municipality_trend(client, meta, &m.id, &config.years)?;
        let path = out_dir.join(storage::trend_file_name(m));
        storage::save_table(&table, &path)?;
        log::info!(
            "Written CSV for municipality {} - {}: {}",
            m.id,
            m.display_name(),
            path.display()
        );
        written.push(path);
    }
    Ok(written)
}

/// Qualifying year-pair changes for one municipality, with titles resolved.
pub fn compare_years<T: Transport>(
    client: &Client<T>,
    meta: &mut impl MetadataSource,
    config: &CompareConfig,
) -> Result<Vec<DeltaRow>> {
    let before = fetch_values(client, &config.municipality, config.year1)?;
    let after = fetch_values(client, &config.municipality, config.year2)?;
    let changes = report::select_deltas(&before, &after, &config.policy);
    log::info!(
        "{} KPIs qualify between {} and {}",
        changes.len(),
        config.year1,
        config.year2
    );
    Ok(report::describe_deltas(changes, meta))
}

/// Write `kpi_comparison.csv` into `out_dir`; nothing is written for no rows.
pub fn write_comparison(
    config: &CompareConfig,
    rows: &[DeltaRow],
    out_dir: &Path,
) -> Result<Option<PathBuf>> {
    if rows.is_empty() {
        return Ok(None);
    }
    let table = report::comparison_table(config.year1, config.year2, rows);
    let path = out_dir.join(storage::COMPARISON_FILE);
    storage::save_table(&table, &path)?;
    Ok(Some(path))
}

/// Summary row for one municipality.
pub fn summarize_municipality<T: Transport>(
    client: &Client<T>,
    municipality: &Municipality,
    config: &SummaryConfig,
) -> Result<SummaryRow> {
    let before = fetch_values(client, &municipality.id, config.year1)?;
    let after = fetch_values(client, &municipality.id, config.year2)?;
    Ok(SummaryRow::new(
        &municipality.id,
        &municipality.display_name(),
        &before,
        &after,
    ))
}

/// Summary rows for every municipality, in listing order.
pub fn summarize<T: Transport>(
    client: &Client<T>,
    config: &SummaryConfig,
) -> Result<Vec<SummaryRow>> {
    let municipalities = client
        .fetch_municipalities()
        .context("fetch municipality list")?;
    log::info!("Found {} municipalities.", municipalities.len());
    municipalities
        .iter()
        .map(|m| summarize_municipality(client, m, config))
        .collect()
}

/// Write `municipalities_changes.csv` into `out_dir`.
pub fn write_summary<T: Transport>(
    client: &Client<T>,
    config: &SummaryConfig,
    out_dir: &Path,
) -> Result<PathBuf> {
    let rows = summarize(client, config)?;
    let path = out_dir.join(storage::SUMMARY_FILE);
    storage::save_table(&report::summary_table(&rows), &path)?;
    Ok(path)
}
