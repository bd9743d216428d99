//! Report assembly: turns extracted values and computed changes into ordered
//! tables for the tabular writer.
//!
//! - Trend: one row per KPI across N consecutive years.
//! - Delta listing: one row per qualifying KPI for a year pair.
//! - Summary: one row per municipality for a year pair.

use crate::change::ChangeRecord;
use crate::config::DeltaPolicy;
use crate::extract::KpiValueMap;
use crate::metadata::{self, MetadataSource, NO_DESCRIPTION};
use crate::models::KpiValue;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// KPI carrying the municipality's population.
pub const POPULATION_KPI: &str = "N01951";
/// Marker for "data present but not comparable" and "not available".
pub const NOT_AVAILABLE: &str = "N/A";

/// Ordered columns plus rows aligned to them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Table {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    pub fn push(&mut self, row: Vec<String>) {
        debug_assert_eq!(row.len(), self.columns.len(), "row width mismatch");
        self.rows.push(row);
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Cell by row index and column name.
    pub fn get(&self, row: usize, column: &str) -> Option<&str> {
        let idx = self.column_index(column)?;
        self.rows.get(row)?.get(idx).map(String::as_str)
    }
}

/// Shortest round-trip rendering in the usual spreadsheet-friendly form:
/// `.0` kept on whole numbers (`3.0`, `-0.5`), exponent notation with a signed
/// two-digit exponent outside `1e-4 <= |v| < 1e16` (`1e-05`, `1.5e+16`).
pub fn fmt_number(v: f64) -> String {
    if !v.is_finite() {
        return format!("{}", v);
    }
    let magnitude = v.abs();
    if magnitude != 0.0 && !(1e-4..1e16).contains(&magnitude) {
        let sci = format!("{:e}", v);
        return match sci.split_once('e') {
            Some((mantissa, exp)) => {
                let exp: i32 = exp.parse().unwrap_or(0);
                let sign = if exp < 0 { '-' } else { '+' };
                format!("{}e{}{:02}", mantissa, sign, exp.abs())
            }
            None => sci,
        };
    }
    if v.fract() == 0.0 {
        format!("{:.1}", v)
    } else {
        format!("{}", v)
    }
}

pub fn fmt_percent(v: f64) -> String {
    format!("{:.2}", v)
}

// ---------------------------------------------------------------------------
// Trend
// ---------------------------------------------------------------------------

pub fn trend_columns(years: &[i32]) -> Vec<String> {
    let mut columns: Vec<String> = vec!["KPI".into(), "Title".into(), "Description".into()];
    columns.extend(years.iter().map(|y| format!("Value {}", y)));
    for pair in years.windows(2) {
        columns.push(format!("Change (%) {}-{}", pair[0], pair[1]));
        columns.push(format!("Change (Number) {}-{}", pair[0], pair[1]));
    }
    columns
}

/// Change cells for one consecutive year pair.
///
/// Blank when either endpoint is missing; `N/A` when both are present but the
/// pair is not comparable.
fn change_cells(
    kpi_id: &str,
    before: Option<&KpiValue>,
    after: Option<&KpiValue>,
) -> (String, String) {
    let (Some(before), Some(after)) = (before, after) else {
        return (String::new(), String::new());
    };
    match ChangeRecord::compute(kpi_id, before, after) {
        Some(rec) => (
            rec.percent_change
                .map(fmt_percent)
                .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
            fmt_number(rec.numeric_change),
        ),
        None => (NOT_AVAILABLE.to_string(), NOT_AVAILABLE.to_string()),
    }
}

/// Build the trend table for one municipality.
///
/// `by_year` holds the extracted values per year; years absent from the map are
/// treated as having no data. Rows are ordered by KPI id and cover every KPI
/// seen in any year.
pub fn trend_table(
    years: &[i32],
    by_year: &BTreeMap<i32, KpiValueMap>,
    meta: &mut impl MetadataSource,
) -> Table {
    let kpis: BTreeSet<&String> = by_year.values().flat_map(|m| m.keys()).collect();
    let value = |year: i32, kpi: &str| by_year.get(&year).and_then(|m| m.get(kpi));

    let mut table = Table::new(trend_columns(years));
    for kpi in kpis {
        let kpi = kpi.as_str();
        let (title, description) = match meta.resolve(kpi) {
            Some(m) => (
                m.title.clone().unwrap_or_else(|| format!("KPI {}", kpi)),
                m.description
                    .clone()
                    .unwrap_or_else(|| NO_DESCRIPTION.to_string()),
            ),
            None => (format!("KPI {}", kpi), NO_DESCRIPTION.to_string()),
        };

        let mut row = vec![kpi.to_string(), title, description];
        row.extend(
            years
                .iter()
                .map(|&y| value(y, kpi).map(|v| v.to_string()).unwrap_or_default()),
        );
        for pair in years.windows(2) {
            let (pct, num) = change_cells(kpi, value(pair[0], kpi), value(pair[1], kpi));
            row.push(pct);
            row.push(num);
        }
        table.push(row);
    }
    table
}

// ---------------------------------------------------------------------------
// Delta listing
// ---------------------------------------------------------------------------

fn is_whole(v: f64) -> bool {
    v.is_finite() && v.fract() == 0.0
}

fn qualifies(change: &ChangeRecord, policy: &DeltaPolicy) -> bool {
    let within_threshold = change
        .percent_change
        .map(|p| p.abs() > 0.0 && p.abs() <= policy.threshold)
        .unwrap_or(false);
    if within_threshold {
        return true;
    }
    if policy.whole_ceiling == 0 {
        return false;
    }
    let ceiling = f64::from(policy.whole_ceiling);
    match (change.value_before.as_number(), change.value_after.as_number()) {
        (Some(v1), Some(v2)) => {
            is_whole(v1) && is_whole(v2) && v1 <= ceiling && v2 <= ceiling && v1 != v2
        }
        _ => false,
    }
}

/// Select the KPIs whose change between two years qualifies under `policy`.
///
/// Only KPIs present in both maps with numeric values are considered. The result
/// is sorted by absolute percent change (undefined counts as 0), ties broken by
/// absolute numeric change.
pub fn select_deltas(
    before: &KpiValueMap,
    after: &KpiValueMap,
    policy: &DeltaPolicy,
) -> Vec<ChangeRecord> {
    let mut out: Vec<ChangeRecord> = before
        .iter()
        .filter_map(|(kpi, v1)| {
            let v2 = after.get(kpi)?;
            ChangeRecord::compute(kpi, v1, v2)
        })
        .filter(|c| qualifies(c, policy))
        .collect();
    out.sort_by(|a, b| {
        let pa = a.percent_change.unwrap_or(0.0).abs();
        let pb = b.percent_change.unwrap_or(0.0).abs();
        pa.total_cmp(&pb)
            .then_with(|| a.numeric_change.abs().total_cmp(&b.numeric_change.abs()))
    });
    out
}

/// A qualifying change with its resolved title and description.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeltaRow {
    pub change: ChangeRecord,
    pub title: String,
    pub description: String,
}

impl DeltaRow {
    /// Percent change for display; undefined shows as 0.
    pub fn display_percent(&self) -> f64 {
        self.change.percent_change.unwrap_or(0.0)
    }

    /// Two-line human-readable form used on stdout.
    pub fn listing(&self, year1: i32, year2: i32) -> String {
        format!(
            "KPI: {} - {}\n  {}: {} | {}: {} | Change: {:.2}%",
            self.change.kpi_id,
            self.title,
            year1,
            self.change.value_before,
            year2,
            self.change.value_after,
            self.display_percent()
        )
    }
}

pub fn describe_deltas(
    changes: Vec<ChangeRecord>,
    meta: &mut impl MetadataSource,
) -> Vec<DeltaRow> {
    changes
        .into_iter()
        .map(|change| {
            let (title, description) = metadata::describe(meta, &change.kpi_id);
            DeltaRow {
                change,
                title,
                description,
            }
        })
        .collect()
}

fn policy_clause(year1: i32, year2: i32, policy: &DeltaPolicy) -> String {
    let mut clause = format!(
        "with a percentage change within ±{}% between {} and {}",
        policy.threshold, year1, year2
    );
    if policy.whole_ceiling > 0 {
        clause.push_str(&format!(
            " or with both values as whole numbers ≤ {} that change by a whole number",
            policy.whole_ceiling
        ));
    }
    clause
}

/// Heading printed above a non-empty delta listing.
pub fn deltas_heading(year1: i32, year2: i32, policy: &DeltaPolicy) -> String {
    format!(
        "KPIs {} (sorted by smallest change):",
        policy_clause(year1, year2, policy)
    )
}

/// Message printed instead of a listing when nothing qualifies.
pub fn no_deltas_message(year1: i32, year2: i32, policy: &DeltaPolicy) -> String {
    format!("No KPIs found {}.", policy_clause(year1, year2, policy))
}

pub fn comparison_columns(year1: i32, year2: i32) -> Vec<String> {
    vec![
        "KPI".into(),
        "Title".into(),
        format!("Value {}", year1),
        format!("Value {}", year2),
        "Change (%)".into(),
        "Change (Number)".into(),
        "Description".into(),
    ]
}

pub fn comparison_table(year1: i32, year2: i32, rows: &[DeltaRow]) -> Table {
    let mut table = Table::new(comparison_columns(year1, year2));
    for r in rows {
        table.push(vec![
            r.change.kpi_id.clone(),
            r.title.clone(),
            r.change.value_before.to_string(),
            r.change.value_after.to_string(),
            fmt_percent(r.display_percent()),
            fmt_number(r.change.numeric_change),
            r.description.clone(),
        ]);
    }
    table
}

// ---------------------------------------------------------------------------
// Summary
// ---------------------------------------------------------------------------

/// Number of KPIs present in both years whose numeric change is exactly ±1.
pub fn count_unit_changes(before: &KpiValueMap, after: &KpiValueMap) -> usize {
    before
        .iter()
        .filter_map(|(kpi, v1)| ChangeRecord::compute(kpi, v1, after.get(kpi)?))
        .filter(|c| c.numeric_change.abs() == 1.0)
        .count()
}

/// Population value for the year, or `N/A`.
pub fn population(values: &KpiValueMap) -> String {
    values
        .get(POPULATION_KPI)
        .map(|v| v.to_string())
        .unwrap_or_else(|| NOT_AVAILABLE.to_string())
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryRow {
    pub municipality_id: String,
    pub municipality_name: String,
    pub changed_by_one: usize,
    pub population: String,
}

impl SummaryRow {
    pub fn new(id: &str, name: &str, before: &KpiValueMap, after: &KpiValueMap) -> Self {
        Self {
            municipality_id: id.to_string(),
            municipality_name: name.to_string(),
            changed_by_one: count_unit_changes(before, after),
            population: population(after),
        }
    }
}

pub fn summary_table(rows: &[SummaryRow]) -> Table {
    let mut table = Table::new(vec![
        "Municipality ID".into(),
        "Municipality Name".into(),
        "KPIs changed by 1".into(),
        "Population".into(),
    ]);
    for r in rows {
        table.push(vec![
            r.municipality_id.clone(),
            r.municipality_name.clone(),
            r.changed_by_one.to_string(),
            r.population.clone(),
        ]);
    }
    table
}
