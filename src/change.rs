use crate::models::KpiValue;
use serde::{Deserialize, Serialize};

/// Percentage change from `v1` to `v2` with `v1` as the base.
///
/// `0 -> 0` is no change (`Some(0.0)`); `0 -> x` with `x != 0` is undefined
/// (`None`). Otherwise the change is relative to `|v1|`: a move from -100 to
/// -50 is +50%, and a move from -100 to -150 is -50%.
///
/// ```
/// # use kolada_rs::percent_change;
/// assert_eq!(percent_change(-100.0, -50.0), Some(50.0));
/// assert_eq!(percent_change(-100.0, -150.0), Some(-50.0));
/// assert_eq!(percent_change(0.0, 4.0), None);
/// ```
pub fn percent_change(v1: f64, v2: f64) -> Option<f64> {
    if v1 == 0.0 {
        return if v2 == 0.0 { Some(0.0) } else { None };
    }
    Some((v2 - v1) / v1.abs() * 100.0)
}

pub fn numeric_change(v1: f64, v2: f64) -> f64 {
    v2 - v1
}

/// Change of one KPI between two time points.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChangeRecord {
    pub kpi_id: String,
    pub value_before: KpiValue,
    pub value_after: KpiValue,
    pub percent_change: Option<f64>,
    pub numeric_change: f64,
}

impl ChangeRecord {
    /// Compare two raw values. `None` when either is not numeric.
    pub fn compute(kpi_id: &str, before: &KpiValue, after: &KpiValue) -> Option<Self> {
        let v1 = before.as_number()?;
        let v2 = after.as_number()?;
        Some(Self {
            kpi_id: kpi_id.to_string(),
            value_before: before.clone(),
            value_after: after.clone(),
            percent_change: percent_change(v1, v2),
            numeric_change: numeric_change(v1, v2),
        })
    }
}
