use crate::models::{Gender, KpiValue, RawKpiRecord};
use std::collections::BTreeMap;

/// One scalar per KPI id for a single (municipality, year).
pub type KpiValueMap = BTreeMap<String, KpiValue>;

/// Pick the value reported for a record: the first non-null `T` entry,
/// otherwise the first non-null entry of any gender.
pub fn select_value(record: &RawKpiRecord) -> Option<&KpiValue> {
    let total = record
        .values
        .iter()
        .find(|v| v.gender == Gender::Total && v.value.is_some());
    total
        .or_else(|| record.values.iter().find(|v| v.value.is_some()))
        .and_then(|v| v.value.as_ref())
}

/// Reduce raw records to a [`KpiValueMap`].
///
/// Records with no non-null value are omitted. A later record for the same
/// KPI id replaces an earlier one.
pub fn extract(records: &[RawKpiRecord]) -> KpiValueMap {
    let mut out = KpiValueMap::new();
    for record in records {
        if let Some(value) = select_value(record) {
            out.insert(record.kpi_id.clone(), value.clone());
        }
    }
    out
}
