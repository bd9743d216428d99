use crate::models::Municipality;
use crate::report::Table;
use anyhow::Result;
use csv::WriterBuilder;
use std::borrow::Cow;
use std::path::Path;

pub const SUMMARY_FILE: &str = "municipalities_changes.csv";
pub const COMPARISON_FILE: &str = "kpi_comparison.csv";

/// `{id}_{name with spaces as underscores}.csv`
pub fn trend_file_name(municipality: &Municipality) -> String {
    format!(
        "{}_{}.csv",
        municipality.id,
        municipality.display_name().replace(' ', "_")
    )
}

// Cells a spreadsheet would evaluate as a formula get a leading quote.
fn guard_formula(cell: &str) -> Cow<'_, str> {
    if cell.starts_with(['=', '+', '@']) {
        Cow::Owned(format!("'{}", cell))
    } else {
        Cow::Borrowed(cell)
    }
}

/// Save a table as CSV with header.
pub fn save_table<P: AsRef<Path>>(table: &Table, path: P) -> Result<()> {
    let mut wtr = WriterBuilder::new().from_path(path)?;
    wtr.write_record(&table.columns)?;
    for row in &table.rows {
        wtr.write_record(row.iter().map(|c| guard_formula(c).into_owned()))?;
    }
    wtr.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn write_table() {
        let dir = tempdir().unwrap();
        let p = dir.path().join("x.csv");
        let mut t = Table::new(vec!["KPI".into(), "Title".into()]);
        t.push(vec!["N01951".into(), "Invånare totalt, antal".into()]);
        save_table(&t, &p).unwrap();
        let txt = std::fs::read_to_string(&p).unwrap();
        assert_eq!(txt, "KPI,Title\nN01951,\"Invånare totalt, antal\"\n");
    }

    #[test]
    fn trend_file_name_replaces_spaces() {
        let m = Municipality {
            id: "0180".into(),
            title: None,
            name: Some("Upplands Väsby".into()),
        };
        assert_eq!(trend_file_name(&m), "0180_Upplands_Väsby.csv");
    }

    #[test]
    fn negative_numbers_are_not_guarded() {
        assert_eq!(guard_formula("-1.0"), "-1.0");
        assert_eq!(guard_formula("=1+1"), "'=1+1");
    }
}
