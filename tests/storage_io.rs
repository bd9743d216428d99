use kolada_rs::report::Table;
use kolada_rs::storage;

fn sample(n: usize) -> Table {
    let mut t = Table::new(vec![
        "KPI".into(),
        "Title".into(),
        "Value 2010".into(),
        "Change (%)".into(),
    ]);
    for i in 0..n {
        t.push(vec![
            format!("N{:05}", i),
            format!("Andel \"behöriga\", kvinnor {}", i),
            String::new(),
            "-1.25".into(),
        ]);
    }
    t
}

#[test]
fn written_table_reads_back_with_same_shape() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(storage::COMPARISON_FILE);
    let table = sample(3);
    storage::save_table(&table, &path).unwrap();

    let mut rdr = csv::Reader::from_path(&path).unwrap();
    let headers: Vec<String> = rdr.headers().unwrap().iter().map(String::from).collect();
    assert_eq!(headers, table.columns);

    let rows: Vec<Vec<String>> = rdr
        .records()
        .map(|r| r.unwrap().iter().map(String::from).collect())
        .collect();
    assert_eq!(rows.len(), table.len());
    assert_eq!(rows, table.rows);
}

#[test]
fn empty_table_writes_header_only() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(storage::SUMMARY_FILE);
    storage::save_table(&sample(0), &path).unwrap();
    let txt = std::fs::read_to_string(&path).unwrap();
    assert_eq!(txt.lines().count(), 1);
    assert!(txt.starts_with("KPI,Title,Value 2010,Change (%)"));
}

//test if the CSV file won't include executable formulas
//a KPI title opened in a spreadsheet must not be evaluated
#[test]
fn csv_cells_are_prefixed_to_avoid_formulas() {
    let mut t = Table::new(vec!["KPI".into(), "Title".into(), "Change (Number)".into()]);
    t.push(vec![
        "=HYPERLINK(\"http://evil\")".into(),
        "@foo".into(),
        "-4.0".into(),
    ]);
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("guard.csv");
    storage::save_table(&t, &path).unwrap();

    let mut rdr = csv::Reader::from_path(&path).unwrap();
    let row = rdr.records().next().expect("one data row expected").unwrap();
    assert!(row[0].starts_with("'="), "not prefixed: {}", &row[0]);
    assert_eq!(&row[1], "'@foo");
    assert_eq!(&row[2], "-4.0");
}
