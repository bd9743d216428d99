use kolada_rs::models::{Gender, GenderValue, RawKpiRecord};
use kolada_rs::{KpiValue, extract};

fn rec(kpi: &str, values: &[(Gender, Option<&str>)]) -> RawKpiRecord {
    RawKpiRecord {
        kpi_id: kpi.into(),
        municipality: Some("1860".into()),
        period: Some(2010),
        values: values
            .iter()
            .map(|(g, v)| GenderValue {
                gender: *g,
                value: v.map(KpiValue::from),
            })
            .collect(),
    }
}

#[test]
fn total_wins_regardless_of_position() {
    let records = vec![rec(
        "N1",
        &[
            (Gender::Male, Some("5")),
            (Gender::Female, Some("3")),
            (Gender::Total, Some("8")),
        ],
    )];
    let map = extract(&records);
    assert_eq!(map["N1"].as_str(), "8");
}

#[test]
fn first_non_null_without_total() {
    let records = vec![
        rec("N1", &[(Gender::Male, Some("5")), (Gender::Female, Some("3"))]),
        rec("N2", &[(Gender::Male, None), (Gender::Female, Some("3"))]),
        rec("N3", &[(Gender::Total, None), (Gender::Male, Some("4"))]),
    ];
    let map = extract(&records);
    assert_eq!(map["N1"].as_str(), "5");
    assert_eq!(map["N2"].as_str(), "3");
    assert_eq!(map["N3"].as_str(), "4");
}

#[test]
fn all_null_kpi_is_omitted() {
    let records = vec![
        rec("N1", &[(Gender::Total, None), (Gender::Male, None)]),
        rec("N2", &[]),
        rec("N3", &[(Gender::Total, Some("1"))]),
    ];
    let map = extract(&records);
    assert!(!map.contains_key("N1"));
    assert!(!map.contains_key("N2"));
    assert_eq!(map.len(), 1);
}

#[test]
fn later_duplicate_overwrites() {
    let records = vec![
        rec("N1", &[(Gender::Total, Some("1"))]),
        rec("N1", &[(Gender::Total, Some("2"))]),
        rec("N1", &[(Gender::Total, None)]),
    ];
    assert_eq!(extract(&records)["N1"].as_str(), "2");
}

#[test]
fn non_numeric_values_are_kept_as_text() {
    let records = vec![rec("N1", &[(Gender::Total, Some("12,5"))])];
    let map = extract(&records);
    assert_eq!(map["N1"].as_str(), "12,5");
    assert_eq!(map["N1"].as_number(), None);
}
