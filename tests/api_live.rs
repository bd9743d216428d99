//! Live API tests. Run with: `cargo test --features online -- --nocapture`
#![cfg(feature = "online")]

use kolada_rs::{Client, MetadataResolver, MetadataSource, extract};

#[test]
fn fetch_municipality_year() {
    let cli = Client::new().unwrap();
    let records = cli.fetch_year_data("1860", 2010).unwrap();
    assert!(!records.is_empty());
    let values = extract(&records);
    assert!(values.contains_key("N01951"));
}

#[test]
fn list_municipalities() {
    let cli = Client::new().unwrap();
    let list = cli.fetch_municipalities().unwrap();
    assert!(list.iter().any(|m| m.id == "1860"));
}

#[test]
fn resolve_population_metadata() {
    let cli = Client::new().unwrap();
    let mut meta = MetadataResolver::new(&cli);
    let m = meta.resolve("N01951").expect("metadata for N01951");
    assert!(m.title.as_deref().is_some_and(|t| !t.is_empty()));
}
