mod common;

use common::*;
use kolada_rs::metadata::{self, NO_DESCRIPTION, UNKNOWN_TITLE};
use kolada_rs::{KpiMetadata, MetadataCache, MetadataResolver, MetadataSource};

#[test]
fn second_resolve_issues_no_request() {
    let client = client(
        ScriptedTransport::new().json(&kpi_url("N01951"), kpi_meta("N01951", "Invånare")),
    );
    let mut resolver = MetadataResolver::new(&client);

    let title = resolver.resolve("N01951").unwrap().title.clone();
    assert_eq!(title.as_deref(), Some("Invånare"));
    assert_eq!(client.transport().call_count(), 1);

    assert!(resolver.resolve("N01951").is_some());
    assert!(resolver.resolve("N01951").is_some());
    assert_eq!(client.transport().call_count(), 1);
    assert_eq!(resolver.cache().len(), 1);
}

#[test]
fn failures_are_not_cached() {
    let client = client(ScriptedTransport::new().route(&kpi_url("X1"), 404, ""));
    let mut resolver = MetadataResolver::new(&client);

    assert!(resolver.resolve("X1").is_none());
    assert!(resolver.resolve("X1").is_none());
    assert_eq!(client.transport().call_count(), 2);
    assert!(resolver.cache().is_empty());
}

#[test]
fn transport_errors_degrade_to_placeholders() {
    // No route at all: the transport itself fails.
    let client = client(ScriptedTransport::new());
    let mut resolver = MetadataResolver::new(&client);
    let (title, description) = metadata::describe(&mut resolver, "N00002");
    assert_eq!(title, UNKNOWN_TITLE);
    assert_eq!(description, NO_DESCRIPTION);
}

#[test]
fn malformed_metadata_body_is_not_fatal() {
    let client = client(ScriptedTransport::new().route(&kpi_url("N1"), 200, "{not json"));
    let mut resolver = MetadataResolver::new(&client);
    assert!(resolver.resolve("N1").is_none());
}

#[test]
fn prefilled_cache_is_used_without_network() {
    let mut cache = MetadataCache::new();
    cache.insert(KpiMetadata {
        id: "N1".into(),
        title: Some("Cached".into()),
        description: None,
        operating_area: None,
        has_ou_data: None,
    });
    let client = client(ScriptedTransport::new());
    let mut resolver = MetadataResolver::with_cache(&client, cache);

    let (title, description) = metadata::describe(&mut resolver, "N1");
    assert_eq!(title, "Cached");
    assert_eq!(description, NO_DESCRIPTION);
    assert_eq!(client.transport().call_count(), 0);
}

#[test]
fn cache_never_replaces_an_entry() {
    let mut cache = MetadataCache::new();
    let mut meta = KpiMetadata {
        id: "N1".into(),
        title: Some("first".into()),
        description: None,
        operating_area: None,
        has_ou_data: None,
    };
    cache.insert(meta.clone());
    meta.title = Some("second".into());
    cache.insert(meta);
    assert_eq!(cache.resolve("N1").unwrap().title.as_deref(), Some("first"));
}
