//! KPI title/description lookup with a run-scoped cache.
//!
//! The cache only grows: an entry, once stored, is never re-fetched or evicted
//! for the lifetime of the cache. Failed lookups are not stored, so a later call
//! for the same id goes to the network again.

use crate::api::{Client, Transport};
use crate::models::KpiMetadata;
use ahash::AHashMap;

pub const UNKNOWN_TITLE: &str = "Unknown KPI Title";
pub const NO_DESCRIPTION: &str = "No description available.";

/// Anything that can answer "what is KPI `id`?".
pub trait MetadataSource {
    fn resolve(&mut self, kpi_id: &str) -> Option<&KpiMetadata>;
}

#[derive(Debug, Clone, Default)]
pub struct MetadataCache {
    entries: AHashMap<String, KpiMetadata>,
}

impl MetadataCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, kpi_id: &str) -> Option<&KpiMetadata> {
        self.entries.get(kpi_id)
    }

    pub fn insert(&mut self, meta: KpiMetadata) {
        self.entries.entry(meta.id.clone()).or_insert(meta);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Offline lookup: only what is already cached.
impl MetadataSource for MetadataCache {
    fn resolve(&mut self, kpi_id: &str) -> Option<&KpiMetadata> {
        self.get(kpi_id)
    }
}

/// Resolves metadata through the cache, fetching on a miss.
pub struct MetadataResolver<'a, T> {
    client: &'a Client<T>,
    cache: MetadataCache,
}

impl<'a, T: Transport> MetadataResolver<'a, T> {
    pub fn new(client: &'a Client<T>) -> Self {
        Self::with_cache(client, MetadataCache::new())
    }

    pub fn with_cache(client: &'a Client<T>, cache: MetadataCache) -> Self {
        Self { client, cache }
    }

    pub fn cache(&self) -> &MetadataCache {
        &self.cache
    }

    pub fn into_cache(self) -> MetadataCache {
        self.cache
    }
}

impl<T: Transport> MetadataSource for MetadataResolver<'_, T> {
    fn resolve(&mut self, kpi_id: &str) -> Option<&KpiMetadata> {
        if self.cache.get(kpi_id).is_some() {
            log::debug!("metadata cache hit for {}", kpi_id);
        } else {
            match self.client.fetch_kpi_metadata(kpi_id) {
                Ok(Some(meta)) => {
                    // Key by the requested id so later lookups hit regardless of the payload id.
                    self.cache.entries.insert(kpi_id.to_string(), meta);
                }
                Ok(None) => {
                    log::warn!("Metadata for KPI {} could not be fetched", kpi_id);
                    return None;
                }
                Err(e) => {
                    log::warn!("Metadata for KPI {} could not be fetched: {:#}", kpi_id, e);
                    return None;
                }
            }
        }
        self.cache.get(kpi_id)
    }
}

/// Title and description for display, falling back to placeholders.
pub fn describe(source: &mut impl MetadataSource, kpi_id: &str) -> (String, String) {
    match source.resolve(kpi_id) {
        Some(meta) => (
            meta.title.clone().unwrap_or_else(|| UNKNOWN_TITLE.to_string()),
            meta.description
                .clone()
                .unwrap_or_else(|| NO_DESCRIPTION.to_string()),
        ),
        None => (UNKNOWN_TITLE.to_string(), NO_DESCRIPTION.to_string()),
    }
}
