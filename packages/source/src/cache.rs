//! Memoization of loaded tables keyed on source content.
//!
//! The interactive shell re-requests the same table on every interaction.
//! [`TableCache`] keeps each loaded [`IncidentTable`] under the MD5 digest
//! of the bytes it was parsed from, so an unchanged file or upload is only
//! parsed once. Tables are immutable, so a hit hands out a cheap clone of the
//! shared rows.
//!
//! Each label remembers the digest it last resolved to. When a label starts
//! resolving to new bytes (the file was edited), the table for its old digest
//! is evicted unless another label still points at it.

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::{Mutex, MutexGuard, PoisonError};

use wildfire_source_models::IncidentTable;

use crate::{Loader, SourceError};

/// Identity of a loaded source: content digest plus a display label.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SourceKey {
    /// Lowercase hex MD5 digest of the source bytes.
    pub digest: String,
    /// Where the bytes came from (path or upload name). Not part of identity.
    pub label: String,
}

impl SourceKey {
    /// Computes the key for a byte buffer.
    #[must_use]
    pub fn from_bytes(label: &str, bytes: &[u8]) -> Self {
        Self {
            digest: format!("{:x}", md5::compute(bytes)),
            label: label.to_string(),
        }
    }
}

#[derive(Debug, Default)]
struct Entries {
    /// Loaded tables by digest.
    tables: BTreeMap<String, IncidentTable>,
    /// Latest digest seen for each label.
    labels: BTreeMap<String, String>,
}

impl Entries {
    fn insert(&mut self, key: &SourceKey, table: IncidentTable) {
        self.tables.insert(key.digest.clone(), table);
        self.point(key);
    }

    /// Points `key.label` at `key.digest`, evicting the label's previous
    /// table once nothing references it.
    fn point(&mut self, key: &SourceKey) {
        let Some(previous) = self.labels.insert(key.label.clone(), key.digest.clone()) else {
            return;
        };
        if previous == key.digest || self.labels.values().any(|digest| *digest == previous) {
            return;
        }
        if self.tables.remove(&previous).is_some() {
            log::debug!("Evicted stale table for {} ({previous})", key.label);
        }
    }
}

/// Thread-safe cache of loaded incident tables.
#[derive(Debug, Default)]
pub struct TableCache {
    entries: Mutex<Entries>,
}

impl TableCache {
    /// Creates an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached table for `bytes`, loading it with `loader` on a
    /// miss.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError`] if the load fails. Failed loads are not cached.
    pub fn get_or_load_bytes(
        &self,
        label: &str,
        bytes: &[u8],
        loader: &Loader<'_>,
    ) -> Result<(SourceKey, IncidentTable), SourceError> {
        let key = SourceKey::from_bytes(label, bytes);

        {
            let mut entries = self.lock();
            if let Some(table) = entries.tables.get(&key.digest).cloned() {
                log::debug!("Cache hit for {} ({})", key.label, key.digest);
                entries.point(&key);
                return Ok((key, table));
            }
        }

        log::debug!("Cache miss for {} ({})", key.label, key.digest);
        let loaded = loader.load_bytes(bytes)?;
        self.lock().insert(&key, loaded.table.clone());

        Ok((key, loaded.table))
    }

    /// Reads the file at `path` and returns its cached table, loading it on a
    /// miss.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError`] if the file cannot be read or the load fails.
    pub fn get_or_load_path(
        &self,
        path: &Path,
        loader: &Loader<'_>,
    ) -> Result<(SourceKey, IncidentTable), SourceError> {
        let bytes = std::fs::read(path)?;
        self.get_or_load_bytes(&path.display().to_string(), &bytes, loader)
    }

    /// Looks up a previously loaded table.
    #[must_use]
    pub fn get(&self, key: &SourceKey) -> Option<IncidentTable> {
        self.lock().tables.get(&key.digest).cloned()
    }

    /// Number of cached tables.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().tables.len()
    }

    /// Whether the cache is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock().tables.is_empty()
    }

    fn lock(&self) -> MutexGuard<'_, Entries> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use wildfire_fire_models::StateRegions;

    use super::*;

    const CONTENT: &str = "\
FPA_ID,DISCOVERY_DATE,CONT_DATE,FIRE_SIZE,NWCG_GENERAL_CAUSE,STATE,LATITUDE,LONGITUDE
F1,2000-06-01,2000-06-02,10,Natural,CA,36,-119";

    #[test]
    fn same_bytes_hit_the_cache() {
        let regions = StateRegions::default();
        let loader = Loader::new(&regions);
        let cache = TableCache::new();

        let (key_a, table_a) = cache
            .get_or_load_bytes("upload.csv", CONTENT.as_bytes(), &loader)
            .unwrap();
        let (key_b, table_b) = cache
            .get_or_load_bytes("renamed.csv", CONTENT.as_bytes(), &loader)
            .unwrap();

        assert_eq!(key_a.digest, key_b.digest);
        assert!(table_a.ptr_eq(&table_b));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn edited_source_replaces_its_stale_table() {
        let regions = StateRegions::default();
        let loader = Loader::new(&regions);
        let cache = TableCache::new();

        let (old_key, _) = cache
            .get_or_load_bytes("a.csv", CONTENT.as_bytes(), &loader)
            .unwrap();
        let changed = format!("{CONTENT}\nF2,2001-06-01,2001-06-03,5,Smoking,TX,30,-97");
        let (new_key, table) = cache
            .get_or_load_bytes("a.csv", changed.as_bytes(), &loader)
            .unwrap();

        assert_ne!(old_key.digest, new_key.digest);
        assert_eq!(table.len(), 2);
        assert_eq!(cache.len(), 1);
        assert!(cache.get(&old_key).is_none());
        assert!(cache.get(&new_key).is_some());
    }

    #[test]
    fn shared_digest_survives_one_label_moving_on() {
        let regions = StateRegions::default();
        let loader = Loader::new(&regions);
        let cache = TableCache::new();

        let (shared, _) = cache
            .get_or_load_bytes("a.csv", CONTENT.as_bytes(), &loader)
            .unwrap();
        cache
            .get_or_load_bytes("b.csv", CONTENT.as_bytes(), &loader)
            .unwrap();
        let changed = format!("{CONTENT}\nF2,2001-06-01,2001-06-03,5,Smoking,TX,30,-97");
        cache
            .get_or_load_bytes("a.csv", changed.as_bytes(), &loader)
            .unwrap();

        assert_eq!(cache.len(), 2);
        assert!(cache.get(&shared).is_some());
    }

    #[test]
    fn failed_loads_are_not_cached() {
        let regions = StateRegions::default();
        let loader = Loader::new(&regions);
        let cache = TableCache::new();
        let bad = CONTENT.replace(",CA,", ",ZZ,");

        assert!(
            cache
                .get_or_load_bytes("bad.csv", bad.as_bytes(), &loader)
                .is_err()
        );
        assert!(cache.is_empty());
    }

    #[test]
    fn digest_is_stable() {
        let key = SourceKey::from_bytes("x", b"abc");
        assert_eq!(key.digest, "900150983cd24fb0d6963f7d28e17f72");
    }
}
