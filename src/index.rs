//! The autocomplete index: store, remove, and prefix-query entries.

use crate::error::{InputError, Result};
use crate::keys::{KeyBuilder, MetaKind};
use crate::store::IndexStore;
use crate::tokenizer::{Tokenizer, DEFAULT_STOP_WORDS, MIN_LETTERS};
use crate::types::{Entry, EntryInput};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Default time-to-live for query cache cells.
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(600);

/// Configuration for an [`AutocompleteIndex`].
#[derive(Debug, Clone)]
pub struct IndexConfig {
    /// Namespace prefix applied to every store key.
    pub namespace: String,
    /// Minimum letters a word needs to be indexed.
    pub min_letters: usize,
    /// Words never indexed or matched.
    pub stop_words: Vec<String>,
    /// Time-to-live for query cache cells.
    pub cache_ttl: Duration,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            namespace: "autocomplete".to_string(),
            min_letters: MIN_LETTERS,
            stop_words: DEFAULT_STOP_WORDS.iter().map(|w| w.to_string()).collect(),
            cache_ttl: DEFAULT_CACHE_TTL,
        }
    }
}

/// Prefix autocomplete over a sorted-set/hash store.
///
/// The index keeps no state of its own; everything lives in the store, so a
/// single instance is safe to share across tasks. Entries are partitioned
/// into independent namespaces ("bins"); the empty string is the
/// conventional default bin.
///
/// Per-call atomicity is whatever the store gives each primitive. A `store`
/// racing a `find` for the same id may observe a partially-written entry,
/// and the query cache is never invalidated by writes; it only expires.
pub struct AutocompleteIndex {
    store: Arc<dyn IndexStore>,
    keys: KeyBuilder,
    tokenizer: Tokenizer,
    cache_ttl: Duration,
}

impl AutocompleteIndex {
    /// Create an index with the default configuration.
    pub fn new(store: Arc<dyn IndexStore>) -> Self {
        Self::with_config(store, IndexConfig::default())
    }

    /// Create an index with an explicit configuration.
    pub fn with_config(store: Arc<dyn IndexStore>, config: IndexConfig) -> Self {
        Self {
            store,
            keys: KeyBuilder::new(config.namespace),
            tokenizer: Tokenizer::new(config.min_letters, config.stop_words),
            cache_ttl: config.cache_ttl,
        }
    }

    /// Whether a live entry exists for `id` in `bin`.
    pub async fn has_entry(&self, id: &str, bin: &str) -> Result<bool> {
        let ids_key = self.keys.meta(bin, MetaKind::Ids);
        Ok(self.store.hash_get(&ids_key, id).await?.is_some())
    }

    /// Index `phrase` under `id` with score 1 and no payload.
    ///
    /// Shorthand for [`store_entry`](Self::store_entry) with a minimal input.
    pub async fn store(
        &self,
        id: impl Into<String>,
        phrase: impl Into<String>,
        bin: &str,
    ) -> Result<()> {
        self.store_entry(EntryInput::new(id, phrase), bin).await
    }

    /// Index an entry, replacing any previous entry with the same id.
    ///
    /// The previous entry is fully removed first so no posting set keeps a
    /// prefix of an outdated phrase. Fails with [`InputError`] before any
    /// write when `id` or `phrase` is absent.
    pub async fn store_entry(&self, input: EntryInput, bin: &str) -> Result<()> {
        let id = input.id.ok_or(InputError::MissingId)?;
        let phrase = input.phrase.ok_or(InputError::MissingPhrase)?;
        let score = input.score.unwrap_or(1.0);

        // A no-op when the id is new.
        self.remove(&id, bin).await?;

        let normalized = self.tokenizer.normalize(&phrase);
        let words = self.tokenizer.words(&normalized);
        let prefixes = self.tokenizer.phrase_prefixes(&words);

        for prefix in &prefixes {
            let key = self.keys.posting(bin, prefix);
            self.store.zset_upsert(&key, score, &id).await?;
        }

        let ids_key = self.keys.meta(bin, MetaKind::Ids);
        self.store.hash_set(&ids_key, &id, &normalized).await?;

        let entry = Entry {
            id,
            score,
            phrase: normalized,
            data: input.data,
        };
        let objects_key = self.keys.meta(bin, MetaKind::Objects);
        self.store
            .hash_set(&objects_key, &entry.id, &serde_json::to_string(&entry)?)
            .await?;

        debug!(id = %entry.id, bin, prefixes = prefixes.len(), "stored entry");
        Ok(())
    }

    /// Remove the entry for `id` from `bin`.
    ///
    /// Returns `false` when no such entry exists. Prefixes to delete are
    /// recomputed from the stored normalized phrase with the same filter
    /// `store_entry` applied, so every posting written gets removed.
    pub async fn remove(&self, id: &str, bin: &str) -> Result<bool> {
        let ids_key = self.keys.meta(bin, MetaKind::Ids);
        let Some(phrase) = self.store.hash_get(&ids_key, id).await? else {
            return Ok(false);
        };

        let words = self.tokenizer.words(&phrase);
        for prefix in self.tokenizer.phrase_prefixes(&words) {
            let key = self.keys.posting(bin, &prefix);
            self.store.zset_remove(&key, id).await?;
        }

        self.store.hash_delete(&ids_key, id).await?;
        let objects_key = self.keys.meta(bin, MetaKind::Objects);
        self.store.hash_delete(&objects_key, id).await?;

        debug!(id, bin, "removed entry");
        Ok(true)
    }

    /// Find entries matching every word of `phrase`, best scores first.
    ///
    /// At most `count` results. A phrase with no searchable words returns
    /// empty without touching the store. With `use_cache`, a previously
    /// cached result list for the same word set is returned as-is, and a
    /// fresh result is written back with a TTL; the cache is addressed by
    /// the sorted word set, so word order does not split cache cells.
    pub async fn find(
        &self,
        phrase: &str,
        bin: &str,
        count: usize,
        use_cache: bool,
    ) -> Result<Vec<Entry>> {
        let normalized = self.tokenizer.normalize(phrase);
        let mut words = self.tokenizer.words(&normalized);
        if words.is_empty() || count == 0 {
            return Ok(Vec::new());
        }

        words.sort();
        let cache_key = self.keys.cache(bin, &words.join("_"));

        if use_cache {
            if let Some(entries) = self.cache_lookup(&cache_key).await {
                return Ok(entries);
            }
        }

        let posting_keys: Vec<String> =
            words.iter().map(|w| self.keys.posting(bin, w)).collect();
        let stop = count as isize - 1;

        let ids = if posting_keys.len() == 1 {
            self.store.zset_rev_range(&posting_keys[0], 0, stop).await?
        } else {
            // The intersection lands at the cache key; it is derived state,
            // safe to recompute at any time.
            self.store
                .zset_intersect_store(&cache_key, &posting_keys)
                .await?;
            self.store.zset_rev_range(&cache_key, 0, stop).await?
        };

        let entries = self.materialize(bin, &ids).await?;

        if use_cache {
            self.store
                .cell_set(&cache_key, &serde_json::to_string(&entries)?)
                .await?;
            self.store
                .cell_expire(&cache_key, self.cache_ttl.as_secs())
                .await?;
        }

        Ok(entries)
    }

    /// Read and decode a cached result list; any failure counts as a miss.
    async fn cache_lookup(&self, cache_key: &str) -> Option<Vec<Entry>> {
        let raw = match self.store.cell_get(cache_key).await {
            Ok(raw) => raw?,
            Err(e) => {
                warn!(error = %e, "cache read failed, recomputing");
                return None;
            }
        };
        match serde_json::from_str(&raw) {
            Ok(entries) => {
                debug!(cache_key, "query served from cache");
                Some(entries)
            }
            Err(e) => {
                warn!(error = %e, "cached result undecodable, recomputing");
                None
            }
        }
    }

    /// Fetch and decode the stored entries for `ids`, keeping their order.
    ///
    /// Ids whose object record is missing (a write still in flight) are
    /// skipped.
    async fn materialize(&self, bin: &str, ids: &[String]) -> Result<Vec<Entry>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let objects_key = self.keys.meta(bin, MetaKind::Objects);
        let raw = self.store.hash_multi_get(&objects_key, ids).await?;

        let mut entries = Vec::with_capacity(raw.len());
        for value in raw.into_iter().flatten() {
            entries.push(serde_json::from_str(&value)?);
        }
        Ok(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::memory::MemoryStore;

    fn index() -> AutocompleteIndex {
        AutocompleteIndex::new(Arc::new(MemoryStore::new()))
    }

    #[tokio::test]
    async fn test_store_entry_requires_id_and_phrase() {
        let index = index();

        let missing_id = EntryInput {
            phrase: Some("camera".to_string()),
            ..Default::default()
        };
        let err = index.store_entry(missing_id, "").await.unwrap_err();
        assert!(matches!(err, Error::Input(InputError::MissingId)));

        let missing_phrase = EntryInput {
            id: Some("6".to_string()),
            ..Default::default()
        };
        let err = index.store_entry(missing_phrase, "").await.unwrap_err();
        assert!(matches!(err, Error::Input(InputError::MissingPhrase)));

        // Nothing was written.
        assert!(!index.has_entry("6", "").await.unwrap());
    }

    #[tokio::test]
    async fn test_has_entry() {
        let index = index();
        assert!(!index.has_entry("2", "").await.unwrap());

        index.store("2", "cat", "").await.unwrap();
        assert!(index.has_entry("2", "").await.unwrap());

        assert!(index.remove("2", "").await.unwrap());
        assert!(!index.has_entry("2", "").await.unwrap());
    }

    #[tokio::test]
    async fn test_remove_missing_id_is_not_found() {
        let index = index();
        assert!(!index.remove("42", "").await.unwrap());
    }

    #[tokio::test]
    async fn test_find_zero_count_returns_empty() {
        let index = index();
        index.store("5", "cars", "").await.unwrap();
        let results = index.find("cars", "", 0, false).await.unwrap();
        assert!(results.is_empty());
    }
}
