//! In-process store backend with Redis-compatible semantics.
//!
//! Backs the test suite and embedded use. Rev-range ordering, summed-score
//! intersection, and cell TTLs follow what Redis does so behavior observed
//! here carries over to the real backend.

use crate::store::{IndexStore, StoreResult};
use async_trait::async_trait;
use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

#[derive(Default)]
struct MemoryInner {
    zsets: HashMap<String, HashMap<String, f64>>,
    hashes: HashMap<String, HashMap<String, String>>,
    cells: HashMap<String, String>,
    expirations: HashMap<String, Instant>,
}

impl MemoryInner {
    fn cell_live(&self, key: &str) -> bool {
        match self.expirations.get(key) {
            Some(deadline) => Instant::now() < *deadline,
            None => true,
        }
    }
}

/// [`IndexStore`] implementation backed by in-process maps.
#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<MemoryInner>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl IndexStore for MemoryStore {
    async fn zset_upsert(&self, key: &str, score: f64, member: &str) -> StoreResult<()> {
        let mut inner = self.inner.lock().unwrap();
        inner
            .zsets
            .entry(key.to_string())
            .or_default()
            .insert(member.to_string(), score);
        Ok(())
    }

    async fn zset_remove(&self, key: &str, member: &str) -> StoreResult<()> {
        let mut inner = self.inner.lock().unwrap();
        let now_empty = match inner.zsets.get_mut(key) {
            Some(set) => {
                set.remove(member);
                set.is_empty()
            }
            None => false,
        };
        if now_empty {
            inner.zsets.remove(key);
        }
        Ok(())
    }

    async fn zset_rev_range(
        &self,
        key: &str,
        start: isize,
        stop: isize,
    ) -> StoreResult<Vec<String>> {
        let inner = self.inner.lock().unwrap();
        let Some(set) = inner.zsets.get(key) else {
            return Ok(Vec::new());
        };

        let mut members: Vec<(&String, f64)> = set.iter().map(|(m, s)| (m, *s)).collect();
        // Score descending, equal scores in reverse member order (ZREVRANGE).
        members.sort_by(|a, b| match b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal) {
            Ordering::Equal => b.0.cmp(a.0),
            other => other,
        });

        let len = members.len() as isize;
        let start = if start < 0 { (len + start).max(0) } else { start };
        let stop = if stop < 0 { len + stop } else { stop.min(len - 1) };
        if start > stop || start >= len {
            return Ok(Vec::new());
        }

        Ok(members[start as usize..=stop as usize]
            .iter()
            .map(|(m, _)| (*m).clone())
            .collect())
    }

    async fn zset_intersect_store(&self, dest: &str, sources: &[String]) -> StoreResult<()> {
        let mut inner = self.inner.lock().unwrap();

        let mut result: HashMap<String, f64> = HashMap::new();
        if let Some((first, rest)) = sources.split_first() {
            if let Some(base) = inner.zsets.get(first) {
                'members: for (member, score) in base {
                    let mut sum = *score;
                    for key in rest {
                        match inner.zsets.get(key).and_then(|s| s.get(member)) {
                            Some(other) => sum += other,
                            None => continue 'members,
                        }
                    }
                    result.insert(member.clone(), sum);
                }
            }
        }

        // Like ZINTERSTORE, an empty result leaves no set behind.
        if result.is_empty() {
            inner.zsets.remove(dest);
        } else {
            inner.zsets.insert(dest.to_string(), result);
        }
        Ok(())
    }

    async fn hash_get(&self, key: &str, field: &str) -> StoreResult<Option<String>> {
        let inner = self.inner.lock().unwrap();
        Ok(inner
            .hashes
            .get(key)
            .and_then(|h| h.get(field))
            .cloned())
    }

    async fn hash_set(&self, key: &str, field: &str, value: &str) -> StoreResult<()> {
        let mut inner = self.inner.lock().unwrap();
        inner
            .hashes
            .entry(key.to_string())
            .or_default()
            .insert(field.to_string(), value.to_string());
        Ok(())
    }

    async fn hash_delete(&self, key: &str, field: &str) -> StoreResult<()> {
        let mut inner = self.inner.lock().unwrap();
        if let Some(hash) = inner.hashes.get_mut(key) {
            hash.remove(field);
        }
        Ok(())
    }

    async fn hash_multi_get(
        &self,
        key: &str,
        fields: &[String],
    ) -> StoreResult<Vec<Option<String>>> {
        let inner = self.inner.lock().unwrap();
        let hash = inner.hashes.get(key);
        Ok(fields
            .iter()
            .map(|f| hash.and_then(|h| h.get(f)).cloned())
            .collect())
    }

    async fn cell_get(&self, key: &str) -> StoreResult<Option<String>> {
        let mut inner = self.inner.lock().unwrap();
        if !inner.cell_live(key) {
            inner.cells.remove(key);
            inner.expirations.remove(key);
            return Ok(None);
        }
        Ok(inner.cells.get(key).cloned())
    }

    async fn cell_set(&self, key: &str, value: &str) -> StoreResult<()> {
        let mut inner = self.inner.lock().unwrap();
        inner.cells.insert(key.to_string(), value.to_string());
        inner.expirations.remove(key);
        Ok(())
    }

    async fn cell_expire(&self, key: &str, seconds: u64) -> StoreResult<()> {
        let mut inner = self.inner.lock().unwrap();
        if inner.cells.contains_key(key) {
            inner
                .expirations
                .insert(key.to_string(), Instant::now() + Duration::from_secs(seconds));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_zset_upsert_overwrites_score() {
        let store = MemoryStore::new();
        store.zset_upsert("z", 1.0, "a").await.unwrap();
        store.zset_upsert("z", 5.0, "a").await.unwrap();
        store.zset_upsert("z", 2.0, "b").await.unwrap();

        let range = store.zset_rev_range("z", 0, -1).await.unwrap();
        assert_eq!(range, vec!["a".to_string(), "b".to_string()]);
    }

    #[tokio::test]
    async fn test_zset_rev_range_orders_by_score_then_member() {
        let store = MemoryStore::new();
        store.zset_upsert("z", 1.0, "care").await.unwrap();
        store.zset_upsert("z", 5.0, "cars").await.unwrap();
        store.zset_upsert("z", 2.0, "caress").await.unwrap();
        store.zset_upsert("z", 1.0, "cat").await.unwrap();

        let range = store.zset_rev_range("z", 0, 2).await.unwrap();
        assert_eq!(range, vec!["cars", "caress", "cat"]);

        // Rank window past the end is clamped, not an error.
        let all = store.zset_rev_range("z", 0, 9).await.unwrap();
        assert_eq!(all.len(), 4);
        assert_eq!(all[3], "care");
    }

    #[tokio::test]
    async fn test_zset_rev_range_missing_key() {
        let store = MemoryStore::new();
        let range = store.zset_rev_range("nope", 0, 9).await.unwrap();
        assert!(range.is_empty());
    }

    #[tokio::test]
    async fn test_intersect_store_sums_scores() {
        let store = MemoryStore::new();
        store.zset_upsert("a", 1.0, "x").await.unwrap();
        store.zset_upsert("a", 1.0, "y").await.unwrap();
        store.zset_upsert("b", 2.0, "x").await.unwrap();

        store
            .zset_intersect_store("dest", &["a".to_string(), "b".to_string()])
            .await
            .unwrap();

        let range = store.zset_rev_range("dest", 0, -1).await.unwrap();
        assert_eq!(range, vec!["x".to_string()]);
    }

    #[tokio::test]
    async fn test_intersect_store_empty_result_clears_dest() {
        let store = MemoryStore::new();
        store.zset_upsert("dest", 1.0, "stale").await.unwrap();
        store.zset_upsert("a", 1.0, "x").await.unwrap();

        store
            .zset_intersect_store("dest", &["a".to_string(), "b".to_string()])
            .await
            .unwrap();

        let range = store.zset_rev_range("dest", 0, -1).await.unwrap();
        assert!(range.is_empty());
    }

    #[tokio::test]
    async fn test_hash_multi_get_aligns_with_fields() {
        let store = MemoryStore::new();
        store.hash_set("h", "a", "1").await.unwrap();
        store.hash_set("h", "c", "3").await.unwrap();

        let values = store
            .hash_multi_get(
                "h",
                &["a".to_string(), "b".to_string(), "c".to_string()],
            )
            .await
            .unwrap();
        assert_eq!(
            values,
            vec![Some("1".to_string()), None, Some("3".to_string())]
        );
    }

    #[tokio::test]
    async fn test_cell_expire() {
        let store = MemoryStore::new();
        store.cell_set("k", "v").await.unwrap();
        store.cell_expire("k", 600).await.unwrap();
        assert_eq!(store.cell_get("k").await.unwrap(), Some("v".to_string()));

        // Zero TTL expires immediately.
        store.cell_expire("k", 0).await.unwrap();
        assert_eq!(store.cell_get("k").await.unwrap(), None);
    }
}
