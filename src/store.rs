//! Store abstraction for the autocomplete index.

use async_trait::async_trait;
use thiserror::Error;

/// Store-related errors.
#[derive(Error, Debug)]
pub enum StoreError {
    /// The store could not be reached (connection refused, timeout, ...).
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// Error reported by the underlying store backend.
    #[error("backend error: {0}")]
    Backend(String),
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Abstraction over a sorted-set/hash key-value store (Redis or compatible).
///
/// These are the only primitives the index relies on. Each call is atomic on
/// its own; no atomicity is assumed across calls.
#[async_trait]
pub trait IndexStore: Send + Sync {
    /// Add a member to a sorted set, overwriting its score if already present.
    async fn zset_upsert(&self, key: &str, score: f64, member: &str) -> StoreResult<()>;

    /// Remove a member from a sorted set.
    async fn zset_remove(&self, key: &str, member: &str) -> StoreResult<()>;

    /// Members of a sorted set between two ranks, highest score first.
    ///
    /// Ranks follow Redis ZREVRANGE semantics: zero-based, inclusive on both
    /// ends, negative ranks counting from the tail.
    async fn zset_rev_range(&self, key: &str, start: isize, stop: isize)
        -> StoreResult<Vec<String>>;

    /// Intersect the source sets into `dest`, summing member scores.
    ///
    /// Overwrites `dest`; an empty intersection leaves no set at `dest`.
    async fn zset_intersect_store(&self, dest: &str, sources: &[String]) -> StoreResult<()>;

    /// Read a hash field.
    async fn hash_get(&self, key: &str, field: &str) -> StoreResult<Option<String>>;

    /// Write a hash field.
    async fn hash_set(&self, key: &str, field: &str, value: &str) -> StoreResult<()>;

    /// Delete a hash field.
    async fn hash_delete(&self, key: &str, field: &str) -> StoreResult<()>;

    /// Read several hash fields at once, aligned with `fields`.
    async fn hash_multi_get(
        &self,
        key: &str,
        fields: &[String],
    ) -> StoreResult<Vec<Option<String>>>;

    /// Read a plain key-value cell.
    async fn cell_get(&self, key: &str) -> StoreResult<Option<String>>;

    /// Write a plain key-value cell.
    async fn cell_set(&self, key: &str, value: &str) -> StoreResult<()>;

    /// Set a time-to-live on a cell.
    async fn cell_expire(&self, key: &str, seconds: u64) -> StoreResult<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_error_display() {
        let err = StoreError::Unavailable("connection refused".to_string());
        assert!(err.to_string().contains("connection refused"));

        let err = StoreError::Backend("WRONGTYPE".to_string());
        assert!(err.to_string().contains("WRONGTYPE"));
    }
}
