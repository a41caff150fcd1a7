//! redfix - prefix autocomplete search backed by Redis sorted sets.
//!
//! Entries (id, phrase, score, optional payload) are indexed by every prefix
//! of every word in the phrase. Queries intersect the posting sets of all
//! query words and return entries ranked by score, with results partitioned
//! into independent namespaces ("bins") and optionally memoized in a
//! TTL-bound cache cell.
//!
//! The store is abstracted behind the [`IndexStore`] trait: [`RedisStore`]
//! talks to a real Redis server, [`MemoryStore`] keeps everything in-process
//! with the same semantics.

pub mod error;
pub mod index;
pub mod keys;
pub mod memory;
pub mod redis_store;
pub mod store;
pub mod tokenizer;
pub mod types;

// Re-export commonly used types
pub use error::{Error, InputError, Result};
pub use index::{AutocompleteIndex, IndexConfig, DEFAULT_CACHE_TTL};
pub use keys::{KeyBuilder, MetaKind};
pub use memory::MemoryStore;
pub use redis_store::RedisStore;
pub use store::{IndexStore, StoreError, StoreResult};
pub use tokenizer::Tokenizer;
pub use types::{Entry, EntryInput, Score};

/// Convenience function to connect an index to a Redis server with the
/// default configuration.
pub async fn connect(url: &str) -> StoreResult<AutocompleteIndex> {
    let store = RedisStore::connect(url).await?;
    Ok(AutocompleteIndex::new(std::sync::Arc::new(store)))
}
