//! Key naming for the store-side structures.

/// The two per-bin metadata hashes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetaKind {
    /// id -> normalized phrase.
    Ids,
    /// id -> serialized entry.
    Objects,
}

impl MetaKind {
    fn as_str(self) -> &'static str {
        match self {
            MetaKind::Ids => "ids",
            MetaKind::Objects => "objects",
        }
    }
}

/// Computes namespaced store keys per bin.
///
/// Posting and cache keys use a `:` separator, metadata keys use `>`.
/// Posting suffixes only ever contain `[a-z0-9_]` (they come out of the
/// tokenizer), so the two families cannot collide.
#[derive(Debug, Clone)]
pub struct KeyBuilder {
    namespace: String,
}

impl KeyBuilder {
    /// Create a builder with the given namespace prefix.
    pub fn new(namespace: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
        }
    }

    /// Key of the posting set for `(bin, prefix)`.
    pub fn posting(&self, bin: &str, prefix: &str) -> String {
        format!("{}:{}:{}", self.namespace, bin, prefix)
    }

    /// Key of a per-bin metadata hash.
    pub fn meta(&self, bin: &str, kind: MetaKind) -> String {
        format!("{}:{}>{}", self.namespace, bin, kind.as_str())
    }

    /// Key of the cache cell for a sorted, joined word set.
    ///
    /// Doubles as the destination of the multi-word intersection.
    pub fn cache(&self, bin: &str, joined_words: &str) -> String {
        format!("{}:{}:cache:{}", self.namespace, bin, joined_words)
    }
}
