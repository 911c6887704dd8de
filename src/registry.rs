//! Catalog snippet resolution.
//!
//! The composer never fetches snippets itself; it asks a resolver
//! capability for the current source text of a catalog id. Production wires
//! a registry-backed resolver, tests use the in-memory fixture, and a
//! read-through cache can wrap either.

use async_trait::async_trait;
use dashmap::DashMap;

/// Capability interface for catalog snippet lookup.
///
/// `Ok(None)` is the "not found" signal; `Err` is a transport/registry
/// failure. The assembler treats both as a skip for the affected instance.
#[async_trait]
pub trait SnippetResolver: Send + Sync {
    async fn resolve(&self, animation_id: &str) -> anyhow::Result<Option<String>>;
}

// ---------------------------------------------------------------------------
// In-Memory Registry
// ---------------------------------------------------------------------------

/// Thread-safe snippet registry keyed by catalog id.
/// Production loads it from the catalog manifest; tests insert fixtures.
#[derive(Debug, Default)]
pub struct InMemoryRegistry {
    snippets: DashMap<String, String>,
}

impl InMemoryRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite a snippet's source.
    pub fn insert(&self, animation_id: impl Into<String>, source: impl Into<String>) {
        self.snippets.insert(animation_id.into(), source.into());
    }

    pub fn len(&self) -> usize {
        self.snippets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snippets.is_empty()
    }
}

#[async_trait]
impl SnippetResolver for InMemoryRegistry {
    async fn resolve(&self, animation_id: &str) -> anyhow::Result<Option<String>> {
        Ok(self.snippets.get(animation_id).map(|entry| entry.value().clone()))
    }
}

// ---------------------------------------------------------------------------
// Read-Through Cache
// ---------------------------------------------------------------------------

/// Read-through source cache over any resolver. Hits are served from the
/// map; misses go to the inner resolver and successful lookups are cached.
/// "Not found" and transport errors are never cached, so a later retry can
/// still succeed.
#[derive(Debug)]
pub struct SourceCache<R> {
    inner: R,
    cache: DashMap<String, String>,
}

impl<R> SourceCache<R> {
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            cache: DashMap::new(),
        }
    }

    /// Drop all cached sources. Used when the catalog is re-synced.
    pub fn clear(&self) {
        self.cache.clear();
    }
}

#[async_trait]
impl<R: SnippetResolver> SnippetResolver for SourceCache<R> {
    async fn resolve(&self, animation_id: &str) -> anyhow::Result<Option<String>> {
        if let Some(hit) = self.cache.get(animation_id) {
            return Ok(Some(hit.value().clone()));
        }
        let resolved = self.inner.resolve(animation_id).await?;
        if let Some(ref source) = resolved {
            self.cache
                .insert(animation_id.to_string(), source.clone());
        }
        Ok(resolved)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
