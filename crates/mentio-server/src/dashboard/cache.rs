//! The TTL'd snapshot cache.
//!
//! An explicit object injected into the aggregation path — no process-wide
//! singleton. Keyed by [`Scope`] with last-write-wins updates; safe for
//! concurrent readers and tolerant of redundant concurrent writers, since
//! recomputing a snapshot is a pure function of its scope.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::RwLock;

use mentio_core::{DashboardSnapshot, Scope};

#[derive(Debug, Clone)]
struct CacheEntry {
    snapshot: DashboardSnapshot,
    expires_at: Instant,
}

/// Shared snapshot cache. Cloning shares the underlying map.
#[derive(Clone)]
pub struct StatsCache {
    ttl: Duration,
    entries: Arc<RwLock<HashMap<Scope, CacheEntry>>>,
}

impl StatsCache {
    #[must_use]
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Return the cached snapshot for a scope if it has not expired.
    pub async fn get(&self, scope: Scope) -> Option<DashboardSnapshot> {
        let entries = self.entries.read().await;
        entries
            .get(&scope)
            .filter(|entry| entry.expires_at > Instant::now())
            .map(|entry| entry.snapshot.clone())
    }

    /// Store a snapshot for a scope. Callers must only pass non-empty
    /// snapshots — caching an empty result would poison the scope for a
    /// full TTL window.
    pub async fn put(&self, scope: Scope, snapshot: DashboardSnapshot) {
        let entry = CacheEntry {
            snapshot,
            expires_at: Instant::now() + self.ttl,
        };
        self.entries.write().await.insert(scope, entry);
    }

    /// Drop a scope's entry (and the global one, which aggregates over it).
    pub async fn invalidate(&self, scope: Scope) {
        let mut entries = self.entries.write().await;
        entries.remove(&scope);
        entries.remove(&Scope::Global);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(total: i64) -> DashboardSnapshot {
        DashboardSnapshot {
            total_reviews: total,
            ..DashboardSnapshot::default()
        }
    }

    #[tokio::test]
    async fn get_returns_fresh_entry() {
        let cache = StatsCache::new(Duration::from_secs(60));
        cache.put(Scope::Global, snapshot(5)).await;

        let hit = cache.get(Scope::Global).await.expect("fresh entry");
        assert_eq!(hit.total_reviews, 5);
    }

    #[tokio::test]
    async fn get_misses_after_expiry() {
        let cache = StatsCache::new(Duration::from_millis(20));
        cache.put(Scope::Global, snapshot(5)).await;

        tokio::time::sleep(Duration::from_millis(40)).await;
        assert!(cache.get(Scope::Global).await.is_none());
    }

    #[tokio::test]
    async fn scopes_are_independent() {
        let cache = StatsCache::new(Duration::from_secs(60));
        cache.put(Scope::Product(1), snapshot(1)).await;
        cache.put(Scope::Product(2), snapshot(2)).await;

        assert_eq!(
            cache.get(Scope::Product(1)).await.expect("p1").total_reviews,
            1
        );
        assert_eq!(
            cache.get(Scope::Product(2)).await.expect("p2").total_reviews,
            2
        );
        assert!(cache.get(Scope::Global).await.is_none());
    }

    #[tokio::test]
    async fn invalidate_drops_scope_and_global() {
        let cache = StatsCache::new(Duration::from_secs(60));
        cache.put(Scope::Product(1), snapshot(1)).await;
        cache.put(Scope::Global, snapshot(9)).await;

        cache.invalidate(Scope::Product(1)).await;

        assert!(cache.get(Scope::Product(1)).await.is_none());
        assert!(cache.get(Scope::Global).await.is_none());
    }

    #[tokio::test]
    async fn last_write_wins() {
        let cache = StatsCache::new(Duration::from_secs(60));
        cache.put(Scope::Global, snapshot(1)).await;
        cache.put(Scope::Global, snapshot(2)).await;

        assert_eq!(cache.get(Scope::Global).await.expect("hit").total_reviews, 2);
    }
}
