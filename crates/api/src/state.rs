use std::sync::{Arc, Mutex};
use std::time::Duration;

use radiodesk_core::cache::TtlCache;
use radiodesk_db::models::staff::Division;
use radiodesk_db::DbPool;

use crate::config::ServerConfig;

/// Cache key for the divisions listing.
const DIVISIONS_KEY: &str = "divisions";

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Divisions listing cache. The TTL is injected from configuration and
    /// every division write invalidates explicitly.
    division_cache: Arc<Mutex<TtlCache<&'static str, Vec<Division>>>>,
}

impl AppState {
    pub fn new(pool: DbPool, config: ServerConfig) -> Self {
        let ttl = Duration::from_secs(config.division_cache_ttl_secs);
        Self {
            pool,
            config: Arc::new(config),
            division_cache: Arc::new(Mutex::new(TtlCache::new(ttl))),
        }
    }

    /// Cached divisions listing, if still live.
    ///
    /// A poisoned lock counts as a miss; the next write replaces the entry.
    pub fn cached_divisions(&self) -> Option<Vec<Division>> {
        self.division_cache.lock().ok()?.get(&DIVISIONS_KEY)
    }

    /// Store a fresh divisions listing.
    pub fn cache_divisions(&self, divisions: Vec<Division>) {
        if let Ok(mut cache) = self.division_cache.lock() {
            cache.insert(DIVISIONS_KEY, divisions);
        }
    }

    /// Drop the cached listing. Called by every division write path.
    pub fn invalidate_divisions(&self) {
        if let Ok(mut cache) = self.division_cache.lock() {
            cache.invalidate(&DIVISIONS_KEY);
        }
    }
}
