use moka::future::Cache;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt;
use std::future::Future;
use tracing::debug;

use super::errors::ApiError;
use crate::config::CacheConfig;
use crate::observability::api_metrics;

/// Identity of a cached read. Mutations name the exact keys they affect.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum QueryKey {
    Users,
    User(String),
    PendingRequests,
    PendingRequest(String),
    AdminDashboard,
    Admins,
    Admin(String),
    ReceivedRequests(String),
    SentRequests(String),
    /// Ordered pair: (a, b) and (b, a) are separate entries.
    ConnectionStatus { viewer: String, other: String },
    ProfileImages(String),
    AvailableSlots(String),
    ApplicationStatus(String),
}

impl QueryKey {
    pub fn connection(viewer: &str, other: &str) -> Self {
        QueryKey::ConnectionStatus {
            viewer: viewer.to_string(),
            other: other.to_string(),
        }
    }
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueryKey::Users => write!(f, "users"),
            QueryKey::User(id) => write!(f, "user:{id}"),
            QueryKey::PendingRequests => write!(f, "pendingRequests"),
            QueryKey::PendingRequest(id) => write!(f, "pendingRequest:{id}"),
            QueryKey::AdminDashboard => write!(f, "adminDashboard"),
            QueryKey::Admins => write!(f, "admins"),
            QueryKey::Admin(id) => write!(f, "admin:{id}"),
            QueryKey::ReceivedRequests(id) => write!(f, "receivedRequests:{id}"),
            QueryKey::SentRequests(id) => write!(f, "sentRequests:{id}"),
            QueryKey::ConnectionStatus { viewer, other } => {
                write!(f, "connectionStatus:{viewer}:{other}")
            }
            QueryKey::ProfileImages(id) => write!(f, "profileImages:{id}"),
            QueryKey::AvailableSlots(id) => write!(f, "availableSlots:{id}"),
            QueryKey::ApplicationStatus(email) => write!(f, "applicationStatus:{email}"),
        }
    }
}

/// Read-through cache of query results, shared by all workflows.
///
/// Values are stored as JSON so one cache can hold every result type.
#[derive(Clone)]
pub struct QueryCache {
    entries: Cache<QueryKey, serde_json::Value>,
}

impl QueryCache {
    pub fn new(config: &CacheConfig) -> Self {
        let entries = Cache::builder()
            .max_capacity(config.max_capacity)
            .time_to_live(config.ttl())
            .build();
        Self { entries }
    }

    /// Return the cached value for `key`, or run `loader` and cache its result.
    /// Failed loads are not cached.
    pub async fn fetch<T, F, Fut>(&self, key: QueryKey, loader: F) -> Result<T, ApiError>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, ApiError>>,
    {
        if let Some(cached) = self.entries.get(&key).await {
            if let Ok(value) = serde_json::from_value(cached) {
                api_metrics().record_cache_hit();
                debug!(key = %key, "Cache hit");
                return Ok(value);
            }
        }

        api_metrics().record_cache_miss();
        debug!(key = %key, "Cache miss");
        let value = loader().await?;
        if let Ok(serialized) = serde_json::to_value(&value) {
            self.entries.insert(key, serialized).await;
        }
        Ok(value)
    }

    /// Drop exactly the given keys.
    pub async fn invalidate(&self, keys: &[QueryKey]) {
        for key in keys {
            self.entries.invalidate(key).await;
        }
        api_metrics().record_invalidations(keys.len() as u64);
        debug!(
            keys = %keys.iter().map(ToString::to_string).collect::<Vec<_>>().join(","),
            "Invalidated cached queries"
        );
    }

    pub async fn contains(&self, key: &QueryKey) -> bool {
        self.entries.get(key).await.is_some()
    }

    pub fn clear(&self) {
        self.entries.invalidate_all();
    }

    pub async fn len(&self) -> u64 {
        self.entries.run_pending_tasks().await;
        self.entries.entry_count()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

impl fmt::Debug for QueryCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QueryCache")
            .field("entries", &self.entries.entry_count())
            .finish()
    }
}
