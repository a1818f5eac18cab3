use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::Mutex;

use crate::clock::Clock;
use crate::prism::types::RawClusterEntity;
use crate::prism::{PrismClient, PrismError};

/// Returned when the cluster name has never been fetched successfully
pub const UNKNOWN_CLUSTER: &str = "Unknown Cluster";

/// Anything that can list cluster entities. `PrismClient` in production,
/// a counting mock in tests.
#[async_trait::async_trait]
pub trait ClusterSource: Send + Sync {
    async fn cluster_entities(&self) -> Result<Vec<serde_json::Value>, PrismError>;
}

#[async_trait::async_trait]
impl ClusterSource for PrismClient {
    async fn cluster_entities(&self) -> Result<Vec<serde_json::Value>, PrismError> {
        self.list_clusters().await
    }
}

struct CachedClusterName {
    value: String,
    fetched_at: Instant,
}

/// Single-slot TTL cache for the primary cluster's display name.
///
/// The deployment assumes exactly one cluster of interest, so the slot is
/// implicitly keyed. Fetch failures degrade to the previous value (or the
/// sentinel when nothing was ever cached) and never evict a good entry.
pub struct ClusterNameCache {
    source: Arc<dyn ClusterSource>,
    clock: Arc<dyn Clock>,
    ttl: Duration,
    slot: Mutex<Option<CachedClusterName>>,
}

impl ClusterNameCache {
    pub fn new(source: Arc<dyn ClusterSource>, clock: Arc<dyn Clock>, ttl: Duration) -> Self {
        Self {
            source,
            clock,
            ttl,
            slot: Mutex::new(None),
        }
    }

    /// Return the cluster name, refetching at most once per TTL window.
    /// Never fails: callers always get a usable string.
    pub async fn get(&self) -> String {
        let mut slot = self.slot.lock().await;

        if let Some(cached) = slot.as_ref() {
            if self.clock.now().duration_since(cached.fetched_at) < self.ttl {
                return cached.value.clone();
            }
        }

        match self.fetch_name().await {
            Ok(name) => {
                *slot = Some(CachedClusterName {
                    value: name.clone(),
                    fetched_at: self.clock.now(),
                });
                name
            }
            Err(e) => {
                tracing::warn!("Cluster name fetch failed: {}", e);
                match slot.as_ref() {
                    // Stale beats sentinel; keep serving the last good value.
                    Some(cached) => cached.value.clone(),
                    None => UNKNOWN_CLUSTER.to_string(),
                }
            }
        }
    }

    async fn fetch_name(&self) -> Result<String, PrismError> {
        let entities = self.source.cluster_entities().await?;

        // One cluster assumed; take the first entity's display name.
        let name = entities
            .first()
            .and_then(|entity| {
                serde_json::from_value::<RawClusterEntity>(entity.clone()).ok()
            })
            .and_then(|cluster| cluster.display_name().map(|n| n.to_string()))
            .unwrap_or_else(|| UNKNOWN_CLUSTER.to_string());

        Ok(name)
    }
}
