use std::sync::Arc;

use crate::cache::ClusterNameCache;
use crate::models::NormalizedVm;
use crate::prism::types::RawVmEntity;
use crate::prism::{extract, PrismClient, PrismError};

/// Orchestrates the vm list for the API layer: upstream fetch, cluster-name
/// resolution, per-entity extraction, and the final sort.
pub struct VmListService {
    prism: Arc<PrismClient>,
    cluster_cache: ClusterNameCache,
    console_base: String,
}

impl VmListService {
    pub fn new(prism: Arc<PrismClient>, cluster_cache: ClusterNameCache, console_base: String) -> Self {
        Self {
            prism,
            cluster_cache,
            console_base,
        }
    }

    /// Fetch and normalize all powered-on VMs, sorted by name.
    ///
    /// An upstream failure short-circuits before the cluster cache is
    /// touched; per-entity problems are contained inside `normalize`.
    pub async fn fetch_all(&self) -> Result<Vec<NormalizedVm>, PrismError> {
        let entities = self.prism.list_vms().await?;
        let cluster_name = self.cluster_cache.get().await;
        Ok(normalize(entities, &cluster_name, &self.console_base))
    }
}

/// Decode, extract, and sort raw vm entities. A record that does not decode
/// is logged and skipped so the rest of the listing survives.
fn normalize(
    entities: Vec<serde_json::Value>,
    cluster_name: &str,
    console_base: &str,
) -> Vec<NormalizedVm> {
    let mut vms: Vec<NormalizedVm> = entities
        .into_iter()
        .filter_map(|raw| match serde_json::from_value::<RawVmEntity>(raw) {
            Ok(entity) => extract::extract(&entity, cluster_name, console_base),
            Err(e) => {
                tracing::warn!("Skipping malformed vm entity: {}", e);
                None
            }
        })
        .collect();

    // Case-insensitive, and stable so equal names keep upstream order
    vms.sort_by_key(|vm| vm.name.to_lowercase());
    vms
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::UNKNOWN_CLUSTER;
    use crate::clock::SystemClock;
    use std::time::Duration;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn vm_entity(name: &str, power: &str) -> serde_json::Value {
        serde_json::json!({
            "metadata": {"uuid": format!("uuid-{}", name)},
            "status": {
                "name": name,
                "resources": {"power_state": power, "num_vcpus": 2, "memory_size_mib": 1024},
            },
        })
    }

    #[test]
    fn test_sort_is_case_insensitive() {
        let entities = vec![
            vm_entity("b", "ON"),
            vm_entity("A", "ON"),
            vm_entity("c", "ON"),
        ];
        let names: Vec<String> = normalize(entities, "c1", "https://gw")
            .into_iter()
            .map(|vm| vm.name)
            .collect();
        assert_eq!(names, ["A", "b", "c"]);
    }

    #[test]
    fn test_powered_off_filtered_out() {
        let entities = vec![vm_entity("up", "ON"), vm_entity("down", "OFF")];
        let vms = normalize(entities, "c1", "https://gw");
        assert_eq!(vms.len(), 1);
        assert_eq!(vms[0].name, "up");
    }

    #[test]
    fn test_malformed_entity_does_not_poison_the_list() {
        let entities = vec![
            vm_entity("good-1", "ON"),
            // status should be an object
            serde_json::json!({"status": "garbage"}),
            vm_entity("good-2", "ON"),
        ];
        let vms = normalize(entities, "c1", "https://gw");
        assert_eq!(vms.len(), 2);
    }

    fn service_against(server_uri: &str, ttl: Duration) -> VmListService {
        let prism = Arc::new(
            PrismClient::with_base_url(
                format!("{}/api/nutanix/v3", server_uri),
                "admin".into(),
                "secret".into(),
                5,
            )
            .unwrap(),
        );
        let cache = ClusterNameCache::new(prism.clone(), Arc::new(SystemClock), ttl);
        VmListService::new(prism, cache, "https://gw:8443".into())
    }

    #[tokio::test]
    async fn test_fetch_all_end_to_end() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/nutanix/v3/vms/list"))
            .and(body_json(serde_json::json!({"kind": "vm", "length": 1000})))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "entities": [vm_entity("db-01", "ON"), vm_entity("db-00", "OFF")]
            })))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/api/nutanix/v3/clusters/list"))
            .and(body_json(serde_json::json!({"kind": "cluster", "length": 1000})))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "entities": [{"status": {"name": "Lab Cluster"}}]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let service = service_against(&server.uri(), Duration::from_secs(300));
        let vms = service.fetch_all().await.unwrap();
        assert_eq!(vms.len(), 1);
        assert_eq!(vms[0].name, "db-01");
        assert_eq!(vms[0].cluster_name, "Lab Cluster");

        // second fetch reuses the cached cluster name (expect(1) above)
        let vms = service.fetch_all().await.unwrap();
        assert_eq!(vms[0].cluster_name, "Lab Cluster");
    }

    #[tokio::test]
    async fn test_vm_failure_skips_cluster_cache() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/nutanix/v3/vms/list"))
            .respond_with(ResponseTemplate::new(502))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/api/nutanix/v3/clusters/list"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "entities": [{"status": {"name": "Lab"}}]
            })))
            .expect(0)
            .mount(&server)
            .await;

        let service = service_against(&server.uri(), Duration::from_secs(300));
        let err = service.fetch_all().await.unwrap_err();
        assert!(matches!(err, PrismError::Unavailable { status: 502 }));
    }

    #[tokio::test]
    async fn test_cluster_failure_degrades_to_sentinel() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/nutanix/v3/vms/list"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "entities": [vm_entity("app-01", "ON")]
            })))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/api/nutanix/v3/clusters/list"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let service = service_against(&server.uri(), Duration::from_secs(300));
        let vms = service.fetch_all().await.unwrap();
        assert_eq!(vms[0].cluster_name, UNKNOWN_CLUSTER);
    }
}
