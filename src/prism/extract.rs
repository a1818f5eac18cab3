use super::types::RawVmEntity;
use crate::models::NormalizedVm;

/// Turn one raw vm entity into the dashboard's view of it.
///
/// Returns `None` for anything that is not powered on; stopped and unknown
/// VMs never reach the front end. Missing fields fall back to defaults
/// rather than failing the record.
pub fn extract(entity: &RawVmEntity, cluster_name: &str, console_base: &str) -> Option<NormalizedVm> {
    let resources = &entity.status.resources;

    if resources.power_state.as_deref() != Some("ON") {
        return None;
    }

    let name = entity.status.name.clone().unwrap_or_default();
    let uuid = entity.metadata.uuid.clone().unwrap_or_default();

    // vCPU count moved between fields across AOS versions. First non-zero
    // wins; zero counts as absent, matching the upstream quirk.
    let vcpus = [
        resources.num_sockets.unwrap_or(0) * resources.num_cores_per_socket.unwrap_or(1),
        resources.num_vcpus.unwrap_or(0),
        resources.vm_features.num_vcpus.unwrap_or(0),
    ]
    .into_iter()
    .find(|&n| n != 0)
    .unwrap_or(0);

    let memory_mib = resources.memory_size_mib.unwrap_or(0);
    let memory_gb = round2(memory_mib as f64 / 1024.0);

    let ip_addresses: Vec<String> = resources
        .nic_list
        .iter()
        .flat_map(|nic| nic.ip_endpoint_list.iter())
        .filter_map(|endpoint| endpoint.ip.clone())
        .collect();

    let console_url = format!(
        "{}/console/vnc_auto.html?path=proxy/{}",
        console_base.trim_end_matches('/'),
        uuid
    );

    Some(NormalizedVm {
        name,
        uuid,
        vcpus,
        memory_gb,
        console_url,
        ip_addresses,
        cluster_name: cluster_name.to_string(),
    })
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entity(json: serde_json::Value) -> RawVmEntity {
        serde_json::from_value(json).unwrap()
    }

    fn powered_on(resources: serde_json::Value) -> RawVmEntity {
        let mut resources = resources;
        resources["power_state"] = "ON".into();
        entity(serde_json::json!({
            "metadata": {"uuid": "abc-123"},
            "status": {"name": "web-01", "resources": resources},
        }))
    }

    #[test]
    fn test_powered_off_yields_nothing() {
        for state in ["OFF", "UNKNOWN", "on"] {
            let vm = entity(serde_json::json!({
                "status": {"resources": {"power_state": state}},
            }));
            assert!(extract(&vm, "c1", "https://gw").is_none());
        }

        let no_state = entity(serde_json::json!({"status": {"resources": {}}}));
        assert!(extract(&no_state, "c1", "https://gw").is_none());
    }

    #[test]
    fn test_complete_entity() {
        let vm = powered_on(serde_json::json!({
            "num_sockets": 2,
            "num_cores_per_socket": 4,
            "memory_size_mib": 4096,
            "nic_list": [
                {"ip_endpoint_list": [{"ip": "10.0.0.5"}, {"ip": "10.0.0.6"}]},
                {"ip_endpoint_list": [{"ip": "10.0.0.5"}]},
            ],
        }));

        let normalized = extract(&vm, "Lab Cluster", "https://gw:8443").unwrap();
        assert_eq!(normalized.name, "web-01");
        assert_eq!(normalized.uuid, "abc-123");
        assert_eq!(normalized.vcpus, 8);
        assert_eq!(normalized.memory_gb, 4.0);
        assert_eq!(
            normalized.console_url,
            "https://gw:8443/console/vnc_auto.html?path=proxy/abc-123"
        );
        // discovery order kept, duplicates kept
        assert_eq!(normalized.ip_addresses, ["10.0.0.5", "10.0.0.6", "10.0.0.5"]);
        assert_eq!(normalized.cluster_name, "Lab Cluster");
    }

    #[test]
    fn test_memory_rounds_to_two_decimals() {
        let vm = powered_on(serde_json::json!({"memory_size_mib": 3000}));
        assert_eq!(extract(&vm, "c1", "https://gw").unwrap().memory_gb, 2.93);

        let no_memory = powered_on(serde_json::json!({}));
        assert_eq!(extract(&no_memory, "c1", "https://gw").unwrap().memory_gb, 0.0);
    }

    #[test]
    fn test_vcpu_sockets_times_cores_wins() {
        let vm = powered_on(serde_json::json!({
            "num_sockets": 2,
            "num_cores_per_socket": 4,
            "num_vcpus": 99,
            "vm_features": {"num_vcpus": 77},
        }));
        assert_eq!(extract(&vm, "c1", "https://gw").unwrap().vcpus, 8);
    }

    #[test]
    fn test_vcpu_falls_back_to_num_vcpus() {
        let vm = powered_on(serde_json::json!({"num_vcpus": 6}));
        assert_eq!(extract(&vm, "c1", "https://gw").unwrap().vcpus, 6);
    }

    #[test]
    fn test_vcpu_falls_back_to_vm_features() {
        let vm = powered_on(serde_json::json!({"vm_features": {"num_vcpus": 2}}));
        assert_eq!(extract(&vm, "c1", "https://gw").unwrap().vcpus, 2);
    }

    #[test]
    fn test_vcpu_zero_sockets_treated_as_absent() {
        // 0 * cores falls through to the next field, same as the source
        let vm = powered_on(serde_json::json!({
            "num_sockets": 0,
            "num_cores_per_socket": 8,
            "num_vcpus": 4,
        }));
        assert_eq!(extract(&vm, "c1", "https://gw").unwrap().vcpus, 4);
    }

    #[test]
    fn test_missing_name_and_uuid_default_empty() {
        let vm = entity(serde_json::json!({
            "status": {"resources": {"power_state": "ON"}},
        }));
        let normalized = extract(&vm, "c1", "https://gw").unwrap();
        assert_eq!(normalized.name, "");
        assert_eq!(normalized.uuid, "");
        assert_eq!(normalized.vcpus, 0);
        assert!(normalized.ip_addresses.is_empty());
    }
}
