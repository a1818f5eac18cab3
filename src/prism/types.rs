use serde::Deserialize;

// --- Prism Central v3 API types ---
//
// Every field is optional: different AOS versions populate different subsets
// of the vm entity, and a single odd record must never fail the whole list.

#[derive(Debug, Default, Deserialize)]
pub struct ListResponse {
    #[serde(default)]
    pub entities: Vec<serde_json::Value>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RawVmEntity {
    #[serde(default)]
    pub metadata: VmMetadata,
    #[serde(default)]
    pub status: VmStatus,
}

#[derive(Debug, Default, Deserialize)]
pub struct VmMetadata {
    #[serde(default)]
    pub uuid: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct VmStatus {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub resources: VmResources,
}

#[derive(Debug, Default, Deserialize)]
pub struct VmResources {
    #[serde(default)]
    pub power_state: Option<String>,
    #[serde(default)]
    pub num_sockets: Option<u32>,
    #[serde(default)]
    pub num_cores_per_socket: Option<u32>,
    #[serde(default)]
    pub num_vcpus: Option<u32>,
    #[serde(default)]
    pub memory_size_mib: Option<u64>,
    #[serde(default)]
    pub vm_features: VmFeatures,
    #[serde(default)]
    pub nic_list: Vec<VmNic>,
}

/// Older payloads report the vCPU count here instead of on the resources
/// object directly.
#[derive(Debug, Default, Deserialize)]
pub struct VmFeatures {
    #[serde(default)]
    pub num_vcpus: Option<u32>,
}

#[derive(Debug, Default, Deserialize)]
pub struct VmNic {
    #[serde(default)]
    pub ip_endpoint_list: Vec<IpEndpoint>,
}

#[derive(Debug, Default, Deserialize)]
pub struct IpEndpoint {
    #[serde(default)]
    pub ip: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RawClusterEntity {
    #[serde(default)]
    pub status: ClusterStatus,
    #[serde(default)]
    pub spec: ClusterSpec,
}

#[derive(Debug, Default, Deserialize)]
pub struct ClusterStatus {
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ClusterSpec {
    #[serde(default)]
    pub name: Option<String>,
}

impl RawClusterEntity {
    /// Display name, preferring the observed status over the spec
    pub fn display_name(&self) -> Option<&str> {
        self.status.name.as_deref().or(self.spec.name.as_deref())
    }
}
