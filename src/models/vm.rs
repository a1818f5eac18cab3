use serde::Serialize;

/// The simplified per-VM view the dashboard consumes. Built fresh for every
/// request, never persisted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NormalizedVm {
    pub name: String,
    pub uuid: String,
    pub vcpus: u32,
    pub memory_gb: f64,
    pub console_url: String,
    pub ip_addresses: Vec<String>,
    pub cluster_name: String,
}
