//! GKE container API v1 resource and response types
//!
//! Wire structs for the subset of the v1 REST API the operator consumes.
//! Responses from Google omit empty fields, so every field carries a serde
//! default; the same structs are nested inside request bodies.
//!
//! API reference: <https://cloud.google.com/kubernetes-engine/docs/reference/rest>

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A GKE cluster resource
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct Cluster {
    /// Cluster name
    pub name: String,
    /// Free-form description
    pub description: String,
    /// Kubernetes version requested at creation time
    pub initial_cluster_version: String,
    /// Kubernetes version currently running on the master
    pub current_master_version: String,
    /// Whether alpha features are enabled
    pub enable_kubernetes_alpha: bool,
    /// Logging service in use
    pub logging_service: String,
    /// Monitoring service in use
    pub monitoring_service: String,
    /// Pod address range of the cluster
    pub cluster_ipv4_cidr: String,
    /// Cluster lifecycle status (see the `CLUSTER_STATUS_*` constants)
    pub status: String,
    /// Addon configuration
    #[serde(skip_serializing_if = "Option::is_none")]
    pub addons_config: Option<AddonsConfig>,
    /// VPC-native IP allocation configuration
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ip_allocation_policy: Option<IpAllocationPolicy>,
    /// Network and subnetwork configuration
    #[serde(skip_serializing_if = "Option::is_none")]
    pub network_config: Option<NetworkConfig>,
    /// Network policy enforcement configuration
    #[serde(skip_serializing_if = "Option::is_none")]
    pub network_policy: Option<NetworkPolicy>,
    /// Private cluster configuration
    #[serde(skip_serializing_if = "Option::is_none")]
    pub private_cluster_config: Option<PrivateClusterConfig>,
    /// Master authorized networks configuration
    #[serde(skip_serializing_if = "Option::is_none")]
    pub master_authorized_networks_config: Option<MasterAuthorizedNetworksConfig>,
    /// Node pools of the cluster
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub node_pools: Vec<NodePool>,
}

/// A GKE node pool resource
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct NodePool {
    /// Node pool name
    pub name: String,
    /// Kubernetes version on the pool's nodes
    pub version: String,
    /// Node count requested at creation time
    pub initial_node_count: i64,
    /// Node pool lifecycle status (see the `NODE_POOL_STATUS_*` constants)
    pub status: String,
    /// Machine configuration of the pool's nodes
    #[serde(skip_serializing_if = "Option::is_none")]
    pub config: Option<NodeConfig>,
    /// Autoscaler settings
    #[serde(skip_serializing_if = "Option::is_none")]
    pub autoscaling: Option<NodePoolAutoscaling>,
    /// Maximum pods per node
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_pods_constraint: Option<MaxPodsConstraint>,
}

/// Machine configuration for nodes
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct NodeConfig {
    /// Boot disk size in GB
    pub disk_size_gb: i64,
    /// Boot disk type
    pub disk_type: String,
    /// Node image type
    pub image_type: String,
    /// Compute machine type
    pub machine_type: String,
    /// Kubernetes labels applied to each node
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub labels: BTreeMap<String, String>,
    /// Number of local SSDs per node
    pub local_ssd_count: i64,
    /// Whether nodes run on preemptible VMs
    pub preemptible: bool,
    /// OAuth scopes granted to the node service account
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub oauth_scopes: Vec<String>,
    /// Taints applied to each node
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub taints: Vec<NodeTaint>,
}

/// One node taint
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct NodeTaint {
    /// Taint effect
    pub effect: String,
    /// Taint key
    pub key: String,
    /// Taint value
    pub value: String,
}

/// Node pool autoscaler settings
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct NodePoolAutoscaling {
    /// Whether autoscaling is enabled
    pub enabled: bool,
    /// Lower node-count bound
    pub min_node_count: i64,
    /// Upper node-count bound
    pub max_node_count: i64,
}

/// Maximum pods per node constraint
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct MaxPodsConstraint {
    /// The constraint value
    pub max_pods_per_node: i64,
}

/// Addon configuration; each addon is modeled as a `disabled` flag upstream
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct AddonsConfig {
    /// HTTP (L7) load balancing addon
    #[serde(skip_serializing_if = "Option::is_none")]
    pub http_load_balancing: Option<HttpLoadBalancing>,
    /// Horizontal pod autoscaling addon
    #[serde(skip_serializing_if = "Option::is_none")]
    pub horizontal_pod_autoscaling: Option<HorizontalPodAutoscaling>,
    /// Network policy config addon
    #[serde(skip_serializing_if = "Option::is_none")]
    pub network_policy_config: Option<NetworkPolicyConfig>,
}

/// HTTP load balancing addon toggle
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct HttpLoadBalancing {
    /// Whether the addon is disabled
    pub disabled: bool,
}

/// Horizontal pod autoscaling addon toggle
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct HorizontalPodAutoscaling {
    /// Whether the addon is disabled
    pub disabled: bool,
}

/// Network policy config addon toggle
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct NetworkPolicyConfig {
    /// Whether the addon is disabled
    pub disabled: bool,
}

/// Network policy enforcement configuration
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct NetworkPolicy {
    /// Whether enforcement is enabled
    pub enabled: bool,
    /// Enforcement provider (see [`super::NETWORK_PROVIDER_CALICO`])
    pub provider: String,
}

/// Network and subnetwork configuration
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct NetworkConfig {
    /// Compute network name
    pub network: String,
    /// Compute subnetwork name
    pub subnetwork: String,
}

/// VPC-native IP allocation configuration
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct IpAllocationPolicy {
    /// CIDR block for cluster pods
    pub cluster_ipv4_cidr_block: String,
    /// Existing secondary range name for cluster pods
    pub cluster_secondary_range_name: String,
    /// Whether a new subnetwork is created
    pub create_subnetwork: bool,
    /// CIDR block for node IPs
    pub node_ipv4_cidr_block: String,
    /// CIDR block for services
    pub services_ipv4_cidr_block: String,
    /// Existing secondary range name for services
    pub services_secondary_range_name: String,
    /// Name of the created subnetwork
    pub subnetwork_name: String,
    /// Whether alias IPs are used
    pub use_ip_aliases: bool,
}

/// Private cluster configuration
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct PrivateClusterConfig {
    /// Whether the master is only reachable privately
    pub enable_private_endpoint: bool,
    /// Whether nodes only get internal IPs
    pub enable_private_nodes: bool,
    /// CIDR block for the master network
    pub master_ipv4_cidr_block: String,
    /// Internal master endpoint
    pub private_endpoint: String,
    /// External master endpoint
    pub public_endpoint: String,
}

/// Master authorized networks configuration
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct MasterAuthorizedNetworksConfig {
    /// Whether master access is restricted
    pub enabled: bool,
    /// Authorized CIDR blocks
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub cidr_blocks: Vec<CidrBlock>,
}

/// One authorized CIDR block
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct CidrBlock {
    /// The CIDR block
    pub cidr_block: String,
    /// Display name
    pub display_name: String,
}

/// A long-running operation handle returned by mutating calls
///
/// The operator does not track operations; the handle is only logged. All
/// fields default because some deployments return sparse bodies.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct Operation {
    /// Server-assigned operation name
    pub name: String,
    /// Operation status (PENDING, RUNNING, DONE, ...)
    pub status: String,
    /// Operation type (CREATE_CLUSTER, UPDATE_CLUSTER, ...)
    pub operation_type: String,
    /// Resource link the operation targets
    pub target_link: String,
}

/// Response of `projects.locations.clusters.list`
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct ListClustersResponse {
    /// Clusters in the requested location
    pub clusters: Vec<Cluster>,
}

/// OAuth2 token endpoint response
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct TokenResponse {
    /// The bearer access token
    pub access_token: String,
    /// Token lifetime in seconds
    pub expires_in: i64,
    /// Token type, normally "Bearer"
    pub token_type: String,
}

/// Error envelope returned by Google APIs
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct GoogleErrorResponse {
    /// The error payload
    pub error: GoogleErrorDetail,
}

/// Error payload of [`GoogleErrorResponse`]
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct GoogleErrorDetail {
    /// HTTP status code
    pub code: i32,
    /// Human-readable message
    pub message: String,
    /// Canonical status string (e.g. "NOT_FOUND")
    pub status: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cluster_deserializes_from_sparse_response() {
        let cluster: Cluster = serde_json::from_str(
            r#"{"name":"c1","status":"RUNNING","currentMasterVersion":"1.26.5-gke.100"}"#,
        )
        .unwrap();
        assert_eq!(cluster.name, "c1");
        assert_eq!(cluster.status, "RUNNING");
        assert_eq!(cluster.current_master_version, "1.26.5-gke.100");
        assert!(cluster.node_pools.is_empty());
        assert!(cluster.addons_config.is_none());
    }

    #[test]
    fn error_envelope_decodes_code_message_and_status() {
        let envelope: GoogleErrorResponse = serde_json::from_str(
            r#"{"error":{"code":404,"message":"Not found: cluster","status":"NOT_FOUND"}}"#,
        )
        .unwrap();
        assert_eq!(envelope.error.code, 404);
        assert_eq!(envelope.error.status, "NOT_FOUND");
    }

    #[test]
    fn operation_tolerates_empty_body() {
        let operation: Operation = serde_json::from_str("{}").unwrap();
        assert!(operation.name.is_empty());
        assert!(operation.status.is_empty());
    }
}
