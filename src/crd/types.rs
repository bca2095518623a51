//! Supporting types for the GKEClusterConfig CRD

use std::collections::BTreeMap;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Lifecycle phase of a GKEClusterConfig
///
/// The phase is owned by the controller and persisted on the status
/// subresource. The empty string marks a config the controller has not acted
/// on yet; deletion of a config still in this phase never touches the remote
/// cluster.
#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq, Eq)]
pub enum ClusterPhase {
    /// No remote action has been taken for this config yet
    #[default]
    #[serde(rename = "")]
    Unset,
    /// A create request has been submitted; waiting for the cluster to run
    #[serde(rename = "creating")]
    Creating,
    /// The upstream cluster matches the spec
    #[serde(rename = "active")]
    Active,
    /// An upstream mutation is in flight or still pending
    #[serde(rename = "updating")]
    Updating,
    /// A pre-existing cluster is being adopted
    #[serde(rename = "importing")]
    Importing,
}

impl std::fmt::Display for ClusterPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unset => write!(f, ""),
            Self::Creating => write!(f, "creating"),
            Self::Active => write!(f, "active"),
            Self::Updating => write!(f, "updating"),
            Self::Importing => write!(f, "importing"),
        }
    }
}

/// Desired configuration for one node pool
#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NodePoolConfig {
    /// Node pool name, unique within the cluster
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Kubernetes version running on the pool's nodes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    /// Node count at creation time; also the target of manual resizes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub initial_node_count: Option<i64>,
    /// Maximum pods schedulable per node
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_pods_constraint: Option<i64>,
    /// Autoscaler bounds for the pool
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub autoscaling: Option<NodePoolAutoscaling>,
    /// Machine configuration for the pool's nodes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config: Option<NodeConfig>,
    /// Auto-repair and auto-upgrade settings
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub management: Option<NodePoolManagement>,
}

/// Node pool autoscaler bounds
///
/// When `enabled` is set, `1 <= min_node_count <= max_node_count` must hold.
#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct NodePoolAutoscaling {
    /// Whether the autoscaler manages this pool
    #[serde(default)]
    pub enabled: bool,
    /// Lower node-count bound
    #[serde(default)]
    pub min_node_count: i64,
    /// Upper node-count bound
    #[serde(default)]
    pub max_node_count: i64,
}

/// Machine configuration shared by all nodes of a pool
#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NodeConfig {
    /// Boot disk size in GB
    #[serde(default)]
    pub disk_size_gb: i64,
    /// Boot disk type (e.g. "pd-standard", "pd-ssd")
    #[serde(default)]
    pub disk_type: String,
    /// Node image type (e.g. "COS_CONTAINERD")
    #[serde(default)]
    pub image_type: String,
    /// Compute machine type (e.g. "n1-standard-2")
    #[serde(default)]
    pub machine_type: String,
    /// Kubernetes labels applied to each node
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub labels: BTreeMap<String, String>,
    /// Number of local SSDs attached per node
    #[serde(default)]
    pub local_ssd_count: i64,
    /// Whether nodes run on preemptible VMs
    #[serde(default)]
    pub preemptible: bool,
    /// OAuth scopes granted to the node service account
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub oauth_scopes: Vec<String>,
    /// Taints applied to each node
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub taints: Vec<NodeTaintConfig>,
}

/// One node taint
#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct NodeTaintConfig {
    /// Taint effect (NO_SCHEDULE, PREFER_NO_SCHEDULE, NO_EXECUTE)
    #[serde(default)]
    pub effect: String,
    /// Taint key
    #[serde(default)]
    pub key: String,
    /// Taint value
    #[serde(default)]
    pub value: String,
}

/// Node pool repair/upgrade automation
#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct NodePoolManagement {
    /// Whether nodes are automatically repaired
    #[serde(default)]
    pub auto_repair: bool,
    /// Whether nodes are automatically upgraded
    #[serde(default)]
    pub auto_upgrade: bool,
}

/// Cluster addon toggles
///
/// These are stored enabled-positive; the upstream API models the same three
/// addons as `disabled` flags.
#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ClusterAddons {
    /// HTTP (L7) load balancing controller addon
    #[serde(default)]
    pub http_load_balancing: bool,
    /// Horizontal pod autoscaling addon
    #[serde(default)]
    pub horizontal_pod_autoscaling: bool,
    /// Network policy config addon (required for network policy enforcement)
    #[serde(default)]
    pub network_policy_config: bool,
}

/// VPC network and subnetwork the cluster attaches to
#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct NetworkConfig {
    /// Compute network name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub network: Option<String>,
    /// Compute subnetwork name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subnetwork: Option<String>,
}

/// VPC-native IP allocation configuration
#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct IpAllocationPolicy {
    /// CIDR block for cluster pods
    #[serde(default)]
    pub cluster_ipv4_cidr_block: String,
    /// Existing secondary range name for cluster pods
    #[serde(default)]
    pub cluster_secondary_range_name: String,
    /// Whether a new subnetwork is created for the cluster
    #[serde(default)]
    pub create_subnetwork: bool,
    /// CIDR block for node IPs
    #[serde(default)]
    pub node_ipv4_cidr_block: String,
    /// CIDR block for services
    #[serde(default)]
    pub services_ipv4_cidr_block: String,
    /// Existing secondary range name for services
    #[serde(default)]
    pub services_secondary_range_name: String,
    /// Name of the created subnetwork when `create_subnetwork` is set
    #[serde(default)]
    pub subnetwork_name: String,
    /// Whether alias IPs are used for pod addresses
    #[serde(default)]
    pub use_ip_aliases: bool,
}

/// Private cluster configuration
#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PrivateClusterConfig {
    /// Whether the master is only reachable through the private endpoint
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enable_private_endpoint: Option<bool>,
    /// Whether nodes only get internal IP addresses
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enable_private_nodes: Option<bool>,
    /// CIDR block for the master network
    #[serde(default)]
    pub master_ipv4_cidr_block: String,
    /// Internal endpoint of the master
    #[serde(default)]
    pub private_endpoint: String,
    /// External endpoint of the master
    #[serde(default)]
    pub public_endpoint: String,
}

/// Master authorized networks configuration
#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct MasterAuthorizedNetworksConfig {
    /// Whether access to the master is restricted to the listed CIDR blocks
    #[serde(default)]
    pub enabled: bool,
    /// CIDR blocks allowed to reach the master; compared as an unordered set
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub cidr_blocks: Vec<CidrBlock>,
}

/// One authorized CIDR block
#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub struct CidrBlock {
    /// The CIDR block (e.g. "10.0.0.0/8")
    #[serde(default)]
    pub cidr_block: String,
    /// Human-readable display name
    #[serde(default)]
    pub display_name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn phase_serializes_to_persisted_strings() {
        for (phase, expected) in [
            (ClusterPhase::Unset, "\"\""),
            (ClusterPhase::Creating, "\"creating\""),
            (ClusterPhase::Active, "\"active\""),
            (ClusterPhase::Updating, "\"updating\""),
            (ClusterPhase::Importing, "\"importing\""),
        ] {
            assert_eq!(serde_json::to_string(&phase).unwrap(), expected);
        }
    }

    #[test]
    fn phase_round_trips_through_json() {
        let phase: ClusterPhase = serde_json::from_str("\"updating\"").unwrap();
        assert_eq!(phase, ClusterPhase::Updating);
        let unset: ClusterPhase = serde_json::from_str("\"\"").unwrap();
        assert_eq!(unset, ClusterPhase::Unset);
    }

    #[test]
    fn phase_defaults_to_unset() {
        assert_eq!(ClusterPhase::default(), ClusterPhase::Unset);
    }

    #[test]
    fn node_pool_fields_use_camel_case() {
        let pool = NodePoolConfig {
            name: Some("pool-a".to_string()),
            initial_node_count: Some(3),
            max_pods_constraint: Some(110),
            ..Default::default()
        };
        let json = serde_json::to_value(&pool).unwrap();
        assert_eq!(json["initialNodeCount"], 3);
        assert_eq!(json["maxPodsConstraint"], 110);
    }
}
