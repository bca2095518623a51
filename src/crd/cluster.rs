//! GKEClusterConfig Custom Resource Definition
//!
//! A GKEClusterConfig describes one GKE cluster the operator manages. For
//! imported clusters only the identity fields are required; for clusters the
//! operator creates, the validator requires the full specification.

use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::types::{
    ClusterAddons, ClusterPhase, IpAllocationPolicy, MasterAuthorizedNetworksConfig,
    NetworkConfig, NodePoolConfig, PrivateClusterConfig,
};

/// Specification for a GKEClusterConfig
#[derive(CustomResource, Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq)]
#[kube(
    group = "gke.cattle.io",
    version = "v1",
    kind = "GKEClusterConfig",
    plural = "gkeclusterconfigs",
    shortname = "gkecc",
    status = "GKEClusterConfigStatus",
    namespaced,
    printcolumn = r#"{"name":"Phase","type":"string","jsonPath":".status.phase"}"#,
    printcolumn = r#"{"name":"Cluster","type":"string","jsonPath":".spec.clusterName"}"#,
    printcolumn = r#"{"name":"Failure","type":"string","jsonPath":".status.failureMessage"}"#
)]
#[serde(rename_all = "camelCase")]
pub struct GKEClusterConfigSpec {
    /// GCP project the cluster lives in
    #[serde(rename = "projectID", default)]
    pub project_id: String,

    /// Compute zone for a zonal cluster; mutually exclusive with `region`
    #[serde(default)]
    pub zone: String,

    /// Compute region for a regional cluster; mutually exclusive with `zone`
    #[serde(default)]
    pub region: String,

    /// Name of the cluster in GKE
    #[serde(default)]
    pub cluster_name: String,

    /// Cloud credential reference in `namespace:id` form, naming the secret
    /// that holds the service-account JSON
    #[serde(default)]
    pub credential_content: String,

    /// Whether the cluster pre-exists in GKE and is adopted rather than
    /// created; imported clusters are never created or deleted upstream
    #[serde(default)]
    pub imported: bool,

    /// Free-form cluster description
    #[serde(default)]
    pub description: String,

    /// Kubernetes version of the master
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kubernetes_version: Option<String>,

    /// Whether Kubernetes alpha features are enabled
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enable_alpha_feature: Option<bool>,

    /// Logging service name (e.g. "logging.googleapis.com/kubernetes")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logging_service: Option<String>,

    /// Monitoring service name (e.g. "monitoring.googleapis.com/kubernetes")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub monitoring_service: Option<String>,

    /// Cluster addon toggles
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cluster_addons: Option<ClusterAddons>,

    /// Pod address range for non-VPC-native clusters
    #[serde(default)]
    pub cluster_ipv4_cidr_block: String,

    /// VPC network and subnetwork
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub network_config: Option<NetworkConfig>,

    /// Whether network policy enforcement is enabled
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub network_policy: Option<bool>,

    /// VPC-native IP allocation configuration
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ip_allocation_policy: Option<IpAllocationPolicy>,

    /// Private cluster configuration
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub private_cluster_config: Option<PrivateClusterConfig>,

    /// Master authorized networks configuration
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub master_authorized_networks_config: Option<MasterAuthorizedNetworksConfig>,

    /// Node pools of the cluster
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub node_pools: Vec<NodePoolConfig>,
}

impl GKEClusterConfigSpec {
    /// The location used in relative resource names: the region when set,
    /// otherwise the zone. The validator guarantees exactly one is non-empty.
    pub fn location(&self) -> &str {
        if !self.region.is_empty() {
            &self.region
        } else {
            &self.zone
        }
    }
}

/// Status for a GKEClusterConfig
#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GKEClusterConfigStatus {
    /// Current lifecycle phase
    #[serde(default)]
    pub phase: ClusterPhase,

    /// Message of the last reconcile error; empty when the last reconcile
    /// succeeded
    #[serde(default)]
    pub failure_message: String,
}

impl GKEClusterConfigStatus {
    /// Create a status with the given phase and an empty failure message
    pub fn with_phase(phase: ClusterPhase) -> Self {
        Self {
            phase,
            failure_message: String::new(),
        }
    }
}

impl GKEClusterConfig {
    /// Current phase, defaulting to unset when status has never been written
    pub fn phase(&self) -> ClusterPhase {
        self.status
            .as_ref()
            .map(|s| s.phase.clone())
            .unwrap_or_default()
    }

    /// Last recorded failure message, empty when none
    pub fn failure_message(&self) -> &str {
        self.status
            .as_ref()
            .map(|s| s.failure_message.as_str())
            .unwrap_or("")
    }
}
