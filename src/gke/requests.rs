//! GKE container API v1 request types
//!
//! Request bodies for the mutating calls the operator issues. Each update
//! request is the unit of change for the update planner: one reconcile
//! submits at most one of these.
//!
//! API reference: <https://cloud.google.com/kubernetes-engine/docs/reference/rest>

use serde::Serialize;

use super::responses::{
    AddonsConfig, Cluster, MasterAuthorizedNetworksConfig, NetworkPolicy, NodePoolAutoscaling,
};

/// Request body for `projects.locations.clusters.create`
#[derive(Clone, Debug, Default, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CreateClusterRequest {
    /// The cluster to create
    pub cluster: Cluster,
}

/// Request body for `projects.locations.clusters.update`
#[derive(Clone, Debug, Default, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UpdateClusterRequest {
    /// The single desired change
    pub update: ClusterUpdate,
}

/// One desired cluster-level change
///
/// Exactly one logical field group is populated per request; GKE rejects
/// updates that combine unrelated changes.
#[derive(Clone, Debug, Default, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ClusterUpdate {
    /// Target master Kubernetes version
    #[serde(skip_serializing_if = "Option::is_none")]
    pub desired_master_version: Option<String>,
    /// Target addon configuration
    #[serde(skip_serializing_if = "Option::is_none")]
    pub desired_addons_config: Option<AddonsConfig>,
    /// Target master authorized networks configuration
    #[serde(skip_serializing_if = "Option::is_none")]
    pub desired_master_authorized_networks_config: Option<MasterAuthorizedNetworksConfig>,
    /// Target logging service
    #[serde(skip_serializing_if = "Option::is_none")]
    pub desired_logging_service: Option<String>,
    /// Target monitoring service
    #[serde(skip_serializing_if = "Option::is_none")]
    pub desired_monitoring_service: Option<String>,
}

/// Request body for `projects.locations.clusters.setNetworkPolicy`
#[derive(Clone, Debug, Default, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SetNetworkPolicyRequest {
    /// The network policy to apply
    pub network_policy: NetworkPolicy,
}

/// Request body for `projects.locations.clusters.nodePools.update`
#[derive(Clone, Debug, Default, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UpdateNodePoolRequest {
    /// Target node Kubernetes version
    #[serde(skip_serializing_if = "Option::is_none")]
    pub node_version: Option<String>,
    /// Target node image type
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_type: Option<String>,
}

/// Request body for `projects.locations.clusters.nodePools.setSize`
#[derive(Clone, Debug, Default, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SetNodePoolSizeRequest {
    /// Target node count
    pub node_count: i64,
}

/// Request body for `projects.locations.clusters.nodePools.setAutoscaling`
#[derive(Clone, Debug, Default, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SetNodePoolAutoscalingRequest {
    /// The autoscaler settings to apply
    pub autoscaling: NodePoolAutoscaling,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cluster_update_omits_unset_fields() {
        let update = ClusterUpdate {
            desired_master_version: Some("1.27".to_string()),
            ..Default::default()
        };
        let json = serde_json::to_value(UpdateClusterRequest { update }).unwrap();
        assert_eq!(json["update"]["desiredMasterVersion"], "1.27");
        assert!(json["update"].get("desiredAddonsConfig").is_none());
        assert!(json["update"].get("desiredLoggingService").is_none());
    }

    #[test]
    fn set_size_serializes_node_count() {
        let json = serde_json::to_value(SetNodePoolSizeRequest { node_count: 4 }).unwrap();
        assert_eq!(json["nodeCount"], 4);
    }
}
