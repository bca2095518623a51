//! Custom Resource Definitions for the GKE operator
//!
//! This module contains the GKEClusterConfig CRD and its supporting types.

mod cluster;
mod types;

pub use cluster::{GKEClusterConfig, GKEClusterConfigSpec, GKEClusterConfigStatus};
pub use types::{
    CidrBlock, ClusterAddons, ClusterPhase, IpAllocationPolicy, MasterAuthorizedNetworksConfig,
    NetworkConfig, NodeConfig, NodePoolAutoscaling, NodePoolConfig, NodePoolManagement,
    NodeTaintConfig, PrivateClusterConfig,
};
