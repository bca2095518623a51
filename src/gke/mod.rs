//! GKE container API surface
//!
//! The [`ContainerService`] trait is the seam between the controller and
//! Google's API: the controller only sees the nine operations it needs, and
//! tests substitute a mock. [`client::GkeClient`] is the production REST
//! implementation.

pub mod client;
pub mod requests;
pub mod responses;
pub mod rrn;

pub use client::GkeClient;
pub use requests::*;
pub use responses::*;

use async_trait::async_trait;

#[cfg(test)]
use mockall::automock;

use crate::Result;

// Cluster lifecycle status values reported by the container API.

/// Cluster status: not set
pub const CLUSTER_STATUS_UNSPECIFIED: &str = "STATUS_UNSPECIFIED";
/// Cluster status: the cluster is being created
pub const CLUSTER_STATUS_PROVISIONING: &str = "PROVISIONING";
/// Cluster status: the cluster is created and fully usable
pub const CLUSTER_STATUS_RUNNING: &str = "RUNNING";
/// Cluster status: work is actively being done on the cluster
pub const CLUSTER_STATUS_RECONCILING: &str = "RECONCILING";
/// Cluster status: the cluster is being deleted
pub const CLUSTER_STATUS_STOPPING: &str = "STOPPING";
/// Cluster status: the cluster may be unusable
pub const CLUSTER_STATUS_ERROR: &str = "ERROR";
/// Cluster status: the cluster requires user action to restore functionality
pub const CLUSTER_STATUS_DEGRADED: &str = "DEGRADED";

// Node pool lifecycle status values reported by the container API.

/// Node pool status: not set
pub const NODE_POOL_STATUS_UNSPECIFIED: &str = "STATUS_UNSPECIFIED";
/// Node pool status: the pool is being created
pub const NODE_POOL_STATUS_PROVISIONING: &str = "PROVISIONING";
/// Node pool status: the pool is created and fully usable
pub const NODE_POOL_STATUS_RUNNING: &str = "RUNNING";
/// Node pool status: the pool is usable but some functionality is impaired
pub const NODE_POOL_STATUS_RUNNING_WITH_ERROR: &str = "RUNNING_WITH_ERROR";
/// Node pool status: work is actively being done on the pool
pub const NODE_POOL_STATUS_RECONCILING: &str = "RECONCILING";
/// Node pool status: the pool is being deleted
pub const NODE_POOL_STATUS_STOPPING: &str = "STOPPING";
/// Node pool status: the pool may be unusable
pub const NODE_POOL_STATUS_ERROR: &str = "ERROR";

/// Network policy provider: not specified
pub const NETWORK_PROVIDER_UNSPECIFIED: &str = "PROVIDER_UNSPECIFIED";
/// Network policy provider: Calico
pub const NETWORK_PROVIDER_CALICO: &str = "CALICO";

/// Container API operations the operator consumes
///
/// Names passed to these methods are relative resource names built by
/// [`rrn`]: `parent` identifies a location, `name` a cluster or node pool.
/// Mutating calls return the long-running [`Operation`] handle, which the
/// operator logs but does not track.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait ContainerService: Send + Sync {
    /// Submit a cluster create request under the given location
    async fn create_cluster(&self, parent: &str, request: &CreateClusterRequest)
        -> Result<Operation>;

    /// Fetch a cluster by RRN
    async fn get_cluster(&self, name: &str) -> Result<Cluster>;

    /// List the clusters of a location
    async fn list_clusters(&self, parent: &str) -> Result<ListClustersResponse>;

    /// Submit one cluster-level update
    async fn update_cluster(&self, name: &str, request: &UpdateClusterRequest)
        -> Result<Operation>;

    /// Set the cluster's network policy
    async fn set_network_policy(
        &self,
        name: &str,
        request: &SetNetworkPolicyRequest,
    ) -> Result<Operation>;

    /// Update a node pool's version or image type
    async fn update_node_pool(&self, name: &str, request: &UpdateNodePoolRequest)
        -> Result<Operation>;

    /// Resize a node pool
    async fn set_node_pool_size(
        &self,
        name: &str,
        request: &SetNodePoolSizeRequest,
    ) -> Result<Operation>;

    /// Change a node pool's autoscaler settings
    async fn set_node_pool_autoscaling(
        &self,
        name: &str,
        request: &SetNodePoolAutoscalingRequest,
    ) -> Result<Operation>;

    /// Delete a cluster by RRN
    async fn delete_cluster(&self, name: &str) -> Result<Operation>;
}
