//! Update planner
//!
//! Compares the desired spec against the projected upstream spec and submits
//! the *single* next allowed mutation. Probe order is fixed; the first probe
//! that detects drift wins and the remaining checks are skipped until the
//! next reconcile. Combined with serial per-key delivery this serializes all
//! upstream mutations for a cluster.
//!
//! Each probe is a pure function `(desired, upstream) -> Option<request>`,
//! keeping the drift decisions testable without any API coupling; the driver
//! owns submission.

use tracing::info;

use crate::crd::{GKEClusterConfig, GKEClusterConfigSpec, NodePoolConfig};
use crate::gke::{
    self, rrn, ContainerService, SetNetworkPolicyRequest, SetNodePoolAutoscalingRequest,
    SetNodePoolSizeRequest, UpdateClusterRequest, UpdateNodePoolRequest,
};
use crate::Result;

use super::upstream::{cidr_blocks_equal, node_pool_map};

/// Outcome of one planner pass
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlanOutcome {
    /// Desired and upstream agree; the reconciler may promote to active
    NoChange,
    /// One mutation was submitted; stay in updating and re-enqueue
    Changed,
    /// The provider needs more time; re-enqueue after the standard wait
    Retry,
}

/// Run the ordered probe pipeline, submitting at most one mutation.
pub async fn run_update_plan(
    config: &GKEClusterConfig,
    upstream: &GKEClusterConfigSpec,
    gke: &dyn ContainerService,
) -> Result<PlanOutcome> {
    let spec = &config.spec;
    let cluster_rrn = rrn::cluster(&spec.project_id, spec.location(), &spec.cluster_name);

    if let Some(update) = master_version_update(spec, upstream) {
        info!(
            version = spec.kubernetes_version.as_deref().unwrap_or_default(),
            "updating master kubernetes version"
        );
        gke.update_cluster(&cluster_rrn, &UpdateClusterRequest { update })
            .await?;
        return Ok(PlanOutcome::Changed);
    }

    if let Some(update) = addons_update(spec, upstream) {
        info!("updating cluster addons");
        // addon changes frequently collide with the previous addon operation;
        // back off and let the next pass resubmit
        match gke
            .update_cluster(&cluster_rrn, &UpdateClusterRequest { update })
            .await
        {
            Ok(_) => return Ok(PlanOutcome::Changed),
            Err(e) if e.is_transient_busy() => return Ok(PlanOutcome::Retry),
            Err(e) => return Err(e),
        }
    }

    if let Some(update) = master_authorized_networks_update(spec, upstream) {
        info!("updating master authorized networks");
        gke.update_cluster(&cluster_rrn, &UpdateClusterRequest { update })
            .await?;
        return Ok(PlanOutcome::Changed);
    }

    if let Some(update) = logging_monitoring_update(spec, upstream) {
        info!("updating logging and monitoring services");
        gke.update_cluster(&cluster_rrn, &UpdateClusterRequest { update })
            .await?;
        return Ok(PlanOutcome::Changed);
    }

    if let Some(request) = network_policy_update(spec, upstream) {
        info!("updating network policy");
        gke.set_network_policy(&cluster_rrn, &request).await?;
        return Ok(PlanOutcome::Changed);
    }

    let upstream_pools = node_pool_map(&upstream.node_pools);
    for np in &spec.node_pools {
        let Some(pool_name) = np.name.as_deref() else {
            continue;
        };
        // pools without an upstream counterpart are not handled here
        let Some(upstream_pool) = upstream_pools.get(pool_name).copied() else {
            continue;
        };
        let pool_rrn = rrn::node_pool(
            &spec.project_id,
            spec.location(),
            &spec.cluster_name,
            pool_name,
        );

        if let Some(request) = node_pool_version_or_image_update(np, upstream_pool) {
            info!(pool = pool_name, "updating node pool version or image type");
            gke.update_node_pool(&pool_rrn, &request).await?;
            return Ok(PlanOutcome::Changed);
        }

        if let Some(request) = node_pool_size_update(np, upstream_pool) {
            info!(pool = pool_name, "updating node pool size");
            gke.set_node_pool_size(&pool_rrn, &request).await?;
            return Ok(PlanOutcome::Changed);
        }

        if let Some(request) = node_pool_autoscaling_update(np, upstream_pool) {
            info!(pool = pool_name, "updating node pool autoscaling");
            gke.set_node_pool_autoscaling(&pool_rrn, &request).await?;
            return Ok(PlanOutcome::Changed);
        }
    }

    Ok(PlanOutcome::NoChange)
}

/// Drift probe: master Kubernetes version
pub fn master_version_update(
    desired: &GKEClusterConfigSpec,
    upstream: &GKEClusterConfigSpec,
) -> Option<gke::ClusterUpdate> {
    let version = desired.kubernetes_version.as_ref()?;
    if upstream.kubernetes_version.as_ref() == Some(version) {
        return None;
    }
    Some(gke::ClusterUpdate {
        desired_master_version: Some(version.clone()),
        ..Default::default()
    })
}

/// Drift probe: cluster addons
pub fn addons_update(
    desired: &GKEClusterConfigSpec,
    upstream: &GKEClusterConfigSpec,
) -> Option<gke::ClusterUpdate> {
    let addons = desired.cluster_addons.as_ref()?;
    let upstream_addons = upstream.cluster_addons.clone().unwrap_or_default();
    if *addons == upstream_addons {
        return None;
    }
    Some(gke::ClusterUpdate {
        desired_addons_config: Some(gke::AddonsConfig {
            http_load_balancing: Some(gke::HttpLoadBalancing {
                disabled: !addons.http_load_balancing,
            }),
            horizontal_pod_autoscaling: Some(gke::HorizontalPodAutoscaling {
                disabled: !addons.horizontal_pod_autoscaling,
            }),
            network_policy_config: Some(gke::NetworkPolicyConfig {
                disabled: !addons.network_policy_config,
            }),
        }),
        ..Default::default()
    })
}

/// Drift probe: master authorized networks
pub fn master_authorized_networks_update(
    desired: &GKEClusterConfigSpec,
    upstream: &GKEClusterConfigSpec,
) -> Option<gke::ClusterUpdate> {
    let manc = desired.master_authorized_networks_config.as_ref()?;
    let upstream_manc = upstream
        .master_authorized_networks_config
        .clone()
        .unwrap_or_default();
    let changed = manc.enabled != upstream_manc.enabled
        || (manc.enabled && !cidr_blocks_equal(&manc.cidr_blocks, &upstream_manc.cidr_blocks));
    if !changed {
        return None;
    }
    Some(gke::ClusterUpdate {
        desired_master_authorized_networks_config: Some(gke::MasterAuthorizedNetworksConfig {
            enabled: manc.enabled,
            cidr_blocks: manc
                .cidr_blocks
                .iter()
                .map(|b| gke::CidrBlock {
                    cidr_block: b.cidr_block.clone(),
                    display_name: b.display_name.clone(),
                })
                .collect(),
        }),
        ..Default::default()
    })
}

/// Drift probe: logging and monitoring services
pub fn logging_monitoring_update(
    desired: &GKEClusterConfigSpec,
    upstream: &GKEClusterConfigSpec,
) -> Option<gke::ClusterUpdate> {
    let mut update = gke::ClusterUpdate::default();
    let mut changed = false;

    if let Some(logging) = &desired.logging_service {
        if upstream.logging_service.as_ref() != Some(logging) {
            update.desired_logging_service = Some(logging.clone());
            changed = true;
        }
    }
    if let Some(monitoring) = &desired.monitoring_service {
        if upstream.monitoring_service.as_ref() != Some(monitoring) {
            update.desired_monitoring_service = Some(monitoring.clone());
            changed = true;
        }
    }

    changed.then_some(update)
}

/// Drift probe: network policy enforcement
pub fn network_policy_update(
    desired: &GKEClusterConfigSpec,
    upstream: &GKEClusterConfigSpec,
) -> Option<SetNetworkPolicyRequest> {
    let enabled = desired.network_policy?;
    if upstream.network_policy == Some(enabled) {
        return None;
    }
    Some(SetNetworkPolicyRequest {
        network_policy: gke::NetworkPolicy {
            enabled,
            provider: if enabled {
                gke::NETWORK_PROVIDER_CALICO.to_string()
            } else {
                gke::NETWORK_PROVIDER_UNSPECIFIED.to_string()
            },
        },
    })
}

/// Drift probe: node pool Kubernetes version or image type
pub fn node_pool_version_or_image_update(
    desired: &NodePoolConfig,
    upstream: &NodePoolConfig,
) -> Option<UpdateNodePoolRequest> {
    if let Some(version) = &desired.version {
        if upstream.version.as_ref() != Some(version) {
            return Some(UpdateNodePoolRequest {
                node_version: Some(version.clone()),
                image_type: None,
            });
        }
    }

    let image_type = desired.config.as_ref().map(|c| c.image_type.as_str())?;
    if image_type.is_empty() {
        return None;
    }
    let upstream_image = upstream
        .config
        .as_ref()
        .map(|c| c.image_type.as_str())
        .unwrap_or_default();
    if image_type == upstream_image {
        return None;
    }
    Some(UpdateNodePoolRequest {
        node_version: None,
        image_type: Some(image_type.to_string()),
    })
}

/// Drift probe: node pool size
pub fn node_pool_size_update(
    desired: &NodePoolConfig,
    upstream: &NodePoolConfig,
) -> Option<SetNodePoolSizeRequest> {
    let node_count = desired.initial_node_count?;
    if upstream.initial_node_count == Some(node_count) {
        return None;
    }
    Some(SetNodePoolSizeRequest { node_count })
}

/// Drift probe: node pool autoscaling
///
/// Changed when `enabled` differs, or when enabled on both sides and either
/// bound differs.
pub fn node_pool_autoscaling_update(
    desired: &NodePoolConfig,
    upstream: &NodePoolConfig,
) -> Option<SetNodePoolAutoscalingRequest> {
    let autoscaling = desired.autoscaling.as_ref()?;
    let upstream_autoscaling = upstream.autoscaling.clone().unwrap_or_default();

    let changed = autoscaling.enabled != upstream_autoscaling.enabled
        || (autoscaling.enabled
            && upstream_autoscaling.enabled
            && (autoscaling.min_node_count != upstream_autoscaling.min_node_count
                || autoscaling.max_node_count != upstream_autoscaling.max_node_count));
    if !changed {
        return None;
    }
    Some(SetNodePoolAutoscalingRequest {
        autoscaling: gke::NodePoolAutoscaling {
            enabled: autoscaling.enabled,
            min_node_count: autoscaling.min_node_count,
            max_node_count: autoscaling.max_node_count,
        },
    })
}
