//! Upstream cluster projection
//!
//! Translates a live container-API cluster into the shape of a
//! `GKEClusterConfigSpec` so the update planner can diff desired against
//! upstream field by field. The projection is a pure function: identity
//! fields (project, location, credential) stay empty, and a handful of
//! semantic rules paper over fields the API omits.

use std::collections::HashMap;

use crate::crd::{
    CidrBlock, ClusterAddons, GKEClusterConfigSpec, IpAllocationPolicy,
    MasterAuthorizedNetworksConfig, NetworkConfig, NodeConfig, NodePoolAutoscaling,
    NodePoolConfig, NodeTaintConfig, PrivateClusterConfig,
};
use crate::gke;

/// Project a live cluster into a desired-spec shape for diffing.
///
/// Rules preserved from the wire format:
/// - a missing network config projects both network and subnetwork as
///   `"default"`
/// - a missing private-cluster config projects both flags as `false`; when
///   present, *both* projected flags are sourced from upstream
///   `enablePrivateNodes` (user-observable upstream quirk, kept verbatim)
/// - addons project as the negation of the upstream `disabled` flags, and an
///   absent addon sub-config counts as enabled
/// - authorized networks only project when upstream has them enabled
/// - node pools in `STOPPING` state are omitted
pub fn project_cluster(upstream: &gke::Cluster) -> GKEClusterConfigSpec {
    let mut spec = GKEClusterConfigSpec {
        kubernetes_version: Some(upstream.current_master_version.clone()),
        enable_alpha_feature: Some(upstream.enable_kubernetes_alpha),
        cluster_ipv4_cidr_block: upstream.cluster_ipv4_cidr.clone(),
        logging_service: Some(upstream.logging_service.clone()),
        monitoring_service: Some(upstream.monitoring_service.clone()),
        cluster_addons: Some(ClusterAddons::default()),
        ip_allocation_policy: Some(IpAllocationPolicy::default()),
        master_authorized_networks_config: Some(MasterAuthorizedNetworksConfig::default()),
        ..Default::default()
    };

    spec.network_policy = Some(
        upstream
            .network_policy
            .as_ref()
            .map(|np| np.enabled)
            .unwrap_or(false),
    );

    spec.network_config = Some(match &upstream.network_config {
        Some(nc) => NetworkConfig {
            network: Some(nc.network.clone()),
            subnetwork: Some(nc.subnetwork.clone()),
        },
        None => NetworkConfig {
            network: Some("default".to_string()),
            subnetwork: Some("default".to_string()),
        },
    });

    spec.private_cluster_config = Some(match &upstream.private_cluster_config {
        Some(pcc) => PrivateClusterConfig {
            enable_private_endpoint: Some(pcc.enable_private_nodes),
            enable_private_nodes: Some(pcc.enable_private_nodes),
            master_ipv4_cidr_block: pcc.master_ipv4_cidr_block.clone(),
            private_endpoint: pcc.private_endpoint.clone(),
            public_endpoint: pcc.public_endpoint.clone(),
        },
        None => PrivateClusterConfig {
            enable_private_endpoint: Some(false),
            enable_private_nodes: Some(false),
            ..Default::default()
        },
    });

    if let Some(addons) = &upstream.addons_config {
        spec.cluster_addons = Some(ClusterAddons {
            http_load_balancing: addons
                .http_load_balancing
                .as_ref()
                .map(|a| !a.disabled)
                .unwrap_or(true),
            horizontal_pod_autoscaling: addons
                .horizontal_pod_autoscaling
                .as_ref()
                .map(|a| !a.disabled)
                .unwrap_or(true),
            network_policy_config: addons
                .network_policy_config
                .as_ref()
                .map(|a| !a.disabled)
                .unwrap_or(true),
        });
    }

    if let Some(policy) = &upstream.ip_allocation_policy {
        spec.ip_allocation_policy = Some(IpAllocationPolicy {
            cluster_ipv4_cidr_block: policy.cluster_ipv4_cidr_block.clone(),
            cluster_secondary_range_name: policy.cluster_secondary_range_name.clone(),
            create_subnetwork: policy.create_subnetwork,
            node_ipv4_cidr_block: policy.node_ipv4_cidr_block.clone(),
            services_ipv4_cidr_block: policy.services_ipv4_cidr_block.clone(),
            services_secondary_range_name: policy.services_secondary_range_name.clone(),
            subnetwork_name: policy.subnetwork_name.clone(),
            use_ip_aliases: policy.use_ip_aliases,
        });
    }

    if let Some(manc) = &upstream.master_authorized_networks_config {
        if manc.enabled {
            spec.master_authorized_networks_config = Some(MasterAuthorizedNetworksConfig {
                enabled: true,
                cidr_blocks: manc
                    .cidr_blocks
                    .iter()
                    .map(|b| CidrBlock {
                        cidr_block: b.cidr_block.clone(),
                        display_name: b.display_name.clone(),
                    })
                    .collect(),
            });
        }
    }

    spec.node_pools = upstream
        .node_pools
        .iter()
        .filter(|np| np.status != gke::NODE_POOL_STATUS_STOPPING)
        .map(project_node_pool)
        .collect();

    spec
}

fn project_node_pool(np: &gke::NodePool) -> NodePoolConfig {
    let mut pool = NodePoolConfig {
        name: Some(np.name.clone()),
        version: Some(np.version.clone()),
        initial_node_count: Some(np.initial_node_count),
        max_pods_constraint: np.max_pods_constraint.as_ref().map(|c| c.max_pods_per_node),
        ..Default::default()
    };

    if let Some(config) = &np.config {
        pool.config = Some(NodeConfig {
            disk_size_gb: config.disk_size_gb,
            disk_type: config.disk_type.clone(),
            image_type: config.image_type.clone(),
            machine_type: config.machine_type.clone(),
            labels: config.labels.clone(),
            local_ssd_count: config.local_ssd_count,
            preemptible: config.preemptible,
            oauth_scopes: config.oauth_scopes.clone(),
            taints: config
                .taints
                .iter()
                .map(|t| NodeTaintConfig {
                    effect: t.effect.clone(),
                    key: t.key.clone(),
                    value: t.value.clone(),
                })
                .collect(),
        });
    }

    if let Some(autoscaling) = &np.autoscaling {
        pool.autoscaling = Some(NodePoolAutoscaling {
            enabled: autoscaling.enabled,
            min_node_count: autoscaling.min_node_count,
            max_node_count: autoscaling.max_node_count,
        });
    }

    pool
}

/// Index node pools by name; pools without a name are skipped
pub fn node_pool_map(pools: &[NodePoolConfig]) -> HashMap<&str, &NodePoolConfig> {
    pools
        .iter()
        .filter_map(|np| np.name.as_deref().map(|name| (name, np)))
        .collect()
}

/// Unordered-set equality of CIDR blocks by `(cidrBlock, displayName)`
pub fn cidr_blocks_equal(lh: &[CidrBlock], rh: &[CidrBlock]) -> bool {
    if lh.len() != rh.len() {
        return false;
    }
    let lh_set: std::collections::HashSet<(&str, &str)> = lh
        .iter()
        .map(|b| (b.cidr_block.as_str(), b.display_name.as_str()))
        .collect();
    let rh_set: std::collections::HashSet<(&str, &str)> = rh
        .iter()
        .map(|b| (b.cidr_block.as_str(), b.display_name.as_str()))
        .collect();
    lh_set == rh_set
}

#[cfg(test)]
mod tests {
    use super::*;

    fn running_cluster() -> gke::Cluster {
        gke::Cluster {
            name: "test-cluster".to_string(),
            current_master_version: "1.26.5-gke.100".to_string(),
            enable_kubernetes_alpha: false,
            logging_service: "logging.googleapis.com/kubernetes".to_string(),
            monitoring_service: "monitoring.googleapis.com/kubernetes".to_string(),
            cluster_ipv4_cidr: "10.4.0.0/14".to_string(),
            status: gke::CLUSTER_STATUS_RUNNING.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn projection_is_deterministic() {
        let cluster = running_cluster();
        assert_eq!(project_cluster(&cluster), project_cluster(&cluster));
    }

    #[test]
    fn missing_network_config_defaults_to_default_network() {
        let spec = project_cluster(&running_cluster());
        let network = spec.network_config.unwrap();
        assert_eq!(network.network.as_deref(), Some("default"));
        assert_eq!(network.subnetwork.as_deref(), Some("default"));
    }

    #[test]
    fn missing_private_config_projects_disabled() {
        let spec = project_cluster(&running_cluster());
        let pcc = spec.private_cluster_config.unwrap();
        assert_eq!(pcc.enable_private_endpoint, Some(false));
        assert_eq!(pcc.enable_private_nodes, Some(false));
    }

    #[test]
    fn private_endpoint_is_sourced_from_private_nodes() {
        let mut cluster = running_cluster();
        cluster.private_cluster_config = Some(gke::PrivateClusterConfig {
            enable_private_endpoint: false,
            enable_private_nodes: true,
            ..Default::default()
        });
        let pcc = project_cluster(&cluster).private_cluster_config.unwrap();
        // both flags read from enablePrivateNodes upstream
        assert_eq!(pcc.enable_private_endpoint, Some(true));
        assert_eq!(pcc.enable_private_nodes, Some(true));
    }

    #[test]
    fn addons_project_as_negated_disabled_flags() {
        let mut cluster = running_cluster();
        cluster.addons_config = Some(gke::AddonsConfig {
            http_load_balancing: Some(gke::HttpLoadBalancing { disabled: true }),
            horizontal_pod_autoscaling: None,
            network_policy_config: Some(gke::NetworkPolicyConfig { disabled: false }),
        });
        let addons = project_cluster(&cluster).cluster_addons.unwrap();
        assert!(!addons.http_load_balancing);
        assert!(addons.horizontal_pod_autoscaling, "absent addon counts as enabled");
        assert!(addons.network_policy_config);
    }

    #[test]
    fn authorized_networks_only_project_when_enabled() {
        let mut cluster = running_cluster();
        cluster.master_authorized_networks_config = Some(gke::MasterAuthorizedNetworksConfig {
            enabled: false,
            cidr_blocks: vec![gke::CidrBlock {
                cidr_block: "10.0.0.0/8".to_string(),
                display_name: "corp".to_string(),
            }],
        });
        let manc = project_cluster(&cluster)
            .master_authorized_networks_config
            .unwrap();
        assert!(!manc.enabled);
        assert!(manc.cidr_blocks.is_empty());
    }

    #[test]
    fn stopping_node_pools_are_omitted() {
        let mut cluster = running_cluster();
        cluster.node_pools = vec![
            gke::NodePool {
                name: "keep".to_string(),
                status: gke::NODE_POOL_STATUS_RUNNING.to_string(),
                ..Default::default()
            },
            gke::NodePool {
                name: "drop".to_string(),
                status: gke::NODE_POOL_STATUS_STOPPING.to_string(),
                ..Default::default()
            },
        ];
        let spec = project_cluster(&cluster);
        assert_eq!(spec.node_pools.len(), 1);
        assert_eq!(spec.node_pools[0].name.as_deref(), Some("keep"));
    }

    #[test]
    fn node_pool_map_skips_unnamed_pools() {
        let pools = vec![
            NodePoolConfig {
                name: Some("a".to_string()),
                ..Default::default()
            },
            NodePoolConfig::default(),
        ];
        let map = node_pool_map(&pools);
        assert_eq!(map.len(), 1);
        assert!(map.contains_key("a"));
    }

    #[test]
    fn cidr_block_comparison_is_order_insensitive_and_symmetric() {
        let a = vec![
            CidrBlock {
                cidr_block: "10.0.0.0/8".to_string(),
                display_name: "corp".to_string(),
            },
            CidrBlock {
                cidr_block: "192.168.0.0/16".to_string(),
                display_name: "vpn".to_string(),
            },
        ];
        let b: Vec<CidrBlock> = a.iter().rev().cloned().collect();
        assert!(cidr_blocks_equal(&a, &b));
        assert!(cidr_blocks_equal(&b, &a));
    }

    #[test]
    fn cidr_block_comparison_detects_differences() {
        let a = vec![CidrBlock {
            cidr_block: "10.0.0.0/8".to_string(),
            display_name: "corp".to_string(),
        }];
        let renamed = vec![CidrBlock {
            cidr_block: "10.0.0.0/8".to_string(),
            display_name: "other".to_string(),
        }];
        assert!(!cidr_blocks_equal(&a, &renamed));
        assert!(!cidr_blocks_equal(&a, &[]));
    }
}
