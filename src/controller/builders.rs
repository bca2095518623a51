//! Create-request construction
//!
//! Deterministically maps a validated `GKEClusterConfigSpec` onto the wire
//! `CreateClusterRequest`. The validator has already enforced presence of
//! every field this mapping reads for non-imported clusters, so absent
//! optionals fall back to defaults instead of being re-checked here.

use crate::crd::GKEClusterConfigSpec;
use crate::gke;

/// Build the create request for a validated spec.
///
/// Addon toggles invert on the way out: the spec stores them
/// enabled-positive, the API wants `disabled` flags.
pub fn create_cluster_request(spec: &GKEClusterConfigSpec) -> gke::CreateClusterRequest {
    let ip_allocation_policy = spec.ip_allocation_policy.clone().unwrap_or_default();

    let mut cluster = gke::Cluster {
        name: spec.cluster_name.clone(),
        description: spec.description.clone(),
        initial_cluster_version: spec.kubernetes_version.clone().unwrap_or_default(),
        enable_kubernetes_alpha: spec.enable_alpha_feature.unwrap_or(false),
        logging_service: spec.logging_service.clone().unwrap_or_default(),
        monitoring_service: spec.monitoring_service.clone().unwrap_or_default(),
        ip_allocation_policy: Some(gke::IpAllocationPolicy {
            cluster_ipv4_cidr_block: ip_allocation_policy.cluster_ipv4_cidr_block,
            cluster_secondary_range_name: ip_allocation_policy.cluster_secondary_range_name,
            create_subnetwork: ip_allocation_policy.create_subnetwork,
            node_ipv4_cidr_block: ip_allocation_policy.node_ipv4_cidr_block,
            services_ipv4_cidr_block: ip_allocation_policy.services_ipv4_cidr_block,
            services_secondary_range_name: ip_allocation_policy.services_secondary_range_name,
            subnetwork_name: ip_allocation_policy.subnetwork_name,
            use_ip_aliases: ip_allocation_policy.use_ip_aliases,
        }),
        addons_config: Some(gke::AddonsConfig::default()),
        ..Default::default()
    };

    if let Some(addons) = &spec.cluster_addons {
        cluster.addons_config = Some(gke::AddonsConfig {
            http_load_balancing: Some(gke::HttpLoadBalancing {
                disabled: !addons.http_load_balancing,
            }),
            horizontal_pod_autoscaling: Some(gke::HorizontalPodAutoscaling {
                disabled: !addons.horizontal_pod_autoscaling,
            }),
            network_policy_config: Some(gke::NetworkPolicyConfig {
                disabled: !addons.network_policy_config,
            }),
        });
    }

    cluster.node_pools = spec.node_pools.iter().map(build_node_pool).collect();

    if let Some(manc) = &spec.master_authorized_networks_config {
        cluster.master_authorized_networks_config = Some(gke::MasterAuthorizedNetworksConfig {
            enabled: manc.enabled,
            cidr_blocks: manc
                .cidr_blocks
                .iter()
                .map(|b| gke::CidrBlock {
                    cidr_block: b.cidr_block.clone(),
                    display_name: b.display_name.clone(),
                })
                .collect(),
        });
    }

    if let Some(network_config) = &spec.network_config {
        cluster.network_config = Some(gke::NetworkConfig {
            network: network_config.network.clone().unwrap_or_default(),
            subnetwork: network_config.subnetwork.clone().unwrap_or_default(),
        });
    }

    if let Some(enabled) = spec.network_policy {
        cluster.network_policy = Some(gke::NetworkPolicy {
            enabled,
            provider: String::new(),
        });
    }

    if let Some(pcc) = &spec.private_cluster_config {
        cluster.private_cluster_config = Some(gke::PrivateClusterConfig {
            enable_private_endpoint: pcc.enable_private_endpoint.unwrap_or(false),
            enable_private_nodes: pcc.enable_private_nodes.unwrap_or(false),
            master_ipv4_cidr_block: pcc.master_ipv4_cidr_block.clone(),
            private_endpoint: pcc.private_endpoint.clone(),
            public_endpoint: pcc.public_endpoint.clone(),
        });
    }

    gke::CreateClusterRequest { cluster }
}

fn build_node_pool(np: &crate::crd::NodePoolConfig) -> gke::NodePool {
    let config = np.config.clone().unwrap_or_default();
    let autoscaling = np.autoscaling.clone().unwrap_or_default();

    let mut pool = gke::NodePool {
        name: np.name.clone().unwrap_or_default(),
        initial_node_count: np.initial_node_count.unwrap_or(0),
        autoscaling: Some(gke::NodePoolAutoscaling {
            enabled: autoscaling.enabled,
            min_node_count: autoscaling.min_node_count,
            max_node_count: autoscaling.max_node_count,
        }),
        config: Some(gke::NodeConfig {
            disk_size_gb: config.disk_size_gb,
            disk_type: config.disk_type,
            image_type: config.image_type,
            machine_type: config.machine_type,
            labels: config.labels,
            local_ssd_count: config.local_ssd_count,
            preemptible: config.preemptible,
            oauth_scopes: config.oauth_scopes,
            taints: config
                .taints
                .iter()
                .map(|t| gke::NodeTaint {
                    effect: t.effect.clone(),
                    key: t.key.clone(),
                    value: t.value.clone(),
                })
                .collect(),
        }),
        ..Default::default()
    };

    // left unset, the upstream default applies
    if let Some(max_pods) = np.max_pods_constraint {
        pool.max_pods_constraint = Some(gke::MaxPodsConstraint {
            max_pods_per_node: max_pods,
        });
    }

    pool
}
