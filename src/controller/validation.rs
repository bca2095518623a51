//! GKEClusterConfig validation
//!
//! Two validators guard the two mutating paths. `validate_create` runs before
//! a create request is built; its required-field table is the contract the
//! request builder relies on for its unchecked field access.
//! `validate_update` gates every check-and-update pass with the version
//! compatibility rule.

use std::collections::HashSet;

use semver::Version;

use crate::crd::GKEClusterConfig;
use crate::gke::{rrn, ContainerService};
use crate::{Error, Result};

/// Validate a config for cluster creation.
///
/// Checks run in order and return on the first failure:
/// 1. project ID present
/// 2. exactly one of zone / region
/// 3. cluster name present
/// 4. autoscaler bounds on every autoscaled pool
/// 5. no cluster with the same name already exists in the location
/// 6. for non-imported clusters, the full required-field table
/// 7. for non-imported clusters, per-pool required fields and name uniqueness
pub async fn validate_create(
    config: &GKEClusterConfig,
    gke: &dyn ContainerService,
) -> Result<()> {
    let spec = &config.spec;

    if spec.project_id.is_empty() {
        return Err(Error::validation("project ID is required"));
    }
    if spec.zone.is_empty() && spec.region.is_empty() {
        return Err(Error::validation("zone or region is required"));
    }
    if !spec.zone.is_empty() && !spec.region.is_empty() {
        return Err(Error::validation(
            "only one of zone or region must be specified",
        ));
    }
    if spec.cluster_name.is_empty() {
        return Err(Error::validation("cluster name is required"));
    }

    for np in &spec.node_pools {
        if let Some(autoscaling) = &np.autoscaling {
            if autoscaling.enabled
                && (autoscaling.min_node_count < 1
                    || autoscaling.max_node_count < autoscaling.min_node_count)
            {
                return Err(Error::validation(
                    "minNodeCount in the node pool must be >= 1 and <= maxNodeCount",
                ));
            }
        }
    }

    let listing = gke
        .list_clusters(&rrn::location(&spec.project_id, spec.location()))
        .await?;
    if listing
        .clusters
        .iter()
        .any(|cluster| cluster.name == spec.cluster_name)
    {
        return Err(Error::validation(format!(
            "cannot create cluster [{}] because a cluster in GKE exists with the same name",
            spec.cluster_name
        )));
    }

    if spec.imported {
        // the remaining checks cover fields an import never needs
        return Ok(());
    }

    let name = config.metadata.name.as_deref().unwrap_or_default();
    required(spec.enable_alpha_feature.is_some(), "enableAlphaFeature", name)?;
    required(spec.kubernetes_version.is_some(), "kubernetesVersion", name)?;
    required(spec.cluster_addons.is_some(), "clusterAddons", name)?;
    required(spec.ip_allocation_policy.is_some(), "ipAllocationPolicy", name)?;
    required(spec.logging_service.is_some(), "loggingService", name)?;
    required(spec.network_config.is_some(), "networkConfig", name)?;
    required(spec.network_policy.is_some(), "networkPolicy", name)?;
    required(
        spec.private_cluster_config.is_some(),
        "privateClusterConfig",
        name,
    )?;
    required(
        spec.master_authorized_networks_config.is_some(),
        "masterAuthorizedNetworksConfig",
        name,
    )?;
    required(spec.monitoring_service.is_some(), "monitoringService", name)?;

    let mut seen = HashSet::new();
    for np in &spec.node_pools {
        required(np.name.is_some(), "nodePool.name", name)?;
        let pool_name = np.name.as_deref().unwrap_or_default();
        if !seen.insert(pool_name) {
            return Err(Error::validation(format!(
                "duplicate node pool name [{pool_name}] in cluster [{name}]"
            )));
        }
        required_for_pool(np.version.is_some(), "version", pool_name, name)?;
        required_for_pool(np.autoscaling.is_some(), "autoscaling", pool_name, name)?;
        required_for_pool(
            np.initial_node_count.is_some(),
            "initialNodeCount",
            pool_name,
            name,
        )?;
        required_for_pool(
            np.max_pods_constraint.is_some(),
            "maxPodsConstraint",
            pool_name,
            name,
        )?;
        required_for_pool(np.config.is_some(), "config", pool_name, name)?;
    }

    Ok(())
}

fn required(present: bool, field: &str, cluster: &str) -> Result<()> {
    if present {
        Ok(())
    } else {
        Err(Error::validation(format!(
            "field [{field}] must be set for non-imported cluster [{cluster}]"
        )))
    }
}

fn required_for_pool(present: bool, field: &str, pool: &str, cluster: &str) -> Result<()> {
    if present {
        Ok(())
    } else {
        Err(Error::validation(format!(
            "field [{field}] must be set for node pool [{pool}] in cluster [{cluster}]"
        )))
    }
}

/// Validate version compatibility between the cluster and its node pools.
///
/// A pool version is accepted iff it equals the cluster version, or the
/// cluster's minor version is exactly one greater than the pool's. All pool
/// failures are collected and joined with `";"`.
pub fn validate_update(config: &GKEClusterConfig) -> Result<()> {
    let name = config.metadata.name.as_deref().unwrap_or_default();

    let cluster_version = match &config.spec.kubernetes_version {
        Some(raw) => Some(parse_version(raw).map_err(|_| {
            Error::validation(format!("improper version format for cluster [{name}]: {raw}"))
        })?),
        None => None,
    };

    let mut errors = Vec::new();
    for np in &config.spec.node_pools {
        let Some(raw) = &np.version else { continue };
        let pool_name = np.name.as_deref().unwrap_or_default();
        let pool_version = match parse_version(raw) {
            Ok(v) => v,
            Err(_) => {
                errors.push(format!(
                    "improper version format for node pool [{pool_name}]: {raw}"
                ));
                continue;
            }
        };
        let Some(cluster_version) = &cluster_version else {
            continue;
        };
        if *cluster_version == pool_version {
            continue;
        }
        if cluster_version.minor == pool_version.minor + 1 {
            continue;
        }
        errors.push(format!(
            "versions for cluster [{}] and node pool [{}] are not compatible: node pool versions \
             must be equal to or one minor version lower than the cluster version",
            config.spec.kubernetes_version.as_deref().unwrap_or_default(),
            raw
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(Error::validation(errors.join(";")))
    }
}

/// Parse a user-supplied version, appending `.0` to the two-component form
fn parse_version(raw: &str) -> std::result::Result<Version, semver::Error> {
    if raw.matches('.').count() == 1 {
        Version::parse(&format!("{raw}.0"))
    } else {
        Version::parse(raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crd::{
        ClusterAddons, GKEClusterConfigSpec, IpAllocationPolicy, MasterAuthorizedNetworksConfig,
        NetworkConfig, NodeConfig, NodePoolAutoscaling, NodePoolConfig, PrivateClusterConfig,
    };
    use crate::gke::MockContainerService;

    fn complete_spec() -> GKEClusterConfigSpec {
        GKEClusterConfigSpec {
            project_id: "test-project".to_string(),
            zone: "us-central1-a".to_string(),
            cluster_name: "test-cluster".to_string(),
            credential_content: "cattle-global-data:cc-abc".to_string(),
            kubernetes_version: Some("1.27".to_string()),
            enable_alpha_feature: Some(false),
            logging_service: Some("logging.googleapis.com/kubernetes".to_string()),
            monitoring_service: Some("monitoring.googleapis.com/kubernetes".to_string()),
            cluster_addons: Some(ClusterAddons::default()),
            network_config: Some(NetworkConfig::default()),
            network_policy: Some(false),
            ip_allocation_policy: Some(IpAllocationPolicy::default()),
            private_cluster_config: Some(PrivateClusterConfig::default()),
            master_authorized_networks_config: Some(MasterAuthorizedNetworksConfig::default()),
            node_pools: vec![complete_pool("pool-a")],
            ..Default::default()
        }
    }

    fn complete_pool(name: &str) -> NodePoolConfig {
        NodePoolConfig {
            name: Some(name.to_string()),
            version: Some("1.27".to_string()),
            initial_node_count: Some(3),
            max_pods_constraint: Some(110),
            autoscaling: Some(NodePoolAutoscaling::default()),
            config: Some(NodeConfig::default()),
            management: None,
        }
    }

    fn config_with(spec: GKEClusterConfigSpec) -> GKEClusterConfig {
        GKEClusterConfig::new("test-config", spec)
    }

    fn empty_listing() -> MockContainerService {
        let mut gke = MockContainerService::new();
        gke.expect_list_clusters()
            .returning(|_| Ok(Default::default()));
        gke
    }

    #[tokio::test]
    async fn complete_spec_passes() {
        let config = config_with(complete_spec());
        assert!(validate_create(&config, &empty_listing()).await.is_ok());
    }

    #[tokio::test]
    async fn project_id_is_checked_first() {
        let mut spec = complete_spec();
        spec.project_id = String::new();
        spec.cluster_name = String::new();
        let err = validate_create(&config_with(spec), &empty_listing())
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "validation error: project ID is required");
    }

    #[tokio::test]
    async fn exactly_one_of_zone_and_region() {
        let mut spec = complete_spec();
        spec.zone = String::new();
        let err = validate_create(&config_with(spec.clone()), &empty_listing())
            .await
            .unwrap_err();
        assert!(err.to_string().contains("zone or region is required"));

        spec.zone = "us-central1-a".to_string();
        spec.region = "us-central1".to_string();
        let err = validate_create(&config_with(spec), &empty_listing())
            .await
            .unwrap_err();
        assert!(err.to_string().contains("only one of zone or region"));
    }

    #[tokio::test]
    async fn autoscaler_bounds_are_enforced() {
        let mut spec = complete_spec();
        spec.node_pools[0].autoscaling = Some(NodePoolAutoscaling {
            enabled: true,
            min_node_count: 0,
            max_node_count: 3,
        });
        let err = validate_create(&config_with(spec.clone()), &empty_listing())
            .await
            .unwrap_err();
        assert!(err.to_string().contains("minNodeCount"));

        spec.node_pools[0].autoscaling = Some(NodePoolAutoscaling {
            enabled: true,
            min_node_count: 5,
            max_node_count: 3,
        });
        let err = validate_create(&config_with(spec), &empty_listing())
            .await
            .unwrap_err();
        assert!(err.to_string().contains("maxNodeCount"));
    }

    #[tokio::test]
    async fn existing_cluster_with_same_name_is_rejected() {
        let mut gke = MockContainerService::new();
        gke.expect_list_clusters().returning(|_| {
            Ok(crate::gke::ListClustersResponse {
                clusters: vec![crate::gke::Cluster {
                    name: "test-cluster".to_string(),
                    ..Default::default()
                }],
            })
        });
        let err = validate_create(&config_with(complete_spec()), &gke)
            .await
            .unwrap_err();
        assert!(err
            .to_string()
            .contains("a cluster in GKE exists with the same name"));
    }

    #[tokio::test]
    async fn imported_configs_skip_required_field_checks() {
        let spec = GKEClusterConfigSpec {
            project_id: "test-project".to_string(),
            zone: "us-central1-a".to_string(),
            cluster_name: "adopted".to_string(),
            imported: true,
            ..Default::default()
        };
        assert!(validate_create(&config_with(spec), &empty_listing())
            .await
            .is_ok());
    }

    #[tokio::test]
    async fn each_missing_required_field_is_named() {
        let cases: Vec<(&str, Box<dyn Fn(&mut GKEClusterConfigSpec)>)> = vec![
            ("enableAlphaFeature", Box::new(|s| s.enable_alpha_feature = None)),
            ("kubernetesVersion", Box::new(|s| s.kubernetes_version = None)),
            ("clusterAddons", Box::new(|s| s.cluster_addons = None)),
            ("ipAllocationPolicy", Box::new(|s| s.ip_allocation_policy = None)),
            ("loggingService", Box::new(|s| s.logging_service = None)),
            ("networkConfig", Box::new(|s| s.network_config = None)),
            ("networkPolicy", Box::new(|s| s.network_policy = None)),
            ("privateClusterConfig", Box::new(|s| s.private_cluster_config = None)),
            (
                "masterAuthorizedNetworksConfig",
                Box::new(|s| s.master_authorized_networks_config = None),
            ),
            ("monitoringService", Box::new(|s| s.monitoring_service = None)),
        ];
        for (field, strip) in cases {
            let mut spec = complete_spec();
            strip(&mut spec);
            let err = validate_create(&config_with(spec), &empty_listing())
                .await
                .unwrap_err();
            assert!(
                err.to_string().contains(&format!("[{field}]")),
                "expected [{field}] in: {err}"
            );
        }
    }

    #[tokio::test]
    async fn node_pool_required_fields_are_named() {
        let cases: Vec<(&str, Box<dyn Fn(&mut NodePoolConfig)>)> = vec![
            ("version", Box::new(|p| p.version = None)),
            ("autoscaling", Box::new(|p| p.autoscaling = None)),
            ("initialNodeCount", Box::new(|p| p.initial_node_count = None)),
            ("maxPodsConstraint", Box::new(|p| p.max_pods_constraint = None)),
            ("config", Box::new(|p| p.config = None)),
        ];
        for (field, strip) in cases {
            let mut spec = complete_spec();
            strip(&mut spec.node_pools[0]);
            let err = validate_create(&config_with(spec), &empty_listing())
                .await
                .unwrap_err();
            assert!(
                err.to_string().contains(&format!("[{field}]")),
                "expected [{field}] in: {err}"
            );
            assert!(err.to_string().contains("[pool-a]"));
        }
    }

    #[tokio::test]
    async fn duplicate_node_pool_names_are_rejected() {
        let mut spec = complete_spec();
        spec.node_pools.push(complete_pool("pool-a"));
        let err = validate_create(&config_with(spec), &empty_listing())
            .await
            .unwrap_err();
        assert!(err.to_string().contains("duplicate node pool name [pool-a]"));
    }

    #[test]
    fn matching_versions_are_compatible() {
        let config = config_with(complete_spec());
        assert!(validate_update(&config).is_ok());
    }

    #[test]
    fn pool_one_minor_below_cluster_is_compatible() {
        let mut spec = complete_spec();
        spec.kubernetes_version = Some("1.27".to_string());
        spec.node_pools[0].version = Some("1.26".to_string());
        assert!(validate_update(&config_with(spec)).is_ok());
    }

    #[test]
    fn pool_two_minors_below_cluster_is_rejected() {
        let mut spec = complete_spec();
        spec.kubernetes_version = Some("1.25".to_string());
        spec.node_pools[0].version = Some("1.23".to_string());
        let err = validate_update(&config_with(spec)).unwrap_err();
        assert!(err.to_string().contains("[1.25]"));
        assert!(err.to_string().contains("[1.23]"));
    }

    #[test]
    fn pool_above_cluster_is_rejected() {
        let mut spec = complete_spec();
        spec.kubernetes_version = Some("1.26".to_string());
        spec.node_pools[0].version = Some("1.27".to_string());
        assert!(validate_update(&config_with(spec)).is_err());
    }

    #[test]
    fn pool_errors_are_collected_and_joined() {
        let mut spec = complete_spec();
        spec.kubernetes_version = Some("1.27".to_string());
        spec.node_pools = vec![
            {
                let mut p = complete_pool("old");
                p.version = Some("1.24".to_string());
                p
            },
            {
                let mut p = complete_pool("bad");
                p.version = Some("not-a-version".to_string());
                p
            },
        ];
        let err = validate_update(&config_with(spec)).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains(';'), "errors joined with ';': {msg}");
        assert!(msg.contains("[1.24]"));
        assert!(msg.contains("improper version format for node pool [bad]"));
    }

    #[test]
    fn malformed_cluster_version_fails_fast() {
        let mut spec = complete_spec();
        spec.kubernetes_version = Some("latest".to_string());
        let err = validate_update(&config_with(spec)).unwrap_err();
        assert!(err
            .to_string()
            .contains("improper version format for cluster"));
    }

    #[test]
    fn three_component_versions_parse_unchanged() {
        let mut spec = complete_spec();
        spec.kubernetes_version = Some("1.27.3".to_string());
        spec.node_pools[0].version = Some("1.26.8".to_string());
        // 1.27.x vs 1.26.y: one minor apart, still compatible
        assert!(validate_update(&config_with(spec)).is_ok());
    }
}
