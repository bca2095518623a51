//! Unset-phase handler: create the cluster or start an import

use kube::runtime::controller::Action;
use tracing::{debug, info};

use crate::controller::{builders, credentials, validation};
use crate::crd::{ClusterPhase, GKEClusterConfig};
use crate::gke::rrn;
use crate::Result;

use super::super::cluster::Context;
use super::set_phase;

/// Handle a config the controller has not acted on yet.
///
/// Imported configs flip to `importing` without touching GKE. Everything
/// else is validated, submitted as a create request, and moved to
/// `creating`; the returned operation handle is logged but not tracked.
pub async fn handle_create(config: &GKEClusterConfig, ctx: &Context) -> Result<Action> {
    if config.spec.imported {
        info!(cluster = %config.spec.cluster_name, "importing existing cluster");
        set_phase(config, ctx, ClusterPhase::Importing).await?;
        return Ok(Action::await_change());
    }

    let gke = credentials::container_service(config, ctx).await?;
    validation::validate_create(config, gke.as_ref()).await?;

    let request = builders::create_cluster_request(&config.spec);
    let parent = rrn::location(&config.spec.project_id, config.spec.location());
    let operation = gke.create_cluster(&parent, &request).await?;

    // some responses omit the operation handle
    if operation.name.is_empty() {
        debug!(cluster = %config.spec.cluster_name, "cluster create accepted");
    } else {
        debug!(
            cluster = %config.spec.cluster_name,
            operation = %operation.name,
            status = %operation.status,
            "cluster create submitted"
        );
    }
    info!(cluster = %config.spec.cluster_name, "cluster create issued");

    set_phase(config, ctx, ClusterPhase::Creating).await?;
    Ok(Action::await_change())
}
