//! Active/updating-phase handler: diff and converge

use kube::runtime::controller::Action;
use tracing::info;

use crate::controller::planner::{run_update_plan, PlanOutcome};
use crate::controller::{credentials, upstream, validation};
use crate::crd::{ClusterPhase, GKEClusterConfig};
use crate::gke::{self, rrn};
use crate::{Result, UPSTREAM_WAIT};

use super::super::cluster::Context;
use super::{enqueue_update, set_phase};

/// Compare the desired spec against upstream and act on the difference.
///
/// Runs the version-compatibility gate first, waits while the upstream
/// cluster or any node pool is mid-operation, then drives the update planner
/// and promotes to active on quiescence.
pub async fn handle_check_and_update(config: &GKEClusterConfig, ctx: &Context) -> Result<Action> {
    if let Err(err) = validation::validate_update(config) {
        set_phase(config, ctx, ClusterPhase::Updating).await?;
        return Err(err);
    }

    let gke = credentials::container_service(config, ctx).await?;
    let cluster_rrn = rrn::cluster(
        &config.spec.project_id,
        config.spec.location(),
        &config.spec.cluster_name,
    );
    let cluster = gke.get_cluster(&cluster_rrn).await?;

    if cluster.status == gke::CLUSTER_STATUS_RECONCILING {
        info!(cluster = %config.spec.cluster_name, "waiting for cluster to finish updating");
        return busy_wait(config, ctx).await;
    }

    for np in &cluster.node_pools {
        if matches!(
            np.status.as_str(),
            gke::NODE_POOL_STATUS_RECONCILING
                | gke::NODE_POOL_STATUS_STOPPING
                | gke::NODE_POOL_STATUS_PROVISIONING
        ) {
            info!(
                cluster = %config.spec.cluster_name,
                pool = %np.name,
                "waiting for cluster to update node pool"
            );
            return busy_wait(config, ctx).await;
        }
    }

    let projected = upstream::project_cluster(&cluster);
    match run_update_plan(config, &projected, gke.as_ref()).await? {
        PlanOutcome::Changed => enqueue_update(config, ctx).await,
        PlanOutcome::Retry => Ok(Action::requeue(UPSTREAM_WAIT)),
        PlanOutcome::NoChange => {
            if config.phase() != ClusterPhase::Active {
                info!(cluster = %config.spec.cluster_name, "cluster finished updating");
                set_phase(config, ctx, ClusterPhase::Active).await?;
            }
            Ok(Action::await_change())
        }
    }
}

/// Wait out an upstream operation: flip to updating once, then poll.
async fn busy_wait(config: &GKEClusterConfig, ctx: &Context) -> Result<Action> {
    if config.phase() != ClusterPhase::Updating {
        set_phase(config, ctx, ClusterPhase::Updating).await?;
        return Ok(Action::await_change());
    }
    Ok(Action::requeue(UPSTREAM_WAIT))
}
