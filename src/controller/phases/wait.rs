//! Creating-phase handler: poll until the upstream cluster runs

use kube::runtime::controller::Action;
use tracing::info;

use crate::controller::credentials;
use crate::crd::{ClusterPhase, GKEClusterConfig};
use crate::gke::{self, rrn};
use crate::{Error, Result, UPSTREAM_WAIT};

use super::super::cluster::Context;
use super::set_phase;

/// Poll the upstream cluster after a create was submitted.
///
/// `ERROR` fails the config; `RUNNING` promotes it to active; anything else
/// re-polls after the standard wait.
pub async fn handle_wait_for_creation(config: &GKEClusterConfig, ctx: &Context) -> Result<Action> {
    let gke = credentials::container_service(config, ctx).await?;
    let cluster_rrn = rrn::cluster(
        &config.spec.project_id,
        config.spec.location(),
        &config.spec.cluster_name,
    );
    let cluster = gke.get_cluster(&cluster_rrn).await?;

    match cluster.status.as_str() {
        gke::CLUSTER_STATUS_ERROR => Err(Error::CreationFailed {
            cluster: config.spec.cluster_name.clone(),
        }),
        gke::CLUSTER_STATUS_RUNNING => {
            info!(cluster = %config.spec.cluster_name, "cluster is running");
            set_phase(config, ctx, ClusterPhase::Active).await?;
            Ok(Action::await_change())
        }
        _ => {
            info!(cluster = %config.spec.cluster_name, status = %cluster.status, "waiting for cluster to finish creating");
            Ok(Action::requeue(UPSTREAM_WAIT))
        }
    }
}
