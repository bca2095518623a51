//! Deletion handler
//!
//! Runs when the object carries a deletion timestamp. Imported clusters and
//! configs that never advanced past the unset phase leave the remote cluster
//! alone; everything else is deleted upstream with a bounded retry against
//! the transient "operation in progress" rejection. The finalizer is removed
//! only after cleanup succeeds.

use kube::runtime::controller::Action;
use tracing::{debug, info, warn};

use crate::controller::credentials;
use crate::crd::{ClusterPhase, GKEClusterConfig};
use crate::gke::rrn;
use crate::retry::retry_with_squared_backoff;
use crate::{Result, DELETE_RETRY_ATTEMPTS, FINALIZER};

use super::super::cluster::{has_finalizer, Context};
use super::object_ref;

/// Tear down the remote cluster and release the finalizer.
pub async fn handle_removal(config: &GKEClusterConfig, ctx: &Context) -> Result<Action> {
    if !has_finalizer(config) {
        // nothing to clean up; the runtime finishes the delete
        return Ok(Action::await_change());
    }

    if config.spec.imported {
        info!(cluster = %config.spec.cluster_name, "cluster is imported, will not delete upstream cluster");
    } else if config.phase() == ClusterPhase::Unset {
        // most likely the cluster pre-existed in GKE; never created, never deleted
        warn!(cluster = %config.spec.cluster_name, "cluster never advanced to creating, will not delete upstream cluster");
    } else {
        delete_upstream_cluster(config, ctx).await?;
    }

    let (namespace, name) = object_ref(config);
    ctx.kube
        .remove_finalizer(&namespace, &name, FINALIZER)
        .await?;
    Ok(Action::await_change())
}

async fn delete_upstream_cluster(config: &GKEClusterConfig, ctx: &Context) -> Result<()> {
    let gke = credentials::container_service(config, ctx).await?;
    let cluster_rrn = rrn::cluster(
        &config.spec.project_id,
        config.spec.location(),
        &config.spec.cluster_name,
    );

    info!(
        cluster = %config.spec.cluster_name,
        project = %config.spec.project_id,
        location = %config.spec.location(),
        "deleting upstream cluster"
    );

    let result = retry_with_squared_backoff(
        DELETE_RETRY_ATTEMPTS,
        "clusters.delete",
        |e: &crate::Error| e.is_transient_busy(),
        || gke.delete_cluster(&cluster_rrn),
    )
    .await;

    match result {
        Ok(operation) => {
            if operation.name.is_empty() {
                debug!(cluster = %config.spec.cluster_name, "cluster delete accepted");
            } else {
                debug!(
                    cluster = %config.spec.cluster_name,
                    operation = %operation.name,
                    status = %operation.status,
                    "cluster delete submitted"
                );
            }
            Ok(())
        }
        Err(e) if e.is_not_found() => {
            debug!(cluster = %config.spec.cluster_name, "cluster does not exist upstream");
            Ok(())
        }
        Err(e) => Err(e),
    }
}
