//! Importing-phase handler

use kube::runtime::controller::Action;
use tracing::info;

use crate::crd::{ClusterPhase, GKEClusterConfig};
use crate::Result;

use super::super::cluster::Context;
use super::set_phase;

/// Promote an importing config straight to active.
///
/// The adopted cluster already exists upstream; from here on it is observed
/// and updated like any other active cluster.
pub async fn handle_importing(config: &GKEClusterConfig, ctx: &Context) -> Result<Action> {
    info!(cluster = %config.spec.cluster_name, "imported cluster is now active");
    set_phase(config, ctx, ClusterPhase::Active).await?;
    Ok(Action::await_change())
}
