//! Phase handlers for the GKEClusterConfig controller
//!
//! Each lifecycle phase is handled by a dedicated module. Handlers receive
//! the object and the shared context and return the controller [`Action`];
//! shared status plumbing lives here.

mod create;
mod import;
mod remove;
mod update;
mod wait;

pub use create::handle_create;
pub use import::handle_importing;
pub use remove::handle_removal;
pub use update::handle_check_and_update;
pub use wait::handle_wait_for_creation;

use kube::runtime::controller::Action;
use kube::ResourceExt;
use tracing::debug;

use crate::crd::{ClusterPhase, GKEClusterConfig, GKEClusterConfigStatus};
use crate::Result;

use super::cluster::Context;

/// Namespace and name of the object, with the usual defaults
pub(crate) fn object_ref(config: &GKEClusterConfig) -> (String, String) {
    (
        config.namespace().unwrap_or_else(|| "default".to_string()),
        config.name_any(),
    )
}

/// Move the object to the given phase via a status write.
///
/// Writes only when the phase actually changes; status writes re-trigger the
/// watch, so unconditional writes would loop.
pub(crate) async fn set_phase(
    config: &GKEClusterConfig,
    ctx: &Context,
    phase: ClusterPhase,
) -> Result<()> {
    if config.phase() == phase {
        debug!(phase = %phase, "phase unchanged, skipping status write");
        return Ok(());
    }
    let (namespace, name) = object_ref(config);
    let status = GKEClusterConfigStatus {
        phase,
        failure_message: config.failure_message().to_string(),
    };
    ctx.kube.patch_status(&namespace, &name, &status).await
}

/// Re-enter the update loop after submitting a mutation.
///
/// Already-updating objects are re-enqueued immediately; otherwise the flip
/// to `updating` is itself the trigger for the next reconcile.
pub(crate) async fn enqueue_update(config: &GKEClusterConfig, ctx: &Context) -> Result<Action> {
    if config.phase() == ClusterPhase::Updating {
        return Ok(Action::requeue(std::time::Duration::ZERO));
    }
    set_phase(config, ctx, ClusterPhase::Updating).await?;
    Ok(Action::await_change())
}
