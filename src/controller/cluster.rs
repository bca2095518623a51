//! GKEClusterConfig controller implementation
//!
//! The reconciler is a phase machine: it dispatches on `status.phase`,
//! delegates to the matching phase handler, and records the outcome on the
//! status subresource. Kubernetes and container-API access sit behind traits
//! so the full lifecycle is testable against mocks.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use k8s_openapi::api::core::v1::Secret;
use kube::api::{Patch, PatchParams};
use kube::runtime::controller::Action;
use kube::{Api, Client, Resource, ResourceExt};
use tracing::{debug, error, info, warn};

#[cfg(test)]
use mockall::automock;

use crate::crd::{ClusterPhase, GKEClusterConfig, GKEClusterConfigStatus};
use crate::gke::{ContainerService, GkeClient};
use crate::{Error, Result, CONTROLLER_NAME, FINALIZER};

use super::phases;

/// Kubernetes operations the controller needs
///
/// Kept narrow so tests can substitute a mock and capture status writes.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait KubeClient: Send + Sync {
    /// Merge-patch the status subresource of a GKEClusterConfig
    async fn patch_status(
        &self,
        namespace: &str,
        name: &str,
        status: &GKEClusterConfigStatus,
    ) -> Result<()>;

    /// Merge-patch only `status.failureMessage`, leaving the phase untouched
    async fn patch_failure_message(
        &self,
        namespace: &str,
        name: &str,
        message: &str,
    ) -> Result<()>;

    /// Fetch a secret, returning `None` when it does not exist
    async fn get_secret(&self, namespace: &str, name: &str) -> Result<Option<Secret>>;

    /// Add a finalizer to a GKEClusterConfig if not already present
    async fn ensure_finalizer(&self, namespace: &str, name: &str, finalizer: &str) -> Result<()>;

    /// Remove a finalizer from a GKEClusterConfig
    async fn remove_finalizer(&self, namespace: &str, name: &str, finalizer: &str) -> Result<()>;
}

/// Factory producing an authenticated container API client per reconcile
///
/// Credentials are resolved from the object's secret on every pass; nothing
/// is cached across reconciles.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait ContainerServiceFactory: Send + Sync {
    /// Build a client from service-account credential JSON
    async fn client(&self, credential_json: &str) -> Result<Arc<dyn ContainerService>>;
}

/// Real Kubernetes client implementation
pub struct KubeClientImpl {
    client: Client,
}

impl KubeClientImpl {
    /// Wrap a kube client
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    fn configs(&self, namespace: &str) -> Api<GKEClusterConfig> {
        Api::namespaced(self.client.clone(), namespace)
    }
}

#[async_trait]
impl KubeClient for KubeClientImpl {
    async fn patch_status(
        &self,
        namespace: &str,
        name: &str,
        status: &GKEClusterConfigStatus,
    ) -> Result<()> {
        let patch = serde_json::json!({ "status": status });
        self.configs(namespace)
            .patch_status(name, &PatchParams::apply(CONTROLLER_NAME), &Patch::Merge(&patch))
            .await?;
        Ok(())
    }

    async fn patch_failure_message(
        &self,
        namespace: &str,
        name: &str,
        message: &str,
    ) -> Result<()> {
        let patch = serde_json::json!({ "status": { "failureMessage": message } });
        self.configs(namespace)
            .patch_status(name, &PatchParams::apply(CONTROLLER_NAME), &Patch::Merge(&patch))
            .await?;
        Ok(())
    }

    async fn get_secret(&self, namespace: &str, name: &str) -> Result<Option<Secret>> {
        let api: Api<Secret> = Api::namespaced(self.client.clone(), namespace);
        match api.get(name).await {
            Ok(secret) => Ok(Some(secret)),
            Err(kube::Error::Api(ae)) if ae.code == 404 => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn ensure_finalizer(&self, namespace: &str, name: &str, finalizer: &str) -> Result<()> {
        let api = self.configs(namespace);
        let config = match api.get(name).await {
            Ok(config) => config,
            Err(kube::Error::Api(ae)) if ae.code == 404 => return Ok(()),
            Err(e) => return Err(e.into()),
        };
        let mut finalizers = config.metadata.finalizers.unwrap_or_default();
        if finalizers.iter().any(|f| f == finalizer) {
            return Ok(());
        }
        finalizers.push(finalizer.to_string());
        let patch = serde_json::json!({ "metadata": { "finalizers": finalizers } });
        api.patch(name, &PatchParams::apply(CONTROLLER_NAME), &Patch::Merge(&patch))
            .await?;
        Ok(())
    }

    async fn remove_finalizer(&self, namespace: &str, name: &str, finalizer: &str) -> Result<()> {
        let api = self.configs(namespace);
        let config = match api.get(name).await {
            Ok(config) => config,
            Err(kube::Error::Api(ae)) if ae.code == 404 => return Ok(()),
            Err(e) => return Err(e.into()),
        };
        let finalizers: Vec<String> = config
            .metadata
            .finalizers
            .unwrap_or_default()
            .into_iter()
            .filter(|f| f != finalizer)
            .collect();
        let patch = serde_json::json!({ "metadata": { "finalizers": finalizers } });
        api.patch(name, &PatchParams::apply(CONTROLLER_NAME), &Patch::Merge(&patch))
            .await?;
        Ok(())
    }
}

/// Real factory building [`GkeClient`] instances
pub struct GkeClientFactory;

#[async_trait]
impl ContainerServiceFactory for GkeClientFactory {
    async fn client(&self, credential_json: &str) -> Result<Arc<dyn ContainerService>> {
        Ok(Arc::new(GkeClient::new(credential_json).await?))
    }
}

/// Shared context for the GKEClusterConfig controller
///
/// Holds the trait objects the phase handlers work through. Everything else
/// (credentials, container API clients, upstream snapshots) is request-scoped
/// and rebuilt on every reconcile.
pub struct Context {
    /// Kubernetes access (status, secrets, finalizers)
    pub kube: Arc<dyn KubeClient>,
    /// Container API client factory
    pub gke: Arc<dyn ContainerServiceFactory>,
    /// Configured secret field holding the credential JSON; `None` means the
    /// default field name
    pub credential_key: Option<String>,
}

impl Context {
    /// Create a context with the real client implementations
    pub fn new(client: Client) -> Self {
        Self {
            kube: Arc::new(KubeClientImpl::new(client)),
            gke: Arc::new(GkeClientFactory),
            credential_key: None,
        }
    }

    /// Override the credential secret field name
    pub fn with_credential_key(mut self, credential_key: Option<String>) -> Self {
        self.credential_key = credential_key;
        self
    }

    /// Create a context with custom client implementations (used in tests)
    pub fn with_clients(
        kube: Arc<dyn KubeClient>,
        gke: Arc<dyn ContainerServiceFactory>,
        credential_key: Option<String>,
    ) -> Self {
        Self {
            kube,
            gke,
            credential_key,
        }
    }
}

/// True when the controller's finalizer is present on the object
pub(crate) fn has_finalizer(config: &GKEClusterConfig) -> bool {
    config
        .metadata
        .finalizers
        .as_ref()
        .is_some_and(|finalizers| finalizers.iter().any(|f| f == FINALIZER))
}

/// Reconcile a GKEClusterConfig
///
/// Deletion is handled first and exclusively: an object with a deletion
/// timestamp never enters the phase machine. For live objects the phase
/// handlers run, and the outcome is recorded on `status.failureMessage`
/// before the result is handed back to the runtime.
pub async fn reconcile(config: Arc<GKEClusterConfig>, ctx: Arc<Context>) -> Result<Action> {
    let name = config.name_any();
    let namespace = config.namespace().unwrap_or_else(|| "default".to_string());
    info!(config = %name, phase = %config.phase(), "reconciling cluster config");

    if config.meta().deletion_timestamp.is_some() {
        return phases::handle_removal(&config, &ctx).await;
    }

    if !has_finalizer(&config) {
        debug!(config = %name, "adding finalizer");
        ctx.kube
            .ensure_finalizer(&namespace, &name, FINALIZER)
            .await?;
        return Ok(Action::requeue(Duration::from_secs(1)));
    }

    let result = dispatch(&config, &ctx).await;
    record_failure(&config, &ctx, &result).await;
    result
}

/// Dispatch to the phase handler for the object's current phase
async fn dispatch(config: &GKEClusterConfig, ctx: &Context) -> Result<Action> {
    match config.phase() {
        ClusterPhase::Unset => phases::handle_create(config, ctx).await,
        ClusterPhase::Creating => phases::handle_wait_for_creation(config, ctx).await,
        ClusterPhase::Active | ClusterPhase::Updating => {
            phases::handle_check_and_update(config, ctx).await
        }
        ClusterPhase::Importing => phases::handle_importing(config, ctx).await,
    }
}

/// Record the dispatch outcome on `status.failureMessage`.
///
/// The message is written only when it differs from the stored value. A
/// non-empty message on an object that entered the pass as `active` demotes
/// it to `updating`, since the failure implies an update is not converging.
/// Write failures are logged, never surfaced.
async fn record_failure(config: &GKEClusterConfig, ctx: &Context, result: &Result<Action>) {
    let message = match result {
        Ok(_) => String::new(),
        Err(e) => e.to_string(),
    };
    if config.failure_message() == message {
        return;
    }

    let name = config.name_any();
    let namespace = config.namespace().unwrap_or_else(|| "default".to_string());

    let write = if !message.is_empty() && config.phase() == ClusterPhase::Active {
        let status = GKEClusterConfigStatus {
            phase: ClusterPhase::Updating,
            failure_message: message,
        };
        ctx.kube.patch_status(&namespace, &name, &status).await
    } else {
        ctx.kube
            .patch_failure_message(&namespace, &name, &message)
            .await
    };

    if let Err(e) = write {
        error!(config = %name, error = %e, "failed to record failure message");
    }
}

/// Error policy for the controller: log and retry after a short delay
pub fn error_policy(config: Arc<GKEClusterConfig>, error: &Error, _ctx: Arc<Context>) -> Action {
    warn!(
        config = %config.name_any(),
        error = %error,
        "reconciliation failed"
    );
    Action::requeue(Duration::from_secs(5))
}
