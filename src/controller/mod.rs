//! Controller implementation for the GKEClusterConfig CRD
//!
//! The reconciliation loop follows the Kubernetes controller pattern:
//! observe the upstream cluster, diff it against the desired spec, and apply
//! at most one change per pass.

pub mod builders;
pub mod cluster;
pub mod credentials;
pub mod phases;
pub mod planner;
pub mod upstream;
pub mod validation;

pub use cluster::{
    error_policy, reconcile, ContainerServiceFactory, Context, GkeClientFactory, KubeClient,
    KubeClientImpl,
};
pub use planner::PlanOutcome;
