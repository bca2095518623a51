//! GKE operator - Kubernetes operator for Google Kubernetes Engine clusters
//!
//! This operator reconciles `GKEClusterConfig` custom resources against the
//! GKE container API. Given a declarative cluster specification (project,
//! location, version, networking, node pools, addons, credentials) it creates,
//! imports, observes, and incrementally updates the remote cluster until its
//! state matches the specification, and tears the cluster down on deletion.
//!
//! # Architecture
//!
//! The controller is a phase machine driven by `status.phase`:
//!
//! - `""` (unset) - submit the create request (or flip to importing)
//! - `creating` - poll until the upstream cluster is running
//! - `active` / `updating` - diff desired against upstream and submit at most
//!   one mutation per reconcile
//! - `importing` - adopt the pre-existing cluster and promote to active
//!
//! Upstream mutations are long-running and serialized per cluster, so the
//! update planner submits the single next allowed change and requeues until
//! the desired spec and the upstream cluster converge.
//!
//! # Modules
//!
//! - [`crd`] - the GKEClusterConfig custom resource definition
//! - [`gke`] - the container API surface: client trait, REST client, wire types
//! - [`controller`] - reconciliation logic: phases, validation, update planner
//! - [`retry`] - bounded retry for deletion against a busy upstream
//! - [`error`] - error types for the operator

#![deny(missing_docs)]

use std::time::Duration;

pub mod controller;
pub mod crd;
pub mod error;
pub mod gke;
pub mod retry;

pub use error::Error;

/// Result type alias using our custom Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Field-manager name used for status patches
pub const CONTROLLER_NAME: &str = "gke-operator";

/// Finalizer owned by this controller; guards remote-cluster cleanup
pub const FINALIZER: &str = "gke.cattle.io/gke-operator-cleanup";

/// Delay before polling the upstream cluster again while it is busy
/// (creating, reconciling, or waiting on an addon update)
pub const UPSTREAM_WAIT: Duration = Duration::from_secs(30);

/// Maximum number of `Clusters.Delete` attempts during removal
pub const DELETE_RETRY_ATTEMPTS: u32 = 11;
