//! Error types for the GKE operator

use thiserror::Error;

/// Substring GKE returns while another cluster-scoped operation is running.
///
/// Only the deletion path retries on this; everywhere else the error surfaces
/// as a failure message and the re-enqueue loop naturally retries.
pub const TRANSIENT_BUSY_MARKER: &str = "Please wait and try again once it is done";

/// Main error type for operator operations
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// Kubernetes API error
    #[error("kubernetes error: {0}")]
    Kube(#[from] kube::Error),

    /// Spec rejected by validation
    #[error("validation error: {0}")]
    Validation(String),

    /// Cloud credential secret or its data field is absent
    #[error("credential missing: {0}")]
    CredentialMissing(String),

    /// Cloud credential secret content could not be parsed
    #[error("credential malformed: {0}")]
    CredentialMalformed(String),

    /// Any error returned by the GKE container API (connection, quota, auth)
    #[error("gke api error: {0}")]
    Upstream(String),

    /// The upstream cluster reached ERROR while waiting for creation
    #[error("creation failed for cluster {cluster}")]
    CreationFailed {
        /// Name of the cluster that failed to create
        cluster: String,
    },

    /// Serialization/deserialization error
    #[error("serialization error: {0}")]
    Serialization(String),
}

impl Error {
    /// Create a validation error with the given message
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Create a missing-credential error with the given message
    pub fn credential_missing(msg: impl Into<String>) -> Self {
        Self::CredentialMissing(msg.into())
    }

    /// Create a malformed-credential error with the given message
    pub fn credential_malformed(msg: impl Into<String>) -> Self {
        Self::CredentialMalformed(msg.into())
    }

    /// Create an upstream API error with the given message
    pub fn upstream(msg: impl Into<String>) -> Self {
        Self::Upstream(msg.into())
    }

    /// Create a serialization error with the given message
    pub fn serialization(msg: impl Into<String>) -> Self {
        Self::Serialization(msg.into())
    }

    /// True when GKE rejected the call because another operation on the
    /// cluster is still running
    pub fn is_transient_busy(&self) -> bool {
        matches!(self, Self::Upstream(msg) if msg.contains(TRANSIENT_BUSY_MARKER))
    }

    /// True when the upstream resource does not exist
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::Upstream(msg)
                if msg.contains("notFound") || msg.contains("NOT_FOUND") || msg.contains("404")
        )
    }
}
