//! Cloud credential resolution
//!
//! `spec.credentialContent` names a secret as `namespace:id`. The secret
//! carries service-account JSON in an opaque byte field; two field names are
//! in circulation, so the primary name is configurable and the observed
//! synonym is always accepted as a fallback.

use std::sync::Arc;

use crate::crd::GKEClusterConfig;
use crate::gke::ContainerService;
use crate::{Error, Result};

use super::cluster::Context;

/// Default name of the secret field holding the service-account JSON
pub const DEFAULT_CREDENTIAL_KEY: &str = "googlecredentialConfig-authEncodedJson";

/// Observed synonym for the credential field, accepted as a fallback
pub const FALLBACK_CREDENTIAL_KEY: &str = "gkeCredentialConfig-data";

/// Split a credential reference on the first `:` into `(namespace, id)`
pub fn parse_credential(content: &str) -> (&str, &str) {
    content.split_once(':').unwrap_or(("", content))
}

/// Read the service-account JSON the config points at
pub async fn resolve_credential(config: &GKEClusterConfig, ctx: &Context) -> Result<String> {
    let (namespace, id) = parse_credential(&config.spec.credential_content);

    let secret = ctx
        .kube
        .get_secret(namespace, id)
        .await?
        .ok_or_else(|| {
            Error::credential_missing(format!(
                "cloud credential secret [{id}] not found in namespace [{namespace}]"
            ))
        })?;

    let key = ctx.credential_key.as_deref().unwrap_or(DEFAULT_CREDENTIAL_KEY);
    let data = secret
        .data
        .as_ref()
        .and_then(|data| data.get(key).or_else(|| data.get(FALLBACK_CREDENTIAL_KEY)))
        .ok_or_else(|| {
            Error::credential_missing(format!(
                "could not read cloud credential secret [{id}] from namespace [{namespace}]: \
                 field [{key}] is missing"
            ))
        })?;

    String::from_utf8(data.0.clone()).map_err(|_| {
        Error::credential_malformed(format!(
            "cloud credential secret [{id}] in namespace [{namespace}] is not valid UTF-8"
        ))
    })
}

/// Resolve the credential and build an authenticated container API client
pub async fn container_service(
    config: &GKEClusterConfig,
    ctx: &Context,
) -> Result<Arc<dyn ContainerService>> {
    let credential = resolve_credential(config, ctx).await?;
    ctx.gke.client(&credential).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::cluster::{Context, MockContainerServiceFactory, MockKubeClient};
    use crate::crd::GKEClusterConfigSpec;
    use k8s_openapi::api::core::v1::Secret;
    use k8s_openapi::ByteString;
    use std::collections::BTreeMap;

    fn secret_with(key: &str, value: &[u8]) -> Secret {
        let mut data = BTreeMap::new();
        data.insert(key.to_string(), ByteString(value.to_vec()));
        Secret {
            data: Some(data),
            ..Default::default()
        }
    }

    fn config() -> GKEClusterConfig {
        GKEClusterConfig::new(
            "test-config",
            GKEClusterConfigSpec {
                credential_content: "cattle-global-data:cc-abc123".to_string(),
                ..Default::default()
            },
        )
    }

    fn context_with_kube(kube: MockKubeClient) -> Context {
        Context::with_clients(
            Arc::new(kube),
            Arc::new(MockContainerServiceFactory::new()),
            None,
        )
    }

    #[test]
    fn credential_reference_splits_on_first_colon() {
        assert_eq!(
            parse_credential("cattle-global-data:cc-abc123"),
            ("cattle-global-data", "cc-abc123")
        );
        assert_eq!(parse_credential("ns:id:with:colons"), ("ns", "id:with:colons"));
        assert_eq!(parse_credential("no-colon"), ("", "no-colon"));
    }

    #[tokio::test]
    async fn reads_the_primary_field() {
        let mut kube = MockKubeClient::new();
        kube.expect_get_secret()
            .withf(|ns, id| ns == "cattle-global-data" && id == "cc-abc123")
            .returning(|_, _| Ok(Some(secret_with(DEFAULT_CREDENTIAL_KEY, b"{\"k\":1}"))));

        let credential = resolve_credential(&config(), &context_with_kube(kube))
            .await
            .unwrap();
        assert_eq!(credential, "{\"k\":1}");
    }

    #[tokio::test]
    async fn falls_back_to_the_synonym_field() {
        let mut kube = MockKubeClient::new();
        kube.expect_get_secret()
            .returning(|_, _| Ok(Some(secret_with(FALLBACK_CREDENTIAL_KEY, b"{}"))));

        let credential = resolve_credential(&config(), &context_with_kube(kube))
            .await
            .unwrap();
        assert_eq!(credential, "{}");
    }

    #[tokio::test]
    async fn configured_key_overrides_the_default() {
        let mut kube = MockKubeClient::new();
        kube.expect_get_secret()
            .returning(|_, _| Ok(Some(secret_with("customKey", b"{}"))));
        let ctx = Context::with_clients(
            Arc::new(kube),
            Arc::new(MockContainerServiceFactory::new()),
            Some("customKey".to_string()),
        );

        assert!(resolve_credential(&config(), &ctx).await.is_ok());
    }

    #[tokio::test]
    async fn missing_secret_is_credential_missing() {
        let mut kube = MockKubeClient::new();
        kube.expect_get_secret().returning(|_, _| Ok(None));

        let err = resolve_credential(&config(), &context_with_kube(kube))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::CredentialMissing(_)));
        assert!(err.to_string().contains("cc-abc123"));
    }

    #[tokio::test]
    async fn missing_field_is_credential_missing() {
        let mut kube = MockKubeClient::new();
        kube.expect_get_secret()
            .returning(|_, _| Ok(Some(secret_with("unrelated", b"{}"))));

        let err = resolve_credential(&config(), &context_with_kube(kube))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::CredentialMissing(_)));
        assert!(err.to_string().contains(DEFAULT_CREDENTIAL_KEY));
    }
}
