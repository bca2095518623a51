//! GKE container API REST client
//!
//! Native REST implementation against `container.googleapis.com/v1` using
//! reqwest with rustls. Authentication exchanges the service-account JSON for
//! a `cloud-platform`-scoped access token via the OAuth2 JWT-bearer grant;
//! the token lives for the lifetime of the client, and the controller builds
//! one client per reconcile.

use std::time::{SystemTime, UNIX_EPOCH};

use async_trait::async_trait;
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::requests::{
    CreateClusterRequest, SetNetworkPolicyRequest, SetNodePoolAutoscalingRequest,
    SetNodePoolSizeRequest, UpdateClusterRequest, UpdateNodePoolRequest,
};
use super::responses::{
    Cluster, GoogleErrorResponse, ListClustersResponse, Operation, TokenResponse,
};
use super::ContainerService;
use crate::{Error, Result};

const DEFAULT_BASE_URL: &str = "https://container.googleapis.com";
const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";
const CLOUD_PLATFORM_SCOPE: &str = "https://www.googleapis.com/auth/cloud-platform";
const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";
const TOKEN_LIFETIME_SECS: u64 = 3600;

/// Service-account key fields consumed from the credential JSON
#[derive(Debug, Deserialize)]
struct ServiceAccountKey {
    client_email: String,
    private_key: String,
    #[serde(default = "default_token_uri")]
    token_uri: String,
}

fn default_token_uri() -> String {
    DEFAULT_TOKEN_URI.to_string()
}

#[derive(Debug, Serialize)]
struct TokenClaims<'a> {
    iss: &'a str,
    scope: &'a str,
    aud: &'a str,
    iat: u64,
    exp: u64,
}

/// REST client for the GKE container API
pub struct GkeClient {
    http: reqwest::Client,
    base_url: String,
    token: String,
}

impl std::fmt::Debug for GkeClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GkeClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl GkeClient {
    /// Create an authenticated client from service-account credential JSON
    pub async fn new(credential_json: &str) -> Result<Self> {
        Self::with_base_url(credential_json, DEFAULT_BASE_URL).await
    }

    /// Create an authenticated client against a custom endpoint
    pub async fn with_base_url(credential_json: &str, base_url: &str) -> Result<Self> {
        let key: ServiceAccountKey = serde_json::from_str(credential_json)
            .map_err(|e| Error::credential_malformed(format!("service account JSON: {e}")))?;

        let http = reqwest::Client::builder()
            .build()
            .map_err(|e| Error::upstream(format!("failed to build HTTP client: {e}")))?;

        let token = fetch_access_token(&http, &key).await?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            token,
        })
    }

    async fn send<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<serde_json::Value>,
    ) -> Result<T> {
        let url = format!("{}/v1/{}", self.base_url, path);
        debug!(method = %method, url = %url, "gke api request");

        let mut request = self
            .http
            .request(method, &url)
            .bearer_auth(&self.token)
            .header("Content-Type", "application/json");
        if let Some(body) = body {
            request = request.json(&body);
        }

        let response = request
            .send()
            .await
            .map_err(|e| Error::upstream(format!("request to {url} failed: {e}")))?;

        let status = response.status();
        if status.is_success() {
            response
                .json()
                .await
                .map_err(|e| Error::serialization(format!("decoding {url} response: {e}")))
        } else {
            let text = response.text().await.unwrap_or_default();
            Err(decode_error(status, &text))
        }
    }

    fn body<B: Serialize>(request: &B) -> Result<serde_json::Value> {
        serde_json::to_value(request).map_err(|e| Error::serialization(e.to_string()))
    }
}

/// Turn a non-2xx response into an [`Error::Upstream`] whose message keeps
/// the upstream status text, so substring classification (notFound, busy)
/// keeps working downstream.
fn decode_error(status: StatusCode, text: &str) -> Error {
    match serde_json::from_str::<GoogleErrorResponse>(text) {
        Ok(envelope) if !envelope.error.message.is_empty() => Error::upstream(format!(
            "googleapi error {}: {} ({})",
            envelope.error.code, envelope.error.message, envelope.error.status
        )),
        _ => Error::upstream(format!("HTTP {}: {}", status.as_u16(), text)),
    }
}

/// Exchange a signed JWT assertion for an access token
async fn fetch_access_token(http: &reqwest::Client, key: &ServiceAccountKey) -> Result<String> {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_err(|e| Error::upstream(format!("system clock before epoch: {e}")))?
        .as_secs();

    let claims = TokenClaims {
        iss: &key.client_email,
        scope: CLOUD_PLATFORM_SCOPE,
        aud: &key.token_uri,
        iat: now,
        exp: now + TOKEN_LIFETIME_SECS,
    };

    let encoding_key = EncodingKey::from_rsa_pem(key.private_key.as_bytes())
        .map_err(|e| Error::credential_malformed(format!("service account private key: {e}")))?;
    let assertion = jsonwebtoken::encode(&Header::new(Algorithm::RS256), &claims, &encoding_key)
        .map_err(|e| Error::credential_malformed(format!("signing token assertion: {e}")))?;

    let response = http
        .post(&key.token_uri)
        .form(&[("grant_type", JWT_BEARER_GRANT), ("assertion", &assertion)])
        .send()
        .await
        .map_err(|e| Error::upstream(format!("token exchange request failed: {e}")))?;

    let status = response.status();
    if !status.is_success() {
        let text = response.text().await.unwrap_or_default();
        return Err(Error::credential_malformed(format!(
            "token exchange rejected (HTTP {}): {}",
            status.as_u16(),
            text
        )));
    }

    let token: TokenResponse = response
        .json()
        .await
        .map_err(|e| Error::serialization(format!("decoding token response: {e}")))?;

    debug!("obtained cloud-platform access token");
    Ok(token.access_token)
}

#[async_trait]
impl ContainerService for GkeClient {
    async fn create_cluster(
        &self,
        parent: &str,
        request: &CreateClusterRequest,
    ) -> Result<Operation> {
        self.send(
            Method::POST,
            &format!("{parent}/clusters"),
            Some(Self::body(request)?),
        )
        .await
    }

    async fn get_cluster(&self, name: &str) -> Result<Cluster> {
        self.send(Method::GET, name, None).await
    }

    async fn list_clusters(&self, parent: &str) -> Result<ListClustersResponse> {
        self.send(Method::GET, &format!("{parent}/clusters"), None)
            .await
    }

    async fn update_cluster(
        &self,
        name: &str,
        request: &UpdateClusterRequest,
    ) -> Result<Operation> {
        self.send(Method::PUT, name, Some(Self::body(request)?))
            .await
    }

    async fn set_network_policy(
        &self,
        name: &str,
        request: &SetNetworkPolicyRequest,
    ) -> Result<Operation> {
        self.send(
            Method::POST,
            &format!("{name}:setNetworkPolicy"),
            Some(Self::body(request)?),
        )
        .await
    }

    async fn update_node_pool(
        &self,
        name: &str,
        request: &UpdateNodePoolRequest,
    ) -> Result<Operation> {
        self.send(Method::PUT, name, Some(Self::body(request)?))
            .await
    }

    async fn set_node_pool_size(
        &self,
        name: &str,
        request: &SetNodePoolSizeRequest,
    ) -> Result<Operation> {
        self.send(
            Method::POST,
            &format!("{name}:setSize"),
            Some(Self::body(request)?),
        )
        .await
    }

    async fn set_node_pool_autoscaling(
        &self,
        name: &str,
        request: &SetNodePoolAutoscalingRequest,
    ) -> Result<Operation> {
        self.send(
            Method::POST,
            &format!("{name}:setAutoscaling"),
            Some(Self::body(request)?),
        )
        .await
    }

    async fn delete_cluster(&self, name: &str) -> Result<Operation> {
        self.send(Method::DELETE, name, None).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn malformed_credential_json_is_rejected() {
        let result: std::result::Result<ServiceAccountKey, _> =
            serde_json::from_str("{\"client_email\": 42}");
        assert!(result.is_err());
    }

    #[test]
    fn token_uri_defaults_to_google_oauth_endpoint() {
        let key: ServiceAccountKey = serde_json::from_str(
            r#"{"client_email":"sa@p.iam.gserviceaccount.com","private_key":"pem"}"#,
        )
        .unwrap();
        assert_eq!(key.token_uri, DEFAULT_TOKEN_URI);
    }

    #[test]
    fn decode_error_keeps_upstream_status_text() {
        let err = decode_error(
            StatusCode::NOT_FOUND,
            r#"{"error":{"code":404,"message":"Not found: cluster","status":"NOT_FOUND"}}"#,
        );
        assert!(err.is_not_found());
        assert!(err.to_string().contains("Not found: cluster"));
    }

    #[test]
    fn decode_error_falls_back_to_raw_text() {
        let err = decode_error(StatusCode::BAD_GATEWAY, "upstream hiccup");
        assert!(err.to_string().contains("HTTP 502"));
        assert!(err.to_string().contains("upstream hiccup"));
    }

    #[test]
    fn transient_busy_classification_survives_the_envelope() {
        let err = decode_error(
            StatusCode::BAD_REQUEST,
            r#"{"error":{"code":400,"message":"Cluster is running incompatible operation ... Please wait and try again once it is done.","status":"FAILED_PRECONDITION"}}"#,
        );
        assert!(err.is_transient_busy());
    }
}
