//! Config Lake client
//!
//! [`ConfigLakeClient`] performs one authenticated `GET` per call and turns
//! the response into a map or a [`ConfigLakeError`]. It holds no mutable
//! state: cloning is cheap and concurrent calls are independent.

use reqwest::Url;
use reqwest::header::{ACCEPT, AUTHORIZATION, HeaderValue};
use serde::de::DeserializeOwned;
use std::time::Instant;
use tracing::Instrument;

use crate::config::{ClientConfig, ClientConfigBuilder};
use crate::endpoint::Endpoint;
use crate::error::{ConfigLakeError, Result};
use crate::response;
use crate::types::{AllDetails, AllDetailsBody, ConfigMap, ConfigsBody, SecretMap, SecretsBody};

/// Client for the Config Lake API
#[derive(Debug, Clone)]
pub struct ConfigLakeClient {
    api_url: Url,
    authorization: HeaderValue,
    http_client: reqwest::Client,
}

impl ConfigLakeClient {
    /// Create a client with default HTTP settings.
    pub fn new<U: Into<String>, T: Into<String>>(api_url: U, token: T) -> Result<Self> {
        Self::from_config(ClientConfig::builder().api_url(api_url).token(token).build()?)
    }

    /// Start building a client configuration
    pub fn builder() -> ClientConfigBuilder {
        ClientConfig::builder()
    }

    /// Create a client from a validated configuration
    pub fn from_config(config: ClientConfig) -> Result<Self> {
        let http_client = config.build_http_client()?;
        let authorization = config.authorization()?;
        Ok(Self {
            api_url: config.api_url,
            authorization,
            http_client,
        })
    }

    /// Base URL requests are sent to
    pub fn api_url(&self) -> &Url {
        &self.api_url
    }

    /// Fetch the plain-text configurations of a project environment.
    pub async fn get_config(&self, project_id: u64, environment: &str) -> Result<ConfigMap> {
        let body: ConfigsBody = self.fetch(Endpoint::Config, project_id, environment).await?;
        Ok(body.into())
    }

    /// Fetch the secrets of a project environment, decrypted by the server.
    pub async fn get_secrets(&self, project_id: u64, environment: &str) -> Result<SecretMap> {
        let body: SecretsBody = self.fetch(Endpoint::Secrets, project_id, environment).await?;
        Ok(body.into())
    }

    /// Fetch configurations and secrets in a single request.
    pub async fn get_all_details(&self, project_id: u64, environment: &str) -> Result<AllDetails> {
        let body: AllDetailsBody = self.fetch(Endpoint::All, project_id, environment).await?;
        Ok(body.into_details(project_id, environment))
    }

    async fn fetch<T: DeserializeOwned>(
        &self,
        endpoint: Endpoint,
        project_id: u64,
        environment: &str,
    ) -> Result<T> {
        let url = endpoint.url(&self.api_url, project_id, environment)?;
        let path = url.path().to_string();

        let span = response::request_span(endpoint, project_id, environment);

        self.execute(url, &path)
            .instrument(span.clone())
            .await
            .inspect_err(|e| span.in_scope(|| response::log_failure(e)))
    }

    async fn execute<T: DeserializeOwned>(&self, url: Url, path: &str) -> Result<T> {
        let started = Instant::now();
        tracing::debug!(path, "sending request");

        let resp = self
            .http_client
            .get(url)
            .header(AUTHORIZATION, self.authorization.clone())
            .header(ACCEPT, HeaderValue::from_static("application/json"))
            .send()
            .await
            .map_err(|e| ConfigLakeError::connection(path, e))?;

        let status = resp.status();
        let text = match resp.text().await {
            Ok(text) => text,
            Err(e) if status.is_success() => return Err(ConfigLakeError::connection(path, e)),
            Err(_) => String::new(),
        };

        response::decode(path, status, text, started)
    }
}
