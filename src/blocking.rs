//! Blocking Config Lake client
//!
//! Same operations, errors and logging as the async [`crate::ConfigLakeClient`],
//! but every call blocks the current thread until the response is in. Needs
//! no async runtime, and must not be called from inside one.
//!
//! ```rust,no_run
//! # fn main() -> configlake::Result<()> {
//! let api_url = "https://config.example.com";
//! let configs = configlake::blocking::get_config(api_url, "token", 1, "production")?;
//! println!("{} settings", configs.len());
//! # Ok(())
//! # }
//! ```

use reqwest::Url;
use reqwest::header::{ACCEPT, AUTHORIZATION, HeaderValue};
use serde::de::DeserializeOwned;
use std::time::Instant;

use crate::config::{ClientConfig, ClientConfigBuilder};
use crate::endpoint::Endpoint;
use crate::error::{ConfigLakeError, Result};
use crate::response;
use crate::types::{AllDetails, AllDetailsBody, ConfigMap, ConfigsBody, SecretMap, SecretsBody};

/// Blocking client for the Config Lake API
#[derive(Debug, Clone)]
pub struct ConfigLakeClient {
    api_url: Url,
    authorization: HeaderValue,
    http_client: reqwest::blocking::Client,
}

impl ConfigLakeClient {
    /// Create a client with default HTTP settings.
    pub fn new<U: Into<String>, T: Into<String>>(api_url: U, token: T) -> Result<Self> {
        Self::from_config(ClientConfig::builder().api_url(api_url).token(token).build()?)
    }

    pub fn builder() -> ClientConfigBuilder {
        ClientConfig::builder()
    }

    /// Create a client from a validated configuration.
    ///
    /// A custom async client set with `with_http_client` is not used here;
    /// pass a blocking one with `with_blocking_http_client` instead.
    pub fn from_config(config: ClientConfig) -> Result<Self> {
        let http_client = config.build_blocking_http_client()?;
        let authorization = config.authorization()?;
        Ok(Self {
            api_url: config.api_url,
            authorization,
            http_client,
        })
    }

    pub fn api_url(&self) -> &Url {
        &self.api_url
    }

    /// Fetch the plain-text configurations of a project environment.
    pub fn get_config(&self, project_id: u64, environment: &str) -> Result<ConfigMap> {
        let body: ConfigsBody = self.fetch(Endpoint::Config, project_id, environment)?;
        Ok(body.into())
    }

    /// Fetch the secrets of a project environment, decrypted by the server.
    pub fn get_secrets(&self, project_id: u64, environment: &str) -> Result<SecretMap> {
        let body: SecretsBody = self.fetch(Endpoint::Secrets, project_id, environment)?;
        Ok(body.into())
    }

    /// Fetch configurations and secrets in a single request.
    pub fn get_all_details(&self, project_id: u64, environment: &str) -> Result<AllDetails> {
        let body: AllDetailsBody = self.fetch(Endpoint::All, project_id, environment)?;
        Ok(body.into_details(project_id, environment))
    }

    fn fetch<T: DeserializeOwned>(
        &self,
        endpoint: Endpoint,
        project_id: u64,
        environment: &str,
    ) -> Result<T> {
        let url = endpoint.url(&self.api_url, project_id, environment)?;
        let path = url.path().to_string();

        let span = response::request_span(endpoint, project_id, environment);
        let _entered = span.enter();

        self.execute(url, &path).inspect_err(response::log_failure)
    }

    fn execute<T: DeserializeOwned>(&self, url: Url, path: &str) -> Result<T> {
        let started = Instant::now();
        tracing::debug!(path, "sending request");

        let resp = self
            .http_client
            .get(url)
            .header(AUTHORIZATION, self.authorization.clone())
            .header(ACCEPT, HeaderValue::from_static("application/json"))
            .send()
            .map_err(|e| ConfigLakeError::connection(path, e))?;

        let status = resp.status();
        let text = match resp.text() {
            Ok(text) => text,
            Err(e) if status.is_success() => return Err(ConfigLakeError::connection(path, e)),
            Err(_) => String::new(),
        };

        response::decode(path, status, text, started)
    }
}

/// Fetch the configurations of `project_id`/`environment`, blocking until done.
pub fn get_config(
    api_url: &str,
    token: &str,
    project_id: u64,
    environment: &str,
) -> Result<ConfigMap> {
    ConfigLakeClient::new(api_url, token)?.get_config(project_id, environment)
}

/// Fetch the secrets of `project_id`/`environment`, blocking until done.
pub fn get_secrets(
    api_url: &str,
    token: &str,
    project_id: u64,
    environment: &str,
) -> Result<SecretMap> {
    ConfigLakeClient::new(api_url, token)?.get_secrets(project_id, environment)
}

/// Fetch configurations and secrets together, blocking until done.
pub fn get_all_details(
    api_url: &str,
    token: &str,
    project_id: u64,
    environment: &str,
) -> Result<AllDetails> {
    ConfigLakeClient::new(api_url, token)?.get_all_details(project_id, environment)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use std::time::Duration;

    fn failing_server(path: &str, status: usize, body: &str) -> mockito::ServerGuard {
        let mut server = mockito::Server::new();
        server
            .mock("GET", path)
            .with_status(status)
            .with_body(body)
            .create();
        server
    }

    #[test]
    fn fetches_all_three_endpoints() {
        let mut server = mockito::Server::new();
        let config = server
            .mock("GET", "/api/config/1/production")
            .match_header("authorization", "Bearer tok_sync")
            .with_status(200)
            .with_body(r#"{"configs":{"LOG_LEVEL":"info"}}"#)
            .create();
        let secrets = server
            .mock("GET", "/api/secrets/1/production")
            .match_header("authorization", "Bearer tok_sync")
            .with_status(200)
            .with_body(r#"{"DB_PASSWORD":"hunter2"}"#)
            .create();
        let all = server
            .mock("GET", "/api/all/1/production")
            .match_header("authorization", "Bearer tok_sync")
            .with_status(200)
            .with_body(r#"{"configs":{"A":"1"},"secrets":{"B":"2"}}"#)
            .create();

        let configs = get_config(&server.url(), "tok_sync", 1, "production").unwrap();
        assert_eq!(configs.get("LOG_LEVEL").map(String::as_str), Some("info"));

        let secret_map = get_secrets(&server.url(), "tok_sync", 1, "production").unwrap();
        assert_eq!(secret_map.get("DB_PASSWORD").map(String::as_str), Some("hunter2"));

        let details = get_all_details(&server.url(), "tok_sync", 1, "production").unwrap();
        assert_eq!(details.get("A"), Some("1"));
        assert_eq!(details.get("B"), Some("2"));
        assert_eq!(details.project_id, 1);
        assert_eq!(details.environment, "production");

        config.assert();
        secrets.assert();
        all.assert();
    }

    #[test]
    fn unauthorized_maps_to_authentication_failed() {
        let server = failing_server("/api/config/1/production", 401, "");
        let err = get_config(&server.url(), "bad", 1, "production").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::AuthenticationFailed);
        assert!(err.to_string().starts_with("Authentication failed"));
    }

    #[test]
    fn forbidden_maps_to_access_forbidden() {
        let server = failing_server("/api/secrets/1/production", 403, "");
        let err = get_secrets(&server.url(), "tok", 1, "production").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::AccessForbidden);
    }

    #[test]
    fn not_found_maps_to_resource_not_found() {
        let server = failing_server("/api/all/1/production", 404, "no such project");
        let err = get_all_details(&server.url(), "tok", 1, "production").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ResourceNotFound);
    }

    #[test]
    fn other_status_keeps_code_and_body() {
        let server = failing_server("/api/config/1/production", 503, "maintenance");
        let err = get_config(&server.url(), "tok", 1, "production").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnexpectedServerError);
        assert_eq!(err.status(), Some(503));
        assert_eq!(err.body(), Some("maintenance"));
    }

    #[test]
    fn malformed_success_body_names_the_key() {
        let server = failing_server("/api/config/1/production", 200, r#"{"PORT":8080}"#);
        let err = get_config(&server.url(), "tok", 1, "production").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedResponse);
        assert!(err.to_string().contains("`PORT`"), "got: {err}");
    }

    #[test]
    fn unreachable_host_is_a_connection_error() {
        let port = {
            let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap().port()
        };
        let err =
            get_secrets(&format!("http://127.0.0.1:{port}"), "tok", 1, "dev").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ConnectionError);
        assert_eq!(err.endpoint(), Some("/api/secrets/1/dev"));
    }

    #[test]
    fn timeout_is_a_connection_error() {
        // Accept the connection but never answer.
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();

        let client = ConfigLakeClient::from_config(
            ConfigLakeClient::builder()
                .api_url(format!("http://{addr}"))
                .token("tok")
                .timeout(Some(Duration::from_millis(200)))
                .build()
                .unwrap(),
        )
        .unwrap();
        let err = client.get_config(1, "production").unwrap_err();

        assert_eq!(err.kind(), ErrorKind::ConnectionError);
        assert!(err.is_timeout());
        drop(listener);
    }

    #[test]
    fn invalid_input_fails_before_sending() {
        let client = ConfigLakeClient::new("http://127.0.0.1:9", "tok").unwrap();
        let err = client.get_config(0, "production").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
        let err = get_all_details("not a url", "tok", 1, "dev").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
    }

    #[test]
    #[tracing_test::traced_test]
    fn failures_are_logged_without_token() {
        let server = failing_server("/api/secrets/3/staging", 500, "database unavailable");
        let err = get_secrets(&server.url(), "tok_very_secret", 3, "staging").unwrap_err();

        assert_eq!(err.kind(), ErrorKind::UnexpectedServerError);
        assert!(logs_contain("request failed"));
        assert!(!logs_contain("tok_very_secret"));
    }
}
