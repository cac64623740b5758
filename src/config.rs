//! Client configuration.
//!
//! `ClientConfig` holds everything a [`ConfigLakeClient`](crate::ConfigLakeClient)
//! needs: the service base URL, the bearer token and the HTTP settings. It is
//! owned by the caller and passed in explicitly; the crate keeps no global
//! configuration.

use reqwest::Url;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use secrecy::{ExposeSecret, SecretString};
use std::collections::HashMap;
use std::time::Duration;

use crate::defaults;
use crate::error::{ConfigLakeError, Result};

/// Validated client configuration
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the Config Lake service, e.g. `https://config.example.com`.
    pub api_url: Url,
    /// Bearer token sent with every request.
    pub token: SecretString,
    /// Request timeout (connect + send + read body).
    pub timeout: Option<Duration>,
    /// Connection timeout
    pub connect_timeout: Option<Duration>,
    /// User agent
    pub user_agent: String,
    /// Extra headers sent with every request
    pub headers: HashMap<String, String>,
    /// Proxy settings
    pub proxy: Option<String>,
    /// Custom reqwest client (takes precedence over all other HTTP settings).
    pub http_client: Option<reqwest::Client>,
    /// Custom blocking reqwest client, used by [`crate::blocking::ConfigLakeClient`].
    #[cfg(feature = "blocking")]
    pub blocking_http_client: Option<reqwest::blocking::Client>,
}

impl ClientConfig {
    /// Returns a builder for constructing `ClientConfig`
    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder::new()
    }

    /// Build the `Authorization` header value. Marked sensitive so it is
    /// redacted from the HTTP stack's debug output.
    pub(crate) fn authorization(&self) -> Result<HeaderValue> {
        bearer_header(&self.token)
    }

    /// Build the reqwest client described by this configuration.
    pub(crate) fn build_http_client(&self) -> Result<reqwest::Client> {
        if let Some(client) = &self.http_client {
            return Ok(client.clone());
        }

        let mut builder = reqwest::Client::builder().user_agent(self.user_agent.as_str());

        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }
        if let Some(connect_timeout) = self.connect_timeout {
            builder = builder.connect_timeout(connect_timeout);
        }
        if let Some(proxy) = self.build_proxy()? {
            builder = builder.proxy(proxy);
        }
        if !self.headers.is_empty() {
            builder = builder.default_headers(self.default_headers()?);
        }

        builder.build().map_err(|e| {
            ConfigLakeError::ConfigurationError(format!("Failed to build HTTP client: {e}"))
        })
    }

    /// Build the blocking reqwest client described by this configuration.
    #[cfg(feature = "blocking")]
    pub(crate) fn build_blocking_http_client(&self) -> Result<reqwest::blocking::Client> {
        if let Some(client) = &self.blocking_http_client {
            return Ok(client.clone());
        }

        // The blocking builder applies its own 30 s default unless told otherwise.
        let mut builder = reqwest::blocking::Client::builder()
            .user_agent(self.user_agent.as_str())
            .timeout(self.timeout);

        if let Some(connect_timeout) = self.connect_timeout {
            builder = builder.connect_timeout(connect_timeout);
        }
        if let Some(proxy) = self.build_proxy()? {
            builder = builder.proxy(proxy);
        }
        if !self.headers.is_empty() {
            builder = builder.default_headers(self.default_headers()?);
        }

        builder.build().map_err(|e| {
            ConfigLakeError::ConfigurationError(format!("Failed to build HTTP client: {e}"))
        })
    }

    fn build_proxy(&self) -> Result<Option<reqwest::Proxy>> {
        self.proxy
            .as_deref()
            .map(|proxy_url| {
                reqwest::Proxy::all(proxy_url).map_err(|e| {
                    ConfigLakeError::ConfigurationError(format!("Invalid proxy URL: {e}"))
                })
            })
            .transpose()
    }

    fn default_headers(&self) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        for (k, v) in &self.headers {
            let name = HeaderName::from_bytes(k.as_bytes()).map_err(|e| {
                ConfigLakeError::ConfigurationError(format!("Invalid header name '{k}': {e}"))
            })?;
            let value = HeaderValue::from_str(v).map_err(|e| {
                ConfigLakeError::ConfigurationError(format!("Invalid header value for '{k}': {e}"))
            })?;
            headers.insert(name, value);
        }
        Ok(headers)
    }
}

/// Builder for `ClientConfig`
#[derive(Debug, Clone)]
pub struct ClientConfigBuilder {
    api_url: Option<String>,
    token: Option<SecretString>,
    timeout: Option<Duration>,
    connect_timeout: Option<Duration>,
    user_agent: Option<String>,
    headers: HashMap<String, String>,
    proxy: Option<String>,
    http_client: Option<reqwest::Client>,
    #[cfg(feature = "blocking")]
    blocking_http_client: Option<reqwest::blocking::Client>,
}

impl Default for ClientConfigBuilder {
    fn default() -> Self {
        Self {
            api_url: None,
            token: None,
            timeout: Some(defaults::http::REQUEST_TIMEOUT),
            connect_timeout: Some(defaults::http::CONNECT_TIMEOUT),
            user_agent: None,
            headers: HashMap::new(),
            proxy: None,
            http_client: None,
            #[cfg(feature = "blocking")]
            blocking_http_client: None,
        }
    }
}

impl ClientConfigBuilder {
    /// Create a new builder with the default timeouts
    pub fn new() -> Self {
        Self::default()
    }

    /// Base URL of the Config Lake service
    pub fn api_url<S: Into<String>>(mut self, api_url: S) -> Self {
        self.api_url = Some(api_url.into());
        self
    }

    /// Bearer token
    pub fn token<S: Into<String>>(mut self, token: S) -> Self {
        self.token = Some(SecretString::from(token.into()));
        self
    }

    /// Request timeout; `None` disables it.
    pub fn timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Connection timeout; `None` disables it.
    pub fn connect_timeout(mut self, connect_timeout: Option<Duration>) -> Self {
        self.connect_timeout = connect_timeout;
        self
    }

    pub fn user_agent<S: Into<String>>(mut self, user_agent: S) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    pub fn header<K: Into<String>, V: Into<String>>(mut self, key: K, value: V) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    pub fn proxy<S: Into<String>>(mut self, proxy: S) -> Self {
        self.proxy = Some(proxy.into());
        self
    }

    /// Use a preconfigured reqwest client. Timeouts, proxy, user agent and
    /// extra headers set on this builder are then ignored.
    pub fn with_http_client(mut self, client: reqwest::Client) -> Self {
        self.http_client = Some(client);
        self
    }

    /// Blocking counterpart of [`with_http_client`](Self::with_http_client).
    #[cfg(feature = "blocking")]
    pub fn with_blocking_http_client(mut self, client: reqwest::blocking::Client) -> Self {
        self.blocking_http_client = Some(client);
        self
    }

    /// Validate the settings and build the configuration
    pub fn build(self) -> Result<ClientConfig> {
        let raw_url = self
            .api_url
            .ok_or_else(|| ConfigLakeError::InvalidInput("API URL not specified".to_string()))?;
        let api_url = parse_api_url(&raw_url)?;

        let token = self
            .token
            .ok_or_else(|| ConfigLakeError::InvalidInput("API token not specified".to_string()))?;
        if token.expose_secret().trim().is_empty() {
            return Err(ConfigLakeError::InvalidInput(
                "API token must not be empty".to_string(),
            ));
        }
        bearer_header(&token)?;

        Ok(ClientConfig {
            api_url,
            token,
            timeout: self.timeout,
            connect_timeout: self.connect_timeout,
            user_agent: self
                .user_agent
                .unwrap_or_else(|| defaults::http::USER_AGENT.to_string()),
            headers: self.headers,
            proxy: self.proxy,
            http_client: self.http_client,
            #[cfg(feature = "blocking")]
            blocking_http_client: self.blocking_http_client,
        })
    }
}

fn parse_api_url(raw: &str) -> Result<Url> {
    let url = Url::parse(raw.trim())
        .map_err(|e| ConfigLakeError::InvalidInput(format!("Invalid API URL '{raw}': {e}")))?;
    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigLakeError::InvalidInput(format!(
            "API URL must use http or https, got '{}'",
            url.scheme()
        )));
    }
    if url.cannot_be_a_base() || url.host_str().is_none() {
        return Err(ConfigLakeError::InvalidInput(format!(
            "API URL '{raw}' has no host"
        )));
    }
    if url.query().is_some() || url.fragment().is_some() {
        return Err(ConfigLakeError::InvalidInput(format!(
            "API URL '{raw}' must not contain a query or fragment"
        )));
    }
    Ok(url)
}

fn bearer_header(token: &SecretString) -> Result<HeaderValue> {
    let mut value = HeaderValue::from_str(&format!("Bearer {}", token.expose_secret()))
        .map_err(|_| {
            ConfigLakeError::InvalidInput(
                "API token contains characters not allowed in an HTTP header".to_string(),
            )
        })?;
    value.set_sensitive(true);
    Ok(value)
}
