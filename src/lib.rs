//! configlake
//!
//! Rust client for Config Lake: fetch the configurations and secrets of a
//! project environment over HTTP with a bearer token.
//!
//! Three one-shot functions mirror the other Config Lake clients:
//!
//! ```rust,no_run
//! # async fn example() -> configlake::Result<()> {
//! let api_url = "https://config.example.com";
//! let token = "your-api-token";
//!
//! let configs = configlake::get_config(api_url, token, 1, "production").await?;
//! let secrets = configlake::get_secrets(api_url, token, 1, "production").await?;
//! let all = configlake::get_all_details(api_url, token, 1, "production").await?;
//!
//! println!("{} configs, {} secrets", configs.len(), secrets.len());
//! println!("project {} / {}", all.project_id, all.environment);
//! # Ok(())
//! # }
//! ```
//!
//! For repeated calls, build a [`ConfigLakeClient`] once and reuse it:
//!
//! ```rust,no_run
//! use std::time::Duration;
//! use configlake::ConfigLakeClient;
//!
//! # async fn example() -> configlake::Result<()> {
//! let config = ConfigLakeClient::builder()
//!     .api_url("https://config.example.com")
//!     .token("your-api-token")
//!     .timeout(Some(Duration::from_secs(5)))
//!     .build()?;
//! let client = ConfigLakeClient::from_config(config)?;
//!
//! let db_url = client
//!     .get_secrets(1, "production")
//!     .await?
//!     .remove("DATABASE_URL");
//! # Ok(())
//! # }
//! ```
//!
//! Programs without an async runtime use the [`blocking`] module (the
//! default `blocking` feature), which offers the same functions and client
//! as plain synchronous calls:
//!
//! ```rust,no_run
//! # fn example() -> configlake::Result<()> {
//! let api_url = "https://config.example.com";
//! let configs = configlake::blocking::get_config(api_url, "token", 1, "production")?;
//! # Ok(())
//! # }
//! ```
//!
//! The client never retries, caches or persists anything; each call is one
//! request bounded by the configured timeout (see [`defaults::http`]).
#![deny(unsafe_code)]

#[cfg(feature = "blocking")]
pub mod blocking;
pub mod client;
pub mod config;
pub mod defaults;
pub mod endpoint;
pub mod error;
mod response;
pub mod types;

pub use client::ConfigLakeClient;
pub use config::{ClientConfig, ClientConfigBuilder};
pub use endpoint::Endpoint;
pub use error::{ConfigLakeError, ErrorKind, Result};
pub use types::{AllDetails, ConfigMap, SecretMap};

/// Crate version, matches Cargo.toml version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Fetch the plain-text configurations of `environment` in `project_id`.
pub async fn get_config(
    api_url: &str,
    token: &str,
    project_id: u64,
    environment: &str,
) -> Result<ConfigMap> {
    ConfigLakeClient::new(api_url, token)?
        .get_config(project_id, environment)
        .await
}

/// Fetch the secrets of `environment` in `project_id`, decrypted by the server.
pub async fn get_secrets(
    api_url: &str,
    token: &str,
    project_id: u64,
    environment: &str,
) -> Result<SecretMap> {
    ConfigLakeClient::new(api_url, token)?
        .get_secrets(project_id, environment)
        .await
}

/// Fetch configurations and secrets of `environment` in `project_id` in one request.
pub async fn get_all_details(
    api_url: &str,
    token: &str,
    project_id: u64,
    environment: &str,
) -> Result<AllDetails> {
    ConfigLakeClient::new(api_url, token)?
        .get_all_details(project_id, environment)
        .await
}
