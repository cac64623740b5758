//! Cached Settings
//!
//! The client never caches. This example shows a caller-side wrapper that
//! keeps the last fetched `AllDetails` for a fixed time and refreshes it on
//! demand, falling back to the stale copy when the server is unreachable.
//!
//! ```bash
//! export CONFIGLAKE_API_URL="http://localhost:5000"
//! export CONFIGLAKE_TOKEN="your-api-token"
//! cargo run --example cached_settings
//! ```

use std::time::{Duration, Instant};

use configlake::{AllDetails, ConfigLakeClient};
use tokio::sync::Mutex;

struct CachedSettings {
    client: ConfigLakeClient,
    project_id: u64,
    environment: String,
    ttl: Duration,
    cached: Mutex<Option<(Instant, AllDetails)>>,
}

impl CachedSettings {
    fn new(client: ConfigLakeClient, project_id: u64, environment: &str, ttl: Duration) -> Self {
        Self {
            client,
            project_id,
            environment: environment.to_string(),
            ttl,
            cached: Mutex::new(None),
        }
    }

    async fn get(&self) -> configlake::Result<AllDetails> {
        let mut cached = self.cached.lock().await;
        if let Some((fetched_at, details)) = cached.as_ref() {
            if fetched_at.elapsed() < self.ttl {
                return Ok(details.clone());
            }
        }

        match self
            .client
            .get_all_details(self.project_id, &self.environment)
            .await
        {
            Ok(details) => {
                *cached = Some((Instant::now(), details.clone()));
                Ok(details)
            }
            Err(e) if e.is_retryable() => match cached.as_ref() {
                Some((_, stale)) => {
                    tracing::warn!("serving stale settings: {e}");
                    Ok(stale.clone())
                }
                None => Err(e),
            },
            Err(e) => Err(e),
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    let api_url = std::env::var("CONFIGLAKE_API_URL")
        .unwrap_or_else(|_| "http://localhost:5000".to_string());
    let token = std::env::var("CONFIGLAKE_TOKEN")
        .expect("CONFIGLAKE_TOKEN environment variable not set");

    let client = ConfigLakeClient::new(api_url, token)?;
    let settings = CachedSettings::new(client, 1, "production", Duration::from_secs(300));

    let first = settings.get().await?;
    let second = settings.get().await?;
    assert_eq!(first, second);

    match first.get("DATABASE_URL") {
        Some(_) => println!("DATABASE_URL is set"),
        None => println!("DATABASE_URL is missing"),
    }
    println!(
        "{} configs, {} secrets (second read served from cache)",
        first.configs.len(),
        first.secrets.len()
    );

    Ok(())
}
