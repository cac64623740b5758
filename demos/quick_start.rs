//! Quick Start
//!
//! Fetches configs, secrets and both together from a Config Lake server.
//!
//! ```bash
//! export CONFIGLAKE_API_URL="http://localhost:5000"
//! export CONFIGLAKE_TOKEN="your-api-token"
//! RUST_LOG=configlake=debug cargo run --example quick_start -- 1 production
//! ```

use configlake::{ConfigLakeClient, ErrorKind};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let api_url = std::env::var("CONFIGLAKE_API_URL")
        .unwrap_or_else(|_| "http://localhost:5000".to_string());
    let token = std::env::var("CONFIGLAKE_TOKEN")
        .expect("CONFIGLAKE_TOKEN environment variable not set");

    let mut args = std::env::args().skip(1);
    let project_id: u64 = args.next().as_deref().unwrap_or("1").parse()?;
    let environment = args.next().unwrap_or_else(|| "development".to_string());

    println!("Config Lake client v{}", configlake::VERSION);
    println!("Project {project_id} / {environment} at {api_url}\n");

    let client = ConfigLakeClient::new(api_url, token)?;

    match client.get_config(project_id, &environment).await {
        Ok(configs) => {
            println!("Configs ({}):", configs.len());
            let mut keys: Vec<_> = configs.keys().collect();
            keys.sort();
            for key in keys {
                println!("  {key} = {}", configs[key]);
            }
        }
        Err(e) if e.kind() == ErrorKind::ResourceNotFound => {
            println!("Project or environment does not exist: {e}");
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    }

    let secrets = client.get_secrets(project_id, &environment).await?;
    println!("\nSecrets ({}):", secrets.len());
    let mut keys: Vec<_> = secrets.keys().collect();
    keys.sort();
    for key in keys {
        println!("  {key} = ********");
    }

    let all = client.get_all_details(project_id, &environment).await?;
    println!(
        "\nAll details: {} configs + {} secrets for project {} ({})",
        all.configs.len(),
        all.secrets.len(),
        all.project_id,
        all.environment
    );

    Ok(())
}
