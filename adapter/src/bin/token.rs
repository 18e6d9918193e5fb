//! wxhook Token - fetch a server-side access token once and print it.
//!
//! Reads `WECHAT_APP_ID` and `WECHAT_APP_SECRET` from the environment. The
//! token goes to stdout so it can be piped; logs go to stderr.

use anyhow::{Context, Result};
use tracing::info;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use wxhook::{ApiClient, Config};

#[tokio::main]
async fn main() -> Result<()> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().json().flatten_event(true).with_writer(std::io::stderr))
        .init();

    let config = Config::from_env();
    let credentials = config
        .credentials()
        .context("WECHAT_APP_ID and WECHAT_APP_SECRET must both be set")?;

    let client = ApiClient::from_config(&config).context("Failed to build API client")?;
    info!(api_base_url = %client.base_url(), app_id = %credentials.app_id, "token_fetch_starting");

    let token = client
        .get_access_token(&credentials)
        .await
        .context("Failed to fetch access token")?;

    println!("{}", token.access_token);

    Ok(())
}
