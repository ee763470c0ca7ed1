//! farmcalc - fertilizer, pesticide and profit calculators
//!
//! Computes locally and keeps a capped calculation history on the remote
//! calculator-results service and on this device.

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use farm_calc_client::cli::{self, Cli};
use farm_calc_client::{AppContext, Config};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "farmcalc=info,farm_calc_client=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    // Load configuration
    dotenvy::dotenv().ok();
    let config = Config::load()?;
    tracing::debug!(environment = %config.environment, "Configuration loaded");

    let args = Cli::parse();
    let json = args.json;
    let ctx = AppContext::from_config(config)?;

    match cli::run(args, &ctx).await {
        Ok(output) => {
            println!("{}", output);
            Ok(())
        }
        Err(err) if json => {
            println!("{}", serde_json::to_string_pretty(&err.detail())?);
            Err(err.into())
        }
        Err(err) => Err(err.into()),
    }
}
