use std::path::PathBuf;

use clap::Parser;
use storefront_checkout::driver;
use storefront_checkout::shared::LoggingUtils;
use storefront_checkout::AppConfig;
use tracing::{error, info};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Order file (JSON) with the product id, quantity, card and delivery details
    #[arg(long)]
    order: PathBuf,

    /// Configuration file. Defaults to ./Checkout.{toml,yaml,json} when present
    #[arg(long)]
    config: Option<PathBuf>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();

    // Load configuration
    let config = match AppConfig::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    // Initialize logging
    if let Err(e) = LoggingUtils::initialize(&config.logging.level, &config.logging.format) {
        eprintln!("Failed to initialize logging: {}", e);
        std::process::exit(1);
    }

    info!("Configuration loaded successfully");

    let outcome = driver::run(&cli.order, &config).await;
    if let Err(e) = &outcome {
        error!("Checkout failed: {:#}", e);
        eprintln!("{:#}", e);
    }

    std::process::exit(driver::exit_code(&outcome));
}
