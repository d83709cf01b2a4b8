use anyhow::Result;
use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use navigator::cli::{self, CliArgs};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let args = CliArgs::parse();
    init_logging(&args.log_level);

    info!("starting navigator v{}", env!("CARGO_PKG_VERSION"));
    match cli::run(args).await {
        Ok(()) => {
            info!("run completed");
            Ok(())
        }
        Err(err) => {
            error!("run failed: {err:#}");
            Err(err)
        }
    }
}

fn init_logging(directive: &str) {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(directive)),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}
