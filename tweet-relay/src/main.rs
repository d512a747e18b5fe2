use anyhow::Context;
use clap::Parser;
use tracing::{error, info};
use tweet_relay::{Cli, RelayPipeline};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let max_level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt().with_max_level(max_level).init();

    let config = cli.to_config();
    if let Err(e) = config.validate() {
        error!("{}", e);
        return Err(e).context("invalid configuration");
    }

    info!("Starting tweet relay for @{}", config.handle);
    info!("State file: {}", config.state_file.display());

    let mut pipeline = RelayPipeline::from_config(&config).context("failed to set up relay")?;

    if let Some(count) = cli.test_latest {
        info!("Test mode: sending the latest {} post(s)", count);
        let sent = pipeline.send_latest(count).await;
        info!("Done, sent {}/{}", sent, count);
        return Ok(());
    }

    if cli.once {
        let report = pipeline.tick().await;
        info!("Cycle finished: {:?}", report.outcome);
        return Ok(());
    }

    info!("Check interval: {} seconds", config.interval.as_secs());
    pipeline.run_forever(config.interval).await;
    Ok(())
}
