use clap::Parser;
use eyre::WrapErr;
use livedns_ddns::api::LiveDnsClient;
use livedns_ddns::config::{self, Args};
use livedns_ddns::logging::Logger;
use livedns_ddns::{reconcile, resolver};
use log::{LevelFilter, info};

#[tokio::main]
async fn main() -> eyre::Result<()> {
    let args = Args::parse();

    let filter = if args.verbose { LevelFilter::Debug } else { LevelFilter::Info };
    Logger::new(filter).init().wrap_err("failed to install logger")?;

    let records = config::load_records(&args.config_file).await?;
    if records.is_empty() {
        info!("no records configured, nothing to do");
        return Ok(());
    }

    // One resolved address per run, applied uniformly to every record below.
    let echo_client = reqwest::Client::builder()
        .build()
        .wrap_err("failed to build HTTP client")?;
    let ip = resolver::resolve(&echo_client, resolver::ECHO_ENDPOINTS)
        .await
        .wrap_err("could not resolve the public IP address")?;
    info!("public address is {ip}");

    let client = LiveDnsClient::new().wrap_err("failed to build HTTP client")?;
    reconcile::reconcile(&client, &ip, &records).await;

    Ok(())
}
