use anyhow::Context;
use sleeper_tiers::config::Config;
use sleeper_tiers::logging::setup_logging;
use sleeper_tiers::proxy;
use std::net::SocketAddr;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env().context("loading configuration")?;
    let _log_guard = setup_logging(&config.log_dir, true).context("setting up logging")?;

    let addr = SocketAddr::from(([127, 0, 0, 1], config.proxy_port));
    proxy::serve(addr).await;
    Ok(())
}
