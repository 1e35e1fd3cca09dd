use anyhow::Context;
use dtab::domain::config::ApiConfig;
use dtab::kernel::config::load_config;
use dtab_logger::Logger;
use dtab_server::Server;

/// Environment variable naming the config file (extension optional).
const CONFIG_ENV: &str = "DTAB_CONFIG";

#[dtab_runtime::main(high_performance)]
async fn main() -> anyhow::Result<()> {
    let path = std::env::var(CONFIG_ENV).unwrap_or_else(|_| "server".to_owned());
    let cfg: ApiConfig = load_config(Some(&path)).context("Critical: Configuration is malformed")?;

    let logger = Logger::builder().name(env!("CARGO_PKG_NAME")).env_filter(cfg.logging.filter.clone());
    let _log = match &cfg.logging.path {
        Some(dir) if cfg.logging.json => logger.path(dir).json().init()?,
        Some(dir) => logger.path(dir).init()?,
        None => logger.init()?,
    };

    Server::builder().config(cfg).build().await?.run().await
}
