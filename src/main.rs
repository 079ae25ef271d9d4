//! txdesk main entry point

use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::runtime::Runtime;
use txdesk_api::start_server;
use txdesk_config::{Config, ConfigError};
use txdesk_core::{HttpTransport, TransactionBoard};

#[derive(Parser, Debug)]
#[command(name = "txdesk")]
#[command(version = "0.1.0")]
#[command(about = "Review and approve employee transactions from a paginated backend", long_about = None)]
struct Args {
    /// Configuration file path
    #[arg(short, long, default_value = "config.yaml")]
    config: PathBuf,

    /// Print the default configuration and exit
    #[arg(long)]
    print_default_config: bool,
}

fn load_config(path: PathBuf) -> anyhow::Result<(Config, Option<String>)> {
    match Config::load(path) {
        Ok(config) => Ok((config, None)),
        Err(e @ ConfigError::FileNotFound { .. }) => Ok((Config::default(), Some(e.to_string()))),
        Err(e) => match e.hint() {
            Some(hint) => anyhow::bail!("{}\n{}", e, hint),
            None => anyhow::bail!("{}", e),
        },
    }
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    if args.print_default_config {
        print!("{}", Config::generate_default());
        return Ok(());
    }

    let (config, missing) = load_config(args.config)?;

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(config.logging.level.as_str()))
        .init();

    if let Some(reason) = missing {
        log::warn!("{}; using default configuration", reason);
    }
    log::info!("Backend: {}", config.backend.base_url);
    log::info!("Page size: {}", config.pagination.page_size);

    let transport = HttpTransport::new(config.backend.clone());
    let board = Arc::new(TransactionBoard::new(Arc::new(transport), &config));

    let rt = Runtime::new()?;
    rt.block_on(start_server(config, board))
}
