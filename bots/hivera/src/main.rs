use anyhow::Result;
use clap::Parser;
use core_logic::{setup_logger, AccountManager, ProxyManager, Worker, WorkerRunner};
use dotenv::dotenv;
use hivera_bot::config::HiveraConfig;
use hivera_bot::miner::HiveraMiner;
use std::path::Path;
use std::sync::Arc;
use tracing::{error, info, warn};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(short, long, default_value = "bots/hivera/config.toml")]
    config: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let _log_guard = setup_logger();
    dotenv().ok();

    let args = Args::parse();
    info!("Loading config from: {}", args.config);

    let config = match HiveraConfig::load(&args.config) {
        Ok(c) => c,
        Err(e) => {
            error!("Failed to load config: {}", e);
            return Ok(());
        }
    };

    info!("Configuration loaded for {}", config.base_url);

    let accounts = AccountManager::load_accounts(Path::new(&config.users_file));
    if accounts.is_empty() {
        error!("No account data found in {}. Exiting.", config.users_file);
        return Ok(());
    }

    let proxies = ProxyManager::load_proxies(Path::new(&config.proxies_file));
    if proxies.is_empty() {
        warn!("No proxies loaded. Proceeding without proxies.");
    }

    // One worker per account; proxies rotate by account index. A broken
    // proxy binding skips only that account.
    let mut workers: Vec<Arc<dyn Worker>> = Vec::new();
    for (i, account) in accounts.iter().enumerate() {
        let proxy = ProxyManager::assign(&proxies, i);
        match HiveraMiner::from_config(&config, account.clone(), proxy) {
            Ok(miner) => workers.push(Arc::new(miner)),
            Err(e) => error!("Failed to build worker for account #{}: {:#}", i + 1, e),
        }
    }

    if workers.is_empty() {
        error!("No workers could be constructed. Exiting.");
        return Ok(());
    }

    let token = WorkerRunner::shutdown_token();

    loop {
        if token.is_cancelled() {
            break;
        }

        info!("Starting processing for all accounts...");
        WorkerRunner::run_cycle(&workers, config.worker_amount, &token).await;
        info!("All accounts processed. Restarting the loop...");
    }

    info!("Shutdown complete.");
    Ok(())
}
