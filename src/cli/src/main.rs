//! CLI wallet for Solana devnet.

use anyhow::Result;
use devnet_wallet::{handle_command, WalletConfig, WalletStore};
use std::path::PathBuf;
use structopt::clap::AppSettings;
use structopt::StructOpt;
use tracing::debug;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// Command line arguments for the CLI wallet.
#[derive(Debug, StructOpt)]
#[structopt(
    name = "devnet-wallet",
    about = "Single-keypair wallet for Solana devnet",
    setting = AppSettings::AllowNegativeNumbers
)]
struct Opt {
    /// Path to the configuration file
    #[structopt(short, long, parse(from_os_str))]
    config: Option<PathBuf>,

    /// Path to the wallet file
    #[structopt(short, long, parse(from_os_str))]
    wallet: Option<PathBuf>,

    /// RPC endpoint to connect to
    #[structopt(short, long)]
    url: Option<String>,

    /// Command to run: grant, balance or transfer
    command: Option<String>,

    /// Grant amount, or transfer recipient address
    arg1: Option<String>,

    /// Transfer amount
    arg2: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    // Parse command line arguments
    let opt = Opt::from_args();

    // Load configuration
    let mut config = match &opt.config {
        Some(path) => WalletConfig::from_file(path)?,
        None => WalletConfig::default(),
    };

    // Override from the command line
    if let Some(url) = opt.url {
        config.rpc_url = url;
    }
    if let Some(wallet) = opt.wallet {
        config.wallet_path = wallet;
    }
    config.validate()?;

    let store = WalletStore::new(&config.wallet_path);
    let ledger = config.rpc_client();

    // Failures are reported by the command itself
    let outcome = handle_command(
        &store,
        &ledger,
        opt.command.as_deref(),
        opt.arg1.as_deref(),
        opt.arg2.as_deref(),
    )
    .await;
    debug!("Finished with {:?}", outcome);

    Ok(())
}
