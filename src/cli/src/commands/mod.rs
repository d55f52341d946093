//! Commands for the CLI wallet.
//!
//! A command line is `<command> [<arg1>] [<arg2>]`. It is parsed and
//! validated in full before the wallet is loaded, so a usage error never
//! touches the wallet record or the network. Every failure after that point
//! is reported here and turned into [`Outcome::Failed`].

pub mod balance;
pub mod grant;
pub mod transfer;

use crate::errors::WalletError;
use crate::wallet::{Identity, WalletStore};
use colored::Colorize;
use ledger::{sol_to_lamports, LedgerClient, Pubkey};
use thiserror::Error;
use tracing::{error, info, warn};

/// Usage line shown after a usage error.
pub const USAGE: &str =
    "Usage: devnet-wallet grant [amount] | balance | transfer <recipientAddress> <amount>";

/// Amount requested by `grant` when none is given.
pub const DEFAULT_GRANT_AMOUNT: f64 = 1.0;

/// Errors in the command line itself.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum UsageError {
    /// The command is missing or not one of the known commands.
    #[error("Invalid command: {0:?}")]
    UnknownCommand(String),

    /// `transfer` was given without a recipient or an amount.
    #[error("Invalid transfer command. Example: transfer <recipientAddress> <amount>")]
    MissingArguments,

    /// The amount is not a positive number of SOL.
    #[error("Invalid amount: {0:?}")]
    InvalidAmount(String),

    /// The recipient is not a valid address.
    #[error("Invalid recipient address: {0:?}")]
    InvalidAddress(String),
}

/// A validated command.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Request test tokens for the wallet.
    Grant { amount: f64 },
    /// Show the wallet balance.
    Balance,
    /// Send funds to another address.
    Transfer { recipient: Pubkey, amount: f64 },
}

/// How a command ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Done,
    Failed,
}

impl Command {
    /// Parses the command name and its positional arguments.
    pub fn parse(
        command: Option<&str>,
        first: Option<&str>,
        second: Option<&str>,
    ) -> Result<Self, UsageError> {
        match command.map(str::trim) {
            Some("grant") => {
                // `grant <amount>` or the positional `grant <recipient> <amount>`
                let amount = match second.or(first) {
                    Some(text) => parse_amount(text)?,
                    None => DEFAULT_GRANT_AMOUNT,
                };
                Ok(Command::Grant { amount })
            }
            Some("balance") => Ok(Command::Balance),
            Some("transfer") => {
                let (recipient, amount) = match (first, second) {
                    (Some(recipient), Some(amount)) => (recipient, amount),
                    _ => return Err(UsageError::MissingArguments),
                };
                let amount = parse_amount(amount)?;
                let recipient = recipient
                    .parse::<Pubkey>()
                    .map_err(|_| UsageError::InvalidAddress(recipient.to_string()))?;
                Ok(Command::Transfer { recipient, amount })
            }
            other => Err(UsageError::UnknownCommand(other.unwrap_or_default().to_string())),
        }
    }

    /// The name the command is invoked by.
    pub fn name(&self) -> &'static str {
        match self {
            Command::Grant { .. } => "grant",
            Command::Balance => "balance",
            Command::Transfer { .. } => "transfer",
        }
    }
}

fn parse_amount(text: &str) -> Result<f64, UsageError> {
    let amount = text
        .trim()
        .parse::<f64>()
        .map_err(|_| UsageError::InvalidAmount(text.to_string()))?;

    // Anything that does not convert to a whole number of lamports would be
    // rejected by the ledger anyway.
    sol_to_lamports(amount).map_err(|_| UsageError::InvalidAmount(text.to_string()))?;
    Ok(amount)
}

/// Parses and runs one command line, reporting any failure.
pub async fn handle_command<L: LedgerClient + ?Sized>(
    store: &WalletStore,
    ledger: &L,
    command: Option<&str>,
    first: Option<&str>,
    second: Option<&str>,
) -> Outcome {
    match Command::parse(command, first, second) {
        Ok(command) => dispatch(store, ledger, &command).await,
        Err(e) => {
            warn!("Usage error: {}", e);
            eprintln!("{}", e.to_string().red());
            eprintln!("{}", USAGE);
            Outcome::Failed
        }
    }
}

/// Runs a validated command against the wallet in `store`.
pub async fn dispatch<L: LedgerClient + ?Sized>(
    store: &WalletStore,
    ledger: &L,
    command: &Command,
) -> Outcome {
    match run(store, ledger, command).await {
        Ok(()) => {
            info!("Command {} completed", command.name());
            Outcome::Done
        }
        Err(e) => {
            error!("Command {} failed: {}", command.name(), e);
            eprintln!("{} {}", format!("{} failed:", command.name()).red(), e);
            Outcome::Failed
        }
    }
}

async fn run<L: LedgerClient + ?Sized>(
    store: &WalletStore,
    ledger: &L,
    command: &Command,
) -> Result<(), WalletError> {
    let mut identity = store.load_or_generate(ledger)?;

    match command {
        Command::Grant { amount } => {
            grant::run(store, ledger, &mut identity, *amount).await?;
        }
        Command::Balance => {
            balance::run(store, ledger, &mut identity).await?;
        }
        Command::Transfer { recipient, amount } => {
            transfer::run(store, ledger, &mut identity, recipient, *amount).await?;
        }
    }

    Ok(())
}

/// Fetches the current balance and saves the wallet with it.
///
/// Runs after a confirmed ledger operation, so neither step can fail the
/// command. If the balance cannot be fetched the previously known balance
/// is kept; if the record cannot be written the user is told.
async fn refresh_and_save<L: LedgerClient + ?Sized>(
    store: &WalletStore,
    ledger: &L,
    identity: &mut Identity,
) {
    match ledger.balance(&identity.address()).await {
        Ok(balance) => identity.set_balance(balance),
        Err(e) => warn!(
            "Failed to refresh balance, keeping {} SOL: {}",
            identity.last_known_balance(),
            e
        ),
    }

    if let Err(e) = store.save(identity, identity.last_known_balance()) {
        warn!("Failed to update wallet record {}: {}", store.path().display(), e);
        eprintln!(
            "{} {}",
            "Operation succeeded, but the wallet record could not be updated:".yellow(),
            e
        );
    }
}
