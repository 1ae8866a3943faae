//! Command-line host for the offline MWC wallet
//!
//! Opens the wallet in a data directory, runs one command against it and
//! prints the result. State is saved by the wallet itself.

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use mwc_core::{
    format_amount, parse_amount, InitWalletStatus, ListenState, Wallet, WalletContact,
};
use mwc_params::NetworkType;
use mwc_storage::wallet_data_dir;
use mwc_wallet_service::MockWallet;
use std::path::PathBuf;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "mwc-wallet")]
#[command(about = "MWC wallet command-line host", long_about = None)]
struct Cli {
    /// Wallet data directory (defaults to the per-user wallet directory)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Network the wallet runs on
    #[arg(long, global = true, default_value = "floonet")]
    network: NetworkType,

    /// Wallet password
    #[arg(long, global = true, default_value = "")]
    password: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Create a new wallet and print its recovery phrase
    Init,

    /// Restore a wallet from its recovery phrase
    Recover {
        /// Recovery phrase words
        #[arg(required = true, num_args = 1..)]
        words: Vec<String>,
    },

    /// List accounts
    Accounts,

    /// Create an account
    CreateAccount {
        /// Account name
        name: String,
    },

    /// Select an account
    Switch {
        /// Account name
        name: String,
    },

    /// List contacts
    Contacts,

    /// Add or update a contact
    AddContact {
        /// Contact name
        name: String,
        /// Contact address
        address: String,
    },

    /// Delete a contact
    DeleteContact {
        /// Contact name
        name: String,
    },

    /// Show the balance of the selected account
    Balance,

    /// Show recent transactions, newest first
    Transactions {
        /// Number of transactions, 0 for all
        #[arg(short, long, default_value = "10")]
        limit: i32,
    },

    /// Send MWC to an address
    SendTo {
        /// Amount in MWC, e.g. 1.5
        #[arg(value_parser = parse_mwc)]
        amount: u64,
        /// Recipient address
        address: String,
        /// Message attached to the transaction
        #[arg(short, long, default_value = "")]
        message: String,
        /// Minimum confirmations of spent inputs (wallet setting if omitted)
        #[arg(long)]
        confirmations: Option<u32>,
        /// Number of change outputs (wallet setting if omitted)
        #[arg(long)]
        change: Option<u32>,
    },

    /// Cancel an unconfirmed transaction
    Cancel {
        /// Transaction id
        tx_id: String,
    },

    /// List outputs
    Outputs,

    /// Show or rotate the MWC MQS receive address
    Address {
        /// Move to the next address first
        #[arg(long)]
        next: bool,
    },

    /// Start or stop listeners
    Listen {
        #[command(subcommand)]
        action: ListenAction,
    },

    /// Show node status
    Status,

    /// Scan the chain and repair the wallet
    Check,
}

#[derive(Subcommand, Debug)]
enum ListenAction {
    /// Start listening
    Start {
        /// Also listen on Keybase
        #[arg(long)]
        keybase: bool,
    },
    /// Stop listening
    Stop {
        /// Only stop Keybase
        #[arg(long)]
        keybase_only: bool,
    },
}

fn parse_mwc(input: &str) -> Result<u64, String> {
    parse_amount(input).map_err(|e| e.to_string())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    run(cli).await
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let data_dir = cli
        .data_dir
        .clone()
        .unwrap_or_else(|| wallet_data_dir("mwc_wallet_data"));
    info!("Wallet data in {}", data_dir.display());

    let mut wallet: Box<dyn Wallet> = Box::new(
        MockWallet::new(&data_dir)
            .with_context(|| format!("Unable to open wallet in {}", data_dir.display()))?,
    );

    let status = wallet.open(cli.network, &cli.password)?;
    match (&cli.command, status) {
        (_, InitWalletStatus::WrongPassword) => bail!("Wrong password"),
        (Commands::Init, InitWalletStatus::NeedInit) => {
            let words = wallet.init()?;
            println!("Recovery phrase, write it down:");
            println!("{}", words.join(" "));
            wallet.confirm_new_seed()?;
            println!("Wallet created on {}", cli.network);
            return Ok(());
        }
        (Commands::Init, InitWalletStatus::Ok) => {
            println!("Wallet already initialized");
            return Ok(());
        }
        (Commands::Recover { words }, _) => {
            wallet.recover(words)?;
            println!("Wallet recovered on {}", cli.network);
            return Ok(());
        }
        (_, InitWalletStatus::NeedInit) => {
            bail!("Wallet is not initialized, run `mwc-wallet init` first")
        }
        (_, InitWalletStatus::Ok) => {}
    }

    match cli.command {
        Commands::Init | Commands::Recover { .. } => {}
        Commands::Accounts => {
            for account in wallet.account_list() {
                let marker = if account.selected { "*" } else { " " };
                println!("{} {}", marker, account.name);
            }
        }
        Commands::CreateAccount { name } => {
            wallet.create_account(&name)?;
            println!("Created account '{}'", name);
        }
        Commands::Switch { name } => {
            wallet.switch_account(&name)?;
            println!("Selected account '{}'", name);
        }
        Commands::Contacts => {
            for contact in wallet.contacts() {
                println!("{:<20} {}", contact.name, contact.address);
            }
        }
        Commands::AddContact { name, address } => {
            wallet.add_contact(WalletContact::new(name.clone(), address))?;
            println!("Saved contact '{}'", name);
        }
        Commands::DeleteContact { name } => {
            wallet.delete_contact(&name)?;
            println!("Deleted contact '{}'", name);
        }
        Commands::Balance => {
            let info = wallet.wallet_balance();
            println!("Account:   {}", info.account);
            println!("Total:     {} MWC", format_amount(info.total));
            println!("Awaiting:  {} MWC", format_amount(info.awaiting_confirmation));
            println!("Locked:    {} MWC", format_amount(info.locked));
            println!("Spendable: {} MWC", format_amount(info.spendable));
        }
        Commands::Transactions { limit } => {
            for tx in wallet.transactions(limit) {
                let state = if tx.cancelled {
                    "cancelled"
                } else if tx.confirmed {
                    "confirmed"
                } else {
                    "pending"
                };
                println!(
                    "{:>4} {:?} {} MWC {} {} {}",
                    tx.idx,
                    tx.direction,
                    format_amount(tx.amount),
                    tx.address,
                    state,
                    tx.tx_id
                );
            }
        }
        Commands::SendTo {
            amount,
            address,
            message,
            confirmations,
            change,
        } => {
            let config = wallet.wallet_config();
            wallet.send_to(
                amount,
                &address,
                &message,
                confirmations.unwrap_or(config.input_confirmations),
                change.unwrap_or(config.change_outputs),
            )?;
            println!("Sent {} MWC to {}", format_amount(amount), address);
        }
        Commands::Cancel { tx_id } => {
            if !wallet.cancel_transaction(&tx_id) {
                bail!("Transaction {} can't be cancelled", tx_id);
            }
            println!("Cancelled {}", tx_id);
        }
        Commands::Outputs => {
            for output in wallet.outputs() {
                println!(
                    "{} {:?} {} MWC height {}",
                    output.commitment,
                    output.status,
                    format_amount(output.amount),
                    output.height
                );
            }
        }
        Commands::Address { next } => {
            if next {
                wallet.next_box_address()?;
            }
            let (address, idx) = wallet.mwc_box_address();
            println!("{} (index {})", address, idx);
        }
        Commands::Listen { action } => {
            match action {
                ListenAction::Start { keybase } => {
                    let mut requested = ListenState::MWC_BOX;
                    if keybase {
                        requested = requested | ListenState::KEYBASE;
                    }
                    wallet.start_listening(requested)?;
                }
                ListenAction::Stop { keybase_only } => {
                    let mut requested = ListenState::KEYBASE;
                    if !keybase_only {
                        requested = requested | ListenState::MWC_BOX;
                    }
                    wallet.stop_listening(requested)?;
                }
            }
            let channels: Vec<String> = wallet
                .listening_status()
                .channels()
                .iter()
                .map(|c| c.to_string())
                .collect();
            if channels.is_empty() {
                println!("Not listening");
            } else {
                println!("Listening on {}", channels.join(", "));
            }
        }
        Commands::Status => {
            let status = wallet.node_status();
            println!(
                "{} ({} peers) height {}/{}",
                status.status, status.connections, status.height, status.peer_height
            );
        }
        Commands::Check => {
            info!("Running wallet check");
            let (returned, result) = tokio::task::spawn_blocking(move || {
                let result = wallet.check();
                (wallet, result)
            })
            .await?;
            wallet = returned;
            result?;
            println!("Wallet check finished");
        }
    }

    wallet.close();
    Ok(())
}
