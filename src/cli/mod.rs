use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use std::sync::Arc;

use crate::application::{BankService, TracingAudit};
use crate::domain::{format_amount, parse_amount};
use crate::storage::SqliteStore;

/// Denario - Retail Bank Ledger
#[derive(Parser)]
#[command(name = "denario")]
#[command(about = "A single-user retail bank ledger backed by SQLite")]
#[command(version)]
pub struct Cli {
    /// Database file path
    #[arg(short, long, default_value = "denario.db")]
    pub database: String,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize a new database
    Init,

    /// Open a new account and print its credentials
    Open {
        /// Full name of the account holder
        holder: String,
    },

    /// Show the current balance
    Balance {
        /// Account number
        account: String,

        /// Account PIN
        #[arg(long)]
        pin: String,
    },

    /// Deposit money into an account
    Deposit {
        /// Account number
        account: String,

        /// Amount to deposit (e.g., "50.00" or "50")
        amount: String,

        /// Account PIN
        #[arg(long)]
        pin: String,
    },

    /// Withdraw money from an account
    Withdraw {
        /// Account number
        account: String,

        /// Amount to withdraw (e.g., "50.00" or "50")
        amount: String,

        /// Account PIN
        #[arg(long)]
        pin: String,
    },

    /// Transfer money to another account
    Transfer {
        /// Sender's account number
        account: String,

        /// Receiver's account number
        receiver: String,

        /// Amount to transfer (e.g., "50.00" or "50")
        amount: String,

        /// Sender's PIN
        #[arg(long)]
        pin: String,
    },

    /// Close an account and delete its record
    Close {
        /// Account number
        account: String,

        /// Account PIN
        #[arg(long)]
        pin: String,
    },
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        match self.command {
            Commands::Init => {
                SqliteStore::init(&format!("sqlite:{}?mode=rwc", self.database)).await?;
                println!("Database initialized: {}", self.database);
            }

            Commands::Open { holder } => {
                let service = connect_service(&self.database).await?;
                let account = service.open_account(&holder).await?;

                println!("--- Account Successfully Created ---");
                println!("Account Holder:  {}", account.holder_name);
                println!("Account Number:  {}", account.number);
                println!("PIN:             {}", account.pin);
                println!(
                    "Created At:      {}",
                    account.created_at.format("%d %b %Y %H:%M")
                );
                println!("------------------------------------");
                println!("Please store your credentials securely.");
            }

            Commands::Balance { account, pin } => {
                let service = connect_service(&self.database).await?;
                require_login(&service, &account, &pin).await?;

                let balance = service.balance(&account).await?;
                println!("Current balance: {}", format_amount(balance));
            }

            Commands::Deposit {
                account,
                amount,
                pin,
            } => {
                let service = connect_service(&self.database).await?;
                require_login(&service, &account, &pin).await?;

                let amount =
                    parse_amount(&amount).context("Invalid amount format. Use '50.00' or '50'")?;
                service.deposit(&account, amount).await?;
                println!(
                    "Deposited {} into account {}",
                    format_amount(amount),
                    account
                );
            }

            Commands::Withdraw {
                account,
                amount,
                pin,
            } => {
                let service = connect_service(&self.database).await?;
                require_login(&service, &account, &pin).await?;

                let amount =
                    parse_amount(&amount).context("Invalid amount format. Use '50.00' or '50'")?;
                service.withdraw(&account, amount).await?;
                println!(
                    "Withdrew {} from account {}",
                    format_amount(amount),
                    account
                );
            }

            Commands::Transfer {
                account,
                receiver,
                amount,
                pin,
            } => {
                let service = connect_service(&self.database).await?;
                require_login(&service, &account, &pin).await?;

                service.is_transfer_allowed(&account, &receiver).await?;

                let amount =
                    parse_amount(&amount).context("Invalid amount format. Use '50.00' or '50'")?;

                if service.transfer(&account, &receiver, amount).await? {
                    println!(
                        "Transferred {} to account {}",
                        format_amount(amount),
                        receiver
                    );
                } else {
                    println!("Transfer failed: insufficient funds.");
                }
            }

            Commands::Close { account, pin } => {
                let service = connect_service(&self.database).await?;
                require_login(&service, &account, &pin).await?;

                service.close_account(&account).await?;
                println!("Account closed: {}", account);
            }
        }

        Ok(())
    }
}

async fn connect_service(database_path: &str) -> Result<BankService<SqliteStore>> {
    let store = SqliteStore::connect(&format!("sqlite:{}", database_path))
        .await
        .with_context(|| {
            format!(
                "Failed to open database '{}'. Run 'init' first",
                database_path
            )
        })?;
    Ok(BankService::new(store, Arc::new(TracingAudit)))
}

async fn require_login(
    service: &BankService<SqliteStore>,
    account: &str,
    pin: &str,
) -> Result<()> {
    if !service.validate_login(account, pin).await? {
        bail!("Login failed: incorrect account number or PIN");
    }
    Ok(())
}
