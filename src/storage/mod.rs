use anyhow::Result;
use async_trait::async_trait;
use rust_decimal::Decimal;

use crate::domain::Account;

mod memory;
mod sqlite;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

/// SQL migration for initial schema
pub const MIGRATION_001_INITIAL: &str = include_str!("migrations/001_initial.sql");

/// What the ledger requires from a persistence backend, regardless of
/// storage engine. Accounts are addressed by their 16-digit number.
#[async_trait]
pub trait AccountStore: Send + Sync {
    /// Whether an account with this number is stored.
    async fn exists(&self, number: &str) -> Result<bool>;

    /// Current balance. Fails if the account is absent.
    async fn balance(&self, number: &str) -> Result<Decimal>;

    /// Apply a signed delta to one account's balance. The read and write
    /// happen in a single transaction, and a result below zero fails the
    /// transaction instead of committing.
    async fn adjust_balance(&self, number: &str, delta: Decimal) -> Result<()>;

    /// Debit `from` and credit `to` by `amount` as one unit: both rows
    /// change or neither does.
    async fn transfer(&self, from: &str, to: &str, amount: Decimal) -> Result<()>;

    /// Store a new account with a zero balance.
    async fn insert_account(&self, account: &Account) -> Result<()>;

    /// Remove an account row entirely.
    async fn delete_account(&self, number: &str) -> Result<()>;

    /// Clear-text credential comparison for login.
    async fn check_credentials(&self, number: &str, pin: &str) -> Result<bool>;
}
