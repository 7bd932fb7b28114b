// Allow dead_code because these helpers are used across different test files
// which are compiled separately
#![allow(dead_code)]

use anyhow::Result;
use denario::application::{BankService, MemoryAudit};
use denario::domain::Account;
use denario::storage::SqliteStore;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rust_decimal::Decimal;
use std::sync::Arc;
use tempfile::TempDir;

/// A well-formed account number (valid checksum) that no test ever stores.
pub const ABSENT_ACCOUNT: &str = "4000000000000002";

/// Helper to create a test service with a temporary database, a seeded
/// random source, and a capturing audit sink.
pub async fn test_service() -> Result<(BankService<SqliteStore>, Arc<MemoryAudit>, TempDir)> {
    let temp_dir = TempDir::new()?;
    let db_path = temp_dir.path().join("test.db");
    let store = SqliteStore::init(&format!("sqlite:{}?mode=rwc", db_path.display())).await?;

    let audit = Arc::new(MemoryAudit::new());
    let service = BankService::with_rng(store, audit.clone(), StdRng::seed_from_u64(42));
    Ok((service, audit, temp_dir))
}

/// Open an account and give it an initial balance.
pub async fn open_funded_account(
    service: &BankService<SqliteStore>,
    amount: Decimal,
) -> Result<Account> {
    let account = service.open_account("Test Holder").await?;
    if amount > Decimal::ZERO {
        service.deposit(&account.number, amount).await?;
    }
    Ok(account)
}
