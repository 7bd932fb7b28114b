use anyhow::{Result, bail, ensure};
use async_trait::async_trait;
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::Account;

use super::AccountStore;

#[derive(Debug, Clone)]
struct StoredAccount {
    account: Account,
    balance: Decimal,
}

/// A thread-safe in-memory account store.
///
/// Clones share the same underlying map, so a stub store can be handed to
/// several services at once. Used in tests and wherever durability is not
/// required.
#[derive(Default, Clone)]
pub struct MemoryStore {
    accounts: Arc<RwLock<HashMap<String, StoredAccount>>>,
}

impl MemoryStore {
    /// Creates a new, empty in-memory store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AccountStore for MemoryStore {
    async fn exists(&self, number: &str) -> Result<bool> {
        let accounts = self.accounts.read().await;
        Ok(accounts.contains_key(number))
    }

    async fn balance(&self, number: &str) -> Result<Decimal> {
        let accounts = self.accounts.read().await;
        match accounts.get(number) {
            Some(stored) => Ok(stored.balance),
            None => bail!("Account not found: {}", number),
        }
    }

    async fn adjust_balance(&self, number: &str, delta: Decimal) -> Result<()> {
        let mut accounts = self.accounts.write().await;
        let stored = match accounts.get_mut(number) {
            Some(stored) => stored,
            None => bail!("Account not found: {}", number),
        };

        let adjusted = stored.balance + delta;
        ensure!(
            adjusted >= Decimal::ZERO,
            "Balance adjustment would overdraw account {}",
            number
        );

        stored.balance = adjusted;
        Ok(())
    }

    async fn transfer(&self, from: &str, to: &str, amount: Decimal) -> Result<()> {
        // One write guard covers both rows, so the debit and credit land
        // together or not at all.
        let mut accounts = self.accounts.write().await;

        let sender = match accounts.get(from) {
            Some(stored) => stored.balance,
            None => bail!("Account not found: {}", from),
        };
        ensure!(accounts.contains_key(to), "Account not found: {}", to);

        let debited = sender - amount;
        ensure!(
            debited >= Decimal::ZERO,
            "Transfer would overdraw account {}",
            from
        );

        if let Some(stored) = accounts.get_mut(from) {
            stored.balance = debited;
        }
        if let Some(stored) = accounts.get_mut(to) {
            stored.balance += amount;
        }
        Ok(())
    }

    async fn insert_account(&self, account: &Account) -> Result<()> {
        let mut accounts = self.accounts.write().await;
        accounts.insert(
            account.number.clone(),
            StoredAccount {
                account: account.clone(),
                balance: Decimal::ZERO,
            },
        );
        Ok(())
    }

    async fn delete_account(&self, number: &str) -> Result<()> {
        let mut accounts = self.accounts.write().await;
        ensure!(
            accounts.remove(number).is_some(),
            "Account not found: {}",
            number
        );
        Ok(())
    }

    async fn check_credentials(&self, number: &str, pin: &str) -> Result<bool> {
        let accounts = self.accounts.read().await;
        Ok(accounts
            .get(number)
            .is_some_and(|stored| stored.account.pin == pin))
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use rust_decimal_macros::dec;

    use super::*;

    fn account(number: &str, pin: &str) -> Account {
        Account::new(number.into(), pin.into(), "Test Holder".into(), Utc::now())
    }

    #[tokio::test]
    async fn test_insert_and_lookup() {
        let store = MemoryStore::new();
        store
            .insert_account(&account("4000000000000002", "1234"))
            .await
            .unwrap();

        assert!(store.exists("4000000000000002").await.unwrap());
        assert!(!store.exists("4000008449433403").await.unwrap());
        assert_eq!(
            store.balance("4000000000000002").await.unwrap(),
            Decimal::ZERO
        );
    }

    #[tokio::test]
    async fn test_credentials_compare_pin() {
        let store = MemoryStore::new();
        store
            .insert_account(&account("4000000000000002", "1234"))
            .await
            .unwrap();

        assert!(store.check_credentials("4000000000000002", "1234").await.unwrap());
        assert!(!store.check_credentials("4000000000000002", "4321").await.unwrap());
        assert!(!store.check_credentials("4000008449433403", "1234").await.unwrap());
    }

    #[tokio::test]
    async fn test_adjust_balance_refuses_overdraw() {
        let store = MemoryStore::new();
        store
            .insert_account(&account("4000000000000002", "1234"))
            .await
            .unwrap();

        store
            .adjust_balance("4000000000000002", dec!(10.00))
            .await
            .unwrap();
        assert!(
            store
                .adjust_balance("4000000000000002", dec!(-10.01))
                .await
                .is_err()
        );
        assert_eq!(store.balance("4000000000000002").await.unwrap(), dec!(10.00));
    }

    #[tokio::test]
    async fn test_transfer_moves_both_rows_or_neither() {
        let store = MemoryStore::new();
        store
            .insert_account(&account("4000000000000002", "1234"))
            .await
            .unwrap();
        store
            .insert_account(&account("4000008449433403", "5678"))
            .await
            .unwrap();
        store
            .adjust_balance("4000000000000002", dec!(50.00))
            .await
            .unwrap();

        store
            .transfer("4000000000000002", "4000008449433403", dec!(20.00))
            .await
            .unwrap();
        assert_eq!(store.balance("4000000000000002").await.unwrap(), dec!(30.00));
        assert_eq!(store.balance("4000008449433403").await.unwrap(), dec!(20.00));

        // Overdraw attempt leaves both untouched
        assert!(
            store
                .transfer("4000000000000002", "4000008449433403", dec!(30.01))
                .await
                .is_err()
        );
        assert_eq!(store.balance("4000000000000002").await.unwrap(), dec!(30.00));
        assert_eq!(store.balance("4000008449433403").await.unwrap(), dec!(20.00));
    }

    #[tokio::test]
    async fn test_delete_account() {
        let store = MemoryStore::new();
        store
            .insert_account(&account("4000000000000002", "1234"))
            .await
            .unwrap();

        store.delete_account("4000000000000002").await.unwrap();
        assert!(!store.exists("4000000000000002").await.unwrap());
        assert!(store.delete_account("4000000000000002").await.is_err());
    }
}
