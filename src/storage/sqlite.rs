use anyhow::{Context, Result, bail, ensure};
use async_trait::async_trait;
use rust_decimal::Decimal;
use sqlx::sqlite::SqliteConnection;
use sqlx::{Row, SqlitePool};
use std::str::FromStr;

use crate::domain::Account;

use super::{AccountStore, MIGRATION_001_INITIAL};

/// SQLite-backed account store.
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Create a new store with the given SQLite connection pool.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Connect to a SQLite database at the given URL.
    pub async fn connect(database_url: &str) -> Result<Self> {
        let pool = SqlitePool::connect(database_url)
            .await
            .context("Failed to connect to database")?;
        Ok(Self::new(pool))
    }

    /// Run database migrations.
    pub async fn migrate(&self) -> Result<()> {
        sqlx::query(MIGRATION_001_INITIAL)
            .execute(&self.pool)
            .await
            .context("Failed to run migration 001")?;

        Ok(())
    }

    /// Initialize a new database (connect + migrate).
    pub async fn init(database_url: &str) -> Result<Self> {
        let store = Self::connect(database_url).await?;
        store.migrate().await?;
        Ok(store)
    }

    async fn balance_in_tx(conn: &mut SqliteConnection, number: &str) -> Result<Decimal> {
        let row = sqlx::query("SELECT balance FROM accounts WHERE number = ?")
            .bind(number)
            .fetch_optional(&mut *conn)
            .await
            .context("Failed to fetch balance")?;

        let row = match row {
            Some(row) => row,
            None => bail!("Account not found: {}", number),
        };

        let text: String = row.get("balance");
        Decimal::from_str(&text)
            .with_context(|| format!("Invalid stored balance for account {}", number))
    }

    async fn set_balance_in_tx(
        conn: &mut SqliteConnection,
        number: &str,
        balance: Decimal,
    ) -> Result<()> {
        sqlx::query("UPDATE accounts SET balance = ? WHERE number = ?")
            .bind(balance.to_string())
            .bind(number)
            .execute(&mut *conn)
            .await
            .context("Failed to update balance")?;
        Ok(())
    }
}

#[async_trait]
impl AccountStore for SqliteStore {
    async fn exists(&self, number: &str) -> Result<bool> {
        let row = sqlx::query("SELECT 1 FROM accounts WHERE number = ?")
            .bind(number)
            .fetch_optional(&self.pool)
            .await
            .context("Failed to check account existence")?;

        Ok(row.is_some())
    }

    async fn balance(&self, number: &str) -> Result<Decimal> {
        let mut conn = self
            .pool
            .acquire()
            .await
            .context("Failed to acquire connection")?;
        Self::balance_in_tx(&mut conn, number).await
    }

    async fn adjust_balance(&self, number: &str, delta: Decimal) -> Result<()> {
        let mut tx = self
            .pool
            .begin()
            .await
            .context("Failed to begin balance transaction")?;

        let balance = Self::balance_in_tx(&mut tx, number).await?;
        let adjusted = balance + delta;
        ensure!(
            adjusted >= Decimal::ZERO,
            "Balance adjustment would overdraw account {}",
            number
        );

        Self::set_balance_in_tx(&mut tx, number, adjusted).await?;
        tx.commit().await.context("Failed to commit balance update")?;
        Ok(())
    }

    async fn transfer(&self, from: &str, to: &str, amount: Decimal) -> Result<()> {
        let mut tx = self
            .pool
            .begin()
            .await
            .context("Failed to begin transfer transaction")?;

        let sender = Self::balance_in_tx(&mut tx, from).await?;
        let receiver = Self::balance_in_tx(&mut tx, to).await?;

        let debited = sender - amount;
        ensure!(
            debited >= Decimal::ZERO,
            "Transfer would overdraw account {}",
            from
        );

        Self::set_balance_in_tx(&mut tx, from, debited).await?;
        Self::set_balance_in_tx(&mut tx, to, receiver + amount).await?;

        tx.commit().await.context("Failed to commit transfer")?;
        Ok(())
    }

    async fn insert_account(&self, account: &Account) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO accounts (number, pin, holder_name, created_at)
            VALUES (?, ?, ?, ?)
            "#,
        )
        .bind(&account.number)
        .bind(&account.pin)
        .bind(&account.holder_name)
        .bind(account.created_at.to_rfc3339())
        .execute(&self.pool)
        .await
        .context("Failed to insert account")?;
        Ok(())
    }

    async fn delete_account(&self, number: &str) -> Result<()> {
        let result = sqlx::query("DELETE FROM accounts WHERE number = ?")
            .bind(number)
            .execute(&self.pool)
            .await
            .context("Failed to delete account")?;

        ensure!(result.rows_affected() > 0, "Account not found: {}", number);
        Ok(())
    }

    async fn check_credentials(&self, number: &str, pin: &str) -> Result<bool> {
        let row = sqlx::query("SELECT 1 FROM accounts WHERE number = ? AND pin = ?")
            .bind(number)
            .bind(pin)
            .fetch_optional(&self.pool)
            .await
            .context("Failed to check credentials")?;

        Ok(row.is_some())
    }
}
