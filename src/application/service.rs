use chrono::Utc;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rust_decimal::Decimal;
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::domain::{Account, number};
use crate::storage::AccountStore;

use super::BankError;
use super::audit::{AuditEvent, AuditSink};

/// Application service providing the retail-bank operations.
/// This is the primary interface for any client (CLI, TUI, etc.).
///
/// The random source is injected so tests can seed it; audit records go
/// through the injected sink instead of a process-wide logger.
pub struct BankService<S> {
    store: S,
    rng: Mutex<StdRng>,
    audit: Arc<dyn AuditSink>,
}

impl<S: AccountStore> BankService<S> {
    /// Create a service with an entropy-seeded random source.
    pub fn new(store: S, audit: Arc<dyn AuditSink>) -> Self {
        Self::with_rng(store, audit, StdRng::from_entropy())
    }

    /// Create a service with an explicit random source (seedable in tests).
    pub fn with_rng(store: S, audit: Arc<dyn AuditSink>, rng: StdRng) -> Self {
        Self {
            store,
            rng: Mutex::new(rng),
            audit,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    // ========================
    // Account lifecycle
    // ========================

    /// Open a new account: unique number, fresh PIN, zero balance.
    /// Returns the credentials the holder needs to keep.
    pub async fn open_account(&self, holder_name: &str) -> Result<Account, BankError> {
        let account_number = self.unique_account_number().await?;
        let pin = {
            let mut rng = self.rng.lock().await;
            number::random_pin(&mut *rng)
        };

        let account = Account::new(account_number, pin, holder_name.to_string(), Utc::now());
        self.store.insert_account(&account).await?;

        self.audit.record(&AuditEvent::AccountOpened {
            account: account.number.clone(),
            holder: account.holder_name.clone(),
        });

        Ok(account)
    }

    /// Whether the account number and PIN match a stored account.
    pub async fn validate_login(&self, account_number: &str, pin: &str) -> Result<bool, BankError> {
        if !self.store.check_credentials(account_number, pin).await? {
            self.audit.record(&AuditEvent::LoginRejected {
                account: account_number.to_string(),
            });
            return Ok(false);
        }

        Ok(true)
    }

    /// Close an account for good. The row is deleted, not archived.
    /// Refused while the account still holds funds.
    pub async fn close_account(&self, account_number: &str) -> Result<(), BankError> {
        let balance = self.store.balance(account_number).await?;
        if balance != Decimal::ZERO {
            return Err(BankError::AccountNotEmpty { balance });
        }

        self.store.delete_account(account_number).await?;

        self.audit.record(&AuditEvent::AccountClosed {
            account: account_number.to_string(),
        });

        Ok(())
    }

    // ========================
    // Balance operations
    // ========================

    /// Current balance of the account.
    pub async fn balance(&self, account_number: &str) -> Result<Decimal, BankError> {
        Ok(self.store.balance(account_number).await?)
    }

    /// Add `amount` to the account. The amount must be positive.
    pub async fn deposit(&self, account_number: &str, amount: Decimal) -> Result<(), BankError> {
        if amount <= Decimal::ZERO {
            return Err(BankError::InvalidAmount);
        }

        self.store.adjust_balance(account_number, amount).await?;

        self.audit.record(&AuditEvent::Deposit {
            account: account_number.to_string(),
            amount,
        });

        Ok(())
    }

    /// Take `amount` out of the account. The amount must be positive and
    /// covered by the current balance.
    pub async fn withdraw(&self, account_number: &str, amount: Decimal) -> Result<(), BankError> {
        if amount <= Decimal::ZERO {
            return Err(BankError::InvalidAmount);
        }

        let balance = self.store.balance(account_number).await?;
        if balance < amount {
            self.audit.record(&AuditEvent::WithdrawalRejected {
                account: account_number.to_string(),
                requested: amount,
                available: balance,
            });
            return Err(BankError::InsufficientFunds {
                balance,
                requested: amount,
            });
        }

        self.store.adjust_balance(account_number, -amount).await?;

        self.audit.record(&AuditEvent::Withdrawal {
            account: account_number.to_string(),
            amount,
        });

        Ok(())
    }

    // ========================
    // Transfers
    // ========================

    /// Validation gate for a transfer; mutates nothing. The sender is not
    /// re-checked here: the caller's login session already established it.
    pub async fn is_transfer_allowed(
        &self,
        sender: &str,
        receiver: &str,
    ) -> Result<(), BankError> {
        if sender == receiver {
            return Err(BankError::SameAccount);
        }

        number::validate(receiver)?;

        if !self.store.exists(receiver).await? {
            return Err(BankError::UnknownDestination(receiver.to_string()));
        }

        Ok(())
    }

    /// Move `amount` from sender to receiver. Assumes `is_transfer_allowed`
    /// already passed. Insufficient funds is a `false` return, not an
    /// error: callers branch on the flag.
    pub async fn transfer(
        &self,
        sender: &str,
        receiver: &str,
        amount: Decimal,
    ) -> Result<bool, BankError> {
        let balance = self.store.balance(sender).await?;
        if balance < amount {
            self.audit.record(&AuditEvent::TransferRejected {
                from: sender.to_string(),
                to: receiver.to_string(),
                amount,
            });
            return Ok(false);
        }

        self.store.transfer(sender, receiver, amount).await?;

        self.audit.record(&AuditEvent::TransferCommitted {
            from: sender.to_string(),
            to: receiver.to_string(),
            amount,
        });

        Ok(true)
    }

    // ========================
    // Account numbers
    // ========================

    /// Generate account numbers until one is unused. The loop has no upper
    /// bound; with a 9-digit random body it converges almost immediately.
    async fn unique_account_number(&self) -> Result<String, BankError> {
        loop {
            let candidate = {
                let mut rng = self.rng.lock().await;
                number::random_account_number(&mut *rng)
            };

            if !self.store.exists(&candidate).await? {
                return Ok(candidate);
            }
        }
    }
}
