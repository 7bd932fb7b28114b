use rust_decimal::Decimal;
use thiserror::Error;

use crate::domain::number::NumberError;

#[derive(Error, Debug)]
pub enum BankError {
    #[error("Amount must be positive")]
    InvalidAmount,

    #[error("Insufficient funds: balance {balance}, requested {requested}")]
    InsufficientFunds { balance: Decimal, requested: Decimal },

    #[error("Transfer failed: source and destination accounts must be different")]
    SameAccount,

    #[error("Transfer failed: invalid account number")]
    InvalidAccountNumber,

    #[error("Transfer failed: account number must be 16 digits")]
    MalformedAccountNumber,

    #[error("Transfer failed: the destination account does not exist")]
    UnknownDestination(String),

    #[error("Account still holds funds ({balance}); empty it before closing")]
    AccountNotEmpty { balance: Decimal },

    #[error("Storage error: {0}")]
    Storage(#[from] anyhow::Error),
}

impl From<NumberError> for BankError {
    fn from(err: NumberError) -> Self {
        match err {
            NumberError::Malformed => BankError::MalformedAccountNumber,
            NumberError::ChecksumMismatch => BankError::InvalidAccountNumber,
        }
    }
}
