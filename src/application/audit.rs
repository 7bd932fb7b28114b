use rust_decimal::Decimal;
use std::sync::Mutex;
use tracing::{info, warn};

/// One record per noteworthy ledger event. Amounts ride along so sinks can
/// render them without another balance read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuditEvent {
    AccountOpened {
        account: String,
        holder: String,
    },
    LoginRejected {
        account: String,
    },
    Deposit {
        account: String,
        amount: Decimal,
    },
    Withdrawal {
        account: String,
        amount: Decimal,
    },
    WithdrawalRejected {
        account: String,
        requested: Decimal,
        available: Decimal,
    },
    TransferCommitted {
        from: String,
        to: String,
        amount: Decimal,
    },
    TransferRejected {
        from: String,
        to: String,
        amount: Decimal,
    },
    AccountClosed {
        account: String,
    },
}

/// Where the ledger sends its audit records. Injected into the service so
/// the core stays free of global logging state.
pub trait AuditSink: Send + Sync {
    fn record(&self, event: &AuditEvent);
}

/// Production sink: forwards every event to the `tracing` subscriber.
/// Rejections are warnings, everything else is informational.
#[derive(Debug, Default)]
pub struct TracingAudit;

impl AuditSink for TracingAudit {
    fn record(&self, event: &AuditEvent) {
        match event {
            AuditEvent::AccountOpened { account, holder } => {
                info!(%account, %holder, "created new account");
            }
            AuditEvent::LoginRejected { account } => {
                warn!(%account, "incorrect login attempt");
            }
            AuditEvent::Deposit { account, amount } => {
                info!(%account, %amount, "deposit");
            }
            AuditEvent::Withdrawal { account, amount } => {
                info!(%account, %amount, "withdrawal");
            }
            AuditEvent::WithdrawalRejected {
                account,
                requested,
                available,
            } => {
                warn!(%account, %requested, %available, "withdrawal rejected: insufficient funds");
            }
            AuditEvent::TransferCommitted { from, to, amount } => {
                info!(%from, %to, %amount, "transfer committed");
            }
            AuditEvent::TransferRejected { from, to, amount } => {
                warn!(%from, %to, %amount, "transfer rejected: insufficient funds");
            }
            AuditEvent::AccountClosed { account } => {
                info!(%account, "account closed");
            }
        }
    }
}

/// Capturing sink for tests: keeps every event for later inspection.
#[derive(Debug, Default)]
pub struct MemoryAudit {
    events: Mutex<Vec<AuditEvent>>,
}

impl MemoryAudit {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything recorded so far, in order.
    pub fn events(&self) -> Vec<AuditEvent> {
        self.events.lock().map(|events| events.clone()).unwrap_or_default()
    }
}

impl AuditSink for MemoryAudit {
    fn record(&self, event: &AuditEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event.clone());
        }
    }
}
