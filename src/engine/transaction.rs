use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::money::Money;

/// Classification of a ledger entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Deposit,
    Withdrawal,
    Transfer,
    Reversal,
}

impl std::fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TransactionKind::Deposit => write!(f, "deposit"),
            TransactionKind::Withdrawal => write!(f, "withdrawal"),
            TransactionKind::Transfer => write!(f, "transfer"),
            TransactionKind::Reversal => write!(f, "reversal"),
        }
    }
}

/// Lifecycle state of a ledger entry.
///
/// The only permitted transition is `Completed` -> `Reversed`, exactly once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionStatus {
    Completed,
    Reversed,
}

/// A single signed entry in an account's ledger.
///
/// Positive amounts are credits, negative amounts are debits. Entries are
/// append-only: once created they are never deleted and, apart from the
/// status transition, never modified. Insertion order is chronological order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transaction {
    id: String,
    account_id: String,
    amount: Money,
    kind: TransactionKind,
    description: String,
    timestamp: DateTime<Utc>,
    status: TransactionStatus,
}

impl Transaction {
    pub(crate) fn new(
        id: String,
        account_id: String,
        amount: Money,
        kind: TransactionKind,
        description: String,
    ) -> Self {
        Self {
            id,
            account_id,
            amount,
            kind,
            description,
            timestamp: Utc::now(),
            status: TransactionStatus::Completed,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Identifier of the owning account (a non-owning back-reference).
    pub fn account_id(&self) -> &str {
        &self.account_id
    }

    /// Signed amount: positive for credits, negative for debits.
    pub fn amount(&self) -> Money {
        self.amount
    }

    pub fn kind(&self) -> TransactionKind {
        self.kind
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    pub fn status(&self) -> TransactionStatus {
        self.status
    }

    pub fn is_completed(&self) -> bool {
        self.status == TransactionStatus::Completed
    }

    /// Mark this entry as reversed. Only the owning account's reversal path
    /// may call this, after appending the compensating entry.
    pub(crate) fn mark_reversed(&mut self) {
        self.status = TransactionStatus::Reversed;
    }
}

impl std::fmt::Display for Transaction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "[{}] {} of {} on account {} ({})",
            self.kind,
            self.id,
            self.amount.abs(),
            self.account_id,
            self.timestamp.format("%Y-%m-%d %H:%M:%S"),
        )
    }
}
