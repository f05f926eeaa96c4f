use serde::{Deserialize, Serialize};

use super::entity::EntityInfo;
use super::error::{EntityKind, LedgerError};
use super::money::Money;
use super::transaction::{Transaction, TransactionKind};

/// Minimum accepted deposit.
pub fn min_deposit() -> Money {
    Money::from_cents(50_00)
}

/// Minimum accepted withdrawal.
pub fn min_withdrawal() -> Money {
    Money::from_cents(20_00)
}

/// Maximum withdrawal per call. There is no rolling-window aggregation:
/// repeated same-day withdrawals below the cap are not detected.
pub fn max_daily_withdrawal() -> Money {
    Money::from_cents(5_000_00)
}

/// The kind of bank account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountKind {
    Checking,
    Savings,
}

impl AccountKind {
    fn display_name(self) -> &'static str {
        match self {
            AccountKind::Checking => "Checking Account",
            AccountKind::Savings => "Savings Account",
        }
    }
}

impl std::fmt::Display for AccountKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AccountKind::Checking => write!(f, "checking"),
            AccountKind::Savings => write!(f, "savings"),
        }
    }
}

/// A customer account and its append-only transaction ledger.
///
/// The ledger is the source of truth: the running `balance` always equals the
/// signed sum of all entries, and every balance change goes through the
/// single append path that maintains that invariant. Accounts are created by
/// the [`Bank`](super::bank::Bank) registry on account opening and start at a
/// zero balance.
#[derive(Debug, Clone)]
pub struct Account {
    info: EntityInfo,
    customer_id: String,
    kind: AccountKind,
    balance: Money,
    transactions: Vec<Transaction>,
    is_active: bool,
    tx_seq: u64,
}

impl Account {
    pub(crate) fn new(id: impl Into<String>, customer_id: impl Into<String>, kind: AccountKind) -> Self {
        Self {
            info: EntityInfo::new(id, kind.display_name()),
            customer_id: customer_id.into(),
            kind,
            balance: Money::ZERO,
            transactions: Vec::new(),
            is_active: true,
            tx_seq: 1,
        }
    }

    pub fn id(&self) -> &str {
        self.info.id()
    }

    pub fn info(&self) -> &EntityInfo {
        &self.info
    }

    /// Identifier of the owning customer (a non-owning back-reference).
    pub fn customer_id(&self) -> &str {
        &self.customer_id
    }

    pub fn kind(&self) -> AccountKind {
        self.kind
    }

    pub fn balance(&self) -> Money {
        self.balance
    }

    pub fn is_active(&self) -> bool {
        self.is_active
    }

    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    /// Deposit money into the account.
    ///
    /// Appends a `deposit` entry of `+amount` and returns it.
    pub fn deposit(&mut self, amount: Money) -> Result<Transaction, LedgerError> {
        self.validate_deposit(amount)?;
        Ok(self.append(TransactionKind::Deposit, amount, "Account deposit".to_string()))
    }

    /// Withdraw money from the account.
    ///
    /// Appends a `withdrawal` entry of `-amount` and returns it.
    pub fn withdraw(&mut self, amount: Money) -> Result<Transaction, LedgerError> {
        self.validate_withdrawal(amount)?;
        Ok(self.append(
            TransactionKind::Withdrawal,
            -amount,
            "Account withdrawal".to_string(),
        ))
    }

    /// Transfer money to another account.
    ///
    /// Both sides are validated against the full withdrawal and deposit rule
    /// sets before anything is mutated, so a failure on either side leaves
    /// both accounts in their pre-call state. On success a single `transfer`
    /// debit entry lands on the sender and a single `transfer` credit entry
    /// on the recipient; the sender's entry is returned.
    pub fn transfer_to(
        &mut self,
        amount: Money,
        recipient: &mut Account,
    ) -> Result<Transaction, LedgerError> {
        if self.id() == recipient.id() {
            return Err(LedgerError::SameAccount {
                account: self.id().to_string(),
            });
        }
        if !recipient.is_active {
            return Err(LedgerError::RecipientInactive {
                account: recipient.id().to_string(),
            });
        }
        self.validate_withdrawal(amount)?;
        recipient.validate_deposit(amount)?;

        let entry = self.append(
            TransactionKind::Transfer,
            -amount,
            format!("Transfer to account {}", recipient.id()),
        );
        recipient.append(
            TransactionKind::Transfer,
            amount,
            format!("Transfer from account {}", self.id()),
        );
        Ok(entry)
    }

    /// Reverse a previously completed transaction.
    ///
    /// Appends a compensating `reversal` entry of the negated amount through
    /// the normal append path (which is the only thing that adjusts the
    /// balance) and marks the original `reversed`. Reversing the same entry
    /// twice fails with [`LedgerError::NotCompleted`].
    pub fn reverse_transaction(&mut self, tx_id: &str) -> Result<Transaction, LedgerError> {
        let position = self
            .transactions
            .iter()
            .position(|t| t.id() == tx_id)
            .ok_or_else(|| LedgerError::NotFound {
                kind: EntityKind::Transaction,
                id: tx_id.to_string(),
            })?;

        if !self.transactions[position].is_completed() {
            return Err(LedgerError::NotCompleted {
                transaction: tx_id.to_string(),
            });
        }

        let amount = -self.transactions[position].amount();
        self.transactions[position].mark_reversed();

        Ok(self.append_with_id(
            format!("RVSL-{tx_id}"),
            TransactionKind::Reversal,
            amount,
            format!("Reversal of {tx_id}"),
        ))
    }

    /// The most recent `limit` transactions in chronological order, or the
    /// full ledger if `limit` is `None`.
    pub fn get_transaction_history(&self, limit: Option<usize>) -> &[Transaction] {
        match limit {
            Some(n) => {
                let start = self.transactions.len().saturating_sub(n);
                &self.transactions[start..]
            }
            None => &self.transactions,
        }
    }

    /// Mark the account inactive. Only the registry's close path calls this,
    /// after verifying the balance is zero.
    pub(crate) fn deactivate(&mut self) {
        self.is_active = false;
    }

    fn validate_amount(amount: Money) -> Result<(), LedgerError> {
        if !amount.is_positive() || amount.scale() > Money::SCALE {
            return Err(LedgerError::InvalidAmount {
                amount: amount.as_decimal().to_string(),
            });
        }
        Ok(())
    }

    fn validate_deposit(&self, amount: Money) -> Result<(), LedgerError> {
        Self::validate_amount(amount)?;
        if amount < min_deposit() {
            return Err(LedgerError::BelowMinimum {
                amount,
                minimum: min_deposit(),
            });
        }
        Ok(())
    }

    fn validate_withdrawal(&self, amount: Money) -> Result<(), LedgerError> {
        Self::validate_amount(amount)?;
        if !self.is_active {
            return Err(LedgerError::AccountInactive {
                account: self.id().to_string(),
            });
        }
        if amount < min_withdrawal() {
            return Err(LedgerError::BelowMinimum {
                amount,
                minimum: min_withdrawal(),
            });
        }
        if amount > max_daily_withdrawal() {
            return Err(LedgerError::ExceedsDailyLimit {
                amount,
                limit: max_daily_withdrawal(),
            });
        }
        if amount > self.balance {
            return Err(LedgerError::InsufficientFunds {
                account: self.id().to_string(),
                available: self.balance,
                requested: amount,
            });
        }
        Ok(())
    }

    fn append(&mut self, kind: TransactionKind, amount: Money, description: String) -> Transaction {
        let id = format!("TXN-{}-{}", self.info.id(), self.tx_seq);
        self.tx_seq += 1;
        self.append_with_id(id, kind, amount, description)
    }

    fn append_with_id(
        &mut self,
        id: String,
        kind: TransactionKind,
        amount: Money,
        description: String,
    ) -> Transaction {
        let entry = Transaction::new(id, self.info.id().to_string(), amount, kind, description);
        self.balance += amount;
        self.transactions.push(entry.clone());
        #[cfg(debug_assertions)]
        self.assert_ledger_sum();
        entry
    }

    /// Assert the fundamental ledger invariant:
    /// balance = signed sum of all entries
    #[cfg(debug_assertions)]
    fn assert_ledger_sum(&self) {
        let sum: Money = self.transactions.iter().map(Transaction::amount).sum();
        debug_assert_eq!(
            self.balance,
            sum,
            "Invariant violated on account {}: balance ({}) != ledger sum ({})",
            self.id(),
            self.balance,
            sum
        );
    }
}
