use super::money::Money;

/// Top-level error type for the ledger engine.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("Ledger error: {0}")]
    Ledger(#[from] LedgerError),
}

/// The kind of entity a registry lookup or uniqueness check refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Customer,
    Account,
    Loan,
    Transaction,
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EntityKind::Customer => write!(f, "customer"),
            EntityKind::Account => write!(f, "account"),
            EntityKind::Loan => write!(f, "loan"),
            EntityKind::Transaction => write!(f, "transaction"),
        }
    }
}

/// Domain errors raised by engine operations.
///
/// Every variant is caller-recoverable: an operation either fully succeeds or
/// fails with one of these kinds and no partial state change.
#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    #[error("Invalid amount: {amount}")]
    InvalidAmount { amount: String },

    #[error("Amount {amount} is below the minimum of {minimum}")]
    BelowMinimum { amount: Money, minimum: Money },

    #[error("Amount {amount} exceeds the daily withdrawal limit of {limit}")]
    ExceedsDailyLimit { amount: Money, limit: Money },

    #[error("Insufficient funds: account {account} has {available}, requested {requested}")]
    InsufficientFunds {
        account: String,
        available: Money,
        requested: Money,
    },

    #[error("Account {account} is inactive")]
    AccountInactive { account: String },

    #[error("Cannot transfer from account {account} to itself")]
    SameAccount { account: String },

    #[error("Recipient account {account} is inactive")]
    RecipientInactive { account: String },

    #[error("Duplicate {kind} ID: {id}")]
    DuplicateId { kind: EntityKind, id: String },

    #[error("{kind} {id} not found")]
    NotFound { kind: EntityKind, id: String },

    #[error("Cannot close account {account} with non-zero balance {balance}")]
    NonZeroBalance { account: String, balance: Money },

    #[error("Loan {loan} is not active")]
    LoanInactive { loan: String },

    #[error("Invalid parameter: {reason}")]
    InvalidParameter { reason: &'static str },

    #[error(
        "Payment amounts don't add up: principal {principal} + interest {interest} != {amount}"
    )]
    PaymentMismatch {
        amount: Money,
        principal: Money,
        interest: Money,
    },

    #[error("Cannot reverse transaction {transaction}: not in completed state")]
    NotCompleted { transaction: String },
}
