//! An in-memory retail bank ledger and loan amortization engine.
//!
//! The engine models customers, accounts, money movements and amortizing
//! loans, and enforces the rules that keep balances, transaction history and
//! loan amortization mathematically consistent under deposits, withdrawals,
//! transfers, reversals and payments. It is single-threaded and purely
//! in-memory; callers resolve identifiers through the [`Bank`] registry and
//! invoke operations that either fully succeed or fail with a
//! [`LedgerError`] and no partial state change.

pub mod engine;

pub use engine::{
    Account, AccountKind, AccountSummary, AmortizationSchedule, Bank, BankReport, Customer,
    CustomerSummary, EntityInfo, EntityKind, Error, HighValueEntry, LedgerError, Loan,
    LoanPayment, LoanSummary, Money, ScheduleRow, Transaction, TransactionKind,
    TransactionStatus,
};
