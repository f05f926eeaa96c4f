//! Ledger engine module.
//!
//! This module contains the core banking logic including:
//! - `Bank` - The registry owning customers, accounts and loans
//! - `Account` - Per-account ledger and business rules
//! - `Loan` - Amortization schedule and payment allocation
//! - `Money` - Exact fixed-precision decimal value type
//! - `Error` types - Domain and export errors

mod account;
mod bank;
mod customer;
mod entity;
mod error;
mod loan;
mod money;
mod report;
mod transaction;

pub use account::{max_daily_withdrawal, min_deposit, min_withdrawal, Account, AccountKind};
pub use bank::Bank;
pub use customer::Customer;
pub use entity::EntityInfo;
pub use error::{EntityKind, Error, LedgerError};
pub use loan::{AmortizationSchedule, Loan, LoanPayment, ScheduleRow};
pub use money::Money;
pub use report::{AccountSummary, BankReport, CustomerSummary, HighValueEntry, LoanSummary};
pub use transaction::{Transaction, TransactionKind, TransactionStatus};
