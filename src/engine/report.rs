use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::account::AccountKind;
use super::money::Money;

/// Per-account slice of a customer summary, also the row shape of the CSV
/// account export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountSummary {
    #[serde(rename = "account")]
    pub id: String,
    pub kind: AccountKind,
    pub balance: Money,
    pub is_active: bool,
}

/// Per-loan slice of a customer summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoanSummary {
    pub id: String,
    pub original_amount: Money,
    pub remaining_amount: Money,
    pub interest_rate: Decimal,
    pub is_active: bool,
}

/// A customer's accounts and loans at a glance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CustomerSummary {
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub accounts: Vec<AccountSummary>,
    pub loans: Vec<LoanSummary>,
    pub total_balance: Money,
}

/// Bank-wide aggregates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BankReport {
    pub bank_name: String,
    pub total_customers: usize,
    pub total_accounts: usize,
    pub active_accounts: usize,
    pub total_deposits: Money,
    pub total_loans: Money,
    pub loan_to_deposit_ratio: Decimal,
}

/// One row of the high-value customer query, sorted by total balance
/// descending.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HighValueEntry {
    pub customer_id: String,
    pub name: String,
    pub total_balance: Money,
    pub account_count: usize,
}
