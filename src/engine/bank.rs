use std::collections::HashMap;
use std::io::Write;

use chrono::Utc;
use rust_decimal::Decimal;

use super::account::{Account, AccountKind};
use super::customer::Customer;
use super::error::{EntityKind, Error, LedgerError};
use super::loan::{Loan, LoanPayment};
use super::money::Money;
use super::report::{AccountSummary, BankReport, CustomerSummary, HighValueEntry, LoanSummary};
use super::transaction::Transaction;

/// Share of a loan amount the customer must hold across accounts to qualify.
fn credit_reserve_ratio() -> Decimal {
    Decimal::new(1, 1) // 0.1
}

fn not_found(kind: EntityKind, id: &str) -> LedgerError {
    LedgerError::NotFound {
        kind,
        id: id.to_string(),
    }
}

/// The top-level registry owning all customers, accounts and loans.
///
/// The bank is the sole authority for identifier uniqueness and cross-entity
/// wiring: an account exists only once registered here and listed under its
/// owning customer. Operations resolve identifiers and delegate to the
/// entity's own methods.
#[derive(Debug)]
pub struct Bank {
    name: String,
    customers: HashMap<String, Customer>,
    accounts: HashMap<String, Account>,
    loans: HashMap<String, Loan>,
}

impl Bank {
    /// Create an empty bank registry.
    pub fn new(name: impl Into<String>) -> Self {
        log::trace!("Bank registry initialized");
        Self {
            name: name.into(),
            customers: HashMap::new(),
            accounts: HashMap::new(),
            loans: HashMap::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn customer_count(&self) -> usize {
        self.customers.len()
    }

    pub fn account_count(&self) -> usize {
        self.accounts.len()
    }

    pub fn loan_count(&self) -> usize {
        self.loans.len()
    }

    // =========================================================================
    // Registration and lookup
    // =========================================================================

    /// Register a new customer.
    pub fn add_customer(
        &mut self,
        id: &str,
        name: &str,
        email: &str,
        phone: &str,
    ) -> Result<&Customer, LedgerError> {
        if self.customers.contains_key(id) {
            return Err(LedgerError::DuplicateId {
                kind: EntityKind::Customer,
                id: id.to_string(),
            });
        }
        log::debug!("[customer] Registered {id} ({name})");
        Ok(self
            .customers
            .entry(id.to_string())
            .or_insert_with(|| Customer::new(id, name, email, phone)))
    }

    /// Open a new account for a registered customer.
    ///
    /// The account starts at a zero balance and is wired under both the
    /// registry and the owning customer.
    pub fn open_account(
        &mut self,
        id: &str,
        customer_id: &str,
        kind: AccountKind,
    ) -> Result<&Account, LedgerError> {
        if self.accounts.contains_key(id) {
            return Err(LedgerError::DuplicateId {
                kind: EntityKind::Account,
                id: id.to_string(),
            });
        }
        let customer = self
            .customers
            .get_mut(customer_id)
            .ok_or_else(|| not_found(EntityKind::Customer, customer_id))?;
        customer.add_account(id.to_string());

        log::debug!("[account] Opened {kind} account {id} for customer {customer_id}");
        Ok(self
            .accounts
            .entry(id.to_string())
            .or_insert_with(|| Account::new(id, customer_id, kind)))
    }

    pub fn get_customer(&self, id: &str) -> Result<&Customer, LedgerError> {
        self.customers
            .get(id)
            .ok_or_else(|| not_found(EntityKind::Customer, id))
    }

    pub fn get_account(&self, id: &str) -> Result<&Account, LedgerError> {
        self.accounts
            .get(id)
            .ok_or_else(|| not_found(EntityKind::Account, id))
    }

    pub fn get_loan(&self, id: &str) -> Result<&Loan, LedgerError> {
        self.loans
            .get(id)
            .ok_or_else(|| not_found(EntityKind::Loan, id))
    }

    /// Close an account with a zero balance.
    ///
    /// Marks the account inactive and removes it from the registry mapping.
    /// The identifier stays in the owning customer's list; lookups through
    /// the registry report it as not found and summaries skip it.
    pub fn close_account(&mut self, id: &str) -> Result<(), LedgerError> {
        let account = self
            .accounts
            .get_mut(id)
            .ok_or_else(|| not_found(EntityKind::Account, id))?;
        if !account.balance().is_zero() {
            return Err(LedgerError::NonZeroBalance {
                account: id.to_string(),
                balance: account.balance(),
            });
        }
        account.deactivate();
        self.accounts.remove(id);
        log::info!("[account] Closed account {id}");
        Ok(())
    }

    // =========================================================================
    // Money movement
    // =========================================================================

    /// Deposit into an account by identifier.
    pub fn deposit(&mut self, account_id: &str, amount: Money) -> Result<Transaction, LedgerError> {
        let account = self
            .accounts
            .get_mut(account_id)
            .ok_or_else(|| not_found(EntityKind::Account, account_id))?;
        let entry = account.deposit(amount)?;
        log::trace!(
            "[deposit] account={account_id} amount={amount} -> new_balance={}",
            account.balance()
        );
        Ok(entry)
    }

    /// Withdraw from an account by identifier.
    pub fn withdraw(&mut self, account_id: &str, amount: Money) -> Result<Transaction, LedgerError> {
        let account = self
            .accounts
            .get_mut(account_id)
            .ok_or_else(|| not_found(EntityKind::Account, account_id))?;
        let entry = account.withdraw(amount)?;
        log::trace!(
            "[withdrawal] account={account_id} amount={amount} -> new_balance={}",
            account.balance()
        );
        Ok(entry)
    }

    /// Move funds between two registered accounts.
    ///
    /// Resolves both identifiers then delegates to
    /// [`Account::transfer_to`]; any failure leaves both accounts unchanged.
    pub fn transfer_funds(
        &mut self,
        from_id: &str,
        to_id: &str,
        amount: Money,
    ) -> Result<Transaction, LedgerError> {
        if from_id == to_id {
            return Err(LedgerError::SameAccount {
                account: from_id.to_string(),
            });
        }
        if !self.accounts.contains_key(to_id) {
            return Err(not_found(EntityKind::Account, to_id));
        }
        // Take the sender out of the map to hold both sides mutably.
        let mut sender = self
            .accounts
            .remove(from_id)
            .ok_or_else(|| not_found(EntityKind::Account, from_id))?;
        let result = match self.accounts.get_mut(to_id) {
            Some(recipient) => sender.transfer_to(amount, recipient),
            None => Err(not_found(EntityKind::Account, to_id)),
        };
        self.accounts.insert(sender.id().to_string(), sender);

        if let Ok(entry) = &result {
            log::trace!("[transfer] {from_id} -> {to_id} amount={amount} tx={}", entry.id());
        }
        result
    }

    /// Reverse a completed transaction on an account's ledger.
    pub fn reverse_transaction(
        &mut self,
        account_id: &str,
        tx_id: &str,
    ) -> Result<Transaction, LedgerError> {
        let account = self
            .accounts
            .get_mut(account_id)
            .ok_or_else(|| not_found(EntityKind::Account, account_id))?;
        let reversal = account.reverse_transaction(tx_id)?;
        log::trace!(
            "[reversal] account={account_id} tx={tx_id} -> new_balance={}",
            account.balance()
        );
        Ok(reversal)
    }

    // =========================================================================
    // Loans
    // =========================================================================

    /// Originate a loan for a registered customer.
    ///
    /// The customer must hold at least 10% of the loan amount across their
    /// accounts; on success the principal is disbursed into the customer's
    /// first registered account.
    pub fn create_loan(
        &mut self,
        id: &str,
        customer_id: &str,
        amount: Money,
        interest_rate: Decimal,
        term_years: u32,
    ) -> Result<&Loan, LedgerError> {
        if self.loans.contains_key(id) {
            return Err(LedgerError::DuplicateId {
                kind: EntityKind::Loan,
                id: id.to_string(),
            });
        }
        let customer = self
            .customers
            .get(customer_id)
            .ok_or_else(|| not_found(EntityKind::Customer, customer_id))?;

        if self.total_balance_of(customer) < amount.mul_rate(credit_reserve_ratio()) {
            return Err(LedgerError::InvalidParameter {
                reason: "insufficient creditworthiness for this loan amount",
            });
        }
        let primary_id = customer
            .account_ids()
            .iter()
            .find(|account_id| self.accounts.contains_key(*account_id))
            .cloned()
            .ok_or(LedgerError::InvalidParameter {
                reason: "customer has no open account for loan disbursement",
            })?;

        let loan = Loan::new(
            id,
            customer_id,
            amount,
            interest_rate,
            term_years,
            Utc::now().date_naive(),
        )?;

        // Disburse before registering the loan so a failed deposit leaves no
        // partial state behind.
        let primary = self
            .accounts
            .get_mut(&primary_id)
            .ok_or_else(|| not_found(EntityKind::Account, &primary_id))?;
        primary.deposit(amount)?;

        if let Some(customer) = self.customers.get_mut(customer_id) {
            customer.add_loan(id.to_string());
        }

        log::info!("[loan] Originated {id} for customer {customer_id}: {amount} over {term_years}y");
        Ok(self.loans.entry(id.to_string()).or_insert(loan))
    }

    /// Apply a payment toward a loan by identifier.
    pub fn process_loan_payment(
        &mut self,
        loan_id: &str,
        amount: Money,
    ) -> Result<LoanPayment, LedgerError> {
        let loan = self
            .loans
            .get_mut(loan_id)
            .ok_or_else(|| not_found(EntityKind::Loan, loan_id))?;
        let payment = loan.make_payment(amount, None)?;
        log::trace!(
            "[loan-payment] loan={loan_id} amount={} principal={} interest={} -> remaining={}",
            payment.amount(),
            payment.principal(),
            payment.interest(),
            loan.remaining_amount()
        );
        Ok(payment)
    }

    // =========================================================================
    // Queries and reports
    // =========================================================================

    /// Total balance across a customer's registered accounts.
    pub fn customer_total_balance(&self, customer_id: &str) -> Result<Money, LedgerError> {
        let customer = self.get_customer(customer_id)?;
        Ok(self.total_balance_of(customer))
    }

    /// A customer's accounts and loans at a glance.
    pub fn customer_summary(&self, customer_id: &str) -> Result<CustomerSummary, LedgerError> {
        let customer = self.get_customer(customer_id)?;

        let accounts: Vec<AccountSummary> = customer
            .account_ids()
            .iter()
            .filter_map(|id| self.accounts.get(id))
            .map(|account| AccountSummary {
                id: account.id().to_string(),
                kind: account.kind(),
                balance: account.balance(),
                is_active: account.is_active(),
            })
            .collect();

        let loans: Vec<LoanSummary> = customer
            .loan_ids()
            .iter()
            .filter_map(|id| self.loans.get(id))
            .map(|loan| LoanSummary {
                id: loan.id().to_string(),
                original_amount: loan.original_amount(),
                remaining_amount: loan.remaining_amount(),
                interest_rate: loan.interest_rate(),
                is_active: loan.is_active(),
            })
            .collect();

        Ok(CustomerSummary {
            id: customer.id().to_string(),
            name: customer.name().to_string(),
            email: customer.email().to_string(),
            phone: customer.phone().to_string(),
            total_balance: accounts.iter().map(|a| a.balance).sum(),
            accounts,
            loans,
        })
    }

    /// Bank-wide aggregates.
    pub fn report(&self) -> BankReport {
        let total_deposits: Money = self.accounts.values().map(Account::balance).sum();
        let total_loans: Money = self.loans.values().map(Loan::remaining_amount).sum();
        let loan_to_deposit_ratio = if total_deposits.is_positive() {
            total_loans.as_decimal() / total_deposits.as_decimal()
        } else {
            Decimal::ZERO
        };

        BankReport {
            bank_name: self.name.clone(),
            total_customers: self.customers.len(),
            total_accounts: self.accounts.len(),
            active_accounts: self.accounts.values().filter(|a| a.is_active()).count(),
            total_deposits,
            total_loans,
            loan_to_deposit_ratio,
        }
    }

    /// Customers whose total balance meets the threshold, sorted by total
    /// balance descending.
    pub fn high_value_customers(&self, threshold: Money) -> Vec<HighValueEntry> {
        let mut entries: Vec<HighValueEntry> = self
            .customers
            .values()
            .filter_map(|customer| {
                let total = self.total_balance_of(customer);
                (total >= threshold).then(|| HighValueEntry {
                    customer_id: customer.id().to_string(),
                    name: customer.name().to_string(),
                    total_balance: total,
                    account_count: customer.account_ids().len(),
                })
            })
            .collect();

        entries.sort_by(|a, b| b.total_balance.cmp(&a.total_balance));
        entries
    }

    /// Write every registered account as a CSV summary row.
    pub fn export_accounts<W: Write>(&self, writer: W) -> Result<(), Error> {
        log::info!("Exporting {} accounts", self.accounts.len());

        let mut csv_writer = csv::Writer::from_writer(writer);
        for account in self.accounts.values() {
            csv_writer.serialize(AccountSummary {
                id: account.id().to_string(),
                kind: account.kind(),
                balance: account.balance(),
                is_active: account.is_active(),
            })?;
        }
        csv_writer.flush()?;

        log::trace!("Export complete");
        Ok(())
    }

    /// Closed or otherwise unregistered account ids in the customer's list
    /// contribute nothing.
    fn total_balance_of(&self, customer: &Customer) -> Money {
        customer
            .account_ids()
            .iter()
            .filter_map(|id| self.accounts.get(id))
            .map(Account::balance)
            .sum()
    }
}
