//! Integration tests for the ledger engine.
//!
//! These tests exercise the full flow: registry wiring -> operations ->
//! queries/export, the way an external caller (the excluded UI layer) would.
use bank_ledger::{
    AccountKind, AccountSummary, Bank, LedgerError, Money, Transaction, TransactionKind,
};
use rust_decimal_macros::dec;

fn money(value: &str) -> Money {
    Money::parse(value).unwrap()
}

/// Helper to build a bank with one customer and one checking account.
fn bank_with_account() -> Bank {
    let mut bank = Bank::new("Integration Test Bank");
    bank.add_customer("CUST-1001", "John Doe", "john.doe@example.com", "555-0101")
        .unwrap();
    bank.open_account("ACC-2001", "CUST-1001", AccountKind::Checking)
        .unwrap();
    bank
}

#[test]
fn test_deposit_withdraw_scenario() {
    let mut bank = bank_with_account();

    bank.deposit("ACC-2001", money("1000.00")).unwrap();
    assert_eq!(bank.get_account("ACC-2001").unwrap().balance(), money("1000.00"));

    bank.withdraw("ACC-2001", money("200.00")).unwrap();
    assert_eq!(bank.get_account("ACC-2001").unwrap().balance(), money("800.00"));

    let err = bank.withdraw("ACC-2001", money("900.00")).unwrap_err();
    assert!(matches!(err, LedgerError::InsufficientFunds { .. }));
    assert_eq!(bank.get_account("ACC-2001").unwrap().balance(), money("800.00"));
}

#[test]
fn test_balance_always_equals_ledger_sum() {
    let mut bank = bank_with_account();
    bank.open_account("ACC-2002", "CUST-1001", AccountKind::Savings)
        .unwrap();

    bank.deposit("ACC-2001", money("1000.00")).unwrap();
    let withdrawal = bank.withdraw("ACC-2001", money("150.00")).unwrap();
    bank.transfer_funds("ACC-2001", "ACC-2002", money("300.00"))
        .unwrap();
    bank.reverse_transaction("ACC-2001", withdrawal.id()).unwrap();

    for id in ["ACC-2001", "ACC-2002"] {
        let account = bank.get_account(id).unwrap();
        let sum: Money = account
            .transactions()
            .iter()
            .map(Transaction::amount)
            .sum();
        assert_eq!(account.balance(), sum, "ledger sum mismatch on {id}");
    }
    // 1000 - 150 - 300, with the 150 withdrawal reversed
    assert_eq!(bank.get_account("ACC-2001").unwrap().balance(), money("700.00"));
    assert_eq!(bank.get_account("ACC-2002").unwrap().balance(), money("300.00"));
}

#[test]
fn test_transfer_is_atomic_end_to_end() {
    let mut bank = bank_with_account();
    bank.add_customer("CUST-1002", "Jane Smith", "jane@example.com", "555-0102")
        .unwrap();
    bank.open_account("ACC-2003", "CUST-1002", AccountKind::Checking)
        .unwrap();
    bank.deposit("ACC-2001", money("100.00")).unwrap();
    bank.deposit("ACC-2003", money("100.00")).unwrap();

    // Insufficient funds on the sender: both sides unchanged
    assert!(bank
        .transfer_funds("ACC-2001", "ACC-2003", money("5000.00"))
        .is_err());
    assert_eq!(bank.get_account("ACC-2001").unwrap().balance(), money("100.00"));
    assert_eq!(bank.get_account("ACC-2003").unwrap().balance(), money("100.00"));

    // Below the recipient's deposit minimum: both sides unchanged
    assert!(bank
        .transfer_funds("ACC-2001", "ACC-2003", money("30.00"))
        .is_err());
    assert_eq!(bank.get_account("ACC-2001").unwrap().balance(), money("100.00"));
    assert_eq!(bank.get_account("ACC-2003").unwrap().balance(), money("100.00"));
}

#[test]
fn test_reversal_lifecycle() {
    let mut bank = bank_with_account();
    let deposit = bank.deposit("ACC-2001", money("500.00")).unwrap();

    let reversal = bank.reverse_transaction("ACC-2001", deposit.id()).unwrap();
    assert_eq!(reversal.kind(), TransactionKind::Reversal);
    assert_eq!(reversal.amount(), money("-500.00"));
    assert_eq!(bank.get_account("ACC-2001").unwrap().balance(), Money::ZERO);

    // Reversing twice fails and changes nothing
    let err = bank
        .reverse_transaction("ACC-2001", deposit.id())
        .unwrap_err();
    assert!(matches!(err, LedgerError::NotCompleted { .. }));
    assert_eq!(bank.get_account("ACC-2001").unwrap().balance(), Money::ZERO);
}

#[test]
fn test_close_account_with_residual_cent_fails() {
    let mut bank = bank_with_account();
    bank.deposit("ACC-2001", money("50.00")).unwrap();
    bank.withdraw("ACC-2001", money("49.99")).unwrap();

    let err = bank.close_account("ACC-2001").unwrap_err();
    assert!(matches!(err, LedgerError::NonZeroBalance { .. }));
    // Still registered and active
    assert!(bank.get_account("ACC-2001").unwrap().is_active());
}

#[test]
fn test_loan_lifecycle_to_payoff() {
    let mut bank = bank_with_account();
    bank.deposit("ACC-2001", money("1000.00")).unwrap();
    bank.create_loan("LOAN-1", "CUST-1001", money("10000.00"), dec!(0.08), 5)
        .unwrap();

    // Disbursement landed on the account
    assert_eq!(
        bank.get_account("ACC-2001").unwrap().balance(),
        money("11000.00")
    );

    let monthly = bank.get_loan("LOAN-1").unwrap().monthly_payment().unwrap();
    assert_eq!(monthly, money("202.76"));

    let first = bank.process_loan_payment("LOAN-1", monthly).unwrap();
    assert_eq!(first.interest(), money("66.67"));
    assert_eq!(first.principal(), money("136.09"));

    let mut rounds = 1;
    while bank.get_loan("LOAN-1").unwrap().is_active() {
        bank.process_loan_payment("LOAN-1", monthly).unwrap();
        rounds += 1;
        assert!(rounds < 100, "loan failed to converge");
    }

    let loan = bank.get_loan("LOAN-1").unwrap();
    assert_eq!(loan.remaining_amount(), Money::ZERO);
    assert!(!loan.is_active());
    for payment in loan.payments() {
        let residue = (payment.principal() + payment.interest() - payment.amount()).abs();
        assert!(residue < Money::min_unit());
    }

    // Paid-off loans accept no further payments
    assert!(matches!(
        bank.process_loan_payment("LOAN-1", monthly),
        Err(LedgerError::LoanInactive { .. })
    ));
}

#[test]
fn test_amortization_schedule_reconciles_with_original_amount() {
    let mut bank = bank_with_account();
    bank.deposit("ACC-2001", money("1000.00")).unwrap();
    bank.create_loan("LOAN-1", "CUST-1001", money("10000.00"), dec!(0.08), 5)
        .unwrap();

    let loan = bank.get_loan("LOAN-1").unwrap();
    let total_principal: Money = loan
        .amortization_schedule()
        .unwrap()
        .map(|row| row.principal)
        .sum();
    assert_eq!(total_principal, loan.original_amount());
}

#[test]
fn test_customer_summary_and_reports() {
    let mut bank = bank_with_account();
    bank.open_account("ACC-2002", "CUST-1001", AccountKind::Savings)
        .unwrap();
    bank.deposit("ACC-2001", money("1000.00")).unwrap();
    bank.deposit("ACC-2002", money("12000.00")).unwrap();
    bank.create_loan("LOAN-1", "CUST-1001", money("5000.00"), dec!(0.08), 5)
        .unwrap();

    let summary = bank.customer_summary("CUST-1001").unwrap();
    assert_eq!(summary.accounts.len(), 2);
    assert_eq!(summary.loans.len(), 1);
    assert_eq!(summary.total_balance, money("18000.00"));
    assert_eq!(summary.loans[0].remaining_amount, money("5000.00"));

    let report = bank.report();
    assert_eq!(report.total_customers, 1);
    assert_eq!(report.total_deposits, money("18000.00"));
    assert_eq!(report.total_loans, money("5000.00"));

    let high_value = bank.high_value_customers(money("10000.00"));
    assert_eq!(high_value.len(), 1);
    assert_eq!(high_value[0].customer_id, "CUST-1001");
}

#[test]
fn test_export_accounts_round_trips_through_csv() {
    let mut bank = bank_with_account();
    bank.open_account("ACC-2002", "CUST-1001", AccountKind::Savings)
        .unwrap();
    bank.deposit("ACC-2001", money("123.45")).unwrap();

    let mut output = Vec::new();
    bank.export_accounts(&mut output).unwrap();

    let mut reader = csv::Reader::from_reader(output.as_slice());
    let rows: Vec<AccountSummary> = reader
        .deserialize::<AccountSummary>()
        .map(|row| row.unwrap())
        .collect();

    assert_eq!(rows.len(), 2);
    // Note: order may vary, so find by account id
    let checking = rows.iter().find(|r| r.id == "ACC-2001").unwrap();
    assert_eq!(checking.balance, money("123.45"));
    assert_eq!(checking.kind, AccountKind::Checking);
    assert!(checking.is_active);

    let savings = rows.iter().find(|r| r.id == "ACC-2002").unwrap();
    assert_eq!(savings.balance, Money::ZERO);
}

#[test]
fn test_transaction_history_query_is_read_only() {
    let mut bank = bank_with_account();
    bank.deposit("ACC-2001", money("100.00")).unwrap();
    bank.deposit("ACC-2001", money("200.00")).unwrap();
    bank.withdraw("ACC-2001", money("50.00")).unwrap();

    let account = bank.get_account("ACC-2001").unwrap();
    let recent = account.get_transaction_history(Some(2));
    assert_eq!(recent.len(), 2);
    assert_eq!(recent[0].amount(), money("200.00"));
    assert_eq!(recent[1].amount(), money("-50.00"));
    assert_eq!(account.get_transaction_history(None).len(), 3);
    assert_eq!(account.balance(), money("250.00"));
}
