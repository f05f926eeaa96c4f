mod commands;

use anyhow::{Context, Result};
use bank_ledger::{AccountKind, Bank, Money};
use clap::Parser;
use commands::Args;
use rust_decimal::Decimal;

fn main() -> Result<()> {
    // Parse the CLI arguments
    let args = Args::parse();

    // Initialize logger with default level of info (can be overridden with RUST_LOG)
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let threshold = Money::parse(&args.threshold)
        .with_context(|| format!("Invalid threshold amount: {}", args.threshold))?;

    // 1. Seed the demo bank
    let mut bank = seed_bank(&args.bank_name).context("Failed to seed demo bank")?;

    // 2. Run a few operations through the engine
    log::info!("Running demo operations");
    bank.transfer_funds("ACC-2001", "ACC-2003", Money::from_cents(250_00))
        .context("Failed to transfer funds")?;

    bank.create_loan(
        "LOAN-3001",
        "CUST-1001",
        Money::from_cents(10_000_00),
        Decimal::new(8, 2), // 8% annual
        5,
    )
    .context("Failed to originate loan")?;
    let payment = bank
        .process_loan_payment("LOAN-3001", Money::from_cents(202_76))
        .context("Failed to process loan payment")?;
    println!(
        "First loan payment: {} (principal {}, interest {})",
        payment.amount(),
        payment.principal(),
        payment.interest()
    );

    // 3. Print the bank report
    let report = bank.report();
    println!("\n=== {} ===", report.bank_name);
    println!("Customers:        {}", report.total_customers);
    println!(
        "Accounts:         {} ({} active)",
        report.total_accounts, report.active_accounts
    );
    println!("Total deposits:   {}", report.total_deposits);
    println!("Total loans:      {}", report.total_loans);
    println!("Loan/deposit:     {:.2}", report.loan_to_deposit_ratio);

    println!("\nHigh-value customers (>= {threshold}):");
    for entry in bank.high_value_customers(threshold) {
        println!(
            "- {}: {} ({} accounts)",
            entry.name, entry.total_balance, entry.account_count
        );
    }

    // 4. Export the account summaries to stdout
    println!("\n=== Account export ===");
    bank.export_accounts(std::io::stdout())
        .context("Failed to export accounts to stdout")?;

    Ok(())
}

/// Seed the sample customers, accounts and deposits the demo runs against.
fn seed_bank(name: &str) -> Result<Bank> {
    let mut bank = Bank::new(name);

    let customers = [
        ("CUST-1001", "John Doe", "john.doe@example.com", "555-0101"),
        ("CUST-1002", "Jane Smith", "jane.smith@example.com", "555-0102"),
        ("CUST-1003", "Robert Johnson", "robert.j@example.com", "555-0103"),
    ];
    for (id, customer_name, email, phone) in customers {
        bank.add_customer(id, customer_name, email, phone)?;
    }

    let accounts = [
        ("ACC-2001", "CUST-1001", AccountKind::Checking),
        ("ACC-2002", "CUST-1001", AccountKind::Savings),
        ("ACC-2003", "CUST-1002", AccountKind::Checking),
        ("ACC-2004", "CUST-1003", AccountKind::Savings),
    ];
    for (id, customer_id, kind) in accounts {
        bank.open_account(id, customer_id, kind)?;
    }

    let initial_deposits = [
        ("ACC-2001", 1_000_00),
        ("ACC-2002", 5_000_00),
        ("ACC-2003", 2_500_00),
        ("ACC-2004", 3_000_00),
    ];
    for (id, cents) in initial_deposits {
        bank.deposit(id, Money::from_cents(cents))?;
    }

    Ok(bank)
}
