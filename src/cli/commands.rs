pub(crate) use clap::Parser;

#[derive(Parser, Debug)]
#[command(
    name = "bank-ledger",
    author,
    version,
    about = "An in-memory bank ledger and loan engine demo",
    long_about = None,
    after_help = "OUTPUT:\n    Seeds a demo bank, runs a few operations and prints the bank report,\n    then dumps all account summaries to stdout in CSV format."
)]
pub struct Args {
    /// Name of the demo bank
    #[arg(long, value_name = "NAME", default_value = "Rust Savings & Loan")]
    pub bank_name: String,

    /// Balance threshold for the high-value customer report
    #[arg(long, value_name = "AMOUNT", default_value = "10000.00")]
    pub threshold: String,
}
