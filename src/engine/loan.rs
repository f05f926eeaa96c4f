use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use super::entity::EntityInfo;
use super::error::LedgerError;
use super::money::Money;

const MONTHS_PER_YEAR: u32 = 12;

/// An amortizing loan.
///
/// `remaining_amount` is monotonically non-increasing and reaches zero
/// exactly when the loan leaves the active state, which is terminal.
#[derive(Debug, Clone)]
pub struct Loan {
    info: EntityInfo,
    customer_id: String,
    original_amount: Money,
    remaining_amount: Money,
    interest_rate: Decimal,
    term_months: u32,
    start_date: NaiveDate,
    payments: Vec<LoanPayment>,
    is_active: bool,
}

impl Loan {
    /// Create a loan from validated primitive terms.
    ///
    /// Fails with [`LedgerError::InvalidParameter`] unless the amount, the
    /// annual interest rate and the term are all strictly positive.
    pub fn new(
        id: impl Into<String>,
        customer_id: impl Into<String>,
        amount: Money,
        interest_rate: Decimal,
        term_years: u32,
        start_date: NaiveDate,
    ) -> Result<Self, LedgerError> {
        if !amount.is_positive() {
            return Err(LedgerError::InvalidParameter {
                reason: "loan amount must be positive",
            });
        }
        if interest_rate <= Decimal::ZERO {
            return Err(LedgerError::InvalidParameter {
                reason: "interest rate must be positive",
            });
        }
        if term_years == 0 {
            return Err(LedgerError::InvalidParameter {
                reason: "loan term must be at least 1 year",
            });
        }

        let id = id.into();
        let suffix: String = {
            let chars: Vec<char> = id.chars().collect();
            chars[chars.len().saturating_sub(6)..].iter().collect()
        };
        Ok(Self {
            info: EntityInfo::new(id, format!("Loan #{suffix}")),
            customer_id: customer_id.into(),
            original_amount: amount,
            remaining_amount: amount,
            interest_rate,
            term_months: term_years * MONTHS_PER_YEAR,
            start_date,
            payments: Vec::new(),
            is_active: true,
        })
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

    pub fn original_amount(&self) -> Money {
        self.original_amount
    }

    pub fn remaining_amount(&self) -> Money {
        self.remaining_amount
    }

    /// Annual interest rate as a fraction (0.08 = 8%).
    pub fn interest_rate(&self) -> Decimal {
        self.interest_rate
    }

    pub fn term_months(&self) -> u32 {
        self.term_months
    }

    pub fn start_date(&self) -> NaiveDate {
        self.start_date
    }

    pub fn payments(&self) -> &[LoanPayment] {
        &self.payments
    }

    pub fn is_active(&self) -> bool {
        self.is_active
    }

    fn monthly_rate(&self) -> Decimal {
        self.interest_rate / Decimal::from(MONTHS_PER_YEAR)
    }

    /// The fixed monthly payment from the standard amortization formula
    /// `P = L*r*(1+r)^n / ((1+r)^n - 1)`, rounded to 2 fractional digits at
    /// the end only.
    pub fn monthly_payment(&self) -> Result<Money, LedgerError> {
        let rate = self.monthly_rate();
        // Unreachable after construction; guards the division below.
        if rate.is_zero() {
            return Err(LedgerError::InvalidParameter {
                reason: "interest rate must be positive",
            });
        }
        let base = Decimal::ONE + rate;
        let mut factor = Decimal::ONE;
        for _ in 0..self.term_months {
            factor *= base;
        }
        let payment = self.original_amount.as_decimal() * rate * factor / (factor - Decimal::ONE);
        Ok(Money::new(payment).rounded())
    }

    /// Apply a payment toward the loan.
    ///
    /// A payment above the remaining balance is capped to it and accepted as
    /// a closing payment. Interest owed for the period is computed on the
    /// remaining balance; a payment at or below the interest owed reduces no
    /// principal at all.
    pub fn make_payment(
        &mut self,
        amount: Money,
        payment_date: Option<NaiveDate>,
    ) -> Result<LoanPayment, LedgerError> {
        if !self.is_active {
            return Err(LedgerError::LoanInactive {
                loan: self.id().to_string(),
            });
        }
        if !amount.is_positive() || amount.scale() > Money::SCALE {
            return Err(LedgerError::InvalidAmount {
                amount: amount.as_decimal().to_string(),
            });
        }

        let amount = amount.min(self.remaining_amount);
        let payment_date = payment_date.unwrap_or_else(|| Utc::now().date_naive());

        let mut interest = self.remaining_amount.mul_rate(self.monthly_rate()).rounded();
        let principal = if amount <= interest {
            interest = amount;
            Money::ZERO
        } else {
            amount - interest
        };

        let payment = LoanPayment::new(
            format!("PMT-{}-{}", self.id(), self.payments.len() + 1),
            self.id().to_string(),
            amount,
            principal,
            interest,
            payment_date,
        )?;

        self.remaining_amount -= principal;
        self.payments.push(payment.clone());

        if self.remaining_amount.is_zero() {
            self.is_active = false;
        }

        Ok(payment)
    }

    /// Lazily generated amortization schedule over the *original* terms,
    /// independent of any payments actually made.
    pub fn amortization_schedule(&self) -> Result<AmortizationSchedule, LedgerError> {
        Ok(AmortizationSchedule {
            balance: self.original_amount,
            monthly_payment: self.monthly_payment()?,
            monthly_rate: self.monthly_rate(),
            month: 0,
            term_months: self.term_months,
        })
    }

    /// The suffix of the original schedule beyond the payments already made.
    ///
    /// This is a convenience view over the scheduled rows, not a
    /// recomputation from the actual remaining balance: when payments deviate
    /// from the scheduled amount the two drift apart.
    pub fn remaining_scheduled_payments(&self) -> Result<Vec<ScheduleRow>, LedgerError> {
        let schedule: Vec<ScheduleRow> = self.amortization_schedule()?.collect();
        let made = self.payments.len();
        if made >= schedule.len() {
            return Ok(Vec::new());
        }
        Ok(schedule[made..].to_vec())
    }
}

/// A single scheduled month in a loan's amortization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScheduleRow {
    pub month: u32,
    pub payment: Money,
    pub principal: Money,
    pub interest: Money,
    pub balance: Money,
}

/// Iterator over the per-month rows of an amortization schedule.
///
/// Every month pays the fixed monthly payment except the final one, where
/// the principal is forced to the remaining balance and the payment
/// recomputed as `principal + interest` so rounding drift leaves no residue.
/// Rows round per month; the running balance never goes below zero and the
/// iterator stops early once it reaches zero.
#[derive(Debug)]
pub struct AmortizationSchedule {
    balance: Money,
    monthly_payment: Money,
    monthly_rate: Decimal,
    month: u32,
    term_months: u32,
}

impl Iterator for AmortizationSchedule {
    type Item = ScheduleRow;

    fn next(&mut self) -> Option<ScheduleRow> {
        if self.month >= self.term_months || self.balance.is_zero() {
            return None;
        }
        self.month += 1;

        let interest = self.balance.mul_rate(self.monthly_rate).rounded();
        let mut payment = self.monthly_payment;
        let principal = if self.month == self.term_months {
            payment = self.balance + interest;
            self.balance
        } else {
            payment - interest
        };

        self.balance = self.balance - principal;
        if !self.balance.is_positive() {
            self.balance = Money::ZERO;
        }

        Some(ScheduleRow {
            month: self.month,
            payment,
            principal,
            interest,
            balance: self.balance,
        })
    }
}

/// Record of a single loan payment, split into principal and interest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoanPayment {
    id: String,
    loan_id: String,
    amount: Money,
    principal: Money,
    interest: Money,
    payment_date: NaiveDate,
}

impl LoanPayment {
    /// Fails with [`LedgerError::PaymentMismatch`] unless
    /// `principal + interest` reconstructs `amount` within one minimum unit.
    pub(crate) fn new(
        id: String,
        loan_id: String,
        amount: Money,
        principal: Money,
        interest: Money,
        payment_date: NaiveDate,
    ) -> Result<Self, LedgerError> {
        if (principal + interest - amount).abs() >= Money::min_unit() {
            return Err(LedgerError::PaymentMismatch {
                amount,
                principal,
                interest,
            });
        }
        Ok(Self {
            id,
            loan_id,
            amount,
            principal,
            interest,
            payment_date,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Identifier of the owning loan (a non-owning back-reference).
    pub fn loan_id(&self) -> &str {
        &self.loan_id
    }

    pub fn amount(&self) -> Money {
        self.amount
    }

    pub fn principal(&self) -> Money {
        self.principal
    }

    pub fn interest(&self) -> Money {
        self.interest
    }

    pub fn payment_date(&self) -> NaiveDate {
        self.payment_date
    }
}
