use std::iter::Sum;
use std::ops::{Add, AddAssign, Neg, Sub, SubAssign};
use std::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::error::LedgerError;

/// Exact fixed-precision monetary value.
///
/// Wraps a [`Decimal`] and is never constructed from binary floats, so every
/// balance, payment and rate computation in the engine is free of
/// representation error. Full precision is kept internally; [`Money::rounded`]
/// quantizes to two fractional digits with banker's rounding and is applied
/// only where an amount crosses an output boundary.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct Money(Decimal);

impl Money {
    /// Display and rounding scale used everywhere amounts are quantized.
    pub const SCALE: u32 = 2;

    pub const ZERO: Money = Money(Decimal::ZERO);

    /// Wrap a decimal value as-is, without rounding.
    pub fn new(value: Decimal) -> Self {
        Money(value)
    }

    /// Construct from an exact integer number of cents.
    pub fn from_cents(cents: i64) -> Self {
        Money(Decimal::new(cents, Self::SCALE))
    }

    /// Parse a decimal-string representation.
    ///
    /// Fails with [`LedgerError::InvalidAmount`] when the text is not an
    /// exact decimal.
    pub fn parse(text: &str) -> Result<Self, LedgerError> {
        Decimal::from_str(text)
            .map(Money)
            .map_err(|_| LedgerError::InvalidAmount {
                amount: text.to_string(),
            })
    }

    /// The smallest representable unit at [`Money::SCALE`] (0.01).
    pub fn min_unit() -> Self {
        Money(Decimal::new(1, Self::SCALE))
    }

    /// Quantize to [`Money::SCALE`] fractional digits using banker's rounding.
    pub fn rounded(self) -> Self {
        Money(
            self.0
                .round_dp_with_strategy(Self::SCALE, RoundingStrategy::MidpointNearestEven),
        )
    }

    /// Multiply by a fractional rate. The result is deliberately unrounded.
    pub fn mul_rate(self, rate: Decimal) -> Self {
        Money(self.0 * rate)
    }

    pub fn abs(self) -> Self {
        Money(self.0.abs())
    }

    pub fn is_zero(self) -> bool {
        self.0.is_zero()
    }

    pub fn is_positive(self) -> bool {
        self.0 > Decimal::ZERO
    }

    /// Number of fractional digits in the underlying representation.
    pub fn scale(self) -> u32 {
        self.0.scale()
    }

    pub fn as_decimal(self) -> Decimal {
        self.0
    }
}

impl From<Decimal> for Money {
    fn from(value: Decimal) -> Self {
        Money(value)
    }
}

impl FromStr for Money {
    type Err = LedgerError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        Money::parse(text)
    }
}

impl Add for Money {
    type Output = Money;

    fn add(self, rhs: Money) -> Money {
        Money(self.0 + rhs.0)
    }
}

impl Sub for Money {
    type Output = Money;

    fn sub(self, rhs: Money) -> Money {
        Money(self.0 - rhs.0)
    }
}

impl Neg for Money {
    type Output = Money;

    fn neg(self) -> Money {
        Money(-self.0)
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, rhs: Money) {
        self.0 += rhs.0;
    }
}

impl SubAssign for Money {
    fn sub_assign(&mut self, rhs: Money) {
        self.0 -= rhs.0;
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Money {
        iter.fold(Money::ZERO, Add::add)
    }
}

impl std::fmt::Display for Money {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

/// Serialize with exactly 2 decimal places.
impl Serialize for Money {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&format!("{self}"))
    }
}

impl<'de> Deserialize<'de> for Money {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        Money::parse(&text).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_parse_valid_decimal() {
        let money = Money::parse("1234.56").unwrap();
        assert_eq!(money, Money::new(dec!(1234.56)));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(Money::parse("12.3.4").is_err());
        assert!(Money::parse("abc").is_err());
        assert!(Money::parse("").is_err());
    }

    #[test]
    fn test_from_cents() {
        assert_eq!(Money::from_cents(5000), Money::new(dec!(50.00)));
        assert_eq!(Money::from_cents(1), Money::min_unit());
        assert_eq!(Money::from_cents(-2500), Money::new(dec!(-25.00)));
    }

    #[test]
    fn test_bankers_rounding_at_midpoint() {
        // Midpoints round to even
        assert_eq!(Money::new(dec!(2.345)).rounded(), Money::new(dec!(2.34)));
        assert_eq!(Money::new(dec!(2.355)).rounded(), Money::new(dec!(2.36)));
        // Non-midpoints round normally
        assert_eq!(Money::new(dec!(66.6666)).rounded(), Money::new(dec!(66.67)));
        assert_eq!(Money::new(dec!(66.664)).rounded(), Money::new(dec!(66.66)));
    }

    #[test]
    fn test_arithmetic() {
        let a = Money::new(dec!(100.50));
        let b = Money::new(dec!(0.25));
        assert_eq!(a + b, Money::new(dec!(100.75)));
        assert_eq!(a - b, Money::new(dec!(100.25)));
        assert_eq!(-b, Money::new(dec!(-0.25)));
        assert_eq!((-b).abs(), b);

        let mut c = a;
        c += b;
        c -= b;
        assert_eq!(c, a);
    }

    #[test]
    fn test_mul_rate_is_unrounded() {
        let interest = Money::new(dec!(10000)).mul_rate(dec!(0.08) / dec!(12));
        assert!(interest.scale() > Money::SCALE);
        assert_eq!(interest.rounded(), Money::new(dec!(66.67)));
    }

    #[test]
    fn test_sum() {
        let total: Money = [Money::from_cents(100), Money::from_cents(-30), Money::from_cents(5)]
            .into_iter()
            .sum();
        assert_eq!(total, Money::from_cents(75));
    }

    #[test]
    fn test_display_pads_to_two_digits() {
        assert_eq!(Money::new(dec!(100)).to_string(), "100.00");
        assert_eq!(Money::new(dec!(0.5)).to_string(), "0.50");
        assert_eq!(Money::new(dec!(-3.1)).to_string(), "-3.10");
    }

    #[test]
    fn test_comparison_ignores_scale() {
        assert_eq!(Money::parse("100").unwrap(), Money::parse("100.00").unwrap());
        assert!(Money::parse("100.01").unwrap() > Money::parse("100").unwrap());
    }
}
