//! Fixed-scale monetary and percentage values.
//!
//! Every monetary amount produced by a formula in this system carries exactly
//! two fractional digits, rounded half-up (midpoint away from zero). The
//! policy lives here and nowhere else, so expense totals and the commissions
//! computed from them always reconcile.

use core::ops::{Add, AddAssign, Sub};

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};
use crate::value_object::ValueObject;

/// Fractional digits carried by every monetary and percentage value.
pub const MONEY_SCALE: u32 = 2;

fn round_fixed(value: Decimal) -> Decimal {
    let mut rounded =
        value.round_dp_with_strategy(MONEY_SCALE, RoundingStrategy::MidpointAwayFromZero);
    // Persisted field shape is fixed two-decimal precision, so pad short
    // scales ("100" becomes "100.00").
    rounded.rescale(MONEY_SCALE);
    rounded
}

/// A monetary amount with exactly two fractional digits.
///
/// Persisted amount fields hold up to 15 integer digits and are non-negative;
/// computed values (net payable) may go negative and are deliberately not
/// clamped.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Amount(Decimal);

impl Amount {
    pub const ZERO: Amount = Amount(Decimal::ZERO);

    /// Build an amount, rounding to the fixed scale half-up.
    pub fn new(value: Decimal) -> Self {
        Self(round_fixed(value))
    }

    pub fn as_decimal(&self) -> Decimal {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    pub fn is_negative(&self) -> bool {
        self.0.is_sign_negative() && !self.0.is_zero()
    }

    /// Apply a percentage rate: `self * rate / 100`, rounded half-up.
    ///
    /// The division by 100 happens before the final rounding, never after,
    /// so sub-cent intermediate precision is kept until the single rounding
    /// step.
    pub fn apply_rate(&self, rate: Rate) -> Amount {
        Amount(round_fixed(self.0 * rate.as_decimal() / Decimal::ONE_HUNDRED))
    }

    /// Guard for persisted amount fields, which must not be negative.
    pub fn ensure_non_negative(&self, field: &str) -> DomainResult<()> {
        if self.is_negative() {
            return Err(DomainError::validation(format!(
                "{field} must not be negative (got {self})"
            )));
        }
        Ok(())
    }
}

impl ValueObject for Amount {}

impl Add for Amount {
    type Output = Amount;

    fn add(self, rhs: Amount) -> Amount {
        Amount(self.0 + rhs.0)
    }
}

impl AddAssign for Amount {
    fn add_assign(&mut self, rhs: Amount) {
        self.0 += rhs.0;
    }
}

impl Sub for Amount {
    type Output = Amount;

    fn sub(self, rhs: Amount) -> Amount {
        Amount(self.0 - rhs.0)
    }
}

impl core::fmt::Display for Amount {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

/// A percentage with exactly two fractional digits (`20.00` means 20%).
///
/// Holds up to 3 integer digits. Commission rates are bounded to [0, 100];
/// VAT rates are only bounded below.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Rate(Decimal);

impl Rate {
    pub const ZERO: Rate = Rate(Decimal::ZERO);

    /// Build a rate, rounding to the fixed scale half-up.
    pub fn new(value: Decimal) -> Self {
        Self(round_fixed(value))
    }

    /// Standard VAT rate (20.00%) applied when a record does not specify one.
    pub fn standard_vat() -> Rate {
        Rate(Decimal::new(2000, 2))
    }

    pub fn as_decimal(&self) -> Decimal {
        self.0
    }

    /// Guard for rates bounded to [0, 100] (commission rates).
    pub fn ensure_percentage(&self, field: &str) -> DomainResult<()> {
        if self.0 < Decimal::ZERO || self.0 > Decimal::ONE_HUNDRED {
            return Err(DomainError::validation(format!(
                "{field} must be within [0, 100] (got {self})"
            )));
        }
        Ok(())
    }

    /// Guard for rates bounded below only (VAT rates).
    pub fn ensure_non_negative(&self, field: &str) -> DomainResult<()> {
        if self.0 < Decimal::ZERO {
            return Err(DomainError::validation(format!(
                "{field} must not be negative (got {self})"
            )));
        }
        Ok(())
    }
}

impl ValueObject for Rate {}

impl core::fmt::Display for Rate {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn amount_rounds_half_up_on_construction() {
        assert_eq!(Amount::new(dec!(1.005)).as_decimal(), dec!(1.01));
        assert_eq!(Amount::new(dec!(1.004)).as_decimal(), dec!(1.00));
        assert_eq!(Amount::new(dec!(2.675)).as_decimal(), dec!(2.68));
    }

    #[test]
    fn apply_rate_rounds_half_up() {
        let amount = Amount::new(dec!(1000.00));
        assert_eq!(amount.apply_rate(Rate::new(dec!(20.00))), Amount::new(dec!(200.00)));

        let odd = Amount::new(dec!(333.33));
        assert_eq!(odd.apply_rate(Rate::new(dec!(20.00))), Amount::new(dec!(66.67)));
    }

    #[test]
    fn apply_rate_divides_before_rounding() {
        // 10.00 * 0.25 / 100 = 0.025; rounding the fraction first would
        // collapse it to zero.
        let amount = Amount::new(dec!(10.00));
        assert_eq!(amount.apply_rate(Rate::new(dec!(0.25))), Amount::new(dec!(0.03)));
    }

    #[test]
    fn subtraction_may_go_negative() {
        let diff = Amount::new(dec!(100.00)) - Amount::new(dec!(150.00));
        assert!(diff.is_negative());
        assert_eq!(diff, Amount::new(dec!(-50.00)));
    }

    #[test]
    fn percentage_guard_bounds_zero_to_hundred() {
        assert!(Rate::new(dec!(0.00)).ensure_percentage("rate").is_ok());
        assert!(Rate::new(dec!(100.00)).ensure_percentage("rate").is_ok());
        assert!(Rate::new(dec!(100.01)).ensure_percentage("rate").is_err());
        assert!(Rate::new(dec!(-0.01)).ensure_percentage("rate").is_err());
    }

    #[test]
    fn standard_vat_is_twenty_percent() {
        assert_eq!(Rate::standard_vat(), Rate::new(dec!(20.00)));
    }

    #[test]
    fn amounts_serialize_at_fixed_scale() {
        let json = serde_json::to_string(&Amount::new(dec!(1200.00))).unwrap();
        assert_eq!(json, "\"1200.00\"");
    }
}
