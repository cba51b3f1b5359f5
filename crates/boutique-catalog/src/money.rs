//! Exact currency amounts
//!
//! Amounts are held as an unsigned count of minor units (centimes). On the
//! wire they travel as a plain JSON number in major units, which is what the
//! hosted `numeric` columns and the persisted cart snapshot both use.

use serde::de::{self, Deserializer, Visitor};
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;
use std::iter::Sum;
use std::ops::Add;

const MINOR_PER_MAJOR: u64 = 100;

/// Non-negative amount in minor currency units
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Money(u64);

impl Money {
    /// Zero amount
    pub const ZERO: Self = Self(0);

    /// Create from minor units
    #[inline]
    #[must_use]
    pub const fn from_minor(minor: u64) -> Self {
        Self(minor)
    }

    /// Create from whole major units
    #[inline]
    #[must_use]
    pub const fn from_major(major: u64) -> Self {
        Self(major.saturating_mul(MINOR_PER_MAJOR))
    }

    /// Convert a decimal major-unit amount, rounding to the nearest minor unit
    ///
    /// Returns `None` for negative or non-finite input.
    #[must_use]
    pub fn from_decimal(major: f64) -> Option<Self> {
        if !major.is_finite() || major < 0.0 {
            return None;
        }
        let minor = (major * MINOR_PER_MAJOR as f64).round();
        if minor > u64::MAX as f64 {
            return None;
        }
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        Some(Self(minor as u64))
    }

    /// Minor units
    #[inline]
    #[must_use]
    pub const fn minor(self) -> u64 {
        self.0
    }

    /// Whole major units, truncated
    #[inline]
    #[must_use]
    pub const fn major(self) -> u64 {
        self.0 / MINOR_PER_MAJOR
    }

    /// Decimal major units
    #[inline]
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn as_decimal(self) -> f64 {
        self.0 as f64 / MINOR_PER_MAJOR as f64
    }

    /// Whether the amount is zero
    #[inline]
    #[must_use]
    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    /// Amount multiplied by a quantity, saturating at the maximum
    #[inline]
    #[must_use]
    pub const fn times(self, quantity: u32) -> Self {
        Self(self.0.saturating_mul(quantity as u64))
    }

    /// Saturating addition
    #[inline]
    #[must_use]
    pub const fn saturating_add(self, other: Self) -> Self {
        Self(self.0.saturating_add(other.0))
    }
}

impl Add for Money {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        self.saturating_add(rhs)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Self::saturating_add)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let cents = self.0 % MINOR_PER_MAJOR;
        if cents == 0 {
            write!(f, "{} DZD", self.major())
        } else {
            write!(f, "{}.{cents:02} DZD", self.major())
        }
    }
}

impl Serialize for Money {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if self.0 % MINOR_PER_MAJOR == 0 {
            serializer.serialize_u64(self.major())
        } else {
            serializer.serialize_f64(self.as_decimal())
        }
    }
}

struct MoneyVisitor;

impl Visitor<'_> for MoneyVisitor {
    type Value = Money;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a non-negative amount in major units")
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Money, E> {
        v.checked_mul(MINOR_PER_MAJOR)
            .map(Money)
            .ok_or_else(|| E::custom("amount out of range"))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Money, E> {
        u64::try_from(v)
            .map_err(|_| E::custom("amount must not be negative"))
            .and_then(|v| self.visit_u64(v))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Money, E> {
        Money::from_decimal(v).ok_or_else(|| E::custom("amount must be finite and non-negative"))
    }

    // `numeric` columns can come back as strings from some endpoints
    fn visit_str<E: de::Error>(self, v: &str) -> Result<Money, E> {
        let parsed: f64 = v.trim().parse().map_err(E::custom)?;
        self.visit_f64(parsed)
    }
}

impl<'de> Deserialize<'de> for Money {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(MoneyVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn money_units() {
        let m = Money::from_major(1000);
        assert_eq!(m.minor(), 100_000);
        assert_eq!(m.major(), 1000);
        assert_eq!(m.times(3), Money::from_major(3000));
    }

    #[test]
    fn money_display() {
        assert_eq!(Money::from_major(4500).to_string(), "4500 DZD");
        assert_eq!(Money::from_minor(150_050).to_string(), "1500.50 DZD");
    }

    #[test]
    fn money_sum_saturates() {
        let total: Money = [Money::from_minor(u64::MAX), Money::from_minor(1)]
            .iter()
            .sum();
        assert_eq!(total.minor(), u64::MAX);
    }

    #[test]
    fn money_serde_major_units() {
        assert_eq!(serde_json::to_string(&Money::from_major(1000)).unwrap(), "1000");
        assert_eq!(serde_json::to_string(&Money::from_minor(150_050)).unwrap(), "1500.5");

        let m: Money = serde_json::from_str("1500.5").unwrap();
        assert_eq!(m.minor(), 150_050);
        let m: Money = serde_json::from_str(r#""2500.00""#).unwrap();
        assert_eq!(m, Money::from_major(2500));
    }

    #[test]
    fn money_rejects_negative() {
        assert!(serde_json::from_str::<Money>("-1").is_err());
        assert!(serde_json::from_str::<Money>("-0.5").is_err());
        assert!(Money::from_decimal(f64::NAN).is_none());
    }

    proptest! {
        #[test]
        fn prop_money_json_preserves_minor_units(minor in 0u64..10_000_000_000) {
            let m = Money::from_minor(minor);
            let back: Money = serde_json::from_str(&serde_json::to_string(&m).unwrap()).unwrap();
            prop_assert_eq!(back, m);
        }
    }
}
