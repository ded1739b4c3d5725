//! Fixed-precision monetary amounts backed by rust_decimal.
//!
//! A [`Money`] value never carries more fractional digits than its [`Unit`]
//! allows. Every public construction path validates this, same-unit addition
//! and subtraction preserve it. There is no multiplication
//! or division operator.

use crate::domain::unit::{Dollar, Satoshi, SymbolPosition, Unit};
use crate::error::MoneyError;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;
use std::iter::Sum;
use std::marker::PhantomData;
use std::ops::{Add, Neg, Sub};
use std::str::FromStr;

/// Amount in US dollars, at most two decimal places.
pub type Usd = Money<Dollar>;

/// Amount in satoshis, always integral.
pub type Sats = Money<Satoshi>;

/// An immutable amount of money in unit `U`.
///
/// Serializes to a bare JSON number carrying the exact decimal text.
/// Deserialization accepts only JSON numbers and checks the precision of the
/// literal as written, before any conversion, so nothing is rounded on the
/// way in.
///
/// ```
/// use monetary::domain::Usd;
///
/// let price: Usd = "10.25".parse().unwrap();
/// let fee = Usd::from_minor_units(15);
/// assert_eq!((price + fee).to_string(), "10.40");
/// assert!("10.001".parse::<Usd>().is_err());
/// ```
///
/// Amounts in different units do not mix:
///
/// ```compile_fail
/// use monetary::domain::{Sats, Usd};
///
/// let total = Usd::from(1) + Sats::from(1);
/// ```
///
/// Money cannot be multiplied or divided, by money or by a scalar:
///
/// ```compile_fail
/// use monetary::domain::Usd;
///
/// let area = Usd::from(2) * Usd::from(3);
/// ```
///
/// ```compile_fail
/// use monetary::domain::Usd;
///
/// let third = Usd::from(10) / 3;
/// ```
///
/// Getting the raw decimal back out is never implicit:
///
/// ```compile_fail
/// use monetary::domain::Usd;
/// use rust_decimal::Decimal;
///
/// let raw: Decimal = Usd::from(2).into();
/// ```
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Money<U: Unit> {
    amount: Decimal,
    unit: PhantomData<U>,
}

/// Returns true if `value` has no digits beyond `places` fractional positions.
fn fits_precision(value: Decimal, places: u32) -> bool {
    value.normalize().scale() <= places
}

impl<U: Unit> Money<U> {
    /// The additive identity.
    pub const ZERO: Self = Self {
        amount: Decimal::ZERO,
        unit: PhantomData,
    };

    /// Create a value, rejecting magnitudes finer than the unit allows.
    ///
    /// # Errors
    /// Returns [`MoneyError::InvalidPrecision`] if `value` has more than
    /// `U::DECIMAL_PLACES` significant fractional digits.
    pub fn new(value: Decimal) -> Result<Self, MoneyError> {
        if !fits_precision(value, U::DECIMAL_PLACES) {
            return Err(MoneyError::InvalidPrecision {
                value: value.to_string(),
                unit: U::CODE,
                allowed: U::DECIMAL_PLACES,
            });
        }
        Ok(Self::from_valid(value))
    }

    /// Create a value from a count of the unit's smallest denomination
    /// (cents for [`Dollar`], satoshis for [`Satoshi`]).
    ///
    /// # Panics
    /// If the unit declares more than 28 decimal places.
    pub fn from_minor_units(minor: i64) -> Self {
        Self::from_valid(Decimal::new(minor, U::DECIMAL_PLACES))
    }

    /// Round an arbitrary decimal to the unit's precision.
    ///
    /// This is the only way to turn the result of scaling (fees, notional,
    /// conversions) back into money, so the rounding rule is always spelled
    /// out by the caller.
    pub fn from_rounded(value: Decimal, strategy: RoundingStrategy) -> Self {
        Self::from_valid(value.round_dp_with_strategy(U::DECIMAL_PLACES, strategy))
    }

    fn from_valid(amount: Decimal) -> Self {
        debug_assert!(fits_precision(amount, U::DECIMAL_PLACES));
        // Collapse -0 so it renders and hashes like 0.
        let amount = if amount.is_zero() {
            Decimal::ZERO
        } else {
            amount
        };
        Self {
            amount,
            unit: PhantomData,
        }
    }

    /// Extract the raw decimal magnitude, dropping the unit.
    pub fn to_raw_decimal(self) -> Decimal {
        self.amount
    }

    /// The amount as a count of the unit's smallest denomination, or `None`
    /// if it does not fit in an `i64`.
    pub fn to_minor_units(self) -> Option<i64> {
        let mut scaled = self.amount;
        scaled.rescale(U::DECIMAL_PLACES);
        if scaled.scale() != U::DECIMAL_PLACES {
            return None;
        }
        i64::try_from(scaled.mantissa()).ok()
    }

    /// Addition that returns `None` instead of panicking when the result
    /// cannot be represented exactly.
    pub fn checked_add(self, rhs: Self) -> Option<Self> {
        self.amount
            .checked_add(rhs.amount)
            .filter(|sum| fits_precision(*sum, U::DECIMAL_PLACES))
            .map(Self::from_valid)
    }

    /// Subtraction that returns `None` instead of panicking when the result
    /// cannot be represented exactly.
    pub fn checked_sub(self, rhs: Self) -> Option<Self> {
        self.amount
            .checked_sub(rhs.amount)
            .filter(|diff| fits_precision(*diff, U::DECIMAL_PLACES))
            .map(Self::from_valid)
    }

    pub fn is_zero(&self) -> bool {
        self.amount.is_zero()
    }

    pub fn is_positive(&self) -> bool {
        !self.is_zero() && self.amount.is_sign_positive()
    }

    pub fn is_negative(&self) -> bool {
        !self.is_zero() && self.amount.is_sign_negative()
    }

    pub fn abs(&self) -> Self {
        Self::from_valid(self.amount.abs())
    }

    /// Render with the unit's symbol, e.g. `$5.00`, `-$1.25` or `3 sat`.
    pub fn with_symbol(&self) -> String {
        let sign = if self.is_negative() { "-" } else { "" };
        let magnitude = self.abs();
        match U::SYMBOL_POSITION {
            SymbolPosition::Prefix => format!("{}{}{}", sign, U::SYMBOL, magnitude),
            SymbolPosition::Suffix => format!("{}{} {}", sign, magnitude, U::SYMBOL),
        }
    }
}

impl<U: Unit> Default for Money<U> {
    fn default() -> Self {
        Self::ZERO
    }
}

impl<U: Unit> fmt::Display for Money<U> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut rendered = self.amount;
        rendered.rescale(U::DECIMAL_PLACES);
        // Near the 28-digit limit rescale stops short of the full scale.
        let missing = U::DECIMAL_PLACES.saturating_sub(rendered.scale()) as usize;
        if missing == 0 {
            return write!(f, "{}", rendered);
        }
        let point = if rendered.scale() == 0 { "." } else { "" };
        write!(f, "{}{}{}", rendered, point, "0".repeat(missing))
    }
}

impl<U: Unit> fmt::Debug for Money<U> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Money<{}>({})", U::CODE, self)
    }
}

impl<U: Unit> FromStr for Money<U> {
    type Err = MoneyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_literal(s.trim())
    }
}

impl<U: Unit> TryFrom<Decimal> for Money<U> {
    type Error = MoneyError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl<U: Unit> From<i64> for Money<U> {
    fn from(value: i64) -> Self {
        Self::from_valid(Decimal::from(value))
    }
}

impl<U: Unit> Add for Money<U> {
    type Output = Self;

    /// # Panics
    /// If the sum overflows the underlying decimal.
    fn add(self, rhs: Self) -> Self {
        self.checked_add(rhs)
            .unwrap_or_else(|| panic!("{} addition overflowed", U::CODE))
    }
}

impl<U: Unit> Sub for Money<U> {
    type Output = Self;

    /// # Panics
    /// If the difference overflows the underlying decimal.
    fn sub(self, rhs: Self) -> Self {
        self.checked_sub(rhs)
            .unwrap_or_else(|| panic!("{} subtraction overflowed", U::CODE))
    }
}

impl<U: Unit> Neg for Money<U> {
    type Output = Self;

    fn neg(self) -> Self {
        Self::from_valid(-self.amount)
    }
}

impl<U: Unit> Sum for Money<U> {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

impl<'a, U: Unit> Sum<&'a Money<U>> for Money<U> {
    fn sum<I: Iterator<Item = &'a Money<U>>>(iter: I) -> Self {
        iter.fold(Self::ZERO, |acc, m| acc + *m)
    }
}

impl<U: Unit> Serialize for Money<U> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut canonical = self.amount;
        canonical.rescale(U::DECIMAL_PLACES);
        rust_decimal::serde::arbitrary_precision::serialize(&canonical, serializer)
    }
}

impl<'de, U: Unit> Deserialize<'de> for Money<U> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        // With arbitrary_precision the number keeps the literal text verbatim.
        let number = serde_json::Number::deserialize(deserializer)?;
        parse_literal(&number.to_string()).map_err(de::Error::custom)
    }
}

/// A decimal literal reduced to its significant digits and scale.
#[derive(Debug, PartialEq, Eq)]
struct Literal {
    negative: bool,
    digits: String,
    scale: i64,
}

impl Literal {
    /// Split `-12.50e3` style text. Trailing zeros are not significant, so
    /// `10.50` has scale 1 and `100e-2` has scale 0.
    fn parse(text: &str) -> Option<Self> {
        let (negative, unsigned) = match text.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, text.strip_prefix('+').unwrap_or(text)),
        };
        let (mantissa, exponent) = match unsigned.split_once(|c: char| c == 'e' || c == 'E') {
            Some((mantissa, exponent)) => (mantissa, exponent.parse::<i64>().ok()?),
            None => (unsigned, 0),
        };
        let (int_part, frac_part) = mantissa.split_once('.').unwrap_or((mantissa, ""));
        if int_part.is_empty() && frac_part.is_empty() {
            return None;
        }
        if !int_part.bytes().chain(frac_part.bytes()).all(|b| b.is_ascii_digit()) {
            return None;
        }

        let all = format!("{}{}", int_part, frac_part);
        let leading_trimmed = all.trim_start_matches('0');
        let significant = leading_trimmed.trim_end_matches('0');
        if significant.is_empty() {
            return Some(Literal {
                negative: false,
                digits: "0".to_string(),
                scale: 0,
            });
        }
        let dropped = (leading_trimmed.len() - significant.len()) as i64;
        let scale = (frac_part.len() as i64)
            .checked_sub(exponent)?
            .checked_sub(dropped)?;
        Some(Literal {
            negative,
            digits: significant.to_string(),
            scale,
        })
    }

    /// Exact conversion; `None` if the value does not fit a `Decimal`.
    fn to_decimal(&self) -> Option<Decimal> {
        let len = self.digits.len() as i64;
        if self.scale > 28 || len - self.scale.min(0) > 29 {
            return None;
        }
        let plain = if self.scale <= 0 {
            format!("{}{}", self.digits, "0".repeat((-self.scale) as usize))
        } else if len > self.scale {
            let (int_part, frac_part) = self.digits.split_at((len - self.scale) as usize);
            format!("{}.{}", int_part, frac_part)
        } else {
            format!("0.{}{}", "0".repeat((self.scale - len) as usize), self.digits)
        };
        let sign = if self.negative { "-" } else { "" };
        Decimal::from_str_exact(&format!("{}{}", sign, plain)).ok()
    }
}

/// Validate the literal's precision from its text, then convert exactly.
fn parse_literal<U: Unit>(text: &str) -> Result<Money<U>, MoneyError> {
    let literal = Literal::parse(text)
        .ok_or_else(|| MoneyError::Parse(format!("{:?} is not a decimal literal", text)))?;
    if literal.scale > i64::from(U::DECIMAL_PLACES) {
        return Err(MoneyError::InvalidPrecision {
            value: text.to_string(),
            unit: U::CODE,
            allowed: U::DECIMAL_PLACES,
        });
    }
    let value = literal
        .to_decimal()
        .ok_or_else(|| MoneyError::Parse(format!("{:?} is out of range", text)))?;
    Money::new(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_new_accepts_allowed_precision() {
        for value in [dec!(0), dec!(10), dec!(10.5), dec!(10.50), dec!(-0.01), dec!(10.500)] {
            let usd = Usd::new(value).expect("should be valid");
            assert_eq!(usd.to_raw_decimal(), value);
        }
    }

    #[test]
    fn test_new_rejects_excess_precision() {
        let err = Usd::new(dec!(10.001)).unwrap_err();
        assert_eq!(
            err,
            MoneyError::InvalidPrecision {
                value: "10.001".to_string(),
                unit: "USD",
                allowed: 2,
            }
        );
        assert!(Sats::new(dec!(3.5)).is_err());
        assert!(Sats::new(dec!(3.0)).is_ok());
    }

    #[test]
    fn test_try_from_decimal() {
        let usd: Result<Usd, _> = dec!(1.23).try_into();
        assert!(usd.is_ok());
        let usd: Result<Usd, _> = dec!(1.234).try_into();
        assert!(usd.is_err());
    }

    #[test]
    fn test_from_str() {
        let usd: Usd = " 42.10 ".parse().unwrap();
        assert_eq!(usd, Usd::from_minor_units(4210));
        assert!(matches!("abc".parse::<Usd>(), Err(MoneyError::Parse(_))));
        assert!(matches!(
            "0.125".parse::<Usd>(),
            Err(MoneyError::InvalidPrecision { .. })
        ));
    }

    #[test]
    fn test_display_fixed_places() {
        assert_eq!(Usd::from(5).to_string(), "5.00");
        assert_eq!(Usd::new(dec!(10.5)).unwrap().to_string(), "10.50");
        assert_eq!(Usd::new(dec!(-0.07)).unwrap().to_string(), "-0.07");
        assert_eq!(Sats::from(3).to_string(), "3");
        assert_eq!(Sats::new(dec!(3.00)).unwrap().to_string(), "3");
    }

    #[test]
    fn test_negative_zero_renders_as_zero() {
        assert_eq!((-Usd::ZERO).to_string(), "0.00");
        assert_eq!(Usd::from(1) - Usd::from(1), Usd::ZERO);
        assert!(!(-Usd::ZERO).is_negative());
    }

    #[test]
    fn test_with_symbol() {
        assert_eq!(Usd::from(5).with_symbol(), "$5.00");
        assert_eq!(Usd::new(dec!(-1.25)).unwrap().with_symbol(), "-$1.25");
        assert_eq!(Sats::from(3).with_symbol(), "3 sat");
        assert_eq!(Sats::from(-3).with_symbol(), "-3 sat");
    }

    #[test]
    fn test_arithmetic() {
        let a = Usd::new(dec!(10.01)).unwrap();
        let b = Usd::new(dec!(2.5)).unwrap();
        assert_eq!(a + b, Usd::new(dec!(12.51)).unwrap());
        assert_eq!(a - b, Usd::new(dec!(7.51)).unwrap());
        assert_eq!(-a, Usd::new(dec!(-10.01)).unwrap());
        assert_eq!((b - a).abs(), a - b);
    }

    #[test]
    fn test_checked_overflow() {
        let max = Sats::new(Decimal::MAX).unwrap();
        assert!(max.checked_add(Sats::from(1)).is_none());
        assert!((-max).checked_sub(Sats::from(1)).is_none());
        assert_eq!(max.checked_sub(Sats::from(1)), Some(Sats::new(Decimal::MAX - Decimal::ONE).unwrap()));
    }

    #[test]
    #[should_panic(expected = "SAT addition overflowed")]
    fn test_add_overflow_panics() {
        let _ = Sats::new(Decimal::MAX).unwrap() + Sats::from(1);
    }

    #[test]
    fn test_sum() {
        let fees = vec![Sats::from(10), Sats::from(-3), Sats::from(100)];
        let by_ref: Sats = fees.iter().sum();
        let by_value: Sats = fees.into_iter().sum();
        assert_eq!(by_ref, Sats::from(107));
        assert_eq!(by_value, by_ref);
        assert_eq!(Vec::<Usd>::new().into_iter().sum::<Usd>(), Usd::ZERO);
    }

    #[test]
    fn test_ordering_is_exact() {
        let a = Usd::new(dec!(10.5)).unwrap();
        let b = Usd::new(dec!(10.50)).unwrap();
        let c = Usd::new(dec!(10.51)).unwrap();
        assert_eq!(a, b);
        assert!(a < c);
        assert!(c >= b);
        assert_eq!(a.max(c), c);
    }

    #[test]
    fn test_from_rounded() {
        let third = dec!(10.01) / dec!(3);
        assert_eq!(
            Usd::from_rounded(third, RoundingStrategy::MidpointNearestEven),
            Usd::new(dec!(3.34)).unwrap()
        );
        assert_eq!(
            Usd::from_rounded(third, RoundingStrategy::ToZero),
            Usd::new(dec!(3.33)).unwrap()
        );
        assert_eq!(
            Sats::from_rounded(dec!(2.5), RoundingStrategy::MidpointNearestEven),
            Sats::from(2)
        );
    }

    #[test]
    fn test_minor_units() {
        assert_eq!(Usd::from_minor_units(1050).to_string(), "10.50");
        assert_eq!(Usd::new(dec!(10.5)).unwrap().to_minor_units(), Some(1050));
        assert_eq!(Sats::from(-42).to_minor_units(), Some(-42));
        assert_eq!(Sats::new(Decimal::MAX).unwrap().to_minor_units(), None);
    }

    #[test]
    fn test_json_encodes_bare_number() {
        let usd = Usd::new(dec!(10.25)).unwrap();
        let json = serde_json::to_value(usd).unwrap();
        assert!(json.is_number());
        assert_eq!(json.to_string(), "10.25");

        let sats = serde_json::to_value(Sats::from(300)).unwrap();
        assert!(sats.is_i64());
        assert_eq!(sats.to_string(), "300");
    }

    #[test]
    fn test_json_decode_validates() {
        let usd: Usd = serde_json::from_str("10.5").unwrap();
        assert_eq!(usd, Usd::new(dec!(10.50)).unwrap());
        assert!(serde_json::from_str::<Usd>("10.001").is_err());

        let sats: Sats = serde_json::from_str("3").unwrap();
        assert_eq!(sats, Sats::from(3));
        assert!(serde_json::from_str::<Sats>("3.5").is_err());
    }

    #[test]
    fn test_json_decode_rejects_strings() {
        assert!(serde_json::from_str::<Usd>("\"10.50\"").is_err());
        assert!(serde_json::from_str::<Sats>("{\"amount\": 3}").is_err());
    }

    #[test]
    fn test_json_decode_checks_literal_before_conversion() {
        for literal in ["10.0000000000000001", "1e-30", "0.005", "1.2345e1"] {
            let err = serde_json::from_str::<Usd>(literal).unwrap_err();
            assert!(err.to_string().contains("invalid precision"), "{}: {}", literal, err);
        }
        let err = serde_json::from_str::<Sats>("12345678901234567.5").unwrap_err();
        assert!(err.to_string().contains("invalid precision"), "{}", err);
        assert!(matches!(
            "1e-30".parse::<Usd>(),
            Err(MoneyError::InvalidPrecision { .. })
        ));
    }

    #[test]
    fn test_json_decode_exponent_forms() {
        let usd: Usd = serde_json::from_str("1.25e2").unwrap();
        assert_eq!(usd, Usd::from(125));
        let usd: Usd = serde_json::from_str("100E-2").unwrap();
        assert_eq!(usd, Usd::from(1));
        let sats: Sats = serde_json::from_str("2.1e7").unwrap();
        assert_eq!(sats, Sats::from(21_000_000));
        assert!(serde_json::from_str::<Sats>("1e40").is_err());
    }

    #[test]
    fn test_json_exact_beyond_float_range() {
        let usd: Usd = "12345678901234567.89".parse().unwrap();
        let json = serde_json::to_string(&usd).unwrap();
        assert_eq!(json, "12345678901234567.89");
        assert_eq!(serde_json::from_str::<Usd>(&json).unwrap(), usd);

        let sats = Sats::new(Decimal::MAX).unwrap();
        let json = serde_json::to_string(&sats).unwrap();
        assert_eq!(json, "79228162514264337593543950335");
        assert_eq!(serde_json::from_str::<Sats>(&json).unwrap(), sats);
    }

    #[test]
    fn test_json_encodes_fixed_places() {
        assert_eq!(serde_json::to_string(&Usd::from(5)).unwrap(), "5.00");
        assert_eq!(serde_json::to_string(&Sats::new(dec!(3.0)).unwrap()).unwrap(), "3");
    }

    #[test]
    fn test_display_pads_at_capacity() {
        let max = Usd::new(Decimal::MAX).unwrap();
        assert_eq!(max.to_string(), "79228162514264337593543950335.00");
        assert_eq!(serde_json::from_str::<Usd>(&serde_json::to_string(&max).unwrap()).unwrap(), max);
    }

    #[test]
    fn test_literal_scale() {
        let scale = |text: &str| Literal::parse(text).map(|l| l.scale);
        assert_eq!(scale("10.50"), Some(1));
        assert_eq!(scale("100e-2"), Some(0));
        assert_eq!(scale("1.5e2"), Some(-1));
        assert_eq!(scale("-0.000"), Some(0));
        assert_eq!(scale("0.0100"), Some(2));
        assert_eq!(scale("1e-30"), Some(30));
        assert_eq!(scale("1_000"), None);
        assert_eq!(scale("."), None);
        assert_eq!(scale("1e"), None);
    }

    #[test]
    fn test_parse_out_of_range() {
        assert!(matches!(
            "1e40".parse::<Sats>(),
            Err(MoneyError::Parse(_))
        ));
        assert!(matches!(
            "792281625142643375935439503350".parse::<Sats>(),
            Err(MoneyError::Parse(_))
        ));
    }

    #[test]
    fn test_debug() {
        assert_eq!(format!("{:?}", Usd::from(2)), "Money<USD>(2.00)");
    }
}
