//! Fixed-point amounts and decimal <-> smallest-unit conversion.

use crate::error::AmountError;
use num_bigint::{BigInt, Sign};
use num_traits::{Signed, ToPrimitive, Zero};
use serde::{Serialize, Serializer};
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

/// Decimal places of the native currency (1 HBAR = 10^8 tinybars).
pub const NATIVE_DECIMALS: u8 = 8;

/// Exponents beyond this are rejected rather than expanded.
const MAX_EXPONENT: i64 = 4096;

fn pow10(exp: u32) -> BigInt {
    BigInt::from(10u8).pow(exp)
}

/// Converts decimal text into an integer amount of smallest units.
///
/// Accepts an optional sign, digits with an optional fraction and an
/// optional `e`/`E` exponent (`"0.000005"`, `"5e-6"`, `"12."`). The result is
/// `round(value * 10^decimals)`, rounding half away from zero when the text
/// carries more fractional digits than `decimals`.
pub fn to_smallest_unit(amount: &str, decimals: u8) -> Result<BigInt, AmountError> {
    let (negative, unsigned) = match amount.as_bytes().first() {
        Some(b'-') => (true, &amount[1..]),
        Some(b'+') => (false, &amount[1..]),
        _ => (false, amount),
    };

    let (mantissa, exponent) = match unsigned.find(['e', 'E']) {
        Some(index) => {
            let exponent: i64 = unsigned[index + 1..]
                .parse()
                .map_err(|_| AmountError::invalid(amount))?;
            (&unsigned[..index], exponent)
        }
        None => (unsigned, 0),
    };
    if exponent.abs() > MAX_EXPONENT {
        return Err(AmountError::invalid(amount));
    }

    let (integer, fraction) = mantissa.split_once('.').unwrap_or((mantissa, ""));
    let all_digits = |part: &str| part.bytes().all(|b| b.is_ascii_digit());
    if (integer.is_empty() && fraction.is_empty()) || !all_digits(integer) || !all_digits(fraction)
    {
        return Err(AmountError::invalid(amount));
    }

    let digits = format!("{integer}{fraction}");
    let magnitude: BigInt = digits
        .parse()
        .map_err(|_| AmountError::invalid(amount))?;

    // value = magnitude * 10^(exponent - fraction_len)
    let shift = i64::from(decimals) + exponent - fraction.len() as i64;
    let scaled = if shift >= 0 {
        magnitude * pow10(shift as u32)
    } else {
        let divisor = pow10(shift.unsigned_abs() as u32);
        let (quotient, remainder) = (&magnitude / &divisor, &magnitude % &divisor);
        if remainder * 2u8 >= divisor {
            quotient + 1u8
        } else {
            quotient
        }
    };

    Ok(if negative { -scaled } else { scaled })
}

/// Renders a smallest-unit integer as decimal text.
///
/// Exact; trailing fractional zeros are trimmed and whole numbers carry no
/// decimal point.
pub fn to_decimal(value: &BigInt, decimals: u8) -> String {
    let divisor = pow10(u32::from(decimals));
    let magnitude = value.abs();
    let (whole, remainder) = (&magnitude / &divisor, &magnitude % &divisor);
    let sign = if value.sign() == Sign::Minus { "-" } else { "" };

    if remainder.is_zero() {
        return format!("{sign}{whole}");
    }

    let fraction = format!("{:0>width$}", remainder.to_string(), width = usize::from(decimals));
    format!("{sign}{whole}.{}", fraction.trim_end_matches('0'))
}

/// An amount of some asset held as smallest units plus a decimals exponent.
#[derive(Clone, Debug)]
pub struct TokenAmount {
    value: BigInt,
    decimals: u8,
}

impl TokenAmount {
    /// Creates an amount from smallest units.
    pub fn new(value: impl Into<BigInt>, decimals: u8) -> Self {
        Self {
            value: value.into(),
            decimals,
        }
    }

    /// Zero at the given precision.
    pub fn zero(decimals: u8) -> Self {
        Self::new(BigInt::zero(), decimals)
    }

    /// Parses decimal text at the given precision.
    pub fn parse(text: &str, decimals: u8) -> Result<Self, AmountError> {
        to_smallest_unit(text, decimals).map(|value| Self::new(value, decimals))
    }

    /// The amount in smallest units.
    pub fn value(&self) -> &BigInt {
        &self.value
    }

    /// Number of decimal places.
    pub fn decimals(&self) -> u8 {
        self.decimals
    }

    /// Magnitude of the amount.
    pub fn abs(&self) -> Self {
        Self::new(self.value.abs(), self.decimals)
    }

    /// Whether the amount is strictly greater than zero.
    pub fn is_positive(&self) -> bool {
        self.value.is_positive()
    }

    /// Smallest units as the ledger's signed 64-bit amount.
    pub fn to_i64(&self) -> Result<i64, AmountError> {
        self.value.to_i64().ok_or_else(|| AmountError::OutOfRange {
            value: self.value.to_string(),
        })
    }

    /// Drops trailing zero digits so equal amounts share one representation.
    fn normalized(&self) -> (BigInt, u8) {
        let ten = BigInt::from(10u8);
        let mut value = self.value.clone();
        let mut decimals = self.decimals;
        while decimals > 0 && !value.is_zero() && (&value % &ten).is_zero() {
            value /= &ten;
            decimals -= 1;
        }
        if value.is_zero() {
            decimals = 0;
        }
        (value, decimals)
    }
}

impl fmt::Display for TokenAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&to_decimal(&self.value, self.decimals))
    }
}

impl PartialEq for TokenAmount {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for TokenAmount {}

impl PartialOrd for TokenAmount {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for TokenAmount {
    fn cmp(&self, other: &Self) -> Ordering {
        match self.decimals.cmp(&other.decimals) {
            Ordering::Less => {
                let scale = pow10(u32::from(other.decimals - self.decimals));
                (&self.value * scale).cmp(&other.value)
            }
            Ordering::Greater => {
                let scale = pow10(u32::from(self.decimals - other.decimals));
                self.value.cmp(&(&other.value * scale))
            }
            Ordering::Equal => self.value.cmp(&other.value),
        }
    }
}

impl Hash for TokenAmount {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.normalized().hash(state);
    }
}

impl Serialize for TokenAmount {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
