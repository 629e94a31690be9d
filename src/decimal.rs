//! Arbitrary-precision decimal numbers for decimal columns.
//!
//! A [`Decimal`] is an unscaled [`BigInt`] mantissa plus a base-10 scale, so
//! `12.50` is stored as mantissa `1250`, scale `2`. Parsing keeps the scale of
//! the input text, which makes parse/format an exact inverse.

use num_bigint::{BigInt, Sign};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use crate::{Error, Result};

/// An exact decimal number.
///
/// # Examples
///
/// ```rust
/// use flatfile::Decimal;
///
/// let price: Decimal = "12.50".parse().unwrap();
/// assert_eq!(price.scale(), 2);
/// assert_eq!(price.to_string(), "12.50");
/// assert_eq!(price, "12.5".parse().unwrap());
/// ```
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Decimal {
    mantissa: BigInt,
    scale: u32,
}

impl Decimal {
    /// Creates a decimal equal to `mantissa * 10^-scale`.
    #[must_use]
    pub fn new(mantissa: impl Into<BigInt>, scale: u32) -> Self {
        Decimal {
            mantissa: mantissa.into(),
            scale,
        }
    }

    /// Number of digits after the decimal point.
    #[inline]
    #[must_use]
    pub const fn scale(&self) -> u32 {
        self.scale
    }

    #[inline]
    #[must_use]
    pub fn mantissa(&self) -> &BigInt {
        &self.mantissa
    }

    #[must_use]
    pub fn is_negative(&self) -> bool {
        self.mantissa.sign() == Sign::Minus
    }

    /// Returns the same number expressed with `scale` fractional digits.
    ///
    /// Reducing the scale rounds half away from zero.
    #[must_use]
    pub fn rescale(&self, scale: u32) -> Decimal {
        match scale.cmp(&self.scale) {
            Ordering::Equal => self.clone(),
            Ordering::Greater => Decimal {
                mantissa: &self.mantissa * pow10(scale - self.scale),
                scale,
            },
            Ordering::Less => {
                let divisor = pow10(self.scale - scale);
                let half = &divisor / 2u32;
                let magnitude = BigInt::from_biguint(Sign::Plus, self.mantissa.magnitude().clone());
                let rounded = (magnitude + half) / divisor;
                let mantissa = if self.is_negative() { -rounded } else { rounded };
                Decimal { mantissa, scale }
            }
        }
    }

    /// Lossy conversion to `f64`.
    #[must_use]
    pub fn to_f64(&self) -> f64 {
        self.to_string().parse().unwrap_or(f64::NAN)
    }
}

fn pow10(exponent: u32) -> BigInt {
    BigInt::from(10u8).pow(exponent)
}

impl FromStr for Decimal {
    type Err = Error;

    fn from_str(text: &str) -> Result<Self> {
        let trimmed = text.trim();
        let (negative, unsigned) = match trimmed.as_bytes().first() {
            Some(b'-') => (true, &trimmed[1..]),
            Some(b'+') => (false, &trimmed[1..]),
            _ => (false, trimmed),
        };
        let (whole, fraction) = match unsigned.split_once('.') {
            Some((whole, fraction)) => (whole, fraction),
            None => (unsigned, ""),
        };
        if whole.is_empty() && fraction.is_empty() {
            return Err(Error::conversion(text, "decimal", "no digits"));
        }
        if !whole.bytes().chain(fraction.bytes()).all(|b| b.is_ascii_digit()) {
            return Err(Error::conversion(text, "decimal", "invalid digit"));
        }

        let digits = format!("{}{}", whole, fraction);
        let magnitude = BigInt::parse_bytes(digits.as_bytes(), 10)
            .ok_or_else(|| Error::conversion(text, "decimal", "invalid digit"))?;
        let scale = u32::try_from(fraction.len())
            .map_err(|_| Error::conversion(text, "decimal", "too many fractional digits"))?;
        Ok(Decimal {
            mantissa: if negative { -magnitude } else { magnitude },
            scale,
        })
    }
}

impl fmt::Display for Decimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let digits = self.mantissa.magnitude().to_string();
        let sign = if self.is_negative() { "-" } else { "" };
        let scale = self.scale as usize;
        if scale == 0 {
            return write!(f, "{}{}", sign, digits);
        }
        let padded = if digits.len() <= scale {
            format!("{}{}", "0".repeat(scale - digits.len() + 1), digits)
        } else {
            digits
        };
        let (whole, fraction) = padded.split_at(padded.len() - scale);
        write!(f, "{}{}.{}", sign, whole, fraction)
    }
}

impl PartialEq for Decimal {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Decimal {}

impl PartialOrd for Decimal {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Decimal {
    fn cmp(&self, other: &Self) -> Ordering {
        let scale = self.scale.max(other.scale);
        self.rescale(scale).mantissa.cmp(&other.rescale(scale).mantissa)
    }
}

impl From<i64> for Decimal {
    fn from(value: i64) -> Self {
        Decimal::new(value, 0)
    }
}
