//! Amount type for handling monetary values in Brazilian reais.
//!
//! Staff type amounts the way they are written on an invoice, e.g. `R$ 2.400,00`, where `.`
//! groups thousands and `,` separates the cents. The stores, on the other hand, hold plain
//! decimals such as `2400.00`. `Amount` parses the former with `FromStr`, and reads and writes
//! the latter through serde.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::error::Error;
use std::fmt;
use std::fmt::{Debug, Display, Formatter};
use std::ops::{Add, Sub};
use std::str::FromStr;

/// The currency symbol printed in front of formatted amounts.
const CURRENCY: &str = "R$";

/// Represents an amount of money in reais.
///
/// # Examples
///
/// Parsing what a user typed:
/// ```
/// # use locauto::model::Amount;
/// # use std::str::FromStr;
/// let amount = Amount::from_str("R$ 2.400,00").unwrap();
/// assert_eq!(amount.to_string(), "R$ 2.400,00");
/// assert_eq!(amount.plain(), "2400.00");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Amount {
    value: Decimal,
}

impl Amount {
    pub const ZERO: Amount = Amount::new(Decimal::ZERO);

    pub const fn new(value: Decimal) -> Self {
        Self { value }
    }

    /// Rounds to whole cents, half away from zero. Every parsed amount goes through this.
    fn cents(value: Decimal) -> Self {
        let rounded = value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
        // "-0,001" is zero, not negative zero
        Self::new(if rounded.is_zero() { Decimal::ZERO } else { rounded })
    }

    /// Returns the underlying Decimal value.
    pub fn value(&self) -> Decimal {
        self.value
    }

    pub fn is_zero(&self) -> bool {
        self.value.is_zero()
    }

    /// Returns true if the amount is below zero. Zero is neither positive nor negative.
    pub fn is_negative(&self) -> bool {
        !self.is_zero() && self.value.is_sign_negative()
    }

    /// The amount with two decimal places and no grouping, as stored in the CSV files.
    pub fn plain(&self) -> String {
        format!("{:.2}", self.value)
    }

    /// The amount in Brazilian notation without the currency symbol, e.g. `-1.234,50`.
    pub fn brl(&self) -> String {
        let sign = if self.is_negative() { "-" } else { "" };
        let plain = format!("{:.2}", self.value.abs());
        let (int_part, cents) = plain.split_once('.').unwrap_or((plain.as_str(), "00"));

        let digits: Vec<char> = int_part.chars().collect();
        let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
        for (ix, c) in digits.iter().enumerate() {
            if ix > 0 && (digits.len() - ix) % 3 == 0 {
                grouped.push('.');
            }
            grouped.push(*c);
        }
        format!("{sign}{grouped},{cents}")
    }

    /// Parses a plain decimal as written to the stores. An empty cell reads as zero.
    pub fn from_plain(s: &str) -> Result<Self, AmountError> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Ok(Amount::ZERO);
        }
        Decimal::from_str(trimmed)
            .map(Amount::cents)
            .map_err(|source| AmountError::new(s, source))
    }
}

/// The text could not be converted into an amount.
pub struct AmountError {
    text: String,
    source: rust_decimal::Error,
}

impl AmountError {
    fn new(text: &str, source: rust_decimal::Error) -> Self {
        Self {
            text: text.to_string(),
            source,
        }
    }
}

impl Debug for AmountError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "AmountError({:?}, {:?})", self.text, self.source)
    }
}

impl Display for AmountError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "Invalid currency value '{}': {}", self.text, self.source)
    }
}

impl std::error::Error for AmountError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        Some(&self.source)
    }
}

impl FromStr for Amount {
    type Err = AmountError;

    /// Parses Brazilian notation: an optional `R$`, `.` thousands separators and a `,` before
    /// the cents. `2.400,00`, `R$ 2.400,00`, `2400,5` and `2400` are all accepted.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut negative = false;
        let mut rest = s.trim();

        // The sign may come before or after the currency symbol: "-R$ 5,00" or "R$ -5,00"
        if let Some(after_minus) = rest.strip_prefix('-') {
            negative = true;
            rest = after_minus.trim_start();
        }
        rest = rest.strip_prefix(CURRENCY).unwrap_or(rest).trim();
        if !negative {
            if let Some(after_minus) = rest.strip_prefix('-') {
                negative = true;
                rest = after_minus.trim_start();
            }
        }

        let normalized = rest.replace('.', "").replace(',', ".");
        let value = Decimal::from_str(&normalized).map_err(|source| AmountError::new(s, source))?;
        Ok(Amount::cents(if negative { -value } else { value }))
    }
}

impl Display for Amount {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{CURRENCY} {}", self.brl())
    }
}

impl Serialize for Amount {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.plain())
    }
}

impl<'de> Deserialize<'de> for Amount {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Amount::from_plain(&s).map_err(serde::de::Error::custom)
    }
}

impl From<Decimal> for Amount {
    fn from(value: Decimal) -> Self {
        Amount::new(value)
    }
}

impl From<Amount> for Decimal {
    fn from(amount: Amount) -> Self {
        amount.value()
    }
}

impl Add for Amount {
    type Output = Amount;

    fn add(self, rhs: Self) -> Self::Output {
        Amount::new(self.value + rhs.value)
    }
}

impl Sub for Amount {
    type Output = Amount;

    fn sub(self, rhs: Self) -> Self::Output {
        Amount::new(self.value - rhs.value)
    }
}

impl std::iter::Sum for Amount {
    fn sum<I: Iterator<Item = Amount>>(iter: I) -> Self {
        iter.fold(Amount::ZERO, |acc, a| acc + a)
    }
}
