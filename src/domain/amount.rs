//! Decimal token amounts.
//!
//! Prices travel between the backend and the UI as decimal strings
//! (`"12.5"`), and sometimes as bare JSON numbers. [`TokenAmount`] keeps the
//! decimal text for display and converts to integer base units only when a
//! contract call needs them.

use std::fmt;
use std::str::FromStr;

use ethers::types::U256;
use ethers::utils::parse_units;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::MarketError;

/// Decimals of the FLOW token.
pub const FLOW_DECIMALS: u32 = 18;

/// A non-negative decimal amount of FLOW.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TokenAmount(String);

impl TokenAmount {
    /// Parses a decimal amount such as `"20"`, `"0.125"` or `".5"`.
    ///
    /// # Errors
    ///
    /// Returns [`MarketError::InvalidAmount`] if the text is empty, signed,
    /// or not a plain decimal number.
    pub fn parse(raw: &str) -> Result<Self, MarketError> {
        let text = raw.trim();
        let mut digits = 0usize;
        let mut dots = 0usize;
        for c in text.chars() {
            match c {
                '0'..='9' => digits += 1,
                '.' => dots += 1,
                _ => {
                    return Err(MarketError::InvalidAmount(format!(
                        "{raw:?} is not a decimal number"
                    )));
                }
            }
        }
        if digits == 0 || dots > 1 {
            return Err(MarketError::InvalidAmount(format!(
                "{raw:?} is not a decimal number"
            )));
        }
        Ok(Self(text.to_string()))
    }

    /// Returns the decimal text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the amount is exactly zero.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.0.chars().all(|c| c == '0' || c == '.')
    }

    /// Converts to integer base units for a token with `decimals` places.
    ///
    /// # Errors
    ///
    /// Returns [`MarketError::InvalidAmount`] if the amount has more
    /// fractional digits than the token supports or overflows 256 bits.
    pub fn to_base_units(&self, decimals: u32) -> Result<U256, MarketError> {
        // parse_units truncates extra fraction digits instead of failing.
        let fraction_digits = self.0.split_once('.').map_or(0, |(_, frac)| frac.len());
        if fraction_digits > usize::try_from(decimals).unwrap_or(usize::MAX) {
            return Err(MarketError::InvalidAmount(format!(
                "{} has more than {decimals} decimal places",
                self.0
            )));
        }
        // parse_units rejects a leading '.', so pad it.
        let text = if self.0.starts_with('.') {
            format!("0{}", self.0)
        } else {
            self.0.clone()
        };
        parse_units(text.as_str(), decimals)
            .map(U256::from)
            .map_err(|e| MarketError::InvalidAmount(format!("{}: {e}", self.0)))
    }
}

impl fmt::Display for TokenAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for TokenAmount {
    type Err = MarketError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for TokenAmount {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawAmount {
    Text(String),
    Number(serde_json::Number),
}

impl<'de> Deserialize<'de> for TokenAmount {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = match RawAmount::deserialize(deserializer)? {
            RawAmount::Text(s) => s,
            RawAmount::Number(n) => {
                let text = n.to_string();
                expand_exponent(&text).unwrap_or(text)
            }
        };
        Self::parse(&text).map_err(serde::de::Error::custom)
    }
}

/// Rewrites exponent notation (`1e-7`, `2.5E3`) as plain decimal text.
/// Returns `None` when `text` has no exponent or is not an unsigned
/// mantissa with an integer exponent.
fn expand_exponent(text: &str) -> Option<String> {
    let (mantissa, exponent) = text.split_once(['e', 'E'])?;
    let exponent: i64 = exponent.parse().ok()?;
    let (int_part, frac_part) = mantissa.split_once('.').unwrap_or((mantissa, ""));
    if !int_part.chars().chain(frac_part.chars()).all(|c| c.is_ascii_digit()) {
        return None;
    }

    let digits = format!("{int_part}{frac_part}");
    let point = i64::try_from(int_part.len()).ok()?.checked_add(exponent)?;
    let plain = if point <= 0 {
        let zeros = usize::try_from(point.unsigned_abs()).ok()?;
        format!("0.{}{digits}", "0".repeat(zeros))
    } else {
        let point = usize::try_from(point).ok()?;
        if point >= digits.len() {
            format!("{digits}{}", "0".repeat(point - digits.len()))
        } else {
            let (whole, fraction) = digits.split_at(point);
            format!("{whole}.{fraction}")
        }
    };
    Some(plain)
}
