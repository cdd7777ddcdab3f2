//! Token amounts.
//!
//! Balances are fixed-point integers (u128 raw units) to avoid floating-point errors.
//! A token has `decimals` fractional digits, so one whole token is `10^decimals` raw.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Sub};

use crate::error::TypesError;

/// Largest supported number of fractional digits (`10^38` still fits in a u128).
pub const MAX_DECIMALS: u8 = 38;

/// A raw token amount.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TokenAmount(u128);

impl TokenAmount {
    pub const ZERO: Self = Self(0);

    pub fn new(raw: u128) -> Self {
        Self(raw)
    }

    pub fn raw(&self) -> u128 {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Raw units in one whole token.
    pub fn unit(decimals: u8) -> Option<u128> {
        if decimals > MAX_DECIMALS {
            return None;
        }
        10u128.checked_pow(decimals as u32)
    }

    /// Convert a whole-token count to raw units.
    pub fn from_whole(whole: u128, decimals: u8) -> Option<Self> {
        Self::unit(decimals)?.checked_mul(whole).map(Self)
    }

    /// Parse a decimal string such as `"1000"` or `"12.5"` into raw units.
    pub fn parse_units(s: &str, decimals: u8) -> Result<Self, TypesError> {
        let invalid = || TypesError::InvalidAmount(s.to_string());
        let unit = Self::unit(decimals).ok_or_else(invalid)?;
        let (int_part, frac_part) = match s.split_once('.') {
            Some((i, f)) => (i, f),
            None => (s, ""),
        };
        if int_part.is_empty() && frac_part.is_empty() {
            return Err(invalid());
        }
        if frac_part.len() > decimals as usize {
            return Err(invalid());
        }
        let digits_only = |p: &str| p.bytes().all(|b| b.is_ascii_digit());
        if !digits_only(int_part) || !digits_only(frac_part) {
            return Err(invalid());
        }
        let whole: u128 = if int_part.is_empty() {
            0
        } else {
            int_part.parse().map_err(|_| invalid())?
        };
        let frac: u128 = if frac_part.is_empty() {
            0
        } else {
            let padded = format!("{:0<width$}", frac_part, width = decimals as usize);
            padded.parse().map_err(|_| invalid())?
        };
        whole
            .checked_mul(unit)
            .and_then(|w| w.checked_add(frac))
            .map(Self)
            .ok_or_else(invalid)
    }

    /// Render as a decimal string with trailing fractional zeros trimmed.
    pub fn format_units(&self, decimals: u8) -> String {
        let Some(unit) = Self::unit(decimals) else {
            return self.0.to_string();
        };
        let whole = self.0 / unit;
        let frac = self.0 % unit;
        if frac == 0 {
            return whole.to_string();
        }
        let frac = format!("{:0>width$}", frac, width = decimals as usize);
        format!("{}.{}", whole, frac.trim_end_matches('0'))
    }

    pub fn checked_add(self, other: Self) -> Option<Self> {
        self.0.checked_add(other.0).map(Self)
    }

    pub fn checked_sub(self, other: Self) -> Option<Self> {
        self.0.checked_sub(other.0).map(Self)
    }

    pub fn saturating_sub(self, other: Self) -> Self {
        Self(self.0.saturating_sub(other.0))
    }
}

impl Add for TokenAmount {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self(self.0 + rhs.0)
    }
}

impl Sub for TokenAmount {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Self(self.0 - rhs.0)
    }
}

impl From<u128> for TokenAmount {
    fn from(raw: u128) -> Self {
        Self(raw)
    }
}

impl fmt::Display for TokenAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} raw", self.0)
    }
}
