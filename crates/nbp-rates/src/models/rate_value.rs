use std::fmt::{Display, Formatter};
use std::str::FromStr;

use num_traits::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::errors::NbpError;

/// Numeric representation used for rate values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NumericMode {
    /// Arbitrary precision decimals (`rust_decimal::Decimal`)
    #[default]
    Decimal,
    /// Binary floating point (`f64`)
    Float,
}

impl NumericMode {
    pub const fn from_floating_point(use_floating_point: bool) -> Self {
        if use_floating_point {
            Self::Float
        } else {
            Self::Decimal
        }
    }
}

/// A single rate value in one of the two numeric representations.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(untagged)]
pub enum RateValue {
    Decimal(Decimal),
    Float(f64),
}

impl RateValue {
    /// Parse a JSON numeric literal straight into the requested
    /// representation, without going through the other one.
    pub fn parse(literal: &str, mode: NumericMode) -> Result<Self, NbpError> {
        let literal = literal.trim();
        match mode {
            NumericMode::Decimal => Decimal::from_str(literal)
                .or_else(|_| Decimal::from_scientific(literal))
                .map(Self::Decimal)
                .map_err(|e| {
                    NbpError::InvalidRecord(format!("'{}' is not a decimal: {}", literal, e))
                }),
            NumericMode::Float => literal
                .parse::<f64>()
                .map(Self::Float)
                .map_err(|e| {
                    NbpError::InvalidRecord(format!("'{}' is not a number: {}", literal, e))
                }),
        }
    }

    pub const fn mode(&self) -> NumericMode {
        match self {
            Self::Decimal(_) => NumericMode::Decimal,
            Self::Float(_) => NumericMode::Float,
        }
    }

    pub const fn as_decimal(&self) -> Option<Decimal> {
        match self {
            Self::Decimal(value) => Some(*value),
            Self::Float(_) => None,
        }
    }

    pub const fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Float(value) => Some(*value),
            Self::Decimal(_) => None,
        }
    }

    /// Multiply by an amount, keeping the representation of `self`.
    pub fn scale(&self, amount: Decimal) -> Self {
        match self {
            Self::Decimal(value) => Self::Decimal(*value * amount),
            Self::Float(value) => Self::Float(*value * amount.to_f64().unwrap_or(f64::NAN)),
        }
    }
}

impl From<Decimal> for RateValue {
    fn from(value: Decimal) -> Self {
        Self::Decimal(value)
    }
}

impl From<f64> for RateValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl Display for RateValue {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Decimal(value) => Display::fmt(value, f),
            Self::Float(value) => Display::fmt(value, f),
        }
    }
}
