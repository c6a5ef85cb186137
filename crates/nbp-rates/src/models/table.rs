use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::NbpError;

/// NBP rate table identifier.
///
/// Tables A and B publish mid (average) rates, table C publishes bid/ask
/// quotes. The derived ordering (A < B < C) is the order in which mid
/// tables are merged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RateTable {
    A,
    B,
    C,
}

impl RateTable {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::A => "A",
            Self::B => "B",
            Self::C => "C",
        }
    }

    /// Lower-case form used in API paths.
    pub const fn path_segment(self) -> &'static str {
        match self {
            Self::A => "a",
            Self::B => "b",
            Self::C => "c",
        }
    }

    /// Returns `true` for the bid/ask table.
    pub const fn is_bid_ask(self) -> bool {
        matches!(self, Self::C)
    }
}

impl Display for RateTable {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RateTable {
    type Err = NbpError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "A" | "a" => Ok(Self::A),
            "B" | "b" => Ok(Self::B),
            "C" | "c" => Ok(Self::C),
            other => Err(NbpError::InvalidConfig(format!(
                "unknown rate table '{}'",
                other
            ))),
        }
    }
}
