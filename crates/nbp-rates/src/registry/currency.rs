use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::errors::NbpError;
use crate::models::RateTable;

/// Registry entry describing one currency.
///
/// Invariants checked at construction: the code is non-empty ASCII
/// alphabetic (stored upper-case), at least one table is present and at
/// least one of them is a mid table (A or B).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawDescriptor")]
pub struct CurrencyDescriptor {
    code: String,
    name: String,
    tables: BTreeSet<RateTable>,
}

#[derive(Deserialize)]
struct RawDescriptor {
    code: String,
    name: String,
    tables: Vec<RateTable>,
}

impl TryFrom<RawDescriptor> for CurrencyDescriptor {
    type Error = NbpError;

    fn try_from(raw: RawDescriptor) -> Result<Self, Self::Error> {
        Self::new(&raw.code, raw.name, raw.tables)
    }
}

impl CurrencyDescriptor {
    pub fn new(
        code: &str,
        name: impl Into<String>,
        tables: impl IntoIterator<Item = RateTable>,
    ) -> Result<Self, NbpError> {
        let code = code.trim().to_ascii_uppercase();
        if code.is_empty() || !code.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(NbpError::InvalidConfig(format!(
                "'{}' is not a valid currency code",
                code
            )));
        }

        let tables: BTreeSet<RateTable> = tables.into_iter().collect();
        if tables.is_empty() {
            return Err(NbpError::InvalidConfig(format!(
                "currency {} has no rate tables",
                code
            )));
        }
        if tables.iter().all(|table| table.is_bid_ask()) {
            return Err(NbpError::InvalidConfig(format!(
                "currency {} has no mid rate table",
                code
            )));
        }

        Ok(Self {
            code,
            name: name.into(),
            tables,
        })
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn tables(&self) -> &BTreeSet<RateTable> {
        &self.tables
    }

    pub fn has_table(&self, table: RateTable) -> bool {
        self.tables.contains(&table)
    }

    /// Bid/ask quotes are published only through table C.
    pub fn supports_bid_ask(&self) -> bool {
        self.has_table(RateTable::C)
    }

    /// Mid rate tables in ascending order (A before B).
    pub fn mid_tables(&self) -> Vec<RateTable> {
        self.tables
            .iter()
            .copied()
            .filter(|table| !table.is_bid_ask())
            .collect()
    }
}
