//! Currency lookup contract and the JSON-driven builtin registry.
//!
//! The builtin table is loaded from `currencies.json` at compile time via
//! `include_str!` and parsed once via `lazy_static`.

use std::collections::BTreeMap;
use std::sync::Arc;

use lazy_static::lazy_static;
use serde::Deserialize;

use super::CurrencyDescriptor;
use crate::errors::NbpError;

/// Canonical (upper-case, trimmed) form of a currency code.
pub fn canonical_code(code: &str) -> String {
    code.trim().to_ascii_uppercase()
}

/// Read-only currency reference table.
///
/// Implementations only need [`get`](Self::get) with canonical keys and
/// [`descriptors`](Self::descriptors); case-insensitive lookup is provided.
pub trait CurrencyRegistry: Send + Sync {
    /// Exact lookup by canonical (upper-case) code.
    fn get(&self, code: &str) -> Option<&CurrencyDescriptor>;

    /// All descriptors, sorted by code.
    fn descriptors(&self) -> Vec<&CurrencyDescriptor>;

    /// Case-insensitive lookup.
    ///
    /// # Returns
    /// * `Ok(descriptor)` - the code is registered
    /// * `Err(NbpError::UnknownCurrencyCode)` - otherwise
    fn lookup(&self, code: &str) -> Result<&CurrencyDescriptor, NbpError> {
        let canonical = canonical_code(code);
        self.get(&canonical)
            .ok_or(NbpError::UnknownCurrencyCode(canonical))
    }

    fn contains(&self, code: &str) -> bool {
        self.lookup(code).is_ok()
    }
}

// ── JSON schema ──────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct CurrencyCatalog {
    currencies: Vec<CurrencyDescriptor>,
}

// ── Map-backed registry ──────────────────────────────────────────────────────

/// Registry backed by an in-memory map, immutable once built.
#[derive(Debug, Clone, Default)]
pub struct StaticCurrencyRegistry {
    by_code: BTreeMap<String, CurrencyDescriptor>,
}

lazy_static! {
    static ref BUILTIN: Arc<StaticCurrencyRegistry> = Arc::new(StaticCurrencyRegistry::load());
}

impl StaticCurrencyRegistry {
    /// Shared instance of the builtin NBP currency table.
    pub fn builtin() -> Arc<StaticCurrencyRegistry> {
        Arc::clone(&BUILTIN)
    }

    /// Build a registry from explicit descriptors. Codes must be unique.
    pub fn from_descriptors(
        descriptors: impl IntoIterator<Item = CurrencyDescriptor>,
    ) -> Result<Self, NbpError> {
        let mut by_code = BTreeMap::new();
        for descriptor in descriptors {
            let code = descriptor.code().to_string();
            if by_code.insert(code.clone(), descriptor).is_some() {
                return Err(NbpError::InvalidConfig(format!(
                    "duplicate currency code {}",
                    code
                )));
            }
        }
        Ok(Self { by_code })
    }

    /// Parse a registry from JSON in the `currencies.json` schema:
    /// `{"currencies": [{"code": "USD", "name": "...", "tables": ["A", "C"]}]}`.
    pub fn from_json(json: &str) -> Result<Self, NbpError> {
        let catalog: CurrencyCatalog = serde_json::from_str(json)
            .map_err(|e| NbpError::InvalidConfig(format!("invalid currency table: {}", e)))?;
        Self::from_descriptors(catalog.currencies)
    }

    fn load() -> Self {
        let json = include_str!("currencies.json");
        Self::from_json(json).expect("currencies.json must be valid")
    }

    pub fn len(&self) -> usize {
        self.by_code.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_code.is_empty()
    }
}

impl CurrencyRegistry for StaticCurrencyRegistry {
    fn get(&self, code: &str) -> Option<&CurrencyDescriptor> {
        self.by_code.get(code)
    }

    fn descriptors(&self) -> Vec<&CurrencyDescriptor> {
        self.by_code.values().collect()
    }
}
