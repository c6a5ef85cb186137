//! Upstream JSON response shapes.
//!
//! Numeric fields are captured as raw JSON text so they can be parsed
//! straight into the requested [`NumericMode`].

use serde::Deserialize;
use serde_json::value::RawValue;

use crate::errors::NbpError;
use crate::models::{NumericMode, RateValue, Rates};

/// `GET /exchangerates/rates/{table}/{code}/...` body.
#[derive(Debug, Deserialize)]
pub(crate) struct RatesResponse {
    pub code: Option<String>,
    pub rates: Vec<RateEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RateEntry {
    pub no: Option<String>,
    pub effective_date: String,
    pub mid: Option<Box<RawValue>>,
    pub bid: Option<Box<RawValue>>,
    pub ask: Option<Box<RawValue>>,
}

impl RatesResponse {
    pub fn parse(body: &str) -> Result<Self, NbpError> {
        serde_json::from_str(body)
            .map_err(|e| NbpError::api(format!("Failed to parse response: {}", e)))
    }

    /// Fails when the body names a currency other than `expected`.
    pub fn check_code(&self, expected: &str) -> Result<(), NbpError> {
        match &self.code {
            Some(code) if !code.trim().eq_ignore_ascii_case(expected) => Err(NbpError::api(
                format!("Response is for {}, expected {}", code, expected),
            )),
            _ => Ok(()),
        }
    }
}

impl RateEntry {
    /// Rates carried by the entry in the requested representation.
    pub fn rates(&self, mode: NumericMode) -> Result<Rates, NbpError> {
        let value = |raw: &Option<Box<RawValue>>| -> Result<Option<RateValue>, NbpError> {
            raw.as_deref()
                .map(|raw| RateValue::parse(raw.get(), mode))
                .transpose()
        };
        Rates::from_parts(value(&self.mid)?, value(&self.bid)?, value(&self.ask)?)
    }
}
