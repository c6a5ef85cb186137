use std::fmt::{Display, Formatter};
use std::ops::Mul;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;

use super::date::AsRateDate;
use super::rate_value::{NumericMode, RateValue};
use crate::errors::NbpError;
use crate::registry::{CurrencyDescriptor, CurrencyRegistry};

/// Rate values carried by a record: a mid rate or a bid/ask pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Rates {
    Mid(RateValue),
    BidAsk { bid: RateValue, ask: RateValue },
}

impl Rates {
    /// Build a bid/ask pair; both values must share one numeric mode.
    pub fn bid_ask(bid: RateValue, ask: RateValue) -> Result<Self, NbpError> {
        if bid.mode() != ask.mode() {
            return Err(NbpError::InvalidRecord(
                "bid and ask use different numeric representations".to_string(),
            ));
        }
        Ok(Self::BidAsk { bid, ask })
    }

    /// Build rates from optional upstream fields.
    ///
    /// A complete bid/ask pair yields [`Rates::BidAsk`], a lone mid yields
    /// [`Rates::Mid`]. A mid next to a complete pair is ambiguous and
    /// rejected, as is an input without a usable shape.
    pub fn from_parts(
        mid: Option<RateValue>,
        bid: Option<RateValue>,
        ask: Option<RateValue>,
    ) -> Result<Self, NbpError> {
        match (mid, bid, ask) {
            (Some(_), Some(_), Some(_)) => Err(NbpError::InvalidRecord(
                "record carries both mid and bid/ask rates".to_string(),
            )),
            (None, Some(bid), Some(ask)) => Self::bid_ask(bid, ask),
            (Some(mid), _, _) => Ok(Self::Mid(mid)),
            (None, _, _) => Err(NbpError::InvalidRecord(
                "record needs a mid rate or both bid and ask".to_string(),
            )),
        }
    }

    pub fn mid(&self) -> Option<RateValue> {
        match self {
            Self::Mid(mid) => Some(*mid),
            Self::BidAsk { .. } => None,
        }
    }

    pub fn bid(&self) -> Option<RateValue> {
        match self {
            Self::BidAsk { bid, .. } => Some(*bid),
            Self::Mid(_) => None,
        }
    }

    pub fn ask(&self) -> Option<RateValue> {
        match self {
            Self::BidAsk { ask, .. } => Some(*ask),
            Self::Mid(_) => None,
        }
    }

    pub fn is_bid_ask(&self) -> bool {
        matches!(self, Self::BidAsk { .. })
    }

    pub fn mode(&self) -> NumericMode {
        match self {
            Self::Mid(mid) => mid.mode(),
            Self::BidAsk { bid, .. } => bid.mode(),
        }
    }

    /// Multiply every value by `amount`.
    pub fn scale(&self, amount: Decimal) -> Self {
        match self {
            Self::Mid(mid) => Self::Mid(mid.scale(amount)),
            Self::BidAsk { bid, ask } => Self::BidAsk {
                bid: bid.scale(amount),
                ask: ask.scale(amount),
            },
        }
    }

    fn check_consistent(&self) -> Result<(), NbpError> {
        match self {
            Self::Mid(_) => Ok(()),
            Self::BidAsk { bid, ask } => Self::bid_ask(*bid, *ask).map(|_| ()),
        }
    }
}

impl Display for Rates {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Mid(mid) => write!(f, "mid={}", mid),
            Self::BidAsk { bid, ask } => write!(f, "bid={}, ask={}", bid, ask),
        }
    }
}

/// Exchange rate of one currency (against PLN) on one date.
///
/// Records are immutable once built; the resolver creates one per upstream
/// rate entry.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExchangeRate {
    currency_code: String,
    currency_name: String,
    date: NaiveDate,
    rates: Rates,
    #[serde(skip_serializing_if = "Option::is_none")]
    source_id: Option<String>,
}

impl ExchangeRate {
    /// Create a record for a registered currency.
    pub fn new(
        currency: &CurrencyDescriptor,
        date: impl AsRateDate,
        rates: Rates,
    ) -> Result<Self, NbpError> {
        let date = date.as_rate_date()?;
        rates.check_consistent()?;

        Ok(Self {
            currency_code: currency.code().to_string(),
            currency_name: currency.name().to_string(),
            date,
            rates,
            source_id: None,
        })
    }

    /// Create a record, validating `currency_code` against `registry`.
    pub fn from_registry(
        registry: &dyn CurrencyRegistry,
        currency_code: &str,
        date: impl AsRateDate,
        rates: Rates,
    ) -> Result<Self, NbpError> {
        let currency = registry.lookup(currency_code)?;
        Self::new(currency, date, rates)
    }

    /// Attach the upstream reference label (e.g. `1/A/NBP/2017`).
    pub fn with_source_id(mut self, source_id: impl Into<String>) -> Self {
        self.source_id = Some(source_id.into());
        self
    }

    pub fn currency_code(&self) -> &str {
        &self.currency_code
    }

    pub fn currency_name(&self) -> &str {
        &self.currency_name
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn rates(&self) -> &Rates {
        &self.rates
    }

    pub fn source_id(&self) -> Option<&str> {
        self.source_id.as_deref()
    }

    /// Mid rate; `None` for bid/ask records.
    pub fn mid(&self) -> Option<RateValue> {
        self.rates.mid()
    }

    /// Bid rate; `None` for mid records.
    pub fn bid(&self) -> Option<RateValue> {
        self.rates.bid()
    }

    /// Ask rate; `None` for mid records.
    pub fn ask(&self) -> Option<RateValue> {
        self.rates.ask()
    }

    pub fn mode(&self) -> NumericMode {
        self.rates.mode()
    }

    /// Value of `amount` units of this currency in PLN, for every rate the
    /// record carries.
    pub fn convert(&self, amount: Decimal) -> Rates {
        self.rates.scale(amount)
    }
}

impl Mul<Decimal> for &ExchangeRate {
    type Output = Rates;

    fn mul(self, amount: Decimal) -> Rates {
        self.convert(amount)
    }
}

impl Mul<&ExchangeRate> for Decimal {
    type Output = Rates;

    fn mul(self, rate: &ExchangeRate) -> Rates {
        rate.convert(self)
    }
}

impl Display for ExchangeRate {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "ExchangeRate({}->PLN, {}, {})",
            self.currency_code,
            self.date.format("%Y-%m-%d"),
            self.rates
        )
    }
}
