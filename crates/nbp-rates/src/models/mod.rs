//! Exchange rate models
//!
//! This module contains the core data types of the client:
//! - `table` - NBP rate tables (A, B mid rates; C bid/ask)
//! - `rate_value` - Numeric representation of a rate (Decimal or f64) and the mode selecting it
//! - `exchange_rate` - The exchange rate record (ExchangeRate) and its tagged rate values (Rates)
//! - `query` - Logical request shapes (QueryKind, RateQuery)
//! - `date` - Strict `YYYY-MM-DD` date parsing (AsRateDate)

mod date;
mod exchange_rate;
mod query;
mod rate_value;
mod table;

pub use date::{parse_rate_date, AsRateDate};
pub use exchange_rate::{ExchangeRate, Rates};
pub use query::{QueryKind, RateQuery};
pub use rate_value::{NumericMode, RateValue};
pub use table::RateTable;
