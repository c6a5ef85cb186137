//! NBP Exchange Rates Crate
//!
//! Client for the exchange rates API of the National Bank of Poland
//! (Narodowy Bank Polski). Rates are quoted against the Polish zloty (PLN).
//!
//! # Overview
//!
//! The crate supports:
//! - Mid rates (tables A and B) and bid/ask rates (table C)
//! - Current, today's, dated, last-N and date range queries
//! - `Decimal` or `f64` rate values, parsed straight from the JSON literals
//! - Bounded LRU caching with single-flight for concurrent identical queries
//! - Optional error suppression (`Ok(None)` instead of upstream failures)
//!
//! # Architecture
//!
//! ```text
//! +------------------+     +------------------+
//! |    NbpClient     | --> |   RequestCache   |  (moka, LRU)
//! +------------------+     +------------------+
//!                                  | miss
//!                                  v
//!                          +------------------+
//!                          |   RateResolver   | <-- CurrencyRegistry
//!                          +------------------+     (code -> tables)
//!                                  |
//!                                  v
//!                          +------------------+
//!                          |  HttpTransport   |  (reqwest, or a test double)
//!                          +------------------+
//!                                  |
//!                                  v
//!                          +------------------+
//!                          |   ExchangeRate   |  (sorted by date)
//!                          +------------------+
//! ```
//!
//! # Example
//!
//! ```no_run
//! # async fn example() -> Result<(), nbp_rates::NbpError> {
//! use nbp_rates::{ClientConfig, NbpClient};
//!
//! let client = NbpClient::new(ClientConfig::new("eur"))?;
//! if let Some(rates) = client.last(5, false).await? {
//!     for rate in rates {
//!         println!("{}", rate);
//!     }
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Core Types
//!
//! - [`NbpClient`] - Per-currency query facade
//! - [`ExchangeRate`] - One currency's rate(s) on one date
//! - [`Rates`] - Mid rate or bid/ask pair
//! - [`CurrencyRegistry`] - Code to name and tables lookup
//! - [`HttpTransport`] - Pluggable HTTP GET

pub mod cache;
pub mod client;
pub mod config;
pub mod errors;
pub mod models;
pub mod registry;
pub mod resolver;
pub mod transport;

pub use errors::NbpError;

pub use client::NbpClient;
pub use config::{ClientConfig, ProxyConfig};

pub use models::{
    parse_rate_date, AsRateDate, ExchangeRate, NumericMode, QueryKind, RateQuery, RateTable,
    RateValue, Rates,
};

pub use registry::{canonical_code, CurrencyDescriptor, CurrencyRegistry, StaticCurrencyRegistry};

pub use cache::{CacheKey, CachedOutcome, RequestCache};
pub use resolver::{rates_url, RateResolver};
pub use transport::{HttpRequest, HttpResponse, HttpTransport, ReqwestTransport, TransportError};
