//! Currency registry module.
//!
//! The registry is the read-only reference table consulted by the resolver:
//! currency code → display name and the set of NBP tables publishing it.
//!
//! - [`CurrencyDescriptor`]: one validated registry entry
//! - [`CurrencyRegistry`]: the lookup contract injected into the resolver and client
//! - [`StaticCurrencyRegistry`]: map-backed implementation, including the
//!   builtin NBP table embedded from `currencies.json`

mod currency;
mod currency_registry;

pub use currency::CurrencyDescriptor;
pub use currency_registry::{canonical_code, CurrencyRegistry, StaticCurrencyRegistry};
