//! Per-currency client facade.
//!
//! An [`NbpClient`] is bound to one currency and answers the five query
//! shapes of the rates API. Each query goes through the request cache, so a
//! repeated query costs no upstream call.
//!
//! Return values follow one convention: `Err` for failures, `Ok(None)` when
//! a failure was suppressed (`suppress_errors`), `Ok(Some(..))` otherwise.

use std::sync::Arc;

use log::{debug, warn};
use rust_decimal::Decimal;

use crate::cache::{CacheKey, CachedOutcome, RequestCache};
use crate::config::ClientConfig;
use crate::errors::NbpError;
use crate::models::{AsRateDate, ExchangeRate, QueryKind, RateQuery, Rates};
use crate::registry::{CurrencyDescriptor, CurrencyRegistry, StaticCurrencyRegistry};
use crate::resolver::RateResolver;
use crate::transport::{HttpTransport, ReqwestTransport};

/// Exchange rate client for a single currency.
#[derive(Debug)]
pub struct NbpClient {
    config: ClientConfig,
    currency: CurrencyDescriptor,
    resolver: RateResolver,
    cache: RequestCache,
}

impl NbpClient {
    /// Client over the builtin currency table and a reqwest transport.
    ///
    /// # Errors
    /// * `UnknownCurrencyCode` - `config.currency_code` is not registered
    /// * `InvalidConfig` - invalid capacity, timeout or proxy URL
    pub fn new(config: ClientConfig) -> Result<Self, NbpError> {
        config.validate()?;
        let transport = ReqwestTransport::with_options(&config.proxy, config.request_timeout)?;
        Self::with_parts(config, StaticCurrencyRegistry::builtin(), Arc::new(transport))
    }

    /// Client over an injected registry and transport.
    pub fn with_parts(
        mut config: ClientConfig,
        registry: Arc<dyn CurrencyRegistry>,
        transport: Arc<dyn HttpTransport>,
    ) -> Result<Self, NbpError> {
        config.validate()?;
        let currency = registry.lookup(&config.currency_code)?.clone();
        config.currency_code = currency.code().to_string();

        let cache = RequestCache::new(config.cache_capacity)?;
        let resolver = RateResolver::new(registry, transport, config.base_url.clone());

        debug!(
            "NBP client for {} ({}), tables {:?}",
            currency.code(),
            currency.name(),
            currency.tables()
        );

        Ok(Self {
            config,
            currency,
            resolver,
            cache,
        })
    }

    /// Replace the private cache with one shared with other clients.
    ///
    /// The shared cache keeps its own capacity.
    pub fn with_shared_cache(mut self, cache: RequestCache) -> Self {
        self.cache = cache;
        self
    }

    /// Canonical (upper-case) code of the bound currency.
    pub fn currency_code(&self) -> &str {
        self.currency.code()
    }

    pub fn currency_name(&self) -> &str {
        self.currency.name()
    }

    pub fn currency(&self) -> &CurrencyDescriptor {
        &self.currency
    }

    /// Rebind the client to another registered currency.
    ///
    /// On error the client keeps its current currency.
    pub fn set_currency_code(&mut self, code: &str) -> Result<(), NbpError> {
        let currency = self.resolver.registry().lookup(code)?.clone();
        debug!("NBP client switched {} -> {}", self.currency.code(), currency.code());
        self.config.currency_code = currency.code().to_string();
        self.currency = currency;
        Ok(())
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Uncached access to the upstream API.
    pub fn resolver(&self) -> &RateResolver {
        &self.resolver
    }

    pub fn cache(&self) -> &RequestCache {
        &self.cache
    }

    pub fn clear_cache(&self) {
        self.cache.clear();
    }

    /// Most recently published rate.
    pub async fn current(&self, bid_ask: bool) -> Result<Option<ExchangeRate>, NbpError> {
        self.single(QueryKind::Current, bid_ask).await
    }

    /// Rate published today; upstream answers 404 before publication.
    pub async fn today(&self, bid_ask: bool) -> Result<Option<ExchangeRate>, NbpError> {
        self.single(QueryKind::Today, bid_ask).await
    }

    /// Rate published on `date` (`YYYY-MM-DD` or a `NaiveDate`).
    pub async fn on_date(
        &self,
        date: impl AsRateDate,
        bid_ask: bool,
    ) -> Result<Option<ExchangeRate>, NbpError> {
        let date = date.as_rate_date()?;
        self.single(QueryKind::OnDate(date), bid_ask).await
    }

    /// Last `n` published rates, oldest first.
    pub async fn last(&self, n: i32, bid_ask: bool) -> Result<Option<Vec<ExchangeRate>>, NbpError> {
        self.series(QueryKind::Last(n), bid_ask).await
    }

    /// Rates published between `start` and `end` inclusive, oldest first.
    pub async fn range(
        &self,
        start: impl AsRateDate,
        end: impl AsRateDate,
        bid_ask: bool,
    ) -> Result<Option<Vec<ExchangeRate>>, NbpError> {
        let start = start.as_rate_date()?;
        let end = end.as_rate_date()?;
        self.series(QueryKind::Range(start, end), bid_ask).await
    }

    /// Value of `amount` units of the currency in PLN at the current rate.
    ///
    /// ```no_run
    /// # async fn example() -> Result<(), nbp_rates::NbpError> {
    /// use nbp_rates::{ClientConfig, NbpClient};
    /// use rust_decimal::Decimal;
    ///
    /// let client = NbpClient::new(ClientConfig::new("usd"))?;
    /// if let Some(value) = client.convert(Decimal::from(100), false).await? {
    ///     println!("100 USD = {} PLN", value);
    /// }
    /// # Ok(())
    /// # }
    /// ```
    pub async fn convert(&self, amount: Decimal, bid_ask: bool) -> Result<Option<Rates>, NbpError> {
        Ok(self
            .current(bid_ask)
            .await?
            .map(|rate| rate.convert(amount)))
    }

    async fn single(
        &self,
        kind: QueryKind,
        bid_ask: bool,
    ) -> Result<Option<ExchangeRate>, NbpError> {
        let outcome = self.records(kind, bid_ask).await?;
        Ok(outcome.and_then(|rates| rates.first().cloned()))
    }

    async fn series(
        &self,
        kind: QueryKind,
        bid_ask: bool,
    ) -> Result<Option<Vec<ExchangeRate>>, NbpError> {
        let outcome = self.records(kind, bid_ask).await?;
        Ok(outcome.map(|rates| rates.as_ref().clone()))
    }

    /// Cached records for a query. Kinds answered by a single record fail
    /// with `MissingData` when the upstream returns none.
    async fn records(&self, kind: QueryKind, bid_ask: bool) -> Result<CachedOutcome, NbpError> {
        let query = RateQuery::new(kind, bid_ask);
        match self.fetch(query).await? {
            Some(rates) if rates.is_empty() && kind.expects_single() => {
                Err(NbpError::MissingData {
                    code: self.currency.code().to_string(),
                    query: query.to_string(),
                })
            }
            outcome => Ok(outcome),
        }
    }

    async fn fetch(&self, query: RateQuery) -> Result<CachedOutcome, NbpError> {
        let code = self.currency.code();
        let mode = self.config.numeric_mode();
        let suppress_errors = self.config.suppress_errors;
        let key = CacheKey::new(code, query, mode, suppress_errors);

        self.cache
            .get_or_resolve(key, async move {
                debug!("Resolving {} ({})", code, query);
                match self.resolver.resolve(code, &query, mode).await {
                    Ok(rates) => Ok(Some(Arc::new(rates))),
                    Err(e) if suppress_errors && e.is_suppressible() => {
                        warn!("Suppressed error for {} ({}): {}", code, query, e);
                        Ok(None)
                    }
                    Err(e) => Err(e),
                }
            })
            .await
    }
}
