//! Query resolution against the NBP rates API.
//!
//! ```text
//! RateQuery ──► table selection ──► URL per table ──► HttpTransport::execute
//!                  │ (C for bid/ask,                          │
//!                  │  A/B for mid)                            ▼
//!                  │                              parse `rates` entries
//!                  ▼                                          │
//!          BidAskUnavailable                                  ▼
//!          (no request)                     Vec<ExchangeRate> sorted by date
//! ```
//!
//! The resolver holds no state between calls; caching lives in
//! [`crate::cache::RequestCache`].

mod response;
mod uri;

pub use uri::{query_tail, rates_url};

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::NaiveDate;
use log::{debug, warn};

use crate::errors::NbpError;
use crate::models::{parse_rate_date, ExchangeRate, NumericMode, QueryKind, RateQuery, RateTable};
use crate::registry::{CurrencyDescriptor, CurrencyRegistry};
use crate::transport::{HttpRequest, HttpTransport};
use response::RatesResponse;

/// Turns logical queries into upstream requests and records.
#[derive(Clone)]
pub struct RateResolver {
    registry: Arc<dyn CurrencyRegistry>,
    transport: Arc<dyn HttpTransport>,
    base_url: String,
}

impl std::fmt::Debug for RateResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RateResolver")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl RateResolver {
    pub fn new(
        registry: Arc<dyn CurrencyRegistry>,
        transport: Arc<dyn HttpTransport>,
        base_url: impl Into<String>,
    ) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            registry,
            transport,
            base_url,
        }
    }

    pub fn registry(&self) -> &Arc<dyn CurrencyRegistry> {
        &self.registry
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Tables to query for `currency`, in processing order.
    ///
    /// # Returns
    /// * `Ok(vec![C])` - bid/ask query on a currency listed in table C
    /// * `Ok(mid tables)` - mid query, ascending table letter
    /// * `Err(BidAskUnavailable)` - bid/ask query on any other currency
    pub fn plan_tables(
        currency: &CurrencyDescriptor,
        query: &RateQuery,
    ) -> Result<Vec<RateTable>, NbpError> {
        if query.bid_ask {
            if !currency.supports_bid_ask() {
                return Err(NbpError::BidAskUnavailable(currency.code().to_string()));
            }
            return Ok(vec![RateTable::C]);
        }
        Ok(currency.mid_tables())
    }

    /// Resolve `query` for `code` into records sorted by date.
    ///
    /// An empty upstream `rates` array yields an empty vector.
    pub async fn resolve(
        &self,
        code: &str,
        query: &RateQuery,
        mode: NumericMode,
    ) -> Result<Vec<ExchangeRate>, NbpError> {
        let currency = self.registry.lookup(code)?;
        let tables = Self::plan_tables(currency, query)?;

        match tables.as_slice() {
            [table] => {
                let mut rates = self.fetch_table(currency, *table, &query.kind, mode).await?;
                rates.sort_by_key(|rate| rate.date());
                Ok(rates)
            }
            _ => {
                // Tables are processed in ascending order; a later table
                // replaces an earlier one's record for the same date.
                let mut by_date: BTreeMap<NaiveDate, ExchangeRate> = BTreeMap::new();
                for &table in &tables {
                    for rate in self.fetch_table(currency, table, &query.kind, mode).await? {
                        if let Some(replaced) = by_date.insert(rate.date(), rate) {
                            debug!(
                                "{} {}: table {} overrides {:?}",
                                currency.code(),
                                replaced.date(),
                                table,
                                replaced.source_id()
                            );
                        }
                    }
                }
                Ok(by_date.into_values().collect())
            }
        }
    }

    async fn fetch_table(
        &self,
        currency: &CurrencyDescriptor,
        table: RateTable,
        kind: &QueryKind,
        mode: NumericMode,
    ) -> Result<Vec<ExchangeRate>, NbpError> {
        let url = rates_url(&self.base_url, table, currency.code(), kind);
        debug!("Fetching NBP rates: {}", url);

        let request = HttpRequest::get(&url).with_header("Accept", "application/json");
        let response = self.transport.execute(request).await.map_err(|e| {
            warn!("NBP request failed for {}: {}", url, e);
            NbpError::api(format!("Request to {} failed: {}", url, e))
        })?;

        if !response.is_success() {
            warn!("NBP API returned {} for {}", response.status, url);
            return Err(NbpError::api_status(
                response.status,
                format!("{} returned {}: {}", url, response.status, response.body.trim()),
            ));
        }

        let parsed = RatesResponse::parse(&response.body)?;
        parsed.check_code(currency.code())?;
        let mut rates = Vec::with_capacity(parsed.rates.len());
        for entry in &parsed.rates {
            let date = parse_rate_date(&entry.effective_date)
                .map_err(|e| NbpError::api(format!("Invalid entry in {}: {}", url, e)))?;
            let values = entry
                .rates(mode)
                .map_err(|e| NbpError::api(format!("Invalid entry in {}: {}", url, e)))?;

            let mut rate = ExchangeRate::new(currency, date, values)?;
            if let Some(no) = &entry.no {
                rate = rate.with_source_id(no.clone());
            }
            rates.push(rate);
        }

        debug!("Received {} rate(s) from table {}", rates.len(), table);
        Ok(rates)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::StaticCurrencyRegistry;
    use crate::transport::{HttpResponse, TransportError};
    use async_trait::async_trait;
    use rust_decimal_macros::dec;
    use std::collections::HashMap;
    use std::sync::Mutex;

    const BASE: &str = "https://api.nbp.pl/api";

    #[derive(Default)]
    struct MockTransport {
        responses: HashMap<String, HttpResponse>,
        requests: Mutex<Vec<HttpRequest>>,
    }

    impl MockTransport {
        fn with(mut self, url: &str, response: HttpResponse) -> Self {
            self.responses.insert(url.to_string(), response);
            self
        }

        fn urls(&self) -> Vec<String> {
            self.requests
                .lock()
                .unwrap()
                .iter()
                .map(|r| r.url.clone())
                .collect()
        }
    }

    #[async_trait]
    impl HttpTransport for MockTransport {
        async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
            self.requests.lock().unwrap().push(request.clone());
            match self.responses.get(&request.url) {
                Some(response) => Ok(response.clone()),
                None => Err(TransportError::new("connection refused")),
            }
        }
    }

    fn resolver(transport: Arc<MockTransport>) -> RateResolver {
        RateResolver::new(StaticCurrencyRegistry::builtin(), transport, BASE)
    }

    fn date(s: &str) -> NaiveDate {
        parse_rate_date(s).unwrap()
    }

    #[tokio::test]
    async fn test_resolve_sorts_by_date() {
        let url = format!("{}/exchangerates/rates/a/eur/last/3", BASE);
        let transport = Arc::new(MockTransport::default().with(
            &url,
            HttpResponse::ok_json(
                r#"{"table":"A","code":"EUR","rates":[
                    {"no":"003/A/NBP/2017","effectiveDate":"2017-01-04","mid":4.4}
                    ,{"no":"001/A/NBP/2017","effectiveDate":"2017-01-02","mid":4.2}
                    ,{"no":"002/A/NBP/2017","effectiveDate":"2017-01-03","mid":4.3}]}"#,
            ),
        ));

        let rates = resolver(transport.clone())
            .resolve("eur", &RateQuery::mid(QueryKind::Last(3)), NumericMode::Decimal)
            .await
            .unwrap();

        let dates: Vec<_> = rates.iter().map(|r| r.date()).collect();
        assert_eq!(
            dates,
            vec![date("2017-01-02"), date("2017-01-03"), date("2017-01-04")]
        );
        assert_eq!(rates[0].source_id(), Some("001/A/NBP/2017"));
        assert_eq!(rates[0].currency_code(), "EUR");
        assert_eq!(transport.urls(), vec![url]);
    }

    #[tokio::test]
    async fn test_request_accepts_json() {
        let url = format!("{}/exchangerates/rates/a/usd/", BASE);
        let transport = Arc::new(MockTransport::default().with(
            &url,
            HttpResponse::ok_json(r#"{"rates":[{"effectiveDate":"2017-01-02","mid":4.1793}]}"#),
        ));

        let rates = resolver(transport.clone())
            .resolve("USD", &RateQuery::mid(QueryKind::Current), NumericMode::Decimal)
            .await
            .unwrap();

        assert_eq!(rates[0].mid().unwrap().as_decimal(), Some(dec!(4.1793)));
        let request = transport.requests.lock().unwrap()[0].clone();
        assert_eq!(request.header("accept"), Some("application/json"));
    }

    #[tokio::test]
    async fn test_bid_ask_uses_table_c() {
        let url = format!("{}/exchangerates/rates/c/usd/today", BASE);
        let transport = Arc::new(MockTransport::default().with(
            &url,
            HttpResponse::ok_json(
                r#"{"rates":[{"effectiveDate":"2017-01-02","bid":4.1202,"ask":4.2034}]}"#,
            ),
        ));

        let rates = resolver(transport)
            .resolve("USD", &RateQuery::bid_ask(QueryKind::Today), NumericMode::Float)
            .await
            .unwrap();

        assert_eq!(rates[0].bid().unwrap().as_f64(), Some(4.1202));
        assert_eq!(rates[0].ask().unwrap().as_f64(), Some(4.2034));
        assert_eq!(rates[0].mode(), NumericMode::Float);
    }

    #[tokio::test]
    async fn test_bid_ask_unavailable_skips_request() {
        let transport = Arc::new(MockTransport::default());
        let err = resolver(transport.clone())
            .resolve("GYD", &RateQuery::bid_ask(QueryKind::Current), NumericMode::Decimal)
            .await
            .unwrap_err();

        assert_eq!(err, NbpError::BidAskUnavailable("GYD".to_string()));
        assert!(transport.urls().is_empty());
    }

    #[tokio::test]
    async fn test_unknown_code() {
        let transport = Arc::new(MockTransport::default());
        let err = resolver(transport)
            .resolve("XYZ", &RateQuery::mid(QueryKind::Current), NumericMode::Decimal)
            .await
            .unwrap_err();
        assert_eq!(err, NbpError::UnknownCurrencyCode("XYZ".to_string()));
    }

    #[tokio::test]
    async fn test_non_success_status_is_api_error() {
        let url = format!("{}/exchangerates/rates/a/usd/today", BASE);
        let transport = Arc::new(
            MockTransport::default().with(&url, HttpResponse::new(404, "404 NotFound - Not Found")),
        );

        let err = resolver(transport)
            .resolve("USD", &RateQuery::mid(QueryKind::Today), NumericMode::Decimal)
            .await
            .unwrap_err();

        assert_eq!(err.status(), Some(404));
        assert!(err.is_suppressible());
    }

    #[tokio::test]
    async fn test_transport_failure_is_api_error() {
        let transport = Arc::new(MockTransport::default());
        let err = resolver(transport)
            .resolve("USD", &RateQuery::mid(QueryKind::Today), NumericMode::Decimal)
            .await
            .unwrap_err();

        assert!(matches!(err, NbpError::Api { status: None, .. }));
    }

    #[tokio::test]
    async fn test_malformed_entry_is_api_error() {
        let url = format!("{}/exchangerates/rates/a/usd/today", BASE);
        let transport = Arc::new(MockTransport::default().with(
            &url,
            HttpResponse::ok_json(r#"{"rates":[{"effectiveDate":"02.01.2017","mid":4.1}]}"#),
        ));

        let err = resolver(transport)
            .resolve("USD", &RateQuery::mid(QueryKind::Today), NumericMode::Decimal)
            .await
            .unwrap_err();

        assert!(matches!(err, NbpError::Api { .. }));
    }

    #[tokio::test]
    async fn test_response_for_other_currency_is_api_error() {
        let url = format!("{}/exchangerates/rates/a/usd/", BASE);
        let transport = Arc::new(MockTransport::default().with(
            &url,
            HttpResponse::ok_json(
                r#"{"table":"A","code":"EUR","rates":[{"effectiveDate":"2017-01-02","mid":4.4}]}"#,
            ),
        ));

        let err = resolver(transport)
            .resolve("USD", &RateQuery::mid(QueryKind::Current), NumericMode::Decimal)
            .await
            .unwrap_err();

        assert!(matches!(err, NbpError::Api { status: None, .. }));
        assert!(err.is_suppressible());
    }

    #[tokio::test]
    async fn test_empty_rates() {
        let url = format!("{}/exchangerates/rates/a/usd/last/0", BASE);
        let transport = Arc::new(
            MockTransport::default().with(&url, HttpResponse::ok_json(r#"{"rates":[]}"#)),
        );

        let rates = resolver(transport)
            .resolve("USD", &RateQuery::mid(QueryKind::Last(0)), NumericMode::Decimal)
            .await
            .unwrap();
        assert!(rates.is_empty());
    }

    #[tokio::test]
    async fn test_multi_table_merge_last_table_wins() {
        let registry = StaticCurrencyRegistry::from_descriptors([CurrencyDescriptor::new(
            "ZZZ",
            "Test currency",
            [RateTable::A, RateTable::B],
        )
        .unwrap()])
        .unwrap();

        let url_a = format!("{}/exchangerates/rates/a/zzz/last/2", BASE);
        let url_b = format!("{}/exchangerates/rates/b/zzz/last/2", BASE);
        let transport = Arc::new(
            MockTransport::default()
                .with(
                    &url_a,
                    HttpResponse::ok_json(
                        r#"{"rates":[
                            {"no":"a1","effectiveDate":"2017-01-02","mid":1.0},
                            {"no":"a2","effectiveDate":"2017-01-03","mid":2.0}]}"#,
                    ),
                )
                .with(
                    &url_b,
                    HttpResponse::ok_json(
                        r#"{"rates":[
                            {"no":"b2","effectiveDate":"2017-01-03","mid":20.0},
                            {"no":"b3","effectiveDate":"2017-01-04","mid":30.0}]}"#,
                    ),
                ),
        );

        let rates = RateResolver::new(Arc::new(registry), transport.clone(), BASE)
            .resolve("zzz", &RateQuery::mid(QueryKind::Last(2)), NumericMode::Decimal)
            .await
            .unwrap();

        let sources: Vec<_> = rates.iter().filter_map(|r| r.source_id()).collect();
        assert_eq!(sources, vec!["a1", "b2", "b3"]);
        assert_eq!(transport.urls(), vec![url_a, url_b]);
    }
}
