//! Upstream resource paths.

use crate::models::{QueryKind, RateTable};

const RATES_PATH: &str = "exchangerates/rates";

/// Trailing path segment(s) for a query kind.
///
/// `Current` maps to an empty tail, so its URL ends with `/`.
pub fn query_tail(kind: &QueryKind) -> String {
    match kind {
        QueryKind::Current => String::new(),
        other => other.to_string(),
    }
}

/// Full URL of the rates resource for one table and currency.
///
/// Path components are lower-cased; `base_url` is used as given.
///
/// ```
/// use nbp_rates::models::{QueryKind, RateTable};
/// use nbp_rates::resolver::rates_url;
///
/// let url = rates_url("https://api.nbp.pl/api", RateTable::A, "EUR", &QueryKind::Last(5));
/// assert_eq!(url, "https://api.nbp.pl/api/exchangerates/rates/a/eur/last/5");
/// ```
pub fn rates_url(base_url: &str, table: RateTable, code: &str, kind: &QueryKind) -> String {
    format!(
        "{}/{}/{}/{}/{}",
        base_url.trim_end_matches('/'),
        RATES_PATH,
        table.path_segment(),
        code.trim().to_lowercase(),
        query_tail(kind).to_lowercase()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    const BASE: &str = "https://api.nbp.pl/api";

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_current_ends_with_slash() {
        assert_eq!(
            rates_url(BASE, RateTable::A, "USD", &QueryKind::Current),
            "https://api.nbp.pl/api/exchangerates/rates/a/usd/"
        );
    }

    #[test]
    fn test_tails() {
        assert_eq!(
            rates_url(BASE, RateTable::C, "CHF", &QueryKind::Today),
            "https://api.nbp.pl/api/exchangerates/rates/c/chf/today"
        );
        assert_eq!(
            rates_url(BASE, RateTable::B, "gyd", &QueryKind::OnDate(date("2017-01-02"))),
            "https://api.nbp.pl/api/exchangerates/rates/b/gyd/2017-01-02"
        );
        assert_eq!(
            rates_url(
                BASE,
                RateTable::A,
                "EUR",
                &QueryKind::Range(date("2017-01-02"), date("2017-01-31"))
            ),
            "https://api.nbp.pl/api/exchangerates/rates/a/eur/2017-01-02/2017-01-31"
        );
    }

    #[test]
    fn test_base_url_trailing_slash() {
        assert_eq!(
            rates_url("http://localhost:8080/API/", RateTable::A, "EUR", &QueryKind::Last(3)),
            "http://localhost:8080/API/exchangerates/rates/a/eur/last/3"
        );
    }

    #[test]
    fn test_non_positive_last_is_passed_through() {
        assert_eq!(
            rates_url(BASE, RateTable::A, "EUR", &QueryKind::Last(0)),
            "https://api.nbp.pl/api/exchangerates/rates/a/eur/last/0"
        );
        assert_eq!(query_tail(&QueryKind::Last(-2)), "last/-2");
    }
}
