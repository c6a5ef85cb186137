use std::fmt::{Display, Formatter};

use chrono::NaiveDate;

/// Shape of a logical rate query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueryKind {
    /// Most recently published rate
    Current,
    /// Rate published today (fails upstream if none yet)
    Today,
    /// Last `n` published rates; non-positive values are left to the API to reject
    Last(i32),
    /// Rate published on a date
    OnDate(NaiveDate),
    /// Rates published within an inclusive date range
    Range(NaiveDate, NaiveDate),
}

impl QueryKind {
    /// `true` for kinds whose callers take a single record.
    pub const fn expects_single(&self) -> bool {
        matches!(self, Self::Current | Self::Today | Self::OnDate(_))
    }
}

impl Display for QueryKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Current => f.write_str("current"),
            Self::Today => f.write_str("today"),
            Self::Last(n) => write!(f, "last/{}", n),
            Self::OnDate(date) => write!(f, "{}", date.format("%Y-%m-%d")),
            Self::Range(start, end) => write!(
                f,
                "{}/{}",
                start.format("%Y-%m-%d"),
                end.format("%Y-%m-%d")
            ),
        }
    }
}

/// A query kind together with the requested table type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RateQuery {
    pub kind: QueryKind,
    pub bid_ask: bool,
}

impl RateQuery {
    pub const fn new(kind: QueryKind, bid_ask: bool) -> Self {
        Self { kind, bid_ask }
    }

    /// Mid rate query.
    pub const fn mid(kind: QueryKind) -> Self {
        Self::new(kind, false)
    }

    /// Bid/ask query.
    pub const fn bid_ask(kind: QueryKind) -> Self {
        Self::new(kind, true)
    }
}

impl Display for RateQuery {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        if self.bid_ask {
            write!(f, "{}, bid/ask", self.kind)
        } else {
            write!(f, "{}, mid", self.kind)
        }
    }
}
