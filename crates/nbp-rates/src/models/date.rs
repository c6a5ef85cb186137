use chrono::NaiveDate;

use crate::errors::NbpError;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Parse a strict `YYYY-MM-DD` calendar date.
///
/// Anything other than four year digits, two month digits and two day digits
/// separated by dashes fails, as do impossible dates such as `2017-02-30`.
pub fn parse_rate_date(input: &str) -> Result<NaiveDate, NbpError> {
    let bytes = input.as_bytes();
    let well_formed = bytes.len() == 10
        && bytes.iter().enumerate().all(|(index, b)| match index {
            4 | 7 => *b == b'-',
            _ => b.is_ascii_digit(),
        });

    if !well_formed {
        return Err(NbpError::DateFormatting(input.to_string()));
    }

    NaiveDate::parse_from_str(input, DATE_FORMAT)
        .map_err(|_| NbpError::DateFormatting(input.to_string()))
}

/// Values accepted wherever a rate date is expected.
///
/// Implemented for strings (validated with [`parse_rate_date`]), for
/// `NaiveDate` and for `Option` of either; `None` is a formatting error.
pub trait AsRateDate {
    fn as_rate_date(&self) -> Result<NaiveDate, NbpError>;
}

impl AsRateDate for NaiveDate {
    fn as_rate_date(&self) -> Result<NaiveDate, NbpError> {
        Ok(*self)
    }
}

impl AsRateDate for str {
    fn as_rate_date(&self) -> Result<NaiveDate, NbpError> {
        parse_rate_date(self)
    }
}

impl AsRateDate for String {
    fn as_rate_date(&self) -> Result<NaiveDate, NbpError> {
        parse_rate_date(self)
    }
}

impl<T: AsRateDate> AsRateDate for Option<T> {
    fn as_rate_date(&self) -> Result<NaiveDate, NbpError> {
        match self {
            Some(date) => date.as_rate_date(),
            None => Err(NbpError::DateFormatting("None".to_string())),
        }
    }
}

impl<T: AsRateDate + ?Sized> AsRateDate for &T {
    fn as_rate_date(&self) -> Result<NaiveDate, NbpError> {
        (**self).as_rate_date()
    }
}
