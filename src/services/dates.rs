//! Danish date input (`dd/mm/yyyy`) and API date formatting.

use chrono::{Datelike, NaiveDate};

/// Earliest year accepted in date inputs
pub const MIN_YEAR: i32 = 1900;

const API_FORMAT: &str = "%Y-%m-%d";

/// Parse `dd/mm/yyyy`; day and month may have one or two digits.
///
/// Returns `None` for anything that is not a real calendar date from
/// [`MIN_YEAR`] onwards.
pub fn parse_danish_date(raw: &str) -> Option<NaiveDate> {
    let mut parts = raw.trim().split('/');
    let (day, month, year) = (parts.next()?, parts.next()?, parts.next()?);
    if parts.next().is_some() {
        return None;
    }

    let digits = |s: &str, min: usize, max: usize| {
        (min..=max).contains(&s.len()) && s.bytes().all(|b| b.is_ascii_digit())
    };
    if !digits(day, 1, 2) || !digits(month, 1, 2) || !digits(year, 4, 4) {
        return None;
    }

    let date = NaiveDate::from_ymd_opt(year.parse().ok()?, month.parse().ok()?, day.parse().ok()?)?;
    (date.year() >= MIN_YEAR).then_some(date)
}

pub fn is_valid_danish_date(raw: &str) -> bool {
    parse_danish_date(raw).is_some()
}

/// `dd/mm/yyyy` with zero padding
pub fn format_danish_date(date: NaiveDate) -> String {
    date.format("%d/%m/%Y").to_string()
}

/// The API's `YYYY-MM-DD`
pub fn to_api_date(date: NaiveDate) -> String {
    date.format(API_FORMAT).to_string()
}
