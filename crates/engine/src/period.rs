//! Date-range resolution for reports.
//!
//! A [`Period`] is a closed interval of calendar dates. It is either given
//! explicitly as a `YYYY-MM-DD` pair or derived from a `YYYY-MM` month token.

use std::fmt;

use chrono::{Datelike, Months, NaiveDate, Utc};
use chrono_tz::Tz;

use crate::{EngineError, ResultEngine};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Inclusive `[from, to]` date range with `from <= to`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Period {
    from: NaiveDate,
    to: NaiveDate,
    month: Option<String>,
}

impl Period {
    /// Builds a period from explicit bounds.
    pub fn new(from: NaiveDate, to: NaiveDate) -> ResultEngine<Self> {
        if from > to {
            return Err(EngineError::InvalidPeriod(format!(
                "from ({}) must not be after to ({})",
                from.format(DATE_FORMAT),
                to.format(DATE_FORMAT)
            )));
        }
        Ok(Self {
            from,
            to,
            month: None,
        })
    }

    /// Covers the whole calendar month `year-month`.
    pub fn for_month(year: i32, month: u32) -> ResultEngine<Self> {
        let first = NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(|| {
            EngineError::InvalidPeriod(format!("month out of range: {year:04}-{month:02}"))
        })?;
        // Day zero of the following month.
        let last = first
            .checked_add_months(Months::new(1))
            .and_then(|next| next.pred_opt())
            .ok_or_else(|| {
                EngineError::InvalidPeriod(format!("month out of range: {year:04}-{month:02}"))
            })?;

        Ok(Self {
            from: first,
            to: last,
            month: Some(format!("{year:04}-{month:02}")),
        })
    }

    /// Parses a `YYYY-MM` token.
    pub fn parse_month(token: &str) -> ResultEngine<Self> {
        let invalid = || EngineError::InvalidPeriod(format!("month must be YYYY-MM, got '{token}'"));

        let (year, month) = token.split_once('-').ok_or_else(invalid)?;
        if year.len() != 4 || month.len() != 2 || !all_digits(year) || !all_digits(month) {
            return Err(invalid());
        }
        let year: i32 = year.parse().map_err(|_| invalid())?;
        let month: u32 = month.parse().map_err(|_| invalid())?;
        if !(1..=12).contains(&month) {
            return Err(invalid());
        }

        Self::for_month(year, month)
    }

    /// The month containing `today`.
    pub fn current_month(today: NaiveDate) -> ResultEngine<Self> {
        Self::for_month(today.year(), today.month())
    }

    /// Resolves the period of a report request.
    ///
    /// A month token wins over explicit bounds. Explicit bounds must come as a
    /// pair. With nothing supplied the month containing `today` is used.
    /// Blank tokens count as absent; any other token is parsed as given.
    pub fn resolve(
        month: Option<&str>,
        from: Option<&str>,
        to: Option<&str>,
        today: NaiveDate,
    ) -> ResultEngine<Self> {
        let month = month.filter(|m| !m.trim().is_empty());
        let from = from.filter(|d| !d.trim().is_empty());
        let to = to.filter(|d| !d.trim().is_empty());

        match (month, from, to) {
            (Some(month), _, _) => Self::parse_month(month),
            (None, Some(from), Some(to)) => Self::new(parse_date(from)?, parse_date(to)?),
            (None, None, None) => Self::current_month(today),
            (None, _, _) => Err(EngineError::InvalidPeriod(
                "from and to must be supplied together".to_string(),
            )),
        }
    }

    pub fn from(&self) -> NaiveDate {
        self.from
    }

    pub fn to(&self) -> NaiveDate {
        self.to
    }

    /// The `YYYY-MM` token the period was derived from, if any.
    pub fn month(&self) -> Option<&str> {
        self.month.as_deref()
    }

    /// Lower bound rendered as `YYYY-MM-DD`.
    pub fn from_iso(&self) -> String {
        self.from.format(DATE_FORMAT).to_string()
    }

    /// Upper bound rendered as `YYYY-MM-DD`.
    pub fn to_iso(&self) -> String {
        self.to.format(DATE_FORMAT).to_string()
    }

}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..={}", self.from_iso(), self.to_iso())
    }
}

/// Parses a strict `YYYY-MM-DD` token.
pub fn parse_date(token: &str) -> ResultEngine<NaiveDate> {
    let invalid = || EngineError::InvalidPeriod(format!("date must be YYYY-MM-DD, got '{token}'"));

    let bytes = token.as_bytes();
    if !token.is_ascii() || bytes.len() != 10 || bytes[4] != b'-' || bytes[7] != b'-' {
        return Err(invalid());
    }
    if !all_digits(&token[0..4]) || !all_digits(&token[5..7]) || !all_digits(&token[8..10]) {
        return Err(invalid());
    }
    NaiveDate::parse_from_str(token, DATE_FORMAT).map_err(|_| invalid())
}

/// Today's calendar date in `tz`.
pub fn today_in(tz: Tz) -> NaiveDate {
    Utc::now().with_timezone(&tz).date_naive()
}

fn all_digits(value: &str) -> bool {
    !value.is_empty() && value.bytes().all(|b| b.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn leap_february_ends_on_29th() {
        let period = Period::parse_month("2024-02").unwrap();
        assert_eq!(period.from(), date(2024, 2, 1));
        assert_eq!(period.to(), date(2024, 2, 29));
        assert_eq!(period.month(), Some("2024-02"));
    }

    #[test]
    fn common_february_ends_on_28th() {
        let period = Period::parse_month("2023-02").unwrap();
        assert_eq!(period.to_iso(), "2023-02-28");
    }

    #[test]
    fn century_years_follow_gregorian_rules() {
        assert_eq!(Period::parse_month("1900-02").unwrap().to(), date(1900, 2, 28));
        assert_eq!(Period::parse_month("2000-02").unwrap().to(), date(2000, 2, 29));
    }

    #[test]
    fn every_month_ends_on_its_last_day() {
        let expected = [31, 28, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31];
        for (idx, last) in expected.into_iter().enumerate() {
            let month = idx as u32 + 1;
            let period = Period::for_month(2025, month).unwrap();
            assert_eq!(period.from(), date(2025, month, 1));
            assert_eq!(period.to(), date(2025, month, last), "month {month}");
        }
    }

    #[test]
    fn december_rolls_into_next_year() {
        let period = Period::parse_month("2024-12").unwrap();
        assert_eq!(period.to(), date(2024, 12, 31));
    }

    #[test]
    fn malformed_month_tokens_are_rejected() {
        for token in ["2024-2", "24-02", "2024/02", "2024-13", "2024-00", "abcd-ef", "2024-02-01"] {
            let err = Period::parse_month(token).unwrap_err();
            assert!(matches!(err, EngineError::InvalidPeriod(_)), "{token}");
        }
    }

    #[test]
    fn explicit_bounds_are_used_verbatim() {
        let period = Period::resolve(None, Some("2024-01-15"), Some("2024-03-02"), date(2030, 1, 1))
            .unwrap();
        assert_eq!(period.from(), date(2024, 1, 15));
        assert_eq!(period.to(), date(2024, 3, 2));
        assert_eq!(period.month(), None);
    }

    #[test]
    fn month_wins_over_explicit_bounds() {
        let period = Period::resolve(
            Some("2024-04"),
            Some("2024-01-01"),
            Some("2024-01-31"),
            date(2030, 1, 1),
        )
        .unwrap();
        assert_eq!(period.from_iso(), "2024-04-01");
        assert_eq!(period.to_iso(), "2024-04-30");
    }

    #[test]
    fn nothing_supplied_defaults_to_current_month() {
        let period = Period::resolve(None, None, None, date(2024, 2, 17)).unwrap();
        assert_eq!(period.from(), date(2024, 2, 1));
        assert_eq!(period.to(), date(2024, 2, 29));
        assert_eq!(period.month(), Some("2024-02"));
    }

    #[test]
    fn blank_tokens_count_as_missing() {
        let period = Period::resolve(Some(" "), Some(""), None, date(2024, 6, 3)).unwrap();
        assert_eq!(period.month(), Some("2024-06"));
    }

    #[test]
    fn padded_tokens_are_rejected() {
        for month in [" 2024-01", "2024-01 "] {
            let err = Period::resolve(Some(month), None, None, date(2024, 6, 3)).unwrap_err();
            assert!(matches!(err, EngineError::InvalidPeriod(_)), "{month:?}");
        }
        let err = Period::resolve(None, Some(" 2024-01-01"), Some("2024-01-31"), date(2024, 6, 3))
            .unwrap_err();
        assert!(matches!(err, EngineError::InvalidPeriod(_)));
    }

    #[test]
    fn inverted_range_is_rejected() {
        let err = Period::resolve(None, Some("2024-03-01"), Some("2024-02-01"), date(2024, 1, 1))
            .unwrap_err();
        assert!(matches!(err, EngineError::InvalidPeriod(_)));
    }

    #[test]
    fn single_day_range_is_allowed() {
        let period = Period::resolve(None, Some("2024-03-01"), Some("2024-03-01"), date(2024, 1, 1))
            .unwrap();
        assert_eq!(period.from(), date(2024, 3, 1));
        assert_eq!(period.to(), date(2024, 3, 1));
    }

    #[test]
    fn half_open_bounds_are_rejected() {
        let err = Period::resolve(None, Some("2024-03-01"), None, date(2024, 1, 1)).unwrap_err();
        assert_eq!(
            err,
            EngineError::InvalidPeriod("from and to must be supplied together".to_string())
        );
    }

    #[test]
    fn malformed_dates_are_rejected() {
        for token in ["2024-3-01", "2024-02-30", "20240301", "2024-03-1x"] {
            assert!(parse_date(token).is_err(), "{token}");
        }
    }

    #[test]
    fn rendered_bounds_sort_like_dates() {
        let a = Period::parse_month("2023-12").unwrap();
        let b = Period::parse_month("2024-01").unwrap();
        assert!(a.to_iso() < b.from_iso());
        assert_eq!(a.to_string(), "2023-12-01..=2023-12-31");
    }
}
