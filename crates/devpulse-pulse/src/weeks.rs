//! Week bucket keys.
//!
//! A key is the UTC calendar date that opens the 7-day window containing an
//! instant. It is computed with civil-date arithmetic on [`NaiveDate`], never
//! by subtracting durations from the instant.

use std::fmt;

use chrono::{DateTime, Datelike, Days, NaiveDate, Utc};
use devpulse_core::WeekStart;

/// First day of a weekly bucket.
///
/// Ordering is chronological and matches the lexical order of [`WeekKey::iso`].
///
/// # Examples
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use devpulse_core::WeekStart;
/// use devpulse_pulse::weeks::week_key;
///
/// // Thursday 2024-02-29 belongs to the week opened by Sunday 2024-02-25.
/// let at = Utc.with_ymd_and_hms(2024, 2, 29, 23, 59, 59).unwrap();
/// let key = week_key(at, WeekStart::Sunday);
/// assert_eq!(key.iso(), "2024-02-25");
/// assert_eq!(key.label(), "2/25");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct WeekKey(NaiveDate);

impl WeekKey {
    /// Calendar date that opens the week.
    pub fn start(self) -> NaiveDate {
        self.0
    }

    /// ISO `YYYY-MM-DD` rendering.
    pub fn iso(self) -> String {
        self.0.format("%Y-%m-%d").to_string()
    }

    /// Short chart label, `M/D` without padding.
    pub fn label(self) -> String {
        format!("{}/{}", self.0.month(), self.0.day())
    }
}

impl fmt::Display for WeekKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.iso())
    }
}

/// Bucket key for `timestamp`, with weeks opening on `week_start` (UTC).
pub fn week_key(timestamp: DateTime<Utc>, week_start: WeekStart) -> WeekKey {
    let date = timestamp.date_naive();
    let weekday = date.weekday().num_days_from_sunday();
    let back = (weekday + 7 - week_start.days_from_sunday()) % 7;
    let start = date
        .checked_sub_days(Days::new(u64::from(back)))
        .unwrap_or(NaiveDate::MIN);
    WeekKey(start)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, min, 0).unwrap()
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn sunday_maps_to_itself() {
        let key = week_key(at(2024, 3, 10, 0, 0), WeekStart::Sunday);
        assert_eq!(key.start(), date(2024, 3, 10));
    }

    #[test]
    fn saturday_night_stays_in_same_week() {
        let key = week_key(at(2024, 3, 16, 23, 59), WeekStart::Sunday);
        assert_eq!(key.start(), date(2024, 3, 10));
        let next = week_key(at(2024, 3, 17, 0, 0), WeekStart::Sunday);
        assert_eq!(next.start(), date(2024, 3, 17));
        assert!(key < next);
    }

    #[test]
    fn week_spans_year_boundary() {
        let key = week_key(at(2024, 1, 1, 10, 0), WeekStart::Sunday);
        assert_eq!(key.iso(), "2023-12-31");
        assert_eq!(key.label(), "12/31");

        let key = week_key(at(2025, 1, 4, 18, 0), WeekStart::Sunday);
        assert_eq!(key.iso(), "2024-12-29");
    }

    #[test]
    fn dst_transition_dates_do_not_drift() {
        // US and EU clock changes; UTC civil dates are unaffected.
        let key = week_key(at(2024, 3, 31, 1, 30), WeekStart::Sunday);
        assert_eq!(key.start(), date(2024, 3, 31));
        let key = week_key(at(2024, 11, 3, 6, 30), WeekStart::Sunday);
        assert_eq!(key.start(), date(2024, 11, 3));
    }

    #[test]
    fn offset_timestamps_use_utc_date() {
        // 2024-03-16T22:00-05:00 is already Sunday 03:00 UTC.
        let local = DateTime::parse_from_rfc3339("2024-03-16T22:00:00-05:00").unwrap();
        let key = week_key(local.with_timezone(&Utc), WeekStart::Sunday);
        assert_eq!(key.start(), date(2024, 3, 17));
    }

    #[test]
    fn monday_week_start() {
        let key = week_key(at(2024, 3, 10, 12, 0), WeekStart::Monday);
        assert_eq!(key.start(), date(2024, 3, 4));
        let key = week_key(at(2024, 3, 11, 0, 0), WeekStart::Monday);
        assert_eq!(key.start(), date(2024, 3, 11));
    }

    #[test]
    fn saturday_week_start() {
        let key = week_key(at(2024, 3, 15, 12, 0), WeekStart::Saturday);
        assert_eq!(key.start(), date(2024, 3, 9));
    }

    #[test]
    fn iso_order_matches_chronological_order() {
        let a = week_key(at(2023, 12, 31, 0, 0), WeekStart::Sunday);
        let b = week_key(at(2024, 1, 7, 0, 0), WeekStart::Sunday);
        let c = week_key(at(2024, 10, 6, 0, 0), WeekStart::Sunday);
        assert!(a < b && b < c);
        assert!(a.iso() < b.iso() && b.iso() < c.iso());
        // Labels alone would sort "10/6" before "12/31".
        assert!(c.label() < a.label());
    }

    #[test]
    fn display_is_iso() {
        let key = week_key(at(2024, 7, 4, 0, 0), WeekStart::Sunday);
        assert_eq!(key.to_string(), "2024-06-30");
    }
}
