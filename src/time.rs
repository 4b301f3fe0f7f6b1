//! # Calendar and Julian-date utilities
//!
//! Conversions between ISO calendar dates (`YYYY-MM-DD`) and the continuous day counts used by
//! the orbital model, plus a few formatting helpers for light-travel times.
//!
//! Calendar validation relies on [hifitime](https://docs.rs/hifitime); the Julian Day Number
//! itself is computed with the integer Gregorian algorithm (Meeus, *Astronomical Algorithms*,
//! ch. 7) so that the result is exact at midnight UT.

use hifitime::Epoch;
use serde::Serialize;

use crate::constants::{
    JulianCentury, JulianDate, DAYS_PER_JULIAN_CENTURY, J2000_JD, VOYAGER1_LAUNCH,
};
use crate::orrery_errors::OrreryError;

/// Split and validate an ISO date of the form `YYYY-MM-DD`.
///
/// Arguments
/// ---------
/// * `date_iso`: the calendar date, e.g. `"2024-02-29"`
///
/// Return
/// ------
/// * `(year, month, day)` or [`OrreryError::InvalidDate`] if the string is malformed or the
///   day does not exist in the Gregorian calendar.
pub fn parse_iso_date(date_iso: &str) -> Result<(i32, u8, u8), OrreryError> {
    let invalid = || OrreryError::InvalidDate(date_iso.to_string());

    let mut parts = date_iso.trim().splitn(3, '-');
    let (Some(y), Some(m), Some(d)) = (parts.next(), parts.next(), parts.next()) else {
        return Err(invalid());
    };

    let year: i32 = y.parse().map_err(|_| invalid())?;
    let month: u8 = m.parse().map_err(|_| invalid())?;
    let day: u8 = d.parse().map_err(|_| invalid())?;

    Epoch::maybe_from_gregorian_utc(year, month, day, 0, 0, 0, 0).map_err(|_| invalid())?;

    Ok((year, month, day))
}

/// Julian Date at midnight UT for a Gregorian calendar day.
///
/// The month/year indices are shifted so the year starts in March, the day-count polynomial is
/// applied, and 0.5 is subtracted to move from the noon-based JDN to midnight.
pub fn gregorian_to_jd(year: i32, month: u8, day: u8) -> JulianDate {
    let (y, m, d) = (year as i64, month as i64, day as i64);
    let a = (14 - m).div_euclid(12);
    let yr = y + 4800 - a;
    let mo = m + 12 * a - 3;

    let jdn = d + (153 * mo + 2).div_euclid(5) + 365 * yr + yr.div_euclid(4)
        - yr.div_euclid(100)
        + yr.div_euclid(400)
        - 32045;

    jdn as f64 - 0.5
}

/// Convert an ISO date string (`YYYY-MM-DD`) to a Julian Date at midnight UT.
///
/// Return
/// ------
/// * The Julian Date, or [`OrreryError::InvalidDate`] on a malformed input.
pub fn iso_to_jd(date_iso: &str) -> Result<JulianDate, OrreryError> {
    let (y, m, d) = parse_iso_date(date_iso)?;
    Ok(gregorian_to_jd(y, m, d))
}

/// Julian centuries elapsed since J2000.0 (JD 2451545.0).
#[inline]
pub fn julian_centuries(jd: JulianDate) -> JulianCentury {
    (jd - J2000_JD) / DAYS_PER_JULIAN_CENTURY
}

fn clock_error<E: std::fmt::Display>(err: E) -> OrreryError {
    OrreryError::SystemClock(err.to_string())
}

/// Today's date (UTC) as `YYYY-MM-DD`.
///
/// Fails with [`OrreryError::SystemClock`] when the host clock cannot be read.
pub fn today_iso() -> Result<String, OrreryError> {
    let now = Epoch::now().map_err(clock_error)?;
    let (y, m, d, ..) = now.to_gregorian_utc();
    Ok(format!("{y:04}-{m:02}-{d:02}"))
}

/// Render a duration given in seconds as zero-padded `HH:MM:SS`.
///
/// The value is floored to whole seconds and hours are not wrapped at 24.
/// Non-finite inputs render as `--:--:--`.
pub fn seconds_to_hms(total_seconds: f64) -> String {
    if !total_seconds.is_finite() {
        return "--:--:--".to_string();
    }
    let s = total_seconds.floor().max(0.0) as u64;
    let h = s / 3600;
    let min = (s % 3600) / 60;
    let sec = s % 60;
    format!("{h:02}:{min:02}:{sec:02}")
}

/// An inclusive calendar range requested from the ephemeris service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DateRange {
    pub start_date: String,
    pub end_date: String,
}

impl DateRange {
    /// Build a validated range.
    ///
    /// Both bounds must be valid ISO dates and `start <= end`.
    pub fn new(start_date: &str, end_date: &str) -> Result<Self, OrreryError> {
        let jd_start = iso_to_jd(start_date)?;
        let jd_end = iso_to_jd(end_date)?;
        if jd_start > jd_end {
            return Err(OrreryError::InvalidDateRange {
                start: start_date.to_string(),
                end: end_date.to_string(),
            });
        }
        Ok(DateRange {
            start_date: start_date.trim().to_string(),
            end_date: end_date.trim().to_string(),
        })
    }

    /// From the first Voyager 1 ephemeris day up to today.
    pub fn voyager_era() -> Result<Self, OrreryError> {
        DateRange::new(VOYAGER1_LAUNCH, &today_iso()?)
    }

    /// Number of daily samples covered by the range, both ends included.
    pub fn day_count(&self) -> usize {
        // Both bounds were validated in `new`
        match (iso_to_jd(&self.start_date), iso_to_jd(&self.end_date)) {
            (Ok(a), Ok(b)) => (b - a).round() as usize + 1,
            _ => 0,
        }
    }
}

#[cfg(test)]
mod time_test {
    use super::*;

    #[test]
    fn test_iso_to_jd_j2000() {
        assert_eq!(iso_to_jd("2000-01-01").unwrap(), 2451544.5);
        assert_eq!(iso_to_jd("2000-01-02").unwrap(), 2451545.5);
    }

    #[test]
    fn test_iso_to_jd_matches_hifitime() {
        for date in ["1977-09-06", "2021-07-04", "2024-02-29", "2050-12-31"] {
            let (y, m, d) = parse_iso_date(date).unwrap();
            let expected = Epoch::from_gregorian_utc_at_midnight(y, m, d).to_jde_utc_days();
            assert!((iso_to_jd(date).unwrap() - expected).abs() < 1e-9, "date {date}");
        }
    }

    #[test]
    fn test_invalid_dates() {
        assert_eq!(
            iso_to_jd("2023-02-30"),
            Err(OrreryError::InvalidDate("2023-02-30".into()))
        );
        assert!(iso_to_jd("2023-Feb-10").is_err());
        assert!(iso_to_jd("20230210").is_err());
        assert!(iso_to_jd("").is_err());
    }

    #[test]
    fn test_julian_centuries() {
        assert_eq!(julian_centuries(J2000_JD), 0.0);
        assert_eq!(julian_centuries(J2000_JD + 36525.0), 1.0);
    }

    #[test]
    fn test_seconds_to_hms() {
        assert_eq!(seconds_to_hms(0.0), "00:00:00");
        assert_eq!(seconds_to_hms(499.9), "00:08:19");
        assert_eq!(seconds_to_hms(3661.0), "01:01:01");
        // hours are not wrapped at 24
        assert_eq!(seconds_to_hms(90_000.0), "25:00:00");
        assert_eq!(seconds_to_hms(f64::NAN), "--:--:--");
    }

    #[test]
    fn test_date_range() {
        let range = DateRange::new("2024-01-01", "2024-01-31").unwrap();
        assert_eq!(range.day_count(), 31);

        let single = DateRange::new("2024-03-01", "2024-03-01").unwrap();
        assert_eq!(single.day_count(), 1);

        assert_eq!(
            DateRange::new("2024-02-01", "2024-01-01"),
            Err(OrreryError::InvalidDateRange {
                start: "2024-02-01".into(),
                end: "2024-01-01".into()
            })
        );
    }

    #[test]
    fn test_today_iso_is_parsable() {
        let today = today_iso().unwrap();
        assert!(parse_iso_date(&today).is_ok());
        assert!(DateRange::voyager_era().unwrap().day_count() > 17_000);
    }

    #[test]
    fn test_clock_error_is_not_a_date_error() {
        let err = clock_error("time went backwards");
        assert_eq!(err, OrreryError::SystemClock("time went backwards".into()));
        assert_ne!(err, OrreryError::InvalidDate("time went backwards".into()));
        assert_eq!(err.to_string(), "System clock unavailable: time went backwards");
    }
}
