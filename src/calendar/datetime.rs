//! calendar::datetime — minute-resolution instants inside one reference year.
//!
//! Purpose
//! -------
//! Provide [`DateTime`], the time key of hourly and sub-hourly collections.
//! A `DateTime` names a month, day, hour and minute in a *reference* year
//! that is either a leap year or a common year; it deliberately carries no
//! real year so that typical-year weather data and simulation outputs can
//! be compared across years.
//!
//! Key behaviors
//! -------------
//! - Validate calendar components through `chrono` (2016 is used as the
//!   leap reference year and 2017 as the common one).
//! - Convert to and from minute-of-year (`moy`), hour-of-year (`hoy`) and
//!   day-of-year (`doy`) offsets.
//! - Order chronologically within a year; equality includes the leap flag.
//! - Serialize as a compact array `[month, day, hour, minute]`, with a
//!   trailing `true` for leap-year instants.
//!
//! Conventions
//! -----------
//! - `moy` and `hoy` are 0-based (`Jan 1 00:00` is 0); `doy` is 1-based.
//! - Seconds are not represented.

use crate::calendar::errors::{CalendarError, CalendarResult};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use serde::{Deserialize, Serialize};

/// Days in each month of a common year.
pub const NUM_OF_DAYS_EACH_MONTH: [u32; 12] = [31, 28, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31];

/// Days in each month of a leap year.
pub const NUM_OF_DAYS_EACH_MONTH_LEAP: [u32; 12] =
    [31, 29, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31];

/// Three-letter month abbreviations, indexed by `month - 1`.
pub const MONTH_ABBREVIATIONS: [&str; 12] =
    ["Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec"];

pub(crate) const MINUTES_PER_DAY: u32 = 1440;
const LEAP_REFERENCE_YEAR: i32 = 2016;
const COMMON_REFERENCE_YEAR: i32 = 2017;

/// Number of days in `month` (1-based) for the given year kind.
pub fn days_in_month(month: u32, leap_year: bool) -> u32 {
    let table = if leap_year { &NUM_OF_DAYS_EACH_MONTH_LEAP } else { &NUM_OF_DAYS_EACH_MONTH };
    table[(month.clamp(1, 12) - 1) as usize]
}

/// Number of days in the reference year.
pub fn days_in_year(leap_year: bool) -> u32 {
    if leap_year { 366 } else { 365 }
}

/// Number of minutes in the reference year.
pub fn minutes_in_year(leap_year: bool) -> u32 {
    days_in_year(leap_year) * MINUTES_PER_DAY
}

/// Day of year (1-based) of the first day of `month`.
pub(crate) fn first_doy_of_month(month: u32, leap_year: bool) -> u32 {
    (1..month).map(|m| days_in_month(m, leap_year)).sum::<u32>() + 1
}

/// DateTime — a month/day/hour/minute instant in a reference year.
///
/// Fields
/// ------
/// - `month`: 1–12.
/// - `day`: 1–length of `month`.
/// - `hour`: 0–23.
/// - `minute`: 0–59.
/// - `leap_year`: whether the reference year has a February 29th.
///
/// Invariants
/// ----------
/// - Every constructed value names a real instant of the reference year;
///   the only public constructors validate their inputs.
/// - Derived `Ord` follows field order, i.e. chronological order inside a
///   year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "DateTimeRepr", into = "DateTimeRepr")]
pub struct DateTime {
    month: u8,
    day: u8,
    hour: u8,
    minute: u8,
    leap_year: bool,
}

impl DateTime {
    /// Construct a validated [`DateTime`].
    ///
    /// Errors
    /// ------
    /// - [`CalendarError::InvalidDate`] when the components do not name a
    ///   real instant of the reference year (e.g. Feb 29 in a common year,
    ///   hour 24, minute 60).
    pub fn new(month: u32, day: u32, hour: u32, minute: u32, leap_year: bool) -> CalendarResult<Self> {
        let year = if leap_year { LEAP_REFERENCE_YEAR } else { COMMON_REFERENCE_YEAR };
        let valid = NaiveDate::from_ymd_opt(year, month, day).is_some()
            && NaiveTime::from_hms_opt(hour, minute, 0).is_some();
        if !valid {
            return Err(CalendarError::InvalidDate { month, day, hour, minute });
        }
        Ok(DateTime {
            month: month as u8,
            day: day as u8,
            hour: hour as u8,
            minute: minute as u8,
            leap_year,
        })
    }

    /// Construct a [`DateTime`] from a minute of the year.
    ///
    /// Errors
    /// ------
    /// - [`CalendarError::MoyOutOfRange`] when `moy` is negative or not
    ///   smaller than the number of minutes in the reference year.
    pub fn from_moy(moy: i64, leap_year: bool) -> CalendarResult<Self> {
        if moy < 0 || moy >= i64::from(minutes_in_year(leap_year)) {
            return Err(CalendarError::MoyOutOfRange { moy, leap_year });
        }
        Ok(Self::from_moy_in_year(moy as u32, leap_year))
    }

    /// Construct a [`DateTime`] from a (possibly fractional) hour of the year.
    ///
    /// The hour is rounded to the nearest minute before conversion.
    pub fn from_hoy(hoy: f64, leap_year: bool) -> CalendarResult<Self> {
        Self::from_moy((hoy * 60.0).round() as i64, leap_year)
    }

    /// Parse text such as `"31 Dec 12:00"`.
    pub fn from_date_time_string(text: &str, leap_year: bool) -> CalendarResult<Self> {
        let year = if leap_year { LEAP_REFERENCE_YEAR } else { COMMON_REFERENCE_YEAR };
        let stamped = format!("{} {year}", text.trim());
        let parsed = NaiveDateTime::parse_from_str(&stamped, "%d %b %H:%M %Y").map_err(|e| {
            CalendarError::Parse { input: text.to_string(), reason: e.to_string() }
        })?;
        Self::try_from(parsed)
    }

    /// Infallible conversion for minutes already known to lie in the year.
    ///
    /// Values past the end of the year saturate at Dec 31 23:59.
    pub(crate) fn from_moy_in_year(moy: u32, leap_year: bool) -> Self {
        let moy = moy.min(minutes_in_year(leap_year) - 1);
        let mut day_of_year = moy / MINUTES_PER_DAY;
        let mut month = 1u32;
        while month < 12 && day_of_year >= days_in_month(month, leap_year) {
            day_of_year -= days_in_month(month, leap_year);
            month += 1;
        }
        let minute_of_day = moy % MINUTES_PER_DAY;
        DateTime {
            month: month as u8,
            day: (day_of_year + 1) as u8,
            hour: (minute_of_day / 60) as u8,
            minute: (minute_of_day % 60) as u8,
            leap_year,
        }
    }

    pub fn month(&self) -> u32 {
        u32::from(self.month)
    }

    pub fn day(&self) -> u32 {
        u32::from(self.day)
    }

    pub fn hour(&self) -> u32 {
        u32::from(self.hour)
    }

    pub fn minute(&self) -> u32 {
        u32::from(self.minute)
    }

    pub fn leap_year(&self) -> bool {
        self.leap_year
    }

    /// Day of the year, 1-based.
    pub fn doy(&self) -> u32 {
        first_doy_of_month(self.month(), self.leap_year) + self.day() - 1
    }

    /// Hour of the year assuming minute 0.
    pub fn int_hoy(&self) -> u32 {
        (self.doy() - 1) * 24 + self.hour()
    }

    /// Hour of the year including the fractional minute part.
    pub fn hoy(&self) -> f64 {
        f64::from((self.doy() - 1) * 24) + self.float_hour()
    }

    /// Minute of the year.
    pub fn moy(&self) -> u32 {
        self.int_hoy() * 60 + self.minute()
    }

    /// Hour and minute as a float (6.25 for 06:15).
    pub fn float_hour(&self) -> f64 {
        f64::from(self.hour) + f64::from(self.minute) / 60.0
    }

    /// A new [`DateTime`] `minutes` later in the same reference year.
    ///
    /// Errors
    /// ------
    /// - [`CalendarError::MoyOutOfRange`] if the result leaves the year.
    pub fn add_minute(&self, minutes: i64) -> CalendarResult<Self> {
        Self::from_moy(i64::from(self.moy()) + minutes, self.leap_year)
    }

    pub fn sub_minute(&self, minutes: i64) -> CalendarResult<Self> {
        self.add_minute(-minutes)
    }

    /// A new [`DateTime`] shifted by a (possibly fractional) number of hours.
    pub fn add_hour(&self, hours: f64) -> CalendarResult<Self> {
        self.add_minute((hours * 60.0).round() as i64)
    }

    pub fn sub_hour(&self, hours: f64) -> CalendarResult<Self> {
        self.add_hour(-hours)
    }

    /// Compact array form `[month, day, hour, minute]`.
    pub fn to_array(&self) -> [u32; 4] {
        [self.month(), self.day(), self.hour(), self.minute()]
    }

    /// The equivalent `chrono` value in the reference year.
    pub fn to_naive_date_time(&self) -> Option<NaiveDateTime> {
        let year = if self.leap_year { LEAP_REFERENCE_YEAR } else { COMMON_REFERENCE_YEAR };
        NaiveDate::from_ymd_opt(year, self.month(), self.day())?.and_hms_opt(
            self.hour(),
            self.minute(),
            0,
        )
    }
}

impl TryFrom<NaiveDateTime> for DateTime {
    type Error = CalendarError;

    /// Drop the year (keeping only whether it is a leap year) and seconds.
    fn try_from(value: NaiveDateTime) -> CalendarResult<Self> {
        use chrono::Datelike;
        DateTime::new(value.month(), value.day(), value.hour(), value.minute(), value.date().leap_year())
    }
}

impl std::fmt::Display for DateTime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{:02} {} {:02}:{:02}",
            self.day,
            MONTH_ABBREVIATIONS[usize::from(self.month) - 1],
            self.hour,
            self.minute
        )
    }
}

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum DateTimeRepr {
    Leap(u32, u32, u32, u32, bool),
    Common(u32, u32, u32, u32),
}

impl From<DateTime> for DateTimeRepr {
    fn from(dt: DateTime) -> Self {
        let [m, d, h, mi] = dt.to_array();
        if dt.leap_year { DateTimeRepr::Leap(m, d, h, mi, true) } else { DateTimeRepr::Common(m, d, h, mi) }
    }
}

impl TryFrom<DateTimeRepr> for DateTime {
    type Error = CalendarError;

    fn try_from(repr: DateTimeRepr) -> CalendarResult<Self> {
        match repr {
            DateTimeRepr::Leap(m, d, h, mi, leap) => DateTime::new(m, d, h, mi, leap),
            DateTimeRepr::Common(m, d, h, mi) => DateTime::new(m, d, h, mi, false),
        }
    }
}
