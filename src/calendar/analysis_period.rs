//! calendar::analysis_period — calendar windows sampled at a fixed timestep.
//!
//! Purpose
//! -------
//! Define [`AnalysisPeriod`], the object that gives temporal meaning to a
//! data series: a start and end date, a daily hour window, a number of
//! timesteps per hour and a leap-year flag. The period generates the ordered
//! set of instants it covers and exposes derived views of that set (minutes
//! and hours of year, days, months, month/hour pairs).
//!
//! Key behaviors
//! -------------
//! - Validation on construction: timestep from the accepted divisor set,
//!   months in 1–12, hours in 0–23, start day inside its month. An end day
//!   past the end of its month is clamped to the last day with a
//!   `log::warn!` diagnostic.
//! - *Reversed* periods (start later in the year than end) wrap around
//!   New Year; *overnight* periods (start hour after end hour) wrap around
//!   midnight. Both can combine.
//! - The instant index is generated once per instance and memoised in a
//!   `OnceCell`; `len()` uses a closed form for whole-day windows and only
//!   materialises the index otherwise.
//!
//! Invariants
//! ----------
//! - The generated index is duplicate-free and in period order (for a
//!   reversed period: start → Dec 31, then Jan 1 → end).
//! - `len() == moys().len()` for every valid period.
//! - Equality and hashing consider only the defining fields, never the
//!   cache.
//!
//! Conventions
//! -----------
//! - Hours are inclusive at both ends: `st_hour = 0, end_hour = 23` is a
//!   whole day. With timesteps above 1, the sub-hour steps after the last
//!   included hour (e.g. 23:30 at timestep 2) belong to the period.
//! - Text form: `"6/21 to 6/21 between 12 and 13 @1"`, with a trailing `*`
//!   for leap-year periods.
//! - Dictionary form: `{type, st_month, st_day, st_hour, end_month, end_day,
//!   end_hour, timestep, is_leap_year}`.

use std::cell::OnceCell;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use crate::calendar::datetime::{DateTime, MINUTES_PER_DAY, days_in_month, days_in_year};
use crate::calendar::errors::{CalendarError, CalendarResult};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

/// Timesteps per hour accepted by [`AnalysisPeriod`].
pub const VALID_TIMESTEPS: [u32; 12] = [1, 2, 3, 4, 5, 6, 10, 12, 15, 20, 30, 60];

#[derive(Debug, Clone, Default)]
struct PeriodIndex {
    moys: Vec<u32>,
    datetimes: Vec<DateTime>,
}

impl PeriodIndex {
    fn push(&mut self, moy: u32, leap_year: bool) {
        self.moys.push(moy);
        self.datetimes.push(DateTime::from_moy_in_year(moy, leap_year));
    }
}

/// AnalysisPeriod — a calendar window sampled every `60 / timestep` minutes.
///
/// Fields
/// ------
/// - `st_time`, `end_time`: start and end instants (minute 0).
/// - `timestep`: number of samples per hour.
/// - `is_leap_year`: whether February has 29 days.
/// - `index`: lazily generated `(moy, DateTime)` sequence.
///
/// Construction
/// ------------
/// Use [`AnalysisPeriod::new`] for explicit bounds, [`AnalysisPeriod::annual`]
/// for a whole year, or `Default` for a non-leap whole year at timestep 1.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "AnalysisPeriodRepr", into = "AnalysisPeriodRepr")]
pub struct AnalysisPeriod {
    st_time: DateTime,
    end_time: DateTime,
    timestep: u32,
    is_leap_year: bool,
    index: OnceCell<PeriodIndex>,
}

impl AnalysisPeriod {
    /// Build and validate an analysis period.
    ///
    /// Errors
    /// ------
    /// - [`CalendarError::InvalidTimestep`] for a timestep outside
    ///   [`VALID_TIMESTEPS`].
    /// - [`CalendarError::InvalidMonth`] / [`CalendarError::InvalidHour`] for
    ///   out-of-range bounds.
    /// - [`CalendarError::InvalidDate`] when the start day does not exist.
    ///
    /// Notes
    /// -----
    /// - An end day past the month end is clamped (with a warning) rather
    ///   than rejected.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        st_month: u32, st_day: u32, st_hour: u32, end_month: u32, end_day: u32, end_hour: u32,
        timestep: u32, is_leap_year: bool,
    ) -> CalendarResult<Self> {
        if !VALID_TIMESTEPS.contains(&timestep) {
            return Err(CalendarError::InvalidTimestep(timestep));
        }
        for month in [st_month, end_month] {
            if !(1..=12).contains(&month) {
                return Err(CalendarError::InvalidMonth(month));
            }
        }
        for hour in [st_hour, end_hour] {
            if hour > 23 {
                return Err(CalendarError::InvalidHour(hour));
            }
        }
        let last_day = days_in_month(end_month, is_leap_year);
        let end_day = if end_day > last_day {
            log::warn!(
                "Analysis period end day {end_day} is past the end of month {end_month}; \
                 using {last_day} instead"
            );
            last_day
        } else {
            end_day
        };
        let st_time = DateTime::new(st_month, st_day, st_hour, 0, is_leap_year)?;
        let end_time = DateTime::new(end_month, end_day, end_hour, 0, is_leap_year)?;
        Ok(AnalysisPeriod { st_time, end_time, timestep, is_leap_year, index: OnceCell::new() })
    }

    /// The whole year (Jan 1 00:00 to Dec 31 23:00) at `timestep`.
    pub fn annual(timestep: u32, is_leap_year: bool) -> CalendarResult<Self> {
        Self::new(1, 1, 0, 12, 31, 23, timestep, is_leap_year)
    }

    /// Parse the text form produced by `Display`.
    ///
    /// Accepts `"M/D to M/D between H and H @T"` with an optional trailing
    /// `*` marking a leap year.
    pub fn from_string(text: &str) -> CalendarResult<Self> {
        let parse_err = |reason: &str| CalendarError::Parse {
            input: text.to_string(),
            reason: reason.to_string(),
        };
        let trimmed = text.trim();
        let is_leap_year = trimmed.ends_with('*');
        let cleaned = trimmed
            .trim_end_matches('*')
            .to_lowercase()
            .replace(" to ", " ")
            .replace("between", " ")
            .replace(" and ", " ")
            .replace(['/', '@'], " ");
        let parts = cleaned
            .split_whitespace()
            .map(|tok| tok.parse::<u32>().map_err(|_| parse_err("expected integer fields")))
            .collect::<CalendarResult<Vec<u32>>>()?;
        match parts.as_slice() {
            [sm, sd, em, ed, sh, eh, ts] => Self::new(*sm, *sd, *sh, *em, *ed, *eh, *ts, is_leap_year),
            _ => Err(parse_err("expected 'M/D to M/D between H and H @T'")),
        }
    }

    /// Rebuild from the dictionary form.
    pub fn from_dict(value: &Value) -> CalendarResult<Self> {
        let repr: AnalysisPeriodRepr = serde_json::from_value(value.clone()).map_err(|e| {
            CalendarError::Parse { input: value.to_string(), reason: e.to_string() }
        })?;
        Self::try_from(repr)
    }

    /// Dictionary form; the inverse of [`AnalysisPeriod::from_dict`].
    pub fn to_dict(&self) -> Value {
        json!({
            "type": "AnalysisPeriod",
            "st_month": self.st_month(),
            "st_day": self.st_day(),
            "st_hour": self.st_hour(),
            "end_month": self.end_month(),
            "end_day": self.end_day(),
            "end_hour": self.end_hour(),
            "timestep": self.timestep,
            "is_leap_year": self.is_leap_year,
        })
    }

    pub fn st_month(&self) -> u32 {
        self.st_time.month()
    }

    pub fn st_day(&self) -> u32 {
        self.st_time.day()
    }

    pub fn st_hour(&self) -> u32 {
        self.st_time.hour()
    }

    pub fn end_month(&self) -> u32 {
        self.end_time.month()
    }

    pub fn end_day(&self) -> u32 {
        self.end_time.day()
    }

    pub fn end_hour(&self) -> u32 {
        self.end_time.hour()
    }

    pub fn st_time(&self) -> DateTime {
        self.st_time
    }

    pub fn end_time(&self) -> DateTime {
        self.end_time
    }

    pub fn timestep(&self) -> u32 {
        self.timestep
    }

    pub fn is_leap_year(&self) -> bool {
        self.is_leap_year
    }

    /// Minutes between consecutive samples.
    pub fn minute_intervals(&self) -> u32 {
        60 / self.timestep
    }

    /// Start instant later in the year than the end instant.
    pub fn is_reversed(&self) -> bool {
        self.st_time.moy() > self.end_time.moy()
    }

    /// Daily window wraps midnight.
    pub fn is_overnight(&self) -> bool {
        self.st_hour() > self.end_hour()
    }

    /// Jan 1 00:00 through Dec 31 23:00.
    pub fn is_annual(&self) -> bool {
        (self.st_month(), self.st_day(), self.st_hour()) == (1, 1, 0)
            && (self.end_month(), self.end_day(), self.end_hour()) == (12, 31, 23)
    }

    /// Every day of the period includes all 24 hours.
    pub fn covers_whole_days(&self) -> bool {
        self.st_hour() == 0 && self.end_hour() == 23
    }

    /// Whether a (fractional) hour of day falls inside the daily window.
    ///
    /// Hours past 23 (e.g. 23.5) are truncated when midnight itself is
    /// possible, so the trailing sub-hour steps of the last hour count.
    pub fn is_possible_hour(&self, hour: f64) -> bool {
        let hour = if hour > 23.0 && self.is_possible_hour(0.0) { hour.trunc() } else { hour };
        let (st, end) = (f64::from(self.st_hour()), f64::from(self.end_hour()));
        if self.is_overnight() {
            (st <= hour && hour <= 23.0) || (0.0 <= hour && hour <= end)
        } else {
            st <= hour && hour <= end
        }
    }

    /// Number of samples in the period.
    pub fn len(&self) -> usize {
        if self.covers_whole_days() {
            (self.num_days() * 24 * self.timestep) as usize
        } else {
            self.index().moys.len()
        }
    }

    /// A valid period always contains at least one sample.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn num_days(&self) -> u32 {
        let (st_doy, end_doy) = (self.st_time.doy(), self.end_time.doy());
        if self.is_reversed() {
            days_in_year(self.is_leap_year) - st_doy + 1 + end_doy
        } else {
            end_doy - st_doy + 1
        }
    }

    fn index(&self) -> &PeriodIndex {
        self.index.get_or_init(|| {
            let mut index = PeriodIndex::default();
            let (st, end) = (self.st_time.moy(), self.end_time.moy());
            if self.is_reversed() {
                let year_end = (days_in_year(self.is_leap_year) - 1) * MINUTES_PER_DAY + 23 * 60;
                self.walk(st, year_end, &mut index);
                self.walk(0, end, &mut index);
            } else {
                self.walk(st, end, &mut index);
            }
            log::debug!("Materialised {} samples for analysis period {self}", index.moys.len());
            index
        })
    }

    fn walk(&self, start: u32, end: u32, index: &mut PeriodIndex) {
        let step = self.minute_intervals();
        let mut curr = start;
        while curr <= end {
            if self.is_possible_hour(hour_of_moy(curr)) {
                index.push(curr, self.is_leap_year);
            }
            curr += step;
        }
        if self.timestep != 1 && (curr / 60) % 24 == 23 && self.is_possible_hour(0.0) {
            for k in 1..self.timestep {
                index.push(end + k * step, self.is_leap_year);
            }
        }
    }

    /// Minutes of year of every sample, in period order.
    pub fn moys(&self) -> &[u32] {
        &self.index().moys
    }

    /// Every sample instant, in period order.
    pub fn datetimes(&self) -> &[DateTime] {
        &self.index().datetimes
    }

    /// Fractional hours of year of every sample.
    pub fn hoys(&self) -> Vec<f64> {
        self.moys().iter().map(|&m| f64::from(m) / 60.0).collect()
    }

    /// Whole hours of year of every sample.
    pub fn hoys_int(&self) -> Vec<u32> {
        self.moys().iter().map(|&m| m / 60).collect()
    }

    /// Distinct days of year, in period order.
    pub fn doys_int(&self) -> Vec<u16> {
        let mut doys: Vec<u16> = self.datetimes().iter().map(|dt| dt.doy() as u16).collect();
        doys.dedup();
        doys
    }

    /// Distinct months, in period order.
    pub fn months_int(&self) -> Vec<u8> {
        let mut months: Vec<u8> = self.datetimes().iter().map(|dt| dt.month() as u8).collect();
        months.dedup();
        months
    }

    /// Distinct `(month, hour)` pairs, months in period order and hours in
    /// daily-window order.
    pub fn months_per_hour(&self) -> Vec<(u8, u8)> {
        let hours = self.hours_int();
        self.months_int()
            .into_iter()
            .flat_map(|m| hours.iter().map(move |&h| (m, h)))
            .collect()
    }

    /// Hours of the daily window in order (wrapping midnight when overnight).
    pub fn hours_int(&self) -> Vec<u8> {
        let (st, end) = (self.st_hour() as u8, self.end_hour() as u8);
        if self.is_overnight() { (st..24).chain(0..=end).collect() } else { (st..=end).collect() }
    }

    /// Whether `dt` is one of the period's samples.
    pub fn is_time_included(&self, dt: &DateTime) -> bool {
        dt.leap_year() == self.is_leap_year && self.moys().contains(&dt.moy())
    }

    /// Copy of this period with another timestep.
    pub fn with_timestep(&self, timestep: u32) -> CalendarResult<Self> {
        Self::new(
            self.st_month(),
            self.st_day(),
            self.st_hour(),
            self.end_month(),
            self.end_day(),
            self.end_hour(),
            timestep,
            self.is_leap_year,
        )
    }
}

fn hour_of_moy(moy: u32) -> f64 {
    f64::from(moy % MINUTES_PER_DAY) / 60.0
}

impl Default for AnalysisPeriod {
    fn default() -> Self {
        let st_time = DateTime::from_moy_in_year(0, false);
        let end_time = DateTime::from_moy_in_year(364 * MINUTES_PER_DAY + 23 * 60, false);
        AnalysisPeriod { st_time, end_time, timestep: 1, is_leap_year: false, index: OnceCell::new() }
    }
}

impl PartialEq for AnalysisPeriod {
    fn eq(&self, other: &Self) -> bool {
        self.st_time == other.st_time
            && self.end_time == other.end_time
            && self.timestep == other.timestep
            && self.is_leap_year == other.is_leap_year
    }
}

impl Eq for AnalysisPeriod {}

impl Hash for AnalysisPeriod {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.st_time.hash(state);
        self.end_time.hash(state);
        self.timestep.hash(state);
        self.is_leap_year.hash(state);
    }
}

impl std::fmt::Display for AnalysisPeriod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}/{} to {}/{} between {} and {} @{}{}",
            self.st_month(),
            self.st_day(),
            self.end_month(),
            self.end_day(),
            self.st_hour(),
            self.end_hour(),
            self.timestep,
            if self.is_leap_year { "*" } else { "" }
        )
    }
}

impl FromStr for AnalysisPeriod {
    type Err = CalendarError;

    fn from_str(s: &str) -> CalendarResult<Self> {
        Self::from_string(s)
    }
}

#[derive(Serialize, Deserialize)]
struct AnalysisPeriodRepr {
    #[serde(rename = "type", default = "period_type_name")]
    kind: String,
    st_month: u32,
    st_day: u32,
    st_hour: u32,
    end_month: u32,
    end_day: u32,
    end_hour: u32,
    timestep: u32,
    #[serde(default)]
    is_leap_year: bool,
}

fn period_type_name() -> String {
    "AnalysisPeriod".to_string()
}

impl From<AnalysisPeriod> for AnalysisPeriodRepr {
    fn from(p: AnalysisPeriod) -> Self {
        AnalysisPeriodRepr {
            kind: period_type_name(),
            st_month: p.st_month(),
            st_day: p.st_day(),
            st_hour: p.st_hour(),
            end_month: p.end_month(),
            end_day: p.end_day(),
            end_hour: p.end_hour(),
            timestep: p.timestep,
            is_leap_year: p.is_leap_year,
        }
    }
}

impl TryFrom<AnalysisPeriodRepr> for AnalysisPeriod {
    type Error = CalendarError;

    fn try_from(r: AnalysisPeriodRepr) -> CalendarResult<Self> {
        AnalysisPeriod::new(
            r.st_month, r.st_day, r.st_hour, r.end_month, r.end_day, r.end_hour, r.timestep,
            r.is_leap_year,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Constructor validation and end-day clamping.
    // - Index generation for plain, overnight, reversed and sub-hourly
    //   periods, and agreement between `len()` and the materialised index.
    // - Derived views (doys, months, month/hour pairs).
    // - Text and dictionary forms.
    //
    // They intentionally do NOT cover:
    // - Collection behavior built on top of periods (see collections::*).
    // -------------------------------------------------------------------------

    fn period(
        sm: u32, sd: u32, sh: u32, em: u32, ed: u32, eh: u32, ts: u32, leap: bool,
    ) -> AnalysisPeriod {
        AnalysisPeriod::new(sm, sd, sh, em, ed, eh, ts, leap).unwrap()
    }

    #[test]
    // Purpose
    // -------
    // Invalid bounds are rejected with the matching error variant.
    //
    // Given
    // -----
    // - Timestep 7, month 13, hour 24, start day Feb 30.
    //
    // Expect
    // ------
    // - `InvalidTimestep`, `InvalidMonth`, `InvalidHour`, `InvalidDate`.
    fn new_rejects_invalid_bounds() {
        assert_eq!(
            AnalysisPeriod::new(1, 1, 0, 12, 31, 23, 7, false).unwrap_err(),
            CalendarError::InvalidTimestep(7)
        );
        assert_eq!(
            AnalysisPeriod::new(13, 1, 0, 12, 31, 23, 1, false).unwrap_err(),
            CalendarError::InvalidMonth(13)
        );
        assert_eq!(
            AnalysisPeriod::new(1, 1, 24, 12, 31, 23, 1, false).unwrap_err(),
            CalendarError::InvalidHour(24)
        );
        assert!(matches!(
            AnalysisPeriod::new(2, 30, 0, 3, 1, 23, 1, false).unwrap_err(),
            CalendarError::InvalidDate { .. }
        ));
    }

    #[test]
    // Purpose
    // -------
    // An end day past the end of its month is clamped, leap-aware.
    //
    // Given
    // -----
    // - End Feb 30 in a common and a leap year; end Apr 31.
    //
    // Expect
    // ------
    // - End days 28, 29 and 30 respectively.
    fn end_day_is_clamped_to_month_length() {
        assert_eq!(period(1, 1, 0, 2, 30, 23, 1, false).end_day(), 28);
        assert_eq!(period(1, 1, 0, 2, 30, 23, 1, true).end_day(), 29);
        assert_eq!(period(4, 1, 0, 4, 31, 23, 1, false).end_day(), 30);
    }

    #[test]
    // Purpose
    // -------
    // Annual periods have 8760 (8784) samples per timestep.
    //
    // Given
    // -----
    // - Annual periods at timesteps 1 and 4, common and leap.
    //
    // Expect
    // ------
    // - `len()` equals the closed form and the materialised index length.
    fn annual_lengths_match_hours_in_year() {
        for (ts, leap, expected) in
            [(1, false, 8760), (1, true, 8784), (4, false, 8760 * 4), (4, true, 8784 * 4)]
        {
            let p = AnalysisPeriod::annual(ts, leap).unwrap();
            assert_eq!(p.len(), expected);
            assert_eq!(p.moys().len(), expected);
            assert!(p.is_annual());
        }
    }

    #[test]
    // Purpose
    // -------
    // A one-day, two-hour window yields exactly those two hours.
    //
    // Given
    // -----
    // - 6/21 between 12 and 13 @1.
    //
    // Expect
    // ------
    // - Two datetimes: 12:00 and 13:00 on June 21st.
    fn short_window_yields_inclusive_hours() {
        let p = period(6, 21, 12, 6, 21, 13, 1, false);
        let dts = p.datetimes();

        assert_eq!(p.len(), 2);
        assert_eq!(dts[0].to_array(), [6, 21, 12, 0]);
        assert_eq!(dts[1].to_array(), [6, 21, 13, 0]);
    }

    #[test]
    // Purpose
    // -------
    // Reversed periods wrap New Year and run start → Dec 31 → Jan 1 → end.
    //
    // Given
    // -----
    // - 12/1 to 1/31 between 0 and 23 @1.
    //
    // Expect
    // ------
    // - `is_reversed`, 62 days of 24 hours, first sample Dec 1, last Jan 31
    //   23:00, and the index agrees with the closed-form length.
    fn reversed_period_wraps_new_year() {
        let p = period(12, 1, 0, 1, 31, 23, 1, false);

        assert!(p.is_reversed());
        assert_eq!(p.len(), 31 * 24 + 31 * 24);
        assert_eq!(p.moys().len(), p.len());
        assert_eq!(p.datetimes()[0].to_array(), [12, 1, 0, 0]);
        assert_eq!(p.datetimes()[31 * 24].to_array(), [1, 1, 0, 0]);
        assert_eq!(p.datetimes().last().unwrap().to_array(), [1, 31, 23, 0]);
        assert_eq!(p.months_int(), vec![12, 1]);
    }

    #[test]
    // Purpose
    // -------
    // Overnight windows include the late and early hours of each day.
    //
    // Given
    // -----
    // - 1/1 to 1/2 between 22 and 2 @1.
    //
    // Expect
    // ------
    // - Samples start at the start instant: 22, 23, then 0, 1, 2 on day 2.
    fn overnight_window_wraps_midnight() {
        let p = period(1, 1, 22, 1, 2, 2, 1, false);
        let hours: Vec<u32> = p.datetimes().iter().map(|d| d.hour()).collect();

        assert!(p.is_overnight());
        assert_eq!(hours, vec![22, 23, 0, 1, 2]);
        assert_eq!(p.hours_int(), vec![22, 23, 0, 1, 2]);
    }

    #[test]
    // Purpose
    // -------
    // Sub-hourly periods include the trailing steps of the last hour.
    //
    // Given
    // -----
    // - 1/1 between 0 and 23 @2 (one day, half-hour steps).
    //
    // Expect
    // ------
    // - 48 samples, the last one at 23:30.
    fn sub_hourly_period_includes_trailing_steps() {
        let p = period(1, 1, 0, 1, 1, 23, 2, false);

        assert_eq!(p.moys().len(), 48);
        assert_eq!(p.datetimes().last().unwrap().to_array(), [1, 1, 23, 30]);
    }

    #[test]
    // Purpose
    // -------
    // Partial daily windows at sub-hourly timesteps stop at the end hour.
    //
    // Given
    // -----
    // - 1/1 to 1/2 between 8 and 10 @2.
    //
    // Expect
    // ------
    // - 5 samples per day (8:00, 8:30, 9:00, 9:30, 10:00), matching `len()`.
    fn partial_window_at_sub_hourly_timestep() {
        let p = period(1, 1, 8, 1, 2, 10, 2, false);

        assert_eq!(p.len(), 10);
        assert_eq!(p.datetimes()[4].to_array(), [1, 1, 10, 0]);
        assert_eq!(p.datetimes()[5].to_array(), [1, 2, 8, 0]);
    }

    #[test]
    // Purpose
    // -------
    // The text form round-trips, including the leap marker.
    //
    // Given
    // -----
    // - A leap-year period and its `Display` string.
    //
    // Expect
    // ------
    // - "6/21 to 6/21 between 12 and 13 @1*" parses back to an equal period.
    fn text_form_round_trips() {
        let p = period(6, 21, 12, 6, 21, 13, 1, true);
        let text = p.to_string();

        assert_eq!(text, "6/21 to 6/21 between 12 and 13 @1*");
        assert_eq!(text.parse::<AnalysisPeriod>().unwrap(), p);
        assert!(AnalysisPeriod::from_string("sometime in June").is_err());
    }

    #[test]
    // Purpose
    // -------
    // The dictionary form round-trips and carries a type tag.
    //
    // Given
    // -----
    // - A reversed sub-hourly period.
    //
    // Expect
    // ------
    // - `from_dict(to_dict())` is equal, `type == "AnalysisPeriod"`.
    fn dict_form_round_trips() {
        let p = period(11, 15, 3, 2, 10, 20, 4, false);
        let dict = p.to_dict();

        assert_eq!(dict["type"], "AnalysisPeriod");
        assert_eq!(AnalysisPeriod::from_dict(&dict).unwrap().to_dict(), dict);
        assert_eq!(serde_json::to_value(&p).unwrap(), dict);
    }

    #[test]
    fn default_is_common_annual_hourly() {
        let p = AnalysisPeriod::default();
        assert_eq!(p, AnalysisPeriod::annual(1, false).unwrap());
        assert_eq!(p.doys_int().len(), 365);
    }

    #[test]
    fn months_per_hour_pairs_each_month_with_window_hours() {
        let p = period(1, 1, 9, 2, 28, 10, 1, false);
        assert_eq!(p.months_per_hour(), vec![(1, 9), (1, 10), (2, 9), (2, 10)]);
    }
}
