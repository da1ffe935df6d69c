//! calendar — reference-year instants and analysis periods.
//!
//! Purpose
//! -------
//! Provide the calendar layer every collection is keyed on: the
//! minute-resolution [`DateTime`] of a leap or common reference year, and the
//! [`AnalysisPeriod`] that turns a start date, an end date, a daily hour
//! window and a timestep into an ordered sequence of instants.
//!
//! Key behaviors
//! -------------
//! - [`datetime`] validates instants through `chrono` and converts between
//!   month/day/hour/minute, minute of year, hour of year and day of year.
//! - [`analysis_period`] validates period bounds, generates (and memoises)
//!   the covered instants, including reversed (New Year) and overnight
//!   (midnight) wraps, and exposes derived views (days, months, month/hour
//!   pairs).
//! - [`errors`] centralizes [`CalendarError`] / [`CalendarResult`].
//!
//! Invariants & assumptions
//! ------------------------
//! - There is no real year: the leap flag selects 2016 or 2017 internally
//!   and never leaks into the public API.
//! - Every public constructor validates; a constructed value is always a
//!   real instant / a non-empty period.
//!
//! Conventions
//! -----------
//! - Months and days are 1-based; hours, minutes, `moy` and `hoy` are
//!   0-based.
//! - The calendar layer logs only through the `log` facade (clamping
//!   warnings, index-materialisation debug lines) and never installs a
//!   logger.
//!
//! Downstream usage
//! ----------------
//! - `collections::Header` owns an [`AnalysisPeriod`]; hourly collections
//!   are keyed by [`DateTime`]; daily, monthly and monthly-per-hour keys are
//!   derived from the period's `doys_int`, `months_int` and
//!   `months_per_hour` views.
//!
//! Testing notes
//! -------------
//! - Unit tests live next to each submodule. Property tests over arbitrary
//!   valid periods (length vs. index, dictionary round trips) are in
//!   `tests/properties.rs`.

pub mod analysis_period;
pub mod datetime;
pub mod errors;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::analysis_period::{AnalysisPeriod, VALID_TIMESTEPS};
pub use self::datetime::{
    DateTime, MONTH_ABBREVIATIONS, NUM_OF_DAYS_EACH_MONTH, NUM_OF_DAYS_EACH_MONTH_LEAP,
    days_in_month, days_in_year, minutes_in_year,
};
pub use self::errors::{CalendarError, CalendarResult};

pub mod prelude {
    pub use super::{AnalysisPeriod, CalendarError, CalendarResult, DateTime};
}
