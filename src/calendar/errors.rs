//! calendar::errors — error type for calendar primitives and analysis periods.
//!
//! Purpose
//! -------
//! Provide a single error enum, [`CalendarError`], and result alias,
//! [`CalendarResult`], for everything that builds or parses calendar
//! objects: [`DateTime`](crate::calendar::DateTime) values and
//! [`AnalysisPeriod`](crate::calendar::AnalysisPeriod) definitions.
//!
//! Conventions
//! -----------
//! - Months are 1-based (1–12), days are 1-based, hours are 0–23 and
//!   minutes 0–59. Error payloads always echo the offending inputs in these
//!   conventions.
//! - Error messages describe the calendar constraint that was violated
//!   rather than the internal representation (`chrono` year 2016/2017).
//! - When the `python-bindings` feature is enabled every variant maps to a
//!   Python `ValueError` carrying the `Display` message.

#[cfg(feature = "python-bindings")]
use pyo3::{PyErr, exceptions::PyValueError};

/// Result alias for calendar construction and parsing.
pub type CalendarResult<T> = Result<T, CalendarError>;

/// CalendarError — invalid calendar inputs.
///
/// Variants
/// --------
/// - `InvalidDate { month, day, hour, minute }`
///   The combination does not name a real instant in the (leap or
///   non-leap) reference year.
/// - `MoyOutOfRange { moy, leap_year }`
///   A minute-of-year lies outside `0..525_600` (`0..527_040` in leap years).
/// - `InvalidTimestep(timestep)`
///   The timestep is not a divisor of 60 from the accepted set.
/// - `InvalidMonth(month)` / `InvalidHour(hour)`
///   An analysis-period bound is out of range.
/// - `Parse { input, reason }`
///   Text could not be parsed into a calendar object.
#[derive(Debug, Clone, PartialEq)]
pub enum CalendarError {
    InvalidDate { month: u32, day: u32, hour: u32, minute: u32 },
    MoyOutOfRange { moy: i64, leap_year: bool },
    InvalidTimestep(u32),
    InvalidMonth(u32),
    InvalidHour(u32),
    Parse { input: String, reason: String },
}

impl std::error::Error for CalendarError {}

impl std::fmt::Display for CalendarError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CalendarError::InvalidDate { month, day, hour, minute } => {
                write!(f, "Invalid date/time: ({month}/{day}@{hour}:{minute:02}) (m/d@h:m)")
            }
            CalendarError::MoyOutOfRange { moy, leap_year } => {
                let limit = if *leap_year { 527_040 } else { 525_600 };
                write!(f, "Minute of year must satisfy 0 <= moy < {limit}; got {moy}")
            }
            CalendarError::InvalidTimestep(timestep) => {
                write!(
                    f,
                    "Invalid timestep {timestep}. Valid values are 1, 2, 3, 4, 5, 6, 10, 12, 15, 20, 30, 60"
                )
            }
            CalendarError::InvalidMonth(month) => {
                write!(f, "Month must be between 1 and 12; got {month}")
            }
            CalendarError::InvalidHour(hour) => {
                write!(f, "Hour must be between 0 and 23; got {hour}")
            }
            CalendarError::Parse { input, reason } => {
                write!(f, "Failed to parse '{input}': {reason}")
            }
        }
    }
}

#[cfg(feature = "python-bindings")]
impl From<CalendarError> for PyErr {
    fn from(err: CalendarError) -> PyErr {
        PyValueError::new_err(err.to_string())
    }
}
