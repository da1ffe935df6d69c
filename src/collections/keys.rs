//! collections::keys — time keys and collection-type tags.
//!
//! Purpose
//! -------
//! Describe the four key densities a collection can be indexed by and the
//! static tag table that replaces runtime class identity.
//!
//! Key behaviors
//! -------------
//! - [`TimeKey`] is implemented for [`DateTime`] (hourly and sub-hourly),
//!   `u16` (day of year), `u8` (month) and `(u8, u8)` (month, hour). Each
//!   key knows its [`CollectionType`], the dictionary field its keys are
//!   stored under, how to read the matching keys off an [`AnalysisPeriod`]
//!   and where it sits in the calendar year.
//! - [`CollectionType::class_name`] is the lookup table from
//!   `(density, mutability)` to the public class name.
//!
//! Invariants & assumptions
//! ------------------------
//! - Two collections can only be aligned when their keys share a
//!   [`CollectionType`]; mutability never enters the tag.
//! - Continuous and discontinuous hourly collections carry different tags,
//!   so they are never aligned with each other.

use std::fmt::Debug;
use std::hash::Hash;

use serde::{Serialize, de::DeserializeOwned};

use crate::calendar::datetime::first_doy_of_month;
use crate::calendar::{AnalysisPeriod, CalendarError, DateTime, days_in_month};
use crate::collections::errors::{CollectionError, CollectionResult};

/// CollectionType — density family of a collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CollectionType {
    HourlyContinuous,
    HourlyDiscontinuous,
    Daily,
    Monthly,
    MonthlyPerHour,
}

impl CollectionType {
    pub const ALL: [CollectionType; 5] = [
        CollectionType::HourlyContinuous,
        CollectionType::HourlyDiscontinuous,
        CollectionType::Daily,
        CollectionType::Monthly,
        CollectionType::MonthlyPerHour,
    ];

    /// Public class name of the `(density, mutability)` pair.
    pub const fn class_name(self, mutable: bool) -> &'static str {
        match (self, mutable) {
            (CollectionType::HourlyContinuous, true) => "HourlyContinuousCollection",
            (CollectionType::HourlyContinuous, false) => "HourlyContinuousCollectionImmutable",
            (CollectionType::HourlyDiscontinuous, true) => "HourlyDiscontinuousCollection",
            (CollectionType::HourlyDiscontinuous, false) => {
                "HourlyDiscontinuousCollectionImmutable"
            }
            (CollectionType::Daily, true) => "DailyCollection",
            (CollectionType::Daily, false) => "DailyCollectionImmutable",
            (CollectionType::Monthly, true) => "MonthlyCollection",
            (CollectionType::Monthly, false) => "MonthlyCollectionImmutable",
            (CollectionType::MonthlyPerHour, true) => "MonthlyPerHourCollection",
            (CollectionType::MonthlyPerHour, false) => "MonthlyPerHourCollectionImmutable",
        }
    }

    /// Reverse lookup of [`CollectionType::class_name`]: `(tag, mutable)`.
    pub fn from_class_name(name: &str) -> Option<(CollectionType, bool)> {
        CollectionType::ALL
            .into_iter()
            .flat_map(|tag| [(tag, true), (tag, false)])
            .find(|&(tag, mutable)| tag.class_name(mutable) == name)
    }
}

/// TimeKey — one entry of a collection's key sequence.
///
/// Required items
/// --------------
/// - `COLLECTION_TYPE`: tag of discontinuous collections keyed by `Self`.
/// - `KEYS_FIELD`: dictionary field holding the key list.
/// - `period_keys`: the keys an [`AnalysisPeriod`] covers, in period order.
/// - `doy_span`: first and last day of year the key covers.
/// - `start_moy`: minute of year where the key starts (chronological sort).
///
/// Provided items
/// --------------
/// - `hour` / `minute`: intra-day position, when the key has one.
/// - `validate`: range check applied at collection construction.
/// - `check_period`: compatibility check before filtering by a period.
pub trait TimeKey:
    Copy + Eq + Ord + Hash + Debug + Serialize + DeserializeOwned + 'static
{
    const COLLECTION_TYPE: CollectionType;
    const KEYS_FIELD: &'static str;

    fn period_keys(period: &AnalysisPeriod) -> Vec<Self>;

    fn doy_span(&self, leap_year: bool) -> (u32, u32);

    fn start_moy(&self, leap_year: bool) -> u32;

    fn hour(&self) -> Option<u32> {
        None
    }

    fn minute(&self) -> u32 {
        0
    }

    /// Whether the key only exists in leap years.
    fn is_leap_day(&self) -> bool {
        false
    }

    fn validate(&self) -> CollectionResult<()> {
        Ok(())
    }

    fn check_period(_own: &AnalysisPeriod, _requested: &AnalysisPeriod) -> CollectionResult<()> {
        Ok(())
    }
}

impl TimeKey for DateTime {
    const COLLECTION_TYPE: CollectionType = CollectionType::HourlyDiscontinuous;
    const KEYS_FIELD: &'static str = "datetimes";

    fn period_keys(period: &AnalysisPeriod) -> Vec<Self> {
        period.datetimes().to_vec()
    }

    fn doy_span(&self, _leap_year: bool) -> (u32, u32) {
        (self.doy(), self.doy())
    }

    fn start_moy(&self, _leap_year: bool) -> u32 {
        self.moy()
    }

    fn hour(&self) -> Option<u32> {
        Some(DateTime::hour(self))
    }

    fn minute(&self) -> u32 {
        DateTime::minute(self)
    }

    fn is_leap_day(&self) -> bool {
        self.month() == 2 && self.day() == 29
    }

    /// Sub-hourly data can only be filtered by a period with its own
    /// timestep and leap flag.
    fn check_period(own: &AnalysisPeriod, requested: &AnalysisPeriod) -> CollectionResult<()> {
        if own.timestep() != requested.timestep() {
            return Err(CollectionError::IncompatiblePeriod(format!(
                "analysis_period timestep must match that on the collection header. {} != {}",
                requested.timestep(),
                own.timestep()
            )));
        }
        if own.is_leap_year() != requested.is_leap_year() {
            return Err(CollectionError::IncompatiblePeriod(format!(
                "analysis_period is_leap_year must match that on the collection header. \
                 {} != {}",
                requested.is_leap_year(),
                own.is_leap_year()
            )));
        }
        Ok(())
    }
}

impl TimeKey for u16 {
    const COLLECTION_TYPE: CollectionType = CollectionType::Daily;
    const KEYS_FIELD: &'static str = "doys";

    fn period_keys(period: &AnalysisPeriod) -> Vec<Self> {
        period.doys_int()
    }

    fn doy_span(&self, _leap_year: bool) -> (u32, u32) {
        (u32::from(*self), u32::from(*self))
    }

    fn start_moy(&self, _leap_year: bool) -> u32 {
        u32::from(*self).saturating_sub(1) * 1440
    }

    fn is_leap_day(&self) -> bool {
        *self == 366
    }

    fn validate(&self) -> CollectionResult<()> {
        if (1..=366).contains(self) {
            Ok(())
        } else {
            Err(CalendarError::MoyOutOfRange {
                moy: (i64::from(*self) - 1) * 1440,
                leap_year: true,
            }
            .into())
        }
    }
}

impl TimeKey for u8 {
    const COLLECTION_TYPE: CollectionType = CollectionType::Monthly;
    const KEYS_FIELD: &'static str = "months";

    fn period_keys(period: &AnalysisPeriod) -> Vec<Self> {
        period.months_int()
    }

    fn doy_span(&self, leap_year: bool) -> (u32, u32) {
        let month = u32::from(*self);
        let first = first_doy_of_month(month, leap_year);
        (first, first + days_in_month(month, leap_year) - 1)
    }

    fn start_moy(&self, leap_year: bool) -> u32 {
        (first_doy_of_month(u32::from(*self), leap_year) - 1) * 1440
    }

    fn validate(&self) -> CollectionResult<()> {
        if (1..=12).contains(self) {
            Ok(())
        } else {
            Err(CalendarError::InvalidMonth(u32::from(*self)).into())
        }
    }
}

impl TimeKey for (u8, u8) {
    const COLLECTION_TYPE: CollectionType = CollectionType::MonthlyPerHour;
    const KEYS_FIELD: &'static str = "months_per_hour";

    fn period_keys(period: &AnalysisPeriod) -> Vec<Self> {
        period.months_per_hour()
    }

    fn doy_span(&self, leap_year: bool) -> (u32, u32) {
        self.0.doy_span(leap_year)
    }

    fn start_moy(&self, leap_year: bool) -> u32 {
        self.0.start_moy(leap_year) + u32::from(self.1) * 60
    }

    fn hour(&self) -> Option<u32> {
        Some(u32::from(self.1))
    }

    fn validate(&self) -> CollectionResult<()> {
        self.0.validate()?;
        if self.1 > 23 {
            return Err(CalendarError::InvalidHour(u32::from(self.1)).into());
        }
        Ok(())
    }
}
