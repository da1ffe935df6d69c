//! collections::discontinuous — keyed collections of any density.
//!
//! Purpose
//! -------
//! [`Collection<K, M>`] stores one value per explicit time key. The key
//! type fixes the density (sub-hourly datetimes, days of year, months or
//! month-hours) and the marker `M` fixes whether values may change after
//! construction.
//!
//! Key behaviors
//! -------------
//! - Construction checks `len(values) == len(keys) > 0`, key ranges and key
//!   uniqueness.
//! - Subset filters (`filter_by_*`) return mutable collections whose
//!   header keeps the source period, except `filter_by_analysis_period`,
//!   which labels the result with the requested period.
//! - [`Collection::validate_analysis_period`] sorts the keys
//!   chronologically and reconciles the header period with them.
//! - `std::ops` arithmetic on references: collection ⊕ collection returns
//!   `CollectionResult`, collection ⊕ scalar is infallible.
//!
//! Invariants & assumptions
//! ------------------------
//! - Keys are unique; their order is the storage order (not necessarily
//!   chronological until validated).
//! - Immutable collections are only ever produced whole; no method writes
//!   through an `Immutable` collection.
//!
//! Conventions
//! -----------
//! - `Display` prints the density label, the period, the data type with
//!   its unit and the value count.

use std::collections::HashSet;
use std::fmt;
use std::marker::PhantomData;

use ndarray::Array1;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

use crate::calendar::datetime::MINUTES_PER_DAY;
use crate::calendar::{AnalysisPeriod, CalendarError, CalendarResult, DateTime, VALID_TIMESTEPS};
use crate::collections::base::{self, AlignedValues, BaseCollection};
use crate::collections::errors::{CollectionError, CollectionResult};
use crate::collections::header::Header;
use crate::collections::keys::{CollectionType, TimeKey};
use crate::collections::mutability::{Immutable, Mutability, Mutable};
use crate::datatype::DataType;

/// Collection — values paired with explicit time keys.
///
/// Fields
/// ------
/// - `header`: data type, unit, period and metadata.
/// - `values`: one value per key.
/// - `keys`: unique time keys in storage order.
/// - `validated_a_period`: set once the keys were reconciled with the
///   header period.
#[derive(Debug, Clone, PartialEq)]
pub struct Collection<K: TimeKey, M: Mutability = Mutable> {
    header: Header,
    values: Array1<f64>,
    keys: Vec<K>,
    validated_a_period: bool,
    mode: PhantomData<M>,
}

/// Sub-hourly or hourly values keyed by [`DateTime`].
pub type HourlyDiscontinuousCollection<M = Mutable> = Collection<DateTime, M>;
/// Daily values keyed by day of year (1–366).
pub type DailyCollection<M = Mutable> = Collection<u16, M>;
/// Monthly values keyed by month (1–12).
pub type MonthlyCollection<M = Mutable> = Collection<u8, M>;
/// Values keyed by `(month, hour)`.
pub type MonthlyPerHourCollection<M = Mutable> = Collection<(u8, u8), M>;

pub type HourlyDiscontinuousCollectionImmutable = Collection<DateTime, Immutable>;
pub type DailyCollectionImmutable = Collection<u16, Immutable>;
pub type MonthlyCollectionImmutable = Collection<u8, Immutable>;
pub type MonthlyPerHourCollectionImmutable = Collection<(u8, u8), Immutable>;

impl<K: TimeKey, M: Mutability> Collection<K, M> {
    /// Build a collection from a header, values and matching keys.
    ///
    /// Errors
    /// ------
    /// - `LengthMismatch` when values and keys differ in length.
    /// - `EmptyCollection` when both are empty.
    /// - `DuplicateKey` for a repeated key; calendar errors for keys out
    ///   of range.
    pub fn new(
        header: Header, values: impl Into<Array1<f64>>, keys: Vec<K>,
    ) -> CollectionResult<Self> {
        let values = values.into();
        if values.len() != keys.len() {
            return Err(CollectionError::LengthMismatch { expected: keys.len(), got: values.len() });
        }
        if keys.is_empty() {
            return Err(CollectionError::EmptyCollection);
        }
        let mut seen = HashSet::with_capacity(keys.len());
        for key in &keys {
            key.validate()?;
            if !seen.insert(*key) {
                return Err(CollectionError::DuplicateKey(format!("{key:?}")));
            }
        }
        Ok(Self::from_parts(header, values, keys, false))
    }

    /// Assemble without checks; callers guarantee the invariants.
    pub(crate) fn from_parts(
        header: Header, values: Array1<f64>, keys: Vec<K>, validated_a_period: bool,
    ) -> Self {
        Collection { header, values, keys, validated_a_period, mode: PhantomData }
    }

    /// Same contents in another access mode.
    pub(crate) fn convert_mode<M2: Mutability>(&self) -> Collection<K, M2> {
        Collection::from_parts(
            self.header.clone(),
            self.values.clone(),
            self.keys.clone(),
            self.validated_a_period,
        )
    }

    /// [`BaseCollection::get_aligned_collection`] with the caller choosing
    /// the access mode of the result.
    pub fn get_aligned_collection_as<M2: Mutability>(
        &self, value: impl Into<AlignedValues>, data_type: Option<DataType>, unit: Option<&str>,
    ) -> CollectionResult<Collection<K, M2>> {
        self.convert_mode::<M2>().get_aligned_collection(value, data_type, unit)
    }

    pub(crate) fn replace_header(&mut self, header: Header) {
        self.header = header;
    }

    /// Mutable collection of the entries whose key passes `keep`.
    pub(crate) fn filter_keys(
        &self, keep: impl Fn(&K) -> bool,
    ) -> CollectionResult<Collection<K, Mutable>> {
        let (keys, values): (Vec<K>, Vec<f64>) = self
            .keys
            .iter()
            .zip(self.values.iter())
            .filter(|(key, _)| keep(*key))
            .map(|(key, value)| (*key, *value))
            .unzip();
        if keys.is_empty() {
            return Err(CollectionError::EmptyFilter);
        }
        Ok(Collection::from_parts(self.header.duplicate(), Array1::from(values), keys, false))
    }

    /// Entries whose keys fall inside `period`, labelled with `period`.
    ///
    /// Errors
    /// ------
    /// - `IncompatiblePeriod` when an hourly collection is filtered with a
    ///   period of another timestep or leap flag.
    /// - `EmptyFilter` when no key falls inside the period.
    pub fn filter_by_analysis_period(
        &self, period: &AnalysisPeriod,
    ) -> CollectionResult<Collection<K, Mutable>> {
        K::check_period(self.header.analysis_period(), period)?;
        let wanted: HashSet<K> = K::period_keys(period).into_iter().collect();
        let mut filtered = self.filter_keys(|key| wanted.contains(key))?;
        filtered.header.set_analysis_period(period.clone());
        Ok(filtered)
    }

    /// Delete the entry at `index` and return its value.
    ///
    /// Errors
    /// ------
    /// - `ImmutableWrite` on immutable collections.
    /// - `IndexOutOfRange`; `EmptyCollection` when removing the last entry.
    pub fn remove(&mut self, index: usize) -> CollectionResult<f64> {
        if !M::MUTABLE {
            return Err(CollectionError::ImmutableWrite(self.class_name()));
        }
        let len = self.keys.len();
        if index >= len {
            return Err(CollectionError::IndexOutOfRange { index, len });
        }
        if len == 1 {
            return Err(CollectionError::EmptyCollection);
        }
        let mut values = self.values.to_vec();
        let removed = values.remove(index);
        self.values = Array1::from(values);
        self.keys.remove(index);
        Ok(removed)
    }

    /// Sort entries chronologically and reconcile the header period.
    ///
    /// Entries are ordered by start time; for a reversed period that stays
    /// reversed the keys after the year wrap move to the end. The smallest period covering
    /// every key is then derived from the header period:
    /// - dates widen to the first and last covered day (a reversed period
    ///   with keys in its gap becomes the whole year);
    /// - hours widen to the keys' hours, or to the whole day for an
    ///   overnight window with keys outside it;
    /// - the timestep rises to the smallest grid holding every minute;
    /// - a leap-day key makes the period a leap year.
    ///
    /// Parameters
    /// ----------
    /// - `overwrite_period`: replace a mismatching header period with the
    ///   derived one instead of failing.
    ///
    /// Errors
    /// ------
    /// - `PeriodMismatch` naming the first differing field when the period
    ///   does not cover the keys and `overwrite_period` is false.
    pub fn validate_analysis_period(&self, overwrite_period: bool) -> CollectionResult<Self> {
        let period = self.header.analysis_period();
        let leap_year = period.is_leap_year() || self.keys.iter().any(TimeKey::is_leap_day);

        let current = PeriodBounds::of(period);
        let covering = PeriodBounds::covering(period, &self.keys, leap_year);

        let mut order: Vec<usize> = (0..self.keys.len()).collect();
        order.sort_by_key(|&i| self.keys[i].start_moy(leap_year));
        if period.is_reversed() && !covering.spans_whole_year() {
            let end_doy = period.end_time().doy();
            let (wrapped, head): (Vec<usize>, Vec<usize>) =
                order.into_iter().partition(|&i| self.keys[i].doy_span(leap_year).0 <= end_doy);
            order = head.into_iter().chain(wrapped).collect();
        }
        let keys: Vec<K> = order.iter().map(|&i| self.keys[i]).collect();
        let values: Array1<f64> = order.iter().map(|&i| self.values[i]).collect();

        let mut header = self.header.duplicate();
        if let Some((field, expected, found)) = current.first_difference(&covering) {
            if !overwrite_period {
                return Err(CollectionError::PeriodMismatch { field, expected, found });
            }
            let widened = covering.to_period()?;
            log::warn!("Analysis period {period} does not cover the collection; using {widened}");
            header.set_analysis_period(widened);
        }
        Ok(Self::from_parts(header, values, keys, true))
    }
}

/// Defining fields of a period, compared field by field.
#[derive(Debug, Clone, Copy, PartialEq)]
struct PeriodBounds {
    st_month: u32,
    st_day: u32,
    st_hour: u32,
    end_month: u32,
    end_day: u32,
    end_hour: u32,
    timestep: u32,
    is_leap_year: bool,
}

impl PeriodBounds {
    fn of(period: &AnalysisPeriod) -> Self {
        PeriodBounds {
            st_month: period.st_month(),
            st_day: period.st_day(),
            st_hour: period.st_hour(),
            end_month: period.end_month(),
            end_day: period.end_day(),
            end_hour: period.end_hour(),
            timestep: period.timestep(),
            is_leap_year: period.is_leap_year(),
        }
    }

    /// Smallest widening of `period` that covers every key.
    fn covering<K: TimeKey>(period: &AnalysisPeriod, keys: &[K], leap_year: bool) -> Self {
        let mut bounds = PeriodBounds::of(period);
        bounds.is_leap_year = leap_year;

        let (st_doy, end_doy) = (period.st_time().doy(), period.end_time().doy());
        let spans: Vec<(u32, u32)> = keys.iter().map(|k| k.doy_span(leap_year)).collect();
        if period.is_reversed() {
            if spans.iter().any(|&(first, last)| first > end_doy && last < st_doy) {
                (bounds.st_month, bounds.st_day) = (1, 1);
                (bounds.end_month, bounds.end_day) = (12, 31);
            }
        } else {
            let first = spans.iter().map(|s| s.0).min().unwrap_or(st_doy);
            let last = spans.iter().map(|s| s.1).max().unwrap_or(end_doy);
            if first < st_doy {
                (bounds.st_month, bounds.st_day) = month_day(first, leap_year);
            }
            if last > end_doy {
                (bounds.end_month, bounds.end_day) = month_day(last, leap_year);
            }
        }

        let hours: Vec<u32> = keys.iter().filter_map(TimeKey::hour).collect();
        if period.is_overnight() {
            if hours.iter().any(|&h| !period.is_possible_hour(f64::from(h))) {
                (bounds.st_hour, bounds.end_hour) = (0, 23);
            }
        } else {
            if let Some(&min) = hours.iter().min() {
                bounds.st_hour = bounds.st_hour.min(min);
            }
            if let Some(&max) = hours.iter().max() {
                bounds.end_hour = bounds.end_hour.max(max);
            }
        }

        bounds.timestep = VALID_TIMESTEPS
            .iter()
            .copied()
            .filter(|&t| t >= period.timestep())
            .find(|&t| keys.iter().all(|k| k.minute() % (60 / t) == 0))
            .unwrap_or(60);
        bounds
    }

    fn spans_whole_year(&self) -> bool {
        (self.st_month, self.st_day, self.end_month, self.end_day) == (1, 1, 12, 31)
    }

    fn fields(&self) -> [(&'static str, String); 8] {
        [
            ("st_month", self.st_month.to_string()),
            ("st_day", self.st_day.to_string()),
            ("st_hour", self.st_hour.to_string()),
            ("end_month", self.end_month.to_string()),
            ("end_day", self.end_day.to_string()),
            ("end_hour", self.end_hour.to_string()),
            ("timestep", self.timestep.to_string()),
            ("is_leap_year", self.is_leap_year.to_string()),
        ]
    }

    /// `(field, self's value, other's value)` of the first differing field.
    fn first_difference(&self, other: &Self) -> Option<(&'static str, String, String)> {
        self.fields()
            .into_iter()
            .zip(other.fields())
            .find(|((_, a), (_, b))| a != b)
            .map(|((field, a), (_, b))| (field, a, b))
    }

    fn to_period(self) -> CalendarResult<AnalysisPeriod> {
        AnalysisPeriod::new(
            self.st_month,
            self.st_day,
            self.st_hour,
            self.end_month,
            self.end_day,
            self.end_hour,
            self.timestep,
            self.is_leap_year,
        )
    }
}

fn month_day(doy: u32, leap_year: bool) -> (u32, u32) {
    let dt = DateTime::from_moy_in_year(doy.saturating_sub(1) * MINUTES_PER_DAY, leap_year);
    (dt.month(), dt.day())
}

// ---- Density-specific operations ------------------------------------------

impl<M: Mutability> Collection<DateTime, M> {
    pub fn datetimes(&self) -> &[DateTime] {
        &self.keys
    }

    /// Minute of year of every entry.
    pub fn moys(&self) -> Vec<u32> {
        self.keys.iter().map(DateTime::moy).collect()
    }

    /// Entries whose minute of year is in `moys`.
    pub fn filter_by_moys(&self, moys: &[u32]) -> CollectionResult<HourlyDiscontinuousCollection> {
        let wanted: HashSet<u32> = moys.iter().copied().collect();
        self.filter_keys(|dt| wanted.contains(&dt.moy()))
    }

    /// Entries whose (fractional) hour of year is in `hoys`.
    pub fn filter_by_hoys(&self, hoys: &[f64]) -> CollectionResult<HourlyDiscontinuousCollection> {
        let moys: Vec<u32> = hoys
            .iter()
            .filter(|h| h.is_finite() && **h >= 0.0)
            .map(|h| (h * 60.0).round() as u32)
            .collect();
        self.filter_by_moys(&moys)
    }

    /// `"Hourly"` at timestep 1, otherwise `"<n> Minute"`.
    pub fn timestep_text(&self) -> String {
        timestep_text(self.header.analysis_period().timestep())
    }

    /// Entries on the grid of a coarser `timestep`, labelled with it.
    ///
    /// Errors
    /// ------
    /// - `Calendar(InvalidTimestep)` for a timestep outside the valid set.
    /// - `InvalidTimestep` when `timestep` is finer than the current one.
    pub fn cull_to_timestep(&self, timestep: u32) -> CollectionResult<HourlyDiscontinuousCollection> {
        let period = self.header.analysis_period();
        if !VALID_TIMESTEPS.contains(&timestep) {
            return Err(CalendarError::InvalidTimestep(timestep).into());
        }
        if timestep > period.timestep() {
            return Err(CollectionError::InvalidTimestep {
                target: timestep,
                current: period.timestep(),
            });
        }
        let step = 60 / timestep;
        let mut culled = self.filter_keys(|dt| dt.moy() % step == 0)?;
        culled.header.set_analysis_period(period.with_timestep(timestep)?);
        culled.validated_a_period = self.validated_a_period;
        Ok(culled)
    }

    /// In-place [`Collection::cull_to_timestep`].
    pub fn convert_to_culled_timestep(&mut self, timestep: u32) -> CollectionResult<()> {
        if !M::MUTABLE {
            return Err(CollectionError::ImmutableWrite(self.class_name()));
        }
        *self = self.cull_to_timestep(timestep)?.convert_mode();
        Ok(())
    }
}

pub(crate) fn timestep_text(timestep: u32) -> String {
    if timestep == 1 { "Hourly".to_string() } else { format!("{} Minute", 60 / timestep) }
}

impl<M: Mutability> Collection<u16, M> {
    pub fn doys(&self) -> &[u16] {
        &self.keys
    }

    pub fn filter_by_doys(&self, doys: &[u16]) -> CollectionResult<DailyCollection> {
        let wanted: HashSet<u16> = doys.iter().copied().collect();
        self.filter_keys(|doy| wanted.contains(doy))
    }
}

impl<M: Mutability> Collection<u8, M> {
    pub fn months(&self) -> &[u8] {
        &self.keys
    }

    pub fn filter_by_months(&self, months: &[u8]) -> CollectionResult<MonthlyCollection> {
        let wanted: HashSet<u8> = months.iter().copied().collect();
        self.filter_keys(|month| wanted.contains(month))
    }
}

impl<M: Mutability> Collection<(u8, u8), M> {
    pub fn months_per_hour(&self) -> &[(u8, u8)] {
        &self.keys
    }

    pub fn filter_by_months_per_hour(
        &self, months_per_hour: &[(u8, u8)],
    ) -> CollectionResult<MonthlyPerHourCollection> {
        let wanted: HashSet<(u8, u8)> = months_per_hour.iter().copied().collect();
        self.filter_keys(|key| wanted.contains(key))
    }
}

// ---- BaseCollection -------------------------------------------------------

impl<K: TimeKey, M: Mutability> BaseCollection for Collection<K, M> {
    type Key = K;
    type Mode = M;
    type Mutable = Collection<K, Mutable>;
    type Immutable = Collection<K, Immutable>;
    type Filtered = Collection<K, Mutable>;

    const COLLECTION_TYPE: CollectionType = K::COLLECTION_TYPE;

    fn header(&self) -> &Header {
        &self.header
    }

    fn values(&self) -> &Array1<f64> {
        &self.values
    }

    fn keys(&self) -> &[K] {
        &self.keys
    }

    fn validated_a_period(&self) -> bool {
        self.validated_a_period
    }

    fn parts_mut(&mut self) -> CollectionResult<(&mut Header, &mut Array1<f64>)> {
        if !M::MUTABLE {
            return Err(CollectionError::ImmutableWrite(self.class_name()));
        }
        Ok((&mut self.header, &mut self.values))
    }

    fn to_mutable(&self) -> Collection<K, Mutable> {
        self.convert_mode()
    }

    fn to_immutable(&self) -> Collection<K, Immutable> {
        self.convert_mode()
    }

    fn filter_by_pattern(&self, pattern: &[bool]) -> CollectionResult<Collection<K, Mutable>> {
        if pattern.is_empty() {
            return Err(CollectionError::EmptyFilter);
        }
        let (keys, values): (Vec<K>, Vec<f64>) = self
            .keys
            .iter()
            .zip(self.values.iter())
            .enumerate()
            .filter(|(i, _)| pattern[i % pattern.len()])
            .map(|(_, (key, value))| (*key, *value))
            .unzip();
        if keys.is_empty() {
            return Err(CollectionError::EmptyFilter);
        }
        Ok(Collection::from_parts(
            self.header.duplicate(),
            Array1::from(values),
            keys,
            self.validated_a_period,
        ))
    }

    fn map_values(&self, f: impl Fn(f64) -> f64) -> Self {
        Self::from_parts(
            self.header.duplicate(),
            self.values.mapv(f),
            self.keys.clone(),
            self.validated_a_period,
        )
    }

    fn with_header_and_values(&self, header: Header, values: Array1<f64>) -> CollectionResult<Self> {
        if values.len() != self.keys.len() {
            return Err(CollectionError::LengthMismatch {
                expected: self.keys.len(),
                got: values.len(),
            });
        }
        Ok(Self::from_parts(header, values, self.keys.clone(), self.validated_a_period))
    }

    fn from_dict(value: &Value) -> CollectionResult<Self> {
        base::check_dict_type(value, K::COLLECTION_TYPE)?;
        let parts = base::dict_parts::<K>(value)?;
        let keys = parts.keys.ok_or_else(|| {
            CollectionError::Serialization(format!("missing field {:?}", K::KEYS_FIELD))
        })?;
        let mut collection = Self::new(parts.header, parts.values, keys)?;
        collection.validated_a_period = parts.validated_a_period;
        Ok(collection)
    }
}

// ---- Operators ------------------------------------------------------------

macro_rules! collection_binary_op {
    ($trait:ident, $method:ident, $op:tt) => {
        impl<K: TimeKey, M: Mutability, M2: Mutability> std::ops::$trait<&Collection<K, M2>>
            for &Collection<K, M>
        {
            type Output = CollectionResult<Collection<K, M>>;

            fn $method(self, rhs: &Collection<K, M2>) -> Self::Output {
                self.combine(rhs, |x, y| x $op y)
            }
        }

        impl<K: TimeKey, M: Mutability> std::ops::$trait<f64> for &Collection<K, M> {
            type Output = Collection<K, M>;

            fn $method(self, rhs: f64) -> Self::Output {
                self.map_values(|x| x $op rhs)
            }
        }
    };
}

collection_binary_op!(Add, add, +);
collection_binary_op!(Sub, sub, -);
collection_binary_op!(Mul, mul, *);
collection_binary_op!(Div, div, /);

impl<K: TimeKey, M: Mutability> std::ops::Neg for &Collection<K, M> {
    type Output = Collection<K, M>;

    fn neg(self) -> Self::Output {
        self.map_values(|x| -x)
    }
}

// ---- Formatting & serde ---------------------------------------------------

pub(crate) fn density_label(tag: CollectionType, timestep: u32) -> String {
    match tag {
        CollectionType::HourlyContinuous => format!("{} Continuous", timestep_text(timestep)),
        CollectionType::HourlyDiscontinuous => {
            format!("{} Discontinuous", timestep_text(timestep))
        }
        CollectionType::Daily => "Daily".to_string(),
        CollectionType::Monthly => "Monthly".to_string(),
        CollectionType::MonthlyPerHour => "Monthly Per Hour".to_string(),
    }
}

impl<K: TimeKey, M: Mutability> fmt::Display for Collection<K, M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let period = self.header.analysis_period();
        write!(
            f,
            "{} Data Collection\n{}\n{} ({})\n...{} values...",
            density_label(K::COLLECTION_TYPE, period.timestep()),
            period,
            self.header.data_type(),
            self.header.unit(),
            self.values.len()
        )
    }
}

impl<K: TimeKey, M: Mutability> Serialize for Collection<K, M> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_dict().map_err(serde::ser::Error::custom)?.serialize(serializer)
    }
}

impl<'de, K: TimeKey, M: Mutability> Deserialize<'de> for Collection<K, M> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Self::from_dict(&value).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Construction checks and immutability.
    // - Pattern, key and period filters.
    // - Period validation (sorting, widening, mismatch reporting).
    // - Operators, culling and dictionary round trips.
    //
    // They intentionally DO NOT cover:
    // - Aggregation into coarser densities (see `aggregation`).
    // -------------------------------------------------------------------------

    fn header(period: AnalysisPeriod) -> Header {
        Header::new(DataType::Temperature, "C", period, BTreeMap::new()).unwrap()
    }

    fn dt(month: u32, day: u32, hour: u32, minute: u32) -> DateTime {
        DateTime::new(month, day, hour, minute, false).unwrap()
    }

    fn period(sm: u32, sd: u32, sh: u32, em: u32, ed: u32, eh: u32) -> AnalysisPeriod {
        AnalysisPeriod::new(sm, sd, sh, em, ed, eh, 1, false).unwrap()
    }

    #[test]
    // Purpose
    // -------
    // Construction rejects length mismatches, empty input and duplicates.
    //
    // Given
    // -----
    // - Daily keys [1, 2] with 3 values, no keys at all, and [5, 5].
    //
    // Expect
    // ------
    // - `LengthMismatch`, `EmptyCollection` and `DuplicateKey`.
    fn new_checks_lengths_and_uniqueness() {
        let h = header(AnalysisPeriod::default());
        assert_eq!(
            DailyCollection::<Mutable>::new(h.clone(), vec![1.0, 2.0, 3.0], vec![1, 2]),
            Err(CollectionError::LengthMismatch { expected: 2, got: 3 })
        );
        assert_eq!(
            DailyCollection::<Mutable>::new(h.clone(), Vec::<f64>::new(), vec![]),
            Err(CollectionError::EmptyCollection)
        );
        assert!(matches!(
            DailyCollection::<Mutable>::new(h, vec![1.0, 2.0], vec![5, 5]),
            Err(CollectionError::DuplicateKey(_))
        ));
    }

    #[test]
    // Purpose
    // -------
    // Immutable collections refuse writes; their mutable sibling accepts
    // them without affecting the original.
    //
    // Given
    // -----
    // - An immutable monthly collection of three values.
    //
    // Expect
    // ------
    // - `set`, `set_values`, `convert_to_unit` and `remove` fail with
    //   `ImmutableWrite`; the same calls succeed on `to_mutable()`.
    fn immutable_rejects_writes() {
        let mut frozen = MonthlyCollectionImmutable::new(
            header(AnalysisPeriod::default()),
            vec![1.0, 2.0, 3.0],
            vec![1, 2, 3],
        )
        .unwrap();
        assert!(matches!(frozen.set(0, 9.0), Err(CollectionError::ImmutableWrite(_))));
        assert!(matches!(
            frozen.set_values(vec![0.0, 0.0, 0.0]),
            Err(CollectionError::ImmutableWrite(_))
        ));
        assert!(matches!(frozen.convert_to_unit("F"), Err(CollectionError::ImmutableWrite(_))));
        assert!(matches!(frozen.remove(0), Err(CollectionError::ImmutableWrite(_))));
        assert_eq!(frozen.header().unit(), "C");

        let mut thawed = frozen.to_mutable();
        thawed.set(0, 9.0).unwrap();
        thawed.convert_to_unit("K").unwrap();
        assert!((thawed.remove(2).unwrap() - 276.15).abs() < 1e-9);
        assert_eq!(thawed.months(), &[1, 2]);
        assert_eq!(frozen.values()[0], 1.0);
        assert_eq!(frozen.class_name(), "MonthlyCollectionImmutable");
    }

    #[test]
    // Purpose
    // -------
    // Patterns repeat cyclically over the values.
    //
    // Given
    // -----
    // - Hourly values 0..24 on Jan 1 and the pattern [true, false].
    //
    // Expect
    // ------
    // - 12 even-indexed values; an all-false pattern is `EmptyFilter`.
    fn filter_by_pattern_cycles() {
        let keys: Vec<DateTime> = (0..24u32).map(|h| dt(1, 1, h, 0)).collect();
        let values: Vec<f64> = (0..24u32).map(f64::from).collect();
        let h = header(period(1, 1, 0, 1, 1, 23));
        let coll = HourlyDiscontinuousCollection::<Mutable>::new(h, values, keys).unwrap();
        let evens = coll.filter_by_pattern(&[true, false]).unwrap();
        assert_eq!(evens.len(), 12);
        assert!(evens.values().iter().all(|v| v % 2.0 == 0.0));
        assert_eq!(coll.filter_by_pattern(&[false]), Err(CollectionError::EmptyFilter));
    }

    #[test]
    // Purpose
    // -------
    // Period filters keep keys inside the period and relabel the header;
    // hourly data refuses a period with another timestep.
    //
    // Given
    // -----
    // - Daily values for doys 1..=10 filtered by Jan 3–Jan 5.
    // - Hourly values at timestep 1 filtered by a timestep-2 period.
    //
    // Expect
    // ------
    // - Doys [3, 4, 5] with the requested period; `IncompatiblePeriod`.
    fn filter_by_analysis_period_relabels() {
        let daily = DailyCollection::<Mutable>::new(
            header(AnalysisPeriod::default()),
            (1..=10u16).map(f64::from).collect::<Vec<_>>(),
            (1..=10).collect(),
        )
        .unwrap();
        let window = period(1, 3, 0, 1, 5, 23);
        let filtered = daily.filter_by_analysis_period(&window).unwrap();
        assert_eq!(filtered.doys(), &[3, 4, 5]);
        assert_eq!(filtered.header().analysis_period(), &window);

        let hourly = HourlyDiscontinuousCollection::<Mutable>::new(
            header(AnalysisPeriod::default()),
            vec![1.0],
            vec![dt(1, 1, 0, 0)],
        )
        .unwrap();
        let half_hourly = AnalysisPeriod::new(1, 1, 0, 1, 1, 23, 2, false).unwrap();
        assert!(matches!(
            hourly.filter_by_analysis_period(&half_hourly),
            Err(CollectionError::IncompatiblePeriod(_))
        ));
    }

    #[test]
    // Purpose
    // -------
    // Validation sorts keys and widens the period only when allowed.
    //
    // Given
    // -----
    // - Header period Jan 1 between 3 and 5; keys Jan 3 01:00, Jan 1 05:00
    //   and Jan 1 03:00 (unsorted).
    //
    // Expect
    // ------
    // - Without overwrite: `PeriodMismatch` on `st_hour` (3 vs 1).
    // - With overwrite: keys sorted, period Jan 1–Jan 3 between 1 and 5,
    //   `validated_a_period` set.
    fn validate_analysis_period_widens() {
        let coll = HourlyDiscontinuousCollection::<Mutable>::new(
            header(period(1, 1, 3, 1, 1, 5)),
            vec![30.0, 10.0, 5.0],
            vec![dt(1, 3, 1, 0), dt(1, 1, 5, 0), dt(1, 1, 3, 0)],
        )
        .unwrap();
        assert_eq!(
            coll.validate_analysis_period(false),
            Err(CollectionError::PeriodMismatch {
                field: "st_hour",
                expected: "3".to_string(),
                found: "1".to_string(),
            })
        );

        let valid = coll.validate_analysis_period(true).unwrap();
        assert_eq!(valid.datetimes(), &[dt(1, 1, 3, 0), dt(1, 1, 5, 0), dt(1, 3, 1, 0)]);
        assert_eq!(valid.values().to_vec(), vec![5.0, 10.0, 30.0]);
        assert_eq!(valid.header().analysis_period(), &period(1, 1, 1, 1, 3, 5));
        assert!(valid.validated_a_period());
    }

    #[test]
    // Purpose
    // -------
    // Reversed periods keep the post-wrap keys at the end, and sub-hourly
    // minutes raise the timestep.
    //
    // Given
    // -----
    // - Period Dec 1–Jan 31 (reversed) with keys Jan 2 00:00, Dec 5 00:30.
    //
    // Expect
    // ------
    // - Order Dec 5 then Jan 2; the only mismatch is the timestep (1 → 2).
    fn validate_analysis_period_reversed_and_timestep() {
        let coll = HourlyDiscontinuousCollection::<Mutable>::new(
            header(period(12, 1, 0, 1, 31, 23)),
            vec![2.0, 1.0],
            vec![dt(1, 2, 0, 0), dt(12, 5, 0, 30)],
        )
        .unwrap();
        let err = coll.validate_analysis_period(false).unwrap_err();
        assert!(matches!(err, CollectionError::PeriodMismatch { field: "timestep", .. }));

        let valid = coll.validate_analysis_period(true).unwrap();
        assert_eq!(valid.datetimes(), &[dt(12, 5, 0, 30), dt(1, 2, 0, 0)]);
        assert_eq!(valid.header().analysis_period().timestep(), 2);
    }

    #[test]
    // Purpose
    // -------
    // A key in the gap of a reversed period widens it to the whole year,
    // and the keys then keep plain chronological order.
    //
    // Given
    // -----
    // - Period Dec 1–Jan 31 with keys Dec 5, Jun 15 and Jan 2 at noon.
    //
    // Expect
    // ------
    // - Without overwrite: `PeriodMismatch` on `st_month` (12 vs 1).
    // - With overwrite: the annual period and order Jan 2, Jun 15, Dec 5.
    fn validate_analysis_period_reversed_gap_widens_to_year() {
        let coll = HourlyDiscontinuousCollection::<Mutable>::new(
            header(period(12, 1, 0, 1, 31, 23)),
            vec![12.0, 6.0, 1.0],
            vec![dt(12, 5, 12, 0), dt(6, 15, 12, 0), dt(1, 2, 12, 0)],
        )
        .unwrap();
        assert_eq!(
            coll.validate_analysis_period(false),
            Err(CollectionError::PeriodMismatch {
                field: "st_month",
                expected: "12".to_string(),
                found: "1".to_string(),
            })
        );

        let valid = coll.validate_analysis_period(true).unwrap();
        assert!(valid.header().analysis_period().is_annual());
        assert_eq!(valid.datetimes(), &[dt(1, 2, 12, 0), dt(6, 15, 12, 0), dt(12, 5, 12, 0)]);
        assert_eq!(valid.values().to_vec(), vec![1.0, 6.0, 12.0]);
    }

    #[test]
    // Purpose
    // -------
    // An overnight window widens to the whole day when a key falls outside
    // it, and a finer minute grid is reported as a timestep mismatch.
    //
    // Given
    // -----
    // - Period Jan 1 22:00 to Jan 2 02:00 (overnight) with keys Jan 1 23:00
    //   and Jan 1 12:00.
    // - An hourly whole-day period with a key at Jan 1 05:15.
    //
    // Expect
    // ------
    // - `PeriodMismatch` on `st_hour` (22 vs 0); with overwrite the period
    //   runs Jan 1–Jan 2 between 0 and 23.
    // - `PeriodMismatch` on `timestep` (1 vs 4).
    fn validate_analysis_period_overnight_and_finer_grid() {
        let overnight = period(1, 1, 22, 1, 2, 2);
        assert!(overnight.is_overnight());
        let coll = HourlyDiscontinuousCollection::<Mutable>::new(
            header(overnight),
            vec![23.0, 12.0],
            vec![dt(1, 1, 23, 0), dt(1, 1, 12, 0)],
        )
        .unwrap();
        assert_eq!(
            coll.validate_analysis_period(false),
            Err(CollectionError::PeriodMismatch {
                field: "st_hour",
                expected: "22".to_string(),
                found: "0".to_string(),
            })
        );
        let valid = coll.validate_analysis_period(true).unwrap();
        assert_eq!(valid.header().analysis_period(), &period(1, 1, 0, 1, 2, 23));
        assert_eq!(valid.values().to_vec(), vec![12.0, 23.0]);

        let quarter = HourlyDiscontinuousCollection::<Mutable>::new(
            header(period(1, 1, 0, 1, 1, 23)),
            vec![5.25],
            vec![dt(1, 1, 5, 15)],
        )
        .unwrap();
        assert_eq!(
            quarter.validate_analysis_period(false),
            Err(CollectionError::PeriodMismatch {
                field: "timestep",
                expected: "1".to_string(),
                found: "4".to_string(),
            })
        );
    }

    #[test]
    // Purpose
    // -------
    // Key filters keep collection order across the year wrap and round
    // fractional hours to the nearest minute.
    //
    // Given
    // -----
    // - A validated reversed collection with keys Jan 1 00:00 and Dec 31
    //   23:00, filtered by both moys.
    // - Quarter-hourly keys 00:00–00:45 filtered by hoys 0.25, 0.5000001,
    //   0.75 and the invalid -1 and NaN.
    // - A hoy with no matching key.
    //
    // Expect
    // ------
    // - Dec 31 before Jan 1.
    // - Values [1, 2, 3].
    // - `EmptyFilter`.
    fn filter_by_moys_and_hoys() {
        let reversed = HourlyDiscontinuousCollection::<Mutable>::new(
            header(period(12, 31, 0, 1, 1, 23)),
            vec![1.0, 31.0],
            vec![dt(1, 1, 0, 0), dt(12, 31, 23, 0)],
        )
        .unwrap()
        .validate_analysis_period(false)
        .unwrap();
        let wrapped = reversed.filter_by_moys(&[0, dt(12, 31, 23, 0).moy()]).unwrap();
        assert_eq!(wrapped.datetimes(), &[dt(12, 31, 23, 0), dt(1, 1, 0, 0)]);
        assert_eq!(wrapped.values().to_vec(), vec![31.0, 1.0]);

        let quarter = AnalysisPeriod::new(1, 1, 0, 1, 1, 23, 4, false).unwrap();
        let keys: Vec<DateTime> = [0u32, 15, 30, 45].iter().map(|&m| dt(1, 1, 0, m)).collect();
        let coll = HourlyDiscontinuousCollection::<Mutable>::new(
            header(quarter),
            vec![0.0, 1.0, 2.0, 3.0],
            keys,
        )
        .unwrap();
        let picked = coll.filter_by_hoys(&[0.25, 0.5000001, 0.75, -1.0, f64::NAN]).unwrap();
        assert_eq!(picked.values().to_vec(), vec![1.0, 2.0, 3.0]);
        assert_eq!(coll.filter_by_hoys(&[7.0]), Err(CollectionError::EmptyFilter));
    }

    #[test]
    // Purpose
    // -------
    // Arithmetic needs aligned operands and keeps the left header; scalar
    // operators broadcast.
    //
    // Given
    // -----
    // - Two monthly collections on [1, 2] and one on [1, 3].
    //
    // Expect
    // ------
    // - a + b = [11, 22]; a + c is `NotAligned`; -(a * 2) = [-2, -4].
    fn operators_require_alignment() {
        let h = header(AnalysisPeriod::default());
        let a = MonthlyCollection::<Mutable>::new(h.clone(), vec![1.0, 2.0], vec![1, 2]).unwrap();
        let b =
            MonthlyCollection::<Immutable>::new(h.clone(), vec![10.0, 20.0], vec![1, 2]).unwrap();
        let c = MonthlyCollection::<Mutable>::new(h, vec![10.0, 20.0], vec![1, 3]).unwrap();

        assert_eq!((&a + &b).unwrap().values().to_vec(), vec![11.0, 22.0]);
        assert!(matches!(&a + &c, Err(CollectionError::NotAligned { .. })));
        assert_eq!((-&(&a * 2.0)).values().to_vec(), vec![-2.0, -4.0]);
        assert_eq!((&a / 0.0).values()[0], f64::INFINITY);
    }

    #[test]
    // Purpose
    // -------
    // Culling keeps only entries on the coarser grid.
    //
    // Given
    // -----
    // - Quarter-hourly keys 00:00, 00:15, 00:30, 00:45, 01:00.
    //
    // Expect
    // ------
    // - Timestep 2 keeps 00:00, 00:30, 01:00; timestep 6 is finer than the
    //   data and fails; the text form reads "30 Minute".
    fn cull_to_timestep_keeps_grid() {
        let quarter = AnalysisPeriod::new(1, 1, 0, 1, 1, 23, 4, false).unwrap();
        let keys: Vec<DateTime> =
            [0u32, 15, 30, 45, 60].iter().map(|&m| dt(1, 1, m / 60, m % 60)).collect();
        let values = vec![0.0, 1.0, 2.0, 3.0, 4.0];
        let mut coll =
            HourlyDiscontinuousCollection::<Mutable>::new(header(quarter), values, keys).unwrap();
        assert!(matches!(coll.cull_to_timestep(6), Err(CollectionError::InvalidTimestep { .. })));

        coll.convert_to_culled_timestep(2).unwrap();
        assert_eq!(coll.values().to_vec(), vec![0.0, 2.0, 4.0]);
        assert_eq!(coll.timestep_text(), "30 Minute");
    }

    #[test]
    // Purpose
    // -------
    // The dictionary form round trips and carries the density's keys field.
    //
    // Given
    // -----
    // - A validated monthly-per-hour collection.
    //
    // Expect
    // ------
    // - `months_per_hour` present; `from_dict(to_dict())` equals the
    //   original; a daily dictionary is rejected.
    fn dict_round_trip() {
        let coll = MonthlyPerHourCollection::<Mutable>::new(
            header(AnalysisPeriod::default()),
            vec![1.5, 2.5],
            vec![(1, 0), (1, 1)],
        )
        .unwrap()
        .validate_analysis_period(true)
        .unwrap();
        let dict = coll.to_dict().unwrap();
        assert_eq!(dict["type"], "MonthlyPerHourCollection");
        assert!(dict.get("months_per_hour").is_some());
        assert_eq!(MonthlyPerHourCollection::<Mutable>::from_dict(&dict).unwrap(), coll);

        let daily =
            DailyCollection::<Mutable>::new(header(AnalysisPeriod::default()), vec![1.0], vec![1])
                .unwrap();
        assert!(MonthlyCollection::<Mutable>::from_dict(&daily.to_dict().unwrap()).is_err());
    }
}
