//! collections::continuous — hourly collections with implicit keys.
//!
//! Purpose
//! -------
//! [`HourlyContinuousCollection<M>`] holds one value per sample of a
//! whole-day [`AnalysisPeriod`]. Keys are never stored: they are the
//! period's datetimes, generated on first use and memoised by the period.
//!
//! Key behaviors
//! -------------
//! - Construction requires `st_hour == 0`, `end_hour == 23` and
//!   `len(values) == period.len()`.
//! - Density-reducing operations degrade to
//!   [`HourlyDiscontinuousCollection`]: pattern and moy filters, entry
//!   removal, arithmetic with a discontinuous operand, `to_discontinuous`.
//! - `filter_by_analysis_period` stays continuous when the (clipped)
//!   requested period covers whole days; see [`HourlyCollection`].
//! - `interpolate_to_timestep` refines the grid by linear subdivision and
//!   `cull_to_timestep` coarsens it; both stay continuous.
//!
//! Invariants & assumptions
//! ------------------------
//! - `validated_a_period()` is always true.
//! - Two continuous collections are aligned iff their periods produce the
//!   same datetimes; a continuous collection is never aligned with a
//!   discontinuous one.
//!
//! Testing notes
//! -------------
//! - Unit tests below cover construction, filtering, interpolation,
//!   culling and mixed arithmetic; annual lengths are also covered in
//!   `tests/collections.rs`.

use std::collections::HashMap;
use std::fmt;
use std::marker::PhantomData;

use ndarray::Array1;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

use crate::calendar::{AnalysisPeriod, CalendarError, DateTime, VALID_TIMESTEPS};
use crate::collections::base::{self, AlignedValues, BaseCollection};
use crate::collections::discontinuous::{
    Collection, HourlyDiscontinuousCollection, density_label, timestep_text,
};
use crate::collections::errors::{CollectionError, CollectionResult};
use crate::collections::header::Header;
use crate::collections::keys::{CollectionType, TimeKey};
use crate::collections::mutability::{Immutable, Mutability, Mutable};
use crate::datatype::DataType;

/// HourlyContinuousCollection — values on every sample of a whole-day
/// period.
#[derive(Debug, Clone, PartialEq)]
pub struct HourlyContinuousCollection<M: Mutability = Mutable> {
    header: Header,
    values: Array1<f64>,
    mode: PhantomData<M>,
}

pub type HourlyContinuousCollectionImmutable = HourlyContinuousCollection<Immutable>;

/// Result of filters that keep continuity only for whole-day periods.
#[derive(Debug, Clone, PartialEq)]
pub enum HourlyCollection {
    Continuous(HourlyContinuousCollection),
    Discontinuous(HourlyDiscontinuousCollection),
}

impl HourlyCollection {
    pub fn is_continuous(&self) -> bool {
        matches!(self, HourlyCollection::Continuous(_))
    }

    pub fn header(&self) -> &Header {
        match self {
            HourlyCollection::Continuous(c) => c.header(),
            HourlyCollection::Discontinuous(c) => c.header(),
        }
    }

    pub fn values(&self) -> &Array1<f64> {
        match self {
            HourlyCollection::Continuous(c) => c.values(),
            HourlyCollection::Discontinuous(c) => c.values(),
        }
    }

    pub fn datetimes(&self) -> &[DateTime] {
        match self {
            HourlyCollection::Continuous(c) => c.keys(),
            HourlyCollection::Discontinuous(c) => c.keys(),
        }
    }

    pub fn len(&self) -> usize {
        self.values().len()
    }

    pub fn is_empty(&self) -> bool {
        self.values().is_empty()
    }

    pub fn into_discontinuous(self) -> HourlyDiscontinuousCollection {
        match self {
            HourlyCollection::Continuous(c) => c.to_discontinuous(),
            HourlyCollection::Discontinuous(c) => c,
        }
    }
}

fn check_whole_days(period: &AnalysisPeriod) -> CollectionResult<()> {
    if period.covers_whole_days() {
        return Ok(());
    }
    Err(CollectionError::IncompatiblePeriod(format!(
        "analysis_period of a continuous collection must run from hour 0 to hour 23. \
         Got {} to {}",
        period.st_hour(),
        period.end_hour()
    )))
}

impl<M: Mutability> HourlyContinuousCollection<M> {
    /// Build a continuous collection over the header's period.
    ///
    /// Errors
    /// ------
    /// - `IncompatiblePeriod` when the period does not cover whole days.
    /// - `LengthMismatch` when `values` does not match `period.len()`
    ///   (8760 × timestep for a common year, 8784 × timestep for a leap
    ///   year).
    pub fn new(header: Header, values: impl Into<Array1<f64>>) -> CollectionResult<Self> {
        let values = values.into();
        let period = header.analysis_period();
        check_whole_days(period)?;
        let expected = period.len();
        if values.len() != expected {
            return Err(CollectionError::LengthMismatch { expected, got: values.len() });
        }
        Ok(Self::from_parts(header, values))
    }

    fn from_parts(header: Header, values: Array1<f64>) -> Self {
        HourlyContinuousCollection { header, values, mode: PhantomData }
    }

    fn convert_mode<M2: Mutability>(&self) -> HourlyContinuousCollection<M2> {
        HourlyContinuousCollection::from_parts(self.header.clone(), self.values.clone())
    }

    pub fn datetimes(&self) -> &[DateTime] {
        self.header.analysis_period().datetimes()
    }

    pub fn moys(&self) -> &[u32] {
        self.header.analysis_period().moys()
    }

    pub fn timestep_text(&self) -> String {
        timestep_text(self.header.analysis_period().timestep())
    }

    /// [`BaseCollection::get_aligned_collection`] with the caller choosing
    /// the access mode of the result.
    pub fn get_aligned_collection_as<M2: Mutability>(
        &self, value: impl Into<AlignedValues>, data_type: Option<DataType>, unit: Option<&str>,
    ) -> CollectionResult<HourlyContinuousCollection<M2>> {
        self.convert_mode::<M2>().get_aligned_collection(value, data_type, unit)
    }

    /// Discontinuous copy with explicit datetimes.
    pub fn to_discontinuous(&self) -> HourlyDiscontinuousCollection {
        Collection::from_parts(
            self.header.duplicate(),
            self.values.clone(),
            self.datetimes().to_vec(),
            true,
        )
    }

    /// Discontinuous copy without the entry at `index`.
    pub fn remove_to_discontinuous(
        &self, index: usize,
    ) -> CollectionResult<HourlyDiscontinuousCollection> {
        let mut discontinuous = self.to_discontinuous();
        discontinuous.remove(index)?;
        Ok(discontinuous)
    }

    /// Entries whose minute of year is in `moys`, in collection order.
    pub fn filter_by_moys(&self, moys: &[u32]) -> CollectionResult<HourlyDiscontinuousCollection> {
        self.to_discontinuous().filter_by_moys(moys)
    }

    /// Entries whose (fractional) hour of year is in `hoys`.
    pub fn filter_by_hoys(&self, hoys: &[f64]) -> CollectionResult<HourlyDiscontinuousCollection> {
        self.to_discontinuous().filter_by_hoys(hoys)
    }

    /// Entries inside `period`, labelled with the period.
    ///
    /// The requested period is first clipped to the collection's own:
    /// each of the start date, end date, start hour and end hour that lies
    /// outside the collection's period is replaced by the collection's.
    /// Dates are only clipped when neither period is reversed; a reversed
    /// request keeps its dates and matches only the samples it shares with
    /// the collection. A clipped period covering whole days yields a continuous collection;
    /// any other yields a discontinuous one.
    ///
    /// Errors
    /// ------
    /// - `IncompatiblePeriod` for a period with another timestep or leap
    ///   flag.
    /// - `EmptyFilter` when no sample falls inside the period.
    pub fn filter_by_analysis_period(
        &self, period: &AnalysisPeriod,
    ) -> CollectionResult<HourlyCollection> {
        let own = self.header.analysis_period();
        DateTime::check_period(own, period)?;
        let period = clip_to(own, period)?;

        let mut header = self.header.duplicate();
        header.set_analysis_period(period.clone());
        if period.covers_whole_days() {
            let index: HashMap<u32, usize> =
                own.moys().iter().enumerate().map(|(i, &moy)| (moy, i)).collect();
            let picked: Option<Vec<f64>> =
                period.moys().iter().map(|moy| index.get(moy).map(|&i| self.values[i])).collect();
            if let Some(values) = picked {
                return Ok(HourlyCollection::Continuous(HourlyContinuousCollection::from_parts(
                    header,
                    Array1::from(values),
                )));
            }
        }
        let mut filtered = self.filter_by_moys(period.moys())?;
        filtered.replace_header(header);
        Ok(HourlyCollection::Discontinuous(filtered))
    }

    /// Linear interpolation onto a finer `timestep`.
    ///
    /// With `factor = timestep / current`, every value `v[i]` expands to
    /// `factor` values stepping linearly toward `v[i + 1]` (the last value
    /// steps toward the first). Cumulative data (`cumulative`, defaulting
    /// to the data type's flag) is divided by `factor`; data that is not
    /// point-in-time is rotated right by `factor / 2` sub-steps so values
    /// sit at the middle of the interval they describe.
    ///
    /// Errors
    /// ------
    /// - `InvalidTimestep` when `timestep` is not a multiple of the current
    ///   timestep.
    /// - `Calendar(InvalidTimestep)` for a timestep outside the valid set.
    pub fn interpolate_to_timestep(
        &self, timestep: u32, cumulative: Option<bool>,
    ) -> CollectionResult<HourlyContinuousCollection> {
        let period = self.header.analysis_period();
        let current = period.timestep();
        if timestep < current || timestep % current != 0 {
            return Err(CollectionError::InvalidTimestep { target: timestep, current });
        }
        let new_period = period.with_timestep(timestep)?;
        let factor = (timestep / current) as usize;

        let n = self.values.len();
        let mut values = Vec::with_capacity(n * factor);
        for i in 0..n {
            let (start, end) = (self.values[i], self.values[(i + 1) % n]);
            let step = (end - start) / factor as f64;
            values.extend((0..factor).map(|k| start + k as f64 * step));
        }

        let data_type = self.header.data_type();
        if cumulative.unwrap_or(data_type.cumulative()) {
            values.iter_mut().for_each(|v| *v /= factor as f64);
        }
        if !data_type.point_in_time() {
            values.rotate_right(factor / 2);
        }

        let mut header = self.header.duplicate();
        header.set_analysis_period(new_period);
        HourlyContinuousCollection::new(header, values)
    }

    /// Samples on the grid of a coarser `timestep`; stays continuous.
    ///
    /// Errors
    /// ------
    /// - `Calendar(InvalidTimestep)` for a timestep outside the valid set.
    /// - `InvalidTimestep` when the current timestep is not a multiple of
    ///   `timestep`.
    pub fn cull_to_timestep(&self, timestep: u32) -> CollectionResult<HourlyContinuousCollection> {
        let period = self.header.analysis_period();
        if !VALID_TIMESTEPS.contains(&timestep) {
            return Err(CalendarError::InvalidTimestep(timestep).into());
        }
        if period.timestep() % timestep != 0 {
            return Err(CollectionError::InvalidTimestep {
                target: timestep,
                current: period.timestep(),
            });
        }
        let step = 60 / timestep;
        let values: Vec<f64> = period
            .moys()
            .iter()
            .zip(self.values.iter())
            .filter(|(moy, _)| *moy % step == 0)
            .map(|(_, v)| *v)
            .collect();
        let mut header = self.header.duplicate();
        header.set_analysis_period(period.with_timestep(timestep)?);
        HourlyContinuousCollection::new(header, values)
    }

    /// In-place [`HourlyContinuousCollection::cull_to_timestep`].
    pub fn convert_to_culled_timestep(&mut self, timestep: u32) -> CollectionResult<()> {
        if !M::MUTABLE {
            return Err(CollectionError::ImmutableWrite(self.class_name()));
        }
        *self = self.cull_to_timestep(timestep)?.convert_mode();
        Ok(())
    }
}

/// Replace every bound of `requested` that falls outside `own`.
fn clip_to(own: &AnalysisPeriod, requested: &AnalysisPeriod) -> CollectionResult<AnalysisPeriod> {
    if own.is_annual() {
        return Ok(requested.clone());
    }
    let (mut st_month, mut st_day) = (requested.st_month(), requested.st_day());
    let (mut end_month, mut end_day) = (requested.end_month(), requested.end_day());
    let st_hour = requested.st_hour().max(own.st_hour());
    let end_hour = requested.end_hour().min(own.end_hour());
    // Reversed periods keep the requested dates; the moy filter drops the rest.
    if !own.is_reversed() && !requested.is_reversed() {
        if requested.st_time().doy() < own.st_time().doy() {
            (st_month, st_day) = (own.st_month(), own.st_day());
        }
        if requested.end_time().doy() > own.end_time().doy() {
            (end_month, end_day) = (own.end_month(), own.end_day());
        }
    }
    Ok(AnalysisPeriod::new(
        st_month,
        st_day,
        st_hour,
        end_month,
        end_day,
        end_hour,
        requested.timestep(),
        requested.is_leap_year(),
    )?)
}

// ---- BaseCollection -------------------------------------------------------

impl<M: Mutability> BaseCollection for HourlyContinuousCollection<M> {
    type Key = DateTime;
    type Mode = M;
    type Mutable = HourlyContinuousCollection<Mutable>;
    type Immutable = HourlyContinuousCollection<Immutable>;
    type Filtered = HourlyDiscontinuousCollection<Mutable>;

    const COLLECTION_TYPE: CollectionType = CollectionType::HourlyContinuous;

    fn header(&self) -> &Header {
        &self.header
    }

    fn values(&self) -> &Array1<f64> {
        &self.values
    }

    fn keys(&self) -> &[DateTime] {
        self.datetimes()
    }

    fn validated_a_period(&self) -> bool {
        true
    }

    fn parts_mut(&mut self) -> CollectionResult<(&mut Header, &mut Array1<f64>)> {
        if !M::MUTABLE {
            return Err(CollectionError::ImmutableWrite(self.class_name()));
        }
        Ok((&mut self.header, &mut self.values))
    }

    fn to_mutable(&self) -> HourlyContinuousCollection<Mutable> {
        self.convert_mode()
    }

    fn to_immutable(&self) -> HourlyContinuousCollection<Immutable> {
        self.convert_mode()
    }

    fn filter_by_pattern(&self, pattern: &[bool]) -> CollectionResult<HourlyDiscontinuousCollection> {
        self.to_discontinuous().filter_by_pattern(pattern)
    }

    fn map_values(&self, f: impl Fn(f64) -> f64) -> Self {
        Self::from_parts(self.header.duplicate(), self.values.mapv(f))
    }

    fn with_header_and_values(&self, header: Header, values: Array1<f64>) -> CollectionResult<Self> {
        Self::new(header, values)
    }

    fn from_dict(value: &Value) -> CollectionResult<Self> {
        base::check_dict_type(value, CollectionType::HourlyContinuous)?;
        let parts = base::dict_parts::<DateTime>(value)?;
        Self::new(parts.header, parts.values)
    }
}

// ---- Operators ------------------------------------------------------------

macro_rules! continuous_binary_op {
    ($trait:ident, $method:ident, $op:tt) => {
        impl<M: Mutability, M2: Mutability> std::ops::$trait<&HourlyContinuousCollection<M2>>
            for &HourlyContinuousCollection<M>
        {
            type Output = CollectionResult<HourlyContinuousCollection<M>>;

            fn $method(self, rhs: &HourlyContinuousCollection<M2>) -> Self::Output {
                self.combine(rhs, |x, y| x $op y)
            }
        }

        impl<M: Mutability, M2: Mutability> std::ops::$trait<&HourlyDiscontinuousCollection<M2>>
            for &HourlyContinuousCollection<M>
        {
            type Output = CollectionResult<HourlyDiscontinuousCollection>;

            fn $method(self, rhs: &HourlyDiscontinuousCollection<M2>) -> Self::Output {
                self.to_discontinuous().combine(rhs, |x, y| x $op y)
            }
        }

        impl<M: Mutability, M2: Mutability> std::ops::$trait<&HourlyContinuousCollection<M2>>
            for &HourlyDiscontinuousCollection<M>
        {
            type Output = CollectionResult<HourlyDiscontinuousCollection<M>>;

            fn $method(self, rhs: &HourlyContinuousCollection<M2>) -> Self::Output {
                self.combine(&rhs.to_discontinuous(), |x, y| x $op y)
            }
        }

        impl<M: Mutability> std::ops::$trait<f64> for &HourlyContinuousCollection<M> {
            type Output = HourlyContinuousCollection<M>;

            fn $method(self, rhs: f64) -> Self::Output {
                self.map_values(|x| x $op rhs)
            }
        }
    };
}

continuous_binary_op!(Add, add, +);
continuous_binary_op!(Sub, sub, -);
continuous_binary_op!(Mul, mul, *);
continuous_binary_op!(Div, div, /);

impl<M: Mutability> std::ops::Neg for &HourlyContinuousCollection<M> {
    type Output = HourlyContinuousCollection<M>;

    fn neg(self) -> Self::Output {
        self.map_values(|x| -x)
    }
}

// ---- Formatting & serde ---------------------------------------------------

impl<M: Mutability> fmt::Display for HourlyContinuousCollection<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let period = self.header.analysis_period();
        write!(
            f,
            "{} Data Collection\n{}\n{} ({})\n...{} values...",
            density_label(CollectionType::HourlyContinuous, period.timestep()),
            period,
            self.header.data_type(),
            self.header.unit(),
            self.values.len()
        )
    }
}

impl<M: Mutability> Serialize for HourlyContinuousCollection<M> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_dict().map_err(serde::ser::Error::custom)?.serialize(serializer)
    }
}

impl<'de, M: Mutability> Deserialize<'de> for HourlyContinuousCollection<M> {
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
    // - Construction against the period length and whole-day rule.
    // - Period filters that keep or lose continuity.
    // - Interpolation, culling, removal and mixed arithmetic.
    // -------------------------------------------------------------------------

    const TOL: f64 = 1e-12;

    fn jan(first: u32, last: u32, timestep: u32) -> AnalysisPeriod {
        AnalysisPeriod::new(1, first, 0, 1, last, 23, timestep, false).unwrap()
    }

    fn collection(
        data_type: DataType, unit: &str, period: AnalysisPeriod, values: Vec<f64>,
    ) -> HourlyContinuousCollection {
        let header = Header::new(data_type, unit, period, BTreeMap::new()).unwrap();
        HourlyContinuousCollection::new(header, values).unwrap()
    }

    fn ramp(n: usize) -> Vec<f64> {
        (0..n).map(|i| i as f64).collect()
    }

    #[test]
    // Purpose
    // -------
    // Construction enforces the whole-day rule and the period length.
    //
    // Given
    // -----
    // - A period between hours 8 and 17; a two-day period with 47 values.
    //
    // Expect
    // ------
    // - `IncompatiblePeriod`, then `LengthMismatch { expected: 48, got: 47 }`.
    fn new_checks_period_and_length() {
        let office = AnalysisPeriod::new(1, 1, 8, 1, 1, 17, 1, false).unwrap();
        let header = Header::with_base_unit(DataType::Temperature, office);
        assert!(matches!(
            HourlyContinuousCollection::<Mutable>::new(header, ramp(10)),
            Err(CollectionError::IncompatiblePeriod(_))
        ));

        let header = Header::with_base_unit(DataType::Temperature, jan(1, 2, 1));
        assert_eq!(
            HourlyContinuousCollection::<Mutable>::new(header, ramp(47)),
            Err(CollectionError::LengthMismatch { expected: 48, got: 47 })
        );
    }

    #[test]
    // Purpose
    // -------
    // Whole-day sub-periods stay continuous; partial days do not.
    //
    // Given
    // -----
    // - Hourly ramp over Jan 1–Jan 5.
    // - Requests Jan 2–Jan 3 (whole days) and Jan 2 between 6 and 7.
    //
    // Expect
    // ------
    // - 48 continuous values starting at 24.
    // - 2 discontinuous values [30, 31] labelled with the request.
    fn filter_by_analysis_period_keeps_continuity() {
        let coll = collection(DataType::Temperature, "C", jan(1, 5, 1), ramp(120));

        let whole = coll.filter_by_analysis_period(&jan(2, 3, 1)).unwrap();
        assert!(whole.is_continuous());
        assert_eq!(whole.len(), 48);
        assert_eq!(whole.values()[0], 24.0);

        let window = AnalysisPeriod::new(1, 2, 6, 1, 2, 7, 1, false).unwrap();
        let partial = coll.filter_by_analysis_period(&window).unwrap();
        assert!(!partial.is_continuous());
        assert_eq!(partial.values().to_vec(), vec![30.0, 31.0]);
        assert_eq!(partial.header().analysis_period(), &window);
    }

    #[test]
    // Purpose
    // -------
    // Requests reaching past the collection are clipped to it.
    //
    // Given
    // -----
    // - Hourly data over Jan 2–Jan 3; a request for Jan 1–Jan 10.
    //
    // Expect
    // ------
    // - All 48 values, labelled Jan 2–Jan 3.
    fn filter_by_analysis_period_clips() {
        let coll = collection(DataType::Temperature, "C", jan(2, 3, 1), ramp(48));
        let clipped = coll.filter_by_analysis_period(&jan(1, 10, 1)).unwrap();
        assert_eq!(clipped.len(), 48);
        assert_eq!(clipped.header().analysis_period(), &jan(2, 3, 1));
    }

    #[test]
    // Purpose
    // -------
    // A reversed request keeps its dates and matches only shared samples.
    //
    // Given
    // -----
    // - Hourly ramp over Jan 1–Jan 5; a request for Dec 31–Jan 2.
    //
    // Expect
    // ------
    // - 48 discontinuous values [0, …, 47] for Jan 1–Jan 2.
    // - The header carries the reversed request unchanged.
    fn filter_by_reversed_analysis_period() {
        let coll = collection(DataType::Temperature, "C", jan(1, 5, 1), ramp(120));
        let request = AnalysisPeriod::new(12, 31, 0, 1, 2, 23, 1, false).unwrap();
        assert!(request.is_reversed());

        let filtered = coll.filter_by_analysis_period(&request).unwrap();
        assert!(!filtered.is_continuous());
        assert_eq!(filtered.values().to_vec(), ramp(48));
        assert_eq!(filtered.header().analysis_period(), &request);
    }

    #[test]
    // Purpose
    // -------
    // Point-in-time data interpolates linearly with a cyclic wrap.
    //
    // Given
    // -----
    // - Temperature ramp 0..24 over one day at timestep 1, refined to 2.
    //
    // Expect
    // ------
    // - 48 values [0, 0.5, 1, …, 23, 11.5]; the last steps back toward 0.
    fn interpolate_point_in_time() {
        let coll = collection(DataType::Temperature, "C", jan(1, 1, 1), ramp(24));
        let fine = coll.interpolate_to_timestep(2, None).unwrap();
        assert_eq!(fine.len(), 48);
        assert_eq!(fine.header().analysis_period().timestep(), 2);
        assert!((fine.values()[1] - 0.5).abs() < TOL);
        assert!((fine.values()[46] - 23.0).abs() < TOL);
        assert!((fine.values()[47] - 11.5).abs() < TOL);
    }

    #[test]
    // Purpose
    // -------
    // Cumulative data is split across sub-steps, preserving the total.
    //
    // Given
    // -----
    // - Constant energy 2 kWh per hour for a day, refined to timestep 4.
    //
    // Expect
    // ------
    // - 96 values of 0.5 kWh; total unchanged at 48.
    // - Refining a timestep-4 collection to 6 is `InvalidTimestep`.
    fn interpolate_cumulative_preserves_total() {
        let coll = collection(DataType::Energy, "kWh", jan(1, 1, 1), vec![2.0; 24]);
        let fine = coll.interpolate_to_timestep(4, None).unwrap();
        assert_eq!(fine.len(), 96);
        assert!(fine.values().iter().all(|v| (v - 0.5).abs() < TOL));
        assert!((fine.total() - coll.total()).abs() < TOL);
        assert!(matches!(
            fine.interpolate_to_timestep(6, None),
            Err(CollectionError::InvalidTimestep { target: 6, current: 4 })
        ));
    }

    #[test]
    // Purpose
    // -------
    // Culling keeps the on-grid samples and stays continuous.
    //
    // Given
    // -----
    // - Quarter-hourly ramp over one day (96 values), culled to hourly.
    //
    // Expect
    // ------
    // - 24 values 0, 4, 8, …; culling to timestep 3 is rejected.
    fn cull_to_timestep_stays_continuous() {
        let mut coll = collection(DataType::Temperature, "C", jan(1, 1, 4), ramp(96));
        assert!(matches!(coll.cull_to_timestep(3), Err(CollectionError::InvalidTimestep { .. })));
        coll.convert_to_culled_timestep(1).unwrap();
        assert_eq!(coll.len(), 24);
        assert_eq!(coll.values()[1], 4.0);
        assert_eq!(coll.timestep_text(), "Hourly");
    }

    #[test]
    // Purpose
    // -------
    // Mixed continuous / discontinuous arithmetic degrades to discontinuous
    // and requires matching datetimes.
    //
    // Given
    // -----
    // - A one-day continuous ramp, its discontinuous copy, and a copy with
    //   one entry removed.
    //
    // Expect
    // ------
    // - continuous + copy doubles every value; + the shorter copy is
    //   `NotAligned`; continuous and discontinuous are never aligned.
    fn mixed_arithmetic_degrades() {
        let coll = collection(DataType::Temperature, "C", jan(1, 1, 1), ramp(24));
        let disc = coll.to_discontinuous();
        let sum = (&coll + &disc).unwrap();
        assert_eq!(sum.values()[23], 46.0);
        assert_eq!(sum.collection_type(), CollectionType::HourlyDiscontinuous);

        let shorter = coll.remove_to_discontinuous(0).unwrap();
        assert_eq!(shorter.len(), 23);
        assert!(matches!(&coll - &shorter, Err(CollectionError::NotAligned { .. })));
        assert!(!coll.is_collection_aligned(&disc));
    }

    #[test]
    // Purpose
    // -------
    // Continuous dictionaries omit datetimes and round trip.
    //
    // Given
    // -----
    // - An immutable one-day collection.
    //
    // Expect
    // ------
    // - No `datetimes` field; the type tag names the immutable class.
    fn dict_omits_datetimes() {
        let coll = collection(DataType::Temperature, "C", jan(1, 1, 1), ramp(24)).to_immutable();
        let dict = coll.to_dict().unwrap();
        assert!(dict.get("datetimes").is_none());
        assert_eq!(dict["type"], "HourlyContinuousCollectionImmutable");
        assert_eq!(HourlyContinuousCollectionImmutable::from_dict(&dict).unwrap(), coll);
    }
}
