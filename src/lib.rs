//! rust_datacollections — typed annual and sub-annual time series with Python
//! bindings.
//!
//! Purpose
//! -------
//! Serve as the crate root for Rust callers and as the PyO3 bridge that
//! exposes analysis periods and continuous hourly collections to Python via
//! the `_rust_datacollections` extension module.
//!
//! Key behaviors
//! -------------
//! - Re-export the core modules: [`calendar`] (instants and analysis
//!   periods), [`datatype`] (semantic types and units) and [`collections`]
//!   (headers and data collections).
//! - When the `python-bindings` feature is enabled, define `#[pyclass]`
//!   wrappers and the `#[pymodule]` initializer with `calendar` and
//!   `collections` submodules.
//!
//! Invariants & assumptions
//! ------------------------
//! - All calendar, unit and collection logic lives in the inner modules;
//!   this file performs only FFI glue, input conversion and error mapping.
//! - Errors cross the boundary as `ValueError` through the `From<…> for
//!   PyErr` impls of each error enum.
//!
//! Downstream usage
//! ----------------
//! - Native Rust code depends on the inner modules (usually through their
//!   `prelude`s) and can ignore everything behind `python-bindings`.
//! - The Python package imports `_rust_datacollections.calendar` and
//!   `_rust_datacollections.collections`.
//!
//! Testing notes
//! -------------
//! - Core behavior is covered by unit tests in the inner modules and by the
//!   integration and property tests under `tests/`.

pub mod calendar;
pub mod collections;
pub mod datatype;
pub mod utils;

#[cfg(feature = "python-bindings")]
use numpy::{IntoPyArray, PyArray1};

#[cfg(feature = "python-bindings")]
use pyo3::{prelude::*, types::PyAny};

#[cfg(feature = "python-bindings")]
use crate::{
    calendar::AnalysisPeriod,
    collections::{BaseCollection, HourlyAggregation, HourlyContinuousCollection},
    utils::{build_header, extract_values},
};

/// AnalysisPeriod — Python-facing wrapper for [`AnalysisPeriod`].
///
/// Constructed from Python via
/// `AnalysisPeriod(st_month=1, st_day=1, st_hour=0, end_month=12,
/// end_day=31, end_hour=23, timestep=1, is_leap_year=False)`; every
/// argument is validated by [`AnalysisPeriod::new`].
#[cfg(feature = "python-bindings")]
#[pyclass(name = "AnalysisPeriod", module = "rust_datacollections.calendar", unsendable)]
#[derive(Clone)]
pub struct PyAnalysisPeriod {
    inner: AnalysisPeriod,
}

#[cfg(feature = "python-bindings")]
#[pymethods]
impl PyAnalysisPeriod {
    #[new]
    #[pyo3(
        signature = (
            st_month = 1,
            st_day = 1,
            st_hour = 0,
            end_month = 12,
            end_day = 31,
            end_hour = 23,
            timestep = 1,
            is_leap_year = false,
        ),
        text_signature = "(st_month=1, st_day=1, st_hour=0, end_month=12, end_day=31, \
                          end_hour=23, timestep=1, is_leap_year=False)"
    )]
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        st_month: u32, st_day: u32, st_hour: u32, end_month: u32, end_day: u32, end_hour: u32,
        timestep: u32, is_leap_year: bool,
    ) -> PyResult<Self> {
        let inner = AnalysisPeriod::new(
            st_month,
            st_day,
            st_hour,
            end_month,
            end_day,
            end_hour,
            timestep,
            is_leap_year,
        )?;
        Ok(PyAnalysisPeriod { inner })
    }

    /// Parse `"M/D to M/D between H and H @T"` (trailing `*` for leap years).
    #[staticmethod]
    pub fn from_string(text: &str) -> PyResult<Self> {
        Ok(PyAnalysisPeriod { inner: AnalysisPeriod::from_string(text)? })
    }

    #[getter]
    pub fn timestep(&self) -> u32 {
        self.inner.timestep()
    }

    #[getter]
    pub fn is_leap_year(&self) -> bool {
        self.inner.is_leap_year()
    }

    #[getter]
    pub fn is_reversed(&self) -> bool {
        self.inner.is_reversed()
    }

    #[getter]
    pub fn is_annual(&self) -> bool {
        self.inner.is_annual()
    }

    /// Minutes of year of every sample.
    #[getter]
    pub fn moys(&self) -> Vec<u32> {
        self.inner.moys().to_vec()
    }

    /// Hours of year of every sample.
    #[getter]
    pub fn hoys(&self) -> Vec<f64> {
        self.inner.hoys()
    }

    #[getter]
    pub fn doys_int(&self) -> Vec<u16> {
        self.inner.doys_int()
    }

    #[getter]
    pub fn months_int(&self) -> Vec<u8> {
        self.inner.months_int()
    }

    /// JSON text of the dictionary form.
    pub fn to_json(&self) -> String {
        self.inner.to_dict().to_string()
    }

    pub fn __len__(&self) -> usize {
        self.inner.len()
    }

    pub fn __repr__(&self) -> String {
        self.inner.to_string()
    }
}

/// HourlyContinuousCollection — Python-facing wrapper for
/// [`HourlyContinuousCollection`].
///
/// Constructed from Python via
/// `HourlyContinuousCollection(data_type, values, analysis_period=None,
/// unit=None)`:
/// - `data_type`: class name (`"DryBulbTemperature"`) or spaced name.
/// - `values`: numpy array, pandas Series or float sequence whose length
///   matches the period.
/// - `analysis_period`: defaults to the whole common year at timestep 1.
/// - `unit`: defaults to the data type's canonical unit.
#[cfg(feature = "python-bindings")]
#[pyclass(
    name = "HourlyContinuousCollection",
    module = "rust_datacollections.collections",
    unsendable
)]
pub struct PyHourlyContinuousCollection {
    inner: HourlyContinuousCollection,
}

#[cfg(feature = "python-bindings")]
#[pymethods]
impl PyHourlyContinuousCollection {
    #[new]
    #[pyo3(
        signature = (data_type, values, analysis_period = None, unit = None),
        text_signature = "(data_type, values, /, analysis_period=None, unit=None)"
    )]
    pub fn new<'py>(
        py: Python<'py>, data_type: &str, values: &Bound<'py, PyAny>,
        analysis_period: Option<PyAnalysisPeriod>, unit: Option<&str>,
    ) -> PyResult<Self> {
        let period = analysis_period.map(|p| p.inner).unwrap_or_default();
        let header = build_header(data_type, unit, period)?;
        let values = extract_values(py, values)?;
        Ok(PyHourlyContinuousCollection { inner: HourlyContinuousCollection::new(header, values)? })
    }

    #[getter]
    pub fn values<'py>(&self, py: Python<'py>) -> Bound<'py, PyArray1<f64>> {
        self.inner.values().to_vec().into_pyarray(py)
    }

    #[getter]
    pub fn data_type(&self) -> String {
        self.inner.header().data_type().name()
    }

    #[getter]
    pub fn unit(&self) -> String {
        self.inner.header().unit().to_string()
    }

    #[getter]
    pub fn analysis_period(&self) -> PyAnalysisPeriod {
        PyAnalysisPeriod { inner: self.inner.header().analysis_period().clone() }
    }

    #[getter]
    pub fn average(&self) -> f64 {
        self.inner.average()
    }

    #[getter]
    pub fn min(&self) -> f64 {
        BaseCollection::min(&self.inner)
    }

    #[getter]
    pub fn max(&self) -> f64 {
        BaseCollection::max(&self.inner)
    }

    #[getter]
    pub fn total(&self) -> f64 {
        self.inner.total()
    }

    #[getter]
    pub fn median(&self) -> f64 {
        self.inner.median()
    }

    pub fn percentile(&self, percentile: f64) -> PyResult<f64> {
        Ok(self.inner.percentile(percentile)?)
    }

    pub fn to_unit(&self, unit: &str) -> PyResult<Self> {
        Ok(PyHourlyContinuousCollection { inner: self.inner.to_unit(unit)? })
    }

    pub fn to_ip(&self) -> PyResult<Self> {
        Ok(PyHourlyContinuousCollection { inner: self.inner.to_ip()? })
    }

    pub fn to_si(&self) -> PyResult<Self> {
        Ok(PyHourlyContinuousCollection { inner: self.inner.to_si()? })
    }

    pub fn interpolate_to_timestep(&self, timestep: u32, cumulative: Option<bool>) -> PyResult<Self> {
        Ok(PyHourlyContinuousCollection {
            inner: self.inner.interpolate_to_timestep(timestep, cumulative)?,
        })
    }

    /// `(doys, values)` of the daily means.
    pub fn average_daily(&self) -> PyResult<(Vec<u16>, Vec<f64>)> {
        let daily = self.inner.average_daily()?;
        Ok((daily.doys().to_vec(), daily.values().to_vec()))
    }

    /// `(doys, values)` of the daily totals.
    pub fn total_daily(&self) -> PyResult<(Vec<u16>, Vec<f64>)> {
        let daily = self.inner.total_daily()?;
        Ok((daily.doys().to_vec(), daily.values().to_vec()))
    }

    /// `(moys, values)` of the entries satisfying `statement` (variable `a`).
    pub fn filter_by_conditional_statement(
        &self, statement: &str,
    ) -> PyResult<(Vec<u32>, Vec<f64>)> {
        let filtered = self.inner.filter_by_conditional_statement(statement)?;
        Ok((filtered.moys(), filtered.values().to_vec()))
    }

    /// JSON text of the dictionary form.
    pub fn to_json(&self) -> PyResult<String> {
        Ok(self.inner.to_dict()?.to_string())
    }

    pub fn __len__(&self) -> usize {
        self.inner.len()
    }

    pub fn __repr__(&self) -> String {
        self.inner.to_string()
    }
}

/// Module initializer for `_rust_datacollections`.
///
/// Creates the `calendar` and `collections` submodules, attaches them to the
/// parent module and registers them in `sys.modules` so dotted imports work.
#[cfg(feature = "python-bindings")]
#[pymodule]
fn _rust_datacollections<'py>(py: Python<'py>, m: &Bound<'py, PyModule>) -> PyResult<()> {
    let calendar_mod = PyModule::new(py, "calendar")?;
    calendar_mod.add_class::<PyAnalysisPeriod>()?;
    m.add_submodule(&calendar_mod)?;

    let collections_mod = PyModule::new(py, "collections")?;
    collections_mod.add_class::<PyHourlyContinuousCollection>()?;
    m.add_submodule(&collections_mod)?;

    let modules = py.import("sys")?.getattr("modules")?;
    modules.set_item("rust_datacollections.calendar", calendar_mod)?;
    modules.set_item("rust_datacollections.collections", collections_mod)?;
    Ok(())
}
