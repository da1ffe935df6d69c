//! utils — conversion helpers for the Python bindings.
//!
//! Everything here is compiled only with the `python-bindings` feature and
//! is used by the `#[pyclass]` wrappers in the crate root.

#[cfg(feature = "python-bindings")]
use pyo3::{exceptions::PyTypeError, exceptions::PyValueError, prelude::*, types::PyAny};

#[cfg(feature = "python-bindings")]
use numpy::{IntoPyArray, PyArrayMethods, PyReadonlyArray1};

#[cfg(feature = "python-bindings")]
use crate::{
    calendar::AnalysisPeriod,
    collections::{CollectionResult, Header},
    datatype::DataType,
};

/// Read a 1-D float64 array from a numpy array, a pandas Series, an object
/// exposing `.values` (such as another data collection) or a plain sequence.
#[cfg(feature = "python-bindings")]
pub fn extract_f64_array<'py>(
    py: Python<'py>, raw_values: &Bound<'py, PyAny>,
) -> PyResult<PyReadonlyArray1<'py, f64>> {
    if let Ok(array) = raw_values.extract::<PyReadonlyArray1<f64>>() {
        if array.as_slice().is_ok() {
            return Ok(array);
        }
    }
    for accessor in ["to_numpy", "values"] {
        let Ok(attr) = raw_values.getattr(accessor) else {
            continue;
        };
        let inner = if attr.is_callable() { attr.call0()? } else { attr };
        if let Ok(array) = inner.extract::<PyReadonlyArray1<f64>>() {
            if array.as_slice().is_ok() {
                return Ok(array);
            }
        }
        if let Ok(values) = inner.extract::<Vec<f64>>() {
            return Ok(values.into_pyarray(py).readonly());
        }
    }
    let values: Vec<f64> = raw_values.extract().map_err(|_| {
        PyTypeError::new_err("values must be a 1-D numpy.ndarray, pandas.Series or float sequence")
    })?;
    Ok(values.into_pyarray(py).readonly())
}

/// Owned copy of [`extract_f64_array`]'s result.
#[cfg(feature = "python-bindings")]
pub fn extract_values<'py>(py: Python<'py>, raw_values: &Bound<'py, PyAny>) -> PyResult<Vec<f64>> {
    let array = extract_f64_array(py, raw_values)?;
    let slice = array
        .as_slice()
        .map_err(|_| PyValueError::new_err("values must be a contiguous float64 array"))?;
    Ok(slice.to_vec())
}

/// Header from a data-type name, an optional unit (defaulting to the type's
/// canonical unit) and a period.
#[cfg(feature = "python-bindings")]
pub fn build_header(
    data_type: &str, unit: Option<&str>, analysis_period: AnalysisPeriod,
) -> CollectionResult<Header> {
    let data_type = DataType::from_name(data_type)?;
    let unit = unit.unwrap_or(data_type.unit_system().base_unit());
    Header::new(data_type, unit, analysis_period, Default::default())
}
