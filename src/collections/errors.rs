//! collections::errors — error type for headers and data collections.
//!
//! Purpose
//! -------
//! Provide [`CollectionError`] and the [`CollectionResult`] alias used by
//! every collection operation: construction, alignment, conditional
//! statements, immutability and analysis-period validation. Errors from the
//! calendar and data-type layers are wrapped unchanged so callers can match
//! on the original payload.
//!
//! Conventions
//! -----------
//! - Every failure is raised synchronously at the offending call; no
//!   operation leaves a collection partially modified.
//! - With `python-bindings` enabled, every variant converts into a Python
//!   `ValueError` carrying the `Display` text.

use crate::{calendar::CalendarError, datatype::DataTypeError};

#[cfg(feature = "python-bindings")]
use pyo3::{PyErr, exceptions::PyValueError};

/// Result alias for collection operations.
pub type CollectionResult<T> = Result<T, CollectionError>;

/// CollectionError — failures raised by headers and data collections.
///
/// Variants
/// --------
/// - `Calendar(err)` / `DataType(err)`
///   Wrapped errors from the lower layers (invalid period, unacceptable
///   unit, out-of-range values).
/// - `LengthMismatch { expected, got }`
///   Values and time keys (or the analysis period) disagree in length.
/// - `EmptyCollection`
///   A collection was given zero values.
/// - `DuplicateKey(key)`
///   The same time key appears twice.
/// - `NotAligned { reason }`
///   Inputs of an N-ary operation differ in type, length or keys.
/// - `InvalidStatement { statement, reason }`
///   A conditional statement uses a disallowed identifier or token.
/// - `ImmutableWrite(class_name)`
///   A write was attempted on an immutable collection.
/// - `InvalidPercentile(p)` / `InvalidCount { count, len }`
///   Statistics parameters out of range.
/// - `IndexOutOfRange { index, len }`
///   Positional access past the end.
/// - `EmptyFilter`
///   A filter kept no value.
/// - `IncompatiblePeriod(reason)`
///   An analysis period cannot be applied to this collection.
/// - `PeriodMismatch { field, expected, found }`
///   `validate_analysis_period` found data outside the header's period.
/// - `NoCompanionType { data_type, companion }`
///   The data type declares no normalized / time-aggregated companion.
/// - `InvalidTimestep { target, current }`
///   A timestep change that is not a whole multiple (or divisor).
/// - `Serialization(reason)`
///   A dictionary is missing a field or has the wrong shape.
#[derive(Debug, Clone, PartialEq)]
pub enum CollectionError {
    Calendar(CalendarError),
    DataType(DataTypeError),
    LengthMismatch { expected: usize, got: usize },
    EmptyCollection,
    DuplicateKey(String),
    NotAligned { reason: String },
    InvalidStatement { statement: String, reason: String },
    ImmutableWrite(&'static str),
    InvalidPercentile(f64),
    InvalidCount { count: usize, len: usize },
    IndexOutOfRange { index: usize, len: usize },
    EmptyFilter,
    IncompatiblePeriod(String),
    PeriodMismatch { field: &'static str, expected: String, found: String },
    NoCompanionType { data_type: String, companion: &'static str },
    InvalidTimestep { target: u32, current: u32 },
    Serialization(String),
}

impl std::error::Error for CollectionError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CollectionError::Calendar(err) => Some(err),
            CollectionError::DataType(err) => Some(err),
            _ => None,
        }
    }
}

impl std::fmt::Display for CollectionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CollectionError::Calendar(err) => write!(f, "{err}"),
            CollectionError::DataType(err) => write!(f, "{err}"),
            CollectionError::LengthMismatch { expected, got } => write!(
                f,
                "Length of values does not match that expected by the time keys. \
                 {got} != {expected}"
            ),
            CollectionError::EmptyCollection => {
                write!(f, "Data Collection must have at least one value")
            }
            CollectionError::DuplicateKey(key) => {
                write!(f, "Time key {key} appears more than once in the collection")
            }
            CollectionError::NotAligned { reason } => {
                write!(f, "Data Collections are not aligned: {reason}")
            }
            CollectionError::InvalidStatement { statement, reason } => {
                write!(f, "Invalid conditional statement: {statement}\n{reason}")
            }
            CollectionError::ImmutableWrite(class_name) => write!(
                f,
                "values are immutable for {class_name}. \
                 Use to_mutable() to get a mutable version of this collection"
            ),
            CollectionError::InvalidPercentile(p) => {
                write!(f, "percentile must be between 0 and 100. Got {p}")
            }
            CollectionError::InvalidCount { count, len } => {
                write!(f, "count must be between 1 and {len}. Got {count}")
            }
            CollectionError::IndexOutOfRange { index, len } => {
                write!(f, "index {index} is out of range for a collection of {len} values")
            }
            CollectionError::EmptyFilter => write!(f, "No value meets the filter criteria"),
            CollectionError::IncompatiblePeriod(reason) => {
                write!(f, "Incompatible analysis period: {reason}")
            }
            CollectionError::PeriodMismatch { field, expected, found } => write!(
                f,
                "Collection data falls outside the header analysis_period: \
                 {field} should be {expected} but the data requires {found}"
            ),
            CollectionError::NoCompanionType { data_type, companion } => {
                write!(f, "Data type {data_type} has no {companion} type")
            }
            CollectionError::InvalidTimestep { target, current } => write!(
                f,
                "Target timestep ({target}) is not compatible with the current timestep \
                 ({current})"
            ),
            CollectionError::Serialization(reason) => {
                write!(f, "Invalid collection dictionary: {reason}")
            }
        }
    }
}

impl From<CalendarError> for CollectionError {
    fn from(err: CalendarError) -> Self {
        CollectionError::Calendar(err)
    }
}

impl From<DataTypeError> for CollectionError {
    fn from(err: DataTypeError) -> Self {
        CollectionError::DataType(err)
    }
}

impl From<serde_json::Error> for CollectionError {
    fn from(err: serde_json::Error) -> Self {
        CollectionError::Serialization(err.to_string())
    }
}

#[cfg(feature = "python-bindings")]
impl From<CollectionError> for PyErr {
    fn from(err: CollectionError) -> PyErr {
        PyValueError::new_err(err.to_string())
    }
}
