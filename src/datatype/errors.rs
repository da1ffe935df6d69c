//! datatype::errors — error type for unit handling and physical ranges.
//!
//! Purpose
//! -------
//! Provide [`DataTypeError`] and the [`DataTypeResult`] alias for the
//! data-type registry: unknown units, out-of-range values and unknown type
//! names. Collections wrap this error in their own error type so callers see
//! the original payload.
//!
//! Conventions
//! -----------
//! - Payloads carry the data type's class name (e.g. `"DryBulbTemperature"`)
//!   and, for unit errors, the full list of accepted units.
//! - With `python-bindings` enabled, every variant converts into a Python
//!   `ValueError`.

#[cfg(feature = "python-bindings")]
use pyo3::{PyErr, exceptions::PyValueError};

/// Result alias for data-type operations.
pub type DataTypeResult<T> = Result<T, DataTypeError>;

/// DataTypeError — failures raised by the data-type registry.
///
/// Variants
/// --------
/// - `UnacceptableUnit { unit, data_type, accepted }`
///   The unit is not declared by the data type's unit system.
/// - `OutOfRange { data_type, min, max, value }`
///   A value lies outside the physically possible range (only raised when
///   the caller asks for it).
/// - `UnknownType(name)`
///   No registered data type matches the given name.
#[derive(Debug, Clone, PartialEq)]
pub enum DataTypeError {
    UnacceptableUnit { unit: String, data_type: String, accepted: Vec<String> },
    OutOfRange { data_type: String, min: f64, max: f64, value: f64 },
    UnknownType(String),
}

impl std::error::Error for DataTypeError {}

impl std::fmt::Display for DataTypeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DataTypeError::UnacceptableUnit { unit, data_type, accepted } => write!(
                f,
                "{unit} is not an acceptable unit type for {data_type}. \
                 Choose from the following: {}",
                accepted.join(", ")
            ),
            DataTypeError::OutOfRange { data_type, min, max, value } => {
                write!(f, "{data_type} should be between {min} and {max}. Got {value}")
            }
            DataTypeError::UnknownType(name) => {
                write!(f, "Data Type {name} could not be recognized")
            }
        }
    }
}

#[cfg(feature = "python-bindings")]
impl From<DataTypeError> for PyErr {
    fn from(err: DataTypeError) -> PyErr {
        PyValueError::new_err(err.to_string())
    }
}
