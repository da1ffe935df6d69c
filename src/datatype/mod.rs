//! datatype — semantic data types, units and physical ranges.
//!
//! Purpose
//! -------
//! Give every data series a semantic tag ([`DataType`]) and the unit
//! machinery that goes with it. Collections never do unit arithmetic
//! themselves; they delegate to this module and only store the resulting
//! values and unit.
//!
//! Key behaviors
//! -------------
//! - [`units`] holds one static unit system per [`BaseType`] family
//!   (ordered units, SI/IP subsets, affine conversions, SI↔IP pairing).
//! - [`base`] holds the closed [`DataType`] registry: per-type abbreviation,
//!   range, point-in-time / cumulative flags, and companion types for area
//!   normalization, time aggregation and time rate of change.
//! - [`errors`] defines [`DataTypeError`] / [`DataTypeResult`].
//!
//! Invariants & assumptions
//! ------------------------
//! - The registry is closed and static; adding a type means adding an enum
//!   variant and its table rows.
//! - Conversions are pure functions of their inputs and never partially
//!   apply: a bad unit fails before any value is produced.
//!
//! Downstream usage
//! ----------------
//! - `collections::Header` validates its unit with
//!   [`DataType::check_unit`], and collection unit conversions call
//!   [`DataType::to_unit`], [`DataType::to_ip`] and [`DataType::to_si`].

pub mod base;
pub mod errors;
pub mod units;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::base::{DataType, TypeProperties};
pub use self::errors::{DataTypeError, DataTypeResult};
pub use self::units::{BaseType, UnitDef, UnitSystem};

pub mod prelude {
    pub use super::{BaseType, DataType, DataTypeError, DataTypeResult};
}
