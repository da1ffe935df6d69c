//! collections — typed, aligned data collections over the calendar.
//!
//! Purpose
//! -------
//! Pair a [`Header`] (data type, unit, analysis period, metadata) with a
//! series of values and the time keys they belong to, and provide the
//! statistics, filtering, unit conversion, alignment, algebra and
//! aggregation that work on such series.
//!
//! Key behaviors
//! -------------
//! - [`base`] defines [`BaseCollection`], the behavior shared by every
//!   density and access mode.
//! - [`discontinuous`] defines [`Collection<K, M>`] with explicit keys:
//!   [`HourlyDiscontinuousCollection`], [`DailyCollection`],
//!   [`MonthlyCollection`] and [`MonthlyPerHourCollection`].
//! - [`continuous`] defines [`HourlyContinuousCollection`], whose keys are
//!   the datetimes of its whole-day period.
//! - [`aggregation`] reduces hourly data to days, months and month-hours,
//!   and daily data to months.
//! - [`mutability`] provides the [`Mutable`] / [`Immutable`] markers;
//!   [`keys`] the [`TimeKey`] densities and [`CollectionType`] tags.
//! - [`statement`] evaluates conditional statements such as
//!   `"a > 25 and b < 80"` for filtering; [`statistics`] holds the
//!   slice-level percentile, ranking and histogram helpers.
//! - [`errors`] defines [`CollectionError`] / [`CollectionResult`].
//!
//! Invariants & assumptions
//! ------------------------
//! - Every constructed collection is non-empty with one value per key.
//! - Alignment means same [`CollectionType`], same length and identical
//!   keys; mutability never affects alignment.
//! - Transforms never modify their input. Methods that write in place
//!   (`set_values`, `convert_to_*`, `remove`, …) fail with
//!   `ImmutableWrite` on immutable collections.
//!
//! Conventions
//! -----------
//! - Collections serialize to the dictionary form described in [`base`],
//!   both through `to_dict` / `from_dict` and through `serde`.
//!
//! Downstream usage
//! ----------------
//! - Most callers import [`prelude`], which brings the collection types,
//!   the behavior traits and the error types into scope.
//!
//! Testing notes
//! -------------
//! - Unit tests live next to each submodule. End-to-end scenarios are in
//!   `tests/collections.rs`; property tests in `tests/properties.rs`.

pub mod aggregation;
pub mod base;
pub mod continuous;
pub mod discontinuous;
pub mod errors;
pub mod header;
pub mod keys;
pub mod mutability;
pub mod statement;
pub mod statistics;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::aggregation::{DailyAggregation, HourlyAggregation};
pub use self::base::{AlignedValues, BaseCollection, FunctionInput, FunctionOutput};
pub use self::continuous::{
    HourlyCollection, HourlyContinuousCollection, HourlyContinuousCollectionImmutable,
};
pub use self::discontinuous::{
    Collection, DailyCollection, DailyCollectionImmutable, HourlyDiscontinuousCollection,
    HourlyDiscontinuousCollectionImmutable, MonthlyCollection, MonthlyCollectionImmutable,
    MonthlyPerHourCollection, MonthlyPerHourCollectionImmutable,
};
pub use self::errors::{CollectionError, CollectionResult};
pub use self::header::Header;
pub use self::keys::{CollectionType, TimeKey};
pub use self::mutability::{Immutable, Mutability, Mutable};
pub use self::statement::Statement;
pub use self::statistics::{arange, histogram, histogram_circular, linspace};

// ---- Optional convenience prelude for downstream crates -------------------

pub mod prelude {
    pub use super::{
        AlignedValues, BaseCollection, CollectionError, CollectionResult, CollectionType,
        DailyAggregation, DailyCollection, FunctionInput, FunctionOutput, Header,
        HourlyAggregation, HourlyCollection, HourlyContinuousCollection,
        HourlyDiscontinuousCollection, Immutable, MonthlyCollection, MonthlyPerHourCollection,
        Mutable,
    };
}
