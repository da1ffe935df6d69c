//! collections::base — behavior shared by every data collection.
//!
//! Purpose
//! -------
//! Define [`BaseCollection`], the trait every density × mutability type
//! implements. Implementors supply storage access and a handful of
//! constructors; the trait provides statistics, unit conversion, pattern
//! and statement filtering, alignment checks, pointwise algebra, aligned
//! derivation, companion-type transforms and dictionary serialization.
//!
//! Key behaviors
//! -------------
//! - Read and derive methods work on any mode. Derived collections are
//!   mutable, except `duplicate` and `get_aligned_collection`, which keep
//!   the source's mode.
//! - Writes (`set_values`, `set`, `convert_to_*`) go through
//!   [`BaseCollection::parts_mut`], which refuses immutable collections
//!   before anything is touched.
//! - Unit work is delegated to [`DataType`]; the header unit is rewritten
//!   only after the new values exist.
//!
//! Invariants & assumptions
//! ------------------------
//! - `values().len() == keys().len() > 0`.
//! - Two collections are aligned iff they share a [`CollectionType`], a
//!   length and an identical key sequence. The relation is symmetric.
//! - Pointwise algebra keeps the left operand's header unchanged, even
//!   when the result is not physically a value of that type.
//!
//! Conventions
//! -----------
//! - Dictionary form:
//!   `{"type": <class name>, "header": {...}, "values": [...],
//!     <keys field>: [...], "validated_a_period": bool}` with the keys
//!   field omitted for continuous collections.
//!
//! Downstream usage
//! ----------------
//! - `discontinuous` and `continuous` implement the trait; aggregation
//!   helpers in `aggregation` are blanket-implemented on top of it.

use std::borrow::Cow;

use ndarray::Array1;
use serde_json::{Value, json};
use statrs::statistics::Statistics;

use crate::collections::errors::{CollectionError, CollectionResult};
use crate::collections::header::Header;
use crate::collections::keys::{CollectionType, TimeKey};
use crate::collections::mutability::{Immutable, Mutability, Mutable};
use crate::collections::statement::Statement;
use crate::collections::statistics;
use crate::datatype::{BaseType, DataType};

/// Values for [`BaseCollection::get_aligned_collection`]: one repeated
/// scalar or one value per time step.
#[derive(Debug, Clone, PartialEq)]
pub enum AlignedValues {
    Scalar(f64),
    Values(Vec<f64>),
}

impl AlignedValues {
    fn expand(self, len: usize) -> CollectionResult<Array1<f64>> {
        match self {
            AlignedValues::Scalar(v) => Ok(Array1::from_elem(len, v)),
            AlignedValues::Values(vals) if vals.len() == len => Ok(Array1::from(vals)),
            AlignedValues::Values(vals) => {
                Err(CollectionError::LengthMismatch { expected: len, got: vals.len() })
            }
        }
    }
}

impl From<f64> for AlignedValues {
    fn from(v: f64) -> Self {
        AlignedValues::Scalar(v)
    }
}

impl From<Vec<f64>> for AlignedValues {
    fn from(v: Vec<f64>) -> Self {
        AlignedValues::Values(v)
    }
}

impl From<&[f64]> for AlignedValues {
    fn from(v: &[f64]) -> Self {
        AlignedValues::Values(v.to_vec())
    }
}

impl From<Array1<f64>> for AlignedValues {
    fn from(v: Array1<f64>) -> Self {
        AlignedValues::Values(v.to_vec())
    }
}

/// One argument of [`BaseCollection::compute_function_aligned`].
#[derive(Debug, Clone)]
pub enum FunctionInput<'a, C> {
    Collection(&'a C),
    Scalar(f64),
}

/// Result of [`BaseCollection::compute_function_aligned`]: a scalar when
/// every input was a scalar, otherwise an aligned collection.
#[derive(Debug, Clone, PartialEq)]
pub enum FunctionOutput<C> {
    Scalar(f64),
    Collection(C),
}

/// Contiguous view of a value array, copying only for strided layouts.
pub(crate) fn value_slice(values: &Array1<f64>) -> Cow<'_, [f64]> {
    match values.as_slice() {
        Some(slice) => Cow::Borrowed(slice),
        None => Cow::Owned(values.to_vec()),
    }
}

/// BaseCollection — shared behavior of all data collections.
///
/// Associated types
/// ----------------
/// - `Key`: the time key ([`TimeKey`]) of the density.
/// - `Mode`: [`Mutable`] or [`Immutable`].
/// - `Mutable` / `Immutable`: the same density in each mode.
/// - `Filtered`: what subset filters return (continuous collections
///   degrade to discontinuous ones).
///
/// Required methods
/// ----------------
/// Storage access (`header`, `values`, `keys`, `validated_a_period`),
/// checked write access (`parts_mut`), mode conversion (`to_mutable`,
/// `to_immutable`), `filter_by_pattern`, `map_values`,
/// `with_header_and_values` and `from_dict`.
pub trait BaseCollection: Sized + Clone + PartialEq {
    type Key: TimeKey;
    type Mode: Mutability;
    type Mutable: BaseCollection<Key = Self::Key, Mode = Mutable>;
    type Immutable: BaseCollection<Key = Self::Key, Mode = Immutable>;
    type Filtered: BaseCollection<Key = Self::Key, Mode = Mutable>;

    const COLLECTION_TYPE: CollectionType;

    fn header(&self) -> &Header;

    fn values(&self) -> &Array1<f64>;

    fn keys(&self) -> &[Self::Key];

    /// Whether the keys have been checked against the header's period.
    fn validated_a_period(&self) -> bool;

    /// Mutable access to header and values.
    ///
    /// Errors
    /// ------
    /// - `ImmutableWrite` on immutable collections.
    fn parts_mut(&mut self) -> CollectionResult<(&mut Header, &mut Array1<f64>)>;

    fn to_mutable(&self) -> Self::Mutable;

    fn to_immutable(&self) -> Self::Immutable;

    /// Keep index `i` where `pattern[i % pattern.len()]` is true.
    ///
    /// Errors
    /// ------
    /// - `EmptyFilter` when nothing is kept (or the pattern is empty).
    fn filter_by_pattern(&self, pattern: &[bool]) -> CollectionResult<Self::Filtered>;

    /// Same collection with `f` applied to every value.
    fn map_values(&self, f: impl Fn(f64) -> f64) -> Self;

    /// Same keys, mode and validation flag with a new header and values.
    ///
    /// Errors
    /// ------
    /// - `LengthMismatch` when `values` does not match the keys (for
    ///   continuous collections: the length implied by the header period).
    fn with_header_and_values(&self, header: Header, values: Array1<f64>) -> CollectionResult<Self>;

    fn from_dict(value: &Value) -> CollectionResult<Self>;

    // ---- Accessors --------------------------------------------------------

    fn len(&self) -> usize {
        self.values().len()
    }

    /// Always false for a constructed collection.
    fn is_empty(&self) -> bool {
        self.values().is_empty()
    }

    fn get(&self, index: usize) -> Option<f64> {
        self.values().get(index).copied()
    }

    fn is_continuous(&self) -> bool {
        Self::COLLECTION_TYPE == CollectionType::HourlyContinuous
    }

    fn is_mutable(&self) -> bool {
        Self::Mode::MUTABLE
    }

    fn collection_type(&self) -> CollectionType {
        Self::COLLECTION_TYPE
    }

    fn class_name(&self) -> &'static str {
        Self::COLLECTION_TYPE.class_name(Self::Mode::MUTABLE)
    }

    // ---- Writes -----------------------------------------------------------

    /// Replace every value.
    ///
    /// Errors
    /// ------
    /// - `ImmutableWrite` on immutable collections.
    /// - `LengthMismatch` when the new length differs from the keys.
    fn set_values(&mut self, values: impl Into<Array1<f64>>) -> CollectionResult<()> {
        let values = values.into();
        let expected = self.keys().len();
        let (_, current) = self.parts_mut()?;
        if values.len() != expected {
            return Err(CollectionError::LengthMismatch { expected, got: values.len() });
        }
        *current = values;
        Ok(())
    }

    /// Replace the value at `index`.
    fn set(&mut self, index: usize, value: f64) -> CollectionResult<()> {
        let len = self.len();
        let (_, values) = self.parts_mut()?;
        let slot =
            values.get_mut(index).ok_or(CollectionError::IndexOutOfRange { index, len })?;
        *slot = value;
        Ok(())
    }

    // ---- Statistics -------------------------------------------------------

    fn min(&self) -> f64 {
        Statistics::min(self.values().iter())
    }

    fn max(&self) -> f64 {
        Statistics::max(self.values().iter())
    }

    fn bounds(&self) -> (f64, f64) {
        (BaseCollection::min(self), BaseCollection::max(self))
    }

    fn average(&self) -> f64 {
        Statistics::mean(self.values().iter())
    }

    fn total(&self) -> f64 {
        self.values().sum()
    }

    fn median(&self) -> f64 {
        self.percentile(50.0).unwrap_or(f64::NAN)
    }

    /// Value at percentile `p` (0–100), see [`statistics::percentile`].
    fn percentile(&self, p: f64) -> CollectionResult<f64> {
        statistics::percentile(&value_slice(self.values()), p)
    }

    /// The `count` highest values (highest first) and their indices.
    fn highest_values(&self, count: usize) -> CollectionResult<(Vec<f64>, Vec<usize>)> {
        statistics::highest_values(&value_slice(self.values()), count)
    }

    /// The `count` lowest values (lowest first) and their indices.
    fn lowest_values(&self, count: usize) -> CollectionResult<(Vec<f64>, Vec<usize>)> {
        statistics::lowest_values(&value_slice(self.values()), count)
    }

    /// Whether every value lies in the data type's physical range.
    ///
    /// With `raise`, the first offending value is an error instead.
    fn is_in_data_type_range(&self, raise: bool) -> CollectionResult<bool> {
        let header = self.header();
        Ok(header.data_type().is_in_range(
            &value_slice(self.values()),
            Some(header.unit()),
            raise,
        )?)
    }

    // ---- Unit conversion --------------------------------------------------

    /// Convert values and header to `unit` in place.
    ///
    /// Errors
    /// ------
    /// - `DataType(UnacceptableUnit)` for a unit foreign to the data type.
    /// - `ImmutableWrite` on immutable collections.
    fn convert_to_unit(&mut self, unit: &str) -> CollectionResult<()> {
        let header = self.header();
        let converted =
            header.data_type().to_unit(&value_slice(self.values()), unit, header.unit())?;
        let (header, values) = self.parts_mut()?;
        header.set_unit(unit)?;
        *values = Array1::from(converted);
        Ok(())
    }

    /// Convert to the matching IP unit in place.
    fn convert_to_ip(&mut self) -> CollectionResult<()> {
        let header = self.header();
        let (converted, unit) = header.data_type().to_ip(&value_slice(self.values()), header.unit())?;
        let (header, values) = self.parts_mut()?;
        header.set_unit(unit)?;
        *values = Array1::from(converted);
        Ok(())
    }

    /// Convert to the matching SI unit in place.
    fn convert_to_si(&mut self) -> CollectionResult<()> {
        let header = self.header();
        let (converted, unit) = header.data_type().to_si(&value_slice(self.values()), header.unit())?;
        let (header, values) = self.parts_mut()?;
        header.set_unit(unit)?;
        *values = Array1::from(converted);
        Ok(())
    }

    /// New mutable collection in `unit`.
    fn to_unit(&self, unit: &str) -> CollectionResult<Self::Mutable> {
        let mut converted = self.to_mutable();
        converted.convert_to_unit(unit)?;
        Ok(converted)
    }

    fn to_ip(&self) -> CollectionResult<Self::Mutable> {
        let mut converted = self.to_mutable();
        converted.convert_to_ip()?;
        Ok(converted)
    }

    fn to_si(&self) -> CollectionResult<Self::Mutable> {
        let mut converted = self.to_mutable();
        converted.convert_to_si()?;
        Ok(converted)
    }

    // ---- Filtering --------------------------------------------------------

    /// Keep the values for which `statement` (variable `a`) holds.
    fn filter_by_conditional_statement(&self, statement: &str) -> CollectionResult<Self::Filtered> {
        let stmt = Statement::parse(statement, 1)?;
        let pattern: Vec<bool> = self.values().iter().map(|&a| stmt.evaluate(&[a])).collect();
        self.filter_by_pattern(&pattern)
    }

    /// One boolean per index from `statement` over aligned collections,
    /// binding `a`, `b`, `c`, … to the collections in order.
    fn pattern_from_collections_and_statement(
        collections: &[&Self], statement: &str,
    ) -> CollectionResult<Vec<bool>> {
        Self::are_collections_aligned(collections, true)?;
        let stmt = Statement::parse(statement, collections.len())?;
        let len = collections.first().map_or(0, |c| c.len());
        let mut row = vec![0.0; collections.len()];
        let pattern = (0..len)
            .map(|i| {
                for (slot, coll) in row.iter_mut().zip(collections) {
                    *slot = coll.values()[i];
                }
                stmt.evaluate(&row)
            })
            .collect();
        Ok(pattern)
    }

    /// Filter aligned collections with one shared pattern, so every result
    /// has the same keys.
    fn filter_collections_by_statement(
        collections: &[&Self], statement: &str,
    ) -> CollectionResult<Vec<Self::Filtered>> {
        let pattern = Self::pattern_from_collections_and_statement(collections, statement)?;
        collections.iter().map(|c| c.filter_by_pattern(&pattern)).collect()
    }

    // ---- Alignment --------------------------------------------------------

    /// Same density tag, same length and identical keys.
    fn is_collection_aligned<C>(&self, other: &C) -> bool
    where
        C: BaseCollection<Key = Self::Key>,
    {
        Self::COLLECTION_TYPE == C::COLLECTION_TYPE
            && self.len() == other.len()
            && self.keys() == other.keys()
    }

    /// Whether every collection is aligned with the first one.
    ///
    /// Errors
    /// ------
    /// - `NotAligned` for the first misaligned pair when `raise` is set.
    fn are_collections_aligned(collections: &[&Self], raise: bool) -> CollectionResult<bool> {
        let Some((first, rest)) = collections.split_first() else {
            return Ok(true);
        };
        for other in rest {
            if !first.is_collection_aligned(*other) {
                if raise {
                    return Err(CollectionError::NotAligned {
                        reason: format!(
                            "{} Data Collection is not aligned with {} Data Collection",
                            first.header().data_type(),
                            other.header().data_type()
                        ),
                    });
                }
                return Ok(false);
            }
        }
        Ok(true)
    }

    // ---- Algebra ----------------------------------------------------------

    /// Pointwise `op` with an aligned collection; the result keeps this
    /// collection's header and mode.
    ///
    /// Errors
    /// ------
    /// - `NotAligned` when the collections differ in tag, length or keys.
    fn combine<C>(&self, other: &C, op: impl Fn(f64, f64) -> f64) -> CollectionResult<Self>
    where
        C: BaseCollection<Key = Self::Key>,
    {
        if !self.is_collection_aligned(other) {
            return Err(CollectionError::NotAligned {
                reason: format!(
                    "{} cannot be combined with {} ({} vs {} values)",
                    self.class_name(),
                    other.class_name(),
                    self.len(),
                    other.len()
                ),
            });
        }
        let values = ndarray::Zip::from(self.values()).and(other.values()).map_collect(|&x, &y| op(x, y));
        self.with_header_and_values(self.header().duplicate(), values)
    }

    // ---- Derivation -------------------------------------------------------

    /// Independent copy in the same mode.
    fn duplicate(&self) -> Self {
        self.clone()
    }

    /// Collection with these keys and mode holding `value`.
    ///
    /// Parameters
    /// ----------
    /// - `value`: a scalar repeated over every step, or one value per step.
    /// - `data_type`: defaults to this collection's type.
    /// - `unit`: defaults to this collection's unit, or to the canonical
    ///   unit of `data_type` when a data type is given.
    fn get_aligned_collection(
        &self, value: impl Into<AlignedValues>, data_type: Option<DataType>, unit: Option<&str>,
    ) -> CollectionResult<Self> {
        let header = aligned_header(self.header(), data_type, unit)?;
        let values = value.into().expand(self.len())?;
        self.with_header_and_values(header, values)
    }

    /// Apply `f` index by index across aligned collections and scalars.
    ///
    /// All-scalar input returns `FunctionOutput::Scalar(f(inputs))`.
    /// Otherwise the output is aligned with the first collection argument
    /// and labelled with `data_type` / `unit`.
    ///
    /// Errors
    /// ------
    /// - `NotAligned` when the collection arguments are not aligned.
    /// - `DataType(UnacceptableUnit)` for a bad `unit`.
    fn compute_function_aligned(
        f: impl Fn(&[f64]) -> f64, inputs: &[FunctionInput<'_, Self>], data_type: DataType,
        unit: Option<&str>,
    ) -> CollectionResult<FunctionOutput<Self>> {
        let collections: Vec<&Self> = inputs
            .iter()
            .filter_map(|input| match input {
                FunctionInput::Collection(c) => Some(*c),
                FunctionInput::Scalar(_) => None,
            })
            .collect();
        let mut row: Vec<f64> = inputs
            .iter()
            .map(|input| match input {
                FunctionInput::Scalar(v) => *v,
                FunctionInput::Collection(_) => f64::NAN,
            })
            .collect();
        let Some(&template) = collections.first() else {
            return Ok(FunctionOutput::Scalar(f(&row)));
        };
        Self::are_collections_aligned(&collections, true)?;

        let mut out = Vec::with_capacity(template.len());
        for i in 0..template.len() {
            for (slot, input) in row.iter_mut().zip(inputs) {
                if let FunctionInput::Collection(c) = input {
                    *slot = c.values()[i];
                }
            }
            out.push(f(&row));
        }
        let aligned = template.get_aligned_collection(out, Some(data_type), unit)?;
        Ok(FunctionOutput::Collection(aligned))
    }

    /// Values divided by `area`, relabelled with the area-normalized type
    /// and the unit `"<unit>/<area_unit>"`.
    ///
    /// Errors
    /// ------
    /// - `NoCompanionType` when the data type has no normalized type.
    /// - `DataType(UnacceptableUnit)` when `area_unit` is not an area unit
    ///   or the combined unit is unknown to the normalized type.
    fn normalize_by_area(&self, area: f64, area_unit: &str) -> CollectionResult<Self::Mutable> {
        let header = self.header();
        let normalized = header.data_type().normalized_type().ok_or_else(|| {
            CollectionError::NoCompanionType {
                data_type: header.data_type().class_name().to_string(),
                companion: "normalized",
            }
        })?;
        DataType::from_base(BaseType::Area).check_unit(area_unit)?;
        let unit = format!("{}/{}", header.unit(), area_unit);

        let mut new_header = header.with_data_type_and_unit(normalized, &unit)?;
        if let Some(kind) = new_header.metadata_mut().get_mut("type") {
            kind.push_str(" Intensity");
        }
        let values = self.values().mapv(|v| v / area);
        self.to_mutable().with_header_and_values(new_header, values)
    }

    /// Rate values integrated over each time step (e.g. W → kWh).
    ///
    /// Values are converted to the canonical unit, scaled by
    /// `time_aggregated_factor / timestep` and labelled with the aggregated
    /// type in its canonical unit.
    fn to_time_aggregated(&self) -> CollectionResult<Self::Mutable> {
        let header = self.header();
        let data_type = header.data_type();
        let (target, factor) = data_type
            .time_aggregated_type()
            .zip(data_type.time_aggregated_factor())
            .ok_or_else(|| CollectionError::NoCompanionType {
                data_type: data_type.class_name().to_string(),
                companion: "time-aggregated",
            })?;
        let base = data_type.to_unit(
            &value_slice(self.values()),
            data_type.unit_system().base_unit(),
            header.unit(),
        )?;
        let timestep = f64::from(header.analysis_period().timestep());
        let values = Array1::from(base).mapv(|v| v * factor / timestep);
        let new_header =
            header.with_data_type_and_unit(target, target.unit_system().base_unit())?;
        self.to_mutable().with_header_and_values(new_header, values)
    }

    /// Inverse of [`BaseCollection::to_time_aggregated`] (e.g. kWh → W).
    fn to_time_rate_of_change(&self) -> CollectionResult<Self::Mutable> {
        let header = self.header();
        let data_type = header.data_type();
        let (target, factor) = data_type
            .time_rate_of_change_type()
            .and_then(|rate| rate.time_aggregated_factor().map(|f| (rate, f)))
            .ok_or_else(|| CollectionError::NoCompanionType {
                data_type: data_type.class_name().to_string(),
                companion: "time rate of change",
            })?;
        let base = data_type.to_unit(
            &value_slice(self.values()),
            data_type.unit_system().base_unit(),
            header.unit(),
        )?;
        let timestep = f64::from(header.analysis_period().timestep());
        let values = Array1::from(base).mapv(|v| v * timestep / factor);
        let new_header =
            header.with_data_type_and_unit(target, target.unit_system().base_unit())?;
        self.to_mutable().with_header_and_values(new_header, values)
    }

    // ---- Serialization ----------------------------------------------------

    /// Dictionary form described in the module docs.
    ///
    /// Errors
    /// ------
    /// - `Serialization` when the header or keys fail to serialize.
    fn to_dict(&self) -> CollectionResult<Value> {
        let mut dict = json!({
            "type": self.class_name(),
            "header": self.header().to_dict()?,
            "values": self.values().to_vec(),
            "validated_a_period": self.validated_a_period(),
        });
        if !self.is_continuous() {
            dict[<Self::Key as TimeKey>::KEYS_FIELD] = serde_json::to_value(self.keys())?;
        }
        Ok(dict)
    }
}

/// Header for an aligned collection (see `get_aligned_collection`).
fn aligned_header(
    header: &Header, data_type: Option<DataType>, unit: Option<&str>,
) -> CollectionResult<Header> {
    let (data_type, unit) = match data_type {
        Some(dt) => (dt, unit.unwrap_or(dt.unit_system().base_unit())),
        None => (header.data_type(), unit.unwrap_or(header.unit())),
    };
    Header::new(data_type, unit, header.analysis_period().clone(), header.metadata().clone())
}

/// Fields shared by every collection dictionary.
pub(crate) struct DictParts<K> {
    pub header: Header,
    pub values: Vec<f64>,
    pub keys: Option<Vec<K>>,
    pub validated_a_period: bool,
}

/// Read the common dictionary fields; `keys` is `None` when absent.
pub(crate) fn dict_parts<K: TimeKey>(value: &Value) -> CollectionResult<DictParts<K>> {
    let field = |name: &str| {
        value
            .get(name)
            .ok_or_else(|| CollectionError::Serialization(format!("missing field {name:?}")))
    };
    let header = Header::from_dict(field("header")?)?;
    let values: Vec<f64> = serde_json::from_value(field("values")?.clone())?;
    let keys = match value.get(K::KEYS_FIELD) {
        Some(keys) => Some(serde_json::from_value::<Vec<K>>(keys.clone())?),
        None => None,
    };
    let validated_a_period =
        value.get("validated_a_period").and_then(Value::as_bool).unwrap_or(false);
    Ok(DictParts { header, values, keys, validated_a_period })
}

/// Check the dictionary's `type` tag against the expected density.
pub(crate) fn check_dict_type(value: &Value, expected: CollectionType) -> CollectionResult<()> {
    match value.get("type").and_then(Value::as_str) {
        None => Ok(()),
        Some(name) => match CollectionType::from_class_name(name) {
            Some((tag, _)) if tag == expected => Ok(()),
            _ => Err(CollectionError::Serialization(format!(
                "expected a {} dictionary, got type {name:?}",
                expected.class_name(true)
            ))),
        },
    }
}
