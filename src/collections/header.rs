//! collections::header — the semantic label of a data collection.
//!
//! Purpose
//! -------
//! Bind a [`DataType`], a unit, an [`AnalysisPeriod`] and free-form metadata
//! into the [`Header`] every collection carries. The header is the only
//! place a collection's unit lives, so the unit check happens here once for
//! construction, unit changes and deserialization alike.
//!
//! Invariants & assumptions
//! ------------------------
//! - `data_type.is_unit_acceptable(unit)` holds for every constructed header
//!   and after every setter.
//! - A header is owned by exactly one collection. Transforms that change
//!   the unit or the period work on a [`Header::duplicate`] and never on a
//!   shared instance.
//!
//! Conventions
//! -----------
//! - Metadata is an ordered `BTreeMap<String, String>` so dictionary output
//!   is deterministic.
//! - Dictionary form:
//!   `{"type": "Header", "data_type": {...}, "unit": "C",
//!     "analysis_period": {...}, "metadata": {...}}`.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::calendar::AnalysisPeriod;
use crate::collections::errors::{CollectionError, CollectionResult};
use crate::datatype::DataType;

/// Header — data type, unit, analysis period and metadata of a collection.
///
/// Fields
/// ------
/// - `data_type`: semantic type of the values.
/// - `unit`: unit of the values; always acceptable for `data_type`.
/// - `analysis_period`: calendar window the values belong to.
/// - `metadata`: free-form string pairs (source, city, zone, aggregation
///   tags such as `"statistical operation"`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "HeaderRepr", into = "HeaderRepr")]
pub struct Header {
    data_type: DataType,
    unit: String,
    analysis_period: AnalysisPeriod,
    metadata: BTreeMap<String, String>,
}

impl Header {
    /// Build a header after checking the unit against the data type.
    ///
    /// Errors
    /// ------
    /// - `CollectionError::DataType(UnacceptableUnit)` when `unit` is not
    ///   declared by `data_type`.
    pub fn new(
        data_type: DataType, unit: impl Into<String>, analysis_period: AnalysisPeriod,
        metadata: BTreeMap<String, String>,
    ) -> CollectionResult<Self> {
        let unit = unit.into();
        data_type.check_unit(&unit)?;
        Ok(Header { data_type, unit, analysis_period, metadata })
    }

    /// Header in the data type's canonical unit with no metadata.
    pub fn with_base_unit(data_type: DataType, analysis_period: AnalysisPeriod) -> Self {
        Header {
            data_type,
            unit: data_type.unit_system().base_unit().to_string(),
            analysis_period,
            metadata: BTreeMap::new(),
        }
    }

    pub fn data_type(&self) -> DataType {
        self.data_type
    }

    pub fn unit(&self) -> &str {
        &self.unit
    }

    pub fn analysis_period(&self) -> &AnalysisPeriod {
        &self.analysis_period
    }

    pub fn metadata(&self) -> &BTreeMap<String, String> {
        &self.metadata
    }

    pub fn metadata_mut(&mut self) -> &mut BTreeMap<String, String> {
        &mut self.metadata
    }

    /// Replace the unit, keeping the data type.
    pub fn set_unit(&mut self, unit: impl Into<String>) -> CollectionResult<()> {
        let unit = unit.into();
        self.data_type.check_unit(&unit)?;
        self.unit = unit;
        Ok(())
    }

    /// Replace data type and unit together; nothing changes on failure.
    pub fn set_data_type_and_unit(
        &mut self, data_type: DataType, unit: impl Into<String>,
    ) -> CollectionResult<()> {
        let unit = unit.into();
        data_type.check_unit(&unit)?;
        self.data_type = data_type;
        self.unit = unit;
        Ok(())
    }

    pub(crate) fn set_analysis_period(&mut self, analysis_period: AnalysisPeriod) {
        self.analysis_period = analysis_period;
    }

    /// Independent deep copy.
    pub fn duplicate(&self) -> Header {
        self.clone()
    }

    /// Duplicate carrying another data type and unit.
    pub(crate) fn with_data_type_and_unit(
        &self, data_type: DataType, unit: &str,
    ) -> CollectionResult<Header> {
        let mut header = self.duplicate();
        header.set_data_type_and_unit(data_type, unit)?;
        Ok(header)
    }

    /// Dictionary form `{"type": "Header", data_type, unit,
    /// analysis_period, metadata}`.
    pub fn to_dict(&self) -> CollectionResult<Value> {
        Ok(serde_json::to_value(HeaderRepr::from(self.clone()))?)
    }

    /// Rebuild from the dictionary form, re-validating the unit.
    pub fn from_dict(value: &Value) -> CollectionResult<Header> {
        let repr: HeaderRepr = serde_json::from_value(value.clone())?;
        Header::try_from(repr)
    }
}

impl std::fmt::Display for Header {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})\n{}", self.data_type, self.unit, self.analysis_period)
    }
}

#[derive(Serialize, Deserialize)]
struct HeaderRepr {
    #[serde(rename = "type", default = "header_tag")]
    kind: String,
    data_type: DataType,
    unit: String,
    #[serde(default)]
    analysis_period: AnalysisPeriod,
    #[serde(default)]
    metadata: BTreeMap<String, String>,
}

fn header_tag() -> String {
    "Header".to_string()
}

impl From<Header> for HeaderRepr {
    fn from(h: Header) -> Self {
        HeaderRepr {
            kind: header_tag(),
            data_type: h.data_type,
            unit: h.unit,
            analysis_period: h.analysis_period,
            metadata: h.metadata,
        }
    }
}

impl TryFrom<HeaderRepr> for Header {
    type Error = CollectionError;

    fn try_from(repr: HeaderRepr) -> CollectionResult<Self> {
        Header::new(repr.data_type, repr.unit, repr.analysis_period, repr.metadata)
    }
}
