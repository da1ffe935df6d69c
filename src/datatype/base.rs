//! datatype::base — the closed registry of semantic data types.
//!
//! Purpose
//! -------
//! Define [`DataType`], the semantic tag of every collection header (dry-bulb
//! temperature, global horizontal radiation, wind speed, …). Each data type
//! belongs to a [`BaseType`] family that owns the unit system, and carries
//! per-type physical metadata: range, point-in-time / cumulative flags and
//! the companion types used by area normalization and time aggregation.
//!
//! Key behaviors
//! -------------
//! - Static lookup: every property is a `match` over the enum, with subtypes
//!   inheriting their parent's properties through struct-update syntax. No
//!   runtime discovery or registration.
//! - Unit work (`to_unit`, `to_ip`, `to_si`, `is_in_range`) validates units
//!   first and converts through the family's canonical unit.
//! - `time_rate_of_change_type` is the reverse of `time_aggregated_type`:
//!   an exact companion is preferred, then the companion of the base family.
//!
//! Invariants
//! ----------
//! - `point_in_time` and `cumulative` are never both true.
//! - `time_aggregated_type` and `time_aggregated_factor` are either both
//!   present or both absent.
//!
//! Conventions
//! -----------
//! - `class_name` is the PascalCase identifier (`"DryBulbTemperature"`);
//!   `name` splits it into words (`"Dry Bulb Temperature"`).
//! - Ranges are expressed in the family's canonical unit.
//! - Dictionary form: `{"name": ..., "data_type": ..., "type": "DataType"}`.

use crate::datatype::errors::{DataTypeError, DataTypeResult};
use crate::datatype::units::{BaseType, UnitDef, UnitSystem};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

/// DataType — closed set of semantic data types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "DataTypeRepr", into = "DataTypeRepr")]
pub enum DataType {
    Temperature,
    TemperatureDelta,
    Energy,
    EnergyIntensity,
    Power,
    EnergyFlux,
    Speed,
    Distance,
    Area,
    Illuminance,
    Fraction,
    Pressure,
    Angle,
    Volume,
    DryBulbTemperature,
    DewPointTemperature,
    WetBulbTemperature,
    SkyTemperature,
    GroundTemperature,
    AirTemperature,
    RadiantTemperature,
    OperativeTemperature,
    MeanRadiantTemperature,
    StandardEffectiveTemperature,
    UniversalThermalClimateIndex,
    PrevailingOutdoorTemperature,
    AirTemperatureDelta,
    RadiantTemperatureDelta,
    OperativeTemperatureDelta,
    Radiation,
    GlobalHorizontalRadiation,
    DirectNormalRadiation,
    DiffuseHorizontalRadiation,
    DirectHorizontalRadiation,
    ExtraterrestrialHorizontalRadiation,
    ExtraterrestrialDirectNormalRadiation,
    ActivityLevel,
    MetabolicRate,
    EffectiveRadiantField,
    Irradiance,
    GlobalHorizontalIrradiance,
    DirectNormalIrradiance,
    DiffuseHorizontalIrradiance,
    DirectHorizontalIrradiance,
    HorizontalInfraredRadiationIntensity,
    WindSpeed,
    AirSpeed,
    Visibility,
    CeilingHeight,
    PrecipitableWater,
    SnowDepth,
    LiquidPrecipitationDepth,
    GlobalHorizontalIlluminance,
    DirectNormalIlluminance,
    DiffuseHorizontalIlluminance,
    PercentagePeopleDissatisfied,
    RelativeHumidity,
    HumidityRatio,
    TotalSkyCover,
    OpaqueSkyCover,
    AerosolOpticalDepth,
    Albedo,
    LiquidPrecipitationQuantity,
    AtmosphericStationPressure,
    WindDirection,
}

/// Physical metadata of one data type.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TypeProperties {
    pub base: BaseType,
    pub abbreviation: &'static str,
    pub min: f64,
    pub max: f64,
    pub point_in_time: bool,
    pub cumulative: bool,
    pub normalized_type: Option<DataType>,
    pub time_aggregated_type: Option<DataType>,
    pub time_aggregated_factor: Option<f64>,
}

impl TypeProperties {
    const fn family(base: BaseType, abbreviation: &'static str) -> Self {
        TypeProperties {
            base,
            abbreviation,
            min: f64::NEG_INFINITY,
            max: f64::INFINITY,
            point_in_time: true,
            cumulative: false,
            normalized_type: None,
            time_aggregated_type: None,
            time_aggregated_factor: None,
        }
    }
}

impl DataType {
    /// Every registered type, base families first.
    pub const ALL: [DataType; 65] = [
        DataType::Temperature,
        DataType::TemperatureDelta,
        DataType::Energy,
        DataType::EnergyIntensity,
        DataType::Power,
        DataType::EnergyFlux,
        DataType::Speed,
        DataType::Distance,
        DataType::Area,
        DataType::Illuminance,
        DataType::Fraction,
        DataType::Pressure,
        DataType::Angle,
        DataType::Volume,
        DataType::DryBulbTemperature,
        DataType::DewPointTemperature,
        DataType::WetBulbTemperature,
        DataType::SkyTemperature,
        DataType::GroundTemperature,
        DataType::AirTemperature,
        DataType::RadiantTemperature,
        DataType::OperativeTemperature,
        DataType::MeanRadiantTemperature,
        DataType::StandardEffectiveTemperature,
        DataType::UniversalThermalClimateIndex,
        DataType::PrevailingOutdoorTemperature,
        DataType::AirTemperatureDelta,
        DataType::RadiantTemperatureDelta,
        DataType::OperativeTemperatureDelta,
        DataType::Radiation,
        DataType::GlobalHorizontalRadiation,
        DataType::DirectNormalRadiation,
        DataType::DiffuseHorizontalRadiation,
        DataType::DirectHorizontalRadiation,
        DataType::ExtraterrestrialHorizontalRadiation,
        DataType::ExtraterrestrialDirectNormalRadiation,
        DataType::ActivityLevel,
        DataType::MetabolicRate,
        DataType::EffectiveRadiantField,
        DataType::Irradiance,
        DataType::GlobalHorizontalIrradiance,
        DataType::DirectNormalIrradiance,
        DataType::DiffuseHorizontalIrradiance,
        DataType::DirectHorizontalIrradiance,
        DataType::HorizontalInfraredRadiationIntensity,
        DataType::WindSpeed,
        DataType::AirSpeed,
        DataType::Visibility,
        DataType::CeilingHeight,
        DataType::PrecipitableWater,
        DataType::SnowDepth,
        DataType::LiquidPrecipitationDepth,
        DataType::GlobalHorizontalIlluminance,
        DataType::DirectNormalIlluminance,
        DataType::DiffuseHorizontalIlluminance,
        DataType::PercentagePeopleDissatisfied,
        DataType::RelativeHumidity,
        DataType::HumidityRatio,
        DataType::TotalSkyCover,
        DataType::OpaqueSkyCover,
        DataType::AerosolOpticalDepth,
        DataType::Albedo,
        DataType::LiquidPrecipitationQuantity,
        DataType::AtmosphericStationPressure,
        DataType::WindDirection,
    ];

    /// The data type standing for a whole base family.
    pub fn from_base(base: BaseType) -> DataType {
        match base {
            BaseType::Temperature => DataType::Temperature,
            BaseType::TemperatureDelta => DataType::TemperatureDelta,
            BaseType::Energy => DataType::Energy,
            BaseType::EnergyIntensity => DataType::EnergyIntensity,
            BaseType::Power => DataType::Power,
            BaseType::EnergyFlux => DataType::EnergyFlux,
            BaseType::Speed => DataType::Speed,
            BaseType::Distance => DataType::Distance,
            BaseType::Area => DataType::Area,
            BaseType::Illuminance => DataType::Illuminance,
            BaseType::Fraction => DataType::Fraction,
            BaseType::Pressure => DataType::Pressure,
            BaseType::Angle => DataType::Angle,
            BaseType::Volume => DataType::Volume,
        }
    }

    /// Static property table.
    pub fn properties(self) -> TypeProperties {
        use BaseType as B;
        use DataType as D;
        match self {
            D::Temperature => {
                TypeProperties { min: -273.15, ..TypeProperties::family(B::Temperature, "T") }
            }
            D::TemperatureDelta => TypeProperties::family(B::TemperatureDelta, "DeltaT"),
            D::Energy => TypeProperties {
                point_in_time: false,
                cumulative: true,
                normalized_type: Some(D::EnergyIntensity),
                ..TypeProperties::family(B::Energy, "E")
            },
            D::EnergyIntensity => TypeProperties {
                point_in_time: false,
                cumulative: true,
                ..TypeProperties::family(B::EnergyIntensity, "EUI")
            },
            D::Power => TypeProperties {
                point_in_time: false,
                normalized_type: Some(D::EnergyFlux),
                time_aggregated_type: Some(D::Energy),
                time_aggregated_factor: Some(0.001),
                ..TypeProperties::family(B::Power, "Q")
            },
            D::EnergyFlux => TypeProperties {
                point_in_time: false,
                time_aggregated_type: Some(D::EnergyIntensity),
                time_aggregated_factor: Some(0.001),
                ..TypeProperties::family(B::EnergyFlux, "J")
            },
            D::Speed => TypeProperties {
                min: 0.0,
                time_aggregated_type: Some(D::Distance),
                time_aggregated_factor: Some(3600.0),
                ..TypeProperties::family(B::Speed, "v")
            },
            D::Distance => TypeProperties {
                min: 0.0,
                point_in_time: false,
                cumulative: true,
                ..TypeProperties::family(B::Distance, "D")
            },
            D::Area => TypeProperties { min: 0.0, ..TypeProperties::family(B::Area, "A") },
            D::Illuminance => TypeProperties {
                min: 0.0,
                point_in_time: false,
                ..TypeProperties::family(B::Illuminance, "Ev")
            },
            D::Fraction => TypeProperties::family(B::Fraction, "Pct"),
            D::Pressure => TypeProperties {
                point_in_time: false,
                ..TypeProperties::family(B::Pressure, "P")
            },
            D::Angle => TypeProperties::family(B::Angle, "theta"),
            D::Volume => TypeProperties { min: 0.0, ..TypeProperties::family(B::Volume, "V") },

            D::DryBulbTemperature => D::Temperature.with_abbreviation("DBT"),
            D::DewPointTemperature => D::Temperature.with_abbreviation("DPT"),
            D::WetBulbTemperature => D::Temperature.with_abbreviation("WBT"),
            D::SkyTemperature => D::Temperature.with_abbreviation("Tsky"),
            D::GroundTemperature => D::Temperature.with_abbreviation("Tground"),
            D::AirTemperature => D::Temperature.with_abbreviation("Tair"),
            D::RadiantTemperature => D::Temperature.with_abbreviation("Trad"),
            D::OperativeTemperature => D::Temperature.with_abbreviation("To"),
            D::MeanRadiantTemperature => D::Temperature.with_abbreviation("MRT"),
            D::StandardEffectiveTemperature => D::Temperature.with_abbreviation("SET"),
            D::UniversalThermalClimateIndex => D::Temperature.with_abbreviation("UTCI"),
            D::PrevailingOutdoorTemperature => D::Temperature.with_abbreviation("Tprevail"),

            D::AirTemperatureDelta => D::TemperatureDelta.with_abbreviation("DeltaTair"),
            D::RadiantTemperatureDelta => D::TemperatureDelta.with_abbreviation("DeltaTrad"),
            D::OperativeTemperatureDelta => D::TemperatureDelta.with_abbreviation("DeltaTo"),

            D::Radiation => {
                TypeProperties { min: 0.0, abbreviation: "Esolar", ..D::EnergyIntensity.properties() }
            }
            D::GlobalHorizontalRadiation => D::Radiation.with_abbreviation("GHR"),
            D::DirectNormalRadiation => D::Radiation.with_abbreviation("DNR"),
            D::DiffuseHorizontalRadiation => D::Radiation.with_abbreviation("DHR"),
            D::DirectHorizontalRadiation => D::Radiation.with_abbreviation("DR"),
            D::ExtraterrestrialHorizontalRadiation => D::Radiation.with_abbreviation("HRex"),
            D::ExtraterrestrialDirectNormalRadiation => D::Radiation.with_abbreviation("DNRex"),

            D::ActivityLevel => {
                TypeProperties { min: 0.0, abbreviation: "Activity", ..D::Power.properties() }
            }

            D::MetabolicRate => {
                TypeProperties { min: 0.0, abbreviation: "MetR", ..D::EnergyFlux.properties() }
            }
            D::EffectiveRadiantField => D::EnergyFlux.with_abbreviation("ERF"),
            D::Irradiance => TypeProperties {
                min: 0.0,
                abbreviation: "Qsolar",
                time_aggregated_type: Some(D::Radiation),
                ..D::EnergyFlux.properties()
            },
            D::GlobalHorizontalIrradiance => {
                D::Irradiance.aggregating_to("GHIr", D::GlobalHorizontalRadiation)
            }
            D::DirectNormalIrradiance => D::Irradiance.aggregating_to("DNIr", D::DirectNormalRadiation),
            D::DiffuseHorizontalIrradiance => {
                D::Irradiance.aggregating_to("DHIr", D::DiffuseHorizontalRadiation)
            }
            D::DirectHorizontalIrradiance => {
                D::Irradiance.aggregating_to("DHIr", D::DirectHorizontalRadiation)
            }
            D::HorizontalInfraredRadiationIntensity => TypeProperties {
                abbreviation: "HIr",
                point_in_time: true,
                ..D::Irradiance.properties()
            },

            D::WindSpeed => D::Speed.with_abbreviation("WS"),
            D::AirSpeed => D::Speed.with_abbreviation("vair"),

            D::Visibility => D::Distance.with_abbreviation("Vis"),
            D::CeilingHeight => D::Distance.with_abbreviation("Hciel"),
            D::PrecipitableWater => D::Distance.with_abbreviation("PW"),
            D::SnowDepth => D::Distance.with_abbreviation("Dsnow"),
            D::LiquidPrecipitationDepth => D::Distance.with_abbreviation("LPD"),

            D::GlobalHorizontalIlluminance => D::Illuminance.with_abbreviation("GHI"),
            D::DirectNormalIlluminance => D::Illuminance.with_abbreviation("DNI"),
            D::DiffuseHorizontalIlluminance => D::Illuminance.with_abbreviation("DHI"),

            D::PercentagePeopleDissatisfied => D::Fraction.bounded("PPD", 0.0, 1.0),
            D::RelativeHumidity => D::Fraction.bounded("RH", 0.0, f64::INFINITY),
            D::HumidityRatio => D::Fraction.bounded("HR", 0.0, 1.0),
            D::TotalSkyCover => D::Fraction.bounded("CC", 0.0, 1.0),
            D::OpaqueSkyCover => D::Fraction.bounded("OSC", 0.0, 1.0),
            D::AerosolOpticalDepth => D::Fraction.bounded("AOD", 0.0, 1.0),
            D::Albedo => D::Fraction.bounded("a", 0.0, 1.0),
            D::LiquidPrecipitationQuantity => D::Fraction.bounded("LPQ", 0.0, f64::INFINITY),

            D::AtmosphericStationPressure => {
                TypeProperties { min: 0.0, abbreviation: "Patm", ..D::Pressure.properties() }
            }

            D::WindDirection => D::Angle.with_abbreviation("WD"),
        }
    }

    fn with_abbreviation(self, abbreviation: &'static str) -> TypeProperties {
        TypeProperties { abbreviation, ..self.properties() }
    }

    fn bounded(self, abbreviation: &'static str, min: f64, max: f64) -> TypeProperties {
        TypeProperties { abbreviation, min, max, ..self.properties() }
    }

    fn aggregating_to(self, abbreviation: &'static str, target: DataType) -> TypeProperties {
        TypeProperties { abbreviation, time_aggregated_type: Some(target), ..self.properties() }
    }

    /// PascalCase identifier, e.g. `"DryBulbTemperature"`.
    pub fn class_name(self) -> &'static str {
        use DataType as D;
        match self {
            D::Temperature => "Temperature",
            D::TemperatureDelta => "TemperatureDelta",
            D::Energy => "Energy",
            D::EnergyIntensity => "EnergyIntensity",
            D::Power => "Power",
            D::EnergyFlux => "EnergyFlux",
            D::Speed => "Speed",
            D::Distance => "Distance",
            D::Area => "Area",
            D::Illuminance => "Illuminance",
            D::Fraction => "Fraction",
            D::Pressure => "Pressure",
            D::Angle => "Angle",
            D::Volume => "Volume",
            D::DryBulbTemperature => "DryBulbTemperature",
            D::DewPointTemperature => "DewPointTemperature",
            D::WetBulbTemperature => "WetBulbTemperature",
            D::SkyTemperature => "SkyTemperature",
            D::GroundTemperature => "GroundTemperature",
            D::AirTemperature => "AirTemperature",
            D::RadiantTemperature => "RadiantTemperature",
            D::OperativeTemperature => "OperativeTemperature",
            D::MeanRadiantTemperature => "MeanRadiantTemperature",
            D::StandardEffectiveTemperature => "StandardEffectiveTemperature",
            D::UniversalThermalClimateIndex => "UniversalThermalClimateIndex",
            D::PrevailingOutdoorTemperature => "PrevailingOutdoorTemperature",
            D::AirTemperatureDelta => "AirTemperatureDelta",
            D::RadiantTemperatureDelta => "RadiantTemperatureDelta",
            D::OperativeTemperatureDelta => "OperativeTemperatureDelta",
            D::Radiation => "Radiation",
            D::GlobalHorizontalRadiation => "GlobalHorizontalRadiation",
            D::DirectNormalRadiation => "DirectNormalRadiation",
            D::DiffuseHorizontalRadiation => "DiffuseHorizontalRadiation",
            D::DirectHorizontalRadiation => "DirectHorizontalRadiation",
            D::ExtraterrestrialHorizontalRadiation => "ExtraterrestrialHorizontalRadiation",
            D::ExtraterrestrialDirectNormalRadiation => "ExtraterrestrialDirectNormalRadiation",
            D::ActivityLevel => "ActivityLevel",
            D::MetabolicRate => "MetabolicRate",
            D::EffectiveRadiantField => "EffectiveRadiantField",
            D::Irradiance => "Irradiance",
            D::GlobalHorizontalIrradiance => "GlobalHorizontalIrradiance",
            D::DirectNormalIrradiance => "DirectNormalIrradiance",
            D::DiffuseHorizontalIrradiance => "DiffuseHorizontalIrradiance",
            D::DirectHorizontalIrradiance => "DirectHorizontalIrradiance",
            D::HorizontalInfraredRadiationIntensity => "HorizontalInfraredRadiationIntensity",
            D::WindSpeed => "WindSpeed",
            D::AirSpeed => "AirSpeed",
            D::Visibility => "Visibility",
            D::CeilingHeight => "CeilingHeight",
            D::PrecipitableWater => "PrecipitableWater",
            D::SnowDepth => "SnowDepth",
            D::LiquidPrecipitationDepth => "LiquidPrecipitationDepth",
            D::GlobalHorizontalIlluminance => "GlobalHorizontalIlluminance",
            D::DirectNormalIlluminance => "DirectNormalIlluminance",
            D::DiffuseHorizontalIlluminance => "DiffuseHorizontalIlluminance",
            D::PercentagePeopleDissatisfied => "PercentagePeopleDissatisfied",
            D::RelativeHumidity => "RelativeHumidity",
            D::HumidityRatio => "HumidityRatio",
            D::TotalSkyCover => "TotalSkyCover",
            D::OpaqueSkyCover => "OpaqueSkyCover",
            D::AerosolOpticalDepth => "AerosolOpticalDepth",
            D::Albedo => "Albedo",
            D::LiquidPrecipitationQuantity => "LiquidPrecipitationQuantity",
            D::AtmosphericStationPressure => "AtmosphericStationPressure",
            D::WindDirection => "WindDirection",
        }
    }

    /// Human-readable name, e.g. `"Dry Bulb Temperature"`.
    pub fn name(self) -> String {
        let mut out = String::new();
        for (i, ch) in self.class_name().chars().enumerate() {
            if i > 0 && ch.is_ascii_uppercase() {
                out.push(' ');
            }
            out.push(ch);
        }
        out
    }

    /// Look up a type by class name (`"DryBulbTemperature"`) or by name
    /// (`"Dry Bulb Temperature"`).
    pub fn from_name(name: &str) -> DataTypeResult<DataType> {
        let compact: String = name.split_whitespace().collect();
        DataType::ALL
            .into_iter()
            .find(|dt| dt.class_name() == compact)
            .ok_or_else(|| DataTypeError::UnknownType(name.to_string()))
    }

    pub fn base_type(self) -> BaseType {
        self.properties().base
    }

    pub fn unit_system(self) -> &'static UnitSystem {
        self.base_type().unit_system()
    }

    /// Accepted units, canonical unit first.
    pub fn units(self) -> Vec<&'static str> {
        self.unit_system().unit_names()
    }

    pub fn si_units(self) -> &'static [&'static str] {
        self.unit_system().si_units
    }

    pub fn ip_units(self) -> &'static [&'static str] {
        self.unit_system().ip_units
    }

    pub fn abbreviation(self) -> &'static str {
        self.properties().abbreviation
    }

    /// Lower physical limit, in the canonical unit.
    pub fn min(self) -> f64 {
        self.properties().min
    }

    /// Upper physical limit, in the canonical unit.
    pub fn max(self) -> f64 {
        self.properties().max
    }

    pub fn point_in_time(self) -> bool {
        self.properties().point_in_time
    }

    pub fn cumulative(self) -> bool {
        self.properties().cumulative
    }

    /// Area-normalized companion type, if any.
    pub fn normalized_type(self) -> Option<DataType> {
        self.properties().normalized_type
    }

    /// Companion type obtained by integrating over one hour, if any.
    pub fn time_aggregated_type(self) -> Option<DataType> {
        self.properties().time_aggregated_type
    }

    /// Factor from this type's canonical unit to the aggregated type's
    /// canonical unit, for one hour of data.
    pub fn time_aggregated_factor(self) -> Option<f64> {
        self.properties().time_aggregated_factor
    }

    /// Type whose time aggregation yields this type.
    pub fn time_rate_of_change_type(self) -> Option<DataType> {
        let exact = DataType::ALL.into_iter().find(|dt| dt.time_aggregated_type() == Some(self));
        exact.or_else(|| {
            let family = DataType::from_base(self.base_type());
            DataType::ALL.into_iter().find(|dt| dt.time_aggregated_type() == Some(family))
        })
    }

    pub fn is_unit_acceptable(self, unit: &str) -> bool {
        self.unit_system().find(unit).is_some()
    }

    /// Ok when `unit` belongs to the type's unit system.
    pub fn check_unit(self, unit: &str) -> DataTypeResult<()> {
        self.unit_def(unit).map(|_| ())
    }

    fn unit_def(self, unit: &str) -> DataTypeResult<&'static UnitDef> {
        self.unit_system().find(unit).ok_or_else(|| DataTypeError::UnacceptableUnit {
            unit: unit.to_string(),
            data_type: self.class_name().to_string(),
            accepted: self.units().into_iter().map(String::from).collect(),
        })
    }

    /// Convert `values` from `from_unit` to `unit`.
    ///
    /// Errors
    /// ------
    /// - [`DataTypeError::UnacceptableUnit`] when either unit is foreign to
    ///   the type; no values are produced in that case.
    pub fn to_unit(self, values: &[f64], unit: &str, from_unit: &str) -> DataTypeResult<Vec<f64>> {
        let from = self.unit_def(from_unit)?;
        let to = self.unit_def(unit)?;
        if from.name == to.name {
            return Ok(values.to_vec());
        }
        Ok(values.iter().map(|&v| to.from_base(from.to_base(v))).collect())
    }

    /// Convert to the matching IP unit, returning the values and the unit.
    pub fn to_ip(self, values: &[f64], from_unit: &str) -> DataTypeResult<(Vec<f64>, &'static str)> {
        self.check_unit(from_unit)?;
        let target = self.unit_system().ip_target(from_unit);
        Ok((self.to_unit(values, target, from_unit)?, target))
    }

    /// Convert to the matching SI unit, returning the values and the unit.
    pub fn to_si(self, values: &[f64], from_unit: &str) -> DataTypeResult<(Vec<f64>, &'static str)> {
        self.check_unit(from_unit)?;
        let target = self.unit_system().si_target(from_unit);
        Ok((self.to_unit(values, target, from_unit)?, target))
    }

    /// Whether every value lies within the physical range.
    ///
    /// Parameters
    /// ----------
    /// - `unit`: unit of `values`; `None` means the canonical unit.
    /// - `raise`: when true, the first offending value is reported as
    ///   [`DataTypeError::OutOfRange`] instead of returning `Ok(false)`.
    pub fn is_in_range(self, values: &[f64], unit: Option<&str>, raise: bool) -> DataTypeResult<bool> {
        let (min, max) = match unit {
            None => (self.min(), self.max()),
            Some(u) => {
                let def = self.unit_def(u)?;
                (def.from_base(self.min()), def.from_base(self.max()))
            }
        };
        match values.iter().find(|&&v| v < min || v > max) {
            None => Ok(true),
            Some(&value) if raise => Err(DataTypeError::OutOfRange {
                data_type: self.class_name().to_string(),
                min,
                max,
                value,
            }),
            Some(_) => Ok(false),
        }
    }

    /// Dictionary form `{name, data_type, type}`.
    pub fn to_dict(self) -> Value {
        json!({ "name": self.name(), "data_type": self.class_name(), "type": "DataType" })
    }

    /// Rebuild from the dictionary form; the `data_type` key decides.
    pub fn from_dict(value: &Value) -> DataTypeResult<DataType> {
        let class_name = value
            .get("data_type")
            .and_then(Value::as_str)
            .ok_or_else(|| DataTypeError::UnknownType(value.to_string()))?;
        DataType::from_name(class_name)
    }
}

impl std::fmt::Display for DataType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.name())
    }
}

impl std::str::FromStr for DataType {
    type Err = DataTypeError;

    fn from_str(s: &str) -> DataTypeResult<Self> {
        DataType::from_name(s)
    }
}

#[derive(Serialize, Deserialize)]
struct DataTypeRepr {
    name: String,
    data_type: String,
    #[serde(rename = "type", default = "data_type_tag")]
    kind: String,
}

fn data_type_tag() -> String {
    "DataType".to_string()
}

impl From<DataType> for DataTypeRepr {
    fn from(dt: DataType) -> Self {
        DataTypeRepr { name: dt.name(), data_type: dt.class_name().to_string(), kind: data_type_tag() }
    }
}

impl TryFrom<DataTypeRepr> for DataType {
    type Error = DataTypeError;

    fn try_from(repr: DataTypeRepr) -> DataTypeResult<Self> {
        DataType::from_name(&repr.data_type)
    }
}
