//! datatype::units — unit systems of the base data-type families.
//!
//! Purpose
//! -------
//! Hold one static [`UnitSystem`] per [`BaseType`]: its ordered unit list
//! (canonical unit first), the SI and IP subsets, the affine conversion of
//! every unit from the canonical unit, and the pairing rules used when
//! switching a series between SI and IP.
//!
//! Key behaviors
//! -------------
//! - `value_in_unit = value_in_canonical * scale + offset`; the inverse is
//!   used to go back to the canonical unit. Only temperatures carry an
//!   offset.
//! - `to_ip` / `to_si` keep values that are already in the target system
//!   (or in a system-neutral unit such as `met`), map specific units to their
//!   counterparts (`Wh` → `Btu`, `km` → `mi`, …) and fall back to a default
//!   target unit otherwise.
//!
//! Conventions
//! -----------
//! - Unit strings are matched exactly (`"W/m2"`, `"Btu/h-ft2"`, `"fl oz"`).

/// Base families on which unit systems are defined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum BaseType {
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
}

/// One unit of a system, as an affine map from the canonical unit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UnitDef {
    pub name: &'static str,
    pub scale: f64,
    pub offset: f64,
}

const fn unit(name: &'static str, scale: f64) -> UnitDef {
    UnitDef { name, scale, offset: 0.0 }
}

const fn affine(name: &'static str, scale: f64, offset: f64) -> UnitDef {
    UnitDef { name, scale, offset }
}

/// UnitSystem — units and SI/IP pairing rules of one base family.
#[derive(Debug)]
pub struct UnitSystem {
    pub units: &'static [UnitDef],
    pub si_units: &'static [&'static str],
    pub ip_units: &'static [&'static str],
    neutral_units: &'static [&'static str],
    ip_pairs: &'static [(&'static str, &'static str)],
    ip_default: &'static str,
    si_pairs: &'static [(&'static str, &'static str)],
    si_default: &'static str,
}

impl UnitSystem {
    /// The canonical (first) unit.
    pub fn base_unit(&self) -> &'static str {
        self.units[0].name
    }

    pub fn unit_names(&self) -> Vec<&'static str> {
        self.units.iter().map(|u| u.name).collect()
    }

    pub fn find(&self, name: &str) -> Option<&UnitDef> {
        self.units.iter().find(|u| u.name == name)
    }

    /// Target unit for an IP conversion of values currently in `from_unit`.
    pub fn ip_target(&self, from_unit: &str) -> &'static str {
        Self::target(from_unit, self.ip_units, self.neutral_units, self.ip_pairs, self.ip_default)
    }

    /// Target unit for an SI conversion of values currently in `from_unit`.
    pub fn si_target(&self, from_unit: &str) -> &'static str {
        Self::target(from_unit, self.si_units, self.neutral_units, self.si_pairs, self.si_default)
    }

    fn target(
        from_unit: &str, keep: &'static [&'static str], neutral: &'static [&'static str],
        pairs: &'static [(&'static str, &'static str)], default: &'static str,
    ) -> &'static str {
        if let Some(kept) = keep.iter().chain(neutral).find(|u| **u == from_unit) {
            return *kept;
        }
        pairs.iter().find(|(from, _)| *from == from_unit).map_or(default, |(_, to)| *to)
    }
}

impl UnitDef {
    pub fn from_base(&self, value: f64) -> f64 {
        value * self.scale + self.offset
    }

    pub fn to_base(&self, value: f64) -> f64 {
        (value - self.offset) / self.scale
    }
}

impl BaseType {
    pub fn unit_system(self) -> &'static UnitSystem {
        match self {
            BaseType::Temperature => &TEMPERATURE,
            BaseType::TemperatureDelta => &TEMPERATURE_DELTA,
            BaseType::Energy => &ENERGY,
            BaseType::EnergyIntensity => &ENERGY_INTENSITY,
            BaseType::Power => &POWER,
            BaseType::EnergyFlux => &ENERGY_FLUX,
            BaseType::Speed => &SPEED,
            BaseType::Distance => &DISTANCE,
            BaseType::Area => &AREA,
            BaseType::Illuminance => &ILLUMINANCE,
            BaseType::Fraction => &FRACTION,
            BaseType::Pressure => &PRESSURE,
            BaseType::Angle => &ANGLE,
            BaseType::Volume => &VOLUME,
        }
    }
}

static TEMPERATURE: UnitSystem = UnitSystem {
    units: &[unit("C", 1.0), affine("F", 9.0 / 5.0, 32.0), affine("K", 1.0, 273.15)],
    si_units: &["C", "K"],
    ip_units: &["F"],
    neutral_units: &[],
    ip_pairs: &[],
    ip_default: "F",
    si_pairs: &[],
    si_default: "C",
};

static TEMPERATURE_DELTA: UnitSystem = UnitSystem {
    units: &[unit("C", 1.0), unit("F", 9.0 / 5.0), unit("K", 1.0)],
    si_units: &["C", "K"],
    ip_units: &["F"],
    neutral_units: &[],
    ip_pairs: &[],
    ip_default: "F",
    si_pairs: &[],
    si_default: "C",
};

static ENERGY: UnitSystem = UnitSystem {
    units: &[
        unit("kWh", 1.0),
        unit("kBtu", 3.41214),
        unit("Wh", 1000.0),
        unit("Btu", 3412.14),
        unit("MMBtu", 0.00341214),
        unit("J", 3_600_000.0),
        unit("kJ", 3600.0),
        unit("MJ", 3.6),
        unit("GJ", 0.0036),
        unit("therm", 0.0341214),
        unit("cal", 860_421.0),
        unit("kcal", 860.421),
    ],
    si_units: &["kWh", "Wh", "J", "kJ", "MJ", "GJ"],
    ip_units: &["kBtu", "Btu", "MMBtu", "therm"],
    neutral_units: &[],
    ip_pairs: &[("Wh", "Btu")],
    ip_default: "kBtu",
    si_pairs: &[("Btu", "Wh")],
    si_default: "kWh",
};

static ENERGY_INTENSITY: UnitSystem = UnitSystem {
    units: &[
        unit("kWh/m2", 1.0),
        unit("kBtu/ft2", 0.316998),
        unit("Wh/m2", 1000.0),
        unit("Btu/ft2", 316.998),
    ],
    si_units: &["kWh/m2", "Wh/m2"],
    ip_units: &["kBtu/ft2", "Btu/ft2"],
    neutral_units: &[],
    ip_pairs: &[("Wh/m2", "Btu/ft2")],
    ip_default: "kBtu/ft2",
    si_pairs: &[("Btu/ft2", "Wh/m2")],
    si_default: "kWh/m2",
};

static POWER: UnitSystem = UnitSystem {
    units: &[
        unit("W", 1.0),
        unit("Btu/h", 3.41214),
        unit("kW", 0.001),
        unit("kBtu/h", 0.00341214),
        unit("TR", 1.0 / 3516.85),
        unit("hp", 1.0 / 745.7),
    ],
    si_units: &["kW", "W"],
    ip_units: &["Btu/h", "kBtu/h", "TR", "hp"],
    neutral_units: &[],
    ip_pairs: &[("kW", "kBtu/h")],
    ip_default: "Btu/h",
    si_pairs: &[("kBtu/h", "kW")],
    si_default: "W",
};

static ENERGY_FLUX: UnitSystem = UnitSystem {
    units: &[
        unit("W/m2", 1.0),
        unit("Btu/h-ft2", 1.0 / 3.15459075),
        unit("kW/m2", 0.001),
        unit("kBtu/h-ft2", 1.0 / 3154.59075),
        unit("W/ft2", 1.0 / 10.7639),
        unit("met", 1.0 / 58.2),
    ],
    si_units: &["W/m2", "kW/m2"],
    ip_units: &["Btu/h-ft2", "kBtu/h-ft2"],
    neutral_units: &["met"],
    ip_pairs: &[("kW/m2", "kBtu/h-ft2")],
    ip_default: "Btu/h-ft2",
    si_pairs: &[("kBtu/h-ft2", "kW/m2")],
    si_default: "W/m2",
};

static SPEED: UnitSystem = UnitSystem {
    units: &[
        unit("m/s", 1.0),
        unit("mph", 2.23694),
        unit("km/h", 3.6),
        unit("knot", 1.94384),
        unit("ft/s", 3.28084),
    ],
    si_units: &["m/s", "km/h"],
    ip_units: &["mph", "ft/s"],
    neutral_units: &[],
    ip_pairs: &[],
    ip_default: "mph",
    si_pairs: &[],
    si_default: "m/s",
};

static DISTANCE: UnitSystem = UnitSystem {
    units: &[
        unit("m", 1.0),
        unit("ft", 3.28084),
        unit("mm", 1000.0),
        unit("in", 39.3701),
        unit("km", 0.001),
        unit("mi", 1.0 / 1609.344),
        unit("cm", 100.0),
    ],
    si_units: &["m", "mm", "km", "cm"],
    ip_units: &["ft", "in", "mi"],
    neutral_units: &[],
    ip_pairs: &[("mm", "in"), ("km", "mi")],
    ip_default: "ft",
    si_pairs: &[("in", "mm"), ("mi", "km")],
    si_default: "m",
};

static AREA: UnitSystem = UnitSystem {
    units: &[
        unit("m2", 1.0),
        unit("ft2", 10.7639),
        unit("mm2", 1_000_000.0),
        unit("in2", 1550.0),
        unit("km2", 1e-6),
        unit("mi2", 1.0 / 2_590_000.0),
        unit("cm2", 10_000.0),
        unit("ha", 1e-4),
        unit("acre", 1.0 / 4046.86),
    ],
    si_units: &["m2", "mm2", "km2", "cm2", "ha"],
    ip_units: &["ft2", "in2", "mi2", "acre"],
    neutral_units: &[],
    ip_pairs: &[("mm2", "in2"), ("cm2", "in2"), ("km2", "mi2"), ("ha", "acre")],
    ip_default: "ft2",
    si_pairs: &[("in2", "mm2"), ("mi2", "km2"), ("acre", "ha")],
    si_default: "m2",
};

static ILLUMINANCE: UnitSystem = UnitSystem {
    units: &[unit("lux", 1.0), unit("fc", 1.0 / 10.7639)],
    si_units: &["lux"],
    ip_units: &["fc"],
    neutral_units: &[],
    ip_pairs: &[],
    ip_default: "fc",
    si_pairs: &[],
    si_default: "lux",
};

static FRACTION: UnitSystem = UnitSystem {
    units: &[
        unit("fraction", 1.0),
        unit("%", 100.0),
        unit("tenths", 10.0),
        unit("thousandths", 1000.0),
        unit("okta", 12.5),
    ],
    si_units: &["fraction", "%", "tenths", "thousandths", "okta"],
    ip_units: &["fraction", "%", "tenths", "thousandths", "okta"],
    neutral_units: &[],
    ip_pairs: &[],
    ip_default: "fraction",
    si_pairs: &[],
    si_default: "fraction",
};

static PRESSURE: UnitSystem = UnitSystem {
    units: &[
        unit("Pa", 1.0),
        unit("inHg", 0.0002953),
        unit("atm", 1.0 / 101_325.0),
        unit("bar", 1e-5),
        unit("Torr", 0.00750062),
        unit("psi", 0.000145038),
        unit("inH2O", 0.00401865),
    ],
    si_units: &["Pa", "bar"],
    ip_units: &["inHg", "psi", "inH2O"],
    neutral_units: &[],
    ip_pairs: &[],
    ip_default: "inHg",
    si_pairs: &[],
    si_default: "Pa",
};

static ANGLE: UnitSystem = UnitSystem {
    units: &[unit("degrees", 1.0), unit("radians", std::f64::consts::PI / 180.0)],
    si_units: &["degrees", "radians"],
    ip_units: &["degrees", "radians"],
    neutral_units: &[],
    ip_pairs: &[],
    ip_default: "degrees",
    si_pairs: &[],
    si_default: "degrees",
};

static VOLUME: UnitSystem = UnitSystem {
    units: &[
        unit("m3", 1.0),
        unit("ft3", 35.3147),
        unit("mm3", 1e9),
        unit("in3", 61023.7),
        unit("km3", 1e-9),
        unit("mi3", 1.0 / 4.168e9),
        unit("L", 1000.0),
        unit("mL", 1_000_000.0),
        unit("gal", 264.172),
        unit("fl oz", 33814.0),
    ],
    si_units: &["m3", "mm3", "km3", "L", "mL"],
    ip_units: &["ft3", "in3", "mi3", "gal", "fl oz"],
    neutral_units: &[],
    ip_pairs: &[("mL", "fl oz"), ("mm3", "fl oz"), ("km3", "mi3"), ("L", "gal")],
    ip_default: "ft3",
    si_pairs: &[("in3", "mL"), ("fl oz", "mL"), ("mi3", "km3"), ("gal", "L")],
    si_default: "m3",
};
