//! Units as SI dimension exponents plus an affine map to the coherent SI unit.
//!
//! A [`Unit`] converts a value to SI as `value_si = (value + offset) * scale`.
//! Multiplicative units have `offset == 0`; temperature scales such as
//! Celsius carry a non-zero offset. Epoch-relative time units
//! (`hours since 1970-01-01`) additionally carry their reference instant.

use chrono::NaiveDateTime;

use crate::error::UnitError;

/// SI base dimensional exponents.
///
/// Angles are tracked as their own dimension so that `degrees_north` is not
/// silently accepted where a pure number is expected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Dimensions {
    pub length: i8,
    pub mass: i8,
    pub time: i8,
    pub temperature: i8,
    pub current: i8,
    pub amount: i8,
    pub luminosity: i8,
    pub angle: i8,
}

impl Dimensions {
    pub const DIMENSIONLESS: Self = Self {
        length: 0,
        mass: 0,
        time: 0,
        temperature: 0,
        current: 0,
        amount: 0,
        luminosity: 0,
        angle: 0,
    };
    pub const METER: Self = Self {
        length: 1,
        ..Self::DIMENSIONLESS
    };
    pub const KILOGRAM: Self = Self {
        mass: 1,
        ..Self::DIMENSIONLESS
    };
    pub const SECOND: Self = Self {
        time: 1,
        ..Self::DIMENSIONLESS
    };
    pub const KELVIN: Self = Self {
        temperature: 1,
        ..Self::DIMENSIONLESS
    };
    pub const AMPERE: Self = Self {
        current: 1,
        ..Self::DIMENSIONLESS
    };
    pub const MOLE: Self = Self {
        amount: 1,
        ..Self::DIMENSIONLESS
    };
    pub const CANDELA: Self = Self {
        luminosity: 1,
        ..Self::DIMENSIONLESS
    };
    pub const RADIAN: Self = Self {
        angle: 1,
        ..Self::DIMENSIONLESS
    };

    pub fn is_dimensionless(&self) -> bool {
        *self == Self::DIMENSIONLESS
    }

    /// Raise every exponent to `power`.
    pub(crate) fn pow(self, power: i8) -> Self {
        Self {
            length: self.length.saturating_mul(power),
            mass: self.mass.saturating_mul(power),
            time: self.time.saturating_mul(power),
            temperature: self.temperature.saturating_mul(power),
            current: self.current.saturating_mul(power),
            amount: self.amount.saturating_mul(power),
            luminosity: self.luminosity.saturating_mul(power),
            angle: self.angle.saturating_mul(power),
        }
    }

    pub(crate) fn multiply(self, other: Self) -> Self {
        Self {
            length: self.length.saturating_add(other.length),
            mass: self.mass.saturating_add(other.mass),
            time: self.time.saturating_add(other.time),
            temperature: self.temperature.saturating_add(other.temperature),
            current: self.current.saturating_add(other.current),
            amount: self.amount.saturating_add(other.amount),
            luminosity: self.luminosity.saturating_add(other.luminosity),
            angle: self.angle.saturating_add(other.angle),
        }
    }
}

/// Geographic reading of an angle unit.
///
/// `degrees_north` and `degrees_east` are both degrees, but a latitude is
/// not the same unit as a longitude.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum GeoAxis {
    #[default]
    Plain,
    Latitude,
    Longitude,
}

/// How two units relate to each other.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Compatibility {
    /// Same unit: identical dimensions, scale, offset and epoch.
    Equal,
    /// Convertible, but not the same unit (`Celsius` vs `K`, `hPa` vs `Pa`).
    Equivalent,
    /// Not convertible (`m` vs `K`).
    Incompatible,
}

/// A parsed unit expression.
#[derive(Debug, Clone, PartialEq)]
pub struct Unit {
    pub(crate) dims: Dimensions,
    pub(crate) scale: f64,
    pub(crate) offset: f64,
    pub(crate) reference: Option<NaiveDateTime>,
    pub(crate) axis: GeoAxis,
}

const RELATIVE_TOLERANCE: f64 = 1e-9;

impl Unit {
    pub const DIMENSIONLESS: Unit = Unit {
        dims: Dimensions::DIMENSIONLESS,
        scale: 1.0,
        offset: 0.0,
        reference: None,
        axis: GeoAxis::Plain,
    };

    /// Parse a unit expression such as `K`, `kg m-2 s-1`, `m/s`, `hPa`,
    /// `degrees_north` or `hours since 1970-01-01 00:00:00`.
    ///
    /// # Errors
    ///
    /// Returns [`UnitError`] when the expression is empty, uses an unknown
    /// symbol, or has a malformed exponent, operator or reference time.
    pub fn parse(expr: &str) -> Result<Self, UnitError> {
        crate::parse::parse_unit(expr)
    }

    /// Whether `expr` parses as a unit.
    pub fn is_valid(expr: &str) -> bool {
        Self::parse(expr).is_ok()
    }

    pub fn dims(&self) -> &Dimensions {
        &self.dims
    }

    /// Multiplicative factor to the coherent SI unit.
    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// Additive offset applied before scaling (non-zero for °C and °F).
    pub fn offset(&self) -> f64 {
        self.offset
    }

    /// Reference epoch of a `<unit> since <date>` expression.
    pub fn reference(&self) -> Option<NaiveDateTime> {
        self.reference
    }

    /// Latitude or longitude tag of a `degrees_north` / `degrees_east` unit.
    pub fn axis(&self) -> GeoAxis {
        self.axis
    }

    pub fn is_reference_time(&self) -> bool {
        self.reference.is_some()
    }

    /// Dimensionally convertible: same dimensions, and either both or
    /// neither are epoch-relative.
    pub fn is_equivalent(&self, other: &Unit) -> bool {
        self.dims == other.dims && self.reference.is_some() == other.reference.is_some()
    }

    /// Same unit: equivalent with matching scale, offset, epoch and
    /// latitude/longitude tag.
    pub fn is_equal(&self, other: &Unit) -> bool {
        self.is_equivalent(other)
            && approx_eq(self.scale, other.scale)
            && approx_eq(self.offset, other.offset)
            && self.reference == other.reference
            && self.axis == other.axis
    }

    pub fn compare(&self, other: &Unit) -> Compatibility {
        if self.is_equal(other) {
            Compatibility::Equal
        } else if self.is_equivalent(other) {
            Compatibility::Equivalent
        } else {
            Compatibility::Incompatible
        }
    }
}

fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() <= RELATIVE_TOLERANCE * a.abs().max(b.abs())
}
