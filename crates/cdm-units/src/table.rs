//! Known unit symbols and SI prefixes.

use crate::unit::{Dimensions, GeoAxis};

/// A named unit: `value_si = (value + offset) * scale`.
#[derive(Debug, Clone, Copy)]
pub(crate) struct NamedUnit {
    pub dims: Dimensions,
    pub scale: f64,
    pub offset: f64,
    /// Whether SI prefixes may be attached (`hPa`, `mm`, `kg`).
    pub prefixable: bool,
    pub axis: GeoAxis,
}

const fn unit(dims: Dimensions, scale: f64) -> NamedUnit {
    NamedUnit {
        dims,
        scale,
        offset: 0.0,
        prefixable: false,
        axis: GeoAxis::Plain,
    }
}

const fn prefixable(dims: Dimensions, scale: f64) -> NamedUnit {
    NamedUnit {
        dims,
        scale,
        offset: 0.0,
        prefixable: true,
        axis: GeoAxis::Plain,
    }
}

const fn affine(scale: f64, offset: f64) -> NamedUnit {
    NamedUnit {
        dims: Dimensions::KELVIN,
        scale,
        offset,
        prefixable: false,
        axis: GeoAxis::Plain,
    }
}

const fn geographic(axis: GeoAxis) -> NamedUnit {
    NamedUnit {
        dims: Dimensions::RADIAN,
        scale: DEGREE,
        offset: 0.0,
        prefixable: false,
        axis,
    }
}

const fn dims(length: i8, mass: i8, time: i8, current: i8) -> Dimensions {
    Dimensions {
        length,
        mass,
        time,
        temperature: 0,
        current,
        amount: 0,
        luminosity: 0,
        angle: 0,
    }
}

const DEGREE: f64 = std::f64::consts::PI / 180.0;
const PASCAL: Dimensions = dims(-1, 1, -2, 0);

/// Look up a unit symbol exactly as written.
pub(crate) fn lookup(symbol: &str) -> Option<NamedUnit> {
    let named = match symbol {
        "m" | "metre" | "meter" | "metres" | "meters" => prefixable(Dimensions::METER, 1.0),
        "g" | "gram" | "grams" => prefixable(Dimensions::KILOGRAM, 1e-3),
        "s" | "sec" | "second" | "seconds" => prefixable(Dimensions::SECOND, 1.0),
        "min" | "minute" | "minutes" => unit(Dimensions::SECOND, 60.0),
        "h" | "hr" | "hour" | "hours" => unit(Dimensions::SECOND, 3_600.0),
        "d" | "day" | "days" => unit(Dimensions::SECOND, 86_400.0),
        "yr" | "year" | "years" => unit(Dimensions::SECOND, 31_556_925.974_7),
        "K" | "kelvin" | "degK" | "deg_K" | "degree_K" | "degrees_K" => {
            prefixable(Dimensions::KELVIN, 1.0)
        }
        "degC" | "deg_C" | "celsius" | "Celsius" | "degree_C" | "degrees_C"
        | "degree_Celsius" | "degrees_Celsius" | "°C" | "℃" => affine(1.0, 273.15),
        "degF" | "deg_F" | "fahrenheit" | "Fahrenheit" | "degree_F" | "degrees_F" | "°F"
        | "℉" => {
            affine(5.0 / 9.0, 459.67)
        }
        "A" | "ampere" => prefixable(Dimensions::AMPERE, 1.0),
        "mol" | "mole" => prefixable(Dimensions::MOLE, 1.0),
        "cd" | "candela" => prefixable(Dimensions::CANDELA, 1.0),
        "rad" | "radian" | "radians" => prefixable(Dimensions::RADIAN, 1.0),
        "sr" | "steradian" => unit(
            Dimensions {
                angle: 2,
                ..Dimensions::DIMENSIONLESS
            },
            1.0,
        ),
        "degree" | "degrees" | "deg" | "arc_degree" | "°" => unit(Dimensions::RADIAN, DEGREE),
        "degree_north" | "degrees_north" | "degree_N" | "degrees_N" | "degreeN" | "degreesN" => {
            geographic(GeoAxis::Latitude)
        }
        "degree_east" | "degrees_east" | "degree_E" | "degrees_E" | "degreeE" | "degreesE" => {
            geographic(GeoAxis::Longitude)
        }
        "Pa" | "pascal" => prefixable(PASCAL, 1.0),
        "bar" => prefixable(PASCAL, 1e5),
        "atm" => unit(PASCAL, 101_325.0),
        "N" | "newton" => prefixable(dims(1, 1, -2, 0), 1.0),
        "J" | "joule" => prefixable(dims(2, 1, -2, 0), 1.0),
        "W" | "watt" => prefixable(dims(2, 1, -3, 0), 1.0),
        "Hz" | "hertz" => prefixable(dims(0, 0, -1, 0), 1.0),
        "C" | "coulomb" => prefixable(dims(0, 0, 1, 1), 1.0),
        "V" | "volt" => prefixable(dims(2, 1, -3, -1), 1.0),
        "L" | "l" | "liter" | "litre" => prefixable(dims(3, 0, 0, 0), 1e-3),
        "%" | "percent" => unit(Dimensions::DIMENSIONLESS, 1e-2),
        "ppm" => unit(Dimensions::DIMENSIONLESS, 1e-6),
        "ppb" => unit(Dimensions::DIMENSIONLESS, 1e-9),
        _ => return None,
    };
    Some(named)
}

/// SI prefixes, longest first so that `da` is tried before `d`.
const PREFIXES: &[(&str, f64)] = &[
    ("kilo", 1e3),
    ("hecto", 1e2),
    ("deca", 1e1),
    ("deka", 1e1),
    ("deci", 1e-1),
    ("centi", 1e-2),
    ("milli", 1e-3),
    ("micro", 1e-6),
    ("nano", 1e-9),
    ("mega", 1e6),
    ("giga", 1e9),
    ("da", 1e1),
    ("Y", 1e24),
    ("Z", 1e21),
    ("E", 1e18),
    ("P", 1e15),
    ("T", 1e12),
    ("G", 1e9),
    ("M", 1e6),
    ("k", 1e3),
    ("h", 1e2),
    ("d", 1e-1),
    ("c", 1e-2),
    ("m", 1e-3),
    ("u", 1e-6),
    ("µ", 1e-6),
    ("n", 1e-9),
    ("p", 1e-12),
    ("f", 1e-15),
    ("a", 1e-18),
    ("z", 1e-21),
    ("y", 1e-24),
];

/// Resolve a symbol, trying an exact match before SI prefixes.
pub(crate) fn resolve(symbol: &str) -> Option<NamedUnit> {
    if let Some(named) = lookup(symbol) {
        return Some(named);
    }
    PREFIXES.iter().find_map(|(prefix, factor)| {
        let rest = symbol.strip_prefix(prefix)?;
        let named = lookup(rest).filter(|n| n.prefixable)?;
        Some(NamedUnit {
            scale: named.scale * factor,
            ..named
        })
    })
}
