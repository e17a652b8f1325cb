//! Unit expression grammar.
//!
//! ```text
//! unit      := product [ "since" epoch ]
//! product   := factor { ( sep | "/" ) factor }
//! sep       := whitespace | "." | "*" | "·"
//! factor    := number | symbol [ exponent ]
//! exponent  := [ "^" | "**" ] [ "+" | "-" ] digits
//! ```
//!
//! An affine offset (°C, °F) survives only when the product is a single
//! factor with exponent 1; inside a compound expression the unit acts as
//! a temperature interval.

use chrono::{NaiveDate, NaiveDateTime};

use crate::error::UnitError;
use crate::table;
use crate::unit::{Dimensions, GeoAxis, Unit};

struct Factor {
    dims: Dimensions,
    scale: f64,
    offset: f64,
    axis: GeoAxis,
    power: i8,
}

pub(crate) fn parse_unit(expr: &str) -> Result<Unit, UnitError> {
    let expr = expr.trim();
    if expr.is_empty() {
        return Err(UnitError::Empty);
    }

    let words: Vec<&str> = expr.split_whitespace().collect();
    let Some(since) = words.iter().position(|w| w.eq_ignore_ascii_case("since")) else {
        return parse_product(expr);
    };

    let base_expr = words[..since].join(" ");
    let base = parse_product(&base_expr)?;
    if base.dims != Dimensions::SECOND || base.offset != 0.0 {
        return Err(UnitError::ReferenceNotTime(base_expr));
    }
    let reference = parse_epoch(&words[since + 1..].join(" "))?;
    Ok(Unit {
        reference: Some(reference),
        ..base
    })
}

fn parse_product(expr: &str) -> Result<Unit, UnitError> {
    let factors = split_factors(expr)?;
    if factors.is_empty() {
        return Err(UnitError::Empty);
    }
    let single = factors.len() == 1;

    let mut unit = Unit::DIMENSIONLESS;
    for (divide, token) in &factors {
        let factor = parse_factor(token)?;
        let power = if *divide { factor.power.saturating_neg() } else { factor.power };
        unit.dims = unit.dims.multiply(factor.dims.pow(power));
        unit.scale *= factor.scale.powi(i32::from(power));
        if single && power == 1 {
            unit.offset = factor.offset;
            unit.axis = factor.axis;
        }
    }
    Ok(unit)
}

/// Split a product into `(divides, token)` pairs.
fn split_factors(expr: &str) -> Result<Vec<(bool, String)>, UnitError> {
    fn flush(current: &mut String, divide_next: &mut bool, out: &mut Vec<(bool, String)>) {
        if !current.is_empty() {
            out.push((*divide_next, std::mem::take(current)));
            *divide_next = false;
        }
    }

    let chars: Vec<char> = expr.chars().collect();
    let mut factors = Vec::new();
    let mut current = String::new();
    let mut divide_next = false;

    let mut i = 0;
    while i < chars.len() {
        let c = chars[i];
        match c {
            '/' => {
                flush(&mut current, &mut divide_next, &mut factors);
                if divide_next {
                    return Err(UnitError::DanglingOperator(expr.to_string()));
                }
                divide_next = true;
            }
            '*' if chars.get(i + 1) == Some(&'*') => {
                current.push('^');
                i += 1;
            }
            '.' => {
                let next_is_digit = chars.get(i + 1).is_some_and(|n| n.is_ascii_digit());
                let in_number = current
                    .chars()
                    .all(|p| p.is_ascii_digit() || p == '-' || p == '+');
                if next_is_digit && in_number {
                    current.push('.');
                } else {
                    flush(&mut current, &mut divide_next, &mut factors);
                }
            }
            c if c.is_whitespace() || c == '*' || c == '·' => {
                flush(&mut current, &mut divide_next, &mut factors);
            }
            c => current.push(c),
        }
        i += 1;
    }
    flush(&mut current, &mut divide_next, &mut factors);

    if divide_next {
        return Err(UnitError::DanglingOperator(expr.to_string()));
    }
    Ok(factors)
}

fn parse_factor(token: &str) -> Result<Factor, UnitError> {
    if let Ok(number) = token.parse::<f64>() {
        if !number.is_finite() || number <= 0.0 {
            return Err(UnitError::UnknownSymbol(token.to_string()));
        }
        return Ok(Factor {
            dims: Dimensions::DIMENSIONLESS,
            scale: number,
            offset: 0.0,
            axis: GeoAxis::Plain,
            power: 1,
        });
    }

    let (symbol, power) = match token.split_once('^') {
        Some((symbol, power)) => (symbol, parse_power(power, token)?),
        None => split_trailing_power(token)?,
    };

    let named = table::resolve(symbol).ok_or_else(|| UnitError::UnknownSymbol(symbol.to_string()))?;
    Ok(Factor {
        dims: named.dims,
        scale: named.scale,
        offset: named.offset,
        axis: named.axis,
        power,
    })
}

fn parse_power(power: &str, token: &str) -> Result<i8, UnitError> {
    power
        .parse::<i8>()
        .map_err(|_| UnitError::InvalidExponent(token.to_string()))
}

/// `m2` → (`m`, 2), `s-1` → (`s`, -1), `K` → (`K`, 1).
fn split_trailing_power(token: &str) -> Result<(&str, i8), UnitError> {
    let digits_at = token.trim_end_matches(|c: char| c.is_ascii_digit()).len();
    if digits_at == token.len() {
        return Ok((token, 1));
    }
    let head = &token[..digits_at];
    let symbol = head.trim_end_matches(['-', '+']);
    if symbol.is_empty() || head.len() - symbol.len() > 1 {
        return Err(UnitError::InvalidExponent(token.to_string()));
    }
    Ok((symbol, parse_power(&token[symbol.len()..], token)?))
}

fn parse_epoch(expr: &str) -> Result<NaiveDateTime, UnitError> {
    let invalid = || UnitError::InvalidReference(expr.to_string());

    let cleaned = expr
        .trim()
        .trim_end_matches("UTC")
        .trim_end_matches('Z')
        .trim()
        .replacen('T', " ", 1);
    let mut parts = cleaned.split_whitespace();
    let date = parts.next().ok_or_else(invalid)?;
    let (time, mut offset) = match parts.next() {
        None => (None, None),
        Some(word) if word.starts_with(['+', '-']) => (None, Some(word)),
        Some(word) => match word.find(['+', '-']) {
            Some(at) => (Some(&word[..at]), Some(&word[at..])),
            None => (Some(word), None),
        },
    };
    if let Some(word) = parts.next() {
        if offset.is_some() {
            return Err(invalid());
        }
        offset = Some(word);
    }
    if parts.next().is_some() {
        return Err(invalid());
    }

    let mut ymd = date.split('-');
    let year: i32 = ymd.next().and_then(|s| s.parse().ok()).ok_or_else(invalid)?;
    let month: u32 = ymd.next().and_then(|s| s.parse().ok()).ok_or_else(invalid)?;
    let day: u32 = ymd.next().and_then(|s| s.parse().ok()).ok_or_else(invalid)?;
    if ymd.next().is_some() {
        return Err(invalid());
    }
    let date = NaiveDate::from_ymd_opt(year, month, day).ok_or_else(invalid)?;

    let (hour, minute, second) = match time {
        None => (0, 0, 0.0),
        Some(time) => {
            let mut hms = time.split(':');
            let hour: u32 = hms.next().and_then(|s| s.parse().ok()).ok_or_else(invalid)?;
            let minute: u32 = match hms.next() {
                Some(s) => s.parse().map_err(|_| invalid())?,
                None => 0,
            };
            let second: f64 = match hms.next() {
                Some(s) => s.parse().map_err(|_| invalid())?,
                None => 0.0,
            };
            (hour, minute, second)
        }
    };
    if !(0.0..60.0).contains(&second) {
        return Err(invalid());
    }
    let whole = second.trunc() as u32;
    let nanos = (second.fract() * 1e9).round() as u32;
    let local = date
        .and_hms_nano_opt(hour, minute, whole, nanos)
        .ok_or_else(invalid)?;

    match offset {
        None => Ok(local),
        Some(offset) => {
            let shift = parse_utc_offset(offset).ok_or_else(invalid)?;
            local.checked_sub_signed(shift).ok_or_else(invalid)
        }
    }
}

/// `+hh:mm`, `-hhmm`, `+h` → signed offset from UTC.
fn parse_utc_offset(offset: &str) -> Option<chrono::Duration> {
    let (sign, rest) = match (offset.strip_prefix('+'), offset.strip_prefix('-')) {
        (Some(rest), _) => (1, rest),
        (_, Some(rest)) => (-1, rest),
        _ => return None,
    };
    if !rest.bytes().all(|b| b.is_ascii_digit() || b == b':') {
        return None;
    }
    let (hours, minutes) = match rest.split_once(':') {
        Some((h, m)) => (h, m),
        None if rest.len() == 4 => rest.split_at(2),
        None => (rest, "0"),
    };
    if hours.is_empty() || hours.len() > 2 || minutes.is_empty() || minutes.len() > 2 {
        return None;
    }
    let hours: i64 = hours.parse().ok().filter(|h| *h <= 14)?;
    let minutes: i64 = minutes.parse().ok().filter(|m| *m < 60)?;
    Some(chrono::Duration::minutes(sign * (hours * 60 + minutes)))
}
