//! Parser for the WKT geometry literals found in columnar sources.
//!
//! Supported keywords are `POINT`, `LINESTRING`, `POLYGON`, `MULTILINESTRING` and `MULTIPOLYGON`,
//! matched case-sensitively at the start of the trimmed text.
//!
//! Leniency rules:
//! - `POINT` never fails. Missing or malformed ordinates are replaced with `0`, so `(0, 0)` does not
//!   necessarily mean the origin.
//! - `LINESTRING` without a parenthesized coordinate list yields an empty line string.
//! - Ordinates beyond the first two (Z/M) are ignored.
//!
//! Polygon rings are split with an explicit scanner instead of a flat split on commas, since ring
//! separators and coordinate separators are both commas.

use super::error::DecodeError;
use super::model::{Geometry, Position, PositionList};

type WktResult<T> = Result<T, DecodeError>;

type KeywordParser = fn(&str) -> WktResult<Geometry>;

/// Keywords in matching order. Longer keywords come first so that no keyword shadows another.
const KEYWORD_PARSERS: [(&str, KeywordParser); 5] = [
    ("MULTILINESTRING", parse_multi_line_string),
    ("MULTIPOLYGON", parse_multi_polygon),
    ("LINESTRING", parse_line_string),
    ("POLYGON", parse_polygon),
    ("POINT", parse_point),
];

/// Parse a WKT literal into a geometry.
pub fn parse_wkt(text: &str) -> WktResult<Geometry> {
    let text = text.trim();
    for (keyword, parser) in KEYWORD_PARSERS {
        if let Some(rest) = text.strip_prefix(keyword) {
            return parser(rest);
        }
    }
    Err(DecodeError::invalid_wkt(format!(
        "unrecognized geometry keyword in '{}'",
        abbreviate(text)
    )))
}

fn abbreviate(text: &str) -> String {
    const MAX_CHARS: usize = 40;
    if text.chars().count() <= MAX_CHARS {
        text.to_string()
    } else {
        format!("{}...", text.chars().take(MAX_CHARS).collect::<String>())
    }
}

/// Content of the parenthesized group directly following the keyword, up to the first `)`.
/// Returns `None` when there is no such group or it is empty.
fn leading_group(rest: &str) -> Option<&str> {
    let inner = rest.trim_start().strip_prefix('(')?;
    let end = inner.find(')')?;
    match &inner[..end] {
        "" => None,
        group => Some(group),
    }
}

/// Content between the first `(` following the keyword and the final `)` of the text.
fn outer_group(rest: &str) -> Option<&str> {
    let inner = rest.trim_start().strip_prefix('(')?.strip_suffix(')')?;
    if inner.is_empty() {
        None
    } else {
        Some(inner)
    }
}

/// A finite number. `NaN` and `inf` are rejected even though `f64` parsing accepts them.
fn parse_ordinate(token: &str) -> WktResult<f64> {
    token
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
        .ok_or_else(|| DecodeError::invalid_wkt(format!("'{}' is not a number", token)))
}

fn parse_position(pair: &str) -> WktResult<Position> {
    let mut tokens = pair.split_whitespace();
    match (tokens.next(), tokens.next()) {
        (Some(lon), Some(lat)) => Ok([parse_ordinate(lon)?, parse_ordinate(lat)?]),
        _ => Err(DecodeError::invalid_wkt(format!(
            "coordinate '{}' needs two ordinates",
            pair.trim()
        ))),
    }
}

/// Parse a comma-separated coordinate list such as `10 43, 11 44`.
fn parse_positions(text: &str) -> WktResult<PositionList> {
    if text.trim().is_empty() {
        return Ok(Vec::new());
    }
    text.split(',').map(parse_position).collect()
}

fn parse_point(rest: &str) -> WktResult<Geometry> {
    let mut position = [0.0, 0.0];
    match leading_group(rest) {
        Some(group) => {
            for (ordinate, token) in position.iter_mut().zip(group.split_whitespace()) {
                *ordinate = parse_ordinate(token).unwrap_or_else(|_| {
                    log::debug!("Substituting 0 for malformed POINT ordinate '{}'", token);
                    0.0
                });
            }
        }
        None => log::debug!("Substituting (0, 0) for POINT without coordinates"),
    }
    Ok(Geometry::Point(position))
}

fn parse_line_string(rest: &str) -> WktResult<Geometry> {
    let positions = match leading_group(rest) {
        Some(group) => parse_positions(group)?,
        None => Vec::new(),
    };
    Ok(Geometry::LineString(positions))
}

fn parse_multi_line_string(rest: &str) -> WktResult<Geometry> {
    let mut lines = Vec::new();
    let mut group_start: Option<usize> = None;
    for (index, ch) in rest.char_indices() {
        match ch {
            '(' => group_start = Some(index + 1),
            ')' => {
                if let Some(start) = group_start.take() {
                    let group = &rest[start..index];
                    if !group.trim().is_empty() {
                        lines.push(parse_positions(group)?);
                    }
                }
            }
            _ => {}
        }
    }
    Ok(Geometry::MultiLineString(lines))
}

/// Scanner state while splitting the ring group of a `POLYGON` into rings.
#[derive(Debug, Clone, Copy, PartialEq)]
enum RingScan {
    OutsideRing,
    /// Inside a ring whose coordinates start at the given byte offset.
    InsideRing { start: usize },
}

fn is_separator(ch: char) -> bool {
    ch == ',' || ch.is_whitespace()
}

/// Split the body of a ring group, e.g. `(0 0, 1 0, 1 1), (0.2 0.2, 0.4 0.2, 0.4 0.4)`, into rings.
///
/// Only one level of ring nesting is allowed. A ring that is still open when the body ends is
/// discarded, and empty rings `()` are skipped.
fn split_rings(body: &str) -> WktResult<Vec<PositionList>> {
    let mut rings = Vec::new();
    let mut state = RingScan::OutsideRing;
    for (index, ch) in body.char_indices() {
        state = match (state, ch) {
            (RingScan::OutsideRing, '(') => RingScan::InsideRing { start: index + 1 },
            (RingScan::OutsideRing, ')') => {
                return Err(DecodeError::invalid_wkt("unbalanced ')' in polygon"))
            }
            (RingScan::OutsideRing, ch) if is_separator(ch) => state,
            (RingScan::OutsideRing, ch) => {
                return Err(DecodeError::invalid_wkt(format!(
                    "unexpected '{}' between polygon rings",
                    ch
                )))
            }
            (RingScan::InsideRing { .. }, '(') => {
                return Err(DecodeError::invalid_wkt(
                    "polygon rings cannot be nested more than one level",
                ))
            }
            (RingScan::InsideRing { start }, ')') => {
                let ring = &body[start..index];
                if !ring.trim().is_empty() {
                    rings.push(parse_positions(ring)?);
                }
                RingScan::OutsideRing
            }
            (RingScan::InsideRing { .. }, _) => state,
        };
    }
    if state != RingScan::OutsideRing {
        log::debug!("Discarding unterminated polygon ring");
    }
    Ok(rings)
}

fn polygon_rings(rest: &str) -> WktResult<Vec<PositionList>> {
    let body = outer_group(rest).ok_or_else(|| {
        DecodeError::invalid_wkt("polygon ring group is not enclosed in parentheses")
    })?;
    split_rings(body)
}

fn parse_polygon(rest: &str) -> WktResult<Geometry> {
    Ok(Geometry::Polygon(polygon_rings(rest)?))
}

/// Scanner state while splitting the body of a `MULTIPOLYGON` into polygons.
#[derive(Debug, Clone, Copy, PartialEq)]
enum PolygonScan {
    OutsideSubpolygon,
    /// Inside a polygon group starting at the byte offset of its `(`, at the given nesting depth.
    InsideSubpolygon { start: usize, depth: usize },
}

fn parse_multi_polygon(rest: &str) -> WktResult<Geometry> {
    let body = outer_group(rest).ok_or_else(|| {
        DecodeError::invalid_wkt("multipolygon group is not enclosed in parentheses")
    })?;
    let mut polygons = Vec::new();
    let mut state = PolygonScan::OutsideSubpolygon;
    for (index, ch) in body.char_indices() {
        state = match (state, ch) {
            (PolygonScan::OutsideSubpolygon, '(') => PolygonScan::InsideSubpolygon {
                start: index,
                depth: 1,
            },
            (PolygonScan::OutsideSubpolygon, ')') => {
                return Err(DecodeError::invalid_wkt("unbalanced ')' in multipolygon"))
            }
            (PolygonScan::OutsideSubpolygon, ch) if is_separator(ch) => state,
            (PolygonScan::OutsideSubpolygon, ch) => {
                return Err(DecodeError::invalid_wkt(format!(
                    "unexpected '{}' between polygons",
                    ch
                )))
            }
            (PolygonScan::InsideSubpolygon { start, depth }, '(') => {
                PolygonScan::InsideSubpolygon {
                    start,
                    depth: depth + 1,
                }
            }
            (PolygonScan::InsideSubpolygon { start, depth: 1 }, ')') => {
                // The group is a complete `POLYGON` body including its enclosing parentheses.
                polygons.push(polygon_rings(&body[start..=index])?);
                PolygonScan::OutsideSubpolygon
            }
            (PolygonScan::InsideSubpolygon { start, depth }, ')') => {
                PolygonScan::InsideSubpolygon {
                    start,
                    depth: depth - 1,
                }
            }
            (PolygonScan::InsideSubpolygon { .. }, _) => state,
        };
    }
    if state != PolygonScan::OutsideSubpolygon {
        log::debug!("Discarding unterminated multipolygon member");
    }
    Ok(Geometry::MultiPolygon(polygons))
}
