use super::error::DecodeError;
use super::model::Geometry;
use super::wkt::parse_wkt;
use crate::properties::value::Value;

/// Options controlling which geometry encodings are decoded.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DecoderOptions {
    /// Decode binary values as WKB. Disabled by default, binary values then fail with
    /// `UnsupportedEncoding`.
    pub wkb: bool,
}

/// Decode a raw column value into a geometry.
///
/// - missing or `Null` values fail with `UndecodableGeometry`
/// - structured geometries are returned unchanged
/// - strings are parsed as WKT
/// - binary values fail with `UnsupportedEncoding` unless WKB decoding is enabled
/// - any other value fails with `UndecodableGeometry`
pub fn decode_geometry(
    value: Option<&Value>,
    options: &DecoderOptions,
) -> Result<Geometry, DecodeError> {
    match value {
        None | Some(Value::Null) => Err(DecodeError::UndecodableGeometry(
            "no geometry value".to_string(),
        )),
        Some(Value::Geometry(geometry)) => Ok(geometry.clone()),
        Some(Value::Str(text)) => parse_wkt(text),
        Some(Value::Bytes(bytes)) if options.wkb => decode_wkb(bytes),
        Some(Value::Bytes(bytes)) => Err(DecodeError::UnsupportedEncoding(format!(
            "WKB decoding is disabled ({} bytes)",
            bytes.len()
        ))),
        Some(other) => Err(DecodeError::UndecodableGeometry(format!(
            "{} value cannot hold a geometry",
            other.kind()
        ))),
    }
}

fn decode_wkb(bytes: &[u8]) -> Result<Geometry, DecodeError> {
    let mut reader = bytes;
    let geometry = wkb::wkb_to_geom(&mut reader)
        .map_err(|err| DecodeError::UnsupportedEncoding(format!("unreadable WKB, {:?}", err)))?;
    Geometry::try_from(&geometry).map_err(|err| DecodeError::UnsupportedEncoding(err.to_string()))
}
