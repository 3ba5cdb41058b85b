use thiserror::Error;

/// Per-row geometry decoding failure. Never fatal for a batch: the row is dropped and counted.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DecodeError {
    /// Malformed or unrecognized WKT text.
    #[error("invalid WKT: {0}")]
    InvalidWkt(String),
    /// Absent geometry value or a value shape that carries no geometry.
    #[error("undecodable geometry: {0}")]
    UndecodableGeometry(String),
    /// Binary geometry without an enabled decoder.
    #[error("unsupported geometry encoding: {0}")]
    UnsupportedEncoding(String),
}

impl DecodeError {
    pub fn invalid_wkt(reason: impl Into<String>) -> Self {
        DecodeError::InvalidWkt(reason.into())
    }
}
