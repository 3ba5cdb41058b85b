pub mod decoder;
pub mod error;
pub mod model;
pub mod wkt;
