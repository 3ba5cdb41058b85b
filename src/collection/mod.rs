pub mod builder;
pub mod feature;
pub mod geojson;
pub mod temporal;
