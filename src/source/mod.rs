pub mod columnar;
pub mod fetch;
