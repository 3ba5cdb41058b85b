pub mod alias;
pub mod normalize;
pub mod value;
