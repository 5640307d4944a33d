pub mod normalize;
pub mod validate;
