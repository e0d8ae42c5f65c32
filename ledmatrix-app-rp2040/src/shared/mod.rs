pub mod constant;
pub mod resource;
