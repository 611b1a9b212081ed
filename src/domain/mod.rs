pub mod error;
pub mod mapping;
pub mod normalize;
pub mod split;
pub mod transaction;
