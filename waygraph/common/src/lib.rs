pub mod encoded_value;
pub mod error;
pub mod flags;
pub mod geometry;
pub mod types;
