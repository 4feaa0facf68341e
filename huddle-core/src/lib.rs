pub mod error;
pub mod model;

pub use error::CodecError;
pub use model::*;
