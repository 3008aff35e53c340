pub mod incident;
pub mod payload;

pub use incident::*;
pub use payload::*;
