pub mod macros;
pub mod map;

pub use map::*;
