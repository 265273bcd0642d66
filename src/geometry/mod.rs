pub mod correspondence;
pub mod transform;

pub use correspondence::*;
pub use transform::*;
