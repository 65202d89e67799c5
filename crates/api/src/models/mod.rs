pub mod position;
pub mod symbol;

pub use position::*;
pub use symbol::*;
