pub mod column;
pub mod value;

pub use column::*;
pub use value::*;
