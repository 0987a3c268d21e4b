pub mod format;
pub mod template;
pub mod validation;

pub use format::*;
pub use template::{render, VariableMap};
pub use validation::*;
