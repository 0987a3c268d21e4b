pub mod constants;
pub mod pipeline;

pub use constants::*;
pub use pipeline::*;
