pub mod context;
pub mod errors;

pub use context::*;
pub use errors::*;
