mod models;
mod ops;

pub use models::*;
pub use ops::*;
