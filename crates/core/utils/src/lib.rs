mod strings;
mod time;

pub use strings::*;
pub use time::*;
