pub mod api;
pub mod error;
pub mod models;
pub mod selector;
pub mod storage;
pub mod store;

pub use api::*;
pub use error::*;
pub use models::*;
pub use selector::*;
pub use storage::*;
pub use store::*;
