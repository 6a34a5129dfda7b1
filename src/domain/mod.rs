pub mod models;
pub mod cart;
pub mod errors;

pub use models::*;
pub use cart::*;
pub use errors::*;
