//! Application layer: the state stores the UI collaborator drives, plus the
//! composition root that wires them to storage and the remote API.

pub mod cart_store;
pub mod session;
pub mod catalog;
pub mod search;
pub mod state;

pub use cart_store::*;
pub use session::*;
pub use catalog::*;
pub use search::*;
pub use state::*;
