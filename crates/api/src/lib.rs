//! The workspace's outer contracts.
//!
//! - [`ObjectStore`]: where objects live. The workspace only ever requests
//!   changes through it.
//! - [`Command`] / [`Query`]: the serializable intent language used by
//!   keyboard actions, scripts and tests.

mod command;
mod query;
mod store;
mod target;

pub use command::*;
pub use query::*;
pub use store::{MemoryStore, ObjectStore, StoreCall, StoreError};
pub use target::*;
