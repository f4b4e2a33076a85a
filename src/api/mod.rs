//! Client side of the Planty REST API.
//!
//! - [`transport`]: HTTP requests and the persisted session cookie
//! - [`planty`]: one typed method per endpoint
//! - [`cache`]: keyed response cache and the write/read dependency table
//! - [`store`]: cached reads and invalidating writes, used by the commands

pub mod cache;
pub mod error;
pub mod planty;
pub mod store;
pub mod transport;

pub use error::ApiError;
pub use planty::PlantyApi;
pub use store::Store;
pub use transport::{HttpTransport, Transport};
