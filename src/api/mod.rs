//! HTTP surface of the fact-check service.
//!
//! `api_router()` returns a composable `Router`; `server` owns the
//! bind/serve/shutdown lifecycle.

pub mod endpoints;
pub mod error;
pub mod middleware;
pub mod router;
pub mod server;
pub mod types;

pub use router::api_router;
pub use server::{serve_until_ctrl_c, start_api_server, ApiServer, ServerError};
pub use types::ApiContext;
