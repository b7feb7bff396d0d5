//! todomemo-server
//!
//! HTTP boundary for todomemo-core: routing, request parsing, error mapping,
//! configuration, and the server lifecycle.

pub mod config;
pub mod dto;
pub mod error;
pub mod handlers;
pub mod routes;
pub mod server;
pub mod state;

pub use config::{ConfigError, ServerConfig};
pub use routes::create_router;
pub use server::Server;
pub use state::{AppState, Storage};
