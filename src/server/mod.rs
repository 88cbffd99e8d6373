mod auth_routes;
mod browse_routes;
pub mod config;
mod download_routes;
mod error;
mod http_layers;
#[allow(clippy::module_inception)]
pub mod server;
pub mod session;
mod settings_routes;
pub mod state;

pub use config::ServerConfig;
pub use error::{ApiError, ApiJson};
pub use http_layers::*;
pub use server::{make_app, run_server};
