// Adapters layer: concrete implementations for external systems.
// http_server exposes the predictor, http_client is what the form talks through.

pub mod http_client;
pub mod http_server;

pub use http_client::HttpPredictionClient;
pub use http_server::{routes, run_on, serve};
