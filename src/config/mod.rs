#[cfg(feature = "cli")]
pub mod cli;
pub mod client;
pub mod toml_config;

#[cfg(feature = "cli")]
pub use cli::{FormCli, ServerCli};
pub use client::ClientConfig;
pub use toml_config::ServiceConfig;
