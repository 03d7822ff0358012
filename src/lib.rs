pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use adapters::storage::{FileTokenStore, MemoryTokenStore};
pub use config::{toml_config::ClientConfig, Settings};
pub use core::{client::ApiClient, session::SessionManager};
pub use utils::error::{Result, SupportError};
