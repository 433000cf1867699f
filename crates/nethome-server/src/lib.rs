//! NetHome hub server.
//!
//! Hosts pluggable HomeItems and routes events between them:
//! - **ItemFactory**: class-name to constructor registry
//! - **ItemDirectory**: ownership, id/name addressing and lifecycle
//! - **HomeServer**: the wired hub with its event distribution loop
//! - **builtin**: the item classes shipped with the hub

pub mod builtin;
pub mod config;
pub mod directory;
pub mod error;
pub mod factory;
pub mod server;

pub use config::{ConfigError, ItemConfig, ServerConfig, CONFIG_ENV_VAR, LOG_ENV_VAR};
pub use directory::ItemDirectory;
pub use error::HubError;
pub use factory::{ItemConstructor, ItemFactory};
pub use server::{HomeServer, ServerHandle};
