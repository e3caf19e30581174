mod models;
mod defaults;
mod loader;
mod migration;
mod resolver;
mod store;
mod errors;

pub use models::*;
pub use errors::ConfigError;
pub use resolver::{backend_key, BackendSettings, ConfigResolver};
pub use store::ConfigStore;
