pub mod env;
mod loader;

pub use env::{ApiConfig, AppConfig, DirectoryConfig, InputLimits};
pub use loader::load_config;
