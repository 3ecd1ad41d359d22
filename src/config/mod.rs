//! Configuration management for imgscribe.
//!
//! Settings come from an optional TOML file in the user's config directory;
//! API credentials come only from the environment.

pub mod credentials;
pub mod file;

pub use credentials::{get_api_key, load_dotenv};
pub use file::{get_config_path, GenerationConfig, ImgscribeConfig, ProvidersConfig};
