//! Show the configuration file location and the effective settings.

use std::path::Path;

use crate::config::{self, ImgscribeConfig};

/// Prints where configuration is read from and the values in effect.
///
/// Credentials are reported only as present or missing.
///
/// # Errors
/// - If the default config path cannot be determined
/// - If the configuration cannot be rendered as TOML
pub fn handle_config(
    config_path: Option<&Path>,
    config_data: &ImgscribeConfig,
) -> Result<(), anyhow::Error> {
    let path = match config_path {
        Some(p) => p.to_path_buf(),
        None => config::get_config_path()?,
    };

    let status = if path.exists() { "" } else { " (not found, using defaults)" };
    println!("# Config file: {}{status}", path.display());

    for provider in crate::transcription::TranscriptionProvider::all() {
        let state = match config::get_api_key(*provider) {
            Ok(_) => "set",
            Err(_) => "missing",
        };
        println!("# {}: {state}", provider.api_key_env());
    }
    println!();
    print!("{}", config_data.to_toml()?);

    Ok(())
}
