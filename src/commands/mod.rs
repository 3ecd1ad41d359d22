//! Application command handlers for imgscribe.
//!
//! # Commands
//! - `transcribe`: Transcribe an image (default)
//! - `prepare`: Reset the per-document output directory (`-n`)
//! - `schema`: Print the structured output schema
//! - `config`: Show config file location and effective settings
//! - `logs`: Display recent log entries

pub mod config;
pub mod logs;
pub mod prepare;
pub mod schema;
pub mod transcribe;

pub use config::handle_config;
pub use logs::handle_logs;
pub use prepare::handle_prepare;
pub use schema::handle_schema;
pub use transcribe::{handle_transcribe, TranscribeOptions};
